use anyhow::{Context, Result};
use legis::unparse::to_text;
use tracing::info;

use crate::cli::{InspectArgs, InspectFormat};
use crate::commands::load_tree;
use crate::util::{write_json_pretty, write_output};

pub fn run(args: InspectArgs) -> Result<()> {
    let (tree, options) = load_tree(&args.source)?;

    match (args.format, args.output.as_deref()) {
        (InspectFormat::Json, Some(path)) => write_json_pretty(path, &tree)?,
        (InspectFormat::Json, None) => {
            let mut json =
                serde_json::to_string_pretty(&tree).context("failed to serialize parse tree")?;
            json.push('\n');
            write_output(None, &json)?;
        }
        (InspectFormat::Text, output) => write_output(output, &to_text(&tree, &options))?,
    }

    info!(
        rule = args.source.rule.as_str(),
        format = args.format.as_str(),
        "inspection completed"
    );

    Ok(())
}
