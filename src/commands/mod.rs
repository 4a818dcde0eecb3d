pub mod convert;
pub mod inspect;

use anyhow::{Context, Result};
use legis::{Grammar, GrammarOptions, ParseTree};
use tracing::info;

use crate::cli::SourceArgs;
use crate::util::{read_source, source_name};

pub fn load_tree(args: &SourceArgs) -> Result<(ParseTree, GrammarOptions)> {
    let source = source_name(args.input.as_deref());
    let text = read_source(args.input.as_deref())?;
    let options = GrammarOptions {
        section_number_after_title: args.section_number_after_title,
    };

    info!(source = %source, rule = args.rule.as_str(), bytes = text.len(), "parsing text");

    let grammar = Grammar::new(options).context("failed to compile grammar")?;
    let tree = grammar
        .parse(&text, args.rule)
        .with_context(|| format!("failed to parse {} as {}", source, args.rule.as_str()))?;

    Ok((tree, options))
}
