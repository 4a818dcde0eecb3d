use std::fs;

use anyhow::{Context, Result, bail};
use legis::{Identity, Renderer};
use tracing::info;

use crate::cli::{ConvertArgs, IdentityArgs};
use crate::commands::load_tree;
use crate::util::write_output;

pub fn run(args: ConvertArgs) -> Result<()> {
    let identity = resolve_identity(&args.identity)?;
    let (tree, _) = load_tree(&args.source)?;

    let mut renderer = Renderer::new(identity.clone());
    if let Some(generation_date) = args.generation_date {
        renderer = renderer.with_generation_date(generation_date);
    }

    let markup = renderer
        .render(&tree)
        .with_context(|| format!("failed to render {}", identity.work_uri()))?;
    write_output(args.output.as_deref(), &markup)?;

    info!(
        work = %identity.work_uri(),
        output = %args
            .output
            .as_ref()
            .map_or_else(|| "<stdout>".to_string(), |path| path.display().to_string()),
        bytes = markup.len(),
        "wrote markup"
    );

    Ok(())
}

fn resolve_identity(args: &IdentityArgs) -> Result<Identity> {
    if let Some(path) = &args.identity_path {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let identity: Identity = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        info!(path = %path.display(), work = %identity.work_uri(), "loaded identity");
        return Ok(identity);
    }

    let (Some(year), Some(number), Some(short_title), Some(enacted_date)) = (
        args.year.clone(),
        args.number.clone(),
        args.short_title.clone(),
        args.enacted_date,
    ) else {
        bail!(
            "--year, --number, --short-title and --enacted-date are required without --identity-path"
        );
    };

    Ok(Identity {
        jurisdiction: args.jurisdiction.clone(),
        year,
        number,
        short_title,
        language: args.language.clone(),
        enacted_date,
        authorship: None,
    })
}
