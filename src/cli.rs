use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use legis::EntryRule;

#[derive(Parser, Debug)]
#[command(
    name = "legis",
    version,
    about = "Convert plain-text legislation to Akoma Ntoso markup"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Convert(ConvertArgs),
    Inspect(InspectArgs),
}

/// Where the text comes from and how to read it.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Plain-text input file; stdin when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = EntryRule::Document)]
    pub rule: EntryRule,

    #[arg(long, default_value_t = false)]
    pub section_number_after_title: bool,
}

#[derive(Args, Debug, Clone)]
pub struct IdentityArgs {
    /// JSON identity file. Flags below are ignored when it is given.
    #[arg(long)]
    pub identity_path: Option<PathBuf>,

    #[arg(long, default_value = "za")]
    pub jurisdiction: String,

    #[arg(long)]
    pub year: Option<String>,

    #[arg(long)]
    pub number: Option<String>,

    #[arg(long)]
    pub short_title: Option<String>,

    #[arg(long, default_value = "eng")]
    pub language: String,

    #[arg(long)]
    pub enacted_date: Option<NaiveDate>,
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub identity: IdentityArgs,

    /// Markup destination; stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub generation_date: Option<NaiveDate>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum InspectFormat {
    Json,
    Text,
}

impl InspectFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long, value_enum, default_value_t = InspectFormat::Json)]
    pub format: InspectFormat,

    #[arg(long)]
    pub output: Option<PathBuf>,
}
