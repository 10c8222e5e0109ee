use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Ask a language model for a typed answer", long_about = None)]
pub struct Cli {
    /// YAML or JSON config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log prompts and responses (same as RUST_LOG=surety=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Ask until the answer parses, then print it
    Ask(AskArgs),
    /// List registered providers and whether each is configured
    Providers,
}

/// Response shape the answer must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParserKind {
    Boolean,
    Integer,
    Float,
    String,
    Choice,
    List,
}

#[derive(Debug, Args)]
pub struct AskArgs {
    /// Prompt text; read from stdin when omitted or "-"
    pub prompt: Vec<String>,

    #[arg(short, long, value_enum, default_value_t = ParserKind::String)]
    pub parser: ParserKind,

    /// Allowed answer for --parser choice (repeatable)
    #[arg(long = "choice", value_name = "VALUE", required_if_eq("parser", "choice"))]
    pub choices: Vec<String>,

    /// Item separator for --parser list
    #[arg(long, default_value = surety_core::parsers::DEFAULT_SEPARATOR)]
    pub separator: String,

    /// Accept an empty list for --parser list
    #[arg(long)]
    pub allow_empty: bool,

    /// Model, overriding config and SURETY_MODEL
    #[arg(short, long)]
    pub model: Option<String>,

    /// Text placed before the prompt
    #[arg(long)]
    pub preface: Option<String>,

    /// Attempts before giving up
    #[arg(short = 'r', long)]
    pub max_retries: Option<u32>,

    /// Do not offer the model the DECLINED answer
    #[arg(long)]
    pub no_decline: bool,

    /// Print the value and attempt history as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not print invalid-response notices
    #[arg(short, long)]
    pub quiet: bool,
}

impl AskArgs {
    /// Prompt from the arguments, or `None` when stdin should be read.
    pub fn inline_prompt(&self) -> Option<String> {
        match self.prompt.as_slice() {
            [] => None,
            [only] if only == "-" => None,
            words => Some(words.join(" ")),
        }
    }
}
