//! `surety`: ask a language model for a typed answer from the command line.
//!
//! Exit codes: 0 on an accepted answer, 1 when the model declined or every
//! attempt was unparsable, 2 on configuration or transport failure.

mod cli;

use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser as _;
use serde_json::{json, Value};
use surety_core::{
    parse_boolean, parse_float, parse_integer, parse_string, Engine, EnsureError, EnsureOptions,
    Ensured, NullReporter, Parser, Reporter, StringChoiceParser, StringListParser,
};
use surety_runtime::{ProviderError, ProviderRegistry, ProviderTransport, RuntimeConfig};
use tracing_subscriber::EnvFilter;

use cli::{AskArgs, Cli, Commands, ParserKind};

/// Prints invalid-response notices to stderr.
struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn notify(&self, message: &str) {
        eprintln!("warning: {message}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("surety=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("surety=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RuntimeConfig::default(),
    };
    config
        .apply_env_overrides()
        .context("reading environment overrides")?;

    let registry = ProviderRegistry::with_defaults();

    match cli.command {
        Commands::Ask(args) => ask(args, config, &registry),
        Commands::Providers => {
            list_providers(&config, &registry);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn list_providers(config: &RuntimeConfig, registry: &ProviderRegistry) {
    for kind in registry.available_types() {
        let settings = if kind == config.provider.kind {
            config.provider.settings_json()
        } else {
            registry.default_config(kind).unwrap_or_default()
        };
        let status = match registry.validate(kind, &settings) {
            Ok(()) => "configured".to_string(),
            Err(err) => err.to_string(),
        };
        let description = registry
            .get_factory(kind)
            .map(|f| f.description())
            .unwrap_or_default();
        let marker = if kind == config.provider.kind { "*" } else { " " };
        println!("{marker} {kind:<10} {description} ({status})");
    }
}

fn ask(args: AskArgs, mut config: RuntimeConfig, registry: &ProviderRegistry) -> Result<ExitCode> {
    if let Some(model) = &args.model {
        config.engine.model = model.clone();
    }
    if let Some(preface) = &args.preface {
        config.engine.preface = preface.clone();
    }

    let prompt = match args.inline_prompt() {
        Some(prompt) => prompt,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading prompt from stdin")?;
            buf
        }
    };

    let engine = config
        .build_engine(registry)
        .context("building engine")?;
    let engine = if args.quiet {
        engine.with_reporter(NullReporter)
    } else {
        engine.with_reporter(ConsoleReporter)
    };

    let mut options = EnsureOptions::new();
    if let Some(max_retries) = args.max_retries {
        options = options.max_retries(max_retries);
    }
    if args.no_decline {
        options = options.allow_decline(false);
    }

    let outcome = match args.parser {
        ParserKind::Boolean => ensure_json(&engine, &prompt, &parse_boolean, options),
        ParserKind::Integer => ensure_json(&engine, &prompt, &parse_integer, options),
        ParserKind::Float => ensure_json(&engine, &prompt, &parse_float, options),
        ParserKind::String => ensure_json(&engine, &prompt, &parse_string, options),
        ParserKind::Choice => ensure_json(
            &engine,
            &prompt,
            &StringChoiceParser::new(args.choices.iter().cloned()),
            options,
        ),
        ParserKind::List => ensure_json(
            &engine,
            &prompt,
            &StringListParser::new()
                .with_separator(args.separator.as_str())
                .allow_empty(args.allow_empty),
            options,
        ),
    };

    let usage = engine.transport().usage();
    tracing::debug!(
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        "Token usage"
    );

    match outcome {
        Ok(ensured) => {
            print_answer(&ensured, args.json);
            Ok(ExitCode::SUCCESS)
        }
        Err(EnsureError::Declined { .. }) => {
            if args.json {
                println!("{}", json!({ "declined": true }));
            }
            eprintln!("The model declined to answer.");
            Ok(ExitCode::from(1))
        }
        Err(EnsureError::RetriesExhausted {
            max_retries,
            attempts,
            ..
        }) => {
            if args.json {
                println!("{}", json!({ "exhausted": true, "attempts": attempts }));
            }
            eprintln!("No parsable answer after {max_retries} attempts:");
            for (attempt, raw) in attempts.iter() {
                eprintln!("  {attempt}: {raw:?}");
            }
            Ok(ExitCode::from(1))
        }
        Err(EnsureError::Transport(err)) => {
            Err(anyhow::Error::new(err).context("calling the model provider"))
        }
        Err(EnsureError::InvalidRequest(reason)) => bail!("{reason}"),
    }
}

/// Run one `ensure` call and erase the output type for printing.
fn ensure_json<P>(
    engine: &Engine<ProviderTransport>,
    prompt: &str,
    parser: &P,
    options: EnsureOptions,
) -> Result<Ensured<Value>, EnsureError<ProviderError>>
where
    P: Parser,
    P::Output: Into<Value>,
{
    engine
        .ensure_detailed(prompt, parser, options)
        .map(|ensured| Ensured {
            value: ensured.value.into(),
            attempts: ensured.attempts,
        })
}

fn print_answer(ensured: &Ensured<Value>, as_json: bool) {
    if as_json {
        println!(
            "{}",
            json!({ "value": ensured.value, "attempts": ensured.attempts })
        );
        return;
    }

    match &ensured.value {
        Value::String(text) => println!("{text}"),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(text) => println!("{text}"),
                    other => println!("{other}"),
                }
            }
        }
        other => println!("{other}"),
    }
}
