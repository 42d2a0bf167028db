mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use remit_core::orchestrator::ParseOutcome;
use remit_core::RemitError;
use tracing_subscriber::EnvFilter;

use output::OutputOptions;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "remit", version, about = "Payment request parsing and risk scoring")]
struct Cli {
    #[arg(long = "output", value_enum, global = true)]
    output_format: Option<OutputFormat>,

    #[arg(long, global = true)]
    quiet: bool,

    #[arg(long = "no-color", global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Parse a free-form chat payment request.
    Parse {
        text: String,
        #[arg(long)]
        payer: String,
        #[arg(long)]
        recent_payments: Option<u32>,
    },
    /// Parse an invoice document (format inferred from the extension).
    Invoice {
        file: PathBuf,
        #[arg(long)]
        payer: String,
        #[arg(long)]
        recent_payments: Option<u32>,
    },
    /// Parse a voice payment request from an audio file.
    Voice {
        file: PathBuf,
        #[arg(long)]
        payer: String,
        #[arg(long)]
        content_type: String,
        #[arg(long)]
        transcript: Option<String>,
        #[arg(long)]
        recent_payments: Option<u32>,
    },
}

fn exit_code_for(outcome: &ParseOutcome) -> ExitCode {
    if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn exit_code_for_error(err: &RemitError) -> ExitCode {
    match err {
        RemitError::Io(_) => ExitCode::from(3),
        RemitError::UnsupportedFormat(_) => ExitCode::from(1),
        _ => ExitCode::from(4),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = OutputOptions::detect(
        cli.output_format == Some(OutputFormat::Json),
        cli.quiet,
        cli.no_color,
    );

    let outcome = match &cli.command {
        Commands::Parse {
            text,
            payer,
            recent_payments,
        } => Ok(commands::parse::run(payer, text, *recent_payments)),
        Commands::Invoice {
            file,
            payer,
            recent_payments,
        } => commands::invoice::run(file, payer, *recent_payments),
        Commands::Voice {
            file,
            payer,
            content_type,
            transcript,
            recent_payments,
        } => commands::voice::run(
            file,
            payer,
            content_type,
            transcript.clone(),
            *recent_payments,
        ),
    };

    match outcome {
        Ok(outcome) => {
            if output::render(&outcome, &options).is_err() {
                return ExitCode::from(4);
            }
            exit_code_for(&outcome)
        }
        Err(err) => {
            eprintln!("{err}");
            exit_code_for_error(&err)
        }
    }
}
