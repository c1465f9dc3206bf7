use std::io::{self, BufRead};
use std::thread;

use clap::Parser;
use colored::*;
use tokio::sync::mpsc;
use tracing::{debug, info};

use logger_redacted::{init_tracing, LoggerConfig};
use voice_form_service::{
    build_payload, ChannelTranscriptSource, DictationService, DictationSummary, FormConfig,
    FormError, Resolution, ResolutionEngine, SchemaRegistry,
};

/// Fill a clinical prediction form from dictated transcripts
///
/// Reads one finalized transcript per line from stdin. Dictation ends at
/// "stop listening" or end of input.
#[derive(Parser, Debug)]
#[command(name = "voice-form")]
#[command(about = "Fill a clinical prediction form from dictated transcripts")]
struct Args {
    /// Form schema, e.g. "Heart Disease" (defaults to FORM_DEFAULT_SCHEMA)
    #[arg(short, long)]
    schema: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the session as JSON instead of a field table
    #[arg(long)]
    json: bool,

    /// Print the submission payload when every field is filled
    #[arg(long)]
    payload: bool,

    /// List the supported schemas and exit
    #[arg(long)]
    list_schemas: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut logger_config = LoggerConfig::from_env();
    if args.verbose {
        logger_config = logger_config.with_level("debug");
    }
    init_tracing(&logger_config)?;

    if args.list_schemas {
        print_schemas();
        return Ok(());
    }

    let mut config = FormConfig::from_env()?;
    if let Some(schema) = args.schema {
        config = config.with_default_schema(schema);
        config.validate()?;
    }

    let (sender, source) = ChannelTranscriptSource::channel(64);
    let mut service = DictationService::from_config(config, source)?;
    forward_stdin(sender);

    eprintln!(
        "🎙️  {} {} {}",
        "Dictating".bright_cyan(),
        service.engine().schema().name.bright_white(),
        "(say \"stop listening\" to finish)".dimmed()
    );

    let summary = service.listen_with(print_status).await?;
    info!(
        filled = summary.filled,
        unresolved = summary.unresolved,
        "Dictation complete"
    );

    print_summary(&summary);

    let engine = service.engine();
    if args.json {
        println!("{}", serde_json::to_string_pretty(engine.state())?);
    } else {
        print_fields(engine);
    }

    if args.payload {
        print_payload(engine)?;
    }

    Ok(())
}

/// Feed stdin lines into the capture channel from a dedicated thread.
///
/// Blocking reads stay off the runtime so a pending read never holds up exit.
fn forward_stdin(sender: mpsc::Sender<String>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if sender.blocking_send(line).is_err() {
                break;
            }
        }
        debug!("Stdin capture finished");
    });
}

fn print_status(resolution: &Resolution) {
    let status = resolution.status();
    let line = match resolution {
        Resolution::Filled(_) => format!("✓ {}", status).bright_green(),
        Resolution::Unresolved => format!("? {}", status).bright_yellow(),
        Resolution::StopRequested => format!("■ {}", status).bright_cyan(),
        Resolution::Ignored => status.dimmed(),
    };
    eprintln!("  {}", line);
}

fn print_summary(summary: &DictationSummary) {
    let ending = if summary.stopped_by_directive {
        "stop directive"
    } else {
        "end of input"
    };
    eprintln!(
        "{} {} filled, {} unresolved ({})",
        "Done:".bright_cyan(),
        summary.filled.to_string().bright_white(),
        summary.unresolved.to_string().bright_white(),
        ending
    );
}

fn print_fields(engine: &ResolutionEngine) {
    let schema = engine.schema();
    let state = engine.state();

    println!("{}", schema.name.bold());
    for name in schema.field_names() {
        match state.get(name) {
            Some(value) => println!("  {:<22} {}", name, value.to_string().bright_white()),
            None => println!("  {:<22} {}", name, "-".dimmed()),
        }
    }
}

fn print_payload(engine: &ResolutionEngine) -> anyhow::Result<()> {
    match build_payload(engine.schema(), engine.state()) {
        Ok(payload) => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
        Err(FormError::IncompleteForm { missing }) => {
            eprintln!(
                "{} missing {}",
                "Cannot build payload:".bright_yellow(),
                missing.join(", ")
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_schemas() {
    for schema in SchemaRegistry::all() {
        println!(
            "{} {}",
            schema.name.bright_white(),
            format!("({} fields)", schema.fields.len()).dimmed()
        );
    }
}
