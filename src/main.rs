use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use ingest_decoder::{
    read_document, render, translate_document, DecodeError, OutputFormat, TranslateConfig,
};

#[derive(Parser)]
#[command(name = "ingest-decoder")]
#[command(about = "Translate an ingest pipeline into a normalization decoder")]
#[command(version)]
struct Args {
    /// Pipeline definition (YAML or JSON)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output_file: Option<PathBuf>,

    /// Output format
    #[arg(short = 'F', long = "format", value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// YAML file overriding translation settings
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Debug mode - log translation details to stderr
    #[arg(long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(&args) {
        report(&e);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => TranslateConfig::from_file(path)?,
        None => TranslateConfig::default(),
    };

    tracing::debug!(input = %args.input.display(), "reading pipeline");
    let document = read_document(&args.input)?;
    let decoder = translate_document(&document, &config)?;
    let rendered = render(&decoder, args.format)?;

    // Nothing is written until the whole document translated cleanly
    match &args.output_file {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write output file '{}'", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn report(error: &anyhow::Error) {
    match error.downcast_ref::<DecodeError>() {
        Some(DecodeError::Processor(failure)) => {
            eprintln!("{:?}", error);
            eprintln!("Exception processing operation: {}", failure.operation);
            eprintln!("{}", failure.dump());
        }
        _ => eprintln!("Error: {:#}", error),
    }
}
