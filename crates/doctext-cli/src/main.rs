mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "doctext",
    version,
    about = "Extract plain text from documents, with OCR fallback"
)]
struct Cli {
    /// Log each extraction stage (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a PDF, DOCX, CSV, XLSX, image or any other file
    Extract {
        /// Path to the file
        input_file: PathBuf,

        /// File name to classify by, if different from the path (e.g. an upload name)
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        output: String,

        /// Report which stage produced the text (on stderr)
        #[arg(long)]
        source: bool,
    },
    /// Show the OCR configuration read from the environment
    Config,
}

fn main() {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            input_file,
            name,
            output,
            source,
        } => commands::extract::run(input_file, name, &output, source),
        Commands::Config => commands::config::show(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "doctext_core=info,doctext=info"
    } else {
        "doctext_core=warn,doctext=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
