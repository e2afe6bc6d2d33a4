mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::PipelineArgs;

#[derive(Parser)]
#[command(
    name = "timeverify",
    version,
    about = "Extract timesheet entries from screenshots and reconcile reported hours"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    ocr: OcrArgs,

    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct OcrArgs {
    /// Tesseract executable
    #[arg(
        long,
        global = true,
        env = "TIMEVERIFY_TESSERACT_CMD",
        default_value = "tesseract",
        value_name = "PATH"
    )]
    tesseract_cmd: PathBuf,

    /// Tesseract language pack(s), e.g. "eng" or "eng+deu"
    #[arg(long, global = true, env = "TIMEVERIFY_OCR_LANG", default_value = "eng")]
    lang: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse OCR text (one screenshot's worth) into timesheet entries
    Parse {
        /// Path to a plain-text file with OCR output
        text_file: PathBuf,

        /// Employee name attached to every entry
        #[arg(short, long)]
        name: String,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// OCR a Word document or screenshot and reconcile its hours
    Process {
        /// Path to a .docx file or an image
        input_file: PathBuf,

        /// Employee name (default: derived from the file name)
        #[arg(short, long)]
        name: Option<String>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Process several documents and summarize discrepancies
    Batch {
        /// Paths to .docx files or images
        #[arg(required = true)]
        input_files: Vec<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Reconcile previously extracted entries (JSON) against reference hours
    Reconcile {
        /// JSON file with an array of entries
        entries_file: PathBuf,

        /// Employee name (default: the name on the first entry)
        #[arg(short, long)]
        name: Option<String>,

        /// Reference table (JSON or XLSX); the built-in demo table if omitted
        #[arg(short, long, value_name = "FILE")]
        reference: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect reference tables
    Reference {
        #[command(subcommand)]
        action: ReferenceAction,
    },
}

#[derive(Subcommand)]
enum ReferenceAction {
    /// List the employees of a reference table
    List {
        /// Reference table (JSON or XLSX); the built-in demo table if omitted
        #[arg(short, long, value_name = "FILE")]
        reference: Option<PathBuf>,
    },
    /// Validate a reference table file
    Validate {
        /// Path to a JSON or XLSX reference table
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ocr_config = timeverify_core::config::OcrConfig {
        command: cli.ocr.tesseract_cmd,
        language: cli.ocr.lang,
        ..Default::default()
    };

    let result = match cli.command {
        Commands::Parse {
            text_file,
            name,
            output,
        } => commands::parse::run(text_file, &name, &output, cli.verbose),
        Commands::Process {
            input_file,
            name,
            pipeline,
        } => commands::process::run(input_file, name, &pipeline, ocr_config, cli.verbose),
        Commands::Batch {
            input_files,
            pipeline,
        } => commands::batch::run(input_files, &pipeline, ocr_config, cli.verbose),
        Commands::Reconcile {
            entries_file,
            name,
            reference,
            output,
        } => commands::reconcile::run(entries_file, name, reference, &output),
        Commands::Reference { action } => match action {
            ReferenceAction::List { reference } => commands::reference::list(reference),
            ReferenceAction::Validate { file } => commands::reference::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
