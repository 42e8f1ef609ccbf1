//! CLI entry point for quire

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quire::config::SiteConfig;
use quire::{BuildOptions, Site};

#[derive(Parser)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "Build a static blog from Markdown files with YAML front matter", long_about = None)]
struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every document in SOURCE_DIR into OUTPUT_DIR
    #[command(alias = "b")]
    Build {
        source_dir: PathBuf,
        output_dir: PathBuf,

        /// Keep building after a document fails
        #[arg(long)]
        continue_on_error: bool,

        /// Layout directory (defaults to SOURCE_DIR/_layouts)
        #[arg(long)]
        layouts: Option<PathBuf>,

        /// Configuration file (defaults to SOURCE_DIR/_config.yml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Delete OUTPUT_DIR before building
        #[arg(long)]
        clean: bool,
    },

    /// List documents in date order
    List {
        source_dir: PathBuf,

        /// Only documents with this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Create a new document
    New {
        source_dir: PathBuf,

        /// Title of the new document
        title: String,

        /// Layout to use
        #[arg(short, long)]
        layout: Option<String>,

        /// Comma separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Delete the output directory
    Clean { output_dir: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "quire=debug,info"
    } else {
        "quire=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Build {
            source_dir,
            output_dir,
            continue_on_error,
            layouts,
            config,
            clean,
        } => {
            let mut site = match config {
                Some(path) => Site::with_config(SiteConfig::load(&path)?, &source_dir, &output_dir),
                None => Site::new(&source_dir, &output_dir)?,
            };
            if let Some(dir) = layouts {
                site = site.with_layout_dir(dir);
            }
            tracing::info!("Building {:?} into {:?}", site.source_dir, site.output_dir);
            let options = BuildOptions { continue_on_error };
            let report = quire::commands::build::execute(&site, options, clean)?;

            let code = quire::commands::build::print_report(
                &report,
                options,
                &mut std::io::stdout().lock(),
                &mut std::io::stderr().lock(),
            )?;
            Ok(ExitCode::from(code))
        }

        Commands::List {
            source_dir,
            tag,
            json,
        } => {
            let site = Site::new(&source_dir, source_dir.join("public"))?;
            let stdout = std::io::stdout();
            quire::commands::list::run(&site, tag.as_deref(), json, &mut stdout.lock())?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::New {
            source_dir,
            title,
            layout,
            tags,
        } => {
            let site = Site::new(&source_dir, source_dir.join("public"))?;
            let path = quire::commands::new::run(&site, &title, layout.as_deref(), &tags)?;
            println!("Created: {}", path.display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Clean { output_dir } => {
            quire::commands::clean::run(&output_dir)?;
            println!("Cleaned successfully!");
            Ok(ExitCode::SUCCESS)
        }
    }
}
