//! ganttgen CLI - presentation-ready Gantt charts
//!
//! Command-line interface for converting JSON or spreadsheet schedules into
//! standalone HTML charts, with optional transparent PNG export.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ganttgen_core::{presets, Project, Renderer};
use ganttgen_host::{generate, Config, ProgressUpdate};
use ganttgen_parser::Normalizer;
use ganttgen_render::WorkbookWriter;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ganttgen")]
#[command(author, version, about = "Gantt charts from JSON or spreadsheets", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a schedule into an HTML chart
    Convert {
        /// Input file (.json, .xlsx or .xls)
        #[arg(short, long, value_name = "FILE")]
        input: String,

        /// Output HTML path (derived from the input name if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<String>,

        /// Palette preset overriding the input's palette
        #[arg(short, long, value_name = "PRESET")]
        palette: Option<String>,

        /// Also export a transparent PNG
        #[arg(long, overrides_with = "no_png")]
        png: bool,

        /// Skip PNG export even if the config enables it
        #[arg(long, overrides_with = "png")]
        no_png: bool,

        /// Directory for derived output paths
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Do not write the JSON snapshot next to the chart
        #[arg(long)]
        no_snapshot: bool,

        /// Replacement HTML template containing {{CONFIG}}
        #[arg(long, value_name = "FILE")]
        template: Option<PathBuf>,

        /// Config file
        #[arg(long, value_name = "FILE", env = "GANTTGEN_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the normalized project as JSON
    Parse {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Palette preset to apply
        #[arg(short, long, value_name = "PRESET")]
        palette: Option<String>,
    },

    /// List the built-in palette presets
    Palettes {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },

    /// Write a project into an editable workbook
    ToExcel {
        /// Input file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output .xlsx path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Palette preset to apply
        #[arg(short, long, value_name = "PRESET")]
        palette: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ListFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            palette,
            png,
            no_png,
            output_dir,
            no_snapshot,
            template,
            config,
        } => {
            let config = Config::discover(config.as_deref())?;
            let mut options = config.generate_options(input);
            options.output_path = output;
            if palette.is_some() {
                options.palette = palette;
            }
            if png {
                options.export_png = true;
            } else if no_png {
                options.export_png = false;
            }
            if let Some(dir) = output_dir {
                options.output_dir = dir;
            }
            if no_snapshot {
                options.snapshot = false;
            }
            if template.is_some() {
                options.template = template;
            }
            debug!(?options, "Convert options");

            let result = generate(&options, &mut |update: ProgressUpdate| {
                debug!(stage = ?update.stage, progress = update.progress, "Progress");
            })?;

            for warning in &result.warnings {
                eprintln!("Warning: {}", warning);
            }
            println!("Generated HTML: {}", result.html_path.display());
            if let Some(png) = &result.png_path {
                println!("Generated PNG: {}", png.display());
            }
        }
        Commands::Parse { file, palette } => {
            let project = load(&file, palette.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        Commands::Palettes { format } => match format {
            ListFormat::Text => {
                for preset in presets() {
                    println!("{:<14} {}", preset.id, preset.name);
                    println!("{:<14} {}", "", preset.colors.join(" "));
                }
            }
            ListFormat::Json => println!("{}", serde_json::to_string_pretty(presets())?),
        },
        Commands::ToExcel {
            input,
            output,
            palette,
        } => {
            let project = load(&input, palette.as_deref())?;
            let bytes = WorkbookWriter::new().render(&project)?;
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(&output, bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Generated workbook: {}", output.display());
        }
    }

    Ok(())
}

/// Parse and normalize one input, reporting warnings on stderr
fn load(path: &Path, palette: Option<&str>) -> Result<Project> {
    let mut normalizer = Normalizer::new(rand::rng()).preset(palette);
    let project = normalizer.parse_file(path)?;
    for warning in normalizer.warnings() {
        eprintln!("Warning: {}", warning);
    }
    Ok(project)
}
