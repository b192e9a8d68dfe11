//! Voxmill CLI - post-processing for synthesized speech
//!
//! This binary provides commands for watermarking, effect processing,
//! voice mixing, and batch rendering of WAV audio.

use clap::{ArgAction, Parser, Subcommand};
use std::path::Path;
use std::process::ExitCode;

use voxmill_cli::commands;
use voxmill_cli::commands::watermark::EmbedArgs;
use voxmill_cli::logging;
use voxmill_spec::EngineConfig;

/// Voxmill - Speech Post-Processing Engine
#[derive(Parser)]
#[command(name = "voxmill")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Engine config file (default: <config_dir>/voxmill/config.json)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed or read ownership watermarks
    Watermark {
        #[command(subcommand)]
        command: WatermarkCommands,
    },

    /// Run a WAV file through an effect chain
    Fx {
        /// Input WAV file
        #[arg(short, long)]
        input: String,

        /// Output WAV file
        #[arg(short, long)]
        output: String,

        /// JSON file with an array of effects
        #[arg(short, long)]
        effects: String,
    },

    /// Mix two voices into one file
    Mix {
        /// Primary voice WAV
        #[arg(long)]
        primary: String,

        /// Secondary voice WAV
        #[arg(long)]
        secondary: String,

        /// Output WAV file
        #[arg(short, long)]
        output: String,

        /// Mix mode (blend, morph, alternate, layered)
        #[arg(long, default_value = "blend", value_parser = ["blend", "morph", "alternate", "layered"])]
        mode: String,

        /// Share of the secondary voice, 0-100
        #[arg(long, default_value_t = 50.0)]
        ratio: f64,

        /// Fade length (morph) or switch period (alternate) in seconds
        #[arg(long, default_value_t = 0.0)]
        crossfade: f64,
    },

    /// Render a batch request with pre-recorded voice clips
    Batch {
        /// Batch request JSON file
        #[arg(short, long)]
        request: String,

        /// Directory of <voice_id>.wav clips
        #[arg(long)]
        voices: String,

        /// Output directory for artifacts and the job report
        #[arg(long)]
        out_dir: String,

        /// Output the job report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a batch request without rendering
    Validate {
        /// Batch request JSON file
        #[arg(short, long)]
        request: String,

        /// Budget profile (default, strict)
        #[arg(long)]
        budget: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WatermarkCommands {
    /// Embed a payload into a WAV file
    Embed {
        /// Input WAV file
        #[arg(short, long)]
        input: String,

        /// Output WAV file
        #[arg(short, long)]
        output: String,

        /// Text to embed
        #[arg(short, long)]
        payload: String,

        /// Method (spectral, temporal, echo, lsb)
        #[arg(short, long)]
        method: Option<String>,

        /// Strength, 0-100
        #[arg(short, long)]
        strength: Option<f64>,

        /// Extra text bound into the payload checksum
        #[arg(long)]
        auxiliary: Option<String>,
    },

    /// Read a payload back from a WAV file
    Extract {
        /// Input WAV file
        #[arg(short, long)]
        input: String,

        /// Method (spectral, lsb)
        #[arg(short, long)]
        method: Option<String>,

        /// Output the extraction result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn dispatch(command: Commands, config: &EngineConfig) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Watermark { command } => match command {
            WatermarkCommands::Embed {
                input,
                output,
                payload,
                method,
                strength,
                auxiliary,
            } => {
                let args = EmbedArgs {
                    method: method.as_deref(),
                    strength,
                    auxiliary: auxiliary.as_deref(),
                };
                commands::watermark::embed(&input, &output, &payload, &args, config)
            }
            WatermarkCommands::Extract {
                input,
                method,
                json,
            } => commands::watermark::extract(&input, method.as_deref(), json, config),
        },
        Commands::Fx {
            input,
            output,
            effects,
        } => commands::fx::run(&input, &output, &effects),
        Commands::Mix {
            primary,
            secondary,
            output,
            mode,
            ratio,
            crossfade,
        } => {
            let spec = commands::mix::mix_spec(&mode, ratio, crossfade)?;
            commands::mix::run(&primary, &secondary, &output, &spec)
        }
        Commands::Batch {
            request,
            voices,
            out_dir,
            json,
        } => commands::batch::run(&request, &voices, &out_dir, json, config),
        Commands::Validate {
            request,
            budget,
            json,
        } => commands::validate::run(&request, budget.as_deref(), json, config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = EngineConfig::load(cli.config.as_deref().map(Path::new))
        .map_err(anyhow::Error::from)
        .and_then(|config| dispatch(cli.command, &config));

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
