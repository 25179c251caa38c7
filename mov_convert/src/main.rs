use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};

use mov_convert::{
    default_locator, BatchRunner, ConsoleReporter, ConversionSession, ConvertConfig, ConvertError,
    FfmpegRunner,
};
use shared_utils::logging::{init_logging, LogConfig};

#[derive(Parser)]
#[command(name = "mov-convert")]
#[command(version, about = "Batch re-wrap MP4 files into MOV (video copied, 24-bit PCM audio)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every .mp4 among the inputs (folders are searched recursively)
    Run {
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,
        /// Output folder name [default: Converted_<YYYY-MM-DD>]
        #[arg(short, long, value_name = "NAME")]
        output: Option<String>,
        /// ffmpeg executable [env: MOV_CONVERT_FFMPEG]
        #[arg(long, value_name = "PATH")]
        ffmpeg: Option<PathBuf>,
        /// Per-file time limit in seconds, 0 for none [env: MOV_CONVERT_TIMEOUT_SECS]
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the files a run would convert, without converting
    Scan {
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            inputs,
            output,
            ffmpeg,
            timeout,
            json,
            verbose,
        } => {
            let config = ConvertConfig::from_env()
                .with_output_name(output)
                .with_ffmpeg_path(ffmpeg)
                .with_timeout_secs(timeout)
                .with_json(json)
                .with_verbose(verbose);

            let level = if config.verbose { Level::DEBUG } else { Level::INFO };
            let _ = init_logging("mov_convert", LogConfig::default().with_level(level));

            let clean = run(&inputs, &config)?;
            if !clean {
                std::process::exit(1);
            }
        }

        Commands::Scan { inputs } => {
            let _ = init_logging("mov_convert", LogConfig::default());

            let mut session = ConversionSession::new();
            for input in &inputs {
                session.add(input);
            }
            for path in session.files().iter() {
                println!("{}", path.display());
            }
            info!(files = session.files().len(), "Scan complete");
        }
    }

    Ok(())
}

/// Returns whether every file was converted.
fn run(inputs: &[PathBuf], config: &ConvertConfig) -> anyhow::Result<bool> {
    let mut session = ConversionSession::new();
    for input in inputs {
        let added = session.add(input);
        if added == 0 {
            info!(input = %input.display(), "No new .mp4 files");
        }
    }
    session.set_output_name(config.output_name.clone());

    let locator = default_locator(config.ffmpeg_path.as_deref());
    let converter = FfmpegRunner::new().with_timeout(config.job_timeout);
    let mut runner = BatchRunner::new(locator.as_ref(), &converter);

    info!(
        timeout_secs = converter.timeout().map(|t| t.as_secs()),
        "🎬 MOV Conversion (video: copy, audio: pcm_s24le)"
    );
    let today = chrono::Local::now().date_naive();
    let mut reporter = ConsoleReporter::new("🎞️ ");
    let outcome = session.convert(&mut runner, &mut reporter, today);
    reporter.finish();

    let summary = match outcome {
        Ok(summary) => summary,
        Err(ConvertError::EmptyBatch) => {
            eprintln!("❌ {}", ConvertError::EmptyBatch);
            return Ok(false);
        }
        Err(e) => return Err(e).context("Conversion batch could not start"),
    };

    if config.json {
        let text =
            serde_json::to_string_pretty(&summary).context("Failed to serialize batch summary")?;
        println!("{}", text);
    } else {
        shared_utils::report::print_summary_report(
            &summary.result,
            &summary.output_dir,
            summary.elapsed,
            "MOV Conversion",
        );
        shared_utils::report::print_simple_summary(&summary.result, &summary.output_dir);
        if let Some(hint) = summary.result.failures.iter().find_map(|(_, f)| f.hint()) {
            eprintln!("💡 {}", hint);
        }
    }
    info!(clean = summary.is_clean(), "{}", summary.headline());

    Ok(summary.is_clean())
}
