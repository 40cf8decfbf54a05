use anyhow::{Context, Result};
use clap::Parser;
use console::Term;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tunefetch::audio::FfmpegTranscoder;
use tunefetch::source::YtDlpDownloader;
use tunefetch::{print_summary, Config, Pipeline};

#[derive(Parser)]
#[command(name = "tunefetch")]
#[command(version, about = "Download media URLs and convert them to mp3")]
#[command(long_about = "Download each URL with yt-dlp, translate non-ASCII titles, convert to mp3 \
with trailing silence removed, and collect the results in the output directory.")]
struct Cli {
    /// Video URLs to process, in order
    urls: Vec<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Print the exit prompt to `out` and consume one line from `input`.
fn acknowledge(out: &mut impl Write, input: &mut impl BufRead) -> io::Result<()> {
    writeln!(out, "Press enter to exit")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

/// Block until Enter is pressed, when attached to a terminal.
fn wait_for_acknowledgment() {
    let mut term = Term::stdout();
    if !term.is_term() {
        return;
    }
    if let Err(e) = acknowledge(&mut term, &mut io::stdin().lock()) {
        debug!("Exit acknowledgment failed: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    if let Err(e) = YtDlpDownloader::new(config.ytdlp_path.clone())
        .check_available()
        .await
    {
        warn!("{}", e);
    }
    if let Err(e) = FfmpegTranscoder::new(config.ffmpeg_path.clone())
        .check_available()
        .await
    {
        warn!("{}", e);
    }

    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = cancelled.clone();
        ctrlc::set_handler(move || {
            cancelled.store(true, Ordering::Relaxed);
        })
        .context("Failed to install Ctrl+C handler")?;
    }

    let pipeline = Pipeline::from_config(&config)
        .context("Failed to set up the pipeline")?
        .with_cancel_flag(cancelled);
    pipeline
        .prepare_dirs()
        .context("Failed to create the working or output directory")?;

    info!("Working:    {}", config.work_dir.display());
    info!("Output:     {}", config.output_dir.display());
    info!("Translator: {}", config.translator);
    info!("URLs:       {}", cli.urls.len());

    let result = pipeline.run(&cli.urls).await;
    print_summary(&result);

    wait_for_acknowledgment();

    Ok(())
}
