use crate::audio::{FfmpegTranscoder, Transcoder};
use crate::config::Config;
use crate::error::Result;
use crate::library::OutputLibrary;
use crate::naming::{normalize_filename, NormalizeOutcome};
use crate::report::{ProblemKind, ProblemReport};
use crate::source::{video_id, Downloader, YtDlpDownloader};
use crate::translate::{create_translator, Translator};
use crate::workspace::{audio_target, purge, relocate, WorkingArea};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Configuration for the batch pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Transient directory for downloads and transcodes.
    pub work_dir: PathBuf,
    /// Persistent directory for finished audio files.
    pub output_dir: PathBuf,
    /// Language non-ASCII filenames are translated into.
    pub target_language: String,
    /// Show spinners while external tools run.
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("temp"),
            output_dir: PathBuf::from("output"),
            target_language: "en".to_string(),
            show_progress: true,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            work_dir: config.work_dir.clone(),
            output_dir: config.output_dir.clone(),
            target_language: config.target_language.clone(),
            show_progress: config.show_progress,
        }
    }
}

/// Statistics from one batch run.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    pub urls_requested: usize,
    /// URLs processing was started for (an interrupt leaves the rest untouched).
    pub urls_attempted: usize,
    /// Audio files moved into the output directory.
    pub outputs_created: usize,
    pub total_time: Duration,
}

#[derive(Debug)]
pub struct PipelineResult {
    pub report: ProblemReport,
    pub stats: PipelineStats,
}

/// Mutable state for one call to [`Pipeline::run`].
#[derive(Default)]
struct RunState {
    report: ProblemReport,
    /// Audio files that failed to move; kept for manual recovery and skipped by later passes.
    retained: HashSet<PathBuf>,
    /// Partial outputs of failed conversions; never relocated, still cleaned up.
    discarded: HashSet<PathBuf>,
    outputs_created: usize,
}

/// Removes one working file during cleanup.
pub type Remover = Box<dyn Fn(&Path) -> io::Result<()> + Send + Sync>;

/// Sequential download → rename → transcode → relocate → cleanup pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    library: OutputLibrary,
    workspace: WorkingArea,
    downloader: Box<dyn Downloader>,
    translator: Box<dyn Translator>,
    transcoder: Box<dyn Transcoder>,
    remover: Remover,
    cancelled: Arc<AtomicBool>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        downloader: Box<dyn Downloader>,
        translator: Box<dyn Translator>,
        transcoder: Box<dyn Transcoder>,
    ) -> Self {
        Self {
            library: OutputLibrary::new(config.output_dir.clone()),
            workspace: WorkingArea::new(config.work_dir.clone()),
            config,
            downloader,
            translator,
            transcoder,
            remover: Box::new(purge),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Build a pipeline with yt-dlp, ffmpeg and the configured translator.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            PipelineConfig::from(config),
            Box::new(YtDlpDownloader::new(config.ytdlp_path.clone())),
            create_translator(config)?,
            Box::new(FfmpegTranscoder::new(config.ffmpeg_path.clone())),
        ))
    }

    /// Share a flag that stops the batch before the next URL once set.
    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    /// Replace how cleanup deletes working files.
    pub fn with_remover<F>(mut self, remover: F) -> Self
    where
        F: Fn(&Path) -> io::Result<()> + Send + Sync + 'static,
    {
        self.remover = Box::new(remover);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Create the working and output directories if they are missing.
    pub fn prepare_dirs(&self) -> Result<()> {
        for (label, dir) in [
            ("working", &self.config.work_dir),
            ("output", &self.config.output_dir),
        ] {
            if !dir.exists() {
                info!(
                    "The {} directory {} does not exist, creating it now",
                    label,
                    dir.display()
                );
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }

    /// Process every URL in order. Never fails: problems end up in the report.
    pub async fn run(&self, urls: &[String]) -> PipelineResult {
        let start_time = Instant::now();
        let mut state = RunState::default();
        let mut attempted = 0;

        for (index, url) in urls.iter().enumerate() {
            if self.cancelled.load(Ordering::Relaxed) {
                warn!("Interrupted, {} URL(s) not attempted", urls.len() - index);
                for skipped in &urls[index..] {
                    state.report.record(
                        ProblemKind::Abandoned,
                        skipped,
                        Some("batch interrupted".to_string()),
                    );
                }
                break;
            }

            attempted += 1;
            info!("[{}/{}] Attempting process on {}", index + 1, urls.len(), url);
            self.process_url(url, &mut state).await;
        }

        PipelineResult {
            stats: PipelineStats {
                urls_requested: urls.len(),
                urls_attempted: attempted,
                outputs_created: state.outputs_created,
                total_time: start_time.elapsed(),
            },
            report: state.report,
        }
    }

    async fn process_url(&self, url: &str, state: &mut RunState) {
        let id = match video_id(url) {
            Ok(id) => id,
            Err(e) => {
                warn!("Skipping {}: {}", url, e);
                state.report.record(ProblemKind::Abandoned, url, Some(e.to_string()));
                return;
            }
        };

        match self.library.contains_id(&id) {
            Ok(false) => {}
            Ok(true) => {
                info!(
                    "Skipping {} since an output file already exists for {}",
                    url, id
                );
                state.report.record(ProblemKind::Skipped, url, None);
                return;
            }
            Err(e) => {
                warn!("Could not read the output directory: {}", e);
                state.report.record(
                    ProblemKind::Abandoned,
                    url,
                    Some(format!("Could not read the output directory: {}", e)),
                );
                return;
            }
        }

        if let Err(e) = self.acquire(url).await {
            warn!("Download of {} failed: {}", url, e);
            state.report.record(ProblemKind::Abandoned, url, Some(e.to_string()));
            return;
        }

        let records_before = state.report.len();
        let outputs_before = state.outputs_created;

        self.normalize_pass(url, state).await;
        self.transcode_pass(url, state).await;
        self.relocate_pass(url, state);
        let removed = self.cleanup_pass(url, state);

        // Nothing produced and nothing recorded: the download was unusable.
        if state.outputs_created == outputs_before && state.report.len() == records_before {
            let names = if removed.is_empty() {
                "none".to_string()
            } else {
                removed.join(", ")
            };
            warn!("{} produced no convertible file", url);
            state.report.record(
                ProblemKind::Abandoned,
                url,
                Some(format!(
                    "no convertible file in the working directory: {}",
                    names
                )),
            );
        }

        info!("Finished handling {}", url);
    }

    async fn acquire(&self, url: &str) -> Result<()> {
        info!("Downloading {} with {}", url, self.downloader.name());
        let spinner = self.spinner(format!("Downloading {}", url));
        let result = self
            .downloader
            .download(url, self.workspace.dir())
            .await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        result
    }

    async fn normalize_pass(&self, url: &str, state: &mut RunState) {
        let files = self.list(url, state, ProblemKind::Rename, WorkingArea::video_files);
        for file in files {
            match normalize_filename(&file, self.translator.as_ref(), &self.config.target_language)
                .await
            {
                NormalizeOutcome::Unchanged => {
                    debug!("{} needs no translation", file.display());
                }
                NormalizeOutcome::Renamed { to, .. } => {
                    info!("Renamed to {}", to.display());
                }
                // Logged by the normalizer; the file keeps its name and stays usable.
                NormalizeOutcome::TranslationFailed(_) => {}
                NormalizeOutcome::RenameFailed { target, error } => {
                    warn!("Could not rename {}: {}", file.display(), error);
                    state.report.record(
                        ProblemKind::Rename,
                        url,
                        Some(format!(
                            "{} -> {}: {}",
                            file_name(&file),
                            file_name(&target),
                            error
                        )),
                    );
                }
            }
        }
    }

    async fn transcode_pass(&self, url: &str, state: &mut RunState) {
        let files = self.list(url, state, ProblemKind::Transcode, WorkingArea::video_files);
        for video in files {
            let target = audio_target(&video);
            let target_name = file_name(&target);

            // The output may have appeared since the identifier check.
            if self.library.contains_file(&target_name) {
                info!(
                    "Skipping conversion of {} since {} already exists in the output directory",
                    file_name(&video),
                    target_name
                );
                state.report.record(
                    ProblemKind::Skipped,
                    url,
                    Some(format!("{} already exists in the output directory", target_name)),
                );
                continue;
            }

            info!("Converting {} to mp3", file_name(&video));
            let spinner = self.spinner(format!("Converting {}", file_name(&video)));
            let existed = target.exists();
            let result = self.transcoder.transcode(&video, &target).await;
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }

            if let Err(e) = result {
                warn!("Conversion of {} failed: {}", file_name(&video), e);
                if !existed && target.exists() {
                    debug!("Removing partial output {}", target.display());
                    if let Err(remove_err) = fs::remove_file(&target) {
                        warn!("Could not remove partial output: {}", remove_err);
                        state.discarded.insert(target.clone());
                    }
                }
                state.report.record(
                    ProblemKind::Transcode,
                    url,
                    Some(format!("{}: {}", file_name(&video), e)),
                );
            }
        }
    }

    fn relocate_pass(&self, url: &str, state: &mut RunState) {
        let files = self.list(url, state, ProblemKind::Move, WorkingArea::audio_files);
        for audio in files {
            if state.discarded.contains(&audio) {
                continue;
            }
            info!("Moving {} to the output directory", file_name(&audio));
            match relocate(&audio, self.library.dir()) {
                Ok(dest) => {
                    state.outputs_created += 1;
                    info!("Finished moving to {}", dest.display());
                }
                Err(e) => {
                    warn!("Could not move {}: {}", file_name(&audio), e);
                    state.report.record(
                        ProblemKind::Move,
                        url,
                        Some(format!(
                            "{}: {} (left at {})",
                            file_name(&audio),
                            e,
                            audio.display()
                        )),
                    );
                    state.retained.insert(audio);
                }
            }
        }
    }

    /// Returns the names of the files it attempted to remove.
    fn cleanup_pass(&self, url: &str, state: &mut RunState) -> Vec<String> {
        let files = self.list(url, state, ProblemKind::Delete, WorkingArea::artifacts);
        let mut removed = Vec::with_capacity(files.len());
        for file in files {
            debug!("Removing {} from the working directory", file.display());
            removed.push(file_name(&file));
            if let Err(e) = (self.remover)(&file) {
                warn!("Could not delete {}: {}", file.display(), e);
                state.report.record(
                    ProblemKind::Delete,
                    url,
                    Some(format!("{}: {}", file_name(&file), e)),
                );
            }
        }
        removed
    }

    /// List working files for a pass, leaving out retained files.
    ///
    /// A listing failure is recorded under the pass's category and yields no files.
    fn list(
        &self,
        url: &str,
        state: &mut RunState,
        kind: ProblemKind,
        select: fn(&WorkingArea) -> io::Result<Vec<PathBuf>>,
    ) -> Vec<PathBuf> {
        match select(&self.workspace) {
            Ok(files) => files
                .into_iter()
                .filter(|f| !state.retained.contains(f))
                .collect(),
            Err(e) => {
                warn!("Could not list the working directory: {}", e);
                state.report.record(
                    kind,
                    url,
                    Some(format!("Could not list the working directory: {}", e)),
                );
                Vec::new()
            }
        }
    }

    fn spinner(&self, message: String) -> Option<ProgressBar> {
        if !self.config.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Print the run statistics followed by the problem report.
pub fn print_summary(result: &PipelineResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                        Batch Complete                          ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!(
        "  URLs:       {} of {} attempted",
        result.stats.urls_attempted, result.stats.urls_requested
    );
    println!("  Converted:  {}", result.stats.outputs_created);
    println!("  Problems:   {}", result.report.len());
    println!(
        "  Total:      {:.2}s",
        result.stats.total_time.as_secs_f64()
    );
    println!();

    if result.report.is_empty() {
        println!("  {} No problems occurred", style("✓").green());
    } else {
        println!("{}", style("Problems").bold().yellow());
        println!();
        print!("{}", result.report.render());
    }
    println!("═══════════════════════════════════════════════════════════════");
}
