//! Batch orchestration: resolve → gate → per-file pipeline.
//!
//! Each accepted file goes through five stages, strictly in order:
//!
//! ```text
//! decode → select crop → extract region → resize (Lanczos3) → encode
//! ```
//!
//! ## Fail-Fast
//!
//! The first error at any stage aborts the batch. Files after it are never
//! started, and the error is returned with the path and stage it came from.
//! Outputs already written stay on disk; there is no rollback.
//!
//! ## Parallel Processing
//!
//! With `processing.max_processes > 1` files run on a dedicated
//! [rayon](https://docs.rs/rayon) pool. Fail-fast still holds: once any file
//! fails, workers stop picking up new files, files already in flight finish,
//! and the failure with the lowest input position is reported. Results and
//! the summary are always in input order.
//!
//! ## Testing
//!
//! [`process_with_backend`] takes the codec backend and the crop analyzer as
//! parameters, so the whole orchestration can run against the recording
//! `MockBackend` without touching image files.

use crate::config::{self, ConfigError, CropperConfig};
use crate::format::{self, ImageKind};
use crate::imaging::{
    AnalysisError, BackendError, CropAnalyzer, CropRect, EncodeParams, ImageBackend, Quality,
    RustBackend, TransformError, analyzer_for, select_crop, transform,
};
use crate::naming::output_path;
use crate::resolve::{ResolveError, resolve_paths};
use crate::types::{FileTask, TargetSize};
use image::GenericImageView;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("decode failed for {}: {source}", path.display())]
    Decode { path: PathBuf, source: BackendError },
    #[error("analysis failed for {}: {source}", path.display())]
    Analysis { path: PathBuf, source: AnalysisError },
    #[error("transform failed for {}: {source}", path.display())]
    Transform {
        path: PathBuf,
        source: TransformError,
    },
    #[error("write failed for {}: {source}", path.display())]
    Write { path: PathBuf, source: BackendError },
    #[error("cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ProcessError {
    /// The file the error belongs to, if it is a per-file failure.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ProcessError::Decode { path, .. }
            | ProcessError::Analysis { path, .. }
            | ProcessError::Transform { path, .. }
            | ProcessError::Write { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Per-run settings, resolved once from config before any file is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOptions {
    pub target: TargetSize,
    /// Size descriptor used in output names, e.g. `580x434`.
    pub descriptor: String,
    pub allow_upscale: bool,
    pub jpeg_quality: Quality,
    /// Worker count; 1 means sequential.
    pub threads: usize,
}

impl ProcessOptions {
    pub fn new(target: TargetSize) -> Self {
        Self {
            target,
            descriptor: target.to_string(),
            allow_upscale: false,
            jpeg_quality: Quality::default(),
            threads: 1,
        }
    }

    /// Validate `config` and derive the options from it.
    pub fn from_config(config: &CropperConfig) -> Result<Self, ConfigError> {
        let target = config.validate()?;
        Ok(Self {
            descriptor: config.size.clone(),
            allow_upscale: config.analysis.allow_upscale,
            jpeg_quality: Quality::new(config.encoding.jpeg_quality),
            threads: config::effective_threads(&config.processing),
            ..Self::new(target)
        })
    }

    fn encode_params(&self, output: PathBuf, kind: ImageKind) -> EncodeParams {
        EncodeParams {
            output,
            kind,
            quality: self.jpeg_quality,
        }
    }
}

/// One successfully written output.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenImage {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Decoded source dimensions (width, height).
    pub source_dims: (u32, u32),
    pub crop: CropRect,
}

/// Progress events, sent as work happens.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    /// A file passed the format gate and its output was written.
    /// `index` is the 1-based position among accepted files.
    ImageWritten { index: usize, image: WrittenImage },
    /// A resolved path was not a supported image.
    Skipped { path: PathBuf },
}

#[derive(Debug, Default)]
pub struct ProcessSummary {
    /// Outputs in input order.
    pub written: Vec<WrittenImage>,
    pub skipped: usize,
}

/// Run the whole pipeline for one file.
pub fn process_file<B, A>(
    backend: &B,
    analyzer: &A,
    task: &FileTask,
    options: &ProcessOptions,
) -> Result<WrittenImage, ProcessError>
where
    B: ImageBackend + ?Sized,
    A: CropAnalyzer + ?Sized,
{
    let path = task.path();
    let _span = tracing::debug_span!("file", path = %path.display()).entered();

    let image = backend.decode(path).map_err(|source| ProcessError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let source_dims = image.dimensions();
    tracing::debug!(width = source_dims.0, height = source_dims.1, "decoded");

    let crop = select_crop(analyzer, &image, options.target, options.allow_upscale).map_err(
        |source| ProcessError::Analysis {
            path: path.to_path_buf(),
            source,
        },
    )?;
    tracing::debug!(%crop, "crop selected");

    let resized =
        transform(&image, crop, options.target).map_err(|source| ProcessError::Transform {
            path: path.to_path_buf(),
            source,
        })?;
    drop(image);

    let output = output_path(path, &options.descriptor);
    backend
        .encode(&resized, &options.encode_params(output.clone(), task.kind))
        .map_err(|source| ProcessError::Write {
            path: output.clone(),
            source,
        })?;
    tracing::info!(output = %output.display(), "written");

    Ok(WrittenImage {
        source: path.to_path_buf(),
        output,
        source_dims,
        crop,
    })
}

/// Process `tasks` in order with the given backend and analyzer.
///
/// Sequential when `options.threads <= 1`; otherwise see the module docs
/// for the parallel fail-fast contract.
pub fn process_with_backend<B, A>(
    backend: &B,
    analyzer: &A,
    tasks: &[FileTask],
    options: &ProcessOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<Vec<WrittenImage>, ProcessError>
where
    B: ImageBackend + ?Sized,
    A: CropAnalyzer + ?Sized,
{
    warn_duplicate_outputs(tasks, &options.descriptor);

    let notify = |index: usize, image: &WrittenImage| {
        if let Some(tx) = &events {
            tx.send(ProcessEvent::ImageWritten {
                index: index + 1,
                image: image.clone(),
            })
            .ok();
        }
    };

    if options.threads <= 1 || tasks.len() <= 1 {
        let mut written = Vec::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            let image = process_file(backend, analyzer, task, options)?;
            notify(i, &image);
            written.push(image);
        }
        return Ok(written);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()?;
    let failed = AtomicBool::new(false);

    // `None` marks files that were never started because another file failed.
    let results: Vec<Option<Result<WrittenImage, ProcessError>>> = pool.install(|| {
        tasks
            .par_iter()
            .enumerate()
            .map(|(i, task)| {
                if failed.load(Ordering::Relaxed) {
                    return None;
                }
                let result = process_file(backend, analyzer, task, options);
                match &result {
                    Ok(image) => notify(i, image),
                    Err(_) => failed.store(true, Ordering::Relaxed),
                }
                Some(result)
            })
            .collect()
    });

    let mut written = Vec::with_capacity(tasks.len());
    let mut first_error = None;
    for result in results.into_iter().flatten() {
        match result {
            Ok(image) => written.push(image),
            Err(e) => {
                first_error = Some(e);
                break;
            }
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(written),
    }
}

/// Log a warning for each destination that more than one task writes.
fn warn_duplicate_outputs(tasks: &[FileTask], descriptor: &str) {
    let mut seen = HashSet::new();
    for task in tasks {
        let output = output_path(task.path(), descriptor);
        if !seen.insert(output.clone()) {
            tracing::warn!(
                output = %output.display(),
                "output is produced more than once; the last write wins"
            );
        }
    }
}

/// Full run: validate config, resolve `paths`, gate, and process with the
/// production backend and the configured analyzer.
pub fn run<P: AsRef<Path>>(
    paths: &[P],
    config: &CropperConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessSummary, ProcessError> {
    let options = ProcessOptions::from_config(config)?;
    let resolved = resolve_paths(paths)?;
    let (tasks, skipped) = format::gate(resolved);
    tracing::debug!(accepted = tasks.len(), skipped = skipped.len(), "gated");

    if let Some(tx) = &events {
        for path in &skipped {
            tx.send(ProcessEvent::Skipped { path: path.clone() }).ok();
        }
    }

    let analyzer = analyzer_for(config.analysis.strategy);
    let written = process_with_backend(
        &RustBackend::new(),
        analyzer.as_ref(),
        &tasks,
        &options,
        events,
    )?;

    Ok(ProcessSummary {
        written,
        skipped: skipped.len(),
    })
}
