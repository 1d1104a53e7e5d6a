//! Repairing many files at once.
//!
//! Files are found by walking the given paths, repaired in parallel and
//! written back according to the [`Mode`]. Each file is handled on its own:
//! one file failing never affects the output of another.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::engine::Report;
use crate::error::Error;
use crate::registry::Registry;
use crate::repair::repair_bytes;

/// A file to repair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Source {
    /// Where the file is read from.
    pub path: PathBuf,
    /// Path relative to the directory it was found in, used to place it
    /// under an output directory.
    pub relative: PathBuf,
}

/// Find the files to repair.
///
/// Files named directly are always taken. Directories are walked
/// recursively and only files with one of `extensions` are taken. The result
/// is sorted by path and free of duplicates.
pub fn discover<P: AsRef<Path>>(paths: &[P], extensions: &[String]) -> Result<Vec<Source>, Error> {
    let mut sources = Vec::new();
    for root in paths {
        let root = root.as_ref();
        if root.is_file() {
            let relative = root
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| root.to_path_buf());
            sources.push(Source {
                path: root.to_path_buf(),
                relative,
            });
            continue;
        }
        if !root.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such file or directory: {}", root.display()),
            )));
        }
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !has_extension(path, extensions) {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            sources.push(Source {
                path: path.to_path_buf(),
                relative,
            });
        }
    }
    sources.sort();
    sources.dedup_by(|a, b| a.path == b.path);
    debug!("discovered {} files", sources.len());
    Ok(sources)
}

// Files named directly keep only their file name, and files from different
// directories can share a relative path, so two sources can map onto the same
// output file.
fn check_output_collisions(sources: &[Source], dir: &Path) -> Result<(), Error> {
    let mut by_target = sources.iter().collect::<Vec<_>>();
    by_target.sort_by(|a, b| a.relative.cmp(&b.relative));
    for pair in by_target.windows(2) {
        if pair[0].relative == pair[1].relative {
            return Err(Error::OutputCollision {
                first: pair[0].path.clone(),
                second: pair[1].path.clone(),
                target: dir.join(&pair[0].relative),
            });
        }
    }
    Ok(())
}

pub(crate) fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(extension))
        })
}

/// What to do with repaired files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Overwrite each changed file.
    InPlace,
    /// Write every file below this directory, keeping relative paths.
    OutputDir(PathBuf),
    /// Write nothing; only report what would change.
    Check,
}

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub mode: Mode,
    /// Number of worker threads (0 = one per CPU).
    pub jobs: usize,
    /// Skip the remaining files once one fails.
    pub fail_fast: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            mode: Mode::InPlace,
            jobs: 0,
            fail_fast: false,
        }
    }
}

/// What happened to a single file.
#[derive(Debug)]
pub enum Outcome {
    /// Nothing needed correcting.
    Unchanged,
    /// Corrections were made (or would be, in check mode).
    Repaired(Report),
    /// The file couldn't be read, repaired or written.
    Failed(Error),
    /// Not processed because an earlier file failed.
    Skipped,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub source: Source,
    pub outcome: Outcome,
}

impl Display for FileOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let path = self.source.path.display();
        match &self.outcome {
            Outcome::Unchanged => write!(f, "{}: unchanged", path),
            Outcome::Repaired(report) => write!(f, "{}: {} fixes", path, report.len()),
            Outcome::Failed(err) => write!(f, "{}: {}", path, err),
            Outcome::Skipped => write!(f, "{}: skipped", path),
        }
    }
}

/// Results of a batch run, in the order the files were discovered.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub files: Vec<FileOutcome>,
}

impl BatchSummary {
    fn count(&self, f: impl Fn(&Outcome) -> bool) -> usize {
        self.files.iter().filter(|file| f(&file.outcome)).count()
    }

    pub fn unchanged(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Unchanged))
    }

    pub fn repaired(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Repaired(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Skipped))
    }

    /// Total number of corrections over all files.
    pub fn fixes(&self) -> usize {
        self.files
            .iter()
            .map(|file| match &file.outcome {
                Outcome::Repaired(report) => report.len(),
                _ => 0,
            })
            .sum()
    }

    /// Process exit code: 1 when a file failed, or when a file would change
    /// in check mode; 0 otherwise.
    pub fn exit_code(&self, mode: &Mode) -> i32 {
        if self.failed() > 0 || (*mode == Mode::Check && self.repaired() > 0) {
            1
        } else {
            0
        }
    }
}

impl Display for BatchSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files: {} repaired ({} fixes), {} unchanged, {} failed",
            self.files.len(),
            self.repaired(),
            self.fixes(),
            self.unchanged(),
            self.failed()
        )?;
        if self.skipped() > 0 {
            write!(f, ", {} skipped", self.skipped())?;
        }
        Ok(())
    }
}

/// Repair one file according to `mode`.
pub fn process_file(source: &Source, registry: &Registry, mode: &Mode) -> Result<Outcome, Error> {
    let input = std::fs::read(&source.path)?;
    let repaired = repair_bytes(&input, registry)?;
    for fix in &repaired.report.fixes {
        debug!("{}: {}", source.path.display(), fix);
    }
    match mode {
        Mode::Check => {}
        Mode::InPlace => {
            if repaired.changed() {
                std::fs::write(&source.path, &repaired.output)?;
            }
        }
        Mode::OutputDir(dir) => {
            let target = dir.join(&source.relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, &repaired.output)?;
        }
    }
    Ok(if repaired.changed() {
        Outcome::Repaired(repaired.report)
    } else {
        Outcome::Unchanged
    })
}

/// Repair every source in parallel.
pub fn run_batch(
    sources: Vec<Source>,
    registry: &Registry,
    options: &BatchOptions,
) -> Result<BatchSummary, Error> {
    if let Mode::OutputDir(dir) = &options.mode {
        check_output_collisions(&sources, dir)?;
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if options.jobs > 0 {
        builder = builder.num_threads(options.jobs);
    }
    let pool = builder
        .build()
        .map_err(|e| Error::InvalidOperation(format!("cannot start workers: {}", e)))?;

    let failed = AtomicBool::new(false);
    let files = pool.install(|| {
        sources
            .into_par_iter()
            .map(|source| {
                if options.fail_fast && failed.load(Ordering::Relaxed) {
                    return FileOutcome {
                        source,
                        outcome: Outcome::Skipped,
                    };
                }
                let outcome = match process_file(&source, registry, &options.mode) {
                    Ok(outcome) => {
                        if let Outcome::Repaired(report) = &outcome {
                            info!("{}: {} fixes", source.path.display(), report.len());
                        }
                        outcome
                    }
                    Err(err) => {
                        warn!("{}: {}", source.path.display(), err);
                        failed.store(true, Ordering::Relaxed);
                        Outcome::Failed(err)
                    }
                };
                FileOutcome { source, outcome }
            })
            .collect::<Vec<_>>()
    });
    Ok(BatchSummary { files })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, relative: &str, content: &str) -> PathBuf {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.xml", "<b/>");
        write(dir.path(), "sub/a.XML", "<a/>");
        write(dir.path(), "notes.txt", "");
        let sources = discover(&[dir.path()], &["xml".to_string()]).unwrap();
        let relative = sources
            .iter()
            .map(|source| source.relative.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            relative,
            vec![PathBuf::from("b.xml"), PathBuf::from("sub/a.XML")]
        );
    }

    #[test]
    fn test_discover_explicit_file_ignores_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "doc.tei", "<TEI/>");
        let sources = discover(&[&path], &["xml".to_string()]).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].relative, PathBuf::from("doc.tei"));
    }

    #[test]
    fn test_discover_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            discover(&[missing], &["xml".to_string()]),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_check_mode_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.xml", "<teiHeader><textclass/></teiHeader>");
        let sources = discover(&[dir.path()], &["xml".to_string()]).unwrap();
        let options = BatchOptions {
            mode: Mode::Check,
            ..BatchOptions::default()
        };
        let summary = run_batch(sources, &Registry::all(), &options).unwrap();
        assert_eq!(summary.repaired(), 1);
        assert_eq!(summary.exit_code(&options.mode), 1);
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "<teiHeader><textclass/></teiHeader>"
        );
    }

    #[test]
    fn test_fail_fast_single_worker_skips_rest() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.xml", "<TEI>");
        write(dir.path(), "b.xml", "<TEI/>");
        let sources = discover(&[dir.path()], &["xml".to_string()]).unwrap();
        let options = BatchOptions {
            mode: Mode::Check,
            jobs: 1,
            fail_fast: true,
        };
        let summary = run_batch(sources, &Registry::all(), &options).unwrap();
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.files.len(), 2);
        assert_eq!(summary.exit_code(&options.mode), 1);
    }

    #[test]
    fn test_same_relative_path_collides_only_under_output_dir() {
        let sources = vec![
            Source {
                path: PathBuf::from("a/x.xml"),
                relative: PathBuf::from("x.xml"),
            },
            Source {
                path: PathBuf::from("b/x.xml"),
                relative: PathBuf::from("x.xml"),
            },
        ];
        match check_output_collisions(&sources, Path::new("out")) {
            Err(Error::OutputCollision {
                first,
                second,
                target,
            }) => {
                assert_eq!(first, PathBuf::from("a/x.xml"));
                assert_eq!(second, PathBuf::from("b/x.xml"));
                assert_eq!(target, Path::new("out").join("x.xml"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(check_output_collisions(&sources[..1], Path::new("out")).is_ok());
    }
}
