use crate::backup;
use crate::config::AppConfig;
use crate::error::Error;
use crate::progress::SweepReporter;
use crate::remote::SearchBackend;
use crate::scanner;
use crate::verifier::Verifier;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub struct SweepEngine {
    root: PathBuf,
    extensions: Vec<String>,
    backup_dir: Option<PathBuf>,
}

/// What happened to a single local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Deleted {
        backup: Option<PathBuf>,
        size: u64,
    },
    NoMatch,
    Failed(String),
}

#[derive(Debug, Default, Clone)]
pub struct SweepResult {
    pub duration: Duration,
    pub files_checked: usize,
    pub deleted: usize,
    pub backed_up: usize,
    pub no_match: usize,
    pub failed: usize,
    pub bytes_reclaimed: u64,
}

impl SweepResult {
    fn record(&mut self, outcome: &FileOutcome) {
        self.files_checked += 1;
        match outcome {
            FileOutcome::Deleted { backup, size } => {
                self.deleted += 1;
                self.bytes_reclaimed += size;
                if backup.is_some() {
                    self.backed_up += 1;
                }
            }
            FileOutcome::NoMatch => self.no_match += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
    }
}

impl SweepEngine {
    /// The root must be an existing directory. It is stored canonicalized so
    /// that enumerated paths always sit under it (glob drops a leading `./`).
    pub fn new(config: &AppConfig, root: &Path) -> Result<Self, Error> {
        validate_root(root)?;

        Ok(Self {
            root: fs::canonicalize(root)?,
            extensions: config.normalized_extensions(),
            backup_dir: None,
        })
    }

    /// Back files up into `dir` before deleting them. The directory is created
    /// if missing and must not live inside the sweep root.
    pub fn with_backup_dir(mut self, dir: &Path) -> Result<Self, Error> {
        if dir.as_os_str().is_empty() {
            return Err(Error::InvalidInput(
                "Please enter a backup location.".to_string(),
            ));
        }

        if !dir.exists() {
            fs::create_dir_all(dir)?;
            info!("Created backup directory at: {}", dir.display());
        } else if !dir.is_dir() {
            return Err(Error::InvalidInput(format!(
                "Backup location is not a directory: {}",
                dir.display()
            )));
        }

        let canonical_backup = fs::canonicalize(dir)?;
        if canonical_backup.starts_with(&self.root) {
            return Err(Error::InvalidInput(format!(
                "Backup location {} must not be inside {}",
                dir.display(),
                self.root.display()
            )));
        }

        self.backup_dir = Some(dir.to_path_buf());
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backup_dir(&self) -> Option<&Path> {
        self.backup_dir.as_deref()
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Visit every file with a recognized extension, one at a time, deleting
    /// (after an optional backup) those the remote drive already holds.
    ///
    /// Per-file failures are logged and counted; they never end the sweep.
    pub fn sweep<S: SearchBackend + ?Sized>(
        &self,
        search: &S,
        reporter: &dyn SweepReporter,
    ) -> Result<SweepResult, Error> {
        validate_root(&self.root)?;

        let start = Instant::now();
        let mut result = SweepResult::default();
        info!(
            "Sweeping {} for {} extension(s)",
            self.root.display(),
            self.extensions.len()
        );
        reporter.on_sweep_start(&self.root, &self.extensions);

        for ext in &self.extensions {
            let files = match scanner::files_with_extension(&self.root, ext) {
                Ok(files) => files,
                Err(err) => {
                    error!("Error enumerating *.{} files: {}", ext, err);
                    continue;
                }
            };
            debug!("{} file(s) with extension {}", files.len(), ext);
            reporter.on_extension_start(ext, files.len());

            for path in files {
                reporter.on_file_start(&path);
                let outcome = self.process_file(search, &path, reporter);
                result.record(&outcome);
                reporter.on_file_complete(&path, &outcome);
            }
        }

        result.duration = start.elapsed();
        info!(
            "Sweep completed in {:.2}s: {} checked, {} deleted, {} skipped, {} failed",
            result.duration.as_secs_f64(),
            result.files_checked,
            result.deleted,
            result.no_match,
            result.failed,
        );
        reporter.on_sweep_complete(&result);

        Ok(result)
    }

    /// Verify, back up, then delete a single file. Deletion only happens after
    /// a confirmed match and, when configured, a completed backup.
    pub fn process_file<S: SearchBackend + ?Sized>(
        &self,
        search: &S,
        path: &Path,
        reporter: &dyn SweepReporter,
    ) -> FileOutcome {
        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => {
                error!("Skipped as path has no file name: {}", path.display());
                return FileOutcome::Failed("path has no file name".to_string());
            }
        };

        let matched = match Verifier::new(search).verify(&file_name, path) {
            Ok(matched) => matched,
            Err(err) => {
                error!("Skipped as error occurred: {}: {}", path.display(), err);
                return FileOutcome::Failed(err.to_string());
            }
        };

        if matched.is_empty() {
            info!("Skipped, no remote duplicate: {}", path.display());
            return FileOutcome::NoMatch;
        }

        let size = matched.first().and_then(|item| item.size).unwrap_or(0);
        let remote_ids: Vec<&str> = matched.iter().map(|item| item.id.as_str()).collect();
        debug!(
            "{} confirmed on remote as {:?}",
            path.display(),
            remote_ids
        );

        let backup = match &self.backup_dir {
            Some(backup_dir) => match backup::backup_file(path, &self.root, backup_dir) {
                Ok(copied) => {
                    reporter.on_file_backed_up(path, &copied);
                    Some(copied)
                }
                Err(err) => {
                    error!(
                        "Skipped as backup failed, not deleting: {}: {}",
                        path.display(),
                        err
                    );
                    return FileOutcome::Failed(format!("backup failed: {}", err));
                }
            },
            None => None,
        };

        if let Err(err) = fs::remove_file(path) {
            error!("Failed to delete {}: {}", path.display(), err);
            return FileOutcome::Failed(format!("delete failed: {}", err));
        }

        info!("Deleted: {}", path.display());
        FileOutcome::Deleted { backup, size }
    }
}

fn validate_root(root: &Path) -> Result<(), Error> {
    if root.as_os_str().is_empty() {
        return Err(Error::InvalidInput(
            "Please enter a local drive path.".to_string(),
        ));
    }
    if !root.exists() {
        return Err(Error::InvalidInput(format!(
            "Local drive path does not exist: {}",
            root.display()
        )));
    }
    if !root.is_dir() {
        return Err(Error::InvalidInput(format!(
            "Local drive path is not a directory: {}",
            root.display()
        )));
    }
    Ok(())
}
