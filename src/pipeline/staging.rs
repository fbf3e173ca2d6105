//! Race-safe staging of pasted source on disk.
//!
//! Content is written under an exclusive `flock` into an `O_EXCL` temporary
//! file, then the final name is claimed with `link(2)`, which fails if the
//! name exists. A caller that loses the race for a name waits on the same
//! lock, so it never sees a partially written file and never overwrites one.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use super::{StageOutcome, StagedFile};
use crate::config::StagingConfig;
use crate::error::StagingError;

const NAME_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const TEMP_TOKEN_LENGTH: usize = 12;

/// Writes each paste to a freshly named file in one directory.
#[derive(Debug, Clone)]
pub struct StagingStore {
    directory: PathBuf,
    name_length: usize,
    extension: String,
}

impl StagingStore {
    pub fn new(
        directory: impl Into<PathBuf>,
        name_length: usize,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            name_length,
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &StagingConfig) -> Self {
        Self::new(&config.directory, config.name_length, config.extension.clone())
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Random name of `name_length` distinct characters from `[a-z0-9]`.
    pub fn random_name(&self) -> String {
        let mut rng = rand::thread_rng();
        NAME_ALPHABET
            .choose_multiple(&mut rng, self.name_length)
            .map(|&b| char::from(b))
            .collect()
    }

    /// Next file name to try. The extension is only added when nothing
    /// exists at the bare name.
    pub fn candidate_name(&self) -> String {
        let base = self.random_name();
        if self.directory.join(&base).exists() {
            base
        } else {
            base + &self.extension
        }
    }

    /// Stage `text` under a fresh name on the blocking pool.
    pub async fn stage(&self, text: String) -> Result<StagedFile, StagingError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.stage_blocking(&text)).await?
    }

    /// Blocking variant of [`stage`](Self::stage).
    pub fn stage_blocking(&self, text: &str) -> Result<StagedFile, StagingError> {
        let name = self.candidate_name();
        self.stage_as(&name, text)
    }

    /// Stage `text` under an explicit name.
    ///
    /// The content is written to a private temporary file first and then
    /// hard-linked to `name`, so the final name never shows partial text.
    pub fn stage_as(&self, name: &str, text: &str) -> Result<StagedFile, StagingError> {
        self.ensure_directory()?;
        let path = self.directory.join(name);

        let (tmp_path, file) = self.create_temp(name)?;
        let claimed = write_locked(&file, &tmp_path, text).and_then(|()| {
            fs::hard_link(&tmp_path, &path).map_err(|source| StagingError::Create {
                path: path.display().to_string(),
                source,
            })
        });
        if let Err(e) = fs::remove_file(&tmp_path) {
            warn!(path = %tmp_path.display(), error = %e, "cannot remove staging temp file");
        }
        // Holding the lock until the name is linked keeps losers waiting.
        drop(file);

        let outcome = match claimed {
            Ok(()) => StageOutcome::Created,
            Err(StagingError::Create { source, .. })
                if source.kind() == io::ErrorKind::AlreadyExists =>
            {
                wait_for_writer(&path)?;
                StageOutcome::ExistsAndLockAcquired
            }
            Err(e) => return Err(e),
        };

        Ok(StagedFile {
            name: name.to_owned(),
            directory: self.directory.clone(),
            path,
            outcome,
        })
    }

    /// Exclusively create `.<name>.<token>.tmp` next to the final file.
    fn create_temp(&self, name: &str) -> Result<(PathBuf, File), StagingError> {
        loop {
            let tmp_path = self
                .directory
                .join(format!(".{name}.{}.tmp", random_token(TEMP_TOKEN_LENGTH)));
            match OpenOptions::new().write(true).create_new(true).open(&tmp_path) {
                Ok(file) => return Ok((tmp_path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(source) => {
                    return Err(StagingError::Create {
                        path: tmp_path.display().to_string(),
                        source,
                    });
                }
            }
        }
    }

    fn ensure_directory(&self) -> Result<(), StagingError> {
        fs::create_dir_all(&self.directory).map_err(|source| StagingError::CreateDir {
            path: self.directory.display().to_string(),
            source,
        })
    }
}

/// Lock, write and flush. The lock lasts as long as `file` is open.
fn write_locked(mut file: &File, path: &Path, text: &str) -> Result<(), StagingError> {
    file.lock_exclusive().map_err(|source| StagingError::Lock {
        path: path.display().to_string(),
        source,
    })?;

    file.write_all(text.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| StagingError::Write {
            path: path.display().to_string(),
            source,
        })
}

/// Characters drawn with replacement, for temp file names.
fn random_token(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(NAME_ALPHABET[rng.gen_range(0..NAME_ALPHABET.len())]))
        .collect()
}

/// Block until whoever holds the lock on `path` is done, then release.
fn wait_for_writer(path: &Path) -> Result<(), StagingError> {
    let file = File::open(path).map_err(|source| StagingError::Create {
        path: path.display().to_string(),
        source,
    })?;

    let lock_error = |source| StagingError::Lock {
        path: path.display().to_string(),
        source,
    };
    file.lock_exclusive().map_err(lock_error)?;
    FileExt::unlock(&file).map_err(lock_error)
}
