// Persisted refresh token file

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Outcome of seeding the token file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seeded {
    /// The file did not exist and was created from the seed value
    Created,
    /// The file already existed and was left untouched
    Existing,
}

/// Single-line file holding the most recently issued refresh token
///
/// The file is the only state that survives between runs.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure the file exists, seeding it with `seed` if it does not
    ///
    /// The seed is written to a sibling file first and hard-linked into
    /// place. The link fails if the target exists, so an existing file is
    /// never overwritten and a failed write never leaves a partial token
    /// file behind.
    pub fn ensure_seeded(&self, seed: &str) -> Result<Seeded> {
        let tmp_path = self.tmp_path(".seed");

        let result =
            write_synced(&tmp_path, seed).and_then(|_| fs::hard_link(&tmp_path, &self.path));
        let _ = fs::remove_file(&tmp_path);

        match result {
            Ok(()) => Ok(Seeded::Created),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                tracing::debug!("Token file {} already exists", self.path.display());
                Ok(Seeded::Existing)
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Read the current refresh token
    pub fn load(&self) -> Result<String> {
        let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let token = contents.trim();
        if token.is_empty() {
            return Err(Error::EmptyTokenFile(self.path.clone()));
        }
        Ok(token.to_string())
    }

    /// Replace the file content with `token`
    ///
    /// Written to a sibling file and renamed into place, so readers see
    /// either the old token or the new one.
    pub fn save(&self, token: &str) -> Result<()> {
        let tmp_path = self.tmp_path(".tmp");

        write_synced(&tmp_path, token)
            .and_then(|_| fs::rename(&tmp_path, &self.path))
            .map_err(|e| {
                let _ = fs::remove_file(&tmp_path);
                self.io_error(e)
            })
    }

    fn tmp_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> Error {
        Error::TokenStore {
            path: self.path.clone(),
            source,
        }
    }
}

fn write_synced(path: &Path, contents: &str) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}
