//! Credential store adapters
//!
//! - `FileCredentialStore`: `credentials.json` in the chainbook directory,
//!   survives restarts (the terminal analogue of a browser cookie)
//! - `MemoryCredentialStore`: process-local slot for tests and embedders

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::ports::CredentialStore;

/// File name of the credential slot inside the chainbook directory
pub const CREDENTIALS_FILE: &str = "credentials.json";

/// On-disk shape: `{ "token": "..." }`
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Token slot persisted as JSON on disk
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store inside `chainbook_dir`; the file is created on first `set`
    pub fn new(chainbook_dir: &Path) -> Self {
        Self {
            path: chainbook_dir.join(CREDENTIALS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<CredentialsFile> {
        if !self.path.exists() {
            return Ok(CredentialsFile::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::storage(format!("Failed to read {:?}: {}", self.path, e)))?;
        // An unreadable slot is treated as empty
        Ok(serde_json::from_str(&content).unwrap_or_default())
    }

    fn write(&self, file: &CredentialsFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::storage(format!("Failed to create {:?}: {}", parent, e)))?;
        }
        let content = serde_json::to_string_pretty(file)?;
        let write_err = |e: std::io::Error| {
            Error::storage(format!("Failed to write {:?}: {}", self.path, e))
        };
        // Owner-only from the moment of creation; a pre-existing file is
        // tightened before the token goes in
        let mut handle = owner_only_options().open(&self.path).map_err(write_err)?;
        restrict_permissions(&self.path)?;
        handle.write_all(content.as_bytes()).map_err(write_err)?;
        handle.flush().map_err(write_err)?;
        Ok(())
    }
}

fn owner_only_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| Error::storage(format!("Failed to restrict {:?}: {}", path, e)))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.read()?.token.filter(|t| !t.is_empty()))
    }

    fn set(&self, token: &str) -> Result<()> {
        self.write(&CredentialsFile {
            token: Some(token.to_string()),
        })
    }

    fn remove(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        std::fs::remove_file(&self.path)
            .map_err(|e| Error::storage(format!("Failed to remove {:?}: {}", self.path, e)))
    }
}

/// Token slot held in memory only
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.token
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.slot()?.clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.slot()? = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.slot()? = None;
        Ok(())
    }
}
