//! Per-provider credential files.
//!
//! Each provider keeps its bearer token in its own file inside the data
//! directory. The file holds the raw secret with no structure. A missing file
//! is the normal first-run state and reads as an empty secret.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{ChatError, ChatResult};

/// Reads and writes credential files under a base directory.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full path of a credential file.
    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Returns the trimmed secret, or an empty string when the file is missing.
    pub fn load(&self, file: &str) -> ChatResult<String> {
        let path = self.path(file);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(contents.trim().to_string()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(ChatError::io(
                format!("failed to read credential {}", path.display()),
                err,
            )),
        }
    }

    /// Overwrites the credential file with the exact secret bytes.
    ///
    /// On Unix the file is created owner read/write only.
    pub fn save(&self, file: &str, secret: &str) -> ChatResult<()> {
        let path = self.path(file);
        fs::create_dir_all(&self.dir).map_err(|err| {
            ChatError::io(format!("failed to create {}", self.dir.display()), err)
        })?;
        write_private(&path, secret.as_bytes()).map_err(|err| {
            ChatError::io(format!("failed to save API key to {}", path.display()), err)
        })
    }

    /// Deletes the credential file. Absence is not an error.
    pub fn remove(&self, file: &str) -> ChatResult<()> {
        let path = self.path(file);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ChatError::io(
                format!("failed to remove API key {}", path.display()),
                err,
            )),
        }
    }
}

#[cfg(unix)]
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation; tighten files that already existed.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(bytes)?;
    file.flush()
}

#[cfg(not(unix))]
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(bytes)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        store.save("ce.key", "abc").unwrap();
        assert_eq!(store.load("ce.key").unwrap(), "abc");

        store.remove("ce.key").unwrap();
        assert_eq!(store.load("ce.key").unwrap(), "");
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        assert_eq!(store.load("nope.key").unwrap(), "");
    }

    #[test]
    fn test_load_trims_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("or.key"), "  sk-123\n").unwrap();
        let store = CredentialStore::new(dir.path());
        assert_eq!(store.load("or.key").unwrap(), "sk-123");
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        assert!(store.remove("cu.key").is_ok());
    }

    #[test]
    fn test_save_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("nested"));
        store.save("cu.key", "secret").unwrap();
        assert_eq!(store.load("cu.key").unwrap(), "secret");
    }

    #[cfg(unix)]
    #[test]
    fn test_save_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        store.save("cu.key", "secret").unwrap();
        let mode = fs::metadata(store.path("cu.key")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
