//! Token persistence.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{AccessToken, AuthError};

/// Somewhere to keep the access token between runs.
pub trait TokenStore {
    /// Load the saved token, if any.
    fn load(&self) -> Result<Option<AccessToken>, AuthError>;

    /// Save a token, replacing any previous one.
    fn save(&self, token: &AccessToken) -> Result<(), AuthError>;

    /// Forget the saved token. Returns whether one was present.
    fn clear(&self) -> Result<bool, AuthError>;
}

impl<T: TokenStore + ?Sized> TokenStore for Box<T> {
    fn load(&self) -> Result<Option<AccessToken>, AuthError> {
        (**self).load()
    }

    fn save(&self, token: &AccessToken) -> Result<(), AuthError> {
        (**self).save(token)
    }

    fn clear(&self) -> Result<bool, AuthError> {
        (**self).clear()
    }
}

#[derive(Serialize, Deserialize)]
struct TokenFile {
    access_token: AccessToken,
}

/// Token kept in a JSON file readable only by the owner.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.fruitpack/token.json`, when a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(|home| PathBuf::from(home).join(".fruitpack").join("token.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<AccessToken>, AuthError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file: TokenFile = serde_json::from_str(&content)?;
        if file.access_token.as_str().is_empty() {
            return Ok(None);
        }
        Ok(Some(file.access_token))
    }

    fn save(&self, token: &AccessToken) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&TokenFile {
            access_token: token.clone(),
        })?;
        let mut file = open_owner_only(&self.path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;

        tracing::debug!(path = %self.path.display(), "token saved");
        Ok(())
    }

    fn clear(&self) -> Result<bool, AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "token removed");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Open for writing, creating the file as 0600 on unix.
///
/// The mode only applies on creation, so an existing file is narrowed
/// before anything is written to it.
#[cfg(unix)]
fn open_owner_only(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_owner_only(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Token kept in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<AccessToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AccessToken) -> Self {
        Self {
            token: RefCell::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<AccessToken>, AuthError> {
        Ok(self.token.borrow().clone())
    }

    fn save(&self, token: &AccessToken) -> Result<(), AuthError> {
        *self.token.borrow_mut() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<bool, AuthError> {
        Ok(self.token.borrow_mut().take().is_some())
    }
}
