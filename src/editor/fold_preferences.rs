//=========================================================================
// Fold Preferences
//=========================================================================
//
// Remembers which directories of the scene list are expanded, persisted as
// JSON next to the project settings.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

//=== PreferencesError ====================================================

#[derive(Debug)]
pub enum PreferencesError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to access fold preferences: {}", e),
            Self::Parse(e) => write!(f, "invalid fold preferences: {}", e),
        }
    }
}

impl std::error::Error for PreferencesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for PreferencesError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PreferencesError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

//=== FoldPreferences =====================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct FoldFile {
    #[serde(default)]
    directories: BTreeMap<String, bool>,
}

/// Directory fold state. Directories never seen before are open.
#[derive(Debug)]
pub struct FoldPreferences {
    path: PathBuf,
    file: FoldFile,
}

impl FoldPreferences {
    /// Reads the preferences at `path`, starting empty if the file does not
    /// exist yet.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PreferencesError> {
        let path = path.as_ref().to_path_buf();
        let file = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("Fold preferences {:?} not found, all directories open", path);
                FoldFile::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, file })
    }

    /// Preferences that live only in memory until the first toggle.
    pub fn in_memory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: FoldFile::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `dir` is expanded, remembering it as open when unseen.
    pub fn is_dir_open(&mut self, dir: &str) -> bool {
        *self.file.directories.entry(dir.to_string()).or_insert(true)
    }

    /// Stores the fold state of `dir` and writes the file.
    pub fn set_dir_open(&mut self, dir: &str, open: bool) -> Result<(), PreferencesError> {
        self.file.directories.insert(dir.to_string(), open);
        self.save()
    }

    fn save(&self) -> Result<(), PreferencesError> {
        let json = serde_json::to_string_pretty(&self.file)?;
        if let Err(e) = fs::write(&self.path, json) {
            warn!("Failed to save fold preferences to {:?}: {}", self.path, e);
            return Err(e.into());
        }
        Ok(())
    }
}

//=== Tests ===============================================================
