//! Per-root profile configuration.
//!
//! # Storage layout
//!
//! ```text
//! <root>/
//!   conveyor.yaml           (optional — defaults apply when absent)
//!   src/                    (source_dir)
//!   dist/                   (dist_dir)
//!   .conveyor/ledger.json   (ledger_path)
//! ```
//!
//! # API pattern
//!
//! Every function takes an explicit `root: &Path` so tests can run against a
//! `TempDir` instead of the process working directory. All configured paths
//! are interpreted relative to `root` (absolute paths pass through as-is).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// File name of the profile under the root.
pub const PROFILE_FILE: &str = "conveyor.yaml";

/// Path configuration for one synchronizer root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Directory scanned for source files (direct children only).
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    /// Directory receiving hash-suffixed artifacts; created if absent.
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
    /// Ledger state file; created on first save.
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from(".conveyor").join("ledger.json")
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            dist_dir: default_dist_dir(),
            ledger_path: default_ledger_path(),
        }
    }
}

impl Profile {
    /// `source_dir` resolved against `root`.
    pub fn source_dir_at(&self, root: &Path) -> PathBuf {
        root.join(&self.source_dir)
    }

    /// `dist_dir` resolved against `root`.
    pub fn dist_dir_at(&self, root: &Path) -> PathBuf {
        root.join(&self.dist_dir)
    }

    /// `ledger_path` resolved against `root`.
    pub fn ledger_path_at(&self, root: &Path) -> PathBuf {
        root.join(&self.ledger_path)
    }
}

/// `<root>/conveyor.yaml` — pure, no I/O.
pub fn profile_path_at(root: &Path) -> PathBuf {
    root.join(PROFILE_FILE)
}

/// Load the profile for `root`.
///
/// Returns the built-in defaults if no profile file exists. A malformed
/// profile is a fatal [`ProfileError::Parse`] — unlike the ledger, the
/// profile has no safe fallback interpretation.
pub fn load_at(root: &Path) -> Result<Profile, ProfileError> {
    let path = profile_path_at(root);
    if !path.exists() {
        return Ok(Profile::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| ProfileError::Parse { path, source: e })
}

/// Atomically save the profile to `<root>/conveyor.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `rename`. The `.tmp` lives
/// in the same directory as the target (same filesystem — no EXDEV).
pub fn save_at(root: &Path, profile: &Profile) -> Result<(), ProfileError> {
    let path = profile_path_at(root);
    let tmp_path = root.join(format!("{PROFILE_FILE}.tmp"));

    let yaml = serde_yaml::to_string(profile)?;
    std::fs::write(&tmp_path, yaml)?;
    if let Err(e) = std::fs::rename(&tmp_path, &path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

/// Write a default profile at `root`.
///
/// Refuses to overwrite an existing profile unless `force` is set.
pub fn init_at(root: &Path, force: bool) -> Result<Profile, ProfileError> {
    let path = profile_path_at(root);
    if path.exists() && !force {
        return Err(ProfileError::AlreadyInitialized { path });
    }
    let profile = Profile::default();
    save_at(root, &profile)?;
    Ok(profile)
}
