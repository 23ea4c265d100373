//! Domain types for conveyor.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem
//! paths. Artifact names are the one deliberate exception: they are plain
//! file names (no separators) and travel through the ledger as strings.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Length in characters of a hex-encoded SHA-256 digest.
pub const HASH_HEX_LEN: usize = 64;

// ---------------------------------------------------------------------------
// ArtifactName
// ---------------------------------------------------------------------------

/// The file name of a distribution artifact: `<stem>-<hash><extension>`.
///
/// Naming policy, decided once for the whole system: the content hash is
/// always the final `-`-separated segment of the stem and is always exactly
/// [`HASH_HEX_LEN`] lowercase hex characters. Source stems may themselves
/// contain `-`; the fixed-length hash segment keeps parsing unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactName(pub String);

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ArtifactName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ArtifactName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for ArtifactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Components recovered from a well-formed artifact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArtifact {
    /// Original source stem (may contain `-`).
    pub stem: String,
    /// Hex content hash embedded in the name.
    pub hash: String,
    /// Extension including the leading dot, empty when the source had none.
    pub extension: String,
}

impl ArtifactName {
    /// Compose the artifact name for `source_file_name` at `hash`.
    ///
    /// `report.txt` + `ab…` → `report-ab….txt`; extensionless names get the
    /// hash appended with no trailing dot.
    pub fn compose(source_file_name: &str, hash: &str) -> Self {
        let path = Path::new(source_file_name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| source_file_name.to_owned());
        match path.extension() {
            Some(ext) => Self(format!("{stem}-{hash}.{}", ext.to_string_lossy())),
            None => Self(format!("{stem}-{hash}")),
        }
    }

    /// Parse an artifact name back into its components.
    ///
    /// Returns `None` for names that do not follow the policy (no `-`, or a
    /// final segment that is not a full-length lowercase hex digest). Used
    /// for diagnostics only; deletion decisions go through the ledger's
    /// recorded artifact names, never through parsing.
    pub fn parse(name: &str) -> Option<ParsedArtifact> {
        let path = Path::new(name);
        let stem = path.file_stem()?.to_str()?;
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let (base, hash) = stem.rsplit_once('-')?;
        if base.is_empty() || !is_hash_segment(hash) {
            return None;
        }
        Some(ParsedArtifact {
            stem: base.to_owned(),
            hash: hash.to_owned(),
            extension,
        })
    }
}

fn is_hash_segment(s: &str) -> bool {
    s.len() == HASH_HEX_LEN
        && s.bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
