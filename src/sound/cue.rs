//! Cue identifier resolution.
//!
//! A cue identifier from the settings store is either the name of a
//! built-in cue (`default1`, `default2`) or the path of an audio file the
//! user picked. Resolution never fails: identifiers that match no built-in
//! are treated as file paths, and a missing file falls back to the first
//! built-in at playback time.

use std::path::{Path, PathBuf};

use super::embedded::get_builtin_sound;

/// Built-in cue identifiers, in display order.
pub const BUILTIN_CUE_IDS: &[&str] = &["default1", "default2"];

/// A resolved sound cue ready for playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundCue {
    /// A cue compiled into the binary.
    Builtin {
        /// Built-in identifier (e.g., "default1").
        name: String,
    },
    /// A user-supplied audio file.
    File {
        /// Display name, usually the file stem.
        name: String,
        /// Full path to the audio file.
        path: PathBuf,
    },
}

impl SoundCue {
    /// Creates a built-in cue.
    ///
    /// # Note
    ///
    /// The name is not checked here; playback falls back to the default
    /// data if it matches no embedded cue.
    #[must_use]
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::Builtin { name: name.into() }
    }

    /// Creates a file-backed cue.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Returns the display name of the cue.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin { name } | Self::File { name, .. } => name,
        }
    }

    /// Returns the identifier to persist under the `audio` settings key.
    ///
    /// Built-ins persist their name; files persist their path, so the same
    /// string round-trips through [`resolve_cue`].
    #[must_use]
    pub fn settings_id(&self) -> String {
        match self {
            Self::Builtin { name } => name.clone(),
            Self::File { path, .. } => path.to_string_lossy().into_owned(),
        }
    }

    /// Returns true if this is a built-in cue.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin { .. })
    }

    /// Returns the file path if this is a file-backed cue.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Builtin { .. } => None,
        }
    }
}

/// Resolves a persisted cue identifier into a [`SoundCue`].
///
/// Identifiers naming a built-in cue resolve to it; anything else is
/// treated as an audio file path.
#[must_use]
pub fn resolve_cue(id: &str) -> SoundCue {
    if get_builtin_sound(id).is_some() {
        return SoundCue::builtin(id);
    }

    let path = PathBuf::from(id);
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.to_string());
    SoundCue::file(name, path)
}

/// Returns the default cue (the first built-in).
#[must_use]
pub fn get_default_cue() -> SoundCue {
    SoundCue::builtin(BUILTIN_CUE_IDS[0])
}
