// SPDX-License-Identifier: MPL-2.0
//! Client-local state kept between runs, stored as CBOR.
//!
//! Holds the signed-in session and the directories last used by the file
//! dialogs. None of it is user-editable, so it lives in the data directory
//! (`session.cbor`) rather than in `settings.toml`.
//!
//! A missing file is not an error: it simply routes the UI to the
//! authentication screen. Read and parse failures fall back to the default
//! state and report an i18n warning key.

use super::paths;
use crate::application::port::{AuthToken, Session};
use crate::domain::asset::UserId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// State file name within the app data directory.
const STATE_FILE: &str = "session.cbor";

/// Serialized form of a [`Session`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredSession {
    pub token: String,
    pub user_id: String,
    #[serde(default)]
    pub username: String,
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.as_str().to_string(),
            user_id: session.user_id.as_str().to_string(),
            username: session.username.clone(),
        }
    }
}

impl StoredSession {
    /// Rebuilds the session. A blank token counts as signed out.
    #[must_use]
    pub fn to_session(&self) -> Option<Session> {
        if self.token.trim().is_empty() {
            return None;
        }
        Some(Session {
            token: AuthToken::new(self.token.clone()),
            user_id: UserId::new(self.user_id.clone()),
            username: self.username.clone(),
        })
    }
}

/// Application state that persists across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppState {
    #[serde(default)]
    pub session: Option<StoredSession>,

    /// Initial directory of the download save dialog.
    #[serde(default)]
    pub last_save_directory: Option<PathBuf>,

    /// Initial directory of the upload open dialog.
    #[serde(default)]
    pub last_open_directory: Option<PathBuf>,
}

impl AppState {
    /// Loads state from the default data directory.
    ///
    /// Returns the state and an optional warning key for the notification
    /// area.
    pub fn load() -> (Self, Option<String>) {
        Self::load_from(None)
    }

    /// Loads state from `base_dir`, or from the default data directory when
    /// `None`.
    pub fn load_from(base_dir: Option<PathBuf>) -> (Self, Option<String>) {
        let Some(path) = Self::state_file_path_with_override(base_dir) else {
            return (Self::default(), None);
        };

        if !path.exists() {
            return (Self::default(), None);
        }

        match fs::File::open(&path) {
            Ok(file) => {
                let reader = BufReader::new(file);
                match ciborium::from_reader(reader) {
                    Ok(state) => (state, None),
                    Err(err) => {
                        log::warn!("session file {} is corrupt: {err}", path.display());
                        (
                            Self::default(),
                            Some("notification-state-parse-error".to_string()),
                        )
                    }
                }
            }
            Err(err) => {
                log::warn!("cannot read session file {}: {err}", path.display());
                (
                    Self::default(),
                    Some("notification-state-read-error".to_string()),
                )
            }
        }
    }

    /// Saves state to the default data directory.
    ///
    /// Returns a warning key when the write failed.
    pub fn save(&self) -> Option<String> {
        self.save_to(None)
    }

    /// Saves state to `base_dir`, creating it if needed.
    pub fn save_to(&self, base_dir: Option<PathBuf>) -> Option<String> {
        let Some(path) = Self::state_file_path_with_override(base_dir) else {
            return Some("notification-state-path-error".to_string());
        };

        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return Some("notification-state-dir-error".to_string());
            }
        }

        match fs::File::create(&path) {
            Ok(file) => {
                let writer = BufWriter::new(file);
                if ciborium::into_writer(self, writer).is_err() {
                    return Some("notification-state-write-error".to_string());
                }
                None
            }
            Err(_) => Some("notification-state-create-error".to_string()),
        }
    }

    fn state_file_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
        paths::get_app_data_dir_with_override(base_dir).map(|mut path| {
            path.push(STATE_FILE);
            path
        })
    }

    /// The stored session, if it still carries a token.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.session.as_ref().and_then(StoredSession::to_session)
    }

    pub fn set_session(&mut self, session: &Session) {
        self.session = Some(StoredSession::from(session));
    }

    /// Forgets the session. Dialog directories are kept.
    pub fn clear_session(&mut self) {
        self.session = None;
    }

    /// Remembers the parent directory of a saved download.
    pub fn set_last_save_directory_from_file(&mut self, file_path: &Path) {
        if let Some(parent) = file_path.parent() {
            self.last_save_directory = Some(parent.to_path_buf());
        }
    }

    /// Remembers the parent directory of a file picked for upload.
    pub fn set_last_open_directory_from_file(&mut self, file_path: &Path) {
        if let Some(parent) = file_path.parent() {
            self.last_open_directory = Some(parent.to_path_buf());
        }
    }
}
