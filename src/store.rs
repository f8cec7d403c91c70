//! # Profile Store Module
//!
//! Keeps every user's [`Profile`] in a single JSON file, keyed by the chat id
//! rendered as a string.
//!
//! # Consistency
//!
//! Every mutation is a whole-file read-modify-write with no locking. Two
//! commands racing across the read/write boundary lose one update: the last
//! writer wins for the entire file, not per record. A failed write may leave
//! the file truncated; there is no atomic rename or backup.
//!
//! A record that is valid JSON but not a profile is invisible to readers and
//! written back unchanged by every mutation. Only a file that is not a JSON
//! object as a whole is treated as empty.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::{StorageError, TrackerError};
use crate::profile::Profile;

/// Mapping from user id to profile record, as persisted on disk
pub type ProfileMap = BTreeMap<String, Profile>;

/// One entry of the file, kept verbatim when it does not decode as a profile
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredRecord {
    Profile(Profile),
    Unreadable(Value),
}

type RecordMap = BTreeMap<String, StoredRecord>;

/// Whole-file JSON store for profile records
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record, leaving ones that are not profiles as raw JSON
    ///
    /// A missing, unreadable or malformed file yields an empty mapping.
    async fn read_records(&self) -> RecordMap {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Profile file does not exist yet");
                return RecordMap::new();
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read profile file, starting empty"
                );
                return RecordMap::new();
            }
        };

        let records: RecordMap = match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Profile file is not a JSON object, starting empty"
                );
                return RecordMap::new();
            }
        };

        for (user_id, record) in &records {
            if let StoredRecord::Unreadable(_) = record {
                warn!(user_id = %user_id, "Skipping profile record with unexpected shape");
            }
        }
        records
    }

    async fn write_records(&self, records: &RecordMap) -> Result<(), StorageError> {
        // serde_json leaves non-ASCII characters unescaped
        let content = serde_json::to_string(records)?;
        tokio::fs::write(&self.path, content).await?;
        debug!(path = %self.path.display(), records = records.len(), "Profile file written");
        Ok(())
    }

    /// Read every well-formed profile
    pub async fn load(&self) -> ProfileMap {
        self.read_records()
            .await
            .into_iter()
            .filter_map(|(user_id, record)| match record {
                StoredRecord::Profile(profile) => Some((user_id, profile)),
                StoredRecord::Unreadable(_) => None,
            })
            .collect()
    }

    /// Overwrite the file with the given mapping
    pub async fn save(&self, profiles: &ProfileMap) -> Result<(), StorageError> {
        let records = profiles
            .iter()
            .map(|(user_id, profile)| (user_id.clone(), StoredRecord::Profile(profile.clone())))
            .collect();
        self.write_records(&records).await
    }

    /// Fetch one user's record
    ///
    /// A record that does not decode counts as missing.
    pub async fn get(&self, user_id: &str) -> Result<Profile, TrackerError> {
        match self.read_records().await.remove(user_id) {
            Some(StoredRecord::Profile(profile)) => Ok(profile),
            _ => Err(TrackerError::NotFound(user_id.to_string())),
        }
    }

    /// Store a record, fully replacing any previous one for the user
    pub async fn replace(&self, user_id: &str, profile: Profile) -> Result<(), TrackerError> {
        let mut records = self.read_records().await;
        let previous = records.insert(user_id.to_string(), StoredRecord::Profile(profile));
        if previous.is_some() {
            info!(user_id = %user_id, "Replacing existing profile");
        } else {
            info!(user_id = %user_id, "Creating new profile");
        }
        self.write_records(&records).await?;
        Ok(())
    }

    /// Apply `mutate` to an existing record and persist the result
    ///
    /// Returns whatever `mutate` returns. When the record is missing or
    /// `mutate` fails, the file is left untouched.
    pub async fn update<T, F>(&self, user_id: &str, mutate: F) -> Result<T, TrackerError>
    where
        F: FnOnce(&mut Profile) -> Result<T, TrackerError>,
    {
        let mut records = self.read_records().await;
        let Some(StoredRecord::Profile(profile)) = records.get_mut(user_id) else {
            return Err(TrackerError::NotFound(user_id.to_string()));
        };

        let mut updated = profile.clone();
        let result = mutate(&mut updated)?;
        *profile = updated;

        self.write_records(&records).await?;
        Ok(result)
    }
}
