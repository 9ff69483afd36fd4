//! Token blacklist: the revocation registry consulted on every
//! authenticated request.
//!
//! The registry is an in-memory map from token string to expiry, persisted
//! to a flat JSON file after every mutation. An entry only matters while the
//! token it names is still within its natural lifetime; expired entries are
//! evicted lazily when next looked up. There is no background sweep.
//!
//! Durability is best-effort: the in-memory state is authoritative, and a
//! failed file write is logged and swallowed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One revoked token. `expires_at` always equals the `exp` claim extracted
/// from the token at revocation time; the store never invents or extends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    #[serde(rename = "ExpiresAt")]
    pub expires_at: DateTime<Utc>,
}

/// File-persisted revocation registry, safe under arbitrary concurrent
/// readers and writers.
///
/// Construct one at startup and share it (`Arc`) into the auth gate and the
/// administrative handlers; nothing else mutates it.
#[derive(Debug)]
pub struct TokenBlacklist {
    path: PathBuf,
    entries: RwLock<HashMap<String, BlacklistEntry>>,
}

impl TokenBlacklist {
    /// Open the registry backed by `path`, loading any persisted entries.
    ///
    /// A missing, unreadable, or unparsable file yields an empty registry;
    /// startup never fails on blacklist state.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// Record `token` as revoked until `expires_at`, overwriting any prior
    /// entry, and persist the registry.
    ///
    /// Once this returns, every subsequent [`is_revoked`](Self::is_revoked)
    /// call from any thread observes the revocation until expiry passes.
    pub fn insert(&self, token: &str, expires_at: DateTime<Utc>) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(token.to_string(), BlacklistEntry { expires_at });
        self.persist(&entries);
    }

    /// Whether `token` is revoked and still within its natural lifetime.
    ///
    /// An entry found past its expiry is removed as a side effect (lazy
    /// eviction) and the call returns `false`.
    pub fn is_revoked(&self, token: &str) -> bool {
        let now = Utc::now();

        // Fast path under the shared lock: the common cases (absent, or
        // revoked and unexpired) never contend with writers.
        {
            let entries = self.entries.read().unwrap();
            match entries.get(token) {
                None => return false,
                Some(entry) if now < entry.expires_at => return true,
                Some(_) => {}
            }
        }

        // The entry looked expired under the read lock. Re-check under the
        // exclusive lock so check-and-delete is a single critical section:
        // a racing evictor finds the entry already gone and does not
        // persist a second time.
        let mut entries = self.entries.write().unwrap();
        match entries.get(token) {
            Some(entry) if now < entry.expires_at => true,
            Some(_) => {
                entries.remove(token);
                self.persist(&entries);
                false
            }
            None => false,
        }
    }

    /// Snapshot of the registry, including expired entries not yet evicted.
    ///
    /// Administrative/inspection use only; the gate never calls this.
    pub fn list_all(&self) -> HashMap<String, BlacklistEntry> {
        self.entries.read().unwrap().clone()
    }

    /// Empty the registry and overwrite the persisted file with `{}`.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap();
        entries.clear();
        if let Err(err) = std::fs::write(&self.path, b"{}") {
            tracing::warn!("failed to clear blacklist file {:?}: {err}", self.path);
        }
    }

    /// Rewrite the full persisted file. Failures are logged and swallowed:
    /// the in-memory registry stays authoritative.
    fn persist(&self, entries: &HashMap<String, BlacklistEntry>) {
        let json = match serde_json::to_vec(entries) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("failed to serialize blacklist: {err}");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, json) {
            tracing::warn!("failed to persist blacklist to {:?}: {err}", self.path);
        }
    }
}

fn load_entries(path: &Path) -> HashMap<String, BlacklistEntry> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("failed to read blacklist file {path:?}: {err}");
            }
            return HashMap::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!("failed to parse blacklist file {path:?}: {err}");
            HashMap::new()
        }
    }
}
