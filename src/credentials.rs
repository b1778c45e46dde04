//! Rotating pool of video API credentials

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, info};
use sha2::{Digest, Sha256};

use crate::error::{ConfigError, Result};

/// An ordered, non-empty list of API keys with a shared cursor.
///
/// The cursor only moves forward and wraps around. Callers that may race
/// each other should take the index with [`checkout`](Self::checkout) and
/// rotate with [`rotate_from`](Self::rotate_from), so two lookups failing on
/// the same spent key advance the cursor once.
pub struct CredentialPool {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl CredentialPool {
    /// Build a pool, dropping blank keys
    pub fn new(keys: Vec<String>) -> Result<Self> {
        let keys: Vec<String> = keys
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        if keys.is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }

        debug!("Credential pool loaded with {} key(s)", keys.len());
        Ok(Self {
            keys,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Number of credentials in the pool
    pub fn size(&self) -> usize {
        self.keys.len()
    }

    /// Index of the active credential
    pub fn position(&self) -> usize {
        self.cursor.load(Ordering::Acquire) % self.keys.len()
    }

    /// The active credential
    pub fn current(&self) -> &str {
        &self.keys[self.position()]
    }

    /// Index and value of the active credential, read together
    pub fn checkout(&self) -> (usize, &str) {
        let index = self.position();
        (index, &self.keys[index])
    }

    /// Advance to the next credential, wrapping at the end
    pub fn rotate(&self) {
        let len = self.keys.len();
        let previous = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len))
            .unwrap_or_else(|i| i);
        self.log_rotation(previous % len);
    }

    /// Advance past credential `index` only if it is still the active one.
    ///
    /// Returns `false` when someone else already moved the cursor off it.
    pub fn rotate_from(&self, index: usize) -> bool {
        let len = self.keys.len();
        let index = index % len;
        match self.cursor.compare_exchange(
            index,
            (index + 1) % len,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => {
                self.log_rotation(index);
                true
            }
            Err(_) => {
                debug!(
                    "Video API key {} already rotated out",
                    mask_key(&self.keys[index])
                );
                false
            }
        }
    }

    fn log_rotation(&self, previous: usize) {
        let next = (previous + 1) % self.keys.len();
        info!(
            "Video API key {} out of quota, switching to {}",
            mask_key(&self.keys[previous]),
            mask_key(&self.keys[next])
        );
    }

    /// Masked view of every key, in pool order
    pub fn masked_keys(&self) -> Vec<String> {
        self.keys.iter().map(|k| mask_key(k)).collect()
    }
}

impl fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPool")
            .field("keys", &self.masked_keys())
            .field("position", &self.position())
            .finish()
    }
}

/// Show the first four characters of a key plus a short fingerprint
pub fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{}… ({})", prefix, fingerprint(key))
}

/// Short, stable fingerprint of a key for logs and status output
pub fn fingerprint(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    digest[..4].iter().map(|b| format!("{:02x}", b)).collect()
}
