//! Per-scope address occupancy.
//!
//! A [`Registry`] is a keyed presence set owned by one scope (one city). Keys
//! are derived from a street and a number, see [`OccupancyKey::new`]. Moving an
//! occupant between two registries holds both write locks for the duration of
//! the move, so readers never observe the key in both or neither registry.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use tracing::{debug, trace, warn};

use crate::error::RegistryError;

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(0);

/// Composite `"{street}-{number}"` key identifying one address in a scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccupancyKey(String);

impl OccupancyKey {
    pub fn new(street: &str, number: impl fmt::Display) -> Self {
        Self(format!("{street}-{number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OccupancyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for OccupancyKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for OccupancyKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OccupancyKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for OccupancyKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Limits applied to a single registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Maximum number of occupied addresses, unbounded when `None`.
    pub capacity: Option<usize>,
}

impl RegistryConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }
}

/// Set of occupied addresses for one scope.
#[derive(Debug)]
pub struct Registry {
    id: u64,
    scope: String,
    config: RegistryConfig,
    keys: RwLock<HashSet<OccupancyKey>>,
}

impl Registry {
    pub fn new(scope: impl Into<String>) -> Self {
        Self::with_config(scope, RegistryConfig::default())
    }

    pub fn with_config(scope: impl Into<String>, config: RegistryConfig) -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            scope: scope.into(),
            config,
            keys: RwLock::new(HashSet::new()),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    /// Whether `key` is currently claimed. Never fails.
    pub fn is_occupied(&self, key: &str) -> bool {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted snapshot of the claimed keys.
    pub fn keys(&self) -> Vec<OccupancyKey> {
        let mut keys: Vec<_> = self
            .keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Claim `key`. Claiming an already claimed key leaves the set unchanged.
    #[tracing::instrument(
        name = "reprkit.registry.claim",
        level = "debug",
        skip(self, key),
        fields(scope = %self.scope)
    )]
    pub fn claim(&self, key: impl Into<OccupancyKey>) -> Result<(), RegistryError> {
        let key = key.into();
        self.validate(key.as_str())?;
        let mut keys = self.write()?;
        self.insert_locked(&mut keys, key)
    }

    /// Release `key`. Releasing an unclaimed key is not an error.
    #[tracing::instrument(
        name = "reprkit.registry.release",
        level = "debug",
        skip(self),
        fields(scope = %self.scope)
    )]
    pub fn release(&self, key: &str) -> Result<(), RegistryError> {
        let removed = self.write()?.remove(key);
        trace!(removed, "address released");
        Ok(())
    }

    /// Release `old_key` from `old` and claim `new_key` in `new`.
    ///
    /// Keys are validated and both locks taken before anything changes, so a
    /// validation or lock failure leaves both registries untouched. If the claim
    /// fails after the release, the release stands and
    /// [`RegistryError::PartialMove`] is returned.
    #[tracing::instrument(
        name = "reprkit.registry.move",
        level = "debug",
        skip(old, new, new_key),
        fields(from = %old.scope, to = %new.scope)
    )]
    pub fn move_key(
        old: &Registry,
        old_key: &str,
        new: &Registry,
        new_key: impl Into<OccupancyKey>,
    ) -> Result<(), RegistryError> {
        let new_key = new_key.into();
        old.validate(old_key)?;
        new.validate(new_key.as_str())?;

        let partial = |source: RegistryError, key: &OccupancyKey| {
            warn!(key = %key, error = %source, "move released the old address but failed to claim the new one");
            RegistryError::PartialMove {
                released_from: old.scope.clone(),
                failed_claim_to: new.scope.clone(),
                key: key.to_string(),
                source: Box::new(source),
            }
        };

        if old.id == new.id {
            let mut keys = old.write()?;
            keys.remove(old_key);
            let key = new_key.clone();
            return old
                .insert_locked(&mut keys, new_key)
                .map_err(|source| partial(source, &key));
        }

        // Lock in id order so opposite concurrent moves cannot deadlock.
        let (mut old_keys, mut new_keys) = if old.id < new.id {
            let old_keys = old.write()?;
            (old_keys, new.write()?)
        } else {
            let new_keys = new.write()?;
            (old.write()?, new_keys)
        };

        let removed = old_keys.remove(old_key);
        trace!(removed, "old address released");
        let key = new_key.clone();
        new.insert_locked(&mut new_keys, new_key)
            .map_err(|source| partial(source, &key))?;
        debug!(key = %key, "address moved");
        Ok(())
    }

    fn validate(&self, key: &str) -> Result<(), RegistryError> {
        if key.trim().is_empty() {
            return Err(RegistryError::InvalidKey {
                scope: self.scope.clone(),
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashSet<OccupancyKey>>, RegistryError> {
        self.keys.write().map_err(|_| RegistryError::Poisoned {
            scope: self.scope.clone(),
        })
    }

    fn insert_locked(
        &self,
        keys: &mut HashSet<OccupancyKey>,
        key: OccupancyKey,
    ) -> Result<(), RegistryError> {
        if keys.contains(&key) {
            trace!(key = %key, "address already claimed");
            return Ok(());
        }
        if let Some(capacity) = self.config.capacity
            && keys.len() >= capacity
        {
            return Err(RegistryError::CapacityExceeded {
                scope: self.scope.clone(),
                capacity,
            });
        }
        debug!(key = %key, "address claimed");
        keys.insert(key);
        Ok(())
    }
}
