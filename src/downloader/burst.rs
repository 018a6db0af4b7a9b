//! Burst concurrency gate
//!
//! Riot enforces a short-burst cap on rapid requests separately from its
//! rolling rate-limit window. This gate bounds in-flight fetches; rolling
//! window handling lives in [`crate::downloader::fetch`] and
//! [`crate::downloader::session`].

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting gate bounding concurrent in-flight fetches.
///
/// Never more than `capacity` permits are out at once, regardless of how
/// many logical fetch tasks are scheduled. No acquisition ordering is
/// guaranteed beyond eventual fairness.
#[derive(Clone)]
pub struct BurstLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl BurstLimiter {
    /// Create a gate with a fixed permit capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Permit capacity the gate was created with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Permits currently held by in-flight fetches.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }

    /// Acquire one permit, suspending until one frees.
    ///
    /// The permit is owned so it can cross task boundaries and releases on
    /// drop, including on every early-return path.
    pub async fn acquire(&self) -> Result<BurstPermit, BurstError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| BurstError::Acquire(e.to_string()))?;
        Ok(BurstPermit { _permit: permit })
    }
}

/// RAII handle to one burst permit.
#[derive(Debug)]
pub struct BurstPermit {
    _permit: OwnedSemaphorePermit,
}

/// Burst gate errors
#[derive(Debug, thiserror::Error)]
pub enum BurstError {
    /// Failed to acquire a permit (the semaphore was closed)
    #[error("failed to acquire burst permit: {0}")]
    Acquire(String),
}
