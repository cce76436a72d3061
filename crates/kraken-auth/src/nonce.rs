//! Per-client nonce allocation
//!
//! Kraken rejects a private request whose nonce is not greater than the last
//! one it accepted for the same API key.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Strictly increasing nonce source owned by a single client
///
/// The first nonce is the current Unix time in microseconds. Every later nonce
/// is the previously issued value plus one. Allocation is a single atomic
/// read-modify-write, so concurrent callers never receive the same value.
#[derive(Debug, Default)]
pub struct NonceCounter {
    /// Last issued nonce, 0 until the first allocation
    last: AtomicU64,
}

impl NonceCounter {
    /// Create a counter that has not issued anything yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next nonce
    pub fn next(&self) -> u64 {
        let mut issued = 0;
        // The closure always returns Some, so the update cannot fail.
        let _ = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                issued = if last == 0 {
                    unix_micros()
                } else {
                    last.saturating_add(1)
                };
                Some(issued)
            });
        issued
    }

    /// The last nonce handed out by [`next`](Self::next), if any
    pub fn last_issued(&self) -> Option<u64> {
        match self.last.load(Ordering::SeqCst) {
            0 => None,
            last => Some(last),
        }
    }
}

fn unix_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
        .max(1)
}
