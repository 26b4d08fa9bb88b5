//! Scoped suppression of transport diagnostics.
//!
//! The client emits a warning per request when TLS verification is off.
//! During a scrub run that would repeat for every job on the server, so the
//! pipeline suppresses the channel around each batch of collaborator calls.
//!
//! Suppression is a depth counter paired with an RAII guard: construction
//! increments, `Drop` decrements, so the previous state is restored on every
//! exit path, including early `?` returns and panics. Guards nest.

use std::sync::atomic::{AtomicUsize, Ordering};

static SUPPRESSION_DEPTH: AtomicUsize = AtomicUsize::new(0);

/// Whether transport warnings are currently suppressed.
pub fn transport_warnings_suppressed() -> bool {
    SUPPRESSION_DEPTH.load(Ordering::SeqCst) > 0
}

/// Guard that suppresses transport warnings for its lifetime.
#[must_use = "suppression ends when the guard is dropped"]
#[derive(Debug)]
pub struct SuppressTransportWarnings(());

impl SuppressTransportWarnings {
    /// Begin suppressing transport warnings until the guard is dropped.
    pub fn new() -> Self {
        SUPPRESSION_DEPTH.fetch_add(1, Ordering::SeqCst);
        SuppressTransportWarnings(())
    }
}

impl Default for SuppressTransportWarnings {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SuppressTransportWarnings {
    fn drop(&mut self) {
        SUPPRESSION_DEPTH.fetch_sub(1, Ordering::SeqCst);
    }
}
