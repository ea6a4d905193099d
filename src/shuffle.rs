//! Entry ordering for finished playlists
//!
//! Playlists are written sorted, so artists and albums cluster together.
//! The shuffle pass reads each file back and permutes its entries, leaving
//! the header alone. The ordering strategy is a trait so runs can be made
//! reproducible with a seed, or skipped entirely.

use crate::error::Result;
use crate::export::m3u::{M3uDocument, M3uEntry};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;
use tracing::debug;

/// Strategy for ordering playlist entries
pub trait EntryOrder {
    /// Reorder entries in place
    fn reorder(&mut self, entries: &mut [M3uEntry]);

    /// Get the name of this strategy (for logging)
    fn name(&self) -> &'static str;
}

/// Uniform random permutation
pub struct RandomOrder {
    rng: StdRng,
}

impl RandomOrder {
    /// Reproducible order for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded from operating system entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl EntryOrder for RandomOrder {
    fn reorder(&mut self, entries: &mut [M3uEntry]) {
        entries.shuffle(&mut self.rng);
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Leaves entries as written
pub struct KeepOrder;

impl EntryOrder for KeepOrder {
    fn reorder(&mut self, _entries: &mut [M3uEntry]) {}

    fn name(&self) -> &'static str {
        "keep"
    }
}

/// Pick a strategy from run settings
pub fn strategy(shuffle: bool, seed: Option<u64>) -> Box<dyn EntryOrder> {
    match (shuffle, seed) {
        (false, _) => Box::new(KeepOrder),
        (true, Some(seed)) => Box::new(RandomOrder::seeded(seed)),
        (true, None) => Box::new(RandomOrder::from_entropy()),
    }
}

/// Reorder the entries of a playlist file in place
pub fn shuffle_playlist(path: &Path, order: &mut dyn EntryOrder) -> Result<()> {
    let mut doc = M3uDocument::load(path)?;
    if doc.entries.len() < 2 {
        return Ok(());
    }

    order.reorder(&mut doc.entries);
    doc.save(path)?;
    debug!(
        "Reordered {} entries in {} ({})",
        doc.entries.len(),
        path.display(),
        order.name()
    );
    Ok(())
}
