use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use strata_field::GenResult;

use crate::config::WorldConfig;
use crate::partition::ChunkPartitioner;

/// Current world configuration plus a revision that bumps on every update.
///
/// Readers take a cheap `Arc` snapshot; results tagged with an older revision
/// can be discarded by whoever consumes them.
pub struct World {
    config: Arc<RwLock<Arc<WorldConfig>>>,
    rev: AtomicU64,
}

impl World {
    pub fn new(config: WorldConfig) -> GenResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(RwLock::new(Arc::new(config))),
            rev: AtomicU64::new(1),
        })
    }

    pub fn config(&self) -> Arc<WorldConfig> {
        match self.config.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.rev.load(Ordering::Acquire)
    }

    /// Swaps in `config` and returns the new revision. Invalid configs leave
    /// the world untouched.
    pub fn update_config(&self, config: WorldConfig) -> GenResult<u64> {
        config.validate()?;
        match self.config.write() {
            Ok(mut guard) => *guard = Arc::new(config),
            Err(poisoned) => *poisoned.into_inner() = Arc::new(config),
        }
        let rev = self.rev.fetch_add(1, Ordering::AcqRel) + 1;
        log::info!("world config updated to revision {rev}");
        Ok(rev)
    }

    pub fn partitioner(&self) -> GenResult<ChunkPartitioner> {
        ChunkPartitioner::from_config(&self.config())
    }
}
