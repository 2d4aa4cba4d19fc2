//! Performance metrics collection for the simulation.
//!
//! Provides structured logging and counters for monitoring run health:
//! updates, cycles, births, deaths, and task completions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Global metrics collector for simulation statistics.
pub struct Metrics {
    update_count: AtomicU64,
    organism_count: AtomicU64,
    cycle_count: AtomicU64,
    pub counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            update_count: AtomicU64::new(0),
            organism_count: AtomicU64::new(0),
            cycle_count: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed update with its duration.
    pub fn record_update(&self, duration: Duration, organisms: usize, cycles: u64) {
        self.update_count.fetch_add(1, Ordering::Relaxed);
        self.organism_count.store(organisms as u64, Ordering::Relaxed);
        self.cycle_count.fetch_add(cycles, Ordering::Relaxed);

        // Log at info level every 100 updates
        let update = self.update_count.load(Ordering::Relaxed);
        if update % 100 == 0 {
            tracing::info!(
                update = update,
                organisms = organisms,
                cycles = cycles,
                duration_us = duration.as_micros() as u64,
                "Simulation update"
            );
        }
    }

    /// Increments a named counter.
    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.update_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn organism_count(&self) -> u64 {
        self.organism_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}
