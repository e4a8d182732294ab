use crate::config::AppConfig;
use portable_atomic::AtomicU64;
use std::sync::Arc;

// ── Performance Counters (lock-free) ──

pub struct PerfCounters {
    pub quotes_served: AtomicU64,
    pub simulations_run: AtomicU64,
    pub optimizations_run: AtomicU64,
    pub trials_simulated: AtomicU64,
    pub requests_rejected: AtomicU64,
}

impl PerfCounters {
    pub fn new() -> Self {
        Self {
            quotes_served: AtomicU64::new(0),
            simulations_run: AtomicU64::new(0),
            optimizations_run: AtomicU64::new(0),
            trials_simulated: AtomicU64::new(0),
            requests_rejected: AtomicU64::new(0),
        }
    }
}

// ── Application shared state ──

/// Shared across request handlers. The engine itself is stateless; the
/// only shared data is configuration and counters.
pub struct AppState {
    pub config: AppConfig,
    pub counters: PerfCounters,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            counters: PerfCounters::new(),
        })
    }
}
