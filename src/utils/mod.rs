pub mod batch_config;
pub mod constants;
pub mod env;
pub mod input_loader;
pub mod progress_bars;

use sysinfo::System;

/// Resident memory in use across the system, in MB.
pub fn get_memory_usage() -> u64 {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.used_memory() / (1024 * 1024) // Convert to MB
}

/// Fraction of total system memory in use, in [0, 1].
pub fn get_memory_ratio() -> f64 {
    let mut sys = System::new();
    sys.refresh_memory();
    let total = sys.total_memory();
    if total == 0 {
        return 0.0;
    }
    (sys.used_memory() as f64 / total as f64).clamp(0.0, 1.0)
}

/// Source of live memory pressure for chunk planning.
pub trait MemoryProbe: Send + Sync {
    /// Fraction of memory in use, in [0, 1].
    fn memory_ratio(&self) -> f64;

    fn memory_mb(&self) -> u64 {
        0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMemoryProbe;

impl MemoryProbe for SystemMemoryProbe {
    fn memory_ratio(&self) -> f64 {
        get_memory_ratio()
    }

    fn memory_mb(&self) -> u64 {
        get_memory_usage()
    }
}

/// Reports a constant ratio. Used for deterministic runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedMemoryProbe(pub f64);

impl MemoryProbe for FixedMemoryProbe {
    fn memory_ratio(&self) -> f64 {
        self.0.clamp(0.0, 1.0)
    }
}
