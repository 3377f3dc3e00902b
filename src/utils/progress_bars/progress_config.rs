// src/utils/progress_bars/progress_config.rs

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::env;

/// Configuration for progress display during a batch run
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Whether to show a progress bar at all
    pub enabled: bool,
    /// Whether to log every result, not just milestones
    pub detailed: bool,
    /// Refresh rate for the bar in milliseconds
    pub refresh_rate_ms: u64,
    /// Whether to log memory usage per chunk
    pub show_memory: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            detailed: true,
            refresh_rate_ms: 100,
            show_memory: true,
        }
    }
}

impl ProgressConfig {
    /// Create progress configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };
        Self {
            enabled: flag("PROGRESS_ENABLED", true),
            detailed: flag("PROGRESS_DETAILED", true),
            refresh_rate_ms: lookup("PROGRESS_REFRESH_RATE_MS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(100),
            show_memory: flag("PROGRESS_SHOW_MEMORY", true),
        }
    }

    /// A bar sized to `total`, or None when progress display is disabled.
    pub fn create_progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }
        let hz = (1000 / self.refresh_rate_ms.max(1)).clamp(1, u8::MAX as u64) as u8;
        let bar = ProgressBar::with_draw_target(
            Some(total as u64),
            ProgressDrawTarget::stderr_with_hz(hz),
        );
        let style = ProgressStyle::default_bar()
            .template("  🔎 [{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        Some(bar)
    }

    /// Check if every result should be logged
    pub fn should_show_detailed(&self) -> bool {
        self.enabled && self.detailed
    }

    /// Check if memory usage should be shown
    pub fn should_show_memory(&self) -> bool {
        self.enabled && self.show_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ProgressConfig::default();
        assert!(config.enabled);
        assert!(config.detailed);
        assert_eq!(config.refresh_rate_ms, 100);
        assert!(config.show_memory);
    }

    #[test]
    fn test_lookup_config() {
        let vars: HashMap<&str, &str> = [
            ("PROGRESS_ENABLED", "false"),
            ("PROGRESS_DETAILED", "false"),
            ("PROGRESS_REFRESH_RATE_MS", "50"),
            ("PROGRESS_SHOW_MEMORY", "nope"),
        ]
        .into_iter()
        .collect();

        let config = ProgressConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert!(!config.enabled);
        assert!(!config.detailed);
        assert_eq!(config.refresh_rate_ms, 50);
        assert!(config.show_memory);
    }

    #[test]
    fn test_progress_bar_creation() {
        let mut config = ProgressConfig::default();
        config.enabled = true;
        let bar = config.create_progress_bar(12).unwrap();
        assert_eq!(bar.length(), Some(12));

        config.enabled = false;
        assert!(config.create_progress_bar(12).is_none());
    }

    #[test]
    fn test_should_show_methods() {
        let mut config = ProgressConfig::default();
        assert!(config.should_show_detailed());
        assert!(config.should_show_memory());

        config.enabled = false;
        assert!(!config.should_show_detailed());
        assert!(!config.should_show_memory());

        config.enabled = true;
        config.detailed = false;
        config.show_memory = false;
        assert!(!config.should_show_detailed());
        assert!(!config.should_show_memory());
    }
}
