//! Runtime configuration.
//!
//! Defaults match the spacing a stack applies when a child's layout leaves
//! padding unset. `from_env` lets a developer flip debug borders on without
//! recompiling.

use std::env;

/// Colours cycled through when debug borders are enabled.
pub const DEFAULT_DEBUG_PALETTE: [&str; 8] = [
    "#ff6666", "#66ccff", "#99cc66", "#ffcc66", "#cc99ff", "#ff99cc", "#66ffcc", "#cccccc",
];

/// Knobs shared by every component mounted through one runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Outline every frame with a rotating palette colour.
    pub debug_borders: bool,
    /// Horizontal padding applied when a child's layout omits `padx`.
    pub gap_x: u32,
    /// Vertical padding applied when a child's layout omits `pady`.
    pub gap_y: u32,
    /// Extra tracks reset past `max(old, new)` on each reconciliation pass.
    pub track_slack: usize,
    pub debug_palette: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            debug_borders: false,
            gap_x: 6,
            gap_y: 4,
            track_slack: 4,
            debug_palette: DEFAULT_DEBUG_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `SPARK_RETAINED_*` environment variables.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(value) = lookup("SPARK_RETAINED_DEBUG_BORDERS") {
            config.debug_borders = matches!(value.trim(), "1" | "true" | "yes" | "on");
        }
        if let Some(gap) = lookup("SPARK_RETAINED_GAP_X").and_then(|v| v.trim().parse().ok()) {
            config.gap_x = gap;
        }
        if let Some(gap) = lookup("SPARK_RETAINED_GAP_Y").and_then(|v| v.trim().parse().ok()) {
            config.gap_y = gap;
        }
        config
    }

    pub fn with_debug_borders(mut self, enabled: bool) -> Self {
        self.debug_borders = enabled;
        self
    }

    pub fn with_gaps(mut self, gap_x: u32, gap_y: u32) -> Self {
        self.gap_x = gap_x;
        self.gap_y = gap_y;
        self
    }

    pub fn with_track_slack(mut self, slack: usize) -> Self {
        self.track_slack = slack;
        self
    }

    /// Palette colour for the n-th bordered frame.
    pub fn debug_color(&self, n: usize) -> Option<&str> {
        if self.debug_palette.is_empty() {
            return None;
        }
        Some(&self.debug_palette[n % self.debug_palette.len()])
    }
}
