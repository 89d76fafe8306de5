// Summary Dedup Library - Shared code between the CLI and front ends
//
// This module exports the pure text-cleanup functions used before an
// AI-generated summary is sanitized and rendered.

pub mod config;
pub mod dedup;
pub mod segment;
pub mod severity;
pub mod time_window;

// Re-export key types for convenience
pub use config::{read_settings, write_settings, CleanupSettings, ConfigError};
pub use dedup::{
    dedupe_summary, dedupe_summary_default, dedupe_summary_with_stats, normalize, similarity,
    DedupeMode, DedupeOptions, DedupeStats, SimilarityMetric, DEFAULT_THRESHOLD,
};
pub use segment::Segment;
pub use severity::{map_variant_to_severity, Severity};
pub use time_window::{format_time_window, parse_clock, TimeFormat, TimeWindow};
