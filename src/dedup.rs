// Deduplication module for AI-generated summaries
//
// Uses string similarity to detect and drop repeated sentences or
// bullet lines before a summary is handed to the renderer.

use serde::{Deserialize, Serialize};
use std::fmt;
use strsim::{jaro_winkler, normalized_levenshtein, sorensen_dice};
use tracing::{debug, info};

use crate::segment::{count_paragraphs, reassemble, segment, Segment};

/// Similarity at or above which two units count as duplicates
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// Which earlier units a candidate is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum DedupeMode {
    /// Only the previous kept unit of the same paragraph
    #[default]
    Safe,
    /// Every kept unit anywhere earlier in the text
    Global,
}

impl DedupeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DedupeMode::Safe => "safe",
            DedupeMode::Global => "global",
        }
    }
}

// Unknown modes fall back to Safe rather than failing
impl From<&str> for DedupeMode {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "global" => DedupeMode::Global,
            _ => DedupeMode::Safe,
        }
    }
}

impl From<String> for DedupeMode {
    fn from(s: String) -> Self {
        DedupeMode::from(s.as_str())
    }
}

impl fmt::Display for DedupeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String similarity measure applied to normalized units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum SimilarityMetric {
    #[default]
    Levenshtein,
    JaroWinkler,
    SorensenDice,
}

impl SimilarityMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMetric::Levenshtein => "levenshtein",
            SimilarityMetric::JaroWinkler => "jaro_winkler",
            SimilarityMetric::SorensenDice => "sorensen_dice",
        }
    }

    /// Score two already-normalized strings (0.0 - 1.0)
    pub fn score(&self, a: &str, b: &str) -> f64 {
        match self {
            SimilarityMetric::Levenshtein => normalized_levenshtein(a, b),
            SimilarityMetric::JaroWinkler => jaro_winkler(a, b),
            SimilarityMetric::SorensenDice => sorensen_dice(a, b),
        }
    }
}

impl From<&str> for SimilarityMetric {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "jaro_winkler" | "jaro" => SimilarityMetric::JaroWinkler,
            "sorensen_dice" | "dice" => SimilarityMetric::SorensenDice,
            _ => SimilarityMetric::Levenshtein,
        }
    }
}

impl From<String> for SimilarityMetric {
    fn from(s: String) -> Self {
        SimilarityMetric::from(s.as_str())
    }
}

impl fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DedupeOptions {
    #[serde(default)]
    pub mode: DedupeMode,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub metric: SimilarityMetric,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for DedupeOptions {
    fn default() -> Self {
        Self {
            mode: DedupeMode::default(),
            threshold: DEFAULT_THRESHOLD,
            metric: SimilarityMetric::default(),
        }
    }
}

impl DedupeOptions {
    pub fn with_mode(mut self, mode: DedupeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_metric(mut self, metric: SimilarityMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Threshold actually used: anything outside (0, 1] means the default.
    pub fn effective_threshold(&self) -> f64 {
        if self.threshold > 0.0 && self.threshold <= 1.0 {
            self.threshold
        } else {
            debug!(
                "Ignoring out-of-range dedup threshold {} (using {:.2})",
                self.threshold, DEFAULT_THRESHOLD
            );
            DEFAULT_THRESHOLD
        }
    }
}

/// Counts from a single dedup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupeStats {
    pub units_in: usize,
    pub units_removed: usize,
    pub paragraphs: usize,
}

/// Normalize text for comparison (lowercase, punctuation and extra whitespace stripped)
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Calculate similarity ratio between two strings (0.0 - 1.0)
/// after normalizing both, scored with `metric`
pub fn similarity(a: &str, b: &str, metric: SimilarityMetric) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    metric.score(&a, &b)
}

/// A unit that survived, as seen by later comparisons
#[derive(Debug)]
struct KeptUnit {
    raw: String,
    normalized: String,
}

impl KeptUnit {
    fn from_segment(seg: &Segment) -> Self {
        let content = seg.content().trim();
        Self {
            raw: content.to_string(),
            normalized: normalize(content),
        }
    }
}

/// Check a candidate against one kept unit. Returns the score on a match.
fn match_score(
    candidate: &KeptUnit,
    kept: &KeptUnit,
    metric: SimilarityMetric,
    threshold: f64,
) -> Option<f64> {
    // Pure punctuation has no normalized form, fall back to the raw text
    if candidate.normalized.is_empty() || kept.normalized.is_empty() {
        return (candidate.raw == kept.raw).then_some(1.0);
    }

    if candidate.normalized == kept.normalized {
        return Some(1.0);
    }

    let score = metric.score(&candidate.normalized, &kept.normalized);
    (score >= threshold).then_some(score)
}

/// Remove repeated content units from `text`.
///
/// In [`DedupeMode::Safe`] a unit is dropped only when it repeats the unit
/// kept just before it in the same paragraph. In [`DedupeMode::Global`] it is
/// dropped when it repeats any unit kept earlier in the text. Paragraph
/// breaks are never touched, and a paragraph is never emptied completely.
pub fn dedupe_summary(text: &str, options: &DedupeOptions) -> String {
    dedupe_summary_with_stats(text, options).0
}

/// [`dedupe_summary`] with default options
pub fn dedupe_summary_default(text: &str) -> String {
    dedupe_summary(text, &DedupeOptions::default())
}

/// Same as [`dedupe_summary`], also reporting what was removed
pub fn dedupe_summary_with_stats(text: &str, options: &DedupeOptions) -> (String, DedupeStats) {
    let segments = segment(text);
    let threshold = options.effective_threshold();

    let mut stats = DedupeStats {
        units_in: segments.iter().filter(|s| s.is_content()).count(),
        units_removed: 0,
        paragraphs: count_paragraphs(&segments),
    };

    let mut output: Vec<Segment> = Vec::with_capacity(segments.len());
    let mut scope: Vec<KeptUnit> = Vec::new();
    let mut paragraph: Vec<Segment> = Vec::new();

    for seg in segments {
        if seg.is_content() {
            paragraph.push(seg);
            continue;
        }

        flush_paragraph(
            &mut paragraph,
            &mut scope,
            &mut output,
            &mut stats,
            options,
            threshold,
        );
        output.push(seg);
    }
    flush_paragraph(
        &mut paragraph,
        &mut scope,
        &mut output,
        &mut stats,
        options,
        threshold,
    );

    if stats.units_removed > 0 {
        info!(
            "Deduplication: removed {} of {} units (mode: {}, threshold: {:.2})",
            stats.units_removed, stats.units_in, options.mode, threshold
        );
    }

    (reassemble(&output), stats)
}

/// Dedupe one paragraph's content units into `output`.
fn flush_paragraph(
    paragraph: &mut Vec<Segment>,
    scope: &mut Vec<KeptUnit>,
    output: &mut Vec<Segment>,
    stats: &mut DedupeStats,
    options: &DedupeOptions,
    threshold: f64,
) {
    if paragraph.is_empty() {
        return;
    }

    // Safe mode never looks across paragraphs
    if options.mode == DedupeMode::Safe {
        scope.clear();
    }

    let units: Vec<Segment> = std::mem::take(paragraph);
    let mut keep = vec![false; units.len()];

    for (i, unit) in units.iter().enumerate() {
        let candidate = KeptUnit::from_segment(unit);

        let duplicate_of = match options.mode {
            DedupeMode::Safe => scope.last().and_then(|kept| {
                match_score(&candidate, kept, options.metric, threshold).map(|s| (kept, s))
            }),
            DedupeMode::Global => scope.iter().find_map(|kept| {
                match_score(&candidate, kept, options.metric, threshold).map(|s| (kept, s))
            }),
        };

        match duplicate_of {
            Some((kept, score)) => {
                debug!(
                    "Duplicate unit: '{}' similar to '{}' (similarity: {:.2})",
                    candidate.raw, kept.raw, score
                );
            }
            None => {
                keep[i] = true;
                scope.push(candidate);
            }
        }
    }

    // Every unit repeated earlier content; keep the first so the paragraph survives
    if !keep.iter().any(|k| *k) {
        debug!("Keeping first unit of fully duplicated paragraph");
        keep[0] = true;
        scope.push(KeptUnit::from_segment(&units[0]));
    }

    // Without the bullets in between, an unfinished sentence and the prose
    // after it would read back as one sentence; keep the last such bullet
    let mut open_ended = false;
    let mut dropped_bullet: Option<usize> = None;
    for (i, unit) in units.iter().enumerate() {
        if keep[i] {
            if open_ended && matches!(unit, Segment::Sentence { .. }) {
                if let Some(j) = dropped_bullet {
                    debug!("Keeping duplicate bullet that separates two prose runs");
                    keep[j] = true;
                }
            }
            open_ended = unit.is_open_ended();
            dropped_bullet = None;
        } else if matches!(unit, Segment::Bullet { .. }) {
            dropped_bullet = Some(i);
        }
    }

    // A dropped line opener hands its line break and indent to the next
    // surviving sentence
    let mut carried_indent: Option<String> = None;
    for (unit, kept) in units.into_iter().zip(keep) {
        if !kept {
            stats.units_removed += 1;
            if let Segment::Sentence {
                indent: Some(indent),
                ..
            } = unit
            {
                carried_indent = Some(indent);
            }
            continue;
        }

        match unit {
            Segment::Sentence { text, indent } => {
                output.push(Segment::Sentence {
                    text,
                    indent: indent.or(carried_indent.take()),
                });
            }
            other => output.push(other),
        }
        carried_indent = None;
    }
}
