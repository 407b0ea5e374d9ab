//! Diagnostics produced by a redaction run

use crate::{RegionKind, SegmentedDocument, StrayClassification};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Count, min, max and average of a non-empty list of segment lengths (meters)
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LengthSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

impl LengthSummary {
    /// Summarize lengths, or `None` when there are none
    pub fn from_lengths(lengths: &[f64]) -> Option<Self> {
        if lengths.is_empty() {
            return None;
        }

        let min = lengths.iter().copied().fold(f64::INFINITY, f64::min);
        let max = lengths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let sum: f64 = lengths.iter().sum();

        Some(Self {
            count: lengths.len(),
            min,
            max,
            average: sum / lengths.len() as f64,
        })
    }
}

/// Per-region diagnostics
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionReport {
    pub kind: RegionKind,
    /// 1-based position among regions of the same kind
    pub number: usize,
    pub points_removed: usize,
    /// Lengths of the stray segments found near this region
    pub stray_lengths: Vec<f64>,
    /// Summary of `stray_lengths`, `None` when no stray segment was found
    pub stray_summary: Option<LengthSummary>,
}

impl RegionReport {
    fn new(kind: RegionKind, index: usize, points_removed: usize, stray_lengths: Vec<f64>) -> Self {
        let stray_summary = LengthSummary::from_lengths(&stray_lengths);
        Self {
            kind,
            number: index + 1,
            points_removed,
            stray_lengths,
            stray_summary,
        }
    }
}

/// Counts and length statistics of one redaction run
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RemovalStats {
    /// Points removed across the document, each counted once
    pub total_removed: usize,
    /// Points removed per track
    pub track_removed: Vec<usize>,
    /// Rectangles first, then circles, each in declaration order
    pub regions: Vec<RegionReport>,
    /// Segments left after splitting, before stray removal
    pub split_segments: usize,
    /// Segments flagged stray by at least one region
    pub stray_segments: usize,
    /// Length threshold used for stray classification
    pub max_stray_length: f64,
    /// Whether stray segments were dropped from the output
    pub stray_removed: bool,
}

impl RemovalStats {
    pub(crate) fn new(
        doc: &SegmentedDocument,
        classification: StrayClassification,
        max_stray_length: f64,
        stray_removed: bool,
    ) -> Self {
        let StrayClassification {
            rectangle_lengths,
            circle_lengths,
            stray,
        } = classification;

        let rectangles = doc
            .rectangle_removed
            .iter()
            .zip(rectangle_lengths)
            .enumerate()
            .map(|(index, (&removed, lengths))| {
                RegionReport::new(RegionKind::Rectangle, index, removed, lengths)
            });
        let circles = doc
            .circle_removed
            .iter()
            .zip(circle_lengths)
            .enumerate()
            .map(|(index, (&removed, lengths))| {
                RegionReport::new(RegionKind::Circle, index, removed, lengths)
            });

        Self {
            total_removed: doc.total_removed,
            track_removed: doc.track_removed.clone(),
            regions: rectangles.chain(circles).collect(),
            split_segments: doc.segments.len(),
            stray_segments: stray.len(),
            max_stray_length,
            stray_removed,
        }
    }

    /// Reports for one kind of region, in declaration order
    pub fn regions_of(&self, kind: RegionKind) -> impl Iterator<Item = &RegionReport> {
        self.regions.iter().filter(move |report| report.kind == kind)
    }

    /// Number of segments written to the output
    pub fn output_segments(&self) -> usize {
        if self.stray_removed {
            self.split_segments - self.stray_segments
        } else {
            self.split_segments
        }
    }
}
