//! Second pass: flag short split segments lying in the vicinity of a removal region

use crate::{RegionSet, SplitSegment, utils};
use std::collections::BTreeSet;

/// Stray segments found per region, plus the global set of stray segment indices
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrayClassification {
    /// Lengths in meters of the stray segments near each rectangle
    pub rectangle_lengths: Vec<Vec<f64>>,
    /// Lengths in meters of the stray segments near each circle
    pub circle_lengths: Vec<Vec<f64>>,
    /// Indices (into the split segment list) flagged by at least one region
    pub stray: BTreeSet<usize>,
}

impl StrayClassification {
    #[inline]
    pub fn is_stray(&self, segment_index: usize) -> bool {
        self.stray.contains(&segment_index)
    }
}

/// Flags split segments that are short and have any point near a region
pub struct StrayClassifier<'r> {
    regions: &'r RegionSet,
    max_stray_length: f64,
    vicinity: Option<f64>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<'r> StrayClassifier<'r> {
    /// `vicinity` overrides every region's default buffer when set
    pub fn new(regions: &'r RegionSet, max_stray_length: f64, vicinity: Option<f64>) -> Self {
        Self {
            regions,
            max_stray_length,
            vicinity,
        }
    }

    /// Classify the split segments of `gpx`, identified by their position in `segments`
    pub fn classify(&self, gpx: &gpx::Gpx, segments: &[SplitSegment]) -> StrayClassification {
        #[cfg(feature = "profiling")]
        profiling::scope!("stray::classify");

        let mut result = StrayClassification {
            rectangle_lengths: vec![Vec::new(); self.regions.rectangles().len()],
            circle_lengths: vec![Vec::new(); self.regions.circles().len()],
            stray: BTreeSet::new(),
        };

        for (segment_index, segment) in segments.iter().enumerate() {
            let points = segment.points(gpx);
            let length = utils::path_length(points.iter().map(|waypoint| waypoint.point()));
            if length > self.max_stray_length {
                continue;
            }

            // Any single point near the region is enough
            for (rect, lengths) in self
                .regions
                .rectangles()
                .iter()
                .zip(result.rectangle_lengths.iter_mut())
            {
                if points
                    .iter()
                    .any(|waypoint| rect.contains_expanded(waypoint.point(), self.vicinity))
                {
                    lengths.push(length);
                    result.stray.insert(segment_index);
                }
            }

            for (circle, lengths) in self
                .regions
                .circles()
                .iter()
                .zip(result.circle_lengths.iter_mut())
            {
                if points
                    .iter()
                    .any(|waypoint| circle.contains_expanded(waypoint.point(), self.vicinity))
                {
                    lengths.push(length);
                    result.stray.insert(segment_index);
                }
            }

            if result.is_stray(segment_index) {
                tracing::trace!(segment_index, length, "Stray segment");
            }
        }

        tracing::debug!(
            stray = result.stray.len(),
            segments = segments.len(),
            "Stray classification complete"
        );
        result
    }
}
