//! First pass: drop points inside removal regions and split segments at the gaps
//!
//! Split segments reference the source document by index, so nothing is copied until
//! the output is rebuilt.

use crate::{RedactError, RegionMatches, RegionSet, Result, utils};
use std::ops::Range;

/// A run of consecutive retained points inside one source segment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitSegment {
    /// Index of the track in the document
    pub track_index: usize,
    /// Index of the segment in the source track
    pub segment_index: usize,
    /// Range of retained points in the source segment
    pub point_range: Range<usize>,
}

impl SplitSegment {
    /// Get the retained waypoints of this segment from the source document
    pub fn points<'a>(&self, gpx: &'a gpx::Gpx) -> &'a [gpx::Waypoint] {
        gpx.tracks
            .get(self.track_index)
            .and_then(|track| track.segments.get(self.segment_index))
            .and_then(|segment| segment.points.get(self.point_range.clone()))
            .unwrap_or(&[])
    }

    /// Number of retained points
    pub fn len(&self) -> usize {
        self.point_range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point_range.is_empty()
    }
}

/// Result of the splitting pass over a whole document
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentedDocument {
    /// Split segments of all tracks, in document order
    pub segments: Vec<SplitSegment>,
    /// Points removed in total (each point counted once)
    pub total_removed: usize,
    /// Points removed per rectangle (a point inside several regions counts for each)
    pub rectangle_removed: Vec<usize>,
    /// Points removed per circle
    pub circle_removed: Vec<usize>,
    /// Points removed per track
    pub track_removed: Vec<usize>,
}

/// Fold state for one splitting pass
struct SplitState {
    doc: SegmentedDocument,
    track_index: usize,
    segment_index: usize,
    run_start: Option<usize>,
}

impl SplitState {
    fn new(regions: &RegionSet, track_count: usize) -> Self {
        Self {
            doc: SegmentedDocument {
                segments: Vec::new(),
                total_removed: 0,
                rectangle_removed: vec![0; regions.rectangles().len()],
                circle_removed: vec![0; regions.circles().len()],
                track_removed: vec![0; track_count],
            },
            track_index: 0,
            segment_index: 0,
            run_start: None,
        }
    }

    fn begin_segment(&mut self, track_index: usize, segment_index: usize) {
        self.track_index = track_index;
        self.segment_index = segment_index;
        self.run_start = None;
    }

    fn retain(&mut self, point_index: usize) {
        self.run_start.get_or_insert(point_index);
    }

    fn remove(&mut self, point_index: usize, matches: &RegionMatches) {
        for &index in &matches.rectangles {
            self.doc.rectangle_removed[index] += 1;
        }
        for &index in &matches.circles {
            self.doc.circle_removed[index] += 1;
        }
        self.doc.total_removed += 1;
        self.doc.track_removed[self.track_index] += 1;
        self.close_run(point_index);
    }

    /// Close the current run (if any) just before `end`
    fn close_run(&mut self, end: usize) {
        if let Some(start) = self.run_start.take() {
            self.doc.segments.push(SplitSegment {
                track_index: self.track_index,
                segment_index: self.segment_index,
                point_range: start..end,
            });
        }
    }
}

/// Removes points strictly inside any region, splitting segments where points were dropped
pub struct Segmenter<'r> {
    regions: &'r RegionSet,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<'r> Segmenter<'r> {
    pub fn new(regions: &'r RegionSet) -> Self {
        Self { regions }
    }

    /// Split every segment of every track in the document
    ///
    /// Fails on the first point with an invalid coordinate.
    pub fn split(&self, gpx: &gpx::Gpx) -> Result<SegmentedDocument> {
        #[cfg(feature = "profiling")]
        profiling::scope!("segmenter::split");

        let mut state = SplitState::new(self.regions, gpx.tracks.len());

        for (track_index, track) in gpx.tracks.iter().enumerate() {
            for (segment_index, segment) in track.segments.iter().enumerate() {
                state.begin_segment(track_index, segment_index);

                state = segment.points.iter().enumerate().try_fold(
                    state,
                    |mut state, (point_index, waypoint)| -> Result<SplitState> {
                        let point = waypoint.point();
                        if !utils::is_valid_coordinate(point.y(), point.x()) {
                            return Err(RedactError::InvalidCoordinate {
                                track: track_index,
                                segment: segment_index,
                                point: point_index,
                                lat: point.y(),
                                lon: point.x(),
                            });
                        }

                        let matches = self.regions.strict_matches(point);
                        if matches.is_empty() {
                            state.retain(point_index);
                        } else {
                            tracing::trace!(
                                track_index,
                                segment_index,
                                point_index,
                                "Removing point inside region"
                            );
                            state.remove(point_index, &matches);
                        }
                        Ok(state)
                    },
                )?;

                state.close_run(segment.points.len());
            }
        }

        let doc = state.doc;
        tracing::debug!(
            removed = doc.total_removed,
            segments = doc.segments.len(),
            "Split pass complete"
        );
        Ok(doc)
    }
}
