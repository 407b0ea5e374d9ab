//! Redactor - Runs the split, classify and rebuild passes over a GPX document
//!
//! The passes run strictly in sequence over the whole document: stray classification
//! works on the split segments of every track, and the rebuild needs its verdicts.

use crate::{
    GpxDocument, RedactError, RegionSet, RemovalStats, Result, SegmentedDocument, Segmenter,
    StrayClassification, StrayClassifier, rebuild::rebuild,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for stray segment handling
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RedactConfig {
    /// Segments at most this long (meters) may be classified as stray.
    /// Default: 10.0
    pub max_stray_length: f64,
    /// Vicinity buffer (meters) applied to every region for stray detection.
    /// When `None`, circles use their radius and rectangles half their smaller side.
    pub max_stray_vicinity: Option<f64>,
    /// Drop stray segments from the output instead of only reporting them
    pub remove_stray: bool,
}

impl Default for RedactConfig {
    fn default() -> Self {
        Self {
            max_stray_length: 10.0,
            max_stray_vicinity: None,
            remove_stray: false,
        }
    }
}

impl RedactConfig {
    /// Check that the thresholds are usable distances
    pub fn validate(&self) -> Result<()> {
        if !self.max_stray_length.is_finite() || self.max_stray_length < 0.0 {
            return Err(RedactError::InvalidConfig(format!(
                "max stray length {} must be a non-negative number of meters",
                self.max_stray_length
            )));
        }
        if let Some(vicinity) = self.max_stray_vicinity {
            if !vicinity.is_finite() || vicinity < 0.0 {
                return Err(RedactError::InvalidConfig(format!(
                    "max stray vicinity {vicinity} must be a non-negative number of meters"
                )));
            }
        }
        Ok(())
    }
}

/// Output document bytes together with the run's diagnostics
#[derive(Debug, Clone)]
pub struct Redaction {
    pub bytes: Vec<u8>,
    pub stats: RemovalStats,
}

impl Redaction {
    /// Parse the output back into a document
    pub fn document(&self) -> Result<GpxDocument> {
        GpxDocument::parse(self.bytes.clone())
    }
}

/// Removes points inside the configured regions and trims stray segments
#[derive(Debug, Clone)]
pub struct Redactor {
    regions: RegionSet,
    config: RedactConfig,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Redactor {
    pub fn new(regions: RegionSet, config: RedactConfig) -> Self {
        Self { regions, config }
    }

    #[inline]
    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }

    #[inline]
    pub fn config(&self) -> &RedactConfig {
        &self.config
    }

    /// Run the split and classification passes without building an output document
    pub fn inspect(&self, gpx: &gpx::Gpx) -> Result<RemovalStats> {
        let (doc, classification) = self.analyze(gpx)?;
        Ok(RemovalStats::new(
            &doc,
            classification,
            self.config.max_stray_length,
            self.config.remove_stray,
        ))
    }

    /// Redact the document
    ///
    /// Retained points are copied from the source bytes unchanged, extensions included.
    /// Metadata, waypoints, routes and track fields outside the segments pass through
    /// byte for byte.
    pub fn redact(&self, document: &GpxDocument) -> Result<Redaction> {
        #[cfg(feature = "profiling")]
        profiling::scope!("redactor::redact");

        let (doc, classification) = self.analyze(document.gpx())?;

        let bytes = if self.config.remove_stray {
            tracing::debug!(
                count = classification.stray.len(),
                "Removing stray segments within vicinity"
            );
            rebuild(document, &doc.segments, |index| !classification.is_stray(index))
        } else {
            rebuild(document, &doc.segments, |_| true)
        };

        let stats = RemovalStats::new(
            &doc,
            classification,
            self.config.max_stray_length,
            self.config.remove_stray,
        );
        Ok(Redaction { bytes, stats })
    }

    fn analyze(&self, gpx: &gpx::Gpx) -> Result<(SegmentedDocument, StrayClassification)> {
        self.config.validate()?;

        if self.regions.is_empty() {
            tracing::debug!("No removal regions configured, output mirrors input");
        }

        let doc = Segmenter::new(&self.regions).split(gpx)?;
        let classification = StrayClassifier::new(
            &self.regions,
            self.config.max_stray_length,
            self.config.max_stray_vicinity,
        )
        .classify(gpx, &doc.segments);

        Ok((doc, classification))
    }
}
