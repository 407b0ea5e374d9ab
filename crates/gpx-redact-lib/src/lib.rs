//! GPX Redact Library - Privacy Redaction for GPS Tracks
//!
//! This library removes recorded points that fall inside user-specified removal regions
//! (rectangles and circles) and trims the short "stray" fragments left near the edge of
//! those regions, which are usually artifacts of entering or leaving the redacted zone.
//!
//! # Architecture
//!
//! - **[`utils`]**: Great-circle distance and shape containment predicates
//! - **[`RegionSet`]**: Ordered removal regions with strict and vicinity-expanded tests
//! - **[`Segmenter`]**: Removes points inside regions and splits segments at the gaps
//! - **[`StrayClassifier`]**: Flags short split segments lying near a region
//! - **[`Redactor`]**: Runs the three passes and rebuilds the output document
//! - **[`GpxDocument`]**: Source bytes plus parsed model; output is spliced from the
//!   source so everything outside the removed points is copied byte for byte
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use gpx_redact_lib::{Circle, RedactConfig, Redactor, RegionSet, io};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut regions = RegionSet::new();
//! regions.push(Circle::new(51.5074, -0.1278, 150.0)?);
//!
//! let redactor = Redactor::new(regions, RedactConfig::default());
//! let document = io::read_file("walk.gpx")?;
//! let redaction = redactor.redact(&document)?;
//! io::write_file(&redaction.bytes, "walk-redacted.gpx")?;
//! println!("Removed {} points", redaction.stats.total_removed);
//! # Ok(())
//! # }
//! ```
//!
//! # Performance Characteristics
//!
//! - **Segmenting**: O(N×R) for N points and R regions
//! - **Classification**: O(S×R) segments, each scanned only while no point matched
//! - **Memory**: split segments are index ranges into the input, O(S) on top of the document

mod document;
pub mod io;
mod pipeline;
mod rebuild;
mod region;
mod segmenter;
mod stats;
mod stray;
pub mod utils;

// Public API exports
pub use document::GpxDocument;
pub use pipeline::{RedactConfig, Redaction, Redactor};
pub use region::{Circle, Rectangle, Region, RegionKind, RegionMatches, RegionSet};
pub use segmenter::{SegmentedDocument, Segmenter, SplitSegment};
pub use stats::{LengthSummary, RegionReport, RemovalStats};
pub use stray::{StrayClassification, StrayClassifier};

/// Error types for the redaction library
#[derive(Debug, thiserror::Error)]
pub enum RedactError {
    #[error("GPX error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error(
        "Invalid coordinate in track {track}, segment {segment}, point {point}: ({lat}, {lon})"
    )]
    InvalidCoordinate {
        track: usize,
        segment: usize,
        point: usize,
        lat: f64,
        lon: f64,
    },

    #[error("XML error at byte {position}: {message}")]
    Xml { position: usize, message: String },

    #[error("Malformed point in track {track}, segment {segment}, point {point}: {reason}")]
    MalformedPoint {
        track: usize,
        segment: usize,
        point: usize,
        reason: String,
    },

    #[error("Unsupported GPX structure: {0}")]
    UnsupportedLayout(String),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RedactError>;
