//! Reading and writing GPX documents

use crate::{GpxDocument, Result};
use std::io::Read;
use std::path::Path;

/// Parse a GPX document from any reader, keeping its source bytes
pub fn read<R: Read>(mut reader: R) -> Result<GpxDocument> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    GpxDocument::parse(raw)
}

/// Load a GPX file from disk
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<GpxDocument> {
    #[cfg(feature = "profiling")]
    profiling::scope!("io::read_file");

    let raw = std::fs::read(path.as_ref())?;
    GpxDocument::parse(raw)
}

/// Serialize a model built in code to GPX 1.1 bytes
///
/// Models parsed from GPX 1.0 (or built without a version) are written as 1.1.
pub fn to_bytes(mut gpx: gpx::Gpx) -> Result<Vec<u8>> {
    if gpx.version != gpx::GpxVersion::Gpx11 {
        tracing::debug!(version = ?gpx.version, "Writing document as GPX 1.1");
        gpx.version = gpx::GpxVersion::Gpx11;
    }

    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;
    Ok(buffer)
}

/// Write redacted output to disk
///
/// The whole output is built in memory before the file is touched, so a failed run
/// never leaves a partial file behind.
pub fn write_file<P: AsRef<Path>>(bytes: &[u8], path: P) -> Result<()> {
    #[cfg(feature = "profiling")]
    profiling::scope!("io::write_file");

    std::fs::write(path.as_ref(), bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RedactConfig, RedactError, Redactor, Rectangle, RegionSet};

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="gpx-redact tests" xmlns="http://www.topografix.com/GPX/1/1">
  <wpt lat="1.0" lon="1.0"><name>Home</name></wpt>
  <trk>
    <name>Morning walk</name>
    <trkseg>
      <trkpt lat="0.0" lon="0.0090"><ele>12.5</ele><name>a</name></trkpt>
      <trkpt lat="0.0" lon="0.0095"><ele>13.0</ele><name>b</name></trkpt>
      <trkpt lat="0.0" lon="0.0105"><ele>14.0</ele><name>c</name></trkpt>
      <trkpt lat="0.0" lon="0.0120"><ele>15.5</ele><name>d</name></trkpt>
      <trkpt lat="0.0" lon="0.0125"><ele>16.0</ele><name>e</name></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    /// Garmin-style heart rate extensions with second-precision timestamps
    const WITH_EXTENSIONS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="gpx-redact tests" xmlns="http://www.topografix.com/GPX/1/1" xmlns:gpxtpx="http://www.garmin.com/xmlschemas/TrackPointExtension/v1">
  <trk>
    <trkseg>
      <trkpt lat="0.0" lon="0.0090">
        <time>2020-01-01T00:00:00Z</time>
        <extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>142</gpxtpx:hr></gpxtpx:TrackPointExtension></extensions>
      </trkpt>
      <trkpt lat="0.0" lon="0.0105">
        <time>2020-01-01T00:00:05Z</time>
        <extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>150</gpxtpx:hr></gpxtpx:TrackPointExtension></extensions>
      </trkpt>
      <trkpt lat="0.0" lon="0.0120">
        <time>2020-01-01T00:00:10Z</time>
        <extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>147</gpxtpx:hr></gpxtpx:TrackPointExtension></extensions>
      </trkpt>
    </trkseg>
  </trk>
</gpx>
"#;

    const GPX_10: &str = r#"<?xml version="1.0"?>
<gpx version="1.0" creator="gpx-redact tests" xmlns="http://www.topografix.com/GPX/1/0">
  <trk>
    <trkseg>
      <trkpt lat="0.0" lon="0.0090"><time>2020-01-01T00:00:00Z</time></trkpt>
    </trkseg>
  </trk>
</gpx>
"#;

    fn small_rectangle() -> RegionSet {
        let mut regions = RegionSet::new();
        regions.push(Rectangle::new(-0.0005, 0.0100, 0.0005, 0.0110).unwrap());
        regions
    }

    #[test]
    fn test_read_sample() {
        let document = read(SAMPLE.as_bytes()).unwrap();
        let gpx = document.gpx();
        assert_eq!(gpx.tracks.len(), 1);
        assert_eq!(gpx.tracks[0].segments[0].points.len(), 5);
        assert_eq!(gpx.waypoints.len(), 1);
    }

    #[test]
    fn test_read_malformed_fails() {
        assert!(read("<gpx><trk><trkseg>".as_bytes()).is_err());
        assert!(read("not xml at all".as_bytes()).is_err());
    }

    #[test]
    fn test_read_missing_file_fails() {
        let result = read_file("/nonexistent/dir/track.gpx");
        assert!(matches!(result, Err(RedactError::Io(_))));
    }

    #[test]
    fn test_missing_coordinate_is_located() {
        let source = SAMPLE.replace(r#"<trkpt lat="0.0" lon="0.0105">"#, r#"<trkpt lon="2.0">"#);
        let err = read(source.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            RedactError::MalformedPoint {
                track: 0,
                segment: 0,
                point: 2,
                ..
            }
        ));
        assert!(err.to_string().contains("track 0, segment 0, point 2"));
    }

    #[test]
    fn test_noop_redaction_is_byte_identical() {
        let document = read(WITH_EXTENSIONS.as_bytes()).unwrap();
        let redaction = Redactor::new(RegionSet::new(), RedactConfig::default())
            .redact(&document)
            .unwrap();
        assert_eq!(redaction.bytes, WITH_EXTENSIONS.as_bytes());

        let document = read(GPX_10.as_bytes()).unwrap();
        let redaction = Redactor::new(small_rectangle(), RedactConfig::default())
            .redact(&document)
            .unwrap();
        assert_eq!(String::from_utf8(redaction.bytes).unwrap(), GPX_10);
    }

    #[test]
    fn test_redaction_keeps_extensions_of_retained_points() {
        let document = read(WITH_EXTENSIONS.as_bytes()).unwrap();
        let redaction = Redactor::new(small_rectangle(), RedactConfig::default())
            .redact(&document)
            .unwrap();
        assert_eq!(redaction.stats.total_removed, 1);

        let text = String::from_utf8(redaction.bytes.clone()).unwrap();
        assert!(text.contains("<gpxtpx:hr>142</gpxtpx:hr>"));
        assert!(text.contains("<gpxtpx:hr>147</gpxtpx:hr>"));
        assert!(!text.contains("<gpxtpx:hr>150</gpxtpx:hr>"));
        assert!(text.contains("<time>2020-01-01T00:00:00Z</time>"));
        assert!(!text.contains("00:00:05"));

        let gpx = redaction.document().unwrap().into_gpx();
        assert_eq!(gpx.tracks[0].segments.len(), 2);
    }

    #[test]
    fn test_redacted_output_preserves_point_data() {
        let document = read(SAMPLE.as_bytes()).unwrap();
        let redaction = Redactor::new(small_rectangle(), RedactConfig::default())
            .redact(&document)
            .unwrap();

        let text = String::from_utf8(redaction.bytes.clone()).unwrap();
        assert!(text.contains(r#"<wpt lat="1.0" lon="1.0"><name>Home</name></wpt>"#));
        assert!(text.contains(r#"<trkpt lat="0.0" lon="0.0120"><ele>15.5</ele><name>d</name></trkpt>"#));

        let reread = redaction.document().unwrap().into_gpx();
        let track = &reread.tracks[0];
        assert_eq!(track.name.as_deref(), Some("Morning walk"));
        assert_eq!(track.segments.len(), 2);

        let names: Vec<_> = track
            .segments
            .iter()
            .flat_map(|s| &s.points)
            .map(|p| p.name.clone().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["a", "b", "d", "e"]);
        assert_eq!(track.segments[1].points[0].elevation, Some(15.5));
    }

    #[test]
    fn test_write_file_round_trip() {
        let path = std::env::temp_dir().join(format!("gpx-redact-io-{}.gpx", std::process::id()));
        write_file(SAMPLE.as_bytes(), &path).unwrap();
        let document = read_file(&path).unwrap();
        assert_eq!(document.as_bytes(), SAMPLE.as_bytes());
        let _ = std::fs::remove_file(&path);
    }
}
