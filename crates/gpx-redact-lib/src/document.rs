//! GPX source text paired with its parsed model and the byte layout of its tracks
//!
//! The `gpx` model is what the redaction passes read. Output is spliced from the source
//! bytes instead of re-serialized from the model, so point extensions, original number
//! and time formatting, comments and anything else the model does not capture survive.

use crate::{RedactError, Result, utils};
use gpx::Gpx;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::ops::Range;

/// Byte spans of one `<trkseg>` element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SegmentLayout {
    /// The `<trkseg>` start tag
    pub head: Range<usize>,
    /// Each `<trkpt>` element, including the text between it and its predecessor
    pub points: Vec<Range<usize>>,
    /// Everything after the last point up to and including `</trkseg>`
    pub tail: Range<usize>,
}

/// Byte spans of the segments of one `<trk>` element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TrackLayout {
    /// From the whitespace before the first `<trkseg>` to the end of the last one
    pub span: Option<Range<usize>>,
    /// Whitespace preceding the first `<trkseg>`, repeated before every rebuilt segment
    pub indent: Range<usize>,
    pub segments: Vec<SegmentLayout>,
}

/// A parsed GPX document that remembers where its track points live in the source
#[derive(Debug, Clone)]
pub struct GpxDocument {
    raw: Vec<u8>,
    gpx: Gpx,
    layout: Vec<TrackLayout>,
}

impl GpxDocument {
    /// Parse GPX source bytes
    ///
    /// Every `<trkpt>` is checked for usable `lat`/`lon` attributes first, so a bad point
    /// is reported with its track, segment and point index.
    pub fn parse(raw: Vec<u8>) -> Result<Self> {
        #[cfg(feature = "profiling")]
        profiling::scope!("document::parse");

        let layout = scan_layout(&raw)?;
        let gpx = gpx::read(raw.as_slice())?;
        check_layout(&gpx, &layout)?;

        tracing::debug!(
            tracks = layout.len(),
            bytes = raw.len(),
            "Parsed GPX document"
        );
        Ok(Self { raw, gpx, layout })
    }

    /// Serialize a model built in code and parse it back
    pub fn from_gpx(gpx: Gpx) -> Result<Self> {
        Self::parse(crate::io::to_bytes(gpx)?)
    }

    #[inline]
    pub fn gpx(&self) -> &Gpx {
        &self.gpx
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_gpx(self) -> Gpx {
        self.gpx
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.raw
    }

    #[inline]
    pub(crate) fn layout(&self) -> &[TrackLayout] {
        &self.layout
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Node {
    Root,
    Track,
    Segment,
    Point,
    Other,
}

impl Node {
    fn classify(parent: Option<Node>, name: &[u8]) -> Node {
        match (parent, name) {
            (None, b"gpx") => Node::Root,
            (Some(Node::Root), b"trk") => Node::Track,
            (Some(Node::Track), b"trkseg") => Node::Segment,
            (Some(Node::Segment), b"trkpt") => Node::Point,
            _ => Node::Other,
        }
    }
}

/// Accumulates track layouts while the reader walks the source
struct LayoutBuilder<'a> {
    raw: &'a [u8],
    tracks: Vec<TrackLayout>,
    /// End of the last point, or of the current segment's start tag
    cursor: usize,
}

impl LayoutBuilder<'_> {
    fn open(&mut self, node: Node, tag: &BytesStart<'_>, span: Range<usize>) -> Result<()> {
        match node {
            Node::Track => self.tracks.push(TrackLayout::default()),
            Node::Segment => {
                if let Some(track) = self.tracks.last_mut() {
                    if track.span.is_none() {
                        let indent = trailing_whitespace(&self.raw[..span.start]);
                        track.indent = span.start - indent..span.start;
                        track.span = Some(track.indent.clone());
                    }
                    track.segments.push(SegmentLayout {
                        head: span.clone(),
                        points: Vec::new(),
                        tail: span.end..span.end,
                    });
                }
                self.cursor = span.end;
            }
            Node::Point => {
                let track = self.tracks.len().saturating_sub(1);
                let (segment, point) = self
                    .tracks
                    .last()
                    .and_then(|t| {
                        let segment = t.segments.last()?;
                        Some((t.segments.len() - 1, segment.points.len()))
                    })
                    .unwrap_or_default();
                check_point(tag, track, segment, point)?;
            }
            Node::Root | Node::Other => {}
        }
        Ok(())
    }

    fn close(&mut self, node: Node, end: usize) {
        let Some(track) = self.tracks.last_mut() else {
            return;
        };
        match node {
            Node::Point => {
                if let Some(segment) = track.segments.last_mut() {
                    segment.points.push(self.cursor..end);
                }
                self.cursor = end;
            }
            Node::Segment => {
                if let Some(segment) = track.segments.last_mut() {
                    segment.tail = self.cursor..end;
                }
                if let Some(span) = &mut track.span {
                    span.end = end;
                }
            }
            Node::Root | Node::Track | Node::Other => {}
        }
    }
}

fn scan_layout(raw: &[u8]) -> Result<Vec<TrackLayout>> {
    let mut reader = Reader::from_reader(raw);
    let mut builder = LayoutBuilder {
        raw,
        tracks: Vec::new(),
        cursor: 0,
    };
    let mut stack: Vec<Node> = Vec::new();

    loop {
        let start = reader.buffer_position() as usize;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(RedactError::Xml {
                    position: reader.error_position() as usize,
                    message: e.to_string(),
                });
            }
        };
        let end = reader.buffer_position() as usize;

        match event {
            Event::Start(tag) => {
                let node = Node::classify(stack.last().copied(), tag.local_name().as_ref());
                builder.open(node, &tag, start..end)?;
                stack.push(node);
            }
            Event::Empty(tag) => {
                let node = Node::classify(stack.last().copied(), tag.local_name().as_ref());
                builder.open(node, &tag, start..end)?;
                builder.close(node, end);
            }
            Event::End(_) => {
                if let Some(node) = stack.pop() {
                    builder.close(node, end);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(RedactError::Xml {
            position: raw.len(),
            message: format!("{} unclosed element(s) at end of input", stack.len()),
        });
    }
    Ok(builder.tracks)
}

fn trailing_whitespace(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .rev()
        .take_while(|b| b.is_ascii_whitespace())
        .count()
}

/// Validate a `<trkpt>` start tag's coordinates
fn check_point(tag: &BytesStart<'_>, track: usize, segment: usize, point: usize) -> Result<()> {
    let malformed = |reason: String| RedactError::MalformedPoint {
        track,
        segment,
        point,
        reason,
    };

    let mut lat = None;
    let mut lon = None;
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| malformed(e.to_string()))?;
        let slot = match attr.key.local_name().as_ref() {
            b"lat" => &mut lat,
            b"lon" => &mut lon,
            _ => continue,
        };
        let text = std::str::from_utf8(&attr.value).map_err(|e| malformed(e.to_string()))?;
        let value = text
            .trim()
            .parse::<f64>()
            .map_err(|_| malformed(format!("`{text}` is not a number")))?;
        *slot = Some(value);
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) if utils::is_valid_coordinate(lat, lon) => Ok(()),
        (Some(lat), Some(lon)) => Err(RedactError::InvalidCoordinate {
            track,
            segment,
            point,
            lat,
            lon,
        }),
        (None, _) => Err(malformed("missing `lat` attribute".to_string())),
        (_, None) => Err(malformed("missing `lon` attribute".to_string())),
    }
}

/// The byte layout must describe exactly the tracks the model holds
fn check_layout(gpx: &Gpx, layout: &[TrackLayout]) -> Result<()> {
    if gpx.tracks.len() != layout.len() {
        return Err(RedactError::UnsupportedLayout(format!(
            "found {} <trk> elements but {} tracks were parsed",
            layout.len(),
            gpx.tracks.len()
        )));
    }

    for (track_index, (track, track_layout)) in gpx.tracks.iter().zip(layout).enumerate() {
        if track.segments.len() != track_layout.segments.len() {
            return Err(RedactError::UnsupportedLayout(format!(
                "track {track_index} has {} <trkseg> elements but {} segments were parsed",
                track_layout.segments.len(),
                track.segments.len()
            )));
        }
        for (segment_index, (segment, segment_layout)) in
            track.segments.iter().zip(&track_layout.segments).enumerate()
        {
            if segment.points.len() != segment_layout.points.len() {
                return Err(RedactError::UnsupportedLayout(format!(
                    "track {track_index}, segment {segment_index} has {} <trkpt> elements \
                     but {} points were parsed",
                    segment_layout.points.len(),
                    segment.points.len()
                )));
            }
        }
    }
    Ok(())
}
