//! Third pass: reassemble each track from the split segments that survive

use crate::{GpxDocument, SplitSegment};

/// Write the document with each track's segments replaced by its kept split segments
///
/// `segments` must be in document order, as produced by the splitting pass over this
/// document. Each split segment is emitted as a copy of its source `<trkseg>` start tag,
/// the source bytes of its points and the source segment's closing part. Each track
/// receives only its own segments; a track left without segments stays in the document.
/// Every byte outside the tracks' segment lists is copied unchanged.
pub(crate) fn rebuild<F>(document: &GpxDocument, segments: &[SplitSegment], keep: F) -> Vec<u8>
where
    F: Fn(usize) -> bool,
{
    let raw = document.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut cursor = 0;

    let mut kept = segments
        .iter()
        .enumerate()
        .filter(|&(index, _)| keep(index))
        .map(|(_, segment)| segment)
        .peekable();

    for (track_index, track) in document.layout().iter().enumerate() {
        let Some(span) = &track.span else {
            continue;
        };
        out.extend_from_slice(&raw[cursor..span.start]);

        while let Some(split) = kept.next_if(|split| split.track_index == track_index) {
            let source = &track.segments[split.segment_index];
            out.extend_from_slice(&raw[track.indent.clone()]);
            out.extend_from_slice(&raw[source.head.clone()]);
            for point in &source.points[split.point_range.clone()] {
                out.extend_from_slice(&raw[point.clone()]);
            }
            out.extend_from_slice(&raw[source.tail.clone()]);
        }

        cursor = span.end;
    }

    out.extend_from_slice(&raw[cursor..]);
    out
}
