use std::collections::BTreeSet;
use std::fmt;

use bytes::Bytes;

use crate::codec::{frame_9x, Frame};
use crate::error::Result;
use crate::hex;
use crate::marker::{DelayMarker, MarkerTable};

/// A 9X command body with its delay marker removed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalCommand {
    body: Bytes,
}

impl CanonicalCommand {
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self { body: body.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Re-encode the body as a delay-free 9X frame.
    pub fn encode(&self) -> Result<Frame> {
        frame_9x(&self.body)
    }
}

impl fmt::Display for CanonicalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::format_hex(&self.body))
    }
}

/// Distinct 55 frames. Canonicalization is the identity.
pub fn dedup_55<'a, I>(frames: I) -> BTreeSet<Frame>
where
    I: IntoIterator<Item = &'a Frame>,
{
    frames.into_iter().cloned().collect()
}

/// Folds 9X frames that differ only by their delay marker.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    markers: MarkerTable,
}

impl Deduplicator {
    pub fn new(markers: MarkerTable) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &MarkerTable {
        &self.markers
    }

    /// Split a validated 9X frame into its delay marker and canonical body.
    ///
    /// Returns `None` when the payload carries no marker, or when stripping the
    /// marker would leave no body.
    pub fn strip_marker(&self, frame: &Frame) -> Option<(DelayMarker, CanonicalCommand)> {
        let bytes = frame.as_bytes();
        // [length code] payload.. [crc]
        let payload = bytes.get(1..bytes.len().checked_sub(1)?)?;
        let marker = self.markers.detect(*payload.first()?)?;
        let body = payload.get(marker.width()..)?;
        if body.is_empty() {
            return None;
        }
        Some((marker, CanonicalCommand::new(Bytes::copy_from_slice(body))))
    }

    /// Distinct delay-free 9X frames.
    ///
    /// Unmarked frames are kept as recorded. Marked frames contribute their
    /// canonical body, and every distinct body is re-encoded once.
    pub fn dedup_9x<'a, I>(&self, frames: I) -> BTreeSet<Frame>
    where
        I: IntoIterator<Item = &'a Frame>,
    {
        let mut unique = BTreeSet::new();
        let mut delayed = BTreeSet::new();
        let mut seen = 0usize;

        for frame in frames {
            seen += 1;
            match self.strip_marker(frame) {
                Some((_, body)) => {
                    delayed.insert(body);
                }
                None => {
                    unique.insert(frame.clone());
                }
            }
        }

        let delayed_bodies = delayed.len();
        for body in delayed {
            match body.encode() {
                Ok(frame) => {
                    unique.insert(frame);
                }
                Err(err) => {
                    tracing::warn!(body = %body, error = %err, "dropping unencodable 9X body");
                }
            }
        }

        tracing::debug!(
            frames = seen,
            delayed_bodies,
            unique = unique.len(),
            "folded 9X delay markers"
        );
        unique
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(lines: &[&str]) -> Vec<Frame> {
        lines.iter().map(|l| Frame::parse(l).unwrap()).collect()
    }

    fn texts(set: &BTreeSet<Frame>) -> Vec<String> {
        set.iter().map(Frame::to_hex).collect()
    }

    #[test]
    fn standard_marker_folds_into_unmarked_frame() {
        let input = frames(&["93 FB 01 02 03 C4", "92 01 02 03 3E"]);
        let out = Deduplicator::default().dedup_9x(&input);
        assert_eq!(texts(&out), vec!["92 01 02 03 3E"]);
    }

    #[test]
    fn all_marker_shapes_converge() {
        let input = frames(&[
            "93 FB 01 02 03 C4",
            "93 F1 01 02 03 DF",
            "93 20 01 02 03 51",
            "94 0C 7E 01 02 03 29",
            "92 01 02 03 3E",
        ]);
        let out = Deduplicator::default().dedup_9x(&input);
        assert_eq!(texts(&out), vec!["92 01 02 03 3E"]);
    }

    #[test]
    fn marked_frames_alone_are_reencoded() {
        let input = frames(&["93 FB 0E 04 22 4C", "93 FB 0E 04 22 4C"]);
        let out = Deduplicator::default().dedup_9x(&input);
        assert_eq!(texts(&out), vec!["92 0E 04 22 B6"]);
    }

    #[test]
    fn distinct_bodies_stay_distinct() {
        let input = frames(&["93 FB 01 02 03 C4", "93 FB 0E 04 22 4C", "92 01 02 03 3E"]);
        let out = Deduplicator::default().dedup_9x(&input);
        assert_eq!(texts(&out), vec!["92 01 02 03 3E", "92 0E 04 22 B6"]);
    }

    #[test]
    fn marker_table_is_injected() {
        let input = frames(&["93 FF 01 02 03 CA", "92 01 02 03 3E"]);

        let standard = Deduplicator::default().dedup_9x(&input);
        assert_eq!(standard.len(), 2);

        let wide = Deduplicator::new(MarkerTable::wide()).dedup_9x(&input);
        assert_eq!(texts(&wide), vec!["92 01 02 03 3E"]);
    }

    #[test]
    fn strip_marker_reports_shape_and_body() {
        let dedup = Deduplicator::default();

        let (marker, body) = dedup
            .strip_marker(&Frame::parse("94 0C 7E 01 02 03 29").unwrap())
            .unwrap();
        assert_eq!(marker, DelayMarker::Extended(0x0C));
        assert_eq!(body.as_bytes(), &[0x01, 0x02, 0x03]);

        let (marker, body) = dedup
            .strip_marker(&Frame::parse("93 20 01 02 03 51").unwrap())
            .unwrap();
        assert_eq!(marker, DelayMarker::Standard(0x20));
        assert_eq!(body.to_string(), "01 02 03");

        assert!(dedup
            .strip_marker(&Frame::parse("92 01 02 03 3E").unwrap())
            .is_none());
    }

    #[test]
    fn marker_without_body_is_not_stripped() {
        let dedup = Deduplicator::default();
        assert!(dedup.strip_marker(&Frame::parse("91 0C 7E 00").unwrap()).is_none());
        assert!(dedup.strip_marker(&Frame::parse("90 FB 00").unwrap()).is_none());
        assert!(dedup.strip_marker(&Frame::parse("90").unwrap()).is_none());
    }

    #[test]
    fn dedup_9x_is_idempotent() {
        let input = frames(&[
            "93 FB 01 02 03 C4",
            "94 0C 7E 01 02 03 29",
            "93 FB 0E 04 22 4C",
            "92 0E 04 22 B6",
        ]);
        let dedup = Deduplicator::default();
        let once = dedup.dedup_9x(&input);
        let twice = dedup.dedup_9x(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn marker_led_body_folds_again_on_second_pass() {
        // FB FB: the first FB is the delay, the second belongs to the body
        let input = frames(&["94 FB FB 01 02 79"]);
        let dedup = Deduplicator::default();

        let once = dedup.dedup_9x(&input);
        assert_eq!(texts(&once), vec!["93 FB 01 02 5D"]);

        let twice = dedup.dedup_9x(&once);
        assert_eq!(texts(&twice), vec!["92 01 02 1F"]);
        assert_ne!(once, twice);
    }

    #[test]
    fn dedup_55_merges_repeats() {
        let input = frames(&[
            "55 AA 01 02 03 06",
            "55 AA 01 02 03 06",
            "55 AA FF 01 00 00",
        ]);
        let once = dedup_55(&input);
        assert_eq!(once.len(), 2);
        assert_eq!(dedup_55(&once), once);
    }

    #[test]
    fn empty_input_yields_empty_sets() {
        let none: Vec<Frame> = Vec::new();
        assert!(Deduplicator::default().dedup_9x(&none).is_empty());
        assert!(dedup_55(&none).is_empty());
    }
}
