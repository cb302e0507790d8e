//! Show programming: schedule a command under every countdown marker.
//!
//! A command meant to fire at `offset` is broadcast ahead of time once per
//! standard marker, `step` ticks apart, so receivers that miss one repeat still
//! catch a later one. The last marker in the table lands one step before
//! `offset`.

use crate::codec::{frame_9x, Frame};
use crate::error::Result;
use crate::marker::MarkerTable;

/// Spacing between repeats, in show ticks.
pub const DEFAULT_STEP: u64 = 100;

/// One delayed broadcast of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledFrame {
    pub time: u64,
    pub marker: u8,
    pub frame: Frame,
}

impl ScheduledFrame {
    /// Time as 8-digit uppercase hex, the key format of show files.
    pub fn time_key(&self) -> String {
        format!("{:08X}", self.time)
    }
}

/// Build the delayed 9X frames for `body` firing at `offset`.
///
/// Repeats that would fall before the start of the show are omitted.
pub fn schedule_delays(
    offset: u64,
    body: &[u8],
    markers: &MarkerTable,
    step: u64,
) -> Result<Vec<ScheduledFrame>> {
    let countdown = markers.standard_markers();
    let mut scheduled = Vec::with_capacity(countdown.len());
    let mut payload = Vec::with_capacity(body.len() + 1);

    for (index, &marker) in countdown.iter().enumerate() {
        let lead = (countdown.len() - index) as u64;
        let Some(time) = lead.checked_mul(step).and_then(|ahead| offset.checked_sub(ahead)) else {
            tracing::trace!(marker, offset, "repeat falls before show start");
            continue;
        };

        payload.clear();
        payload.push(marker);
        payload.extend_from_slice(body);
        scheduled.push(ScheduledFrame {
            time,
            marker,
            frame: frame_9x(&payload)?,
        });
    }

    Ok(scheduled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;

    #[test]
    fn schedules_countdown_before_offset() {
        let out = schedule_delays(1000, &[0x01, 0x02], &MarkerTable::standard(), 100).unwrap();

        // FB and FA would land before zero
        assert_eq!(out.len(), 10);
        assert_eq!(out[0].time_key(), "00000000");
        assert_eq!(out[0].marker, 0xF9);
        assert_eq!(out[0].frame.to_hex(), "92 F9 01 02 9D");

        assert_eq!(out[1].time_key(), "00000064");
        assert_eq!(out[1].frame.to_hex(), "92 F8 01 02 36");

        let last = out.last().unwrap();
        assert_eq!(last.time, 900);
        assert_eq!(last.time_key(), "00000384");
        assert_eq!(last.frame.to_hex(), "92 20 01 02 0A");
    }

    #[test]
    fn early_offsets_keep_only_late_markers() {
        let out = schedule_delays(500, &[0x01, 0x02], &MarkerTable::standard(), 100).unwrap();
        let markers: Vec<u8> = out.iter().map(|s| s.marker).collect();
        assert_eq!(markers, vec![0xF4, 0xF3, 0xF2, 0xF1, 0x20]);
        assert_eq!(out[0].frame.to_hex(), "92 F4 01 02 8D");
        assert_eq!(out[0].time, 0);
    }

    #[test]
    fn zero_offset_schedules_nothing() {
        let out = schedule_delays(0, &[0x01], &MarkerTable::standard(), DEFAULT_STEP).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn scheduled_frames_fold_back_to_the_command() {
        let table = MarkerTable::standard();
        let out = schedule_delays(5000, &[0x0E, 0x04, 0x22], &table, DEFAULT_STEP).unwrap();
        assert_eq!(out.len(), table.standard_markers().len());

        let frames: Vec<Frame> = out.into_iter().map(|s| s.frame).collect();
        let folded = crate::dedup::Deduplicator::new(table).dedup_9x(&frames);
        let texts: Vec<String> = folded.iter().map(Frame::to_hex).collect();
        assert_eq!(texts, vec!["92 0E 04 22 B6"]);
    }

    #[test]
    fn oversized_body_is_rejected() {
        let body = vec![0u8; 112];
        let err = schedule_delays(5000, &body, &MarkerTable::standard(), 100).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }
}
