//! Inter-command delay markers carried at the front of 9X payloads.
//!
//! Repeated broadcasts of one command are spaced in time by prefixing the
//! payload with a marker byte. Two shapes exist:
//!
//! - standard: one byte from a countdown table (`FB`..`F1`) or the fixed `20`
//! - extended: `0C` followed by one opaque reserved byte
//!
//! The countdown order matters to the show scheduler, which assigns the
//! earliest time slot to the first marker in the table.

/// Countdown markers observed on most recordings, in broadcast order.
pub const STANDARD_MARKERS: [u8; 12] = [
    0xFB, 0xFA, 0xF9, 0xF8, 0xF7, 0xF6, 0xF5, 0xF4, 0xF3, 0xF2, 0xF1, 0x20,
];

/// Wider countdown seen on some recordings.
pub const WIDE_MARKERS: [u8; 16] = [
    0xFF, 0xFE, 0xFD, 0xFC, 0xFB, 0xFA, 0xF9, 0xF8, 0xF7, 0xF6, 0xF5, 0xF4, 0xF3, 0xF2, 0xF1,
    0x20,
];

/// Leading byte of the extended marker.
pub const EXTENDED_MARKER: u8 = 0x0C;

/// A delay marker detected at the front of a 9X payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayMarker {
    /// A single countdown byte.
    Standard(u8),
    /// The extended marker byte; one reserved byte follows it.
    Extended(u8),
}

impl DelayMarker {
    /// Payload bytes consumed before the command body starts.
    pub fn width(self) -> usize {
        match self {
            DelayMarker::Standard(_) => 1,
            DelayMarker::Extended(_) => 2,
        }
    }

    /// The marker byte itself.
    pub fn value(self) -> u8 {
        match self {
            DelayMarker::Standard(value) | DelayMarker::Extended(value) => value,
        }
    }
}

/// Immutable set of recognized delay markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerTable {
    standard: Vec<u8>,
    extended: Option<u8>,
}

impl MarkerTable {
    /// Build a table from an ordered countdown and an optional extended marker.
    pub fn new(standard: impl Into<Vec<u8>>, extended: Option<u8>) -> Self {
        Self {
            standard: standard.into(),
            extended,
        }
    }

    /// `FB`..`F1`, `20`, with the `0C` extended marker.
    pub fn standard() -> Self {
        Self::new(STANDARD_MARKERS, Some(EXTENDED_MARKER))
    }

    /// `FF`..`F1`, `20`, with the `0C` extended marker.
    pub fn wide() -> Self {
        Self::new(WIDE_MARKERS, Some(EXTENDED_MARKER))
    }

    /// Look up a built-in table by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::standard()),
            "wide" => Some(Self::wide()),
            _ => None,
        }
    }

    /// Standard markers in countdown order.
    pub fn standard_markers(&self) -> &[u8] {
        &self.standard
    }

    pub fn extended_marker(&self) -> Option<u8> {
        self.extended
    }

    /// Classify the first payload byte. The extended marker takes precedence.
    pub fn detect(&self, lead: u8) -> Option<DelayMarker> {
        if self.extended == Some(lead) {
            Some(DelayMarker::Extended(lead))
        } else if self.standard.contains(&lead) {
            Some(DelayMarker::Standard(lead))
        } else {
            None
        }
    }
}

impl Default for MarkerTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_detects_countdown_and_fixed() {
        let table = MarkerTable::standard();
        for value in 0xF1..=0xFB {
            assert_eq!(table.detect(value), Some(DelayMarker::Standard(value)));
        }
        assert_eq!(table.detect(0x20), Some(DelayMarker::Standard(0x20)));
        assert_eq!(table.detect(0x0C), Some(DelayMarker::Extended(0x0C)));
    }

    #[test]
    fn standard_table_ignores_wide_only_values() {
        let table = MarkerTable::standard();
        for value in [0xFC, 0xFD, 0xFE, 0xFF, 0xF0, 0x01, 0x0E] {
            assert_eq!(table.detect(value), None, "{value:#04x}");
        }
        assert_eq!(
            MarkerTable::wide().detect(0xFF),
            Some(DelayMarker::Standard(0xFF))
        );
    }

    #[test]
    fn widths_follow_marker_shape() {
        assert_eq!(DelayMarker::Standard(0xFB).width(), 1);
        assert_eq!(DelayMarker::Extended(0x0C).width(), 2);
        assert_eq!(DelayMarker::Extended(0x0C).value(), 0x0C);
    }

    #[test]
    fn extended_wins_over_a_colliding_standard_entry() {
        let table = MarkerTable::new(vec![0x0C, 0xFB], Some(0x0C));
        assert_eq!(table.detect(0x0C), Some(DelayMarker::Extended(0x0C)));

        let no_extended = MarkerTable::new(vec![0xFB], None);
        assert_eq!(no_extended.detect(0x0C), None);
    }

    #[test]
    fn presets_by_name() {
        assert_eq!(MarkerTable::preset("Wide"), Some(MarkerTable::wide()));
        assert_eq!(MarkerTable::preset("standard"), Some(MarkerTable::default()));
        assert_eq!(MarkerTable::preset("narrow"), None);
    }
}
