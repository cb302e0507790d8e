//! Protocol families.
//!
//! A frame's family is decided by the high nibble of its first byte:
//! `9X` frames start with their length code (0x90-0x9F for short bodies),
//! `55` frames start with the 0x55 sync byte.

use std::fmt;

/// Leading hex digit of 9X frames.
pub const NINE_X_LEAD: u8 = 0x9;

/// Leading hex digit of 55 frames.
pub const FIVE_FIVE_LEAD: u8 = 0x5;

/// The two sibling command protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProtocolFamily {
    /// Length-code prefixed, CRC-8 terminated.
    NineX,
    /// `55 AA` synced, additive checksum terminated.
    FiveFive,
}

impl ProtocolFamily {
    /// Route a frame by its first byte. Returns `None` for unknown families.
    pub fn classify(first_byte: u8) -> Option<Self> {
        match first_byte >> 4 {
            NINE_X_LEAD => Some(ProtocolFamily::NineX),
            FIVE_FIVE_LEAD => Some(ProtocolFamily::FiveFive),
            _ => None,
        }
    }

    /// Short human-readable name ("9X" or "55").
    pub fn name(self) -> &'static str {
        match self {
            ProtocolFamily::NineX => "9X",
            ProtocolFamily::FiveFive => "55",
        }
    }
}

impl fmt::Display for ProtocolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_leading_digit() {
        assert_eq!(ProtocolFamily::classify(0x90), Some(ProtocolFamily::NineX));
        assert_eq!(ProtocolFamily::classify(0x9F), Some(ProtocolFamily::NineX));
        assert_eq!(
            ProtocolFamily::classify(0x55),
            Some(ProtocolFamily::FiveFive)
        );
        assert_eq!(
            ProtocolFamily::classify(0x5F),
            Some(ProtocolFamily::FiveFive)
        );
    }

    #[test]
    fn other_digits_are_rejected() {
        for lead in [0x00, 0x20, 0x4F, 0x60, 0x8F, 0xA0, 0xAA, 0xFF] {
            assert_eq!(ProtocolFamily::classify(lead), None, "{lead:#04x}");
        }
    }
}
