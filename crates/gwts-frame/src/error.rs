use crate::family::ProtocolFamily;

/// Errors that can occur while decoding, validating or encoding frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Fewer payload tokens than the smallest valid frame.
    #[error("frame too short ({len} tokens, need at least {min})")]
    TooShort { len: usize, min: usize },

    /// A token is not a two-digit hexadecimal byte.
    #[error("invalid hex byte token {token:?}")]
    InvalidToken { token: String },

    /// The leading byte matches neither the 9X nor the 55 family.
    #[error("unknown protocol family (leading byte 0x{lead:02X})")]
    UnknownFamily { lead: u8 },

    /// The recomputed encoding differs from the recorded frame.
    #[error("{family} checksum mismatch")]
    ChecksumMismatch { family: ProtocolFamily },

    /// The payload does not fit the family's length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Frames always carry at least one payload byte.
    #[error("payload is empty")]
    EmptyPayload,

    /// An I/O error occurred while reading or writing logs.
    #[error("log I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// True for frames that are structurally unusable (short, non-hex, unknown family).
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            FrameError::TooShort { .. }
                | FrameError::InvalidToken { .. }
                | FrameError::UnknownFamily { .. }
        )
    }

    /// True for frames of a known family whose checksum or length code is wrong.
    pub fn is_checksum_mismatch(&self) -> bool {
        matches!(self, FrameError::ChecksumMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
