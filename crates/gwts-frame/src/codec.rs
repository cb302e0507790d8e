use std::fmt;
use std::str::FromStr;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::family::ProtocolFamily;
use crate::hex;

/// Fewest bytes a recorded frame of either family may carry.
pub const MIN_FRAME_LEN: usize = 5;

/// 9X length code = base + payload length.
pub const LENGTH_CODE_BASE: u8 = 143;

/// Largest 9X payload whose length code still fits in a byte.
pub const MAX_NINE_X_PAYLOAD: usize = (u8::MAX - LENGTH_CODE_BASE) as usize;

/// Reflected feedback polynomial of the 9X CRC-8 (Dallas/Maxim 1-Wire).
pub const CRC_9X_POLY: u8 = 0x8C;

/// Sync bytes that open every 55 frame.
pub const SYNC_55: [u8; 2] = [0x55, 0xAA];

/// A complete, checksum-terminated command frame.
///
/// Ordering follows the bytes, which matches the ordering of the rendered hex
/// text, so sorted sets of frames print in lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Wrap raw frame bytes. No validation is performed.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Parse whitespace-separated hex tokens.
    pub fn parse(text: &str) -> Result<Self> {
        hex::parse_hex(text).map(Self::new)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Family implied by the first byte, if any.
    pub fn family(&self) -> Option<ProtocolFamily> {
        self.bytes.first().copied().and_then(ProtocolFamily::classify)
    }

    /// Uppercase, space-joined hex rendering.
    pub fn to_hex(&self) -> String {
        hex::format_hex(&self.bytes)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Frame {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// A recorded frame that passed validation, tagged with its family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedFrame {
    pub family: ProtocolFamily,
    pub frame: Frame,
}

/// CRC-8 over `bytes`: LSB-first, polynomial 0x8C, init 0, no final XOR.
pub fn crc_9x(bytes: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in bytes {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 1 == 1 {
                (crc >> 1) ^ CRC_9X_POLY
            } else {
                crc >> 1
            };
        }
    }
    crc
}

/// Additive checksum of a 55 payload (sum mod 256).
pub fn checksum_55(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Length code for a 9X payload of `len` bytes, if representable.
pub fn length_code(len: usize) -> Option<u8> {
    u8::try_from(len)
        .ok()
        .and_then(|len| LENGTH_CODE_BASE.checked_add(len))
}

/// Encode a 9X frame.
///
/// Wire format:
/// ```text
/// ┌──────────────┬────────────────┬──────────┐
/// │ Length code  │ Payload        │ CRC-8    │
/// │ 143 + len    │ (len bytes)    │ (1B)     │
/// └──────────────┴────────────────┴──────────┘
/// ```
/// The CRC covers the length code and the payload.
pub fn encode_9x(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.is_empty() {
        return Err(FrameError::EmptyPayload);
    }
    let code = length_code(payload.len()).ok_or(FrameError::PayloadTooLarge {
        size: payload.len(),
        max: MAX_NINE_X_PAYLOAD,
    })?;

    let start = dst.len();
    dst.reserve(payload.len() + 2);
    dst.put_u8(code);
    dst.put_slice(payload);
    let crc = crc_9x(&dst[start..]);
    dst.put_u8(crc);
    Ok(())
}

/// Encode a 55 frame.
///
/// Wire format:
/// ```text
/// ┌──────────────┬────────────────┬────────────────────┐
/// │ Sync (2B)    │ Payload        │ Checksum (1B)      │
/// │ 0x55 0xAA    │ (len bytes)    │ sum(payload) % 256 │
/// └──────────────┴────────────────┴────────────────────┘
/// ```
pub fn encode_55(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.is_empty() {
        return Err(FrameError::EmptyPayload);
    }
    dst.reserve(payload.len() + 3);
    dst.put_slice(&SYNC_55);
    dst.put_slice(payload);
    dst.put_u8(checksum_55(payload));
    Ok(())
}

/// Encode a 9X payload into a standalone frame.
pub fn frame_9x(payload: &[u8]) -> Result<Frame> {
    let mut buf = BytesMut::new();
    encode_9x(payload, &mut buf)?;
    Ok(Frame::new(buf.freeze()))
}

/// Encode a 55 payload into a standalone frame.
pub fn frame_55(payload: &[u8]) -> Result<Frame> {
    let mut buf = BytesMut::new();
    encode_55(payload, &mut buf)?;
    Ok(Frame::new(buf.freeze()))
}

/// True if `frame` equals the 9X encoding of its own middle bytes.
pub fn verify_9x(frame: &[u8]) -> bool {
    let Some((&crc, sealed)) = frame.split_last() else {
        return false;
    };
    let Some((&code, payload)) = sealed.split_first() else {
        return false;
    };
    !payload.is_empty() && length_code(payload.len()) == Some(code) && crc_9x(sealed) == crc
}

/// True if `frame` equals the 55 encoding of the bytes between sync and checksum.
pub fn verify_55(frame: &[u8]) -> bool {
    let Some((&checksum, sealed)) = frame.split_last() else {
        return false;
    };
    match sealed.strip_prefix(&SYNC_55[..]) {
        Some(payload) => !payload.is_empty() && checksum_55(payload) == checksum,
        None => false,
    }
}

/// Classify and verify a complete recorded frame.
pub fn validate(frame: &[u8]) -> Result<ProtocolFamily> {
    if frame.len() < MIN_FRAME_LEN {
        return Err(FrameError::TooShort {
            len: frame.len(),
            min: MIN_FRAME_LEN,
        });
    }

    let lead = frame[0];
    let family = ProtocolFamily::classify(lead).ok_or(FrameError::UnknownFamily { lead })?;
    let valid = match family {
        ProtocolFamily::NineX => verify_9x(frame),
        ProtocolFamily::FiveFive => verify_55(frame),
    };

    if valid {
        Ok(family)
    } else {
        Err(FrameError::ChecksumMismatch { family })
    }
}

/// Decode the payload tokens of one log line into a validated frame.
///
/// The length floor is checked before any token is parsed, so short lines are
/// always reported as too short regardless of their content.
pub fn decode_tokens(tokens: &[&str]) -> Result<CheckedFrame> {
    if tokens.len() < MIN_FRAME_LEN {
        return Err(FrameError::TooShort {
            len: tokens.len(),
            min: MIN_FRAME_LEN,
        });
    }

    let bytes = hex::parse_tokens(tokens.iter().copied())?;
    let family = validate(&bytes)?;
    Ok(CheckedFrame {
        family,
        frame: Frame::new(bytes),
    })
}
