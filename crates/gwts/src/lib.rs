//! Filter, validate and deduplicate GwtS infrared command recordings.
//!
//! The `gwts` binary (behind the `cli` feature) splits a captured log into
//! per-family lists, delay-free command sets and an error list. The codec and
//! pipeline live in [`frame`].

/// Re-export frame codec, pipeline and log I/O types.
pub mod frame {
    pub use gwts_frame::*;
}
