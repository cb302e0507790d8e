//! IR playback timing.
//!
//! Each byte goes out as a start bit, eight data bits LSB-first and a stop bit,
//! all `width` long. Consecutive bits at the same level merge into one run, so
//! the result is an alternating list of on/off durations.

/// Bit width used by the receivers, in microseconds.
pub const DEFAULT_PULSE_WIDTH: u32 = 417;

/// Convert bytes into alternating on/off run lengths.
pub fn encode_pulses(bytes: &[u8], width: u32) -> Vec<u32> {
    let mut runs = Vec::with_capacity(bytes.len() * 4);
    for &byte in bytes {
        // start bit
        runs.push(width);
        let mut high = false;

        for bit in 0..8 {
            let set = (byte >> bit) & 1 == 1;
            if set == high {
                extend_last(&mut runs, width);
            } else {
                runs.push(width);
                high = !high;
            }
        }

        // stop bit
        if high {
            extend_last(&mut runs, width);
        } else {
            runs.push(width);
        }
    }
    runs
}

fn extend_last(runs: &mut [u32], width: u32) {
    if let Some(last) = runs.last_mut() {
        *last = last.saturating_add(width);
    }
}

/// Render runs as `{a, b, c}` for pasting into firmware tables.
pub fn format_pulses(runs: &[u32]) -> String {
    let body = runs
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{body}}}")
}
