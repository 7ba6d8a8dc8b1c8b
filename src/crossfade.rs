//! Linear crossfade between adjacent audio segments.
//!
//! Concatenating independently normalized segments leaves a discontinuity at
//! every boundary, audible as a tapping noise once per column. Blending the
//! tail of each segment into the head of the next trades a little spectral
//! fidelity for a smooth seam.

use crate::error::{Error, Result};

/// Blend the tail of `first` into the head of `second` over `duration`
/// samples.
///
/// The blend ramps linearly: sample `i` of the overlap is
/// `first_tail[i] * (1 - i/duration) + second_head[i] * (i/duration)`.
/// `duration == 0` degenerates to a plain concatenation. The duration must be
/// strictly shorter than both segments.
pub fn crossfade(first: &[i16], second: &[i16], duration: usize) -> Result<Vec<i16>> {
    if duration >= first.len() || duration >= second.len() {
        return Err(Error::InsufficientLength {
            duration,
            first_len: first.len(),
            second_len: second.len(),
        });
    }

    let keep = first.len() - duration;
    let mut out = Vec::with_capacity(first.len() + second.len() - duration);
    out.extend_from_slice(&first[..keep]);
    for i in 0..duration {
        let t = i as f32 / duration as f32;
        let tail = first[keep + i] as f32;
        let head = second[i] as f32;
        // Convex blend of two in-range values cannot overflow i16
        out.push((tail * (1.0 - t) + head * t) as i16);
    }
    out.extend_from_slice(&second[duration..]);
    Ok(out)
}
