//! Parameter definitions for the spectral mapping and its pipelines.
//!
//! The mapping between pixel columns and audio spectra rests on a couple of
//! ordering conventions that must match bit-for-bit in both directions. They
//! are pinned here as explicit configuration rather than buried in the
//! transform code.

use crate::error::{Error, Result};

/// Whether the final audio chunk is rendered into the last image column.
///
/// The historical behavior skips it, leaving the last column at its black
/// default. Kept off so existing outputs reproduce; flip to process every
/// chunk.
pub const PROCESS_LAST_COLUMN: bool = false;

/// Pinned ordering conventions of the column ↔ spectrum mapping.
///
/// These are compatibility constants, not tuning knobs: changing either one
/// changes which pixels land in which frequency bins, and waveforms produced
/// under a different convention will no longer rasterize back to a comparable
/// image.
#[derive(Debug, Clone)]
pub struct SpectralConvention {
    /// Order in which the channel bands are concatenated, lowest band first.
    /// Indices into an RGB triple; `[0, 1, 2]` puts red in the low band,
    /// green in the mid band, blue in the high band.
    pub channel_order: [usize; 3],

    /// Reverse each channel's pixel run before transforming, so the top of
    /// the image lands at the high end of its own band.
    pub reverse_before_transform: bool,
}

impl Default for SpectralConvention {
    fn default() -> Self {
        Self {
            channel_order: [0, 1, 2],
            reverse_before_transform: true,
        }
    }
}

/// Options for the image → audio pipeline.
#[derive(Debug, Clone)]
pub struct SonifyOptions {
    /// Sample rate of the generated waveform (Hz)
    pub sample_rate: u32,

    /// Crossfade percentage in (0, 100]; `None` concatenates segments
    /// directly. The blend duration is fixed once from the first segment's
    /// length as `round(pct/100 * segment_len/2)` samples.
    pub crossfade_percent: Option<f32>,

    /// Factor applied to both image dimensions before any signal work.
    /// Shrinking the image lowers spectrum resolution (rows) and duration
    /// (columns).
    pub resize_factor: f32,

    pub convention: SpectralConvention,
}

impl Default for SonifyOptions {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            crossfade_percent: None,
            resize_factor: 1.0,
            convention: SpectralConvention::default(),
        }
    }
}

impl SonifyOptions {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidInput(
                "sample rate must be a positive integer".into(),
            ));
        }
        if !(self.resize_factor > 0.0) {
            return Err(Error::InvalidInput(format!(
                "resize factor must be positive, got {}",
                self.resize_factor
            )));
        }
        if let Some(pct) = self.crossfade_percent {
            if !(pct > 0.0 && pct <= 100.0) {
                return Err(Error::InvalidInput(format!(
                    "crossfade percentage must be in (0, 100], got {pct}"
                )));
            }
        }
        Ok(())
    }
}

/// Post-processing applied to the band-magnitude grid around per-channel
/// normalization.
///
/// Low frequencies tend to dominate the red band's magnitudes and stretch the
/// red channel's normalization range until everything else goes black. The
/// default policy attenuates the offending rows before normalization and
/// restores them afterwards; swap in [`CorrectionPolicy::None`] to see the
/// uncorrected output.
#[derive(Debug, Clone)]
pub enum CorrectionPolicy {
    /// Leave the magnitude grid untouched.
    None,

    /// Scale the bottom `rows` rows of the red channel by `pre_scale` before
    /// normalization and by `post_scale` after it.
    LowRedAttenuation {
        rows: usize,
        pre_scale: f32,
        post_scale: f32,
    },
}

impl Default for CorrectionPolicy {
    fn default() -> Self {
        Self::LowRedAttenuation {
            rows: 2,
            pre_scale: 0.001,
            post_scale: 1000.0,
        }
    }
}

impl CorrectionPolicy {
    /// Apply the pre-normalization step to a `rows × cols` grid of RGB
    /// magnitudes (row-major, top row first).
    pub fn apply_pre(&self, grid: &mut [[f32; 3]], rows: usize, cols: usize) {
        if let Self::LowRedAttenuation {
            rows: n, pre_scale, ..
        } = self
        {
            scale_red_rows(grid, rows, cols, *n, *pre_scale);
        }
    }

    /// Apply the post-normalization step.
    pub fn apply_post(&self, grid: &mut [[f32; 3]], rows: usize, cols: usize) {
        if let Self::LowRedAttenuation {
            rows: n, post_scale, ..
        } = self
        {
            scale_red_rows(grid, rows, cols, *n, *post_scale);
        }
    }
}

/// Scale the red channel of the bottom `n` rows by `factor`.
fn scale_red_rows(grid: &mut [[f32; 3]], rows: usize, cols: usize, n: usize, factor: f32) {
    for row in rows.saturating_sub(n)..rows {
        for col in 0..cols {
            grid[row * cols + col][0] *= factor;
        }
    }
}

/// Options for the audio → image pipeline.
#[derive(Debug, Clone)]
pub struct RasterizeOptions {
    /// Number of pixel columns to reconstruct. The waveform is split into
    /// this many equal chunks; trailing remainder samples are discarded.
    pub columns: usize,

    /// Render the final chunk into the final column (see
    /// [`PROCESS_LAST_COLUMN`]).
    pub process_last_column: bool,

    pub correction: CorrectionPolicy,

    pub convention: SpectralConvention,
}

impl RasterizeOptions {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            process_last_column: PROCESS_LAST_COLUMN,
            correction: CorrectionPolicy::default(),
            convention: SpectralConvention::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(Error::InvalidInput(
                "column count must be a positive integer".into(),
            ));
        }
        Ok(())
    }
}
