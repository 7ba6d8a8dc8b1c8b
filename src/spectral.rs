//! Column ↔ spectrum mapping, the bidirectional core of the transform.
//!
//! One image column is read as a one-sided real spectrum: the three channel
//! runs are concatenated into `3*rows` bins (low band first) and pushed
//! through an inverse real FFT to produce an audio segment. The reverse
//! direction forward-transforms an audio chunk, splits the one-sided spectrum
//! into three contiguous bands, and keeps only the magnitudes; the discarded
//! phase is what makes the transform lossy.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::{Error, Result};
use crate::params::SpectralConvention;

/// Peak amplitude used for 16-bit scaling. Symmetric on purpose: `i16::MIN`
/// is never produced, matching the WAV convention of the original outputs.
pub const PEAK_AMPLITUDE: f32 = 32767.0;

/// Maps pixel columns to audio segments and audio chunks to pixel columns.
///
/// Holds the FFT planner so repeated columns of the same height reuse their
/// plan.
pub struct SpectralMapper {
    planner: FftPlanner<f32>,
    convention: SpectralConvention,
}

impl SpectralMapper {
    pub fn new(convention: SpectralConvention) -> Self {
        Self {
            planner: FftPlanner::new(),
            convention,
        }
    }

    /// Length of the audio segment produced for a column of `rows` pixels:
    /// a one-sided spectrum of `N = 3*rows` bins inverts to `2*(N-1)` real
    /// samples.
    pub fn segment_len(rows: usize) -> usize {
        2 * (3 * rows - 1)
    }

    /// Number of pixel rows recoverable from a chunk of `chunk_len` samples:
    /// the one-sided forward spectrum has `chunk_len/2 + 1` bins, split into
    /// three equal bands (excess bins are dropped).
    pub fn rows_for_chunk(chunk_len: usize) -> usize {
        (chunk_len / 2 + 1) / 3
    }

    /// Map one image column (top row first) to a normalized 16-bit audio
    /// segment of [`Self::segment_len`] samples.
    pub fn signalize_column(&mut self, column: &[[u8; 3]]) -> Result<Vec<i16>> {
        if column.is_empty() {
            return Err(Error::InvalidInput("column has no pixels".into()));
        }

        // Channel runs concatenated low band first, each reversed so the top
        // pixel sits at the high end of its own band.
        let rows = column.len();
        let mut spectrum = Vec::with_capacity(3 * rows);
        for &channel in &self.convention.channel_order {
            let run = column.iter().map(|px| px[channel] as f32);
            if self.convention.reverse_before_transform {
                spectrum.extend(run.rev());
            } else {
                spectrum.extend(run);
            }
        }

        let mut signal = self.inverse_real_fft(&spectrum);

        min_max_normalize(&mut signal, -1.0, 1.0, "audio segment")?;
        Ok(signal
            .iter()
            .map(|&s| (s * PEAK_AMPLITUDE).round() as i16)
            .collect())
    }

    /// Map one audio chunk (samples in `[-1, 1]`) to a column of band
    /// magnitudes, top row first. The returned column has
    /// [`Self::rows_for_chunk`] rows; values are raw magnitudes, normalized
    /// later across the whole image.
    pub fn column_from_chunk(&mut self, chunk: &[f32]) -> Result<Vec<[f32; 3]>> {
        let rows = Self::rows_for_chunk(chunk.len());
        if rows == 0 {
            return Err(Error::InvalidInput(format!(
                "chunk of {} samples is too short to yield a pixel row",
                chunk.len()
            )));
        }

        let magnitudes = self.forward_real_fft(chunk);

        let mut column = vec![[0.0f32; 3]; rows];
        for (band, &channel) in self.convention.channel_order.iter().enumerate() {
            let bins = &magnitudes[band * rows..(band + 1) * rows];
            for (row, px) in column.iter_mut().enumerate() {
                let bin = if self.convention.reverse_before_transform {
                    rows - 1 - row
                } else {
                    row
                };
                px[channel] = bins[bin];
            }
        }
        Ok(column)
    }

    /// Inverse FFT of a one-sided real spectrum: `n` bins in, `2*(n-1)` real
    /// samples out. The interior bins are mirrored into a full
    /// Hermitian-symmetric buffer and run through a complex inverse FFT.
    fn inverse_real_fft(&mut self, spectrum: &[f32]) -> Vec<f32> {
        let n = spectrum.len();
        let full_len = 2 * (n - 1);

        let mut buffer: Vec<Complex<f32>> = Vec::with_capacity(full_len);
        buffer.extend(spectrum.iter().map(|&re| Complex::new(re, 0.0)));
        // Real-valued bins are their own conjugates
        buffer.extend(spectrum[1..n - 1].iter().rev().map(|&re| Complex::new(re, 0.0)));

        let ifft = self.planner.plan_fft_inverse(full_len);
        ifft.process(&mut buffer);

        // rustfft leaves the inverse unscaled
        buffer.iter().map(|c| c.re / full_len as f32).collect()
    }

    /// One-sided magnitude spectrum of a real chunk: `len/2 + 1` bins of a
    /// zero-imaginary complex forward FFT.
    fn forward_real_fft(&mut self, chunk: &[f32]) -> Vec<f32> {
        let fft = self.planner.plan_fft_forward(chunk.len());
        let mut buffer: Vec<Complex<f32>> =
            chunk.iter().map(|&s| Complex::new(s, 0.0)).collect();
        fft.process(&mut buffer);

        buffer[..chunk.len() / 2 + 1]
            .iter()
            .map(|c| c.norm())
            .collect()
    }
}

/// Affine min-max rescale of `values` onto `[lo, hi]`.
///
/// Errors when the input is constant: the rescale would divide by zero, and
/// letting NaN/Inf propagate downstream is worse than failing here.
pub fn min_max_normalize(
    values: &mut [f32],
    lo: f32,
    hi: f32,
    what: &'static str,
) -> Result<()> {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in values.iter() {
        min = min.min(v);
        max = max.max(v);
    }
    if min >= max {
        return Err(Error::DegenerateSignal(what));
    }

    let scale = (hi - lo) / (max - min);
    for v in values.iter_mut() {
        *v = lo + (*v - min) * scale;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_column(rows: usize) -> Vec<[u8; 3]> {
        (0..rows)
            .map(|r| {
                let v = (r * 255 / rows.max(1)) as u8;
                [v, v.wrapping_add(40), v.wrapping_add(90)]
            })
            .collect()
    }

    #[test]
    fn test_segment_length_relation() {
        let mut mapper = SpectralMapper::new(SpectralConvention::default());
        for rows in [1, 2, 4, 7] {
            let segment = mapper.signalize_column(&gradient_column(rows)).unwrap();
            assert_eq!(segment.len(), SpectralMapper::segment_len(rows));
            assert_eq!(segment.len(), 2 * (3 * rows - 1));
        }
    }

    #[test]
    fn test_signalize_normalization_attains_peaks() {
        let mut mapper = SpectralMapper::new(SpectralConvention::default());
        let segment = mapper.signalize_column(&gradient_column(8)).unwrap();

        // Min-max scaling pins the extremes to the full 16-bit range
        assert_eq!(*segment.iter().min().unwrap(), -32767);
        assert_eq!(*segment.iter().max().unwrap(), 32767);
    }

    #[test]
    fn test_signalize_uniform_column_is_degenerate() {
        // All-zero pixels produce an all-zero spectrum, hence a constant
        // signal that min-max normalization must reject
        let mut mapper = SpectralMapper::new(SpectralConvention::default());
        let column = vec![[0u8; 3]; 4];
        assert!(matches!(
            mapper.signalize_column(&column),
            Err(Error::DegenerateSignal(_))
        ));
    }

    #[test]
    fn test_signalize_empty_column_is_invalid() {
        let mut mapper = SpectralMapper::new(SpectralConvention::default());
        assert!(matches!(
            mapper.signalize_column(&[]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rows_for_chunk_matches_segment_len() {
        // A segment produced from `rows` pixels splits back into `rows` rows
        for rows in [1, 2, 4, 9] {
            let chunk_len = SpectralMapper::segment_len(rows);
            assert_eq!(SpectralMapper::rows_for_chunk(chunk_len), rows);
        }
    }

    #[test]
    fn test_column_from_chunk_shape_and_reversal() {
        let mut mapper = SpectralMapper::new(SpectralConvention::default());

        // A pure DC chunk concentrates all energy in bin 0 of the low band;
        // with the reversal convention that is the red channel's bottom row
        let chunk = vec![0.5f32; 22]; // 22 samples -> 12 bins -> 4 rows
        let column = mapper.column_from_chunk(&chunk).unwrap();
        assert_eq!(column.len(), 4);

        let bottom = column[3];
        let top = column[0];
        assert!(bottom[0] > 10.0, "DC energy should land in the bottom red pixel");
        assert!(top[0].abs() < 1e-3);
        assert!(column
            .iter()
            .all(|px| px[1].abs() < 1e-3 && px[2].abs() < 1e-3));
    }

    #[test]
    fn test_column_from_chunk_too_short() {
        let mut mapper = SpectralMapper::new(SpectralConvention::default());
        // 2 samples -> 2 bins -> 0 rows
        assert!(mapper.column_from_chunk(&[0.1, 0.2]).is_err());
    }

    #[test]
    fn test_min_max_normalize_bounds() {
        let mut values = vec![3.0, -1.0, 0.5, 7.0];
        min_max_normalize(&mut values, 0.0, 255.0, "test").unwrap();
        assert_eq!(values[1], 0.0);
        assert_eq!(values[3], 255.0);
        assert!(values.iter().all(|v| (0.0..=255.0).contains(v)));
    }

    #[test]
    fn test_min_max_normalize_constant_fails() {
        let mut values = vec![4.2; 16];
        assert!(matches!(
            min_max_normalize(&mut values, -1.0, 1.0, "test"),
            Err(Error::DegenerateSignal("test"))
        ));
    }
}
