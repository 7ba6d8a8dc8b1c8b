//! Audio → image pipeline: waveform chunks become spectral pixel columns.

use image::{Rgb, RgbImage};
use log::info;

use crate::error::{Error, Result};
use crate::params::RasterizeOptions;
use crate::spectral::{min_max_normalize, SpectralMapper, PEAK_AMPLITUDE};
use crate::wave::Waveform;

/// The reconstructed image plus the waveform passed through for the scan
/// video renderer.
pub struct Rasterized {
    pub image: RgbImage,
    pub waveform: Waveform,
}

/// Reconstruct an image from a mono waveform.
///
/// The waveform is cut into `columns` equal chunks (trailing remainder
/// discarded), each chunk's forward spectrum is split into three contiguous
/// magnitude bands, and the bands become the column's red, green and blue
/// pixel stacks. Row count follows from the chunk length; per-channel
/// normalization over the whole image maps magnitudes onto `[0, 255]`.
pub fn audio_to_image(waveform: &Waveform, opts: &RasterizeOptions) -> Result<Rasterized> {
    opts.validate()?;

    let cols = opts.columns;
    let samples_per_chunk = waveform.samples.len() / cols;
    if samples_per_chunk == 0 {
        return Err(Error::InvalidInput(format!(
            "{} columns cannot be cut from {} samples",
            cols,
            waveform.samples.len()
        )));
    }

    let signal: Vec<f32> = waveform
        .samples
        .iter()
        .map(|&s| s as f32 / PEAK_AMPLITUDE)
        .collect();

    let rows = SpectralMapper::rows_for_chunk(samples_per_chunk);
    if rows == 0 {
        return Err(Error::InvalidInput(format!(
            "chunks of {samples_per_chunk} samples are too short to yield a pixel row"
        )));
    }

    let mut mapper = SpectralMapper::new(opts.convention.clone());
    let mut grid = vec![[0.0f32; 3]; rows * cols];

    let processed = if opts.process_last_column { cols } else { cols - 1 };
    for col in 0..processed {
        let chunk = &signal[col * samples_per_chunk..(col + 1) * samples_per_chunk];
        let column = mapper.column_from_chunk(chunk)?;
        for (row, px) in column.into_iter().enumerate() {
            grid[row * cols + col] = px;
        }
    }

    opts.correction.apply_pre(&mut grid, rows, cols);
    normalize_channels(&mut grid)?;
    opts.correction.apply_post(&mut grid, rows, cols);

    let image = RgbImage::from_fn(cols as u32, rows as u32, |x, y| {
        let px = grid[y as usize * cols + x as usize];
        // Saturate rather than wrap: the correction's restoration step can
        // push values past 255
        Rgb([
            px[0].round().clamp(0.0, 255.0) as u8,
            px[1].round().clamp(0.0, 255.0) as u8,
            px[2].round().clamp(0.0, 255.0) as u8,
        ])
    });

    info!(
        "rasterized {} samples into a {}x{} image ({} of {} columns rendered)",
        waveform.samples.len(),
        cols,
        rows,
        processed,
        cols
    );

    Ok(Rasterized {
        image,
        waveform: waveform.clone(),
    })
}

/// Min-max normalize each channel independently across the whole grid.
fn normalize_channels(grid: &mut [[f32; 3]]) -> Result<()> {
    const CHANNELS: [&str; 3] = ["red channel", "green channel", "blue channel"];
    for (channel, name) in CHANNELS.into_iter().enumerate() {
        let mut plane: Vec<f32> = grid.iter().map(|px| px[channel]).collect();
        min_max_normalize(&mut plane, 0.0, 255.0, name)?;
        for (px, v) in grid.iter_mut().zip(plane) {
            px[channel] = v;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{CorrectionPolicy, SonifyOptions};
    use crate::sonify::image_to_audio;
    use image::RgbImage;

    fn varied_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([
                (10 + x * 40 + y * 25) as u8,
                (60 + x * 20 + y * 35) as u8,
                (120 + x * 30 + y * 10) as u8,
            ])
        })
    }

    fn varied_waveform(columns: usize, rows: usize) -> Waveform {
        image_to_audio(
            &varied_image(columns as u32, rows as u32),
            &SonifyOptions::default(),
        )
        .unwrap()
        .waveform
    }

    #[test]
    fn test_round_trip_preserves_shape() {
        let waveform = varied_waveform(4, 4);
        let rasterized = audio_to_image(&waveform, &RasterizeOptions::new(4)).unwrap();

        assert_eq!(rasterized.image.width(), 4);
        assert_eq!(rasterized.image.height(), 4);
    }

    #[test]
    fn test_last_column_stays_black_by_default() {
        let waveform = varied_waveform(4, 4);
        let rasterized = audio_to_image(&waveform, &RasterizeOptions::new(4)).unwrap();

        let image = &rasterized.image;
        for y in 0..image.height() {
            assert_eq!(image.get_pixel(3, y).0, [0, 0, 0]);
        }
    }

    #[test]
    fn test_process_last_column_fills_it() {
        let waveform = varied_waveform(4, 4);
        let mut opts = RasterizeOptions::new(4);
        opts.process_last_column = true;
        let rasterized = audio_to_image(&waveform, &opts).unwrap();

        let image = &rasterized.image;
        let last: Vec<[u8; 3]> = (0..image.height())
            .map(|y| image.get_pixel(3, y).0)
            .collect();
        assert!(last.iter().any(|px| *px != [0, 0, 0]));
    }

    #[test]
    fn test_channels_attain_full_range() {
        let waveform = varied_waveform(5, 3);
        let mut opts = RasterizeOptions::new(5);
        // Plain normalization so the restored red rows cannot overshoot
        opts.correction = CorrectionPolicy::None;
        let rasterized = audio_to_image(&waveform, &opts).unwrap();

        for channel in 0..3 {
            let values: Vec<u8> = rasterized
                .image
                .pixels()
                .map(|px| px.0[channel])
                .collect();
            assert_eq!(*values.iter().min().unwrap(), 0);
            assert_eq!(*values.iter().max().unwrap(), 255);
        }
    }

    #[test]
    fn test_remainder_samples_are_discarded() {
        let mut waveform = varied_waveform(4, 4);
        let baseline = audio_to_image(&waveform, &RasterizeOptions::new(4))
            .unwrap()
            .image;

        // A sub-chunk tail must not change the reconstruction
        waveform.samples.extend_from_slice(&[12345, -9876, 4321]);
        let with_tail = audio_to_image(&waveform, &RasterizeOptions::new(4))
            .unwrap()
            .image;

        assert_eq!(baseline, with_tail);
    }

    #[test]
    fn test_silence_is_degenerate() {
        let waveform = Waveform {
            samples: vec![0; 880],
            sample_rate: 8000,
        };
        assert!(matches!(
            audio_to_image(&waveform, &RasterizeOptions::new(4)),
            Err(Error::DegenerateSignal(_))
        ));
    }

    #[test]
    fn test_too_many_columns_rejected() {
        let waveform = Waveform {
            samples: vec![100; 8],
            sample_rate: 8000,
        };
        assert!(matches!(
            audio_to_image(&waveform, &RasterizeOptions::new(16)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_columns_rejected() {
        let waveform = varied_waveform(2, 2);
        assert!(audio_to_image(&waveform, &RasterizeOptions::new(0)).is_err());
    }
}
