//! Image → audio pipeline: each pixel column becomes one spectral audio chunk.

use image::{imageops, imageops::FilterType, RgbImage};
use log::{debug, info};

use crate::crossfade::crossfade;
use crate::error::{Error, Result};
use crate::params::SonifyOptions;
use crate::spectral::SpectralMapper;
use crate::wave::Waveform;

/// Everything the image → audio direction produces: the waveform, the image
/// as actually transformed (post-resize), and its column count. The latter
/// two feed the scan video renderer.
pub struct Sonified {
    pub waveform: Waveform,
    pub image: RgbImage,
    pub columns: usize,
}

/// Convert an image into an audio waveform, column by column, left to right.
///
/// Columns are signalized independently and stitched in order; with a
/// crossfade percentage set, each new segment is blended into the accumulated
/// waveform over a duration fixed once from the first segment's length.
/// Any column or blend failure aborts the whole conversion.
pub fn image_to_audio(image: &RgbImage, opts: &SonifyOptions) -> Result<Sonified> {
    opts.validate()?;

    let new_width = (opts.resize_factor * image.width() as f32) as u32;
    let new_height = (opts.resize_factor * image.height() as f32) as u32;
    if new_width == 0 || new_height == 0 {
        return Err(Error::InvalidInput(format!(
            "resize factor {} collapses a {}x{} image to nothing",
            opts.resize_factor,
            image.width(),
            image.height()
        )));
    }
    let image = imageops::resize(image, new_width, new_height, FilterType::Nearest);
    let columns = image.width() as usize;

    let mut mapper = SpectralMapper::new(opts.convention.clone());
    let mut waveform = mapper.signalize_column(&column_pixels(&image, 0))?;

    // Blend window fixed once from the first segment, applied to every seam
    let crossfade_len = opts
        .crossfade_percent
        .map(|pct| (pct / 100.0 * (waveform.len() / 2) as f32).round() as usize);
    if let Some(duration) = crossfade_len {
        debug!(
            "crossfading {} samples per seam ({} sample segments)",
            duration,
            waveform.len()
        );
    }

    for col in 1..image.width() {
        let segment = mapper.signalize_column(&column_pixels(&image, col))?;
        match crossfade_len {
            Some(duration) => waveform = crossfade(&waveform, &segment, duration)?,
            None => waveform.extend_from_slice(&segment),
        }
    }

    info!(
        "sonified {}x{} image into {} samples at {} Hz",
        image.width(),
        image.height(),
        waveform.len(),
        opts.sample_rate
    );

    Ok(Sonified {
        waveform: Waveform {
            samples: waveform,
            sample_rate: opts.sample_rate,
        },
        image,
        columns,
    })
}

/// One vertical pixel slice, top row first.
fn column_pixels(image: &RgbImage, x: u32) -> Vec<[u8; 3]> {
    (0..image.height()).map(|y| image.get_pixel(x, y).0).collect()
}
