//! pixelwave binary: image <-> audio conversion front-end.
//!
//! File decode/encode and the scratch directory live here; the conversion
//! math is in the library modules.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::info;

use pixelwave::cli::{Args, Command};
use pixelwave::params::{CorrectionPolicy, RasterizeOptions, SonifyOptions};
use pixelwave::rasterize::audio_to_image;
use pixelwave::sonify::image_to_audio;
use pixelwave::video::render_scan_video;
use pixelwave::wave;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Args::parse().command {
        Command::Sonify {
            input,
            output,
            sample_rate,
            crossfade,
            resize,
            video,
        } => run_sonify(&input, output, sample_rate, crossfade, resize, video),
        Command::Rasterize {
            input,
            output,
            columns,
            fill_last_column,
            no_red_correction,
            video,
        } => run_rasterize(
            &input,
            output,
            columns,
            fill_last_column,
            no_red_correction,
            video,
        ),
    }
}

fn run_sonify(
    input: &Path,
    output: Option<PathBuf>,
    sample_rate: u32,
    crossfade: Option<f32>,
    resize: f32,
    video: bool,
) -> anyhow::Result<()> {
    let image = image::open(input)
        .with_context(|| format!("failed to decode {}", input.display()))?
        .to_rgb8();

    let opts = SonifyOptions {
        sample_rate,
        crossfade_percent: crossfade,
        resize_factor: resize,
        ..SonifyOptions::default()
    };
    let sonified = image_to_audio(&image, &opts)?;

    let audio_path = output.unwrap_or_else(|| input.with_extension("wav"));
    wave::write_mono(&audio_path, &sonified.waveform)?;
    info!("wrote {}", audio_path.display());

    if video {
        let video_path = audio_path.with_extension("mp4");
        let scratch = tempfile::tempdir().context("failed to create scratch directory")?;
        render_scan_video(
            &sonified.image,
            &sonified.waveform,
            sonified.columns,
            &audio_path,
            &video_path,
            scratch.path(),
        )?;
    }
    Ok(())
}

fn run_rasterize(
    input: &Path,
    output: Option<PathBuf>,
    columns: usize,
    fill_last_column: bool,
    no_red_correction: bool,
    video: bool,
) -> anyhow::Result<()> {
    let waveform = wave::read_mono(input)?;

    let mut opts = RasterizeOptions::new(columns);
    if fill_last_column {
        opts.process_last_column = true;
    }
    if no_red_correction {
        opts.correction = CorrectionPolicy::None;
    }
    let rasterized = audio_to_image(&waveform, &opts)?;

    let image_path = output.unwrap_or_else(|| input.with_extension("jpg"));
    rasterized
        .image
        .save(&image_path)
        .with_context(|| format!("failed to encode {}", image_path.display()))?;
    info!("wrote {}", image_path.display());

    if video {
        let video_path = image_path.with_extension("mp4");
        let scratch = tempfile::tempdir().context("failed to create scratch directory")?;
        render_scan_video(
            &rasterized.image,
            &rasterized.waveform,
            columns,
            input,
            &video_path,
            scratch.path(),
        )?;
    }
    Ok(())
}
