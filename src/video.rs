//! Scan-line video rendering: a white bar sweeps the image in sync with the
//! audio.
//!
//! Frame generation is plain pixel work; assembly and muxing are delegated to
//! an external `ffmpeg` binary. Frames land in a caller-owned scratch
//! directory (a `TempDir` in the binary) so cleanup is guaranteed on every
//! exit path.

use std::path::{Path, PathBuf};

use duct::cmd;
use image::{Rgb, RgbImage};
use indicatif::ProgressBar;
use log::info;

use crate::error::{Error, Result};
use crate::wave::Waveform;

/// Scan bar color.
const SCAN_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Frame rate at which a `columns`-frame scan spans the audio exactly.
pub fn scan_fps(sample_count: usize, sample_rate: u32, columns: usize) -> Result<f64> {
    if sample_count == 0 || sample_rate == 0 || columns == 0 {
        return Err(Error::InvalidInput(
            "scan video needs a non-empty waveform and at least one column".into(),
        ));
    }
    let duration_secs = sample_count as f64 / sample_rate as f64;
    Ok(columns as f64 / duration_secs)
}

/// Write one PNG frame per column into `dir`; frame `i` is the base image
/// with column `i` overwritten in white. Returns the paths in scan order.
pub fn write_scan_frames(image: &RgbImage, dir: &Path) -> Result<Vec<PathBuf>> {
    let bar = ProgressBar::new(image.width() as u64);
    let mut paths = Vec::with_capacity(image.width() as usize);

    for col in 0..image.width() {
        let mut frame = image.clone();
        for y in 0..frame.height() {
            frame.put_pixel(col, y, SCAN_COLOR);
        }

        let path = dir.join(format!("frame_{col:05}.png"));
        frame.save(&path).map_err(|e| Error::encode(&path, e))?;
        paths.push(path);
        bar.inc(1);
    }

    bar.finish();
    Ok(paths)
}

/// Render the synchronized scan video: `columns` frames at the computed rate,
/// assembled by ffmpeg with `audio_path` muxed in.
pub fn render_scan_video(
    image: &RgbImage,
    waveform: &Waveform,
    columns: usize,
    audio_path: &Path,
    video_path: &Path,
    scratch: &Path,
) -> Result<()> {
    if columns != image.width() as usize {
        return Err(Error::InvalidInput(format!(
            "column count {} does not match image width {}",
            columns,
            image.width()
        )));
    }

    let fps = scan_fps(waveform.samples.len(), waveform.sample_rate, columns)?;
    info!(
        "rendering {columns} scan frames at {fps:.2} fps ({:.2}s of audio)",
        waveform.duration_secs()
    );

    write_scan_frames(image, scratch)?;
    mux(scratch, fps, audio_path, video_path)?;

    info!("wrote video to {}", video_path.display());
    Ok(())
}

/// Assemble the frame sequence and audio track with ffmpeg.
fn mux(dir: &Path, fps: f64, audio_path: &Path, video_path: &Path) -> Result<()> {
    let pattern = dir.join("frame_%05d.png");
    let args = [
        "-y".to_string(),
        "-framerate".into(),
        format!("{fps:.6}"),
        "-i".into(),
        pattern.display().to_string(),
        "-i".into(),
        audio_path.display().to_string(),
        // libx264 with yuv420p needs even dimensions
        "-vf".into(),
        "scale=trunc(iw/2)*2:trunc(ih/2)*2".into(),
        "-c:v".into(),
        "libx264".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-c:a".into(),
        "aac".into(),
        "-shortest".into(),
        video_path.display().to_string(),
    ];

    let output = cmd("ffmpeg", args)
        .stderr_to_stdout()
        .stdout_capture()
        .unchecked()
        .run()
        .map_err(|e| Error::encode(video_path, e))?;

    if !output.status.success() {
        return Err(Error::encode(
            video_path,
            format!(
                "ffmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stdout)
            ),
        ));
    }
    Ok(())
}
