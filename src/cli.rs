//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "pixelwave")]
#[command(about = "Bidirectional image <-> audio spectral transformer", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render an image into an audio waveform, one column per audio chunk
    Sonify {
        /// Input image file
        input: PathBuf,

        /// Output WAV path (defaults to the input with a .wav extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sample rate of the generated audio in Hz
        #[arg(short = 'r', long, default_value_t = 44_100)]
        sample_rate: u32,

        /// Crossfade adjacent segments by this percentage of half a segment
        /// (0 < pct <= 100); smooths the seams but loses data
        #[arg(short, long)]
        crossfade: Option<f32>,

        /// Resize the image by this factor before converting
        #[arg(long, default_value_t = 1.0)]
        resize: f32,

        /// Also render the scan video next to the audio
        #[arg(long)]
        video: bool,
    },

    /// Reconstruct an image from a mono 16-bit WAV file
    Rasterize {
        /// Input WAV file (mono, 16-bit integer PCM)
        input: PathBuf,

        /// Output image path (defaults to the input with a .jpg extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of pixel columns in the reconstructed image
        #[arg(short = 'c', long)]
        columns: usize,

        /// Render the final audio chunk into the final column instead of
        /// leaving it black
        #[arg(long)]
        fill_last_column: bool,

        /// Skip the low-frequency red-channel correction
        #[arg(long)]
        no_red_correction: bool,

        /// Also render the scan video next to the image
        #[arg(long)]
        video: bool,
    },
}
