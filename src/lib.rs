//! Bidirectional image <-> audio spectral transformation.
//!
//! Each image column is read as a one-sided frequency spectrum (red = low
//! band, green = mid, blue = high) and rendered to audio through an inverse
//! real FFT; the reverse direction chunks a waveform, forward-transforms each
//! chunk, and rebuilds pixel columns from band magnitudes. The mapping is
//! deliberately lossy: phase is discarded and every segment is re-normalized.

pub mod cli;
pub mod crossfade;
pub mod error;
pub mod params;
pub mod rasterize;
pub mod sonify;
pub mod spectral;
pub mod video;
pub mod wave;

pub use error::{Error, Result};
