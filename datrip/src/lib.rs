#![deny(
    absolute_paths_not_starting_with_crate,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unreachable_patterns,
    unused_import_braces,
    unused_lifetimes,
    unused_must_use,
    unused_qualifications,
    variant_size_differences
)]

//! Recovers audio from DAT tapes read through audio-capable DDS drives.
//!
//! The library is organized around a stream of 5822-byte tape frames:
//!
//! - [`frame`] parses each frame's subcode trailer into a [`frame::FrameInfo`].
//! - [`merge`] reconstructs one clean image from three noisy reads.
//! - [`audio`] turns a frame's payload into 16-bit little-endian PCM,
//!   including the 12-bit non-linear long-play decode.
//! - [`track`] segments the frame stream into tracks and emits WAV files
//!   with sidecar metadata.

#[macro_use]
mod macros;

pub mod audio;
pub mod common;
pub mod frame;
pub mod merge;
pub mod track;

#[cfg(test)]
mod test;

use std::io;
use thiserror::Error;

/// The result type for tape operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for tape operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("tape image ends in the middle of a frame")]
    ShortRead,

    #[error("input images are unaligned or badly damaged")]
    Misaligned,

    #[error(transparent)]
    Io(Box<io::Error>),
}

from_error_boxed!(Error::Io, io::Error);
