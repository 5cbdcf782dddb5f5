use clap::Parser;
use datrip::track::SplitConfig;
use std::path::PathBuf;

/// Command-line arguments for the demultiplexer.
#[derive(Parser)]
#[command(name = "datsplit", about = "Splits a DAT tape image into audio tracks")]
pub struct SplitArgs {
    /// Stop after this many consecutive non-audio frames
    #[arg(short = 'a', long = "max_nonaudio_tape", value_name = "N", default_value_t = 10)]
    pub max_nonaudio_tape: u32,

    /// Close the current track after this many consecutive non-audio frames
    #[arg(short = 'A', long = "max_nonaudio_track", value_name = "N", default_value_t = 0)]
    pub max_nonaudio_track: u32,

    /// Do not split tracks on subcode date/time jumps
    #[arg(short = 'd', long = "ignore_date_time")]
    pub ignore_date_time: bool,

    /// Delete tracks shorter than this many seconds
    #[arg(
        short = 'm',
        long = "minimum_track_length",
        value_name = "SECONDS",
        default_value_t = 1.0
    )]
    pub minimum_track_length: f64,

    /// Close tracks once they reach this many seconds
    #[arg(
        short = 'M',
        long = "maximum_track_length",
        value_name = "SECONDS",
        default_value_t = 360000.0
    )]
    pub maximum_track_length: f64,

    /// Do not split tracks on program number changes
    #[arg(short = 'n', long = "ignore_program_number")]
    pub ignore_program_number: bool,

    /// Prefix for output filenames
    #[arg(short = 'p', long = "prefix", value_name = "PREFIX", default_value = "")]
    pub prefix: String,

    /// Suppress warnings
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Stop after this many seconds of audio
    #[arg(short = 'r', long = "read_n_seconds", value_name = "SECONDS", default_value_t = 360000.0)]
    pub read_n_seconds: f64,

    /// Drop this many frames after each segment change
    #[arg(short = 's', long = "skip_n_frames", value_name = "N", default_value_t = 0)]
    pub skip_n_frames: u32,

    /// Skip this many frames at the start of the input
    #[arg(short = 'S', long = "seek_n_frames", value_name = "N", default_value_t = 0)]
    pub seek_n_frames: u32,

    /// Verbosity level (0-5)
    #[arg(short = 'v', long = "verbose", value_name = "LEVEL", default_value_t = 1)]
    pub verbose: u8,

    /// Print version information and continue
    #[arg(short = 'V', long = "version")]
    pub version: bool,

    /// Tape image to read ('-' for standard input)
    #[arg(value_name = "IMAGE", default_value = "-")]
    pub input: PathBuf,
}

impl SplitArgs {
    /// Builds the segmenter configuration. A per-track non-audio limit
    /// above the tape limit raises the tape limit to match.
    pub fn config(&self) -> SplitConfig {
        SplitConfig {
            max_nonaudio_tape: self.max_nonaudio_tape.max(self.max_nonaudio_track),
            max_nonaudio_track: self.max_nonaudio_track,
            segment_on_datetime: !self.ignore_date_time,
            segment_on_program_number: !self.ignore_program_number,
            min_track_seconds: self.minimum_track_length,
            max_track_seconds: self.maximum_track_length,
            max_audio_seconds: self.read_n_seconds,
            skip_frames_on_segment_change: self.skip_n_frames,
        }
    }
}

/// Command-line arguments for the triple-merge tool.
#[derive(Parser)]
#[command(name = "datmerge", about = "Merges three reads of a DAT tape into one corrected image")]
pub struct MergeArgs {
    /// Suppress warnings
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbosity level (0-5)
    #[arg(short = 'v', long = "verbose", value_name = "LEVEL", default_value_t = 1)]
    pub verbose: u8,

    /// Print version information and continue
    #[arg(short = 'V', long = "version")]
    pub version: bool,

    /// First tape image
    #[arg(value_name = "IMAGE1")]
    pub first: PathBuf,

    /// Second tape image
    #[arg(value_name = "IMAGE2")]
    pub second: PathBuf,

    /// Third tape image
    #[arg(value_name = "IMAGE3")]
    pub third: PathBuf,
}
