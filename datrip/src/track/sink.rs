use super::details::render_details;
use super::wav::WavHeader;
use crate::common::{format_stamp, WriteStructExt};
use crate::frame::{Emphasis, Encoding, FrameInfo};
use crate::Result;
use std::fs::{self, File, FileTimes};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::time::SystemTime;
use time::OffsetDateTime;
use tracing::debug;

/// Everything known about a track once it closes.
#[derive(Debug, Clone)]
pub struct TrackSummary {
    pub track_number: u32,
    pub sample_rate: u32,
    pub channels: u8,
    /// Per-channel sample count.
    pub samples: u64,
    pub encoding: Encoding,
    pub emphasis: Emphasis,
    pub program_number: Option<u16>,
    pub first_date: Option<OffsetDateTime>,
    pub last_date: Option<OffsetDateTime>,
    pub first_frame: u64,
    pub last_frame: u64,
}

/// Receives the audio of one track at a time from the segmenter.
///
/// Calls arrive in the order `open`, any number of `write`s, then exactly
/// one of `finish` or `discard`.
pub trait TrackSink {
    /// Starts a new track whose format is described by `info`.
    fn open(&mut self, info: &FrameInfo, track_number: u32) -> Result<()>;

    /// Appends decoded audio bytes to the open track.
    fn write(&mut self, audio: &[u8]) -> Result<()>;

    /// Completes the open track and returns its final display name.
    fn finish(&mut self, summary: &TrackSummary) -> Result<String>;

    /// Abandons the open track, deleting anything written for it.
    fn discard(&mut self) -> Result<()>;
}

struct OpenTrack {
    file: File,
    path: PathBuf,
    header: WavHeader,
}

/// Writes each track to a WAV file plus a `.details` sidecar.
///
/// While a track is open it lives under a provisional `.wav.tmp` name
/// with a placeholder header. On finish the header is rewritten in place
/// with the final length, the file is renamed after the track's first
/// subcode date (or its track number when no date was seen), and both
/// files get their timestamps set to that date.
pub struct FileSink {
    prefix: String,
    open: Option<OpenTrack>,
}

impl FileSink {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), open: None }
    }
}

impl TrackSink for FileSink {
    fn open(&mut self, info: &FrameInfo, track_number: u32) -> Result<()> {
        assert!(self.open.is_none());
        let path = PathBuf::from(format!("{}{}.wav.tmp", self.prefix, track_number));
        let mut file = File::create(&path)?;
        let header = WavHeader::new(info.channels.into(), info.sample_rate);
        file.write_struct(&header)?;
        debug!("opened {}", path.display());
        self.open = Some(OpenTrack { file, path, header });
        Ok(())
    }

    fn write(&mut self, audio: &[u8]) -> Result<()> {
        let track = self.open.as_mut().expect("no open track");
        track.file.write_all(audio)?;
        Ok(())
    }

    fn finish(&mut self, summary: &TrackSummary) -> Result<String> {
        let mut track = self.open.take().expect("no open track");
        track.header.set_samples(summary.samples);
        track.file.seek(SeekFrom::Start(0))?;
        track.file.write_struct(&track.header)?;
        if let Some(date) = summary.first_date {
            set_file_times(&track.file, date)?;
        }
        drop(track.file);

        let base = match summary.first_date {
            Some(date) => format!("{}{}", self.prefix, format_stamp(date)),
            None => format!("{}{}", self.prefix, summary.track_number),
        };
        let wav_path = PathBuf::from(format!("{base}.wav"));
        fs::rename(&track.path, &wav_path)?;

        let details_path = PathBuf::from(format!("{base}.details"));
        let mut details = File::create(&details_path)?;
        details.write_all(render_details(summary).as_bytes())?;
        if let Some(date) = summary.first_date {
            set_file_times(&details, date)?;
        }
        Ok(wav_path.display().to_string())
    }

    fn discard(&mut self) -> Result<()> {
        let track = self.open.take().expect("no open track");
        drop(track.file);
        fs::remove_file(&track.path)?;
        debug!("deleted {}", track.path.display());
        Ok(())
    }
}

fn set_file_times(file: &File, date: OffsetDateTime) -> io::Result<()> {
    let stamp = SystemTime::from(date);
    file.set_times(FileTimes::new().set_accessed(stamp).set_modified(stamp))
}
