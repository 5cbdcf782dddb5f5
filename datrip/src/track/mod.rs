mod details;
mod sink;
mod wav;

pub use details::render_details;
pub use sink::{FileSink, TrackSink, TrackSummary};
pub use wav::WavHeader;

use crate::audio::{active_payload_len, lp, samples_per_frame};
use crate::frame::{Encoding, Frame, FrameInfo};
use crate::Result;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use time::OffsetDateTime;
use tracing::{debug, info, trace, warn};

/// Tuning knobs for the segmenter. The defaults match the historical
/// command-line defaults.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Stop the whole run after this many consecutive non-audio frames.
    pub max_nonaudio_tape: u32,
    /// Close the open track after this many consecutive non-audio frames.
    pub max_nonaudio_track: u32,
    /// Split tracks on jumps in the subcode date/time.
    pub segment_on_datetime: bool,
    /// Split tracks on program number changes.
    pub segment_on_program_number: bool,
    /// Tracks shorter than this many seconds are deleted.
    pub min_track_seconds: f64,
    /// Tracks are closed once they reach this many seconds.
    pub max_track_seconds: f64,
    /// Stop the whole run after this many seconds of audio.
    pub max_audio_seconds: f64,
    /// Drop this many audio frames after each segment change.
    pub skip_frames_on_segment_change: u32,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_nonaudio_tape: 10,
            max_nonaudio_track: 0,
            segment_on_datetime: true,
            segment_on_program_number: true,
            min_track_seconds: 1.0,
            max_track_seconds: 360000.0,
            max_audio_seconds: 360000.0,
            skip_frames_on_segment_change: 0,
        }
    }
}

/// Why two adjacent frames cannot belong to the same track.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    DateTimeJump,
    Channels,
    SampleRate,
    ProgramNumber,
    Encoding,
    Emphasis,
}

impl Inconsistency {
    pub fn message(self) -> &'static str {
        match self {
            Self::DateTimeJump => "jump in subcode date/time",
            Self::Channels => "change in number of channels",
            Self::SampleRate => "change in sampling frequency",
            Self::ProgramNumber => "change in program number",
            Self::Encoding => "change in encoding",
            Self::Emphasis => "change in emphasis",
        }
    }
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Returns the first reason `b` cannot continue the track described by
/// `a`, or `None` if the frames are consistent. Subcode clocks may tick
/// during a frame, so dates up to one second apart still match.
pub fn inconsistent(config: &SplitConfig, a: &FrameInfo, b: &FrameInfo) -> Option<Inconsistency> {
    if config.segment_on_datetime {
        if let (Some(x), Some(y)) = (a.date_time, b.date_time) {
            if (y - x).whole_seconds().abs() > 1 {
                return Some(Inconsistency::DateTimeJump);
            }
        }
    }
    if a.channels != b.channels {
        return Some(Inconsistency::Channels);
    }
    if a.sample_rate != b.sample_rate {
        return Some(Inconsistency::SampleRate);
    }
    if config.segment_on_program_number {
        if let (Some(x), Some(y)) = (a.program_number, b.program_number) {
            if x != y {
                return Some(Inconsistency::ProgramNumber);
            }
        }
    }
    if a.encoding != b.encoding {
        return Some(Inconsistency::Encoding);
    }
    if a.emphasis != b.emphasis {
        return Some(Inconsistency::Emphasis);
    }
    None
}

struct TrackState {
    /// Format of the open track, set at open. The frame number, date, and
    /// (if initially absent) program number track the latest valid frame.
    info: FrameInfo,
    number: u32,
    samples: u64,
    first_frame: u64,
    first_date: Option<OffsetDateTime>,
    warned: HashSet<&'static str>,
}

/// Splits a stream of parsed frames into tracks, driving a [`TrackSink`].
///
/// Fed one frame at a time together with the parsed info of the frame
/// after it; the lookahead damps single-frame glitches. [`push`] returns
/// `false` once the stream should stop (end-of-tape marker, non-audio
/// run, or the audio read limit). Call [`finish`] at end-of-stream to close
/// the final track.
///
/// [`push`]: Segmenter::push
/// [`finish`]: Segmenter::finish
pub struct Segmenter<S: TrackSink> {
    config: SplitConfig,
    sink: S,
    track: Option<TrackState>,
    next_track_number: u32,
    tracks_written: u64,
    frames_read: u64,
    audio_seconds: f64,
    nonaudio_run: u32,
    skip_frames: u32,
}

impl<S: TrackSink> Segmenter<S> {
    pub fn new(config: SplitConfig, sink: S) -> Self {
        Self {
            config,
            sink,
            track: None,
            next_track_number: 1,
            tracks_written: 0,
            frames_read: 0,
            audio_seconds: 0.0,
            nonaudio_run: 0,
            skip_frames: 0,
        }
    }

    /// Processes one frame. Returns `false` when the run should stop.
    pub fn push(&mut self, frame: &Frame, info: &FrameInfo, next: &FrameInfo) -> Result<bool> {
        self.frames_read += 1;
        if info.is_end_of_tape() {
            debug!("frame {}: end-of-tape marker", info.frame_number);
            self.close_track()?;
            return Ok(false);
        }
        if info.is_gap() {
            if self.track.is_some() {
                debug!("frame {}: gap marker, closing track", info.frame_number);
                self.close_track()?;
            }
            return Ok(true);
        }
        if !info.interpolate.is_empty() {
            trace!("frame {}: drive interpolated {:?}", info.frame_number, info.interpolate);
        }
        if !info.is_audio() {
            self.push_nonaudio(info, next)
        } else {
            self.push_audio(frame, info, next)
        }
    }

    /// Closes any open track. Call once the input reaches end-of-stream.
    pub fn finish(&mut self) -> Result<()> {
        self.close_track()
    }

    /// Number of tracks written (discarded short tracks excluded).
    pub fn tracks_written(&self) -> u64 {
        self.tracks_written
    }

    /// Number of frames processed so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Seconds of audio written so far.
    pub fn audio_seconds(&self) -> f64 {
        self.audio_seconds
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn push_nonaudio(&mut self, info: &FrameInfo, next: &FrameInfo) -> Result<bool> {
        self.nonaudio_run += 1;
        if self.nonaudio_run >= self.config.max_nonaudio_tape {
            debug!("{} consecutive non-audio frames, stopping", self.nonaudio_run);
            self.close_track()?;
            return Ok(false);
        }
        let track = match &self.track {
            Some(track) => track,
            None => return Ok(true),
        };
        if next.is_audio() && inconsistent(&self.config, &track.info, next).is_none() {
            trace!("frame {}: lone non-audio frame inside a track, ignoring", info.frame_number);
            return Ok(true);
        }
        if self.nonaudio_run >= self.config.max_nonaudio_track {
            debug!(
                "frame {}: {} consecutive non-audio frames, closing track",
                info.frame_number, self.nonaudio_run,
            );
            self.close_track()?;
        }
        Ok(true)
    }

    fn push_audio(&mut self, frame: &Frame, info: &FrameInfo, next: &FrameInfo) -> Result<bool> {
        self.nonaudio_run = 0;
        let mut info = info.clone();
        if let Some(track) = &mut self.track {
            if let Some(reason) = inconsistent(&self.config, &track.info, &info) {
                if inconsistent(&self.config, &track.info, next).is_none() {
                    // The surrounding frames agree with the track, so this
                    // is a one-frame glitch. Patch the varying fields from
                    // the lookahead and keep going.
                    if track.warned.insert(reason.message()) {
                        warn!(
                            "frame {}: {} for a single frame, healing from the next frame",
                            info.frame_number, reason,
                        );
                    }
                    info.channels = next.channels;
                    info.sample_rate = next.sample_rate;
                    info.encoding = next.encoding;
                    info.emphasis = next.emphasis;
                    info.program_number = next.program_number;
                    info.date_time = next.date_time;
                } else {
                    debug!("frame {}: {}, closing track", info.frame_number, reason);
                    self.close_track()?;
                    self.skip_frames = self.config.skip_frames_on_segment_change;
                }
            }
        }
        if self.skip_frames > 0 {
            self.skip_frames -= 1;
            return Ok(true);
        }
        if self.track.is_none() {
            self.open_track(&info)?;
        }

        let track = self.track.as_mut().expect("a track is always open here");
        track.info.frame_number = info.frame_number;
        if info.date_time.is_some() {
            track.info.date_time = info.date_time;
            if track.first_date.is_none() {
                track.first_date = info.date_time;
            }
        }
        if track.info.program_number.is_none() {
            track.info.program_number = info.program_number;
        }

        let payload = match track.info.encoding {
            Encoding::Linear16 => {
                Cow::Borrowed(&frame.audio()[..active_payload_len(track.info.sample_rate)])
            }
            Encoding::NonLinear12 => Cow::Owned(lp::decode(frame.audio())),
        };
        self.sink.write(&payload)?;

        let added = samples_per_frame(&track.info);
        track.samples += added;
        self.audio_seconds += added as f64 / track.info.sample_rate as f64;
        let sample_rate = track.info.sample_rate;
        let track_samples = track.samples;

        if self.audio_seconds >= self.config.max_audio_seconds {
            debug!("read {:.1} seconds of audio, stopping", self.audio_seconds);
            self.close_track()?;
            return Ok(false);
        }
        if track_samples as f64 / sample_rate as f64 >= self.config.max_track_seconds {
            debug!("track reached {:.1} seconds, closing", self.config.max_track_seconds);
            self.close_track()?;
        }
        Ok(true)
    }

    fn open_track(&mut self, info: &FrameInfo) -> Result<()> {
        let number = self.next_track_number;
        self.next_track_number += 1;
        debug!(
            "frame {}: opening track {} ({} Hz, {} channels, {})",
            info.frame_number, number, info.sample_rate, info.channels, info.encoding,
        );
        self.sink.open(info, number)?;
        self.track = Some(TrackState {
            info: info.clone(),
            number,
            samples: 0,
            first_frame: info.frame_number,
            first_date: info.date_time,
            warned: HashSet::new(),
        });
        Ok(())
    }

    fn close_track(&mut self) -> Result<()> {
        let track = match self.track.take() {
            Some(track) => track,
            None => return Ok(()),
        };
        let min_samples = (self.config.min_track_seconds * track.info.sample_rate as f64) as u64;
        if track.samples < min_samples {
            debug!("track {}: only {} samples, deleting", track.number, track.samples);
            return self.sink.discard();
        }
        let summary = TrackSummary {
            track_number: track.number,
            sample_rate: track.info.sample_rate,
            channels: track.info.channels,
            samples: track.samples,
            encoding: track.info.encoding,
            emphasis: track.info.emphasis,
            program_number: track.info.program_number,
            first_date: track.first_date,
            last_date: track.info.date_time,
            first_frame: track.first_frame,
            last_frame: track.info.frame_number,
        };
        let name = self.sink.finish(&summary)?;
        self.tracks_written += 1;
        let seconds = summary.samples as f64 / f64::from(summary.sample_rate);
        info!(
            "wrote {}: frames {}-{}, {:.1} seconds",
            name, summary.first_frame, summary.last_frame, seconds,
        );
        Ok(())
    }
}
