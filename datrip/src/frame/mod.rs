mod info;
mod subcode;

pub use info::*;
pub use subcode::PackId;

use crate::{Error, Result};
use std::io::{ErrorKind, Read};

/// The size of one tape frame in bytes.
pub const FRAME_SIZE: usize = 5822;
/// The size of a frame's audio payload in bytes.
pub const AUDIO_SIZE: usize = 5760;
/// The number of 8-byte subcode packs in a frame.
pub const PACK_COUNT: usize = 7;

const SUBID_OFFSET: usize = 5816;
const MAINID_OFFSET: usize = 5820;

/// One tape frame: 5760 bytes of audio payload followed by a 62-byte
/// subcode trailer.
pub struct Frame(Box<[u8; FRAME_SIZE]>);

impl Frame {
    /// Reads the next frame from `reader`. Returns `Ok(None)` on a clean
    /// end-of-stream and `Error::ShortRead` if the stream ends inside a
    /// frame.
    pub fn read_from_opt<R: Read + ?Sized>(reader: &mut R) -> Result<Option<Self>> {
        let mut data: Box<[u8; FRAME_SIZE]> = Box::new([0; FRAME_SIZE]);
        let mut filled = 0;
        while filled < FRAME_SIZE {
            match reader.read(&mut data[filled..]) {
                Ok(0) => break,
                Ok(len) => filled += len,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        match filled {
            0 => Ok(None),
            FRAME_SIZE => Ok(Some(Self(data))),
            _ => Err(Error::ShortRead),
        }
    }

    /// Returns the raw frame contents.
    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.0
    }

    /// Returns the audio payload.
    pub fn audio(&self) -> &[u8] {
        &self.0[..AUDIO_SIZE]
    }

    /// Returns the 8-byte subcode pack at `index`.
    pub fn pack(&self, index: usize) -> &[u8] {
        assert!(index < PACK_COUNT);
        &self.0[AUDIO_SIZE + index * 8..AUDIO_SIZE + index * 8 + 8]
    }

    /// Returns sub-id byte `index` (0-3).
    pub fn subid(&self, index: usize) -> u8 {
        self.0[SUBID_OFFSET + index]
    }

    /// Returns main-id byte `index` (0-1).
    pub fn mainid(&self, index: usize) -> u8 {
        self.0[MAINID_OFFSET + index]
    }

    /// Decodes just the raw packed program number from the trailer. This is
    /// the cheap sub-parse the merge pass uses to spot marker frames.
    pub fn hex_pno(&self) -> u16 {
        let pno1 = (self.subid(1) >> 4) as u16;
        let pno2 = (self.subid(2) >> 4) as u16;
        let pno3 = (self.subid(2) & 0xf) as u16;
        (pno1 << 8) | (pno2 << 4) | pno3
    }

    /// Decodes just the interpolation flags from the trailer.
    pub fn interpolate_flags(&self) -> InterpolateFlags {
        InterpolateFlags::from_bits_truncate(self.subid(3))
    }
}

impl From<[u8; FRAME_SIZE]> for Frame {
    fn from(data: [u8; FRAME_SIZE]) -> Self {
        Self(Box::new(data))
    }
}

/// A frame together with its parsed metadata.
pub struct Parsed {
    pub frame: Frame,
    pub info: FrameInfo,
}

/// Reads frames from a byte stream, assigning sequence numbers and keeping
/// one frame of lookahead so callers can damp single-frame glitches.
pub struct FrameReader<R: Read> {
    reader: R,
    pending: Option<Parsed>,
    next_number: u64,
    primed: bool,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, pending: None, next_number: 0, primed: false }
    }

    /// Reads and discards `count` frames. Stops early at end-of-stream.
    pub fn seek_frames(&mut self, count: u32) -> Result<()> {
        for _ in 0..count {
            if Frame::read_from_opt(&mut self.reader)?.is_none() {
                break;
            }
            self.next_number += 1;
        }
        Ok(())
    }

    /// Returns the next frame paired with the parsed info of the frame
    /// after it. The final frame is paired with a copy of its own info.
    pub fn next_with_lookahead(&mut self) -> Result<Option<(Parsed, FrameInfo)>> {
        if !self.primed {
            self.pending = self.read_parsed()?;
            self.primed = true;
        }
        let current = match self.pending.take() {
            Some(parsed) => parsed,
            None => return Ok(None),
        };
        self.pending = self.read_parsed()?;
        let lookahead = match &self.pending {
            Some(next) => next.info.clone(),
            None => current.info.clone(),
        };
        Ok(Some((current, lookahead)))
    }

    fn read_parsed(&mut self) -> Result<Option<Parsed>> {
        let frame = match Frame::read_from_opt(&mut self.reader)? {
            Some(frame) => frame,
            None => return Ok(None),
        };
        let mut info = FrameInfo::parse(&frame);
        info.frame_number = self.next_number;
        self.next_number += 1;
        Ok(Some(Parsed { frame, info }))
    }
}
