use crate::frame::{Frame, FRAME_SIZE, PNO_GAP};
use crate::{Error, Result};
use std::io::{Read, Write};
use tracing::{debug, trace};

/// Counters accumulated over a merge run.
#[derive(Debug, Default, Clone)]
pub struct MergeStats {
    /// Number of frames emitted.
    pub frames: u64,
    /// Per-input count of bytes that lost a vote.
    pub corrected: [u64; 3],
    /// Number of byte positions where all three inputs disagreed.
    pub uncorrected: u64,
}

/// Merges three independent reads of the same tape into one corrected
/// image.
///
/// Where all three reads agree the output is byte-identical to the
/// inputs. Where they split two-against-one, the majority carries and the
/// odd input is charged an error. A read that flagged its own frame as
/// interpolated is distrusted: if exactly one input is unflagged and its
/// byte disagrees with both others, its byte is adopted outright. When
/// all three disagree, the input with the fewest accumulated errors wins.
pub struct Merger<R: Read, W: Write> {
    inputs: [R; 3],
    out: W,
    stats: MergeStats,
}

impl<R: Read, W: Write> Merger<R, W> {
    pub fn new(inputs: [R; 3], out: W) -> Self {
        Self { inputs, out, stats: MergeStats::default() }
    }

    /// Runs the merge to completion. End-of-stream on any input ends the
    /// run cleanly. The counters remain readable through `stats()` even
    /// when the run fails.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let first = match self.read_input(0)? {
                Some(frame) => frame,
                None => return Ok(()),
            };
            let second = match self.read_input(1)? {
                Some(frame) => frame,
                None => return Ok(()),
            };
            let third = match self.read_input(2)? {
                Some(frame) => frame,
                None => return Ok(()),
            };
            self.merge_frame(&[first, second, third])?;
            self.stats.frames += 1;

            // A divergence rate past one byte in sixteen frames means the
            // images are not three reads of the same tape.
            if self.stats.uncorrected > FRAME_SIZE as u64
                && self.stats.uncorrected > self.stats.frames * FRAME_SIZE as u64 / 16
            {
                return Err(Error::Misaligned);
            }
        }
    }

    pub fn stats(&self) -> &MergeStats {
        &self.stats
    }

    /// Reads the next frame from one input. While still aligning on the
    /// very first frame, leading gap-marker frames are discarded so that
    /// reads which started a little early stay in step.
    fn read_input(&mut self, index: usize) -> Result<Option<Frame>> {
        loop {
            let frame = match Frame::read_from_opt(&mut self.inputs[index])? {
                Some(frame) => frame,
                None => return Ok(None),
            };
            if self.stats.frames == 0 && frame.hex_pno() == PNO_GAP {
                debug!("input {}: skipping leading gap frame", index);
                continue;
            }
            return Ok(Some(frame));
        }
    }

    fn merge_frame(&mut self, frames: &[Frame; 3]) -> Result<()> {
        let bytes = [frames[0].as_bytes(), frames[1].as_bytes(), frames[2].as_bytes()];
        let clean = [
            frames[0].interpolate_flags().is_empty(),
            frames[1].interpolate_flags().is_empty(),
            frames[2].interpolate_flags().is_empty(),
        ];
        let lone_clean = match clean {
            [true, false, false] => Some(0),
            [false, true, false] => Some(1),
            [false, false, true] => Some(2),
            _ => None,
        };

        let mut out = [0u8; FRAME_SIZE];
        for (n, slot) in out.iter_mut().enumerate() {
            let b = [bytes[0][n], bytes[1][n], bytes[2][n]];
            *slot = if b[0] == b[1] && b[1] == b[2] {
                b[0]
            } else if let Some(i) = self.interpolate_assist(lone_clean, b) {
                b[i]
            } else if b[0] == b[1] {
                self.stats.corrected[2] += 1;
                b[0]
            } else if b[0] == b[2] {
                self.stats.corrected[1] += 1;
                b[0]
            } else if b[1] == b[2] {
                self.stats.corrected[0] += 1;
                b[1]
            } else {
                self.stats.uncorrected += 1;
                let pick = self.least_errors();
                trace!("frame {} byte {}: three-way split, keeping input {}", self.stats.frames, n, pick);
                b[pick]
            };
        }
        self.out.write_all(&out)?;
        Ok(())
    }

    /// When exactly one input did not flag itself as interpolated and its
    /// byte disagrees with both others, that byte is taken as authoritative
    /// and both flagged inputs are charged an error.
    fn interpolate_assist(&mut self, lone_clean: Option<usize>, b: [u8; 3]) -> Option<usize> {
        let i = lone_clean?;
        if b[i] != b[(i + 1) % 3] && b[i] != b[(i + 2) % 3] {
            self.stats.corrected[(i + 1) % 3] += 1;
            self.stats.corrected[(i + 2) % 3] += 1;
            Some(i)
        } else {
            None
        }
    }

    /// Picks the input with the fewest accumulated errors, preferring the
    /// smallest index on ties.
    fn least_errors(&self) -> usize {
        let c = &self.stats.corrected;
        if c[0] <= c[1] {
            if c[2] < c[0] {
                2
            } else {
                0
            }
        } else if c[2] < c[1] {
            2
        } else {
            1
        }
    }
}
