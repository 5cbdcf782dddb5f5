pub mod lp;
pub mod tables;

use crate::frame::{Encoding, FrameInfo, AUDIO_SIZE};

/// Returns how many leading bytes of a frame's payload carry audio at the
/// given sample rate: 5760 at 48 kHz, 5292 at 44.1 kHz, 3840 at 32 kHz.
/// The rest of the payload is padding at the lower rates.
pub fn active_payload_len(sample_rate: u32) -> usize {
    AUDIO_SIZE * sample_rate as usize / 48000
}

/// Returns the number of per-channel samples one frame contributes, which
/// depends only on the encoding, sample rate, and channel count.
pub fn samples_per_frame(info: &FrameInfo) -> u64 {
    let bytes = match info.encoding {
        Encoding::Linear16 => active_payload_len(info.sample_rate),
        Encoding::NonLinear12 => lp::DECODED_SIZE,
    };
    (bytes / (2 * info.channels as usize)) as u64
}
