use super::{subcode, Frame};
use bitflags::bitflags;
use std::fmt;
use time::OffsetDateTime;
use tracing::trace;

/// Raw packed program number marking an inter-track gap.
pub const PNO_GAP: u16 = 0x0bb;
/// Raw packed program number marking the end of the recorded area.
pub const PNO_END_OF_TAPE: u16 = 0x0ee;

/// How much of a frame's metadata could be trusted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Validity {
    /// The trailer decoded cleanly and the frame carries audio.
    Valid,
    /// The trailer carries an unrecognized channel or sample rate code.
    InvalidFields,
    /// The frame carries non-audio data.
    NonAudio,
}

/// Audio sample encoding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Encoding {
    Linear16,
    NonLinear12,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear16 => f.write_str("16-bit linear"),
            Self::NonLinear12 => f.write_str("12-bit non-linear"),
        }
    }
}

/// Pre-emphasis state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Emphasis {
    None,
    PreEmphasis,
}

impl fmt::Display for Emphasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::PreEmphasis => f.write_str("pre-emphasis"),
        }
    }
}

bitflags! {
    /// Interpolation flags set by the drive when it had to reconstruct
    /// part of a frame itself.
    pub struct InterpolateFlags: u8 {
        const LEFT = 0x40;
        const RIGHT = 0x20;
    }
}

/// Parsed metadata for one frame.
#[derive(Debug, Clone)]
pub struct FrameInfo {
    /// Sequence index assigned by the reader.
    pub frame_number: u64,
    pub validity: Validity,
    /// Number of audio channels (2 or 4).
    pub channels: u8,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    pub encoding: Encoding,
    pub emphasis: Emphasis,
    /// BCD-decoded program number, when the control bits mark it valid.
    pub program_number: Option<u16>,
    /// Raw packed program number field, including marker values.
    pub hex_pno: u16,
    pub interpolate: InterpolateFlags,
    /// Absolute timestamp from the frame's date subcode pack.
    pub date_time: Option<OffsetDateTime>,
}

impl FrameInfo {
    /// Decodes the 62-byte trailer of `frame`. Pure: the result depends
    /// only on the frame bytes. The caller assigns `frame_number`.
    pub fn parse(frame: &Frame) -> Self {
        let mainid0 = frame.mainid(0);
        let mainid1 = frame.mainid(1);
        let subid0 = frame.subid(0);
        let subid1 = frame.subid(1);

        let dataid = subid0 & 0xf;
        let ctrlid = subid0 >> 4;
        let numpacks = subid1 & 0xf;
        let pno1 = (subid1 >> 4) as u16;
        let pno2 = (frame.subid(2) >> 4) as u16;
        let pno3 = (frame.subid(2) & 0xf) as u16;
        let hex_pno = (pno1 << 8) | (pno2 << 4) | pno3;

        let channels = match mainid0 & 0x3 {
            0 => Some(2),
            1 => Some(4),
            _ => None,
        };
        let sample_rate = match (mainid0 >> 2) & 0x3 {
            0 => Some(48000),
            1 => Some(44100),
            2 => Some(32000),
            _ => None,
        };
        let emphasis = match (mainid0 >> 4) & 0x3 {
            1 => Emphasis::PreEmphasis,
            _ => Emphasis::None,
        };
        let encoding = match (mainid1 >> 6) & 0x3 {
            1 => Encoding::NonLinear12,
            _ => Encoding::Linear16,
        };
        trace!(
            "trailer: dataid={} ctrlid={:#x} numpacks={} datapacket={} scms={} width={}",
            dataid,
            ctrlid,
            numpacks,
            mainid1 & 0x3,
            (mainid1 >> 2) & 0x3,
            (mainid1 >> 4) & 0x3,
        );

        // A program number is only meaningful when both control bits are
        // set and all three digits are decimal.
        let program_number = if ctrlid & 0x4 != 0
            && ctrlid & 0x8 != 0
            && pno1 < 10
            && pno2 < 10
            && pno3 < 10
        {
            Some(pno1 * 100 + pno2 * 10 + pno3)
        } else {
            None
        };

        let validity = if dataid != 0 {
            Validity::NonAudio
        } else if channels.is_none() || sample_rate.is_none() {
            Validity::InvalidFields
        } else {
            Validity::Valid
        };

        Self {
            frame_number: 0,
            validity,
            channels: channels.unwrap_or(2),
            sample_rate: sample_rate.unwrap_or(48000),
            encoding,
            emphasis,
            program_number,
            hex_pno,
            interpolate: frame.interpolate_flags(),
            date_time: subcode::date_from_packs(frame),
        }
    }

    /// Returns `true` if the frame carries usable audio.
    pub fn is_audio(&self) -> bool {
        self.validity == Validity::Valid
    }

    /// Returns `true` if the raw program number is the inter-track gap marker.
    pub fn is_gap(&self) -> bool {
        self.hex_pno == PNO_GAP
    }

    /// Returns `true` if the raw program number is the end-of-tape marker.
    pub fn is_end_of_tape(&self) -> bool {
        self.hex_pno == PNO_END_OF_TAPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestFrame;

    #[test]
    fn test_parse_stereo_48k() {
        let frame = TestFrame { hex_pno: 0x001, ..TestFrame::default() }.build();
        let info = FrameInfo::parse(&frame);
        assert_eq!(info.validity, Validity::Valid);
        assert_eq!(info.channels, 2);
        assert_eq!(info.sample_rate, 48000);
        assert_eq!(info.encoding, Encoding::Linear16);
        assert_eq!(info.emphasis, Emphasis::None);
        assert_eq!(info.hex_pno, 0x001);
        assert_eq!(info.program_number, Some(1));
        assert!(info.interpolate.is_empty());
        assert!(info.date_time.is_none());
    }

    #[test]
    fn test_parse_rates_and_channels() {
        let frame = TestFrame { rate_code: 1, ..TestFrame::default() }.build();
        assert_eq!(FrameInfo::parse(&frame).sample_rate, 44100);
        let frame = TestFrame { rate_code: 2, ..TestFrame::default() }.build();
        assert_eq!(FrameInfo::parse(&frame).sample_rate, 32000);
        let frame = TestFrame { channels_code: 1, ..TestFrame::default() }.build();
        assert_eq!(FrameInfo::parse(&frame).channels, 4);
    }

    #[test]
    fn test_parse_invalid_fields() {
        let frame = TestFrame { rate_code: 3, ..TestFrame::default() }.build();
        assert_eq!(FrameInfo::parse(&frame).validity, Validity::InvalidFields);
        let frame = TestFrame { channels_code: 2, ..TestFrame::default() }.build();
        assert_eq!(FrameInfo::parse(&frame).validity, Validity::InvalidFields);
    }

    #[test]
    fn test_parse_non_audio() {
        let frame = TestFrame { dataid: 1, ..TestFrame::default() }.build();
        let info = FrameInfo::parse(&frame);
        assert_eq!(info.validity, Validity::NonAudio);
        assert!(!info.is_audio());
    }

    #[test]
    fn test_parse_lp_encoding() {
        let frame =
            TestFrame { rate_code: 2, encoding_code: 1, ..TestFrame::default() }.build();
        let info = FrameInfo::parse(&frame);
        assert_eq!(info.encoding, Encoding::NonLinear12);
        assert_eq!(info.sample_rate, 32000);
    }

    #[test]
    fn test_parse_markers() {
        let frame = TestFrame { hex_pno: PNO_GAP, ..TestFrame::default() }.build();
        let info = FrameInfo::parse(&frame);
        assert!(info.is_gap());
        // 0xB digits are not decimal, so no program number decodes.
        assert_eq!(info.program_number, None);

        let frame = TestFrame { hex_pno: PNO_END_OF_TAPE, ..TestFrame::default() }.build();
        assert!(FrameInfo::parse(&frame).is_end_of_tape());
    }

    #[test]
    fn test_parse_program_number_needs_control_bits() {
        let frame = TestFrame { hex_pno: 0x042, ctrlid: 0, ..TestFrame::default() }.build();
        let info = FrameInfo::parse(&frame);
        assert_eq!(info.program_number, None);
        assert_eq!(info.hex_pno, 0x042);

        let frame = TestFrame { hex_pno: 0x042, ..TestFrame::default() }.build();
        assert_eq!(FrameInfo::parse(&frame).program_number, Some(42));
    }

    #[test]
    fn test_parse_interpolate_flags() {
        let frame = TestFrame { interpolate: 0x60, ..TestFrame::default() }.build();
        let info = FrameInfo::parse(&frame);
        assert!(info.interpolate.contains(InterpolateFlags::LEFT));
        assert!(info.interpolate.contains(InterpolateFlags::RIGHT));
    }
}
