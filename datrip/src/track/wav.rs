use crate::common::{ReadFrom, WriteTo};
use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use std::io::{self, Read, Write};

const fn fourcc(s: &[u8]) -> u32 {
    (s[0] as u32) | ((s[1] as u32) << 8) | ((s[2] as u32) << 16) | ((s[3] as u32) << 24)
}

const ID_DATA: u32 = fourcc(b"data");
const ID_FMT: u32 = fourcc(b"fmt ");
const ID_RIFF: u32 = fourcc(b"RIFF");
const ID_WAVE: u32 = fourcc(b"WAVE");

const WAVE_FORMAT_PCM: u16 = 0x1;
const FORMAT_CHUNK_SIZE: u32 = 16;
const BITS_PER_SAMPLE: u16 = 16;

/// The size of the complete header in bytes.
pub const HEADER_SIZE: u32 = 44;

/// The 44-byte RIFF/WAVE header of a 16-bit PCM track.
///
/// Written once with a zero data length when a track opens, then
/// rewritten in place with the final length when it closes. All fields
/// are little-endian regardless of host.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct WavHeader {
    /// The number of channels stored in the file.
    pub channels: u16,
    /// The sample rate.
    pub sample_rate: u32,
    /// The size of the data chunk, excluding its header.
    pub data_length: u32,
}

impl WavHeader {
    pub fn new(channels: u16, sample_rate: u32) -> Self {
        Self { channels, sample_rate, data_length: 0 }
    }

    /// Sets the data length from a per-channel sample count.
    pub fn set_samples(&mut self, samples: u64) {
        self.data_length = (samples * u64::from(self.channels) * 2) as u32;
    }
}

fn expect_id<R: Read + ?Sized>(reader: &mut R, id: u32) -> io::Result<()> {
    if reader.read_u32::<LE>()? != id {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "not a WAV header"));
    }
    Ok(())
}

impl<R: Read + ?Sized> ReadFrom<R> for WavHeader {
    type Error = io::Error;
    fn read_from(reader: &mut R) -> io::Result<Self> {
        expect_id(reader, ID_RIFF)?;
        let riff_size = reader.read_u32::<LE>()?;
        expect_id(reader, ID_WAVE)?;
        expect_id(reader, ID_FMT)?;
        if reader.read_u32::<LE>()? != FORMAT_CHUNK_SIZE
            || reader.read_u16::<LE>()? != WAVE_FORMAT_PCM
        {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "unsupported WAV format"));
        }
        let channels = reader.read_u16::<LE>()?;
        let sample_rate = reader.read_u32::<LE>()?;
        let _avg_bytes_per_sec = reader.read_u32::<LE>()?;
        let _block_align = reader.read_u16::<LE>()?;
        let _bits_per_sample = reader.read_u16::<LE>()?;
        expect_id(reader, ID_DATA)?;
        let data_length = reader.read_u32::<LE>()?;
        if riff_size != HEADER_SIZE - 8 + data_length {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "inconsistent WAV sizes"));
        }
        Ok(Self { channels, sample_rate, data_length })
    }
}

impl<W: Write + ?Sized> WriteTo<W> for WavHeader {
    type Error = io::Error;
    fn write_to(&self, writer: &mut W) -> io::Result<()> {
        let block_align = self.channels * 2;
        writer.write_u32::<LE>(ID_RIFF)?;
        writer.write_u32::<LE>(HEADER_SIZE - 8 + self.data_length)?;
        writer.write_u32::<LE>(ID_WAVE)?;
        writer.write_u32::<LE>(ID_FMT)?;
        writer.write_u32::<LE>(FORMAT_CHUNK_SIZE)?;
        writer.write_u16::<LE>(WAVE_FORMAT_PCM)?;
        writer.write_u16::<LE>(self.channels)?;
        writer.write_u32::<LE>(self.sample_rate)?;
        writer.write_u32::<LE>(self.sample_rate * u32::from(block_align))?;
        writer.write_u16::<LE>(block_align)?;
        writer.write_u16::<LE>(BITS_PER_SAMPLE)?;
        writer.write_u32::<LE>(ID_DATA)?;
        writer.write_u32::<LE>(self.data_length)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::WriteStructExt;

    #[rustfmt::skip]
    const EXPECTED_HEADER: &[u8] = &[
        b'R', b'I', b'F', b'F', 0x24, 0x3c, 0x00, 0x00,
        b'W', b'A', b'V', b'E',

        b'f', b'm', b't', b' ', 0x10, 0x00, 0x00, 0x00,
        0x01, 0x00, // format_tag
        0x02, 0x00, // channels
        0x80, 0xbb, 0x00, 0x00, // sample_rate
        0x00, 0xee, 0x02, 0x00, // avg_bytes_per_sec
        0x04, 0x00, // block_align
        0x10, 0x00, // bits_per_sample

        b'd', b'a', b't', b'a', 0x00, 0x3c, 0x00, 0x00,
    ];

    #[test]
    fn test_write_header() -> io::Result<()> {
        let mut header = WavHeader::new(2, 48000);
        header.set_samples(3840);
        let mut bytes = vec![];
        bytes.write_struct(&header)?;
        assert_eq!(bytes.len(), HEADER_SIZE as usize);
        assert_eq!(bytes, EXPECTED_HEADER);
        Ok(())
    }

    #[test]
    fn test_placeholder_header_has_zero_length() -> io::Result<()> {
        let header = WavHeader::new(2, 44100);
        let mut bytes = vec![];
        bytes.write_struct(&header)?;
        assert_eq!(&bytes[4..8], &36u32.to_le_bytes());
        assert_eq!(&bytes[40..44], &0u32.to_le_bytes());
        Ok(())
    }

    #[test]
    fn test_write_and_read_header() -> io::Result<()> {
        let mut header = WavHeader::new(2, 32000);
        header.set_samples(1920);
        let mut bytes = vec![];
        bytes.write_struct(&header)?;
        let read_back = WavHeader::read_from(&mut &bytes[..])?;
        assert_eq!(read_back, header);
        Ok(())
    }

    #[test]
    fn test_read_rejects_garbage() {
        let bytes = [0u8; 44];
        assert!(WavHeader::read_from(&mut &bytes[..]).is_err());
    }
}
