use crate::common::datetime_from_parts;
use crate::frame::{Frame, AUDIO_SIZE, FRAME_SIZE};

/// Builds syntactically-valid frames for tests. The defaults describe a
/// stereo 48 kHz 16-bit frame with program number 1 and no subcode packs.
#[derive(Clone)]
pub(crate) struct TestFrame {
    pub audio_fill: u8,
    pub hex_pno: u16,
    pub dataid: u8,
    pub ctrlid: u8,
    pub channels_code: u8,
    pub rate_code: u8,
    pub emphasis_code: u8,
    pub encoding_code: u8,
    pub interpolate: u8,
    /// Date pack components: (year, month, day, hour, minute, second).
    pub date: Option<(i32, u8, u8, u8, u8, u8)>,
    pub corrupt_date_parity: bool,
}

impl Default for TestFrame {
    fn default() -> Self {
        Self {
            audio_fill: 0,
            hex_pno: 0x001,
            dataid: 0,
            ctrlid: 0xc,
            channels_code: 0,
            rate_code: 0,
            emphasis_code: 0,
            encoding_code: 0,
            interpolate: 0,
            date: None,
            corrupt_date_parity: false,
        }
    }
}

impl TestFrame {
    pub fn build(&self) -> Frame {
        let mut data = [0u8; FRAME_SIZE];
        data[..AUDIO_SIZE].iter_mut().for_each(|b| *b = self.audio_fill);

        let mut numpacks = 0;
        if let Some((year, month, day, hour, minute, second)) = self.date {
            let weekday = datetime_from_parts(year, month, day, 0, 0, 0)
                .map(|d| d.weekday().number_days_from_sunday())
                .unwrap_or(0);
            let pack = &mut data[AUDIO_SIZE..AUDIO_SIZE + 8];
            pack[0] = 0x50 | weekday;
            pack[1] = to_bcd((year % 100) as u8);
            pack[2] = to_bcd(month);
            pack[3] = to_bcd(day);
            // Recorders stamp the hour one ahead; the parser undoes it.
            pack[4] = to_bcd(hour + 1);
            pack[5] = to_bcd(minute);
            pack[6] = to_bcd(second);
            pack[7] = pack[..7].iter().fold(0, |acc, b| acc ^ b);
            if self.corrupt_date_parity {
                pack[7] ^= 0xff;
            }
            numpacks = 1;
        }

        data[5816] = (self.ctrlid << 4) | (self.dataid & 0xf);
        data[5817] = (((self.hex_pno >> 8) as u8 & 0xf) << 4) | numpacks;
        data[5818] = (((self.hex_pno >> 4) as u8 & 0xf) << 4) | (self.hex_pno as u8 & 0xf);
        data[5819] = self.interpolate;
        data[5820] =
            (self.channels_code & 0x3) | ((self.rate_code & 0x3) << 2) | ((self.emphasis_code & 0x3) << 4);
        data[5821] = (self.encoding_code & 0x3) << 6;
        Frame::from(data)
    }

    pub fn build_bytes(&self) -> Vec<u8> {
        self.build().as_bytes().to_vec()
    }
}

fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}
