use super::{Frame, PACK_COUNT};
use crate::common::datetime_from_parts;
use time::OffsetDateTime;
use tracing::{debug, trace, warn};

/// Subcode pack identifiers (the high nibble of a pack's first byte).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PackId {
    ProgramTime,
    AbsoluteTime,
    RunningTime,
    Toc,
    Date,
    Catalog,
    Isrc,
    ProBinary,
}

impl PackId {
    fn from_raw(id: u8) -> Option<Self> {
        Some(match id {
            1 => Self::ProgramTime,
            2 => Self::AbsoluteTime,
            3 => Self::RunningTime,
            4 => Self::Toc,
            5 => Self::Date,
            6 => Self::Catalog,
            7 => Self::Isrc,
            8 => Self::ProBinary,
            _ => return None,
        })
    }
}

/// Decodes a two-digit BCD byte.
pub(crate) fn bcd(b: u8) -> u8 {
    ((b >> 4) & 0xf) * 10 + (b & 0xf)
}

/// Scans the frame's seven subcode packs and returns the timestamp from a
/// date pack, if one decodes. Packs whose parity byte does not match are
/// dropped; the frame stays usable.
pub(super) fn date_from_packs(frame: &Frame) -> Option<OffsetDateTime> {
    let mut date = None;
    for index in 0..PACK_COUNT {
        let pack = frame.pack(index);
        let id = pack[0] >> 4;
        if id == 0 {
            continue;
        }
        let parity = pack[..7].iter().fold(0, |acc, b| acc ^ b);
        if parity != pack[7] {
            debug!("dropping subcode pack {} (id {}): bad parity", index, id);
            continue;
        }
        match PackId::from_raw(id) {
            Some(PackId::Date) => date = decode_date(pack),
            Some(kind @ (PackId::ProgramTime | PackId::AbsoluteTime | PackId::RunningTime)) => {
                trace!(
                    "{:?} pack: {:02}:{:02}:{:02}",
                    kind,
                    bcd(pack[4]),
                    bcd(pack[5]),
                    bcd(pack[6]),
                );
            }
            Some(kind) => trace!("ignoring {:?} pack", kind),
            None => trace!("ignoring unknown subcode pack id {}", id),
        }
    }
    date
}

/// Decodes a date pack into an absolute timestamp. Recorders stamp the
/// hour one ahead of wall-clock, so it is decoded minus one. Two-digit
/// years below 50 fall in the 2000s.
fn decode_date(pack: &[u8]) -> Option<OffsetDateTime> {
    let weekday = pack[0] & 0xf;
    let short_year = bcd(pack[1]) as i32;
    let year = 1900 + short_year + if short_year < 50 { 100 } else { 0 };
    let month = bcd(pack[2]);
    let day = bcd(pack[3]);
    let hour = bcd(pack[4]);
    let minute = bcd(pack[5]);
    let second = bcd(pack[6]);

    if hour == 0 {
        warn!("ignoring subcode date with hour field 0");
        return None;
    }
    let date = match datetime_from_parts(year, month, day, hour - 1, minute, second) {
        Some(date) => date,
        None => {
            warn!(
                "ignoring out-of-range subcode date {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year,
                month,
                day,
                hour - 1,
                minute,
                second,
            );
            return None;
        }
    };
    let computed = date.weekday().number_days_from_sunday();
    if weekday % 7 != computed {
        warn!("subcode weekday {} disagrees with date (expected {})", weekday, computed);
    }
    Some(date)
}
