use super::TrackSummary;
use crate::common::format_ctime;
use time::OffsetDateTime;

/// Renders the plain-text `.details` sidecar for a finished track.
pub fn render_details(summary: &TrackSummary) -> String {
    let mut text = String::new();
    text.push_str(&format!("Sampling frequency: {}\n", summary.sample_rate));
    text.push_str(&format!("Channels: {}\n", summary.channels));
    text.push_str(&format!("Samples: {}\n", summary.samples));
    text.push_str(&format!("Quantization: {}\n", summary.encoding));
    text.push_str(&format!("Emphasis: {}\n", summary.emphasis));
    match summary.program_number {
        Some(pno) => text.push_str(&format!("Program_number: {pno}\n")),
        None => text.push_str("Program_number: --\n"),
    }
    push_date(&mut text, "First date", summary.first_date);
    push_date(&mut text, "Last date", summary.last_date);
    text.push_str(&format!("First frame: {}\n", summary.first_frame));
    text.push_str(&format!("Last frame: {}\n", summary.last_frame));
    text
}

fn push_date(text: &mut String, key: &str, date: Option<OffsetDateTime>) {
    text.push_str(key);
    text.push_str(": ");
    match date {
        // The ctime-style form already ends in a newline.
        Some(date) => text.push_str(&format_ctime(date)),
        None => text.push_str("--\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::datetime_from_parts;
    use crate::frame::{Emphasis, Encoding};

    #[test]
    fn test_render_details() {
        let date = datetime_from_parts(1998, 10, 17, 9, 5, 30);
        let summary = TrackSummary {
            track_number: 3,
            sample_rate: 44100,
            channels: 2,
            samples: 123456,
            encoding: Encoding::Linear16,
            emphasis: Emphasis::None,
            program_number: Some(7),
            first_date: date,
            last_date: date,
            first_frame: 100,
            last_frame: 193,
        };
        assert_eq!(
            render_details(&summary),
            "Sampling frequency: 44100\n\
             Channels: 2\n\
             Samples: 123456\n\
             Quantization: 16-bit linear\n\
             Emphasis: none\n\
             Program_number: 7\n\
             First date: Sat Oct 17 09:05:30 1998\n\
             Last date: Sat Oct 17 09:05:30 1998\n\
             First frame: 100\n\
             Last frame: 193\n",
        );
    }

    #[test]
    fn test_render_details_absent_fields() {
        let summary = TrackSummary {
            track_number: 1,
            sample_rate: 32000,
            channels: 2,
            samples: 1920,
            encoding: Encoding::NonLinear12,
            emphasis: Emphasis::PreEmphasis,
            program_number: None,
            first_date: None,
            last_date: None,
            first_frame: 0,
            last_frame: 0,
        };
        let text = render_details(&summary);
        assert!(text.contains("Quantization: 12-bit non-linear\n"));
        assert!(text.contains("Emphasis: pre-emphasis\n"));
        assert!(text.contains("Program_number: --\n"));
        assert!(text.contains("First date: --\n"));
    }
}
