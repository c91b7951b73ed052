//! SRT subtitle parser.
//!
//! Parses SubRip (.srt) files, and WebVTT cues which share the block layout:
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:04,000
//! Hello, world!
//!
//! ```
//! Blocks without a timing line (WebVTT header, NOTE blocks) are skipped.

use crate::subtitles::error::ParseError;
use crate::subtitles::types::{SubtitleData, SubtitleEvent, SubtitleFormat};

/// Parse SRT content into SubtitleData.
pub fn parse_srt(content: &str) -> Result<SubtitleData, ParseError> {
    let mut data = SubtitleData::with_format(SubtitleFormat::Srt);

    // Normalize line endings and split into blocks
    let content = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut line_offset = 0;

    for block in content.split("\n\n") {
        let block_lines = block.lines().count();
        let lines: Vec<&str> = block.trim().lines().collect();

        let Some(timing_idx) = lines.iter().position(|l| l.contains("-->")) else {
            line_offset += block_lines + 1;
            continue;
        };

        let timing_line = lines[timing_idx];
        let (start_ms, end_ms) = parse_srt_timing(timing_line)
            .ok_or_else(|| ParseError::invalid_time(line_offset + timing_idx + 1, timing_line))?;

        // Text is everything after the timing line
        let text = lines[timing_idx + 1..].join("\n");
        if !text.trim().is_empty() {
            data.events.push(SubtitleEvent::new(start_ms, end_ms, text));
        }

        line_offset += block_lines + 1;
    }

    Ok(data)
}

/// Parse a timing line: `HH:MM:SS,mmm --> HH:MM:SS,mmm [cue settings]`
fn parse_srt_timing(line: &str) -> Option<(f64, f64)> {
    let (start, end) = line.split_once("-->")?;
    let end = end.split_whitespace().next()?;

    Some((parse_srt_time(start)?, parse_srt_time(end)?))
}

/// Parse a timestamp: `HH:MM:SS,mmm`, `HH:MM:SS.mmm` or WebVTT `MM:SS.mmm`.
///
/// Returns time in milliseconds.
pub fn parse_srt_time(s: &str) -> Option<f64> {
    let s = s.trim().replace(',', ".");

    let parts: Vec<&str> = s.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, sec] => (h.parse::<f64>().ok()?, m.parse::<f64>().ok()?, *sec),
        [m, sec] => (0.0, m.parse::<f64>().ok()?, *sec),
        _ => return None,
    };

    let seconds: f64 = seconds.parse().ok()?;

    Some(hours * 3_600_000.0 + minutes * 60_000.0 + seconds * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_srt_time() {
        assert!((parse_srt_time("00:00:00,000").unwrap() - 0.0).abs() < 0.001);
        assert!((parse_srt_time("00:00:01,500").unwrap() - 1500.0).abs() < 0.001);
        assert!((parse_srt_time("01:00:00,000").unwrap() - 3_600_000.0).abs() < 0.001);
        assert!((parse_srt_time("00:00:01.500").unwrap() - 1500.0).abs() < 0.001);
        assert!((parse_srt_time("01:02.250").unwrap() - 62_250.0).abs() < 0.001);
        assert!(parse_srt_time("garbage").is_none());
    }

    #[test]
    fn test_parse_basic_srt() {
        let content = "1\n00:00:01,000 --> 00:00:04,000\nHello, world!\n\n\
                       2\n00:00:05,000 --> 00:00:08,000\nThis is a test.\nWith multiple lines.\n";

        let data = parse_srt(content).unwrap();

        assert_eq!(data.events.len(), 2);
        assert!((data.events[0].start_ms - 1000.0).abs() < 0.001);
        assert_eq!(data.events[0].text, "Hello, world!");
        assert_eq!(data.events[1].text, "This is a test.\nWith multiple lines.");
    }

    #[test]
    fn test_parse_srt_with_crlf_and_missing_index() {
        let content = "00:00:01,000 --> 00:00:04,000\r\nHello\r\n\r\n00:00:05,000 --> 00:00:08,000\r\nAgain\r\n";
        let data = parse_srt(content).unwrap();
        assert_eq!(data.events.len(), 2);
        assert_eq!(data.events[1].text, "Again");
    }

    #[test]
    fn test_empty_cue_is_skipped() {
        let content = "1\n00:00:01,000 --> 00:00:04,000\n\n2\n00:00:05,000 --> 00:00:08,000\nText\n";
        let data = parse_srt(content).unwrap();
        assert_eq!(data.events.len(), 1);
    }

    #[test]
    fn test_bad_timing_reports_line() {
        let content = "1\n00:00:01,000 --> nope\nHello\n";
        let err = parse_srt(content).unwrap_err();
        assert!(matches!(err, ParseError::InvalidTime { line: 2, .. }));
    }
}
