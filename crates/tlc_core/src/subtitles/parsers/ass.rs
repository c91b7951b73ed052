//! ASS/SSA subtitle parser.
//!
//! Only the `[Events]` section is read. Times are `H:MM:SS.cc` (centiseconds)
//! and the `Text` field is always last, so it may itself contain commas.

use crate::subtitles::error::ParseError;
use crate::subtitles::types::{SubtitleData, SubtitleEvent, SubtitleFormat};

/// Default event field order when a file has no `Format:` line.
const DEFAULT_EVENT_FORMAT: &[&str] = &[
    "layer", "start", "end", "style", "name", "marginl", "marginr", "marginv", "effect", "text",
];

/// Parse ASS/SSA content into SubtitleData.
///
/// Malformed events are skipped. Fails only when the file has events and
/// none of them parse.
pub fn parse_ass(content: &str) -> Result<SubtitleData, ParseError> {
    let mut data = SubtitleData::with_format(SubtitleFormat::Ass);
    let mut first_error: Option<ParseError> = None;
    let mut in_events = false;
    let mut event_format: Vec<String> = DEFAULT_EVENT_FORMAT.iter().map(|s| s.to_string()).collect();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line.trim().trim_start_matches('\u{feff}');

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            in_events = line.eq_ignore_ascii_case("[events]");
            continue;
        }

        if !in_events {
            continue;
        }

        if let Some(rest) = line.strip_prefix("Format:") {
            event_format = rest.split(',').map(|s| s.trim().to_lowercase()).collect();
            continue;
        }

        let (rest, is_comment) = if let Some(rest) = line.strip_prefix("Dialogue:") {
            (rest, false)
        } else if let Some(rest) = line.strip_prefix("Comment:") {
            (rest, true)
        } else {
            continue;
        };

        match parse_event(rest, &event_format, is_comment, line_num) {
            Ok(event) => data.events.push(event),
            Err(e) => {
                tracing::debug!("Skipping ASS event: {}", e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) if data.events.is_empty() => Err(e),
        _ => Ok(data),
    }
}

/// Parse the fields after `Dialogue:` / `Comment:`.
fn parse_event(
    rest: &str,
    format: &[String],
    is_comment: bool,
    line_num: usize,
) -> Result<SubtitleEvent, ParseError> {
    let fields: Vec<&str> = rest.trim_start().splitn(format.len(), ',').collect();
    if fields.len() < format.len() {
        return Err(ParseError::invalid_event(
            line_num,
            format!("expected {} fields, found {}", format.len(), fields.len()),
        ));
    }

    let field = |name: &str| {
        format
            .iter()
            .position(|f| f == name)
            .map(|idx| fields[idx].trim())
    };

    let start = field("start").unwrap_or_default();
    let end = field("end").unwrap_or_default();
    let start_ms = parse_ass_time(start).ok_or_else(|| ParseError::invalid_time(line_num, start))?;
    let end_ms = parse_ass_time(end).ok_or_else(|| ParseError::invalid_time(line_num, end))?;

    // Text keeps its own whitespace; it is the final field
    let text = format
        .iter()
        .position(|f| f == "text")
        .map(|idx| fields[idx])
        .unwrap_or_default();

    Ok(SubtitleEvent {
        start_ms,
        end_ms,
        text: text.to_string(),
        is_comment,
    })
}

/// Parse ASS timestamp `H:MM:SS.cc` into milliseconds.
pub fn parse_ass_time(s: &str) -> Option<f64> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    let [h, m, sec] = parts.as_slice() else {
        return None;
    };

    let hours: f64 = h.parse().ok()?;
    let minutes: f64 = m.parse().ok()?;
    let seconds: f64 = sec.parse().ok()?;

    Some(hours * 3_600_000.0 + minutes * 60_000.0 + seconds * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "[Script Info]\nTitle: Test\n\n[V4+ Styles]\n\
Format: Name, Fontname\nStyle: Default,Arial\n\n[Events]\n\
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n\
Dialogue: 0,0:00:01.00,0:00:04.50,Default,,0,0,0,,{\\i1}Hello,{\\i0} world\n\
Comment: 0,0:00:05.00,0:00:06.00,Default,,0,0,0,,timing note\n\
Dialogue: 0,0:00:07.00,0:00:08.00,Sign,,0,0,0,,Line one\\NLine two\n";

    #[test]
    fn test_parse_ass_time() {
        assert!((parse_ass_time("0:00:01.00").unwrap() - 1000.0).abs() < 0.001);
        assert!((parse_ass_time("1:02:03.45").unwrap() - 3_723_450.0).abs() < 0.001);
        assert!(parse_ass_time("1:02").is_none());
    }

    #[test]
    fn test_parse_events_only() {
        let data = parse_ass(SAMPLE).unwrap();

        assert_eq!(data.events.len(), 3);
        assert_eq!(data.dialogue_count(), 2);
        assert!((data.events[0].end_ms - 4500.0).abs() < 0.001);
        // Commas inside the text field survive
        assert_eq!(data.events[0].text, "{\\i1}Hello,{\\i0} world");
        assert!(data.events[1].is_comment);
        assert_eq!(data.events[2].text, "Line one\\NLine two");
    }

    #[test]
    fn test_malformed_events_are_skipped() {
        let content = "[Events]\nFormat: Start, End, Text\n\
Dialogue: 0:00:01.00\n\
Dialogue: 0:00:xx.00,0:00:02.00,Bad time\n\
Dialogue: 0:00:03.00,0:00:04.00,Still here\n";
        let data = parse_ass(content).unwrap();

        assert_eq!(data.events.len(), 1);
        assert_eq!(data.events[0].text, "Still here");
    }

    #[test]
    fn test_all_events_malformed_errors() {
        let content = "[Events]\nFormat: Start, End, Text\nDialogue: 0:00:01.00\n";
        let err = parse_ass(content).unwrap_err();
        assert!(matches!(err, ParseError::InvalidEvent { line: 3, .. }));
    }
}
