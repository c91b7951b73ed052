//! File probing using mkvmerge -J.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

use super::types::{ExtractionError, ExtractionResult};
use super::run_tool;
use crate::models::{Track, TrackType};

/// Probe a container file and return its audio and subtitle tracks in file order.
///
/// Video, button and other track kinds are dropped.
pub fn probe_tracks(path: &Path) -> ExtractionResult<Vec<Track>> {
    if !path.exists() {
        return Err(ExtractionError::FileNotFound(path.to_path_buf()));
    }

    tracing::debug!("Probing file: {}", path.display());

    let mut cmd = Command::new("mkvmerge");
    cmd.arg("-J").arg(path);
    let output = run_tool("mkvmerge", &mut cmd)?;

    let json: Value =
        serde_json::from_slice(&output.stdout).map_err(|e| ExtractionError::ParseError {
            tool: "mkvmerge".to_string(),
            message: e.to_string(),
        })?;

    parse_probe_json(&json)
}

/// Parse the JSON output from mkvmerge -J into track records.
pub fn parse_probe_json(json: &Value) -> ExtractionResult<Vec<Track>> {
    let recognized = json
        .get("container")
        .and_then(|c| c.get("recognized"))
        .and_then(|r| r.as_bool())
        .unwrap_or(true);
    if !recognized {
        return Err(ExtractionError::ParseError {
            tool: "mkvmerge".to_string(),
            message: "container not recognized".to_string(),
        });
    }

    let Some(tracks) = json.get("tracks").and_then(|t| t.as_array()) else {
        return Ok(Vec::new());
    };

    Ok(tracks.iter().filter_map(parse_track).collect())
}

/// Parse a single track's information.
fn parse_track(track: &Value) -> Option<Track> {
    let track_type = TrackType::from_str(track.get("type")?.as_str()?)?;
    let id = track.get("id")?.as_u64()? as usize;

    let properties = track.get("properties");

    let codec_id = properties
        .and_then(|p| p.get("codec_id"))
        .and_then(|c| c.as_str())
        .unwrap_or("");

    let codec = track
        .get("codec")
        .and_then(|c| c.as_str())
        .unwrap_or(codec_id)
        .to_string();

    let language = properties
        .and_then(|p| p.get("language"))
        .and_then(|l| l.as_str())
        .filter(|l| !l.is_empty())
        .unwrap_or("und")
        .to_string();

    let name = properties
        .and_then(|p| p.get("track_name"))
        .and_then(|n| n.as_str())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    let forced = properties
        .and_then(|p| p.get("forced_track"))
        .and_then(|f| f.as_bool())
        .unwrap_or(false);

    Some(Track {
        id,
        track_type,
        language,
        name,
        codec,
        forced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_nonexistent_file() {
        let result = probe_tracks(Path::new("/nonexistent/file.mkv"));
        assert!(matches!(result, Err(ExtractionError::FileNotFound(_))));
    }

    #[test]
    fn parses_audio_and_subtitle_tracks() {
        let json: Value = serde_json::from_str(
            r#"{
                "container": {"recognized": true, "type": "Matroska"},
                "tracks": [
                    {"id": 0, "type": "video", "codec": "AVC/H.264/MPEG-4p10", "properties": {"language": "und"}},
                    {"id": 1, "type": "audio", "codec": "FLAC", "properties": {"language": "jpn", "track_name": "Japanese"}},
                    {"id": 2, "type": "subtitles", "codec": "SubStationAlpha",
                     "properties": {"codec_id": "S_TEXT/ASS", "language": "und", "track_name": "  ", "forced_track": true}},
                    {"id": 3, "type": "subtitles", "properties": {"codec_id": "S_HDMV/PGS"}}
                ]
            }"#,
        )
        .unwrap();

        let tracks = parse_probe_json(&json).unwrap();
        assert_eq!(tracks.len(), 3);

        assert_eq!(tracks[0].id, 1);
        assert_eq!(tracks[0].track_type, TrackType::Audio);
        assert_eq!(tracks[0].name.as_deref(), Some("Japanese"));

        // Blank names are treated as missing
        assert_eq!(tracks[1].name, None);
        assert!(tracks[1].forced);
        assert_eq!(tracks[1].codec, "SubStationAlpha");

        // Codec falls back to the codec ID, language to "und"
        assert_eq!(tracks[2].codec, "S_HDMV/PGS");
        assert_eq!(tracks[2].language, "und");
    }

    #[test]
    fn unrecognized_container_is_an_error() {
        let json: Value =
            serde_json::from_str(r#"{"container": {"recognized": false}, "tracks": []}"#).unwrap();
        assert!(matches!(
            parse_probe_json(&json),
            Err(ExtractionError::ParseError { .. })
        ));
    }
}
