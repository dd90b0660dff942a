//! Lyric line types and format dispatch

use crate::{lrc, srt};
use haze_core::{HazeError, Result};
use serde::Serialize;
use std::path::Path;

/// One timed lyric line. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LyricLine {
    pub start: f64,
    /// Only subtitle formats carry an explicit end
    pub end: Option<f64>,
    pub text: String,
}

/// Supported lyric file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsFormat {
    Lrc,
    Srt,
}

impl LyricsFormat {
    /// Detect from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "lrc" => Some(Self::Lrc),
            "srt" => Some(Self::Srt),
            _ => None,
        }
    }
}

/// Lyrics for one track: synced lines plus their plain-text rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Lyrics {
    pub plain: Option<String>,
    pub synced: Vec<LyricLine>,
}

impl Lyrics {
    pub fn from_synced(synced: Vec<LyricLine>) -> Self {
        let plain = if synced.is_empty() {
            None
        } else {
            Some(
                synced
                    .iter()
                    .map(|l| l.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        };
        Self { plain, synced }
    }

    pub fn is_synced(&self) -> bool {
        !self.synced.is_empty()
    }
}

pub fn parse_lyrics(format: LyricsFormat, text: &str) -> Lyrics {
    let synced = match format {
        LyricsFormat::Lrc => lrc::parse_lrc(text),
        LyricsFormat::Srt => srt::parse_srt(text),
    };
    Lyrics::from_synced(synced)
}

/// Read a `.lrc` or `.srt` file
pub fn load_lyrics(path: impl AsRef<Path>) -> Result<Lyrics> {
    let path = path.as_ref();
    let format = LyricsFormat::from_path(path).ok_or_else(|| {
        HazeError::LyricsError(format!(
            "unsupported lyrics file '{}': expected .lrc or .srt",
            path.display()
        ))
    })?;
    let text = std::fs::read_to_string(path)?;
    let lyrics = parse_lyrics(format, &text);
    log::debug!(
        "loaded {} synced lines from {}",
        lyrics.synced.len(),
        path.display()
    );
    Ok(lyrics)
}
