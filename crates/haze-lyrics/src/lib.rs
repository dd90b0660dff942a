//! Haze Lyrics - synced lyric parsing and timeline
//!
//! - `parse_lrc` / `parse_srt` - timed line parsers
//! - `Lyrics` - plain text plus synced lines, loadable from a file
//! - `SyncedWindow` / `LyricsTracker` - which lines to show at a playback time

mod lrc;
mod lyrics;
mod srt;
mod timeline;

pub use lrc::parse_lrc;
pub use lyrics::{load_lyrics, parse_lyrics, LyricLine, Lyrics, LyricsFormat};
pub use srt::parse_srt;
pub use timeline::{
    current_line_index, line_opacity, LineChange, LyricsTracker, SyncedWindow, WindowLine,
    LINE_STEP, WINDOW_LINES,
};
