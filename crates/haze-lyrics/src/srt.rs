//! `.srt` subtitle parser

use crate::lyrics::LyricLine;

/// Parse SRT blocks (index, `HH:MM:SS,mmm --> HH:MM:SS,mmm`, text lines).
/// Blocks with a bad timing line or no text are skipped. Text lines are
/// joined with single spaces.
pub fn parse_srt(text: &str) -> Vec<LyricLine> {
    let mut lines = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for raw in text.lines().chain(std::iter::once("")) {
        let line = raw.trim_end();
        if !line.is_empty() {
            block.push(line);
            continue;
        }
        if let Some(parsed) = parse_block(&block) {
            lines.push(parsed);
        }
        block.clear();
    }

    lines
}

fn parse_block(block: &[&str]) -> Option<LyricLine> {
    if block.len() < 3 {
        return None;
    }
    let (start, end) = block[1].split_once("-->")?;
    let start = parse_timestamp(start.trim())?;
    let end = parse_timestamp(end.trim())?;
    let text = block[2..]
        .iter()
        .flat_map(|l| l.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");

    Some(LyricLine {
        start,
        end: Some(end),
        text,
    })
}

/// `HH:MM:SS,mmm` → seconds
fn parse_timestamp(stamp: &str) -> Option<f64> {
    let (clock, millis) = stamp.split_once(',')?;
    let mut parts = clock.split(':');
    let hours = two_digits(parts.next()?)?;
    let minutes = two_digits(parts.next()?)?;
    let seconds = two_digits(parts.next()?)?;
    if parts.next().is_some() || millis.len() != 3 || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let millis: u32 = millis.parse().ok()?;
    Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds as f64 + millis as f64 / 1000.0)
}

fn two_digits(s: &str) -> Option<u32> {
    if s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}
