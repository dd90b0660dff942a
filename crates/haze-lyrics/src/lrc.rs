//! `.lrc` parser

use crate::lyrics::LyricLine;

/// Parse LRC text into lines sorted by start time.
///
/// Each line may carry several leading `[mm:ss]` / `[mm:ss.ff]` / `[mm:ss.fff]`
/// tags; every tag yields one entry with the same text. Two fractional digits
/// are centiseconds, three are milliseconds. Lines without a leading time tag
/// (including `[ar:...]`-style metadata) are skipped.
pub fn parse_lrc(text: &str) -> Vec<LyricLine> {
    let mut lines = Vec::new();

    for raw in text.lines() {
        let mut rest = raw.trim_start();
        let mut starts = Vec::new();

        while let Some(tagged) = rest.strip_prefix('[') {
            let Some(close) = tagged.find(']') else {
                break;
            };
            let Some(start) = parse_timestamp(&tagged[..close]) else {
                break;
            };
            starts.push(start);
            rest = &tagged[close + 1..];
        }

        let text = rest.trim();
        lines.extend(starts.into_iter().map(|start| LyricLine {
            start,
            end: None,
            text: text.to_string(),
        }));
    }

    lines.sort_by(|a, b| a.start.total_cmp(&b.start));
    lines
}

/// `mm:ss`, `mm:ss.ff` or `mm:ss.fff` → seconds
fn parse_timestamp(tag: &str) -> Option<f64> {
    let (minutes, seconds) = tag.split_once(':')?;
    let (whole, fraction) = match seconds.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (seconds, None),
    };

    if minutes.is_empty() || minutes.len() > 3 || !all_digits(minutes) {
        return None;
    }
    if whole.len() != 2 || !all_digits(whole) {
        return None;
    }

    let minutes: u32 = minutes.parse().ok()?;
    let whole: u32 = whole.parse().ok()?;
    let fraction = match fraction {
        None => 0.0,
        Some(f) if all_digits(f) && f.len() == 2 => f.parse::<u32>().ok()? as f64 / 100.0,
        Some(f) if all_digits(f) && f.len() == 3 => f.parse::<u32>().ok()? as f64 / 1000.0,
        Some(_) => return None,
    };

    Some(minutes as f64 * 60.0 + whole as f64 + fraction)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
