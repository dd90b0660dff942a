//! Lyrics inspection command

use anyhow::{bail, Context, Result};
use haze_lyrics::{load_lyrics, LyricLine, SyncedWindow};
use serde::Serialize;

/// A window row with its text resolved, for output
#[derive(Serialize)]
struct WindowRow<'a> {
    index: usize,
    offset: usize,
    opacity: f32,
    y: f32,
    text: &'a str,
}

#[derive(Serialize)]
struct WindowOutput<'a> {
    time: f64,
    current: Option<usize>,
    rows: Vec<WindowRow<'a>>,
}

pub fn run(path: &str, at: Option<f64>, format: &str) -> Result<()> {
    if !matches!(format, "json" | "text") {
        bail!("Unknown format: {}", format);
    }
    let lyrics = load_lyrics(path).with_context(|| format!("Failed to load lyrics: {}", path))?;

    let Some(time) = at else {
        if format == "json" {
            let out = serde_json::to_string_pretty(&lyrics).context("Failed to serialize lyrics")?;
            println!("{}", out);
        } else {
            println!("{}: {} synced lines", path, lyrics.synced.len());
            for line in &lyrics.synced {
                println!("[{}] {}", timestamp(line.start), line.text);
            }
        }
        return Ok(());
    };

    let window = SyncedWindow::at(&lyrics.synced, time);
    let output = WindowOutput {
        time,
        current: window.current,
        rows: window
            .rows
            .iter()
            .map(|row| WindowRow {
                index: row.index,
                offset: row.offset,
                opacity: row.opacity,
                y: row.y,
                text: text_of(&lyrics.synced, row.index),
            })
            .collect(),
    };

    if format == "json" {
        let out = serde_json::to_string_pretty(&output).context("Failed to serialize window")?;
        println!("{}", out);
    } else {
        match output.current {
            Some(i) => println!("At {}: line {}", timestamp(time), i + 1),
            None => println!("At {}: before the first line", timestamp(time)),
        }
        for row in &output.rows {
            let marker = if Some(row.index) == output.current { ">" } else { " " };
            println!("{} {:>4.2}  {}", marker, row.opacity, row.text);
        }
    }
    Ok(())
}

fn text_of(lines: &[LyricLine], index: usize) -> &str {
    lines.get(index).map_or("", |l| l.text.as_str())
}

/// `mm:ss.cc`
fn timestamp(seconds: f64) -> String {
    let total_cs = (seconds.max(0.0) * 100.0).round() as u64;
    format!(
        "{:02}:{:02}.{:02}",
        total_cs / 6000,
        (total_cs / 100) % 60,
        total_cs % 100
    )
}
