//! Which synced lines are on screen at a playback position

use crate::lyrics::LyricLine;
use serde::Serialize;

/// Lines shown at once: the current line and the ones after it
pub const WINDOW_LINES: usize = 5;
/// Vertical distance between window rows
pub const LINE_STEP: f32 = 44.0;

/// Index of the last line that has started at `time`, or `None` before the first.
/// Lines are expected in start order; the scan stops at the first future line.
pub fn current_line_index(lines: &[LyricLine], time: f64) -> Option<usize> {
    let mut current = None;
    for (i, line) in lines.iter().enumerate() {
        if time >= line.start {
            current = Some(i);
        } else {
            break;
        }
    }
    current
}

/// Opacity for a row `offset` lines below the current one
pub fn line_opacity(offset: usize) -> f32 {
    match offset {
        0 | 1 => 1.0,
        2 => 0.75,
        3 => 0.5,
        _ => 0.25,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowLine {
    /// Index into the synced line list
    pub index: usize,
    /// Rows below the base line
    pub offset: usize,
    pub opacity: f32,
    /// Vertical position relative to the base row
    pub y: f32,
}

/// The rows visible at one playback time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncedWindow {
    pub current: Option<usize>,
    pub rows: Vec<WindowLine>,
}

impl SyncedWindow {
    /// Before the first line starts, the window still shows the opening lines
    pub fn at(lines: &[LyricLine], time: f64) -> Self {
        let current = current_line_index(lines, time);
        let base = current.unwrap_or(0);
        let rows = (base..lines.len())
            .take(WINDOW_LINES)
            .map(|index| {
                let offset = index - base;
                WindowLine {
                    index,
                    offset,
                    opacity: line_opacity(offset),
                    y: LINE_STEP * offset as f32,
                }
            })
            .collect();
        Self { current, rows }
    }
}

/// A change of the current line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineChange {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

/// Follows playback progress and reports line transitions
#[derive(Debug, Default)]
pub struct LyricsTracker {
    current: Option<usize>,
    previous: Option<usize>,
}

impl LyricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn previous(&self) -> Option<usize> {
        self.previous
    }

    /// Returns the transition if `time` lands on a different line than before
    pub fn update(&mut self, lines: &[LyricLine], time: f64) -> Option<LineChange> {
        let idx = current_line_index(lines, time);
        if idx == self.current {
            return None;
        }
        self.previous = self.current;
        self.current = idx;
        Some(LineChange {
            previous: self.previous,
            current: self.current,
        })
    }
}
