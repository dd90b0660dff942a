//! Edge numbering for bead and stitch patterns
//!
//! Each mode starts counting at one corner. Opposite sides carry mirrored
//! runs, so the same number sits at both ends of a row or column.

use serde::Serialize;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberingMode {
    Disabled,
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl NumberingMode {
    pub const NAMES: [&'static str; 5] =
        ["disabled", "bottom-right", "bottom-left", "top-right", "top-left"];

    const CYCLE: [Self; 5] = [
        Self::Disabled,
        Self::BottomRight,
        Self::BottomLeft,
        Self::TopRight,
        Self::TopLeft,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .position(|name| *name == s)
            .map(|i| Self::CYCLE[i])
    }

    /// Next mode in picker order, wrapping back to `Disabled`
    pub fn next(self) -> Self {
        let i = Self::CYCLE.iter().position(|m| *m == self).unwrap_or(0);
        Self::CYCLE[(i + 1) % Self::CYCLE.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];
}

/// Labels along `side` of an `n`×`n` grid, in display order
/// (left to right for top/bottom, top to bottom for left/right)
pub fn edge_numbers(mode: NumberingMode, side: Side, n: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let low = 1..=n;
    let high = n..=2 * n - 1;
    use NumberingMode::*;
    use Side::*;
    match (mode, side) {
        (Disabled, _) => Vec::new(),

        (BottomRight, Bottom | Right) => descending(low),
        (BottomRight, Left | Top) => descending(high),

        (BottomLeft, Bottom) => ascending(low),
        (BottomLeft, Right) => descending(high),
        (BottomLeft, Top) => ascending(high),
        (BottomLeft, Left) => descending(low),

        (TopRight, Top) => descending(low),
        (TopRight, Left) => ascending(high),
        (TopRight, Bottom) => descending(high),
        (TopRight, Right) => ascending(low),

        (TopLeft, Top | Left) => ascending(low),
        (TopLeft, Right | Bottom) => ascending(high),
    }
}

fn ascending(range: RangeInclusive<usize>) -> Vec<usize> {
    range.collect()
}

fn descending(range: RangeInclusive<usize>) -> Vec<usize> {
    range.rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_right_counts_from_the_corner() {
        let mode = NumberingMode::BottomRight;
        assert_eq!(edge_numbers(mode, Side::Bottom, 4), vec![4, 3, 2, 1]);
        assert_eq!(edge_numbers(mode, Side::Right, 4), vec![4, 3, 2, 1]);
        assert_eq!(edge_numbers(mode, Side::Top, 4), vec![7, 6, 5, 4]);
        assert_eq!(edge_numbers(mode, Side::Left, 4), vec![7, 6, 5, 4]);
    }

    #[test]
    fn bottom_left_mirrors_horizontally() {
        let mode = NumberingMode::BottomLeft;
        assert_eq!(edge_numbers(mode, Side::Bottom, 3), vec![1, 2, 3]);
        assert_eq!(edge_numbers(mode, Side::Left, 3), vec![3, 2, 1]);
        assert_eq!(edge_numbers(mode, Side::Top, 3), vec![3, 4, 5]);
        assert_eq!(edge_numbers(mode, Side::Right, 3), vec![5, 4, 3]);
    }

    #[test]
    fn top_modes() {
        let tr = NumberingMode::TopRight;
        assert_eq!(edge_numbers(tr, Side::Top, 3), vec![3, 2, 1]);
        assert_eq!(edge_numbers(tr, Side::Right, 3), vec![1, 2, 3]);
        assert_eq!(edge_numbers(tr, Side::Left, 3), vec![3, 4, 5]);
        assert_eq!(edge_numbers(tr, Side::Bottom, 3), vec![5, 4, 3]);

        let tl = NumberingMode::TopLeft;
        assert_eq!(edge_numbers(tl, Side::Top, 3), vec![1, 2, 3]);
        assert_eq!(edge_numbers(tl, Side::Left, 3), vec![1, 2, 3]);
        assert_eq!(edge_numbers(tl, Side::Right, 3), vec![3, 4, 5]);
        assert_eq!(edge_numbers(tl, Side::Bottom, 3), vec![3, 4, 5]);
    }

    #[test]
    fn disabled_and_empty_grid_have_no_labels() {
        for side in Side::ALL {
            assert!(edge_numbers(NumberingMode::Disabled, side, 16).is_empty());
            assert!(edge_numbers(NumberingMode::TopLeft, side, 0).is_empty());
        }
    }

    #[test]
    fn every_side_has_one_label_per_cell() {
        for name in NumberingMode::NAMES.iter().skip(1) {
            let mode = NumberingMode::parse(name).unwrap();
            for side in Side::ALL {
                assert_eq!(edge_numbers(mode, side, 32).len(), 32);
            }
        }
    }

    #[test]
    fn cycle_wraps_through_all_modes() {
        let mut mode = NumberingMode::default();
        assert_eq!(mode, NumberingMode::BottomRight);
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(mode, NumberingMode::BottomRight);
        assert_eq!(seen.len(), 5);
        assert!(seen.contains(&NumberingMode::Disabled));
        assert_eq!(NumberingMode::parse("sideways"), None);
    }
}
