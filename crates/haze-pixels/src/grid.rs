//! Pixel grid model and its JSON design format

use crate::palette::display_name;
use haze_core::{Color, HazeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Side of the backing grid. Shrinking the visible window keeps the pixels
/// outside it, so growing it again brings them back.
pub const BACKING_SIZE: usize = 32;
pub const MIN_GRID_SIZE: usize = 8;
pub const MAX_GRID_SIZE: usize = BACKING_SIZE;
pub const DEFAULT_GRID_SIZE: usize = 16;

/// Unpainted and erased cells
pub const BLANK: Color = Color::WHITE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
}

/// Saved form of a grid: only the visible window, row-major with a stride of
/// `grid_size`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub grid_size: usize,
    pub pixels: Vec<Color>,
}

/// How often one color appears in the visible window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorCount {
    pub color: Color,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    grid_size: usize,
    pixels: Vec<Color>,
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelGrid {
    /// Blank grid showing the default 16×16 window
    pub fn new() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            pixels: vec![BLANK; BACKING_SIZE * BACKING_SIZE],
        }
    }

    pub fn with_size(grid_size: usize) -> Result<Self> {
        let mut grid = Self::new();
        grid.set_grid_size(grid_size)?;
        Ok(grid)
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Change the visible window. Pixels outside it are kept.
    pub fn set_grid_size(&mut self, grid_size: usize) -> Result<()> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid_size) {
            return Err(HazeError::ValueOutOfRange {
                field: "grid_size".to_string(),
                min: MIN_GRID_SIZE as f64,
                max: MAX_GRID_SIZE as f64,
                value: grid_size as f64,
            });
        }
        self.grid_size = grid_size;
        Ok(())
    }

    /// Cell at `row`, `col` of the backing grid
    pub fn pixel(&self, row: usize, col: usize) -> Option<Color> {
        if row >= BACKING_SIZE || col >= BACKING_SIZE {
            return None;
        }
        Some(self.pixels[row * BACKING_SIZE + col])
    }

    /// Paint the visible cell at `index` (row-major over the visible window)
    pub fn paint(&mut self, index: usize, color: Color) -> Result<()> {
        let cells = self.grid_size * self.grid_size;
        if index >= cells {
            return Err(HazeError::ValueOutOfRange {
                field: "index".to_string(),
                min: 0.0,
                max: (cells - 1) as f64,
                value: index as f64,
            });
        }
        let (row, col) = (index / self.grid_size, index % self.grid_size);
        self.pixels[row * BACKING_SIZE + col] = color;
        Ok(())
    }

    /// Paint at `row`, `col` of the visible window
    pub fn paint_at(&mut self, row: usize, col: usize, color: Color) -> Result<()> {
        if col >= self.grid_size {
            return Err(HazeError::ValueOutOfRange {
                field: "col".to_string(),
                min: 0.0,
                max: (self.grid_size - 1) as f64,
                value: col as f64,
            });
        }
        self.paint(row * self.grid_size + col, color)
    }

    /// What a primary click does with `tool` and the selected color
    pub fn apply_tool(&mut self, tool: Tool, index: usize, selected: Color) -> Result<()> {
        let color = match tool {
            Tool::Pencil => selected,
            Tool::Eraser => BLANK,
        };
        self.paint(index, color)
    }

    /// Reset the whole backing grid, hidden cells included
    pub fn clear(&mut self) {
        self.pixels.fill(BLANK);
    }

    /// The visible window, row-major
    pub fn visible_pixels(&self) -> Vec<Color> {
        (0..self.grid_size)
            .flat_map(|row| {
                let start = row * BACKING_SIZE;
                self.pixels[start..start + self.grid_size].iter().copied()
            })
            .collect()
    }

    /// Colors in the visible window, in order of first appearance
    pub fn count_by_color(&self) -> Vec<ColorCount> {
        let mut counts: Vec<ColorCount> = Vec::new();
        for color in self.visible_pixels() {
            match counts.iter_mut().find(|c| c.color == color) {
                Some(entry) => entry.count += 1,
                None => counts.push(ColorCount {
                    color,
                    name: display_name(color),
                    count: 1,
                }),
            }
        }
        counts
    }

    pub fn export(&self) -> Design {
        Design {
            grid_size: self.grid_size,
            pixels: self.visible_pixels(),
        }
    }

    /// Rebuild a grid from a design. Everything starts blank; then the top-left
    /// `min(grid_size, 32)` square is copied, stopping where `pixels` runs out.
    /// A size outside 8..=32 is clamped for display.
    pub fn import(design: &Design) -> Result<Self> {
        if design.grid_size == 0 {
            return Err(HazeError::ParseError(
                "design has no grid size".to_string(),
            ));
        }
        let stride = design.grid_size;
        let copy = stride.min(BACKING_SIZE);

        let mut grid = Self::new();
        for y in 0..copy {
            for x in 0..copy {
                if let Some(color) = design.pixels.get(y * stride + x) {
                    grid.pixels[y * BACKING_SIZE + x] = *color;
                }
            }
        }

        let shown = stride.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
        if shown != stride {
            log::warn!("design grid size {stride} shown as {shown}");
        }
        grid.grid_size = shown;
        Ok(grid)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.export()).map_err(|e| HazeError::ParseError(e.to_string()))
    }

    pub fn from_json(source: &str) -> Result<Self> {
        let design: Design =
            serde_json::from_str(source).map_err(|e| HazeError::ParseError(e.to_string()))?;
        Self::import(&design)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::from_hex(0xED1C24)
    }

    #[test]
    fn new_grid_is_blank() {
        let grid = PixelGrid::new();
        assert_eq!(grid.grid_size(), 16);
        assert_eq!(grid.visible_pixels().len(), 256);
        assert!(grid.visible_pixels().iter().all(|c| *c == BLANK));
    }

    #[test]
    fn grid_size_bounds() {
        let mut grid = PixelGrid::new();
        assert!(grid.set_grid_size(7).is_err());
        assert!(grid.set_grid_size(33).is_err());
        grid.set_grid_size(8).unwrap();
        grid.set_grid_size(32).unwrap();
        assert_eq!(grid.grid_size(), 32);
    }

    #[test]
    fn paint_maps_visible_index_to_backing_cell() {
        let mut grid = PixelGrid::with_size(10).unwrap();
        // row 2, col 3 of the 10×10 window
        grid.paint(23, red()).unwrap();
        assert_eq!(grid.pixel(2, 3), Some(red()));
        assert_eq!(grid.pixel(0, 23), Some(BLANK));
        assert_eq!(grid.visible_pixels()[23], red());

        grid.paint_at(9, 9, red()).unwrap();
        assert_eq!(grid.pixel(9, 9), Some(red()));
        assert!(grid.paint(100, red()).is_err());
        assert!(grid.paint_at(0, 10, red()).is_err());
    }

    #[test]
    fn eraser_paints_blank() {
        let mut grid = PixelGrid::new();
        grid.apply_tool(Tool::Pencil, 5, red()).unwrap();
        assert_eq!(grid.pixel(0, 5), Some(red()));
        grid.apply_tool(Tool::Eraser, 5, red()).unwrap();
        assert_eq!(grid.pixel(0, 5), Some(BLANK));
    }

    #[test]
    fn shrinking_keeps_hidden_pixels() {
        let mut grid = PixelGrid::with_size(20).unwrap();
        grid.paint_at(18, 18, red()).unwrap();
        grid.set_grid_size(8).unwrap();
        assert!(grid.visible_pixels().iter().all(|c| *c == BLANK));
        grid.set_grid_size(20).unwrap();
        assert_eq!(grid.visible_pixels()[18 * 20 + 18], red());
    }

    #[test]
    fn clear_resets_hidden_cells_too() {
        let mut grid = PixelGrid::with_size(32).unwrap();
        grid.paint_at(31, 31, red()).unwrap();
        grid.set_grid_size(8).unwrap();
        grid.clear();
        assert_eq!(grid.pixel(31, 31), Some(BLANK));
    }

    #[test]
    fn counts_only_visible_pixels_in_first_seen_order() {
        let mut grid = PixelGrid::with_size(8).unwrap();
        grid.paint(0, red()).unwrap();
        grid.paint(1, red()).unwrap();
        grid.set_grid_size(16).unwrap();
        grid.paint_at(15, 15, Color::BLACK).unwrap();
        grid.set_grid_size(8).unwrap();

        let counts = grid.count_by_color();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].name, "Red");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].name, "White");
        assert_eq!(counts[1].count, 62);
    }

    #[test]
    fn export_writes_visible_window_as_camel_case_json() {
        let mut grid = PixelGrid::with_size(8).unwrap();
        grid.paint(9, Color::BLACK).unwrap();
        let design = grid.export();
        assert_eq!(design.grid_size, 8);
        assert_eq!(design.pixels.len(), 64);
        assert_eq!(design.pixels[9], Color::BLACK);

        let json: serde_json::Value = serde_json::from_str(&grid.to_json().unwrap()).unwrap();
        assert_eq!(json["gridSize"], 8);
        assert_eq!(json["pixels"][9], "#000000");
        assert_eq!(json["pixels"][0], "#FFFFFF");
    }

    #[test]
    fn import_uses_design_stride_and_tolerates_short_pixel_lists() {
        // 9×9 design with only the first row and a half present
        let mut pixels = vec![BLANK; 13];
        pixels[1] = red();
        pixels[10] = Color::BLACK; // row 1, col 1
        let grid = PixelGrid::import(&Design {
            grid_size: 9,
            pixels,
        })
        .unwrap();
        assert_eq!(grid.grid_size(), 9);
        assert_eq!(grid.pixel(0, 1), Some(red()));
        assert_eq!(grid.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(grid.pixel(8, 8), Some(BLANK));
    }

    #[test]
    fn import_clips_oversized_designs_to_backing_grid() {
        let mut pixels = vec![BLANK; 40 * 40];
        pixels[31] = red(); // row 0, col 31: kept
        pixels[35] = red(); // row 0, col 35: outside the backing grid
        pixels[40 + 1] = Color::BLACK; // row 1, col 1
        let grid = PixelGrid::import(&Design {
            grid_size: 40,
            pixels,
        })
        .unwrap();
        assert_eq!(grid.grid_size(), 32);
        assert_eq!(grid.pixel(0, 31), Some(red()));
        assert_eq!(grid.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(grid.pixel(0, 3), Some(BLANK));
    }

    #[test]
    fn json_round_trip_and_bad_input() {
        let mut grid = PixelGrid::with_size(12).unwrap();
        grid.paint(143, Color::from_hex(0x3C50F0)).unwrap();
        let back = PixelGrid::from_json(&grid.to_json().unwrap()).unwrap();
        assert_eq!(back.export(), grid.export());

        assert!(matches!(
            PixelGrid::from_json("{\"gridSize\": 0, \"pixels\": []}"),
            Err(HazeError::ParseError(_))
        ));
        assert!(matches!(
            PixelGrid::from_json("{\"pixels\": []}"),
            Err(HazeError::ParseError(_))
        ));
        assert!(PixelGrid::from_json("{\"gridSize\": 8, \"pixels\": [\"#zz\"]}").is_err());
    }
}
