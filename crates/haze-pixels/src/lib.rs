//! Haze Pixels - pixel-art grid editing
//!
//! - `PixelGrid` - fixed 32×32 backing grid with a resizable visible window
//! - `Design` - the JSON document a grid is saved to and loaded from
//! - `PALETTE` / `color_name` - the twelve drawing colors
//! - `NumberingMode` / `edge_numbers` - mirrored row and column labels

mod grid;
mod numbering;
mod palette;

pub use grid::{
    ColorCount, Design, PixelGrid, Tool, BACKING_SIZE, BLANK, DEFAULT_GRID_SIZE, MAX_GRID_SIZE,
    MIN_GRID_SIZE,
};
pub use numbering::{edge_numbers, NumberingMode, Side};
pub use palette::{color_name, display_name, PaletteColor, PALETTE};
