//! Pixel-art design commands

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use haze_core::Color;
use haze_pixels::{edge_numbers, NumberingMode, PixelGrid, Side, Tool, BLANK, PALETTE};
use std::path::Path;

#[derive(Subcommand)]
pub enum PixelsCommands {
    /// Create a blank design file
    New {
        /// Design file (JSON)
        file: String,

        /// Visible grid size (8-32)
        #[arg(long, default_value = "16")]
        size: usize,
    },

    /// Paint one cell of a design
    Paint {
        /// Design file (JSON)
        file: String,

        /// Row in the visible grid
        #[arg(long)]
        row: usize,

        /// Column in the visible grid
        #[arg(long)]
        col: usize,

        /// Color to paint (hex)
        #[arg(long, default_value = "#000000")]
        color: Color,

        /// Use the eraser instead of the pencil
        #[arg(long)]
        erase: bool,
    },

    /// Change the visible grid size of a design
    Resize {
        /// Design file (JSON)
        file: String,

        /// New visible grid size (8-32)
        size: usize,
    },

    /// Reset every cell of a design to blank
    Clear {
        /// Design file (JSON)
        file: String,
    },

    /// Print the design as a character grid
    Show {
        /// Design file (JSON)
        file: String,
    },

    /// Count cells per color
    Count {
        /// Design file (JSON)
        file: String,

        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print the edge numbers for a grid size
    Numbers {
        /// Grid size
        #[arg(long, default_value = "16")]
        size: usize,

        /// Numbering mode (disabled, bottom-right, bottom-left, top-right, top-left)
        #[arg(long, default_value = "bottom-right", value_parser = parse_mode)]
        mode: NumberingMode,
    },

    /// List the palette
    Palette,
}

fn parse_mode(s: &str) -> Result<NumberingMode, String> {
    NumberingMode::parse(s).ok_or_else(|| {
        format!(
            "unknown numbering mode '{}'; valid values: {}",
            s,
            NumberingMode::NAMES.join(", ")
        )
    })
}

pub fn run(cmd: PixelsCommands) -> Result<()> {
    match cmd {
        PixelsCommands::New { file, size } => {
            let grid = PixelGrid::with_size(size).context("Invalid grid size")?;
            save(&grid, &file)?;
            println!("Created {}x{} design: {}", size, size, file);
        }
        PixelsCommands::Paint {
            file,
            row,
            col,
            color,
            erase,
        } => {
            let mut grid = load(&file)?;
            let n = grid.grid_size();
            if row >= n || col >= n {
                bail!("Cell ({}, {}) is outside the {}x{} grid", row, col, n, n);
            }
            let tool = if erase { Tool::Eraser } else { Tool::Pencil };
            grid.apply_tool(tool, row * n + col, color)?;
            save(&grid, &file)?;
            let painted = if erase { BLANK } else { color };
            println!("Painted ({}, {}) {}", row, col, painted);
        }
        PixelsCommands::Resize { file, size } => {
            let mut grid = load(&file)?;
            grid.set_grid_size(size).context("Invalid grid size")?;
            save(&grid, &file)?;
            println!("Resized {} to {}x{}", file, size, size);
        }
        PixelsCommands::Clear { file } => {
            let mut grid = load(&file)?;
            grid.clear();
            save(&grid, &file)?;
            println!("Cleared {}", file);
        }
        PixelsCommands::Show { file } => {
            let grid = load(&file)?;
            print_grid(&grid);
        }
        PixelsCommands::Count { file, format } => {
            let grid = load(&file)?;
            let counts = grid.count_by_color();
            match format.as_str() {
                "json" => {
                    let out = serde_json::to_string_pretty(&counts)
                        .context("Failed to serialize counts")?;
                    println!("{}", out);
                }
                "text" => {
                    for c in &counts {
                        println!("{:>5}  {} ({})", c.count, c.name, c.color);
                    }
                }
                _ => bail!("Unknown format: {}", format),
            }
        }
        PixelsCommands::Numbers { size, mode } => {
            for side in Side::ALL {
                let numbers = edge_numbers(mode, side, size);
                let joined: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
                println!("{:<7} {}", format!("{:?}:", side), joined.join(" "));
            }
        }
        PixelsCommands::Palette => {
            for p in &PALETTE {
                println!("#{:06X}  {}", p.hex, p.name);
            }
        }
    }
    Ok(())
}

fn load(file: &str) -> Result<PixelGrid> {
    PixelGrid::load(Path::new(file)).with_context(|| format!("Failed to load design: {}", file))
}

fn save(grid: &PixelGrid, file: &str) -> Result<()> {
    grid.save(Path::new(file))
        .with_context(|| format!("Failed to save design: {}", file))
}

/// One character per cell: palette position in base 36, `.` for blank, `?` off-palette
fn print_grid(grid: &PixelGrid) {
    let n = grid.grid_size();
    for row in grid.visible_pixels().chunks(n) {
        let line: String = row.iter().map(|c| cell_char(*c)).collect();
        println!("{}", line);
    }
}

fn cell_char(color: Color) -> char {
    if color == BLANK {
        return '.';
    }
    let rgba = color.to_rgba8();
    PALETTE
        .iter()
        .position(|p| p.color().to_rgba8() == rgba)
        .and_then(|i| std::char::from_digit(i as u32, 36))
        .unwrap_or('?')
}
