//! Haze CLI - drive the smoke background engine headlessly, inspect lyrics, edit pixel designs

mod commands;
mod headless;
mod raster;
mod sprite;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, lyrics, pixels, render, simulate};
use haze_core::Color;
use headless::{parse_resize, ResizeAt};

#[derive(Parser)]
#[command(name = "haze")]
#[command(about = "Animated smoke backgrounds, rendered and traced headlessly", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the smoke field to a PNG image
    Render {
        /// Path to simulator config (TOML)
        #[arg(long)]
        config: Option<String>,

        /// Smoke sprite image; a soft puff is generated when omitted
        #[arg(long)]
        sprite: Option<String>,

        /// Output image path
        #[arg(short, long, default_value = "smoke.png")]
        output: String,

        /// Viewport width in pixels
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Viewport height in pixels
        #[arg(long, default_value = "720")]
        height: u32,

        /// Simulation ticks to run before capturing
        #[arg(long, default_value = "120")]
        frames: u64,

        /// Host frame callback rate in Hz
        #[arg(long, default_value = "60")]
        driver_hz: f64,

        /// RNG seed for a reproducible field
        #[arg(long)]
        seed: Option<u32>,

        /// Page background behind the smoke layer
        #[arg(long, default_value = "#000000")]
        background: Color,

        /// Behave as if the platform asked for reduced motion
        #[arg(long)]
        reduced_motion: bool,
    },

    /// Run the simulation and print per-tick statistics
    Simulate {
        /// Path to simulator config (TOML)
        #[arg(long)]
        config: Option<String>,

        /// Viewport width in pixels
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Viewport height in pixels
        #[arg(long, default_value = "720")]
        height: u32,

        /// Simulation ticks to run
        #[arg(long, default_value = "48")]
        frames: u64,

        /// Host frame callback rate in Hz
        #[arg(long, default_value = "60")]
        driver_hz: f64,

        /// RNG seed for a reproducible field
        #[arg(long)]
        seed: Option<u32>,

        /// Resize the viewport once a tick count is reached (WIDTHxHEIGHT@TICK)
        #[arg(long, value_parser = parse_resize)]
        resize: Option<ResizeAt>,

        /// Behave as if the platform asked for reduced motion
        #[arg(long)]
        reduced_motion: bool,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the effective simulator config, or check a config file
    Config {
        /// Path to simulator config (TOML)
        #[arg(long)]
        config: Option<String>,

        /// Only validate, don't print
        #[arg(long)]
        check: bool,
    },

    /// Inspect an LRC or SRT lyrics file
    Lyrics {
        /// Path to lyrics file (.lrc or .srt)
        file: String,

        /// Show the synced window at this playback time (seconds)
        #[arg(long)]
        at: Option<f64>,

        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Pixel-art design operations
    #[command(subcommand)]
    Pixels(pixels::PixelsCommands),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            config,
            sprite,
            output,
            width,
            height,
            frames,
            driver_hz,
            seed,
            background,
            reduced_motion,
        } => render::run(render::RenderArgs {
            config,
            sprite,
            output,
            width,
            height,
            frames,
            driver_hz,
            seed,
            background,
            reduced_motion,
        }),
        Commands::Simulate {
            config,
            width,
            height,
            frames,
            driver_hz,
            seed,
            resize,
            reduced_motion,
            json,
        } => simulate::run(simulate::SimulateArgs {
            config,
            width,
            height,
            frames,
            driver_hz,
            seed,
            resize,
            reduced_motion,
            json,
        }),
        Commands::Config { config: path, check } => config::run(path.as_deref(), check),
        Commands::Lyrics { file, at, format } => lyrics::run(&file, at, &format),
        Commands::Pixels(cmd) => pixels::run(cmd),
    }
}
