//! Headless smoke-to-PNG render command

use crate::headless::HeadlessDriver;
use crate::raster::RasterSurface;
use crate::sprite;
use anyhow::{Context, Result};
use haze_core::Color;
use haze_runtime::Viewport;
use std::path::Path;
use std::rc::Rc;

/// Generated sprite size when no `--sprite` is given
const PUFF_SIZE: u32 = 256;

pub struct RenderArgs {
    pub config: Option<String>,
    pub sprite: Option<String>,
    pub output: String,
    pub width: u32,
    pub height: u32,
    pub frames: u64,
    pub driver_hz: f64,
    pub seed: Option<u32>,
    pub background: Color,
    pub reduced_motion: bool,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;

    let puff = match &args.sprite {
        Some(path) => sprite::load(Path::new(path))?,
        None => sprite::soft_puff(PUFF_SIZE),
    };
    println!(
        "Sprite: {}x{}{}",
        puff.width(),
        puff.height(),
        if args.sprite.is_none() { " (generated)" } else { "" }
    );

    let viewport = Viewport::new(args.width as f32, args.height as f32);
    let surface = RasterSurface::new(viewport.surface_extent());
    let mut driver = HeadlessDriver::new(
        config,
        surface,
        args.seed,
        args.driver_hz,
        args.reduced_motion,
    )?;
    driver.start(Rc::new(puff));
    driver.run(args.frames, None, |_, _| {})?;

    let ticks = driver.simulator().ticks();
    let visible = driver
        .simulator()
        .particles()
        .iter()
        .filter(|p| p.is_visible())
        .count();
    println!(
        "Simulated {} ticks, {} of {} particles visible",
        ticks,
        visible,
        driver.simulator().particles().len()
    );

    let surface = driver
        .finish()
        .context("Simulator released no surface")?;
    log::debug!("rasterizing {} buffered draw calls", surface.pending_ops());
    let full = surface.to_image(args.background);
    let frame = image::imageops::crop_imm(&full, 0, 0, args.width, args.height).to_image();
    frame
        .save(&args.output)
        .with_context(|| format!("Failed to save image: {}", args.output))?;

    println!("Saved {}x{} frame to {}", frame.width(), frame.height(), args.output);
    Ok(())
}
