//! Config print and check command

use anyhow::{Context, Result};

pub fn run(path: Option<&str>, check: bool) -> Result<()> {
    let config = super::load_config(path)?;

    if check {
        println!(
            "{}: valid ({} particles, {} fps, direction {:?}, origin {:?})",
            path.unwrap_or("<defaults>"),
            config.num_particles,
            config.fps,
            config.direction,
            config.origin
        );
        return Ok(());
    }

    let out = config
        .to_toml_string()
        .context("Failed to serialize config")?;
    print!("{}", out);
    Ok(())
}
