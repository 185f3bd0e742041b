use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Gpx2SvgError;
use crate::normalize::ProfileEntry;

type Result<T> = std::result::Result<T, Gpx2SvgError>;

/// `track.gpx` -> `track.svg`
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("svg")
}

/// `track.svg` -> `track.svg.profile.json`
pub fn profile_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(".profile.json");
    PathBuf::from(name)
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub fn write_svg(path: &Path, svg: &str) -> Result<()> {
    create_parent(path)?;
    fs::write(path, svg)?;
    Ok(())
}

/// Write the profile as a JSON array of `[distance_km, elevation_m]` pairs.
pub fn write_profile(path: &Path, profile: &[ProfileEntry]) -> Result<()> {
    let pairs: Vec<(f64, f64)> = profile
        .iter()
        .map(|e| (e.distance_km, e.elevation_m))
        .collect();
    create_parent(path)?;
    fs::write(path, serde_json::to_vec(&pairs)?)?;
    Ok(())
}
