//! Saving frames as SVG files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use color_eyre::eyre::WrapErr;
use goo_core::Rgba;
use goo_render::{Scene, svg::Svg};

/// Width of exported documents; height follows the terminal's aspect.
pub const EXPORT_WIDTH: u32 = 1000;

/// Directory exports are written to.
pub fn export_dir() -> PathBuf {
    goo_config::project_dirs()
        .map(|dirs| dirs.data_dir().join("exports"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Export height for a viewport of `cols` x `rows` terminal cells.
///
/// Each cell holds two square-ish pixels stacked vertically.
pub fn export_height(cols: u16, rows: u16) -> u32 {
    if cols == 0 {
        return EXPORT_WIDTH;
    }
    (EXPORT_WIDTH as u64 * rows as u64 * 2 / cols as u64).max(1) as u32
}

/// Write `scene` as `goo-<millis>.svg` into `dir`.
pub fn write_svg(
    dir: &Path,
    scene: &Scene,
    height: u32,
    background: Rgba,
) -> color_eyre::Result<PathBuf> {
    fs::create_dir_all(dir)
        .wrap_err_with(|| format!("failed to create export directory {}", dir.display()))?;

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let path = dir.join(format!("goo-{stamp}.svg"));

    let document = Svg::new(scene, EXPORT_WIDTH, height)
        .with_background(background)
        .to_string();
    fs::write(&path, document).wrap_err_with(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_height_follows_aspect() {
        assert_eq!(export_height(100, 50), 1000);
        assert_eq!(export_height(200, 50), 500);
        assert_eq!(export_height(0, 50), EXPORT_WIDTH);
    }

    #[test]
    fn test_write_svg_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let path = write_svg(&target, &Scene::default(), 500, Rgba::BLACK).unwrap();

        assert!(path.starts_with(&target));
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains(r#"width="1000" height="500""#));
    }
}
