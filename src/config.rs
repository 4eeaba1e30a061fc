use std::path::PathBuf;

use clap::Parser;

pub const SCREEN_WIDTH: u32 = 800;
pub const SCREEN_HEIGHT: u32 = 600;

/// World units to pixels for the top-down scale; the raycasting math never uses it.
pub const CELL_SIZE: u32 = 50;

pub const START_POS: [f64; 2] = [3.5, 3.5];
pub const START_DIR: [f64; 2] = [-1.0, 0.0];
pub const START_PLANE: [f64; 2] = [0.0, 0.66];

pub const WALL_TEXTURE: &str = "wall_texture.bmp";
pub const FLOOR_TEXTURE: &str = "floor_texture.bmp";
pub const CEILING_TEXTURE: &str = "ceiling_texture.bmp";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "First-person raycasting maze renderer", long_about = None)]
pub struct Config {
    /// Internal frame width in pixels.
    #[arg(long, default_value_t = SCREEN_WIDTH, value_parser = clap::value_parser!(u32).range(2..))]
    pub width: u32,

    /// Internal frame height in pixels.
    #[arg(long, default_value_t = SCREEN_HEIGHT, value_parser = clap::value_parser!(u32).range(2..))]
    pub height: u32,

    /// Grid units moved per frame while a movement key is held; must stay below one cell.
    #[arg(long, default_value_t = 0.01, value_parser = parse_move_speed, allow_negative_numbers = true)]
    pub move_speed: f64,

    /// Radians turned per frame while a rotation key is held.
    #[arg(long, default_value_t = 0.01, value_parser = parse_rot_speed, allow_negative_numbers = true)]
    pub rot_speed: f64,

    /// Directory holding the wall, floor and ceiling bitmaps.
    #[arg(long, default_value = ".")]
    pub assets: PathBuf,

    /// Maze layout file; the built-in maze is used when omitted.
    #[arg(long, value_name = "FILE")]
    pub maze: Option<PathBuf>,
}

fn parse_finite(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !v.is_finite() {
        return Err(format!("{s} is not a finite number"));
    }
    Ok(v)
}

// Collision only probes the destination cell, so a step of a whole cell or
// more could leave the walled border and index outside the grid.
fn parse_move_speed(s: &str) -> Result<f64, String> {
    let v = parse_finite(s)?;
    if v.abs() >= 1.0 {
        return Err(format!("{v} must be less than one cell per frame"));
    }
    Ok(v)
}

fn parse_rot_speed(s: &str) -> Result<f64, String> {
    parse_finite(s)
}

impl Config {
    pub fn texture_path(&self, name: &str) -> PathBuf {
        self.assets.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_builtin_constants() {
        let config = Config::parse_from(["maze_caster"]);
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert_eq!(config.move_speed, 0.01);
        assert_eq!(config.rot_speed, 0.01);
        assert!(config.maze.is_none());
        assert_eq!(
            config.texture_path(WALL_TEXTURE),
            PathBuf::from("./wall_texture.bmp")
        );
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::parse_from([
            "maze_caster",
            "--width",
            "320",
            "--rot-speed",
            "0.05",
            "--assets",
            "res",
            "--maze",
            "level.txt",
        ]);
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 600);
        assert_eq!(config.rot_speed, 0.05);
        assert_eq!(config.texture_path(FLOOR_TEXTURE), PathBuf::from("res/floor_texture.bmp"));
        assert_eq!(config.maze, Some(PathBuf::from("level.txt")));
    }

    #[test]
    fn rejects_degenerate_screen() {
        assert!(Config::try_parse_from(["maze_caster", "--height", "1"]).is_err());
    }

    #[test]
    fn move_speed_must_stay_below_one_cell() {
        for bad in ["5", "1", "-1.0", "NaN", "inf", "fast"] {
            assert!(
                Config::try_parse_from(["maze_caster", "--move-speed", bad]).is_err(),
                "accepted --move-speed {bad}"
            );
        }
        let config = Config::try_parse_from(["maze_caster", "--move-speed", "0.99"]).unwrap();
        assert_eq!(config.move_speed, 0.99);
        let config = Config::try_parse_from(["maze_caster", "--move-speed", "-0.5"]).unwrap();
        assert_eq!(config.move_speed, -0.5);
    }

    #[test]
    fn rot_speed_must_be_finite() {
        for bad in ["NaN", "inf", "-inf"] {
            assert!(
                Config::try_parse_from(["maze_caster", "--rot-speed", bad]).is_err(),
                "accepted --rot-speed {bad}"
            );
        }
        let config = Config::try_parse_from(["maze_caster", "--rot-speed", "3.5"]).unwrap();
        assert_eq!(config.rot_speed, 3.5);
    }

    #[test]
    fn fastest_allowed_speed_keeps_moves_inside_the_maze() {
        let config = Config::try_parse_from(["maze_caster", "--move-speed", "0.99"]).unwrap();
        let grid = crate::grid::Grid::default();
        let mut cam = crate::camera::Camera::new(config.move_speed, config.rot_speed);
        for i in 0..2000 {
            if i % 7 == 0 {
                cam.rotate(0.9);
            }
            cam.move_forward(&grid);
            let [x, y] = cam.cell();
            assert!(grid.get(x as i64, y as i64).is_some(), "left the grid at {:?}", cam.pos);
        }
    }
}
