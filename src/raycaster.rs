//! Ray/grid intersection by digital differential analysis.
//!
//! One ray per screen column: the ray steps from grid line to grid line,
//! always crossing whichever axis is nearer, until it enters a wall cell.

use rayon::prelude::*;

use crate::camera::Camera;
use crate::grid::Grid;

/// Stand-in for `|1 / 0|`; larger than any distance a bounded grid can produce.
const NO_CROSSING: f64 = 1e30;

/// Which family of grid lines the ray crossed last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Face perpendicular to x, reached by an x-step.
    Vertical = 0,
    /// Face perpendicular to y, reached by a y-step.
    Horizontal = 1,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub cell: [i32; 2],
    pub side: Side,
    /// Distance projected onto the view direction (no fisheye).
    pub perp_dist: f64,
    /// Position along the struck face, in `[0, 1)`.
    pub wall_x: f64,
}

/// Maps a screen column to the camera-plane offset in `[-1, 1)`.
#[inline]
pub fn camera_x(column: u32, screen_width: u32) -> f64 {
    2.0 * column as f64 / screen_width as f64 - 1.0
}

#[inline]
pub fn ray_dir(camera: &Camera, column: u32, screen_width: u32) -> [f64; 2] {
    let cx = camera_x(column, screen_width);
    [
        camera.dir[0] + camera.plane[0] * cx,
        camera.dir[1] + camera.plane[1] * cx,
    ]
}

pub fn cast_column(grid: &Grid, camera: &Camera, column: u32, screen_width: u32) -> Hit {
    cast_ray(grid, camera.pos, ray_dir(camera, column, screen_width))
}

/// Casts every column of a frame. Columns are independent, so they run on
/// the rayon pool; the camera is only read.
pub fn cast_frame(grid: &Grid, camera: &Camera, screen_width: u32) -> Vec<Hit> {
    (0..screen_width)
        .into_par_iter()
        .map(|x| cast_column(grid, camera, x, screen_width))
        .collect()
}

pub fn cast_ray(grid: &Grid, pos: [f64; 2], dir: [f64; 2]) -> Hit {
    let mut map = [pos[0] as i32, pos[1] as i32];

    let delta = [delta_dist(dir[0]), delta_dist(dir[1])];

    let mut step = [0i32; 2];
    let mut side_dist = [0.0f64; 2];
    for axis in 0..2 {
        if dir[axis] < 0.0 {
            step[axis] = -1;
            side_dist[axis] = (pos[axis] - map[axis] as f64) * delta[axis];
        } else {
            step[axis] = 1;
            side_dist[axis] = (map[axis] as f64 + 1.0 - pos[axis]) * delta[axis];
        }
    }

    // Terminates because the grid border is solid.
    let side = loop {
        let side = if side_dist[0] < side_dist[1] {
            side_dist[0] += delta[0];
            map[0] += step[0];
            Side::Vertical
        } else {
            side_dist[1] += delta[1];
            map[1] += step[1];
            Side::Horizontal
        };
        if grid.is_wall(map[0], map[1]) {
            break side;
        }
    };

    // Axis along which distance is measured, and the other one along the face.
    let (a, b) = match side {
        Side::Vertical => (0, 1),
        Side::Horizontal => (1, 0),
    };
    let perp_dist = (map[a] as f64 - pos[a] + ((1 - step[a]) / 2) as f64) / dir[a];

    let along = pos[b] + perp_dist * dir[b];
    let mut wall_x = along - along.floor();
    // `x - floor(x)` rounds up to 1.0 for tiny negative x.
    if wall_x >= 1.0 {
        wall_x = 0.0;
    }

    Hit {
        cell: map,
        side,
        perp_dist,
        wall_x,
    }
}

#[inline]
fn delta_dist(d: f64) -> f64 {
    if d == 0.0 { NO_CROSSING } else { (1.0 / d).abs() }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn room(width: usize, height: usize) -> impl Fn(usize, usize) -> bool {
        move |x, y| x == 0 || y == 0 || x == width - 1 || y == height - 1
    }

    #[test]
    fn column_offsets_span_the_plane() {
        assert_eq!(camera_x(0, 800), -1.0);
        assert_eq!(camera_x(400, 800), 0.0);
        assert!(camera_x(799, 800) < 1.0);
    }

    #[test]
    fn straight_ray_along_positive_x() {
        let border = room(10, 4);
        let grid = Grid::from_fn(10, 4, |x, y| border(x, y) || x == 5);
        let hit = cast_ray(&grid, [1.5, 1.5], [1.0, 0.0]);
        assert_eq!(hit.cell, [5, 1]);
        assert_eq!(hit.side, Side::Vertical);
        assert!((hit.perp_dist - 3.5).abs() < EPS);
        assert!((hit.wall_x - 0.5).abs() < EPS);
    }

    #[test]
    fn straight_rays_along_each_axis() {
        let grid = Grid::from_fn(8, 8, room(8, 8));
        let pos = [2.25, 3.75];

        let hit = cast_ray(&grid, pos, [-1.0, 0.0]);
        assert_eq!((hit.cell, hit.side), ([0, 3], Side::Vertical));
        assert!((hit.perp_dist - 1.25).abs() < EPS);

        let hit = cast_ray(&grid, pos, [1.0, 0.0]);
        assert_eq!((hit.cell, hit.side), ([7, 3], Side::Vertical));
        assert!((hit.perp_dist - 4.75).abs() < EPS);

        let hit = cast_ray(&grid, pos, [0.0, 1.0]);
        assert_eq!((hit.cell, hit.side), ([2, 7], Side::Horizontal));
        assert!((hit.perp_dist - 3.25).abs() < EPS);
        assert!((hit.wall_x - 0.25).abs() < EPS);

        let hit = cast_ray(&grid, pos, [0.0, -1.0]);
        assert_eq!((hit.cell, hit.side), ([2, 0], Side::Horizontal));
        assert!((hit.perp_dist - 2.75).abs() < EPS);
    }

    #[test]
    fn oblique_ray_reports_projected_distance() {
        let grid = Grid::from_fn(8, 8, room(8, 8));
        // Looking along +x with a ray tilted by the plane: the perpendicular
        // distance to the x = 7 face is still 5.5 regardless of the tilt.
        let hit = cast_ray(&grid, [1.5, 3.5], [1.0, 0.4]);
        assert_eq!(hit.side, Side::Vertical);
        assert_eq!(hit.cell, [7, 5]);
        assert!((hit.perp_dist - 5.5).abs() < EPS);
        // y at the face is 3.5 + 5.5 * 0.4 = 5.7
        assert!((hit.wall_x - 0.7).abs() < EPS);
    }

    #[test]
    fn center_column_hits_west_wall_from_start() {
        let grid = Grid::default();
        let cam = Camera::new(0.01, 0.01);
        let hit = cast_column(&grid, &cam, 400, 800);
        assert_eq!(hit.cell, [0, 3]);
        assert_eq!(hit.side, Side::Vertical);
        assert!((hit.perp_dist - 2.5).abs() < EPS);
        assert!((hit.wall_x - 0.5).abs() < EPS);
    }

    #[test]
    fn frame_matches_per_column_casts() {
        let grid = Grid::default();
        let cam = Camera::new(0.01, 0.01);
        let hits = cast_frame(&grid, &cam, 160);
        assert_eq!(hits.len(), 160);
        for (x, hit) in hits.iter().enumerate() {
            assert_eq!(*hit, cast_column(&grid, &cam, x as u32, 160));
        }
    }

    #[test]
    fn wall_offset_stays_in_unit_range() {
        let grid = Grid::default();
        let mut cam = Camera::new(0.01, 0.01);
        for &pos in &[[3.5, 3.5], [1.25, 1.75], [7.9, 5.1], [13.5, 14.5], [5.0, 7.5]] {
            cam.pos = pos;
            for _ in 0..36 {
                cam.rotate(std::f64::consts::TAU / 36.0);
                for hit in cast_frame(&grid, &cam, 200) {
                    assert!((0.0..1.0).contains(&hit.wall_x), "{hit:?}");
                    assert!(hit.perp_dist >= 0.0, "{hit:?}");
                    assert!(grid.is_wall(hit.cell[0], hit.cell[1]));
                }
            }
        }
    }
}
