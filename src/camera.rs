use crate::config::{START_DIR, START_PLANE, START_POS};
use crate::grid::Grid;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub pos: [f64; 2],   // (x, y) position in grid units
    pub dir: [f64; 2],   // unit forward vector
    pub plane: [f64; 2], // perpendicular to dir, length sets the horizontal FOV
    pub move_speed: f64, // grid units per tick
    pub rot_speed: f64,  // radians per tick
}

impl Camera {
    pub fn new(move_speed: f64, rot_speed: f64) -> Self {
        Self {
            pos: START_POS,
            dir: START_DIR,
            plane: START_PLANE,
            move_speed,
            rot_speed,
        }
    }

    /// Cell under the camera, by truncation.
    #[inline]
    pub fn cell(&self) -> [i32; 2] {
        [self.pos[0] as i32, self.pos[1] as i32]
    }

    pub fn move_forward(&mut self, grid: &Grid) {
        self.step(grid, self.move_speed);
    }

    pub fn move_backward(&mut self, grid: &Grid) {
        self.step(grid, -self.move_speed);
    }

    pub fn rotate_left(&mut self) {
        self.rotate(self.rot_speed);
    }

    pub fn rotate_right(&mut self) {
        self.rotate(-self.rot_speed);
    }

    // Axis-separated collision: x is tested against the current row, then y
    // against the (possibly updated) x. Lets the camera slide along walls but
    // is not swept, so a step longer than a cell can skip over a wall.
    fn step(&mut self, grid: &Grid, amount: f64) {
        let nx = self.pos[0] + self.dir[0] * amount;
        if !grid.is_wall(nx as i32, self.pos[1] as i32) {
            self.pos[0] = nx;
        }
        let ny = self.pos[1] + self.dir[1] * amount;
        if !grid.is_wall(self.pos[0] as i32, ny as i32) {
            self.pos[1] = ny;
        }
    }

    /// Rigid rotation of `dir` and `plane` by `angle` radians (counter-clockwise).
    pub fn rotate(&mut self, angle: f64) {
        let (s, c) = angle.sin_cos();
        self.dir = rotate_vec(self.dir, c, s);
        self.plane = rotate_vec(self.plane, c, s);
    }
}

#[inline]
fn rotate_vec(v: [f64; 2], c: f64, s: f64) -> [f64; 2] {
    let [x, y] = v;
    [x * c - y * s, x * s + y * c]
}
