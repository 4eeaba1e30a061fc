use crate::raycaster::{Hit, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Full,
    Dim,
}

impl From<Side> for Shade {
    fn from(side: Side) -> Self {
        match side {
            Side::Vertical => Shade::Full,
            Side::Horizontal => Shade::Dim,
        }
    }
}

/// One textured column to draw: rows `[draw_start, draw_end)` of column `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stripe {
    pub x: u32,
    pub draw_start: i32,
    pub draw_end: i32,
    pub tex_x: u32,
    pub shade: Shade,
}

/// Projected wall height in pixels, truncated toward zero.
#[inline]
pub fn line_height(perp_dist: f64, screen_height: u32) -> i32 {
    // Float-to-int casts saturate, so a zero distance yields i32::MAX.
    // abs() folds the -0.0 produced when the camera sits exactly on a face.
    (screen_height as f64 / perp_dist.abs()) as i32
}

pub fn project(hit: &Hit, x: u32, screen_height: u32, texture_width: u32) -> Stripe {
    let h = screen_height as i32;
    let line = line_height(hit.perp_dist, screen_height);

    let draw_start = (-line / 2 + h / 2).clamp(0, h - 1);
    let draw_end = (line / 2 + h / 2).clamp(0, h - 1);

    let tex_x = ((hit.wall_x * texture_width as f64) as u32).min(texture_width.saturating_sub(1));

    Stripe {
        x,
        draw_start,
        draw_end,
        tex_x,
        shade: hit.side.into(),
    }
}

pub fn project_frame(hits: &[Hit], screen_height: u32, texture_width: u32) -> Vec<Stripe> {
    hits.iter()
        .enumerate()
        .map(|(x, hit)| project(hit, x as u32, screen_height, texture_width))
        .collect()
}
