use rayon::prelude::*;

use crate::camera::Camera;
use crate::grid::Grid;
use crate::projector::{Shade, Stripe, project_frame};
use crate::raycaster::cast_frame;
use crate::texture::{Texture, pack_rgb};

#[inline]
fn shade(color: u32, shade: Shade) -> u32 {
    match shade {
        Shade::Full => color,
        // Halve each channel
        Shade::Dim => (color >> 1) & 0x007F_7F7F,
    }
}

pub fn render_frame(
    buf: &mut [u32],
    width: usize,
    height: usize,
    grid: &Grid,
    camera: &Camera,
    wall: &Texture,
) {
    let hits = cast_frame(grid, camera, width as u32);
    let stripes = project_frame(&hits, height as u32, wall.width);
    draw_stripes(buf, width, height, &stripes, wall);
}

/// Clears the frame and blits one texture column per stripe, stretching the
/// full texture height over the stripe's span.
pub fn draw_stripes(buf: &mut [u32], width: usize, height: usize, stripes: &[Stripe], wall: &Texture) {
    debug_assert_eq!(buf.len(), width * height);
    let background = pack_rgb(0, 0, 0);

    // Rows are independent, so fill them in parallel
    buf.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        row.fill(background);
        let y = y as i32;
        for stripe in stripes {
            if y < stripe.draw_start || y >= stripe.draw_end {
                continue;
            }
            let span = (stripe.draw_end - stripe.draw_start) as u64;
            let offset = (y - stripe.draw_start) as u64;
            let tex_y = ((offset * wall.height as u64 / span) as u32).min(wall.height - 1);
            row[stripe.x as usize] = shade(wall.get(stripe.tex_x, tex_y), stripe.shade);
        }
    });
}
