use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed source column/row for every destination pixel
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_y: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            src_x: Vec::new(),
            src_y: Vec::new(),
        }
    }

    pub fn new(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> Self {
        Self {
            src_x: nearest(dst_w, src_w),
            src_y: nearest(dst_h, src_h),
        }
    }

    pub fn matches(&self, dst_w: usize, dst_h: usize) -> bool {
        self.src_x.len() == dst_w && self.src_y.len() == dst_h
    }
}

fn nearest(dst: usize, src: usize) -> Vec<usize> {
    (0..dst)
        .map(|d| ((d * src) / dst).min(src.saturating_sub(1)))
        .collect()
}

/// Parallel nearest-neighbour stretch of the fixed-size frame onto the window.
/// Rows are processed in parallel for cache friendly writes
pub fn blit_nearest(dst: &mut [u32], dw: usize, src: &[u32], sw: usize, lut: &ScaleLut) {
    dst.par_chunks_mut(dw).enumerate().for_each(|(y, dst_row)| {
        let row = lut.src_y[y] * sw;
        for (x, px) in dst_row.iter_mut().enumerate() {
            *px = src[row + lut.src_x[x]];
        }
    });
}
