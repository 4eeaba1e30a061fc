use std::path::Path;

use anyhow::{Context, ensure};
use log::info;

use crate::config::{CEILING_TEXTURE, Config, FLOOR_TEXTURE, WALL_TEXTURE};

/// Decoded bitmap, pixels packed as 0x00RRGGBB in row-major order.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pixels: Vec<u32>,
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory, alpha left at 0
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

impl Texture {
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> anyhow::Result<Self> {
        ensure!(width > 0 && height > 0, "texture must not be empty");
        ensure!(
            pixels.len() == width as usize * height as usize,
            "expected {} pixels for {width}x{height}, got {}",
            width as usize * height as usize,
            pixels.len()
        );
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("failed to load texture {}", path.display()))?
            .to_rgb8();
        let (width, height) = image.dimensions();
        let pixels = image
            .pixels()
            .map(|p| pack_rgb(p.0[0], p.0[1], p.0[2]))
            .collect();
        Self::from_pixels(width, height, pixels)
            .with_context(|| format!("unusable texture {}", path.display()))
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

pub struct Textures {
    pub wall: Texture,
    // Loaded so a missing asset fails startup; walls are the only textured surface.
    pub floor: Texture,
    pub ceiling: Texture,
}

impl Textures {
    pub fn load(config: &Config) -> anyhow::Result<Self> {
        let textures = Self {
            wall: Texture::load(&config.texture_path(WALL_TEXTURE))?,
            floor: Texture::load(&config.texture_path(FLOOR_TEXTURE))?,
            ceiling: Texture::load(&config.texture_path(CEILING_TEXTURE))?,
        };
        for (name, tex) in [
            ("wall", &textures.wall),
            ("floor", &textures.floor),
            ("ceiling", &textures.ceiling),
        ] {
            info!("loaded {name} texture ({}x{})", tex.width, tex.height);
        }
        Ok(textures)
    }
}
