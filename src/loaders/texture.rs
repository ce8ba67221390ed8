use log::{debug, warn};
use std::path::Path;

use crate::config::AssetConfig;
use crate::traits::TextureSlot;

/// Decoded RGBA8 texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl TextureData {
    /// 1x1 opaque white, bound in place of a missing image
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            data: vec![255, 255, 255, 255],
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.width == 1 && self.height == 1
    }
}

/// Load an image as RGBA8.
///
/// Missing or undecodable files are not fatal: they are logged and
/// replaced by a 1x1 placeholder so rendering carries on.
pub fn load_texture(path: impl AsRef<Path>) -> TextureData {
    let path = path.as_ref();
    match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (width, height) = (rgba.width(), rgba.height());
            debug!("loaded {}x{} texture from {:?}", width, height, path);
            TextureData {
                width,
                height,
                data: rgba.into_raw(),
            }
        }
        Err(e) => {
            warn!("can't open texture {:?}: {}; using placeholder", path, e);
            TextureData::placeholder()
        }
    }
}

/// Load every texture the scene binds, in slot order
pub fn load_scene_textures(assets: &AssetConfig) -> Vec<(TextureSlot, TextureData)> {
    [
        (TextureSlot::Clouds, &assets.clouds_texture),
        (TextureSlot::TerrainGradient, &assets.terrain_gradient),
        (TextureSlot::Plasma, &assets.plasma_texture),
        (TextureSlot::SunGradient, &assets.sun_gradient),
    ]
    .into_iter()
    .map(|(slot, path)| (slot, load_texture(path)))
    .collect()
}
