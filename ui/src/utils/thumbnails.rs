//! Thumbnail decoding and texture caching for the gallery.
//!
//! Gallery entries carry raw encoded image bytes; this cache decodes each
//! one once and keeps the GPU texture keyed by file name. An entry whose
//! payload cannot be decoded caches as `None` and renders as a placeholder
//! tile, so the gallery keeps one tile per daemon-reported file.

use std::collections::{HashMap, HashSet};

use egui::{ColorImage, TextureHandle, TextureOptions};
use ustr::Ustr;

#[derive(Default)]
pub struct ThumbnailCache {
    textures: HashMap<Ustr, Option<TextureHandle>>,
}

impl ThumbnailCache {
    /// The texture for an entry, decoding and uploading on first sight.
    pub fn texture(
        &mut self,
        ctx: &egui::Context,
        name: Ustr,
        bytes: &[u8],
    ) -> Option<TextureHandle> {
        self.textures
            .entry(name)
            .or_insert_with(|| {
                decode_thumbnail(bytes)
                    .map(|img| ctx.load_texture(name.as_str(), img, TextureOptions::LINEAR))
            })
            .clone()
    }

    /// Drop textures for entries that left the gallery. Called after every
    /// sync; a full replace may have removed or re-ordered anything.
    pub fn retain_names(&mut self, names: &HashSet<Ustr>) {
        self.textures.retain(|name, _| names.contains(name));
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Decode encoded image bytes into an egui image.
fn decode_thumbnail(bytes: &[u8]) -> Option<ColorImage> {
    if bytes.is_empty() {
        return None;
    }
    let img = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(err) => {
            log::debug!(
                target: "wallshell_ui::thumbnails",
                "failed to decode thumbnail: {err}"
            );
            return None;
        }
    };
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Some(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}
