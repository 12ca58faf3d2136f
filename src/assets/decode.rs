use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::ShopframeResult;
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::render::surface::Surface;

/// Decode any format the `image` crate understands into a premultiplied surface.
pub fn decode_image(bytes: &[u8]) -> ShopframeResult<Surface> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Surface::from_premul(width, height, rgba8_premul)
}

/// Encode a premultiplied surface as a straight-alpha PNG.
pub fn encode_png(surface: &Surface) -> ShopframeResult<Vec<u8>> {
    let mut straight = surface.data().to_vec();
    unpremultiply_rgba8_in_place(&mut straight);

    let img = image::RgbaImage::from_raw(surface.width(), surface.height(), straight)
        .context("surface bytes do not form an RGBA image")?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
