use crate::foundation::color::Rgba8;
use crate::foundation::error::{ShopframeError, ShopframeResult};
use crate::render::composite;

/// Premultiplied RGBA8 raster: the unit every compositor stage produces and caches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Fully transparent surface. Dimensions must be non-zero and fit the rasterizer's `u16` range.
    pub fn new(width: u32, height: u32) -> ShopframeResult<Self> {
        check_dims(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        })
    }

    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> ShopframeResult<Self> {
        check_dims(width, height)?;
        if data.len() != width as usize * height as usize * 4 {
            return Err(ShopframeError::render(format!(
                "surface byte length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Replace every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8) {
        let premul = color.to_premul();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
    }

    /// Source-over `src` with its top-left corner at `(x, y)`; parts outside `self` are clipped.
    pub fn draw_surface(&mut self, src: &Surface, x: i64, y: i64) {
        let dst_w = i64::from(self.width);
        let dst_h = i64::from(self.height);
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(src.width)).min(dst_w);
        let y1 = (y + i64::from(src.height)).min(dst_h);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let span = ((x1 - x0) * 4) as usize;
        for dy in y0..y1 {
            let sy = (dy - y) as usize;
            let sx = (x0 - x) as usize;
            let s_start = (sy * src.width as usize + sx) * 4;
            let d_start = (dy as usize * self.width as usize + x0 as usize) * 4;
            composite::over_row(
                &mut self.data[d_start..d_start + span],
                &src.data[s_start..s_start + span],
            );
        }
    }

    /// Encode as PNG (straight alpha on disk).
    pub fn encode_png(&self) -> ShopframeResult<Vec<u8>> {
        crate::assets::decode::encode_png(self)
    }

    pub(crate) fn to_pixmap(&self) -> vello_cpu::Pixmap {
        let mut may_have_opacities = false;
        let mut pixels = Vec::with_capacity(self.width as usize * self.height as usize);
        for px in self.data.chunks_exact(4) {
            may_have_opacities |= px[3] != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            });
        }
        vello_cpu::Pixmap::from_parts_with_opacity(
            pixels,
            self.width as u16,
            self.height as u16,
            may_have_opacities,
        )
    }

    pub(crate) fn from_pixmap(pixmap: &vello_cpu::Pixmap) -> ShopframeResult<Self> {
        Self::from_premul(
            u32::from(pixmap.width()),
            u32::from(pixmap.height()),
            pixmap.data_as_u8_slice().to_vec(),
        )
    }

    pub(crate) fn to_image_paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(self.to_pixmap())),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

fn check_dims(width: u32, height: u32) -> ShopframeResult<()> {
    if width == 0 || height == 0 {
        return Err(ShopframeError::render(format!(
            "surface must be non-empty, got {width}x{height}"
        )));
    }
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(ShopframeError::render(format!(
            "surface {width}x{height} exceeds u16 limits"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
