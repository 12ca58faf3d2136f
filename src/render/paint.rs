use crate::foundation::color::Rgba8;
use crate::foundation::error::{ShopframeError, ShopframeResult};
use crate::render::surface::Surface;

/// Gradient stop; offsets outside `[0, 1]` are clamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ColorStop {
    pub(crate) offset: f64,
    pub(crate) color: Rgba8,
}

impl ColorStop {
    pub(crate) fn new(offset: f64, color: Rgba8) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }
}

/// Concentric radial gradient: `t = 0` at `inner_radius`, `t = 1` at `outer_radius`, padded
/// outside that ring.
pub(crate) fn radial_gradient(
    width: u32,
    height: u32,
    center: (f64, f64),
    inner_radius: f64,
    outer_radius: f64,
    stops: &[ColorStop],
) -> ShopframeResult<Surface> {
    check_stops(stops)?;
    let span = outer_radius - inner_radius;
    rasterize(width, height, |x, y| {
        let d = ((x - center.0).powi(2) + (y - center.1).powi(2)).sqrt();
        if span.abs() <= f64::EPSILON {
            if d < inner_radius { 0.0 } else { 1.0 }
        } else {
            (d - inner_radius) / span
        }
    }, stops)
}

/// Linear gradient along `p0 -> p1`, padded past both ends.
pub(crate) fn linear_gradient(
    width: u32,
    height: u32,
    p0: (f64, f64),
    p1: (f64, f64),
    stops: &[ColorStop],
) -> ShopframeResult<Surface> {
    check_stops(stops)?;
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    let len2 = dx * dx + dy * dy;
    rasterize(width, height, |x, y| {
        if len2 <= f64::EPSILON {
            0.0
        } else {
            ((x - p0.0) * dx + (y - p0.1) * dy) / len2
        }
    }, stops)
}

fn rasterize(
    width: u32,
    height: u32,
    t_at: impl Fn(f64, f64) -> f64,
    stops: &[ColorStop],
) -> ShopframeResult<Surface> {
    let mut surface = Surface::new(width, height)?;
    let w = width as usize;
    let data = surface.data_mut();
    for y in 0..height as usize {
        for x in 0..w {
            let t = t_at(x as f64 + 0.5, y as f64 + 0.5);
            let idx = (y * w + x) * 4;
            data[idx..idx + 4].copy_from_slice(&sample(stops, t));
        }
    }
    Ok(surface)
}

/// Premultiplied colour at `t`, interpolating premultiplied channels between neighbouring stops.
pub(crate) fn sample(stops: &[ColorStop], t: f64) -> [u8; 4] {
    let Some(first) = stops.first() else {
        return [0; 4];
    };
    if t.is_nan() || t <= first.offset {
        return first.color.to_premul();
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= f64::EPSILON {
                return b.color.to_premul();
            }
            let f = (t - a.offset) / span;
            let (pa, pb) = (a.color.to_premul(), b.color.to_premul());
            let mut out = [0u8; 4];
            for i in 0..4 {
                let (ca, cb) = (f64::from(pa[i]), f64::from(pb[i]));
                out[i] = (ca + (cb - ca) * f).round().clamp(0.0, 255.0) as u8;
            }
            return out;
        }
    }
    stops[stops.len() - 1].color.to_premul()
}

fn check_stops(stops: &[ColorStop]) -> ShopframeResult<()> {
    if stops.is_empty() {
        return Err(ShopframeError::render("gradient needs at least one stop"));
    }
    if stops.windows(2).any(|p| p[1].offset < p[0].offset) {
        return Err(ShopframeError::render("gradient stops must be sorted by offset"));
    }
    Ok(())
}
