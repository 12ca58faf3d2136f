use crate::foundation::math::mul_div255_u8;

pub(crate) type PremulRgba8 = [u8; 4];

/// Premultiplied source-over of a single pixel.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Source-over for two equal-length RGBA8 rows.
pub(crate) fn over_row(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
}

/// Tint an alpha plane with `color` (premultiplied) into RGBA8 bytes.
pub(crate) fn tint_alpha(alpha: &[u8], color: PremulRgba8) -> Vec<u8> {
    let mut out = Vec::with_capacity(alpha.len() * 4);
    for &a in alpha {
        let a = u16::from(a);
        out.extend_from_slice(&[
            mul_div255_u8(u16::from(color[0]), a),
            mul_div255_u8(u16::from(color[1]), a),
            mul_div255_u8(u16::from(color[2]), a),
            mul_div255_u8(u16::from(color[3]), a),
        ]);
    }
    out
}
