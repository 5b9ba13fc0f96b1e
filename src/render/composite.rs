use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u16;

pub(crate) type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over for premultiplied pixels.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                let dc = mul_div255_u16(u16::from(dst[i]), inv);
                out[i] = (u16::from(src[i]) + dc).min(255) as u8;
            }
            out
        }
    }
}

/// Composite `src` over `dst`, both premultiplied RGBA8 of equal size.
pub(crate) fn over_in_place(dst: &mut [u8], src: &[u8]) -> ReelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::invalid_input(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Flatten premultiplied RGBA8 over an opaque matte color.
pub(crate) fn flatten_premul_over_matte(
    dst: &mut [u8],
    src_premul: &[u8],
    matte: [u8; 3],
) -> ReelResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::invalid_input(
            "flatten_premul_over_matte expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let out = over([matte[0], matte[1], matte[2], 255], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
        d[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
