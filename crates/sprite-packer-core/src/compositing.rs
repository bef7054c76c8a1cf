use crate::model::Rect;
use crate::packer::PADDING;
use image::RgbaImage;

/// Composites every `(source, slot)` pair into a fresh transparent `size x size` container.
///
/// `slot` is the padded rectangle handed out by the packer; the source lands on the slot
/// shrunk by [`PADDING`] and its edge texels are replicated into the padding ring.
pub fn build_container(size: u32, placements: &[(&RgbaImage, Rect)]) -> RgbaImage {
    let mut canvas = RgbaImage::new(size, size);
    for (src, slot) in placements {
        let interior = slot.shrink(PADDING);
        debug_assert_eq!(
            src.dimensions(),
            (interior.w, interior.h),
            "slot does not match source dimensions"
        );
        blit_extruded(src, &mut canvas, interior.x, interior.y, PADDING);
    }
    canvas
}

/// Blit all of `src` into `canvas` with its top-left at (dx, dy), then replicate the outer
/// rows, columns and corner texels `extrude` pixels outward.
///
/// Writes falling outside the canvas are skipped.
pub fn blit_extruded(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, extrude: u32) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    if sw == 0 || sh == 0 {
        return;
    }

    // main blit
    for yy in 0..sh {
        for xx in 0..sw {
            if dx + xx < cw && dy + yy < ch {
                canvas.put_pixel(dx + xx, dy + yy, *src.get_pixel(xx, yy));
            }
        }
    }

    let last_x = sw - 1;
    let last_y = sh - 1;
    for e in 1..=extrude {
        // top row
        if dy >= e {
            for xx in 0..sw {
                if dx + xx < cw && dy - e < ch {
                    canvas.put_pixel(dx + xx, dy - e, *src.get_pixel(xx, 0));
                }
            }
        }
        // bottom row
        if dy + last_y + e < ch {
            for xx in 0..sw {
                if dx + xx < cw {
                    canvas.put_pixel(dx + xx, dy + last_y + e, *src.get_pixel(xx, last_y));
                }
            }
        }
        // left col
        if dx >= e {
            for yy in 0..sh {
                if dx - e < cw && dy + yy < ch {
                    canvas.put_pixel(dx - e, dy + yy, *src.get_pixel(0, yy));
                }
            }
        }
        // right col
        if dx + last_x + e < cw {
            for yy in 0..sh {
                if dy + yy < ch {
                    canvas.put_pixel(dx + last_x + e, dy + yy, *src.get_pixel(last_x, yy));
                }
            }
        }
    }

    // corners
    let c00 = *src.get_pixel(0, 0);
    let c10 = *src.get_pixel(last_x, 0);
    let c01 = *src.get_pixel(0, last_y);
    let c11 = *src.get_pixel(last_x, last_y);
    for ex in 1..=extrude {
        for ey in 1..=extrude {
            let left = dx.checked_sub(ex).filter(|&x| x < cw);
            let top = dy.checked_sub(ey).filter(|&y| y < ch);
            let right = Some(dx + last_x + ex).filter(|&x| x < cw);
            let bottom = Some(dy + last_y + ey).filter(|&y| y < ch);
            if let (Some(x), Some(y)) = (left, top) {
                canvas.put_pixel(x, y, c00);
            }
            if let (Some(x), Some(y)) = (right, top) {
                canvas.put_pixel(x, y, c10);
            }
            if let (Some(x), Some(y)) = (left, bottom) {
                canvas.put_pixel(x, y, c01);
            }
            if let (Some(x), Some(y)) = (right, bottom) {
                canvas.put_pixel(x, y, c11);
            }
        }
    }
}
