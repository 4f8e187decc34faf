// SPDX-License-Identifier: GPL-3.0-only
//! Pixel format conversion to RGBA
//!
//! Every source format is normalized to tightly packed RGBA before it enters
//! the photo pipeline.

/// Convert YUYV (YUV 4:2:2) to RGBA
///
/// YUYV format: Y0 U0 Y1 V0 - each 4-byte group encodes 2 pixels.
/// Uses BT.601 coefficients for YUV to RGB conversion. Rows may be padded;
/// `stride` is the row length in bytes.
pub fn yuyv_to_rgba(data: &[u8], width: u32, height: u32, stride: u32) -> Vec<u8> {
    let w = width as usize;
    let h = height as usize;
    let stride = (stride as usize).max(w * 2);
    let mut rgba = Vec::with_capacity(w * h * 4);

    for row in data.chunks(stride).take(h) {
        let mut written = 0;
        for chunk in row.chunks_exact(4) {
            let y0 = chunk[0] as f32;
            let u = chunk[1] as f32 - 128.0;
            let y1 = chunk[2] as f32;
            let v = chunk[3] as f32 - 128.0;

            for y in [y0, y1] {
                if written == w {
                    break;
                }
                let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
                let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
                let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;

                rgba.extend_from_slice(&[r, g, b, 255]);
                written += 1;
            }
        }
    }

    rgba
}

/// Convert RGB to RGBA by adding alpha=255, honouring row stride
pub fn rgb_to_rgba(rgb: &[u8], width: u32, height: u32, stride: u32) -> Vec<u8> {
    let w = width as usize;
    let stride = (stride as usize).max(w * 3);
    let mut rgba = Vec::with_capacity(w * height as usize * 4);
    for row in rgb.chunks(stride).take(height as usize) {
        for chunk in row.chunks_exact(3).take(w) {
            rgba.extend_from_slice(&[chunk[0], chunk[1], chunk[2], 255]);
        }
    }
    rgba
}

/// Drop row padding from RGBA data
pub fn repack_rgba(data: &[u8], width: u32, height: u32, stride: u32) -> Vec<u8> {
    let row_len = width as usize * 4;
    let stride = (stride as usize).max(row_len);
    if stride == row_len {
        return data[..data.len().min(row_len * height as usize)].to_vec();
    }
    data.chunks(stride)
        .take(height as usize)
        .flat_map(|row| &row[..row.len().min(row_len)])
        .copied()
        .collect()
}
