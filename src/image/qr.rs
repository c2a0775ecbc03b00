//! QR code rasterization. The result is an ordinary [`DecodedImage`] that
//! the image element places like any other raster.

use qrcode::QrCode;

use crate::error::ResourceError;

use super::DecodedImage;

/// Light modules around the symbol, as the QR standard requires.
const QUIET_ZONE: usize = 4;

/// Rasterize `data` as a black-on-white QR code with `module_px` pixels per
/// module.
pub fn qr_code(data: &str, module_px: u32) -> Result<DecodedImage, ResourceError> {
    if module_px == 0 {
        return Err(ResourceError::Image("QR module size must be positive".to_string()));
    }
    let code = QrCode::new(data.as_bytes())
        .map_err(|e| ResourceError::Image(format!("QR encoding failed: {}", e)))?;
    let modules = code.width();
    let colors = code.to_colors();

    let side_modules = modules + 2 * QUIET_ZONE;
    let px = module_px as usize;
    let side = side_modules * px;
    let mut rgb = vec![255u8; side * side * 3];

    for (i, color) in colors.iter().enumerate() {
        if *color != qrcode::Color::Dark {
            continue;
        }
        let mx = i % modules + QUIET_ZONE;
        let my = i / modules + QUIET_ZONE;
        for dy in 0..px {
            let row = (my * px + dy) * side;
            for dx in 0..px {
                let offset = (row + mx * px + dx) * 3;
                rgb[offset..offset + 3].fill(0);
            }
        }
    }

    log::trace!("rasterized QR code: {} modules, {}px", modules, side);
    DecodedImage::from_rgb(side as u32, side as u32, rgb, None)
}
