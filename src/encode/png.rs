use std::io::Cursor;

use crate::foundation::error::{TickdownError, TickdownResult};
use crate::render::backend::FrameRGBA;

/// Encode a frame as PNG bytes.
pub fn encode_png(frame: &FrameRGBA) -> TickdownResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| {
            TickdownError::validation(format!(
                "frame buffer does not match {}x{} rgba8",
                frame.width, frame.height
            ))
        })?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| TickdownError::encoding(format!("png encode failed: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
