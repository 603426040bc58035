use crate::foundation::error::TickdownResult;
use crate::projection::view::FrameView;

/// A rendered frame as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Opaque frame filled with one color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

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
}

/// The surface a frame is drawn onto before capture.
///
/// `scale` is the pixel-density multiplier: the output is `canvas.width * scale` by
/// `canvas.height * scale`. Selection outlines are editor chrome and are never drawn.
pub trait RenderSurface {
    fn render(&mut self, view: &FrameView, scale: u32) -> TickdownResult<FrameRGBA>;
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn render(&mut self, view: &FrameView, scale: u32) -> TickdownResult<FrameRGBA> {
        (**self).render(view, scale)
    }
}
