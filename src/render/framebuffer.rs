use crate::render::color::Color;

/// Write access to a presentation surface.
///
/// The casters and compositor only ever touch pixels through this trait, so
/// any surface that can set and read a pixel by coordinate can be a frame
/// sink. Out-of-range coordinates must be ignored on write.
pub trait PixelWriter {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);
    fn get_pixel(&self, x: u32, y: u32) -> Color;

    /// Fills rows `y0..y1` with one colour.
    fn fill_rows(&mut self, y0: u32, y1: u32, color: Color) {
        let w = self.width();
        for y in y0..y1.min(self.height()) {
            for x in 0..w {
                self.set_pixel(x, y, color);
            }
        }
    }
}

/// CPU-side RGBA framebuffer.
#[derive(Clone, Debug)]
pub struct Framebuffer {
    pub color_buffer: Vec<Color>,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        let bg = Color::BLACK;
        Self {
            color_buffer: vec![bg; size],
            width,
            height,
            background_color: bg,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.color_buffer.fill(self.background_color);
    }

    #[inline]
    pub fn set_background_color(&mut self, c: Color) {
        self.background_color = c;
    }

    /// Pixels of column `x`, top to bottom.
    pub fn column(&self, x: u32) -> Vec<Color> {
        (0..self.height).map(|y| self.get_pixel(x, y)).collect()
    }

    /// Tightly packed RGBA8 bytes, row-major.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.color_buffer.iter().flat_map(|c| c.to_array()).collect()
    }
}

impl PixelWriter for Framebuffer {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.color_buffer[(y * self.width + x) as usize] = color;
        }
    }

    #[inline]
    fn get_pixel(&self, x: u32, y: u32) -> Color {
        if x < self.width && y < self.height {
            return self.color_buffer[(y * self.width + x) as usize];
        }
        self.background_color
    }
}
