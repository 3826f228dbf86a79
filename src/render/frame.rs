use image::{ImageBuffer, Rgb, RgbImage};

/// Landscape surface resolution (width, height)
pub const LANDSCAPE_RESOLUTION: (u32, u32) = (1280, 720);

/// Portrait surface resolution used for vertical short-form output
pub const PORTRAIT_RESOLUTION: (u32, u32) = (720, 1280);

/// Surface resolution for the requested orientation
pub fn surface_resolution(vertical: bool) -> (u32, u32) {
    if vertical {
        PORTRAIT_RESOLUTION
    } else {
        LANDSCAPE_RESOLUTION
    }
}

/// A single raster frame
///
/// This is a simple wrapper around an RGB image buffer. The compositor
/// mutates one frame per tick; the encoder reads it back as raw bytes.
#[derive(Clone, Debug)]
pub struct Frame {
    buffer: RgbImage,
}

impl Frame {
    /// Create a new frame from an RGB image buffer
    pub fn new(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    /// Create a new frame with the given dimensions filled with black
    pub fn new_black(width: u32, height: u32) -> Self {
        let buffer = ImageBuffer::new(width, height);
        Self { buffer }
    }

    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_fn(width, height, |_, _| Rgb(color));
        Self { buffer }
    }

    /// Get the width of the frame
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the height of the frame
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let pixel = self.buffer.get_pixel(x, y);
        [pixel[0], pixel[1], pixel[2]]
    }

    /// Set a pixel at the given coordinates
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        self.buffer.put_pixel(x, y, Rgb(color));
    }

    /// Reset every pixel to black
    pub fn fill_black(&mut self) {
        for pixel in self.buffer.pixels_mut() {
            *pixel = Rgb([0, 0, 0]);
        }
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    /// Raw interleaved RGB bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// Copy another frame of identical dimensions over this one
    pub fn copy_from(&mut self, other: &Frame) {
        if self.width() == other.width() && self.height() == other.height() {
            let dst: &mut [u8] = &mut self.buffer;
            dst.copy_from_slice(other.as_raw());
        } else {
            self.blit(other.as_image(), 0, 0);
        }
    }

    /// Draw `src` with its top-left corner at (x, y), clipping to the frame.
    ///
    /// Negative offsets are legal; the overflowing parts of `src` are cropped.
    pub fn blit(&mut self, src: &RgbImage, x: i64, y: i64) {
        let dst_w = self.width() as i64;
        let dst_h = self.height() as i64;
        let src_w = src.width() as i64;
        let src_h = src.height() as i64;

        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + src_w).min(dst_w);
        let y1 = (y + src_h).min(dst_h);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let src_raw = src.as_raw();
        let dst_raw: &mut [u8] = &mut self.buffer;
        let row_len = ((x1 - x0) * 3) as usize;

        for dy in y0..y1 {
            let sy = dy - y;
            let src_off = ((sy * src_w + (x0 - x)) * 3) as usize;
            let dst_off = ((dy * dst_w + x0) * 3) as usize;
            dst_raw[dst_off..dst_off + row_len]
                .copy_from_slice(&src_raw[src_off..src_off + row_len]);
        }
    }
}
