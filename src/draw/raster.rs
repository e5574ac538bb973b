//! Composited frame data handed to display surfaces and the exporter.

use cairo::ImageSurface;

use super::color::Color;

/// A composited RGBA frame.
///
/// Rows are tightly packed (no stride padding), one `[r, g, b, a]` group
/// per pixel with straight (non-premultiplied) alpha. This is the exchange
/// format between the renderer, display surfaces, and the image exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Copies the contents of a finished cairo surface.
    ///
    /// Cairo stores ARGB32 as one native-endian word per pixel with
    /// premultiplied alpha; this converts back to straight RGBA bytes.
    pub fn from_surface(surface: &mut ImageSurface) -> Result<Self, cairo::BorrowError> {
        surface.flush();
        let width = surface.width().max(0) as u32;
        let height = surface.height().max(0) as u32;
        let stride = surface.stride().max(0) as usize;

        let data = surface.data()?;
        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height as usize {
            let row = &data[y * stride..y * stride + width as usize * 4];
            for px in row.chunks_exact(4) {
                let word = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
                rgba.extend_from_slice(&unpremultiply(word));
            }
        }

        Ok(Self {
            width,
            height,
            data: rgba,
        })
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Reads the color at (x, y), or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.data[i..i + 4];
        Some(Color::from_rgba8(px[0], px[1], px[2], px[3]))
    }

    /// Flattens to opaque RGB bytes, dropping the alpha channel.
    ///
    /// Exported frames are rendered over an opaque background, so the alpha
    /// being discarded here is uniformly 255.
    pub fn rgb_bytes(&self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }
}

fn unpremultiply(word: u32) -> [u8; 4] {
    let a = (word >> 24) & 0xff;
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u32| (((c * 255) + a / 2) / a).min(255) as u8;
    let r = (word >> 16) & 0xff;
    let g = (word >> 8) & 0xff;
    let b = word & 0xff;
    [un(r), un(g), un(b), a as u8]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairo::{Context, Format};

    fn solid_surface(r: f64, g: f64, b: f64, a: f64) -> ImageSurface {
        let surface = ImageSurface::create(Format::ARgb32, 4, 3).unwrap();
        {
            let ctx = Context::new(&surface).unwrap();
            ctx.set_source_rgba(r, g, b, a);
            ctx.set_operator(cairo::Operator::Source);
            ctx.paint().unwrap();
        }
        surface
    }

    #[test]
    fn opaque_surface_round_trips() {
        let mut surface = solid_surface(1.0, 0.0, 0.0, 1.0);
        let raster = Raster::from_surface(&mut surface).unwrap();
        assert_eq!(raster.width(), 4);
        assert_eq!(raster.height(), 3);
        assert_eq!(raster.pixel(0, 0).unwrap().to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(raster.pixel(3, 2).unwrap().to_rgba8(), [255, 0, 0, 255]);
        assert!(raster.pixel(4, 0).is_none());
    }

    #[test]
    fn translucent_surface_unpremultiplies() {
        let mut surface = solid_surface(1.0, 0.0, 0.0, 0.5);
        let raster = Raster::from_surface(&mut surface).unwrap();
        let [r, _, _, a] = raster.pixel(1, 1).unwrap().to_rgba8();
        // premultiplied 50% red stores ~127 in both channels; the straight
        // red channel must come back near full
        assert!(a >= 127 && a <= 128, "alpha was {a}");
        assert!(r >= 253, "red was {r}");
    }

    #[test]
    fn rgb_bytes_drop_alpha() {
        let mut surface = solid_surface(0.0, 1.0, 0.0, 1.0);
        let raster = Raster::from_surface(&mut surface).unwrap();
        let rgb = raster.rgb_bytes();
        assert_eq!(rgb.len(), 4 * 3 * 3);
        assert_eq!(&rgb[0..3], &[0, 255, 0]);
    }
}
