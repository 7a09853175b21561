//! The rendered plane raster.

use crate::foundation::error::{LumiplaneError, LumiplaneResult};

/// Band layout of a rendered plane.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Bands {
    /// Single 8-bit band.
    Grey(Vec<u8>),
    /// Planar 8-bit RGB.
    Rgb {
        r: Vec<u8>,
        g: Vec<u8>,
        b: Vec<u8>,
    },
}

/// A rendered 2D plane: row-major 8-bit samples in one grey band or three
/// planar RGB bands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaneImage {
    width: u32,
    height: u32,
    bands: Bands,
}

impl PlaneImage {
    /// A zeroed single-band image.
    pub fn new_grey(width: u32, height: u32) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            bands: Bands::Grey(vec![0; n]),
        }
    }

    /// A zeroed three-band image.
    pub fn new_rgb(width: u32, height: u32) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            bands: Bands::Rgb {
                r: vec![0; n],
                g: vec![0; n],
                b: vec![0; n],
            },
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bands (1 grey, 3 RGB).
    pub fn band_count(&self) -> usize {
        match self.bands {
            Bands::Grey(_) => 1,
            Bands::Rgb { .. } => 3,
        }
    }

    /// Total payload size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.width as usize * self.height as usize * self.band_count()
    }

    /// The grey band, if this is a single-band image.
    pub fn grey(&self) -> Option<&[u8]> {
        match &self.bands {
            Bands::Grey(data) => Some(data),
            Bands::Rgb { .. } => None,
        }
    }

    /// The three RGB bands, if this is a three-band image.
    pub fn rgb(&self) -> Option<(&[u8], &[u8], &[u8])> {
        match &self.bands {
            Bands::Grey(_) => None,
            Bands::Rgb { r, g, b } => Some((r, g, b)),
        }
    }

    pub(crate) fn grey_mut(&mut self) -> &mut [u8] {
        match &mut self.bands {
            Bands::Grey(data) => data,
            Bands::Rgb { .. } => unreachable!("grey_mut on an RGB image"),
        }
    }

    pub(crate) fn rgb_mut(&mut self) -> (&mut [u8], &mut [u8], &mut [u8]) {
        match &mut self.bands {
            Bands::Grey(_) => unreachable!("rgb_mut on a grey image"),
            Bands::Rgb { r, g, b } => (r, g, b),
        }
    }

    /// Convert into an [`image`] buffer (luma or interleaved RGB).
    pub fn to_image(&self) -> LumiplaneResult<image::DynamicImage> {
        match &self.bands {
            Bands::Grey(data) => {
                let buf = image::GrayImage::from_raw(self.width, self.height, data.clone())
                    .ok_or_else(|| {
                        LumiplaneError::rendering("grey band does not match image dimensions")
                    })?;
                Ok(image::DynamicImage::ImageLuma8(buf))
            }
            Bands::Rgb { r, g, b } => {
                let n = self.width as usize * self.height as usize;
                let mut interleaved = Vec::with_capacity(n * 3);
                for i in 0..n {
                    interleaved.push(r[i]);
                    interleaved.push(g[i]);
                    interleaved.push(b[i]);
                }
                let buf = image::RgbImage::from_raw(self.width, self.height, interleaved)
                    .ok_or_else(|| {
                        LumiplaneError::rendering("rgb bands do not match image dimensions")
                    })?;
                Ok(image::DynamicImage::ImageRgb8(buf))
            }
        }
    }
}
