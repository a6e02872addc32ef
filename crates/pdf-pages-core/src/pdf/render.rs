use image::{ImageEncoder, RgbaImage};
use mupdf::{Colorspace, Document as MuDocument, Matrix};
use tracing::debug;

use super::document;
use super::page_number::PageNumber;
use crate::error::{Error, Result};

/// Default scale factor for rendering (1.0 keeps the page's native size)
pub const DEFAULT_RENDER_SCALE: f32 = 1.0;

/// Turns a PDF byte buffer into one raster image per page, in page order.
///
/// Implementations fail as a whole: either every page is returned or the
/// file is rejected.
pub trait PageRasterizer: Send + Sync {
    fn rasterize(&self, pdf: &[u8]) -> Result<Vec<RgbaImage>>;
}

/// Rasterizer backed by mupdf
#[derive(Debug, Clone, Copy)]
pub struct MupdfRasterizer {
    /// Scale factor relative to the page's native size
    pub scale: f32,
}

impl Default for MupdfRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MupdfRasterizer {
    /// Create a rasterizer with default scale (1.0)
    pub const fn new() -> Self {
        Self {
            scale: DEFAULT_RENDER_SCALE,
        }
    }

    /// Create a rasterizer with custom scale
    pub const fn with_scale(scale: f32) -> Self {
        Self { scale }
    }

    /// Render one page from an opened mupdf handle to an RGBA image buffer
    fn render_page(&self, mu_doc: &MuDocument, page: PageNumber, total: usize) -> Result<RgbaImage> {
        let page_num = page.get() as usize;
        let render_err = |reason: String| Error::PdfRender {
            page: page_num,
            reason,
        };

        if page_num > total {
            return Err(Error::InvalidPage {
                page: page_num,
                total,
            });
        }

        let mu_page = mu_doc
            .load_page(page.to_mupdf_index()?)
            .map_err(|e| render_err(format!("Failed to load page: {e}")))?;

        let matrix = Matrix::new_scale(self.scale, self.scale);

        let pixmap = mu_page
            .to_pixmap(&matrix, &Colorspace::device_rgb(), 1.0, true)
            .map_err(|e| render_err(format!("Failed to render: {e}")))?;

        let n = pixmap.n() as usize; // components per pixel
        let width = pixmap.width();
        let height = pixmap.height();
        let rgba = to_rgba(pixmap.samples(), n).ok_or_else(|| {
            render_err(format!("Unexpected pixel format with {n} components"))
        })?;

        RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| render_err("Failed to create image buffer".to_string()))
    }
}

impl PageRasterizer for MupdfRasterizer {
    fn rasterize(&self, pdf: &[u8]) -> Result<Vec<RgbaImage>> {
        // One parse for the whole document; every page loads from this handle
        let (mu_doc, total) = document::parse(pdf)?;
        debug!("Rasterizing {} pages at scale {}", total, self.scale);

        (0..total)
            .map(|index| {
                let page = PageNumber::from_zero_based(index, total)?;
                self.render_page(&mu_doc, page, total)
            })
            .collect()
    }
}

/// Expand gray, RGB or RGBA samples to RGBA. `None` for other layouts.
fn to_rgba(samples: &[u8], components: usize) -> Option<Vec<u8>> {
    if !matches!(components, 1 | 3 | 4) {
        return None;
    }

    let mut rgba = Vec::with_capacity(samples.len() / components * 4);
    for chunk in samples.chunks_exact(components) {
        match *chunk {
            [g] => rgba.extend_from_slice(&[g, g, g, 255]),
            [r, g, b] => rgba.extend_from_slice(&[r, g, b, 255]),
            [r, g, b, a] => rgba.extend_from_slice(&[r, g, b, a]),
            _ => return None,
        }
    }
    Some(rgba)
}

/// Encode an image as PNG bytes
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut png_data = Vec::new();
    // Fast compression is still lossless and keeps large batches responsive
    let encoder = image::codecs::png::PngEncoder::new_with_quality(
        &mut png_data,
        image::codecs::png::CompressionType::Fast,
        image::codecs::png::FilterType::Adaptive,
    );

    encoder
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| Error::ImageEncode(e.to_string()))?;

    Ok(png_data)
}
