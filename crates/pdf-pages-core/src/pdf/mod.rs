mod document;
mod page_number;
mod render;

pub use document::PdfDocument;
pub use page_number::PageNumber;
pub use render::{DEFAULT_RENDER_SCALE, MupdfRasterizer, PageRasterizer, encode_png};
