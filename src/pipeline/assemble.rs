//! Page assembly: turn the ordered, normalized image sequence into one PDF.
//!
//! printpdf 0.8 uses a data-oriented API: documents are built by
//! constructing `PdfPage` structs containing `Vec<Op>` operation lists, then
//! serialised via `PdfDocument::save()` into bytes.
//!
//! Each image becomes exactly one page, in the given order. The page is
//! sized to the image itself at the configured DPI (`px / dpi` inches per
//! axis), so the image fills it edge to edge at scale 1.0 — the same layout
//! the reference produced. The DPI is a document-wide constant; source
//! resolution metadata is never consulted.

use crate::error::Img2PdfError;
use image::RgbImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info};

/// Assemble one page-per-image PDF and serialise it to bytes.
///
/// Consumes the images so each pixel buffer is handed to the document
/// without copying. Fails with [`Img2PdfError::EmptyDocument`] on an empty
/// sequence — a zero-page PDF is not a meaningful artifact.
pub fn assemble(images: Vec<RgbImage>, dpi: u32, title: &str) -> Result<Vec<u8>, Img2PdfError> {
    if images.is_empty() {
        return Err(Img2PdfError::EmptyDocument);
    }

    info!("assembling {} page(s) at {} DPI", images.len(), dpi);

    let mut doc = PdfDocument::new(title);
    let mut pages: Vec<PdfPage> = Vec::with_capacity(images.len());

    for img in images {
        let width = img.width() as usize;
        let height = img.height() as usize;

        let raw = RawImage {
            pixels: RawImageData::U8(img.into_raw()),
            width,
            height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = doc.add_image(&raw);

        // px / dpi inches per axis, edge to edge.
        let page_w = Mm(width as f32 / dpi as f32 * 25.4);
        let page_h = Mm(height as f32 / dpi as f32 * 25.4);

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(1.0),
                scale_y: Some(1.0),
                dpi: Some(dpi as f32),
                rotate: None,
            },
        }];

        debug!(
            "page {}: {}x{} px → {:.1}x{:.1} mm",
            pages.len() + 1,
            width,
            height,
            page_w.0,
            page_h.0
        );

        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    doc.with_pages(pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    for w in &warnings {
        tracing::warn!("pdf serialisation warning: {:?}", w);
    }

    Ok(bytes)
}
