//! Lay a captured bitmap out across pages and encode the PDF

use crate::error::{ExportError, Result};
use crate::geometry::PageGeometry;
use crate::options::{ExportOptions, PaginationMode};
use crate::raster::{RasterImage, Rgb};
use pdf_model::{mm_to_pt, DocumentInfo, ImageXObject, MediaBox, PdfDocument, PdfPage};

/// Encode `bitmap` as a paginated PDF laid out by `geometry`
pub fn render_document(
    bitmap: &RasterImage,
    geometry: &PageGeometry,
    options: &ExportOptions,
) -> Result<Vec<u8>> {
    let mut info = DocumentInfo::new().created_now();
    info.title = options.title.clone();
    info.author = options.author.clone();
    info.subject = options.subject.clone();

    let mut doc = PdfDocument::new(info).with_compression(options.compress);
    let media_box = MediaBox::from_mm(geometry.page_width_mm, geometry.page_height_mm);

    match options.pagination {
        PaginationMode::ShiftedOffset => {
            let image = doc.add_image(encode_image(bitmap)?);
            for index in 0..geometry.page_count {
                let mut page = blank_page(media_box);
                page.draw_image(
                    image,
                    mm_to_pt(geometry.margin_mm),
                    mm_to_pt(geometry.image_offset_mm(index)),
                    mm_to_pt(geometry.image_width_mm),
                    mm_to_pt(geometry.image_height_mm),
                );
                doc.add_page(page)?;
            }
        }
        PaginationMode::Sliced => {
            let px_per_mm = geometry.pixels_per_mm();
            for index in 0..geometry.page_count {
                let (start, end) = geometry.slice_rows(index);
                let slice = bitmap.crop_rows(start, end).map_err(|e| {
                    ExportError::EncodingFailed(pdf_model::PdfError::InvalidImage(e.to_string()))
                })?;
                let image = doc.add_image(encode_image(&slice)?);

                let mut page = blank_page(media_box);
                page.draw_image(
                    image,
                    mm_to_pt(geometry.margin_mm),
                    mm_to_pt(geometry.margin_mm),
                    mm_to_pt(geometry.image_width_mm),
                    mm_to_pt(slice.height() as f64 / px_per_mm),
                );
                doc.add_page(page)?;
            }
        }
    }

    Ok(doc.to_bytes()?)
}

fn encode_image(bitmap: &RasterImage) -> Result<ImageXObject> {
    let samples = bitmap.flatten_rgb(Rgb::WHITE);
    Ok(ImageXObject::from_rgb(samples, bitmap.width(), bitmap.height())?)
}

fn blank_page(media_box: MediaBox) -> PdfPage {
    let mut page = PdfPage::new(media_box);
    page.fill_background(1.0, 1.0, 1.0);
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uncompressed() -> ExportOptions {
        ExportOptions::default().with_compression(false)
    }

    fn render(width: u32, height: u32, options: &ExportOptions) -> String {
        let bitmap = RasterImage::solid(width, height, Rgb::new(20, 40, 60)).unwrap();
        let geometry = PageGeometry::compute(width, height, options).unwrap();
        let bytes = render_document(&bitmap, &geometry, options).unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn test_shifted_offset_shares_one_image() {
        let pdf = render(210, 700, &uncompressed());
        assert!(pdf.contains("/Count 3"));
        assert_eq!(pdf.matches("/Subtype /Image").count(), 1);
        assert_eq!(pdf.matches("/Im0 Do").count(), 3);
    }

    #[test]
    fn test_shifted_offsets_move_up_one_page_each() {
        let options = uncompressed();
        let pdf = render(190, 831, &options);

        // Image is 190 x 831 mm; page 0 top at 10mm, page i at 10 - 277i.
        let page_h = mm_to_pt(297.0);
        let image_h = mm_to_pt(831.0);
        for i in 0..3 {
            let top = mm_to_pt(10.0 - 277.0 * i as f64);
            let y = page_h - top - image_h;
            let expected = format!("{:.4}", y);
            let expected = expected.trim_end_matches('0').trim_end_matches('.');
            assert!(pdf.contains(&format!(" {} cm", expected)), "page {} offset {}", i, expected);
        }
    }

    #[test]
    fn test_sliced_mode_one_image_per_page() {
        let options = uncompressed().with_pagination(PaginationMode::Sliced);
        let pdf = render(210, 700, &options);
        assert!(pdf.contains("/Count 3"));
        assert_eq!(pdf.matches("/Subtype /Image").count(), 3);
        assert!(pdf.contains("/Im2 Do"));
    }

    #[test]
    fn test_metadata_written() {
        let options = uncompressed().with_title("Invoice-1042").with_author("Service Desk");
        let pdf = render(100, 100, &options);
        assert!(pdf.contains("(Invoice-1042)"));
        assert!(pdf.contains("(Service Desk)"));
        assert!(pdf.contains("/CreationDate"));
    }

    #[test]
    fn test_page_size_in_points() {
        let pdf = render(100, 100, &uncompressed());
        assert!(pdf.contains("/MediaBox [0 0 595.2756 841.8898]"));
    }
}
