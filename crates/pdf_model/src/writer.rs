//! PDF writer
//!
//! Low-level file emission (header, numbered objects, cross-reference
//! table, trailer) and the append-only [`PdfDocument`] built on top of it.

use crate::document::{create_catalog, create_pages, DocumentInfo, ImageHandle, PdfPage, PdfVersion};
use crate::images::ImageXObject;
use crate::objects::{PdfDictionary, PdfObject, PdfSerializer, PdfStream};
use std::io::{self, Write};
use thiserror::Error;

/// Error type for PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Invalid document structure
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// Image samples that cannot be embedded
    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Emits objects and tracks their byte offsets for the xref table
pub struct PdfWriter<W: Write> {
    writer: W,
    position: u64,
    /// (object number, byte offset)
    offsets: Vec<(u32, u64)>,
    next_obj_num: u32,
    version: PdfVersion,
    compress: bool,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W, version: PdfVersion) -> Self {
        Self {
            writer,
            position: 0,
            offsets: Vec::new(),
            next_obj_num: 1,
            version,
            compress: true,
        }
    }

    pub fn set_compression(&mut self, compress: bool) {
        self.compress = compress;
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Reserve the next object number
    pub fn allocate_object(&mut self) -> u32 {
        let num = self.next_obj_num;
        self.next_obj_num += 1;
        num
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.write_str(&format!("%PDF-{}\n", self.version.as_str()))?;
        // Binary marker so transfer tools treat the file as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])
    }

    /// Write an indirect object
    pub fn write_object(&mut self, obj_num: u32, object: &PdfObject) -> Result<()> {
        self.offsets.push((obj_num, self.position));
        self.write_str(&format!("{} 0 obj\n", obj_num))?;

        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(object)?;
        self.write_bytes(&serializer.into_inner())?;

        self.write_str("\nendobj\n")
    }

    /// Write a stream object, compressing it first when enabled
    pub fn write_stream_object(&mut self, obj_num: u32, mut stream: PdfStream) -> Result<()> {
        if self.compress && !stream.compressed {
            stream = compress_stream(stream)?;
        }
        stream.dict.insert("Length", stream.data.len() as i64);
        self.write_object(obj_num, &PdfObject::Stream(stream))
    }

    /// Write the cross-reference table, trailer and end-of-file marker
    pub fn write_xref_and_trailer(&mut self, catalog_ref: u32, info_ref: Option<u32>) -> Result<()> {
        let xref_offset = self.position;

        let mut entries = std::mem::take(&mut self.offsets);
        entries.sort_by_key(|&(num, _)| num);

        self.write_str("xref\n")?;
        self.write_str(&format!("0 {}\n", self.next_obj_num))?;
        self.write_str("0000000000 65535 f \n")?;

        let mut expected = 1u32;
        for &(obj_num, offset) in &entries {
            while expected < obj_num {
                self.write_str("0000000000 65535 f \n")?;
                expected += 1;
            }
            self.write_str(&format!("{:010} 00000 n \n", offset))?;
            expected = obj_num + 1;
        }
        self.offsets = entries;

        let mut trailer = PdfDictionary::new();
        trailer.insert("Size", self.next_obj_num);
        trailer.insert("Root", PdfObject::Reference(catalog_ref));
        if let Some(info) = info_ref {
            trailer.insert("Info", PdfObject::Reference(info));
        }

        self.write_str("trailer\n")?;
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(&trailer.into())?;
        self.write_bytes(&serializer.into_inner())?;
        self.write_str(&format!("\nstartxref\n{}\n%%EOF\n", xref_offset))
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn compress_stream(mut stream: PdfStream) -> Result<PdfStream> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&stream.data)?;
    stream.data = encoder.finish()?;
    stream.compressed = true;
    stream.dict.insert("Filter", PdfObject::name("FlateDecode"));
    Ok(stream)
}

/// Append-only multi-page document
///
/// Images are registered once and may be drawn on any number of pages;
/// each registered image is written as a single XObject shared by every
/// page that references it.
#[derive(Debug)]
pub struct PdfDocument {
    info: DocumentInfo,
    version: PdfVersion,
    compress: bool,
    images: Vec<ImageXObject>,
    pages: Vec<PdfPage>,
}

impl PdfDocument {
    pub fn new(info: DocumentInfo) -> Self {
        Self {
            info,
            version: PdfVersion::default(),
            compress: true,
            images: Vec::new(),
            pages: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: PdfVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Register an image and return the handle pages draw it with
    pub fn add_image(&mut self, image: ImageXObject) -> ImageHandle {
        self.images.push(image);
        ImageHandle(self.images.len() - 1)
    }

    /// Append a page after the current last page
    pub fn add_page(&mut self, page: PdfPage) -> Result<()> {
        if let Some(missing) = page.images().find(|handle| handle.0 >= self.images.len()) {
            return Err(PdfError::InvalidDocument(format!(
                "page {} draws unregistered image {}",
                self.pages.len(),
                missing.resource_name()
            )));
        }
        self.pages.push(page);
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Finalize the document into `writer`
    pub fn write<W: Write>(self, writer: W) -> Result<W> {
        if self.pages.is_empty() {
            return Err(PdfError::InvalidDocument("No pages to export".to_string()));
        }
        tracing::debug!(
            pages = self.pages.len(),
            images = self.images.len(),
            compress = self.compress,
            "writing PDF document"
        );

        let mut pdf = PdfWriter::new(writer, self.version);
        pdf.set_compression(self.compress);
        pdf.write_header()?;

        let catalog_ref = pdf.allocate_object();
        let pages_ref = pdf.allocate_object();
        let info_ref = pdf.allocate_object();
        let image_refs: Vec<u32> = self.images.iter().map(|_| pdf.allocate_object()).collect();
        let page_refs: Vec<u32> = self.pages.iter().map(|_| pdf.allocate_object()).collect();
        let content_refs: Vec<u32> = self.pages.iter().map(|_| pdf.allocate_object()).collect();

        pdf.write_object(catalog_ref, &create_catalog(pages_ref).into())?;
        pdf.write_object(pages_ref, &create_pages(&page_refs).into())?;
        pdf.write_object(info_ref, &self.info.to_dictionary().into())?;

        for (image, &image_ref) in self.images.into_iter().zip(&image_refs) {
            pdf.write_stream_object(image_ref, image.into_stream())?;
        }

        for (i, page) in self.pages.into_iter().enumerate() {
            let (media_box, content, images) = page.into_parts();
            pdf.write_stream_object(content_refs[i], PdfStream::new(content.into_bytes()))?;

            let mut resources = PdfDictionary::new();
            if !images.is_empty() {
                let mut xobjects = PdfDictionary::new();
                for handle in &images {
                    xobjects.insert(handle.resource_name(), PdfObject::Reference(image_refs[handle.0]));
                }
                resources.insert("XObject", xobjects);
            }
            resources.insert(
                "ProcSet",
                PdfObject::Array(vec![
                    PdfObject::name("PDF"),
                    PdfObject::name("ImageB"),
                    PdfObject::name("ImageC"),
                ]),
            );

            let mut page_dict = PdfDictionary::typed("Page");
            page_dict.insert("Parent", PdfObject::Reference(pages_ref));
            page_dict.insert("MediaBox", media_box.to_array());
            page_dict.insert("Contents", PdfObject::Reference(content_refs[i]));
            page_dict.insert("Resources", resources);
            pdf.write_object(page_refs[i], &page_dict.into())?;
        }

        pdf.write_xref_and_trailer(catalog_ref, Some(info_ref))?;
        pdf.finish()
    }

    /// Finalize the document into an in-memory buffer
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        self.write(Vec::new())
    }
}
