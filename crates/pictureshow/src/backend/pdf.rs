//! PDF output backend built on lopdf
//!
//! The document is assembled in memory and only written to disk by
//! [`Backend::save`], so a run that never saves leaves no file behind.

use super::Backend;
use super::xobject::{create_image_xobject, create_jpeg_xobject, draw_command, jpeg_color_space};
use crate::types::*;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};

/// An input picture, ready to be embedded
#[derive(Debug, Clone)]
pub struct PdfPicture {
    data: PictureData,
}

#[derive(Debug, Clone)]
enum PictureData {
    /// Decoded pixels, stored with `FlateDecode`
    Decoded(DynamicImage),
    /// JPEG file contents, embedded as they are
    Jpeg {
        bytes: Vec<u8>,
        size: (u32, u32),
        color_space: &'static [u8],
    },
}

impl PdfPicture {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            data: PictureData::Decoded(image),
        }
    }

    /// Whether the picture is embedded without re-encoding
    pub fn is_passthrough(&self) -> bool {
        matches!(self.data, PictureData::Jpeg { .. })
    }
}

/// Content of the page being filled
#[derive(Default)]
struct PageContent {
    ops: Vec<String>,
    xobjects: Dictionary,
}

impl PageContent {
    fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Writes pictures to a PDF document.
pub struct PdfBackend {
    document: Document,
    pages_id: ObjectId,
    output: Option<PathBuf>,
    page_size: PageSize,
    bg_color: Option<Rgb>,
    page_refs: Vec<Object>,
    current: PageContent,
    image_count: usize,
}

impl Default for PdfBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBackend {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            output: None,
            page_size: PageSize::new(0.0, 0.0),
            bg_color: None,
            page_refs: Vec::new(),
            current: PageContent::default(),
            image_count: 0,
        }
    }

    /// Number of pages finished so far
    pub fn num_pages(&self) -> usize {
        self.page_refs.len()
    }

    /// Turn the current content into a page object.
    fn finish_page(&mut self) {
        let content = std::mem::take(&mut self.current);

        let content_id = self.document.add_object(Stream::new(
            Dictionary::new(),
            content.ops.concat().into_bytes(),
        ));

        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(content.xobjects));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(self.pages_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.page_size.width),
                Object::Real(self.page_size.height),
            ]),
        );
        page_dict.set("Resources", Object::Dictionary(resources));
        page_dict.set("Contents", Object::Reference(content_id));

        let page_id = self.document.add_object(page_dict);
        self.page_refs.push(Object::Reference(page_id));
        log::debug!("Finished page {}", self.page_refs.len());
    }

    fn background_command(&self, color: Rgb) -> String {
        let (r, g, b) = color.to_unit();
        format!(
            "q {r} {g} {b} rg 0 0 {} {} re f Q\n",
            self.page_size.width, self.page_size.height
        )
    }
}

impl Backend for PdfBackend {
    type Picture = PdfPicture;

    fn init(&mut self, output: &Path, page_size: PageSize, bg_color: Option<Rgb>) -> Result<()> {
        *self = Self::new();
        self.output = Some(output.to_owned());
        self.page_size = page_size;
        self.bg_color = bg_color;
        Ok(())
    }

    fn add_page(&mut self) -> Result<()> {
        self.finish_page();
        Ok(())
    }

    fn read_picture(&mut self, picture: &Path) -> std::result::Result<PdfPicture, ReadError> {
        if std::fs::metadata(picture)?.is_dir() {
            return Err(ReadError::Io(IoError::new(
                ErrorKind::IsADirectory,
                format!("is a directory: '{}'", picture.display()),
            )));
        }
        let reader = ImageReader::open(picture)?.with_guessed_format()?;
        let is_jpeg = reader.format() == Some(ImageFormat::Jpeg);
        let decoder = reader.into_decoder()?;

        // Gray and RGB JPEGs are passed through; CMYK and others are decoded
        if is_jpeg {
            let bytes = std::fs::read(picture)?;
            if let Some(color_space) = jpeg_color_space(&bytes) {
                return Ok(PdfPicture {
                    data: PictureData::Jpeg {
                        size: decoder.dimensions(),
                        bytes,
                        color_space,
                    },
                });
            }
        }
        Ok(PdfPicture::new(DynamicImage::from_decoder(decoder)?))
    }

    fn picture_size(&self, picture: &PdfPicture) -> (f32, f32) {
        match &picture.data {
            PictureData::Decoded(image) => (image.width() as f32, image.height() as f32),
            PictureData::Jpeg { size, .. } => (size.0 as f32, size.1 as f32),
        }
    }

    fn add_picture(
        &mut self,
        picture: PdfPicture,
        position: (f32, f32),
        size: (f32, f32),
    ) -> Result<()> {
        if self.current.is_empty() {
            if let Some(color) = self.bg_color {
                let fill = self.background_command(color);
                self.current.ops.push(fill);
            }
        }

        let xobject_id = match picture.data {
            PictureData::Decoded(image) => create_image_xobject(&mut self.document, &image)?,
            PictureData::Jpeg {
                bytes,
                size,
                color_space,
            } => create_jpeg_xobject(&mut self.document, bytes, size, color_space),
        };
        let name = format!("Im{}", self.image_count);
        self.image_count += 1;

        self.current
            .xobjects
            .set(name.as_bytes(), Object::Reference(xobject_id));
        self.current.ops.push(draw_command(&name, position, size));
        Ok(())
    }

    fn save(&mut self) -> Result<usize> {
        let output = self
            .output
            .clone()
            .ok_or_else(|| PictureShowError::Config("PDF backend not initialized".to_string()))?;

        if !self.current.is_empty() {
            self.finish_page();
        }

        // Create pages tree
        let count = self.page_refs.len();
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.page_refs.clone())),
            ("Count", Object::Integer(count as i64)),
        ]);
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        // Create catalog
        let catalog_id = self.document.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.document.trailer.set("Root", catalog_id);

        let mut writer = Vec::new();
        self.document.save_to(&mut writer)?;
        std::fs::write(&output, writer)?;

        log::info!("Wrote {} page(s) to '{}'", count, output.display());
        Ok(count)
    }
}
