//! Image XObject creation
//!
//! Turns a decoded picture into a PDF Image XObject that pages can draw with
//! the `Do` operator.

use crate::types::Result;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::DynamicImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;

// =============================================================================
// XObject Creation
// =============================================================================

/// Add a picture to the document as an Image XObject.
///
/// Pixels are stored as 8-bit `DeviceRGB` with `FlateDecode`. Pictures with an
/// alpha channel get a `DeviceGray` soft mask so transparent areas show the
/// page background.
///
/// # Arguments
/// * `output` - The document to add the XObject to
/// * `picture` - The decoded picture
pub fn create_image_xobject(output: &mut Document, picture: &DynamicImage) -> Result<ObjectId> {
    let (width, height) = (picture.width(), picture.height());

    let mut dict = image_dict(width, height, b"DeviceRGB", b"FlateDecode");
    if picture.color().has_alpha() {
        let alpha: Vec<u8> = picture.to_rgba8().pixels().map(|p| p[3]).collect();
        let smask = Stream::new(
            image_dict(width, height, b"DeviceGray", b"FlateDecode"),
            deflate(&alpha)?,
        );
        dict.set("SMask", Object::Reference(output.add_object(smask)));
    }

    let rgb = picture.to_rgb8();
    Ok(output.add_object(Stream::new(dict, deflate(rgb.as_raw())?)))
}

/// Add JPEG file contents to the document as a `DCTDecode` Image XObject,
/// unchanged.
pub fn create_jpeg_xobject(
    output: &mut Document,
    data: Vec<u8>,
    (width, height): (u32, u32),
    color_space: &[u8],
) -> ObjectId {
    let dict = image_dict(width, height, color_space, b"DCTDecode");
    output.add_object(Stream::new(dict, data).with_compression(false))
}

/// PDF color space of 8-bit JPEG data with 1 (gray) or 3 (RGB) components.
///
/// Reads the component count from the first start-of-frame segment. Returns
/// `None` for CMYK, other bit depths, or data without a frame header.
pub(crate) fn jpeg_color_space(data: &[u8]) -> Option<&'static [u8]> {
    let mut i = 2;
    while i + 9 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];

        // SOF0..SOF15, except DHT (C4), JPG (C8) and DAC (CC)
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            let precision = data[i + 4];
            return match (precision, data[i + 9]) {
                (8, 1) => Some(&b"DeviceGray"[..]),
                (8, 3) => Some(&b"DeviceRGB"[..]),
                _ => None,
            };
        }

        let length = usize::from(u16::from_be_bytes([data[i + 2], data[i + 3]]));
        if length < 2 {
            return None;
        }
        i += 2 + length;
    }
    None
}

fn image_dict(width: u32, height: u32, color_space: &[u8], filter: &[u8]) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(i64::from(width)));
    dict.set("Height", Object::Integer(i64::from(height)));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(filter.to_vec()));
    dict
}

fn deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Content stream command drawing XObject `name` at `position` with `size`.
///
/// Image XObjects occupy the unit square, so the matrix scales it to the
/// target size and moves it to the target position.
pub(crate) fn draw_command(name: &str, position: (f32, f32), size: (f32, f32)) -> String {
    let ((x, y), (width, height)) = (position, size);
    format!("q {width} 0 0 {height} {x} {y} cm /{name} Do Q\n")
}
