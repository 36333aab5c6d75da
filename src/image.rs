// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{BitmapFormat, GlyphBitmap};

/// A decoded bitmap glyph.
///
/// Unpremultiplied RGBA color type is used.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Image {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Image {
    /// Returns the image width.
    ///
    /// Never zero.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height.
    ///
    /// Never zero.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image content as RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Decodes an embedded bitmap glyph.
pub(crate) fn decode(bitmap: &GlyphBitmap) -> Option<Image> {
    let img = match bitmap.format {
        BitmapFormat::Png => read_png(&bitmap.data),
        BitmapFormat::Jpeg => read_jpeg(&bitmap.data),
        BitmapFormat::Other => {
            log::warn!("Unsupported bitmap glyph format.");
            None
        }
    }?;

    if img.width == 0 || img.height == 0 {
        return None;
    }

    Some(img)
}

#[cfg(feature = "raster-images")]
fn read_png(data: &[u8]) -> Option<Image> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info().ok()?;

    let mut img_data = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut img_data).ok()?;
    img_data.truncate(info.buffer_size());

    let data = match info.color_type {
        png::ColorType::Rgb => from_rgb(&img_data),
        png::ColorType::Rgba => img_data,
        png::ColorType::Grayscale => from_gray(&img_data),
        png::ColorType::GrayscaleAlpha => {
            let mut rgba_data = Vec::with_capacity(img_data.len() * 2);
            for slice in img_data.chunks(2) {
                let gray = slice[0];
                let alpha = slice[1];
                rgba_data.extend_from_slice(&[gray, gray, gray, alpha]);
            }

            rgba_data
        }
        png::ColorType::Indexed => {
            log::warn!("Indexed PNG is not supported.");
            return None;
        }
    };

    Some(Image {
        data,
        width: info.width,
        height: info.height,
    })
}

#[cfg(feature = "raster-images")]
fn read_jpeg(data: &[u8]) -> Option<Image> {
    let mut decoder = jpeg_decoder::Decoder::new(data);
    let img_data = decoder.decode().ok()?;
    let info = decoder.info()?;

    let data = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => from_rgb(&img_data),
        jpeg_decoder::PixelFormat::L8 => from_gray(&img_data),
        _ => {
            log::warn!("{:?} JPEG is not supported.", info.pixel_format);
            return None;
        }
    };

    Some(Image {
        data,
        width: u32::from(info.width),
        height: u32::from(info.height),
    })
}

#[cfg(not(feature = "raster-images"))]
fn read_png(_: &[u8]) -> Option<Image> {
    log::warn!("Bitmap glyphs are not supported without the 'raster-images' feature.");
    None
}

#[cfg(not(feature = "raster-images"))]
fn read_jpeg(_: &[u8]) -> Option<Image> {
    log::warn!("Bitmap glyphs are not supported without the 'raster-images' feature.");
    None
}

#[cfg(feature = "raster-images")]
fn from_rgb(data: &[u8]) -> Vec<u8> {
    let mut rgba_data = Vec::with_capacity(data.len() / 3 * 4);
    for rgb in data.chunks(3) {
        rgba_data.extend_from_slice(rgb);
        rgba_data.push(255);
    }
    rgba_data
}

#[cfg(feature = "raster-images")]
fn from_gray(data: &[u8]) -> Vec<u8> {
    let mut rgba_data = Vec::with_capacity(data.len() * 4);
    for &gray in data {
        rgba_data.extend_from_slice(&[gray, gray, gray, 255]);
    }
    rgba_data
}
