use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
    time::Instant,
};

use exposure_fusion::{
    BitDepth, ChannelLayout, ChannelModel, DisplayImage, Elapsed, Exposure, ExposureError,
};
use image::{
    DynamicImage, ExtendedColorType, ImageBuffer, ImageEncoder, Rgba, codecs::jpeg::JpegEncoder,
};
use thiserror::Error;
use tracing::debug;

/// JPEG quality used when none is configured.
pub const JPEG_QUALITY: u8 = 95;

/// The file formats exposures are read from and results written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Picks the format from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Decodes a PNG or JPEG file into an exposure, keeping its channel layout and bit depth.
pub fn load_exposure(path: &Path) -> Result<Exposure, Error> {
    ImageFormat::from_path(path)?;

    let start = Instant::now();
    let image = image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let exposure = to_exposure(image)?;
    debug!(
        "Loaded {} as {}x{} {} in {}",
        path.display(),
        exposure.width(),
        exposure.height(),
        exposure.model(),
        Elapsed(start.elapsed())
    );

    Ok(exposure)
}

/// Converts a decoded image into an exposure.
///
/// Floating point images are converted to 16-bit RGB.
pub fn to_exposure(image: DynamicImage) -> Result<Exposure, Error> {
    let size = [image.width(), image.height()];

    let eight = |layout, bytes: Vec<u8>| {
        let samples: Box<[u16]> = bytes.into_iter().map(u16::from).collect();
        Exposure::new(size, ChannelModel::new(layout, BitDepth::Eight), samples)
    };
    let sixteen = |layout, samples: Vec<u16>| {
        Exposure::new(size, ChannelModel::new(layout, BitDepth::Sixteen), samples)
    };

    let exposure = match image {
        DynamicImage::ImageLuma8(buffer) => eight(ChannelLayout::Gray, buffer.into_raw()),
        DynamicImage::ImageLumaA8(buffer) => eight(ChannelLayout::GrayAlpha, buffer.into_raw()),
        DynamicImage::ImageRgb8(buffer) => eight(ChannelLayout::Rgb, buffer.into_raw()),
        DynamicImage::ImageRgba8(buffer) => eight(ChannelLayout::Rgba, buffer.into_raw()),
        DynamicImage::ImageLuma16(buffer) => sixteen(ChannelLayout::Gray, buffer.into_raw()),
        DynamicImage::ImageLumaA16(buffer) => sixteen(ChannelLayout::GrayAlpha, buffer.into_raw()),
        DynamicImage::ImageRgb16(buffer) => sixteen(ChannelLayout::Rgb, buffer.into_raw()),
        DynamicImage::ImageRgba16(buffer) => sixteen(ChannelLayout::Rgba, buffer.into_raw()),
        other => sixteen(ChannelLayout::Rgb, other.to_rgb16().into_raw()),
    }?;

    Ok(exposure)
}

/// Writes the image as PNG or as JPEG at [`JPEG_QUALITY`], chosen by extension.
pub fn save_display_image(image: &DisplayImage, path: &Path) -> Result<(), Error> {
    save_display_image_with_quality(image, path, JPEG_QUALITY)
}

/// Writes the image as PNG or as JPEG at `jpeg_quality`, chosen by extension.
///
/// JPEG has no alpha channel so it is dropped.
pub fn save_display_image_with_quality(
    image: &DisplayImage,
    path: &Path,
    jpeg_quality: u8,
) -> Result<(), Error> {
    let format = ImageFormat::from_path(path)?;
    let [width, height] = image.size;

    let encode_error = |source| Error::Encode {
        path: path.to_path_buf(),
        source,
    };

    match format {
        ImageFormat::Png => {
            let pixels = &image.data[..];
            let buffer: ImageBuffer<Rgba<u8>, &[u8]> =
                ImageBuffer::from_raw(width, height, pixels).ok_or(Error::BufferSize(image.size))?;

            buffer
                .save_with_format(path, image::ImageFormat::Png)
                .map_err(encode_error)?;
        }

        ImageFormat::Jpeg => {
            let rgb: Vec<u8> = image
                .pixels()
                .iter()
                .flat_map(|&[r, g, b, _]| [r, g, b])
                .collect();

            let file = File::create(path).map_err(|source| Error::Create {
                path: path.to_path_buf(),
                source,
            })?;

            JpegEncoder::new_with_quality(BufWriter::new(file), jpeg_quality.clamp(1, 100))
                .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
                .map_err(encode_error)?;
        }
    }

    debug!("Saved {}x{} image to {}", width, height, path.display());
    Ok(())
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported image format for file {}. Supported formats: PNG, JPEG", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Failed to decode {}:\n{source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode {}:\n{source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to create {}:\n{source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Image data does not match its size {}x{}", .0[0], .0[1])]
    BufferSize([u32; 2]),

    #[error("Failed to create exposure:\n{0}")]
    Exposure(#[from] ExposureError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        let format = |path: &str| ImageFormat::from_path(Path::new(path)).ok();

        assert_eq!(format("a.PNG"), Some(ImageFormat::Png));
        assert_eq!(format("dir/b.Jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(format("c.jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(format("d.tiff"), None);
        assert_eq!(format("no_extension"), None);
    }

    #[test]
    fn gray_image_keeps_layout() {
        let buffer = image::GrayImage::from_raw(2, 1, vec![10, 20]).unwrap();
        let exposure = to_exposure(DynamicImage::ImageLuma8(buffer)).unwrap();

        assert_eq!(exposure.model(), ChannelModel::GRAY8);
        assert_eq!(exposure.pixel(1, 0), [20, 20, 20]);
    }
}
