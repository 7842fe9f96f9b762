//! Image preparation: pad to a square, resize, or substitute a placeholder.
//!
//! The padding geometry is pure and always available. Decoding, padding
//! pixels, and resizing need the `image` feature.
//!
//! Prepared images are always `size × size`, whether they came from a photo
//! or a placeholder, so the composer can treat every handle the same way.

/// Side length of prepared squares when nothing else is configured.
pub const DEFAULT_SQUARE_SIZE: u32 = 160;

/// Where a non-square image lands on its square canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SquareCanvas {
    /// Canvas side: the image's longer edge.
    pub side: u32,
    /// Horizontal placement offset.
    pub offset_x: u32,
    /// Vertical placement offset.
    pub offset_y: u32,
}

/// Square canvas that centers a `width × height` image.
///
/// Odd leftovers go to the right and bottom.
pub fn square_canvas(width: u32, height: u32) -> SquareCanvas {
    let side = width.max(height);
    SquareCanvas {
        side,
        offset_x: (side - width) / 2,
        offset_y: (side - height) / 2,
    }
}

#[cfg(feature = "image")]
pub use raster::*;

#[cfg(feature = "image")]
mod raster {
    use std::path::{Path, PathBuf};

    use image::imageops::{self, FilterType};
    use image::{DynamicImage, ImageError, Rgb, RgbImage};

    use super::{DEFAULT_SQUARE_SIZE, square_canvas};
    use crate::palette::Rgba;
    use crate::scene::ImageHandle;

    /// Target size and fill colors for prepared images.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct SquareSpec {
        /// Output side length in pixels.
        pub size: u32,
        /// Color of the bars added around non-square images.
        pub pad_fill: Rgba,
        /// Color of the placeholder square.
        pub placeholder_fill: Rgba,
    }

    impl Default for SquareSpec {
        fn default() -> Self {
            Self {
                size: DEFAULT_SQUARE_SIZE,
                pad_fill: Rgba::WHITE,
                placeholder_fill: Rgba::rgb(220, 220, 220),
            }
        }
    }

    impl SquareSpec {
        /// Default colors at the given size.
        pub fn with_size(size: u32) -> Self {
            Self {
                size,
                ..Self::default()
            }
        }
    }

    /// Where a prepared image came from.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum ImageSource {
        /// Decoded from this file.
        File(PathBuf),
        /// Solid placeholder square.
        Placeholder,
    }

    /// A square image ready to be referenced from a scene.
    #[derive(Clone, Debug)]
    pub struct PreparedImage {
        /// The pixels, `spec.size` on each side.
        pub image: RgbImage,
        /// Origin of the pixels.
        pub source: ImageSource,
    }

    impl PreparedImage {
        /// True when no source image could be used.
        pub fn is_placeholder(&self) -> bool {
            self.source == ImageSource::Placeholder
        }

        /// Write the image as PNG and return a handle naming the written file.
        ///
        /// The handle is the file name only, so a scene rendered next to the
        /// file can reference it relatively.
        pub fn save_png(&self, path: &Path) -> Result<ImageHandle, ImageError> {
            self.image.save_with_format(path, image::ImageFormat::Png)?;
            let key = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            Ok(ImageHandle::new(key))
        }
    }

    fn rgb(c: Rgba) -> Rgb<u8> {
        Rgb([c.r, c.g, c.b])
    }

    /// Pad `img` to a square on `spec.pad_fill`, centered, then resize to
    /// `spec.size`. Empty images become the placeholder.
    pub fn make_square(img: &DynamicImage, spec: &SquareSpec) -> RgbImage {
        let src = img.to_rgb8();
        let (w, h) = src.dimensions();
        if w == 0 || h == 0 {
            return placeholder(spec);
        }
        if w == h {
            return imageops::resize(&src, spec.size, spec.size, FilterType::CatmullRom);
        }

        let canvas = square_canvas(w, h);
        let mut padded = RgbImage::from_pixel(canvas.side, canvas.side, rgb(spec.pad_fill));
        imageops::overlay(
            &mut padded,
            &src,
            i64::from(canvas.offset_x),
            i64::from(canvas.offset_y),
        );
        imageops::resize(&padded, spec.size, spec.size, FilterType::CatmullRom)
    }

    /// Solid square in `spec.placeholder_fill`.
    pub fn placeholder(spec: &SquareSpec) -> RgbImage {
        RgbImage::from_pixel(spec.size, spec.size, rgb(spec.placeholder_fill))
    }

    /// Load and square an image, falling back to the placeholder when the
    /// path is absent, missing, or undecodable.
    pub fn prepare(path: Option<&Path>, spec: &SquareSpec) -> PreparedImage {
        let Some(path) = path else {
            tracing::debug!("no image path given, using placeholder");
            return placeholder_image(spec);
        };
        if !path.exists() {
            tracing::warn!(path = %path.display(), "image not found, using placeholder");
            return placeholder_image(spec);
        }
        match image::open(path) {
            Ok(img) => {
                tracing::debug!(
                    path = %path.display(),
                    width = img.width(),
                    height = img.height(),
                    size = spec.size,
                    "prepared image"
                );
                PreparedImage {
                    image: make_square(&img, spec),
                    source: ImageSource::File(path.to_path_buf()),
                }
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    %err,
                    "cannot decode image, using placeholder"
                );
                placeholder_image(spec)
            }
        }
    }

    fn placeholder_image(spec: &SquareSpec) -> PreparedImage {
        PreparedImage {
            image: placeholder(spec),
            source: ImageSource::Placeholder,
        }
    }
}
