//! Raster images: QR codes and the configured artwork.

use std::io::Read;
use std::path::Path;

use ::image::{DynamicImage, GrayImage, Luma, Rgba};
use printpdf::{ColorBits, ColorSpace, ImageXObject, Px};
use qrcode::{EcLevel, QrCode};

use crate::config::BadgeSettings;
use crate::error::{BadgeError, Result};

/// An image converted once into a PDF image object.
#[derive(Clone)]
pub struct PreparedImage {
    xobject: ImageXObject,
    width_px: u32,
    height_px: u32,
}

impl PreparedImage {
    /// Flatten transparency onto white and convert to RGB.
    pub fn from_dynamic(img: &DynamicImage, interpolate: bool) -> Self {
        let rgba = img.to_rgba8();
        let (width_px, height_px) = rgba.dimensions();

        let image_data: Vec<u8> = rgba
            .pixels()
            .flat_map(|&Rgba([r, g, b, a])| {
                let over_white = |c: u8| {
                    let alpha = a as f32 / 255.0;
                    (c as f32 * alpha + 255.0 * (1.0 - alpha)) as u8
                };
                [over_white(r), over_white(g), over_white(b)]
            })
            .collect();

        let xobject = ImageXObject {
            width: Px(width_px as usize),
            height: Px(height_px as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate,
            image_data,
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        };

        Self { xobject, width_px, height_px }
    }

    /// One byte per pixel, drawn without smoothing.
    pub fn greyscale(img: &GrayImage) -> Self {
        let (width_px, height_px) = img.dimensions();
        let xobject = ImageXObject {
            width: Px(width_px as usize),
            height: Px(height_px as usize),
            color_space: ColorSpace::Greyscale,
            bits_per_component: ColorBits::Bit8,
            interpolate: false,
            image_data: img.as_raw().clone(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        };

        Self { xobject, width_px, height_px }
    }

    pub fn xobject(&self) -> &ImageXObject {
        &self.xobject
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f32 {
        self.width_px as f32 / self.height_px.max(1) as f32
    }

    /// DPI that renders the image `width_mm` wide.
    pub fn dpi_for_width(&self, width_mm: f32) -> f32 {
        self.width_px as f32 / (width_mm / 25.4)
    }

    /// Largest (width, height) in mm fitting the box with the aspect kept.
    pub fn fit(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        let aspect_ratio = self.aspect_ratio();
        if max_width / max_height > aspect_ratio {
            (max_height * aspect_ratio, max_height)
        } else {
            (max_width, max_width / aspect_ratio)
        }
    }
}

/// QR code for `payload` at the highest error correction level, so a logo
/// can cover its centre.
///
/// One pixel per module; the placement DPI scales it up.
pub fn qr_image(payload: &str) -> Result<PreparedImage> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)
        .map_err(|e| BadgeError::Qr(e.to_string()))?;
    let image = code.render::<Luma<u8>>().module_dimensions(1, 1).build();
    Ok(PreparedImage::greyscale(&image))
}

/// Load an image from a file path or an http(s) URL.
pub fn load_image(location: &str) -> Result<DynamicImage> {
    let image_bytes = if location.starts_with("http://") || location.starts_with("https://") {
        let response = ureq::get(location)
            .call()
            .map_err(|e| BadgeError::Image(format!("Failed to fetch {}: {}", location, e)))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| BadgeError::Image(format!("Failed to read {}: {}", location, e)))?;
        bytes
    } else {
        std::fs::read(location).map_err(|e| BadgeError::Image(format!("{}: {}", location, e)))?
    };

    ::image::load_from_memory(&image_bytes)
        .map_err(|e| BadgeError::Image(format!("Failed to decode {}: {}", location, e)))
}

/// Artwork placed on every badge; each piece is optional.
#[derive(Clone, Default)]
pub struct Assets {
    pub background: Option<PreparedImage>,
    pub logo: Option<PreparedImage>,
    pub qr_logo: Option<PreparedImage>,
    pub level_icon: Option<PreparedImage>,
}

impl Assets {
    pub fn load(settings: &BadgeSettings) -> Result<Self> {
        let prepare = |path: &Option<std::path::PathBuf>| -> Result<Option<PreparedImage>> {
            path.as_deref()
                .map(|p| load_path(p).map(|img| PreparedImage::from_dynamic(&img, true)))
                .transpose()
        };
        Ok(Self {
            background: prepare(&settings.background)?,
            logo: prepare(&settings.logo)?,
            qr_logo: prepare(&settings.qr_logo)?,
            level_icon: prepare(&settings.level_icon)?,
        })
    }
}

fn load_path(path: &Path) -> Result<DynamicImage> {
    load_image(&path.to_string_lossy())
}
