//! Fonts for the three text roles and their metrics.

use std::path::Path;

use printpdf::{BuiltinFont, IndirectFontRef, PdfDocumentReference};

use crate::config::FontSettings;
use crate::error::{BadgeError, Result};

/// Points to millimetres
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Metrics used when no font file is configured, as fractions of the em.
struct BuiltinMetrics {
    avg_width: f32,
    ascent: f32,
    descent: f32,
}

const COURIER: BuiltinMetrics = BuiltinMetrics { avg_width: 0.60, ascent: 0.63, descent: -0.16 };
const HELVETICA: BuiltinMetrics = BuiltinMetrics { avg_width: 0.52, ascent: 0.72, descent: -0.21 };
const HELVETICA_BOLD: BuiltinMetrics =
    BuiltinMetrics { avg_width: 0.58, ascent: 0.72, descent: -0.21 };

enum Metrics {
    /// TrueType data, shaped with rustybuzz for exact advances
    Shaped { data: Vec<u8>, ascent: f32, descent: f32 },
    Estimated(&'static BuiltinMetrics),
}

pub struct Font {
    pdf: IndirectFontRef,
    metrics: Metrics,
}

impl Font {
    fn builtin(doc: &PdfDocumentReference, font: BuiltinFont, metrics: &'static BuiltinMetrics) -> Result<Self> {
        let pdf = doc
            .add_builtin_font(font)
            .map_err(|e| BadgeError::Pdf(e.to_string()))?;
        Ok(Self { pdf, metrics: Metrics::Estimated(metrics) })
    }

    fn external(doc: &PdfDocumentReference, path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| BadgeError::Font(format!("{}: {}", path.display(), e)))?;
        let (ascent, descent) = {
            let face = rustybuzz::Face::from_slice(&data, 0)
                .ok_or_else(|| BadgeError::Font(format!("{}: not a TrueType font", path.display())))?;
            let upem = face.units_per_em() as f32;
            (face.ascender() as f32 / upem, face.descender() as f32 / upem)
        };
        let pdf = doc
            .add_external_font(&data[..])
            .map_err(|e| BadgeError::Font(format!("{}: {}", path.display(), e)))?;
        Ok(Self { pdf, metrics: Metrics::Shaped { data, ascent, descent } })
    }

    pub fn pdf(&self) -> &IndirectFontRef {
        &self.pdf
    }

    /// Advance width of `text` at `size` points, in mm.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let em = match &self.metrics {
            Metrics::Shaped { data, .. } => shaped_width_em(data, text)
                .unwrap_or_else(|| text.chars().count() as f32 * 0.5),
            Metrics::Estimated(m) => text.chars().count() as f32 * m.avg_width,
        };
        em * size * PT_TO_MM
    }

    /// Ascent to descent distance at `size` points, in mm.
    pub fn line_height(&self, size: f32) -> f32 {
        let (ascent, descent) = match &self.metrics {
            Metrics::Shaped { ascent, descent, .. } => (*ascent, *descent),
            Metrics::Estimated(m) => (m.ascent, m.descent),
        };
        (ascent - descent) * size * PT_TO_MM
    }

    /// Largest size from `start` down to `floor` (1 pt steps) at which `text`
    /// fits in `width` mm.
    pub fn fit_size(&self, text: &str, start: f32, floor: f32, width: f32) -> f32 {
        let mut size = start;
        while size > floor && self.text_width(text, size) > width {
            size -= 1.0;
        }
        size.max(floor)
    }
}

fn shaped_width_em(data: &[u8], text: &str) -> Option<f32> {
    let face = rustybuzz::Face::from_slice(data, 0)?;
    let mut buffer = rustybuzz::UnicodeBuffer::new();
    buffer.push_str(text);
    let glyphs = rustybuzz::shape(&face, &[], buffer);
    let advance: i32 = glyphs.glyph_positions().iter().map(|p| p.x_advance).sum();
    Some(advance as f32 / face.units_per_em() as f32)
}

/// The reference/mono, conference title and attendee name fonts.
pub struct FontSet {
    pub reference: Font,
    pub title: Font,
    pub name: Font,
}

impl FontSet {
    pub fn load(doc: &PdfDocumentReference, settings: &FontSettings) -> Result<Self> {
        let reference = match &settings.reference {
            Some(path) => Font::external(doc, path)?,
            None => Font::builtin(doc, BuiltinFont::Courier, &COURIER)?,
        };
        let title = match &settings.title {
            Some(path) => Font::external(doc, path)?,
            None => Font::builtin(doc, BuiltinFont::HelveticaBold, &HELVETICA_BOLD)?,
        };
        let name = match &settings.name {
            Some(path) => Font::external(doc, path)?,
            None => Font::builtin(doc, BuiltinFont::Helvetica, &HELVETICA)?,
        };
        Ok(Self { reference, title, name })
    }
}
