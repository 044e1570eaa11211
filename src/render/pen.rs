//! Drawing context for one sheet.
//!
//! All coordinates handed to a [`Pen`] are in mm relative to its current
//! origin. [`Pen::scoped`] saves the origin together with the PDF graphics
//! state (colors, line width, dash) and restores both when the closure
//! returns, so nested drawing code never leaks state into its caller.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;

use super::fonts::Font;
use super::images::PreparedImage;

pub const BLACK: (f32, f32, f32, f32) = (0.0, 0.0, 0.0, 1.0);
pub const WHITE: (f32, f32, f32, f32) = (0.0, 0.0, 0.0, 0.0);
pub const GREEN: (f32, f32, f32, f32) = (0.71, 0.0, 0.72, 0.40);
pub const ORANGE: (f32, f32, f32, f32) = (0.0, 0.43, 0.91, 0.0);
pub const BLUE: (f32, f32, f32, f32) = (0.98, 0.82, 0.0, 0.44);

fn cmyk((c, m, y, k): (f32, f32, f32, f32)) -> Color {
    Color::Cmyk(Cmyk::new(c, m, y, k, None))
}

pub struct Pen {
    layer: PdfLayerReference,
    origin: (f32, f32),
    saved: Vec<(f32, f32)>,
}

impl Pen {
    pub fn new(layer: PdfLayerReference) -> Self {
        Self {
            layer,
            origin: (0.0, 0.0),
            saved: Vec::new(),
        }
    }

    /// Run `f` with a saved copy of the drawing state, restored afterwards.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Pen) -> T) -> T {
        self.saved.push(self.origin);
        self.layer.save_graphics_state();
        let result = f(self);
        self.layer.restore_graphics_state();
        if let Some(origin) = self.saved.pop() {
            self.origin = origin;
        }
        result
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.origin = (self.origin.0 + dx, self.origin.1 + dy);
    }

    pub fn origin(&self) -> (f32, f32) {
        self.origin
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(Mm(self.origin.0 + x), Mm(self.origin.1 + y))
    }

    pub fn set_fill(&self, color: (f32, f32, f32, f32)) {
        self.layer.set_fill_color(cmyk(color));
    }

    pub fn set_stroke(&self, color: (f32, f32, f32, f32), thickness: f32) {
        self.layer.set_outline_color(cmyk(color));
        self.layer.set_outline_thickness(thickness);
    }

    /// Dashed strokes (`Some((dash, gap))` in points) or solid ones (`None`).
    pub fn set_dash(&self, dash: Option<(i64, i64)>) {
        let pattern = match dash {
            Some((dash, gap)) => LineDashPattern {
                dash_1: Some(dash),
                gap_1: Some(gap),
                ..Default::default()
            },
            None => LineDashPattern::default(),
        };
        self.layer.set_line_dash_pattern(pattern);
    }

    /// Stroke text as well as filling it, for a heavier look.
    pub fn set_outlined_text(&self, outlined: bool) {
        self.layer.set_text_rendering_mode(if outlined {
            TextRenderingMode::FillStroke
        } else {
            TextRenderingMode::Fill
        });
    }

    pub fn line(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let line = Line {
            points: vec![(self.point(x1, y1), false), (self.point(x2, y2), false)],
            is_closed: false,
        };
        self.layer.add_line(line);
    }

    pub fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32) {
        let ring = vec![
            (self.point(x, y), false),
            (self.point(x + width, y), false),
            (self.point(x + width, y + height), false),
            (self.point(x, y + height), false),
        ];
        self.layer.add_polygon(Polygon {
            rings: vec![ring],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    pub fn text(&self, text: &str, font: &Font, size: f32, x: f32, y: f32) {
        let (ax, ay) = (self.origin.0 + x, self.origin.1 + y);
        self.layer.use_text(text, size, Mm(ax), Mm(ay), font.pdf());
    }

    /// Text whose baseline starts at `(x, y)` and is turned `angle` degrees
    /// counter-clockwise.
    pub fn text_rotated(&self, text: &str, font: &Font, size: f32, x: f32, y: f32, angle: f32) {
        let (ax, ay) = (self.origin.0 + x, self.origin.1 + y);
        self.layer.begin_text_section();
        self.layer.set_font(font.pdf(), size);
        self.layer
            .set_text_matrix(TextMatrix::TranslateRotate(Mm(ax).into(), Mm(ay).into(), angle));
        self.layer.write_text(text, font.pdf());
        self.layer.end_text_section();
    }

    /// Place an image with its lower-left corner at `(x, y)`, `width` mm wide.
    pub fn image(&self, image: &PreparedImage, x: f32, y: f32, width: f32) {
        let (ax, ay) = (self.origin.0 + x, self.origin.1 + y);
        Image::from(image.xobject().clone()).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(ax)),
                translate_y: Some(Mm(ay)),
                dpi: Some(image.dpi_for_width(width)),
                ..Default::default()
            },
        );
    }
}
