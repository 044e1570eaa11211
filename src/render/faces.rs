//! Back and front faces of a badge.
//!
//! Both faces are drawn in section coordinates: `(0, 0)` is the lower-left
//! corner of the section and everything stays within
//! `section_width x section_height`.

use crate::ticket::{level_icon_count, DisplayName, Role, Ticket};

use super::fonts::{FontSet, PT_TO_MM};
use super::images::{qr_image, Assets};
use super::pen::{Pen, BLACK, BLUE, GREEN, ORANGE, WHITE};
use crate::error::Result;

/// Reference and order index size in points
const REFERENCE_FONT_SIZE: f32 = 28.0;
/// Starting size for the conference title and attendee name, in points
const HEADLINE_FONT_SIZE: f32 = 32.0;
/// Names never shrink below this size
const MIN_NAME_FONT_SIZE: f32 = 8.0;
/// QR code edge as a fraction of the smaller section dimension
const QR_RATIO: f32 = 0.66;
/// Logo in the QR code as a fraction of the code
const QR_LOGO_RATIO: f32 = 0.3;
/// Bottom banner height as a fraction of the section height
const BANNER_RATIO: f32 = 1.0 / 6.0;
/// Background artwork height as a fraction of the section height
const BACKGROUND_RATIO: f32 = 1.0 / 3.0;
/// Front logo edge as a fraction of the section width
const LOGO_RATIO: f32 = 0.37;
/// Inner padding, in mm
const PADDING_MM: f32 = 2.0;
/// Distance of the reference text baseline from the top edge, in mm
const REFERENCE_TOP_MM: f32 = 30.0 * PT_TO_MM;
/// Level icon edge and spacing, in mm
const ICON_MM: f32 = 30.0 * PT_TO_MM;
const ICON_GAP_MM: f32 = 5.0 * PT_TO_MM;

/// Draws both faces of a badge with the run's fonts and artwork.
pub struct Painter<'a> {
    pub fonts: &'a FontSet,
    pub assets: &'a Assets,
    pub title: Option<&'a str>,
    pub level_key: &'a str,
    pub width: f32,
    pub height: f32,
}

impl Painter<'_> {
    pub fn draw_back(&self, pen: &mut Pen, ticket: &Ticket, order_index: usize) -> Result<()> {
        let qr = qr_image(&ticket.qr_payload())?;
        let qr_size = self.width.min(self.height) * QR_RATIO;
        let qr_x = (self.width - qr_size) / 2.0;
        let qr_y = (self.height - qr_size) / 2.0;
        pen.image(&qr, qr_x, qr_y, qr_size);

        if let Some(logo) = &self.assets.qr_logo {
            let (w, h) = logo.fit(qr_size * QR_LOGO_RATIO, qr_size * QR_LOGO_RATIO);
            pen.image(logo, (self.width - w) / 2.0, (self.height - h) / 2.0, w);
        }

        pen.scoped(|pen| {
            pen.set_fill(BLACK);
            pen.set_stroke(BLACK, 0.5);
            pen.set_outlined_text(true);

            let font = &self.fonts.reference;
            let reference = ticket.reference.as_str();
            let text_w = font.text_width(reference, REFERENCE_FONT_SIZE);

            // upright in the top corner, and along the edge so it shows once folded
            pen.text(
                reference,
                font,
                REFERENCE_FONT_SIZE,
                self.width - text_w - PADDING_MM,
                self.height - REFERENCE_TOP_MM,
            );
            pen.text_rotated(
                reference,
                font,
                REFERENCE_FONT_SIZE,
                REFERENCE_TOP_MM,
                self.height - text_w - PADDING_MM - 2.0,
                90.0,
            );

            pen.text_rotated(
                &order_index.to_string(),
                font,
                REFERENCE_FONT_SIZE,
                REFERENCE_TOP_MM,
                2.0 * PADDING_MM,
                90.0,
            );
        });
        Ok(())
    }

    pub fn draw_front(&self, pen: &mut Pen, ticket: &Ticket, name: &DisplayName) {
        if let Some(background) = &self.assets.background {
            let (w, h) = background.fit(self.width, self.height * BACKGROUND_RATIO);
            pen.image(background, (self.width - w) / 2.0, self.height - h, w);
        }

        if let Some(title) = self.title {
            pen.scoped(|pen| {
                pen.set_fill(GREEN);
                pen.set_stroke(WHITE, 1.3);
                pen.set_outlined_text(true);
                let font = &self.fonts.title;
                let size = font.fit_size(title, HEADLINE_FONT_SIZE, MIN_NAME_FONT_SIZE, self.text_width());
                let text_w = font.text_width(title, size);
                pen.text(title, font, size, (self.width - text_w) / 2.0, self.height - 60.0 * PT_TO_MM);
            });
        }

        if let Some(logo) = &self.assets.logo {
            let edge = self.width * LOGO_RATIO;
            let (w, h) = logo.fit(edge, edge);
            pen.image(logo, (self.width - w) / 2.0, (self.height - h) / 2.0, w);
        }

        pen.scoped(|pen| {
            pen.set_fill(GREEN);
            pen.set_stroke(BLACK, 0.7);
            pen.set_outlined_text(true);
            let font = &self.fonts.name;
            let text = name.text();
            let size = font.fit_size(text, HEADLINE_FONT_SIZE, MIN_NAME_FONT_SIZE, self.text_width());
            let text_w = font.text_width(text, size);
            let y = self.height / 4.0 - font.line_height(size) / 4.0;
            pen.text(text, font, size, (self.width - text_w) / 2.0, y);
        });

        self.draw_banner(pen, ticket.role(self.level_key));
    }

    fn text_width(&self) -> f32 {
        self.width - 2.0 * PADDING_MM
    }

    fn draw_banner(&self, pen: &mut Pen, role: Role) {
        let banner_h = self.height * BANNER_RATIO;
        pen.scoped(|pen| match role {
            Role::Exhibitor => self.labelled_banner(pen, GREEN, "EXHIBITOR", banner_h),
            Role::Speaker => self.labelled_banner(pen, ORANGE, "SPEAKER", banner_h),
            Role::Attendee(level) => {
                pen.set_fill(BLUE);
                pen.fill_rect(0.0, 0.0, self.width, banner_h);

                let count = level_icon_count(level) as usize;
                let y = (banner_h - ICON_MM) / 2.0;
                pen.set_fill(WHITE);
                for x in icon_positions(count, self.width) {
                    match &self.assets.level_icon {
                        Some(icon) => pen.image(icon, x, y, ICON_MM),
                        None => pen.fill_rect(x, y, ICON_MM, ICON_MM),
                    }
                }
            }
        });
    }

    fn labelled_banner(&self, pen: &mut Pen, color: (f32, f32, f32, f32), label: &str, banner_h: f32) {
        pen.set_fill(color);
        pen.fill_rect(0.0, 0.0, self.width, banner_h);

        pen.set_fill(WHITE);
        pen.set_stroke(BLACK, 0.7);
        let font = &self.fonts.name;
        let size = font.fit_size(label, HEADLINE_FONT_SIZE, MIN_NAME_FONT_SIZE, self.text_width());
        let text_w = font.text_width(label, size);
        let y = (banner_h - font.line_height(size) / 2.0) / 2.0;
        pen.text(label, font, size, (self.width - text_w) / 2.0, y);
    }
}

/// Left edges of `count` level icons centred across `width`.
pub fn icon_positions(count: usize, width: f32) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }
    let total = ICON_MM * count as f32 + ICON_GAP_MM * (count as f32 - 1.0);
    let start = (width - total) / 2.0;
    (0..count)
        .map(|i| start + (ICON_MM + ICON_GAP_MM) * i as f32)
        .collect()
}
