//! Fold and cut marks, plus optional alignment aids.

use crate::layout::Layout;

use super::pen::{Pen, BLACK};

/// Dashed vertical fold line, and the solid horizontal cut line when the
/// sheet holds more than one badge.
pub fn draw_fold_and_cut(pen: &mut Pen, layout: &Layout) {
    pen.scoped(|pen| {
        pen.set_stroke(BLACK, 0.5);
        pen.set_dash(Some((6, 3)));
        pen.line(layout.width / 2.0, 0.0, layout.width / 2.0, layout.height);
        if layout.has_cut_line() {
            pen.set_dash(None);
            pen.line(0.0, layout.height / 2.0, layout.width, layout.height / 2.0);
        }
    });
}

/// Proportion lines across every badge slot and the margin boundaries.
pub fn draw_guidelines(pen: &mut Pen, layout: &Layout) {
    pen.scoped(|pen| {
        pen.set_stroke(BLACK, 0.3);
        for slot in layout.slots() {
            let base = slot.back.1;
            pen.set_dash(Some((1, 8)));
            for proportion in [1.0 / 8.0, 1.0 / 4.0, 1.0 / 2.0, 3.0 / 4.0, 7.0 / 8.0] {
                let y = base + layout.section_height * proportion;
                pen.line(0.0, y, layout.width, y);
            }
            // banner, logo and name bands
            pen.set_dash(Some((2, 2)));
            for proportion in [1.0 / 6.0, 1.0 / 3.0, 2.0 / 3.0] {
                let y = base + layout.section_height * proportion;
                pen.line(0.0, y, layout.width, y);
            }
        }
        draw_margins(pen, layout);
    });
}

fn draw_margins(pen: &mut Pen, layout: &Layout) {
    if layout.margin <= 0.0 {
        return;
    }
    pen.set_dash(Some((1, 4)));
    let mid_x = layout.width / 2.0;
    pen.line(mid_x - layout.margin, 0.0, mid_x - layout.margin, layout.height);
    pen.line(mid_x + layout.margin, 0.0, mid_x + layout.margin, layout.height);
    if layout.has_cut_line() {
        let mid_y = layout.height / 2.0;
        pen.line(0.0, mid_y + layout.margin, layout.width, mid_y + layout.margin);
        pen.line(0.0, mid_y - layout.margin, layout.width, mid_y - layout.margin);
    }
}
