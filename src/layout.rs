//! Sheet geometry for the supported paper sizes

use std::fmt;
use std::str::FromStr;

use crate::error::BadgeError;
use crate::ordering::Ordering;

/// A4 dimensions in mm
const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;

/// A5 dimensions in mm (portrait)
const A5_WIDTH_MM: f32 = 148.0;
const A5_HEIGHT_MM: f32 = 210.0;

/// Gap kept on each side of the centre lines of a folded sheet
const FOLDED_MARGIN_MM: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperSize {
    /// A4 portrait holding two badges, folded vertically and cut across.
    A4,
    /// A5 landscape holding a single badge, folded vertically.
    A5,
}

impl FromStr for PaperSize {
    type Err = BadgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A4" => Ok(PaperSize::A4),
            "A5" => Ok(PaperSize::A5),
            _ => Err(BadgeError::UnknownPaperSize(s.to_string())),
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaperSize::A4 => f.write_str("A4"),
            PaperSize::A5 => f.write_str("A5"),
        }
    }
}

/// Where one badge (back and front) sits on a sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Lower-left corner of the back face
    pub back: (f32, f32),
    /// Lower-left corner of the front face
    pub front: (f32, f32),
}

/// Page and section dimensions for a run. All lengths in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub paper: PaperSize,
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub section_width: f32,
    pub section_height: f32,
    pub ordering: Ordering,
}

impl Layout {
    pub fn for_paper(paper: PaperSize) -> Self {
        match paper {
            PaperSize::A4 => Self {
                paper,
                width: A4_WIDTH_MM,
                height: A4_HEIGHT_MM,
                margin: FOLDED_MARGIN_MM,
                section_width: A4_WIDTH_MM / 2.0 - FOLDED_MARGIN_MM,
                section_height: A4_HEIGHT_MM / 2.0 - FOLDED_MARGIN_MM,
                ordering: Ordering::TwoPerPage,
            },
            PaperSize::A5 => Self {
                paper,
                width: A5_HEIGHT_MM,
                height: A5_WIDTH_MM,
                margin: 0.0,
                section_width: A5_HEIGHT_MM / 2.0,
                section_height: A5_WIDTH_MM,
                ordering: Ordering::Enumerate,
            },
        }
    }

    pub fn badges_per_sheet(&self) -> usize {
        self.ordering.badges_per_sheet()
    }

    /// Whether sheets are cut across as well as folded
    pub fn has_cut_line(&self) -> bool {
        self.badges_per_sheet() > 1
    }

    /// Badge slots of a sheet, top to bottom.
    pub fn slots(&self) -> Vec<Slot> {
        let front_x = self.width / 2.0 + self.margin;
        match self.ordering {
            Ordering::TwoPerPage => {
                let upper_y = self.height / 2.0 + self.margin;
                vec![
                    Slot { back: (0.0, upper_y), front: (front_x, upper_y) },
                    Slot { back: (0.0, 0.0), front: (front_x, 0.0) },
                ]
            }
            Ordering::Enumerate => vec![Slot { back: (0.0, 0.0), front: (front_x, 0.0) }],
        }
    }
}
