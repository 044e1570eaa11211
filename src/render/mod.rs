//! PDF rendering of badge sheets.
//!
//! A [`RenderSession`] owns the output document for the whole run. Sheets are
//! drawn one batch at a time and the document is written exactly once by
//! [`RenderSession::finish`].

mod faces;
mod fonts;
mod guides;
mod images;
mod pen;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{Mm, PdfDocument, PdfDocumentReference};
use tracing::{debug, info, warn};

use crate::config::FontSettings;
use crate::error::{BadgeError, Result};
use crate::layout::{Layout, Slot};
use crate::ordering::batches;
use crate::ticket::Ticket;

pub use faces::{icon_positions, Painter};
pub use fonts::{Font, FontSet, PT_TO_MM};
pub use images::{load_image, qr_image, Assets, PreparedImage};
pub use pen::Pen;

/// Per-run options that are not geometry.
#[derive(Debug, Clone)]
pub struct BadgeOptions {
    /// Conference title printed on the front, if any
    pub title: Option<String>,
    /// Draw the non-printing alignment aids
    pub guidelines: bool,
    /// Question slug holding the experience level
    pub level_key: String,
}

/// What a finished run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub badges: usize,
    pub sheets: usize,
    /// References of tickets printed with the name placeholder
    pub anomalies: Vec<String>,
}

pub struct RenderSession {
    doc: PdfDocumentReference,
    layout: Layout,
    fonts: FontSet,
    assets: Assets,
    options: BadgeOptions,
    summary: RunSummary,
}

impl RenderSession {
    pub fn new(
        layout: Layout,
        font_settings: &FontSettings,
        assets: Assets,
        options: BadgeOptions,
    ) -> Result<Self> {
        let doc = PdfDocument::empty("Badges");
        let fonts = FontSet::load(&doc, font_settings)?;
        Ok(Self {
            doc,
            layout,
            fonts,
            assets,
            options,
            summary: RunSummary::default(),
        })
    }

    /// Draw one physical sheet holding up to `badges_per_sheet` badges.
    pub fn draw_sheet<'t, I>(&mut self, badges: I) -> Result<()>
    where
        I: IntoIterator<Item = (usize, &'t Ticket)>,
    {
        let (page, layer) = self.doc.add_page(
            Mm(self.layout.width),
            Mm(self.layout.height),
            "Layer 1",
        );
        let mut pen = Pen::new(self.doc.get_page(page).get_layer(layer));
        self.summary.sheets += 1;
        debug!(sheet = self.summary.sheets, "Drawing sheet");

        guides::draw_fold_and_cut(&mut pen, &self.layout);
        if self.options.guidelines {
            guides::draw_guidelines(&mut pen, &self.layout);
        }

        let painter = Painter {
            fonts: &self.fonts,
            assets: &self.assets,
            title: self.options.title.as_deref(),
            level_key: &self.options.level_key,
            width: self.layout.section_width,
            height: self.layout.section_height,
        };

        for ((order_index, ticket), slot) in assign_slots(badges, &self.layout) {
            let name = ticket.display_name();
            if name.is_anomaly() {
                warn!(reference = %ticket.reference, "Ticket has no usable name, printing placeholder");
                self.summary.anomalies.push(ticket.reference.clone());
            }

            pen.scoped(|pen| -> Result<()> {
                pen.translate(slot.back.0, slot.back.1);
                painter.draw_back(pen, ticket, order_index)?;
                pen.translate(slot.front.0 - slot.back.0, slot.front.1 - slot.back.1);
                painter.draw_front(pen, ticket, &name);
                Ok(())
            })?;
            self.summary.badges += 1;
        }
        Ok(())
    }

    /// Write the document to `path` and return the run summary.
    ///
    /// The PDF is written next to `path` first and renamed into place, so
    /// `path` never holds a partially written file.
    pub fn finish(mut self, path: &Path) -> Result<RunSummary> {
        let partial = partial_path(path);
        let saved = save_document(self.doc, &partial)
            .and_then(|()| std::fs::rename(&partial, path).map_err(BadgeError::from));
        if let Err(e) = saved {
            let _ = std::fs::remove_file(&partial);
            return Err(e);
        }
        self.summary.anomalies.sort();
        info!(
            path = %path.display(),
            badges = self.summary.badges,
            sheets = self.summary.sheets,
            "Saved badges"
        );
        Ok(self.summary)
    }
}

fn save_document(doc: PdfDocumentReference, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    doc.save(&mut writer).map_err(|e| BadgeError::Pdf(e.to_string()))
}

/// Pair a sheet's badges with its slots: the first badge of a batch takes the
/// top slot, the second the bottom one.
pub fn assign_slots<'t, I>(
    badges: I,
    layout: &Layout,
) -> impl Iterator<Item = ((usize, &'t Ticket), Slot)>
where
    I: IntoIterator<Item = (usize, &'t Ticket)>,
{
    badges.into_iter().zip(layout.slots())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

/// Lay out `tickets` (already sorted) sheet by sheet.
pub fn create_badges(session: &mut RenderSession, tickets: &[Ticket]) -> Result<()> {
    let ordered = session.layout.ordering.apply(tickets);
    let mut sheets = batches(ordered, session.layout.badges_per_sheet());
    while let Some(sheet) = sheets.next_batch() {
        session.draw_sheet(sheet)?;
    }
    Ok(())
}
