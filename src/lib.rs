//! badges-pdf: printable conference badges from Tito tickets.
//!
//! Tickets come from the Tito API or a JSON export. Each one is classified
//! (speaker, exhibitor, attendee level), filtered, sorted by reference and
//! drawn as a foldable badge with a QR code on the back and the attendee's
//! name on the front. See [`render::create_badges`] for the sheet layout.

pub mod config;
pub mod error;
pub mod filter;
pub mod lanes;
pub mod layout;
pub mod logging;
pub mod ordering;
pub mod remap;
pub mod render;
pub mod report;
pub mod sessionize;
pub mod source;
pub mod ticket;

pub use error::{BadgeError, Result};
