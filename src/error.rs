//! Error types for badge generation

use thiserror::Error;

/// Result type alias using [`BadgeError`]
pub type Result<T> = std::result::Result<T, BadgeError>;

#[derive(Error, Debug)]
pub enum BadgeError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Unrecognized paper size: {0} (expected A4 or A5)")]
    UnknownPaperSize(String),
    #[error("Only one of --updated-since, --created-since and --created-on may be given")]
    ConflictingFilters,
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Ticket API request failed: {0}")]
    Http(String),
    #[error("Ticket API returned an unexpected response: {0}")]
    Api(String),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid reference mapping: {0}")]
    InvalidMapping(String),
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(String),
    #[error("Failed to create PDF: {0}")]
    Pdf(String),
    #[error("Failed to generate QR code: {0}")]
    Qr(String),
    #[error("Failed to load image: {0}")]
    Image(String),
    #[error("Failed to load font: {0}")]
    Font(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for BadgeError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, response) => {
                let body = response.into_string().unwrap_or_default();
                BadgeError::Api(format!("status {}: {}", code, truncate(&body, 300)))
            }
            ureq::Error::Transport(t) => BadgeError::Http(t.to_string()),
        }
    }
}

fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
