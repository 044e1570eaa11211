//! Where tickets come from: the Tito API or a JSON export of it.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{BadgeError, Result};
use crate::ticket::Ticket;

/// Tito v3 admin API
pub const DEFAULT_API_BASE_URL: &str = "https://api.tito.io/v3";

/// Per-request timeout for the ticket API
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Anything that can produce the full ticket collection for a run.
pub trait TicketSource {
    fn tickets(&self) -> Result<Vec<Ticket>>;
}

#[derive(Debug, Deserialize)]
struct TicketPage {
    #[serde(default)]
    tickets: Vec<Ticket>,
    #[serde(default)]
    meta: PageMeta,
}

#[derive(Debug, Default, Deserialize)]
struct PageMeta {
    #[serde(default)]
    next_page: Option<u32>,
}

/// Blocking client for the tickets endpoint of one event.
pub struct TitoClient {
    agent: ureq::Agent,
    base_url: String,
    account: String,
    event: String,
    token: String,
}

impl TitoClient {
    pub fn new(base_url: &str, account: &str, event: &str, token: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            account: account.to_string(),
            event: event.to_string(),
            token: token.to_string(),
        }
    }

    fn tickets_url(&self) -> String {
        format!("{}/{}/{}/tickets", self.base_url, self.account, self.event)
    }

    /// Fetch one page, returning its tickets and the number of the next page.
    fn fetch_page(&self, page: u32) -> Result<(Vec<Ticket>, Option<u32>)> {
        debug!(page, event = %self.event, "Fetching ticket page");
        let response = self
            .agent
            .get(&self.tickets_url())
            .query("page", &page.to_string())
            .query("view", "extended")
            .set("Authorization", &format!("Token token={}", self.token))
            .set("Accept", "application/json")
            .call()?;

        let body: TicketPage = serde_json::from_reader(response.into_reader())
            .map_err(|e| BadgeError::Api(format!("page {}: {}", page, e)))?;
        Ok((body.tickets, body.meta.next_page))
    }
}

impl TicketSource for TitoClient {
    fn tickets(&self) -> Result<Vec<Ticket>> {
        let mut all = Vec::new();
        let mut page = Some(1);
        while let Some(current) = page {
            let (tickets, next) = self.fetch_page(current)?;
            all.extend(tickets);
            page = next;
        }
        info!(count = all.len(), event = %self.event, "Fetched tickets");
        Ok(all)
    }
}

/// Tickets previously saved as a JSON array.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TicketSource for JsonFileSource {
    fn tickets(&self) -> Result<Vec<Ticket>> {
        let tickets = load_tickets(&self.path)?;
        info!(count = tickets.len(), path = %self.path.display(), "Loaded tickets");
        Ok(tickets)
    }
}

pub fn load_tickets(path: &Path) -> Result<Vec<Ticket>> {
    let file = File::open(path)
        .map_err(|e| BadgeError::Config(format!("{}: {}", path.display(), e)))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

pub fn save_tickets(tickets: &[Ticket], path: &Path) -> Result<()> {
    let contents = serde_json::to_string_pretty(tickets)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Entry of the accepted speakers export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    #[serde(default)]
    pub speaker_id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Speaker {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

pub fn save_speakers(speakers: &[Speaker], path: &Path) -> Result<()> {
    let contents = serde_json::to_string_pretty(speakers)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Emails of the speakers listed in a JSON file.
pub fn load_speaker_emails(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .map_err(|e| BadgeError::Config(format!("{}: {}", path.display(), e)))?;
    let speakers: Vec<Speaker> = serde_json::from_reader(BufReader::new(file))?;
    Ok(speakers.into_iter().filter_map(|s| s.email).collect())
}
