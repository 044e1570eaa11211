//! Ticket records and the attendee details derived from them.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Question slug holding the self-reported experience by default
pub const DEFAULT_LEVEL_KEY: &str = "python-experience";

/// Release title marker identifying exhibitor tickets by default
pub const DEFAULT_EXHIBITOR_MARKER: &str = "Exhibitor";

/// Printed instead of the attendee name when the ticket lacks one
pub const NAME_PLACEHOLDER: &str = "XXX Fix ticket XXX";

/// A ticket as returned by the ticketing API (extended view).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub reference: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub responses: HashMap<String, serde_json::Value>,
    #[serde(default, alias = "ticket_title")]
    pub release_title: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub speaker: bool,
    #[serde(default)]
    pub exhibitor: bool,
}

/// Self-reported experience level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Beginner = 1,
    Intermediate = 2,
    Advanced = 3,
    Expert = 4,
}

impl Level {
    /// Map a free-text answer onto a level. Only the exact variant names match.
    pub fn from_response(response: &str) -> Option<Level> {
        match response.trim() {
            "Beginner" => Some(Level::Beginner),
            "Intermediate" => Some(Level::Intermediate),
            "Advanced" => Some(Level::Advanced),
            "Expert" => Some(Level::Expert),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

/// Number of level icons printed for an optional level.
pub fn level_icon_count(level: Option<Level>) -> u8 {
    level.map(Level::value).unwrap_or(0)
}

/// Name printed on the front of the badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayName {
    Name(String),
    /// The ticket has no usable first name and needs fixing by hand.
    Anomaly,
}

impl DisplayName {
    pub fn is_anomaly(&self) -> bool {
        matches!(self, DisplayName::Anomaly)
    }

    pub fn text(&self) -> &str {
        match self {
            DisplayName::Name(name) => name,
            DisplayName::Anomaly => NAME_PLACEHOLDER,
        }
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Which bottom banner a badge gets. Exhibitor wins over speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Exhibitor,
    Speaker,
    Attendee(Option<Level>),
}

/// How speaker and exhibitor flags are derived from raw tickets.
#[derive(Debug, Clone)]
pub struct Classifier {
    speaker_emails: HashSet<String>,
    exhibitor_marker: String,
    level_key: String,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            speaker_emails: HashSet::new(),
            exhibitor_marker: DEFAULT_EXHIBITOR_MARKER.to_string(),
            level_key: DEFAULT_LEVEL_KEY.to_string(),
        }
    }
}

impl Classifier {
    pub fn new<I, S>(speaker_emails: I, exhibitor_marker: &str, level_key: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            speaker_emails: speaker_emails
                .into_iter()
                .map(|e| normalize_email(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
            exhibitor_marker: exhibitor_marker.to_lowercase(),
            level_key: level_key.to_string(),
        }
    }

    pub fn level_key(&self) -> &str {
        &self.level_key
    }

    pub fn is_speaker(&self, ticket: &Ticket) -> bool {
        ticket
            .email
            .as_deref()
            .map(|e| self.speaker_emails.contains(&normalize_email(e)))
            .unwrap_or(false)
    }

    pub fn is_exhibitor(&self, ticket: &Ticket) -> bool {
        !self.exhibitor_marker.is_empty()
            && ticket
                .release_title
                .to_lowercase()
                .contains(&self.exhibitor_marker)
    }

    /// Set the speaker and exhibitor flags on a ticket.
    pub fn classify(&self, ticket: &mut Ticket) {
        ticket.speaker = ticket.speaker || self.is_speaker(ticket);
        ticket.exhibitor = ticket.exhibitor || self.is_exhibitor(ticket);
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Ticket {
    /// Experience level read from the answer stored under `key`.
    pub fn level(&self, key: &str) -> Option<Level> {
        self.responses
            .get(key)
            .and_then(|v| v.as_str())
            .and_then(Level::from_response)
    }

    pub fn display_name(&self) -> DisplayName {
        let first = match non_blank(&self.first_name) {
            Some(first) => title_case(first),
            None => return DisplayName::Anomaly,
        };
        match non_blank(&self.last_name).and_then(|last| last.chars().next()) {
            Some(initial) => DisplayName::Name(format!(
                "{} {}.",
                first,
                initial.to_uppercase().collect::<String>()
            )),
            None => DisplayName::Name(first),
        }
    }

    /// Full name used in the QR payload.
    pub fn full_name(&self) -> String {
        if let Some(name) = non_blank(&self.name) {
            return name.to_string();
        }
        let parts: Vec<&str> = [&self.first_name, &self.last_name]
            .into_iter()
            .filter_map(non_blank)
            .collect();
        parts.join(" ")
    }

    /// Text encoded in the QR code on the back of the badge.
    pub fn qr_payload(&self) -> String {
        format!(
            "{} <{}>",
            self.full_name(),
            self.email.as_deref().unwrap_or("").trim()
        )
    }

    pub fn role(&self, level_key: &str) -> Role {
        if self.exhibitor {
            Role::Exhibitor
        } else if self.speaker {
            Role::Speaker
        } else {
            Role::Attendee(self.level(level_key))
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Uppercase the first letter of each word and lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ticket(first: Option<&str>, last: Option<&str>) -> Ticket {
        Ticket {
            reference: "ABCD-1".to_string(),
            first_name: first.map(String::from),
            last_name: last.map(String::from),
            ..Default::default()
        }
    }

    fn with_response(answer: serde_json::Value) -> Ticket {
        let mut t = ticket(Some("Ada"), Some("Lovelace"));
        t.responses.insert(DEFAULT_LEVEL_KEY.to_string(), answer);
        t
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(with_response(json!("Expert")).level(DEFAULT_LEVEL_KEY), Some(Level::Expert));
        assert_eq!(with_response(json!("Beginner")).level(DEFAULT_LEVEL_KEY), Some(Level::Beginner));
        assert_eq!(with_response(json!("unknown-string")).level(DEFAULT_LEVEL_KEY), None);
        assert_eq!(with_response(json!(3)).level(DEFAULT_LEVEL_KEY), None);
        assert_eq!(ticket(Some("Ada"), None).level(DEFAULT_LEVEL_KEY), None);
    }

    #[test]
    fn test_level_icon_count() {
        assert_eq!(level_icon_count(Some(Level::Expert)), 4);
        assert_eq!(level_icon_count(Some(Level::Intermediate)), 2);
        assert_eq!(level_icon_count(None), 0);
    }

    #[test]
    fn test_level_uses_configured_key() {
        let mut t = ticket(Some("Ada"), None);
        t.responses
            .insert("your-python-experience".to_string(), json!("Advanced"));
        assert_eq!(t.level(DEFAULT_LEVEL_KEY), None);
        assert_eq!(t.level("your-python-experience"), Some(Level::Advanced));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(
            ticket(Some("nïçôlàys"), Some("laur")).display_name(),
            DisplayName::Name("Nïçôlàys L.".to_string())
        );
        assert_eq!(
            ticket(Some("mary ann"), Some("o'brien")).display_name(),
            DisplayName::Name("Mary Ann O.".to_string())
        );
        assert_eq!(
            ticket(Some("Ada"), Some("  ")).display_name(),
            DisplayName::Name("Ada".to_string())
        );
    }

    #[test]
    fn test_display_name_anomaly() {
        let name = ticket(None, Some("Lovelace")).display_name();
        assert!(name.is_anomaly());
        assert_eq!(name.text(), NAME_PLACEHOLDER);
        assert!(ticket(Some(" "), None).display_name().is_anomaly());
    }

    #[test]
    fn test_full_name_and_payload() {
        let mut t = ticket(Some("Ada"), Some("Lovelace"));
        t.email = Some("ada@example.com".to_string());
        assert_eq!(t.qr_payload(), "Ada Lovelace <ada@example.com>");

        t.name = Some("Augusta Ada King".to_string());
        assert_eq!(t.full_name(), "Augusta Ada King");
    }

    #[test]
    fn test_exhibitor_takes_precedence() {
        let mut t = ticket(Some("Ada"), None);
        t.exhibitor = true;
        t.speaker = true;
        assert_eq!(t.role(DEFAULT_LEVEL_KEY), Role::Exhibitor);

        t.exhibitor = false;
        assert_eq!(t.role(DEFAULT_LEVEL_KEY), Role::Speaker);

        t.speaker = false;
        assert_eq!(t.role(DEFAULT_LEVEL_KEY), Role::Attendee(None));
    }

    #[test]
    fn test_classifier() {
        let classifier = Classifier::new(["Speaker@Example.ie "], "exhibitor", DEFAULT_LEVEL_KEY);

        let mut speaker = ticket(Some("Sam"), None);
        speaker.email = Some("speaker@example.ie".to_string());
        classifier.classify(&mut speaker);
        assert!(speaker.speaker);
        assert!(!speaker.exhibitor);

        let mut both = speaker.clone();
        both.release_title = "Exhibitor Pass".to_string();
        classifier.classify(&mut both);
        assert!(both.speaker && both.exhibitor);
        assert_eq!(both.role(DEFAULT_LEVEL_KEY), Role::Exhibitor);

        let mut plain = ticket(Some("Pat"), None);
        plain.email = Some("pat@example.ie".to_string());
        classifier.classify(&mut plain);
        assert!(!plain.speaker && !plain.exhibitor);
    }

    #[test]
    fn test_deserialize_api_ticket() {
        let t: Ticket = serde_json::from_value(json!({
            "reference": "OFXL-1",
            "first_name": "Nïçôlàys",
            "last_name": null,
            "email": "someone@example.com",
            "responses": {"python-experience": "Expert"},
            "release_title": "Early Bird",
            "created_at": "2020-07-07T15:10:00.000+01:00",
            "unknown_field": 42
        }))
        .unwrap();
        assert_eq!(t.reference, "OFXL-1");
        assert_eq!(t.last_name, None);
        assert_eq!(t.level(DEFAULT_LEVEL_KEY), Some(Level::Expert));
        assert_eq!(
            t.created_at.unwrap().to_rfc3339(),
            "2020-07-07T14:10:00+00:00"
        );
        assert!(t.updated_at.is_none());
    }
}
