//! Attendance across conference years, one entry per email address.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ticket::Ticket;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    pub name: String,
    pub years: Vec<i32>,
}

/// Merge the ticket lists of several years by email.
///
/// Tickets without an email are left out. The name comes from the last
/// year given, years keep the order they were given in, and the result is
/// sorted by email.
pub fn attendees_by_year(editions: &[(i32, Vec<Ticket>)]) -> Vec<Attendee> {
    let mut attendees: BTreeMap<String, Attendee> = BTreeMap::new();
    for (year, tickets) in editions {
        for ticket in tickets {
            let email = match ticket.email.as_deref().map(str::trim) {
                Some(email) if !email.is_empty() => email,
                _ => continue,
            };
            let entry = attendees.entry(email.to_string()).or_insert_with(|| Attendee {
                email: email.to_string(),
                name: String::new(),
                years: Vec::new(),
            });
            entry.name = ticket.full_name();
            entry.years.push(*year);
        }
    }
    attendees.into_values().collect()
}

pub fn save_attendees(attendees: &[Attendee], path: &Path) -> Result<()> {
    let contents = serde_json::to_string_pretty(attendees)?;
    std::fs::write(path, contents)?;
    Ok(())
}
