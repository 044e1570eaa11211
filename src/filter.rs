//! Time-based ticket selection.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::{BadgeError, Result};
use crate::ticket::Ticket;

/// At most one predicate applies per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketFilter {
    All,
    UpdatedSince(DateTime<Utc>),
    CreatedSince(DateTime<Utc>),
    CreatedOn(NaiveDate),
}

impl TicketFilter {
    /// Build the filter from the optional command line values.
    pub fn from_options(
        updated_since: Option<&str>,
        created_since: Option<&str>,
        created_on: Option<&str>,
    ) -> Result<Self> {
        match (updated_since, created_since, created_on) {
            (None, None, None) => Ok(TicketFilter::All),
            (Some(ts), None, None) => Ok(TicketFilter::UpdatedSince(parse_timestamp(ts)?)),
            (None, Some(ts), None) => Ok(TicketFilter::CreatedSince(parse_timestamp(ts)?)),
            (None, None, Some(day)) => Ok(TicketFilter::CreatedOn(parse_date(day)?)),
            _ => Err(BadgeError::ConflictingFilters),
        }
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        match self {
            TicketFilter::All => true,
            TicketFilter::UpdatedSince(ts) => ticket.updated_at.is_some_and(|t| t >= *ts),
            TicketFilter::CreatedSince(ts) => ticket.created_at.is_some_and(|t| t >= *ts),
            TicketFilter::CreatedOn(day) => {
                ticket.created_at.is_some_and(|t| t.date_naive() == *day)
            }
        }
    }

    pub fn apply(&self, tickets: Vec<Ticket>) -> Vec<Ticket> {
        tickets.into_iter().filter(|t| self.matches(t)).collect()
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS]` (UTC) or a bare date (midnight UTC).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(day.and_time(NaiveTime::MIN).and_utc());
    }
    Err(BadgeError::InvalidTimestamp(value.to_string()))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| BadgeError::InvalidTimestamp(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ticket(created: Option<&str>, updated: Option<&str>) -> Ticket {
        Ticket {
            reference: "ABCD-1".to_string(),
            created_at: created.map(|s| parse_timestamp(s).unwrap()),
            updated_at: updated.map(|s| parse_timestamp(s).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 11, 13, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2025-11-13T09:30:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-11-13T10:30:00+01:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-11-13 09:30").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2025-11-13").unwrap(),
            Utc.with_ymd_and_hms(2025, 11, 13, 0, 0, 0).unwrap()
        );
        assert!(matches!(
            parse_timestamp("last tuesday"),
            Err(BadgeError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_only_one_filter() {
        assert_eq!(TicketFilter::from_options(None, None, None).unwrap(), TicketFilter::All);
        assert!(matches!(
            TicketFilter::from_options(Some("2025-01-01"), None, Some("2025-01-02")),
            Err(BadgeError::ConflictingFilters)
        ));
        assert!(matches!(
            TicketFilter::from_options(Some("2025-01-01"), Some("2025-01-01"), None),
            Err(BadgeError::ConflictingFilters)
        ));
    }

    #[test]
    fn test_updated_since() {
        let filter = TicketFilter::from_options(Some("2025-06-01 12:00"), None, None).unwrap();
        assert!(filter.matches(&ticket(None, Some("2025-06-01T12:00:00Z"))));
        assert!(filter.matches(&ticket(None, Some("2025-07-01"))));
        assert!(!filter.matches(&ticket(None, Some("2025-06-01T11:59:59Z"))));
        assert!(!filter.matches(&ticket(Some("2025-07-01"), None)));
    }

    #[test]
    fn test_created_on_day() {
        let filter = TicketFilter::from_options(None, None, Some("2025-06-01")).unwrap();
        let tickets = vec![
            ticket(Some("2025-06-01T00:00:00Z"), None),
            ticket(Some("2025-06-01T23:59:59Z"), None),
            ticket(Some("2025-06-02T00:00:00Z"), None),
            ticket(None, None),
        ];
        assert_eq!(filter.apply(tickets).len(), 2);
    }

    #[test]
    fn test_created_since() {
        let filter = TicketFilter::from_options(None, Some("2025-06-01"), None).unwrap();
        assert!(filter.matches(&ticket(Some("2025-06-03"), None)));
        assert!(!filter.matches(&ticket(Some("2025-05-31"), Some("2025-06-03"))));
    }
}
