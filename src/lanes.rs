//! Registration desk lanes by leading reference character

use std::collections::BTreeMap;
use std::fmt;

/// A run of reference initials handled by one desk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lane {
    pub starts_at: char,
    pub ends_at: char,
    pub count: usize,
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{} ({})", self.starts_at, self.ends_at, self.count)
    }
}

/// Split references into roughly `lanes` groups of consecutive initials.
///
/// Initials are compared as-is, in the same order the badges are sorted in.
/// A lane is closed as soon as its running count exceeds the average per
/// lane, so the result can hold fewer lanes than asked for.
pub fn split_lanes<S: AsRef<str>>(references: &[S], lanes: usize) -> Vec<Lane> {
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    for reference in references {
        if let Some(initial) = reference.as_ref().chars().next() {
            *counts.entry(initial).or_default() += 1;
        }
    }

    let estimate = references.len() as f64 / lanes.max(1) as f64;
    let mut out = Vec::new();
    let mut current: Option<Lane> = None;

    for (initial, count) in counts {
        let lane = current.get_or_insert(Lane { starts_at: initial, ends_at: initial, count: 0 });
        lane.ends_at = initial;
        lane.count += count;
        if lane.count as f64 > estimate {
            out.extend(current.take());
        }
    }
    out.extend(current);
    out
}
