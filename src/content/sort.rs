// src/content/sort.rs
//! Date parsing and ordering of filtered collections.
//!
//! Items whose sort field parses are ordered by timestamp. Items whose field is
//! missing or unparseable go after all of them and keep their arrival order.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::content::types::ContentItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Publication date.
    Date,
    /// Scheduled date of an event.
    EventDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: Direction,
}

impl SortOrder {
    pub fn newest_first() -> Self {
        Self {
            field: SortField::Date,
            direction: Direction::Descending,
        }
    }

    pub fn soonest_event_first() -> Self {
        Self {
            field: SortField::EventDate,
            direction: Direction::Ascending,
        }
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// `%B` also accepts abbreviated month names when parsing.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%d %B %Y", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse the date formats seen across both stores and the seed bundle:
/// RFC 3339 timestamps, Postgres `timestamptz` text, RFC 2822, ISO dates and
/// display dates such as `January 15, 2024`. Naive values are taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for f in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, f) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for f in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, f) {
            return Some(dt.and_utc());
        }
    }
    for f in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, f) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

fn compare_keys(a: Option<i64>, b: Option<i64>, direction: Direction) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => match direction {
            Direction::Ascending => x.cmp(&y),
            Direction::Descending => y.cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of `items` by `order`.
pub fn sort_items<T: ContentItem>(items: Vec<T>, order: SortOrder) -> Vec<T> {
    let mut keyed: Vec<(Option<i64>, T)> = items
        .into_iter()
        .map(|it| {
            let key = it
                .date_field(order.field)
                .and_then(parse_date)
                .map(|d| d.timestamp_millis());
            (key, it)
        })
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(*a, *b, order.direction));
    keyed.into_iter().map(|(_, it)| it).collect()
}
