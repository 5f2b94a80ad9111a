//! Fetch-window watermark.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{format_date, Record};

/// Lower bound of the next fetch window.
///
/// Empty before the first successful cycle, meaning "fetch full history".
/// Only ever moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watermark(Option<DateTime<Utc>>);

impl Watermark {
    /// No lower bound.
    #[must_use]
    pub const fn empty() -> Self {
        Self(None)
    }

    #[must_use]
    pub const fn at(date: DateTime<Utc>) -> Self {
        Self(Some(date))
    }

    /// The fetch-window lower bound, if any.
    #[must_use]
    pub const fn since(self) -> Option<DateTime<Utc>> {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0.is_none()
    }

    /// Move forward to `date`; never moves backwards.
    #[must_use]
    pub fn advance_to(self, date: DateTime<Utc>) -> Self {
        match self.0 {
            Some(current) if current >= date => self,
            _ => Self(Some(date)),
        }
    }

    /// Advance to the latest record date, if there are any records.
    #[must_use]
    pub fn advance_past(self, records: &[Record]) -> Self {
        match latest_date(records) {
            Some(date) => self.advance_to(date),
            None => self,
        }
    }
}

/// Latest upstream date among `records`.
#[must_use]
pub fn latest_date(records: &[Record]) -> Option<DateTime<Utc>> {
    records.iter().map(Record::date).max()
}

impl From<Option<DateTime<Utc>>> for Watermark {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        Self(value)
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(date) => f.write_str(&format_date(date)),
            None => f.write_str("none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Direction;
    use chrono::TimeZone;

    fn record_at(ms: i64) -> Record {
        Record::builder()
            .amount_minor(1u64)
            .direction(Direction::In)
            .currency("USD")
            .description("test")
            .date_millis(ms)
            .build()
            .unwrap()
    }

    #[test]
    fn advances_to_latest_record() {
        let records = vec![record_at(2_000), record_at(5_000), record_at(3_000)];
        let watermark = Watermark::empty().advance_past(&records);

        assert_eq!(
            watermark.since(),
            Some(Utc.timestamp_millis_opt(5_000).unwrap())
        );
    }

    #[test]
    fn never_moves_backwards() {
        let later = Utc.timestamp_millis_opt(10_000).unwrap();
        let watermark = Watermark::at(later).advance_past(&[record_at(1_000)]);

        assert_eq!(watermark.since(), Some(later));
    }

    #[test]
    fn no_records_keeps_watermark() {
        assert!(Watermark::empty().advance_past(&[]).is_empty());
    }

    #[test]
    fn displays_iso_or_none() {
        assert_eq!(Watermark::empty().to_string(), "none");
        assert_eq!(
            Watermark::at(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()).to_string(),
            "2023-11-14T22:13:20.000Z"
        );
    }
}
