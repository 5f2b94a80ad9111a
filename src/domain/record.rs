//! Canonical accounting record.
//!
//! Every upstream transaction kind is mapped into a [`Record`]. Records are
//! built once through [`RecordBuilder`], which coerces loosely typed input
//! (decimal strings, raw subunits, millisecond timestamps, lower-case currency
//! codes) and rejects anything it cannot interpret. A record is never mutated
//! after construction.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use super::error::RecordError;
use super::id::ExternalId;
use super::money::MinorUnits;

/// Direction of value flow relative to the account holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Value received.
    In,
    /// Value sent.
    Out,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            _ => Err(RecordError::InvalidDirection {
                value: s.to_string(),
            }),
        }
    }
}

/// A normalized transaction ready for the downstream ledger.
///
/// Use [`Record::builder()`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RecordDraft")]
pub struct Record {
    amount: MinorUnits,
    #[serde(rename = "type")]
    direction: Direction,
    currency: String,
    description: String,
    tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_id: Option<ExternalId>,
    #[serde(serialize_with = "serialize_date")]
    date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary_amount: Option<MinorUnits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary_currency: Option<String>,
}

impl Record {
    /// Create a builder for constructing a record.
    #[must_use]
    pub fn builder() -> RecordBuilder {
        RecordBuilder::new()
    }

    pub fn amount(&self) -> MinorUnits {
        self.amount
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn external_id(&self) -> Option<&ExternalId> {
        self.external_id.as_ref()
    }

    /// When the transaction happened upstream.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn secondary_amount(&self) -> Option<MinorUnits> {
        self.secondary_amount
    }

    pub fn secondary_currency(&self) -> Option<&str> {
        self.secondary_currency.as_deref()
    }
}

/// Format used on the wire: `2023-11-14T22:13:20.000Z`.
#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_date<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(date))
}

#[derive(Debug, Clone)]
enum AmountInput {
    Major(Decimal),
    MajorText(String),
    Minor(MinorUnits),
    MinorText(String),
}

impl AmountInput {
    fn resolve(self) -> Result<MinorUnits, RecordError> {
        match self {
            Self::Major(value) => MinorUnits::from_major(value),
            Self::MajorText(text) => MinorUnits::parse_major(&text),
            Self::Minor(units) => Ok(units),
            Self::MinorText(text) => text.parse(),
        }
    }
}

#[derive(Debug, Clone)]
enum DateInput {
    Parsed(DateTime<Utc>),
    Millis(i64),
    Text(String),
}

impl DateInput {
    fn resolve(self) -> Result<DateTime<Utc>, RecordError> {
        match self {
            Self::Parsed(date) => Ok(date),
            Self::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| RecordError::InvalidDate {
                    value: ms.to_string(),
                }),
            Self::Text(text) => DateTime::parse_from_rfc3339(text.trim())
                .map(|d| d.with_timezone(&Utc))
                .map_err(|_| RecordError::InvalidDate { value: text }),
        }
    }
}

fn normalize_currency(raw: String) -> Result<String, RecordError> {
    let code = raw.trim().to_ascii_uppercase();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(RecordError::InvalidCurrency { value: raw });
    }
    Ok(code)
}

/// Builder for constructing [`Record`] instances.
///
/// # Example
///
/// ```
/// use ledgerbridge::domain::record::{Direction, Record};
///
/// let record = Record::builder()
///     .amount_str("12.345")
///     .direction(Direction::In)
///     .currency("usdt")
///     .description("Deposit USDT to Binance")
///     .date_millis(1_700_000_000_000)
///     .build()
///     .unwrap();
///
/// assert_eq!(record.amount().get(), 1235);
/// assert_eq!(record.currency(), "USDT");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    amount: Option<AmountInput>,
    direction: Option<String>,
    currency: Option<String>,
    description: Option<String>,
    tag: Option<String>,
    external_id: Option<ExternalId>,
    date: Option<DateInput>,
    secondary_amount: Option<AmountInput>,
    secondary_currency: Option<String>,
}

impl RecordBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount in major units; scaled by 100 and rounded.
    pub fn amount(mut self, value: Decimal) -> Self {
        self.amount = Some(AmountInput::Major(value));
        self
    }

    /// Amount as a major-unit decimal string; scaled by 100 and rounded.
    pub fn amount_str(mut self, value: impl Into<String>) -> Self {
        self.amount = Some(AmountInput::MajorText(value.into()));
        self
    }

    /// Amount already expressed in minor units.
    pub fn amount_minor(mut self, units: impl Into<MinorUnits>) -> Self {
        self.amount = Some(AmountInput::Minor(units.into()));
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction.as_str().to_string());
        self
    }

    /// Direction as text (`in` / `out`), validated on build.
    pub fn direction_str(mut self, value: impl Into<String>) -> Self {
        self.direction = Some(value.into());
        self
    }

    /// Currency code; upper-cased on build.
    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = Some(code.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }

    pub fn external_id(mut self, id: ExternalId) -> Self {
        self.external_id = Some(id);
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(DateInput::Parsed(date));
        self
    }

    /// Date as milliseconds since the Unix epoch.
    pub fn date_millis(mut self, ms: i64) -> Self {
        self.date = Some(DateInput::Millis(ms));
        self
    }

    /// Date as an RFC 3339 string.
    pub fn date_str(mut self, text: impl Into<String>) -> Self {
        self.date = Some(DateInput::Text(text.into()));
        self
    }

    /// Fiat leg of a trade, as a major-unit decimal string.
    pub fn secondary_str(mut self, amount: impl Into<String>, currency: impl Into<String>) -> Self {
        self.secondary_amount = Some(AmountInput::MajorText(amount.into()));
        self.secondary_currency = Some(currency.into());
        self
    }

    /// Build the record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] if a required field is missing or any value
    /// cannot be coerced.
    pub fn build(self) -> Result<Record, RecordError> {
        let amount = self
            .amount
            .ok_or(RecordError::MissingField { field: "amount" })?
            .resolve()?;
        let direction = self
            .direction
            .ok_or(RecordError::MissingField { field: "type" })?
            .parse::<Direction>()?;
        let currency = normalize_currency(
            self.currency
                .ok_or(RecordError::MissingField { field: "currency" })?,
        )?;
        let description = self
            .description
            .ok_or(RecordError::MissingField {
                field: "description",
            })?;
        if description.trim().is_empty() {
            return Err(RecordError::Empty {
                field: "description",
            });
        }
        let date = self
            .date
            .ok_or(RecordError::MissingField { field: "date" })?
            .resolve()?;

        let secondary_amount = self.secondary_amount.map(AmountInput::resolve).transpose()?;
        let secondary_currency = self
            .secondary_currency
            .map(normalize_currency)
            .transpose()?;

        Ok(Record {
            amount,
            direction,
            currency,
            description,
            tag: self.tag,
            external_id: self.external_id,
            date,
            secondary_amount,
            secondary_currency,
        })
    }
}

/// Loosely typed shape accepted when deserializing a record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordDraft {
    amount: Option<serde_json::Value>,
    #[serde(rename = "type")]
    direction: Option<String>,
    currency: Option<String>,
    description: Option<String>,
    tag: Option<String>,
    external_id: Option<String>,
    date: Option<String>,
    secondary_amount: Option<serde_json::Value>,
    secondary_currency: Option<String>,
}

fn minor_from_json(value: serde_json::Value) -> Result<AmountInput, RecordError> {
    match value {
        serde_json::Value::String(text) => Ok(AmountInput::MinorText(text)),
        serde_json::Value::Number(n) => match n.as_u64() {
            Some(units) => Ok(AmountInput::Minor(MinorUnits::new(units))),
            None if n.as_i64().is_some_and(|v| v < 0) => Err(RecordError::NegativeAmount {
                value: n.to_string(),
            }),
            None => Err(RecordError::InvalidAmount {
                value: n.to_string(),
                reason: "not an integer".into(),
            }),
        },
        other => Err(RecordError::InvalidAmount {
            value: other.to_string(),
            reason: "expected string or integer".into(),
        }),
    }
}

impl TryFrom<RecordDraft> for Record {
    type Error = RecordError;

    fn try_from(draft: RecordDraft) -> Result<Self, Self::Error> {
        let mut builder = RecordBuilder::new().tag(draft.tag);
        builder.amount = draft.amount.map(minor_from_json).transpose()?;
        builder.direction = draft.direction;
        builder.currency = draft.currency;
        builder.description = draft.description;
        builder.external_id = draft.external_id.map(ExternalId::new);
        builder.date = draft.date.map(DateInput::Text);
        builder.secondary_amount = draft.secondary_amount.map(minor_from_json).transpose()?;
        builder.secondary_currency = draft.secondary_currency;
        builder.build()
    }
}
