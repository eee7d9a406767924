//! The module contains the `LedgerEntry` type, the typed shape of a record of
//! the `entries` collection.
//!
//! Both expenses and income are represented by `LedgerEntry`; the
//! [`EntryKind`] tells them apart.
use api_types::entry::{Amount, EntryDocument, EntryKind, EntryRecord};
use chrono::NaiveDate;
use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Wire format of entry dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Category label that marks an entry as income when the record carries no
/// explicit `type`.
const INCOME_LABEL: &str = "income";

/// A stored income or expense.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: MoneyCents,
    pub kind: EntryKind,
}

impl LedgerEntry {
    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }
}

impl TryFrom<&EntryRecord> for LedgerEntry {
    type Error = EngineError;

    fn try_from(record: &EntryRecord) -> Result<Self, Self::Error> {
        let doc = &record.document;
        Ok(Self {
            id: record.id.clone(),
            date: parse_date(&doc.date)?,
            description: doc.description.clone(),
            category: doc.category.clone(),
            amount: coerce_amount(&doc.amount)?,
            kind: resolve_kind(doc.kind, &doc.category),
        })
    }
}

/// A validated entry, ready to be appended to the collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: MoneyCents,
    pub kind: EntryKind,
}

impl NewEntry {
    /// Validates raw form input.
    ///
    /// Every field is required; blank text counts as missing. The amount must
    /// parse as a non-negative decimal and the date as `YYYY-MM-DD`.
    pub fn from_input(
        date: &str,
        description: &str,
        category: &str,
        amount: &str,
        kind: EntryKind,
    ) -> ResultEngine<Self> {
        let date = required(date, "date")?;
        let description = required(description, "description")?;
        let category = required(category, "category")?;
        let amount = required(amount, "amount")?;

        Ok(Self {
            date: parse_date(date)?,
            description: description.to_string(),
            category: category.to_string(),
            amount: MoneyCents::parse_entry_amount(amount)?,
            kind,
        })
    }

    /// Builds the document stored in the collection.
    pub fn to_document(&self) -> EntryDocument {
        EntryDocument {
            date: self.date.format(DATE_FORMAT).to_string(),
            description: self.description.clone(),
            category: self.category.clone(),
            amount: Amount::Number(self.amount.to_major()),
            kind: Some(self.kind),
        }
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| EngineError::InvalidDate(value.to_string()))
}

/// Coerces a stored amount, string or number, to cents.
pub fn coerce_amount(amount: &Amount) -> ResultEngine<MoneyCents> {
    let cents = match amount {
        Amount::Number(value) => MoneyCents::from_major(*value)?,
        Amount::Text(text) => match text.parse::<MoneyCents>() {
            Ok(cents) => cents,
            // Strings written by other clients may carry more than two decimals.
            Err(err) => match text.trim().parse::<f64>() {
                Ok(value) => MoneyCents::from_major(value)?,
                Err(_) => return Err(err),
            },
        },
    };
    if cents.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "negative stored amount {cents}"
        )));
    }
    Ok(cents)
}

/// Resolves the kind of a stored record.
///
/// An explicit `type` wins; records without one are classified by their
/// category label.
pub fn resolve_kind(explicit: Option<EntryKind>, category: &str) -> EntryKind {
    if let Some(kind) = explicit {
        return kind;
    }
    if normalize_label(category) == INCOME_LABEL {
        EntryKind::Income
    } else {
        EntryKind::Expense
    }
}

fn normalize_label(value: &str) -> String {
    value.nfkc().collect::<String>().trim().to_lowercase()
}

fn required<'a>(value: &'a str, field: &'static str) -> ResultEngine<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::MissingField(field));
    }
    Ok(trimmed)
}
