use chrono::{Days, NaiveDate};
use engine::{DATE_FORMAT, EngineError, EntryKind, NewEntry, ResultEngine};

/// Inputs of the "Add New Entry" form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    Description,
    Category,
    Amount,
    Kind,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        Self::Date,
        Self::Description,
        Self::Category,
        Self::Amount,
        Self::Kind,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Description => "Description",
            Self::Category => "Category",
            Self::Amount => "Amount",
            Self::Kind => "Type",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub kind: EntryKind,
}

impl FormState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: date.format(DATE_FORMAT).to_string(),
            description: String::new(),
            category: String::new(),
            amount: String::new(),
            kind: EntryKind::Expense,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Date => &self.date,
            FormField::Description => &self.description,
            FormField::Category => &self.category,
            FormField::Amount => &self.amount,
            FormField::Kind => match self.kind {
                EntryKind::Income => "Income",
                EntryKind::Expense => "Expense",
            },
        }
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Date => Some(&mut self.date),
            FormField::Description => Some(&mut self.description),
            FormField::Category => Some(&mut self.category),
            FormField::Amount => Some(&mut self.amount),
            FormField::Kind => None,
        }
    }

    /// Types `ch` into `field`. Returns `true` if the value changed.
    pub fn input(&mut self, field: FormField, ch: char) -> bool {
        if field == FormField::Kind {
            if ch == ' ' {
                self.toggle_kind();
                return true;
            }
            return false;
        }
        let accepted = match field {
            FormField::Date => ch.is_ascii_digit() || ch == '-',
            FormField::Amount => ch.is_ascii_digit() || ch == '.' || ch == ',',
            _ => !ch.is_control(),
        };
        if !accepted {
            return false;
        }
        match self.text_mut(field) {
            Some(text) => {
                text.push(ch);
                true
            }
            None => false,
        }
    }

    /// Deletes the last character of `field`. Returns `true` if the value
    /// changed.
    pub fn backspace(&mut self, field: FormField) -> bool {
        self.text_mut(field)
            .and_then(|text| text.pop())
            .is_some()
    }

    pub fn toggle_kind(&mut self) {
        self.kind = self.kind.toggled();
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        engine::parse_date(&self.date).ok()
    }

    /// Moves the date by `days`, starting from `fallback` when the current
    /// text is not a valid date.
    pub fn shift_date(&mut self, days: i64, fallback: NaiveDate) {
        let current = self.parsed_date().unwrap_or(fallback);
        let shifted = if days >= 0 {
            current.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            current.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(date) = shifted {
            self.date = date.format(DATE_FORMAT).to_string();
        }
    }

    pub fn accept_category(&mut self, category: &str) {
        self.category = category.to_string();
    }

    /// Validates the form into an entry ready to be stored.
    pub fn to_new_entry(&self) -> ResultEngine<NewEntry> {
        NewEntry::from_input(
            &self.date,
            &self.description,
            &self.category,
            &self.amount,
            self.kind,
        )
    }

    /// Resets the per-entry fields. Date and kind are kept so the view stays
    /// on the same day.
    pub fn clear_after_submit(&mut self) {
        self.description.clear();
        self.category.clear();
        self.amount.clear();
    }
}

/// User-facing text for a rejected submission.
pub fn submit_error_message(err: &EngineError) -> String {
    match err {
        EngineError::MissingField(_) => "Please fill in all fields".to_string(),
        EngineError::InvalidAmount(_) => "Invalid amount".to_string(),
        EngineError::InvalidDate(_) => "Invalid date, use YYYY-MM-DD".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use engine::MoneyCents;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    fn filled() -> FormState {
        let mut form = FormState::new(day(15));
        form.description = "Groceries".to_string();
        form.category = "Food".to_string();
        form.amount = "500".to_string();
        form
    }

    #[test]
    fn every_empty_field_blocks_submission() {
        for field in [
            FormField::Date,
            FormField::Description,
            FormField::Category,
            FormField::Amount,
        ] {
            let mut form = filled();
            while form.backspace(field) {}
            let err = form.to_new_entry().unwrap_err();
            assert_eq!(
                submit_error_message(&err),
                "Please fill in all fields",
                "{field:?}"
            );
        }
    }

    #[test]
    fn filled_form_becomes_entry() {
        let entry = filled().to_new_entry().unwrap();
        assert_eq!(entry.date, day(15));
        assert_eq!(entry.amount, MoneyCents::new(50_000));
        assert_eq!(entry.kind, EntryKind::Expense);
    }

    #[test]
    fn field_filters_reject_unexpected_characters() {
        let mut form = FormState::new(day(1));
        assert!(!form.input(FormField::Amount, 'x'));
        assert!(form.input(FormField::Amount, '1'));
        assert!(form.input(FormField::Amount, ','));
        assert!(!form.input(FormField::Date, '/'));
        assert!(form.input(FormField::Description, ' '));
        assert_eq!(form.amount, "1,");
    }

    #[test]
    fn space_toggles_kind() {
        let mut form = FormState::new(day(1));
        assert!(form.input(FormField::Kind, ' '));
        assert_eq!(form.kind, EntryKind::Income);
        assert!(!form.input(FormField::Kind, 'x'));
        assert_eq!(form.value(FormField::Kind), "Income");
    }

    #[test]
    fn shift_date_crosses_month_and_recovers_from_garbage() {
        let mut form = FormState::new(day(31));
        form.shift_date(1, day(1));
        assert_eq!(form.date, "2024-09-01");

        form.date = "2024-0".to_string();
        form.shift_date(-1, day(10));
        assert_eq!(form.date, "2024-08-09");
    }

    #[test]
    fn clear_keeps_date_and_kind() {
        let mut form = filled();
        form.toggle_kind();
        form.clear_after_submit();
        assert_eq!(form.date, "2024-08-15");
        assert_eq!(form.kind, EntryKind::Income);
        assert!(form.description.is_empty() && form.category.is_empty() && form.amount.is_empty());
    }
}
