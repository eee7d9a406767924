use serde::{Deserialize, Serialize};

pub mod entry {
    use super::*;

    /// Discriminates income from expense entries.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum EntryKind {
        Income,
        #[default]
        Expense,
    }

    impl EntryKind {
        /// Returns the canonical string stored in the `type` field.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
            }
        }

        /// Returns the other kind.
        pub fn toggled(self) -> Self {
            match self {
                Self::Income => Self::Expense,
                Self::Expense => Self::Income,
            }
        }
    }

    /// Amount as found in a stored document.
    ///
    /// Older documents store the amount as a string, newer ones as a number.
    /// Readers must accept both.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum Amount {
        Number(f64),
        Text(String),
    }

    /// A raw record of the `entries` collection.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct EntryDocument {
        /// Calendar date, `YYYY-MM-DD`.
        pub date: String,
        pub description: String,
        pub category: String,
        pub amount: Amount,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        pub kind: Option<EntryKind>,
    }

    /// A stored document together with the id the store assigned to it.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct EntryRecord {
        pub id: String,
        #[serde(flatten)]
        pub document: EntryDocument,
    }
}

pub mod suggest {
    use super::*;

    /// Input of the `suggestCategoryPrompt` prompt.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SuggestCategoryInput {
        /// The description of the ledger entry.
        pub description: String,
    }

    /// Output of the `suggestCategoryPrompt` prompt.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SuggestCategoryOutput {
        /// The suggested category for the ledger entry.
        pub category: String,
    }
}
