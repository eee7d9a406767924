//! Category suggestions for ledger entries.
//!
//! A description goes in, one category label comes out. The label is only a
//! hint: callers show it next to the category field and never apply it on
//! their own.
use std::future::Future;

use api_types::suggest::{SuggestCategoryInput, SuggestCategoryOutput};

pub use error::SuggestError;
pub use gemini::{GeminiConfig, GeminiSuggester};
pub use prompt::{PROMPT_NAME, output_schema, render_prompt};

mod error;
mod gemini;
mod prompt;

/// Text shown in place of a suggestion when the request failed.
pub const ERROR_PLACEHOLDER: &str = "Error suggesting category";

/// Something that can turn a description into a category.
pub trait CategorySuggester: Send + Sync + 'static {
    fn suggest(
        &self,
        input: SuggestCategoryInput,
    ) -> impl Future<Output = Result<SuggestCategoryOutput, SuggestError>> + Send;
}

/// Outcome of one suggestion round, as displayed to the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Suggestion {
    #[default]
    None,
    Category(String),
    Failed,
}

impl Suggestion {
    /// The text to display, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Category(category) => Some(category.as_str()),
            Self::Failed => Some(ERROR_PLACEHOLDER),
        }
    }

    /// The category the user can accept; failures offer nothing.
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::Category(category) => Some(category.as_str()),
            _ => None,
        }
    }
}

/// Runs one suggestion round for `description`.
///
/// A blank description (empty or whitespace only) yields
/// [`Suggestion::None`] without calling the suggester. Otherwise the
/// description is sent as typed. Errors are logged and reported as
/// [`Suggestion::Failed`].
pub async fn suggest_category<S: CategorySuggester>(suggester: &S, description: &str) -> Suggestion {
    if description.trim().is_empty() {
        return Suggestion::None;
    }

    let input = SuggestCategoryInput {
        description: description.to_string(),
    };
    match suggester.suggest(input).await {
        Ok(output) => Suggestion::Category(output.category),
        Err(err) => {
            tracing::error!("failed to suggest category: {err}");
            Suggestion::Failed
        }
    }
}
