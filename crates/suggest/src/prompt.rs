//! The `suggestCategoryPrompt` template and its output schema.
use serde_json::{Value, json};

pub const PROMPT_NAME: &str = "suggestCategoryPrompt";

const TEMPLATE: &str = "You are an expert financial assistant. Based on the description of a ledger entry, suggest the most appropriate category.

Description: {{{description}}}

Suggest a category:";

const PLACEHOLDER: &str = "{{{description}}}";

/// Fills the template. The description is inserted verbatim, without any
/// escaping.
pub fn render_prompt(description: &str) -> String {
    TEMPLATE.replace(PLACEHOLDER, description)
}

/// Response schema requested from the model: one required string field.
pub fn output_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "category": {
                "type": "STRING",
                "description": "The suggested category for the ledger entry."
            }
        },
        "required": ["category"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_description_verbatim() {
        let prompt = render_prompt("Dinner at <Luigi's> & co");
        assert!(prompt.starts_with("You are an expert financial assistant."));
        assert!(prompt.contains("\n\nDescription: Dinner at <Luigi's> & co\n\n"));
        assert!(prompt.ends_with("Suggest a category:"));
        assert!(!prompt.contains("{{{"));
    }

    #[test]
    fn schema_requires_category() {
        let schema = output_schema();
        assert_eq!(schema["required"], json!(["category"]));
        assert_eq!(schema["properties"]["category"]["type"], "STRING");
    }
}
