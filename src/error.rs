//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum TemplatemanError {
    #[error("template '{name}' not found")]
    TemplateNotFound {
        name: String,
        /// Locations that were searched, in search order
        searched: Vec<String>,
    },

    #[error("Syntax error in template {name}: {details}")]
    TemplateSyntax { name: String, details: String },

    #[error("Failed to render template {name}: {details}")]
    Render { name: String, details: String },

    #[error("Aborted while prompting for '{name}'")]
    PromptAborted { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FixSuggestion for TemplatemanError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            TemplatemanError::TemplateNotFound { .. } => {
                Some("Run with --list to see available templates, or add a directory with -d")
            }
            TemplatemanError::TemplateSyntax { .. } => {
                Some("Check block tags ({% %}) and expressions ({{ }}) are balanced")
            }
            TemplatemanError::Render { .. } => {
                Some("Check filters and functions used by the template exist")
            }
            TemplatemanError::PromptAborted { .. } => {
                Some("Use --no-prompt to render with default values")
            }
            TemplatemanError::Io(_) => Some("Check file path and permissions"),
        }
    }
}

impl TemplatemanError {
    /// Lines describing where a missing template was looked for
    pub fn searched_locations(&self) -> &[String] {
        match self {
            TemplatemanError::TemplateNotFound { searched, .. } => searched,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_mentions_name() {
        let err = TemplatemanError::TemplateNotFound {
            name: "missing.txt".to_string(),
            searched: vec!["/tmp/a".to_string(), "<built-in>".to_string()],
        };
        assert_eq!(err.to_string(), "template 'missing.txt' not found");
        assert_eq!(err.searched_locations().len(), 2);
    }

    #[test]
    fn syntax_message_includes_template_and_cause() {
        let err = TemplatemanError::TemplateSyntax {
            name: "broken.txt".to_string(),
            details: "unexpected end of input".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("broken.txt"));
        assert!(msg.contains("unexpected end of input"));
    }

    #[test]
    fn all_variants_have_suggestions() {
        let errors = [
            TemplatemanError::TemplateNotFound {
                name: "x".into(),
                searched: vec![],
            },
            TemplatemanError::TemplateSyntax {
                name: "x".into(),
                details: "y".into(),
            },
            TemplatemanError::Render {
                name: "x".into(),
                details: "y".into(),
            },
            TemplatemanError::PromptAborted { name: "x".into() },
            TemplatemanError::Io(std::io::Error::other("boom")),
        ];
        for err in &errors {
            assert!(err.fix_suggestion().is_some(), "no suggestion for {err:?}");
        }
    }
}
