//! Turns discovered bindings into concrete render values

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::bindings::BindingSet;
use crate::error::TemplatemanError;
use crate::prompt::Prompter;

/// Whether values are asked for or taken from the template defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptMode {
    #[default]
    Interactive,
    Batch,
}

/// Value bound to a template name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RenderValue {
    Scalar(String),
    Tokens(Vec<String>),
}

/// Name → value mapping handed to the renderer
pub type RenderContext = BTreeMap<String, RenderValue>;

/// Split on runs of whitespace, dropping empty tokens
pub fn split_tokens(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

/// Resolve every name of `bindings`, in order.
///
/// In batch mode the prompter is never used.
pub fn resolve_values(
    bindings: &BindingSet,
    mode: PromptMode,
    prompter: &mut dyn Prompter,
) -> Result<RenderContext, TemplatemanError> {
    let mut values = RenderContext::new();

    for name in bindings.names() {
        let default = bindings.default_for(name);
        let raw = match mode {
            PromptMode::Interactive => prompter.prompt(name, default)?,
            PromptMode::Batch => default.to_string(),
        };

        let value = if bindings.is_iterable(name) {
            RenderValue::Tokens(split_tokens(&raw))
        } else {
            RenderValue::Scalar(raw)
        };
        debug!(name = %name, value = ?value, "resolved template value");
        values.insert(name.clone(), value);
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::extract_bindings;
    use crate::prompt::ScriptedPrompter;
    use crate::syntax::SyntaxTree;

    fn bindings(source: &str) -> BindingSet {
        extract_bindings(&SyntaxTree::parse("test", source).unwrap())
    }

    #[test]
    fn split_collapses_whitespace() {
        assert_eq!(split_tokens("a  b   c"), ["a", "b", "c"]);
        assert_eq!(split_tokens("  lead\ttrail \n"), ["lead", "trail"]);
    }

    #[test]
    fn split_empty_is_empty() {
        assert!(split_tokens("").is_empty());
        assert!(split_tokens("   ").is_empty());
    }

    #[test]
    fn batch_uses_defaults_without_prompting() {
        let b = bindings(r#"{{ name|default("World") }} {{ other }}"#);
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let values = resolve_values(&b, PromptMode::Batch, &mut prompter).unwrap();

        assert!(prompter.asked().is_empty());
        assert_eq!(values["name"], RenderValue::Scalar("World".to_string()));
        assert_eq!(values["other"], RenderValue::Scalar(String::new()));
    }

    #[test]
    fn interactive_asks_in_name_order_with_defaults() {
        let b = bindings(r#"{{ b|default("x") }}{{ a }}"#);
        let mut prompter = ScriptedPrompter::new(["", "typed"]);
        let values = resolve_values(&b, PromptMode::Interactive, &mut prompter).unwrap();

        assert_eq!(
            prompter.asked(),
            [
                ("b".to_string(), "x".to_string()),
                ("a".to_string(), String::new())
            ]
        );
        assert_eq!(values["b"], RenderValue::Scalar("x".to_string()));
        assert_eq!(values["a"], RenderValue::Scalar("typed".to_string()));
    }

    #[test]
    fn iterable_answer_is_split() {
        let b = bindings("{% for item in items %}{{ item }}{% endfor %}");
        let mut prompter = ScriptedPrompter::new(["x  y"]);
        let values = resolve_values(&b, PromptMode::Interactive, &mut prompter).unwrap();

        assert_eq!(
            values["items"],
            RenderValue::Tokens(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn iterable_default_is_split_in_batch() {
        let b = bindings(r#"{% for t in tags %}{% endfor %}{{ tags|default("a b") }}"#);
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let values = resolve_values(&b, PromptMode::Batch, &mut prompter).unwrap();

        assert_eq!(
            values["tags"],
            RenderValue::Tokens(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn iterable_without_default_is_empty_sequence() {
        let b = bindings("{% for t in tags %}{% endfor %}");
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let values = resolve_values(&b, PromptMode::Batch, &mut prompter).unwrap();
        assert_eq!(values["tags"], RenderValue::Tokens(Vec::new()));
    }

    #[test]
    fn prompt_failure_propagates() {
        let b = bindings("{{ a }}");
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let err = resolve_values(&b, PromptMode::Interactive, &mut prompter).unwrap_err();
        assert!(matches!(err, TemplatemanError::PromptAborted { .. }));
    }
}
