//! Rendering with minijinja

use minijinja::{AutoEscape, Environment, ErrorKind};

use crate::error::TemplatemanError;
use crate::loader::LoadedTemplate;
use crate::resolve::RenderContext;

/// Engine environment used for every template.
///
/// Blocks swallow the newline that follows them, and nothing is escaped:
/// templates produce plain files whatever their extension.
fn environment<'source>() -> Environment<'source> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env
}

/// Render `template` with `values`
pub fn render(template: &LoadedTemplate, values: &RenderContext) -> Result<String, TemplatemanError> {
    let env = environment();
    let name = template.name.as_str();

    let compiled = env
        .template_from_named_str(name, &template.source)
        .map_err(|err| engine_error(name, err))?;

    compiled.render(values).map_err(|err| engine_error(name, err))
}

fn engine_error(name: &str, err: minijinja::Error) -> TemplatemanError {
    match err.kind() {
        ErrorKind::SyntaxError => TemplatemanError::TemplateSyntax {
            name: name.to_string(),
            details: err.to_string(),
        },
        _ => TemplatemanError::Render {
            name: name.to_string(),
            details: err.to_string(),
        },
    }
}
