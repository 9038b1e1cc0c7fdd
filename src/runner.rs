//! One template rendering, end to end
//!
//! load → parse → extract bindings → resolve values → render

use tracing::info;

use crate::bindings::{extract_bindings, BindingSet};
use crate::error::TemplatemanError;
use crate::loader::{LoadedTemplate, SearchPath};
use crate::prompt::Prompter;
use crate::render::render;
use crate::resolve::{resolve_values, PromptMode};
use crate::syntax::SyntaxTree;

/// A template loaded and analyzed, not yet rendered
#[derive(Debug, Clone)]
pub struct PreparedTemplate {
    pub template: LoadedTemplate,
    pub bindings: BindingSet,
}

/// Renders named templates from a search path
#[derive(Debug, Clone)]
pub struct Runner {
    search_path: SearchPath,
    mode: PromptMode,
}

impl Runner {
    pub fn new(search_path: SearchPath, mode: PromptMode) -> Self {
        Self { search_path, mode }
    }

    /// Load and analyze `name`. Fails before any prompting happens.
    pub fn prepare(&self, name: &str) -> Result<PreparedTemplate, TemplatemanError> {
        let template = self.search_path.load(name)?;
        let tree = SyntaxTree::parse(&template.name, &template.source)?;
        let bindings = extract_bindings(&tree);

        info!(
            template = %template.name,
            origin = %template.origin,
            names = bindings.names().len(),
            "prepared template"
        );

        Ok(PreparedTemplate { template, bindings })
    }

    /// Render `name`, asking `prompter` for values in interactive mode
    pub fn run(&self, name: &str, prompter: &mut dyn Prompter) -> Result<String, TemplatemanError> {
        let prepared = self.prepare(name)?;
        let values = resolve_values(&prepared.bindings, self.mode, prompter)?;
        render(&prepared.template, &values)
    }
}
