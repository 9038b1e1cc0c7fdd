//! templateman - create new files from templates interactively
//!
//! Templates use Jinja2 syntax. Variables the template reads are discovered
//! from its syntax tree and asked for one by one before rendering.

pub mod bindings;
pub mod builtin;
pub mod error;
pub mod loader;
pub mod prompt;
pub mod render;
pub mod resolve;
pub mod runner;
pub mod syntax;

pub use bindings::{extract_bindings, BindingSet};
pub use error::{FixSuggestion, TemplatemanError};
pub use loader::{LoadedTemplate, Location, SearchPath};
pub use prompt::{Prompter, ScriptedPrompter, StdinPrompter};
pub use resolve::{PromptMode, RenderContext, RenderValue};
pub use runner::Runner;
pub use syntax::SyntaxTree;
