//! Variable discovery for templates
//!
//! Works out, from the syntax tree alone, which names a template needs from
//! the user, which of them are iterated over by `for` loops, and which have a
//! literal fallback given through the `default` filter.

use std::collections::{HashMap, HashSet};

use minijinja::Value;
use tracing::debug;

use crate::syntax::{NameContext, Node, SyntaxTree};

/// Names a template needs, with their loop usage and defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingSet {
    /// Free names in first-seen order
    names: Vec<String>,
    /// Names used as the bare iterable of a `for` loop
    iterables: HashSet<String>,
    /// Literal fallbacks from `name|default(literal)`
    defaults: HashMap<String, String>,
}

impl BindingSet {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iterables(&self) -> &HashSet<String> {
        &self.iterables
    }

    pub fn defaults(&self) -> &HashMap<String, String> {
        &self.defaults
    }

    pub fn is_iterable(&self, name: &str) -> bool {
        self.iterables.contains(name)
    }

    /// Discovered default for `name`, empty when there is none
    pub fn default_for(&self, name: &str) -> &str {
        self.defaults.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Analyze a parsed template
pub fn extract_bindings(tree: &SyntaxTree) -> BindingSet {
    let bindings = BindingSet {
        names: find_names(tree),
        iterables: find_iterables(tree),
        defaults: find_defaults(tree),
    };

    debug!(
        names = ?bindings.names,
        iterables = ?bindings.iterables,
        defaults = ?bindings.defaults,
        "extracted template bindings"
    );

    bindings
}

/// Names read by the template, in first-seen order.
///
/// The seen set is shared between every context: a name whose first
/// occurrence binds it (loop variable, `set` target, macro parameter) is never
/// reported, even when it is read again later in the template. Loop variables
/// drop out this way, but so does a variable that is first assigned and
/// elsewhere expected from the user.
pub fn find_names(tree: &SyntaxTree) -> Vec<String> {
    let mut names = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    tree.walk(&mut |node| {
        if let Node::Name { id, ctx } = node {
            if seen.contains(id) {
                return;
            }
            if *ctx == NameContext::Load {
                names.push(id.clone());
            }
            seen.insert(id.clone());
        }
    });

    names
}

/// Names iterated over directly by a `for` loop.
///
/// Loops over computed expressions (`items|sort`, `range(3)`, literal lists)
/// are not reported.
pub fn find_iterables(tree: &SyntaxTree) -> HashSet<String> {
    let mut iterables = HashSet::new();

    tree.walk(&mut |node| {
        if let Node::Loop(l) = node {
            if let Some(name) = l.iter.as_name() {
                iterables.insert(name.to_string());
            }
        }
    });

    iterables
}

/// Literal defaults from `name|default(literal)`; the last one seen wins.
pub fn find_defaults(tree: &SyntaxTree) -> HashMap<String, String> {
    let mut defaults = HashMap::new();

    tree.walk(&mut |node| {
        let Node::Filter(f) = node else {
            return;
        };
        if f.name != "default" {
            return;
        }
        let Some(name) = f.target.as_ref().and_then(Node::as_name) else {
            return;
        };
        if let Some(Node::Const(value)) = f.args.first() {
            defaults.insert(name.to_string(), literal_text(value));
        }
    });

    defaults
}

/// Text form of a literal as offered at the prompt
fn literal_text(value: &Value) -> String {
    if value.is_none() || value.is_undefined() {
        return String::new();
    }
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}
