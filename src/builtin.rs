//! Templates compiled into the binary

/// `(name, source)` of every built-in template
static BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("gitignore", include_str!("../templates/gitignore")),
    ("mit-license", include_str!("../templates/mit-license")),
    ("readme.md", include_str!("../templates/readme.md")),
];

/// Source of the built-in template called `name`
pub fn get(name: &str) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, source)| *source)
}

/// Names of all built-in templates, sorted
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTIN_TEMPLATES.iter().map(|(name, _)| *name)
}
