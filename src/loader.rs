//! Template lookup across the search path
//!
//! Templates are looked for, in order, in:
//! 1. directories given with `-d`
//! 2. the user directory (`~/.templateman/` unless configured otherwise)
//! 3. built-in templates
//!
//! With `--builtin` the built-in templates are searched first.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::builtin;
use crate::error::TemplatemanError;

/// Name of the per-user template directory inside the home directory
pub const USER_DIR_NAME: &str = ".templateman";

/// One place templates are looked up in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Dir(PathBuf),
    Builtin,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Dir(path) => write!(f, "{}", path.display()),
            Location::Builtin => f.write_str("<built-in>"),
        }
    }
}

/// Template source found on the search path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTemplate {
    pub name: String,
    pub source: String,
    pub origin: Location,
}

/// Ordered list of template locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    locations: Vec<Location>,
}

impl SearchPath {
    /// Build the search order from explicit directories and the user directory
    pub fn new(template_dirs: &[PathBuf], user_dir: Option<PathBuf>, prefer_builtin: bool) -> Self {
        let dirs = template_dirs
            .iter()
            .cloned()
            .chain(user_dir)
            .map(Location::Dir);

        let locations = if prefer_builtin {
            std::iter::once(Location::Builtin).chain(dirs).collect()
        } else {
            dirs.chain(std::iter::once(Location::Builtin)).collect()
        };

        Self { locations }
    }

    /// `~/.templateman/`, if the home directory is known
    pub fn default_user_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(USER_DIR_NAME))
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Find `name` in the first location that has it
    pub fn load(&self, name: &str) -> Result<LoadedTemplate, TemplatemanError> {
        let pieces = split_template_name(name);

        for location in &self.locations {
            debug!(template = %name, location = %location, "looking up template");
            let source = match location {
                Location::Builtin => builtin::get(name).map(str::to_string),
                Location::Dir(dir) => match &pieces {
                    Some(pieces) => read_from_dir(dir, pieces)?,
                    None => None,
                },
            };

            if let Some(source) = source {
                info!(template = %name, location = %location, "found template");
                return Ok(LoadedTemplate {
                    name: name.to_string(),
                    source,
                    origin: location.clone(),
                });
            }
        }

        Err(TemplatemanError::TemplateNotFound {
            name: name.to_string(),
            searched: self.locations.iter().map(ToString::to_string).collect(),
        })
    }

    /// Every template reachable through the search path, by name.
    ///
    /// A name present in several locations is reported for the first one,
    /// which is the one [`SearchPath::load`] would pick.
    pub fn list(&self) -> Result<BTreeMap<String, Location>, TemplatemanError> {
        let mut found = BTreeMap::new();

        for location in &self.locations {
            match location {
                Location::Builtin => {
                    for name in builtin::names() {
                        found
                            .entry(name.to_string())
                            .or_insert_with(|| location.clone());
                    }
                }
                Location::Dir(dir) => {
                    for name in list_dir(dir)? {
                        found.entry(name).or_insert_with(|| location.clone());
                    }
                }
            }
        }

        Ok(found)
    }
}

/// Split a `/`-separated template name into path pieces.
///
/// Empty and `.` pieces are dropped. Returns None for names that cannot be
/// resolved inside a directory: ones that climb with `..`, ones that carry a
/// platform separator inside a piece, or ones with no pieces left.
fn split_template_name(name: &str) -> Option<Vec<&str>> {
    let mut pieces = Vec::new();
    for piece in name.split('/') {
        if piece == ".." || (MAIN_SEPARATOR != '/' && piece.contains(MAIN_SEPARATOR)) {
            return None;
        }
        if !piece.is_empty() && piece != "." {
            pieces.push(piece);
        }
    }
    if pieces.is_empty() {
        None
    } else {
        Some(pieces)
    }
}

fn read_from_dir(dir: &Path, pieces: &[&str]) -> Result<Option<String>, TemplatemanError> {
    let path = pieces.iter().fold(dir.to_path_buf(), |path, piece| path.join(piece));
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(&path)?))
}

/// Template names of all files below `dir`, using `/` as separator
fn list_dir(dir: &Path) -> Result<Vec<String>, TemplatemanError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).min_depth(1) {
        let entry = entry.map_err(|e| TemplatemanError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let pieces: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        names.push(pieces.join("/"));
    }
    Ok(names)
}
