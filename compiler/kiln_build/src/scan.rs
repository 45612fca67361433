//! Import scanning.
//!
//! Recognizes only top-level import statements: the `import` keyword at the
//! very start of a line, whitespace, then the module name. Anything else
//! about the imported language is opaque to us.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// A logical module name taken from an import statement, e.g. `Css.Declarations`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleReference {
    name: String,
    line: usize,
}

impl ModuleReference {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        ModuleReference {
            name: name.into(),
            line,
        }
    }

    /// The dotted name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 1-based line of the import statement.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Dotted segments, `Css.Declarations` -> `["Css", "Declarations"]`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.name.split('.')
    }

    /// Slash-delimited path fragment, `Css.Declarations` -> `Css/Declarations`.
    pub fn logical_path(&self) -> String {
        self.name.replace('.', "/")
    }
}

impl fmt::Display for ModuleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[expect(clippy::unwrap_used, reason = "pattern is a literal known to compile")]
fn import_pattern() -> &'static Regex {
    static IMPORT: OnceLock<Regex> = OnceLock::new();
    IMPORT.get_or_init(|| Regex::new(r"^import\s+(\S+)").unwrap())
}

/// Extract every imported module name, in source order.
///
/// Duplicates are kept.
pub fn scan_imports(source: &str) -> Vec<ModuleReference> {
    let pattern = import_pattern();

    source
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            pattern
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|name| ModuleReference::new(name.as_str(), idx + 1))
        })
        .collect()
}
