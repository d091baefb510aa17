//! Case-insensitive attribute names
//!
//! Names are interned: every distinct raw spelling maps to one shared
//! instance for the life of the process. The table sits behind a
//! `parking_lot::RwLock`, so names may be created from any thread.

use classad_diagnostics::{CAD0005, ClassAdError, Result};
use classad_types::{escape_string, unquote_string};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

static NAMES: LazyLock<RwLock<HashMap<Box<str>, AttrName>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

static PARENT: LazyLock<AttrName> = LazyLock::new(|| AttrName::new("parent"));

/// Words the parser reads as literals or operators rather than names
const KEYWORDS: [&str; 6] = ["true", "false", "undefined", "error", "is", "isnt"];

#[derive(Debug)]
struct Inner {
    raw: Box<str>,
    canon: Box<str>,
    printed: Box<str>,
}

/// An attribute name
///
/// Two names are equal when their lower-case forms are equal. The raw
/// spelling is kept for display.
#[derive(Clone)]
pub struct AttrName(Arc<Inner>);

impl AttrName {
    /// The interned name with this raw spelling
    pub fn new(raw: &str) -> Self {
        if let Some(name) = NAMES.read().get(raw) {
            return name.clone();
        }
        let mut names = NAMES.write();
        names
            .entry(raw.into())
            .or_insert_with(|| {
                let canon = raw.to_lowercase();
                let printed = if needs_quoting(raw) {
                    escape_string(raw, '\'')
                } else {
                    raw.to_string()
                };
                AttrName(Arc::new(Inner {
                    raw: raw.into(),
                    canon: canon.into(),
                    printed: printed.into(),
                }))
            })
            .clone()
    }

    /// Decode a name as written in text: a plain identifier, or a quoted
    /// name such as `'weird name'` with backslash escapes
    pub fn from_text(text: &str) -> Result<Self> {
        let invalid = || {
            ClassAdError::parse(CAD0005, format!("invalid attribute name {text}"), text)
        };
        if let Some(rest) = text.strip_prefix('\'') {
            let body = rest.strip_suffix('\'').ok_or_else(invalid)?;
            let raw = unquote_string(body)?;
            if raw.is_empty() {
                return Err(invalid());
            }
            return Ok(Self::new(&raw));
        }
        if !is_identifier(text) {
            return Err(invalid());
        }
        Ok(Self::new(text))
    }

    /// The reserved name used to reach the enclosing record
    pub fn parent() -> Self {
        PARENT.clone()
    }

    pub fn is_parent(&self) -> bool {
        *self == *PARENT
    }

    /// The spelling this name was created with
    pub fn raw(&self) -> &str {
        &self.0.raw
    }

    /// The lower-case form used for comparison
    pub fn canonical(&self) -> &str {
        &self.0.canon
    }

    /// Whether the printed form has to be quoted
    pub fn needs_quoting(&self) -> bool {
        self.0.printed != self.0.raw
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn needs_quoting(raw: &str) -> bool {
    !is_identifier(raw) || KEYWORDS.iter().any(|k| raw.eq_ignore_ascii_case(k))
}

impl PartialEq for AttrName {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.canon == other.0.canon
    }
}

impl Eq for AttrName {}

impl Hash for AttrName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.canon.hash(state);
    }
}

impl fmt::Display for AttrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.printed)
    }
}

impl fmt::Debug for AttrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttrName({:?})", self.raw())
    }
}

impl From<&str> for AttrName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
