//! String Interner - Deduplicate names to save memory
//!
//! Tag names, attribute names and namespace URLs repeat across a tree
//! ("div", "class", the HTML namespace). They are stored once per tree and
//! referenced by a 4-byte ID.

use std::collections::HashMap;

/// Interned string ID - just 4 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct InternedString(pub u32);

impl InternedString {
    /// Empty string
    pub const EMPTY: InternedString = InternedString(0);
}

/// String interner for deduplicating names
#[derive(Debug, Clone)]
pub struct StringInterner {
    strings: Vec<Box<str>>,
    map: HashMap<Box<str>, InternedString>,
}

impl StringInterner {
    /// Create a new interner with namespaces and common names pre-interned
    pub fn new() -> Self {
        let mut interner = Self {
            strings: Vec::with_capacity(128),
            map: HashMap::with_capacity(128),
        };

        // Index 0 is always the empty string (no namespace)
        interner.intern("");

        const NAMESPACES: &[&str] = &[
            crate::HTML_NAMESPACE,
            crate::SVG_NAMESPACE,
            crate::MATHML_NAMESPACE,
            crate::XLINK_NAMESPACE,
            crate::XML_NAMESPACE,
            crate::XMLNS_NAMESPACE,
        ];

        const COMMON_NAMES: &[&str] = &[
            "html", "head", "body", "div", "span", "p", "a", "img", "template", "slot",
            "button", "input", "label", "svg", "path", "g", "circle", "rect", "use",
            "id", "class", "style", "name", "is", "href", "viewBox", "xmlns",
        ];

        for name in NAMESPACES.iter().chain(COMMON_NAMES) {
            interner.intern(name);
        }

        interner
    }

    /// Intern a string, returning its ID.
    /// If the string is already interned, returns the existing ID.
    pub fn intern(&mut self, s: &str) -> InternedString {
        if let Some(&id) = self.map.get(s) {
            return id;
        }

        let id = InternedString(self.strings.len() as u32);
        self.strings.push(s.into());
        self.map.insert(s.into(), id);
        id
    }

    /// Look up a string without interning it
    pub fn lookup(&self, s: &str) -> Option<InternedString> {
        self.map.get(s).copied()
    }

    /// Get the string for an interned ID
    #[inline]
    pub fn get(&self, id: InternedString) -> &str {
        self.strings.get(id.0 as usize).map_or("", |s| s)
    }

    /// Number of interned strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
