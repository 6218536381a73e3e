//! Custom Elements
//!
//! Registry of custom element definitions, consulted when elements are
//! created to decide their custom element state.

use std::collections::HashMap;

/// Custom elements registry
#[derive(Debug, Clone, Default)]
pub struct CustomElementRegistry {
    definitions: HashMap<String, CustomElementDefinition>,
}

/// Custom element definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomElementDefinition {
    pub name: String,
    /// Built-in local name this definition customizes (`is` form)
    pub extends: Option<String>,
}

/// Custom element state of an element at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomElementState {
    /// Plain built-in element
    #[default]
    Uncustomized,
    /// Valid custom element name (or `is` value) with no definition yet
    Undefined,
    /// Created against a definition
    Custom,
}

/// Custom element errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomElementError {
    #[error("{0:?} is not a valid custom element name")]
    InvalidName(String),

    #[error("{0:?} has already been defined")]
    AlreadyDefined(String),
}

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a custom element, optionally extending a built-in local name
    pub fn define(&mut self, name: &str, extends: Option<&str>) -> Result<(), CustomElementError> {
        if !is_valid_custom_element_name(name) {
            return Err(CustomElementError::InvalidName(name.to_string()));
        }
        if self.definitions.contains_key(name) {
            return Err(CustomElementError::AlreadyDefined(name.to_string()));
        }

        tracing::debug!("Defining custom element {} (extends {:?})", name, extends);
        self.definitions.insert(
            name.to_string(),
            CustomElementDefinition {
                name: name.to_string(),
                extends: extends.map(str::to_string),
            },
        );
        Ok(())
    }

    /// Get element definition
    pub fn get(&self, name: &str) -> Option<&CustomElementDefinition> {
        self.definitions.get(name)
    }

    /// Check if element is defined
    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Find the definition an element with `local_name` and `is` would use
    pub fn lookup(&self, local_name: &str, is: Option<&str>) -> Option<&CustomElementDefinition> {
        match is {
            Some(is) => self
                .get(is)
                .filter(|def| def.extends.as_deref() == Some(local_name)),
            None => self.get(local_name).filter(|def| def.extends.is_none()),
        }
    }

    /// State a newly created HTML element gets
    pub fn state_for(&self, local_name: &str, is: Option<&str>) -> CustomElementState {
        if self.lookup(local_name, is).is_some() {
            CustomElementState::Custom
        } else if is.is_some() || is_valid_custom_element_name(local_name) {
            CustomElementState::Undefined
        } else {
            CustomElementState::Uncustomized
        }
    }
}

/// Validate custom element name: lowercase ASCII start, contains a hyphen,
/// no ASCII uppercase, not one of the reserved SVG/MathML names
pub(crate) fn is_valid_custom_element_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "annotation-xml",
        "color-profile",
        "font-face",
        "font-face-src",
        "font-face-uri",
        "font-face-format",
        "font-face-name",
        "missing-glyph",
    ];

    name.starts_with(|c: char| c.is_ascii_lowercase())
        && name.contains('-')
        && !name
            .chars()
            .any(|c| c.is_ascii_uppercase() || c.is_ascii_whitespace() || c == '/' || c == '>')
        && !RESERVED.contains(&name)
}
