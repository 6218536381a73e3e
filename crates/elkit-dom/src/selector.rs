//! Selectors
//!
//! Parsing and matching for `matches`, `closest` and `querySelector`.
//!
//! Supported: selector lists, descendant / `>` / `+` / `~` combinators,
//! type and universal selectors, `#id`, `.class`, attribute selectors with
//! `=`, `~=`, `|=`, `^=`, `$=`, `*=` (and the `i` flag), and `:not()` over
//! compound selectors. Identifiers accept CSS escapes, so anything produced
//! by `css_escape` parses back to the original string.
//!
//! Matching never crosses a shadow boundary: the parent chain of a node in
//! a shadow tree ends at its shadow root, which is not an element.

use std::borrow::Cow;

use crate::{DomTree, HTML_NAMESPACE, NodeId};

/// Selector parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("Unexpected end of selector")]
    UnexpectedEnd,

    #[error("Unsupported pseudo-class :{0}")]
    UnsupportedPseudo(String),
}

/// A parsed selector list (`a, b > c`)
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(Vec<ComplexSelector>);

#[derive(Debug, Clone, PartialEq)]
struct ComplexSelector {
    /// Rightmost compound
    subject: CompoundSelector,
    /// Remaining compounds right to left, each with the combinator that
    /// links it to its right-hand neighbour
    ancestors: Vec<(Combinator, CompoundSelector)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
    NextSibling,
    SubsequentSibling,
}

#[derive(Debug, Clone, PartialEq)]
struct CompoundSelector(Vec<SimpleSelector>);

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq)]
enum SimpleSelector {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attribute {
        name: String,
        matcher: Option<AttrMatcher>,
    },
    Not(Vec<CompoundSelector>),
}

#[derive(Debug, Clone, PartialEq)]
struct AttrMatcher {
    operator: AttrOperator,
    value: String,
    case_insensitive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOperator {
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser {
            chars: input.char_indices().collect(),
            pos: 0,
        };
        parser.selector_list().map(Self)
    }
}

impl std::str::FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AttrMatcher {
    fn matches(&self, actual: &str) -> bool {
        let (actual, expected) = if self.case_insensitive {
            (
                Cow::Owned(actual.to_ascii_lowercase()),
                Cow::Owned(self.value.to_ascii_lowercase()),
            )
        } else {
            (Cow::Borrowed(actual), Cow::Borrowed(self.value.as_str()))
        };
        let expected = expected.as_ref();

        match self.operator {
            AttrOperator::Equals => actual == expected,
            AttrOperator::Includes => {
                !expected.is_empty()
                    && !expected.contains(|c: char| c.is_ascii_whitespace())
                    && actual.split_ascii_whitespace().any(|word| word == expected)
            }
            AttrOperator::DashMatch => actual
                .strip_prefix(expected)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('-')),
            AttrOperator::Prefix => !expected.is_empty() && actual.starts_with(expected),
            AttrOperator::Suffix => !expected.is_empty() && actual.ends_with(expected),
            AttrOperator::Substring => !expected.is_empty() && actual.contains(expected),
        }
    }
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn unexpected(&self) -> SelectorError {
        match self.chars.get(self.pos) {
            Some(&(offset, found)) => SelectorError::Unexpected { found, offset },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, c: char) -> Result<(), SelectorError> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn selector_list(&mut self) -> Result<Vec<ComplexSelector>, SelectorError> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return Err(SelectorError::Empty);
        }

        let mut list = Vec::new();
        loop {
            self.skip_whitespace();
            list.push(self.complex()?);
            self.skip_whitespace();
            match self.peek() {
                None => return Ok(list),
                Some(',') => self.pos += 1,
                Some(_) => return Err(self.unexpected()),
            }
        }
    }

    fn complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            if combinator != Combinator::Descendant {
                self.pos += 1;
                self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        let subject = compounds.pop().ok_or(SelectorError::Empty)?;
        let ancestors = combinators
            .into_iter()
            .rev()
            .zip(compounds.into_iter().rev())
            .collect();
        Ok(ComplexSelector { subject, ancestors })
    }

    fn compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut parts = Vec::new();

        match self.peek() {
            Some('*') => {
                self.pos += 1;
                parts.push(SimpleSelector::Universal);
            }
            Some(c) if is_name_start(c) || c == '\\' => parts.push(SimpleSelector::Tag(self.name()?)),
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    parts.push(SimpleSelector::Id(self.name()?));
                }
                Some('.') => {
                    self.pos += 1;
                    parts.push(SimpleSelector::Class(self.name()?));
                }
                Some('[') => {
                    self.pos += 1;
                    parts.push(self.attribute()?);
                }
                Some(':') => {
                    self.pos += 1;
                    parts.push(self.pseudo_class()?);
                }
                _ => break,
            }
        }

        if parts.is_empty() {
            return Err(self.unexpected());
        }
        Ok(CompoundSelector(parts))
    }

    fn attribute(&mut self) -> Result<SimpleSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.name()?;
        self.skip_whitespace();

        let operator = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(SimpleSelector::Attribute { name, matcher: None });
            }
            Some('=') => {
                self.pos += 1;
                AttrOperator::Equals
            }
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                self.pos += 1;
                self.expect('=')?;
                match c {
                    '~' => AttrOperator::Includes,
                    '|' => AttrOperator::DashMatch,
                    '^' => AttrOperator::Prefix,
                    '$' => AttrOperator::Suffix,
                    _ => AttrOperator::Substring,
                }
            }
            _ => return Err(self.unexpected()),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                self.string(quote)?
            }
            _ => self.name()?,
        };

        self.skip_whitespace();
        let case_insensitive = match self.peek() {
            Some('i' | 'I') => {
                self.pos += 1;
                true
            }
            Some('s' | 'S') => {
                self.pos += 1;
                false
            }
            _ => false,
        };
        self.skip_whitespace();
        self.expect(']')?;

        Ok(SimpleSelector::Attribute {
            name,
            matcher: Some(AttrMatcher {
                operator,
                value,
                case_insensitive,
            }),
        })
    }

    fn pseudo_class(&mut self) -> Result<SimpleSelector, SelectorError> {
        if self.peek() == Some(':') {
            return Err(SelectorError::UnsupportedPseudo(":".to_string()));
        }
        let name = self.name()?;
        if !name.eq_ignore_ascii_case("not") || self.peek() != Some('(') {
            return Err(SelectorError::UnsupportedPseudo(name));
        }
        self.pos += 1;

        let mut list = Vec::new();
        loop {
            self.skip_whitespace();
            list.push(self.compound()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(')') => return Ok(SimpleSelector::Not(list)),
                Some(_) => {
                    self.pos -= 1;
                    return Err(self.unexpected());
                }
                None => return Err(SelectorError::UnexpectedEnd),
            }
        }
    }

    /// Identifier or hash name, with escapes resolved
    fn name(&mut self) -> Result<String, SelectorError> {
        let mut name = String::new();
        loop {
            match self.peek() {
                Some('\\') => {
                    self.pos += 1;
                    name.push(self.escape()?);
                }
                Some(c) if is_name_char(c) => {
                    self.pos += 1;
                    name.push(c);
                }
                _ => break,
            }
        }

        if name.is_empty() {
            return Err(self.unexpected());
        }
        Ok(name)
    }

    /// Quoted string body, after the opening quote
    fn string(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(SelectorError::UnexpectedEnd),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.peek() {
                    None => {}
                    Some('\n') => self.pos += 1,
                    Some(_) => value.push(self.escape()?),
                },
                Some(c) => value.push(c),
            }
        }
    }

    /// Escape body, after the backslash
    fn escape(&mut self) -> Result<char, SelectorError> {
        let Some(first) = self.peek() else {
            return Ok('\u{FFFD}');
        };

        if first.is_ascii_hexdigit() {
            let mut value = 0u32;
            let mut digits = 0;
            while digits < 6 {
                let Some(digit) = self.peek().and_then(|c| c.to_digit(16)) else {
                    break;
                };
                value = value * 16 + digit;
                digits += 1;
                self.pos += 1;
            }
            if self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
                self.pos += 1;
            }
            return Ok(match char::from_u32(value) {
                Some(c) if value != 0 => c,
                _ => '\u{FFFD}',
            });
        }

        if first == '\n' {
            return Err(self.unexpected());
        }
        self.pos += 1;
        Ok(first)
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c >= '\u{80}'
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit()
}

impl DomTree {
    /// `element.matches(selectors)`
    pub fn matches(&self, element: NodeId, selectors: &SelectorList) -> bool {
        self.element(element).is_some()
            && selectors.0.iter().any(|s| self.matches_complex(element, s))
    }

    /// `element.closest(selectors)`: nearest inclusive ancestor in the same tree
    pub fn closest(&self, element: NodeId, selectors: &SelectorList) -> Option<NodeId> {
        let mut current = self.element(element).map(|_| element);
        while let Some(id) = current {
            if self.matches(id, selectors) {
                return Some(id);
            }
            current = self.parent_element(id);
        }
        None
    }

    /// First matching descendant of `root` in tree order
    pub fn query_selector(&self, root: NodeId, selectors: &SelectorList) -> Option<NodeId> {
        self.descendants(root).find(|&node| self.matches(node, selectors))
    }

    /// All matching descendants of `root` in tree order
    pub fn query_selector_all(&self, root: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&node| self.matches(node, selectors))
            .collect()
    }

    fn matches_complex(&self, element: NodeId, selector: &ComplexSelector) -> bool {
        self.matches_compound(element, &selector.subject)
            && self.matches_leftwards(element, &selector.ancestors)
    }

    fn matches_leftwards(&self, element: NodeId, rest: &[(Combinator, CompoundSelector)]) -> bool {
        let Some(((combinator, compound), rest)) = rest.split_first() else {
            return true;
        };
        let candidate_matches =
            |id: NodeId| self.matches_compound(id, compound) && self.matches_leftwards(id, rest);

        match combinator {
            Combinator::Child => self.parent_element(element).is_some_and(candidate_matches),
            Combinator::NextSibling => self.prev_element_sibling(element).is_some_and(candidate_matches),
            Combinator::Descendant => {
                let mut cursor = self.parent_element(element);
                while let Some(id) = cursor {
                    if candidate_matches(id) {
                        return true;
                    }
                    cursor = self.parent_element(id);
                }
                false
            }
            Combinator::SubsequentSibling => {
                let mut cursor = self.prev_element_sibling(element);
                while let Some(id) = cursor {
                    if candidate_matches(id) {
                        return true;
                    }
                    cursor = self.prev_element_sibling(id);
                }
                false
            }
        }
    }

    fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.prev_sibling(id);
        while let Some(sibling) = cursor {
            if self.get(sibling)?.is_element() {
                return Some(sibling);
            }
            cursor = self.prev_sibling(sibling);
        }
        None
    }

    fn matches_compound(&self, element: NodeId, compound: &CompoundSelector) -> bool {
        compound.0.iter().all(|simple| self.matches_simple(element, simple))
    }

    fn matches_simple(&self, element: NodeId, simple: &SimpleSelector) -> bool {
        let Some(elem) = self.element(element) else {
            return false;
        };
        let is_html = self.resolve(elem.name.ns) == HTML_NAMESPACE;

        match simple {
            SimpleSelector::Universal => true,
            SimpleSelector::Tag(tag) => {
                let local = self.resolve(elem.name.local);
                if is_html {
                    local.eq_ignore_ascii_case(tag)
                } else {
                    local == tag
                }
            }
            SimpleSelector::Id(id) => elem.id.is_some_and(|value| self.resolve(value) == id),
            SimpleSelector::Class(class) => elem.classes.iter().any(|&c| self.resolve(c) == class),
            SimpleSelector::Attribute { name, matcher } => {
                let value = elem
                    .attrs
                    .iter()
                    .find(|attr| {
                        let local = self.resolve(attr.name.local);
                        if is_html {
                            local.eq_ignore_ascii_case(name)
                        } else {
                            local == name
                        }
                    })
                    .map(|attr| attr.value.as_str());
                match (value, matcher) {
                    (None, _) => false,
                    (Some(_), None) => true,
                    (Some(value), Some(matcher)) => matcher.matches(value),
                }
            }
            SimpleSelector::Not(list) => !list.iter().any(|c| self.matches_compound(element, c)),
        }
    }
}
