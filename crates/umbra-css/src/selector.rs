//! Simple selector parsing and matching.
//!
//! The `<content select>` attribute only admits compound simple selectors
//! (`div`, `.item`, `#main`, `[name]`, `[name=value]`, `span.item[draggable]`)
//! and comma-separated lists of them. Combinators and pseudo-classes are
//! rejected at parse time.

use crate::SelectorError;

/// A parsed selector list: `h1, .title, [data-x=y]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub compounds: Vec<Compound>,
}

/// One compound: a sequence of simple selectors applying to a single element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound {
    pub parts: Vec<SimpleSelector>,
}

/// A single simple selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Tag(String),
    Class(String),
    Id(String),
    Attr { name: String, matcher: AttrMatcher },
}

/// Attribute matching mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMatcher {
    /// `[name]` - attribute present
    Exists,
    /// `[name=value]` - exact value
    Equals(String),
    /// `[name~=value]` - value present in space-separated list
    Includes(String),
}

/// Borrowed view of an element, the matcher's only input.
#[derive(Debug, Clone, Copy)]
pub struct ElementContext<'a> {
    pub tag: &'a str,
    pub id: Option<&'a str>,
    pub classes: &'a [String],
    pub attrs: &'a [(String, String)],
}

impl<'a> ElementContext<'a> {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut compounds = Vec::new();
        for part in trimmed.split(',') {
            compounds.push(Compound::parse(part.trim())?);
        }
        Ok(Self { compounds })
    }

    /// True if any compound in the list matches.
    pub fn matches(&self, element: &ElementContext<'_>) -> bool {
        self.compounds.iter().any(|c| c.matches(element))
    }
}

impl Compound {
    fn parse(text: &str) -> Result<Self, SelectorError> {
        if text.is_empty() {
            return Err(SelectorError::Empty);
        }

        let bytes = text.as_bytes();
        let mut parts = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            let start = pos;
            match bytes[pos] {
                b'*' => {
                    parts.push(SimpleSelector::Universal);
                    pos += 1;
                }
                b'.' => {
                    pos += 1;
                    let name = take_ident(text, &mut pos);
                    if name.is_empty() {
                        return Err(unsupported(start, "expected class name after '.'"));
                    }
                    parts.push(SimpleSelector::Class(name));
                }
                b'#' => {
                    pos += 1;
                    let name = take_ident(text, &mut pos);
                    if name.is_empty() {
                        return Err(unsupported(start, "expected id after '#'"));
                    }
                    parts.push(SimpleSelector::Id(name));
                }
                b'[' => {
                    pos += 1;
                    parts.push(parse_attribute(text, &mut pos)?);
                }
                c if is_ident_byte(c) => {
                    let name = take_ident(text, &mut pos);
                    parts.push(SimpleSelector::Tag(name.to_ascii_lowercase()));
                }
                // Whitespace inside a compound means a descendant combinator,
                // which the select attribute does not allow.
                c if c.is_ascii_whitespace() => {
                    return Err(unsupported(start, "combinators are not allowed"));
                }
                b':' => {
                    return Err(unsupported(start, "pseudo-classes are not allowed"));
                }
                b'>' | b'+' | b'~' => {
                    return Err(unsupported(start, "combinators are not allowed"));
                }
                _ => {
                    return Err(unsupported(start, "unrecognized token"));
                }
            }
        }

        Ok(Self { parts })
    }

    fn matches(&self, element: &ElementContext<'_>) -> bool {
        self.parts.iter().all(|part| part.matches(element))
    }
}

impl SimpleSelector {
    fn matches(&self, element: &ElementContext<'_>) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
            Self::Class(class) => element.has_class(class),
            Self::Id(id) => element.id == Some(id.as_str()),
            Self::Attr { name, matcher } => match (element.attr(name), matcher) {
                (Some(_), AttrMatcher::Exists) => true,
                (Some(actual), AttrMatcher::Equals(expected)) => actual == expected,
                (Some(actual), AttrMatcher::Includes(expected)) => {
                    actual.split_ascii_whitespace().any(|v| v == expected)
                }
                (None, _) => false,
            },
        }
    }
}

fn parse_attribute(text: &str, pos: &mut usize) -> Result<SimpleSelector, SelectorError> {
    let name = take_ident(text, pos);
    if name.is_empty() {
        return Err(unsupported(*pos, "expected attribute name"));
    }

    let bytes = text.as_bytes();
    match bytes.get(*pos) {
        Some(b']') => {
            *pos += 1;
            Ok(SimpleSelector::Attr {
                name,
                matcher: AttrMatcher::Exists,
            })
        }
        Some(b'=') => {
            *pos += 1;
            let value = take_attr_value(text, pos)?;
            Ok(SimpleSelector::Attr {
                name,
                matcher: AttrMatcher::Equals(value),
            })
        }
        Some(b'~') if bytes.get(*pos + 1) == Some(&b'=') => {
            *pos += 2;
            let value = take_attr_value(text, pos)?;
            Ok(SimpleSelector::Attr {
                name,
                matcher: AttrMatcher::Includes(value),
            })
        }
        Some(_) => Err(unsupported(*pos, "unsupported attribute operator")),
        None => Err(SelectorError::UnterminatedAttribute),
    }
}

fn take_attr_value(text: &str, pos: &mut usize) -> Result<String, SelectorError> {
    let bytes = text.as_bytes();
    let quote = match bytes.get(*pos) {
        Some(&q @ (b'"' | b'\'')) => {
            *pos += 1;
            Some(q)
        }
        _ => None,
    };

    let start = *pos;
    while *pos < bytes.len() {
        let b = bytes[*pos];
        match quote {
            Some(q) if b == q => break,
            None if b == b']' => break,
            _ => *pos += 1,
        }
    }
    let value = text[start..*pos].to_string();

    if let Some(_q) = quote {
        if *pos >= bytes.len() {
            return Err(SelectorError::UnterminatedAttribute);
        }
        *pos += 1; // closing quote
    }
    match bytes.get(*pos) {
        Some(b']') => {
            *pos += 1;
            Ok(value)
        }
        _ => Err(SelectorError::UnterminatedAttribute),
    }
}

fn take_ident(text: &str, pos: &mut usize) -> String {
    let bytes = text.as_bytes();
    let start = *pos;
    while *pos < bytes.len() && is_ident_byte(bytes[*pos]) {
        *pos += 1;
    }
    text[start..*pos].to_string()
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn unsupported(offset: usize, message: &str) -> SelectorError {
    SelectorError::Unsupported {
        offset,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(
        tag: &'a str,
        id: Option<&'a str>,
        classes: &'a [String],
        attrs: &'a [(String, String)],
    ) -> ElementContext<'a> {
        ElementContext {
            tag,
            id,
            classes,
            attrs,
        }
    }

    #[test]
    fn test_parse_tag() {
        let sel = Selector::parse("div").unwrap();
        assert!(sel.matches(&ctx("div", None, &[], &[])));
        assert!(sel.matches(&ctx("DIV", None, &[], &[])));
        assert!(!sel.matches(&ctx("span", None, &[], &[])));
    }

    #[test]
    fn test_parse_class_and_id() {
        let classes = vec!["item".to_string(), "selected".to_string()];
        let sel = Selector::parse(".selected").unwrap();
        assert!(sel.matches(&ctx("li", None, &classes, &[])));

        let sel = Selector::parse("#main").unwrap();
        assert!(sel.matches(&ctx("div", Some("main"), &[], &[])));
        assert!(!sel.matches(&ctx("div", Some("other"), &[], &[])));
    }

    #[test]
    fn test_compound() {
        let classes = vec!["x".to_string()];
        let attrs = vec![("draggable".to_string(), "true".to_string())];
        let sel = Selector::parse("span.x[draggable]").unwrap();
        assert!(sel.matches(&ctx("span", None, &classes, &attrs)));
        assert!(!sel.matches(&ctx("div", None, &classes, &attrs)));
        assert!(!sel.matches(&ctx("span", None, &[], &attrs)));
    }

    #[test]
    fn test_attribute_matchers() {
        let attrs = vec![("rel".to_string(), "prev next".to_string())];
        assert!(Selector::parse("[rel~=next]")
            .unwrap()
            .matches(&ctx("a", None, &[], &attrs)));
        assert!(!Selector::parse("[rel=next]")
            .unwrap()
            .matches(&ctx("a", None, &[], &attrs)));
        assert!(Selector::parse("[rel=\"prev next\"]")
            .unwrap()
            .matches(&ctx("a", None, &[], &attrs)));
    }

    #[test]
    fn test_selector_list() {
        let sel = Selector::parse("h1, h2, .title").unwrap();
        assert!(sel.matches(&ctx("h2", None, &[], &[])));
        let classes = vec!["title".to_string()];
        assert!(sel.matches(&ctx("p", None, &classes, &[])));
        assert!(!sel.matches(&ctx("p", None, &[], &[])));
    }

    #[test]
    fn test_rejects_combinators_and_pseudos() {
        assert!(Selector::parse("div p").is_err());
        assert!(Selector::parse("div > p").is_err());
        assert!(Selector::parse("a:hover").is_err());
        assert!(Selector::parse("").is_err());
    }

    #[test]
    fn test_fail_closed() {
        assert!(!matches_selector_helper("div p"));
        assert!(!matches_selector_helper("[unterminated"));
        assert!(matches_selector_helper("div"));
    }

    fn matches_selector_helper(text: &str) -> bool {
        crate::matches_selector(text, &ctx("div", None, &[], &[]))
    }
}
