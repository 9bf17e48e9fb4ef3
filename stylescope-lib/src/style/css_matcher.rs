use crate::dom::dom_tree::{self, Node, NodeRef};
use crate::error::SelectorError;

/// Answers `element.matches(selector)` for the inspector.
///
/// Implementations return `Err` for selectors they cannot evaluate; callers
/// skip such rules instead of failing the whole inspection.
pub trait SelectorMatcher {
    fn matches(&self, element: &NodeRef, selector_text: &str) -> Result<bool, SelectorError>;
}

/// Matcher backed by the DOM tree built from html5ever.
#[derive(Debug, Default, Clone, Copy)]
pub struct DomSelectorMatcher;

impl SelectorMatcher for DomSelectorMatcher {
    fn matches(&self, element: &NodeRef, selector_text: &str) -> Result<bool, SelectorError> {
        let selectors = parse_selector_list(selector_text)?;
        Ok(selectors
            .iter()
            .any(|selector| matches_complex_selector(element, selector)))
    }
}

/// ------------------------------
/// 1. Selector Parsing
/// ------------------------------

/// Supported attribute selector operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOperator {
    /// [attr="value"]
    Exact,
    /// [attr~="value"]
    Includes,
    /// [attr|="value"]
    DashMatch,
    /// [attr^="value"]
    Prefix,
    /// [attr$="value"]
    Suffix,
    /// [attr*="value"]
    Substring,
}

/// Represents one attribute condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    /// None means only existence check.
    pub operator: Option<AttributeOperator>,
    pub value: Option<String>,
    /// The `i` flag: compare values ASCII case-insensitively.
    pub case_insensitive: bool,
}

/// Pseudo-classes the matcher understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    Root,
    Empty,
    /// `:link` / `:any-link`
    Link,
    /// `:nth-child(an+b)`, `:nth-last-child(an+b)`
    NthChild { a: i32, b: i32, from_end: bool },
    Not(Vec<ComplexSelector>),
    /// `:is()` and `:where()`
    Is(Vec<ComplexSelector>),
    /// User-interaction state (`:hover`, `:focus`, ...). A static page is never in it.
    Dynamic(String),
}

/// A compound selector: optional tag, ids, classes, attribute and pseudo-class conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub ids: Vec<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeSelector>,
    pub pseudo_classes: Vec<PseudoClass>,
    /// `::before` and friends. Elements themselves never match these.
    pub pseudo_element: Option<String>,
}

/// A complex selector composed of a key compound selector and a list of ancestor parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub key: CompoundSelector,
    /// Ancestors with their combinators, in right-to-left order.
    pub ancestors: Vec<(Combinator, CompoundSelector)>,
}

/// Supported combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (a space).
    Descendant,
    /// Child combinator (`>`).
    Child,
    /// Adjacent sibling combinator (`+`).
    AdjacentSibling,
    /// General sibling combinator (`~`).
    GeneralSibling,
}

struct Cursor<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Cursor {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    /// Returns true if anything was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn invalid(&self) -> SelectorError {
        SelectorError::Invalid(self.source.to_string())
    }

    fn read_ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                self.pos += 1;
                if let Some(escaped) = self.bump() {
                    out.push(escaped);
                }
            } else if is_ident_char(ch) {
                out.push(ch);
                self.pos += 1;
            } else {
                break;
            }
        }
        out
    }

    /// Reads the body of a `(...)` group; the opening paren is already consumed.
    fn read_parenthesized(&mut self) -> Result<String, SelectorError> {
        let mut depth = 1;
        let mut quote: Option<char> = None;
        let mut out = String::new();
        while let Some(ch) = self.bump() {
            match (quote, ch) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(ch),
                (None, '(') => depth += 1,
                (None, ')') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                }
                (None, _) => {}
            }
            out.push(ch);
        }
        Err(self.invalid())
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '-' || ch == '\\' || !ch.is_ascii()
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-' || !ch.is_ascii()
}

/// Splits a selector list on commas that are not nested in parens, brackets or strings.
pub fn split_selector_list(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (idx, ch) in selector.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth -= 1,
            (None, ',') if depth == 0 => {
                parts.push(&selector[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&selector[start..]);
    parts
}

/// Parse a comma-separated selector list. Any invalid member invalidates the whole list.
pub fn parse_selector_list(selector: &str) -> Result<Vec<ComplexSelector>, SelectorError> {
    if selector.trim().is_empty() {
        return Err(SelectorError::Empty);
    }
    split_selector_list(selector)
        .into_iter()
        .map(parse_complex_selector)
        .collect()
}

/// Parse a complex selector string (e.g. "div.red > p#header + span.foo") into a ComplexSelector.
pub fn parse_complex_selector(selector: &str) -> Result<ComplexSelector, SelectorError> {
    let mut cursor = Cursor::new(selector);
    let mut compounds: Vec<CompoundSelector> = Vec::new();
    let mut combinators: Vec<Combinator> = Vec::new();
    let mut pending: Option<Combinator> = None;

    loop {
        let saw_space = cursor.skip_whitespace();
        let Some(ch) = cursor.peek() else {
            break;
        };
        let explicit = match ch {
            '>' => Some(Combinator::Child),
            '+' => Some(Combinator::AdjacentSibling),
            '~' => Some(Combinator::GeneralSibling),
            _ => None,
        };
        if let Some(combinator) = explicit {
            if compounds.is_empty() || pending.is_some() {
                return Err(cursor.invalid());
            }
            cursor.bump();
            pending = Some(combinator);
            continue;
        }

        let compound = parse_compound_selector(&mut cursor)?;
        if !compounds.is_empty() {
            let combinator = match pending.take() {
                Some(combinator) => combinator,
                None if saw_space => Combinator::Descendant,
                None => return Err(cursor.invalid()),
            };
            combinators.push(combinator);
        }
        compounds.push(compound);
    }

    if pending.is_some() {
        return Err(cursor.invalid());
    }
    let Some(key) = compounds.pop() else {
        return Err(SelectorError::Empty);
    };
    let ancestors = combinators.into_iter().rev().zip(compounds.into_iter().rev()).collect();
    Ok(ComplexSelector { key, ancestors })
}

/// Parse one compound selector, e.g. `div.red#header[disabled]:first-child`.
fn parse_compound_selector(cursor: &mut Cursor<'_>) -> Result<CompoundSelector, SelectorError> {
    let mut compound = CompoundSelector::default();
    let start = cursor.pos;

    match cursor.peek() {
        Some('*') => {
            cursor.bump();
        }
        Some(ch) if is_ident_start(ch) => {
            compound.tag = Some(cursor.read_ident().to_ascii_lowercase());
        }
        _ => {}
    }
    if cursor.peek() == Some('|') {
        return Err(SelectorError::Unsupported(cursor.source.to_string()));
    }

    while let Some(ch) = cursor.peek() {
        match ch {
            '#' => {
                cursor.bump();
                let id = cursor.read_ident();
                if id.is_empty() {
                    return Err(cursor.invalid());
                }
                compound.ids.push(id);
            }
            '.' => {
                cursor.bump();
                let class = cursor.read_ident();
                if class.is_empty() {
                    return Err(cursor.invalid());
                }
                compound.classes.push(class);
            }
            '[' => {
                cursor.bump();
                compound.attributes.push(parse_attribute_selector(cursor)?);
            }
            ':' => {
                cursor.bump();
                if cursor.peek() == Some(':') {
                    cursor.bump();
                    let name = cursor.read_ident();
                    if name.is_empty() {
                        return Err(cursor.invalid());
                    }
                    compound.pseudo_element = Some(name.to_ascii_lowercase());
                } else {
                    compound.pseudo_classes.push(parse_pseudo_class(cursor)?);
                }
            }
            _ => break,
        }
    }

    if cursor.pos == start {
        return Err(cursor.invalid());
    }
    Ok(compound)
}

fn parse_attribute_selector(cursor: &mut Cursor<'_>) -> Result<AttributeSelector, SelectorError> {
    cursor.skip_whitespace();
    let name = cursor.read_ident();
    if name.is_empty() {
        return Err(cursor.invalid());
    }
    cursor.skip_whitespace();

    let operator = match cursor.peek() {
        Some(']') => {
            cursor.bump();
            return Ok(AttributeSelector {
                name: name.to_ascii_lowercase(),
                operator: None,
                value: None,
                case_insensitive: false,
            });
        }
        Some('=') => {
            cursor.bump();
            AttributeOperator::Exact
        }
        Some(prefix @ ('~' | '|' | '^' | '$' | '*')) => {
            cursor.bump();
            if cursor.bump() != Some('=') {
                return Err(cursor.invalid());
            }
            match prefix {
                '~' => AttributeOperator::Includes,
                '|' => AttributeOperator::DashMatch,
                '^' => AttributeOperator::Prefix,
                '$' => AttributeOperator::Suffix,
                _ => AttributeOperator::Substring,
            }
        }
        _ => return Err(cursor.invalid()),
    };

    cursor.skip_whitespace();
    let value = match cursor.peek() {
        Some(quote @ ('"' | '\'')) => {
            cursor.bump();
            let mut value = String::new();
            loop {
                match cursor.bump() {
                    Some('\\') => {
                        if let Some(escaped) = cursor.bump() {
                            value.push(escaped);
                        }
                    }
                    Some(ch) if ch == quote => break,
                    Some(ch) => value.push(ch),
                    None => return Err(cursor.invalid()),
                }
            }
            value
        }
        _ => {
            let value = cursor.read_ident();
            if value.is_empty() {
                return Err(cursor.invalid());
            }
            value
        }
    };

    cursor.skip_whitespace();
    let mut case_insensitive = false;
    if let Some(flag @ ('i' | 'I' | 's' | 'S')) = cursor.peek() {
        cursor.bump();
        case_insensitive = flag.eq_ignore_ascii_case(&'i');
        cursor.skip_whitespace();
    }
    if cursor.bump() != Some(']') {
        return Err(cursor.invalid());
    }

    Ok(AttributeSelector {
        name: name.to_ascii_lowercase(),
        operator: Some(operator),
        value: Some(value),
        case_insensitive,
    })
}

fn parse_pseudo_class(cursor: &mut Cursor<'_>) -> Result<PseudoClass, SelectorError> {
    let name = cursor.read_ident().to_ascii_lowercase();
    if name.is_empty() {
        return Err(cursor.invalid());
    }
    let argument = if cursor.peek() == Some('(') {
        cursor.bump();
        Some(cursor.read_parenthesized()?)
    } else {
        None
    };

    let pseudo = match (name.as_str(), argument) {
        ("first-child", None) => PseudoClass::FirstChild,
        ("last-child", None) => PseudoClass::LastChild,
        ("only-child", None) => PseudoClass::OnlyChild,
        ("first-of-type", None) => PseudoClass::FirstOfType,
        ("last-of-type", None) => PseudoClass::LastOfType,
        ("only-of-type", None) => PseudoClass::OnlyOfType,
        ("root", None) => PseudoClass::Root,
        ("empty", None) => PseudoClass::Empty,
        ("link" | "any-link", None) => PseudoClass::Link,
        (
            "hover" | "active" | "focus" | "focus-within" | "focus-visible" | "visited"
            | "target",
            None,
        ) => PseudoClass::Dynamic(name.clone()),
        ("nth-child" | "nth-last-child", Some(arg)) => {
            let (a, b) = parse_an_plus_b(&arg).ok_or_else(|| cursor.invalid())?;
            PseudoClass::NthChild {
                a,
                b,
                from_end: name == "nth-last-child",
            }
        }
        ("not", Some(arg)) => PseudoClass::Not(parse_selector_list(&arg)?),
        ("is" | "where" | "matches", Some(arg)) => PseudoClass::Is(parse_selector_list(&arg)?),
        ("not" | "is" | "where" | "matches" | "nth-child" | "nth-last-child", None) => {
            return Err(cursor.invalid())
        }
        _ => return Err(SelectorError::Unsupported(format!(":{}", name))),
    };
    Ok(pseudo)
}

/// Parses the `an+b` microsyntax (`odd`, `even`, `3`, `-n+2`, `2n+1`).
pub fn parse_an_plus_b(text: &str) -> Option<(i32, i32)> {
    let compact: String = text
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    match compact.as_str() {
        "odd" => return Some((2, 1)),
        "even" => return Some((2, 0)),
        "" => return None,
        _ => {}
    }
    match compact.split_once('n') {
        Some((a_part, b_part)) => {
            let a = match a_part {
                "" | "+" => 1,
                "-" => -1,
                other => other.parse().ok()?,
            };
            let b = if b_part.is_empty() {
                0
            } else {
                b_part.parse().ok()?
            };
            Some((a, b))
        }
        None => compact.parse().ok().map(|b| (0, b)),
    }
}

/// ------------------------------
/// 2. Selector Matching
/// ------------------------------

/// Returns true if the given element matches the CompoundSelector.
pub fn matches_compound(node: &NodeRef, compound: &CompoundSelector) -> bool {
    if compound.pseudo_element.is_some() {
        return false;
    }
    {
        let borrowed = node.borrow();
        let Some(elem) = borrowed.as_element() else {
            return false;
        };
        if let Some(tag) = &compound.tag {
            if !elem.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if !compound.ids.iter().all(|id| elem.id() == Some(id.as_str())) {
            return false;
        }
        if !compound.classes.iter().all(|class| elem.has_class(class)) {
            return false;
        }
        for attr_sel in &compound.attributes {
            let Some(actual) = elem.attribute(&attr_sel.name) else {
                return false;
            };
            if !matches_attribute_value(actual, attr_sel) {
                return false;
            }
        }
    }
    compound
        .pseudo_classes
        .iter()
        .all(|pseudo| matches_pseudo_class(node, pseudo))
}

fn matches_attribute_value(actual: &str, attr_sel: &AttributeSelector) -> bool {
    let (Some(operator), Some(expected)) = (&attr_sel.operator, &attr_sel.value) else {
        // No operator means just existence; already confirmed.
        return true;
    };
    let (actual, expected) = if attr_sel.case_insensitive {
        (actual.to_ascii_lowercase(), expected.to_ascii_lowercase())
    } else {
        (actual.to_string(), expected.clone())
    };
    match operator {
        AttributeOperator::Exact => actual == expected,
        AttributeOperator::Includes => {
            !expected.is_empty() && actual.split_whitespace().any(|word| word == expected)
        }
        AttributeOperator::DashMatch => {
            actual == expected || actual.starts_with(&format!("{}-", expected))
        }
        AttributeOperator::Prefix => !expected.is_empty() && actual.starts_with(&expected),
        AttributeOperator::Suffix => !expected.is_empty() && actual.ends_with(&expected),
        AttributeOperator::Substring => !expected.is_empty() && actual.contains(&expected),
    }
}

fn tag_of(node: &NodeRef) -> String {
    node.borrow()
        .as_element()
        .map(|elem| elem.tag.to_ascii_lowercase())
        .unwrap_or_default()
}

fn matches_pseudo_class(node: &NodeRef, pseudo: &PseudoClass) -> bool {
    match pseudo {
        PseudoClass::FirstChild => dom_tree::previous_element_siblings(node).is_empty(),
        PseudoClass::LastChild => dom_tree::next_element_siblings(node).is_empty(),
        PseudoClass::OnlyChild => {
            dom_tree::previous_element_siblings(node).is_empty()
                && dom_tree::next_element_siblings(node).is_empty()
        }
        PseudoClass::FirstOfType => {
            let tag = tag_of(node);
            !dom_tree::previous_element_siblings(node)
                .iter()
                .any(|sibling| tag_of(sibling) == tag)
        }
        PseudoClass::LastOfType => {
            let tag = tag_of(node);
            !dom_tree::next_element_siblings(node)
                .iter()
                .any(|sibling| tag_of(sibling) == tag)
        }
        PseudoClass::OnlyOfType => {
            matches_pseudo_class(node, &PseudoClass::FirstOfType)
                && matches_pseudo_class(node, &PseudoClass::LastOfType)
        }
        PseudoClass::Root => dom_tree::parent_of(node)
            .is_some_and(|parent| matches!(*parent.borrow(), Node::DocumentRoot(_))),
        PseudoClass::Empty => node.borrow().children().iter().all(|child| match &*child.borrow() {
            Node::Comment(_) => true,
            Node::Text(text) => text.is_empty(),
            _ => false,
        }),
        PseudoClass::Link => {
            let tag = tag_of(node);
            (tag == "a" || tag == "area")
                && node
                    .borrow()
                    .as_element()
                    .is_some_and(|elem| elem.attribute("href").is_some())
        }
        PseudoClass::NthChild { a, b, from_end } => {
            let siblings = if *from_end {
                dom_tree::next_element_siblings(node)
            } else {
                dom_tree::previous_element_siblings(node)
            };
            nth_matches(*a, *b, siblings.len() as i32 + 1)
        }
        PseudoClass::Not(list) => !list.iter().any(|s| matches_complex_selector(node, s)),
        PseudoClass::Is(list) => list.iter().any(|s| matches_complex_selector(node, s)),
        PseudoClass::Dynamic(_) => false,
    }
}

/// Whether some n >= 0 gives `a*n + b == index`.
fn nth_matches(a: i32, b: i32, index: i32) -> bool {
    if a == 0 {
        return index == b;
    }
    // Widened so extreme coefficients can't overflow.
    let (a, diff) = (i64::from(a), i64::from(index) - i64::from(b));
    diff % a == 0 && diff / a >= 0
}

/// Matches a ComplexSelector against a candidate element.
/// The matching proceeds right-to-left, backtracking over ancestors and siblings.
pub fn matches_complex_selector(candidate: &NodeRef, complex: &ComplexSelector) -> bool {
    matches_compound(candidate, &complex.key) && matches_ancestors(candidate, complex, 0)
}

fn matches_ancestors(current: &NodeRef, complex: &ComplexSelector, index: usize) -> bool {
    let Some((combinator, compound)) = complex.ancestors.get(index) else {
        return true;
    };
    let step = |next: &NodeRef| {
        matches_compound(next, compound) && matches_ancestors(next, complex, index + 1)
    };
    match combinator {
        Combinator::Child => dom_tree::parent_element(current).is_some_and(|parent| step(&parent)),
        Combinator::Descendant => {
            let mut ancestor = dom_tree::parent_element(current);
            while let Some(node) = ancestor {
                if step(&node) {
                    return true;
                }
                ancestor = dom_tree::parent_element(&node);
            }
            false
        }
        Combinator::AdjacentSibling => dom_tree::previous_element_siblings(current)
            .first()
            .is_some_and(step),
        Combinator::GeneralSibling => dom_tree::previous_element_siblings(current)
            .iter()
            .any(step),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::dom_indices::DomIndices;
    use crate::parser::html::create_dom_tree;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <div class="red" id="outer">
    <p id="first" class="note">One</p>
    <p id="second" data-kind="main-item" lang="en-US">Two</p>
    <span id="third"></span>
  </div>
  <a id="link" href="/x">go</a>
</body></html>"#;

    fn element(indices: &DomIndices, id: &str) -> NodeRef {
        indices.by_id(id).unwrap()
    }

    fn check(selector: &str, id: &str) -> bool {
        let document = create_dom_tree(PAGE);
        let indices = DomIndices::build(&document);
        DomSelectorMatcher
            .matches(&element(&indices, id), selector)
            .unwrap()
    }

    #[test]
    fn test_simple_selectors() {
        assert!(check("p", "first"));
        assert!(check("#first", "first"));
        assert!(check("p.note", "first"));
        assert!(!check(".note", "second"));
        assert!(check("*", "third"));
    }

    #[test]
    fn test_combinators() {
        assert!(check(".red > p", "first"));
        assert!(check("body p#second", "second"));
        assert!(check("#first + p", "second"));
        assert!(check("#first ~ span", "third"));
        assert!(!check("#second + p", "first"));
        assert!(check("div>p", "first"));
    }

    #[test]
    fn test_descendant_backtracks_past_first_candidate() {
        // The nearest `div` ancestor is not a child of `.s`; the outer one is.
        let document = create_dom_tree(
            r#"<section class="s"><div><div><em id="target">x</em></div></div></section>"#,
        );
        let indices = DomIndices::build(&document);
        let target = element(&indices, "target");
        assert!(DomSelectorMatcher.matches(&target, ".s > div em").unwrap());
    }

    #[test]
    fn test_attribute_operators() {
        assert!(check("[data-kind]", "second"));
        assert!(check("[data-kind='main-item']", "second"));
        assert!(check("[data-kind^=main]", "second"));
        assert!(check("[data-kind$=\"item\"]", "second"));
        assert!(check("[data-kind*=n-i]", "second"));
        assert!(check("[lang|=en]", "second"));
        assert!(check("[data-kind='MAIN-ITEM' i]", "second"));
        assert!(!check("[data-kind='MAIN-ITEM']", "second"));
    }

    #[test]
    fn test_structural_pseudo_classes() {
        assert!(check("p:first-child", "first"));
        assert!(check("span:last-child", "third"));
        assert!(check("p:nth-child(2)", "second"));
        assert!(check(":nth-child(odd)", "third"));
        assert!(check("span:empty", "third"));
        assert!(check("p:not(.note)", "second"));
        assert!(check(":is(#first, #second)", "second"));
        assert!(check("a:link", "link"));
        assert!(check("p:first-of-type", "first"));
    }

    #[test]
    fn test_dynamic_state_and_pseudo_elements_never_match() {
        assert!(!check("p:hover", "first"));
        assert!(!check("p::before", "first"));
    }

    #[test]
    fn test_selector_list_matches_any_member() {
        assert!(check("h1, #second", "second"));
    }

    #[test]
    fn test_invalid_and_unsupported_selectors_are_errors() {
        let document = create_dom_tree(PAGE);
        let indices = DomIndices::build(&document);
        let first = element(&indices, "first");
        assert!(matches!(
            DomSelectorMatcher.matches(&first, "p >"),
            Err(SelectorError::Invalid(_))
        ));
        assert!(matches!(
            DomSelectorMatcher.matches(&first, "p:unknown-state"),
            Err(SelectorError::Unsupported(_))
        ));
        assert!(matches!(
            DomSelectorMatcher.matches(&first, "  "),
            Err(SelectorError::Empty)
        ));
        assert!(DomSelectorMatcher.matches(&first, "p, ").is_err());
    }

    #[test]
    fn test_an_plus_b() {
        assert_eq!(parse_an_plus_b("2n+1"), Some((2, 1)));
        assert_eq!(parse_an_plus_b("-n + 3"), Some((-1, 3)));
        assert_eq!(parse_an_plus_b("even"), Some((2, 0)));
        assert_eq!(parse_an_plus_b("4"), Some((0, 4)));
        assert_eq!(parse_an_plus_b("x"), None);
        assert!(nth_matches(-1, 3, 2));
        assert!(!nth_matches(-1, 3, 4));
    }

    #[test]
    fn test_extreme_an_plus_b_does_not_overflow() {
        assert_eq!(parse_an_plus_b("n-2147483648"), Some((1, i32::MIN)));
        assert!(check("p:nth-child(n-2147483648)", "first"));
        assert!(!check("p:nth-child(-2147483648n)", "first"));
        assert!(!check("p:nth-last-child(-2147483648n+2147483647)", "first"));
        assert!(!nth_matches(i32::MIN, i32::MAX, 1));
        assert!(nth_matches(1, i32::MIN, 1));
    }
}
