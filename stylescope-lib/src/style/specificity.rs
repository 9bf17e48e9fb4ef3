//! Approximate selector specificity.
//!
//! Specificity here is counted by scanning the selector text, not by parsing a
//! selector grammar: `#x` counts as an id, `.x`, `[..]` and `:x` as the class
//! column, and each leading identifier of a compound as a type. Arguments of
//! functional pseudo-classes are scanned like any other text, so `:not(.a)`
//! counts twice in the class column. This mirrors the inspector heuristic and
//! is not W3C specificity.

use crate::style::css_matcher::split_selector_list;
use std::cmp::Ordering;

/// (id count, class + attribute + pseudo-class count, type count)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    pub fn ids(&self) -> u32 {
        self.0
    }

    pub fn classes(&self) -> u32 {
        self.1
    }

    pub fn types(&self) -> u32 {
        self.2
    }
}

/// Specificity of a selector list: the highest of its comma-separated members.
pub fn selector_specificity(selector_text: &str) -> Specificity {
    split_selector_list(selector_text)
        .into_iter()
        .map(count_specificity)
        .max()
        .unwrap_or_default()
}

fn skip_ident(chars: &[char], mut idx: usize) -> usize {
    while idx < chars.len() {
        let ch = chars[idx];
        if ch == '\\' {
            idx += 2;
        } else if ch.is_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
            idx += 1;
        } else {
            break;
        }
    }
    idx.min(chars.len())
}

/// Counts one complex selector by character scanning.
fn count_specificity(selector: &str) -> Specificity {
    let chars: Vec<char> = selector.chars().collect();
    let mut spec = Specificity::default();
    let mut idx = 0;
    // A type selector can only start where a compound starts.
    let mut at_compound_start = true;

    while idx < chars.len() {
        let ch = chars[idx];
        match ch {
            '#' => {
                let end = skip_ident(&chars, idx + 1);
                if end > idx + 1 {
                    spec.0 += 1;
                }
                idx = end;
                at_compound_start = false;
            }
            '.' => {
                let end = skip_ident(&chars, idx + 1);
                if end > idx + 1 {
                    spec.1 += 1;
                }
                idx = end;
                at_compound_start = false;
            }
            '[' => {
                spec.1 += 1;
                idx = skip_bracket(&chars, idx);
                at_compound_start = false;
            }
            ':' => {
                if chars.get(idx + 1) == Some(&':') {
                    // Pseudo-elements are left out of the count.
                    idx = skip_ident(&chars, idx + 2);
                } else {
                    let end = skip_ident(&chars, idx + 1);
                    if end > idx + 1 {
                        spec.1 += 1;
                    }
                    idx = end;
                }
                at_compound_start = false;
            }
            '(' | ',' | ' ' | '\t' | '\n' | '>' | '+' | '~' => {
                idx += 1;
                at_compound_start = true;
            }
            '*' => {
                idx += 1;
                at_compound_start = false;
            }
            '"' | '\'' => {
                idx = skip_string(&chars, idx);
                at_compound_start = false;
            }
            _ if at_compound_start && (ch.is_alphabetic() || ch == '_' || ch == '\\') => {
                spec.2 += 1;
                idx = skip_ident(&chars, idx);
                at_compound_start = false;
            }
            _ => {
                idx += 1;
                at_compound_start = false;
            }
        }
    }
    spec
}

/// Index just past the `]` closing the bracket at `start`, honouring quotes.
fn skip_bracket(chars: &[char], start: usize) -> usize {
    let mut idx = start + 1;
    while idx < chars.len() {
        match chars[idx] {
            ']' => return idx + 1,
            '"' | '\'' => idx = skip_string(chars, idx),
            _ => idx += 1,
        }
    }
    chars.len()
}

fn skip_string(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut idx = start + 1;
    while idx < chars.len() {
        match chars[idx] {
            '\\' => idx += 2,
            ch if ch == quote => return idx + 1,
            _ => idx += 1,
        }
    }
    chars.len()
}

/// Sorts items by descending selector specificity. The sort is stable, so
/// equal specificities keep their discovery order.
pub fn sort_by_specificity<T, F>(items: &mut [T], selector_of: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| compare_descending(selector_of(a), selector_of(b)));
}

fn compare_descending(a: &str, b: &str) -> Ordering {
    selector_specificity(b).cmp(&selector_specificity(a))
}
