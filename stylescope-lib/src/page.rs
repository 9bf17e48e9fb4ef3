//! A parsed page: the DOM plus the stylesheets the inspector may read.

use crate::dom::dom_tree::{self, Document, NodeRef};
use crate::error::{AccessDenied, SelectorError, StyleError};
use crate::parser::dom_indices::DomIndices;
use crate::parser::html::create_dom_tree;
use crate::style::css_matcher::{DomSelectorMatcher, SelectorMatcher};
use crate::style::css_parse::parse_stylesheet;
use crate::style::cssom::{CssRule, StyleSheetHandle};
use url::Url;

/// Supplies the text of `<link rel="stylesheet">` targets.
pub trait StylesheetLoader {
    /// `None` when the sheet cannot be fetched.
    fn load(&self, url: &Url) -> Option<String>;
}

impl<F> StylesheetLoader for F
where
    F: Fn(&Url) -> Option<String>,
{
    fn load(&self, url: &Url) -> Option<String> {
        self(url)
    }
}

/// Loader for pages whose linked sheets are never available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLoader;

impl StylesheetLoader for NoLoader {
    fn load(&self, _url: &Url) -> Option<String> {
        None
    }
}

pub struct Page {
    document: Document,
    indices: DomIndices,
    stylesheets: Vec<StyleSheetHandle>,
    base_url: Option<Url>,
}

impl Page {
    /// Parses `html` and collects its stylesheets in document order.
    ///
    /// Linked sheets are resolved against `base_url`. A sheet from another
    /// origin, or one the loader cannot provide, is kept but its rules are
    /// `Err(AccessDenied)`. Without a base URL the document origin is opaque,
    /// so every linked sheet is cross-origin.
    pub fn parse(
        html: &str,
        base_url: Option<&str>,
        loader: &dyn StylesheetLoader,
    ) -> Result<Page, StyleError> {
        let base_url = base_url.map(Url::parse).transpose()?;
        let document = create_dom_tree(html);

        let mut stylesheets = Vec::new();
        for element in dom_tree::descendant_elements(&document.root) {
            let (tag, rel, href) = {
                let node = element.borrow();
                let Some(elem) = node.as_element() else {
                    continue;
                };
                (
                    elem.tag.to_ascii_lowercase(),
                    elem.attribute("rel").map(str::to_string),
                    elem.attribute("href").map(str::to_string),
                )
            };
            match tag.as_str() {
                "style" => {
                    let css_text = dom_tree::text_content(&element);
                    stylesheets.push(StyleSheetHandle::inline(parse_or_empty(&css_text, "<style>")));
                }
                "link" if is_stylesheet_link(rel.as_deref()) => {
                    if let Some(href) = href {
                        stylesheets.push(load_linked_sheet(&href, base_url.as_ref(), loader));
                    }
                }
                _ => {}
            }
        }

        let indices = DomIndices::build(&document);
        log::debug!(
            "page parsed with {} stylesheets ({} readable)",
            stylesheets.len(),
            stylesheets.iter().filter(|s| s.accessible()).count()
        );
        Ok(Page {
            document,
            indices,
            stylesheets,
            base_url,
        })
    }

    /// Builds a page from an existing document and a hand-assembled sheet list.
    pub fn from_parts(document: Document, stylesheets: Vec<StyleSheetHandle>) -> Page {
        let indices = DomIndices::build(&document);
        Page {
            document,
            indices,
            stylesheets,
            base_url: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn stylesheets(&self) -> &[StyleSheetHandle] {
        &self.stylesheets
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeRef> {
        self.indices.by_id(id)
    }

    pub fn elements_by_tag(&self, tag: &str) -> &[NodeRef] {
        self.indices.by_tag(tag)
    }

    /// First element in document order matching `selector`.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeRef>, SelectorError> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeRef>, SelectorError> {
        let mut found = Vec::new();
        for element in dom_tree::descendant_elements(&self.document.root) {
            if DomSelectorMatcher.matches(&element, selector)? {
                found.push(element);
            }
        }
        Ok(found)
    }
}

fn is_stylesheet_link(rel: Option<&str>) -> bool {
    rel.is_some_and(|rel| {
        rel.split_whitespace()
            .any(|token| token.eq_ignore_ascii_case("stylesheet"))
    })
}

fn parse_or_empty(css_text: &str, origin: &str) -> Vec<CssRule> {
    parse_stylesheet(css_text).unwrap_or_else(|err| {
        log::warn!("dropping unparsable stylesheet {}: {}", origin, err);
        Vec::new()
    })
}

fn load_linked_sheet(
    href: &str,
    base_url: Option<&Url>,
    loader: &dyn StylesheetLoader,
) -> StyleSheetHandle {
    let resolved = match base_url {
        Some(base) => base.join(href),
        None => Url::parse(href),
    };
    let url = match resolved {
        Ok(url) => url,
        Err(err) => {
            log::debug!("cannot resolve stylesheet href {}: {}", href, err);
            return StyleSheetHandle::denied(
                href,
                AccessDenied::Unavailable {
                    href: href.to_string(),
                },
            );
        }
    };

    let same_origin = base_url.is_some_and(|base| base.origin() == url.origin());
    if !same_origin {
        return StyleSheetHandle::denied(
            url.as_str(),
            AccessDenied::CrossOrigin {
                href: url.to_string(),
            },
        );
    }
    match loader.load(&url) {
        Some(css_text) => StyleSheetHandle::linked(url.as_str(), parse_or_empty(&css_text, url.as_str())),
        None => StyleSheetHandle::denied(
            url.as_str(),
            AccessDenied::Unavailable {
                href: url.to_string(),
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"<html><head>
        <link rel="stylesheet" href="/css/site.css">
        <link rel="stylesheet" href="https://cdn.example.net/lib.css">
        <link rel="icon" href="/favicon.ico">
        <link rel="stylesheet" href="/missing.css">
        <style>.a { color: red }</style>
    </head><body><div id="main" class="a">x</div></body></html>"#;

    fn loader(url: &Url) -> Option<String> {
        (url.path() == "/css/site.css").then(|| "#main { width: 10px }".to_string())
    }

    #[test]
    fn test_sheets_are_collected_in_document_order() {
        let page = Page::parse(HTML, Some("https://example.com/index.html"), &loader).unwrap();
        let sheets = page.stylesheets();
        assert_eq!(sheets.len(), 4);

        assert_eq!(sheets[0].href.as_deref(), Some("https://example.com/css/site.css"));
        assert!(sheets[0].accessible());
        assert!(matches!(sheets[1].rule_list(), Err(AccessDenied::CrossOrigin { .. })));
        assert!(matches!(sheets[2].rule_list(), Err(AccessDenied::Unavailable { .. })));
        assert!(sheets[3].is_inline());
    }

    #[test]
    fn test_without_base_url_linked_sheets_are_cross_origin() {
        let page = Page::parse(HTML, None, &NoLoader).unwrap();
        assert!(page.stylesheets().iter().filter(|s| !s.is_inline()).all(|s| !s.accessible()));
    }

    #[test]
    fn test_invalid_base_url_is_an_error() {
        assert!(matches!(
            Page::parse(HTML, Some("not a url"), &NoLoader),
            Err(StyleError::Url(_))
        ));
    }

    #[test]
    fn test_queries() {
        let page = Page::parse(HTML, None, &NoLoader).unwrap();
        assert!(page.element_by_id("main").is_some());
        assert_eq!(page.query_selector_all("div.a").unwrap().len(), 1);
        assert!(page.query_selector("p").unwrap().is_none());
        assert_eq!(page.elements_by_tag("link").len(), 4);
    }
}
