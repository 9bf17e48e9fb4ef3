use html5ever::tendril::TendrilSink;
use stylescope_lib::dom::dom_tree::{self, NodeRef};
use stylescope_lib::parser::dom_indices::DomIndices;
use stylescope_lib::parser::html::{create_dom_tree, StyleScopeTreeSink};

#[cfg(test)]
pub mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub fn create_test_dom(html: &str) -> dom_tree::Document {
        let sink = StyleScopeTreeSink::new();
        html5ever::parse_document(sink, Default::default()).one(html.to_string())
    }

    fn collect_structure(node: &NodeRef) -> String {
        let mut output = String::new();
        traverse_node(node, 0, &mut output);
        output
    }

    fn traverse_node(node: &NodeRef, depth: usize, output: &mut String) {
        let node_ref = node.borrow();
        match &*node_ref {
            dom_tree::Node::DocumentRoot(root_node) => {
                for child in &root_node.children {
                    traverse_node(child, depth, output);
                }
            }
            dom_tree::Node::Element(elem_node) => {
                *output += &format!("{}<{}>\n", "  ".repeat(depth), elem_node.tag);
                for child in &elem_node.children {
                    traverse_node(child, depth + 1, output);
                }
            }
            dom_tree::Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    *output += &format!("{}{}\n", "  ".repeat(depth), trimmed);
                }
            }
            dom_tree::Node::Comment(_) => {}
        }
    }

    #[test]
    fn test_basic_structure() {
        let html = r#"
            <!DOCTYPE html>
            <html>
                <head>
                    <title>Test</title>
                </head>
                <body>
                    <h1>Hello</h1>
                    <p>World</p>
                </body>
            </html>
        "#;

        let document = create_test_dom(html);
        let structure = collect_structure(&document.root);

        let expected = r#"
<html>
  <head>
    <title>
      Test
  <body>
    <h1>
      Hello
    <p>
      World
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_void_elements() {
        let html = r#"
            <img src="test.jpg" alt="Test">
            <br>
            <input type="text">
        "#;

        let document = create_test_dom(html);
        let structure = collect_structure(&document.root);

        let expected = r#"
<html>
  <head>
  <body>
    <img>
    <br>
    <input>
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_attributes_keep_source_order() {
        let html = r#"
            <a href="https://example.com" target="_blank" data-test="123">
                Link
            </a>
        "#;

        let document = create_test_dom(html);
        let indices = DomIndices::build(&document);
        let anchors = indices.by_tag("a");
        assert_eq!(anchors.len(), 1);

        let anchor = anchors[0].borrow();
        let elem = anchor.as_element().unwrap();
        assert_eq!(
            elem.attributes,
            vec![
                ("href".to_string(), "https://example.com".to_string()),
                ("target".to_string(), "_blank".to_string()),
                ("data-test".to_string(), "123".to_string())
            ]
        );
        assert_eq!(elem.attribute("TARGET"), Some("_blank"));
    }

    #[test]
    fn test_mixed_content() {
        let html = r#"
            <p>
                This is <strong>bold</strong> and <em>italic</em> text.
                <br>
                Next line.
            </p>
        "#;

        let document = create_test_dom(html);
        let structure = collect_structure(&document.root);

        let expected = r#"
<html>
  <head>
  <body>
    <p>
      This is
      <strong>
        bold
      and
      <em>
        italic
      text.
      <br>
      Next line.
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_parent_links() {
        let html = r#"<div id="outer"><section><p id="leaf">Deep</p></section></div>"#;
        let document = create_dom_tree(html);
        let indices = DomIndices::build(&document);

        let leaf = indices.by_id("leaf").unwrap();
        let section = dom_tree::parent_element(&leaf).unwrap();
        let outer = dom_tree::parent_element(&section).unwrap();
        assert_eq!(section.borrow().as_element().unwrap().tag, "section");
        assert_eq!(outer.borrow().as_element().unwrap().id(), Some("outer"));
        assert_eq!(dom_tree::text_content(&leaf), "Deep");
    }

    #[test]
    fn test_siblings() {
        let html = r#"<ul><li id="a">1</li> <li id="b">2</li> <li id="c">3</li></ul>"#;
        let document = create_dom_tree(html);
        let indices = DomIndices::build(&document);
        let b = indices.by_id("b").unwrap();

        let ids = |nodes: Vec<NodeRef>| -> Vec<String> {
            nodes
                .iter()
                .filter_map(|n| n.borrow().as_element().and_then(|e| e.id()).map(String::from))
                .collect()
        };
        assert_eq!(ids(dom_tree::previous_element_siblings(&b)), vec!["a"]);
        assert_eq!(ids(dom_tree::next_element_siblings(&b)), vec!["c"]);
    }

    #[test]
    fn test_doctype() {
        let html = r#"
            <!DOCTYPE html>
            <html>
                <head></head>
            </html>
        "#;

        let document = create_test_dom(html);
        assert_eq!(document.doctype.borrow().as_ref().unwrap().name, "html");
    }

    #[test]
    fn test_malformed_html() {
        let html = r#"
            <div>
                <p>Unclosed
                <img>
                </div>
        "#;

        let document = create_test_dom(html);
        let structure = collect_structure(&document.root);

        let expected = r#"
<html>
  <head>
  <body>
    <div>
      <p>
        Unclosed
        <img>
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_table_autocorrection() {
        let html = "<table><td>Cell</td></table>";
        let document = create_test_dom(html);
        let structure = collect_structure(&document.root);

        let expected = r#"
<html>
  <head>
  <body>
    <table>
      <tbody>
        <tr>
          <td>
            Cell
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_formatting_elements_are_reconstructed() {
        let html = "<p><b>one<p>two</b></p>";
        let document = create_test_dom(html);
        let structure = collect_structure(&document.root);

        let expected = r#"
<html>
  <head>
  <body>
    <p>
      <b>
        one
    <p>
      <b>
        two
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_class_index() {
        let html = r#"<div class="card big"></div><span class="card"></span>"#;
        let document = create_dom_tree(html);
        let indices = DomIndices::build(&document);
        assert_eq!(indices.by_class("card").len(), 2);
        assert_eq!(indices.by_class("big").len(), 1);
        assert!(indices.by_class("missing").is_empty());
    }
}
