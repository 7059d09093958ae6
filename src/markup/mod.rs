//! HTML tree handling for the page-level passes: id assignment, mention annotation and
//! reference extraction all operate on a parsed [Markup] document and serialize it back out.
use kuchikiki::{traits::TendrilSink, ElementData, NodeDataRef, NodeRef};
use pulldown_cmark::{html::write_html_fmt, Options, Parser as MdParser};

use crate::error::LodError;

pub mod annotate;
pub mod ids;
pub mod link;
pub mod references;

pub use annotate::MentionAnnotator;
pub use ids::assign_ids;
pub use link::{escape_html, LinkRenderer};
pub use references::{paragraph_references, ParagraphReferences};

/// Selector for anchors produced by [LinkRenderer].
pub const ENTITY_LINK_SELECTOR: &str = "a[property=name]";

/// A parsed HTML document.
///
/// Content that arrives as a fragment (the usual case for rendered page content) is serialized
/// back as a fragment; a full document keeps its `<html>` wrapper.
#[derive(Debug, Clone)]
pub struct Markup {
    document: NodeRef,
    full_document: bool,
}

impl Markup {
    pub fn parse(content: &str) -> Markup {
        let lowered: String = content
            .trim_start()
            .chars()
            .take(512)
            .collect::<String>()
            .to_ascii_lowercase();
        let full_document = lowered.starts_with("<!doctype") || lowered.contains("<html");
        Markup {
            document: kuchikiki::parse_html().one(content),
            full_document,
        }
    }

    pub fn document(&self) -> &NodeRef {
        &self.document
    }

    /// Elements matching `selector`, in document order. The result is collected up front so
    /// callers may mutate the tree while walking it.
    pub fn select(&self, selector: &str) -> Result<Vec<NodeDataRef<ElementData>>, LodError> {
        select_in(&self.document, selector)
    }

    pub fn to_html(&self) -> String {
        if self.full_document {
            return self.document.to_string();
        }
        // Leading <script>/<style> in a fragment are hoisted into the synthesized <head>, and
        // comments ahead of the first element hang off the document node itself.
        let mut html = String::new();
        for child in self.document.children() {
            if !is_element(&child, &["html"]) {
                html.push_str(&child.to_string());
                continue;
            }
            for section in child.children() {
                if is_element(&section, &["head", "body"]) {
                    html.push_str(&inner_html(&section));
                } else {
                    html.push_str(&section.to_string());
                }
            }
        }
        html
    }
}

fn is_element(node: &NodeRef, names: &[&str]) -> bool {
    node.as_element()
        .is_some_and(|element| names.contains(&&*element.name.local))
}

pub fn select_in(
    node: &NodeRef,
    selector: &str,
) -> Result<Vec<NodeDataRef<ElementData>>, LodError> {
    node.select(selector)
        .map(|matches| matches.collect())
        .map_err(|()| LodError::Markup(format!("Invalid selector '{selector}'")))
}

/// Serialized children of `node`, without the node's own tags.
pub fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| child.to_string()).collect()
}

/// Parse a markup fragment into detached nodes ready to be grafted into another tree.
pub fn parse_fragment(fragment: &str) -> Result<Vec<NodeRef>, LodError> {
    let document = kuchikiki::parse_html().one(fragment);
    let body = document
        .select_first("body")
        .map_err(|()| LodError::Markup(format!("Fragment did not parse: {fragment}")))?;
    let nodes: Vec<NodeRef> = body.as_node().children().collect();
    for node in nodes.iter() {
        node.detach();
    }
    Ok(nodes)
}

pub fn markdown_options() -> Options {
    let mut md_options = Options::empty();
    md_options.insert(Options::ENABLE_FOOTNOTES);
    md_options.insert(Options::ENABLE_STRIKETHROUGH);
    md_options.insert(Options::ENABLE_TABLES);
    md_options
}

/// Render markdown source to the HTML the page passes expect.
pub fn markdown_to_html(content: &str) -> Result<String, LodError> {
    let mut output = String::with_capacity(content.len() * 3 / 2);
    let parser = MdParser::new_ext(content, markdown_options());
    write_html_fmt(&mut output, parser)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_round_trip() {
        let markup = Markup::parse("<p>One &amp; two</p><blockquote><p>Three</p></blockquote>");
        assert_eq!(
            markup.to_html(),
            "<p>One &amp; two</p><blockquote><p>Three</p></blockquote>"
        );
    }

    #[test]
    fn test_full_document_keeps_wrapper() {
        let markup = Markup::parse("<!DOCTYPE html><html><head></head><body><p>x</p></body></html>");
        let html = markup.to_html();
        assert!(html.contains("<html>"));
        assert!(html.contains("<p>x</p>"));
    }

    #[test]
    fn test_leading_script_is_kept() {
        let content = "<script type=\"application/ld+json\">{}</script><p>x</p>";
        assert_eq!(Markup::parse(content).to_html(), content);
    }

    #[test]
    fn test_leading_comment_is_kept() {
        let content = "<!-- intro --><p>x</p><!-- outro -->";
        assert_eq!(Markup::parse(content).to_html(), content);
    }

    #[test]
    fn test_invalid_selector() {
        let markup = Markup::parse("<p>x</p>");
        assert!(matches!(markup.select("p[["), Err(LodError::Markup(_))));
    }

    #[test]
    fn test_parse_fragment_detaches_nodes() {
        let nodes = parse_fragment("<a href=\"/x\">x</a> tail").unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|node| node.parent().is_none()));
        assert_eq!(nodes[0].to_string(), "<a href=\"/x\">x</a>");
    }

    #[test]
    fn test_markdown_to_html() {
        let html = markdown_to_html("James Minahan *arrived*.\n\n> A quote\n").unwrap();
        assert!(html.contains("<p>James Minahan <em>arrived</em>.</p>"));
        assert!(html.contains("<blockquote>"));
    }
}
