use kuchikiki::NodeRef;

use crate::{entity::url_for, error::LodError, markup::parse_fragment};

/// Escape text for use in element content or a double-quoted attribute value.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Renders entity anchors.
///
/// The anchor uses RDFa (`property="name"`) to relate its text to the identifier in `href`, and
/// carries the canonical name and collection as data attributes for client-side scripts:
///
/// ```html
/// <a data-name="James Minahan" data-collection="people" property="name" href="/ed/people/james-minahan/">James</a>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRenderer {
    base_url: String,
}

impl LinkRenderer {
    pub fn new(base_url: &str) -> LinkRenderer {
        LinkRenderer {
            base_url: base_url.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Callers resolve `collection` first; an unresolved name is left as plain text instead.
    pub fn render(&self, display_text: &str, name: &str, collection: &str) -> String {
        self.render_markup(&escape_html(display_text), name, collection)
    }

    /// Like [LinkRenderer::render], but `display_html` is already markup and goes into the anchor
    /// as is.
    pub fn render_markup(&self, display_html: &str, name: &str, collection: &str) -> String {
        format!(
            "<a data-name=\"{}\" data-collection=\"{}\" property=\"name\" href=\"{}\">{}</a>",
            escape_html(name),
            escape_html(collection),
            escape_html(&url_for(collection, name, &self.base_url)),
            display_html
        )
    }

    /// [LinkRenderer::render] as detached tree nodes.
    pub fn render_nodes(
        &self,
        display_text: &str,
        name: &str,
        collection: &str,
    ) -> Result<Vec<NodeRef>, LodError> {
        parse_fragment(&self.render(display_text, name, collection))
    }
}
