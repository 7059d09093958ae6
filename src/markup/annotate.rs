//! Mention annotation: turn plain-text occurrences of known entity names inside paragraphs into
//! entity links.
//!
//! Candidate labels come from two places:
//!
//! 1. every name in the [EntityIndex], linking to itself;
//! 2. the visible text of entity links already present in any paragraph, linking to the
//!    entity named by their `data-name` (so an author can link "James" to "James Minahan" once and
//!    have later bare "James" mentions follow). These override an index name with the same label.
//!
//! Labels are applied longest first. Only text nodes are rewritten and text already inside an
//! anchor is never touched, so a shorter label can't re-match inside a longer link and running the
//! annotator over its own output changes nothing.
use kuchikiki::{traits::NodeIterator, NodeRef};
use regex::Regex;
use std::collections::BTreeMap;

use crate::{
    entity::EntityIndex,
    error::LodError,
    markup::{link::LinkRenderer, Markup, ENTITY_LINK_SELECTOR},
};

/// Elements whose text content is never annotated.
const OPAQUE_ELEMENTS: [&str; 4] = ["a", "script", "style", "code"];

#[derive(Debug, Clone)]
struct Candidate {
    label: String,
    name: String,
    collection: String,
    pattern: Regex,
    word_start: bool,
    word_end: bool,
}

impl Candidate {
    fn new(label: &str, name: &str, collection: &str) -> Result<Candidate, LodError> {
        let word_start = label.chars().next().is_some_and(is_word_char);
        let word_end = label.chars().next_back().is_some_and(is_word_char);
        Ok(Candidate {
            label: label.to_string(),
            name: name.to_string(),
            collection: collection.to_string(),
            pattern: label_pattern(label, word_start, word_end)?,
            word_start,
            word_end,
        })
    }

    /// Whether a match bounded by `before`/`after` (the characters on either side, possibly
    /// from a neighbouring text node) is a whole word.
    fn bounded_by(&self, before: Option<char>, after: Option<char>) -> bool {
        !(self.word_start && before.is_some_and(is_word_char))
            && !(self.word_end && after.is_some_and(is_word_char))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whole-word pattern for `label`. A word boundary is only required on a side where the label
/// itself starts or ends with a word character, so labels like `Smith & Co.` still match.
fn label_pattern(label: &str, word_start: bool, word_end: bool) -> Result<Regex, LodError> {
    let leading = if word_start { r"\b" } else { "" };
    let trailing = if word_end { r"\b" } else { "" };
    Ok(Regex::new(&format!(
        "{leading}{}{trailing}",
        regex::escape(label)
    ))?)
}

fn by_length_desc(a: &&Candidate, b: &&Candidate) -> std::cmp::Ordering {
    b.label
        .chars()
        .count()
        .cmp(&a.label.chars().count())
        .then_with(|| a.label.cmp(&b.label))
}

/// Links mentions of indexed entities inside `<p>` elements.
///
/// Built once per site build: compiling the index's label patterns is the expensive part, and the
/// annotator holds no per-page state.
#[derive(Debug, Clone)]
pub struct MentionAnnotator<'a> {
    index: &'a EntityIndex,
    renderer: LinkRenderer,
    candidates: Vec<Candidate>,
}

impl<'a> MentionAnnotator<'a> {
    pub fn new(index: &'a EntityIndex, base_url: &str) -> Result<MentionAnnotator<'a>, LodError> {
        let candidates = index
            .entries()
            .filter(|(name, _)| !name.trim().is_empty())
            .map(|(name, collection)| Candidate::new(name, name, collection))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MentionAnnotator {
            index,
            renderer: LinkRenderer::new(base_url),
            candidates,
        })
    }

    pub fn renderer(&self) -> &LinkRenderer {
        &self.renderer
    }

    /// Annotate every paragraph of `markup` in place. Returns the number of links added.
    pub fn annotate(&self, markup: &Markup) -> Result<usize, LodError> {
        let paragraphs = markup.select("p")?;
        let aliases = self.document_aliases(markup)?;
        let mut candidates: Vec<&Candidate> = aliases.values().collect();
        candidates.extend(
            self.candidates
                .iter()
                .filter(|c| !aliases.contains_key(&c.label)),
        );
        candidates.sort_by(by_length_desc);

        let mut linked = 0;
        for para in paragraphs.iter() {
            // Linking never changes a paragraph's text, so one read filters every candidate.
            let text = para.as_node().text_contents();
            for candidate in candidates
                .iter()
                .filter(|c| text.contains(c.label.as_str()))
            {
                linked += self.link_candidate(para.as_node(), candidate)?;
            }
        }
        tracing::debug!(
            "Annotated {} paragraphs with {} candidate labels, {} links added",
            paragraphs.len(),
            candidates.len(),
            linked
        );
        Ok(linked)
    }

    /// Labels of entity links already present in the document's paragraphs, resolved through
    /// the index by their `data-name`. First occurrence of a label wins.
    fn document_aliases(&self, markup: &Markup) -> Result<BTreeMap<String, Candidate>, LodError> {
        let mut aliases = BTreeMap::new();
        for link in markup.select(&format!("p {ENTITY_LINK_SELECTOR}"))? {
            let label = link.as_node().text_contents();
            if label.trim().is_empty() || aliases.contains_key(&label) {
                continue;
            }
            let name = link
                .attributes
                .borrow()
                .get("data-name")
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| label.clone());
            match self.index.resolve(&name) {
                Some(collection) => {
                    let candidate = Candidate::new(&label, &name, collection)?;
                    aliases.insert(label, candidate);
                }
                None => {
                    tracing::debug!("Existing link '{}' names unknown entity '{}'", label, name);
                }
            }
        }
        Ok(aliases)
    }

    fn link_candidate(&self, paragraph: &NodeRef, candidate: &Candidate) -> Result<usize, LodError> {
        // Every text node in the paragraph, opaque ones included: a match at the edge of a node
        // is only a whole word if the visible text around it agrees.
        let text_nodes: Vec<(NodeRef, String)> = paragraph
            .descendants()
            .text_nodes()
            .map(|text| (text.as_node().clone(), text.borrow().clone()))
            .collect();

        let mut linked = 0;
        for (i, (node, text)) in text_nodes.iter().enumerate() {
            if is_opaque(node, paragraph) {
                continue;
            }
            let before = text_nodes[..i]
                .iter()
                .rev()
                .find_map(|(_, prev)| prev.chars().next_back());
            let after = text_nodes[i + 1..]
                .iter()
                .find_map(|(_, next)| next.chars().next());
            let spans: Vec<(usize, usize)> = candidate
                .pattern
                .find_iter(text)
                .filter(|m| {
                    candidate.bounded_by(
                        if m.start() == 0 { before } else { None },
                        if m.end() == text.len() { after } else { None },
                    )
                })
                .map(|m| (m.start(), m.end()))
                .collect();
            if spans.is_empty() {
                continue;
            }
            let mut cursor = 0;
            for (start, end) in spans.iter().copied() {
                if start > cursor {
                    node.insert_before(NodeRef::new_text(&text[cursor..start]));
                }
                let link = self.renderer.render_nodes(
                    &text[start..end],
                    &candidate.name,
                    &candidate.collection,
                )?;
                for link_node in link {
                    node.insert_before(link_node);
                }
                cursor = end;
            }
            if cursor < text.len() {
                node.insert_before(NodeRef::new_text(&text[cursor..]));
            }
            node.detach();
            linked += spans.len();
        }
        Ok(linked)
    }
}

/// Whether `node` sits inside an element (below `paragraph`) whose text must stay as is.
fn is_opaque(node: &NodeRef, paragraph: &NodeRef) -> bool {
    node.ancestors()
        .take_while(|ancestor| ancestor != paragraph)
        .any(|ancestor| {
            ancestor
                .as_element()
                .is_some_and(|el| OPAQUE_ELEMENTS.contains(&&*el.name.local))
        })
}
