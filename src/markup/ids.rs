use crate::{error::LodError, markup::Markup};

pub const PARAGRAPH_ID_PREFIX: &str = "para-";
pub const QUOTE_ID_PREFIX: &str = "quote-";

pub fn paragraph_id(index: usize) -> String {
    format!("{PARAGRAPH_ID_PREFIX}{index}")
}

pub fn quote_id(index: usize) -> String {
    format!("{QUOTE_ID_PREFIX}{index}")
}

/// Number every `<p>` as `para-<i>` and every `<blockquote>` as `quote-<i>`, each sequence zero
/// based and in document order. Existing ids are overwritten, so re-running after structural
/// edits renumbers.
pub fn assign_ids(markup: &Markup) -> Result<(), LodError> {
    for (index, para) in markup.select("p")?.iter().enumerate() {
        para.attributes
            .borrow_mut()
            .insert("id", paragraph_id(index));
    }
    for (index, quote) in markup.select("blockquote")?.iter().enumerate() {
        quote.attributes.borrow_mut().insert("id", quote_id(index));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(markup: &Markup, selector: &str) -> Vec<String> {
        markup
            .select(selector)
            .unwrap()
            .iter()
            .map(|el| el.attributes.borrow().get("id").unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_independent_sequences() {
        let markup = Markup::parse(
            "<p>a</p><blockquote><p>b</p></blockquote><p>c</p><blockquote>d</blockquote>",
        );
        assign_ids(&markup).unwrap();
        assert_eq!(ids(&markup, "p"), vec!["para-0", "para-1", "para-2"]);
        assert_eq!(ids(&markup, "blockquote"), vec!["quote-0", "quote-1"]);
    }

    #[test]
    fn test_existing_ids_are_replaced() {
        let markup = Markup::parse("<p id=\"intro\">a</p><p id=\"para-7\">b</p>");
        assign_ids(&markup).unwrap();
        assert_eq!(ids(&markup, "p"), vec!["para-0", "para-1"]);
    }

    #[test]
    fn test_rerun_is_stable() {
        let markup = Markup::parse("<p>a</p><blockquote>q</blockquote>");
        assign_ids(&markup).unwrap();
        let once = markup.to_html();
        let again = Markup::parse(&once);
        assign_ids(&again).unwrap();
        assert_eq!(again.to_html(), once);
    }

    #[test]
    fn test_no_targets() {
        let markup = Markup::parse("<div>nothing here</div>");
        assign_ids(&markup).unwrap();
        assert_eq!(markup.to_html(), "<div>nothing here</div>");
    }
}
