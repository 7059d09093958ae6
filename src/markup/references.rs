use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::{
    entity::Reference,
    error::LodError,
    markup::{ids::paragraph_id, select_in, Markup, ENTITY_LINK_SELECTOR},
};

/// Paragraph id → distinct entities linked in that paragraph, both in document order.
///
/// Serializes as a JSON object whose keys keep paragraph order (`para-2` before `para-10`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphReferences(Vec<(String, Vec<Reference>)>);

impl ParagraphReferences {
    pub fn get(&self, paragraph: &str) -> Option<&[Reference]> {
        self.0
            .iter()
            .find(|(key, _)| key == paragraph)
            .map(|(_, refs)| refs.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Reference])> {
        self.0.iter().map(|(key, refs)| (key.as_str(), refs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> Result<String, LodError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for ParagraphReferences {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, refs) in self.0.iter() {
            map.serialize_entry(key, refs)?;
        }
        map.end()
    }
}

/// Collect the entity links of each `<p>`. Paragraphs are numbered over all paragraphs, matching
/// the ids from [crate::markup::assign_ids]; paragraphs without links are omitted. Missing link
/// attributes read as empty strings.
pub fn paragraph_references(markup: &Markup) -> Result<ParagraphReferences, LodError> {
    let mut references = Vec::new();
    for (index, para) in markup.select("p")?.iter().enumerate() {
        let mut para_refs: Vec<Reference> = Vec::new();
        for link in select_in(para.as_node(), ENTITY_LINK_SELECTOR)? {
            let attributes = link.attributes.borrow();
            let attr = |key: &str| attributes.get(key).unwrap_or_default().to_string();
            let reference = Reference {
                url: attr("href"),
                name: attr("data-name"),
                collection: attr("data-collection"),
            };
            if !para_refs.contains(&reference) {
                para_refs.push(reference);
            }
        }
        if !para_refs.is_empty() {
            references.push((paragraph_id(index), para_refs));
        }
    }
    Ok(ParagraphReferences(references))
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAMES: &str = "<a data-name=\"James Minahan\" data-collection=\"people\" property=\"name\" \
                         href=\"/people/james-minahan/\">James</a>";
    const HOBART: &str = "<a data-name=\"Hobart\" data-collection=\"places\" property=\"name\" \
                          href=\"/places/hobart/\">Hobart</a>";

    #[test]
    fn test_dedup_within_paragraph() {
        let content = format!("<p>{JAMES}, {JAMES} and {JAMES} in {HOBART}</p>");
        let refs = paragraph_references(&Markup::parse(&content)).unwrap();
        let para = refs.get("para-0").unwrap();
        assert_eq!(para.len(), 2);
        assert_eq!(para[0].name, "James Minahan");
        assert_eq!(para[1].url, "/places/hobart/");
    }

    #[test]
    fn test_empty_paragraphs_omitted_but_counted() {
        let content = format!("<p>nothing</p><p>{HOBART}</p><p>none</p><p>{JAMES}</p>");
        let refs = paragraph_references(&Markup::parse(&content)).unwrap();
        let keys: Vec<&str> = refs.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["para-1", "para-3"]);
    }

    #[test]
    fn test_plain_links_ignored() {
        let refs = paragraph_references(&Markup::parse("<p><a href=\"/x\">x</a></p>")).unwrap();
        assert!(refs.is_empty());
        assert_eq!(refs.to_json().unwrap(), "{}");
    }

    #[test]
    fn test_json_keeps_document_order() {
        let mut content = String::new();
        for _ in 0..11 {
            content.push_str(&format!("<p>{HOBART}</p>"));
        }
        let refs = paragraph_references(&Markup::parse(&content)).unwrap();
        let json = refs.to_json().unwrap();
        let para_2 = json.find("\"para-2\"").unwrap();
        let para_10 = json.find("\"para-10\"").unwrap();
        assert!(para_2 < para_10);
        assert!(json.starts_with(
            "{\"para-0\":[{\"url\":\"/places/hobart/\",\"name\":\"Hobart\",\"collection\":\"places\"}]"
        ));
    }
}
