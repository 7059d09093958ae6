//! Template call sites, bound to one site's configuration and entity index.
use crate::{
    config::SiteConfig,
    entity::{entity_url, EntityIndex},
    error::LodError,
    jsonld::{GraphBuilder, Page},
    markup::{
        assign_ids, paragraph_references, LinkRenderer, Markup, MentionAnnotator,
    },
    slug::slugify,
};

/// The operations a static-site template layer calls, each taking its inputs explicitly.
///
/// ```rust
/// use lod_core::{Entity, EntityIndex, Filters, SiteConfig};
///
/// let config = SiteConfig::new("", "/ed").unwrap();
/// let index = EntityIndex::build(vec![Entity::new("James Minahan", "people")]);
/// let filters = Filters::new(&config, &index).unwrap();
///
/// assert_eq!(filters.entity_url("James Minahan", "people"), "/ed/people/james-minahan/");
/// let html = filters.annotate_and_assign_ids("<p>James Minahan arrived.</p>").unwrap();
/// assert!(html.contains("id=\"para-0\""));
/// ```
#[derive(Debug, Clone)]
pub struct Filters<'a> {
    config: &'a SiteConfig,
    index: &'a EntityIndex,
    annotator: MentionAnnotator<'a>,
    graphs: GraphBuilder<'a>,
}

impl<'a> Filters<'a> {
    pub fn new(config: &'a SiteConfig, index: &'a EntityIndex) -> Result<Filters<'a>, LodError> {
        Ok(Filters {
            config,
            index,
            annotator: MentionAnnotator::new(index, &config.base_url)?,
            graphs: GraphBuilder::new(config),
        })
    }

    pub fn config(&self) -> &SiteConfig {
        self.config
    }

    pub fn index(&self) -> &EntityIndex {
        self.index
    }

    pub fn slug(&self, text: &str) -> String {
        slugify(text)
    }

    /// Link `display_text` to the entity `name` (or to `display_text` itself when `name` is
    /// empty). An unknown name is reported and the display text returned unlinked.
    ///
    /// Templates pass display text that may already carry markup (`<em>James</em>`), so it is
    /// written into the anchor unescaped. Attribute values are still escaped.
    pub fn link_to(&self, display_text: &str, name: &str) -> String {
        let name = if name.is_empty() { display_text } else { name };
        match self.index.resolve(name) {
            Some(collection) => self.renderer().render_markup(display_text, name, collection),
            None => {
                tracing::warn!("Not found: {}", name);
                display_text.to_string()
            }
        }
    }

    pub fn entity_url(&self, name: &str, collection: &str) -> String {
        entity_url(&self.config.site_url, &self.config.base_url, collection, name)
    }

    /// Site-relative URL of a generated record page, honouring `page_gen_dirs`.
    pub fn datapage_url(&self, name: &str, dir: &str) -> String {
        if self.config.page_gen_dirs {
            format!("{}/{}/{}/index.html", self.config.base_url, dir, slugify(name))
        } else {
            format!("{}/{}/{}.html", self.config.base_url, dir, slugify(name))
        }
    }

    pub fn assign_ids(&self, content: &str) -> Result<String, LodError> {
        let markup = Markup::parse(content);
        assign_ids(&markup)?;
        Ok(markup.to_html())
    }

    pub fn annotate(&self, content: &str) -> Result<String, LodError> {
        let markup = Markup::parse(content);
        self.annotator.annotate(&markup)?;
        Ok(markup.to_html())
    }

    pub fn annotate_and_assign_ids(&self, content: &str) -> Result<String, LodError> {
        let markup = Markup::parse(content);
        assign_ids(&markup)?;
        self.annotator.annotate(&markup)?;
        Ok(markup.to_html())
    }

    /// JSON object of paragraph id → distinct references, for already annotated markup.
    pub fn paragraph_references(&self, annotated: &str) -> Result<String, LodError> {
        paragraph_references(&Markup::parse(annotated))?.to_json()
    }

    pub fn page_graph(&self, page: &Page) -> Result<String, LodError> {
        self.graphs.page_graph_script(page)
    }

    pub fn mentions_graph(&self, page: &Page) -> Result<String, LodError> {
        self.graphs.mentions_script(page)
    }

    fn renderer(&self) -> &LinkRenderer {
        self.annotator.renderer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::helpers::{minahan_index, site_config};

    #[test]
    fn test_link_to() {
        let config = site_config();
        let index = minahan_index();
        let filters = Filters::new(&config, &index).unwrap();
        assert_eq!(
            filters.link_to("James Minahan", ""),
            "<a data-name=\"James Minahan\" data-collection=\"people\" property=\"name\" \
             href=\"/ed/people/james-minahan/\">James Minahan</a>"
        );
        assert!(filters
            .link_to("James", "James Minahan")
            .ends_with("href=\"/ed/people/james-minahan/\">James</a>"));
        assert_eq!(filters.link_to("Nobody", ""), "Nobody");
    }

    #[test]
    fn test_link_to_keeps_display_markup() {
        let config = site_config();
        let index = minahan_index();
        let filters = Filters::new(&config, &index).unwrap();
        assert!(filters
            .link_to("<em>James</em>", "James Minahan")
            .ends_with("href=\"/ed/people/james-minahan/\"><em>James</em></a>"));
        assert_eq!(
            filters.link_to("<em>Nobody</em>", "Nobody"),
            "<em>Nobody</em>"
        );
    }

    #[test]
    fn test_urls() {
        let mut config = site_config();
        let index = minahan_index();
        {
            let filters = Filters::new(&config, &index).unwrap();
            assert_eq!(
                filters.entity_url("James Minahan", "people"),
                "https://example.org/ed/people/james-minahan/"
            );
            assert_eq!(
                filters.datapage_url("James Minahan", "people"),
                "/ed/people/james-minahan.html"
            );
            assert_eq!(filters.slug("James Minahan"), "james-minahan");
        }
        config.page_gen_dirs = true;
        let filters = Filters::new(&config, &index).unwrap();
        assert_eq!(
            filters.datapage_url("James Minahan", "people"),
            "/ed/people/james-minahan/index.html"
        );
    }

    #[test]
    fn test_ids_and_annotation_separately() {
        let config = site_config();
        let index = minahan_index();
        let filters = Filters::new(&config, &index).unwrap();
        let ids_only = filters.assign_ids("<p>James Minahan</p>").unwrap();
        assert_eq!(ids_only, "<p id=\"para-0\">James Minahan</p>");
        let linked = filters.annotate("<p>James Minahan</p>").unwrap();
        assert!(linked.starts_with("<p><a "));
    }

    #[test]
    fn test_surrounding_markup_is_kept() {
        let config = site_config();
        let index = minahan_index();
        let filters = Filters::new(&config, &index).unwrap();
        let html = filters
            .annotate_and_assign_ids("<!-- generated --><p>Hobart</p><!-- end -->")
            .unwrap();
        assert!(html.starts_with("<!-- generated --><p id=\"para-0\"><a "));
        assert!(html.ends_with("Hobart</a></p><!-- end -->"));
    }
}
