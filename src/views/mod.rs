//! Server-rendered pages.

use serde::Serialize;
use shelf_db::RequestRecord;
use tera::{Context, Tera};

use crate::modules::books::models::SearchOutcome;

const INDEX: &str = "index.html";
const SEARCH: &str = "search.html";

/// Compiled page templates, shared by every module.
#[derive(Debug)]
pub struct Views {
    tera: Tera,
}

#[derive(Serialize)]
struct IndexPage<'a> {
    requests: &'a [RequestRecord],
}

impl Views {
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (
                INDEX,
                include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/index.html")),
            ),
            (
                SEARCH,
                include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/search.html")),
            ),
        ])?;
        Ok(Self { tera })
    }

    /// Home page: the request list with add/toggle/delete forms.
    pub fn index(&self, requests: &[RequestRecord]) -> tera::Result<String> {
        self.render(INDEX, &IndexPage { requests })
    }

    /// Search page for one search outcome.
    pub fn search(&self, outcome: &SearchOutcome) -> tera::Result<String> {
        self.render(SEARCH, outcome)
    }

    fn render(&self, template: &str, page: &impl Serialize) -> tera::Result<String> {
        let context = Context::from_serialize(page)?;
        self.tera.render(template, &context)
    }
}
