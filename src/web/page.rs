use serde::Serialize;
use tera::{Context, Tera};

use crate::companion::prompts::{GREETING, OFF_TOPIC, TITLE};
use crate::companion::Stage;

const TEMPLATE_NAME: &str = "index.html";

#[derive(Debug, Serialize)]
struct LinkView<'a> {
    url: &'a str,
    featured: bool,
}

/// Compiled page template.
pub struct Page {
    tera: Tera,
}

impl Page {
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, include_str!("../../templates/index.html"))?;
        Ok(Self { tera })
    }

    /// Render the page, with the outcome of `stage` when there is one.
    pub fn render(&self, question: &str, stage: Option<&Stage>) -> tera::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("title", TITLE);
        ctx.insert("greeting", GREETING);
        ctx.insert("question", question);

        let mut answer_text = None;
        let mut rejection = None;
        let mut links: Vec<LinkView> = Vec::new();
        match stage {
            Some(Stage::Answered(answer)) if answer.has_text() => {
                answer_text = answer.text.as_deref();
                let mut featured_seen = false;
                for url in answer.links.iter().map(String::as_str) {
                    let featured = !featured_seen && answer.featured.as_deref() == Some(url);
                    featured_seen |= featured;
                    links.push(LinkView { url, featured });
                }
            }
            Some(Stage::Rejected { .. }) => rejection = Some(OFF_TOPIC),
            _ => {}
        }
        ctx.insert("answer", &answer_text);
        ctx.insert("rejection", &rejection);
        ctx.insert("links", &links);

        self.tera.render(TEMPLATE_NAME, &ctx)
    }
}
