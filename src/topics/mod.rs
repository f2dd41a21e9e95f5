pub mod load;
pub mod types;

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

pub use load::{load_blogs, load_topics};
pub use types::{BlogTable, LoadError, Topic};

/// Topic vocabulary and blog links, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TopicStore {
    topics: Vec<Topic>,
    blogs: BlogTable,
}

impl TopicStore {
    pub fn new(topics: Vec<Topic>, blogs: BlogTable) -> Self {
        Self { topics, blogs }
    }

    pub fn load(topics_path: &Path, blogs_path: &Path) -> Result<Self, LoadError> {
        let topics = load_topics(topics_path)?;
        let blogs = load_blogs(blogs_path)?;

        // Blog topics outside the vocabulary are kept; they are simply never looked up.
        let orphans = blogs.keys().filter(|t| !topics.contains(*t)).count();
        if orphans > 0 {
            debug!(orphans, "blog table has topics missing from the topic list");
        }

        info!(
            topics = topics.len(),
            blog_topics = blogs.len(),
            "topic store loaded"
        );
        Ok(Self::new(topics, blogs))
    }

    /// Topics in load order.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// All links for `topic`; empty when the topic has none.
    pub fn links(&self, topic: &str) -> &[String] {
        self.blogs.get(topic).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Uniformly random link for `topic`.
    pub fn pick_link(&self, topic: &str) -> Option<&str> {
        self.pick_link_with(topic, &mut rand::thread_rng())
    }

    pub fn pick_link_with<R: Rng + ?Sized>(&self, topic: &str, rng: &mut R) -> Option<&str> {
        let Some(links) = self.blogs.get(topic) else {
            warn!(topic, "no blogs found for topic");
            return None;
        };
        let link = links.choose(rng).map(String::as_str);
        if link.is_none() {
            warn!(topic, "blog list for topic is empty");
        }
        link
    }
}
