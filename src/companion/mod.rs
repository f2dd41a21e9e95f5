pub mod classify;
pub mod prompts;
pub mod spelling;

use std::sync::Arc;

use tracing::{debug, info};

use crate::llm::Completion;
use crate::topics::TopicStore;

pub use classify::classify;
pub use spelling::correct_spelling;

/// A topic-matched submission after the completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub topic: String,
    /// Question as sent to the completion service.
    pub question: String,
    /// `None` when the completion service gave nothing back.
    pub text: Option<String>,
    /// Randomly picked link for the topic.
    pub featured: Option<String>,
    /// Every link for the topic, in file order.
    pub links: Vec<String>,
}

impl Answer {
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Per-submission state. Nothing here outlives a single render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Idle {
        question: String,
    },
    Corrected {
        question: String,
        corrected: String,
    },
    Classified {
        corrected: String,
        topic: Option<String>,
    },
    Answered(Answer),
    Rejected {
        corrected: String,
    },
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Answered(_) | Stage::Rejected { .. })
    }
}

/// Drives a question from raw input to an answer or a rejection.
pub struct Companion {
    store: Arc<TopicStore>,
    completion: Arc<dyn Completion>,
}

impl Companion {
    pub fn new(store: Arc<TopicStore>, completion: Arc<dyn Completion>) -> Self {
        Self { store, completion }
    }

    pub fn store(&self) -> &TopicStore {
        &self.store
    }

    /// Run a submission to its terminal stage.
    ///
    /// A blank question is not a submission and comes back as `Idle`.
    pub async fn submit(&self, question: &str) -> Stage {
        let mut stage = Stage::Idle {
            question: question.to_string(),
        };
        if question.trim().is_empty() {
            return stage;
        }

        while !stage.is_terminal() {
            stage = self.step(stage).await;
        }
        stage
    }

    /// Advance one transition. Terminal stages are returned unchanged.
    pub async fn step(&self, stage: Stage) -> Stage {
        match stage {
            Stage::Idle { question } => {
                let corrected = correct_spelling(&question, self.store.topics());
                Stage::Corrected {
                    question,
                    corrected,
                }
            }
            Stage::Corrected {
                question,
                corrected,
            } => {
                if corrected != question {
                    debug!(question, corrected, "spelling corrected");
                }
                let topic = classify(&corrected, self.store.topics()).map(str::to_string);
                Stage::Classified { corrected, topic }
            }
            Stage::Classified {
                corrected,
                topic: None,
            } => {
                info!(question = corrected, "question rejected as off-topic");
                Stage::Rejected { corrected }
            }
            Stage::Classified {
                corrected,
                topic: Some(topic),
            } => self.answer(corrected, topic).await,
            terminal => terminal,
        }
    }

    async fn answer(&self, question: String, topic: String) -> Stage {
        info!(topic, "asking completion service");
        let text = self.completion.complete(&question).await;

        // Links accompany an answer only
        let (featured, links) = match text.as_deref() {
            Some(t) if !t.is_empty() => (
                self.store.pick_link(&topic).map(str::to_string),
                self.store.links(&topic).to_vec(),
            ),
            _ => (None, Vec::new()),
        };

        Stage::Answered(Answer {
            topic,
            question,
            text,
            featured,
            links,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::topics::BlogTable;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Canned completion that records what it was asked.
    pub(crate) struct FakeCompletion {
        reply: Option<String>,
        pub asked: Mutex<Vec<String>>,
    }

    impl FakeCompletion {
        pub(crate) fn new(reply: Option<&str>) -> Self {
            Self {
                reply: reply.map(str::to_string),
                asked: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Completion for FakeCompletion {
        async fn complete(&self, question: &str) -> Option<String> {
            self.asked.lock().unwrap().push(question.to_string());
            self.reply.clone()
        }
    }

    pub(crate) fn store() -> TopicStore {
        let mut blogs = BlogTable::new();
        blogs.insert(
            "anxiety".to_string(),
            vec!["https://a.com/1".into(), "https://a.com/2".into()],
        );
        blogs.insert("stress".to_string(), vec![]);
        TopicStore::new(
            vec!["anxiety".into(), "depression".into(), "stress".into()],
            blogs,
        )
    }

    fn companion(reply: Option<&str>) -> (Companion, Arc<FakeCompletion>) {
        let fake = Arc::new(FakeCompletion::new(reply));
        let companion = Companion::new(Arc::new(store()), fake.clone());
        (companion, fake)
    }

    #[tokio::test]
    async fn test_answers_matched_question() {
        let (companion, fake) = companion(Some("Try grounding exercises."));
        let stage = companion.submit("How do I cope with anxiety").await;

        let Stage::Answered(answer) = stage else {
            panic!("expected answer stage");
        };
        assert_eq!(answer.topic, "anxiety");
        assert_eq!(answer.question, "How do I cope with anxiety");
        assert_eq!(answer.text.as_deref(), Some("Try grounding exercises."));
        assert_eq!(answer.links, vec!["https://a.com/1", "https://a.com/2"]);
        assert!(answer.links.contains(answer.featured.as_ref().unwrap()));
        assert_eq!(
            *fake.asked.lock().unwrap(),
            vec!["How do I cope with anxiety".to_string()]
        );
    }

    #[tokio::test]
    async fn test_corrected_word_is_sent() {
        let (companion, fake) = companion(Some("ok"));
        companion.submit("coping with anxeity").await;
        assert_eq!(
            *fake.asked.lock().unwrap(),
            vec!["coping with anxiety".to_string()]
        );
    }

    #[tokio::test]
    async fn test_off_topic_is_rejected_without_calling_out() {
        let (companion, fake) = companion(Some("unused"));
        let stage = companion.submit("I feel anxious").await;

        assert_eq!(
            stage,
            Stage::Rejected {
                corrected: "I feel anxious".to_string()
            }
        );
        assert!(fake.asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_completion_has_no_text_or_links() {
        let (companion, _) = companion(None);
        let Stage::Answered(answer) = companion.submit("anxiety at night").await else {
            panic!("expected answer stage");
        };
        assert!(!answer.has_text());
        assert_eq!(answer.featured, None);
        assert!(answer.links.is_empty());
    }

    #[tokio::test]
    async fn test_topic_without_links() {
        let (companion, _) = companion(Some("Take breaks."));
        let Stage::Answered(answer) = companion.submit("work stress").await else {
            panic!("expected answer stage");
        };
        assert!(answer.has_text());
        assert_eq!(answer.featured, None);
        assert!(answer.links.is_empty());
    }

    #[tokio::test]
    async fn test_blank_question_stays_idle() {
        let (companion, fake) = companion(Some("unused"));
        let stage = companion.submit("   ").await;
        assert!(matches!(stage, Stage::Idle { .. }));
        assert!(fake.asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_step_by_step_transitions() {
        let (companion, _) = companion(Some("ok"));
        let stage = Stage::Idle {
            question: "depresion help".to_string(),
        };

        let stage = companion.step(stage).await;
        assert_eq!(
            stage,
            Stage::Corrected {
                question: "depresion help".to_string(),
                corrected: "depression help".to_string(),
            }
        );
        let stage = companion.step(stage).await;
        assert_eq!(
            stage,
            Stage::Classified {
                corrected: "depression help".to_string(),
                topic: Some("depression".to_string()),
            }
        );
        let stage = companion.step(stage).await;
        assert!(stage.is_terminal());
        let again = companion.step(stage.clone()).await;
        assert_eq!(again, stage);
    }

    #[tokio::test]
    async fn test_http_500_yields_silent_answer() {
        use crate::config::CompletionConfig;
        use crate::llm::CompletionClient;

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let client = CompletionClient::new(CompletionConfig {
            api_key: Some("k".into()),
            endpoint: Some(server.url()),
            deployment: "aasare-35".into(),
            api_version: "2024-02-15-preview".into(),
            model: "aasare".into(),
            system_prompt: prompts::DEFAULT_SYSTEM_PROMPT.into(),
        });
        let companion = Companion::new(Arc::new(store()), Arc::new(client));

        let Stage::Answered(answer) = companion.submit("anxiety").await else {
            panic!("expected answer stage");
        };
        assert_eq!(answer.text, None);
        assert!(answer.links.is_empty());
    }
}
