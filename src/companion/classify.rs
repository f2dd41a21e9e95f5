use crate::topics::Topic;

/// First topic (in load order) occurring anywhere in the lowercased question.
///
/// Plain substring containment: "pain" matches inside "painting".
pub fn classify<'a>(question: &str, topics: &'a [Topic]) -> Option<&'a str> {
    let question = question.to_lowercase();
    topics
        .iter()
        .find(|topic| question.contains(topic.as_str()))
        .map(String::as_str)
}
