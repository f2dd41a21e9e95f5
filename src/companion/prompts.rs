pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

pub const TITLE: &str = "Mental Health Companion";

pub const GREETING: &str =
    "Hello! I am your mental health companion. How can I assist you today?";

pub const OFF_TOPIC: &str = "The question should be related to mental health topics.";
