pub static DEFAULT_CONCEPT_MAP_SYSTEM_PROMPT: &str = "You are a concept mapping assistant.";

pub static DEFAULT_CHAT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

pub static DEFAULT_MODEL: &str = "gpt-4";
