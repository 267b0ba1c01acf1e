pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-live-001";
pub const MODEL_ENV: &str = "DOCAGENT_MODEL";

/// Model selection shared by every agent in the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Identifier of the model the runtime should use.
    pub model: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ModelConfig {
    /// Defaults, with `DOCAGENT_MODEL` overriding the model when set and non-empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(MODEL_ENV).map(|m| m.trim().to_string()) {
            Some(model) if !model.is_empty() => Self { model },
            _ => Self::default(),
        }
    }
}
