//! Runtime configuration.

use std::path::PathBuf;

pub const DEFAULT_PROMPT: &str = "db > ";

/// Settings for one interactive session over one database file.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backing file; created on first open if it does not exist.
    pub db_path: PathBuf,

    /// Text written before every input line.
    pub prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("simple.db"),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = prompt.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = Config::builder().db_path("/tmp/x.db").prompt("> ").build();
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.prompt, "> ");
    }

    #[test]
    fn default_prompt() {
        assert_eq!(Config::default().prompt, "db > ");
    }
}
