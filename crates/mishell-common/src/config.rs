//! User configuration. Entirely optional: a missing or unparsable config
//! file falls back to defaults rather than failing the shell to start.

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MishellConfig {
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl Default for MishellConfig {
    fn default() -> Self {
        Self {
            prompt: PromptConfig::default(),
            completion: CompletionConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_prompt_template")]
    pub template: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: default_prompt_template(),
        }
    }
}

fn default_prompt_template() -> String {
    "$ ".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_search_cwd")]
    pub search_cwd: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            search_cwd: default_search_cwd(),
        }
    }
}

fn default_search_cwd() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

fn default_max_entries() -> usize {
    1000
}

/// Load `$XDG_CONFIG_HOME/mishell/config.toml`, falling back to
/// `~/.config/mishell/config.toml`. Never fails: a missing file or a
/// parse error both yield `MishellConfig::default()`.
pub fn load_config() -> MishellConfig {
    let path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("/etc"))
        .join("mishell/config.toml");
    match read_config(&path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "using default config");
            MishellConfig::default()
        }
    }
}

fn read_config(path: &std::path::Path) -> Result<MishellConfig> {
    if !path.exists() {
        return Ok(MishellConfig::default());
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}
