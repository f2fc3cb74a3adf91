use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use sqlpilot_agents::factory::ClientSettings;
use sqlpilot_agents::{GenerationSettings, PromptTemplate};
use sqlpilot_llm_sdk::providers;
use sqlpilot_llm_sdk::types::ModelOptions;
use sqlpilot_tools::MySqlSettings;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 5000

[database]
host = "localhost"
port = 3306
user = "root"
password = ""
name = "creative_it_park"
# Tables described to the model, in this order
tables = ["users", "projects", "project_members", "tasks"]

[llm]
provider = "llama_cpp"  # Options: llama_cpp, ollama
model = "mistral-7b-instruct-v0.2.Q4_K_M.gguf"
# base_url = "http://localhost:8080"
max_tokens = 1024
temperature = 0.2
context_window = 4096
threads = 4
batch_size = 64
timeout_secs = 300

[generation]
# Preset name (strict, guided, mysql-expert, compact) or a custom template
# containing both {schema} and {request}
prompt_template = "strict"
"#;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub name: String,
    pub tables: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LlmConfig {
    pub provider: String,
    #[serde(default)]
    pub model: String,
    pub base_url: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    pub context_window: Option<u32>,
    pub threads: Option<u32>,
    pub batch_size: Option<u32>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            prompt_template: default_prompt_template(),
        }
    }
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_prompt_template() -> String {
    sqlpilot_agents::sql_generation::prompt::DEFAULT_PRESET.to_string()
}

impl ApiConfig {
    /// Load from `path`, or from the per-user config file, writing the defaults there first if
    /// it does not exist yet. `SQLPILOT__SECTION__KEY` environment variables override the file.
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ConfigError::Message(format!("Failed to create config directory: {e}"))
                })?;
            }
            std::fs::write(&config_path, DEFAULT_CONFIG.trim_start()).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
            tracing::info!(path = %config_path.display(), "Wrote default configuration");
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()).format(FileFormat::Toml))
            .add_source(
                Environment::with_prefix("SQLPILOT")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("database.tables")
                    .try_parsing(true),
            )
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;
        config.validate()?;

        Ok((config, config_path))
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ApiConfig = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.tables.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::Message(
                "database.tables must name at least one table".to_string(),
            ));
        }

        if !providers::ALL.contains(&self.llm.provider.as_str()) {
            return Err(ConfigError::Message(format!(
                "llm.provider '{}' is not supported. Expected one of: {}",
                self.llm.provider,
                providers::ALL.join(", ")
            )));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Message(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.max_tokens == 0 || self.llm.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "llm.max_tokens and llm.timeout_secs must be greater than zero".to_string(),
            ));
        }

        self.prompt_template()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn tables(&self) -> Vec<String> {
        self.database
            .tables
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn mysql_settings(&self) -> MySqlSettings {
        MySqlSettings {
            host: self.database.host.clone(),
            port: self.database.port,
            user: self.database.user.clone(),
            password: self.database.password.clone(),
            database: self.database.name.clone(),
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            provider: self.llm.provider.clone(),
            model: self.llm.model.clone(),
            base_url: self.llm.base_url.clone(),
            timeout: Duration::from_secs(self.llm.timeout_secs),
        }
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            model: self.llm.model.clone(),
            max_tokens: self.llm.max_tokens,
            temperature: self.llm.temperature,
            options: ModelOptions {
                context_window: self.llm.context_window,
                threads: self.llm.threads,
                batch_size: self.llm.batch_size,
            },
            timeout: Duration::from_secs(self.llm.timeout_secs),
        }
    }

    pub fn prompt_template(&self) -> Result<PromptTemplate, ConfigError> {
        PromptTemplate::resolve(&self.generation.prompt_template)
            .map_err(|e| ConfigError::Message(format!("generation.prompt_template: {e}")))
    }
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("sqlpilot/sqlpilot.toml")
    } else {
        PathBuf::from("sqlpilot.toml")
    }
}
