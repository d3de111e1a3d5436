use anyhow::Result;
use anyhow::anyhow;
use serde::Deserialize;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_STABLE_DIFFUSION_BASE_URL: &str = "https://stablediffusionapi.com/api/v3";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default = "UpstreamConfig::openai")]
    pub openai: UpstreamConfig,
    #[serde(default = "UpstreamConfig::stable_diffusion")]
    pub stable_diffusion: UpstreamConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            openai: UpstreamConfig::openai(),
            stable_diffusion: UpstreamConfig::stable_diffusion(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: None,
            log_format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            name: String::new(),
            collection: default_collection(),
            connect_timeout_secs: default_connect_timeout(),
            app_name: default_app_name(),
        }
    }
}

/// Connection settings for one third-party image generation API.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn openai() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout_secs: default_upstream_timeout(),
        }
    }

    pub fn stable_diffusion() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_STABLE_DIFFUSION_BASE_URL.to_string(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }
fn default_log_format() -> String { "compact".to_string() }
fn default_collection() -> String { "items".to_string() }
fn default_connect_timeout() -> u64 { 10 }
fn default_app_name() -> String { "prompt_relay".to_string() }
fn default_upstream_timeout() -> u64 { 120 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if std::path::Path::new(&path).exists() {
        load_from_file(&path)
    } else {
        Ok(AppConfig::default())
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// File (or defaults), then process environment, then validation.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override fields from environment variables. `lookup` is `std::env::var` in
    /// production and a map in tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = non_empty("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = non_empty("PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(w) = non_empty("TOKIO_WORKER_THREADS").and_then(|v| v.trim().parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(format) = non_empty("LOG_FORMAT") {
            self.server.log_format = format;
        }

        if let Some(uri) = non_empty("MONGODB_URI") {
            self.database.uri = uri;
        }
        if let Some(name) = non_empty("DATABASENAME") {
            self.database.name = name;
        }
        if let Some(collection) = non_empty("COLLECTION_NAME") {
            self.database.collection = collection;
        }

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.openai.api_key = key;
        }
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            self.openai.base_url = url;
        }
        if let Some(t) = non_empty("OPENAI_TIMEOUT_SECS").and_then(|v| v.trim().parse::<u64>().ok()) {
            self.openai.timeout_secs = t;
        }

        // the misspelled variable is what older deployments export
        if let Some(key) = non_empty("STABLE_DIFFUSION_API_KEY").or_else(|| non_empty("STABBLE_DIFFUSION_API_KEY")) {
            self.stable_diffusion.api_key = key;
        }
        if let Some(url) = non_empty("STABLE_DIFFUSION_BASE_URL") {
            self.stable_diffusion.base_url = url;
        }
        if let Some(t) = non_empty("STABLE_DIFFUSION_TIMEOUT_SECS").and_then(|v| v.trim().parse::<u64>().ok()) {
            self.stable_diffusion.timeout_secs = t;
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.openai.normalize("openai", DEFAULT_OPENAI_BASE_URL)?;
        self.stable_diffusion.normalize("stable_diffusion", DEFAULT_STABLE_DIFFUSION_BASE_URL)?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() {
            return Err(anyhow!("database.uri is empty; set it in config.toml or MONGODB_URI"));
        }
        let lower = self.uri.to_lowercase();
        if !(lower.starts_with("mongodb://") || lower.starts_with("mongodb+srv://")) {
            return Err(anyhow!("database.uri must start with mongodb:// or mongodb+srv://"));
        }
        if self.name.trim().is_empty() {
            return Err(anyhow!("database.name is empty; set it in config.toml or DATABASENAME"));
        }
        if self.collection.trim().is_empty() {
            return Err(anyhow!("database.collection must not be empty"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(anyhow!("database.connect_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}

impl UpstreamConfig {
    fn normalize(&mut self, section: &str, fallback_url: &str) -> Result<()> {
        if self.base_url.trim().is_empty() {
            self.base_url = fallback_url.to_string();
        }
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(anyhow!("{section}.base_url must start with http:// or https://"));
        }
        self.base_url = trimmed;
        if self.timeout_secs == 0 {
            return Err(anyhow!("{section}.timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}
