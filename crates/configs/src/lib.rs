use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// External conferencing collaborator settings. The widget itself is hosted
/// elsewhere; we only hand out its origin, script URL and a room name.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoConfig {
    #[serde(default = "default_video_domain")]
    pub domain: String,
    #[serde(default = "default_script_url")]
    pub script_url: String,
    #[serde(default = "default_room_prefix")]
    pub room_prefix: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            domain: default_video_domain(),
            script_url: default_script_url(),
            room_prefix: default_room_prefix(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_file")]
    pub file_path: String,
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { file_path: default_session_file(), ttl_secs: default_session_ttl() }
    }
}

fn default_video_domain() -> String { "meet.jit.si".into() }
fn default_script_url() -> String { "https://meet.jit.si/external_api.js".into() }
fn default_room_prefix() -> String { "doctaba".into() }
fn default_session_file() -> String { "data/sessions.json".into() }
fn default_session_ttl() -> u64 { 86_400 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.video.validate()?;
        self.session.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl VideoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.domain.trim().is_empty() {
            return Err(anyhow!("video.domain must not be empty"));
        }
        if !self.script_url.starts_with("https://") {
            return Err(anyhow!("video.script_url must start with https://"));
        }
        let prefix = self.room_prefix.trim();
        if prefix.is_empty() || prefix.contains(char::is_whitespace) {
            return Err(anyhow!("video.room_prefix must be a non-empty token"));
        }
        Ok(())
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.file_path.trim().is_empty() {
            return Err(anyhow!("session.file_path must not be empty"));
        }
        if self.ttl_secs == 0 {
            return Err(anyhow!("session.ttl_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}
