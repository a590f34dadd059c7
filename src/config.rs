use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Top-level config. Every field has a default; unknown keys are ignored.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub proxy: ProxyConfig,
    pub url: UrlConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Timeout in seconds. 0 = wait forever.
    pub timeout: u64,
    pub follow_redirects: bool,
    pub max_redirects: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub url: Option<String>,
    pub no_proxy: Option<String>,
}

/// The request URL field.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    /// Shown while the field is empty and sent by `s` in that case.
    pub placeholder: String,
    pub char_limit: usize,
    pub width: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub dir: PathBuf,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: 0,
            follow_redirects: true,
            max_redirects: 10,
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            placeholder: String::from("https://httpbin.org/anything"),
            char_limit: 2048,
            width: 60,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
        }
    }
}

// ---------------------------------------------------------------------------
// Overlay config: partial deserialization for field-level merging.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct OverlayConfig {
    http: OverlayHttpConfig,
    proxy: OverlayProxyConfig,
    url: OverlayUrlConfig,
    log: OverlayLogConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct OverlayHttpConfig {
    timeout: Option<u64>,
    follow_redirects: Option<bool>,
    max_redirects: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct OverlayProxyConfig {
    url: Option<String>,
    no_proxy: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct OverlayUrlConfig {
    placeholder: Option<String>,
    char_limit: Option<usize>,
    width: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct OverlayLogConfig {
    dir: Option<PathBuf>,
}

impl Config {
    /// Apply overlay values over self. Only `Some` fields are overridden.
    fn merge(mut self, overlay: OverlayConfig) -> Self {
        if let Some(v) = overlay.http.timeout {
            self.http.timeout = v;
        }
        if let Some(v) = overlay.http.follow_redirects {
            self.http.follow_redirects = v;
        }
        if let Some(v) = overlay.http.max_redirects {
            self.http.max_redirects = v;
        }
        if let Some(v) = overlay.proxy.url {
            self.proxy.url = Some(v);
        }
        if let Some(v) = overlay.proxy.no_proxy {
            self.proxy.no_proxy = Some(v);
        }
        if let Some(v) = overlay.url.placeholder {
            self.url.placeholder = v;
        }
        if let Some(v) = overlay.url.char_limit {
            self.url.char_limit = v;
        }
        if let Some(v) = overlay.url.width {
            self.url.width = v;
        }
        if let Some(v) = overlay.log.dir {
            self.log.dir = v;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Path resolution
// ---------------------------------------------------------------------------

const CONFIG_DIR_NAME: &str = "reqlab";
const CONFIG_FILE_NAME: &str = "config.toml";
const PROJECT_DIR_NAME: &str = ".reqlab";
const PROJECT_MARKERS: &[&str] = &[".git", "Cargo.toml", "package.json", PROJECT_DIR_NAME];

fn global_config_path() -> Option<PathBuf> {
    if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        if !dir.trim().is_empty() {
            return Some(PathBuf::from(dir).join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
        }
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME),
    )
}

fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if PROJECT_MARKERS.iter().any(|marker| dir.join(marker).exists()) {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

fn project_config_path() -> Option<PathBuf> {
    let cwd = env::current_dir().ok()?;
    let root = find_project_root(&cwd)?;
    let path = root.join(PROJECT_DIR_NAME).join(CONFIG_FILE_NAME);
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tilde expansion
// ---------------------------------------------------------------------------

fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str() {
        if let Some(rest) = s.strip_prefix('~') {
            if let Ok(home) = env::var("HOME") {
                return PathBuf::from(home).join(rest.strip_prefix('/').unwrap_or(rest));
            }
        }
    }
    path.to_path_buf()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ConfigError {
    pub messages: Vec<String>,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for msg in &self.messages {
            writeln!(f, "{}", msg)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.http.timeout > 600 {
            errors.push(format!(
                "config error: http.timeout = {} is out of range (0..=600)",
                self.http.timeout
            ));
        }
        if self.http.max_redirects > 100 {
            errors.push(format!(
                "config error: http.max_redirects = {} is out of range (0..=100)",
                self.http.max_redirects
            ));
        }
        if !(1..=65536).contains(&self.url.char_limit) {
            errors.push(format!(
                "config error: url.char_limit = {} is out of range (1..=65536)",
                self.url.char_limit
            ));
        }
        if !(10..=500).contains(&self.url.width) {
            errors.push(format!(
                "config error: url.width = {} is out of range (10..=500)",
                self.url.width
            ));
        }
        if reqwest::Url::parse(&self.url.placeholder).is_err() {
            errors.push(format!(
                "config error: url.placeholder = \"{}\" is not a valid URL",
                self.url.placeholder
            ));
        }
        if let Some(ref url) = self.proxy.url {
            if reqwest::Url::parse(url).is_err() {
                errors.push(format!(
                    "config error: proxy.url = \"{}\" is not a valid URL",
                    url
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError { messages: errors })
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_overlay(path: &Path) -> Result<OverlayConfig, String> {
    let content = fs::read_to_string(path).map_err(|e| {
        format!(
            "config error: could not read \"{}\": {}",
            path.display(),
            e
        )
    })?;
    toml::from_str(&content).map_err(|e| {
        format!(
            "config error: failed to parse \"{}\": {}",
            path.display(),
            e
        )
    })
}

/// Load configuration from the global and project config files, then the
/// file given on the command line. Missing global/project files are skipped;
/// a missing explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, String> {
    let mut config = Config::default();

    if let Some(path) = global_config_path() {
        if path.exists() {
            config = config.merge(load_overlay(&path)?);
        }
    }

    if let Some(path) = project_config_path() {
        config = config.merge(load_overlay(&path)?);
    }

    if let Some(path) = explicit {
        config = config.merge(load_overlay(path)?);
    }

    config.log.dir = expand_tilde(&config.log.dir);
    config.validate().map_err(|e| e.to_string())?;

    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
