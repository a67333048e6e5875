use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Хранилище обработанных изображений, отдаётся как /media
#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    #[serde(default = "default_media_dir")]
    pub dir: String,
    /// Внешний адрес сервера: Anymarket скачивает изображения по этому URL
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

/// Параметры последовательных пакетных операций
#[derive(Debug, Deserialize, Clone)]
pub struct BatchConfig {
    /// Пауза между элементами пакета, мс
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
    #[serde(default = "default_max_images")]
    pub max_images: usize,
    #[serde(default = "default_title_max_len")]
    pub title_max_len: usize,
    /// Остаток, который ставится SKU с бесконечным запасом в VTEX
    #[serde(default = "default_unlimited_stock")]
    pub unlimited_stock: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    3000
}

fn default_media_dir() -> String {
    "media".into()
}

fn default_public_base_url() -> String {
    "http://localhost:3000".into()
}

fn default_pause_ms() -> u64 {
    100
}

fn default_max_images() -> usize {
    4
}

fn default_title_max_len() -> usize {
    150
}

fn default_unlimited_stock() -> i64 {
    999
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            dir: default_media_dir(),
            public_base_url: default_public_base_url(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            pause_ms: default_pause_ms(),
            max_images: default_max_images(),
            title_max_len: default_title_max_len(),
            unlimited_stock: default_unlimited_stock(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "data/catalog.db"
"#;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Загрузить конфиг один раз при старте
pub fn init() -> anyhow::Result<&'static Config> {
    let config = load_config()?;
    Ok(CONFIG.get_or_init(|| config))
}

/// Текущая конфигурация (встроенная по умолчанию, если init не вызывался)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(|| {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|_| Config {
            database: DatabaseConfig {
                path: "data/catalog.db".into(),
            },
            server: ServerConfig::default(),
            media: MediaConfig::default(),
            batch: BatchConfig::default(),
            http: HttpConfig::default(),
        })
    })
}

/// Resolve a configured path: absolute as is, relative against the executable directory
fn resolve_path(path_str: &str) -> PathBuf {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    PathBuf::from(path_str)
}

/// Get the database file path from configuration
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    Ok(resolve_path(&config.database.path))
}

/// Каталог медиа-файлов
pub fn get_media_dir(config: &Config) -> PathBuf {
    resolve_path(&config.media.dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "data/catalog.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.batch.pause_ms, 100);
        assert_eq!(config.batch.max_images, 4);
        assert_eq!(config.batch.title_max_len, 150);
        assert_eq!(config.batch.unlimited_stock, 999);
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config: Config = toml::from_str(
            r#"
[database]
path = "/tmp/x.db"

[batch]
pause_ms = 0
"#,
        )
        .unwrap();
        assert_eq!(config.batch.pause_ms, 0);
        assert_eq!(config.batch.max_images, 4);
        assert_eq!(config.http.timeout_secs, 60);
        assert_eq!(
            get_database_path(&config).unwrap(),
            PathBuf::from("/tmp/x.db")
        );
    }
}
