use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub data_source: DataSourceConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

/// Файл с аналитическими данными, подключается как схема `be_exponential`
#[derive(Debug, Deserialize, Clone)]
pub struct DataSourceConfig {
    #[serde(default = "default_data_source_path")]
    pub path: String,
    /// Верхняя граница строк, которую возвращает execute_query
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    /// Создать демо-таблицы (ventas, clientes), если их нет
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
    /// Предел времени одного запроса, секунды
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
}

impl DataSourceConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            path: default_data_source_path(),
            max_rows: default_max_rows(),
            seed_demo_data: default_seed_demo_data(),
            query_timeout_secs: default_query_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_data_source_path() -> String {
    "target/db/dataset.db".to_string()
}

fn default_max_rows() -> usize {
    5000
}

fn default_seed_demo_data() -> bool {
    true
}

fn default_query_timeout_secs() -> u64 {
    30
}

fn default_port() -> u16 {
    3000
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"

[data_source]
path = "target/db/dataset.db"
max_rows = 5000
seed_demo_data = true
query_timeout_secs = 30

[server]
port = 3000
"#;

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
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.data_source.max_rows == 0 {
        anyhow::bail!("data_source.max_rows must be greater than zero");
    }
    if config.data_source.query_timeout_secs == 0 {
        anyhow::bail!("data_source.query_timeout_secs must be greater than zero");
    }
    Ok(config)
}

/// Resolves relative paths relative to the executable directory
pub fn resolve_path(path_str: &str) -> PathBuf {
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

/// Get the application database file path from configuration
pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_path(&config.database.path)
}

/// Get the dataset file path from configuration
pub fn get_data_source_path(config: &Config) -> PathBuf {
    resolve_path(&config.data_source.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.data_source.path, "target/db/dataset.db");
        assert_eq!(config.data_source.max_rows, 5000);
        assert!(config.data_source.seed_demo_data);
        assert_eq!(config.data_source.query_timeout(), Duration::from_secs(30));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_optional_sections_fall_back_to_defaults() {
        let config = parse_config("[database]\npath = \"x.db\"\n").unwrap();
        assert_eq!(config.data_source.max_rows, 5000);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_zero_row_limit_rejected() {
        let toml = "[database]\npath = \"x.db\"\n[data_source]\nmax_rows = 0\n";
        assert!(parse_config(toml).is_err());
    }

    #[test]
    fn test_absolute_path_kept() {
        let abs = if cfg!(windows) { "C:\\data\\app.db" } else { "/data/app.db" };
        assert_eq!(resolve_path(abs), PathBuf::from(abs));
    }
}
