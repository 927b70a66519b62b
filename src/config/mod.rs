use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to, "host:port".
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory holding the users and attendance documents.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Endpoint answering with the current Europe/Berlin time.
    #[serde(default = "default_time_api_url")]
    pub time_api_url: String,
    #[serde(default = "default_time_api_timeout_ms")]
    pub time_api_timeout_ms: u64,
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
}

fn default_bind() -> String {
    "127.0.0.1:3001".to_string()
}
fn default_data_dir() -> String {
    Config::data_dir_default().to_string_lossy().to_string()
}
fn default_time_api_url() -> String {
    "https://timeapi.io/api/Time/current/zone?timeZone=Europe/Berlin".to_string()
}
fn default_time_api_timeout_ms() -> u64 {
    1000
}
fn default_token_ttl_minutes() -> i64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            data_dir: default_data_dir(),
            time_api_url: default_time_api_url(),
            time_api_timeout_ms: default_time_api_timeout_ms(),
            token_ttl_minutes: default_token_ttl_minutes(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("stempeluhr")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".stempeluhr")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("stempeluhr.conf")
    }

    /// Return the default data directory
    pub fn data_dir_default() -> PathBuf {
        Self::config_dir().join("data")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path).expect("❌ Failed to read configuration file");
            serde_yaml::from_str(&content).expect("❌ Failed to parse configuration file")
        } else {
            Config::default()
        }
    }

    /// Initialize the configuration file and data directory, returning the
    /// effective configuration.
    pub fn init_all(custom_data_dir: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // Data directory: user provided or default
        let data_dir = if let Some(name) = custom_data_dir {
            let p = Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::data_dir_default()
        };

        let config = Config {
            data_dir: data_dir.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        fs::create_dir_all(&data_dir)?;
        println!("✅ Data dir:    {:?}", data_dir);

        Ok(config)
    }
}
