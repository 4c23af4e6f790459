use config::{Config, ConfigError};
use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct DbConfig {
    pub location: String,
    /// how long a connection waits on sqlite's write lock before giving up
    #[serde(rename = "busytimeoutmillis", default = "default_busy_timeout")]
    pub busy_timeout_millis: u64,
}

/// config properties for the tag mount
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct VfsConfig {
    /// where to mount the tag hierarchy. The mount is skipped when this is not set
    #[serde(rename = "mountpoint")]
    pub mount_point: Option<String>,
    /// the name of the single top-level directory that holds every tag
    #[serde(rename = "tagroot", default = "default_tag_root")]
    pub tag_root: String,
    #[serde(rename = "allowother", default)]
    pub allow_other: bool,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    /// one of `off`, `error`, `warn`, `info`, `debug`, `trace`
    pub level: String,
}

/// config properties for the whole of this application
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct TagFsConfig {
    pub database: DbConfig,
    pub vfs: VfsConfig,
    pub logging: LoggingConfig,
}

fn default_busy_timeout() -> u64 {
    5_000
}

fn default_tag_root() -> String {
    "tags".to_string()
}

/// Parses the config file located at ./TagFs.toml, if it exists.
/// If this fails to parse the file, the application will panic
pub fn parse_config() -> TagFsConfig {
    parse_config_from("./TagFs.toml")
}

fn parse_config_from(location: &str) -> TagFsConfig {
    let builder = Config::builder()
        .add_source(config::File::with_name(location))
        .build();
    let settings = match builder {
        Ok(settings) => settings,
        // some errors are fine, such as not found
        Err(ConfigError::Foreign(e)) if e.to_string().contains("not found") => {
            log::warn!("No config file found. Continuing startup...");
            return TAG_FS_CONFIG_DEFAULT.clone();
        }
        // basically everything else is unrecoverable, though
        Err(e) => {
            log::error!("Failed to parse config file. Exception is {e}");
            panic!("Failed to parse config file. Exception is {e}");
        }
    };
    settings.try_deserialize().unwrap_or_else(|e| {
        log::warn!("Config file is incomplete ({e}), falling back to defaults");
        TAG_FS_CONFIG_DEFAULT.clone()
    })
}

/// global variable for config, that way it doesn't need to be repeatedly parsed
pub static TAG_FS_CONFIG: Lazy<TagFsConfig> = Lazy::new(parse_config);
static TAG_FS_CONFIG_DEFAULT: Lazy<TagFsConfig> = Lazy::new(|| TagFsConfig {
    database: DbConfig {
        location: "./tag_fs.sqlite".to_string(),
        busy_timeout_millis: default_busy_timeout(),
    },
    vfs: VfsConfig {
        mount_point: None,
        tag_root: default_tag_root(),
        allow_other: false,
    },
    logging: LoggingConfig {
        level: "info".to_string(),
    },
});
