use std::path::Path;

use config::{ConfigError, Environment, File, FileFormat};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::services::FilterOptions;

const CONFIG: &str = include_str!("../.config/config.json5");

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
}

/// Engine defaults.
///
/// Layered in order: the embedded `.config/config.json5`, an optional user file
/// (JSON5), then `DATATABLE_*` environment variables. Nested keys use a double
/// underscore, e.g. `DATATABLE_FILTER__MATCH_CASE=true`, and
/// `DATATABLE_PAGE_SIZE_OPTIONS` takes a comma separated list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub page_size: usize,
    #[serde(default)]
    pub page_size_options: Vec<usize>,
    #[serde(default)]
    pub filter: FilterOptions,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            page_size_options: vec![5, 10, 20, 30],
            filter: FilterOptions::default(),
        }
    }
}

impl TableConfig {
    /// The embedded defaults, parsed without any overrides.
    pub fn embedded() -> Result<Self, ConfigError> {
        let cfg: Self = json5::from_str(CONFIG).map_err(|e| ConfigError::Foreign(Box::new(e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load(config_path, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(&PROJECT_NAME)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("page_size_options")
    }

    fn load(config_path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(File::from_str(CONFIG, FileFormat::Json5));

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).format(FileFormat::Json5).required(true));
        }

        let cfg: Self = builder.add_source(env).build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Message("page_size must be positive".into()));
        }
        if self.page_size_options.contains(&0) {
            return Err(ConfigError::Message(
                "page_size_options must only contain positive sizes".into(),
            ));
        }
        Ok(())
    }
}
