//! `config.toml` loading.

use std::collections::BTreeMap;
use std::path::Path;

use bgg_shelf_enrich::LinkOverride;
use bgg_shelf_index::DEFAULT_HITS_PER_PAGE;
use serde::Deserialize;

use crate::error::CliError;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Config {
    pub project: ProjectConfig,
    pub boardgamegeek: BggConfig,
    #[serde(default)]
    pub algolia: Option<AlgoliaSettings>,
    /// Expansion links the catalog is missing, on top of the built-in ones.
    #[serde(default)]
    pub expansion_links: Vec<LinkOverride>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProjectConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BggConfig {
    pub user_name: String,
    #[serde(default)]
    pub extra_params: ExtraParams,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AlgoliaSettings {
    pub app_id: String,
    pub index_name: String,
    #[serde(default = "default_hits_per_page")]
    pub hits_per_page: u32,
}

fn default_hits_per_page() -> u32 {
    DEFAULT_HITS_PER_PAGE
}

/// Extra collection query parameters: one table, or an array of tables
/// meaning one collection request per table.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ExtraParams {
    One(BTreeMap<String, toml::Value>),
    Many(Vec<BTreeMap<String, toml::Value>>),
}

impl Default for ExtraParams {
    fn default() -> Self {
        Self::One(BTreeMap::new())
    }
}

impl ExtraParams {
    /// Query parameters for each collection request, values stringified.
    pub(crate) fn requests(&self) -> Result<Vec<Vec<(String, String)>>, CliError> {
        let tables = match self {
            Self::One(table) => std::slice::from_ref(table),
            Self::Many(tables) => tables.as_slice(),
        };
        tables
            .iter()
            .map(|table| {
                table
                    .iter()
                    .map(|(key, value)| param_value(key, value).map(|v| (key.clone(), v)))
                    .collect()
            })
            .collect()
    }
}

fn param_value(key: &str, value: &toml::Value) -> Result<String, CliError> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Boolean(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        other => Err(CliError::config(format!(
            "extra_params.{key}: unsupported value {other}"
        ))),
    }
}

pub(crate) fn load(path: &Path) -> Result<Config, CliError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CliError::config(format!("cannot read {}: {e}", path.display())))?;
    parse(&contents).map_err(|e| CliError::config(format!("{}: {e}", path.display())))
}

fn parse(contents: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(contents)
}
