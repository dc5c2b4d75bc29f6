use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::{
    Result,
    eyre::{WrapErr as _, eyre},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use engine::generation::fooocus::DEFAULT_OUTPUT_DIR;

pub mod cli;

const CONFIG_FILE_NAME: &str = "fooocus_client.ron";

/// Optional settings file, every field may be left out
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// What a run actually uses: flags win over the config file, which wins over the defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub output_dir: PathBuf,
}

impl Settings {
    pub fn resolve(cli: &cli::Cli, config: Option<Config>) -> Self {
        let config = config.unwrap_or_default();
        Self {
            api_url: cli
                .api_url
                .clone()
                .or(config.api_url)
                .unwrap_or_else(|| engine::DEFAULT_API_URL.into()),
            output_dir: cli
                .output_dir
                .clone()
                .or(config.output_dir)
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.into()),
        }
    }
}

pub fn load_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let src = fs::read_to_string(path)?;
    ron::from_str(&src).wrap_err_with(|| format!("Couldn't parse {}", path.display()))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(dirs::config_local_dir()
        .ok_or(eyre!("Couldn't get config dir"))?
        .join(CONFIG_FILE_NAME))
}

pub fn load_config() -> Result<Option<Config>> {
    let path = config_path()?;
    if !path.exists() {
        Ok(None)
    } else {
        load_ron_file(&path).map(Some)
    }
}
