use std::{
    fs, io,
    path::{Path, PathBuf},
};

use color_eyre::eyre::WrapErr;
use cube_core::FaceLetters;
use log::debug;
use serde::Deserialize;

/// Read from the working directory when no `--config` is given
pub const DEFAULT_PATH: &str = "cube.toml";

const DEFAULT_LAYERS: usize = 3;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Layer count used when a command doesn't pass `--layers`
    pub layers: Option<usize>,
    pub stickers: StickerConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StickerConfig {
    /// The letters naming the right, up, front, left, down and back faces
    pub faces: FaceLetters,
    /// Whether nets are printed with background colors
    pub color: bool,
}

impl Default for StickerConfig {
    fn default() -> Self {
        StickerConfig {
            faces: FaceLetters::default(),
            color: true,
        }
    }
}

impl Config {
    /// Loads the configuration. A missing file is only an error when the path
    /// was given explicitly.
    pub fn load(path: Option<&Path>) -> color_eyre::Result<Config> {
        let explicit = path.is_some();
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_PATH), Path::to_path_buf);

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if !explicit && e.kind() == io::ErrorKind::NotFound => {
                debug!("No {DEFAULT_PATH} found, using the default configuration");
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(e)
                    .wrap_err_with(|| format!("Failed to read the config file {}", path.display()));
            }
        };

        let config = Config::parse(&text)
            .wrap_err_with(|| format!("Failed to parse the config file {}", path.display()))?;
        debug!("Loaded {config:?} from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn layers(&self, given: Option<usize>) -> usize {
        given.or(self.layers).unwrap_or(DEFAULT_LAYERS)
    }
}
