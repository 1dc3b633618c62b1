//! Command line arguments and configuration assembly.

use crate::error::{DemoError, DemoResult};
use clap::{ArgAction, Parser};
use polingo_common::Locale;
use polingo_config::{Config, ConfigError, ConfigLoader};
use std::path::{Path, PathBuf};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Initial locale, overriding the configuration
    #[arg(long)]
    pub locale: Option<String>,

    /// Switch between English and Spanish after the first render
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub toggle: bool,

    /// Log level, overriding the configuration
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Loads the configuration named by the arguments and applies overrides.
    ///
    /// Returns the directory of the configuration file, when one was given,
    /// so relative catalog paths can be resolved against it.
    pub fn load_config(&self) -> DemoResult<(Config, Option<PathBuf>)> {
        let (mut config, dir) = match &self.config {
            Some(path) => (
                ConfigLoader::load_config(path)?,
                path.parent().map(Path::to_path_buf),
            ),
            None => (ConfigLoader::load()?, None),
        };

        if let Some(tag) = &self.locale {
            config.locale = Locale::parse(tag).map_err(|e| DemoError::InvalidArgument {
                arg: "--locale",
                message: e.to_string(),
            })?;
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }

        config.validate_all().map_err(ConfigError::from)?;
        Ok((config, dir))
    }
}
