use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;

use crate::args::Args;

const DATABASE_FILE: &str = "cardpro.sqlite";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("home directory not found")]
    NoHomeDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub log_filter: String,
    pub json: bool,
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Config, ConfigError> {
        let database_path = match &args.database {
            Some(path) => path.clone(),
            None => default_database_path()?,
        };
        Ok(Config {
            database_path,
            log_filter: args.log.clone(),
            json: args.json,
        })
    }
}

pub fn default_database_path() -> Result<PathBuf, ConfigError> {
    let mut path = ProjectDirs::from("com", "cardpro", "cardpro")
        .ok_or(ConfigError::NoHomeDir)?
        .data_local_dir()
        .to_path_buf();
    path.push(DATABASE_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn explicit_database_wins() {
        let args = Args::parse_from(["cardpro", "--database", "/tmp/cards.sqlite", "seed"]);
        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/cards.sqlite"));
        assert!(!config.json);
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let args = Args::parse_from([
            "cardpro", "card", "list", "--json", "--database", "x.sqlite", "--log", "debug",
        ]);
        let config = Config::from_args(&args).unwrap();
        assert!(config.json);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn conflicting_list_filters_are_rejected() {
        assert!(
            Args::try_parse_from(["cardpro", "card", "list", "--grouped", "--rarity", "rare"])
                .is_err()
        );
        assert!(Args::try_parse_from(["cardpro", "card", "list", "--rarity", "legendary"]).is_ok());
    }
}
