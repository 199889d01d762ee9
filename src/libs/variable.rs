use std::{env, time::Duration};

use log::warn;

use super::{cheapshark::DEFAULT_API_URL, sort::SortMode, widget::MIN_CHARACTERS};

pub const API_URL_KEY: &str = "GAMESEARCH_API_URL";
pub const MIN_CHARACTERS_KEY: &str = "GAMESEARCH_MIN_CHARACTERS";
pub const TIMEOUT_KEY: &str = "GAMESEARCH_TIMEOUT_SECS";
pub const DEFAULT_SORT_KEY: &str = "GAMESEARCH_DEFAULT_SORT";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub min_characters: usize,
    pub timeout: Option<Duration>,
    pub default_sort: SortMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            min_characters: MIN_CHARACTERS,
            timeout: None,
            default_sort: SortMode::Unordered,
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Config {
        let defaults = Config::default();

        Config {
            api_url: lookup(API_URL_KEY)
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.api_url),
            min_characters: parse_number(&lookup, MIN_CHARACTERS_KEY)
                .filter(|n| *n > 0)
                .map(|n| n as usize)
                .unwrap_or(defaults.min_characters),
            timeout: parse_number(&lookup, TIMEOUT_KEY)
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            default_sort: lookup(DEFAULT_SORT_KEY)
                .map(|value| SortMode::from_value(&value))
                .unwrap_or(defaults.default_sort),
        }
    }
}

fn parse_number(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let value = lookup(key)?;

    match value.trim().parse::<u64>() {
        Ok(number) => Some(number),
        Err(_e) => {
            warn!("Ignoring invalid value for {}: {:?}", key, value);
            None
        }
    }
}
