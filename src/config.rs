// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
Resource limits of the function library, loadable from TOML:

```
use mushlist::config::Config;

let cfg = Config::from_toml_str("buffer_len = 256\nrandom_seed = 7").unwrap();
assert_eq!(cfg.buffer_len, 256);
assert_eq!(cfg.max_list_size, 4096);
assert_eq!(cfg.random_seed, Some(7));
```
*/

use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Size of every output buffer in bytes.
    pub buffer_len:                 usize,
    /// Elements kept when a list is split.
    pub max_list_size:              usize,
    /// Function invocations allowed per top-level command.
    pub function_invocation_limit:  usize,
    /// Maximum evaluation nesting depth.
    pub call_limit:                 usize,
    /// Compiled size limit handed to the pattern engine.
    pub regex_size_limit:           usize,
    /// Fixed seed for `shuffle()` and `randword()`.
    pub random_seed:                Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            buffer_len:                 8192,
            max_list_size:              4096,
            function_invocation_limit:  25000,
            call_limit:                 1000,
            regex_size_limit:           1024 * 1024,
            random_seed:                None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String, std::io::Error),
    Parse(toml::de::Error),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Couldn't read config '{}': {}", path, e),
            ConfigError::Parse(e)    => write!(f, "Bad config: {}", e),
            ConfigError::Invalid(s)  => write!(f, "Bad config value: {}", s),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, e)  => Some(e),
            ConfigError::Parse(e)  => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg : Config = toml::from_str(s).map_err(ConfigError::Parse)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_string(), e))?;
        Self::from_toml_str(&s)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_len < 2 {
            return Err(ConfigError::Invalid("buffer_len must be at least 2"));
        }
        if self.max_list_size == 0 {
            return Err(ConfigError::Invalid("max_list_size must not be 0"));
        }
        if self.call_limit == 0 {
            return Err(ConfigError::Invalid("call_limit must not be 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_defaults() {
        let c = Config::from_toml_str("").unwrap();
        assert_eq!(c, Config::default());
    }

    #[test]
    fn check_unknown_key() {
        let e = Config::from_toml_str("bufferlen = 10").unwrap_err();
        assert!(format!("{}", e).starts_with("Bad config:"));
    }

    #[test]
    fn check_invalid_value() {
        let e = Config::from_toml_str("buffer_len = 1").unwrap_err();
        assert_eq!(format!("{}", e), "Bad config value: buffer_len must be at least 2");
    }

    #[test]
    fn check_missing_file() {
        assert!(matches!(Config::from_file("/nonexistent/mushlist.toml"),
                         Err(ConfigError::Io(_, _))));
    }
}
