//! Environment-variable configuration overlay with typed getters.

use std::{collections::HashMap, env, path::PathBuf};

use anyhow::{bail, Result};

/// Recognized configuration keys, captured once at startup.
///
/// Command-line flags always win over these; each getter is the
/// environment-variable fallback layer of the resolution order.
#[derive(Debug, Clone, Default)]
pub struct Config {
    inner: HashMap<String, String>,
}

impl Config {
    pub fn load() -> Self {
        let mut map = HashMap::new();
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }
        Self { inner: map }
    }

    /// Raw value for a key, untouched; blank values count as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner
            .get(key)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| {
                matches!(
                    v.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                )
            })
            .unwrap_or(false)
    }

    /// Malformed numbers are fatal; silently falling back to a default
    /// would mask a misconfigured environment. Surrounding whitespace is
    /// tolerated.
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => match v.trim().parse::<f64>() {
                Ok(n) => Ok(Some(n)),
                Err(_) => bail!("Invalid float for {}: {}", key, v.trim()),
            },
        }
    }

    pub fn get_usize(&self, key: &str) -> Result<Option<usize>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => match v.trim().parse::<usize>() {
                Ok(n) => Ok(Some(n)),
                Err(_) => bail!("Invalid integer for {}: {}", key, v.trim()),
            },
        }
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).map(PathBuf::from)
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let inner = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { inner }
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "CSVQL_SQL",
        "CSVQL_PLOT",
        "CSVQL_X",
        "CSVQL_Y",
        "CSVQL_SEP",
        "CSVQL_LIMIT",
        "CSVQL_SAVE",
        "CSVQL_TITLE",
        "CSVQL_SUCCESS_FILTER",
        "CSVQL_HOLE",
        "CSVQL_RINGS",
        "CSVQL_HOLE_X",
        "CSVQL_HOLE_Y",
        "CSVQL_HOLE_R",
        "CSVQL_RING_RADII",
        "CSVQL_ENV_ROOT",
    ];

    KEYS.contains(&k) || k.starts_with("CSVQL_")
}
