//! Layered value resolution: explicit override > config file > environment > default
//!
//! The `config` crate would let environment variables win over files, but
//! provider settings must prefer the file, so the environment layer is applied
//! here explicitly. Empty strings count as "not set" at every layer.

use std::collections::HashMap;

/// Source of environment variables
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// First set value among explicit layers, then the environment keys in order
pub fn resolve_opt(
    layers: &[Option<&str>],
    env: &dyn EnvSource,
    env_keys: &[&str],
) -> Option<String> {
    layers
        .iter()
        .find_map(|layer| non_empty(*layer))
        .or_else(|| {
            env_keys
                .iter()
                .find_map(|key| non_empty(env.var(key).as_deref()))
        })
}

/// Like [`resolve_opt`], falling back to `default`
pub fn resolve(
    layers: &[Option<&str>],
    env: &dyn EnvSource,
    env_keys: &[&str],
    default: &str,
) -> String {
    resolve_opt(layers, env, env_keys).unwrap_or_else(|| default.to_string())
}
