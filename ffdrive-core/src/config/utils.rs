//! Environment variable helpers for configuration overrides.
//!
//! Each helper returns the supplied default when the variable is unset or
//! does not parse.

use std::path::PathBuf;

/// Get a path value from an environment variable or use the default
pub fn get_env_path(key: &str, default: PathBuf) -> PathBuf {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => PathBuf::from(val),
        _ => default,
    }
}

/// Get an optional path from an environment variable, keeping the current value when unset
pub fn get_env_opt_path(key: &str, current: Option<PathBuf>) -> Option<PathBuf> {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => Some(PathBuf::from(val)),
        _ => current,
    }
}

/// Get a u32 value from an environment variable or use the default
pub fn get_env_u32(key: &str, default: u32) -> u32 {
    match std::env::var(key) {
        Ok(val) => val.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

/// Get a u64 value from an environment variable or use the default
pub fn get_env_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(val) => val.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

/// Get a usize value from an environment variable or use the default
pub fn get_env_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(val) => val.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}
