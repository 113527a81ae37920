//! Environment overrides (`ASSETFORGE_*`)
//!
//! Invalid values never abort a run: they are reported with a typo
//! suggestion and the configured value is kept.

use super::loader::levenshtein;
use super::types::Config;

pub const ENV_STATE_DIR: &str = "ASSETFORGE_STATE_DIR";
pub const ENV_PARALLEL: &str = "ASSETFORGE_PARALLEL";
pub const ENV_PURGE: &str = "ASSETFORGE_PURGE";

const BOOL_VALUES: &[&str] = &["true", "false", "1", "0", "yes", "no", "on", "off"];

/// Apply overrides read from the process environment
pub fn with_env_overrides(config: Config) -> Config {
    with_overrides_from(config, |name| std::env::var(name).ok())
}

/// Apply overrides using `lookup` as the environment
pub fn with_overrides_from<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = lookup(ENV_STATE_DIR).filter(|d| !d.trim().is_empty()) {
        config.state.dir = dir;
    }
    if let Some(value) = lookup(ENV_PARALLEL) {
        config.resolve.parallel = parse_bool_var(ENV_PARALLEL, &value, config.resolve.parallel);
    }
    if let Some(value) = lookup(ENV_PURGE) {
        config.resolve.purge_transient =
            parse_bool_var(ENV_PURGE, &value, config.resolve.purge_transient);
    }
    config
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_bool_var(name: &str, value: &str, current: bool) -> bool {
    match parse_bool(value) {
        Some(parsed) => parsed,
        None => {
            tracing::warn!(
                var = name,
                value,
                suggestion = suggest(value).unwrap_or(""),
                valid = %BOOL_VALUES.join(", "),
                "ignoring invalid environment value"
            );
            current
        }
    }
}

/// Closest valid value within two edits
fn suggest(value: &str) -> Option<&'static str> {
    let input = value.to_lowercase();
    BOOL_VALUES
        .iter()
        .map(|valid| (*valid, levenshtein(&input, valid)))
        .filter(|(_, dist)| *dist > 0 && *dist <= 2)
        .min_by_key(|(_, dist)| *dist)
        .map(|(valid, _)| valid)
}
