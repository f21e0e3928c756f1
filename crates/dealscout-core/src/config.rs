use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup
/// function. Decoupled from the real environment so tests can drive it with
/// a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("DEALSCOUT_ENV", "development"));
    let bind_addr = parse_addr("DEALSCOUT_BIND_ADDR", "0.0.0.0:3100")?;
    let log_level = or_default("DEALSCOUT_LOG_LEVEL", "info");
    let sources_path = PathBuf::from(or_default(
        "DEALSCOUT_SOURCES_PATH",
        "./config/sources.yaml",
    ));
    let provider_timeout_secs = parse_u64("DEALSCOUT_PROVIDER_TIMEOUT_SECS", "10")?;
    let provider_user_agent = or_default(
        "DEALSCOUT_USER_AGENT",
        "dealscout/0.1 (deal-aggregation)",
    );

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        sources_path,
        provider_timeout_secs,
        provider_user_agent,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3100");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.sources_path.to_str(), Some("./config/sources.yaml"));
        assert_eq!(cfg.provider_timeout_secs, 10);
        assert_eq!(cfg.provider_user_agent, "dealscout/0.1 (deal-aggregation)");
    }

    #[test]
    fn bind_addr_override_is_honored() {
        let mut map = HashMap::new();
        map.insert("DEALSCOUT_BIND_ADDR", "127.0.0.1:8080");
        let cfg = build_app_config(lookup_from_map(&map)).expect("valid");
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let mut map = HashMap::new();
        map.insert("DEALSCOUT_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DEALSCOUT_BIND_ADDR"),
            "expected InvalidEnvVar(DEALSCOUT_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn provider_timeout_override_is_honored() {
        let mut map = HashMap::new();
        map.insert("DEALSCOUT_PROVIDER_TIMEOUT_SECS", "30");
        let cfg = build_app_config(lookup_from_map(&map)).expect("valid");
        assert_eq!(cfg.provider_timeout_secs, 30);
    }

    #[test]
    fn invalid_provider_timeout_is_rejected() {
        let mut map = HashMap::new();
        map.insert("DEALSCOUT_PROVIDER_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DEALSCOUT_PROVIDER_TIMEOUT_SECS"),
            "expected InvalidEnvVar(DEALSCOUT_PROVIDER_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn user_agent_override_is_honored() {
        let mut map = HashMap::new();
        map.insert("DEALSCOUT_USER_AGENT", "custom-agent/2.0");
        let cfg = build_app_config(lookup_from_map(&map)).expect("valid");
        assert_eq!(cfg.provider_user_agent, "custom-agent/2.0");
    }
}
