//! Server configuration loaded from `STOCKWISE_*` environment variables.

use std::str::FromStr;

use stockwise_auth::{AdminSeed, AuthConfig};
use stockwise_db::{DbConfig, DbCredentials};
use stockwise_inventory::InventoryConfig;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{set} is set but {missing} is not")]
    Incomplete {
        set: &'static str,
        missing: &'static str,
    },
}

/// Everything the server needs at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind_addr: String,
    pub db: DbConfig,
    pub auth: AuthConfig,
    pub inventory: InventoryConfig,
    /// Mark the session cookie `Secure` (serve over HTTPS only).
    pub secure_cookies: bool,
    /// Admin account to provision on startup, if configured.
    pub admin: Option<AdminSeed>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            db: DbConfig::default(),
            auth: AuthConfig::default(),
            inventory: InventoryConfig::default(),
            secure_cookies: false,
            admin: None,
        }
    }
}

impl ServerConfig {
    /// Read the process environment. Unset or empty variables fall back
    /// to defaults; malformed values are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let db = DbConfig {
            url: get("STOCKWISE_DB_URL").unwrap_or(defaults.db.url),
            namespace: get("STOCKWISE_DB_NAMESPACE").unwrap_or(defaults.db.namespace),
            database: get("STOCKWISE_DB_DATABASE").unwrap_or(defaults.db.database),
            credentials: pair(
                &get,
                "STOCKWISE_DB_USERNAME",
                "STOCKWISE_DB_PASSWORD",
            )?
            .map(|(username, password)| DbCredentials { username, password }),
        };

        let auth = AuthConfig {
            pepper: get("STOCKWISE_PASSWORD_PEPPER"),
            min_password_length: parse_or(
                &get,
                "STOCKWISE_MIN_PASSWORD_LENGTH",
                defaults.auth.min_password_length,
            )?,
            session_lifetime_secs: parse_or(
                &get,
                "STOCKWISE_SESSION_TTL_SECS",
                defaults.auth.session_lifetime_secs,
            )?,
            session_touch_interval_secs: parse_or(
                &get,
                "STOCKWISE_SESSION_TOUCH_SECS",
                defaults.auth.session_touch_interval_secs,
            )?,
        };

        let inventory = InventoryConfig {
            low_stock_threshold: parse_or(
                &get,
                "STOCKWISE_LOW_STOCK_THRESHOLD",
                defaults.inventory.low_stock_threshold,
            )?,
            recent_activity_limit: parse_or(
                &get,
                "STOCKWISE_RECENT_ACTIVITY_LIMIT",
                defaults.inventory.recent_activity_limit,
            )?,
            ..defaults.inventory
        };

        let admin = pair(&get, "STOCKWISE_ADMIN_EMAIL", "STOCKWISE_ADMIN_PASSWORD")?.map(
            |(email, password)| AdminSeed {
                full_name: get("STOCKWISE_ADMIN_NAME").unwrap_or_else(|| "Administrator".into()),
                email,
                password,
                company: get("STOCKWISE_ADMIN_COMPANY").unwrap_or_default(),
            },
        );

        Ok(Self {
            bind_addr: get("STOCKWISE_BIND_ADDR").unwrap_or(defaults.bind_addr),
            db,
            auth,
            inventory,
            secure_cookies: parse_bool(&get, "STOCKWISE_SECURE_COOKIES", defaults.secure_cookies)?,
            admin,
        })
    }
}

fn parse_or<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

fn parse_bool<G>(get: &G, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { name, value }),
        },
    }
}

/// Two variables that only make sense together.
fn pair<G>(
    get: &G,
    first: &'static str,
    second: &'static str,
) -> Result<Option<(String, String)>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match (get(first), get(second)) {
        (Some(a), Some(b)) => Ok(Some((a, b))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::Incomplete {
            set: first,
            missing: second,
        }),
        (None, Some(_)) => Err(ConfigError::Incomplete {
            set: second,
            missing: first,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.db.url, "ws://127.0.0.1:8000");
        assert_eq!(config.db.namespace, "stockwise");
        assert!(config.db.credentials.is_none());
        assert_eq!(config.auth.min_password_length, 6);
        assert_eq!(config.auth.session_lifetime_secs, 86_400);
        assert_eq!(config.inventory.low_stock_threshold, 10);
        assert_eq!(config.inventory.recent_activity_limit, 10);
        assert!(!config.secure_cookies);
        assert!(config.admin.is_none());
    }

    #[test]
    fn values_are_read() {
        let config = load(&[
            ("STOCKWISE_DB_URL", "mem://"),
            ("STOCKWISE_DB_USERNAME", "root"),
            ("STOCKWISE_DB_PASSWORD", "secret"),
            ("STOCKWISE_LOW_STOCK_THRESHOLD", "25"),
            ("STOCKWISE_SECURE_COOKIES", "true"),
            ("STOCKWISE_ADMIN_EMAIL", "admin@example.com"),
            ("STOCKWISE_ADMIN_PASSWORD", "change-me"),
        ])
        .unwrap();
        assert_eq!(config.db.url, "mem://");
        assert_eq!(
            config.db.credentials.map(|c| c.username),
            Some("root".to_string())
        );
        assert_eq!(config.inventory.low_stock_threshold, 25);
        assert!(config.secure_cookies);
        let admin = config.admin.unwrap();
        assert_eq!(admin.email, "admin@example.com");
        assert_eq!(admin.full_name, "Administrator");
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = load(&[("STOCKWISE_SESSION_TTL_SECS", "a day")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "STOCKWISE_SESSION_TTL_SECS",
                value: "a day".into()
            }
        );
        assert!(load(&[("STOCKWISE_SECURE_COOKIES", "maybe")]).is_err());
    }

    #[test]
    fn half_configured_admin_is_rejected() {
        let err = load(&[("STOCKWISE_ADMIN_EMAIL", "admin@example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::Incomplete { .. }));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = load(&[("STOCKWISE_BIND_ADDR", "  ")]).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
    }
}
