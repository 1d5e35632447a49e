//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/smart-parking/config.toml`).
//! Every section has defaults, so an empty file yields the built-in lot:
//! eight slots, car/bike/heavy rates of 20/10/30 per minute, a 15%
//! pre-booking surcharge and two users.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Tariff, UserRole, VehicleType};
use crate::infrastructure::crypto::jwt::JwtConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Default config location: `<config dir>/smart-parking/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("smart-parking")
        .join("config.toml")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotConfig {
    pub num_slots: u32,
    pub prebook_surcharge_percent: u32,
    pub currency: String,
}

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            num_slots: 8,
            prebook_surcharge_percent: 15,
            currency: "INR".to_string(),
        }
    }
}

/// Entry of the credential table. Exactly one of `password` /
/// `password_hash` (bcrypt) must be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "127.0.0.1".to_string(),
            api_port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn`, `error` or any `EnvFilter` directive
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub lot: LotConfig,
    /// Per-minute rate by vehicle type name
    pub rates: BTreeMap<String, u32>,
    pub users: Vec<UserConfig>,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lot: LotConfig::default(),
            rates: BTreeMap::from([
                ("car".to_string(), 20),
                ("bike".to_string(), 10),
                ("heavy".to_string(), 30),
            ]),
            users: vec![
                UserConfig {
                    username: "admin".to_string(),
                    password: Some("1234".to_string()),
                    password_hash: None,
                    role: UserRole::Staff,
                },
                UserConfig {
                    username: "user".to_string(),
                    password: Some("pass".to_string()),
                    password_hash: None,
                    role: UserRole::Customer,
                },
            ],
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lot.num_slots == 0 {
            return Err(ConfigError::Invalid("lot.num_slots must be at least 1".into()));
        }

        for name in self.rates.keys() {
            name.parse::<VehicleType>()
                .map_err(|e| ConfigError::Invalid(format!("rates: {}", e)))?;
        }
        // Every selectable vehicle type needs a rate, otherwise checkout
        // of such a vehicle could never succeed.
        let tariff = self.tariff()?;
        for vehicle_type in VehicleType::ALL {
            if tariff.rate_for(vehicle_type).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "rates: missing rate for '{}'",
                    vehicle_type
                )));
            }
        }

        if self.users.is_empty() {
            return Err(ConfigError::Invalid("at least one user is required".into()));
        }
        let mut seen = HashSet::new();
        for user in &self.users {
            if user.username.trim().is_empty() {
                return Err(ConfigError::Invalid("users: empty username".into()));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "users: duplicate username '{}'",
                    user.username
                )));
            }
            if user.password.is_some() == user.password_hash.is_some() {
                return Err(ConfigError::Invalid(format!(
                    "users: '{}' needs exactly one of password / password_hash",
                    user.username
                )));
            }
        }

        if !(4..=31).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::Invalid(
                "security.bcrypt_cost must be between 4 and 31".into(),
            ));
        }

        Ok(())
    }

    /// Tariff built from `[lot]` and `[rates]`
    pub fn tariff(&self) -> Result<Tariff, ConfigError> {
        let rates = self
            .rates
            .iter()
            .map(|(name, rate)| {
                name.parse::<VehicleType>()
                    .map(|vt| (vt, Decimal::from(*rate)))
                    .map_err(|e| ConfigError::Invalid(format!("rates: {}", e)))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(Tariff::new(
            rates,
            self.lot.prebook_surcharge_percent,
            self.lot.currency.clone(),
        ))
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            expiration_hours: self.security.jwt_expiration_hours,
            issuer: "smart-parking".to_string(),
        }
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_standard_lot() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.lot.num_slots, 8);
        assert_eq!(config.tariff().unwrap(), Tariff::standard());
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users[0].role, UserRole::Staff);
        assert_eq!(config.users[1].role, UserRole::Customer);
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let config = AppConfig::from_toml(
            r#"
            [lot]
            num_slots = 12

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.lot.num_slots, 12);
        assert_eq!(config.lot.prebook_surcharge_percent, 15);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn custom_users_and_rates() {
        let config = AppConfig::from_toml(
            r#"
            [rates]
            car = 25
            bike = 5
            heavy = 40

            [[users]]
            username = "gate"
            password = "secret"
            role = "staff"
            "#,
        )
        .unwrap();
        let tariff = config.tariff().unwrap();
        assert_eq!(tariff.rate_for(VehicleType::Car).unwrap(), Decimal::from(25));
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].username, "gate");
    }

    #[test]
    fn zero_slots_is_invalid() {
        let err = AppConfig::from_toml("[lot]\nnum_slots = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_vehicle_type_is_invalid() {
        let err = AppConfig::from_toml(
            "[rates]\ncar = 20\nbike = 10\nheavy = 30\ntruck = 50\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("truck"));
    }

    #[test]
    fn missing_rate_is_invalid() {
        let err = AppConfig::from_toml("[rates]\ncar = 20\nbike = 10\n").unwrap_err();
        assert!(err.to_string().contains("heavy"));
    }

    #[test]
    fn user_needs_exactly_one_credential() {
        let err = AppConfig::from_toml("[[users]]\nusername = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = AppConfig::from_toml(
            "[[users]]\nusername = \"x\"\npassword = \"a\"\npassword_hash = \"b\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn duplicate_usernames_are_invalid() {
        let err = AppConfig::from_toml(
            "[[users]]\nusername = \"x\"\npassword = \"a\"\n\n[[users]]\nusername = \"x\"\npassword = \"b\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = AppConfig::from_toml("[lot\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("smart-parking-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.lot.num_slots = 4;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AppConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
