//! Application configuration management.
//!
//! Configuration is loaded once and threaded explicitly into the services
//! that need it; nothing in the core reads ambient global state.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Top-level configuration for the accounting core.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoreConfig {
    /// Accounting configuration.
    #[serde(default)]
    pub accounting: AccountingConfig,
    /// ZATCA e-invoicing configuration.
    #[serde(default)]
    pub zatca: ZatcaConfig,
}

/// Accounting and tax defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountingConfig {
    /// ISO country code used to select the primary tax authority.
    #[serde(default = "default_country_code")]
    pub country_code: String,
    /// Flat VAT rate used when no tax authority is configured.
    #[serde(default = "default_vat_rate")]
    pub vat_rate: Decimal,
    /// Account code the legacy flat-rate VAT line points at.
    #[serde(default = "default_output_vat_account")]
    pub output_vat_account: String,
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            vat_rate: default_vat_rate(),
            output_vat_account: default_output_vat_account(),
        }
    }
}

fn default_country_code() -> String {
    "SA".to_string()
}

fn default_vat_rate() -> Decimal {
    Decimal::new(15, 2) // 0.15
}

fn default_output_vat_account() -> String {
    "2210".to_string()
}

/// ZATCA e-invoicing environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZatcaEnvironment {
    /// Sandbox endpoints; submissions are accepted without clearance.
    #[default]
    Sandbox,
    /// Production endpoints; requires a full certificate setup.
    Production,
}

/// ZATCA e-invoicing configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZatcaConfig {
    /// Explicit enablement flag.
    #[serde(default)]
    pub enabled: bool,
    /// Target environment.
    #[serde(default)]
    pub environment: ZatcaEnvironment,
    /// Registered seller name embedded in the scannable code.
    #[serde(default)]
    pub seller_name: String,
    /// VAT registration number; required for submission.
    #[serde(default)]
    pub tax_number: String,
    /// Company country; ZATCA is mandatory for "SA" regardless of the flag.
    #[serde(default = "default_country_code")]
    pub company_country: String,
}

impl CoreConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KHAZNA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_accounting_defaults() {
        let cfg = AccountingConfig::default();
        assert_eq!(cfg.country_code, "SA");
        assert_eq!(cfg.vat_rate, dec!(0.15));
        assert_eq!(cfg.output_vat_account, "2210");
    }

    #[test]
    fn test_zatca_defaults() {
        let cfg = ZatcaConfig::default();
        assert!(!cfg.enabled);
        assert_eq!(cfg.environment, ZatcaEnvironment::Sandbox);
        assert!(cfg.tax_number.is_empty());
    }

    #[test]
    fn test_empty_sources_deserialize_to_defaults() {
        let cfg: CoreConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.accounting.vat_rate, dec!(0.15));
        assert!(!cfg.zatca.enabled);
    }
}
