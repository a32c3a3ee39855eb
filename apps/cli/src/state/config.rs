//! # Configuration State
//!
//! Stores configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOREFRONT_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only once the session is open.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use storefront_core::pricing::PricingRules;
use storefront_core::{Money, TaxRate, ADMIN_EMAIL};
use storefront_db::HydrateOptions;
use thiserror::Error;

/// Rejected configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Storefront configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name shown in headers
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Decimal places shown for amounts (0, 1 or 2); amounts are
    /// rounded half away from zero when fewer than 2
    pub currency_decimals: u8,

    /// GST rate in basis points, 1800 = 18%
    pub gst_rate_bps: u32,

    /// Orders with a subtotal above this ship free (paise)
    pub free_shipping_threshold_paise: i64,

    /// Shipping fee below the threshold (paise)
    pub flat_shipping_paise: i64,

    /// Sign in as the administrator when no session is stored.
    /// Off unless `STOREFRONT_DEMO_AUTO_LOGIN` is set.
    pub demo_auto_login: bool,

    pub admin_email: String,

    /// Seeded administrator password. Never serialized.
    #[serde(skip)]
    pub admin_password: String,

    /// Database file; `None` means the platform data directory.
    pub database_path: Option<PathBuf>,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Store: "Fixderma"
    /// - Currency: INR (₹)
    /// - GST: 18%
    /// - Shipping: free above ₹499, otherwise ₹50
    /// - Auto-login: off
    fn default() -> Self {
        let rules = PricingRules::default();
        ConfigState {
            store_name: "Fixderma".to_string(),
            currency_symbol: "₹".to_string(),
            currency_decimals: 2,
            gst_rate_bps: rules.tax_rate.bps(),
            free_shipping_threshold_paise: rules.free_shipping_threshold.paise(),
            flat_shipping_paise: rules.flat_shipping.paise(),
            demo_auto_login: false,
            admin_email: ADMIN_EMAIL.to_string(),
            admin_password: "admin123".to_string(),
            database_path: None,
        }
    }
}

impl ConfigState {
    /// Loads configuration from the process environment over defaults.
    ///
    /// ## Environment Variables
    /// - `STOREFRONT_STORE_NAME`
    /// - `STOREFRONT_CURRENCY_SYMBOL` / `STOREFRONT_CURRENCY_DECIMALS` (0-2)
    /// - `STOREFRONT_GST_BPS` (e.g. "1800")
    /// - `STOREFRONT_FREE_SHIPPING_THRESHOLD` / `STOREFRONT_FLAT_SHIPPING` (rupees)
    /// - `STOREFRONT_DEMO_AUTO_LOGIN` (true/false/1/0)
    /// - `STOREFRONT_ADMIN_EMAIL` / `STOREFRONT_ADMIN_PASSWORD`
    /// - `STOREFRONT_DB_PATH`
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = ConfigState::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(name) = get("STOREFRONT_STORE_NAME") {
            config.store_name = name;
        }

        if let Some(symbol) = get("STOREFRONT_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(raw) = get("STOREFRONT_CURRENCY_DECIMALS") {
            let decimals: u8 = parse("STOREFRONT_CURRENCY_DECIMALS", &raw)?;
            if decimals > 2 {
                return Err(invalid("STOREFRONT_CURRENCY_DECIMALS", &raw, "must be 0, 1 or 2"));
            }
            config.currency_decimals = decimals;
        }

        if let Some(raw) = get("STOREFRONT_GST_BPS") {
            let bps: u32 = parse("STOREFRONT_GST_BPS", &raw)?;
            if bps > 10_000 {
                return Err(invalid("STOREFRONT_GST_BPS", &raw, "must be at most 10000"));
            }
            config.gst_rate_bps = bps;
        }

        if let Some(raw) = get("STOREFRONT_FREE_SHIPPING_THRESHOLD") {
            config.free_shipping_threshold_paise =
                rupees("STOREFRONT_FREE_SHIPPING_THRESHOLD", &raw)?;
        }

        if let Some(raw) = get("STOREFRONT_FLAT_SHIPPING") {
            config.flat_shipping_paise = rupees("STOREFRONT_FLAT_SHIPPING", &raw)?;
        }

        if let Some(raw) = get("STOREFRONT_DEMO_AUTO_LOGIN") {
            config.demo_auto_login = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(invalid("STOREFRONT_DEMO_AUTO_LOGIN", &raw, "expected true or false")),
            };
        }

        if let Some(email) = get("STOREFRONT_ADMIN_EMAIL") {
            storefront_core::validation::validate_email(&email)
                .map_err(|e| invalid("STOREFRONT_ADMIN_EMAIL", &email, &e.to_string()))?;
            config.admin_email = email.trim().to_string();
        }

        if let Some(password) = get("STOREFRONT_ADMIN_PASSWORD") {
            storefront_core::validation::validate_password(&password)
                .map_err(|e| invalid("STOREFRONT_ADMIN_PASSWORD", "<hidden>", &e.to_string()))?;
            config.admin_password = password;
        }

        if let Some(path) = get("STOREFRONT_DB_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    /// Cart pricing rules for this store.
    pub fn pricing_rules(&self) -> PricingRules {
        PricingRules {
            tax_rate: TaxRate::from_bps(self.gst_rate_bps),
            free_shipping_threshold: Money::from_paise(self.free_shipping_threshold_paise),
            flat_shipping: Money::from_paise(self.flat_shipping_paise),
        }
    }

    /// Startup options for hydration.
    pub fn hydrate_options(&self) -> HydrateOptions {
        HydrateOptions {
            admin_email: self.admin_email.clone(),
            admin_password: self.admin_password.clone(),
            auto_login_admin: self.demo_auto_login,
        }
    }

    /// Formats a paise amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(49900), "₹499.00");
    /// ```
    pub fn format_currency(&self, paise: i64) -> String {
        let decimals = u32::from(self.currency_decimals.min(2));
        // paise -> units of 10^-decimals rupees, rounded half away from zero
        let step = 10_i64.pow(2 - decimals);
        let half = step / 2;
        let units = if step == 1 {
            paise
        } else if paise >= 0 {
            paise.saturating_add(half) / step
        } else {
            paise.saturating_sub(half) / step
        };

        let divisor = 10_i64.pow(decimals);
        let whole = units / divisor;
        let frac = (units % divisor).abs();

        format!(
            "{}{}{}",
            if paise < 0 { "-" } else { "" },
            self.currency_symbol,
            if decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }

    /// Formats a [`Money`] value.
    pub fn money(&self, amount: Money) -> String {
        self.format_currency(amount.paise())
    }
}

fn parse<T: FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| invalid(var, raw, &e.to_string()))
}

/// Whole rupees, converted to paise.
fn rupees(var: &'static str, raw: &str) -> Result<i64, ConfigError> {
    let value: i64 = parse(var, raw)?;
    if value < 0 {
        return Err(invalid(var, raw, "must not be negative"));
    }
    Money::checked_from_rupees(value)
        .map(|m| m.paise())
        .ok_or_else(|| invalid(var, raw, "too large"))
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
