use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub supplier: SupplierConfig,
    pub maps: MapsConfig,
    pub payments: PaymentsConfig,
    pub mail: MailConfig,
    pub pricing: PricingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

/// Hotel-inventory supplier credentials and egress settings.
#[derive(Debug, Deserialize, Clone)]
pub struct SupplierConfig {
    pub base_url: String,
    #[serde(default)]
    pub key_id: String,
    #[serde(default)]
    pub key_secret: String,
    /// Static-IP proxy for supplier whitelisting.
    #[serde(default)]
    pub proxy_url: Option<String>,
    pub corporate_email: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapsConfig {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentsConfig {
    pub razorpay: RazorpayConfig,
    pub paypal: PaypalConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RazorpayConfig {
    #[serde(default)]
    pub key_id: String,
    #[serde(default)]
    pub key_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaypalConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_paypal_mode")]
    pub mode: String,
}

fn default_paypal_mode() -> String {
    "sandbox".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub sender_name: String,
    pub sender_email: String,
}

/// Price-composition rules applied to supplier rates.
#[derive(Debug, Deserialize, Clone)]
pub struct PricingRules {
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,
    #[serde(default = "default_original_price_multiplier")]
    pub original_price_multiplier: f64,
    #[serde(default = "default_discount_percent")]
    pub discount_percent: i64,
    #[serde(default = "default_usd_to_inr")]
    pub usd_to_inr: f64,
    #[serde(default = "default_eur_to_inr")]
    pub eur_to_inr: f64,
    #[serde(default = "default_gbp_to_inr")]
    pub gbp_to_inr: f64,
}

fn default_commission_rate() -> f64 {
    0.15
}

fn default_original_price_multiplier() -> f64 {
    1.25
}

fn default_discount_percent() -> i64 {
    15
}

fn default_usd_to_inr() -> f64 {
    86.5
}

fn default_eur_to_inr() -> f64 {
    92.0
}

fn default_gbp_to_inr() -> f64 {
    108.0
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of TRIPGATE)
            // Eg. `TRIPGATE__SERVER__PORT=8080` would set the server port
            .add_source(config::Environment::with_prefix("TRIPGATE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
