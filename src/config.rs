use std::env;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub user_port: u16,
    pub restaurant_port: u16,
    pub agent_port: u16,
    pub order_port: u16,
    pub order_service_url: String,
    pub agent_service_url: String,
    pub restaurant_service_url: String,
    pub upstream_timeout: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let agent_port: u16 = parse_or_default("AGENT_PORT", 3003)?;
        let order_port: u16 = parse_or_default("ORDER_PORT", 3004)?;
        let restaurant_port: u16 = parse_or_default("RESTAURANT_PORT", 3002)?;

        Ok(Self {
            user_port: parse_or_default("USER_PORT", 3001)?,
            restaurant_port,
            agent_port,
            order_port,
            order_service_url: env::var("ORDER_SERVICE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{order_port}")),
            agent_service_url: env::var("AGENT_SERVICE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{agent_port}")),
            restaurant_service_url: env::var("RESTAURANT_SERVICE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{restaurant_port}")),
            upstream_timeout: Duration::from_millis(parse_or_default(
                "UPSTREAM_TIMEOUT_MS",
                2_000,
            )?),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
