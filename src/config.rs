use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub log_level: String,
    pub environment: Environment,
    /// `None` when the datastore secrets are absent. The server still starts,
    /// but every submission is answered with a configuration error.
    pub datastore: Option<DatastoreConfig>,
}

#[derive(Clone)]
pub struct DatastoreConfig {
    pub url: String,
    pub service_key: String,
    pub timeout_secs: u64,
}

// Keep the access key out of logs.
impl std::fmt::Debug for DatastoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatastoreConfig")
            .field("url", &self.url)
            .field("service_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Environment {
    Production,
    Development,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host: IpAddr = env_or("INTAKE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_HOST: {e}"))?;

        let port: u16 = env_or("INTAKE_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_PORT: {e}"))?;

        let max_body_size: usize = env_or("INTAKE_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("INTAKE_LOG_LEVEL", "info");

        let environment = match env_or("INTAKE_ENV", "production").to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        };

        let timeout_secs: u64 = env_or("DATASTORE_TIMEOUT_SECS", "10")
            .parse()
            .map_err(|e| format!("Invalid DATASTORE_TIMEOUT_SECS: {e}"))?;

        let url = non_empty(lookup("SUPABASE_URL"));
        let service_key =
            non_empty(lookup("SUPABASE_SERVICE_KEY")).or_else(|| non_empty(lookup("SUPABASE_ANON_KEY")));

        let datastore = match (url, service_key) {
            (Some(url), Some(service_key)) => Some(DatastoreConfig {
                url,
                service_key,
                timeout_secs,
            }),
            _ => None,
        };

        Ok(Config {
            host,
            port,
            max_body_size,
            log_level,
            environment,
            datastore,
        })
    }

    /// Whether raw driver detail may be included in error responses.
    pub fn expose_diagnostics(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
