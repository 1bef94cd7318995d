//! Configuration loader for the `podinfo-web` service.
//!
//! This module centralizes all runtime configuration values and their
//! defaults, loading from environment variables (with optional `.env` file
//! support provided by the caller). By consolidating configuration logic
//! here, we avoid scattering `env::var` calls throughout the codebase.
//!
use std::env;

use anyhow::Result;

/// Read an optional string environment variable with a default value.
macro_rules! env_or {
    ($var_name:expr, $default:expr) => {
        env::var($var_name).unwrap_or_else(|_| $default.to_string())
    };
}

/// Read an environment variable that may legitimately be absent.
macro_rules! env_opt {
    ($var_name:expr) => {
        env::var($var_name).ok().filter(|v| !v.is_empty())
    };
}

/// Strongly typed application configuration.
///
/// Built once at process start and shared (read-only) with every request
/// handler via router state. Subscription and principal ids are deliberately
/// NOT validated: an empty value produces a malformed Azure query that the
/// remote API rejects, and the page reports that rejection in-band.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Azure subscription whose role assignments are listed.
    pub subscription_id: String,

    /// Object id of the service principal the listing is filtered to.
    pub service_principal_id: String,

    /// Azure Resource Manager base URL.
    pub arm_endpoint: String,

    /// AAD token authority base URL.
    pub authority_host: String,

    /// Instance metadata service base URL (managed identity token source).
    pub imds_endpoint: String,

    /// AAD tenant for the environment / workload-identity credentials.
    pub tenant_id: Option<String>,

    /// Client id for the environment / workload-identity credentials.
    pub client_id: Option<String>,

    /// Client secret for the environment credential.
    pub client_secret: Option<String>,

    /// Path to a federated token file (workload identity).
    pub federated_token_file: Option<String>,
}

/// Load configuration from environment variables with defaults.
///
/// Recognized variables:
/// - `AZURE_SUBSCRIPTION_ID` – target subscription (default: empty)
/// - `AZURE_SERVICE_PRINCIPAL_OBJECT_ID` – principal filter (default: empty)
/// - `AZURE_ARM_ENDPOINT` – ARM base URL (default: public cloud)
/// - `AZURE_AUTHORITY_HOST` – token authority (default: public cloud)
/// - `AZURE_IMDS_ENDPOINT` – IMDS base URL (default: link-local address)
/// - `AZURE_TENANT_ID` / `AZURE_CLIENT_ID` / `AZURE_CLIENT_SECRET` /
///   `AZURE_FEDERATED_TOKEN_FILE` – optional credential material
///
/// Nothing is required; missing credential material just means the
/// corresponding credential source reports itself inapplicable.
pub fn load_from_env() -> Result<Config> {
    // ---
    Ok(Config {
        subscription_id: env_or!("AZURE_SUBSCRIPTION_ID", ""),
        service_principal_id: env_or!("AZURE_SERVICE_PRINCIPAL_OBJECT_ID", ""),
        arm_endpoint: env_or!("AZURE_ARM_ENDPOINT", "https://management.azure.com"),
        authority_host: env_or!("AZURE_AUTHORITY_HOST", "https://login.microsoftonline.com"),
        imds_endpoint: env_or!("AZURE_IMDS_ENDPOINT", "http://169.254.169.254"),
        tenant_id: env_opt!("AZURE_TENANT_ID"),
        client_id: env_opt!("AZURE_CLIENT_ID"),
        client_secret: env_opt!("AZURE_CLIENT_SECRET"),
        federated_token_file: env_opt!("AZURE_FEDERATED_TOKEN_FILE"),
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// The client secret is never printed, only whether one is present.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  AZURE_SUBSCRIPTION_ID             : {}", self.subscription_id);
        tracing::info!(
            "  AZURE_SERVICE_PRINCIPAL_OBJECT_ID : {}",
            self.service_principal_id
        );
        tracing::info!("  AZURE_ARM_ENDPOINT                : {}", self.arm_endpoint);
        tracing::info!("  AZURE_AUTHORITY_HOST              : {}", self.authority_host);
        tracing::info!("  AZURE_IMDS_ENDPOINT               : {}", self.imds_endpoint);
        tracing::info!(
            "  AZURE_TENANT_ID                   : {}",
            self.tenant_id.as_deref().unwrap_or("<unset>")
        );
        tracing::info!(
            "  AZURE_CLIENT_ID                   : {}",
            self.client_id.as_deref().unwrap_or("<unset>")
        );
        tracing::info!(
            "  AZURE_CLIENT_SECRET               : {}",
            if self.client_secret.is_some() { "****" } else { "<unset>" }
        );
        tracing::info!(
            "  AZURE_FEDERATED_TOKEN_FILE        : {}",
            self.federated_token_file.as_deref().unwrap_or("<unset>")
        );
    }

    /// A config pointing at nothing, for unit tests across the crate.
    #[cfg(test)]
    pub(crate) fn for_tests() -> Config {
        // ---
        Config {
            subscription_id: "00000000-0000-0000-0000-000000000001".to_string(),
            service_principal_id: "00000000-0000-0000-0000-0000000000aa".to_string(),
            arm_endpoint: "http://127.0.0.1:1".to_string(),
            authority_host: "http://127.0.0.1:1".to_string(),
            imds_endpoint: "http://127.0.0.1:1".to_string(),
            tenant_id: None,
            client_id: None,
            client_secret: None,
            federated_token_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_config_is_cloneable_and_independent() {
        // ---
        let a = Config::for_tests();
        let mut b = a.clone();
        b.subscription_id.push_str("-changed");
        assert_ne!(a.subscription_id, b.subscription_id);
    }
}
