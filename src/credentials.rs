//! Ordered credential-source chain for Azure bearer tokens.
//!
//! Replaces the ambient "default credential" lookup of the Azure SDKs with
//! an explicit, ordered list of sources, each implementing one capability:
//! attempt to produce a token, fail if inapplicable. Sources are tried in
//! sequence (environment, workload identity, managed identity) and the first
//! token wins. The chain is rebuilt per request; tokens are never cached.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::Config;

// ---

/// An acquired bearer token for the ARM audience.
#[derive(Debug, Clone)]
pub struct BearerToken {
    // ---
    pub secret: String,
}

/// One way of producing a bearer token from the hosting environment.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    // ---
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Attempt to produce a token; errors mean "inapplicable or failed".
    async fn acquire(&self, client: &reqwest::Client) -> Result<BearerToken>;
}

/// Build the default source chain, in resolution order.
pub fn default_chain(config: &Config) -> Vec<Box<dyn CredentialSource>> {
    // ---
    vec![
        Box::new(EnvironmentCredential::new(config)),
        Box::new(WorkloadIdentityCredential::new(config)),
        Box::new(ManagedIdentityCredential::new(config)),
    ]
}

/// Try the default chain and return the first token produced.
///
/// Fails only when every source fails; the error aggregates each source's
/// reason so the page status shows why no credential was available.
pub async fn acquire_token(config: &Config, client: &reqwest::Client) -> Result<BearerToken> {
    // ---
    try_sources(&default_chain(config), client).await
}

async fn try_sources(
    sources: &[Box<dyn CredentialSource>],
    client: &reqwest::Client,
) -> Result<BearerToken> {
    // ---
    let mut failures = Vec::new();

    for source in sources {
        match source.acquire(client).await {
            Ok(token) => {
                tracing::debug!("credential source '{}' produced a token", source.name());
                return Ok(token);
            }
            Err(error) => {
                tracing::debug!("credential source '{}' unavailable: {error:#}", source.name());
                failures.push(format!("{}: {error:#}", source.name()));
            }
        }
    }

    Err(anyhow!(
        "no credential source produced a token [{}]",
        failures.join("; ")
    ))
}

/// Form the OAuth scope for the configured ARM endpoint.
fn arm_scope(arm_endpoint: &str) -> String {
    // ---
    format!("{}/.default", arm_endpoint.trim_end_matches('/'))
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    // ---
    access_token: String,
}

async fn token_from_response(response: reqwest::Response) -> Result<BearerToken> {
    // ---
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("token endpoint returned {status}: {body}"));
    }

    let token: TokenResponse = response.json().await.context("decode token response")?;
    Ok(BearerToken {
        secret: token.access_token,
    })
}

// ---

/// Client-credentials grant from `AZURE_TENANT_ID` / `AZURE_CLIENT_ID` /
/// `AZURE_CLIENT_SECRET`.
pub struct EnvironmentCredential {
    // ---
    authority_host: String,
    scope: String,
    tenant_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl EnvironmentCredential {
    pub fn new(config: &Config) -> Self {
        // ---
        Self {
            authority_host: config.authority_host.clone(),
            scope: arm_scope(&config.arm_endpoint),
            tenant_id: config.tenant_id.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }
}

#[async_trait]
impl CredentialSource for EnvironmentCredential {
    // ---
    fn name(&self) -> &'static str {
        "environment"
    }

    async fn acquire(&self, client: &reqwest::Client) -> Result<BearerToken> {
        // ---
        let tenant_id = self.tenant_id.as_deref().ok_or_else(|| anyhow!("AZURE_TENANT_ID not set"))?;
        let client_id = self.client_id.as_deref().ok_or_else(|| anyhow!("AZURE_CLIENT_ID not set"))?;
        let client_secret = self
            .client_secret
            .as_deref()
            .ok_or_else(|| anyhow!("AZURE_CLIENT_SECRET not set"))?;

        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            tenant_id
        );

        let response = client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("request token from {url}"))?;

        token_from_response(response).await
    }
}

// ---

/// Client-assertion grant reading a projected federated token file
/// (Kubernetes workload identity).
pub struct WorkloadIdentityCredential {
    // ---
    authority_host: String,
    scope: String,
    tenant_id: Option<String>,
    client_id: Option<String>,
    token_file: Option<String>,
}

impl WorkloadIdentityCredential {
    pub fn new(config: &Config) -> Self {
        // ---
        Self {
            authority_host: config.authority_host.clone(),
            scope: arm_scope(&config.arm_endpoint),
            tenant_id: config.tenant_id.clone(),
            client_id: config.client_id.clone(),
            token_file: config.federated_token_file.clone(),
        }
    }
}

#[async_trait]
impl CredentialSource for WorkloadIdentityCredential {
    // ---
    fn name(&self) -> &'static str {
        "workload-identity"
    }

    async fn acquire(&self, client: &reqwest::Client) -> Result<BearerToken> {
        // ---
        let tenant_id = self.tenant_id.as_deref().ok_or_else(|| anyhow!("AZURE_TENANT_ID not set"))?;
        let client_id = self.client_id.as_deref().ok_or_else(|| anyhow!("AZURE_CLIENT_ID not set"))?;
        let token_file = self
            .token_file
            .as_deref()
            .ok_or_else(|| anyhow!("AZURE_FEDERATED_TOKEN_FILE not set"))?;

        let assertion = tokio::fs::read_to_string(token_file)
            .await
            .with_context(|| format!("read federated token file {token_file}"))?;

        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            tenant_id
        );

        let response = client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id),
                (
                    "client_assertion_type",
                    "urn:ietf:params:oauth:client-assertion-type:jwt-bearer",
                ),
                ("client_assertion", assertion.trim()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("request token from {url}"))?;

        token_from_response(response).await
    }
}

// ---

/// Instance-metadata-service token probe (managed identity).
pub struct ManagedIdentityCredential {
    // ---
    imds_endpoint: String,
    resource: String,
}

/// IMDS is a link-local endpoint; off Azure the probe must fail fast rather
/// than stall the credential chain.
const IMDS_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

impl ManagedIdentityCredential {
    pub fn new(config: &Config) -> Self {
        // ---
        Self {
            imds_endpoint: config.imds_endpoint.clone(),
            resource: config.arm_endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CredentialSource for ManagedIdentityCredential {
    // ---
    fn name(&self) -> &'static str {
        "managed-identity"
    }

    async fn acquire(&self, client: &reqwest::Client) -> Result<BearerToken> {
        // ---
        let url = format!(
            "{}/metadata/identity/oauth2/token",
            self.imds_endpoint.trim_end_matches('/')
        );

        let response = client
            .get(&url)
            .query(&[("api-version", "2018-02-01"), ("resource", self.resource.as_str())])
            .header("Metadata", "true")
            .timeout(IMDS_PROBE_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("probe IMDS at {url}"))?;

        token_from_response(response).await
    }
}
