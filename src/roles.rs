//! Azure role-assignment listing.
//!
//! One operation against Azure Resource Manager: list the role assignments
//! for the scope `subscriptions/{subscription_id}`, filtered to those
//! granted to the configured service principal. Records come back as plain
//! `serde_json::Value` data, so downstream code holds nothing but the wire
//! payload. No retry, no timeout, no caching; a hung ARM endpoint hangs the
//! request.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::{credentials, Config};

// ---

const API_VERSION: &str = "2022-04-01";

#[derive(Debug, Deserialize)]
struct RoleAssignmentListing {
    // ---
    #[serde(default)]
    value: Vec<Value>,
}

/// List the role assignments granted to the configured principal.
///
/// Builds a fresh HTTP client and credential chain per call. The ids are
/// interpolated unvalidated; an empty subscription id yields a malformed
/// scope that ARM rejects, which surfaces as the error returned here.
pub async fn list_for_principal(config: &Config) -> Result<Vec<Value>> {
    // ---
    let client = reqwest::Client::new();

    let token = credentials::acquire_token(config, &client).await?;

    let url = listing_url(&config.arm_endpoint, &config.subscription_id);
    let filter = assigned_to_filter(&config.service_principal_id);

    let response = client
        .get(&url)
        .query(&[("api-version", API_VERSION), ("$filter", filter.as_str())])
        .bearer_auth(&token.secret)
        .send()
        .await
        .with_context(|| {
            format!(
                "list role assignments for scope subscriptions/{}",
                config.subscription_id
            )
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("role assignment listing returned {status}: {body}"));
    }

    let listing: RoleAssignmentListing = response
        .json()
        .await
        .context("decode role assignment listing")?;

    Ok(listing.value)
}

fn listing_url(arm_endpoint: &str, subscription_id: &str) -> String {
    // ---
    format!(
        "{}/subscriptions/{}/providers/Microsoft.Authorization/roleAssignments",
        arm_endpoint.trim_end_matches('/'),
        subscription_id
    )
}

/// ARM expects the principal id wrapped in braces inside the filter literal.
fn assigned_to_filter(principal_id: &str) -> String {
    // ---
    format!("assignedTo('{{{principal_id}}}')")
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listing_url_shape() {
        // ---
        assert_eq!(
            listing_url("https://management.azure.com/", "sub-1"),
            "https://management.azure.com/subscriptions/sub-1/providers/Microsoft.Authorization/roleAssignments"
        );
    }

    #[test]
    fn test_filter_wraps_principal_in_braces() {
        // ---
        assert_eq!(assigned_to_filter("abc-123"), "assignedTo('{abc-123}')");
    }

    #[test]
    fn test_empty_ids_are_interpolated_unvalidated() {
        // ---
        // Scenario: env vars unset. The query is still formed (malformed on
        // purpose) and left for the remote side to reject.
        assert_eq!(
            listing_url("https://management.azure.com", ""),
            "https://management.azure.com/subscriptions//providers/Microsoft.Authorization/roleAssignments"
        );
        assert_eq!(assigned_to_filter(""), "assignedTo('{}')");
    }

    #[test]
    fn test_listing_decodes_value_array() {
        // ---
        let listing: RoleAssignmentListing = serde_json::from_value(json!({
            "value": [
                {"name": "ra-1", "properties": {"principalId": "p"}},
                {"name": "ra-2", "properties": {"principalId": "p"}}
            ]
        }))
        .expect("decode");
        assert_eq!(listing.value.len(), 2);
    }

    #[test]
    fn test_listing_tolerates_missing_value_field() {
        // ---
        let listing: RoleAssignmentListing =
            serde_json::from_value(json!({})).expect("decode");
        assert!(listing.value.is_empty());
    }
}
