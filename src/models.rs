//! View-model types for the pod info page.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

// ---

/// One name/value row in the pod-info table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricEntry {
    // ---
    pub name: String,
    pub value: String,
}

/// Everything the index template needs for one render.
///
/// Built fresh per request and dropped after the render completes. `status`
/// is either the literal `"OK"` or the rendered error chain from the role
/// assignment call, never both and never anything else.
#[derive(Debug, Serialize)]
pub struct ViewPayload {
    // ---
    pub title: String,
    pub status: String,
    pub pod_info: Vec<MetricEntry>,
    pub role_assignments: Vec<Value>,
}

/// Merge the role-assignment outcome with the host metrics into one payload.
///
/// A failed remote call is absorbed here: the error becomes the page status
/// and the assignment list stays empty. Errors never propagate past this
/// point, so the page renders (HTTP 200) on both paths.
pub fn assemble_payload(result: Result<Vec<Value>>, pod_info: Vec<MetricEntry>) -> ViewPayload {
    // ---
    let (status, role_assignments) = match result {
        Ok(assignments) => ("OK".to_string(), assignments),
        Err(error) => (format!("{error:#}"), Vec::new()),
    };

    ViewPayload {
        title: "Pod Info".to_string(),
        status,
        pod_info,
        role_assignments,
    }
}
