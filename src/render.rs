//! HTML rendering for the pod-info page.
//!
//! Small built-in template collaborator: callers pick a [`Template`] and
//! hand over the payload, and get back a complete HTML document. All
//! interpolated text is escaped; the status field in particular can carry
//! arbitrary transport error detail.

use serde_json::Value;

use crate::models::ViewPayload;

// ---

/// Identifies which page template to render.
#[derive(Debug, Clone, Copy)]
pub enum Template {
    /// The single pod-info page served at `/`.
    Index,
}

/// Render `payload` through the named template into an HTML document.
pub fn render(template: Template, payload: &ViewPayload) -> String {
    // ---
    match template {
        Template::Index => index(payload),
    }
}

fn index(payload: &ViewPayload) -> String {
    // ---
    let mut rows = String::new();
    for metric in &payload.pod_info {
        rows.push_str(&format!(
            "      <tr><td>{}</td><td>{}</td></tr>\n",
            escape(&metric.name),
            escape(&metric.value)
        ));
    }

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><title>{title}</title></head>\n\
         <body>\n\
           <h1>{title}</h1>\n\
           <p>Status: {status}</p>\n\
           <h2>Pod Metrics</h2>\n\
           <table>\n\
             <tbody>\n\
         {rows}\
             </tbody>\n\
           </table>\n\
           <h2>Role Assignments ({count})</h2>\n\
           <pre>{assignments}</pre>\n\
         </body>\n\
         </html>\n",
        title = escape(&payload.title),
        status = escape(&payload.status),
        rows = rows,
        count = payload.role_assignments.len(),
        assignments = escape(&pretty_assignments(&payload.role_assignments)),
    )
}

fn pretty_assignments(assignments: &[Value]) -> String {
    // ---
    serde_json::to_string_pretty(assignments).unwrap_or_else(|_| "[]".to_string())
}

fn escape(text: &str) -> String {
    // ---
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::MetricEntry;
    use serde_json::json;

    fn payload() -> ViewPayload {
        // ---
        ViewPayload {
            title: "Pod Info".to_string(),
            status: "OK".to_string(),
            pod_info: vec![
                MetricEntry {
                    name: "Pod Host".to_string(),
                    value: "node-1".to_string(),
                },
                MetricEntry {
                    name: "Pod CPU Count".to_string(),
                    value: "8".to_string(),
                },
            ],
            role_assignments: vec![json!({"name": "ra-1"})],
        }
    }

    #[test]
    fn test_index_contains_all_payload_fields() {
        // ---
        let html = render(Template::Index, &payload());

        assert!(html.contains("<title>Pod Info</title>"));
        assert!(html.contains("Status: OK"));
        assert!(html.contains("<td>Pod Host</td><td>node-1</td>"));
        assert!(html.contains("<td>Pod CPU Count</td><td>8</td>"));
        assert!(html.contains("Role Assignments (1)"));
        assert!(html.contains("ra-1"));
    }

    #[test]
    fn test_hostile_status_is_escaped() {
        // ---
        let mut p = payload();
        p.status = "<script>alert('x')</script>".to_string();

        let html = render(Template::Index, &p);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn test_empty_assignment_list_renders() {
        // ---
        let mut p = payload();
        p.role_assignments.clear();

        let html = render(Template::Index, &p);

        assert!(html.contains("Role Assignments (0)"));
        assert!(html.contains("[]"));
    }
}
