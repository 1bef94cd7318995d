//! Host metrics for the pod-info table.
//!
//! Six fixed entries, read fresh from the operating system on every request
//! via `sysinfo`. These queries are local and synchronous; they have no
//! error path (an unknown hostname degrades to `"unknown"`).
//!
//! The original service this replaces displayed raw byte counts for the
//! memory rows because its byte-to-GB conversion was broken; the conversion
//! here is the intended one (bytes / 1024³, two decimals).

use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use crate::MetricEntry;

// ---

const BYTES_PER_GB: f64 = (1024 * 1024 * 1024) as f64;

/// Collect the six pod metrics, in their fixed display order.
pub fn collect() -> Vec<MetricEntry> {
    // ---
    let sys = System::new_with_specifics(
        RefreshKind::new()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything()),
    );

    let load = System::load_average();

    vec![
        entry(
            "Pod Host",
            System::host_name().unwrap_or_else(|| "unknown".to_string()),
        ),
        entry("Pod uptime", format!("{} secs", System::uptime())),
        entry(
            "Pod CPU load",
            format!("{:.2}, {:.2}, {:.2}", load.one, load.five, load.fifteen),
        ),
        entry("Pod Total Memory", format_gb(sys.total_memory())),
        entry("Pod Free Memory", format_gb(sys.free_memory())),
        entry("Pod CPU Count", sys.cpus().len().to_string()),
    ]
}

fn entry(name: &str, value: String) -> MetricEntry {
    // ---
    MetricEntry {
        name: name.to_string(),
        value,
    }
}

fn format_gb(bytes: u64) -> String {
    // ---
    format!("{:.2} GB", bytes as f64 / BYTES_PER_GB)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_collect_returns_six_fixed_entries_in_order() {
        // ---
        let metrics = collect();
        let names: Vec<&str> = metrics.iter().map(|m| m.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "Pod Host",
                "Pod uptime",
                "Pod CPU load",
                "Pod Total Memory",
                "Pod Free Memory",
                "Pod CPU Count",
            ]
        );
    }

    #[test]
    fn test_unit_suffixes_are_applied() {
        // ---
        let metrics = collect();

        let uptime = &metrics[1];
        assert!(uptime.value.ends_with(" secs"), "got {:?}", uptime.value);

        let total = &metrics[3];
        assert!(total.value.ends_with(" GB"), "got {:?}", total.value);

        let free = &metrics[4];
        assert!(free.value.ends_with(" GB"), "got {:?}", free.value);
    }

    #[test]
    fn test_gb_conversion_divides_by_gibibyte() {
        // ---
        assert_eq!(format_gb(0), "0.00 GB");
        assert_eq!(format_gb(1024 * 1024 * 1024), "1.00 GB");
        assert_eq!(format_gb(8 * 1024 * 1024 * 1024 + 512 * 1024 * 1024), "8.50 GB");
    }

    #[test]
    fn test_cpu_load_has_three_samples() {
        // ---
        let metrics = collect();
        let load = &metrics[2];
        assert_eq!(load.value.split(", ").count(), 3, "got {:?}", load.value);
    }

    #[test]
    fn test_cpu_count_is_positive_integer() {
        // ---
        let metrics = collect();
        let count: usize = metrics[5].value.parse().expect("cpu count parses");
        assert!(count >= 1);
    }
}
