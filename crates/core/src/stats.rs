//! Inventory statistics assembled from raw aggregation buckets.
//!
//! The database produces three independent groupings in one pass (by model,
//! by status, total). This module maps the raw buckets to the named summary
//! fields the dashboard reads. Unknown, renamed or missing buckets never
//! fail: absent counts are zero, unknown keys are simply not promoted.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::status::{AssetStatus, StatusId};
use crate::types::DbId;

/// Asset count for one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelBucket {
    pub model_id: DbId,
    pub model_name: String,
    pub category_name: String,
    pub count: i64,
}

/// Raw asset count for one status id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusBucket {
    pub status_id: StatusId,
    pub count: i64,
}

/// Status bucket as exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Named status counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusSummary {
    pub in_use: i64,
    pub in_stock: i64,
    pub under_maintenance: i64,
    pub retired: i64,
}

/// Named counts for the well-known hardware categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryCounts {
    pub desktops: i64,
    pub laptops: i64,
    pub network_switches: i64,
    pub wireless_aps: i64,
}

/// Full statistics payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryStats {
    pub total: i64,
    pub by_model: Vec<ModelBucket>,
    pub by_status: Vec<StatusCount>,
    pub by_category: BTreeMap<String, i64>,
    pub summary: StatusSummary,
    pub category_counts: CategoryCounts,
}

/// Fold a category name into a comparison key: lowercase, single spaces,
/// plural suffix dropped ("Laptops", "laptop" and "Switches" all fold).
fn category_key(name: &str) -> String {
    let lowered = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    for suffix in ["ches", "shes", "xes"] {
        if lowered.ends_with(suffix) {
            return lowered[..lowered.len() - 2].to_string();
        }
    }
    match lowered.strip_suffix('s') {
        Some(stem) if !stem.is_empty() && !stem.ends_with('s') => stem.to_string(),
        _ => lowered,
    }
}

/// The named counter a well-known category key feeds, if any.
fn known_category_field<'a>(counts: &'a mut CategoryCounts, key: &str) -> Option<&'a mut i64> {
    match key {
        "desktop" => Some(&mut counts.desktops),
        "laptop" => Some(&mut counts.laptops),
        "network switch" | "switch" => Some(&mut counts.network_switches),
        "wireless ap" | "access point" => Some(&mut counts.wireless_aps),
        _ => None,
    }
}

/// Assemble the statistics payload from raw buckets.
pub fn build_stats(
    total: i64,
    by_model: Vec<ModelBucket>,
    by_status: Vec<StatusBucket>,
) -> InventoryStats {
    let mut summary = StatusSummary::default();
    let mut status_counts = Vec::with_capacity(by_status.len());
    for bucket in &by_status {
        let Some(status) = AssetStatus::from_id(bucket.status_id) else {
            continue;
        };
        match status {
            AssetStatus::InUse => summary.in_use += bucket.count,
            AssetStatus::InStock => summary.in_stock += bucket.count,
            AssetStatus::UnderMaintenance => summary.under_maintenance += bucket.count,
            AssetStatus::Retired => summary.retired += bucket.count,
        }
        status_counts.push(StatusCount {
            status: status.name().to_string(),
            count: bucket.count,
        });
    }

    let mut by_category: BTreeMap<String, i64> = BTreeMap::new();
    for bucket in &by_model {
        *by_category.entry(bucket.category_name.clone()).or_default() += bucket.count;
    }

    let mut category_counts = CategoryCounts::default();
    for (name, count) in &by_category {
        if let Some(field) = known_category_field(&mut category_counts, &category_key(name)) {
            *field += count;
        }
    }

    InventoryStats {
        total,
        by_model,
        by_status: status_counts,
        by_category,
        summary,
        category_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: DbId, name: &str, category: &str, count: i64) -> ModelBucket {
        ModelBucket {
            model_id: id,
            model_name: name.to_string(),
            category_name: category.to_string(),
            count,
        }
    }

    #[test]
    fn empty_ledger_is_all_zero() {
        let stats = build_stats(0, vec![], vec![]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.summary, StatusSummary::default());
        assert_eq!(stats.category_counts, CategoryCounts::default());
        assert!(stats.by_category.is_empty());
    }

    #[test]
    fn status_buckets_map_to_named_fields() {
        let stats = build_stats(
            10,
            vec![],
            vec![
                StatusBucket { status_id: 1, count: 7 },
                StatusBucket { status_id: 2, count: 2 },
                StatusBucket { status_id: 3, count: 1 },
            ],
        );
        assert_eq!(stats.summary.in_use, 7);
        assert_eq!(stats.summary.in_stock, 2);
        assert_eq!(stats.summary.under_maintenance, 1);
        assert_eq!(stats.summary.retired, 0);
        assert_eq!(stats.by_status[0].status, "In Use");
    }

    #[test]
    fn unknown_status_ids_are_ignored() {
        let stats = build_stats(3, vec![], vec![StatusBucket { status_id: 42, count: 3 }]);
        assert_eq!(stats.summary, StatusSummary::default());
        assert!(stats.by_status.is_empty());
    }

    #[test]
    fn models_roll_up_into_categories() {
        let stats = build_stats(
            6,
            vec![
                model(1, "XPS-15", "Laptop", 2),
                model(2, "ThinkPad X1", "Laptop", 1),
                model(3, "OptiPlex", "Desktops", 3),
            ],
            vec![],
        );
        assert_eq!(stats.by_category["Laptop"], 3);
        assert_eq!(stats.by_category["Desktops"], 3);
        assert_eq!(stats.category_counts.laptops, 3);
        assert_eq!(stats.category_counts.desktops, 3);
    }

    #[test]
    fn renamed_categories_do_not_error_and_stay_visible() {
        let stats = build_stats(4, vec![model(1, "XPS-15", "Notebook", 4)], vec![]);
        assert_eq!(stats.category_counts.laptops, 0);
        assert_eq!(stats.by_category["Notebook"], 4);
    }

    #[test]
    fn category_matching_ignores_case_spacing_and_plural() {
        let stats = build_stats(
            5,
            vec![
                model(1, "C9300", "network  SWITCHES", 2),
                model(2, "U6", "Wireless APs", 3),
            ],
            vec![],
        );
        assert_eq!(stats.category_counts.network_switches, 2);
        assert_eq!(stats.category_counts.wireless_aps, 3);
    }

    #[test]
    fn category_key_normalizes() {
        assert_eq!(category_key("Laptops"), "laptop");
        assert_eq!(category_key(" Network   Switch "), "network switch");
        assert_eq!(category_key("Switches"), "switch");
        assert_eq!(category_key("s"), "s");
    }
}
