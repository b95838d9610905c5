//! Faceted inventory statistics.

use itam_core::stats::{build_stats, InventoryStats, ModelBucket, StatusBucket};
use itam_core::status::StatusId;
use itam_core::types::DbId;
use sqlx::{FromRow, PgPool};

/// One row of the grouping-sets aggregation. Exactly one of the three
/// facets is populated per row, identified by the `GROUPING()` flags.
#[derive(Debug, FromRow)]
struct FacetRow {
    model_id: Option<DbId>,
    model_name: Option<String>,
    category_name: Option<String>,
    status_id: Option<StatusId>,
    model_grouping: i32,
    status_grouping: i32,
    count: i64,
}

/// Provides read-only aggregation over the ledger.
pub struct StatsRepo;

impl StatsRepo {
    /// Compute by-model, by-status and total counts in a single pass.
    pub async fn compute(pool: &PgPool) -> Result<InventoryStats, sqlx::Error> {
        let rows = sqlx::query_as::<_, FacetRow>(
            "SELECT m.id AS model_id, m.name AS model_name, c.name AS category_name,
                    a.status_id,
                    GROUPING(m.id, m.name, c.name) AS model_grouping,
                    GROUPING(a.status_id) AS status_grouping,
                    COUNT(*) AS count
             FROM assets a
             JOIN asset_models m ON m.id = a.model_id
             JOIN categories c ON c.id = m.category_id
             GROUP BY GROUPING SETS ((m.id, m.name, c.name), (a.status_id), ())
             ORDER BY count DESC, model_name, status_id",
        )
        .fetch_all(pool)
        .await?;

        let mut total = 0;
        let mut by_model = Vec::new();
        let mut by_status = Vec::new();
        for row in rows {
            match (row.model_grouping, row.status_grouping) {
                (0, _) => by_model.push(ModelBucket {
                    model_id: row.model_id.unwrap_or_default(),
                    model_name: row.model_name.unwrap_or_default(),
                    category_name: row.category_name.unwrap_or_default(),
                    count: row.count,
                }),
                (_, 0) => {
                    if let Some(status_id) = row.status_id {
                        by_status.push(StatusBucket {
                            status_id,
                            count: row.count,
                        });
                    }
                }
                _ => total = row.count,
            }
        }

        Ok(build_stats(total, by_model, by_status))
    }
}
