//! Integration tests for the asset ledger: tag allocation, uniqueness,
//! listing, partial updates, status changes and maintenance history.

mod common;

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use itam_core::asset_tag::parse_asset_tag;
use itam_core::error::CoreError;
use itam_core::maintenance::validate_entry;
use itam_core::status::AssetStatus;
use itam_db::models::asset::{AssetListParams, UpdateAsset};
use itam_db::repositories::{AssetRepo, MaintenanceRepo};
use itam_db::DbError;
use sqlx::PgPool;

use common::{asset, dell_laptop, new_asset};

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_defaults_status_and_generates_tag(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    let mut input = new_asset(xps.id, "SN1");
    input.cost = Some(999.99);

    let created = AssetRepo::create(&pool, &input).await.unwrap();

    assert_eq!(created.status, "In Stock");
    assert_eq!(created.status_id, AssetStatus::InStock.id());
    assert_eq!(created.id, "A1000");
    assert_eq!(created.model_name, "XPS-15");
    assert_eq!(created.manufacturer_name, "Dell");
    assert_eq!(created.category_name, "Laptop");
    assert_eq!(created.cost, Some(999.99));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sequential_tags_strictly_increase(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    let mut previous = None;
    for i in 0..5 {
        let created = asset(&pool, xps.id, &format!("SN-{i}")).await;
        let value = parse_asset_tag(&created.id).unwrap();
        if let Some(prev) = previous {
            assert!(value > prev, "{value} should follow {prev}");
        }
        previous = Some(value);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_creates_never_share_a_tag(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;

    let mut handles = Vec::new();
    for i in 0..10 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            AssetRepo::create(&pool, &new_asset(xps.id, &format!("CONC-{i}")))
                .await
                .map(|a| a.id)
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_serial_is_a_conflict(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    asset(&pool, xps.id, "SN1").await;

    let result = AssetRepo::create(&pool, &new_asset(xps.id, "SN1")).await;
    assert_matches!(result, Err(DbError::Core(CoreError::Conflict(msg))) if msg.contains("SN1"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_create_does_not_consume_a_tag(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    asset(&pool, xps.id, "SN1").await;

    let dup = AssetRepo::create(&pool, &new_asset(xps.id, "SN1")).await;
    assert!(dup.is_err());
    let missing_model = AssetRepo::create(&pool, &new_asset(9999, "SN2")).await;
    assert_matches!(missing_model, Err(DbError::Core(CoreError::Validation(_))));

    let next = asset(&pool, xps.id, "SN3").await;
    assert_eq!(next.id, "A1001");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_invalid_fields(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;

    let mut negative = new_asset(xps.id, "SN1");
    negative.cost = Some(-5.0);
    assert_matches!(
        AssetRepo::create(&pool, &negative).await,
        Err(DbError::Core(CoreError::Validation(_)))
    );

    let mut bad_status = new_asset(xps.id, "SN1");
    bad_status.status = Some("Lost".to_string());
    assert_matches!(
        AssetRepo::create(&pool, &bad_status).await,
        Err(DbError::Core(CoreError::Validation(msg))) if msg.contains("Lost")
    );

    assert_matches!(
        AssetRepo::create(&pool, &new_asset(xps.id, "   ")).await,
        Err(DbError::Core(CoreError::Validation(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn legacy_fields_must_mirror_the_model(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;

    let mut mismatched = new_asset(xps.id, "SN1");
    mismatched.legacy_type = Some("Tablet".to_string());
    assert_matches!(
        AssetRepo::create(&pool, &mismatched).await,
        Err(DbError::Core(CoreError::Validation(msg))) if msg.contains("legacy_type")
    );

    let mut wrong_vendor = new_asset(xps.id, "SN1");
    wrong_vendor.legacy_manufacturer = Some("HP".to_string());
    assert_matches!(
        AssetRepo::create(&pool, &wrong_vendor).await,
        Err(DbError::Core(CoreError::Validation(msg))) if msg.contains("legacy_manufacturer")
    );

    let mut matching = new_asset(xps.id, "SN1");
    matching.legacy_type = Some(" LAPTOP ".to_string());
    matching.legacy_manufacturer = Some("dell".to_string());
    let created = AssetRepo::create(&pool, &matching).await.unwrap();
    assert_eq!(created.legacy_type.as_deref(), Some("Laptop"));
    assert_eq!(created.legacy_manufacturer.as_deref(), Some("Dell"));

    let update = UpdateAsset {
        legacy_type: Some("Desktop".to_string()),
        ..Default::default()
    };
    assert_matches!(
        AssetRepo::update(&pool, &created.id, &update).await,
        Err(DbError::Core(CoreError::Validation(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn moving_to_another_model_repoints_legacy_fields(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    let lenovo = common::manufacturer(&pool, "Lenovo").await;
    let desktops = common::category(&pool, "Desktop").await;
    let tower = common::model(&pool, "ThinkCentre", lenovo.id, desktops.id).await;

    let mut input = new_asset(xps.id, "SN1");
    input.legacy_type = Some("Laptop".to_string());
    let created = AssetRepo::create(&pool, &input).await.unwrap();

    let update = UpdateAsset {
        model_id: Some(tower.id),
        ..Default::default()
    };
    let moved = AssetRepo::update(&pool, &created.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(moved.category_name, "Desktop");
    assert_eq!(moved.legacy_type.as_deref(), Some("Desktop"));
    assert_eq!(moved.legacy_manufacturer, None);

    let unknown = UpdateAsset {
        model_id: Some(9999),
        ..Default::default()
    };
    assert_matches!(
        AssetRepo::update(&pool, &created.id, &unknown).await,
        Err(DbError::Core(CoreError::Validation(_)))
    );
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_orders_newest_first_and_counts(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    for i in 0..3 {
        asset(&pool, xps.id, &format!("SN{i}")).await;
    }

    let page = AssetRepo::list(&pool, &AssetListParams::default()).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 50);
    let ids: Vec<&str> = page.items.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["A1002", "A1001", "A1000"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_search_matches_tag_model_and_serial(pool: PgPool) {
    let (dell, laptop, xps) = dell_laptop(&pool).await;
    let other = common::model(&pool, "Latitude", dell.id, laptop.id).await;
    asset(&pool, xps.id, "ABC-123").await;
    asset(&pool, other.id, "ZZZ-999").await;

    let by_model = AssetListParams {
        search: Some("xps".to_string()),
        ..Default::default()
    };
    assert_eq!(AssetRepo::list(&pool, &by_model).await.unwrap().total, 1);

    let by_serial = AssetListParams {
        search: Some("zzz".to_string()),
        ..Default::default()
    };
    let page = AssetRepo::list(&pool, &by_serial).await.unwrap();
    assert_eq!(page.items[0].serial_number, "ZZZ-999");

    let by_tag = AssetListParams {
        search: Some("a1000".to_string()),
        ..Default::default()
    };
    assert_eq!(AssetRepo::list(&pool, &by_tag).await.unwrap().total, 1);

    let wildcard = AssetListParams {
        search: Some("%".to_string()),
        ..Default::default()
    };
    assert_eq!(AssetRepo::list(&pool, &wildcard).await.unwrap().total, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_status_and_category(pool: PgPool) {
    let (dell, _, xps) = dell_laptop(&pool).await;
    let switches = common::category(&pool, "Network Switch").await;
    let sw = common::model(&pool, "N3048", dell.id, switches.id).await;

    let first = asset(&pool, xps.id, "SN1").await;
    asset(&pool, sw.id, "SN2").await;
    AssetRepo::update_status(&pool, &first.id, AssetStatus::InUse)
        .await
        .unwrap();

    let in_use = AssetListParams {
        status: Some("InUse".to_string()),
        ..Default::default()
    };
    let page = AssetRepo::list(&pool, &in_use).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, first.id);

    let by_display = AssetListParams {
        status: Some("in stock".to_string()),
        ..Default::default()
    };
    assert_eq!(AssetRepo::list(&pool, &by_display).await.unwrap().total, 1);

    let by_category = AssetListParams {
        category_id: Some(switches.id),
        ..Default::default()
    };
    assert_eq!(AssetRepo::list(&pool, &by_category).await.unwrap().total, 1);

    let by_type = AssetListParams {
        type_name: Some("laptop".to_string()),
        ..Default::default()
    };
    assert_eq!(AssetRepo::list(&pool, &by_type).await.unwrap().total, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_status_filter_yields_empty_page(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    asset(&pool, xps.id, "SN1").await;

    let params = AssetListParams {
        status: Some("Lost".to_string()),
        ..Default::default()
    };
    let page = AssetRepo::list(&pool, &params).await.unwrap();
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_paginates_and_clamps_page_size(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    for i in 0..5 {
        asset(&pool, xps.id, &format!("SN{i}")).await;
    }

    let params = AssetListParams {
        page: Some(2),
        page_size: Some(2),
        ..Default::default()
    };
    let page = AssetRepo::list(&pool, &params).await.unwrap();
    assert_eq!(page.total, 5);
    let ids: Vec<&str> = page.items.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["A1002", "A1001"]);

    let huge = AssetListParams {
        page_size: Some(10_000),
        ..Default::default()
    };
    assert_eq!(AssetRepo::list(&pool, &huge).await.unwrap().page_size, 100);
}

// ---------------------------------------------------------------------------
// Update / status / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_is_partial(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    let mut input = new_asset(xps.id, "SN1");
    input.cost = Some(100.0);
    input.notes = Some("spare".to_string());
    let created = AssetRepo::create(&pool, &input).await.unwrap();

    let update = UpdateAsset {
        assigned_to: Some("Ava Harper".to_string()),
        status: Some("In Use".to_string()),
        ..Default::default()
    };
    let updated = AssetRepo::update(&pool, &created.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.assigned_to.as_deref(), Some("Ava Harper"));
    assert_eq!(updated.status, "In Use");
    assert_eq!(updated.cost, Some(100.0));
    assert_eq!(updated.notes.as_deref(), Some("spare"));
    assert_eq!(updated.serial_number, "SN1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_text_on_update_clears_the_field(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    let mut input = new_asset(xps.id, "SN1");
    input.assigned_to = Some("Ava Harper".to_string());
    input.notes = Some("spare".to_string());
    let created = AssetRepo::create(&pool, &input).await.unwrap();

    let unassign = UpdateAsset {
        assigned_to: Some("   ".to_string()),
        ..Default::default()
    };
    let updated = AssetRepo::update(&pool, &created.id, &unassign)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.assigned_to, None);
    assert_eq!(updated.notes.as_deref(), Some("spare"));

    let stored: (Option<String>,) =
        sqlx::query_as("SELECT assigned_to FROM assets WHERE id = $1")
            .bind(&created.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored.0, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_missing_asset_returns_none(pool: PgPool) {
    let result = AssetRepo::update(&pool, "A9999", &UpdateAsset::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_to_taken_serial_is_a_conflict(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    asset(&pool, xps.id, "SN1").await;
    let second = asset(&pool, xps.id, "SN2").await;

    let update = UpdateAsset {
        serial_number: Some("SN1".to_string()),
        ..Default::default()
    };
    assert_matches!(
        AssetRepo::update(&pool, &second.id, &update).await,
        Err(DbError::Core(CoreError::Conflict(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn any_status_may_follow_any_other(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    let created = asset(&pool, xps.id, "SN1").await;

    for status in [
        AssetStatus::Retired,
        AssetStatus::InUse,
        AssetStatus::UnderMaintenance,
        AssetStatus::InStock,
    ] {
        let updated = AssetRepo::update_status(&pool, &created.id, status)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, status.name());
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_asset_and_history(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    let created = asset(&pool, xps.id, "SN1").await;
    let entry = validate_entry("Battery", "Replaced battery", None, Utc::now()).unwrap();
    MaintenanceRepo::append(&pool, &created.id, &entry, None)
        .await
        .unwrap();

    assert!(AssetRepo::delete(&pool, &created.id).await.unwrap());
    assert!(AssetRepo::find_by_id(&pool, &created.id).await.unwrap().is_none());
    assert!(MaintenanceRepo::list_for_asset(&pool, &created.id)
        .await
        .unwrap()
        .is_empty());
    assert!(!AssetRepo::delete(&pool, &created.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Maintenance history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn maintenance_append_grows_history_in_order(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    let created = asset(&pool, xps.id, "SN1").await;

    let explicit = Utc.with_ymd_and_hms(2023, 6, 1, 8, 0, 0).unwrap();
    let titles = ["First", "Second", "Third"];
    for (i, title) in titles.iter().enumerate() {
        let before = AssetRepo::find_detail(&pool, &created.id)
            .await
            .unwrap()
            .unwrap()
            .maintenance_history
            .len();
        // An older explicit date must not reorder the history.
        let performed_at = (i == 2).then_some(explicit);
        let entry = validate_entry(title, "work", performed_at, Utc::now()).unwrap();
        MaintenanceRepo::append(&pool, &created.id, &entry, Some(7))
            .await
            .unwrap()
            .unwrap();

        let detail = AssetRepo::find_detail(&pool, &created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.maintenance_history.len(), before + 1);
    }

    let history = MaintenanceRepo::list_for_asset(&pool, &created.id)
        .await
        .unwrap();
    let got: Vec<&str> = history.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(got, titles);
    assert_eq!(history[2].performed_at, explicit);
    assert_eq!(history[0].performed_by, Some(7));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn maintenance_on_missing_asset_returns_none(pool: PgPool) {
    let entry = validate_entry("Fan", "Cleaned", None, Utc::now()).unwrap();
    let result = MaintenanceRepo::append(&pool, "A4242", &entry, None)
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Recent activity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn recent_activity_is_most_recently_updated_first(pool: PgPool) {
    let (_, _, xps) = dell_laptop(&pool).await;
    let first = asset(&pool, xps.id, "SN1").await;
    asset(&pool, xps.id, "SN2").await;
    asset(&pool, xps.id, "SN3").await;

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    AssetRepo::update_status(&pool, &first.id, AssetStatus::InUse)
        .await
        .unwrap();

    let recent = AssetRepo::recent_activity(&pool, 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].asset_id, first.id);
    assert_eq!(recent[0].status, AssetStatus::InUse);
    assert_eq!(recent[0].date, Utc::now().date_naive());
}
