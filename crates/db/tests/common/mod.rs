//! Shared fixtures for repository integration tests.

#![allow(dead_code)]

use itam_db::models::asset::{Asset, CreateAsset};
use itam_db::models::asset_model::{AssetModel, CreateAssetModel};
use itam_db::models::category::{Category, CreateCategory};
use itam_db::models::manufacturer::{CreateManufacturer, Manufacturer};
use itam_db::repositories::{AssetModelRepo, AssetRepo, CategoryRepo, ManufacturerRepo};
use sqlx::PgPool;

pub async fn manufacturer(pool: &PgPool, name: &str) -> Manufacturer {
    ManufacturerRepo::create(
        pool,
        &CreateManufacturer {
            name: name.to_string(),
            contact_email: None,
            contact_phone: None,
            contact_address: None,
            is_active: None,
        },
    )
    .await
    .unwrap()
}

pub async fn category(pool: &PgPool, name: &str) -> Category {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            name: name.to_string(),
            description: None,
            image_path: None,
            is_active: None,
        },
    )
    .await
    .unwrap()
}

pub fn new_model(name: &str, manufacturer_id: i64, category_id: i64) -> CreateAssetModel {
    CreateAssetModel {
        name: name.to_string(),
        model_number: format!("{name}-MN"),
        description: None,
        manufacturer_id,
        category_id,
        image_path: None,
        is_active: None,
        notes: None,
    }
}

pub async fn model(pool: &PgPool, name: &str, manufacturer_id: i64, category_id: i64) -> AssetModel {
    AssetModelRepo::create(pool, &new_model(name, manufacturer_id, category_id))
        .await
        .unwrap()
}

pub fn new_asset(model_id: i64, serial: &str) -> CreateAsset {
    CreateAsset {
        model_id,
        serial_number: serial.to_string(),
        purchase_date: None,
        warranty_expiry: None,
        cost: None,
        status: None,
        assigned_to: None,
        assigned_user_id: None,
        notes: None,
        legacy_type: None,
        legacy_manufacturer: None,
    }
}

pub async fn asset(pool: &PgPool, model_id: i64, serial: &str) -> Asset {
    AssetRepo::create(pool, &new_asset(model_id, serial))
        .await
        .unwrap()
}

/// Overwrite a legacy column directly, the way rows carried over from the
/// flat schema look. `column` is `legacy_type` or `legacy_manufacturer`.
pub async fn import_legacy(pool: &PgPool, asset_id: &str, column: &str, value: &str) {
    sqlx::query(&format!("UPDATE assets SET {column} = $2 WHERE id = $1"))
        .bind(asset_id)
        .bind(value)
        .execute(pool)
        .await
        .unwrap();
}

/// Dell / Laptop / XPS-15, the canonical fixture chain.
pub async fn dell_laptop(pool: &PgPool) -> (Manufacturer, Category, AssetModel) {
    let dell = manufacturer(pool, "Dell").await;
    let laptop = category(pool, "Laptop").await;
    let xps = model(pool, "XPS-15", dell.id, laptop.id).await;
    (dell, laptop, xps)
}
