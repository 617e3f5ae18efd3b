// Copyright (c) 2025 Stockroom Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Integration tests for searching and selling against a stock file.

use chrono::NaiveDate;
use tempfile::tempdir;

use stockroom_lib::catalog::{Catalog, Product};
use stockroom_lib::config::StockroomConfig;
use stockroom_lib::error::{InventoryError, SaleError};
use stockroom_lib::ledger::ProductUpdate;
use stockroom_lib::sale::{checkout, Cart};
use stockroom_lib::storage::JsonStockFile;

fn rice_catalog() -> Catalog {
    let expiry = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
    Catalog::from_products(
        vec![
            Product::new("P001", "Rice 5kg", 1500, 50, expiry, "Agro Ltd").unwrap(),
            Product::new("P002", "Rice 10kg", 2800, 0, expiry, "Agro Ltd").unwrap(),
        ],
        &StockroomConfig::default(),
    )
    .unwrap()
}

fn found_ids(catalog: &Catalog, term: &str) -> Vec<String> {
    catalog
        .search(term)
        .into_iter()
        .map(|p| p.id().to_string())
        .collect()
}

#[test]
fn test_rice_scenario() {
    let mut catalog = rice_catalog();

    let before = found_ids(&catalog, "ric");
    assert_eq!(before, vec!["P002", "P001"]);

    assert_eq!(catalog.sell("P001", 50), Ok(0));
    assert_eq!(found_ids(&catalog, "ric"), before);

    assert_eq!(
        catalog.sell("P001", 1),
        Err(InventoryError::InsufficientStock {
            product_id: "P001".to_string(),
            available: 0,
            requested: 1,
        })
    );
    assert_eq!(catalog.get("P001").unwrap().quantity(), 0);
}

#[test]
fn test_search_is_case_insensitive() {
    let catalog = rice_catalog();
    let lower = found_ids(&catalog, "rice");
    assert_eq!(found_ids(&catalog, "RICE"), lower);
    assert_eq!(found_ids(&catalog, "Rice"), lower);
    assert!(found_ids(&catalog, "wheat").is_empty());
    assert!(found_ids(&catalog, "").is_empty());
}

#[test]
fn test_rebuild_twice_gives_identical_results() {
    let mut catalog = rice_catalog();
    let before = found_ids(&catalog, "r");
    catalog.rebuild_index();
    catalog.rebuild_index();
    assert_eq!(found_ids(&catalog, "r"), before);
}

#[test]
fn test_rejected_updates_leave_product_unchanged() {
    let mut catalog = rice_catalog();
    let original = catalog.get("P001").unwrap().clone();

    assert!(catalog.apply_update("P001", ProductUpdate::SetQuantity(-1)).is_err());
    assert!(catalog.apply_update("P001", ProductUpdate::SetPrice(-500)).is_err());
    assert!(catalog.apply_update("P001", ProductUpdate::SetName(String::new())).is_err());

    assert_eq!(catalog.get("P001").unwrap(), &original);
    assert_eq!(found_ids(&catalog, "rice 5"), vec!["P001"]);
}

#[test]
fn test_checkout_persists_to_stock_file() {
    let dir = tempdir().unwrap();
    let store = JsonStockFile::new(dir.path().join("stock.json"));
    let mut catalog = rice_catalog();
    store.save(catalog.products()).unwrap();

    let mut cart = Cart::new();
    cart.add(&catalog, "P001", 20).unwrap();
    let record = checkout(&mut catalog, &cart, "Ama", "Kofi", &store).unwrap();
    assert_eq!(record.total, 20 * 1500);
    assert_eq!(record.customer, "Ama");

    let reloaded = Catalog::from_products(store.load().unwrap(), &StockroomConfig::default()).unwrap();
    assert_eq!(reloaded.get("P001").unwrap().quantity(), 30);
    assert_eq!(found_ids(&reloaded, "rice"), vec!["P002", "P001"]);
}

#[test]
fn test_checkout_of_out_of_stock_product_is_rejected() {
    let dir = tempdir().unwrap();
    let store = JsonStockFile::new(dir.path().join("stock.json"));
    let mut catalog = rice_catalog();

    let mut cart = Cart::new();
    assert!(cart.add(&catalog, "P002", 1).is_err());

    cart.add(&catalog, "P001", 50).unwrap();
    catalog.sell("P001", 1).unwrap();
    assert!(matches!(
        checkout(&mut catalog, &cart, "Ama", "Kofi", &store),
        Err(SaleError::Rejected(InventoryError::InsufficientStock { .. }))
    ));
    assert!(!store.path().exists());
}
