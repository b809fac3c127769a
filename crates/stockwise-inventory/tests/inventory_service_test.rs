//! Integration tests for the inventory service using in-memory SurrealDB.

use std::collections::HashSet;
use std::sync::Arc;

use stockwise_core::error::StockwiseError;
use stockwise_core::models::session::SessionContext;
use stockwise_core::models::user::UserRole;
use stockwise_db::repository::{SurrealActivityRepository, SurrealProductRepository};
use stockwise_inventory::{InventoryConfig, InventoryService, StockInRequest, StockOutResult};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Service = InventoryService<SurrealProductRepository<Db>, SurrealActivityRepository<Db>>;

async fn database() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    stockwise_db::run_migrations(&db).await.unwrap();
    db
}

fn service_over(db: &Surreal<Db>) -> Service {
    InventoryService::new(
        SurrealProductRepository::new(db.clone()),
        SurrealActivityRepository::new(db.clone()),
        InventoryConfig::default(),
    )
}

async fn setup() -> Service {
    service_over(&database().await)
}

fn owner() -> SessionContext {
    SessionContext {
        session_id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        role: UserRole::User,
        email: "owner@example.com".into(),
    }
}

fn stock(name: &str, quantity: i64) -> StockInRequest {
    StockInRequest {
        product_name: name.into(),
        quantity,
        brand: "Acme".into(),
        manufacturing_date: "2026-01-01".into(),
        expiration_date: "2027-06-30".into(),
        description: None,
    }
}

async fn messages(service: &Service, ctx: &SessionContext) -> Vec<String> {
    service
        .recent_activity(ctx, Some(100))
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.message)
        .collect()
}

// -----------------------------------------------------------------------
// Store
// -----------------------------------------------------------------------

#[tokio::test]
async fn stock_in_assigns_sequential_codes() {
    let service = setup().await;
    let ctx = owner();

    let first = service.stock_in(&ctx, stock("Gauze", 12)).await.unwrap();
    let second = service.stock_in(&ctx, stock("Tape", 4)).await.unwrap();

    assert_eq!(first.item_code, "ITEM-00001");
    assert_eq!(second.item_code, "ITEM-00002");
    assert_eq!(first.owner_id, ctx.user_id);

    assert_eq!(
        messages(&service, &ctx).await,
        vec!["Added 4 units of Tape", "Added 12 units of Gauze"]
    );
}

#[tokio::test]
async fn item_codes_are_never_reused() {
    let service = setup().await;
    let ctx = owner();

    let first = service.stock_in(&ctx, stock("Gauze", 2)).await.unwrap();
    service.remove_all(&ctx, first.id).await.unwrap();
    let next = service.stock_in(&ctx, stock("Gauze", 2)).await.unwrap();

    assert_eq!(next.item_code, "ITEM-00002");
}

#[tokio::test]
async fn invalid_stock_in_writes_nothing() {
    let service = setup().await;
    let ctx = owner();

    let err = service
        .create_product(&ctx, stock("Gauze", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, StockwiseError::Validation { .. }));

    assert!(service.list_products(&ctx).await.unwrap().is_empty());
    assert!(messages(&service, &ctx).await.is_empty());

    // The failed attempt did not consume a code.
    let product = service.create_product(&ctx, stock("Gauze", 1)).await.unwrap();
    assert_eq!(product.item_code, "ITEM-00001");
}

#[tokio::test]
async fn update_quantity_allows_zero_but_not_negative() {
    let service = setup().await;
    let ctx = owner();
    let product = service.stock_in(&ctx, stock("Gauze", 5)).await.unwrap();

    let err = service
        .update_quantity(&ctx, product.id, -1)
        .await
        .unwrap_err();
    assert!(matches!(err, StockwiseError::Validation { .. }));

    let updated = service.update_quantity(&ctx, product.id, 0).await.unwrap();
    assert_eq!(updated.quantity, 0);
    assert_eq!(service.get_product(&ctx, product.id).await.unwrap().quantity, 0);
}

#[tokio::test]
async fn delete_product_reports_missing() {
    let service = setup().await;
    let ctx = owner();
    let product = service.stock_in(&ctx, stock("Gauze", 5)).await.unwrap();

    service.delete_product(&ctx, product.id).await.unwrap();
    let err = service.delete_product(&ctx, product.id).await.unwrap_err();
    assert!(matches!(err, StockwiseError::NotFound { .. }));
}

// -----------------------------------------------------------------------
// Stock-out
// -----------------------------------------------------------------------

#[tokio::test]
async fn stock_out_decrements_then_deletes() {
    let service = setup().await;
    let ctx = owner();
    let product = service.stock_in(&ctx, stock("Gauze", 5)).await.unwrap();

    let result = service.stock_out(&ctx, product.id, 3).await.unwrap();
    assert_eq!(result, StockOutResult::Remaining(2));
    assert_eq!(service.get_product(&ctx, product.id).await.unwrap().quantity, 2);

    let result = service.stock_out(&ctx, product.id, 2).await.unwrap();
    assert_eq!(result, StockOutResult::Deleted);
    let err = service.get_product(&ctx, product.id).await.unwrap_err();
    assert!(matches!(err, StockwiseError::NotFound { .. }));

    assert_eq!(
        messages(&service, &ctx).await,
        vec![
            "Removed all units of Gauze from inventory",
            "Removed 3 units of Gauze",
            "Added 5 units of Gauze",
        ]
    );
}

#[tokio::test]
async fn oversized_stock_out_changes_nothing() {
    let service = setup().await;
    let ctx = owner();
    let product = service.stock_in(&ctx, stock("Gauze", 5)).await.unwrap();

    let err = service.stock_out(&ctx, product.id, 6).await.unwrap_err();
    assert_eq!(err.public_message(), "insufficient stock");

    for amount in [0, -2] {
        let err = service
            .stock_out(&ctx, product.id, amount)
            .await
            .unwrap_err();
        assert!(matches!(err, StockwiseError::Validation { .. }));
    }

    assert_eq!(service.get_product(&ctx, product.id).await.unwrap().quantity, 5);
    assert_eq!(messages(&service, &ctx).await.len(), 1);
}

#[tokio::test]
async fn stock_out_of_missing_product_is_not_found() {
    let service = setup().await;
    let err = service
        .stock_out(&owner(), Uuid::new_v4(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, StockwiseError::NotFound { .. }));
}

#[tokio::test]
async fn remove_all_deletes_and_records() {
    let service = setup().await;
    let ctx = owner();
    let product = service.stock_in(&ctx, stock("Masks", 40)).await.unwrap();

    service.remove_all(&ctx, product.id).await.unwrap();

    assert!(service.list_products(&ctx).await.unwrap().is_empty());
    assert_eq!(
        messages(&service, &ctx).await[0],
        "Removed all units of Masks from inventory"
    );

    let err = service.remove_all(&ctx, product.id).await.unwrap_err();
    assert!(matches!(err, StockwiseError::NotFound { .. }));
}

#[tokio::test]
async fn sequential_stock_outs_conserve_units() {
    let service = setup().await;
    let ctx = owner();
    let product = service.stock_in(&ctx, stock("Gloves", 20)).await.unwrap();

    let mut removed = 0;
    for amount in [1, 4, 7, 3, 9, 2] {
        match service.stock_out(&ctx, product.id, amount).await {
            Ok(_) => removed += amount,
            Err(e) => assert_eq!(e.public_message(), "insufficient stock"),
        }
    }

    assert!(removed <= 20);
    match service.get_product(&ctx, product.id).await {
        Ok(p) => assert_eq!(p.quantity, 20 - removed),
        Err(_) => assert_eq!(removed, 20),
    }
}

// -----------------------------------------------------------------------
// Concurrency
// -----------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_stock_outs_never_oversell() {
    let service = Arc::new(setup().await);
    let ctx = owner();
    let product_id = service.stock_in(&ctx, stock("Gauze", 5)).await.unwrap().id;

    let mut handles = Vec::new();
    for amount in [3, 4] {
        let service = Arc::clone(&service);
        let ctx = ctx.clone();
        handles.push(tokio::spawn(async move {
            (amount, service.stock_out(&ctx, product_id, amount).await)
        }));
    }

    let mut succeeded = Vec::new();
    let mut failed = 0;
    for handle in handles {
        let (amount, result) = handle.await.unwrap();
        match result {
            Ok(_) => succeeded.push(amount),
            Err(e) => {
                assert_eq!(e.public_message(), "insufficient stock");
                failed += 1;
            }
        }
    }

    assert_eq!(succeeded.len(), 1);
    assert_eq!(failed, 1);
    let remaining = service.get_product(&ctx, product_id).await.unwrap().quantity;
    assert_eq!(remaining, 5 - succeeded[0]);
    assert_eq!(messages(&service, &ctx).await.len(), 2);
}

/// Two services share no locks, as with two server processes on one
/// database; the quantity guard in the store has to resolve the race.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stock_outs_from_separate_services_never_oversell() {
    let db = database().await;
    let first = Arc::new(service_over(&db));
    let second = Arc::new(service_over(&db));
    let ctx = owner();

    for round in 0..20 {
        let product_id = first
            .stock_in(&ctx, stock(&format!("Gauze {round}"), 5))
            .await
            .unwrap()
            .id;

        let mut handles = Vec::new();
        for (service, amount) in [(Arc::clone(&first), 3), (Arc::clone(&second), 4)] {
            let ctx = ctx.clone();
            handles.push(tokio::spawn(async move {
                (amount, service.stock_out(&ctx, product_id, amount).await)
            }));
        }

        let mut succeeded = Vec::new();
        for handle in handles {
            let (amount, result) = handle.await.unwrap();
            match result {
                Ok(outcome) => {
                    assert_eq!(outcome, StockOutResult::Remaining(5 - amount));
                    succeeded.push(amount);
                }
                Err(e) => {
                    assert!(
                        matches!(e, StockwiseError::Validation { .. }),
                        "round {round}: got {e:?}"
                    );
                    assert_eq!(e.public_message(), "insufficient stock");
                }
            }
        }

        assert_eq!(succeeded.len(), 1, "round {round}");
        let remaining = second.get_product(&ctx, product_id).await.unwrap().quantity;
        assert_eq!(remaining, 5 - succeeded[0]);
    }

    // One "Added" and one "Removed" entry per round.
    assert_eq!(messages(&first, &ctx).await.len(), 40);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_stock_ins_get_distinct_codes() {
    let service = Arc::new(setup().await);
    let ctx = owner();

    let mut handles = Vec::new();
    for i in 0..10 {
        let service = Arc::clone(&service);
        let ctx = ctx.clone();
        handles.push(tokio::spawn(async move {
            service
                .stock_in(&ctx, stock(&format!("Item {i}"), 1))
                .await
                .unwrap()
                .item_code
        }));
    }

    let mut codes = HashSet::new();
    for handle in handles {
        assert!(codes.insert(handle.await.unwrap()));
    }
    assert_eq!(codes.len(), 10);
    assert!(codes.contains("ITEM-00001"));
    assert!(codes.contains("ITEM-00010"));
}

// -----------------------------------------------------------------------
// Isolation & aggregates
// -----------------------------------------------------------------------

#[tokio::test]
async fn owners_never_see_each_other() {
    let service = setup().await;
    let alice = owner();
    let bob = owner();

    let gauze = service.stock_in(&alice, stock("Gauze", 3)).await.unwrap();
    let tape = service.stock_in(&bob, stock("Tape", 30)).await.unwrap();

    // Codes of different owners may coincide.
    assert_eq!(gauze.item_code, tape.item_code);

    let listed = service.list_products(&alice).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, gauze.id);

    for err in [
        service.get_product(&bob, gauze.id).await.unwrap_err(),
        service.stock_out(&bob, gauze.id, 1).await.unwrap_err(),
        service.update_quantity(&bob, gauze.id, 9).await.unwrap_err(),
        service.remove_all(&bob, gauze.id).await.unwrap_err(),
    ] {
        assert!(matches!(err, StockwiseError::NotFound { .. }), "got {err:?}");
    }

    let stats = service.stats(&bob).await.unwrap();
    assert_eq!(stats.total_items, 1);
    assert_eq!(stats.low_stock_items, 0);

    assert_eq!(messages(&service, &bob).await, vec!["Added 30 units of Tape"]);
    assert_eq!(service.get_product(&alice, gauze.id).await.unwrap().quantity, 3);
}

#[tokio::test]
async fn stats_reflect_today_and_low_stock() {
    let service = setup().await;
    let ctx = owner();

    service.stock_in(&ctx, stock("Gauze", 3)).await.unwrap();
    service.stock_in(&ctx, stock("Tape", 10)).await.unwrap();
    let gloves = service.stock_in(&ctx, stock("Gloves", 50)).await.unwrap();
    service.stock_out(&ctx, gloves.id, 45).await.unwrap();

    let stats = service.stats(&ctx).await.unwrap();
    assert_eq!(stats.total_items, 3);
    assert_eq!(stats.stock_in_today, 3);
    assert_eq!(stats.low_stock_items, 2);
}

#[tokio::test]
async fn recent_activity_defaults_and_clamps() {
    let service = setup().await;
    let ctx = owner();
    for i in 0..12 {
        service
            .stock_in(&ctx, stock(&format!("P{i}"), 1))
            .await
            .unwrap();
    }

    assert_eq!(service.recent_activity(&ctx, None).await.unwrap().len(), 10);
    assert_eq!(service.recent_activity(&ctx, Some(3)).await.unwrap().len(), 3);
    assert_eq!(service.recent_activity(&ctx, Some(0)).await.unwrap().len(), 1);
    assert_eq!(
        service.recent_activity(&ctx, Some(10_000)).await.unwrap().len(),
        12
    );

    let latest = service.recent_activity(&ctx, Some(1)).await.unwrap();
    assert_eq!(latest[0].message, "Added 1 units of P11");
}
