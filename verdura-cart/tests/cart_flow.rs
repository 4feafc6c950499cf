// verdura-cart/tests/cart_flow.rs
// Cart store end to end: persistence, reorder, checkout.

use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use verdura_cart::{CartError, CartStorage, CartStore, JsonCartFile, NewCartItem, ToastSink};
use verdura_client::{collections, InMemoryStore};
use shared::models::{ItemKind, OrderRecord, ORDER_SCHEMA_VERSION};

#[derive(Default)]
struct RecordingToast {
    messages: Mutex<Vec<(bool, String)>>,
}

impl RecordingToast {
    fn successes(&self) -> usize {
        self.messages.lock().unwrap().iter().filter(|(ok, _)| *ok).count()
    }

    fn errors(&self) -> usize {
        self.messages.lock().unwrap().iter().filter(|(ok, _)| !*ok).count()
    }
}

impl ToastSink for RecordingToast {
    fn success(&self, message: &str) {
        self.messages.lock().unwrap().push((true, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push((false, message.to_string()));
    }
}

fn seeded_store() -> Arc<InMemoryStore> {
    let store = InMemoryStore::new();
    store.insert(
        collections::INGREDIENTS,
        json!({"id": "ing1", "name": "Rocket", "price": 1.2, "emoji": "🌿", "available": true}),
    );
    store.insert(
        collections::INGREDIENTS,
        json!({"id": "ing2", "name": "Feta", "price": 2.0, "available": true}),
    );
    store.insert(
        collections::USER_SALADS,
        json!({
            "id": "live1",
            "user_id": "user1",
            "name": "My Green Bowl",
            "ingredients": {"ing1": 2},
            "total_price": 6.5
        }),
    );
    store.insert(
        collections::SALADS,
        json!({
            "id": "cat1",
            "name": "Caesar",
            "price": 8.5,
            "available": true,
            "ingredients": [{"id": "ing1", "quantity": 2}]
        }),
    );
    Arc::new(store)
}

fn order_with_detail(items_detail: serde_json::Value) -> OrderRecord {
    OrderRecord {
        id: "order1".into(),
        items_detail: Some(items_detail),
        ..Default::default()
    }
}

// Serialize, wipe, restore: every persisted field survives, resolution
// does not.
#[tokio::test]
async fn persistence_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(JsonCartFile::new(dir.path()));

    let cart = CartStore::new(seeded_store()).with_storage(storage.clone());
    cart.add_item(NewCartItem::ingredient("ing1", "Rocket", 1.2, 2), None)
        .await;
    cart.add_item(
        NewCartItem::premade("cat1", "Caesar (Custom)", 9.0, 1)
            .with_customization(HashMap::from([("ing1".to_string(), 3)])),
        None,
    )
    .await;

    let before = storage.load().unwrap();
    assert_eq!(before.len(), 2);
    let custom = before.iter().find(|i| i.customized).unwrap();
    assert_eq!(
        custom.customization,
        Some(HashMap::from([("ing1".to_string(), 3)]))
    );

    // Restore into a cart backed by an empty record store: the persisted
    // fields come back verbatim and nothing is resolved.
    let fresh = CartStore::new(Arc::new(InMemoryStore::new())).with_storage(storage.clone());
    let restored = fresh.restore().await.unwrap();
    assert_eq!(restored, 2);

    let after: Vec<_> = fresh.items().await;
    assert!(after.iter().all(|i| i.resolved.is_none()));
    let reserialized: Vec<verdura_cart::PersistedLineItem> =
        after.iter().map(Into::into).collect();
    assert_eq!(reserialized, before);
}

// One resolvable saved salad plus one deleted salad with an embedded
// breakdown: the reorder still succeeds.
#[tokio::test]
async fn reorder_survives_deleted_salad() {
    let store = seeded_store();
    store.set_auth_user(Some("user1".into()));
    let cart = CartStore::new(store.clone());
    let toast = RecordingToast::default();

    let order = order_with_detail(json!([
        {"type": "saved-salad", "id": "live1", "name": "My Green Bowl", "quantity": 1, "price": 6.5},
        {
            "type": "saved-salad",
            "id": "deleted9",
            "name": "Gone Bowl",
            "quantity": 2,
            "price": 5.0,
            "ingredients": {"ing1": 2, "ghost": 1}
        }
    ]));

    let summary = cart.reorder_from_history(&order, Some(&toast)).await.unwrap();
    assert!(summary.is_success());
    // live1 plus the reconstructed ing1; the ghost ingredient is the only
    // casualty.
    assert_eq!(summary.succeeded.len(), 2);
    assert_eq!(summary.failed, vec!["ghost".to_string()]);
    assert_eq!(toast.successes(), 1);

    let items = cart.items().await;
    assert_eq!(items.len(), 2);
    let salad = items
        .iter()
        .find(|i| i.kind == ItemKind::SavedSalad)
        .unwrap();
    assert_eq!(salad.id, "live1");
    let ingredient = items
        .iter()
        .find(|i| i.kind == ItemKind::Ingredient)
        .unwrap();
    // Embedded quantity 2 scaled by entry quantity 2.
    assert_eq!(ingredient.quantity, 4);
}

#[tokio::test]
async fn reorder_clears_existing_cart_first() {
    let cart = CartStore::new(seeded_store());
    cart.add_item(NewCartItem::ingredient("ing2", "Feta", 2.0, 5), None)
        .await;

    let order = order_with_detail(json!([
        {"type": "ingredient", "id": "ing1", "quantity": 1, "price": 1.2}
    ]));
    cart.reorder_from_history(&order, None).await.unwrap();

    let items = cart.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "ing1");
}

#[tokio::test]
async fn reorder_total_failure_is_one_aggregate_error() {
    let cart = CartStore::new(Arc::new(InMemoryStore::new()));
    let toast = RecordingToast::default();

    let order = order_with_detail(json!([
        {"type": "ingredient", "id": "ghost1", "quantity": 1},
        {"type": "ingredient", "id": "ghost2", "quantity": 2}
    ]));

    let err = cart
        .reorder_from_history(&order, Some(&toast))
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::NothingReordered { attempted: 2 }));
    assert!(cart.items().await.is_empty());
    assert_eq!(toast.errors(), 1);
}

#[tokio::test]
async fn reorder_rejects_empty_order() {
    let cart = CartStore::new(seeded_store());
    let err = cart
        .reorder_from_history(&OrderRecord::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::EmptyOrder));
}

// Legacy flat map: three key shapes, three classification outcomes,
// resolved concurrently.
#[tokio::test]
async fn reorder_legacy_key_classification() {
    let store = seeded_store();
    store.set_auth_user(Some("user1".into()));
    store.insert(
        collections::USER_SALADS,
        json!({
            "id": "abc123",
            "user_id": "user1",
            "name": "Weekday Bowl",
            "ingredients": {"ing1": 1},
            "total_price": 4.2
        }),
    );
    let cart = CartStore::new(store);

    let order = OrderRecord {
        id: "legacy1".into(),
        items: Some(json!({"salad_abc123": 2, "ing1_from_abc123": 1, "ing2": 3})),
        ..Default::default()
    };
    let summary = cart.reorder_from_history(&order, None).await.unwrap();
    assert_eq!(summary.succeeded.len(), 3);
    assert!(summary.failed.is_empty());

    let items = cart.items().await;
    let salad = items
        .iter()
        .find(|i| i.kind == ItemKind::SavedSalad)
        .unwrap();
    assert_eq!((salad.id.as_str(), salad.quantity), ("abc123", 2));
    // The `_from_` ingredient lands standalone, alongside the plain one.
    let quantities: HashMap<&str, u32> = items
        .iter()
        .filter(|i| i.kind == ItemKind::Ingredient)
        .map(|i| (i.id.as_str(), i.quantity))
        .collect();
    assert_eq!(quantities, HashMap::from([("ing1", 1), ("ing2", 3)]));
}

#[tokio::test]
async fn checkout_requires_identity() {
    let cart = CartStore::new(seeded_store());
    cart.add_item(NewCartItem::ingredient("ing1", "Rocket", 1.2, 1), None)
        .await;
    let err = cart.submit_order(false, None).await.unwrap_err();
    assert!(matches!(
        err,
        CartError::Client(verdura_client::ClientError::Unauthorized)
    ));
    // The cart survives a failed checkout.
    assert_eq!(cart.item_count().await, 1);
}

#[tokio::test]
async fn checkout_writes_versioned_payload_and_clears() {
    let store = seeded_store();
    store.set_auth_user(Some("user1".into()));
    let cart = CartStore::new(store.clone());
    let toast = RecordingToast::default();

    cart.add_item(NewCartItem::ingredient("ing1", "Rocket", 1.2, 2), None)
        .await;
    cart.add_item(NewCartItem::premade("cat1", "Caesar", 8.5, 1), None)
        .await;

    let order = cart.submit_order(true, Some(&toast)).await.unwrap();
    assert_eq!(order.user_id.as_deref(), Some("user1"));
    assert_eq!(order.schema_version, Some(ORDER_SCHEMA_VERSION));
    assert!(order.delivery);
    assert!((order.total - (1.2 * 2.0 + 8.5)).abs() < 1e-9);

    // Both representations land on the record.
    let detail = order.items_detail.as_ref().unwrap().as_array().unwrap();
    assert_eq!(detail.len(), 2);
    let flat = order.items.as_ref().unwrap().as_object().unwrap();
    assert_eq!(flat["ing1"], 2);

    assert!(cart.items().await.is_empty());
    assert_eq!(toast.successes(), 1);

    let err = cart.submit_order(false, None).await.unwrap_err();
    assert!(matches!(err, CartError::EmptyCart));
}
