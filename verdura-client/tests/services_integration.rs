// verdura-client/tests/services_integration.rs
// Typed services over the in-memory record store.

use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use verdura_client::{
    collections, ClientError, IngredientService, InMemoryStore, OrderService, SaladService,
    UserSaladService,
};
use shared::models::{OrderCreate, OrderStatus, ORDER_SCHEMA_VERSION};

fn store() -> Arc<InMemoryStore> {
    let store = InMemoryStore::new();
    store.insert(
        collections::INGREDIENTS,
        json!({"id": "ing1", "name": "Rocket", "price": 1.2, "category": "greens", "available": true}),
    );
    store.insert(
        collections::INGREDIENTS,
        json!({"id": "ing2", "name": "Bacon", "price": 1.9, "category": "protein", "available": true}),
    );
    store.insert(
        collections::INGREDIENTS,
        json!({"id": "ing3", "name": "Feta", "price": 2.0, "category": "greens", "available": false}),
    );
    Arc::new(store)
}

#[tokio::test]
async fn availability_filter_and_category_filter() {
    let ingredients = IngredientService::new(store());

    let available = ingredients.list_available().await.unwrap();
    assert_eq!(available.len(), 2);

    let all = ingredients.list_all().await.unwrap();
    assert_eq!(all.len(), 3);

    let greens = ingredients.list_by_category("greens").await.unwrap();
    assert_eq!(greens.len(), 1);
    assert_eq!(greens[0].name, "Rocket");
}

#[tokio::test]
async fn missing_salad_is_typed_not_found() {
    let salads = SaladService::new(store());
    let err = salads.get("ghost").await.unwrap_err();
    match err {
        ClientError::NotFound { collection, id } => {
            assert_eq!(collection, collections::SALADS);
            assert_eq!(id, "ghost");
        }
        other => panic!("expected NotFound, got {other}"),
    }
}

#[tokio::test]
async fn order_listing_is_owner_scoped_and_newest_first() {
    let store = store();
    store.set_auth_user(Some("user1".into()));
    store.insert(
        collections::ORDERS,
        json!({"id": "o1", "user_id": "user1", "total": 5.0, "created": "2025-01-01T10:00:00Z"}),
    );
    store.insert(
        collections::ORDERS,
        json!({"id": "o2", "user_id": "user1", "total": 6.0, "created": "2025-03-01T10:00:00Z"}),
    );
    store.insert(
        collections::ORDERS,
        json!({"id": "o3", "user_id": "someone-else", "total": 7.0}),
    );

    let orders = OrderService::new(store);
    let mine = orders.list_mine().await.unwrap();
    let ids: Vec<&str> = mine.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["o2", "o1"]);
}

#[tokio::test]
async fn guest_checkout_drops_owner_field() {
    let orders = OrderService::new(store());
    let created = orders
        .create(OrderCreate {
            user_id: Some("stale-session".into()),
            items: HashMap::from([("ing1".to_string(), 1)]),
            items_detail: json!([]),
            total: 1.2,
            status: OrderStatus::Pending,
            delivery: false,
            schema_version: ORDER_SCHEMA_VERSION,
        })
        .await
        .unwrap();
    assert!(created.user_id.is_none());
    assert_eq!(created.schema_version, Some(ORDER_SCHEMA_VERSION));
}

#[tokio::test]
async fn saved_salads_are_owner_scoped() {
    let store = store();
    store.insert(
        collections::USER_SALADS,
        json!({"id": "s1", "user_id": "user1", "name": "Mine", "total_price": 4.0}),
    );
    store.insert(
        collections::USER_SALADS,
        json!({"id": "s2", "user_id": "user2", "name": "Theirs", "total_price": 4.0}),
    );
    store.set_auth_user(Some("user1".into()));

    let salads = UserSaladService::new(store);
    let mine = salads.list_mine().await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "Mine");
}
