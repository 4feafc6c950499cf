// verdura-cart/tests/order_history.rs
// Normalizer against every historical order shape.

use serde_json::json;
use std::sync::Arc;
use verdura_cart::OrderNormalizer;
use verdura_client::{collections, InMemoryStore};
use shared::models::{ItemKind, OrderRecord};

fn seeded_store() -> Arc<InMemoryStore> {
    let store = InMemoryStore::new();
    store.insert(
        collections::INGREDIENT_CATEGORY,
        json!({"id": "greens", "name": "Greens", "order": 1}),
    );
    store.insert(
        collections::INGREDIENTS,
        json!({"id": "ing1", "name": "Rocket", "price": 1.2, "emoji": "🌿", "category": "greens", "available": true}),
    );
    store.insert(
        collections::INGREDIENTS,
        json!({"id": "ing2", "name": "Feta", "price": 2.0, "available": false}),
    );
    store.insert(
        collections::SALADS,
        json!({
            "id": "cat1",
            "name": "Caesar",
            "price": 8.5,
            "available": true,
            "ingredients": [{"id": "ing1", "quantity": 2}, {"id": "ing2", "quantity": 1}]
        }),
    );
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
    Arc::new(store)
}

fn detailed_order(items_detail: serde_json::Value) -> OrderRecord {
    OrderRecord {
        id: "order1".into(),
        items_detail: Some(items_detail),
        total: 10.0,
        ..Default::default()
    }
}

// The known-invalid sentinel yields exactly one placeholder ingredient
// and never a panic.
#[tokio::test]
async fn sentinel_customizations_become_one_placeholder() {
    let normalizer = OrderNormalizer::new(seeded_store());
    let order = detailed_order(json!([
        {
            "type": "premade",
            "id": "cat1",
            "name": "Caesar (Custom)",
            "quantity": 1,
            "price": 9.0,
            "customized": true,
            "customizations": [{"id": "ingredients", "quantity": null}]
        }
    ]));

    let normalized = normalizer.normalize(&order).await;
    assert_eq!(normalized.items.len(), 1);
    let item = &normalized.items[0];
    assert!(item.customized);
    assert_eq!(item.ingredient_count, 1);
    assert_eq!(item.ingredients[0].name, "Custom Ingredient");
    assert!(!item.ingredients[0].needs_lookup);
}

// Array-of-pairs and object-map customizations normalize the same way;
// unresolved ids are kept and marked, not dropped.
#[tokio::test]
async fn customization_shapes_normalize_uniformly() {
    let normalizer = OrderNormalizer::new(seeded_store());
    let order = detailed_order(json!([
        {
            "type": "premade",
            "id": "cat1",
            "name": "Caesar (Custom)",
            "quantity": 1,
            "price": 9.0,
            "customizations": [{"id": "ing1", "quantity": 3}, {"id": "retired", "quantity": 1}]
        },
        {
            "type": "premade",
            "id": "cat1",
            "name": "Caesar (Custom)",
            "quantity": 1,
            "price": 9.0,
            "customizations": {"ing1": 3}
        }
    ]));

    let normalized = normalizer.normalize(&order).await;
    let first = &normalized.items[0];
    assert_eq!(first.ingredient_count, 2);
    let resolved = first.ingredients.iter().find(|i| i.id == "ing1").unwrap();
    assert_eq!((resolved.name.as_str(), resolved.quantity), ("Rocket", 3));
    let unresolved = first.ingredients.iter().find(|i| i.id == "retired").unwrap();
    assert!(unresolved.needs_lookup);

    let second = &normalized.items[1];
    assert_eq!(second.ingredient_count, 1);
    assert_eq!(second.ingredients[0].name, "Rocket");
}

// Saved-salad entries tolerate all three embedded-ingredient shapes.
#[tokio::test]
async fn saved_salad_embedded_shapes() {
    let normalizer = OrderNormalizer::new(seeded_store());
    let order = detailed_order(json!([
        {
            "type": "saved-salad",
            "id": "s1",
            "name": "Bowl A",
            "quantity": 1,
            "price": 5.0,
            "ingredients": [{"id": "x", "name": "Pumpkin", "quantity": 2, "price": 0.8, "emoji": "🎃"}]
        },
        {
            "type": "saved-salad",
            "id": "s2",
            "name": "Bowl B",
            "quantity": 1,
            "price": 5.0,
            "ingredients": {"ing1": 2}
        },
        {
            "type": "saved-salad",
            "id": "s3",
            "name": "Bowl C",
            "quantity": 1,
            "price": 5.0,
            "ingredients": {"ing1": {"name": "Rocket", "quantity": 4, "price": 1.2}}
        }
    ]));

    let normalized = normalizer.normalize(&order).await;
    assert_eq!(normalized.items.len(), 3);

    let a = &normalized.items[0];
    assert_eq!(a.ingredients[0].name, "Pumpkin");
    assert_eq!(a.ingredients[0].emoji, "🎃");

    let b = &normalized.items[1];
    assert_eq!(b.ingredients[0].name, "Rocket");
    assert_eq!(b.ingredients[0].quantity, 2);

    let c = &normalized.items[2];
    assert_eq!(c.ingredients[0].quantity, 4);
}

// A plain ingredient whose live record is gone falls back to the
// snapshot embedded in the order.
#[tokio::test]
async fn ingredient_falls_back_to_order_snapshot() {
    let normalizer = OrderNormalizer::new(seeded_store());
    let order = detailed_order(json!([
        {"type": "ingredient", "id": "retired1", "name": "Retired Leaf", "quantity": 2, "price": 0.9},
        {"type": "ingredient", "id": "ing1", "quantity": 1, "price": 0.5}
    ]));

    let normalized = normalizer.normalize(&order).await;
    let gone = &normalized.items[0];
    assert_eq!(gone.name, "Retired Leaf");
    assert!((gone.unit_price - 0.9).abs() < 1e-9);

    // And a live record wins over the snapshot.
    let live = &normalized.items[1];
    assert_eq!(live.name, "Rocket");
    assert!((live.unit_price - 1.2).abs() < 1e-9);
    assert_eq!(live.category_name.as_deref(), Some("Greens"));
}

// Standard premade salads get their breakdown in the deferred pass;
// deleted salads get the generic placeholder, never an empty list.
#[tokio::test]
async fn deferred_enrichment_and_placeholder() {
    let normalizer = OrderNormalizer::new(seeded_store());
    let order = detailed_order(json!([
        {"type": "premade", "id": "cat1", "name": "Caesar", "quantity": 1, "price": 8.5},
        {"type": "premade", "id": "deleted", "name": "Old Special", "quantity": 1, "price": 7.0}
    ]));

    let normalized = normalizer.normalize(&order).await;
    let live = &normalized.items[0];
    assert_eq!(live.ingredient_count, 2);
    assert!(live.ingredients.iter().any(|i| i.name == "Rocket"));

    let gone = &normalized.items[1];
    assert_eq!(gone.ingredient_count, 1);
    assert_eq!(gone.ingredients[0].name, "Base ingredients");
}

// Legacy flat map: three key shapes produce three distinct outcomes, and
// `_from_` entries regroup under their salad.
#[tokio::test]
async fn legacy_keys_classify_and_group() {
    let store = seeded_store();
    store.set_auth_user(Some("user1".into()));
    let normalizer = OrderNormalizer::new(store);

    let order = OrderRecord {
        id: "legacy1".into(),
        items: Some(json!({"salad_abc123": 2, "ing1_from_abc123": 1, "ing2": 3})),
        ..Default::default()
    };

    let normalized = normalizer.normalize(&order).await;
    assert_eq!(normalized.items.len(), 3);

    let salad = normalized
        .items
        .iter()
        .find(|i| i.kind == ItemKind::SavedSalad && i.quantity == 2)
        .expect("saved salad line");
    assert_eq!(salad.name, "Weekday Bowl");

    let group = normalized
        .items
        .iter()
        .find(|i| i.kind == ItemKind::SavedSalad && i.quantity == 1)
        .expect("synthetic breakdown group");
    assert_eq!(group.id, "abc123");
    assert_eq!(group.ingredients[0].id, "ing1");
    assert!((group.unit_price - 1.2).abs() < 1e-9);

    let standalone = normalized
        .items
        .iter()
        .find(|i| i.kind == ItemKind::Ingredient)
        .expect("standalone ingredient");
    assert_eq!((standalone.id.as_str(), standalone.quantity), ("ing2", 3));
}

// A garbage order never poisons its siblings.
#[tokio::test]
async fn sibling_orders_are_isolated() {
    let normalizer = OrderNormalizer::new(seeded_store());
    let orders = vec![
        OrderRecord {
            id: "bad".into(),
            items: Some(json!("not even json")),
            ..Default::default()
        },
        detailed_order(json!([
            {"type": "ingredient", "id": "ing1", "quantity": 1, "price": 1.2}
        ])),
    ];

    let normalized = normalizer.normalize_all(&orders).await;
    assert_eq!(normalized.len(), 2);
    assert!(normalized[0].items.is_empty());
    assert_eq!(normalized[1].items.len(), 1);
}
