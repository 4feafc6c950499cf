//! A storefront session against the in-memory record store: browse,
//! customize, check out, then reorder from the resulting history.
//!
//! Run with: `cargo run -p verdura-cart --example storefront_session`

use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use verdura_cart::{CartStore, NewCartItem, OrderNormalizer, ToastSink};
use verdura_client::{collections, InMemoryStore};

struct StdoutToast;

impl ToastSink for StdoutToast {
    fn success(&self, message: &str) {
        println!("[toast] {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("[toast!] {message}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let store = Arc::new(InMemoryStore::new().with_auth_user("demo-user"));
    store.insert(
        collections::INGREDIENTS,
        json!({"id": "rocket", "name": "Rocket", "price": 1.2, "emoji": "🌿", "available": true}),
    );
    store.insert(
        collections::INGREDIENTS,
        json!({"id": "feta", "name": "Feta", "price": 2.0, "emoji": "🧀", "available": true}),
    );
    store.insert(
        collections::SALADS,
        json!({
            "id": "caesar",
            "name": "Caesar",
            "price": 8.5,
            "available": true,
            "ingredients": [{"id": "rocket", "quantity": 2}, {"id": "feta", "quantity": 1}]
        }),
    );

    let cart = CartStore::new(store.clone());
    let toast = StdoutToast;

    cart.add_item(NewCartItem::ingredient("rocket", "Rocket", 1.2, 2), Some(&toast))
        .await;
    cart.add_item(
        NewCartItem::premade("caesar", "Caesar (Custom)", 9.0, 1)
            .with_customization(HashMap::from([
                ("rocket".to_string(), 3),
                ("feta".to_string(), 1),
            ])),
        Some(&toast),
    )
    .await;
    println!(
        "cart: {} items, subtotal {}",
        cart.item_count().await,
        shared::util::format_price(cart.subtotal().await)
    );

    let order = cart.submit_order(true, Some(&toast)).await?;
    println!("order {} placed, total {:.2}", order.id, order.total);

    let normalizer = OrderNormalizer::new(store.clone());
    let normalized = normalizer.normalize(&order).await;
    for item in &normalized.items {
        println!(
            "  {} {} ×{} ({} ingredients)",
            item.emoji, item.name, item.quantity, item.ingredient_count
        );
    }

    cart.reorder_from_history(&order, Some(&toast)).await?;
    println!("reordered: {} items back in the cart", cart.item_count().await);
    Ok(())
}
