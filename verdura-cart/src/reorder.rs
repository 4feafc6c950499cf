//! Reorder from order history
//!
//! Best-effort by design: the cart is cleared, then every item of the
//! historical order is re-resolved and added back independently. A
//! single unresolvable entity never aborts the loop; only the complete
//! absence of successful additions surfaces as a failure, once, after
//! everything was attempted.

use crate::error::{CartError, CartResult};
use crate::item::NewCartItem;
use crate::notify::ToastSink;
use crate::store::CartStore;
use shared::history::{HistoryItemKey, OrderItemDetail, OrderItems};
use shared::models::{ItemKind, OrderRecord};
use std::collections::HashMap;

/// Outcome of a reorder, one label per attempted sub-operation.
///
/// The aggregate verdict is computed from this summary, not from
/// counters scattered through the loops.
#[derive(Debug, Clone, Default)]
pub struct ReorderSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl ReorderSummary {
    pub fn is_success(&self) -> bool {
        !self.succeeded.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    fn ok(&mut self, label: impl Into<String>) {
        self.succeeded.push(label.into());
    }

    fn err(&mut self, label: impl Into<String>) {
        self.failed.push(label.into());
    }
}

impl CartStore {
    /// Repopulate the cart from a past order.
    ///
    /// Destructive: the current cart is cleared first, and the clear
    /// completes before any add-back begins. Structured `items_detail`
    /// entries are processed sequentially; legacy flat-map entries are
    /// independent and resolve concurrently.
    pub async fn reorder_from_history(
        &self,
        order: &OrderRecord,
        toast: Option<&dyn ToastSink>,
    ) -> CartResult<ReorderSummary> {
        let decoded = OrderItems::decode(order);
        if decoded.is_empty() {
            if let Some(toast) = toast {
                toast.error("This order has no items to reorder");
            }
            return Err(CartError::EmptyOrder);
        }

        self.clear().await;

        let summary = match decoded {
            OrderItems::Detailed(entries) => self.reorder_detailed(entries).await,
            OrderItems::Legacy(entries) => self.reorder_legacy(entries).await,
            OrderItems::Empty => ReorderSummary::default(),
        };

        if summary.is_success() {
            tracing::info!(
                order_id = %order.id,
                succeeded = summary.succeeded.len(),
                failed = summary.failed.len(),
                "reorder finished"
            );
            if let Some(toast) = toast {
                toast.success("Order items added to cart!");
            }
            Ok(summary)
        } else {
            tracing::warn!(order_id = %order.id, attempted = summary.attempted(), "reorder added nothing");
            if let Some(toast) = toast {
                toast.error("Failed to reorder items");
            }
            Err(CartError::NothingReordered {
                attempted: summary.attempted(),
            })
        }
    }

    async fn reorder_detailed(&self, entries: Vec<OrderItemDetail>) -> ReorderSummary {
        let mut summary = ReorderSummary::default();
        for entry in &entries {
            match entry.kind {
                ItemKind::SavedSalad => self.readd_saved_salad(entry, &mut summary).await,
                ItemKind::Ingredient => self.readd_ingredient(entry, &mut summary).await,
                ItemKind::Premade => self.readd_premade_snapshot(entry, &mut summary).await,
            }
        }
        summary
    }

    /// Saved salad: re-fetch; when deleted, reconstruct best-effort from
    /// the breakdown embedded in the order, scaling each ingredient by
    /// the entry quantity. Partial reconstruction still counts.
    async fn readd_saved_salad(&self, entry: &OrderItemDetail, summary: &mut ReorderSummary) {
        match self.user_salads.get(&entry.id).await {
            Ok(salad) => {
                let name = non_empty(&salad.name, "Custom Salad");
                self.add_item(
                    NewCartItem::saved_salad(&entry.id, name, salad.total_price, entry.quantity),
                    None,
                )
                .await;
                summary.ok(&entry.id);
            }
            Err(err) => {
                tracing::warn!(
                    salad_id = %entry.id,
                    error = %err,
                    "saved salad unavailable, reconstructing from embedded breakdown"
                );
                if entry.ingredients.is_empty() {
                    summary.err(&entry.id);
                    return;
                }
                for embedded in &entry.ingredients {
                    let Some(ing_id) = embedded.id.as_deref() else {
                        summary.err(format!("{}:unidentified-ingredient", entry.id));
                        continue;
                    };
                    match self.ingredients.get(ing_id).await {
                        Ok(ingredient) => {
                            let quantity = embedded.quantity * entry.quantity;
                            self.add_item(
                                NewCartItem::ingredient(
                                    ing_id,
                                    ingredient.name.clone(),
                                    ingredient.price,
                                    quantity,
                                ),
                                None,
                            )
                            .await;
                            summary.ok(ing_id);
                        }
                        Err(err) => {
                            tracing::warn!(ingredient_id = %ing_id, error = %err, "skipping ingredient");
                            summary.err(ing_id);
                        }
                    }
                }
            }
        }
    }

    /// Plain ingredient: re-fetch for current name and price; skip on
    /// failure.
    async fn readd_ingredient(&self, entry: &OrderItemDetail, summary: &mut ReorderSummary) {
        match self.ingredients.get(&entry.id).await {
            Ok(ingredient) => {
                self.add_item(
                    NewCartItem::ingredient(
                        &entry.id,
                        ingredient.name.clone(),
                        ingredient.price,
                        entry.quantity,
                    ),
                    None,
                )
                .await;
                summary.ok(&entry.id);
            }
            Err(err) => {
                tracing::warn!(ingredient_id = %entry.id, error = %err, "skipping ingredient");
                summary.err(&entry.id);
            }
        }
    }

    /// Premade salad: re-add from the stored snapshot without touching
    /// the live catalog. The known-invalid customization sentinel
    /// downgrades the entry to its base salad.
    async fn readd_premade_snapshot(&self, entry: &OrderItemDetail, summary: &mut ReorderSummary) {
        let name = entry.display_name().to_string();

        if entry.customizations.is_placeholder() {
            let base_id = entry.original_salad_id.as_deref().unwrap_or(&entry.id);
            tracing::warn!(
                salad_id = %entry.id,
                base_id,
                "customization data lost to the sentinel shape, re-adding base salad"
            );
            self.add_classified(
                NewCartItem::premade(base_id, name, entry.price, entry.quantity),
                false,
                None,
            )
            .await;
            summary.ok(base_id);
            return;
        }

        match entry.customizations.entries() {
            Some(pairs) => {
                let composition: HashMap<String, u32> = pairs.iter().cloned().collect();
                self.add_classified(
                    NewCartItem::premade(&entry.id, name, entry.price, entry.quantity)
                        .with_customization(composition),
                    true,
                    None,
                )
                .await;
            }
            None => {
                self.add_classified(
                    NewCartItem::premade(&entry.id, name, entry.price, entry.quantity),
                    false,
                    None,
                )
                .await;
            }
        }
        summary.ok(&entry.id);
    }

    /// Legacy flat map: entries are independent, so every key resolves
    /// concurrently. Failures stay isolated per key.
    async fn reorder_legacy(&self, entries: Vec<(HistoryItemKey, u32)>) -> ReorderSummary {
        let results = futures::future::join_all(
            entries
                .iter()
                .map(|(key, quantity)| self.readd_legacy_entry(key, *quantity)),
        )
        .await;

        let mut summary = ReorderSummary::default();
        for result in results {
            match result {
                Ok(label) => summary.ok(label),
                Err(label) => summary.err(label),
            }
        }
        summary
    }

    async fn readd_legacy_entry(
        &self,
        key: &HistoryItemKey,
        quantity: u32,
    ) -> Result<String, String> {
        match key {
            HistoryItemKey::SavedSalad { salad_id } => {
                match self.user_salads.get(salad_id).await {
                    Ok(salad) => {
                        let name = non_empty(&salad.name, "Custom Salad");
                        self.add_item(
                            NewCartItem::saved_salad(salad_id, name, salad.total_price, quantity),
                            None,
                        )
                        .await;
                        Ok(salad_id.clone())
                    }
                    Err(err) => {
                        tracing::warn!(salad_id = %salad_id, error = %err, "skipping saved salad");
                        Err(salad_id.clone())
                    }
                }
            }
            // The originating salad id is informational only; the
            // ingredient returns to the cart standalone.
            HistoryItemKey::SaladIngredient { ingredient_id, .. }
            | HistoryItemKey::Ingredient { id: ingredient_id } => {
                match self.ingredients.get(ingredient_id).await {
                    Ok(ingredient) => {
                        self.add_item(
                            NewCartItem::ingredient(
                                ingredient_id,
                                non_empty(&ingredient.name, "Ingredient"),
                                ingredient.price,
                                quantity,
                            ),
                            None,
                        )
                        .await;
                        Ok(ingredient_id.clone())
                    }
                    Err(err) => {
                        tracing::warn!(ingredient_id = %ingredient_id, error = %err, "skipping ingredient");
                        Err(ingredient_id.clone())
                    }
                }
            }
        }
    }
}

fn non_empty(name: &str, fallback: &str) -> String {
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}
