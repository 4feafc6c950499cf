//! Cart state container
//!
//! Authoritative client-side cart state. Mutations are serialized by the
//! single writer lock; remote detail resolution happens after the slot
//! is already in place and is never allowed to fail an add.

use crate::error::{CartError, CartResult};
use crate::item::{
    same_composition, CartLineItem, NewCartItem, PersistedLineItem, ResolvedDetails,
};
use crate::notify::{ToastSink, NOTIFICATION_WINDOW};
use crate::persist::CartStorage;
use serde_json::{json, Value};
use shared::models::{ItemKind, OrderCreate, OrderRecord, OrderStatus, ORDER_SCHEMA_VERSION};
use shared::util::{format_price, now_millis};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use verdura_client::{
    ClientResult, IngredientService, OrderService, RecordStore, SaladService, UserSaladService,
};

/// The shopping cart.
///
/// Holds line items in memory, mirrors every mutation to the optional
/// storage port, and resolves full records for display through the
/// injected gateway.
pub struct CartStore {
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) ingredients: IngredientService,
    pub(crate) salads: SaladService,
    pub(crate) user_salads: UserSaladService,
    pub(crate) orders: OrderService,
    items: RwLock<Vec<CartLineItem>>,
    storage: Option<Arc<dyn CartStorage>>,
    last_added: RwLock<Option<(Instant, String)>>,
    notification_window: Duration,
}

impl CartStore {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            ingredients: IngredientService::new(store.clone()),
            salads: SaladService::new(store.clone()),
            user_salads: UserSaladService::new(store.clone()),
            orders: OrderService::new(store.clone()),
            store,
            items: RwLock::new(Vec::new()),
            storage: None,
            last_added: RwLock::new(None),
            notification_window: NOTIFICATION_WINDOW,
        }
    }

    /// Attach a persistence backend. Saves happen after every mutation.
    pub fn with_storage(mut self, storage: Arc<dyn CartStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Override the notification window (tests shrink it).
    pub fn with_notification_window(mut self, window: Duration) -> Self {
        self.notification_window = window;
        self
    }

    // ==================== Read surface ====================

    pub async fn items(&self) -> Vec<CartLineItem> {
        self.items.read().await.clone()
    }

    /// Sum of quantities across line items.
    pub async fn item_count(&self) -> u32 {
        self.items.read().await.iter().map(|i| i.quantity).sum()
    }

    /// Sum of quantity × unit price across line items.
    pub async fn subtotal(&self) -> f64 {
        self.items.read().await.iter().map(|i| i.line_total()).sum()
    }

    /// Whether the "added to cart" notification is still inside its
    /// wall-clock window.
    pub async fn notification_visible(&self) -> bool {
        self.last_added
            .read()
            .await
            .as_ref()
            .map(|(at, _)| at.elapsed() < self.notification_window)
            .unwrap_or(false)
    }

    /// The current notification text, while it is visible.
    pub async fn notification_message(&self) -> Option<String> {
        self.last_added
            .read()
            .await
            .as_ref()
            .filter(|(at, _)| at.elapsed() < self.notification_window)
            .map(|(_, message)| message.clone())
    }

    // ==================== Mutations ====================

    /// Add a candidate to the cart.
    ///
    /// A premade candidate whose composition differs from the referenced
    /// catalog recipe is a customization: it always appends a fresh line
    /// item under a synthesized unique id. Anything else merges into the
    /// matching `(id, kind)` slot when one exists.
    ///
    /// Detail resolution runs after the item is in place and is
    /// non-fatal; a failure leaves `resolved` absent and reports to the
    /// toast sink. Returns the id of the slot the candidate landed in.
    pub async fn add_item(
        &self,
        candidate: NewCartItem,
        toast: Option<&dyn ToastSink>,
    ) -> String {
        let customized = self.classify_customization(&candidate).await;
        self.add_classified(candidate, customized, toast).await
    }

    /// Insert a candidate whose customization status is already known.
    /// The reorder engine re-adds premade snapshots through here, without
    /// re-validating them against the live catalog.
    pub(crate) async fn add_classified(
        &self,
        candidate: NewCartItem,
        customized: bool,
        toast: Option<&dyn ToastSink>,
    ) -> String {
        let notification = format!(
            "{} added to cart ({} × {})",
            candidate.name,
            format_price(candidate.unit_price),
            candidate.quantity
        );

        let (stored_id, kind) = if customized {
            let composition = candidate.customization.clone().unwrap_or_default();
            let mut items = self.items.write().await;
            // Timestamp-based ids can collide within one millisecond;
            // bump until the id is actually unique.
            let mut stamp = now_millis();
            let mut custom_id = format!("{}_custom_{}", candidate.id, stamp);
            while items.iter().any(|i| i.id == custom_id) {
                stamp += 1;
                custom_id = format!("{}_custom_{}", candidate.id, stamp);
            }
            items.push(CartLineItem {
                id: custom_id.clone(),
                kind: candidate.kind,
                quantity: candidate.quantity,
                name: candidate.name,
                unit_price: candidate.unit_price,
                customized: true,
                customization: Some(composition.clone()),
                resolved: Some(ResolvedDetails::Custom {
                    original_id: candidate.id,
                    ingredients: composition,
                }),
            });
            drop(items);
            (custom_id, candidate.kind)
        } else {
            let item = CartLineItem {
                id: candidate.id,
                kind: candidate.kind,
                quantity: candidate.quantity,
                name: candidate.name,
                unit_price: candidate.unit_price,
                customized: false,
                customization: None,
                resolved: None,
            };
            let id = self.merge_or_append(item).await;
            (id, candidate.kind)
        };

        *self.last_added.write().await = Some((Instant::now(), notification));
        self.persist().await;

        if !customized {
            self.attach_details(&stored_id, kind, toast).await;
        }
        stored_id
    }

    /// Remove the unique `(id, kind)` slot. No-op when absent.
    pub async fn remove_item(&self, id: &str, kind: ItemKind) {
        self.items
            .write()
            .await
            .retain(|item| !item.occupies_slot(id, kind));
        self.persist().await;
    }

    /// Set a slot's quantity; zero removes the slot. No line item with a
    /// zero quantity ever persists.
    pub async fn update_quantity(&self, id: &str, kind: ItemKind, quantity: u32) {
        if quantity == 0 {
            self.remove_item(id, kind).await;
            return;
        }
        {
            let mut items = self.items.write().await;
            if let Some(item) = items.iter_mut().find(|i| i.occupies_slot(id, kind)) {
                item.quantity = quantity;
            }
        }
        self.persist().await;
    }

    /// Empty the cart. Order history is untouched.
    pub async fn clear(&self) {
        self.items.write().await.clear();
        self.persist().await;
    }

    // ==================== Persistence ====================

    /// Restore the persisted cart, then re-resolve details best-effort.
    /// Returns how many line items came back.
    pub async fn restore(&self) -> CartResult<usize> {
        let Some(storage) = &self.storage else {
            return Ok(0);
        };
        let persisted = storage.load()?;
        let count = persisted.len();
        {
            let mut items = self.items.write().await;
            *items = persisted.into_iter().map(CartLineItem::from).collect();
        }

        let slots: Vec<(String, ItemKind)> = self
            .items
            .read()
            .await
            .iter()
            .filter(|i| !i.customized)
            .map(|i| (i.id.clone(), i.kind))
            .collect();
        let resolutions = futures::future::join_all(
            slots
                .iter()
                .map(|(id, kind)| self.resolve_details(id, *kind)),
        )
        .await;
        let mut items = self.items.write().await;
        for ((id, kind), resolution) in slots.into_iter().zip(resolutions) {
            match resolution {
                Ok(details) => {
                    if let Some(slot) = items.iter_mut().find(|i| i.occupies_slot(&id, kind)) {
                        slot.resolved = Some(details);
                    }
                }
                Err(err) => {
                    tracing::warn!(id = %id, error = %err, "restored item left unresolved");
                }
            }
        }
        Ok(count)
    }

    /// Mirror the current items to storage. Routine saves never fail the
    /// calling mutation; errors are logged and dropped.
    async fn persist(&self) {
        let Some(storage) = &self.storage else { return };
        let snapshot: Vec<PersistedLineItem> = self
            .items
            .read()
            .await
            .iter()
            .map(PersistedLineItem::from)
            .collect();
        if let Err(err) = storage.save(&snapshot) {
            tracing::warn!(error = %err, "cart persistence failed");
        }
    }

    // ==================== Checkout ====================

    /// Submit the cart as a new order and clear it on success.
    ///
    /// Requires a signed-in identity (hard failure). The created record
    /// carries both the structured `items_detail` and the flat `items`
    /// map for backward compatibility, plus the payload schema version.
    pub async fn submit_order(
        &self,
        delivery: bool,
        toast: Option<&dyn ToastSink>,
    ) -> CartResult<OrderRecord> {
        let user_id = self.store.require_auth().map_err(CartError::from)?;

        let items = self.items.read().await.clone();
        if items.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let mut flat: HashMap<String, u32> = HashMap::new();
        let mut detail = Vec::with_capacity(items.len());
        for item in &items {
            *flat.entry(item.id.clone()).or_insert(0) += item.quantity;
            detail.push(detail_entry(item));
        }
        let total: f64 = items.iter().map(|i| i.line_total()).sum();

        let payload = OrderCreate {
            user_id: Some(user_id),
            items: flat,
            items_detail: Value::Array(detail),
            total,
            status: OrderStatus::Pending,
            delivery,
            schema_version: ORDER_SCHEMA_VERSION,
        };

        match self.orders.create(payload).await {
            Ok(order) => {
                self.clear().await;
                if let Some(toast) = toast {
                    toast.success("Order placed successfully!");
                }
                Ok(order)
            }
            Err(err) => {
                tracing::warn!(error = %err, "order submission failed");
                if let Some(toast) = toast {
                    toast.error("Failed to place order. Please try again.");
                }
                Err(err.into())
            }
        }
    }

    // ==================== Resolution ====================

    /// Tie-break: a premade candidate with a composition is customized
    /// iff that composition differs from the catalog recipe by the pure
    /// set-equality rule. When the base salad cannot be fetched, a
    /// non-empty composition is treated as customized.
    async fn classify_customization(&self, candidate: &NewCartItem) -> bool {
        let Some(composition) = &candidate.customization else {
            return false;
        };
        if candidate.kind != ItemKind::Premade {
            return false;
        }
        match self.salads.get(&candidate.id).await {
            Ok(salad) => !same_composition(&salad.ingredient_map(), composition),
            Err(err) => {
                tracing::warn!(
                    salad_id = %candidate.id,
                    error = %err,
                    "base salad unavailable for tie-break"
                );
                !composition.is_empty()
            }
        }
    }

    /// Fetch the full record behind a slot. Saved-salad ids try the
    /// user-owned collection first and fall back to the public catalog;
    /// the two reuse one identifier space.
    pub(crate) async fn resolve_details(
        &self,
        id: &str,
        kind: ItemKind,
    ) -> ClientResult<ResolvedDetails> {
        match kind {
            ItemKind::Ingredient => Ok(ResolvedDetails::Ingredient(self.ingredients.get(id).await?)),
            ItemKind::SavedSalad => match self.user_salads.get(id).await {
                Ok(salad) => Ok(ResolvedDetails::SavedSalad(salad)),
                Err(_) => Ok(ResolvedDetails::CatalogSalad(self.salads.get(id).await?)),
            },
            ItemKind::Premade => Ok(ResolvedDetails::CatalogSalad(self.salads.get(id).await?)),
        }
    }

    /// Resolve and attach details for a slot that was just added. The
    /// slot is re-located after the await; if it was removed while the
    /// fetch was in flight the result is discarded rather than written
    /// into stale state.
    async fn attach_details(&self, id: &str, kind: ItemKind, toast: Option<&dyn ToastSink>) {
        match self.resolve_details(id, kind).await {
            Ok(details) => {
                let mut items = self.items.write().await;
                match items.iter_mut().find(|i| i.occupies_slot(id, kind)) {
                    Some(slot) => slot.resolved = Some(details),
                    None => {
                        tracing::debug!(id, "slot gone before resolution landed, discarding");
                    }
                }
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "failed to resolve item details");
                if let Some(toast) = toast {
                    toast.error("Failed to load item details");
                }
            }
        }
    }

    async fn merge_or_append(&self, item: CartLineItem) -> String {
        let mut items = self.items.write().await;
        if let Some(existing) = items
            .iter_mut()
            .find(|i| !i.customized && i.occupies_slot(&item.id, item.kind))
        {
            existing.quantity += item.quantity;
            return existing.id.clone();
        }
        let id = item.id.clone();
        items.push(item);
        id
    }
}

fn detail_entry(item: &CartLineItem) -> Value {
    let mut entry = json!({
        "type": item.kind.as_wire(),
        "id": item.id,
        "name": item.name,
        "quantity": item.quantity,
        "price": item.unit_price,
        "customized": item.customized,
    });
    if let Some(composition) = &item.customization {
        entry["customizations"] = json!(composition);
    }
    if item.customized {
        entry["originalSaladId"] = json!(item.original_id());
    }
    // Embed the recipe so the order survives deletion of the saved salad.
    if let Some(ResolvedDetails::SavedSalad(salad)) = &item.resolved {
        entry["ingredients"] = json!(salad.ingredients);
    }
    entry
}
