//! Order normalizer
//!
//! Read-only reconstruction of historical orders into the uniform
//! display model, tolerating every order-record generation the store has
//! accumulated. Every resolution step is individually fault-tolerant:
//! the worst outcome for any single line is a generic placeholder, and
//! neither sibling lines nor sibling orders are ever affected.

mod display;

pub use display::{DisplayIngredient, DisplayItem, NormalizedOrder};

use shared::history::{CustomizationPayload, EmbeddedIngredient, HistoryItemKey, OrderItemDetail, OrderItems};
use shared::models::{Ingredient, IngredientCategory, ItemKind, OrderRecord, UserSalad};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use verdura_client::{
    CategoryService, IngredientService, RecordStore, SaladService, UserSaladService,
};

/// Converts raw order records into [`NormalizedOrder`]s.
pub struct OrderNormalizer {
    store: Arc<dyn RecordStore>,
    ingredients: IngredientService,
    categories: CategoryService,
    salads: SaladService,
    user_salads: UserSaladService,
}

/// Reference data fetched once per normalization run.
struct LookupTables {
    ingredients: HashMap<String, Ingredient>,
    categories: HashMap<String, IngredientCategory>,
    saved_salads: HashMap<String, UserSalad>,
}

impl OrderNormalizer {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            ingredients: IngredientService::new(store.clone()),
            categories: CategoryService::new(store.clone()),
            salads: SaladService::new(store.clone()),
            user_salads: UserSaladService::new(store.clone()),
            store,
        }
    }

    /// Normalize a single order.
    pub async fn normalize(&self, order: &OrderRecord) -> NormalizedOrder {
        let tables = self.load_tables().await;
        self.normalize_with(order, &tables).await
    }

    /// Normalize a batch of orders against one set of lookup tables.
    pub async fn normalize_all(&self, orders: &[OrderRecord]) -> Vec<NormalizedOrder> {
        let tables = self.load_tables().await;
        let mut normalized = Vec::with_capacity(orders.len());
        for order in orders {
            normalized.push(self.normalize_with(order, &tables).await);
        }
        normalized
    }

    /// Each table degrades to empty independently; display then falls
    /// back to the snapshots embedded in the order records themselves.
    async fn load_tables(&self) -> LookupTables {
        let ingredients = match self.ingredients.list_all().await {
            Ok(list) => list.into_iter().map(|i| (i.id.clone(), i)).collect(),
            Err(err) => {
                tracing::warn!(error = %err, "ingredient table unavailable");
                HashMap::new()
            }
        };
        let categories = self
            .categories
            .list()
            .await
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        let saved_salads = if self.store.auth_user_id().is_some() {
            match self.user_salads.list_mine().await {
                Ok(list) => list.into_iter().map(|s| (s.id.clone(), s)).collect(),
                Err(err) => {
                    tracing::warn!(error = %err, "saved-salad table unavailable");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };
        LookupTables {
            ingredients,
            categories,
            saved_salads,
        }
    }

    async fn normalize_with(&self, order: &OrderRecord, tables: &LookupTables) -> NormalizedOrder {
        let items = match OrderItems::decode(order) {
            OrderItems::Detailed(entries) => {
                let mut items: Vec<DisplayItem> = entries
                    .iter()
                    .map(|entry| self.display_detail(entry, tables))
                    .collect();
                self.enrich_standard_premades(&mut items, tables).await;
                items
            }
            OrderItems::Legacy(entries) => display_legacy(&entries, tables),
            OrderItems::Empty => Vec::new(),
        };

        NormalizedOrder {
            id: order.id.clone(),
            status: order.status,
            total: order.total,
            delivery: order.delivery,
            created: order.created.clone(),
            items,
        }
    }

    fn display_detail(&self, entry: &OrderItemDetail, tables: &LookupTables) -> DisplayItem {
        match entry.kind {
            ItemKind::Premade if entry.is_flagged_custom() => customized_premade(entry, tables),
            ItemKind::SavedSalad => saved_salad_detail(entry, tables),
            ItemKind::Premade => {
                // Standard catalog salad; the record does not embed its
                // recipe, so the breakdown arrives in the deferred pass.
                let name = entry.name.clone().unwrap_or_else(|| "Salad".to_string());
                DisplayItem::salad(
                    &entry.id,
                    ItemKind::Premade,
                    name,
                    entry.quantity,
                    entry.price,
                    Vec::new(),
                )
            }
            ItemKind::Ingredient => ingredient_detail(entry, tables),
        }
    }

    /// Deferred enrichment: standard premade salads still missing a
    /// breakdown get theirs from the live catalog, batch-fetched per
    /// unique salad id. A deleted salad, or one with no resolvable
    /// ingredients, gets the generic base placeholder so the UI never
    /// renders an empty list.
    async fn enrich_standard_premades(&self, items: &mut [DisplayItem], tables: &LookupTables) {
        let pending: HashSet<String> = items
            .iter()
            .filter(|i| i.kind == ItemKind::Premade && !i.customized && i.ingredients.is_empty())
            .map(|i| i.id.clone())
            .collect();
        if pending.is_empty() {
            return;
        }

        let fetched = futures::future::join_all(
            pending.iter().map(|id| async move {
                (id.clone(), self.salads.get(id).await)
            }),
        )
        .await;
        let mut recipes = HashMap::new();
        for (id, result) in fetched {
            match result {
                Ok(salad) => {
                    recipes.insert(id, salad);
                }
                Err(err) => {
                    tracing::warn!(salad_id = %id, error = %err, "salad gone, breakdown falls back to placeholder");
                }
            }
        }

        for item in items
            .iter_mut()
            .filter(|i| i.kind == ItemKind::Premade && !i.customized && i.ingredients.is_empty())
        {
            let breakdown: Vec<DisplayIngredient> = recipes
                .get(&item.id)
                .map(|salad| {
                    salad
                        .ingredients
                        .iter()
                        .map(|slot| resolve_ingredient(&slot.id, slot.quantity, tables))
                        .collect()
                })
                .unwrap_or_default();
            item.ingredients = if breakdown.is_empty() {
                vec![DisplayIngredient::base_placeholder(&item.id)]
            } else {
                breakdown
            };
            item.ingredient_count = item.ingredients.len();
        }
    }
}

/// Resolve one ingredient id against the lookup table, keeping
/// unresolved ids as `needs_lookup` entries.
fn resolve_ingredient(id: &str, quantity: u32, tables: &LookupTables) -> DisplayIngredient {
    match tables.ingredients.get(id) {
        Some(ingredient) => DisplayIngredient {
            id: id.to_string(),
            name: if ingredient.name.is_empty() {
                "Unknown".to_string()
            } else {
                ingredient.name.clone()
            },
            emoji: ingredient.emoji_or_default().to_string(),
            quantity,
            unit_price: ingredient.price,
            needs_lookup: false,
        },
        None => DisplayIngredient::unresolved(id, quantity),
    }
}

fn customized_premade(entry: &OrderItemDetail, tables: &LookupTables) -> DisplayItem {
    let breakdown = match &entry.customizations {
        // The known-invalid sentinel: the real composition is lost.
        // Substitute the single generic placeholder; do not parse further.
        CustomizationPayload::Placeholder => {
            tracing::warn!(item_id = %entry.id, "invalid customizations shape, using placeholder");
            vec![DisplayIngredient::custom_placeholder(&entry.id)]
        }
        CustomizationPayload::Entries(pairs) => pairs
            .iter()
            .map(|(id, quantity)| resolve_ingredient(id, *quantity, tables))
            .collect(),
        CustomizationPayload::None => Vec::new(),
    };

    let name = entry
        .name
        .clone()
        .unwrap_or_else(|| "Customized Salad".to_string());
    let mut item = DisplayItem::salad(
        &entry.id,
        ItemKind::Premade,
        name,
        entry.quantity,
        entry.price,
        breakdown,
    );
    item.customized = true;
    item.original_salad_id = Some(
        entry
            .original_salad_id
            .clone()
            .unwrap_or_else(|| entry.id.clone()),
    );
    item
}

fn saved_salad_detail(entry: &OrderItemDetail, tables: &LookupTables) -> DisplayItem {
    let breakdown = entry
        .ingredients
        .iter()
        .map(|embedded| embedded_to_display(embedded, tables))
        .collect();
    let name = entry
        .name
        .clone()
        .unwrap_or_else(|| "Custom Salad".to_string());
    DisplayItem::salad(
        &entry.id,
        ItemKind::SavedSalad,
        name,
        entry.quantity,
        entry.price,
        breakdown,
    )
}

/// Turn one embedded-breakdown entry into a display ingredient,
/// preferring the values the order itself recorded.
fn embedded_to_display(embedded: &EmbeddedIngredient, tables: &LookupTables) -> DisplayIngredient {
    let id = embedded.id.clone().unwrap_or_default();
    if let Some(name) = &embedded.name {
        return DisplayIngredient {
            id,
            name: name.clone(),
            emoji: embedded
                .emoji
                .clone()
                .unwrap_or_else(|| shared::models::INGREDIENT_EMOJI.to_string()),
            quantity: embedded.quantity,
            unit_price: embedded.price.unwrap_or(0.0),
            needs_lookup: false,
        };
    }
    resolve_ingredient(&id, embedded.quantity, tables)
}

fn ingredient_detail(entry: &OrderItemDetail, tables: &LookupTables) -> DisplayItem {
    let live = tables.ingredients.get(&entry.id);

    // Live record first; the snapshot embedded in the order covers
    // ingredients that have since been deleted.
    let name = live
        .map(|i| i.name.clone())
        .filter(|n| !n.is_empty())
        .or_else(|| entry.name.clone())
        .unwrap_or_else(|| "Unknown Ingredient".to_string());
    let unit_price = live.map(|i| i.price).unwrap_or(entry.price);
    let emoji = live
        .map(|i| i.emoji_or_default().to_string())
        .unwrap_or_else(|| shared::models::INGREDIENT_EMOJI.to_string());
    let category_name = live
        .and_then(|i| i.category.as_ref())
        .and_then(|category_id| tables.categories.get(category_id))
        .map(|c| c.name.clone());

    DisplayItem {
        id: entry.id.clone(),
        kind: ItemKind::Ingredient,
        name,
        emoji,
        quantity: entry.quantity,
        unit_price,
        ingredients: Vec::new(),
        ingredient_count: 0,
        customized: false,
        original_salad_id: None,
        category_name,
    }
}

/// Legacy flat map: classify each key, resolve standalone entries, and
/// regroup `_from_` entries into synthetic per-salad breakdowns.
fn display_legacy(
    entries: &[(HistoryItemKey, u32)],
    tables: &LookupTables,
) -> Vec<DisplayItem> {
    let mut items = Vec::new();
    // BTreeMap keeps synthetic group order deterministic.
    let mut groups: BTreeMap<String, Vec<DisplayIngredient>> = BTreeMap::new();

    for (key, quantity) in entries {
        match key {
            HistoryItemKey::SavedSalad { salad_id } => {
                let Some(salad) = tables.saved_salads.get(salad_id) else {
                    tracing::warn!(salad_id = %salad_id, "saved salad not resolvable, skipping line");
                    continue;
                };
                let breakdown = salad
                    .ingredients
                    .iter()
                    .map(|(id, qty)| resolve_ingredient(id, *qty, tables))
                    .collect();
                let name = if salad.name.is_empty() {
                    "Custom Salad".to_string()
                } else {
                    salad.name.clone()
                };
                items.push(DisplayItem::salad(
                    salad_id,
                    ItemKind::SavedSalad,
                    name,
                    *quantity,
                    salad.total_price,
                    breakdown,
                ));
            }
            HistoryItemKey::SaladIngredient {
                ingredient_id,
                salad_id,
            } => {
                let Some(ingredient) = tables.ingredients.get(ingredient_id) else {
                    tracing::warn!(ingredient_id = %ingredient_id, "breakdown ingredient not resolvable, skipping");
                    continue;
                };
                groups.entry(salad_id.clone()).or_default().push(DisplayIngredient {
                    id: ingredient_id.clone(),
                    name: ingredient.name.clone(),
                    emoji: ingredient.emoji_or_default().to_string(),
                    quantity: *quantity,
                    unit_price: ingredient.price,
                    needs_lookup: false,
                });
            }
            HistoryItemKey::Ingredient { id } => {
                let Some(ingredient) = tables.ingredients.get(id) else {
                    tracing::warn!(ingredient_id = %id, "ingredient not resolvable, skipping line");
                    continue;
                };
                let category_name = ingredient
                    .category
                    .as_ref()
                    .and_then(|category_id| tables.categories.get(category_id))
                    .map(|c| c.name.clone());
                items.push(DisplayItem {
                    id: id.clone(),
                    kind: ItemKind::Ingredient,
                    name: ingredient.name.clone(),
                    emoji: ingredient.emoji_or_default().to_string(),
                    quantity: *quantity,
                    unit_price: ingredient.price,
                    ingredients: Vec::new(),
                    ingredient_count: 0,
                    customized: false,
                    original_salad_id: None,
                    category_name,
                });
            }
        }
    }

    for (salad_id, members) in groups {
        let total: f64 = members
            .iter()
            .map(|m| m.unit_price * f64::from(m.quantity))
            .sum();
        let name = tables
            .saved_salads
            .get(&salad_id)
            .map(|s| s.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Custom Salad".to_string());
        items.push(DisplayItem::salad(
            salad_id,
            ItemKind::SavedSalad,
            name,
            1,
            total,
            members,
        ));
    }

    items
}
