//! Orders
//!
//! The commerce order as seen by this service, and the repository it is loaded from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use crate::error::{IntentError, Result};

/// Order meta key holding the Stripe payment intent id
pub const INTENT_META_KEY: &str = "_stripe_intent_id";

/// A commerce order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order id
    pub id: String,

    /// Public order key (e.g. `wc_order_...`)
    #[serde(default)]
    pub order_key: String,

    /// Order total in major currency units
    pub total: Decimal,

    /// ISO 4217 currency code, as stored
    pub currency: String,

    /// Order metadata
    #[serde(default)]
    pub meta: HashMap<String, String>,
}

impl Order {
    pub fn new(id: impl Into<String>, total: Decimal, currency: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            order_key: String::new(),
            total,
            currency: currency.into(),
            meta: HashMap::new(),
        }
    }

    pub fn with_order_key(mut self, order_key: impl Into<String>) -> Self {
        self.order_key = order_key.into();
        self
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    pub fn update_meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.meta.insert(key.into(), value.into());
    }

    /// Stored payment intent id, if one was created
    pub fn payment_intent_id(&self) -> Option<&str> {
        self.meta(INTENT_META_KEY)
    }
}

/// Order storage trait
pub trait OrderRepository: Send + Sync {
    /// Get order by id
    fn find_by_id(&self, id: &str) -> Result<Option<Order>>;

    /// Get order by its public order key
    fn find_by_key(&self, order_key: &str) -> Result<Option<Order>>;

    /// Save or update an order
    fn save(&self, order: &Order) -> Result<()>;
}

/// Orders plus the order-key index, guarded together
#[derive(Default)]
struct OrderTable {
    orders: HashMap<String, Order>,
    by_key: HashMap<String, String>,
}

/// In-memory order repository
pub struct MemoryOrderRepository {
    table: RwLock<OrderTable>,
}

impl Default for MemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(OrderTable::default()),
        }
    }

    /// Build a repository holding the given orders
    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Result<Self> {
        let repo = Self::new();
        for order in orders {
            repo.save(&order)?;
        }
        Ok(repo)
    }

    /// Seed from a JSON array of orders
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| IntentError::Storage(format!("{}: {}", path.display(), e)))?;
        let orders: Vec<Order> = serde_json::from_str(&raw)?;

        tracing::info!(count = orders.len(), path = %path.display(), "Loaded orders");
        Self::with_orders(orders)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.table.read().map_err(poisoned)?.orders.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: T) -> IntentError {
    IntentError::Storage("order store lock poisoned".into())
}

impl OrderRepository for MemoryOrderRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<Order>> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.orders.get(id).cloned())
    }

    fn find_by_key(&self, order_key: &str) -> Result<Option<Order>> {
        let table = self.table.read().map_err(poisoned)?;

        Ok(table
            .by_key
            .get(order_key)
            .and_then(|id| table.orders.get(id))
            .cloned())
    }

    fn save(&self, order: &Order) -> Result<()> {
        let mut table = self.table.write().map_err(poisoned)?;

        // Drop the index entry of a key this order no longer carries
        let stale_key = table
            .orders
            .get(&order.id)
            .map(|previous| previous.order_key.clone())
            .filter(|key| !key.is_empty() && *key != order.order_key);
        if let Some(key) = stale_key {
            if table.by_key.get(&key) == Some(&order.id) {
                table.by_key.remove(&key);
            }
        }

        if !order.order_key.is_empty() {
            table.by_key.insert(order.order_key.clone(), order.id.clone());
        }
        table.orders.insert(order.id.clone(), order.clone());

        Ok(())
    }
}
