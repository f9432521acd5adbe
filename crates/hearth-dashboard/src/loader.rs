//! The fan-out loader behind the main screen.

use crate::{DashboardError, DashboardResult};
use hearth_api::{ApiResult, RemoteApi};
use hearth_membership::MembershipCache;
use hearth_models::{Balance, Expense, House, Payment, ShoppingItem};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// One row of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityEntry {
    Expense(Expense),
    Payment(Payment),
}

/// Everything the main screen renders in one load.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub house: House,
    pub balances: Vec<Balance>,
    pub shopping_items: Vec<ShoppingItem>,
    pub expenses: Vec<Expense>,
    pub payments: Vec<Payment>,
    pub recent_activity: Vec<ActivityEntry>,
}

/// Build the recent-activity feed: the first 3 expenses and first 2
/// payments as returned by the server, concatenated and reversed.
///
/// This is an approximation of recency that leans on the server returning
/// each list newest-first, NOT a merge-sort by timestamp. Kept as shipped;
/// a true chronological interleave is a pending product question.
fn recent_activity(expenses: &[Expense], payments: &[Payment]) -> Vec<ActivityEntry> {
    let mut entries: Vec<ActivityEntry> = expenses
        .iter()
        .take(3)
        .cloned()
        .map(ActivityEntry::Expense)
        .chain(payments.iter().take(2).cloned().map(ActivityEntry::Payment))
        .collect();
    entries.reverse();
    entries
}

fn section_or_empty<T>(section: &str, result: ApiResult<Vec<T>>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(section, error = %e, "Dashboard section failed, rendering it empty");
            Vec::new()
        }
    }
}

/// Loads the dashboard for a house with five concurrent fetches, never
/// aborting early on a single failure.
///
/// Per-resource policy: a failed house-detail fetch falls back to the
/// basic record the load started from, and a failed list renders empty.
/// Overlapping loads are resolved by a generation counter: the retained
/// snapshot only ever reflects the latest issued request, and a response
/// arriving for a superseded request is not applied.
pub struct DashboardLoader {
    api: Arc<dyn RemoteApi>,
    membership: Arc<MembershipCache>,
    snapshot: Mutex<Option<DashboardData>>,
    load_generation: AtomicU64,
    items_generation: AtomicU64,
}

impl DashboardLoader {
    pub fn new(api: Arc<dyn RemoteApi>, membership: Arc<MembershipCache>) -> Self {
        Self {
            api,
            membership,
            snapshot: Mutex::new(None),
            load_generation: AtomicU64::new(0),
            items_generation: AtomicU64::new(0),
        }
    }

    /// The last retained load, if any.
    pub fn snapshot(&self) -> Option<DashboardData> {
        self.snapshot.lock().unwrap().clone()
    }

    /// Load the dashboard for the membership cache's current house.
    pub async fn load_current(&self) -> DashboardResult<DashboardData> {
        let house = self
            .membership
            .current_house()
            .ok_or(DashboardError::NoCurrentHouse)?;
        Ok(self.load(house).await)
    }

    /// Load the dashboard for a house, starting from its known basic record.
    pub async fn load(&self, house: House) -> DashboardData {
        let generation = self.load_generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(house_id = %house.id, generation, "Loading dashboard");

        let (detail, balances, shopping_items, expenses, payments) = tokio::join!(
            self.api.get_house_details(&house.id),
            self.api.get_balances(&house.id),
            self.api.get_shopping_items(&house.id),
            self.api.get_expenses(&house.id),
            self.api.get_payments(&house.id),
        );

        let house = match detail {
            Ok(fresh) => fresh,
            Err(e) => {
                warn!(house_id = %house.id, error = %e, "House detail fetch failed, using known record");
                house
            }
        };
        let balances = section_or_empty("balances", balances);
        let shopping_items = section_or_empty("shopping_items", shopping_items);
        let expenses = section_or_empty("expenses", expenses);
        let payments = section_or_empty("payments", payments);

        let data = DashboardData {
            recent_activity: recent_activity(&expenses, &payments),
            house,
            balances,
            shopping_items,
            expenses,
            payments,
        };

        if self.load_generation.load(Ordering::SeqCst) == generation {
            info!(house_id = %data.house.id, "Dashboard loaded");
            *self.snapshot.lock().unwrap() = Some(data.clone());
        } else {
            debug!(generation, "Discarding superseded dashboard load");
        }
        data
    }

    /// Refresh only the shopping list.
    ///
    /// Rapid consecutive refreshes overlap; the same generation rule
    /// applies, so the retained snapshot ends up with the latest issued
    /// request's answer even when responses land out of order. A failed
    /// fetch reads as an empty list.
    pub async fn reload_shopping_items(&self, house_id: &str) -> Vec<ShoppingItem> {
        let generation = self.items_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let items = section_or_empty("shopping_items", self.api.get_shopping_items(house_id).await);

        if self.items_generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding superseded shopping-list refresh");
            return items;
        }

        let mut snapshot = self.snapshot.lock().unwrap();
        if let Some(data) = snapshot.as_mut() {
            if data.house.id == house_id {
                data.shopping_items = items.clone();
            }
        }
        items
    }
}
