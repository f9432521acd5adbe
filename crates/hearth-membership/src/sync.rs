//! Cache-vs-server reconciliation for the membership set.

use crate::{MembershipResult, MembershipSet};
use hearth_api::{validate_invite_code, RemoteApi};
use hearth_auth::{AuthState, SessionManager};
use hearth_models::{House, HousePatch, NewHouse};
use hearth_storage::CacheManager;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Trust level of the in-memory membership set.
///
/// `Stale` data came from the local cache and passed the membership trust
/// gate; it may be shown but a refresh is already on its way. `Fresh` data
/// came from the server in this process's lifetime. Local mutations on
/// stale data keep it stale; only a completed refresh promotes to fresh.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncState {
    /// Nothing loaded (or the cache failed the trust gate).
    Empty,
    /// Cache-derived data, pending server confirmation.
    Stale(MembershipSet),
    /// Server-confirmed data.
    Fresh(MembershipSet),
}

impl SyncState {
    fn set(&self) -> Option<&MembershipSet> {
        match self {
            SyncState::Empty => None,
            SyncState::Stale(set) | SyncState::Fresh(set) => Some(set),
        }
    }

    fn is_fresh(&self) -> bool {
        matches!(self, SyncState::Fresh(_))
    }

    /// Apply a mutation to the underlying set, preserving the trust level.
    /// An empty state materializes a stale empty set first.
    fn mutate<R>(&mut self, f: impl FnOnce(&mut MembershipSet) -> R) -> R {
        let (mut set, fresh) = match std::mem::replace(self, SyncState::Empty) {
            SyncState::Empty => (MembershipSet::new(), false),
            SyncState::Stale(set) => (set, false),
            SyncState::Fresh(set) => (set, true),
        };
        let out = f(&mut set);
        *self = if fresh {
            SyncState::Fresh(set)
        } else {
            SyncState::Stale(set)
        };
        out
    }
}

/// Synchronizes the house list and current-house selection between the
/// persistent cache and the server.
///
/// All server calls happen outside the state lock; a generation counter
/// makes overlapping refreshes last-writer-wins, with superseded responses
/// discarded instead of applied out of order.
pub struct MembershipCache {
    cache: Arc<CacheManager>,
    api: Arc<dyn RemoteApi>,
    state: Mutex<SyncState>,
    refresh_generation: AtomicU64,
}

impl MembershipCache {
    pub fn new(cache: Arc<CacheManager>, api: Arc<dyn RemoteApi>) -> Self {
        Self {
            cache,
            api,
            state: Mutex::new(SyncState::Empty),
            refresh_generation: AtomicU64::new(0),
        }
    }

    /// A point-in-time copy of the membership set. Empty state reads as an
    /// empty set.
    pub fn snapshot(&self) -> MembershipSet {
        self.state
            .lock()
            .unwrap()
            .set()
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the in-memory set is server-confirmed.
    pub fn is_fresh(&self) -> bool {
        self.state.lock().unwrap().is_fresh()
    }

    /// The current house, if one is selected.
    pub fn current_house(&self) -> Option<House> {
        self.state
            .lock()
            .unwrap()
            .set()
            .and_then(|s| s.current_house().cloned())
    }

    /// Load cached house data through the trust gate, then refresh from the
    /// server.
    ///
    /// Cached records are adopted (as stale) only when every house,
    /// including the cached current selection, carries the user's own
    /// membership record. A cache written by an older client without that
    /// field is ignored wholesale rather than partially trusted. The server
    /// refresh runs unconditionally either way; its failure leaves whatever
    /// the gate admitted in place.
    pub async fn check_house_status(&self) -> MembershipResult<()> {
        let cached_houses = self.cache.get_houses()?;
        let cached_current = self.cache.get_current_house()?;

        match cached_houses {
            Some(houses) => {
                let gate_passed = houses.iter().all(House::has_membership)
                    && cached_current.as_ref().map_or(true, House::has_membership);
                if gate_passed {
                    debug!(count = houses.len(), "Adopting cached house data as stale");
                    let set = MembershipSet::from_parts(houses, cached_current);
                    *self.state.lock().unwrap() = SyncState::Stale(set);
                } else {
                    warn!("Cached house data is missing membership records, ignoring it");
                }
            }
            None => debug!("No cached house data"),
        }

        self.refresh_houses().await
    }

    /// Fetch the house list from the server and commit it.
    ///
    /// The previous current selection survives only if it is still in the
    /// fetched list; a vanished house deselects rather than silently
    /// falling back to another one. 401/403/404 mean "no houses", not
    /// failure. If another refresh started while this one was in flight,
    /// the response is discarded and the newer refresh wins.
    pub async fn refresh_houses(&self) -> MembershipResult<()> {
        let generation = self.refresh_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let result = self.api.get_houses().await;

        if self.refresh_generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding superseded house refresh");
            return Ok(());
        }

        let houses = match result {
            Ok(houses) => houses,
            Err(e) if e.means_empty_house_list() => {
                debug!(error = %e, "Treating house-list fetch error as empty list");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!(count = houses.len(), "Refreshed house list");
        let set = {
            let mut state = self.state.lock().unwrap();
            let candidate = state.set().and_then(|s| s.current_house().cloned());
            let set = MembershipSet::from_parts(houses, candidate);
            *state = SyncState::Fresh(set.clone());
            set
        };
        self.persist(&set)?;
        Ok(())
    }

    /// Create a house and make it the current one.
    pub async fn create_house(&self, req: &NewHouse) -> MembershipResult<House> {
        let house = self.api.create_house(req).await?;
        info!(house_id = %house.id, "Created house");
        self.commit_as_current(house.clone())?;
        Ok(house)
    }

    /// Join a house by invite code and make it the current one.
    ///
    /// The code is format-checked locally before any request goes out.
    pub async fn join_house(&self, invite_code: &str) -> MembershipResult<House> {
        validate_invite_code(invite_code)?;
        let house = self.api.join_house(invite_code.trim()).await?;
        info!(house_id = %house.id, "Joined house");
        self.commit_as_current(house.clone())?;
        Ok(house)
    }

    /// Patch a house on the server and fold the updated record back in.
    pub async fn update_house(&self, house_id: &str, patch: &HousePatch) -> MembershipResult<House> {
        let house = self.api.update_house(house_id, patch).await?;
        let set = {
            let mut state = self.state.lock().unwrap();
            state.mutate(|set| {
                if !set.replace_house(house.clone()) {
                    debug!(house_id = %house.id, "Updated house is not in the local set");
                }
                set.clone()
            })
        };
        self.persist(&set)?;
        Ok(house)
    }

    /// Switch the current house, preferring fresh details from the server.
    ///
    /// The fetch happens even when the house is already known locally, so a
    /// switch always lands on up-to-date data when the network allows. On
    /// fetch failure the locally cached record, if any, is used as a
    /// fallback; an unknown id with no server answer leaves the selection
    /// unchanged. Never fails: a switch that cannot complete returns `None`.
    pub async fn switch_to_house(&self, house_id: &str) -> Option<House> {
        match self.api.get_house_details(house_id).await {
            Ok(house) => {
                if let Err(e) = self.commit_as_current(house.clone()) {
                    warn!(error = %e, "Failed to persist house switch");
                }
                Some(house)
            }
            Err(e) => {
                warn!(house_id, error = %e, "House details fetch failed, trying local fallback");
                let set = {
                    let mut state = self.state.lock().unwrap();
                    let known = state.set().is_some_and(|s| s.contains(house_id));
                    if !known {
                        return None;
                    }
                    state.mutate(|set| {
                        set.select(house_id);
                        set.clone()
                    })
                };
                if let Err(e) = self.persist(&set) {
                    warn!(error = %e, "Failed to persist house switch");
                }
                set.current_house().cloned()
            }
        }
    }

    /// Reset house data whenever the session ends up signed out.
    ///
    /// User-initiated sign-out, a failed startup validation and a
    /// server-rejected token all land in the signed-out state; the
    /// in-memory set must not keep serving the previous session's houses
    /// after that, even though the session layer already wiped the
    /// persisted keys.
    pub fn bind_to_session(self: &Arc<Self>, session: &SessionManager) {
        let membership = Arc::clone(self);
        session.add_state_callback(Box::new(move |payload| {
            if payload.state == AuthState::SignedOut {
                if let Err(e) = membership.clear_house_data() {
                    warn!(error = %e, "Failed to clear house data on sign-out");
                }
            }
        }));
    }

    /// Drop all house data, in memory and on disk.
    pub fn clear_house_data(&self) -> MembershipResult<()> {
        self.cache.clear_house_data()?;
        *self.state.lock().unwrap() = SyncState::Empty;
        Ok(())
    }

    fn commit_as_current(&self, house: House) -> MembershipResult<()> {
        let set = {
            let mut state = self.state.lock().unwrap();
            state.mutate(|set| {
                set.insert_as_current(house);
                set.clone()
            })
        };
        self.persist(&set)
    }

    fn persist(&self, set: &MembershipSet) -> MembershipResult<()> {
        self.cache.set_houses(set.houses())?;
        match set.current_house() {
            Some(current) => self.cache.set_current_house(current)?,
            None => self.cache.clear_current_house()?,
        }
        Ok(())
    }
}
