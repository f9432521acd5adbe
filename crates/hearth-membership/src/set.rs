//! The membership set: houses plus the current-house selection.
//!
//! Fields are private; every mutation goes through methods that uphold the
//! two structural invariants:
//! - the current house, when set, appears in the house list by id
//! - an empty house list means no current house

use hearth_models::House;

/// The set of houses the user belongs to and the single current selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MembershipSet {
    houses: Vec<House>,
    current_house: Option<House>,
}

impl MembershipSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a house list and a current-house candidate.
    ///
    /// Selection rules:
    /// - a candidate still present in the list stays current, pointing at
    ///   the *list's* record (full replace, no partial merge)
    /// - a candidate absent from the list is dropped (house deleted or
    ///   membership revoked), leaving no current selection
    /// - no candidate at all adopts the first element of a non-empty list;
    ///   the ordering is server-determined and deliberately not re-sorted
    pub fn from_parts(houses: Vec<House>, candidate: Option<House>) -> Self {
        let current_house = match candidate {
            Some(prev) => houses.iter().find(|h| h.id == prev.id).cloned(),
            None => houses.first().cloned(),
        };
        Self {
            houses,
            current_house,
        }
    }

    /// All houses, in server order.
    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    /// The current house, if one is selected.
    pub fn current_house(&self) -> Option<&House> {
        self.current_house.as_ref()
    }

    /// Whether the set has no houses.
    pub fn is_empty(&self) -> bool {
        self.houses.is_empty()
    }

    /// Look up a house by id.
    pub fn find(&self, id: &str) -> Option<&House> {
        self.houses.iter().find(|h| h.id == id)
    }

    /// Whether a house with this id is in the set.
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Full replace of the house list, re-resolving the current selection.
    pub fn set_houses(&mut self, houses: Vec<House>) {
        *self = Self::from_parts(houses, self.current_house.take());
    }

    /// Insert (or replace by id) a house and make it current.
    ///
    /// Used by create/join/switch: the newly obtained house always becomes
    /// the active context.
    pub fn insert_as_current(&mut self, house: House) {
        match self.houses.iter_mut().find(|h| h.id == house.id) {
            Some(slot) => *slot = house.clone(),
            None => self.houses.push(house.clone()),
        }
        self.current_house = Some(house);
    }

    /// Replace the entry with a matching id, updating the current selection
    /// too when it points at the same house. Returns whether a match was
    /// found; an unknown id leaves the set untouched.
    pub fn replace_house(&mut self, house: House) -> bool {
        let Some(slot) = self.houses.iter_mut().find(|h| h.id == house.id) else {
            return false;
        };
        *slot = house.clone();
        if self
            .current_house
            .as_ref()
            .is_some_and(|c| c.id == house.id)
        {
            self.current_house = Some(house);
        }
        true
    }

    /// Make an already-known house current. Returns false for unknown ids.
    pub fn select(&mut self, id: &str) -> bool {
        match self.find(id).cloned() {
            Some(house) => {
                self.current_house = Some(house);
                true
            }
            None => false,
        }
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.houses.clear();
        self.current_house = None;
    }

    /// Structural invariant check, used by tests.
    #[cfg(test)]
    pub(crate) fn invariants_hold(&self) -> bool {
        match &self.current_house {
            Some(current) => self.houses.iter().any(|h| h.id == current.id),
            None => true,
        }
    }
}
