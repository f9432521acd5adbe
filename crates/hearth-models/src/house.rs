//! House (shared household) types.

use serde::{Deserialize, Serialize};

/// A user's role within one house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseRole {
    Admin,
    Member,
}

/// A user's membership record within one house.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    /// The member's user ID.
    pub user_id: String,
    /// Role within the house.
    pub role: HouseRole,
    /// Display name within the house, if customized.
    #[serde(default)]
    pub nickname: Option<String>,
}

/// A shared household, the unit of expense-sharing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    /// Stable house ID assigned by the server.
    pub id: String,
    /// Display name.
    pub name: String,
    /// House theme color (hex string).
    #[serde(default)]
    pub color: Option<String>,
    /// Short code used to join this house.
    #[serde(default)]
    pub invite_code: Option<String>,
    /// All members of the house.
    #[serde(default)]
    pub members: Vec<Membership>,
    /// The *requesting* user's own membership, when the server includes it.
    /// Cached house records without this field cannot answer "am I admin
    /// here?" and are treated as incomplete.
    #[serde(default)]
    pub membership: Option<Membership>,
}

impl House {
    /// Whether this record carries the current user's membership data.
    pub fn has_membership(&self) -> bool {
        self.membership.is_some()
    }

    /// The current user's role, when known.
    pub fn role(&self) -> Option<HouseRole> {
        self.membership.as_ref().map(|m| m.role)
    }
}

/// Request body for `POST /houses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHouse {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Request body for `PATCH /houses/:id`. Fields left `None` are not sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HousePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn house_without_membership_is_incomplete() {
        let json = r#"{"id":"h1","name":"Oak St"}"#;
        let house: House = serde_json::from_str(json).unwrap();
        assert!(!house.has_membership());
        assert!(house.role().is_none());
        assert!(house.members.is_empty());
    }

    #[test]
    fn house_with_membership() {
        let json = r#"{
            "id": "h1",
            "name": "Oak St",
            "invite_code": "OAK123",
            "membership": {"user_id": "u1", "role": "admin"}
        }"#;
        let house: House = serde_json::from_str(json).unwrap();
        assert!(house.has_membership());
        assert_eq!(house.role(), Some(HouseRole::Admin));
    }

    #[test]
    fn house_patch_skips_unset_fields() {
        let patch = HousePatch {
            name: Some("Elm St".to_string()),
            color: None,
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert!(json.contains("Elm St"));
        assert!(!json.contains("color"));
    }

    #[test]
    fn role_snake_case_wire_format() {
        assert_eq!(serde_json::to_string(&HouseRole::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&HouseRole::Member).unwrap(), "\"member\"");
    }
}
