//! Person and apartment models.
//!
//! Both the marital status of a person and the type of an apartment feed
//! the standby-rate lookup, and both are history-tracked so that
//! recomputing an old month reproduces the rates that applied then.

use serde::{Deserialize, Serialize};

/// Marital status of a guide, as keyed by the standby-rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    /// Unmarried guide.
    Single,
    /// Married guide (typically a couple living on site).
    Married,
}

impl MaritalStatus {
    /// Builds a status from the boolean flag stored on the person row.
    pub fn from_flag(is_married: bool) -> Self {
        if is_married {
            MaritalStatus::Married
        } else {
            MaritalStatus::Single
        }
    }

    /// The string form used by the `standby_rates.marital_status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "single",
            MaritalStatus::Married => "married",
        }
    }
}

/// Per-person status attributes, all history-tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonStatus {
    /// Whether the person is married for rate purposes.
    pub is_married: bool,
    /// The employing entity, when tracked.
    pub employer_id: Option<i64>,
    /// Free-form employee type code.
    pub employee_type: Option<String>,
}

/// The type of an apartment, which selects the standby-rate class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApartmentType {
    /// Regular residential apartment (id 1).
    Regular,
    /// Therapeutic apartment (id 2).
    Therapeutic,
}

impl ApartmentType {
    /// Maps a stored `apartment_type_id` to its enum value.
    ///
    /// # Example
    ///
    /// ```
    /// use wage_engine::models::ApartmentType;
    ///
    /// assert_eq!(ApartmentType::from_id(1), Some(ApartmentType::Regular));
    /// assert_eq!(ApartmentType::from_id(2), Some(ApartmentType::Therapeutic));
    /// assert_eq!(ApartmentType::from_id(9), None);
    /// ```
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(ApartmentType::Regular),
            2 => Some(ApartmentType::Therapeutic),
            _ => None,
        }
    }

    /// The stored id for this apartment type.
    pub fn id(&self) -> i64 {
        match self {
            ApartmentType::Regular => 1,
            ApartmentType::Therapeutic => 2,
        }
    }
}

/// An apartment a report was logged against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apartment {
    /// Unique apartment id.
    pub id: i64,
    /// The apartment's own (history-resolved) type.
    pub apartment_type: ApartmentType,
    /// The housing cluster this apartment belongs to, when assigned.
    pub housing_cluster_id: Option<i64>,
}
