//! Simple record entities sharing the authorized-CRUD pattern.
//!
//! Complaints, fee payments, and mess-menu entries are single-entity,
//! single-step records: each operation is one role check followed by one
//! store mutation. They share the generic [`crate::domain::ports::RecordStore`]
//! capability, one instance per kind.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::account::AccountId;
use crate::domain::room::RoomNumber;

/// Identity accessor shared by all stored record kinds.
pub trait Record: Clone + Send + Sync + 'static {
    /// Stable record identifier.
    fn record_id(&self) -> Uuid;
}

/// Complaint category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintCategory {
    Maintenance,
    Cleanliness,
    Electrical,
    Plumbing,
    Other,
}

/// Complaint lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
}

/// Error returned when parsing an unrecognised complaint status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised complaint status: {value}")]
pub struct UnknownComplaintStatus {
    /// The rejected input.
    pub value: String,
}

impl FromStr for ComplaintStatus {
    type Err = UnknownComplaintStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            other => Err(UnknownComplaintStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Maintenance or service complaint raised by a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Complaint {
    /// Stable identifier.
    pub id: Uuid,
    /// Raising student.
    #[schema(value_type = String)]
    pub student_id: AccountId,
    /// Name snapshot for admin listings.
    pub student_name: String,
    /// The student's room at the time of filing.
    pub room_number: RoomNumber,
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Category.
    pub category: ComplaintCategory,
    /// Lifecycle status.
    pub status: ComplaintStatus,
    /// Filing timestamp.
    pub created_at: DateTime<Utc>,
    /// Stamped when the status reaches `resolved`.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Record for Complaint {
    fn record_id(&self) -> Uuid {
        self.id
    }
}

/// Fee payment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    HostelFee,
    MessFee,
    SecurityDeposit,
}

/// Payment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

/// Fee-payment record tracked against a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    /// Stable identifier.
    pub id: Uuid,
    /// Billed student.
    #[schema(value_type = String)]
    pub student_id: AccountId,
    /// Name snapshot for admin listings.
    pub student_name: String,
    /// Amount due.
    pub amount: f64,
    /// Billing month label, e.g. `July`.
    pub month: String,
    /// Billing year label, e.g. `2026`.
    pub year: String,
    /// Fee category.
    pub payment_type: PaymentType,
    /// Lifecycle status.
    pub status: PaymentStatus,
    /// Due date.
    pub due_date: NaiveDate,
    /// Stamped when marked paid.
    pub paid_date: Option<DateTime<Utc>>,
    /// Record-creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Record for Payment {
    fn record_id(&self) -> Uuid {
        self.id
    }
}

/// Day of the week a menu entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MenuDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl MenuDay {
    /// Stable wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

impl fmt::Display for MenuDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meal a menu entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

/// Published mess-menu entry, unique per `(day, meal_type)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessMenu {
    /// Stable identifier.
    pub id: Uuid,
    /// Day the entry applies to.
    pub day: MenuDay,
    /// Meal the entry describes.
    pub meal_type: MealType,
    /// Dishes served.
    pub items: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Stamped on upsert of an existing entry.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for MessMenu {
    fn record_id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("pending", ComplaintStatus::Pending)]
    #[case("in_progress", ComplaintStatus::InProgress)]
    #[case("resolved", ComplaintStatus::Resolved)]
    fn complaint_statuses_parse(#[case] input: &str, #[case] expected: ComplaintStatus) {
        assert_eq!(
            input.parse::<ComplaintStatus>().expect("known status"),
            expected
        );
    }

    #[rstest]
    fn unknown_complaint_status_is_rejected() {
        assert!("escalated".parse::<ComplaintStatus>().is_err());
    }

    #[rstest]
    fn menu_serialization_uses_snake_case() {
        let value = serde_json::to_value(MenuDay::Wednesday).expect("serializable day");
        assert_eq!(value, serde_json::json!("wednesday"));
        let value = serde_json::to_value(MealType::Breakfast).expect("serializable meal");
        assert_eq!(value, serde_json::json!("breakfast"));
    }
}
