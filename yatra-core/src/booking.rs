use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking lifecycle state. `cancelled` and `completed` are terminal; the
/// only guarded transition is into `cancelled`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> crate::CoreResult<Self> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(crate::CoreError::ValidationError(format!(
                "unknown booking status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn parse(s: &str) -> crate::CoreResult<Self> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(crate::CoreError::ValidationError(format!(
                "unknown payment status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Cash => "cash",
        }
    }

    pub fn parse(s: &str) -> crate::CoreResult<Self> {
        match s {
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "debit_card" => Ok(PaymentMethod::DebitCard),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(crate::CoreError::ValidationError(format!(
                "unknown payment method: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RefundStatus {
    None,
    Requested,
    Approved,
    Rejected,
}

impl RefundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefundStatus::None => "none",
            RefundStatus::Requested => "requested",
            RefundStatus::Approved => "approved",
            RefundStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> crate::CoreResult<Self> {
        match s {
            "none" => Ok(RefundStatus::None),
            "requested" => Ok(RefundStatus::Requested),
            "approved" => Ok(RefundStatus::Approved),
            "rejected" => Ok(RefundStatus::Rejected),
            other => Err(crate::CoreError::ValidationError(format!(
                "unknown refund status: {}",
                other
            ))),
        }
    }
}

/// A purchase of seats on one trip, owned by the user who created it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bus_id: Uuid,
    pub seats: Vec<u32>,
    pub total_amount: i64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub booking_date: DateTime<Utc>,
    pub refund_status: RefundStatus,
    pub refund_amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// `total_amount` is fixed at creation as price-per-seat times the seat
    /// count; it is never re-derived later.
    pub fn new(
        user_id: Uuid,
        bus_id: Uuid,
        seats: Vec<u32>,
        price_per_seat: i64,
        payment_method: PaymentMethod,
    ) -> Self {
        let now = Utc::now();
        let total_amount = price_per_seat * seats.len() as i64;
        Self {
            id: Uuid::new_v4(),
            user_id,
            bus_id,
            seats,
            total_amount,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method,
            booking_date: now,
            refund_status: RefundStatus::None,
            refund_amount: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Human-facing short code: fixed prefix plus the last six hex characters
    /// of the id, upper-cased. Computed, never stored.
    pub fn reference(&self) -> String {
        let hex = self.id.simple().to_string();
        format!("BUS{}", hex[hex.len() - 6..].to_uppercase())
    }

    /// Apply an approved refund and move to `cancelled`.
    pub fn cancel_with_refund(&mut self, amount: i64) {
        self.refund_amount = amount;
        self.refund_status = RefundStatus::Approved;
        self.payment_status = PaymentStatus::Refunded;
        self.status = BookingStatus::Cancelled;
        self.updated_at = Utc::now();
    }

    /// Record a rejected refund. Whether the booking is also cancelled is the
    /// caller's policy decision.
    pub fn reject_refund(&mut self, cancel: bool) {
        self.refund_status = RefundStatus::Rejected;
        self.refund_amount = 0;
        if cancel {
            self.status = BookingStatus::Cancelled;
        }
        self.updated_at = Utc::now();
    }
}
