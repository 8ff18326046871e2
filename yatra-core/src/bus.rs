use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub name: String,
    pub contact: String,
}

/// Service class of a scheduled trip. Wire values match the public API
/// ("Highway Bus", "Semi Luxury", ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BusType {
    #[serde(rename = "Highway Bus")]
    HighwayBus,
    #[serde(rename = "Intercity")]
    Intercity,
    #[serde(rename = "Semi Luxury")]
    SemiLuxury,
    #[serde(rename = "Normal Coaches")]
    NormalCoaches,
}

impl BusType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusType::HighwayBus => "Highway Bus",
            BusType::Intercity => "Intercity",
            BusType::SemiLuxury => "Semi Luxury",
            BusType::NormalCoaches => "Normal Coaches",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "Highway Bus" => Ok(BusType::HighwayBus),
            "Intercity" => Ok(BusType::Intercity),
            "Semi Luxury" => Ok(BusType::SemiLuxury),
            "Normal Coaches" => Ok(BusType::NormalCoaches),
            other => Err(CoreError::ValidationError(format!(
                "unknown bus type: {}",
                other
            ))),
        }
    }
}

/// Operational status of a trip. Transitions are driven by administrative
/// updates, not modeled as a state machine here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BusStatus {
    Scheduled,
    Delayed,
    Cancelled,
    Completed,
}

impl BusStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusStatus::Scheduled => "scheduled",
            BusStatus::Delayed => "delayed",
            BusStatus::Cancelled => "cancelled",
            BusStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "scheduled" => Ok(BusStatus::Scheduled),
            "delayed" => Ok(BusStatus::Delayed),
            "cancelled" => Ok(BusStatus::Cancelled),
            "completed" => Ok(BusStatus::Completed),
            other => Err(CoreError::ValidationError(format!(
                "unknown bus status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Amenity {
    #[serde(rename = "AC")]
    Ac,
    #[serde(rename = "WiFi")]
    WiFi,
    #[serde(rename = "USB Charging")]
    UsbCharging,
    #[serde(rename = "Reclining Seats")]
    RecliningSeats,
    #[serde(rename = "Toilet")]
    Toilet,
    #[serde(rename = "Snacks")]
    Snacks,
}

impl Amenity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Amenity::Ac => "AC",
            Amenity::WiFi => "WiFi",
            Amenity::UsbCharging => "USB Charging",
            Amenity::RecliningSeats => "Reclining Seats",
            Amenity::Toilet => "Toilet",
            Amenity::Snacks => "Snacks",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "AC" => Ok(Amenity::Ac),
            "WiFi" => Ok(Amenity::WiFi),
            "USB Charging" => Ok(Amenity::UsbCharging),
            "Reclining Seats" => Ok(Amenity::RecliningSeats),
            "Toilet" => Ok(Amenity::Toilet),
            "Snacks" => Ok(Amenity::Snacks),
            other => Err(CoreError::ValidationError(format!(
                "unknown amenity: {}",
                other
            ))),
        }
    }
}

/// A scheduled trip instance (not a physical vehicle). `available_seats` is
/// the only mutable shared counter in the system; it must only be changed
/// through the atomic reserve/release operations on the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    pub id: Uuid,
    pub operator: Operator,
    pub bus_type: BusType,
    pub from: String,
    pub to: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price: i64,
    pub total_seats: u32,
    pub available_seats: u32,
    pub status: BusStatus,
    pub amenities: Vec<Amenity>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bus {
    pub fn new(spec: NewBus) -> CoreResult<Self> {
        let now = Utc::now();
        let bus = Self {
            id: Uuid::new_v4(),
            operator: spec.operator,
            bus_type: spec.bus_type,
            from: spec.from,
            to: spec.to,
            departure_time: spec.departure_time,
            arrival_time: spec.arrival_time,
            price: spec.price,
            total_seats: spec.total_seats,
            available_seats: spec.available_seats,
            status: spec.status.unwrap_or(BusStatus::Scheduled),
            amenities: spec.amenities,
            created_at: now,
            updated_at: now,
        };
        bus.validate()?;
        Ok(bus)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.operator.name.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Operator name is required".into(),
            ));
        }
        if self.operator.contact.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Operator contact is required".into(),
            ));
        }
        if self.from.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Departure location is required".into(),
            ));
        }
        if self.to.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Arrival location is required".into(),
            ));
        }
        if self.price < 0 {
            return Err(CoreError::ValidationError(
                "Price cannot be negative".into(),
            ));
        }
        if self.total_seats < 1 {
            return Err(CoreError::ValidationError(
                "Bus must have at least 1 seat".into(),
            ));
        }
        if self.available_seats > self.total_seats {
            return Err(CoreError::ValidationError(
                "Available seats cannot exceed total seats".into(),
            ));
        }
        Ok(())
    }

    /// Trip duration, computed from stored times (never persisted).
    pub fn duration(&self) -> Duration {
        self.arrival_time.signed_duration_since(self.departure_time)
    }

    /// True when the counter can satisfy the request. Read-only; the actual
    /// decrement happens atomically in the repository.
    pub fn has_available_seats(&self, requested: u32) -> bool {
        self.available_seats >= requested
    }
}

/// Payload for creating a trip.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBus {
    pub operator: Operator,
    pub bus_type: BusType,
    pub from: String,
    pub to: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price: i64,
    pub total_seats: u32,
    pub available_seats: u32,
    #[serde(default)]
    pub status: Option<BusStatus>,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
}

/// Partial update for a trip; only provided fields are changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusUpdate {
    pub operator: Option<Operator>,
    pub bus_type: Option<BusType>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub departure_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub price: Option<i64>,
    pub total_seats: Option<u32>,
    pub available_seats: Option<u32>,
    pub status: Option<BusStatus>,
    pub amenities: Option<Vec<Amenity>>,
}

impl BusUpdate {
    pub fn apply(self, bus: &mut Bus) -> CoreResult<()> {
        if let Some(operator) = self.operator {
            bus.operator = operator;
        }
        if let Some(bus_type) = self.bus_type {
            bus.bus_type = bus_type;
        }
        if let Some(from) = self.from {
            bus.from = from;
        }
        if let Some(to) = self.to {
            bus.to = to;
        }
        if let Some(departure_time) = self.departure_time {
            bus.departure_time = departure_time;
        }
        if let Some(arrival_time) = self.arrival_time {
            bus.arrival_time = arrival_time;
        }
        if let Some(price) = self.price {
            bus.price = price;
        }
        if let Some(total_seats) = self.total_seats {
            bus.total_seats = total_seats;
        }
        if let Some(available_seats) = self.available_seats {
            bus.available_seats = available_seats;
        }
        if let Some(status) = self.status {
            bus.status = status;
        }
        if let Some(amenities) = self.amenities {
            bus.amenities = amenities;
        }
        bus.updated_at = Utc::now();
        bus.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewBus {
        let now = Utc::now();
        NewBus {
            operator: Operator {
                name: "SLTB".to_string(),
                contact: "+94 11 234 5678".to_string(),
            },
            bus_type: BusType::HighwayBus,
            from: "Colombo".to_string(),
            to: "Kandy".to_string(),
            departure_time: now + Duration::hours(30),
            arrival_time: now + Duration::hours(33),
            price: 1000,
            total_seats: 40,
            available_seats: 40,
            status: None,
            amenities: vec![Amenity::Ac, Amenity::WiFi],
        }
    }

    #[test]
    fn new_bus_defaults_to_scheduled() {
        let bus = Bus::new(sample()).unwrap();
        assert_eq!(bus.status, BusStatus::Scheduled);
        assert!(bus.has_available_seats(40));
        assert!(!bus.has_available_seats(41));
    }

    #[test]
    fn duration_is_arrival_minus_departure() {
        let bus = Bus::new(sample()).unwrap();
        assert_eq!(bus.duration(), Duration::hours(3));
    }

    #[test]
    fn validation_rejects_zero_seats() {
        let mut spec = sample();
        spec.total_seats = 0;
        spec.available_seats = 0;
        assert!(Bus::new(spec).is_err());
    }

    #[test]
    fn validation_rejects_available_above_total() {
        let mut spec = sample();
        spec.available_seats = 41;
        assert!(Bus::new(spec).is_err());
    }

    #[test]
    fn bus_type_wire_values_round_trip() {
        let json = serde_json::to_string(&BusType::SemiLuxury).unwrap();
        assert_eq!(json, "\"Semi Luxury\"");
        assert_eq!(BusType::parse("Normal Coaches").unwrap(), BusType::NormalCoaches);
        assert!(BusType::parse("Sleeper").is_err());
    }
}
