use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use yatra_core::booking::{Booking, BookingStatus, PaymentMethod, PaymentStatus, RefundStatus};
use yatra_core::repository::{BookingRepository, RepoResult};

pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const BOOKING_COLUMNS: &str = "id, user_id, bus_id, seats, total_amount, status, payment_status, \
     payment_method, booking_date, refund_status, refund_amount, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    bus_id: Uuid,
    seats: Vec<i32>,
    total_amount: i64,
    status: String,
    payment_status: String,
    payment_method: String,
    booking_date: DateTime<Utc>,
    refund_status: String,
    refund_amount: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_domain(self) -> RepoResult<Booking> {
        Ok(Booking {
            id: self.id,
            user_id: self.user_id,
            bus_id: self.bus_id,
            seats: self.seats.into_iter().map(|s| s as u32).collect(),
            total_amount: self.total_amount,
            status: BookingStatus::parse(&self.status)?,
            payment_status: PaymentStatus::parse(&self.payment_status)?,
            payment_method: PaymentMethod::parse(&self.payment_method)?,
            booking_date: self.booking_date,
            refund_status: RefundStatus::parse(&self.refund_status)?,
            refund_amount: self.refund_amount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn create(&self, booking: &Booking) -> RepoResult<()> {
        let seats: Vec<i32> = booking.seats.iter().map(|s| *s as i32).collect();
        sqlx::query(
            "INSERT INTO bookings (id, user_id, bus_id, seats, total_amount, status, \
             payment_status, payment_method, booking_date, refund_status, refund_amount, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(booking.id)
        .bind(booking.user_id)
        .bind(booking.bus_id)
        .bind(&seats)
        .bind(booking.total_amount)
        .bind(booking.status.as_str())
        .bind(booking.payment_status.as_str())
        .bind(booking.payment_method.as_str())
        .bind(booking.booking_date)
        .bind(booking.refund_status.as_str())
        .bind(booking.refund_amount)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(BookingRow::into_domain).transpose()
    }

    async fn update(&self, booking: &Booking) -> RepoResult<()> {
        sqlx::query(
            "UPDATE bookings SET status = $1, payment_status = $2, refund_status = $3, \
             refund_amount = $4, updated_at = $5 WHERE id = $6",
        )
        .bind(booking.status.as_str())
        .bind(booking.payment_status.as_str())
        .bind(booking.refund_status.as_str())
        .bind(booking.refund_amount)
        .bind(booking.updated_at)
        .bind(booking.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC",
            BOOKING_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(BookingRow::into_domain).collect()
    }

    async fn list_all(&self) -> RepoResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings ORDER BY created_at DESC",
            BOOKING_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(BookingRow::into_domain).collect()
    }
}
