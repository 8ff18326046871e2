use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use yatra_core::bus::{Amenity, Bus, BusStatus, BusType, Operator};
use yatra_core::repository::{BusQuery, BusRepository, RepoResult};

pub struct PostgresBusRepository {
    pool: PgPool,
}

impl PostgresBusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const BUS_COLUMNS: &str = "id, operator_name, operator_contact, bus_type, origin, destination, \
     departure_time, arrival_time, price, total_seats, available_seats, status, amenities, \
     created_at, updated_at";

#[derive(sqlx::FromRow)]
struct BusRow {
    id: Uuid,
    operator_name: String,
    operator_contact: String,
    bus_type: String,
    origin: String,
    destination: String,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    price: i64,
    total_seats: i32,
    available_seats: i32,
    status: String,
    amenities: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BusRow {
    fn into_domain(self) -> RepoResult<Bus> {
        let amenities = self
            .amenities
            .iter()
            .map(|a| Amenity::parse(a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Bus {
            id: self.id,
            operator: Operator {
                name: self.operator_name,
                contact: self.operator_contact,
            },
            bus_type: BusType::parse(&self.bus_type)?,
            from: self.origin,
            to: self.destination,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            price: self.price,
            total_seats: self.total_seats as u32,
            available_seats: self.available_seats as u32,
            status: BusStatus::parse(&self.status)?,
            amenities,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl BusRepository for PostgresBusRepository {
    async fn create(&self, bus: &Bus) -> RepoResult<()> {
        let amenities: Vec<String> = bus.amenities.iter().map(|a| a.as_str().to_string()).collect();
        sqlx::query(
            "INSERT INTO buses (id, operator_name, operator_contact, bus_type, origin, destination, \
             departure_time, arrival_time, price, total_seats, available_seats, status, amenities, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(bus.id)
        .bind(&bus.operator.name)
        .bind(&bus.operator.contact)
        .bind(bus.bus_type.as_str())
        .bind(&bus.from)
        .bind(&bus.to)
        .bind(bus.departure_time)
        .bind(bus.arrival_time)
        .bind(bus.price)
        .bind(bus.total_seats as i32)
        .bind(bus.available_seats as i32)
        .bind(bus.status.as_str())
        .bind(&amenities)
        .bind(bus.created_at)
        .bind(bus.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<Bus>> {
        let row: Option<BusRow> =
            sqlx::query_as(&format!("SELECT {} FROM buses WHERE id = $1", BUS_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(BusRow::into_domain).transpose()
    }

    async fn list(&self, query: &BusQuery) -> RepoResult<Vec<Bus>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM buses WHERE 1=1", BUS_COLUMNS));
        if let Some(from) = &query.from {
            qb.push(" AND origin = ").push_bind(from.clone());
        }
        if let Some(to) = &query.to {
            qb.push(" AND destination = ").push_bind(to.clone());
        }
        if let Some(bus_type) = query.bus_type {
            qb.push(" AND bus_type = ").push_bind(bus_type.as_str());
        }
        if let Some(date) = query.date {
            // Whole departure day, [00:00, next day).
            let start = date.and_time(NaiveTime::MIN).and_utc();
            let end = start + Duration::days(1);
            qb.push(" AND departure_time >= ").push_bind(start);
            qb.push(" AND departure_time < ").push_bind(end);
        }
        qb.push(" ORDER BY departure_time ASC");

        let rows: Vec<BusRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(BusRow::into_domain).collect()
    }

    async fn update(&self, bus: &Bus) -> RepoResult<()> {
        let amenities: Vec<String> = bus.amenities.iter().map(|a| a.as_str().to_string()).collect();
        sqlx::query(
            "UPDATE buses SET operator_name = $1, operator_contact = $2, bus_type = $3, \
             origin = $4, destination = $5, departure_time = $6, arrival_time = $7, price = $8, \
             total_seats = $9, available_seats = $10, status = $11, amenities = $12, \
             updated_at = $13 WHERE id = $14",
        )
        .bind(&bus.operator.name)
        .bind(&bus.operator.contact)
        .bind(bus.bus_type.as_str())
        .bind(&bus.from)
        .bind(&bus.to)
        .bind(bus.departure_time)
        .bind(bus.arrival_time)
        .bind(bus.price)
        .bind(bus.total_seats as i32)
        .bind(bus.available_seats as i32)
        .bind(bus.status.as_str())
        .bind(&amenities)
        .bind(bus.updated_at)
        .bind(bus.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM buses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reserve_seats(&self, id: Uuid, count: u32) -> RepoResult<bool> {
        // Single conditional decrement: the availability check and the write
        // are one statement, so concurrent reservations cannot jointly
        // over-commit the counter.
        let result = sqlx::query(
            "UPDATE buses SET available_seats = available_seats - $1, updated_at = NOW() \
             WHERE id = $2 AND available_seats >= $1",
        )
        .bind(count as i32)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn release_seats(&self, id: Uuid, count: u32) -> RepoResult<()> {
        sqlx::query(
            "UPDATE buses SET available_seats = LEAST(available_seats + $1, total_seats), \
             updated_at = NOW() WHERE id = $2",
        )
        .bind(count as i32)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
