use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common_dto::CategoryCount;
use crate::dto::trip_dto::{TripDetailsRow, TripListQuery, TripSummary, UpdateTripRequest};
use crate::models::trip::{Trip, TripStatus};
use crate::services::trip_status::TripProgress;
use crate::utils::errors::AppError;

const SELECT_DETAILS: &str = r#"
    SELECT t.*,
           p.project_code, p.project_name, p.project_type, p.rate, p.customer_name, p.company_name,
           v.vehicle_code, v.registration_number, v.make AS vehicle_make, v.model AS vehicle_model,
           d.driver_code, d.first_name AS driver_first_name, d.last_name AS driver_last_name,
           d.mobile AS driver_mobile
    FROM trips t
    JOIN projects p ON p.id = t.project_id
    JOIN vehicles v ON v.id = t.vehicle_id
    JOIN drivers d ON d.id = t.driver_id
"#;

pub struct NewTrip {
    pub admin_id: Uuid,
    pub trip_code: String,
    pub project_id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub date: NaiveDate,
    pub source: String,
    pub destination: String,
    pub km: Option<Decimal>,
    pub tons: Option<Decimal>,
    pub days: Option<i32>,
    pub fuel_advance: Decimal,
    pub notes: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct TripCounts {
    pub total: i64,
    pub completed: i64,
}

pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, admin_id: Uuid, filters: &TripListQuery) {
        builder.push(" WHERE t.admin_id = ").push_bind(admin_id);

        if let Some(pattern) = filters.page_query().search_pattern() {
            builder.push(" AND (");
            let mut columns = builder.separated(" OR ");
            for column in ["t.trip_code", "t.source", "t.destination", "t.notes"] {
                columns.push(format!("{} ILIKE ", column));
                columns.push_bind_unseparated(pattern.clone());
            }
            builder.push(")");
        }
        if let Some(status) = filters.status {
            builder.push(" AND t.status = ").push_bind(status);
        }
        if let Some(project_id) = filters.project_id {
            builder.push(" AND t.project_id = ").push_bind(project_id);
        }
        if let Some(vehicle_id) = filters.vehicle_id {
            builder.push(" AND t.vehicle_id = ").push_bind(vehicle_id);
        }
        if let Some(driver_id) = filters.driver_id {
            builder.push(" AND t.driver_id = ").push_bind(driver_id);
        }
        if let Some(date_from) = filters.date_from {
            builder.push(" AND t.date >= ").push_bind(date_from);
        }
        if let Some(date_to) = filters.date_to {
            builder.push(" AND t.date <= ").push_bind(date_to);
        }
    }

    pub async fn list(&self, admin_id: Uuid, filters: &TripListQuery) -> Result<(Vec<TripDetailsRow>, i64), AppError> {
        let page = filters.page_query();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM trips t");
        Self::push_filters(&mut count, admin_id, filters);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(SELECT_DETAILS);
        Self::push_filters(&mut select, admin_id, filters);
        select
            .push(" ORDER BY t.date DESC, t.created_at DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let trips = select.build_query_as::<TripDetailsRow>().fetch_all(&self.pool).await?;

        Ok((trips, total))
    }

    pub async fn find_by_id(&self, id: Uuid, admin_id: Uuid) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(trip)
    }

    pub async fn find_details(&self, id: Uuid, admin_id: Uuid) -> Result<Option<TripDetailsRow>, AppError> {
        let trip = sqlx::query_as::<_, TripDetailsRow>(&format!(
            "{} WHERE t.id = $1 AND t.admin_id = $2",
            SELECT_DETAILS
        ))
        .bind(id)
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(trip)
    }

    /// Viajes del inquilino para los informes, opcionalmente de un día o un estado
    pub async fn find_for_report(
        &self,
        admin_id: Uuid,
        date: Option<NaiveDate>,
        status: Option<TripStatus>,
    ) -> Result<Vec<TripDetailsRow>, AppError> {
        let mut select = QueryBuilder::<Postgres>::new(SELECT_DETAILS);
        select.push(" WHERE t.admin_id = ").push_bind(admin_id);
        if let Some(date) = date {
            select.push(" AND t.date = ").push_bind(date);
        }
        if let Some(status) = status {
            select.push(" AND t.status = ").push_bind(status);
        }
        select.push(" ORDER BY t.date DESC, t.created_at DESC");

        let trips = select.build_query_as::<TripDetailsRow>().fetch_all(&self.pool).await?;
        Ok(trips)
    }

    pub async fn find_by_admin(&self, admin_id: Uuid, date: Option<NaiveDate>) -> Result<Vec<Trip>, AppError> {
        let trips = sqlx::query_as::<_, Trip>(
            r#"
            SELECT * FROM trips
            WHERE admin_id = $1 AND ($2::DATE IS NULL OR date = $2)
            ORDER BY date DESC
            "#,
        )
        .bind(admin_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }

    pub async fn create(&self, trip: NewTrip) -> Result<Trip, AppError> {
        let created = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (
                id, admin_id, trip_code, project_id, vehicle_id, driver_id, date,
                source, destination, km, tons, days, status, fuel_advance, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(trip.admin_id)
        .bind(trip.trip_code)
        .bind(trip.project_id)
        .bind(trip.vehicle_id)
        .bind(trip.driver_id)
        .bind(trip.date)
        .bind(trip.source)
        .bind(trip.destination)
        .bind(trip.km)
        .bind(trip.tons)
        .bind(trip.days)
        .bind(TripStatus::Upcoming)
        .bind(trip.fuel_advance)
        .bind(trip.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Campos nulables: `Some(None)` los borra, `None` los deja como están
    pub async fn update(&self, id: Uuid, admin_id: Uuid, changes: UpdateTripRequest) -> Result<Trip, AppError> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET project_id = COALESCE($3, project_id),
                vehicle_id = COALESCE($4, vehicle_id),
                driver_id = COALESCE($5, driver_id),
                date = COALESCE($6, date),
                source = COALESCE($7, source),
                destination = COALESCE($8, destination),
                km = CASE WHEN $9 THEN $10 ELSE km END,
                tons = CASE WHEN $11 THEN $12 ELSE tons END,
                days = CASE WHEN $13 THEN $14 ELSE days END,
                fuel_advance = COALESCE($15, fuel_advance),
                actual_km = CASE WHEN $16 THEN $17 ELSE actual_km END,
                actual_tons = CASE WHEN $18 THEN $19 ELSE actual_tons END,
                actual_days = CASE WHEN $20 THEN $21 ELSE actual_days END,
                start_time = CASE WHEN $22 THEN $23 ELSE start_time END,
                end_time = CASE WHEN $24 THEN $25 ELSE end_time END,
                notes = COALESCE($26, notes),
                updated_at = NOW()
            WHERE id = $1 AND admin_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(admin_id)
        .bind(changes.project_id)
        .bind(changes.vehicle_id)
        .bind(changes.driver_id)
        .bind(changes.date)
        .bind(changes.source)
        .bind(changes.destination)
        .bind(changes.km.is_some())
        .bind(changes.km.flatten())
        .bind(changes.tons.is_some())
        .bind(changes.tons.flatten())
        .bind(changes.days.is_some())
        .bind(changes.days.flatten())
        .bind(changes.fuel_advance)
        .bind(changes.actual_km.is_some())
        .bind(changes.actual_km.flatten())
        .bind(changes.actual_tons.is_some())
        .bind(changes.actual_tons.flatten())
        .bind(changes.actual_days.is_some())
        .bind(changes.actual_days.flatten())
        .bind(changes.start_time.is_some())
        .bind(changes.start_time.flatten())
        .bind(changes.end_time.is_some())
        .bind(changes.end_time.flatten())
        .bind(changes.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

        Ok(trip)
    }

    /// Persistir el resultado de una transición de estado
    pub async fn save_progress(&self, id: Uuid, admin_id: Uuid, progress: &TripProgress) -> Result<Trip, AppError> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET status = $3,
                start_time = $4,
                end_time = $5,
                actual_km = $6,
                actual_tons = $7,
                actual_days = $8,
                notes = $9,
                updated_at = NOW()
            WHERE id = $1 AND admin_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(admin_id)
        .bind(progress.status)
        .bind(progress.start_time)
        .bind(progress.end_time)
        .bind(progress.actual_km)
        .bind(progress.actual_tons)
        .bind(progress.actual_days)
        .bind(&progress.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

        Ok(trip)
    }

    pub async fn delete(&self, id: Uuid, admin_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM trips WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn counts(&self, admin_id: Uuid) -> Result<TripCounts, AppError> {
        let counts = sqlx::query_as::<_, TripCounts>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'Completed') AS completed
            FROM trips WHERE admin_id = $1
            "#,
        )
        .bind(admin_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn status_stats(&self, admin_id: Uuid) -> Result<Vec<CategoryCount>, AppError> {
        let stats = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT status::TEXT AS category, COUNT(*) AS count
            FROM trips WHERE admin_id = $1
            GROUP BY status ORDER BY status
            "#,
        )
        .bind(admin_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }

    pub async fn recent(&self, admin_id: Uuid, limit: i64) -> Result<Vec<TripSummary>, AppError> {
        let trips = sqlx::query_as::<_, TripSummary>(
            r#"
            SELECT id, trip_code, source, destination, date, status, created_at
            FROM trips WHERE admin_id = $1
            ORDER BY created_at DESC LIMIT $2
            "#,
        )
        .bind(admin_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }
}
