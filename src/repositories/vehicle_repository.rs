use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common_dto::CategoryCount;
use crate::dto::vehicle_dto::{GroupFilter, VehicleListQuery, VehicleSummary};
use crate::models::vehicle::{Vehicle, VehicleWithGroup};
use crate::utils::errors::AppError;

const SELECT_WITH_GROUP: &str = "SELECT v.*, g.group_name FROM vehicles v LEFT JOIN vehicle_groups g ON g.id = v.group_id";

pub struct NewVehicle {
    pub admin_id: Uuid,
    pub vehicle_code: String,
    pub registration_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vehicle_type: String,
    pub fuel_type: String,
    pub transmission: String,
    pub passenger_capacity: i32,
    pub cargo_capacity: i32,
    pub color: Option<String>,
    pub insurance_policy_number: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_expiry: Option<NaiveDate>,
    pub status: String,
    pub group_id: Option<Uuid>,
}

/// Cambios ya resueltos de un vehículo. `group_id: Some(None)` lo saca del grupo.
#[derive(Debug, Default)]
pub struct VehicleChanges {
    pub registration_number: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub vehicle_type: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub passenger_capacity: Option<i32>,
    pub cargo_capacity: Option<i32>,
    pub color: Option<String>,
    pub insurance_policy_number: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_expiry: Option<NaiveDate>,
    pub status: Option<String>,
    pub is_available: Option<bool>,
    pub group_id: Option<Option<Uuid>>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct VehicleCounts {
    pub total: i64,
    pub active: i64,
    pub available: i64,
}

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(
        builder: &mut QueryBuilder<'_, Postgres>,
        admin_id: Uuid,
        filters: &VehicleListQuery,
        group: Option<GroupFilter>,
    ) {
        builder.push(" WHERE v.admin_id = ").push_bind(admin_id);

        if let Some(pattern) = filters.page_query().search_pattern() {
            builder.push(" AND (");
            let mut columns = builder.separated(" OR ");
            for column in ["v.vehicle_code", "v.registration_number", "v.make", "v.model", "v.color"] {
                columns.push(format!("{} ILIKE ", column));
                columns.push_bind_unseparated(pattern.clone());
            }
            builder.push(")");
        }
        if let Some(status) = filters.status.as_deref().filter(|s| !s.is_empty()) {
            builder.push(" AND v.status = ").push_bind(status.to_string());
        }
        if let Some(vehicle_type) = filters.vehicle_type.as_deref().filter(|s| !s.is_empty()) {
            builder.push(" AND v.vehicle_type = ").push_bind(vehicle_type.to_string());
        }
        if let Some(fuel_type) = filters.fuel_type.as_deref().filter(|s| !s.is_empty()) {
            builder.push(" AND v.fuel_type = ").push_bind(fuel_type.to_string());
        }
        if let Some(is_available) = filters.is_available {
            builder.push(" AND v.is_available = ").push_bind(is_available);
        }
        match group {
            Some(GroupFilter::Ungrouped) => {
                builder.push(" AND v.group_id IS NULL");
            }
            Some(GroupFilter::Group(group_id)) => {
                builder.push(" AND v.group_id = ").push_bind(group_id);
            }
            None => {}
        }
    }

    pub async fn list(
        &self,
        admin_id: Uuid,
        filters: &VehicleListQuery,
        group: Option<GroupFilter>,
    ) -> Result<(Vec<VehicleWithGroup>, i64), AppError> {
        let page = filters.page_query();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM vehicles v");
        Self::push_filters(&mut count, admin_id, filters, group);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(SELECT_WITH_GROUP);
        Self::push_filters(&mut select, admin_id, filters, group);
        select
            .push(" ORDER BY v.created_at DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let vehicles = select.build_query_as::<VehicleWithGroup>().fetch_all(&self.pool).await?;

        Ok((vehicles, total))
    }

    pub async fn find_by_id(&self, id: Uuid, admin_id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_with_group(&self, id: Uuid, admin_id: Uuid) -> Result<Option<VehicleWithGroup>, AppError> {
        let vehicle = sqlx::query_as::<_, VehicleWithGroup>(&format!(
            "{} WHERE v.id = $1 AND v.admin_id = $2",
            SELECT_WITH_GROUP
        ))
        .bind(id)
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Vehículos del inquilino con su grupo, opcionalmente por estado
    pub async fn find_by_admin(&self, admin_id: Uuid, status: Option<&str>) -> Result<Vec<VehicleWithGroup>, AppError> {
        let vehicles = sqlx::query_as::<_, VehicleWithGroup>(&format!(
            "{} WHERE v.admin_id = $1 AND ($2::TEXT IS NULL OR v.status = $2) ORDER BY v.created_at DESC",
            SELECT_WITH_GROUP
        ))
        .bind(admin_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn find_by_group(&self, group_id: Uuid, admin_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE group_id = $1 AND admin_id = $2 ORDER BY vehicle_code",
        )
        .bind(group_id)
        .bind(admin_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// Las matrículas se guardan en mayúsculas
    pub async fn registration_exists(&self, registration_number: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE registration_number = $1 AND ($2::UUID IS NULL OR id <> $2))",
        )
        .bind(registration_number.to_uppercase())
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn next_code_number(&self) -> Result<i64, AppError> {
        super::next_code_number(&self.pool, "vehicles", "vehicle_code", "VEH").await
    }

    pub async fn create(&self, vehicle: NewVehicle) -> Result<Vehicle, AppError> {
        let is_available = vehicle.status == "Active";
        let created = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, admin_id, vehicle_code, registration_number, make, model, year,
                vehicle_type, fuel_type, transmission, passenger_capacity, cargo_capacity,
                color, insurance_policy_number, insurance_provider, insurance_expiry,
                status, is_available, group_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle.admin_id)
        .bind(vehicle.vehicle_code)
        .bind(vehicle.registration_number.to_uppercase())
        .bind(vehicle.make)
        .bind(vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.vehicle_type)
        .bind(vehicle.fuel_type)
        .bind(vehicle.transmission)
        .bind(vehicle.passenger_capacity)
        .bind(vehicle.cargo_capacity)
        .bind(vehicle.color)
        .bind(vehicle.insurance_policy_number)
        .bind(vehicle.insurance_provider)
        .bind(vehicle.insurance_expiry)
        .bind(vehicle.status)
        .bind(is_available)
        .bind(vehicle.group_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(&self, id: Uuid, admin_id: Uuid, changes: VehicleChanges) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET registration_number = COALESCE($3, registration_number),
                make = COALESCE($4, make),
                model = COALESCE($5, model),
                year = COALESCE($6, year),
                vehicle_type = COALESCE($7, vehicle_type),
                fuel_type = COALESCE($8, fuel_type),
                transmission = COALESCE($9, transmission),
                passenger_capacity = COALESCE($10, passenger_capacity),
                cargo_capacity = COALESCE($11, cargo_capacity),
                color = COALESCE($12, color),
                insurance_policy_number = COALESCE($13, insurance_policy_number),
                insurance_provider = COALESCE($14, insurance_provider),
                insurance_expiry = COALESCE($15, insurance_expiry),
                status = COALESCE($16, status),
                is_available = COALESCE($17, is_available),
                group_id = CASE WHEN $18 THEN $19 ELSE group_id END,
                updated_at = NOW()
            WHERE id = $1 AND admin_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(admin_id)
        .bind(changes.registration_number.map(|r| r.to_uppercase()))
        .bind(changes.make)
        .bind(changes.model)
        .bind(changes.year)
        .bind(changes.vehicle_type)
        .bind(changes.fuel_type)
        .bind(changes.transmission)
        .bind(changes.passenger_capacity)
        .bind(changes.cargo_capacity)
        .bind(changes.color)
        .bind(changes.insurance_policy_number)
        .bind(changes.insurance_provider)
        .bind(changes.insurance_expiry)
        .bind(changes.status)
        .bind(changes.is_available)
        .bind(changes.group_id.is_some())
        .bind(changes.group_id.flatten())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        Ok(vehicle)
    }

    pub async fn set_status(&self, id: Uuid, admin_id: Uuid, status: &str, is_available: bool) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles SET status = $3, is_available = $4, updated_at = NOW()
            WHERE id = $1 AND admin_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(admin_id)
        .bind(status)
        .bind(is_available)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        Ok(vehicle)
    }

    pub async fn has_trips(&self, id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM trips WHERE vehicle_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn delete(&self, id: Uuid, admin_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn counts(&self, admin_id: Uuid) -> Result<VehicleCounts, AppError> {
        let counts = sqlx::query_as::<_, VehicleCounts>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'Active') AS active,
                   COUNT(*) FILTER (WHERE is_available) AS available
            FROM vehicles WHERE admin_id = $1
            "#,
        )
        .bind(admin_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    /// Recuento por una de las columnas categóricas de `vehicles`
    pub async fn count_by(&self, admin_id: Uuid, column: VehicleCategory) -> Result<Vec<CategoryCount>, AppError> {
        let stats = sqlx::query_as::<_, CategoryCount>(&format!(
            "SELECT {col} AS category, COUNT(*) AS count FROM vehicles WHERE admin_id = $1 \
             GROUP BY {col} ORDER BY count DESC, category",
            col = column.column()
        ))
        .bind(admin_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }

    pub async fn recent(&self, admin_id: Uuid, limit: i64) -> Result<Vec<VehicleSummary>, AppError> {
        let vehicles = sqlx::query_as::<_, VehicleSummary>(
            r#"
            SELECT id, vehicle_code, registration_number, make, model, status, created_at
            FROM vehicles WHERE admin_id = $1
            ORDER BY created_at DESC LIMIT $2
            "#,
        )
        .bind(admin_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum VehicleCategory {
    Status,
    VehicleType,
    FuelType,
}

impl VehicleCategory {
    fn column(self) -> &'static str {
        match self {
            VehicleCategory::Status => "status",
            VehicleCategory::VehicleType => "vehicle_type",
            VehicleCategory::FuelType => "fuel_type",
        }
    }
}
