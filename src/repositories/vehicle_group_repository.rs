use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::vehicle_group_dto::{UpdateVehicleGroupRequest, VehicleGroupListQuery, VehicleGroupSummary};
use crate::models::vehicle_group::{VehicleGroup, VehicleGroupWithCount};
use crate::utils::errors::AppError;

const SELECT_WITH_COUNT: &str = r#"
    SELECT g.*, (SELECT COUNT(*) FROM vehicles v WHERE v.group_id = g.id) AS vehicle_count
    FROM vehicle_groups g
"#;

#[derive(Debug, sqlx::FromRow)]
pub struct VehicleGroupCounts {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
}

pub struct VehicleGroupRepository {
    pool: PgPool,
}

impl VehicleGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, admin_id: Uuid, filters: &VehicleGroupListQuery) {
        builder.push(" WHERE g.admin_id = ").push_bind(admin_id);

        if let Some(pattern) = filters.page_query().search_pattern() {
            builder
                .push(" AND (g.group_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR g.description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(is_active) = filters.is_active {
            builder.push(" AND g.is_active = ").push_bind(is_active);
        }
    }

    pub async fn list(
        &self,
        admin_id: Uuid,
        filters: &VehicleGroupListQuery,
    ) -> Result<(Vec<VehicleGroupWithCount>, i64), AppError> {
        let page = filters.page_query();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM vehicle_groups g");
        Self::push_filters(&mut count, admin_id, filters);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(SELECT_WITH_COUNT);
        Self::push_filters(&mut select, admin_id, filters);
        select
            .push(" ORDER BY g.created_at DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let groups = select.build_query_as::<VehicleGroupWithCount>().fetch_all(&self.pool).await?;

        Ok((groups, total))
    }

    pub async fn find_by_id(&self, id: Uuid, admin_id: Uuid) -> Result<Option<VehicleGroup>, AppError> {
        let group = sqlx::query_as::<_, VehicleGroup>("SELECT * FROM vehicle_groups WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(group)
    }

    pub async fn find_with_count(&self, id: Uuid, admin_id: Uuid) -> Result<Option<VehicleGroupWithCount>, AppError> {
        let group = sqlx::query_as::<_, VehicleGroupWithCount>(&format!(
            "{} WHERE g.id = $1 AND g.admin_id = $2",
            SELECT_WITH_COUNT
        ))
        .bind(id)
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Los nombres de grupo son únicos por inquilino
    pub async fn name_exists(&self, admin_id: Uuid, group_name: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM vehicle_groups
                WHERE admin_id = $1 AND LOWER(group_name) = LOWER($2) AND ($3::UUID IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(admin_id)
        .bind(group_name.trim())
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn create(&self, admin_id: Uuid, group_name: &str, description: &str) -> Result<VehicleGroup, AppError> {
        let group = sqlx::query_as::<_, VehicleGroup>(
            r#"
            INSERT INTO vehicle_groups (id, admin_id, group_name, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(admin_id)
        .bind(group_name.trim())
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    pub async fn update(
        &self,
        id: Uuid,
        admin_id: Uuid,
        changes: UpdateVehicleGroupRequest,
    ) -> Result<VehicleGroup, AppError> {
        let group = sqlx::query_as::<_, VehicleGroup>(
            r#"
            UPDATE vehicle_groups
            SET group_name = COALESCE($3, group_name),
                description = COALESCE($4, description),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1 AND admin_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(admin_id)
        .bind(changes.group_name.map(|name| name.trim().to_string()))
        .bind(changes.description)
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle group not found".to_string()))?;

        Ok(group)
    }

    pub async fn toggle_active(&self, id: Uuid, admin_id: Uuid) -> Result<VehicleGroup, AppError> {
        let group = sqlx::query_as::<_, VehicleGroup>(
            r#"
            UPDATE vehicle_groups SET is_active = NOT is_active, updated_at = NOW()
            WHERE id = $1 AND admin_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle group not found".to_string()))?;

        Ok(group)
    }

    pub async fn vehicle_count(&self, id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles WHERE group_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn delete(&self, id: Uuid, admin_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vehicle_groups WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn counts(&self, admin_id: Uuid) -> Result<VehicleGroupCounts, AppError> {
        let counts = sqlx::query_as::<_, VehicleGroupCounts>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE is_active) AS active,
                   COUNT(*) FILTER (WHERE NOT is_active) AS inactive
            FROM vehicle_groups WHERE admin_id = $1
            "#,
        )
        .bind(admin_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn all_with_counts(&self, admin_id: Uuid) -> Result<Vec<VehicleGroupWithCount>, AppError> {
        let groups = sqlx::query_as::<_, VehicleGroupWithCount>(&format!(
            "{} WHERE g.admin_id = $1 ORDER BY vehicle_count DESC, g.group_name",
            SELECT_WITH_COUNT
        ))
        .bind(admin_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    pub async fn recent(&self, admin_id: Uuid, limit: i64) -> Result<Vec<VehicleGroupSummary>, AppError> {
        let groups = sqlx::query_as::<_, VehicleGroupSummary>(
            r#"
            SELECT id, group_name, description, is_active, created_at
            FROM vehicle_groups WHERE admin_id = $1
            ORDER BY created_at DESC LIMIT $2
            "#,
        )
        .bind(admin_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }
}
