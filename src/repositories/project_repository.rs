use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common_dto::CategoryCount;
use crate::dto::project_dto::{ProjectListQuery, ProjectSummary, UpdateProjectRequest};
use crate::models::project::{Project, ProjectType};
use crate::services::settlement::BillingTerms;
use crate::utils::errors::AppError;

pub struct NewProject {
    pub admin_id: Uuid,
    pub project_code: String,
    pub customer_name: String,
    pub company_name: String,
    pub project_name: String,
    pub place: String,
    pub project_type: ProjectType,
    pub rate: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub description: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ProjectCounts {
    pub total: i64,
    pub active: i64,
    pub completed: i64,
    pub on_hold: i64,
}

pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, admin_id: Uuid, filters: &ProjectListQuery) {
        builder.push(" WHERE admin_id = ").push_bind(admin_id);

        if let Some(pattern) = filters.page_query().search_pattern() {
            builder.push(" AND (");
            let mut columns = builder.separated(" OR ");
            for column in ["project_code", "project_name", "customer_name", "company_name", "place"] {
                columns.push(format!("{} ILIKE ", column));
                columns.push_bind_unseparated(pattern.clone());
            }
            builder.push(")");
        }
        if let Some(status) = filters.status.as_deref().filter(|s| !s.is_empty()) {
            builder.push(" AND status = ").push_bind(status.to_string());
        }
        if let Some(project_type) = filters.project_type {
            builder.push(" AND project_type = ").push_bind(project_type);
        }
    }

    pub async fn list(&self, admin_id: Uuid, filters: &ProjectListQuery) -> Result<(Vec<Project>, i64), AppError> {
        let page = filters.page_query();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM projects");
        Self::push_filters(&mut count, admin_id, filters);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM projects");
        Self::push_filters(&mut select, admin_id, filters);
        select
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let projects = select.build_query_as::<Project>().fetch_all(&self.pool).await?;

        Ok((projects, total))
    }

    pub async fn find_by_id(&self, id: Uuid, admin_id: Uuid) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(project)
    }

    pub async fn find_by_admin(&self, admin_id: Uuid, status: Option<&str>) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT * FROM projects
            WHERE admin_id = $1 AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(admin_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    /// Condiciones de facturación de todos los proyectos del inquilino
    pub async fn billing_terms_map(&self, admin_id: Uuid) -> Result<HashMap<Uuid, BillingTerms>, AppError> {
        let rows: Vec<(Uuid, ProjectType, Decimal)> =
            sqlx::query_as("SELECT id, project_type, rate FROM projects WHERE admin_id = $1")
                .bind(admin_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, project_type, rate)| (id, BillingTerms { project_type, rate }))
            .collect())
    }

    pub async fn next_code_number(&self) -> Result<i64, AppError> {
        super::next_code_number(&self.pool, "projects", "project_code", "PRJ").await
    }

    pub async fn create(&self, project: NewProject) -> Result<Project, AppError> {
        let created = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                id, admin_id, project_code, customer_name, company_name, project_name, place,
                project_type, rate, start_date, end_date, status, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(project.admin_id)
        .bind(project.project_code)
        .bind(project.customer_name)
        .bind(project.company_name)
        .bind(project.project_name)
        .bind(project.place)
        .bind(project.project_type)
        .bind(project.rate)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.status)
        .bind(project.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(&self, id: Uuid, admin_id: Uuid, changes: UpdateProjectRequest) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET customer_name = COALESCE($3, customer_name),
                company_name = COALESCE($4, company_name),
                project_name = COALESCE($5, project_name),
                place = COALESCE($6, place),
                project_type = COALESCE($7, project_type),
                rate = COALESCE($8, rate),
                start_date = COALESCE($9, start_date),
                end_date = COALESCE($10, end_date),
                status = COALESCE($11, status),
                description = COALESCE($12, description),
                updated_at = NOW()
            WHERE id = $1 AND admin_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(admin_id)
        .bind(changes.customer_name)
        .bind(changes.company_name)
        .bind(changes.project_name)
        .bind(changes.place)
        .bind(changes.project_type)
        .bind(changes.rate)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(changes.status)
        .bind(changes.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

        Ok(project)
    }

    pub async fn set_status(&self, id: Uuid, admin_id: Uuid, status: &str) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET status = $3, updated_at = NOW()
            WHERE id = $1 AND admin_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(admin_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

        Ok(project)
    }

    pub async fn has_trips(&self, id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM trips WHERE project_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn delete(&self, id: Uuid, admin_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn counts(&self, admin_id: Uuid) -> Result<ProjectCounts, AppError> {
        let counts = sqlx::query_as::<_, ProjectCounts>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'Active') AS active,
                   COUNT(*) FILTER (WHERE status = 'Completed') AS completed,
                   COUNT(*) FILTER (WHERE status = 'On Hold') AS on_hold
            FROM projects WHERE admin_id = $1
            "#,
        )
        .bind(admin_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn type_stats(&self, admin_id: Uuid) -> Result<Vec<CategoryCount>, AppError> {
        let stats = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT project_type::TEXT AS category, COUNT(*) AS count
            FROM projects WHERE admin_id = $1
            GROUP BY project_type ORDER BY count DESC, category
            "#,
        )
        .bind(admin_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }

    pub async fn recent(&self, admin_id: Uuid, limit: i64) -> Result<Vec<ProjectSummary>, AppError> {
        let projects = sqlx::query_as::<_, ProjectSummary>(
            r#"
            SELECT id, project_code, project_name, customer_name, status, created_at
            FROM projects WHERE admin_id = $1
            ORDER BY created_at DESC LIMIT $2
            "#,
        )
        .bind(admin_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }
}
