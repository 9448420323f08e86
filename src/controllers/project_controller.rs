use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::project_dto::{CreateProjectRequest, ProjectListQuery, ProjectStatsResponse, UpdateProjectRequest};
use crate::models::project::Project;
use crate::repositories::project_repository::{NewProject, ProjectRepository};
use crate::utils::codes::{sequential_code, PROJECT_PREFIX};
use crate::utils::errors::{not_found_error, validation_error, AppError};
use crate::utils::validation::validate_date_range;

const DEFAULT_STATUS: &str = "Active";
const RECENT_LIMIT: i64 = 5;

pub struct ProjectController {
    repository: ProjectRepository,
}

impl ProjectController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ProjectRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        admin_id: Uuid,
        query: ProjectListQuery,
    ) -> Result<ApiResponse<PaginatedResponse<Project>>, AppError> {
        let (projects, total) = self.repository.list(admin_id, &query).await?;
        Ok(ApiResponse::success(PaginatedResponse::new(projects, &query.page_query(), total)))
    }

    pub async fn stats(&self, admin_id: Uuid) -> Result<ApiResponse<ProjectStatsResponse>, AppError> {
        let (counts, type_stats, recent_projects) = futures::try_join!(
            self.repository.counts(admin_id),
            self.repository.type_stats(admin_id),
            self.repository.recent(admin_id, RECENT_LIMIT),
        )?;

        Ok(ApiResponse::success(ProjectStatsResponse {
            total_projects: counts.total,
            active_projects: counts.active,
            completed_projects: counts.completed,
            on_hold_projects: counts.on_hold,
            type_stats,
            recent_projects,
        }))
    }

    pub async fn get_by_id(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<Project>, AppError> {
        let project = self
            .repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Project"))?;

        Ok(ApiResponse::success(project))
    }

    pub async fn create(&self, admin_id: Uuid, request: CreateProjectRequest) -> Result<ApiResponse<Project>, AppError> {
        if validate_date_range(request.start_date, request.end_date).is_err() {
            return Err(validation_error("end_date", "End date cannot be before start date"));
        }

        let number = self.repository.next_code_number().await?;
        let project = self
            .repository
            .create(NewProject {
                admin_id,
                project_code: sequential_code(PROJECT_PREFIX, number, 2),
                customer_name: request.customer_name.trim().to_string(),
                company_name: request.company_name.trim().to_string(),
                project_name: request.project_name.trim().to_string(),
                place: request.place.trim().to_string(),
                project_type: request.project_type,
                rate: request.rate,
                start_date: request.start_date,
                end_date: request.end_date,
                status: request.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
                description: request.description,
            })
            .await?;

        info!(
            "📋 Proyecto creado: {} ({}, tarifa {})",
            project.project_code, project.project_type, project.rate
        );
        Ok(ApiResponse::success_with_message(project, "Project created successfully"))
    }

    pub async fn update(
        &self,
        id: Uuid,
        admin_id: Uuid,
        request: UpdateProjectRequest,
    ) -> Result<ApiResponse<Project>, AppError> {
        let current = self
            .repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Project"))?;

        // El rango se comprueba con las fechas resultantes
        let start_date = request.start_date.unwrap_or(current.start_date);
        let end_date = request.end_date.unwrap_or(current.end_date);
        if validate_date_range(start_date, end_date).is_err() {
            return Err(validation_error("end_date", "End date cannot be before start date"));
        }

        let project = self.repository.update(id, admin_id, request).await?;
        Ok(ApiResponse::success_with_message(project, "Project updated successfully"))
    }

    pub async fn delete(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<()>, AppError> {
        let project = self
            .repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Project"))?;

        if self.repository.has_trips(id).await? {
            return Err(AppError::Conflict(
                "Project has trips and cannot be deleted".to_string(),
            ));
        }

        self.repository.delete(id, admin_id).await?;
        info!("🗑️ Proyecto eliminado: {}", project.project_code);
        Ok(ApiResponse::message("Project deleted successfully"))
    }

    /// Active ↔ Completed
    pub async fn toggle_status(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<Project>, AppError> {
        let project = self
            .repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Project"))?;

        let status = if project.status == "Active" { "Completed" } else { "Active" };
        let project = self.repository.set_status(id, admin_id, status).await?;

        Ok(ApiResponse::success_with_message(
            project,
            format!("Project status changed to {}", status),
        ))
    }
}
