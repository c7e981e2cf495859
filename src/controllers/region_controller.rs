//! Region reference-data management

use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::region_dto::{CreateRegionRequest, RegionResponse};
use crate::models::user::Actor;
use crate::repositories::region_repository::RegionRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::ensure_positive;

pub struct RegionController {
    regions: RegionRepository,
}

impl RegionController {
    pub fn new(state: &AppState) -> Self {
        Self {
            regions: RegionRepository::new(state.pool.clone()),
        }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateRegionRequest,
    ) -> Result<ApiResponse<RegionResponse>, AppError> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins may create regions".to_string(),
            ));
        }

        request.validate()?;
        ensure_positive("price_per_kg", request.price_per_kg)?;

        let prefix = request.code_prefix.to_uppercase();
        if self.regions.prefix_exists(&prefix).await? {
            return Err(AppError::Conflict(format!(
                "Region with code prefix '{}' already exists",
                prefix
            )));
        }

        let region = self
            .regions
            .create(&request.name, &prefix, request.price_per_kg)
            .await?;

        Ok(ApiResponse::success_with_message(
            region.into(),
            "Region created successfully".to_string(),
        ))
    }

    pub async fn list(&self) -> Result<Vec<RegionResponse>, AppError> {
        let regions = self.regions.list_active().await?;

        Ok(regions.into_iter().map(RegionResponse::from).collect())
    }
}
