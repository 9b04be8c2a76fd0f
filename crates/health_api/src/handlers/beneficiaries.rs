use super::{json_body, path_id, query_params, send};
use crate::requests::{BeneficiaryListParams, CreateBeneficiaryRequest, UpdateBeneficiaryRequest};
use crate::response::{self, ApiError};
use crate::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use health_core::service::beneficiaries::{DeleteBeneficiaryCommand, GetBeneficiaryByIdQuery};

/// `POST /api/health-plans/:id/beneficiaries`
pub async fn create_beneficiary(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
    body: Result<Json<CreateBeneficiaryRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let plan_id = path_id(&plan_id)?;
    let command = json_body(body)?.into_command(plan_id);
    let created = send(&state.mediator, command).await?;
    Ok(response::created(
        format!("api/beneficiaries/{}", created.id),
        created,
    ))
}

/// `GET /api/health-plans/:id/beneficiaries`
pub async fn list_beneficiaries(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
    params: Result<Query<BeneficiaryListParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let plan_id = path_id(&plan_id)?;
    let query = query_params(params)?.into_query(plan_id);
    let page = send(&state.mediator, query).await?;
    Ok(response::ok(page))
}

pub async fn get_beneficiary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = path_id(&id)?;
    let view = send(&state.mediator, GetBeneficiaryByIdQuery { id }).await?;
    Ok(response::ok(view))
}

pub async fn update_beneficiary(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateBeneficiaryRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = path_id(&id)?;
    let command = json_body(body)?.into_command(id);
    let view = send(&state.mediator, command).await?;
    Ok(response::ok(view))
}

pub async fn delete_beneficiary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let beneficiary_id = path_id(&id)?;
    let deleted = send(&state.mediator, DeleteBeneficiaryCommand { beneficiary_id }).await?;
    Ok(response::ok(deleted))
}
