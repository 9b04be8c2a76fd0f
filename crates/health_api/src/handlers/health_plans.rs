use super::{json_body, path_id, query_params, send};
use crate::requests::{CreateHealthPlanRequest, HealthPlanListParams, UpdateHealthPlanRequest};
use crate::response::{self, ApiError};
use crate::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use health_core::service::health_plans::{
    CreateHealthPlanCommand, DeleteHealthPlanCommand, GetHealthPlanByIdQuery, GetHealthPlansQuery,
};

pub async fn create_health_plan(
    State(state): State<AppState>,
    body: Result<Json<CreateHealthPlanRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let command = CreateHealthPlanCommand::from(json_body(body)?);
    let created = send(&state.mediator, command).await?;
    Ok(response::created(
        format!("api/health-plans/{}", created.id),
        created,
    ))
}

pub async fn list_health_plans(
    State(state): State<AppState>,
    params: Result<Query<HealthPlanListParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let query = GetHealthPlansQuery::from(query_params(params)?);
    let page = send(&state.mediator, query).await?;
    Ok(response::ok(page))
}

pub async fn get_health_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = path_id(&id)?;
    let details = send(&state.mediator, GetHealthPlanByIdQuery { id }).await?;
    Ok(response::ok(details))
}

pub async fn update_health_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateHealthPlanRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = path_id(&id)?;
    let command = json_body(body)?.into_command(id);
    let updated = send(&state.mediator, command).await?;
    Ok(response::ok(updated))
}

pub async fn delete_health_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let health_plan_id = path_id(&id)?;
    let deleted = send(&state.mediator, DeleteHealthPlanCommand { health_plan_id }).await?;
    Ok(response::ok(deleted))
}
