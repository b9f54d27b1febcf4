// src/handlers/company.rs

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermCompaniesManage, RequirePermission},
        tenancy::CompanyContext,
    },
    models::company::{Company, CompanySetupPayload, CompanyUpdatePayload},
};

// POST /api/companies/setup
//
// Fundação da conta: o usuário recém-cadastrado cria a empresa, o
// estabelecimento matriz e vira OWNER, tudo em uma transação.
#[utoipa::path(
    post,
    path = "/api/companies/setup",
    tag = "Companies",
    request_body = CompanySetupPayload,
    responses(
        (status = 201, description = "Empresa criada", body = Company),
        (status = 400, description = "Slug ou CNPJ já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn setup_company(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CompanySetupPayload>,
) -> Result<(StatusCode, Json<Company>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let company = app_state
        .company_service
        .setup(user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(company)))
}

// GET /api/companies/current
#[utoipa::path(
    get,
    path = "/api/companies/current",
    tag = "Companies",
    responses((status = 200, description = "Empresa ativa da sessão", body = Company)),
    security(("api_jwt" = []))
)]
pub async fn get_current_company(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
) -> Result<Json<Company>, ApiError> {
    let company = app_state
        .company_service
        .current(context.company_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(company))
}

// PUT /api/companies/current
#[utoipa::path(
    put,
    path = "/api/companies/current",
    tag = "Companies",
    request_body = CompanyUpdatePayload,
    responses((status = 200, description = "Empresa atualizada", body = Company)),
    security(("api_jwt" = []))
)]
pub async fn update_current_company(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCompaniesManage>,
    Json(payload): Json<CompanyUpdatePayload>,
) -> Result<Json<Company>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let company = app_state
        .company_service
        .update(context.company_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(company))
}
