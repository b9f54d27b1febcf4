// src/handlers/users.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermUsersManage, RequirePermission},
        tenancy::CompanyContext,
    },
    models::api::ListParams,
    models::auth::{ChangePasswordPayload, SelectCompanyPayload, User},
    models::company::Company,
    models::membership::{
        CreateMembershipPayload, Membership, MembershipDetail, Permission,
        UpdateMembershipPayload,
    },
};

// ---
// Perfil do usuário autenticado
// ---

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses((status = 200, description = "Usuário autenticado", body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

// PUT /api/users/me/password
#[utoipa::path(
    put,
    path = "/api/users/me/password",
    tag = "Users",
    request_body = ChangePasswordPayload,
    responses((status = 204, description = "Senha alterada")),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<StatusCode, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    app_state
        .auth_service
        .change_password(
            user.id,
            &payload.current_password,
            &payload.new_password,
            &payload.new_password_confirm,
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/users/me/companies
#[utoipa::path(
    get,
    path = "/api/users/me/companies",
    tag = "Users",
    responses((status = 200, description = "Empresas do usuário", body = [Company])),
    security(("api_jwt" = []))
)]
pub async fn get_my_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<Company>>, ApiError> {
    let companies = app_state
        .company_service
        .list_for_user(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(companies))
}

// PUT /api/users/me/company
#[utoipa::path(
    put,
    path = "/api/users/me/company",
    tag = "Users",
    request_body = SelectCompanyPayload,
    responses((status = 204, description = "Empresa ativa alterada")),
    security(("api_jwt" = []))
)]
pub async fn select_company(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SelectCompanyPayload>,
) -> Result<StatusCode, ApiError> {
    app_state
        .company_service
        .switch_active(user.id, payload.company_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Gestão de membros da empresa ativa
// ---

// GET /api/memberships
#[utoipa::path(
    get,
    path = "/api/memberships",
    tag = "Memberships",
    params(ListParams),
    responses((status = 200, description = "Membros da empresa")),
    security(("api_jwt" = []))
)]
pub async fn list_memberships(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermUsersManage>,
    Query(params): Query<ListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let page = app_state
        .membership_service
        .list(context.company_id, &params)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(page))
}

// POST /api/memberships
#[utoipa::path(
    post,
    path = "/api/memberships",
    tag = "Memberships",
    request_body = CreateMembershipPayload,
    responses((status = 201, description = "Membro criado", body = Membership)),
    security(("api_jwt" = []))
)]
pub async fn create_membership(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermUsersManage>,
    Json(payload): Json<CreateMembershipPayload>,
) -> Result<(StatusCode, Json<Membership>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let membership = app_state
        .membership_service
        .create(context.company_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(membership)))
}

// GET /api/memberships/{id}
#[utoipa::path(
    get,
    path = "/api/memberships/{id}",
    tag = "Memberships",
    params(("id" = Uuid, Path, description = "ID do vínculo")),
    responses((status = 200, description = "Detalhe do membro", body = MembershipDetail)),
    security(("api_jwt" = []))
)]
pub async fn get_membership(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermUsersManage>,
    Path(id): Path<Uuid>,
) -> Result<Json<MembershipDetail>, ApiError> {
    let detail = app_state
        .membership_service
        .detail(context.company_id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(detail))
}

// PUT /api/memberships/{id}
#[utoipa::path(
    put,
    path = "/api/memberships/{id}",
    tag = "Memberships",
    params(("id" = Uuid, Path, description = "ID do vínculo")),
    request_body = UpdateMembershipPayload,
    responses((status = 200, description = "Membro atualizado", body = Membership)),
    security(("api_jwt" = []))
)]
pub async fn update_membership(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermUsersManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMembershipPayload>,
) -> Result<Json<Membership>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let membership = app_state
        .membership_service
        .update(context.company_id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(membership))
}

// POST /api/memberships/{id}/deactivate
#[utoipa::path(
    post,
    path = "/api/memberships/{id}/deactivate",
    tag = "Memberships",
    params(("id" = Uuid, Path, description = "ID do vínculo")),
    responses((status = 204, description = "Membro desativado")),
    security(("api_jwt" = []))
)]
pub async fn deactivate_membership(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermUsersManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .membership_service
        .deactivate(context.company_id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/memberships/{id}/reactivate
#[utoipa::path(
    post,
    path = "/api/memberships/{id}/reactivate",
    tag = "Memberships",
    params(("id" = Uuid, Path, description = "ID do vínculo")),
    responses((status = 204, description = "Membro reativado")),
    security(("api_jwt" = []))
)]
pub async fn reactivate_membership(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermUsersManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .membership_service
        .reactivate(context.company_id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/permissions
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "Memberships",
    responses((status = 200, description = "Permissões disponíveis", body = [Permission])),
    security(("api_jwt" = []))
)]
pub async fn list_permissions(
    State(app_state): State<AppState>,
    locale: Locale,
    _context: CompanyContext,
) -> Result<Json<Vec<Permission>>, ApiError> {
    let permissions = app_state
        .membership_service
        .list_permissions()
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(permissions))
}
