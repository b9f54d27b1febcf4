// src/handlers/partners.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermPartnersManage, RequirePermission},
        tenancy::CompanyContext,
    },
    models::api::ListParams,
    models::company::{Address, AddressPayload},
    models::partners::{
        Customer, CustomerAdvancedPayload, PartnerBasicPayload, Supplier, SupplierAdvancedPayload,
    },
    services::{CustomerStep, SupplierStep},
};

// ---
// Clientes (wizard: basic, advanced, address)
// ---

// POST /api/partners/customers/basic
#[utoipa::path(
    post,
    path = "/api/partners/customers/basic",
    tag = "Partners",
    request_body = PartnerBasicPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 400, description = "CPF/CNPJ inválido ou duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Json(payload): Json<PartnerBasicPayload>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let customer = app_state
        .partner_service
        .apply_customer_step(context.company_id, None, CustomerStep::Basic(payload))
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok((StatusCode::CREATED, Json(customer)))
}

// PUT /api/partners/customers/{id}/basic
#[utoipa::path(
    put,
    path = "/api/partners/customers/{id}/basic",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = PartnerBasicPayload,
    responses((status = 200, description = "Identidade atualizada", body = Customer)),
    security(("api_jwt" = []))
)]
pub async fn update_customer_basic(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PartnerBasicPayload>,
) -> Result<Json<Customer>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let customer = app_state
        .partner_service
        .apply_customer_step(context.company_id, Some(id), CustomerStep::Basic(payload))
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(customer))
}

// PUT /api/partners/customers/{id}/advanced
#[utoipa::path(
    put,
    path = "/api/partners/customers/{id}/advanced",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = CustomerAdvancedPayload,
    responses((status = 200, description = "Dados avançados salvos", body = Customer)),
    security(("api_jwt" = []))
)]
pub async fn update_customer_advanced(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerAdvancedPayload>,
) -> Result<Json<Customer>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let customer = app_state
        .partner_service
        .apply_customer_step(context.company_id, Some(id), CustomerStep::Advanced(payload))
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(customer))
}

// PUT /api/partners/customers/{id}/address
#[utoipa::path(
    put,
    path = "/api/partners/customers/{id}/address",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = AddressPayload,
    responses((status = 200, description = "Endereço salvo", body = Customer)),
    security(("api_jwt" = []))
)]
pub async fn update_customer_address(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddressPayload>,
) -> Result<Json<Customer>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let customer = app_state
        .partner_service
        .apply_customer_step(context.company_id, Some(id), CustomerStep::Address(payload))
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(customer))
}

// GET /api/partners/customers
#[utoipa::path(
    get,
    path = "/api/partners/customers",
    tag = "Partners",
    params(ListParams),
    responses((status = 200, description = "Clientes da empresa")),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .partner_service
        .list_customers(context.company_id, &params)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(page))
}

// GET /api/partners/customers/{id}
#[utoipa::path(
    get,
    path = "/api/partners/customers/{id}",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 200, description = "Cliente", body = Customer)),
    security(("api_jwt" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, ApiError> {
    let customer = app_state
        .partner_service
        .get_customer(context.company_id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(customer))
}

// GET /api/partners/customers/{id}/address
#[utoipa::path(
    get,
    path = "/api/partners/customers/{id}/address",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 200, description = "Endereço do cliente", body = Address)),
    security(("api_jwt" = []))
)]
pub async fn get_customer_address(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<Address>>, ApiError> {
    let address = app_state
        .partner_service
        .get_customer_address(context.company_id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(address))
}

// POST /api/partners/customers/{id}/deactivate
#[utoipa::path(
    post,
    path = "/api/partners/customers/{id}/deactivate",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 204, description = "Cliente desativado")),
    security(("api_jwt" = []))
)]
pub async fn deactivate_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .partner_service
        .set_customer_active(context.company_id, id, false)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/partners/customers/{id}/reactivate
#[utoipa::path(
    post,
    path = "/api/partners/customers/{id}/reactivate",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 204, description = "Cliente reativado")),
    security(("api_jwt" = []))
)]
pub async fn reactivate_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .partner_service
        .set_customer_active(context.company_id, id, true)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Fornecedores (mesmo wizard, com passo avançado próprio)
// ---

// POST /api/partners/suppliers/basic
#[utoipa::path(
    post,
    path = "/api/partners/suppliers/basic",
    tag = "Partners",
    request_body = PartnerBasicPayload,
    responses(
        (status = 201, description = "Fornecedor criado", body = Supplier),
        (status = 400, description = "CPF/CNPJ inválido ou duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Json(payload): Json<PartnerBasicPayload>,
) -> Result<(StatusCode, Json<Supplier>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let supplier = app_state
        .partner_service
        .apply_supplier_step(context.company_id, None, SupplierStep::Basic(payload))
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

// PUT /api/partners/suppliers/{id}/basic
#[utoipa::path(
    put,
    path = "/api/partners/suppliers/{id}/basic",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    request_body = PartnerBasicPayload,
    responses((status = 200, description = "Identidade atualizada", body = Supplier)),
    security(("api_jwt" = []))
)]
pub async fn update_supplier_basic(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PartnerBasicPayload>,
) -> Result<Json<Supplier>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let supplier = app_state
        .partner_service
        .apply_supplier_step(context.company_id, Some(id), SupplierStep::Basic(payload))
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(supplier))
}

// PUT /api/partners/suppliers/{id}/advanced
#[utoipa::path(
    put,
    path = "/api/partners/suppliers/{id}/advanced",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    request_body = SupplierAdvancedPayload,
    responses((status = 200, description = "Dados avançados salvos", body = Supplier)),
    security(("api_jwt" = []))
)]
pub async fn update_supplier_advanced(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SupplierAdvancedPayload>,
) -> Result<Json<Supplier>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let supplier = app_state
        .partner_service
        .apply_supplier_step(context.company_id, Some(id), SupplierStep::Advanced(payload))
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(supplier))
}

// PUT /api/partners/suppliers/{id}/address
#[utoipa::path(
    put,
    path = "/api/partners/suppliers/{id}/address",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    request_body = AddressPayload,
    responses((status = 200, description = "Endereço salvo", body = Supplier)),
    security(("api_jwt" = []))
)]
pub async fn update_supplier_address(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddressPayload>,
) -> Result<Json<Supplier>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let supplier = app_state
        .partner_service
        .apply_supplier_step(context.company_id, Some(id), SupplierStep::Address(payload))
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(supplier))
}

// GET /api/partners/suppliers
#[utoipa::path(
    get,
    path = "/api/partners/suppliers",
    tag = "Partners",
    params(ListParams),
    responses((status = 200, description = "Fornecedores da empresa")),
    security(("api_jwt" = []))
)]
pub async fn list_suppliers(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .partner_service
        .list_suppliers(context.company_id, &params)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(page))
}

// GET /api/partners/suppliers/{id}
#[utoipa::path(
    get,
    path = "/api/partners/suppliers/{id}",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    responses((status = 200, description = "Fornecedor", body = Supplier)),
    security(("api_jwt" = []))
)]
pub async fn get_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Path(id): Path<Uuid>,
) -> Result<Json<Supplier>, ApiError> {
    let supplier = app_state
        .partner_service
        .get_supplier(context.company_id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(supplier))
}

// GET /api/partners/suppliers/{id}/address
#[utoipa::path(
    get,
    path = "/api/partners/suppliers/{id}/address",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    responses((status = 200, description = "Endereço do fornecedor", body = Address)),
    security(("api_jwt" = []))
)]
pub async fn get_supplier_address(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<Address>>, ApiError> {
    let address = app_state
        .partner_service
        .get_supplier_address(context.company_id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(address))
}

// POST /api/partners/suppliers/{id}/deactivate
#[utoipa::path(
    post,
    path = "/api/partners/suppliers/{id}/deactivate",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    responses((status = 204, description = "Fornecedor desativado")),
    security(("api_jwt" = []))
)]
pub async fn deactivate_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .partner_service
        .set_supplier_active(context.company_id, id, false)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/partners/suppliers/{id}/reactivate
#[utoipa::path(
    post,
    path = "/api/partners/suppliers/{id}/reactivate",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    responses((status = 204, description = "Fornecedor reativado")),
    security(("api_jwt" = []))
)]
pub async fn reactivate_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermPartnersManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .partner_service
        .set_supplier_active(context.company_id, id, true)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}
