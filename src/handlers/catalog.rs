// src/handlers/catalog.rs

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
        rbac::{PermCatalogManage, RequirePermission},
        tenancy::CompanyContext,
    },
    models::api::ListParams,
    models::catalog::{
        Category, CategoryPayload, Product, ProductDataPayload, ProductFiscalData,
        ProductTaxPayload, Unit, UnitPayload,
    },
    services::ProductStep,
};

// ---
// Categorias
// ---

// POST /api/inventory/categories
#[utoipa::path(
    post,
    path = "/api/inventory/categories",
    tag = "Catalog",
    request_body = CategoryPayload,
    responses((status = 201, description = "Categoria criada", body = Category)),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let category = app_state
        .catalog_service
        .create_category(context.company_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok((StatusCode::CREATED, Json(category)))
}

// GET /api/inventory/categories
#[utoipa::path(
    get,
    path = "/api/inventory/categories",
    tag = "Catalog",
    params(ListParams),
    responses((status = 200, description = "Categorias da empresa")),
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .catalog_service
        .list_categories(context.company_id, &params)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(page))
}

// GET /api/inventory/categories/{id}
#[utoipa::path(
    get,
    path = "/api/inventory/categories/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses((status = 200, description = "Categoria", body = Category)),
    security(("api_jwt" = []))
)]
pub async fn get_category(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>, ApiError> {
    let category = app_state
        .catalog_service
        .get_category(context.company_id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(category))
}

// PUT /api/inventory/categories/{id}
#[utoipa::path(
    put,
    path = "/api/inventory/categories/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    request_body = CategoryPayload,
    responses((status = 200, description = "Categoria atualizada", body = Category)),
    security(("api_jwt" = []))
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let category = app_state
        .catalog_service
        .update_category(context.company_id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(category))
}

// POST /api/inventory/categories/{id}/deactivate
#[utoipa::path(
    post,
    path = "/api/inventory/categories/{id}/deactivate",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses((status = 204, description = "Categoria desativada")),
    security(("api_jwt" = []))
)]
pub async fn deactivate_category(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .catalog_service
        .set_category_active(context.company_id, id, false)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/inventory/categories/{id}/reactivate
#[utoipa::path(
    post,
    path = "/api/inventory/categories/{id}/reactivate",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses((status = 204, description = "Categoria reativada")),
    security(("api_jwt" = []))
)]
pub async fn reactivate_category(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .catalog_service
        .set_category_active(context.company_id, id, true)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Unidades de medida
// ---

// POST /api/inventory/units
#[utoipa::path(
    post,
    path = "/api/inventory/units",
    tag = "Catalog",
    request_body = UnitPayload,
    responses((status = 201, description = "Unidade criada", body = Unit)),
    security(("api_jwt" = []))
)]
pub async fn create_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Json(payload): Json<UnitPayload>,
) -> Result<(StatusCode, Json<Unit>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let unit = app_state
        .catalog_service
        .create_unit(context.company_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok((StatusCode::CREATED, Json(unit)))
}

// GET /api/inventory/units
#[utoipa::path(
    get,
    path = "/api/inventory/units",
    tag = "Catalog",
    params(ListParams),
    responses((status = 200, description = "Unidades da empresa")),
    security(("api_jwt" = []))
)]
pub async fn list_units(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .catalog_service
        .list_units(context.company_id, &params)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(page))
}

// GET /api/inventory/units/{id}
#[utoipa::path(
    get,
    path = "/api/inventory/units/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses((status = 200, description = "Unidade", body = Unit)),
    security(("api_jwt" = []))
)]
pub async fn get_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Path(id): Path<Uuid>,
) -> Result<Json<Unit>, ApiError> {
    let unit = app_state
        .catalog_service
        .get_unit(context.company_id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(unit))
}

// PUT /api/inventory/units/{id}
#[utoipa::path(
    put,
    path = "/api/inventory/units/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    request_body = UnitPayload,
    responses((status = 200, description = "Unidade atualizada", body = Unit)),
    security(("api_jwt" = []))
)]
pub async fn update_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UnitPayload>,
) -> Result<Json<Unit>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let unit = app_state
        .catalog_service
        .update_unit(context.company_id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(unit))
}

// POST /api/inventory/units/{id}/deactivate
#[utoipa::path(
    post,
    path = "/api/inventory/units/{id}/deactivate",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses((status = 204, description = "Unidade desativada")),
    security(("api_jwt" = []))
)]
pub async fn deactivate_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .catalog_service
        .set_unit_active(context.company_id, id, false)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/inventory/units/{id}/reactivate
#[utoipa::path(
    post,
    path = "/api/inventory/units/{id}/reactivate",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses((status = 204, description = "Unidade reativada")),
    security(("api_jwt" = []))
)]
pub async fn reactivate_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .catalog_service
        .set_unit_active(context.company_id, id, true)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Produtos (wizard: dados + impostos)
// ---

// POST /api/inventory/products
#[utoipa::path(
    post,
    path = "/api/inventory/products",
    tag = "Catalog",
    request_body = ProductDataPayload,
    responses((status = 201, description = "Produto criado", body = Product)),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Json(payload): Json<ProductDataPayload>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let product = app_state
        .catalog_service
        .apply_product_step(context.company_id, None, ProductStep::Data(payload))
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok((StatusCode::CREATED, Json(product)))
}

// PUT /api/inventory/products/{id}/data
#[utoipa::path(
    put,
    path = "/api/inventory/products/{id}/data",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = ProductDataPayload,
    responses((status = 200, description = "Dados do produto atualizados", body = Product)),
    security(("api_jwt" = []))
)]
pub async fn update_product_data(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductDataPayload>,
) -> Result<Json<Product>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let product = app_state
        .catalog_service
        .apply_product_step(context.company_id, Some(id), ProductStep::Data(payload))
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(product))
}

// PUT /api/inventory/products/{id}/tax
#[utoipa::path(
    put,
    path = "/api/inventory/products/{id}/tax",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = ProductTaxPayload,
    responses((status = 200, description = "Dados fiscais salvos", body = Product)),
    security(("api_jwt" = []))
)]
pub async fn update_product_tax(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductTaxPayload>,
) -> Result<Json<Product>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let product = app_state
        .catalog_service
        .apply_product_step(context.company_id, Some(id), ProductStep::Tax(payload))
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(product))
}

// GET /api/inventory/products
#[utoipa::path(
    get,
    path = "/api/inventory/products",
    tag = "Catalog",
    params(ListParams),
    responses((status = 200, description = "Produtos da empresa")),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .catalog_service
        .list_products(context.company_id, &params)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(page))
}

// GET /api/inventory/products/{id}
#[utoipa::path(
    get,
    path = "/api/inventory/products/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses((status = 200, description = "Produto", body = Product)),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    let product = app_state
        .catalog_service
        .get_product(context.company_id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(product))
}

// GET /api/inventory/products/{id}/tax
#[utoipa::path(
    get,
    path = "/api/inventory/products/{id}/tax",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses((status = 200, description = "Dados fiscais do produto", body = ProductFiscalData)),
    security(("api_jwt" = []))
)]
pub async fn get_product_tax(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<ProductFiscalData>>, ApiError> {
    let fiscal = app_state
        .catalog_service
        .get_product_fiscal_data(context.company_id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(fiscal))
}

// POST /api/inventory/products/{id}/deactivate
#[utoipa::path(
    post,
    path = "/api/inventory/products/{id}/deactivate",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses((status = 204, description = "Produto desativado")),
    security(("api_jwt" = []))
)]
pub async fn deactivate_product(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .catalog_service
        .set_product_active(context.company_id, id, false)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/inventory/products/{id}/reactivate
#[utoipa::path(
    post,
    path = "/api/inventory/products/{id}/reactivate",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses((status = 204, description = "Produto reativado")),
    security(("api_jwt" = []))
)]
pub async fn reactivate_product(
    State(app_state): State<AppState>,
    locale: Locale,
    context: CompanyContext,
    _guard: RequirePermission<PermCatalogManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .catalog_service
        .set_product_active(context.company_id, id, true)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}
