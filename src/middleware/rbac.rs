// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::CompanyContext},
};

// O trait que define o que é uma permissão exigível por rota.
pub trait PermissionDef: Send + Sync + 'static {
    fn codename() -> &'static str;
}

// O extrator guardião: resolve o contexto de empresa e verifica no banco
// se o usuário tem a permissão. Owner e admin passam direto.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(&parts.headers);
        let context = CompanyContext::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let codename = T::codename();
        let has_permission = app_state
            .membership_repo
            .user_has_permission(context.user_id, context.company_id, codename)
            .await
            .map_err(|e| e.to_api_error(&locale))?;

        if !has_permission {
            return Err(AppError::PermissionDenied(codename.to_string()).to_api_error(&locale));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// Permissões do sistema (espelham as linhas semeadas em `permissions`)
// ---

pub struct PermUsersManage;
impl PermissionDef for PermUsersManage {
    fn codename() -> &'static str {
        "users_manage"
    }
}

pub struct PermCompaniesManage;
impl PermissionDef for PermCompaniesManage {
    fn codename() -> &'static str {
        "companies_manage"
    }
}

pub struct PermCatalogManage;
impl PermissionDef for PermCatalogManage {
    fn codename() -> &'static str {
        "catalog_manage"
    }
}

pub struct PermPartnersManage;
impl PermissionDef for PermPartnersManage {
    fn codename() -> &'static str {
        "partners_manage"
    }
}
