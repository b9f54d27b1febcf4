// src/middleware/tenancy.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::User,
    models::membership::Role,
};

// Contexto de tenant da requisição, resolvido a partir da empresa ativa
// da sessão do usuário autenticado. Não existe estado ambiente: quem
// precisa do escopo recebe o company_id daqui e passa adiante
// explicitamente.
#[derive(Debug, Clone, Copy)]
pub struct CompanyContext {
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
}

impl<S> FromRequestParts<S> for CompanyContext
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(&parts.headers);
        let app_state = AppState::from_ref(state);

        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale))?;

        let company_id = user
            .company_active
            .ok_or_else(|| AppError::CompanyContextMissing.to_api_error(&locale))?;

        // Vínculo desativado depois da seleção não passa mais por aqui.
        let membership = app_state
            .membership_repo
            .find_by_user_and_company(user.id, company_id)
            .await
            .map_err(|e| e.to_api_error(&locale))?
            .filter(|m| m.is_active)
            .ok_or_else(|| AppError::CompanyContextMissing.to_api_error(&locale))?;

        Ok(CompanyContext {
            company_id,
            user_id: user.id,
            role: membership.role,
        })
    }
}
