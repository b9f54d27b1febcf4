// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

use crate::common::i18n;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro de negócio, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // Qualquer registro fora da empresa ativa responde como inexistente.
    #[error("Registro não encontrado")]
    NotFound,

    #[error("Nenhuma empresa ativa selecionada")]
    CompanyContextMissing,

    #[error("Permissão '{0}' necessária")]
    PermissionDenied(String),

    #[error("Usuário já é membro desta empresa")]
    MembershipAlreadyExists,

    #[error("CPF/CNPJ já cadastrado nesta empresa")]
    DocumentAlreadyExists,

    #[error("CNPJ já cadastrado")]
    CnpjAlreadyExists,

    #[error("Slug já em uso")]
    SlugAlreadyExists,

    #[error("Nome já em uso nesta empresa")]
    NameAlreadyExists,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// A resposta de erro que sai pela API: status + mensagem + detalhes por campo.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<HashMap<String, Vec<String>>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => Json(json!({ "error": self.error, "details": details })),
            None => Json(json!({ "error": self.error })),
        };
        (self.status, body).into_response()
    }
}

impl AppError {
    /// Converte o erro de negócio na resposta da API, resolvendo a mensagem
    /// no idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let lang = locale.0.as_str();

        match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: i18n::message(lang, "validation").to_string(),
                    details: Some(details),
                }
            }

            // Duplicidades de chave natural respondem como erro de validação
            // do campo correspondente (mesmo quando vêm da constraint do banco).
            AppError::DocumentAlreadyExists => field_api_error(lang, "cpfCnpj", "document_exists"),
            AppError::CnpjAlreadyExists => field_api_error(lang, "cnpj", "cnpj_exists"),
            AppError::SlugAlreadyExists => field_api_error(lang, "slug", "slug_exists"),
            AppError::NameAlreadyExists => field_api_error(lang, "name", "name_exists"),
            AppError::MembershipAlreadyExists => field_api_error(lang, "email", "membership_exists"),

            AppError::EmailAlreadyExists => {
                simple(StatusCode::CONFLICT, lang, "email_exists")
            }
            AppError::InvalidCredentials => {
                simple(StatusCode::UNAUTHORIZED, lang, "invalid_credentials")
            }
            AppError::InvalidToken => simple(StatusCode::UNAUTHORIZED, lang, "invalid_token"),
            AppError::UserNotFound => simple(StatusCode::NOT_FOUND, lang, "user_not_found"),
            AppError::NotFound => simple(StatusCode::NOT_FOUND, lang, "not_found"),
            AppError::CompanyContextMissing => {
                simple(StatusCode::BAD_REQUEST, lang, "company_context_missing")
            }
            AppError::PermissionDenied(codename) => ApiError {
                status: StatusCode::FORBIDDEN,
                error: format!("{} '{}'", i18n::message(lang, "permission_denied"), codename),
                details: None,
            },
            AppError::UniqueConstraintViolation(_) => {
                simple(StatusCode::CONFLICT, lang, "unique_violation")
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu.
            e => {
                tracing::error!("Erro interno do servidor: {}", e);
                simple(StatusCode::INTERNAL_SERVER_ERROR, lang, "internal")
            }
        }
    }

    /// Monta um erro de validação manual para um único campo, mantendo o
    /// mesmo formato de resposta do `validator`.
    pub fn field(field: &'static str, code: &'static str, message: &str) -> AppError {
        let mut err = validator::ValidationError::new(code);
        err.message = Some(std::borrow::Cow::Owned(message.to_string()));
        let mut errors = validator::ValidationErrors::new();
        errors.add(field, err);
        AppError::ValidationError(errors)
    }
}

fn simple(status: StatusCode, lang: &str, key: &str) -> ApiError {
    ApiError {
        status,
        error: i18n::message(lang, key).to_string(),
        details: None,
    }
}

fn field_api_error(lang: &str, field: &str, key: &str) -> ApiError {
    let message = i18n::message(lang, key).to_string();
    let mut details = HashMap::new();
    details.insert(field.to_string(), vec![message]);
    ApiError {
        status: StatusCode::BAD_REQUEST,
        error: i18n::message(lang, "validation").to_string(),
        details: Some(details),
    }
}

/// Traduz violações de unicidade do Postgres para o erro de negócio
/// correspondente, pelo nome da constraint. Corridas entre requisições
/// concorrentes acabam aqui: exatamente uma vence, a outra recebe o mesmo
/// erro de validação que o pré-check teria dado.
pub fn translate_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    "users_email_key" => AppError::EmailAlreadyExists,
                    "memberships_user_id_company_id_key" => AppError::MembershipAlreadyExists,
                    "establishments_cnpj_key" => AppError::CnpjAlreadyExists,
                    "companies_slug_key" => AppError::SlugAlreadyExists,
                    "customers_company_id_cpf_cnpj_key" => AppError::DocumentAlreadyExists,
                    "suppliers_company_id_cpf_cnpj_key" => AppError::DocumentAlreadyExists,
                    "categories_company_id_slug_key" => AppError::SlugAlreadyExists,
                    "categories_company_id_name_key" => AppError::NameAlreadyExists,
                    "units_company_id_name_key" => AppError::NameAlreadyExists,
                    _ => AppError::UniqueConstraintViolation(constraint.to_string()),
                };
            }
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_err(_constraint: &str) -> AppError {
        // sqlx::Error::Database não é construível fora do driver; o caminho
        // de tradução por constraint é coberto indiretamente. Aqui validamos
        // o formato dos erros de campo manuais.
        AppError::field("cpf", "length", "CPF deve conter 11 dígitos.")
    }

    #[test]
    fn field_error_carries_message_per_field() {
        let err = unique_err("x");
        let api = err.to_api_error(&Locale("pt".to_string()));
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("detalhes por campo");
        assert_eq!(details["cpf"], vec!["CPF deve conter 11 dígitos.".to_string()]);
    }

    #[test]
    fn duplicate_document_surfaces_as_validation_detail() {
        let api = AppError::DocumentAlreadyExists.to_api_error(&Locale("pt".to_string()));
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert!(api.details.unwrap().contains_key("cpfCnpj"));
    }

    // Chaves de vínculo são geradas, não entrada do usuário: uma colisão
    // na constraint memberships_key_key não tem campo para apontar e
    // responde como conflito genérico.
    #[test]
    fn generated_key_collision_is_a_plain_conflict() {
        let err = AppError::UniqueConstraintViolation("memberships_key_key".to_string());
        let api = err.to_api_error(&Locale("pt".to_string()));
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert!(api.details.is_none());
    }

    #[test]
    fn tenancy_miss_is_not_found() {
        let api = AppError::NotFound.to_api_error(&Locale("en".to_string()));
        assert_eq!(api.status, StatusCode::NOT_FOUND);
    }
}
