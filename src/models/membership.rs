// src/models/membership.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::TenantOwned;

// Mapeia o CREATE TYPE membership_role do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, utoipa::ToSchema)]
#[sqlx(type_name = "membership_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Member,
}

// ---
// Membership (a ponte Usuário × Empresa, com papel e permissões)
// ---
#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    // Chave de acesso opaca, gerada uma única vez na criação.
    pub key: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Membership {
    fn company_id(&self) -> Uuid {
        self.company_id
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
}

// Linha da listagem de usuários: membership + identidade do usuário.
#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipWithUser {
    pub id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub is_active: bool,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

// ---
// Permission (capacidade nomeada, anexada a memberships)
// ---
#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: Uuid,
    pub name: String,
    pub codename: String,
}

// Detalhe do membro: listagem + permissões concedidas.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipDetail {
    #[serde(flatten)]
    pub member: MembershipWithUser,
    pub permissions: Vec<Permission>,
}

// ---
// Payloads
// ---

// Criação de membro: identidade + papel + permissões + senha inicial.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMembershipPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    pub role: Role,

    #[serde(default)]
    pub permissions: Vec<Uuid>,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password_confirm: String,
}

// Edição de membro: sem campos de senha.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMembershipPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    pub role: Role,

    #[serde(default)]
    pub permissions: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Owner).unwrap(), "\"owner\"");
        let role: Role = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(role, Role::Member);
    }

    #[test]
    fn permissions_default_to_empty_list() {
        let payload: CreateMembershipPayload = serde_json::from_str(
            r#"{
                "name": "João Souza",
                "email": "joao@example.com",
                "role": "admin",
                "password": "secret1",
                "passwordConfirm": "secret1"
            }"#,
        )
        .unwrap();
        assert!(payload.permissions.is_empty());
        assert!(payload.validate().is_ok());
    }
}
