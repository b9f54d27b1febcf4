// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::validators;
use crate::models::TenantOwned;

// ---
// 1. Company (a pessoa jurídica agregadora de matriz e filiais)
// ---

// Mapeia o CREATE TYPE tax_regime do banco
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, utoipa::ToSchema)]
#[sqlx(type_name = "tax_regime", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    Simples,
    SimplesExcesso,
    Presumido,
    Real,
}

#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub legal_name: String,
    pub trade_name: Option<String>,
    pub slug: String,
    // Chave de acesso opaca: gerada uma única vez na criação, imutável.
    pub key: String,
    pub tax_regime: Option<TaxRegime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. Establishment (matriz ou filial, emissor de documentos fiscais)
// ---

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, utoipa::ToSchema)]
#[sqlx(type_name = "establishment_environment", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Homologation,
}

#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Establishment {
    pub id: Uuid,
    pub company_id: Uuid,
    pub is_active: bool,
    pub cnpj: String,
    pub state_registration: Option<String>,
    pub municipal_registration: Option<String>,
    pub address_id: Uuid,
    pub phone: Option<String>,
    pub is_matrix: bool,
    pub environment_default: Environment,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Establishment {
    fn company_id(&self) -> Uuid {
        self.company_id
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
}

// ---
// 3. Address (endereço físico normalizado)
// ---

#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub city_name: String,
    pub city_ibge_code: String,
    pub state: String,
    pub postal_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Payload de endereço, compartilhado entre o setup da empresa e o passo
// de endereço dos parceiros.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    #[validate(custom(function = "validators::validate_postal_code"))]
    pub postal_code: String,

    #[validate(length(min = 1, message = "O logradouro é obrigatório."))]
    pub street: String,

    pub number: Option<String>,
    pub complement: Option<String>,

    #[validate(length(min = 1, message = "O bairro é obrigatório."))]
    pub district: String,

    #[validate(length(min = 1, message = "A cidade é obrigatória."))]
    pub city_name: String,

    #[validate(custom(function = "validators::validate_uf"))]
    pub state: String,

    #[validate(custom(function = "validators::validate_ibge_code"))]
    pub city_ibge_code: String,
}

// ---
// Payloads de ciclo de vida da empresa
// ---

// O que o usuário recém-cadastrado envia para criar sua empresa.
// Efeito atômico: Company + Establishment matriz + Membership OWNER +
// company_active do criador.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanySetupPayload {
    #[validate(length(min = 1, message = "A razão social é obrigatória."))]
    pub legal_name: String,

    pub trade_name: Option<String>,

    #[validate(length(min = 1, message = "O slug é obrigatório."))]
    pub slug: String,

    #[validate(custom(function = "validators::validate_cnpj"))]
    pub cnpj: String,

    pub phone: Option<String>,

    #[validate(nested)]
    pub address: AddressPayload,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdatePayload {
    #[validate(length(min = 1, message = "A razão social é obrigatória."))]
    pub legal_name: String,
    pub trade_name: Option<String>,
    pub tax_regime: Option<TaxRegime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> AddressPayload {
        AddressPayload {
            postal_code: "01310-100".into(),
            street: "Avenida Paulista".into(),
            number: Some("1000".into()),
            complement: None,
            district: "Bela Vista".into(),
            city_name: "São Paulo".into(),
            state: "SP".into(),
            city_ibge_code: "3550308".into(),
        }
    }

    #[test]
    fn setup_payload_requires_valid_cnpj() {
        let payload = CompanySetupPayload {
            legal_name: "ACME LTDA".into(),
            trade_name: None,
            slug: "acme".into(),
            cnpj: "123".into(),
            phone: None,
            address: address(),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("cnpj"));
    }

    #[test]
    fn nested_address_is_validated() {
        let mut bad = address();
        bad.state = "XX".into();
        bad.postal_code = "123".into();
        let payload = CompanySetupPayload {
            legal_name: "ACME LTDA".into(),
            trade_name: None,
            slug: "acme".into(),
            cnpj: "12.345.678/0001-99".into(),
            phone: None,
            address: bad,
        };
        assert!(payload.validate().is_err());
    }
}
