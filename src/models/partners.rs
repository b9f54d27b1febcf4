// src/models/partners.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::validators;
use crate::models::TenantOwned;
use crate::models::company::TaxRegime;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, utoipa::ToSchema)]
#[sqlx(type_name = "person_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PersonType {
    Pf,
    Pj,
}

// Carimbado pelo serviço, nunca vem do cliente.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, utoipa::ToSchema)]
#[sqlx(type_name = "partner_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PartnerType {
    Customer,
    Supplier,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, utoipa::ToSchema)]
#[sqlx(type_name = "tax_payer_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaxPayerType {
    NonTaxpayer,
    Taxpayer,
    Exempt,
}

// ---
// Customer (parceiro que compra produtos/serviços)
// ---
#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub company_id: Uuid,
    pub is_active: bool,

    pub name: String,
    pub trading_name: Option<String>,
    // Documento unificado, derivado de cpf OU cnpj conforme person_type.
    pub cpf_cnpj: String,
    pub person_type: PersonType,
    pub partner_type: PartnerType,

    pub tax_regime: Option<TaxRegime>,
    pub tax_payer_type: Option<TaxPayerType>,
    pub state_registration: Option<String>,
    pub municipal_registration: Option<String>,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub cellphone: Option<String>,
    pub address_id: Option<Uuid>,
    pub notes: Option<String>,

    pub credit_limit: Decimal,
    pub is_exempt: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Customer {
    fn company_id(&self) -> Uuid {
        self.company_id
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
}

// ---
// Supplier (parceiro que vende produtos/serviços)
// ---
#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,
    pub company_id: Uuid,
    pub is_active: bool,

    pub name: String,
    pub trading_name: Option<String>,
    pub cpf_cnpj: String,
    pub person_type: PersonType,
    pub partner_type: PartnerType,

    pub tax_regime: Option<TaxRegime>,
    pub tax_payer_type: Option<TaxPayerType>,
    pub state_registration: Option<String>,
    pub municipal_registration: Option<String>,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub cellphone: Option<String>,
    pub address_id: Option<Uuid>,
    pub notes: Option<String>,

    // Dados bancários para pagamento
    pub bank_name: Option<String>,
    pub bank_agency: Option<String>,
    pub bank_account: Option<String>,
    pub bank_pix: Option<String>,
    pub payment_terms: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Supplier {
    fn company_id(&self) -> Uuid {
        self.company_id
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
}

// ---
// Payloads dos passos do wizard
// ---

// Passo "basic": identidade do parceiro. Qual documento é obrigatório
// depende de person_type; o serviço deriva cpf_cnpj.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartnerBasicPayload {
    pub person_type: PersonType,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub trading_name: Option<String>,

    pub cpf: Option<String>,
    pub cnpj: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cellphone: Option<String>,
}

// Passo "advanced" do cliente: dados fiscais/comerciais.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAdvancedPayload {
    pub tax_regime: Option<TaxRegime>,
    pub tax_payer_type: Option<TaxPayerType>,
    pub state_registration: Option<String>,
    pub municipal_registration: Option<String>,

    #[validate(custom(function = "validators::validate_not_negative"))]
    #[serde(default)]
    pub credit_limit: Decimal,

    #[serde(default)]
    pub is_exempt: bool,

    pub notes: Option<String>,
}

// Passo "advanced" do fornecedor: fiscal + dados bancários.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierAdvancedPayload {
    pub tax_regime: Option<TaxRegime>,
    pub tax_payer_type: Option<TaxPayerType>,
    pub state_registration: Option<String>,
    pub municipal_registration: Option<String>,

    pub bank_name: Option<String>,
    pub bank_agency: Option<String>,
    pub bank_account: Option<String>,
    pub bank_pix: Option<String>,
    pub payment_terms: Option<String>,

    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_type_uses_uppercase_wire_format() {
        assert_eq!(serde_json::to_string(&PersonType::Pf).unwrap(), "\"PF\"");
        let pt: PersonType = serde_json::from_str("\"PJ\"").unwrap();
        assert_eq!(pt, PersonType::Pj);
    }

    #[test]
    fn partner_type_is_lowercase() {
        assert_eq!(serde_json::to_string(&PartnerType::Customer).unwrap(), "\"customer\"");
        assert_eq!(serde_json::to_string(&PartnerType::Supplier).unwrap(), "\"supplier\"");
    }

    #[test]
    fn credit_limit_rejects_negative() {
        let payload = CustomerAdvancedPayload {
            tax_regime: None,
            tax_payer_type: None,
            state_registration: None,
            municipal_registration: None,
            credit_limit: Decimal::new(-100, 2),
            is_exempt: false,
            notes: None,
        };
        assert!(payload.validate().is_err());
    }
}
