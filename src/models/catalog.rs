// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::validators;
use crate::models::TenantOwned;

// ---
// Category
// ---
#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub company_id: Uuid,
    pub is_active: bool,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Category {
    fn company_id(&self) -> Uuid {
        self.company_id
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "O slug é obrigatório."))]
    pub slug: String,
    pub description: Option<String>,
}

// ---
// Unit (unidade de medida)
// ---
#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: Uuid,
    pub company_id: Uuid,
    pub is_active: bool,
    pub name: String,
    pub abbreviation: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Unit {
    fn company_id(&self) -> Uuid {
        self.company_id
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct UnitPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "A abreviação é obrigatória."))]
    pub abbreviation: String,
}

// ---
// Product
// ---
#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub company_id: Uuid,
    pub is_active: bool,
    pub name: String,
    pub description: Option<String>,

    // Comercial
    pub category_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub cost_price: Decimal,
    pub sale_price: Decimal,

    // Estoque (inicial)
    pub stock_quantity: i32,

    // Fiscal (preenchido no passo de impostos do wizard)
    pub fiscal_data_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Product {
    fn company_id(&self) -> Uuid {
        self.company_id
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
}

// Passo "data" do wizard de produto: identidade + campos comerciais.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDataPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,

    pub category_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub sku: Option<String>,
    pub barcode: Option<String>,

    #[validate(custom(function = "validators::validate_not_negative"))]
    #[serde(default)]
    pub cost_price: Decimal,

    #[validate(custom(function = "validators::validate_positive"))]
    pub sale_price: Decimal,

    #[validate(range(min = 0, message = "A quantidade em estoque não pode ser negativa."))]
    #[serde(default)]
    pub stock_quantity: i32,
}

// ---
// ProductFiscalData
// ---
#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductFiscalData {
    pub id: Uuid,
    pub company_id: Uuid,
    pub is_active: bool,
    pub ncm: String,
    pub cest: Option<String>,
    pub cfop: String,
    // '0' nacional, '1' importação direta, '2' mercado interno
    pub origin: String,
    pub cst_icms: Option<String>,
    pub cst_pis: Option<String>,
    pub cst_cofins: Option<String>,
    pub icms_aliquota: Option<Decimal>,
    pub pis_aliquota: Option<Decimal>,
    pub cofins_aliquota: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for ProductFiscalData {
    fn company_id(&self) -> Uuid {
        self.company_id
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
}

fn validate_origin(value: &str) -> Result<(), validator::ValidationError> {
    match value {
        "0" | "1" | "2" => Ok(()),
        _ => {
            let mut err = validator::ValidationError::new("origin");
            err.message = Some("Origem deve ser '0', '1' ou '2'.".into());
            Err(err)
        }
    }
}

// Passo "tax" do wizard de produto: classificação fiscal e alíquotas.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductTaxPayload {
    #[validate(custom(function = "validators::validate_ncm"))]
    pub ncm: String,

    #[validate(custom(function = "validators::validate_cest"))]
    pub cest: Option<String>,

    #[validate(custom(function = "validators::validate_cfop"))]
    pub cfop: String,

    #[validate(custom(function = "validate_origin"))]
    #[serde(default = "default_origin")]
    pub origin: String,

    pub cst_icms: Option<String>,
    pub cst_pis: Option<String>,
    pub cst_cofins: Option<String>,

    #[validate(custom(function = "validators::validate_not_negative"))]
    pub icms_aliquota: Option<Decimal>,
    #[validate(custom(function = "validators::validate_not_negative"))]
    pub pis_aliquota: Option<Decimal>,
    #[validate(custom(function = "validators::validate_not_negative"))]
    pub cofins_aliquota: Option<Decimal>,
}

fn default_origin() -> String {
    "0".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn data_payload() -> ProductDataPayload {
        ProductDataPayload {
            name: "Caneta Azul".into(),
            description: None,
            category_id: None,
            unit_id: None,
            sku: Some("CA-001".into()),
            barcode: None,
            cost_price: Decimal::new(150, 2),
            sale_price: Decimal::new(300, 2),
            stock_quantity: 10,
        }
    }

    #[test]
    fn sale_price_must_be_positive() {
        let mut payload = data_payload();
        payload.sale_price = Decimal::ZERO;
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sale_price"));
    }

    #[test]
    fn cost_price_may_be_zero_but_not_negative() {
        let mut payload = data_payload();
        payload.cost_price = Decimal::ZERO;
        assert!(payload.validate().is_ok());

        payload.cost_price = Decimal::new(-1, 2);
        assert!(payload.validate().is_err());
    }

    #[test]
    fn stock_quantity_cannot_be_negative() {
        let mut payload = data_payload();
        payload.stock_quantity = -1;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn tax_payload_checks_digit_counts() {
        let payload = ProductTaxPayload {
            ncm: "1234567".into(), // 7 dígitos, inválido
            cest: Some("1234567".into()),
            cfop: "5102".into(),
            origin: "0".into(),
            cst_icms: None,
            cst_pis: None,
            cst_cofins: None,
            icms_aliquota: None,
            pis_aliquota: None,
            cofins_aliquota: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("ncm"));
    }

    #[test]
    fn origin_is_restricted_to_known_codes() {
        assert!(validate_origin("0").is_ok());
        assert!(validate_origin("3").is_err());
    }
}
