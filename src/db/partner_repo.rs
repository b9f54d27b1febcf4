// src/db/partner_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::{AppError, translate_unique_violation};
use crate::models::partners::{
    Customer, CustomerAdvancedPayload, PartnerBasicPayload, Supplier, SupplierAdvancedPayload,
};

// Repositório de parceiros comerciais. Clientes e fornecedores vivem em
// tabelas separadas, cada uma com a sua unicidade de documento por empresa.
#[derive(Clone)]
pub struct PartnerRepository {
    pool: PgPool,
}

const CUSTOMER_COLUMNS: &str = "id, company_id, is_active, name, trading_name, cpf_cnpj, \
     person_type, partner_type, tax_regime, tax_payer_type, state_registration, \
     municipal_registration, email, phone, cellphone, address_id, notes, \
     credit_limit, is_exempt, created_at, updated_at";

const SUPPLIER_COLUMNS: &str = "id, company_id, is_active, name, trading_name, cpf_cnpj, \
     person_type, partner_type, tax_regime, tax_payer_type, state_registration, \
     municipal_registration, email, phone, cellphone, address_id, notes, \
     bank_name, bank_agency, bank_account, bank_pix, payment_terms, created_at, updated_at";

impl PartnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Customer
    // ---

    pub async fn create_customer(
        &self,
        company_id: Uuid,
        payload: &PartnerBasicPayload,
        cpf_cnpj: &str,
    ) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (
                company_id, name, trading_name, cpf_cnpj, person_type,
                partner_type, email, phone, cellphone
            )
            VALUES ($1, $2, $3, $4, $5, 'customer', $6, $7, $8)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(&payload.name)
        .bind(payload.trading_name.as_deref())
        .bind(cpf_cnpj)
        .bind(payload.person_type)
        .bind(payload.email.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.cellphone.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(translate_unique_violation)
    }

    pub async fn update_customer_basic(
        &self,
        company_id: Uuid,
        customer_id: Uuid,
        payload: &PartnerBasicPayload,
        cpf_cnpj: &str,
    ) -> Result<Option<Customer>, AppError> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers
            SET name = $3, trading_name = $4, cpf_cnpj = $5, person_type = $6,
                email = $7, phone = $8, cellphone = $9, updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(company_id)
        .bind(&payload.name)
        .bind(payload.trading_name.as_deref())
        .bind(cpf_cnpj)
        .bind(payload.person_type)
        .bind(payload.email.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.cellphone.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(translate_unique_violation)
    }

    pub async fn update_customer_advanced(
        &self,
        company_id: Uuid,
        customer_id: Uuid,
        payload: &CustomerAdvancedPayload,
    ) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers
            SET tax_regime = $3, tax_payer_type = $4, state_registration = $5,
                municipal_registration = $6, credit_limit = $7, is_exempt = $8,
                notes = $9, updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(company_id)
        .bind(payload.tax_regime.clone())
        .bind(payload.tax_payer_type)
        .bind(payload.state_registration.as_deref())
        .bind(payload.municipal_registration.as_deref())
        .bind(payload.credit_limit)
        .bind(payload.is_exempt)
        .bind(payload.notes.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(customer)
    }

    pub async fn set_customer_address<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        customer_id: Uuid,
        address_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE customers SET address_id = $3, updated_at = NOW() WHERE id = $1 AND company_id = $2",
        )
        .bind(customer_id)
        .bind(company_id)
        .bind(address_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find_customer(
        &self,
        company_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1 AND company_id = $2"
        ))
        .bind(customer_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(customer)
    }

    pub async fn list_customers(
        &self,
        company_id: Uuid,
        is_active: Option<bool>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            WHERE company_id = $1
              AND ($2::boolean IS NULL OR is_active = $2)
              AND ($3::text IS NULL
                   OR name ILIKE $3 OR trading_name ILIKE $3
                   OR cpf_cnpj ILIKE $3 OR email ILIKE $3)
            ORDER BY name
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(company_id)
        .bind(is_active)
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    pub async fn set_customer_active(
        &self,
        company_id: Uuid,
        customer_id: Uuid,
        is_active: bool,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE customers SET is_active = $3, updated_at = NOW() WHERE id = $1 AND company_id = $2",
        )
        .bind(customer_id)
        .bind(company_id)
        .bind(is_active)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn customer_document_exists(
        &self,
        company_id: Uuid,
        cpf_cnpj: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM customers
                WHERE company_id = $1 AND cpf_cnpj = $2 AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(company_id)
        .bind(cpf_cnpj)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    // ---
    // Supplier
    // ---

    pub async fn create_supplier(
        &self,
        company_id: Uuid,
        payload: &PartnerBasicPayload,
        cpf_cnpj: &str,
    ) -> Result<Supplier, AppError> {
        sqlx::query_as::<_, Supplier>(&format!(
            r#"
            INSERT INTO suppliers (
                company_id, name, trading_name, cpf_cnpj, person_type,
                partner_type, email, phone, cellphone
            )
            VALUES ($1, $2, $3, $4, $5, 'supplier', $6, $7, $8)
            RETURNING {SUPPLIER_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(&payload.name)
        .bind(payload.trading_name.as_deref())
        .bind(cpf_cnpj)
        .bind(payload.person_type)
        .bind(payload.email.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.cellphone.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(translate_unique_violation)
    }

    pub async fn update_supplier_basic(
        &self,
        company_id: Uuid,
        supplier_id: Uuid,
        payload: &PartnerBasicPayload,
        cpf_cnpj: &str,
    ) -> Result<Option<Supplier>, AppError> {
        sqlx::query_as::<_, Supplier>(&format!(
            r#"
            UPDATE suppliers
            SET name = $3, trading_name = $4, cpf_cnpj = $5, person_type = $6,
                email = $7, phone = $8, cellphone = $9, updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING {SUPPLIER_COLUMNS}
            "#
        ))
        .bind(supplier_id)
        .bind(company_id)
        .bind(&payload.name)
        .bind(payload.trading_name.as_deref())
        .bind(cpf_cnpj)
        .bind(payload.person_type)
        .bind(payload.email.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.cellphone.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(translate_unique_violation)
    }

    pub async fn update_supplier_advanced(
        &self,
        company_id: Uuid,
        supplier_id: Uuid,
        payload: &SupplierAdvancedPayload,
    ) -> Result<Option<Supplier>, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            UPDATE suppliers
            SET tax_regime = $3, tax_payer_type = $4, state_registration = $5,
                municipal_registration = $6, bank_name = $7, bank_agency = $8,
                bank_account = $9, bank_pix = $10, payment_terms = $11,
                notes = $12, updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING {SUPPLIER_COLUMNS}
            "#
        ))
        .bind(supplier_id)
        .bind(company_id)
        .bind(payload.tax_regime.clone())
        .bind(payload.tax_payer_type)
        .bind(payload.state_registration.as_deref())
        .bind(payload.municipal_registration.as_deref())
        .bind(payload.bank_name.as_deref())
        .bind(payload.bank_agency.as_deref())
        .bind(payload.bank_account.as_deref())
        .bind(payload.bank_pix.as_deref())
        .bind(payload.payment_terms.as_deref())
        .bind(payload.notes.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(supplier)
    }

    pub async fn set_supplier_address<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        supplier_id: Uuid,
        address_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE suppliers SET address_id = $3, updated_at = NOW() WHERE id = $1 AND company_id = $2",
        )
        .bind(supplier_id)
        .bind(company_id)
        .bind(address_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find_supplier(
        &self,
        company_id: Uuid,
        supplier_id: Uuid,
    ) -> Result<Option<Supplier>, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = $1 AND company_id = $2"
        ))
        .bind(supplier_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(supplier)
    }

    pub async fn list_suppliers(
        &self,
        company_id: Uuid,
        is_active: Option<bool>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Supplier>, AppError> {
        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            SELECT {SUPPLIER_COLUMNS}
            FROM suppliers
            WHERE company_id = $1
              AND ($2::boolean IS NULL OR is_active = $2)
              AND ($3::text IS NULL
                   OR name ILIKE $3 OR trading_name ILIKE $3
                   OR cpf_cnpj ILIKE $3 OR email ILIKE $3)
            ORDER BY name
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(company_id)
        .bind(is_active)
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(suppliers)
    }

    pub async fn set_supplier_active(
        &self,
        company_id: Uuid,
        supplier_id: Uuid,
        is_active: bool,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE suppliers SET is_active = $3, updated_at = NOW() WHERE id = $1 AND company_id = $2",
        )
        .bind(supplier_id)
        .bind(company_id)
        .bind(is_active)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn supplier_document_exists(
        &self,
        company_id: Uuid,
        cpf_cnpj: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM suppliers
                WHERE company_id = $1 AND cpf_cnpj = $2 AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(company_id)
        .bind(cpf_cnpj)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
