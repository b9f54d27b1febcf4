// src/db/company_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::{AppError, translate_unique_violation};
use crate::common::validators::only_digits;
use crate::models::company::{Address, AddressPayload, Company, CompanyUpdatePayload, Establishment};

// Repositório das entidades de conta: Company, Establishment e Address.
#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

const COMPANY_COLUMNS: &str =
    "id, legal_name, trade_name, slug, key, tax_regime, created_at, updated_at";

const ESTABLISHMENT_COLUMNS: &str = "id, company_id, is_active, cnpj, state_registration, \
     municipal_registration, address_id, phone, is_matrix, environment_default, created_at, updated_at";

const ADDRESS_COLUMNS: &str = "id, street, number, complement, district, city_name, \
     city_ibge_code, state, postal_code, created_at, updated_at";

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Company
    // ---

    pub async fn create_company<'e, E>(
        &self,
        executor: E,
        legal_name: &str,
        trade_name: Option<&str>,
        slug: &str,
        key: &str,
    ) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Company>(&format!(
            r#"
            INSERT INTO companies (legal_name, trade_name, slug, key)
            VALUES ($1, $2, $3, $4)
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(legal_name)
        .bind(trade_name)
        .bind(slug)
        .bind(key)
        .fetch_one(executor)
        .await
        .map_err(translate_unique_violation)
    }

    pub async fn find_company(&self, company_id: Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1"
        ))
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    // Atualiza os dados cadastrais. Slug e chave de acesso são imutáveis.
    pub async fn update_company(
        &self,
        company_id: Uuid,
        payload: &CompanyUpdatePayload,
    ) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE companies
            SET legal_name = $2, trade_name = $3, tax_regime = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(&payload.legal_name)
        .bind(payload.trade_name.as_deref())
        .bind(&payload.tax_regime)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    // ---
    // Establishment
    // ---

    pub async fn create_establishment<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        cnpj: &str,
        phone: Option<&str>,
        address_id: Uuid,
        is_matrix: bool,
    ) -> Result<Establishment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Establishment>(&format!(
            r#"
            INSERT INTO establishments (company_id, cnpj, phone, address_id, is_matrix)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ESTABLISHMENT_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(cnpj)
        .bind(phone)
        .bind(address_id)
        .bind(is_matrix)
        .fetch_one(executor)
        .await
        .map_err(translate_unique_violation)
    }

    pub async fn find_matrix(&self, company_id: Uuid) -> Result<Option<Establishment>, AppError> {
        let establishment = sqlx::query_as::<_, Establishment>(&format!(
            r#"
            SELECT {ESTABLISHMENT_COLUMNS}
            FROM establishments
            WHERE company_id = $1 AND is_matrix = TRUE AND is_active = TRUE
            "#
        ))
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(establishment)
    }

    // ---
    // Address
    // ---

    pub async fn create_address<'e, E>(
        &self,
        executor: E,
        payload: &AddressPayload,
    ) -> Result<Address, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let address = sqlx::query_as::<_, Address>(&format!(
            r#"
            INSERT INTO addresses (
                street, number, complement, district,
                city_name, city_ibge_code, state, postal_code
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ADDRESS_COLUMNS}
            "#
        ))
        .bind(&payload.street)
        .bind(payload.number.as_deref().unwrap_or(""))
        .bind(payload.complement.as_deref())
        .bind(&payload.district)
        .bind(&payload.city_name)
        .bind(only_digits(&payload.city_ibge_code))
        .bind(payload.state.to_uppercase())
        .bind(only_digits(&payload.postal_code))
        .fetch_one(executor)
        .await?;
        Ok(address)
    }

    // Muta o endereço existente no lugar; nenhuma linha órfã é criada
    // quando o passo de endereço é salvo de novo.
    pub async fn update_address<'e, E>(
        &self,
        executor: E,
        address_id: Uuid,
        payload: &AddressPayload,
    ) -> Result<Address, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let address = sqlx::query_as::<_, Address>(&format!(
            r#"
            UPDATE addresses
            SET street = $2, number = $3, complement = $4, district = $5,
                city_name = $6, city_ibge_code = $7, state = $8, postal_code = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ADDRESS_COLUMNS}
            "#
        ))
        .bind(address_id)
        .bind(&payload.street)
        .bind(payload.number.as_deref().unwrap_or(""))
        .bind(payload.complement.as_deref())
        .bind(&payload.district)
        .bind(&payload.city_name)
        .bind(only_digits(&payload.city_ibge_code))
        .bind(payload.state.to_uppercase())
        .bind(only_digits(&payload.postal_code))
        .fetch_one(executor)
        .await?;
        Ok(address)
    }

    pub async fn find_address(&self, address_id: Uuid) -> Result<Option<Address>, AppError> {
        let address = sqlx::query_as::<_, Address>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = $1"
        ))
        .bind(address_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(address)
    }
}
