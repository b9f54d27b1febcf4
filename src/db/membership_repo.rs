// src/db/membership_repo.rs

use sqlx::{Executor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::common::error::{AppError, translate_unique_violation};
use crate::models::company::Company;
use crate::models::membership::{Membership, MembershipWithUser, Permission, Role};

// Repositório de vínculos usuário-empresa e das permissões associadas.
// Toda consulta de escopo de empresa recebe o company_id explicitamente.
#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

const MEMBERSHIP_COLUMNS: &str =
    "id, company_id, user_id, role, key, is_active, created_at, updated_at";

const MEMBERSHIP_WITH_USER_COLUMNS: &str = "m.id, m.company_id, m.user_id, m.role, m.is_active, \
     u.email, u.first_name, u.last_name, m.created_at";

impl MembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        user_id: Uuid,
        role: Role,
        key: &str,
    ) -> Result<Membership, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Membership>(&format!(
            r#"
            INSERT INTO memberships (company_id, user_id, role, key)
            VALUES ($1, $2, $3, $4)
            RETURNING {MEMBERSHIP_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(user_id)
        .bind(role)
        .bind(key)
        .fetch_one(executor)
        .await
        .map_err(translate_unique_violation)
    }

    pub async fn find_by_user_and_company(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Membership>, AppError> {
        let membership = sqlx::query_as::<_, Membership>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM memberships WHERE user_id = $1 AND company_id = $2"
        ))
        .bind(user_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(membership)
    }

    pub async fn find_in_company(
        &self,
        company_id: Uuid,
        membership_id: Uuid,
    ) -> Result<Option<Membership>, AppError> {
        let membership = sqlx::query_as::<_, Membership>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM memberships WHERE id = $1 AND company_id = $2"
        ))
        .bind(membership_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(membership)
    }

    // Lista paginada com filtros opcionais. Binds NULL desligam o filtro
    // correspondente, evitando montar SQL dinamicamente.
    pub async fn list(
        &self,
        company_id: Uuid,
        is_active: Option<bool>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MembershipWithUser>, AppError> {
        let members = sqlx::query_as::<_, MembershipWithUser>(&format!(
            r#"
            SELECT {MEMBERSHIP_WITH_USER_COLUMNS}
            FROM memberships m
            JOIN users u ON u.id = m.user_id
            WHERE m.company_id = $1
              AND ($2::boolean IS NULL OR m.is_active = $2)
              AND ($3::text IS NULL
                   OR u.email ILIKE $3
                   OR u.first_name ILIKE $3
                   OR u.last_name ILIKE $3)
            ORDER BY u.first_name, u.last_name
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
        Ok(members)
    }

    pub async fn update_role<'e, E>(
        &self,
        executor: E,
        membership_id: Uuid,
        role: Role,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE memberships SET role = $2, updated_at = NOW() WHERE id = $1")
            .bind(membership_id)
            .bind(role)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn set_active<'e, E>(
        &self,
        executor: E,
        membership_id: Uuid,
        is_active: bool,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE memberships SET is_active = $2, updated_at = NOW() WHERE id = $1")
            .bind(membership_id)
            .bind(is_active)
            .execute(executor)
            .await?;
        Ok(())
    }

    // ---
    // Permissões
    // ---

    pub async fn list_all_permissions(&self) -> Result<Vec<Permission>, AppError> {
        let permissions = sqlx::query_as::<_, Permission>(
            "SELECT id, name, codename FROM permissions ORDER BY codename",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(permissions)
    }

    pub async fn list_permissions_for(
        &self,
        membership_id: Uuid,
    ) -> Result<Vec<Permission>, AppError> {
        let permissions = sqlx::query_as::<_, Permission>(
            r#"
            SELECT p.id, p.name, p.codename
            FROM permissions p
            JOIN membership_permissions mp ON mp.permission_id = p.id
            WHERE mp.membership_id = $1
            ORDER BY p.codename
            "#,
        )
        .bind(membership_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(permissions)
    }

    // Substitui o conjunto inteiro de permissões do vínculo.
    pub async fn set_permissions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        membership_id: Uuid,
        permission_ids: &[Uuid],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM membership_permissions WHERE membership_id = $1")
            .bind(membership_id)
            .execute(&mut **tx)
            .await?;

        if !permission_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO membership_permissions (membership_id, permission_id)
                SELECT $1, unnest($2::uuid[])
                "#,
            )
            .bind(membership_id)
            .bind(permission_ids)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    // Owner e admin passam por qualquer verificação; member precisa da
    // permissão concedida explicitamente. Vínculo inativo nunca passa.
    pub async fn user_has_permission(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        codename: &str,
    ) -> Result<bool, AppError> {
        let allowed: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM memberships m
                LEFT JOIN membership_permissions mp ON mp.membership_id = m.id
                LEFT JOIN permissions p ON p.id = mp.permission_id
                WHERE m.user_id = $1
                  AND m.company_id = $2
                  AND m.is_active = TRUE
                  AND (m.role IN ('owner', 'admin') OR p.codename = $3)
            )
            "#,
        )
        .bind(user_id)
        .bind(company_id)
        .bind(codename)
        .fetch_one(&self.pool)
        .await?;
        Ok(allowed)
    }

    // Empresas nas quais o usuário tem vínculo ativo.
    pub async fn list_companies_for_user(&self, user_id: Uuid) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT c.id, c.legal_name, c.trade_name, c.slug, c.key, c.tax_regime,
                   c.created_at, c.updated_at
            FROM companies c
            JOIN memberships m ON m.company_id = c.id
            WHERE m.user_id = $1 AND m.is_active = TRUE
            ORDER BY c.legal_name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }
}
