// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::{AppError, translate_unique_violation};
use crate::models::auth::User;

// O repositório de usuários, responsável por todas as interações com a
// tabela 'users'. E-mails são sempre comparados e gravados em minúsculas.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, password_hash, company_active, created_at, updated_at";

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Cria um novo usuário. Erro de e-mail duplicado vem da constraint
    // `users_email_key` e é traduzido para o erro de negócio.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name)
            VALUES (lower($1), $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(executor)
        .await
        .map_err(translate_unique_violation)
    }

    pub async fn update_names<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET first_name = $2, last_name = $3, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(first_name)
            .bind(last_name)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn update_email<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        email: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET email = lower($2), updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(email)
            .execute(executor)
            .await
            .map_err(translate_unique_violation)?;
        Ok(())
    }

    pub async fn update_password<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Define (ou limpa, com None) a empresa ativa da sessão do usuário.
    pub async fn set_company_active<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        company_id: Option<Uuid>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET company_active = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(company_id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
