// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::validators::split_full_name,
    db::UserRepository,
    models::auth::{Claims, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self {
            user_repo,
            jwt_secret,
            pool,
        }
    }

    // Cadastro de usuário. O nome completo é dividido no primeiro espaço
    // e o e-mail é normalizado em minúsculas pelo repositório.
    pub async fn register_user(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AppError> {
        // O hashing é pesado em CPU e roda fora do runtime async.
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let (first_name, last_name) = split_full_name(full_name);

        let mut tx = self.pool.begin().await?;
        let new_user = self
            .user_repo
            .create_user(&mut *tx, email, &hashed_password, &first_name, &last_name)
            .await?;
        tx.commit().await?;

        tracing::info!("Novo usuário cadastrado: {}", new_user.email);
        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
        new_password_confirm: &str,
    ) -> Result<(), AppError> {
        if new_password != new_password_confirm {
            return Err(AppError::field(
                "newPasswordConfirm",
                "mismatch",
                "As senhas não conferem.",
            ));
        }

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let current_clone = current_password.to_owned();
        let hash_clone = user.password_hash.clone();
        let current_ok =
            tokio::task::spawn_blocking(move || verify(&current_clone, &hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !current_ok {
            return Err(AppError::InvalidCredentials);
        }

        let new_clone = new_password.to_owned();
        let new_hash =
            tokio::task::spawn_blocking(move || hash(&new_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo
            .update_password(&self.pool, user_id, &new_hash)
            .await
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
