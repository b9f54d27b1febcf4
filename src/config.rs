// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        CatalogRepository, CompanyRepository, MembershipRepository, PartnerRepository,
        UserRepository,
    },
    services::{
        AuthService, CatalogService, CompanyService, MembershipService, PartnerService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,

    // O middleware de RBAC e o extrator de contexto consultam o
    // repositório de vínculos diretamente.
    pub membership_repo: MembershipRepository,

    pub auth_service: AuthService,
    pub company_service: CompanyService,
    pub membership_service: MembershipService,
    pub catalog_service: CatalogService,
    pub partner_service: PartnerService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let company_repo = CompanyRepository::new(db_pool.clone());
        let membership_repo = MembershipRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let partner_repo = PartnerRepository::new(db_pool.clone());

        let auth_service =
            AuthService::new(user_repo.clone(), jwt_secret.clone(), db_pool.clone());
        let company_service = CompanyService::new(
            company_repo.clone(),
            membership_repo.clone(),
            user_repo.clone(),
            catalog_repo.clone(),
            db_pool.clone(),
        );
        let membership_service = MembershipService::new(
            membership_repo.clone(),
            user_repo.clone(),
            db_pool.clone(),
        );
        let catalog_service = CatalogService::new(catalog_repo, db_pool.clone());
        let partner_service =
            PartnerService::new(partner_repo, company_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            membership_repo,
            auth_service,
            company_service,
            membership_service,
            catalog_service,
            partner_service,
        })
    }
}
