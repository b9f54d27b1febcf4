// src/services/company_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::validators::only_digits,
    db::{CatalogRepository, CompanyRepository, MembershipRepository, UserRepository},
    models::company::{Company, CompanySetupPayload, CompanyUpdatePayload},
    models::membership::Role,
};

#[derive(Clone)]
pub struct CompanyService {
    company_repo: CompanyRepository,
    membership_repo: MembershipRepository,
    user_repo: UserRepository,
    catalog_repo: CatalogRepository,
    pool: PgPool,
}

impl CompanyService {
    pub fn new(
        company_repo: CompanyRepository,
        membership_repo: MembershipRepository,
        user_repo: UserRepository,
        catalog_repo: CatalogRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            company_repo,
            membership_repo,
            user_repo,
            catalog_repo,
            pool,
        }
    }

    // Fluxo de fundação da conta, tudo ou nada: empresa + endereço +
    // estabelecimento matriz + vínculo OWNER do criador + unidades de
    // medida padrão + empresa ativa da sessão. Slug e CNPJ duplicados
    // vêm das constraints do banco.
    pub async fn setup(
        &self,
        user_id: Uuid,
        payload: &CompanySetupPayload,
    ) -> Result<Company, AppError> {
        let company_key = Uuid::new_v4().simple().to_string();
        let membership_key = Uuid::new_v4().simple().to_string();

        let mut tx = self.pool.begin().await?;

        let company = self
            .company_repo
            .create_company(
                &mut *tx,
                &payload.legal_name,
                payload.trade_name.as_deref(),
                &payload.slug,
                &company_key,
            )
            .await?;

        let address = self
            .company_repo
            .create_address(&mut *tx, &payload.address)
            .await?;

        self.company_repo
            .create_establishment(
                &mut *tx,
                company.id,
                &only_digits(&payload.cnpj),
                payload.phone.as_deref(),
                address.id,
                true,
            )
            .await?;

        self.membership_repo
            .create(&mut *tx, company.id, user_id, Role::Owner, &membership_key)
            .await?;

        self.catalog_repo
            .seed_default_units(&mut *tx, company.id)
            .await?;

        self.user_repo
            .set_company_active(&mut *tx, user_id, Some(company.id))
            .await?;

        tx.commit().await?;

        tracing::info!("Empresa criada: {} ({})", company.legal_name, company.slug);
        Ok(company)
    }

    pub async fn current(&self, company_id: Uuid) -> Result<Company, AppError> {
        self.company_repo
            .find_company(company_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn update(
        &self,
        company_id: Uuid,
        payload: &CompanyUpdatePayload,
    ) -> Result<Company, AppError> {
        self.company_repo
            .update_company(company_id, payload)
            .await?
            .ok_or(AppError::NotFound)
    }

    // Troca a empresa ativa da sessão. Só aceita empresas onde o usuário
    // tem vínculo ativo.
    pub async fn switch_active(&self, user_id: Uuid, company_id: Uuid) -> Result<(), AppError> {
        let membership = self
            .membership_repo
            .find_by_user_and_company(user_id, company_id)
            .await?
            .filter(|m| m.is_active)
            .ok_or(AppError::NotFound)?;

        self.user_repo
            .set_company_active(&self.pool, user_id, Some(membership.company_id))
            .await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Company>, AppError> {
        self.membership_repo.list_companies_for_user(user_id).await
    }
}
