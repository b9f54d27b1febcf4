// src/services/catalog_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::api::{ListParams, PAGE_SIZE, Paginated, StatusFilter},
    models::catalog::{
        Category, CategoryPayload, Product, ProductDataPayload, ProductFiscalData,
        ProductTaxPayload, Unit, UnitPayload,
    },
    services::ensure_tenant,
};

// Passo do wizard de produto. O passo fiscal só existe para um produto
// já criado pelo passo de dados.
pub enum ProductStep {
    Data(ProductDataPayload),
    Tax(ProductTaxPayload),
}

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository, pool: PgPool) -> Self {
        Self { catalog_repo, pool }
    }

    fn list_flag(params: &ListParams) -> Option<bool> {
        params.status.unwrap_or(StatusFilter::Active).as_flag()
    }

    // ---
    // Categorias
    // ---

    pub async fn create_category(
        &self,
        company_id: Uuid,
        payload: &CategoryPayload,
    ) -> Result<Category, AppError> {
        self.check_category_uniqueness(company_id, payload, None).await?;
        self.catalog_repo.create_category(company_id, payload).await
    }

    pub async fn update_category(
        &self,
        company_id: Uuid,
        category_id: Uuid,
        payload: &CategoryPayload,
    ) -> Result<Category, AppError> {
        self.check_category_uniqueness(company_id, payload, Some(category_id))
            .await?;
        self.catalog_repo
            .update_category(company_id, category_id, payload)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn get_category(
        &self,
        company_id: Uuid,
        category_id: Uuid,
    ) -> Result<Category, AppError> {
        self.catalog_repo
            .find_category(company_id, category_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list_categories(
        &self,
        company_id: Uuid,
        params: &ListParams,
    ) -> Result<Paginated<Category>, AppError> {
        let categories = self
            .catalog_repo
            .list_categories(
                company_id,
                Self::list_flag(params),
                params.search_term().as_deref(),
                PAGE_SIZE,
                params.offset(),
            )
            .await?;
        Ok(Paginated::new(categories, params.page()))
    }

    pub async fn set_category_active(
        &self,
        company_id: Uuid,
        category_id: Uuid,
        is_active: bool,
    ) -> Result<(), AppError> {
        if !self
            .catalog_repo
            .set_category_active(company_id, category_id, is_active)
            .await?
        {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // Checagem preventiva de slug e nome; as constraints únicas do banco
    // seguram o que passar pela corrida.
    async fn check_category_uniqueness(
        &self,
        company_id: Uuid,
        payload: &CategoryPayload,
        exclude_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        if self
            .catalog_repo
            .category_slug_exists(company_id, &payload.slug, exclude_id)
            .await?
        {
            return Err(AppError::SlugAlreadyExists);
        }
        if self
            .catalog_repo
            .category_name_exists(company_id, &payload.name, exclude_id)
            .await?
        {
            return Err(AppError::NameAlreadyExists);
        }
        Ok(())
    }

    // ---
    // Unidades de medida
    // ---

    pub async fn create_unit(
        &self,
        company_id: Uuid,
        payload: &UnitPayload,
    ) -> Result<Unit, AppError> {
        if self
            .catalog_repo
            .unit_name_exists(company_id, &payload.name, None)
            .await?
        {
            return Err(AppError::NameAlreadyExists);
        }
        self.catalog_repo.create_unit(company_id, payload).await
    }

    pub async fn update_unit(
        &self,
        company_id: Uuid,
        unit_id: Uuid,
        payload: &UnitPayload,
    ) -> Result<Unit, AppError> {
        if self
            .catalog_repo
            .unit_name_exists(company_id, &payload.name, Some(unit_id))
            .await?
        {
            return Err(AppError::NameAlreadyExists);
        }
        self.catalog_repo
            .update_unit(company_id, unit_id, payload)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn get_unit(&self, company_id: Uuid, unit_id: Uuid) -> Result<Unit, AppError> {
        self.catalog_repo
            .find_unit(company_id, unit_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list_units(
        &self,
        company_id: Uuid,
        params: &ListParams,
    ) -> Result<Paginated<Unit>, AppError> {
        let units = self
            .catalog_repo
            .list_units(
                company_id,
                Self::list_flag(params),
                params.search_term().as_deref(),
                PAGE_SIZE,
                params.offset(),
            )
            .await?;
        Ok(Paginated::new(units, params.page()))
    }

    pub async fn set_unit_active(
        &self,
        company_id: Uuid,
        unit_id: Uuid,
        is_active: bool,
    ) -> Result<(), AppError> {
        if !self
            .catalog_repo
            .set_unit_active(company_id, unit_id, is_active)
            .await?
        {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // ---
    // Produtos (wizard em dois passos)
    // ---

    pub async fn apply_product_step(
        &self,
        company_id: Uuid,
        product_id: Option<Uuid>,
        step: ProductStep,
    ) -> Result<Product, AppError> {
        match step {
            ProductStep::Data(payload) => match product_id {
                None => self.catalog_repo.create_product(company_id, &payload).await,
                Some(id) => self
                    .catalog_repo
                    .update_product(company_id, id, &payload)
                    .await?
                    .ok_or(AppError::NotFound),
            },
            ProductStep::Tax(payload) => {
                let id = product_id.ok_or(AppError::NotFound)?;
                self.apply_tax_step(company_id, id, &payload).await
            }
        }
    }

    // Primeiro salvamento fiscal cria a linha e vincula ao produto na
    // mesma transação; os seguintes mutam a linha existente.
    async fn apply_tax_step(
        &self,
        company_id: Uuid,
        product_id: Uuid,
        payload: &ProductTaxPayload,
    ) -> Result<Product, AppError> {
        let product = self
            .catalog_repo
            .find_product(company_id, product_id)
            .await?
            .ok_or(AppError::NotFound)?;

        match product.fiscal_data_id {
            Some(fiscal_id) => {
                self.catalog_repo
                    .update_fiscal_data(&self.pool, company_id, fiscal_id, payload)
                    .await?
                    .ok_or(AppError::NotFound)?;
            }
            None => {
                let mut tx = self.pool.begin().await?;
                let fiscal = self
                    .catalog_repo
                    .create_fiscal_data(&mut *tx, company_id, payload)
                    .await?;
                self.catalog_repo
                    .link_fiscal_data(&mut *tx, company_id, product.id, fiscal.id)
                    .await?;
                tx.commit().await?;
            }
        }

        self.catalog_repo
            .find_product(company_id, product_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn get_product(
        &self,
        company_id: Uuid,
        product_id: Uuid,
    ) -> Result<Product, AppError> {
        self.catalog_repo
            .find_product(company_id, product_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn get_product_fiscal_data(
        &self,
        company_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<ProductFiscalData>, AppError> {
        let product = self
            .catalog_repo
            .find_product(company_id, product_id)
            .await?
            .ok_or(AppError::NotFound)?;

        match product.fiscal_data_id {
            Some(fiscal_id) => match self.catalog_repo.find_fiscal_data(fiscal_id).await? {
                Some(fiscal) => Ok(Some(ensure_tenant(fiscal, company_id)?)),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    pub async fn list_products(
        &self,
        company_id: Uuid,
        params: &ListParams,
    ) -> Result<Paginated<Product>, AppError> {
        let products = self
            .catalog_repo
            .list_products(
                company_id,
                Self::list_flag(params),
                params.search_term().as_deref(),
                PAGE_SIZE,
                params.offset(),
            )
            .await?;
        Ok(Paginated::new(products, params.page()))
    }

    pub async fn set_product_active(
        &self,
        company_id: Uuid,
        product_id: Uuid,
        is_active: bool,
    ) -> Result<(), AppError> {
        if !self
            .catalog_repo
            .set_product_active(company_id, product_id, is_active)
            .await?
        {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
