// src/services/partner_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::validators::resolve_cpf_cnpj,
    db::{CompanyRepository, PartnerRepository},
    models::api::{ListParams, PAGE_SIZE, Paginated, StatusFilter},
    models::company::{Address, AddressPayload},
    models::partners::{
        Customer, CustomerAdvancedPayload, PartnerBasicPayload, Supplier, SupplierAdvancedPayload,
    },
};

// Passos do wizard de cliente. "basic" cria ou atualiza a identidade;
// os demais exigem um cliente já criado.
pub enum CustomerStep {
    Basic(PartnerBasicPayload),
    Advanced(CustomerAdvancedPayload),
    Address(AddressPayload),
}

pub enum SupplierStep {
    Basic(PartnerBasicPayload),
    Advanced(SupplierAdvancedPayload),
    Address(AddressPayload),
}

#[derive(Clone)]
pub struct PartnerService {
    partner_repo: PartnerRepository,
    company_repo: CompanyRepository,
    pool: PgPool,
}

impl PartnerService {
    pub fn new(
        partner_repo: PartnerRepository,
        company_repo: CompanyRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            partner_repo,
            company_repo,
            pool,
        }
    }

    fn list_flag(params: &ListParams) -> Option<bool> {
        params.status.unwrap_or(StatusFilter::Active).as_flag()
    }

    // ---
    // Clientes
    // ---

    pub async fn apply_customer_step(
        &self,
        company_id: Uuid,
        customer_id: Option<Uuid>,
        step: CustomerStep,
    ) -> Result<Customer, AppError> {
        match step {
            CustomerStep::Basic(payload) => {
                let cpf_cnpj = resolve_cpf_cnpj(
                    &payload.person_type,
                    payload.cpf.as_deref(),
                    payload.cnpj.as_deref(),
                )?;
                if self
                    .partner_repo
                    .customer_document_exists(company_id, &cpf_cnpj, customer_id)
                    .await?
                {
                    return Err(AppError::DocumentAlreadyExists);
                }
                match customer_id {
                    None => {
                        self.partner_repo
                            .create_customer(company_id, &payload, &cpf_cnpj)
                            .await
                    }
                    Some(id) => self
                        .partner_repo
                        .update_customer_basic(company_id, id, &payload, &cpf_cnpj)
                        .await?
                        .ok_or(AppError::NotFound),
                }
            }
            CustomerStep::Advanced(payload) => {
                let id = customer_id.ok_or(AppError::NotFound)?;
                self.partner_repo
                    .update_customer_advanced(company_id, id, &payload)
                    .await?
                    .ok_or(AppError::NotFound)
            }
            CustomerStep::Address(payload) => {
                let id = customer_id.ok_or(AppError::NotFound)?;
                let customer = self
                    .partner_repo
                    .find_customer(company_id, id)
                    .await?
                    .ok_or(AppError::NotFound)?;

                match customer.address_id {
                    Some(address_id) => {
                        self.company_repo
                            .update_address(&self.pool, address_id, &payload)
                            .await?;
                    }
                    None => {
                        let mut tx = self.pool.begin().await?;
                        let address =
                            self.company_repo.create_address(&mut *tx, &payload).await?;
                        self.partner_repo
                            .set_customer_address(&mut *tx, company_id, id, address.id)
                            .await?;
                        tx.commit().await?;
                    }
                }

                self.partner_repo
                    .find_customer(company_id, id)
                    .await?
                    .ok_or(AppError::NotFound)
            }
        }
    }

    pub async fn get_customer(
        &self,
        company_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Customer, AppError> {
        self.partner_repo
            .find_customer(company_id, customer_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn get_customer_address(
        &self,
        company_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<Address>, AppError> {
        let customer = self
            .partner_repo
            .find_customer(company_id, customer_id)
            .await?
            .ok_or(AppError::NotFound)?;
        match customer.address_id {
            Some(address_id) => self.company_repo.find_address(address_id).await,
            None => Ok(None),
        }
    }

    pub async fn list_customers(
        &self,
        company_id: Uuid,
        params: &ListParams,
    ) -> Result<Paginated<Customer>, AppError> {
        let customers = self
            .partner_repo
            .list_customers(
                company_id,
                Self::list_flag(params),
                params.search_term().as_deref(),
                PAGE_SIZE,
                params.offset(),
            )
            .await?;
        Ok(Paginated::new(customers, params.page()))
    }

    pub async fn set_customer_active(
        &self,
        company_id: Uuid,
        customer_id: Uuid,
        is_active: bool,
    ) -> Result<(), AppError> {
        if !self
            .partner_repo
            .set_customer_active(company_id, customer_id, is_active)
            .await?
        {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // ---
    // Fornecedores
    // ---

    pub async fn apply_supplier_step(
        &self,
        company_id: Uuid,
        supplier_id: Option<Uuid>,
        step: SupplierStep,
    ) -> Result<Supplier, AppError> {
        match step {
            SupplierStep::Basic(payload) => {
                // Fornecedor sem e-mail trava o fluxo de compras adiante.
                if payload
                    .email
                    .as_deref()
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .is_none()
                {
                    return Err(AppError::field(
                        "email",
                        "required",
                        "O e-mail é obrigatório para fornecedores.",
                    ));
                }
                let cpf_cnpj = resolve_cpf_cnpj(
                    &payload.person_type,
                    payload.cpf.as_deref(),
                    payload.cnpj.as_deref(),
                )?;
                if self
                    .partner_repo
                    .supplier_document_exists(company_id, &cpf_cnpj, supplier_id)
                    .await?
                {
                    return Err(AppError::DocumentAlreadyExists);
                }
                match supplier_id {
                    None => {
                        self.partner_repo
                            .create_supplier(company_id, &payload, &cpf_cnpj)
                            .await
                    }
                    Some(id) => self
                        .partner_repo
                        .update_supplier_basic(company_id, id, &payload, &cpf_cnpj)
                        .await?
                        .ok_or(AppError::NotFound),
                }
            }
            SupplierStep::Advanced(payload) => {
                let id = supplier_id.ok_or(AppError::NotFound)?;
                self.partner_repo
                    .update_supplier_advanced(company_id, id, &payload)
                    .await?
                    .ok_or(AppError::NotFound)
            }
            SupplierStep::Address(payload) => {
                let id = supplier_id.ok_or(AppError::NotFound)?;
                let supplier = self
                    .partner_repo
                    .find_supplier(company_id, id)
                    .await?
                    .ok_or(AppError::NotFound)?;

                match supplier.address_id {
                    Some(address_id) => {
                        self.company_repo
                            .update_address(&self.pool, address_id, &payload)
                            .await?;
                    }
                    None => {
                        let mut tx = self.pool.begin().await?;
                        let address =
                            self.company_repo.create_address(&mut *tx, &payload).await?;
                        self.partner_repo
                            .set_supplier_address(&mut *tx, company_id, id, address.id)
                            .await?;
                        tx.commit().await?;
                    }
                }

                self.partner_repo
                    .find_supplier(company_id, id)
                    .await?
                    .ok_or(AppError::NotFound)
            }
        }
    }

    pub async fn get_supplier(
        &self,
        company_id: Uuid,
        supplier_id: Uuid,
    ) -> Result<Supplier, AppError> {
        self.partner_repo
            .find_supplier(company_id, supplier_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn get_supplier_address(
        &self,
        company_id: Uuid,
        supplier_id: Uuid,
    ) -> Result<Option<Address>, AppError> {
        let supplier = self
            .partner_repo
            .find_supplier(company_id, supplier_id)
            .await?
            .ok_or(AppError::NotFound)?;
        match supplier.address_id {
            Some(address_id) => self.company_repo.find_address(address_id).await,
            None => Ok(None),
        }
    }

    pub async fn list_suppliers(
        &self,
        company_id: Uuid,
        params: &ListParams,
    ) -> Result<Paginated<Supplier>, AppError> {
        let suppliers = self
            .partner_repo
            .list_suppliers(
                company_id,
                Self::list_flag(params),
                params.search_term().as_deref(),
                PAGE_SIZE,
                params.offset(),
            )
            .await?;
        Ok(Paginated::new(suppliers, params.page()))
    }

    pub async fn set_supplier_active(
        &self,
        company_id: Uuid,
        supplier_id: Uuid,
        is_active: bool,
    ) -> Result<(), AppError> {
        if !self
            .partner_repo
            .set_supplier_active(company_id, supplier_id, is_active)
            .await?
        {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
