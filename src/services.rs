use uuid::Uuid;

use crate::{common::error::AppError, models::TenantOwned};

pub mod auth;
pub use auth::AuthService;
pub mod catalog_service;
pub use catalog_service::{CatalogService, ProductStep};
pub mod company_service;
pub use company_service::CompanyService;
pub mod membership_service;
pub use membership_service::MembershipService;
pub mod partner_service;
pub use partner_service::{CustomerStep, PartnerService, SupplierStep};

// Portão de tenancy para registros que dão acesso a tabelas sem
// company_id (endereços, dados fiscais): o dono precisa pertencer à
// empresa da requisição, senão o registro não existe para ela.
pub(crate) fn ensure_tenant<T: TenantOwned>(record: T, company_id: Uuid) -> Result<T, AppError> {
    if record.company_id() != company_id {
        return Err(AppError::NotFound);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::catalog::Category;

    fn category(company_id: Uuid) -> Category {
        Category {
            id: Uuid::new_v4(),
            company_id,
            is_active: true,
            name: "Bebidas".into(),
            slug: "bebidas".into(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn foreign_company_record_reads_as_not_found() {
        let company = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(ensure_tenant(category(company), company).is_ok());
        assert!(matches!(
            ensure_tenant(category(other), company),
            Err(AppError::NotFound)
        ));
    }
}
