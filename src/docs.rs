// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::users::get_me,
        handlers::users::change_password,
        handlers::users::get_my_companies,
        handlers::users::select_company,

        // --- Memberships ---
        handlers::users::list_memberships,
        handlers::users::create_membership,
        handlers::users::get_membership,
        handlers::users::update_membership,
        handlers::users::deactivate_membership,
        handlers::users::reactivate_membership,
        handlers::users::list_permissions,

        // --- Companies ---
        handlers::company::setup_company,
        handlers::company::get_current_company,
        handlers::company::update_current_company,

        // --- Catalog ---
        handlers::catalog::create_category,
        handlers::catalog::list_categories,
        handlers::catalog::get_category,
        handlers::catalog::update_category,
        handlers::catalog::deactivate_category,
        handlers::catalog::reactivate_category,
        handlers::catalog::create_unit,
        handlers::catalog::list_units,
        handlers::catalog::get_unit,
        handlers::catalog::update_unit,
        handlers::catalog::deactivate_unit,
        handlers::catalog::reactivate_unit,
        handlers::catalog::create_product,
        handlers::catalog::update_product_data,
        handlers::catalog::update_product_tax,
        handlers::catalog::list_products,
        handlers::catalog::get_product,
        handlers::catalog::get_product_tax,
        handlers::catalog::deactivate_product,
        handlers::catalog::reactivate_product,

        // --- Partners ---
        handlers::partners::create_customer,
        handlers::partners::update_customer_basic,
        handlers::partners::update_customer_advanced,
        handlers::partners::update_customer_address,
        handlers::partners::list_customers,
        handlers::partners::get_customer,
        handlers::partners::get_customer_address,
        handlers::partners::deactivate_customer,
        handlers::partners::reactivate_customer,
        handlers::partners::create_supplier,
        handlers::partners::update_supplier_basic,
        handlers::partners::update_supplier_advanced,
        handlers::partners::update_supplier_address,
        handlers::partners::list_suppliers,
        handlers::partners::get_supplier,
        handlers::partners::get_supplier_address,
        handlers::partners::deactivate_supplier,
        handlers::partners::reactivate_supplier,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::ChangePasswordPayload,
            models::auth::SelectCompanyPayload,
            models::auth::AuthResponse,

            // --- Companies ---
            models::company::TaxRegime,
            models::company::Environment,
            models::company::Company,
            models::company::Establishment,
            models::company::Address,
            models::company::AddressPayload,
            models::company::CompanySetupPayload,
            models::company::CompanyUpdatePayload,

            // --- Memberships ---
            models::membership::Role,
            models::membership::Membership,
            models::membership::MembershipWithUser,
            models::membership::MembershipDetail,
            models::membership::Permission,
            models::membership::CreateMembershipPayload,
            models::membership::UpdateMembershipPayload,

            // --- Catalog ---
            models::catalog::Category,
            models::catalog::CategoryPayload,
            models::catalog::Unit,
            models::catalog::UnitPayload,
            models::catalog::Product,
            models::catalog::ProductDataPayload,
            models::catalog::ProductFiscalData,
            models::catalog::ProductTaxPayload,

            // --- Partners ---
            models::partners::PersonType,
            models::partners::PartnerType,
            models::partners::TaxPayerType,
            models::partners::Customer,
            models::partners::Supplier,
            models::partners::PartnerBasicPayload,
            models::partners::CustomerAdvancedPayload,
            models::partners::SupplierAdvancedPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Companies", description = "Ciclo de vida da Empresa"),
        (name = "Memberships", description = "Membros e Permissões da Empresa"),
        (name = "Catalog", description = "Catálogo: Categorias, Unidades e Produtos"),
        (name = "Partners", description = "Parceiros: Clientes e Fornecedores")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
