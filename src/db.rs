pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod membership_repo;
pub use membership_repo::MembershipRepository;
pub mod partner_repo;
pub use partner_repo::PartnerRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
