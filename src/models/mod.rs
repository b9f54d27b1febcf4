pub mod api;
pub mod auth;
pub mod catalog;
pub mod company;
pub mod membership;
pub mod partners;

use uuid::Uuid;

/// Capacidade compartilhada de todo registro pertencente a uma empresa:
/// a referência de dono e o soft-delete. Substitui a herança de base
/// abstrata por um contrato explícito.
pub trait TenantOwned {
    fn company_id(&self) -> Uuid;
    fn is_active(&self) -> bool;
}
