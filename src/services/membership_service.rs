// src/services/membership_service.rs

use bcrypt::hash;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::validators::split_full_name,
    db::{MembershipRepository, UserRepository},
    models::api::{ListParams, PAGE_SIZE, Paginated, StatusFilter},
    models::membership::{
        CreateMembershipPayload, Membership, MembershipDetail, MembershipWithUser, Permission,
        Role, UpdateMembershipPayload,
    },
};

#[derive(Clone)]
pub struct MembershipService {
    membership_repo: MembershipRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl MembershipService {
    pub fn new(
        membership_repo: MembershipRepository,
        user_repo: UserRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            membership_repo,
            user_repo,
            pool,
        }
    }

    // Convida (ou cria) um usuário para a empresa. Se o e-mail já existe,
    // o usuário é reaproveitado e só o vínculo é criado; senão, a conta
    // nasce junto, na mesma transação.
    pub async fn create(
        &self,
        company_id: Uuid,
        payload: &CreateMembershipPayload,
    ) -> Result<Membership, AppError> {
        if payload.password != payload.password_confirm {
            return Err(AppError::field(
                "passwordConfirm",
                "mismatch",
                "As senhas não conferem.",
            ));
        }
        Self::require_permissions_for_member(payload.role, &payload.permissions)?;

        let existing = self.user_repo.find_by_email(&payload.email).await?;

        // Só gasta o custo do bcrypt quando a conta é nova.
        let new_user_hash = if existing.is_none() {
            let password_clone = payload.password.clone();
            let hashed =
                tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                    .await
                    .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
            Some(hashed)
        } else {
            None
        };

        let mut tx = self.pool.begin().await?;

        let user_id = match existing {
            Some(user) => {
                if self
                    .membership_repo
                    .find_by_user_and_company(user.id, company_id)
                    .await?
                    .is_some()
                {
                    return Err(AppError::MembershipAlreadyExists);
                }
                user.id
            }
            None => {
                let (first_name, last_name) = split_full_name(&payload.name);
                let hashed = new_user_hash
                    .ok_or_else(|| anyhow::anyhow!("Hash ausente para usuário novo"))?;
                self.user_repo
                    .create_user(&mut *tx, &payload.email, &hashed, &first_name, &last_name)
                    .await?
                    .id
            }
        };

        let key = Uuid::new_v4().simple().to_string();
        let membership = self
            .membership_repo
            .create(&mut *tx, company_id, user_id, payload.role, &key)
            .await?;

        self.membership_repo
            .set_permissions(&mut tx, membership.id, &payload.permissions)
            .await?;

        tx.commit().await?;
        Ok(membership)
    }

    pub async fn update(
        &self,
        company_id: Uuid,
        membership_id: Uuid,
        payload: &UpdateMembershipPayload,
    ) -> Result<Membership, AppError> {
        Self::require_permissions_for_member(payload.role, &payload.permissions)?;

        let membership = self
            .membership_repo
            .find_in_company(company_id, membership_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let (first_name, last_name) = split_full_name(&payload.name);

        let mut tx = self.pool.begin().await?;
        self.user_repo
            .update_names(&mut *tx, membership.user_id, &first_name, &last_name)
            .await?;
        self.user_repo
            .update_email(&mut *tx, membership.user_id, &payload.email)
            .await?;
        self.membership_repo
            .update_role(&mut *tx, membership.id, payload.role)
            .await?;
        self.membership_repo
            .set_permissions(&mut tx, membership.id, &payload.permissions)
            .await?;
        tx.commit().await?;

        self.membership_repo
            .find_in_company(company_id, membership_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list(
        &self,
        company_id: Uuid,
        params: &ListParams,
    ) -> Result<Paginated<MembershipWithUser>, AppError> {
        // Usuários são a única listagem onde "all" é o padrão: o fluxo de
        // reativação precisa enxergar os desativados.
        let is_active = params.status.unwrap_or(StatusFilter::All).as_flag();
        let members = self
            .membership_repo
            .list(
                company_id,
                is_active,
                params.search_term().as_deref(),
                PAGE_SIZE,
                params.offset(),
            )
            .await?;
        Ok(Paginated::new(members, params.page()))
    }

    pub async fn detail(
        &self,
        company_id: Uuid,
        membership_id: Uuid,
    ) -> Result<MembershipDetail, AppError> {
        let membership = self
            .membership_repo
            .find_in_company(company_id, membership_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let user = self
            .user_repo
            .find_by_id(membership.user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let permissions = self
            .membership_repo
            .list_permissions_for(membership.id)
            .await?;

        Ok(MembershipDetail {
            member: MembershipWithUser {
                id: membership.id,
                company_id: membership.company_id,
                user_id: membership.user_id,
                role: membership.role,
                is_active: membership.is_active,
                email: user.email,
                first_name: user.first_name,
                last_name: user.last_name,
                created_at: membership.created_at,
            },
            permissions,
        })
    }

    // Desativa o vínculo. Se a empresa desativada era a ativa da sessão
    // do usuário, o ponteiro é limpo para não deixar contexto fantasma.
    pub async fn deactivate(
        &self,
        company_id: Uuid,
        membership_id: Uuid,
    ) -> Result<(), AppError> {
        let membership = self
            .membership_repo
            .find_in_company(company_id, membership_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let user = self
            .user_repo
            .find_by_id(membership.user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let mut tx = self.pool.begin().await?;
        self.membership_repo
            .set_active(&mut *tx, membership.id, false)
            .await?;
        if user.company_active == Some(company_id) {
            self.user_repo
                .set_company_active(&mut *tx, user.id, None)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    // Reativa o vínculo. A empresa ativa só é restaurada se o usuário
    // estiver sem nenhuma; uma seleção feita nesse meio-tempo prevalece.
    pub async fn reactivate(
        &self,
        company_id: Uuid,
        membership_id: Uuid,
    ) -> Result<(), AppError> {
        let membership = self
            .membership_repo
            .find_in_company(company_id, membership_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let user = self
            .user_repo
            .find_by_id(membership.user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let mut tx = self.pool.begin().await?;
        self.membership_repo
            .set_active(&mut *tx, membership.id, true)
            .await?;
        if user.company_active.is_none() {
            self.user_repo
                .set_company_active(&mut *tx, user.id, Some(company_id))
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_permissions(&self) -> Result<Vec<Permission>, AppError> {
        self.membership_repo.list_all_permissions().await
    }

    // MEMBER sem nenhuma permissão seria um vínculo inútil; owner e admin
    // têm passe livre e não precisam de lista.
    fn require_permissions_for_member(
        role: Role,
        permissions: &[Uuid],
    ) -> Result<(), AppError> {
        if role == Role::Member && permissions.is_empty() {
            return Err(AppError::field(
                "permissions",
                "required",
                "Selecione ao menos uma permissão para o papel de membro.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_role_requires_at_least_one_permission() {
        let err = MembershipService::require_permissions_for_member(Role::Member, &[]);
        assert!(err.is_err());

        let ok = MembershipService::require_permissions_for_member(Role::Member, &[Uuid::new_v4()]);
        assert!(ok.is_ok());
    }

    #[test]
    fn owner_and_admin_do_not_require_permissions() {
        assert!(MembershipService::require_permissions_for_member(Role::Owner, &[]).is_ok());
        assert!(MembershipService::require_permissions_for_member(Role::Admin, &[]).is_ok());
    }
}
