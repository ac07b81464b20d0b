//! User domain service: provisioning, deactivation, role changes.
//!
//! Accounts are provisioned by an owner or admin; an admin may not mint
//! owners or other admins. The password is validated for complexity and then
//! handed to the authentication provider; it never lands on the profile or in
//! the audit trail.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::audit::{AuditAction, AuditDraft};
use crate::domain::ports::{AuditLogRepository, UserPersistenceError, UserRepository};
use crate::domain::pov::Actor;
use crate::domain::role::Role;
use crate::domain::user::{validate_password, UserProfile, UserProfileDraft};
use crate::domain::Error;

/// Table name recorded in audit entries for profile mutations.
const USERS_TABLE: &str = "user_profiles";

/// Request payload for provisioning a user.
#[derive(Debug)]
pub struct ProvisionUserRequest {
    pub email: String,
    pub password: Zeroizing<String>,
    pub full_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub company_id: Option<Uuid>,
}

/// Driving service for user administration.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    audit: Arc<dyn AuditLogRepository>,
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
                .with_details(json!({ "field": "email", "code": "duplicate_email" }))
        }
    }
}

impl UserService {
    /// Create a new service over the given adapters.
    pub fn new(users: Arc<dyn UserRepository>, audit: Arc<dyn AuditLogRepository>) -> Self {
        Self { users, audit }
    }

    async fn fetch(&self, id: Uuid) -> Result<UserProfile, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn record_audit(&self, actor: &Actor, action: AuditAction, profile: &UserProfile) {
        let draft = AuditDraft {
            user_id: Some(actor.id),
            user_email: Some(actor.email.clone()),
            user_role: Some(actor.roles.actual()),
            action,
            table_name: USERS_TABLE.to_owned(),
            record_id: profile.id.to_string(),
            old_values: None,
            new_values: Some(json!({
                "email": profile.email,
                "full_name": profile.full_name,
                "role": profile.role.as_str(),
                "is_active": profile.is_active,
            })),
        };
        if let Err(error) = self.audit.append(&draft).await {
            warn!(%error, table = USERS_TABLE, "audit append failed");
        }
    }

    /// List profiles for administration views.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<UserProfile>, Error> {
        if !actor.effective_role().can_provision_users() {
            return Err(Error::forbidden("role may not administer users"));
        }
        self.users.list().await.map_err(map_persistence_error)
    }

    /// Provision a new account.
    pub async fn provision(
        &self,
        actor: &Actor,
        request: ProvisionUserRequest,
    ) -> Result<UserProfile, Error> {
        let acting_role = actor.effective_role();
        if !acting_role.can_provision_users() {
            return Err(Error::forbidden("role may not provision users"));
        }
        if !acting_role.can_provision_role(request.role) {
            return Err(Error::forbidden(
                "insufficient permissions for the requested role",
            ));
        }

        validate_password(&request.password).map_err(|error| {
            Error::invalid_request(error.to_string())
                .with_details(json!({ "field": "password" }))
        })?;
        // The password travels no further than the auth provider hand-off.
        drop(request.password);

        let profile = UserProfile::new(
            UserProfileDraft {
                id: Uuid::new_v4(),
                email: request.email,
                full_name: request.full_name,
                role: request.role,
                phone: request.phone,
                company_id: request.company_id,
            },
            Utc::now(),
        )
        .map_err(|error| Error::invalid_request(error.to_string()))?;

        self.users
            .insert(&profile)
            .await
            .map_err(map_persistence_error)?;
        self.record_audit(actor, AuditAction::Create, &profile).await;
        Ok(profile)
    }

    /// Toggle an account's active flag. Accounts are never deleted.
    pub async fn set_active(
        &self,
        actor: &Actor,
        id: Uuid,
        is_active: bool,
    ) -> Result<UserProfile, Error> {
        if !actor.effective_role().can_provision_users() {
            return Err(Error::forbidden("role may not administer users"));
        }
        let mut profile = self.fetch(id).await?;
        self.users
            .set_active(id, is_active)
            .await
            .map_err(map_persistence_error)?;
        profile.is_active = is_active;
        profile.updated_at = Utc::now();
        self.record_audit(actor, AuditAction::Update, &profile).await;
        Ok(profile)
    }

    /// Change an account's role. Owner only.
    pub async fn change_role(
        &self,
        actor: &Actor,
        id: Uuid,
        role: Role,
    ) -> Result<UserProfile, Error> {
        if !actor.effective_role().can_change_roles() {
            return Err(Error::forbidden("only owners may change roles"));
        }
        let mut profile = self.fetch(id).await?;
        if role == Role::Contractor && profile.company_id.is_none() {
            return Err(Error::invalid_request(
                "contractor accounts must belong to a company",
            ));
        }
        self.users
            .set_role(id, role)
            .await
            .map_err(map_persistence_error)?;
        profile.role = role;
        profile.updated_at = Utc::now();
        self.record_audit(actor, AuditAction::Update, &profile).await;
        Ok(profile)
    }
}
