//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The authentication provider integration (out of scope here) persists the
//! subject into the cookie session after a successful login; handlers only
//! ever read it back through [`SessionContext`]. The owner's view-as override
//! lives in the same cookie, which is the server-side analogue of the
//! client-persisted preview selection.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::domain::{Actor, Error, Role, RoleContext};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USER_EMAIL_KEY: &str = "user_email";
pub(crate) const USER_ROLE_KEY: &str = "user_role";
pub(crate) const VIEW_AS_KEY: &str = "view_as_role";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    fn read_key<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        self.0
            .get::<T>(key)
            .map_err(|error| Error::internal(format!("failed to read session key {key}: {error}")))
    }

    /// Persist the authenticated subject. Called by the auth integration once
    /// the provider has vouched for the identity.
    pub fn persist_subject(&self, id: Uuid, email: &str, role: Role) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, id.to_string())
            .and_then(|()| self.0.insert(USER_EMAIL_KEY, email))
            .and_then(|()| self.0.insert(USER_ROLE_KEY, role.as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the acting subject, or `401 Unauthorized` when absent.
    ///
    /// A stale view-as value held by a non-owner is scrubbed by
    /// [`RoleContext::new`] rather than rejected.
    pub fn require_actor(&self) -> Result<Actor, Error> {
        let id: Uuid = self
            .read_key::<String>(USER_ID_KEY)?
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| Error::unauthorized("authentication required"))?;
        let email = self
            .read_key::<String>(USER_EMAIL_KEY)?
            .ok_or_else(|| Error::unauthorized("authentication required"))?;
        let role: Role = self
            .read_key::<String>(USER_ROLE_KEY)?
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| Error::unauthorized("authentication required"))?;
        let view_as = self
            .read_key::<String>(VIEW_AS_KEY)?
            .and_then(|raw| raw.parse().ok());

        Ok(Actor {
            id,
            email,
            roles: RoleContext::new(role, view_as),
        })
    }

    /// Set or clear the owner's view-as override, persisting the result.
    pub fn set_view_as(&self, actor: &Actor, role: Option<Role>) -> Result<RoleContext, Error> {
        let mut context = actor.roles;
        let persisted = context
            .set_view_as(role)
            .map_err(|error| Error::forbidden(error.to_string()))?;
        match persisted {
            Some(role) => self
                .0
                .insert(VIEW_AS_KEY, role.as_str())
                .map_err(|error| Error::internal(format!("failed to persist view-as: {error}")))?,
            None => drop(self.0.remove(VIEW_AS_KEY)),
        }
        Ok(context)
    }
}

impl FromRequest for SessionContext {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move {
            session
                .await
                .map(Self::new)
                .map_err(|error| Error::internal(format!("session unavailable: {error}")))
        })
    }
}
