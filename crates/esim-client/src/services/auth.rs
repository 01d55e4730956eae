use crate::resilient::resilient;
use crate::{demo, ApiError, Result, SessionStore, Transport};
use esim_common::{Session, UserProfile};
use esim_config::{Capability, ConfigResolver};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Registration<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

/// Authentication capability. Login and register persist the resulting
/// session; an unreachable backend degrades to a demo session whose
/// identity echoes the submitted email.
pub struct AuthService {
    config: Arc<ConfigResolver>,
    transport: Arc<Transport>,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(
        config: Arc<ConfigResolver>,
        transport: Arc<Transport>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            config,
            transport,
            session,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let endpoint = self.config.resolve_endpoint(Capability::Auth).await;
        let session = resilient(
            Capability::Auth,
            endpoint,
            |base| async move {
                self.transport
                    .post(&format!("{base}/auth/login/"), &Credentials { email, password })
                    .await
            },
            || async move { Ok(demo::session(email, None)) },
        )
        .await?;

        self.session.save(&session).await?;
        Ok(session)
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<Session> {
        let endpoint = self.config.resolve_endpoint(Capability::Auth).await;
        let session = resilient(
            Capability::Auth,
            endpoint,
            |base| async move {
                self.transport
                    .post(
                        &format!("{base}/auth/register/"),
                        &Registration { email, password, name },
                    )
                    .await
            },
            || async move { Ok(demo::session(email, Some(name))) },
        )
        .await?;

        self.session.save(&session).await?;
        Ok(session)
    }

    /// The authenticated identity; in synthetic mode, the persisted one.
    pub async fn current_user(&self) -> Result<UserProfile> {
        let endpoint = self.config.resolve_endpoint(Capability::Auth).await;
        resilient(
            Capability::Auth,
            endpoint,
            |base| async move { self.transport.get(&format!("{base}/auth/user/")).await },
            || async move {
                self.session
                    .current()
                    .await?
                    .map(|s| s.user)
                    .ok_or(ApiError::Unauthorized)
            },
        )
        .await
    }

    pub async fn logout(&self) -> Result<()> {
        self.session.clear().await
    }
}
