//! Session and device preferences for the Desk.

use log::info;

use super::Desk;
use crate::{
    error::{DocketError, Result},
    models::{Jurisdiction, UserSession},
    params::{ForgotPassword, Login, Register, ResetPassword},
};

impl Desk {
    /// Logs in and stores the session.
    pub async fn login(&self, params: &Login) -> Result<UserSession> {
        let token = self.client.login(params).await?;
        let session = UserSession {
            token: token.access_token,
            user_name: token.user_name,
            email: params.email.clone(),
        };
        self.store_session(session).await
    }

    /// Creates an account and stores the resulting session.
    pub async fn register(&self, params: &Register) -> Result<UserSession> {
        if params.full_name.trim().is_empty() {
            return Err(DocketError::invalid_input("full_name").with_reason("name is required"));
        }
        let token = self.client.register(params).await?;
        let user_name = if token.user_name.is_empty() {
            params.full_name.clone()
        } else {
            token.user_name
        };
        let session = UserSession {
            token: token.access_token,
            user_name,
            email: params.email.clone(),
        };
        self.store_session(session).await
    }

    async fn store_session(&self, session: UserSession) -> Result<UserSession> {
        let stored = session.clone();
        self.with_store(move |store| store.save_session(&stored))
            .await?;
        info!("Logged in as {}", session.email);
        Ok(session)
    }

    /// Requests a password reset code by email.
    pub async fn forgot_password(&self, params: &ForgotPassword) -> Result<()> {
        self.client.forgot_password(params).await
    }

    /// Sets a new password using the emailed code.
    pub async fn reset_password(&self, params: &ResetPassword) -> Result<()> {
        self.client.reset_password(params).await
    }

    /// Forgets the stored session. Returns whether one existed.
    pub async fn logout(&self) -> Result<bool> {
        let had_session = self
            .with_store(|store| {
                let had_session = store.session()?.is_some();
                store.clear_session()?;
                Ok(had_session)
            })
            .await?;
        if had_session {
            info!("Logged out");
        }
        Ok(had_session)
    }

    /// The stored session, if logged in.
    pub async fn current_session(&self) -> Result<Option<UserSession>> {
        self.with_store(|store| store.session()).await
    }

    /// The stored jurisdiction (unset if never chosen).
    pub async fn jurisdiction(&self) -> Result<Jurisdiction> {
        self.with_store(|store| store.jurisdiction()).await
    }

    /// Stores the state/district used to contextualise new cases.
    pub async fn set_jurisdiction(&self, jurisdiction: Jurisdiction) -> Result<Jurisdiction> {
        if !jurisdiction.is_set() {
            return Err(DocketError::invalid_input("state").with_reason("state is required"));
        }
        let stored = jurisdiction.clone();
        self.with_store(move |store| store.save_jurisdiction(&stored))
            .await?;
        Ok(jurisdiction)
    }
}
