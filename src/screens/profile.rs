//! Profile and security settings: transaction PIN management and sign-out.

use crate::api::types::UserProfile;
use crate::api::UserService;
use crate::error::{ClientError, ClientResult};
use crate::screens::pin::is_valid_pin;
use crate::screens::scope::ScreenScope;
use crate::screens::{LoadState, LOAD_ERROR_MESSAGE};
use crate::session::{SessionError, TokenStore};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileEvent {
    PinSaved,
    ResetCodeAccepted,
    SignedOut,
}

fn check_pin(pin: &str, confirm: &str) -> ClientResult<()> {
    if !is_valid_pin(pin) {
        return Err(ClientError::validation("PIN must be 4 digits", Some("pin")));
    }
    if pin != confirm {
        return Err(ClientError::validation("PINs do not match", Some("confirm_pin")));
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct ProfileScreen {
    state: LoadState<UserProfile>,
    busy: bool,
    error: Option<String>,
}

impl ProfileScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState<UserProfile> {
        &self.state
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.state.ready()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn load(&mut self, users: &dyn UserService, scope: &ScreenScope) {
        self.state = LoadState::Loading;
        match scope.run(users.get_profile()).await {
            None => {}
            Some(Ok(response)) => self.state = LoadState::Ready(response.data),
            Some(Err(e)) => {
                warn!(error = %e, "failed to load profile");
                self.state = LoadState::Failed(LOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    /// First-time PIN setup.
    pub async fn set_pin(
        &mut self,
        users: &dyn UserService,
        pin: &str,
        confirm: &str,
        scope: &ScreenScope,
    ) -> ClientResult<Option<ProfileEvent>> {
        check_pin(pin, confirm).inspect_err(|e| self.error = Some(e.user_message()))?;
        let outcome = self.submit(scope, users.set_pin(pin)).await?;
        if outcome.is_some() {
            if let LoadState::Ready(profile) = &mut self.state {
                profile.has_pin = Some(true);
            }
            info!("transaction pin set");
        }
        Ok(outcome.map(|_| ProfileEvent::PinSaved))
    }

    /// Replace the PIN after the reset code was verified.
    pub async fn reset_pin(
        &mut self,
        users: &dyn UserService,
        pin: &str,
        confirm: &str,
        scope: &ScreenScope,
    ) -> ClientResult<Option<ProfileEvent>> {
        check_pin(pin, confirm).inspect_err(|e| self.error = Some(e.user_message()))?;
        let outcome = self.submit(scope, users.reset_pin(pin)).await?;
        Ok(outcome.map(|_| ProfileEvent::PinSaved))
    }

    pub async fn verify_reset_code(
        &mut self,
        users: &dyn UserService,
        code: &str,
        scope: &ScreenScope,
    ) -> ClientResult<Option<ProfileEvent>> {
        let code = code.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            let e = ClientError::validation("Enter the code we sent you", Some("code"));
            self.error = Some(e.user_message());
            return Err(e);
        }
        let outcome = self.submit(scope, users.verify_reset_pin(code)).await?;
        Ok(outcome.map(|_| ProfileEvent::ResetCodeAccepted))
    }

    /// Forget the stored token. The next service call fails as unauthenticated.
    pub fn sign_out(&mut self, store: &dyn TokenStore) -> Result<ProfileEvent, SessionError> {
        store.clear()?;
        self.state = LoadState::Loading;
        self.error = None;
        info!("signed out");
        Ok(ProfileEvent::SignedOut)
    }

    /// `Ok(None)` when the screen unmounted before the call finished.
    async fn submit<F, T>(&mut self, scope: &ScreenScope, call: F) -> ClientResult<Option<T>>
    where
        F: std::future::Future<Output = ClientResult<T>>,
    {
        self.busy = true;
        self.error = None;
        let result = scope.run(call).await;
        self.busy = false;

        match result {
            None => Ok(None),
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(e)) => {
                warn!(error = %e, "profile update failed");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}
