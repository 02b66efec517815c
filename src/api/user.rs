use crate::api::types::{Acknowledgement, PinRequest, ProfileResponse, VerifyResetPinRequest};
use crate::api::{ThunderClient, UserService};
use crate::error::ClientResult;
use async_trait::async_trait;
use tracing::info;

#[async_trait]
impl UserService for ThunderClient {
    async fn get_profile(&self) -> ClientResult<ProfileResponse> {
        self.http().get("/users/profile").await
    }

    async fn set_pin(&self, pin: &str) -> ClientResult<Acknowledgement> {
        let ack: Acknowledgement = self
            .http()
            .post(
                "/users/set-pin",
                &PinRequest {
                    pin: pin.to_string(),
                },
            )
            .await?;
        info!("transaction PIN set");
        Ok(ack)
    }

    async fn reset_pin(&self, pin: &str) -> ClientResult<Acknowledgement> {
        let ack: Acknowledgement = self
            .http()
            .post(
                "/users/reset-pin",
                &PinRequest {
                    pin: pin.to_string(),
                },
            )
            .await?;
        info!("transaction PIN reset requested");
        Ok(ack)
    }

    async fn verify_reset_pin(&self, code: &str) -> ClientResult<Acknowledgement> {
        self.http()
            .post(
                "/users/reset-pin/verify",
                &VerifyResetPinRequest {
                    code: code.to_string(),
                },
            )
            .await
    }
}
