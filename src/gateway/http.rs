//! HTTP gateway backed by `reqwest`

use super::PaymentGateway;
use crate::config::BackendConfig;
use crate::core::error::{ConfigError, GatewayError};
use crate::core::payment::{ErrorBody, PaymentAck, PaymentRequest};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};

/// Calls `POST {base_url}/initiate-payment` with a JSON body
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    client: Client,
    endpoint: Url,
}

impl HttpPaymentGateway {
    /// Build a gateway from backend configuration
    pub fn new(config: &BackendConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| ConfigError::HttpClient {
                message: e.to_string(),
            })?;

        Ok(Self::with_client(client, config))
    }

    /// Build a gateway around an existing client (shared connection pool, custom TLS)
    pub fn with_client(client: Client, config: &BackendConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint(),
        }
    }

    /// The resolved payment-initiation URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn initiate_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentAck, GatewayError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            phone = %request.masked_phone(),
            amount = request.amount,
            "Sending payment initiation request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Payment service did not respond");
                GatewayError::from(e)
            })?;

        let status = response.status();
        // Reading the body is part of the round trip: a connection dropped mid-body is
        // a transport failure even though the status line arrived.
        let bytes = response.bytes().await?;

        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "Payment service accepted request");
            return Ok(PaymentAck {
                status: status.as_u16(),
                body: serde_json::from_slice(&bytes).ok(),
            });
        }

        let body = serde_json::from_slice::<ErrorBody>(&bytes).ok();
        tracing::warn!(
            status = status.as_u16(),
            error = body.as_ref().map(|b| b.error.as_str()).unwrap_or("<none>"),
            "Payment service rejected request"
        );

        Err(GatewayError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
