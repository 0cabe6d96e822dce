//! JWT-bearer grant exchange against the OAuth 2.0 token endpoint.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Secret},
	error::ExchangeError,
	http::RelayHttpClient,
};

/// Grant type identifier of the service-account JWT bearer flow.
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Deserialize)]
struct TokenEndpointResponse {
	access_token: String,
	expires_in: i64,
}

/// Exchanges signed assertions for access tokens.
///
/// Each call performs exactly one outbound request and consumes one fresh assertion;
/// assertions are single-use by convention of the flow. Retry policy lives in the
/// submission pipeline, never here.
#[derive(Clone, Debug)]
pub struct TokenExchanger {
	http: RelayHttpClient,
	token_endpoint: Url,
}
impl TokenExchanger {
	/// Creates an exchanger bound to the given token endpoint.
	pub fn new(http: RelayHttpClient, token_endpoint: Url) -> Self {
		Self { http, token_endpoint }
	}

	/// Returns the token endpoint this exchanger redeems assertions at.
	pub fn token_endpoint(&self) -> &Url {
		&self.token_endpoint
	}

	/// Redeems a signed assertion for an access token.
	pub async fn exchange(&self, assertion: &str) -> Result<AccessToken> {
		let response = self
			.http
			.post(self.token_endpoint.clone())
			.form(&[("grant_type", JWT_BEARER_GRANT_TYPE), ("assertion", assertion)])
			.send()
			.await
			.map_err(ExchangeError::from)?;
		let status = response.status();

		if !status.is_success() {
			return Err(ExchangeError::TokenEndpoint {
				status: status.as_u16(),
				status_text: status.canonical_reason().unwrap_or("unknown status").into(),
			}
			.into());
		}

		let body = response.bytes().await.map_err(ExchangeError::from)?;
		let mut deserializer = serde_json::Deserializer::from_slice(&body);
		let parsed: TokenEndpointResponse = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ExchangeError::MalformedResponse { source })?;

		Ok(AccessToken {
			secret: Secret::new(parsed.access_token),
			expires_in: Duration::seconds(parsed.expires_in),
		})
	}
}
