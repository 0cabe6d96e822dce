//! Service-account credential records and loaders.

// std
use std::{fs, path::Path};
// self
use crate::{_prelude::*, auth::Secret, error::CredentialsError};

/// Immutable service-account identity material in the standard cloud-provider JSON shape.
///
/// Only the fields that participate in assertion signing are kept; the remaining metadata
/// fields of the credential file (`project_id`, certificate URLs, and so on) are ignored
/// during deserialization. Loaded once at startup and owned by the
/// [`AssertionSigner`](crate::auth::AssertionSigner) for the process lifetime.
#[derive(Clone, Debug, Deserialize)]
pub struct ServiceAccountCredentials {
	/// Service-account email; used as both issuer and subject of every assertion.
	pub client_email: String,
	/// Numeric client identifier carried in the assertion's `uid` claim.
	pub client_id: String,
	/// PEM-encoded PKCS#8 private signing key.
	pub private_key: Secret,
	/// Key identifier stamped into the assertion header.
	pub private_key_id: String,
	/// Token endpoint the assertion is redeemed at; doubles as the assertion audience.
	pub token_uri: Url,
}
impl ServiceAccountCredentials {
	/// Deserializes credentials from raw service-account JSON.
	pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CredentialsError> {
		let mut deserializer = serde_json::Deserializer::from_slice(bytes);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| CredentialsError::Parse { source })
	}

	/// Reads and deserializes a service-account JSON file.
	pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CredentialsError> {
		let path = path.as_ref();
		let bytes = fs::read(path)
			.map_err(|source| CredentialsError::Io { source, path: path.to_path_buf() })?;

		Self::from_json_slice(&bytes)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	#[test]
	fn loads_standard_service_account_json() {
		let json = format!(
			"{{\"type\":\"service_account\",\"project_id\":\"test-project\",\
			\"private_key_id\":\"{TEST_KEY_ID}\",\"private_key\":\"dummy\",\
			\"client_email\":\"{TEST_CLIENT_EMAIL}\",\"client_id\":\"{TEST_CLIENT_ID}\",\
			\"auth_uri\":\"https://accounts.example/o/oauth2/auth\",\
			\"token_uri\":\"https://oauth2.example/token\",\
			\"universe_domain\":\"example.com\"}}"
		);
		let credentials = ServiceAccountCredentials::from_json_slice(json.as_bytes())
			.expect("Standard credential JSON should deserialize.");

		assert_eq!(credentials.client_email, TEST_CLIENT_EMAIL);
		assert_eq!(credentials.client_id, TEST_CLIENT_ID);
		assert_eq!(credentials.private_key_id, TEST_KEY_ID);
		assert_eq!(credentials.token_uri.as_str(), "https://oauth2.example/token");
	}

	#[test]
	fn rejects_json_missing_signing_fields() {
		let error = ServiceAccountCredentials::from_json_slice(b"{\"client_email\":\"x@y\"}")
			.expect_err("Credential JSON without a private key should fail.");

		assert!(matches!(error, CredentialsError::Parse { .. }));
	}

	#[test]
	fn missing_file_reports_path() {
		let error = ServiceAccountCredentials::from_json_file("/nonexistent/account.json")
			.expect_err("Missing credential file should fail.");

		assert!(matches!(error, CredentialsError::Io { .. }));
	}
}
