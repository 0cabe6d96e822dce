//! Relay-wide error types shared across the auth, exchange, and submission layers.

// std
use std::path::PathBuf;
// self
use crate::_prelude::*;

/// Relay-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical relay error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Service-account credential material could not be loaded.
	#[error(transparent)]
	Credentials(#[from] CredentialsError),
	/// Assertion could not be built or signed.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Token endpoint rejected or mangled the exchange.
	#[error(transparent)]
	Exchange(#[from] ExchangeError),
	/// Downstream document store rejected the submission.
	#[error(transparent)]
	Submit(#[from] SubmitError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Failures raised while loading service-account credentials.
#[derive(Debug, ThisError)]
pub enum CredentialsError {
	/// Credential file could not be read.
	#[error("Credential file `{path}` could not be read.")]
	Io {
		/// Underlying filesystem failure.
		#[source]
		source: std::io::Error,
		/// Path the loader attempted to read.
		path: PathBuf,
	},
	/// Credential JSON does not match the service-account shape.
	#[error("Credential JSON does not match the service-account shape.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Failures raised while building a signed assertion.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Private key material could not be parsed as PEM/PKCS#8.
	#[error("Private key could not be decoded as PEM/PKCS#8.")]
	KeyDecode {
		/// Underlying key parsing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// Cryptographic signing step failed.
	#[error("Assertion could not be signed.")]
	Signing {
		/// Underlying signing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}

/// Failures raised during the assertion-for-token exchange.
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint rejected the exchange: {status} {status_text}.")]
	TokenEndpoint {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Canonical status text for the response.
		status_text: String,
	},
	/// Token endpoint responded with a body that is not a token.
	#[error("Token endpoint returned a malformed response body.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl ExchangeError {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}
}
impl From<reqwest::Error> for ExchangeError {
	fn from(e: reqwest::Error) -> Self {
		Self::transport(e)
	}
}

/// Failures raised by the submit collaborator.
#[derive(Debug, ThisError)]
pub enum SubmitError {
	/// Document store answered with a non-success status.
	#[error("Document store rejected the submission: {status} {status_text}.")]
	UpstreamStatus {
		/// HTTP status code returned by the document store.
		status: u16,
		/// Canonical status text for the response.
		status_text: String,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while submitting to the document store.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl SubmitError {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}
}
impl From<reqwest::Error> for SubmitError {
	fn from(e: reqwest::Error) -> Self {
		Self::transport(e)
	}
}

/// Configuration and validation failures raised at startup.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Document URL environment variable is absent.
	#[error("Document URL is not configured; set `{variable}`.")]
	MissingDocumentUrl {
		/// Environment variable the loader consulted.
		variable: &'static str,
	},
	/// Document URL cannot be parsed.
	#[error("Document URL is invalid.")]
	InvalidDocumentUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}
