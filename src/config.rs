//! Environment-derived process configuration for the relay binary.

// std
use std::{env, path::PathBuf};
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable holding the intake port.
pub const PORT_ENV: &str = "RELAY_PORT";
/// Environment variable holding the credential file path.
pub const CREDENTIALS_ENV: &str = "RELAY_CREDENTIALS";
/// Environment variable holding the requested OAuth scope.
pub const SCOPE_ENV: &str = "RELAY_SCOPE";
/// Environment variable holding the downstream document URL.
pub const DOCUMENT_URL_ENV: &str = "RELAY_DOCUMENT_URL";

/// Port used when [`PORT_ENV`] is absent or unparseable.
pub const DEFAULT_PORT: u16 = 80;
/// Credential path used when [`CREDENTIALS_ENV`] is absent.
pub const DEFAULT_CREDENTIALS_PATH: &str = "account.json";
/// Scope used when [`SCOPE_ENV`] is absent.
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Startup configuration for the relay binary.
#[derive(Clone, Debug)]
pub struct RelayConfig {
	/// Intake listen port.
	pub port: u16,
	/// Service-account credential file path.
	pub credentials_path: PathBuf,
	/// OAuth scope requested in every assertion.
	pub scope: String,
	/// Fixed downstream document URL submissions are patched into.
	pub document_url: Url,
}
impl RelayConfig {
	/// Reads the configuration from the process environment.
	///
	/// The port and scope fall back to defaults; the document URL is mandatory because
	/// there is no sensible default document to write into.
	pub fn from_env() -> Result<Self, ConfigError> {
		let port = port_from(env::var(PORT_ENV).ok());
		let credentials_path = env::var_os(CREDENTIALS_ENV)
			.map(PathBuf::from)
			.unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH));
		let scope = env::var(SCOPE_ENV).unwrap_or_else(|_| DEFAULT_SCOPE.into());
		let document_url = match env::var(DOCUMENT_URL_ENV) {
			Ok(raw) =>
				Url::parse(&raw).map_err(|source| ConfigError::InvalidDocumentUrl { source })?,
			Err(_) => return Err(ConfigError::MissingDocumentUrl { variable: DOCUMENT_URL_ENV }),
		};

		Ok(Self { port, credentials_path, scope, document_url })
	}
}

fn port_from(raw: Option<String>) -> u16 {
	raw.and_then(|value| value.parse().ok()).unwrap_or(DEFAULT_PORT)
}
