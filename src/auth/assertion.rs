//! JWT assertion construction and RS256 signing for the service-account bearer flow.

// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{_prelude::*, auth::ServiceAccountCredentials, error::AuthError};

/// Fixed assertion lifetime; the token endpoint caps assertions at one hour.
pub const ASSERTION_LIFETIME: Duration = Duration::seconds(3_600);

/// Claim set embedded in every assertion.
///
/// Issuer and subject both carry the service-account email, the audience is the token
/// endpoint the assertion will be redeemed at, and the requested permission travels in the
/// custom `scope` claim.
#[derive(Serialize)]
struct AssertionClaims<'a> {
	scope: &'a str,
	uid: &'a str,
	iss: &'a str,
	sub: &'a str,
	aud: &'a str,
	iat: i64,
	exp: i64,
}

/// Builds and signs single-use JWT assertions from service-account credentials.
///
/// Signing is a pure, CPU-bound transformation: no network or disk I/O happens here, and
/// the output is deterministic for a given `now` (modulo RSA signature padding). Assertions
/// are never cached; the exchanger mints a fresh one per token request.
#[derive(Clone, Debug)]
pub struct AssertionSigner {
	credentials: ServiceAccountCredentials,
	scope: String,
}
impl AssertionSigner {
	/// Creates a signer that requests the given scope.
	pub fn new(credentials: ServiceAccountCredentials, scope: impl Into<String>) -> Self {
		Self { credentials, scope: scope.into() }
	}

	/// Returns the token endpoint the signer's assertions must be redeemed at.
	pub fn token_endpoint(&self) -> &Url {
		&self.credentials.token_uri
	}

	/// Signs a fresh assertion valid from `now` until `now + ASSERTION_LIFETIME`.
	pub fn sign(&self, now: OffsetDateTime) -> Result<String, AuthError> {
		let claims = AssertionClaims {
			scope: &self.scope,
			uid: &self.credentials.client_id,
			iss: &self.credentials.client_email,
			sub: &self.credentials.client_email,
			aud: self.credentials.token_uri.as_str(),
			iat: now.unix_timestamp(),
			exp: (now + ASSERTION_LIFETIME).unix_timestamp(),
		};
		let key = EncodingKey::from_rsa_pem(self.credentials.private_key.expose().as_bytes())
			.map_err(|source| AuthError::KeyDecode { source })?;
		let mut header = Header::new(Algorithm::RS256);

		header.kid = Some(self.credentials.private_key_id.clone());

		jsonwebtoken::encode(&header, &claims, &key).map_err(|source| AuthError::Signing { source })
	}
}
