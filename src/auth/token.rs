//! Access-token model and the near-expiry cache that decides when to refresh.

// self
use crate::{
	_prelude::*,
	auth::{AssertionSigner, Secret},
	exchange::TokenExchanger,
};

/// Safety margin subtracted from expiry checks so a token cannot expire mid-submission.
pub const EXPIRY_MARGIN: Duration = Duration::seconds(5);

/// Opaque bearer credential returned by the token endpoint.
#[derive(Clone, Debug)]
pub struct AccessToken {
	/// Bearer secret attached to upstream requests.
	pub secret: Secret,
	/// Relative lifetime reported by the token endpoint.
	pub expires_in: Duration,
}

#[derive(Debug)]
struct CachedToken {
	token: AccessToken,
	expires_at: OffsetDateTime,
}

/// Holds at most one access token plus its absolute expiry instant.
///
/// The cache is owned exclusively by the single pipeline consumer, so it carries no
/// internal locking; a multi-consumer design would have to wrap the check-and-refresh
/// sequence in a mutual-exclusion section to avoid redundant concurrent refreshes.
#[derive(Debug, Default)]
pub struct TokenCache {
	current: Option<CachedToken>,
}
impl TokenCache {
	/// Creates an empty cache; [`is_valid`](Self::is_valid) is false until the first
	/// successful refresh.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns `true` iff a token is held and `now + EXPIRY_MARGIN` is still before its
	/// absolute expiry.
	pub fn is_valid(&self, now: OffsetDateTime) -> bool {
		self.current.as_ref().is_some_and(|cached| now + EXPIRY_MARGIN < cached.expires_at)
	}

	/// Returns the held bearer secret, if any.
	pub fn bearer(&self) -> Option<&str> {
		self.current.as_ref().map(|cached| cached.token.secret.expose())
	}

	/// Returns the absolute expiry instant of the held token, if any.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.current.as_ref().map(|cached| cached.expires_at)
	}

	/// Replaces the held token, computing its absolute expiry as `now + expires_in`.
	pub fn store(&mut self, token: AccessToken, now: OffsetDateTime) {
		self.current = Some(CachedToken { expires_at: now + token.expires_in, token });
	}

	/// Mints a fresh assertion, exchanges it, and stores the resulting token.
	///
	/// On failure the previously held token is left untouched; staleness is determined
	/// solely by the expiry check, never by a failed refresh.
	pub async fn refresh(
		&mut self,
		signer: &AssertionSigner,
		exchanger: &TokenExchanger,
		now: OffsetDateTime,
	) -> Result<()> {
		let assertion = signer.sign(now)?;
		let token = exchanger.exchange(&assertion).await?;

		self.store(token, now);

		Ok(())
	}
}
