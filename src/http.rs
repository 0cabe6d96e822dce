//! Shared reqwest transport wrapper for the exchanger and submitter.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Both outbound calls of the relay (the token exchange and the document submission) go
/// through this wrapper. Callers that want a per-request timeout or custom TLS behavior
/// configure their own [`ReqwestClient`] and pass it through [`with_client`](Self::with_client).
#[derive(Clone, Debug, Default)]
pub struct RelayHttpClient(pub ReqwestClient);
impl RelayHttpClient {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for RelayHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for RelayHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
