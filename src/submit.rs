//! Submit collaborator contract and the Firestore-shaped reqwest implementation.

// crates.io
use reqwest::header::AUTHORIZATION;
// self
use crate::{_prelude::*, error::SubmitError, http::RelayHttpClient, reading::Reading};

/// Boxed future returned by [`DocumentSubmitter::submit`].
pub type SubmitFuture<'a> = Pin<Box<dyn Future<Output = Result<(), SubmitError>> + 'a + Send>>;

/// Default per-submission timeout; wire it into the submitter's HTTP client so one hung
/// upstream call cannot wedge the consumer.
pub const SUBMIT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Contract for the external collaborator that relays one reading downstream.
///
/// The pipeline hands over the reading unchanged together with the current bearer token;
/// a non-success result is terminal for that single reading.
pub trait DocumentSubmitter: Send + Sync {
	/// Performs a single submission of `reading` authenticated with `bearer`.
	fn submit<'a>(&'a self, reading: &'a Reading, bearer: &'a str) -> SubmitFuture<'a>;
}

/// Submits readings to a fixed Firestore document via `PATCH`.
///
/// The two reading fields are substituted into the document-store field map as
/// `temp` and `hum` string values.
#[derive(Clone, Debug)]
pub struct FirestoreSubmitter {
	http: RelayHttpClient,
	document_url: Url,
}
impl FirestoreSubmitter {
	/// Creates a submitter bound to the given document URL.
	pub fn new(http: RelayHttpClient, document_url: Url) -> Self {
		Self { http, document_url }
	}

	/// Returns the fixed document URL submissions are patched into.
	pub fn document_url(&self) -> &Url {
		&self.document_url
	}
}
impl DocumentSubmitter for FirestoreSubmitter {
	fn submit<'a>(&'a self, reading: &'a Reading, bearer: &'a str) -> SubmitFuture<'a> {
		Box::pin(async move {
			let (temp, hum) = reading.fields();
			let body = serde_json::json!({
				"fields": {
					"temp": { "stringValue": temp },
					"hum": { "stringValue": hum },
				}
			});
			let response = self
				.http
				.patch(self.document_url.clone())
				.header(AUTHORIZATION, format!("Bearer {bearer}"))
				.json(&body)
				.send()
				.await
				.map_err(SubmitError::from)?;
			let status = response.status();

			if !status.is_success() {
				return Err(SubmitError::UpstreamStatus {
					status: status.as_u16(),
					status_text: status.canonical_reason().unwrap_or("unknown status").into(),
				});
			}

			Ok(())
		})
	}
}
