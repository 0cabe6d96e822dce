//! Relay binary: wires credentials, the submission pipeline, and the intake server.

// std
use std::{net::SocketAddr, sync::Arc};
// crates.io
use tokio::net::TcpListener;
// self
use telemetry_relay::{
	auth::{AssertionSigner, ServiceAccountCredentials},
	config::RelayConfig,
	error::ConfigError,
	exchange::TokenExchanger,
	http::RelayHttpClient,
	intake, obs,
	pipeline::SubmissionPipeline,
	submit::{FirestoreSubmitter, SUBMIT_TIMEOUT},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	obs::init();

	let config = RelayConfig::from_env()?;
	let credentials = ServiceAccountCredentials::from_json_file(&config.credentials_path)?;
	let token_endpoint = credentials.token_uri.clone();
	let signer = AssertionSigner::new(credentials, config.scope.clone());
	let exchanger = TokenExchanger::new(RelayHttpClient::default(), token_endpoint);
	let submit_client = reqwest::Client::builder()
		.timeout(SUBMIT_TIMEOUT)
		.build()
		.map_err(ConfigError::from)?;
	let submitter = Arc::new(FirestoreSubmitter::new(
		RelayHttpClient::with_client(submit_client),
		config.document_url.clone(),
	));
	let (handle, _consumer) = SubmissionPipeline::new(signer, exchanger, submitter).spawn();
	let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
	let listener = TcpListener::bind(addr).await?;

	intake::serve(listener, handle).await?;

	Ok(())
}
