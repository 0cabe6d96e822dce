// std
use std::time::Duration as StdDuration;
// crates.io
use httpmock::prelude::*;
use tokio::{net::TcpListener, time::sleep};
// self
use telemetry_relay::{
	_preludet::*,
	exchange::TokenExchanger,
	http::RelayHttpClient,
	intake,
	pipeline::SubmissionPipeline,
};

async fn start_stack(server: &MockServer) -> (String, Arc<RecordingSubmitter>) {
	let endpoint =
		Url::parse(&server.url("/token")).expect("Mock token endpoint should parse.");
	let signer = test_signer(&server.url("/token"));
	let exchanger = TokenExchanger::new(RelayHttpClient::default(), endpoint);
	let recorder = Arc::new(RecordingSubmitter::default());
	let (handle, _consumer) =
		SubmissionPipeline::new(signer, exchanger, recorder.clone()).spawn();
	let listener = TcpListener::bind("127.0.0.1:0")
		.await
		.expect("Ephemeral intake listener should bind.");
	let addr = listener.local_addr().expect("Bound listener should expose its address.");

	tokio::spawn(intake::serve(listener, handle));

	(format!("http://{addr}/submit"), recorder)
}

#[tokio::test]
async fn malformed_payload_is_rejected_before_enqueue() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"tok123\",\"expires_in\":3600}");
		})
		.await;
	let (submit_url, recorder) = start_stack(&server).await;
	let response = reqwest::Client::new()
		.post(&submit_url)
		.body("onlyonevalue")
		.send()
		.await
		.expect("Intake request should complete.");

	assert_eq!(response.status().as_u16(), 400);
	assert_eq!(
		response.text().await.expect("Intake response body should read."),
		"Invalid format\n"
	);

	// The rejection happens at the boundary: nothing was enqueued, no token was fetched.
	assert_eq!(token_mock.hits_async().await, 0);
	assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn valid_payload_is_acknowledged_and_relayed() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"tok123\",\"expires_in\":3600}");
		})
		.await;

	let (submit_url, recorder) = start_stack(&server).await;
	let response = reqwest::Client::new()
		.post(&submit_url)
		.body("21.5;40.2")
		.send()
		.await
		.expect("Intake request should complete.");

	assert_eq!(response.status().as_u16(), 200);
	assert_eq!(response.text().await.expect("Intake response body should read."), "OK\n");

	// The intake acknowledgement races the consumer; poll briefly for the submission.
	for _ in 0..50 {
		if !recorder.calls().is_empty() {
			break;
		}

		sleep(StdDuration::from_millis(20)).await;
	}

	let calls = recorder.calls();

	assert_eq!(calls.len(), 1);
	assert_eq!(calls[0].temp, "21.5");
	assert_eq!(calls[0].hum, "40.2");
	assert_eq!(calls[0].bearer, "tok123");
}
