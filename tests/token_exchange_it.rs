// crates.io
use httpmock::prelude::*;
// self
use telemetry_relay::{
	_preludet::*,
	auth::TokenCache,
	error::{Error, ExchangeError},
	exchange::TokenExchanger,
	http::RelayHttpClient,
};

fn exchanger_for(server: &MockServer) -> TokenExchanger {
	let endpoint =
		Url::parse(&server.url("/token")).expect("Mock token endpoint should parse.");

	TokenExchanger::new(RelayHttpClient::default(), endpoint)
}

#[tokio::test]
async fn exchange_posts_jwt_bearer_grant_and_parses_token() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"tok123\",\"token_type\":\"Bearer\",\"expires_in\":3600}");
		})
		.await;
	let exchanger = exchanger_for(&server);
	let signer = test_signer(&server.url("/token"));
	let assertion = signer
		.sign(OffsetDateTime::now_utc())
		.expect("Signing with the test key should succeed.");
	let token =
		exchanger.exchange(&assertion).await.expect("Exchange against the mock should succeed.");

	mock.assert_async().await;

	assert_eq!(token.secret.expose(), "tok123");
	assert_eq!(token.expires_in, Duration::seconds(3_600));
}

#[tokio::test]
async fn non_success_status_maps_to_token_endpoint_error() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(401);
		})
		.await;

	let exchanger = exchanger_for(&server);
	let error = exchanger
		.exchange("unusable-assertion")
		.await
		.expect_err("A 401 from the token endpoint should fail the exchange.");

	assert!(matches!(
		error,
		Error::Exchange(ExchangeError::TokenEndpoint { status: 401, .. })
	));
}

#[tokio::test]
async fn unparseable_body_maps_to_malformed_response() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body("{\"nope\":true}");
		})
		.await;

	let exchanger = exchanger_for(&server);
	let error = exchanger
		.exchange("assertion")
		.await
		.expect_err("A token response without an access_token should fail.");

	assert!(matches!(error, Error::Exchange(ExchangeError::MalformedResponse { .. })));
}

#[tokio::test]
async fn cache_refresh_stores_token_and_is_idempotent_inside_window() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"tok123\",\"expires_in\":3600}");
		})
		.await;
	let exchanger = exchanger_for(&server);
	let signer = test_signer(&server.url("/token"));
	let mut cache = TokenCache::new();
	let now = OffsetDateTime::now_utc();

	assert!(!cache.is_valid(now));

	cache
		.refresh(&signer, &exchanger, now)
		.await
		.expect("First refresh against the mock should succeed.");

	assert!(cache.is_valid(now));
	assert_eq!(cache.bearer(), Some("tok123"));
	assert_eq!(cache.expires_at(), Some(now + Duration::seconds(3_600)));

	// Inside the validity window a second check never triggers another exchange.
	assert!(cache.is_valid(now + Duration::seconds(60)));
	assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_token() {
	let server = MockServer::start_async().await;
	let ok_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"tok-old\",\"expires_in\":3600}");
		})
		.await;
	let exchanger = exchanger_for(&server);
	let signer = test_signer(&server.url("/token"));
	let mut cache = TokenCache::new();
	let now = OffsetDateTime::now_utc();

	cache.refresh(&signer, &exchanger, now).await.expect("Seeding refresh should succeed.");

	ok_mock.delete_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(503);
		})
		.await;

	cache
		.refresh(&signer, &exchanger, now + Duration::seconds(10))
		.await
		.expect_err("Refresh against a failing endpoint should fail.");

	// Only the expiry check decides staleness; the failed refresh discards nothing.
	assert_eq!(cache.bearer(), Some("tok-old"));
	assert!(cache.is_valid(now + Duration::seconds(10)));
}
