#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
// self
use cluster_token_exchange::{
	error::{Error, ParseError, ResponseError},
	flows::{ReqwestUserClusterResolver, UserClusterResolver},
	oauth2::http::Method,
};
use common::{RecordingHttpClient, auth_config};

#[tokio::test]
async fn resolves_assigned_cluster() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/users/u1");
			then.status(200).header("content-type", "application/json").body(
				"{\"data\":{\"attributes\":{\"cluster\":\"https://api.cluster1.com\"}}}",
			);
		})
		.await;
	let resolver = ReqwestUserClusterResolver::new(auth_config(&server.base_url()));
	let cluster = resolver.user_cluster("u1").await.expect("User lookup should succeed.");

	assert_eq!(cluster, "https://api.cluster1.com");

	mock.assert_async().await;
}

#[tokio::test]
async fn lookup_is_sent_without_authorization() {
	let http_client = RecordingHttpClient::default()
		.respond(200, "{\"data\":{\"attributes\":{\"cluster\":\"https://api.cluster2.com\"}}}");
	let resolver = UserClusterResolver::<RecordingHttpClient>::with_http_client(
		auth_config("https://auth.example.com"),
		http_client.clone(),
	);
	let cluster = resolver
		.user_cluster("0d19ed1c-6d5e-4c4b-8d03-0ab0e1a3c0c7")
		.await
		.expect("User lookup should succeed.");

	assert_eq!(cluster, "https://api.cluster2.com");

	let request = http_client.single_request();

	assert_eq!(request.method, Method::GET);
	assert_eq!(request.uri, "https://auth.example.com/api/users/0d19ed1c-6d5e-4c4b-8d03-0ab0e1a3c0c7");
	assert_eq!(request.header("authorization"), None);
	assert_eq!(request.header("content-type"), Some("application/x-www-form-urlencoded"));
}

#[tokio::test]
async fn missing_cluster_yields_empty_string() {
	let http_client = RecordingHttpClient::default()
		.respond(200, "{\"data\":{\"id\":\"u2\",\"attributes\":{\"username\":\"u2\"}}}");
	let resolver = UserClusterResolver::<RecordingHttpClient>::with_http_client(
		auth_config("https://auth.example.com"),
		http_client,
	);

	assert_eq!(resolver.user_cluster("u2").await.expect("User lookup should succeed."), "");
}

#[tokio::test]
async fn unparseable_record_is_a_parse_error() {
	let http_client = RecordingHttpClient::default().respond(200, "{\"data\":\"oops\"}");
	let resolver = UserClusterResolver::<RecordingHttpClient>::with_http_client(
		auth_config("https://auth.example.com"),
		http_client,
	);
	let err = resolver.user_cluster("u3").await.expect_err("Malformed records must fail.");

	assert!(matches!(err, Error::Parse(ParseError::UserRecord(_))), "Unexpected error: {err:?}.");
}

#[tokio::test]
async fn unknown_user_surfaces_envelope() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/users/ghost");
			then.status(404).header("content-type", "application/json").body(
				"{\"errors\":[{\"title\":\"Not Found\",\"status\":\"404\",\"code\":\"not_found\",\"detail\":\"identity ghost not found\"}]}",
			);
		})
		.await;
	let resolver = ReqwestUserClusterResolver::new(auth_config(&server.base_url()));
	let err = resolver.user_cluster("ghost").await.expect_err("Unknown users must fail.");

	match &err {
		Error::Upstream { source: ResponseError::Rejected { status, entries, .. }, .. } => {
			assert_eq!(*status, 404);
			assert_eq!(entries.len(), 1);
			assert_eq!(entries[0].code, "not_found");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
	assert!(err.to_string().contains("Not Found: 404 not_found, identity ghost not found"));
}
