//! Shared fixtures for integration tests: auth configuration and a recording fake transport.

#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
	sync::Arc,
};
// crates.io
use parking_lot::Mutex;
// self
use cluster_token_exchange::{
	config::AuthConfig,
	http::TokenHttpClient,
	oauth2::{
		AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
		http::{HeaderMap, Method, StatusCode},
	},
};

pub const CLIENT_ID: &str = "tenant-service";
pub const CLIENT_SECRET: &str = "tenant-secret";

/// Builds a configuration pointing at `auth_url` with the test service account.
pub fn auth_config(auth_url: &str) -> Arc<AuthConfig> {
	let config = AuthConfig::builder()
		.auth_url(auth_url)
		.client_id(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.build()
		.expect("Test auth configuration should build.");

	Arc::new(config)
}

#[derive(Debug)]
pub enum FakeTransportError {
	ConnectionRefused,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::ConnectionRefused => write!(f, "Connection refused."),
		}
	}
}
impl StdError for FakeTransportError {}

/// Request captured by [`RecordingHttpClient`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
	pub method: Method,
	pub uri: String,
	pub headers: HeaderMap,
	pub body: Vec<u8>,
}
impl RecordedRequest {
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}
}

enum Canned {
	Response { status: u16, body: Vec<u8> },
	ConnectionRefused,
	BodyReadFailure,
}

#[derive(Default)]
struct Recording {
	requests: Mutex<Vec<RecordedRequest>>,
	responses: Mutex<VecDeque<Canned>>,
}

/// Fake transport replaying canned responses and recording every request it receives.
#[derive(Clone, Default)]
pub struct RecordingHttpClient(Arc<Recording>);
impl RecordingHttpClient {
	pub fn respond(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
		self.0.responses.lock().push_back(Canned::Response { status, body: body.into() });

		self
	}

	pub fn refuse_connection(self) -> Self {
		self.0.responses.lock().push_back(Canned::ConnectionRefused);

		self
	}

	pub fn fail_body_read(self) -> Self {
		self.0.responses.lock().push_back(Canned::BodyReadFailure);

		self
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.0.requests.lock().clone()
	}

	pub fn single_request(&self) -> RecordedRequest {
		let requests = self.requests();

		assert_eq!(requests.len(), 1, "Exactly one request should have been sent.");

		requests.into_iter().next().expect("One request was asserted above.")
	}
}
impl TokenHttpClient for RecordingHttpClient {
	type Handle = RecordingHandle;
	type TransportError = FakeTransportError;

	fn handle(&self) -> Self::Handle {
		RecordingHandle(self.0.clone())
	}
}

pub struct RecordingHandle(Arc<Recording>);
impl<'c> AsyncHttpClient<'c> for RecordingHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let recording = self.0.clone();

		Box::pin(async move {
			let (parts, body) = request.into_parts();

			recording.requests.lock().push(RecordedRequest {
				method: parts.method,
				uri: parts.uri.to_string(),
				headers: parts.headers,
				body,
			});

			let canned = recording
				.responses
				.lock()
				.pop_front()
				.ok_or_else(|| HttpClientError::Other("No canned response left.".into()))?;

			match canned {
				Canned::Response { status, body } => {
					let mut response = HttpResponse::new(body);

					*response.status_mut() =
						StatusCode::from_u16(status).expect("Canned status should be valid.");

					Ok(response)
				},
				Canned::ConnectionRefused =>
					Err(HttpClientError::Reqwest(Box::new(FakeTransportError::ConnectionRefused))),
				Canned::BodyReadFailure => Err(HttpClientError::Io(std::io::Error::new(
					std::io::ErrorKind::UnexpectedEof,
					"Connection closed mid-body.",
				))),
			}
		})
	}
}
