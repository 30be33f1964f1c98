//! Shared request plumbing for every exchange (request shaping, round trip, validation).

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest,
	http::{
		Method,
		header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
	},
};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::AuthConfig,
	error::TransportError,
	http::{self, TokenHttpClient},
	response,
};

pub(crate) const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Builds a request carrying the form content type every auth server call sends.
pub(crate) fn build_request(
	method: Method,
	url: &Url,
	bearer: Option<&AccessToken>,
	body: Vec<u8>,
) -> Result<HttpRequest> {
	let mut builder = oauth2::http::Request::builder()
		.method(method)
		.uri(url.as_str())
		.header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

	if let Some(token) = bearer {
		builder = builder.header(AUTHORIZATION, token.bearer());
	}

	builder.body(body).map_err(|e| TransportError::Request(e).into())
}

/// Sends `request` and returns the validated success body.
///
/// Non-success responses are wrapped with the configured auth URL.
pub(crate) async fn round_trip<C>(
	config: &AuthConfig,
	http_client: &C,
	request: HttpRequest,
) -> Result<Vec<u8>>
where
	C: ?Sized + TokenHttpClient,
{
	let target = request.uri().to_string();
	let handle = http_client.handle();
	let response =
		handle.call(request).await.map_err(|e| http::map_transport_error(&target, e))?;
	let status = response.status();
	let body = response.into_body();

	response::validate_response(status, &body)
		.map_err(|source| Error::Upstream { url: config.auth_url.to_string(), source })?;

	Ok(body)
}

/// Converts a parsed token into an [`AccessToken`], rejecting empty values.
pub(crate) fn require_token(config: &AuthConfig, token: String) -> Result<AccessToken> {
	if token.is_empty() {
		return Err(Error::EmptyToken { url: config.auth_url.to_string() });
	}

	Ok(AccessToken::new(token))
}
