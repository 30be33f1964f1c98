//! Service-account login via the client-credentials grant.
//!
//! [`ServiceAccountTokenClient::get`] posts a [`GrantRequest`] to `{auth}/api/token` and keeps
//! the returned access token. The token is the input of
//! [`ClusterTokenClient`](crate::flows::ClusterTokenClient).

// crates.io
use oauth2::http::Method;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ClientSecret},
	config::AuthConfig,
	flows::common,
	http::TokenHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	response,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Path of the token endpoint on the auth server.
pub const TOKEN_PATH: &str = "/api/token";

/// Client-credentials grant parameters sourced from configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrantRequest {
	/// OAuth grant type, usually `client_credentials`.
	pub grant_type: String,
	/// Service-account client identifier.
	pub client_id: String,
	/// Service-account client secret.
	pub client_secret: ClientSecret,
}
impl GrantRequest {
	/// Copies the grant parameters out of `config`.
	pub fn from_config(config: &AuthConfig) -> Self {
		Self {
			grant_type: config.grant_type.clone(),
			client_id: config.client_id.clone(),
			client_secret: config.client_secret.clone(),
		}
	}

	/// Encodes the grant as `application/x-www-form-urlencoded` data.
	pub fn to_form(&self) -> String {
		form_urlencoded::Serializer::new(String::new())
			.append_pair("grant_type", &self.grant_type)
			.append_pair("client_id", &self.client_id)
			.append_pair("client_secret", self.client_secret.expose())
			.finish()
	}
}

#[cfg(feature = "reqwest")]
/// Service-account client specialized for the crate's default reqwest transport.
pub type ReqwestServiceAccountTokenClient = ServiceAccountTokenClient<ReqwestHttpClient>;

/// Obtains a service-level access token from the auth server.
#[derive(Clone)]
pub struct ServiceAccountTokenClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	config: Arc<AuthConfig>,
	http_client: Arc<C>,
	token: Option<AccessToken>,
}
impl<C> ServiceAccountTokenClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(config: Arc<AuthConfig>, http_client: impl Into<Arc<C>>) -> Self {
		Self { config, http_client: http_client.into(), token: None }
	}

	/// Token stored by the most recent successful [`get`](Self::get).
	pub fn token(&self) -> Option<&AccessToken> {
		self.token.as_ref()
	}

	/// Configuration used by this client.
	pub fn config(&self) -> &AuthConfig {
		&self.config
	}

	/// Performs one client-credentials exchange and stores the resulting token.
	///
	/// Any failure clears the previously stored token.
	pub async fn get(&mut self) -> Result<&AccessToken> {
		const KIND: FlowKind = FlowKind::ServiceAccount;

		let span = FlowSpan::new(KIND, "service_account_get");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.exchange()).await;

		obs::record_result(KIND, &result);

		match result {
			Ok(token) => Ok(&*self.token.insert(token)),
			Err(err) => {
				self.token = None;

				Err(err)
			},
		}
	}

	async fn exchange(&self) -> Result<AccessToken> {
		let url = self.config.endpoint(TOKEN_PATH);
		let form = GrantRequest::from_config(&self.config).to_form();
		let request = common::build_request(Method::POST, &url, None, form.into_bytes())?;
		let body = common::round_trip(&self.config, self.http_client.as_ref(), request).await?;
		let token = response::parse_token(&body)?;

		common::require_token(&self.config, token)
	}
}
#[cfg(feature = "reqwest")]
impl ServiceAccountTokenClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: Arc<AuthConfig>) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Debug for ServiceAccountTokenClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ServiceAccountTokenClient")
			.field("config", &self.config)
			.field("token_set", &self.token.is_some())
			.finish()
	}
}
