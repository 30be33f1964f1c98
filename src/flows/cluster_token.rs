//! Cluster-scoped token exchange on behalf of an already authenticated identity.
//!
//! A normal exchange looks like
//! `GET {auth}/api/token?for=https%3A%2F%2Fapi.starter-us-east-2a.openshift.com` with the held
//! token as bearer credential. The single endpoint mints tokens for any cluster the caller is
//! authorized against.

// crates.io
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::AuthConfig,
	error::PreconditionError,
	flows::{TOKEN_PATH, common},
	http::TokenHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	response,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Cluster token client specialized for the crate's default reqwest transport.
pub type ReqwestClusterTokenClient = ClusterTokenClient<ReqwestHttpClient>;

/// Exchanges an access token for a token scoped to one cluster.
#[derive(Clone)]
pub struct ClusterTokenClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	config: Arc<AuthConfig>,
	http_client: Arc<C>,
	access_token: AccessToken,
	cluster_token: Option<AccessToken>,
}
impl<C> ClusterTokenClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a client that presents `access_token` through the caller-provided transport.
	pub fn with_http_client(
		config: Arc<AuthConfig>,
		http_client: impl Into<Arc<C>>,
		access_token: impl Into<AccessToken>,
	) -> Self {
		Self {
			config,
			http_client: http_client.into(),
			access_token: access_token.into(),
			cluster_token: None,
		}
	}

	/// Access token presented to the auth server.
	pub fn access_token(&self) -> &AccessToken {
		&self.access_token
	}

	/// Cluster-scoped token stored by the most recent successful [`get`](Self::get).
	pub fn cluster_token(&self) -> Option<&AccessToken> {
		self.cluster_token.as_ref()
	}

	/// Exchanges the held access token for a token scoped to `cluster`.
	///
	/// Empty access tokens and empty cluster URLs fail before any request is sent. Any failure
	/// clears the previously stored cluster token.
	pub async fn get(&mut self, cluster: &str) -> Result<&AccessToken> {
		const KIND: FlowKind = FlowKind::ClusterToken;

		let span = FlowSpan::new(KIND, "cluster_token_get");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.exchange(cluster)).await;

		obs::record_result(KIND, &result);

		match result {
			Ok(token) => Ok(&*self.cluster_token.insert(token)),
			Err(err) => {
				self.cluster_token = None;

				Err(err)
			},
		}
	}

	async fn exchange(&self, cluster: &str) -> Result<AccessToken> {
		if self.access_token.is_empty() {
			return Err(PreconditionError::EmptyAccessToken.into());
		}
		if cluster.is_empty() {
			return Err(PreconditionError::EmptyCluster.into());
		}

		let url = token_url(&self.config, cluster);
		let request =
			common::build_request(Method::GET, &url, Some(&self.access_token), Vec::new())?;
		let body = common::round_trip(&self.config, self.http_client.as_ref(), request).await?;
		let token = response::parse_token(&body)?;

		common::require_token(&self.config, token)
	}
}
#[cfg(feature = "reqwest")]
impl ClusterTokenClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: Arc<AuthConfig>, access_token: impl Into<AccessToken>) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default(), access_token)
	}
}
impl<C> Debug for ClusterTokenClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClusterTokenClient")
			.field("config", &self.config)
			.field("access_token_set", &!self.access_token.is_empty())
			.field("cluster_token_set", &self.cluster_token.is_some())
			.finish()
	}
}

fn token_url(config: &AuthConfig, cluster: &str) -> Url {
	let mut url = config.endpoint(TOKEN_PATH);

	url.query_pairs_mut().append_pair("for", cluster);

	url
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn cluster_is_form_escaped_into_query() {
		let config = AuthConfig::builder()
			.auth_url("https://auth.example.com")
			.build()
			.expect("Test configuration should build.");
		let url = token_url(&config, "https://api.example.com");

		assert_eq!(url.path(), "/api/token");
		assert_eq!(url.query(), Some("for=https%3A%2F%2Fapi.example.com"));
	}
}
