//! User-to-cluster lookup.

// crates.io
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	config::AuthConfig,
	flows::common,
	http::TokenHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	response,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Path prefix of the user resource on the auth server.
pub const USERS_PATH: &str = "/api/users";

#[cfg(feature = "reqwest")]
/// Resolver specialized for the crate's default reqwest transport.
pub type ReqwestUserClusterResolver = UserClusterResolver<ReqwestHttpClient>;

/// Resolves the cluster a user is assigned to.
///
/// The lookup is sent without an `Authorization` header; the user endpoint is treated as
/// anonymous, unlike the cluster token exchange.
#[derive(Clone)]
pub struct UserClusterResolver<C>
where
	C: ?Sized + TokenHttpClient,
{
	config: Arc<AuthConfig>,
	http_client: Arc<C>,
}
impl<C> UserClusterResolver<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a resolver that reuses the caller-provided transport.
	pub fn with_http_client(config: Arc<AuthConfig>, http_client: impl Into<Arc<C>>) -> Self {
		Self { config, http_client: http_client.into() }
	}

	/// Returns the cluster URL assigned to `user_id`.
	///
	/// The id is joined onto the users path as is. A well-formed record without a cluster
	/// yields an empty string.
	pub async fn user_cluster(&self, user_id: &str) -> Result<String> {
		const KIND: FlowKind = FlowKind::UserCluster;

		let span = FlowSpan::new(KIND, "user_cluster");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.lookup(user_id)).await;

		obs::record_result(KIND, &result);

		result
	}

	async fn lookup(&self, user_id: &str) -> Result<String> {
		let url = self.config.endpoint(&user_path(user_id));
		let request = common::build_request(Method::GET, &url, None, Vec::new())?;
		let body = common::round_trip(&self.config, self.http_client.as_ref(), request).await?;

		Ok(response::parse_user_cluster(&body)?)
	}
}
#[cfg(feature = "reqwest")]
impl UserClusterResolver<ReqwestHttpClient> {
	/// Creates a resolver backed by a default reqwest transport.
	pub fn new(config: Arc<AuthConfig>) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Debug for UserClusterResolver<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UserClusterResolver").field("config", &self.config).finish()
	}
}

fn user_path(user_id: &str) -> String {
	let user_id = user_id.trim_matches('/');

	if user_id.is_empty() { USERS_PATH.to_owned() } else { format!("{USERS_PATH}/{user_id}") }
}
