//! Demonstrates the full exchange against a mocked auth server: service-account login, user
//! cluster lookup, and a cluster-scoped token exchange with the login token.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use cluster_token_exchange::{
	config::AuthConfig,
	flows::{ClusterTokenClient, ServiceAccountTokenClient, UserClusterResolver},
	http::ReqwestHttpClient,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-service-token\"}");
		})
		.await;
	let user_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/users/demo-user");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"data\":{\"attributes\":{\"cluster\":\"https://api.cluster1.com\"}}}");
		})
		.await;
	let exchange_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/token")
				.query_param("for", "https://api.cluster1.com")
				.header("authorization", "Bearer demo-service-token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-cluster-token\"}");
		})
		.await;
	let config = Arc::new(
		AuthConfig::builder()
			.auth_url(server.base_url())
			.client_id("demo-client")
			.client_secret("demo-secret")
			.build()?,
	);
	let http_client = Arc::new(ReqwestHttpClient::default());
	let mut service_account = <ServiceAccountTokenClient<ReqwestHttpClient>>::with_http_client(
		config.clone(),
		http_client.clone(),
	);
	let access_token = service_account.get().await?.clone();
	let resolver = <UserClusterResolver<ReqwestHttpClient>>::with_http_client(
		config.clone(),
		http_client.clone(),
	);
	let cluster = resolver.user_cluster("demo-user").await?;
	let mut cluster_client = <ClusterTokenClient<ReqwestHttpClient>>::with_http_client(
		config,
		http_client,
		access_token,
	);
	let cluster_token = cluster_client.get(&cluster).await?;

	println!("User cluster: {cluster}.");
	println!("Cluster token: {}.", cluster_token.expose());

	login_mock.assert_async().await;
	user_mock.assert_async().await;
	exchange_mock.assert_async().await;

	Ok(())
}
