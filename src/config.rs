//! Auth server configuration consumed by the token clients and the resolver.
//!
//! [`AuthConfig`] is an immutable value: build it with [`AuthConfig::builder`] or load it with
//! [`AuthConfig::from_env`], then share it behind an [`Arc`]. Nothing in the crate reads
//! configuration from global state.

// std
use std::collections::BTreeMap;
// crates.io
use figment::{
	Figment,
	providers::{Env, Serialized},
};
// self
use crate::{_prelude::*, auth::ClientSecret, error::ConfigError};

/// Environment variable prefix recognized by [`AuthConfig::from_env`].
pub const ENV_PREFIX: &str = "F8_AUTH_";

const DEFAULT_AUTH_URL: &str = "https://auth.prod-preview.openshift.io";
const DEFAULT_GRANT_TYPE: &str = "client_credentials";
const DEFAULT_CLIENT_ID: &str = "c211f1bd-17a7-4f8c-9f80-0917d167889d";
const DEFAULT_CLIENT_SECRET: &str = "tenantsecretNew";

/// Connection settings for the central auth server.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
	/// Base URL of the auth server (`F8_AUTH_URL`).
	#[serde(rename = "url")]
	pub auth_url: Url,
	/// Grant type sent with the service-account login (`F8_AUTH_GRANT_TYPE`).
	pub grant_type: String,
	/// Service-account client identifier (`F8_AUTH_CLIENT_ID`).
	pub client_id: String,
	/// Service-account client secret (`F8_AUTH_CLIENT_SECRET`).
	pub client_secret: ClientSecret,
}
impl AuthConfig {
	/// Creates a builder seeded with the default settings.
	pub fn builder() -> AuthConfigBuilder {
		AuthConfigBuilder::default()
	}

	/// Loads the defaults overridden by `F8_AUTH_*` environment variables.
	///
	/// Variable values are taken verbatim as strings, so an all-digit secret such as `007` is
	/// kept as written.
	pub fn from_env() -> Result<Self, ConfigError> {
		let overrides = Env::prefixed(ENV_PREFIX)
			.iter()
			.map(|(key, value)| (key.as_str().to_owned(), value))
			.collect::<BTreeMap<_, _>>();

		Self::from_figment(Figment::from(Serialized::defaults(overrides)))
	}

	/// Extracts a configuration from `figment`, layered over the defaults.
	pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
		let config: Self = Figment::from(Serialized::defaults(AuthConfigBuilder::default().raw()))
			.merge(figment)
			.extract()?;

		config.validate()?;

		Ok(config)
	}

	/// Returns the auth server URL with its path replaced by `path`.
	pub fn endpoint(&self, path: &str) -> Url {
		let mut url = self.auth_url.clone();

		url.set_path(path);
		url.set_query(None);
		url.set_fragment(None);

		url
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.auth_url.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { url: self.auth_url.to_string() });
		}
		if self.client_id.is_empty() {
			return Err(ConfigError::MissingClientId);
		}

		Ok(())
	}
}
impl Debug for AuthConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthConfig")
			.field("auth_url", &self.auth_url.as_str())
			.field("grant_type", &self.grant_type)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &!self.client_secret.is_empty())
			.finish()
	}
}

/// Builder for [`AuthConfig`] values.
#[derive(Debug)]
pub struct AuthConfigBuilder {
	auth_url: String,
	grant_type: String,
	client_id: String,
	client_secret: ClientSecret,
}
impl AuthConfigBuilder {
	/// Sets the auth server base URL.
	pub fn auth_url(mut self, url: impl AsRef<str>) -> Self {
		self.auth_url = url.as_ref().to_owned();

		self
	}

	/// Overrides the grant type (defaults to `client_credentials`).
	pub fn grant_type(mut self, grant_type: impl Into<String>) -> Self {
		self.grant_type = grant_type.into();

		self
	}

	/// Sets the service-account client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = client_id.into();

		self
	}

	/// Sets the service-account client secret.
	pub fn client_secret(mut self, secret: impl Into<ClientSecret>) -> Self {
		self.client_secret = secret.into();

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<AuthConfig, ConfigError> {
		let auth_url = Url::parse(&self.auth_url)
			.map_err(|source| ConfigError::InvalidAuthUrl { url: self.auth_url.clone(), source })?;
		let config = AuthConfig {
			auth_url,
			grant_type: self.grant_type,
			client_id: self.client_id,
			client_secret: self.client_secret,
		};

		config.validate()?;

		Ok(config)
	}

	fn raw(self) -> RawAuthConfig {
		RawAuthConfig {
			url: self.auth_url,
			grant_type: self.grant_type,
			client_id: self.client_id,
			client_secret: self.client_secret,
		}
	}
}
impl Default for AuthConfigBuilder {
	fn default() -> Self {
		Self {
			auth_url: DEFAULT_AUTH_URL.into(),
			grant_type: DEFAULT_GRANT_TYPE.into(),
			client_id: DEFAULT_CLIENT_ID.into(),
			client_secret: ClientSecret::new(DEFAULT_CLIENT_SECRET),
		}
	}
}

// Serialized defaults keep the URL as a plain string so figment can merge string overrides.
#[derive(Serialize)]
struct RawAuthConfig {
	url: String,
	grant_type: String,
	client_id: String,
	client_secret: ClientSecret,
}
