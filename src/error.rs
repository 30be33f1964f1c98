//! Error types shared by the token clients, the resolver, and the configuration layer.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Caller-supplied input rejected before any request was sent.
	#[error(transparent)]
	Precondition(#[from] PreconditionError),
	/// Request construction, network, or body read failure.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Auth server answered with a non-success status.
	#[error("Error from server `{url}`: {source}")]
	Upstream {
		/// Auth server base URL the request was sent to.
		url: String,
		/// Validation failure describing the response.
		#[source]
		source: ResponseError,
	},
	/// Success response whose body does not match the expected shape.
	#[error(transparent)]
	Parse(#[from] ParseError),
	/// Success response that carried no usable token.
	#[error("Server `{url}` returned an empty access token.")]
	EmptyToken {
		/// Auth server base URL the request was sent to.
		url: String,
	},
}
impl Error {
	/// Returns the response validation failure, if the server answered with a non-success status.
	pub fn response_error(&self) -> Option<&ResponseError> {
		match self {
			Self::Upstream { source, .. } => Some(source),
			_ => None,
		}
	}

	/// True when the server rejected the request with a well-formed error envelope.
	pub fn is_server_rejection(&self) -> bool {
		matches!(self.response_error(), Some(ResponseError::Rejected { .. }))
	}

	/// True when the server answered with a non-success status and an unparseable body.
	pub fn is_malformed_response(&self) -> bool {
		matches!(self.response_error(), Some(ResponseError::MalformedBody { .. }))
	}
}

/// Configuration loading and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Configuration sources could not be merged or extracted.
	#[error("Failed to load the auth configuration: {0}")]
	Load(#[from] Box<figment::Error>),
	/// Auth base URL cannot be parsed.
	#[error("Auth URL `{url}` is invalid.")]
	InvalidAuthUrl {
		/// Raw value that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Auth base URL cannot carry endpoint paths (e.g. `mailto:` or `data:` URLs).
	#[error("Auth URL `{url}` cannot be used as a base URL.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Client identifier is empty.
	#[error("Client identifier cannot be empty.")]
	MissingClientId,
}
impl From<figment::Error> for ConfigError {
	fn from(e: figment::Error) -> Self {
		Self::Load(Box::new(e))
	}
}

/// Input checks performed before contacting the auth server.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum PreconditionError {
	/// The held access token is empty.
	#[error("Access token can't be empty.")]
	EmptyAccessToken,
	/// The requested cluster URL is empty.
	#[error("Cluster URL can't be empty.")]
	EmptyCluster,
}

/// Transport-level failures (request building, network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// HTTP request object could not be built.
	#[error("Failed to create the request object: {0}")]
	Request(#[from] oauth2::http::Error),
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling `{url}`: {source}")]
	Network {
		/// Target URL of the failed request.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Response body could not be read.
	#[error("Failed to read the response from `{url}`: {source}")]
	Io {
		/// Target URL of the failed request.
		url: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(url: impl Into<String>, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { url: url.into(), source: Box::new(src) }
	}
}

/// Non-success responses turned into errors by [`crate::response::validate_response`].
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// The server returned a well-formed error envelope.
	#[error("{message}")]
	Rejected {
		/// HTTP status code of the response.
		status: u16,
		/// One line per envelope entry, in entry order.
		message: String,
		/// Parsed envelope entries.
		entries: Vec<crate::response::ErrorEntry>,
	},
	/// The server returned a body that is not an error envelope.
	#[error("Could not unmarshal the error response (HTTP {status}): {source}")]
	MalformedBody {
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
	},
}
impl ResponseError {
	/// HTTP status code carried by the failed response.
	pub fn status(&self) -> u16 {
		match self {
			Self::Rejected { status, .. } | Self::MalformedBody { status, .. } => *status,
		}
	}
}

/// Success bodies that do not match the expected JSON shape.
#[derive(Debug, ThisError)]
pub enum ParseError {
	/// Token response could not be decoded.
	#[error("Error unmarshalling the token response: {0}")]
	Token(#[source] JsonPathError),
	/// User record could not be decoded.
	#[error("Error unmarshalling the user response: {0}")]
	UserRecord(#[source] JsonPathError),
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn upstream_display_carries_server_message() {
		let err = Error::Upstream {
			url: "https://auth.example.com/".into(),
			source: ResponseError::Rejected {
				status: 401,
				message: "Unauthorized: 401 token_expired, expired".into(),
				entries: Vec::new(),
			},
		};

		assert_eq!(
			err.to_string(),
			"Error from server `https://auth.example.com/`: Unauthorized: 401 token_expired, expired"
		);
		assert!(err.is_server_rejection());
		assert!(!err.is_malformed_response());
		assert_eq!(err.response_error().map(ResponseError::status), Some(401));
	}

	#[test]
	fn preconditions_are_not_upstream_errors() {
		let err = Error::from(PreconditionError::EmptyCluster);

		assert!(err.response_error().is_none());
		assert_eq!(err.to_string(), "Cluster URL can't be empty.");
	}
}
