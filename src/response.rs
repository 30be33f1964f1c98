//! Response validation and body parsing shared by every auth server call.
//!
//! [`validate_response`] turns a non-success status into a [`ResponseError`], distinguishing a
//! well-formed error envelope from a body the server should never have sent. [`parse_token`] and
//! [`parse_user_cluster`] decode success bodies. All helpers are pure functions over
//! `(status, bytes)` so they can be exercised without a transport.

// crates.io
use oauth2::http::StatusCode;
use serde::Deserializer;
// self
use crate::{
	_prelude::*,
	error::{ParseError, ResponseError},
};

/// Single entry of the auth server's error envelope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorEntry {
	/// Machine-readable error code.
	#[serde(deserialize_with = "null_as_default")]
	pub code: String,
	/// Human-readable detail message.
	#[serde(deserialize_with = "null_as_default")]
	pub detail: String,
	/// HTTP status echoed by the server, as a string.
	#[serde(deserialize_with = "null_as_default")]
	pub status: String,
	/// Short error title.
	#[serde(deserialize_with = "null_as_default")]
	pub title: String,
}
impl Display for ErrorEntry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}: {} {}, {}", self.title, self.status, self.code, self.detail)
	}
}

/// Error envelope returned with non-success responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorEnvelope {
	/// Reported errors, in server order.
	#[serde(deserialize_with = "null_as_default")]
	pub errors: Vec<ErrorEntry>,
}
impl ErrorEnvelope {
	/// Joins every entry into one newline-separated message.
	pub fn summary(&self) -> String {
		self.errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
	}
}

/// User record returned by `GET /api/users/{id}`; only the assigned cluster is retained.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserRecord {
	/// Resource payload.
	#[serde(deserialize_with = "null_as_default")]
	pub data: UserData,
}
/// `data` member of a [`UserRecord`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserData {
	/// Generic attribute bag.
	#[serde(deserialize_with = "null_as_default")]
	pub attributes: UserAttributes,
}
/// `attributes` member of a [`UserRecord`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserAttributes {
	/// API URL of the cluster the user is assigned to.
	#[serde(deserialize_with = "null_as_default")]
	pub cluster: String,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct TokenBody {
	#[serde(deserialize_with = "null_as_default")]
	access_token: String,
}

/// Returns `Ok(())` for `200 OK`; otherwise converts the body into a [`ResponseError`].
///
/// An envelope with zero entries still yields [`ResponseError::Rejected`] with an empty message,
/// since the status alone already signals failure.
pub fn validate_response(status: StatusCode, body: &[u8]) -> Result<(), ResponseError> {
	if status == StatusCode::OK {
		return Ok(());
	}

	let status = status.as_u16();
	let envelope: ErrorEnvelope = decode(body)
		.map_err(|source| ResponseError::MalformedBody { status, source })?;

	Err(ResponseError::Rejected { status, message: envelope.summary(), entries: envelope.errors })
}

/// Extracts the trimmed `access_token` from a success body.
///
/// A missing or blank field yields an empty string; rejecting it is up to the caller.
pub fn parse_token(body: &[u8]) -> Result<String, ParseError> {
	let token: TokenBody = decode(body).map_err(ParseError::Token)?;

	Ok(token.access_token.trim().to_owned())
}

/// Extracts the assigned cluster URL from a user record body.
pub fn parse_user_cluster(body: &[u8]) -> Result<String, ParseError> {
	let record: UserRecord = decode(body).map_err(ParseError::UserRecord)?;

	Ok(record.data.attributes.cluster)
}

// A JSON `null` reads as the field's empty value, the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn decode<'de, T>(body: &'de [u8]) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
where
	T: Default + Deserialize<'de>,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let value: Option<T> = serde_path_to_error::deserialize(&mut deserializer)?;

	Ok(value.unwrap_or_default())
}
