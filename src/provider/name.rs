//! Validated, case-insensitive token provider names.

// self
use crate::_prelude::*;

const PROVIDER_NAME_MAX_LEN: usize = 128;

/// Error returned when provider name validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum ProviderNameError {
	/// The name was empty.
	#[error("Token provider name cannot be empty.")]
	Empty,
	/// The name contains whitespace characters.
	#[error("Token provider name `{name}` contains whitespace.")]
	ContainsWhitespace {
		/// Rejected name.
		name: String,
	},
	/// The name exceeded the allowed character count.
	#[error("Token provider name exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Name under which a token provider configuration is registered.
///
/// Equality and hashing fold ASCII case, so `Billing` and `billing` address the same
/// provider. The spelling used at registration is kept for display and cache keys.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderName(String);
impl ProviderName {
	/// Creates a new provider name after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, ProviderNameError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Returns the registered spelling.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Case-insensitive comparison against a raw name.
	pub fn matches(&self, other: &str) -> bool {
		self.0.eq_ignore_ascii_case(other)
	}
}
impl PartialEq for ProviderName {
	fn eq(&self, other: &Self) -> bool {
		self.matches(&other.0)
	}
}
impl Eq for ProviderName {}
impl Hash for ProviderName {
	fn hash<H>(&self, state: &mut H)
	where
		H: Hasher,
	{
		for byte in self.0.bytes() {
			state.write_u8(byte.to_ascii_lowercase());
		}

		state.write_u8(0xff);
	}
}
impl AsRef<str> for ProviderName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<ProviderName> for String {
	fn from(value: ProviderName) -> Self {
		value.0
	}
}
impl TryFrom<String> for ProviderName {
	type Error = ProviderNameError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Debug for ProviderName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ProviderName({})", self.0)
	}
}
impl Display for ProviderName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ProviderName {
	type Err = ProviderNameError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), ProviderNameError> {
	if view.is_empty() {
		return Err(ProviderNameError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(ProviderNameError::ContainsWhitespace { name: view.to_owned() });
	}
	if view.chars().count() > PROVIDER_NAME_MAX_LEN {
		return Err(ProviderNameError::TooLong { max: PROVIDER_NAME_MAX_LEN });
	}

	Ok(())
}
