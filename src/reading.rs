//! Telemetry reading payloads accepted by the intake boundary.

// std
use std::str::FromStr;
// self
use crate::_prelude::*;

/// Field delimiter the intake boundary expects.
pub const FIELD_DELIMITER: char = ';';

/// Rejection raised when an intake payload does not carry exactly two delimited fields.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Reading must contain exactly two `;`-delimited fields.")]
pub struct ReadingFormatError;

/// One telemetry reading: two scalar measurements in a `;`-delimited payload.
///
/// The pipeline treats a reading as an opaque string; only the submit collaborator looks
/// inside it again via [`fields`](Self::fields). Readings live in memory only: created at
/// intake, consumed exactly once by the consumer, then discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reading(String);
impl Reading {
	/// Validates a raw intake payload into a reading.
	pub fn parse(raw: &str) -> Result<Self, ReadingFormatError> {
		let mut parts = raw.split(FIELD_DELIMITER);

		match (parts.next(), parts.next(), parts.next()) {
			(Some(_), Some(_), None) => Ok(Self(raw.to_owned())),
			_ => Err(ReadingFormatError),
		}
	}

	/// Returns the raw payload.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns the two measurement fields.
	pub fn fields(&self) -> (&str, &str) {
		// parse() guarantees the delimiter is present.
		self.0.split_once(FIELD_DELIMITER).unwrap_or((self.0.as_str(), ""))
	}
}
impl FromStr for Reading {
	type Err = ReadingFormatError;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		Self::parse(raw)
	}
}
impl Display for Reading {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
