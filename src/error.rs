use thiserror::Error;

use crate::nbt::tag::TagID;

pub type McResult<T> = Result<T, McError>;

/// The master error type.
#[derive(Debug, Error)]
pub enum McError {
	#[error("IO Error: {0}")]
	IoError(#[from] std::io::Error),
	#[error("Unexpected end of stream.")]
	Truncated,
	#[error("Failed to convert to UTF-8 string.")]
	FromUtf8Error(#[from] std::string::FromUtf8Error),
	#[error("Unsupported Tag ID: {0}")]
	UnsupportedTagId(u8),
	#[error("Encountered the End Tag ID marker.")]
	EndTagMarker,
	#[error("Invalid length: {0}")]
	InvalidLength(i32),
	#[error("Invalid Compression value: {0}")]
	InvalidCompressionScheme(u8),
	#[error("Compression value {0} is recognized but not supported.")]
	UnsupportedCompressionScheme(u8),
	#[error("Expected {expected} tag, found {found}.")]
	TagTypeMismatch {
		expected: TagID,
		found: TagID,
	},
	#[error("List of {expected} cannot hold {found}.")]
	ListTagMismatch {
		expected: TagID,
		found: TagID,
	},
	#[error("\"{0}\" was not found in the compound.")]
	NotFoundInCompound(String),
	#[error("Palette index {index} is out of range for a palette of {palette_len}.")]
	PaletteOutOfRange {
		index: usize,
		palette_len: usize,
	},
	#[error("Packed data ran out after {found} of {expected} entries.")]
	PackedDataUnderflow {
		expected: usize,
		found: usize,
	},
	#[error("Chunk is too large to fit in a region file.")]
	ChunkTooLarge,
	#[error("Chunk sectors must start on a 4KiB boundary.")]
	StreamSectorBoundaryError,
	#[error("Failed to decode NBT structure.")]
	NbtDecodeError,
	#[error("{0}")]
	Custom(String),
}

impl McError {

	pub fn custom<T, S: AsRef<str>>(msg: S) -> Result<T, Self> {
		Err(McError::Custom(msg.as_ref().to_owned()))
	}

	/// A failed exact read during decoding means the stream ended early,
	/// which callers should see as [McError::Truncated] rather than a
	/// bare IO error.
	pub(crate) fn eof(err: std::io::Error) -> McError {
		if err.kind() == std::io::ErrorKind::UnexpectedEof {
			McError::Truncated
		} else {
			McError::IoError(err)
		}
	}
}
