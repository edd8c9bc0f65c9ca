use std::io::{Read, Write};

use crate::{
	McError, McResult,
	ioext::*,
};

/// Compression scheme used for individual chunk payloads.
///
/// The wire also knows LZ4 (4) and "custom" (127); both are parsed so
/// they can be reported distinctly, but neither is supported and they
/// never construct a value of this type.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionScheme {
	/// GZip compression is used.
	GZip = 1,
	/// ZLib compression is used. This is what the game itself writes.
	#[default]
	ZLib = 2,
	/// Data is uncompressed.
	Uncompressed = 3,
}

impl CompressionScheme {
	/// Interprets a scheme byte from a chunk payload header.
	pub fn parse(value: u8) -> McResult<Self> {
		match value {
			1 => Ok(Self::GZip),
			2 => Ok(Self::ZLib),
			3 => Ok(Self::Uncompressed),
			4 | 127 => Err(McError::UnsupportedCompressionScheme(value)),
			unexpected => Err(McError::InvalidCompressionScheme(unexpected)),
		}
	}

	/// The scheme byte as written to the wire.
	pub const fn value(self) -> u8 {
		self as u8
	}
}

impl Readable for CompressionScheme {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
		CompressionScheme::parse(reader.read_value()?)
	}
}

impl Writable for CompressionScheme {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		writer.write_value(self.value())
	}
}
