use std::fs::File;
use std::io::{
	BufReader, BufWriter,
	Read, Write,
};
use std::path::Path;

use flate2::Compression;
use flate2::read::{
	GzDecoder,
	ZlibDecoder,
};
use flate2::write::{
	GzEncoder,
	ZlibEncoder,
};

use crate::{McError, McResult};
use crate::ioext::{Readable, Writable};
use crate::nbt::Map;
use crate::nbt::tag::{
	ListTag,
	NamedTag,
	Tag,
	TagID,
};

/// Types that read their payload from a big-endian NBT stream.
/// The payload carries no kind byte and no name; those belong to the
/// enclosing compound or the root.
pub trait NbtRead: Sized {
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self>;
}

/// Types that write their payload to a big-endian NBT stream.
/// Returns the number of bytes written.
pub trait NbtWrite {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize>;
}

macro_rules! primitive_io_impls {
	($($type:ty)+) => {
		$(
			impl NbtRead for $type {
				fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
					let mut buffer = [0u8; std::mem::size_of::<$type>()];
					reader.read_exact(&mut buffer).map_err(McError::eof)?;
					Ok(<$type>::from_be_bytes(buffer))
				}
			}

			impl NbtWrite for $type {
				fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
					writer.write_all(&self.to_be_bytes())?;
					Ok(std::mem::size_of::<$type>())
				}
			}
		)+
	};
}

primitive_io_impls!(u8 i8 u16 i16 u32 i32 u64 i64);

// Floats cross the wire as their unsigned bit pattern. Swapping them
// as floating-point values would pass them through the FPU and is not
// guaranteed to preserve every bit pattern.
impl NbtRead for f32 {
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
		Ok(f32::from_bits(u32::nbt_read(reader)?))
	}
}

impl NbtWrite for f32 {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		self.to_bits().nbt_write(writer)
	}
}

impl NbtRead for f64 {
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
		Ok(f64::from_bits(u64::nbt_read(reader)?))
	}
}

impl NbtWrite for f64 {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		self.to_bits().nbt_write(writer)
	}
}

impl NbtRead for String {
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
		let length = u16::nbt_read(reader)?;
		let mut buffer = vec![0u8; length as usize];
		reader.read_exact(&mut buffer).map_err(McError::eof)?;
		Ok(String::from_utf8(buffer)?)
	}
}

impl NbtWrite for str {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		if self.len() > u16::MAX as usize {
			return Err(McError::InvalidLength(self.len() as i32));
		}
		// No NUL terminator; the u16 prefix is the only length marker.
		let mut size = (self.len() as u16).nbt_write(writer)?;
		writer.write_all(self.as_bytes())?;
		size += self.len();
		Ok(size)
	}
}

impl NbtWrite for String {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		self.as_str().nbt_write(writer)
	}
}

/// Reads the i32 length prefix of an array or list, rejecting negatives.
fn read_length<R: Read>(reader: &mut R) -> McResult<usize> {
	let length = i32::nbt_read(reader)?;
	if length < 0 {
		return Err(McError::InvalidLength(length));
	}
	Ok(length as usize)
}

/// Reads `count` unnamed payloads of a known kind.
fn read_payloads<T: NbtRead, R: Read>(reader: &mut R, count: usize) -> McResult<Vec<T>> {
	(0..count).map(|_| T::nbt_read(reader)).collect()
}

impl NbtRead for Vec<i8> {
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
		let length = read_length(reader)?;
		let mut buffer = vec![0u8; length];
		reader.read_exact(&mut buffer).map_err(McError::eof)?;
		Ok(buffer.into_iter().map(|byte| byte as i8).collect())
	}
}

impl NbtWrite for Vec<i8> {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		let mut size = (self.len() as i32).nbt_write(writer)?;
		for value in self.iter() {
			size += value.nbt_write(writer)?;
		}
		Ok(size)
	}
}

macro_rules! scalar_array_io_impls {
	($($type:ty)+) => {
		$(
			impl NbtRead for Vec<$type> {
				fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
					let length = read_length(reader)?;
					read_payloads(reader, length)
				}
			}

			impl NbtWrite for Vec<$type> {
				fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
					let mut size = (self.len() as i32).nbt_write(writer)?;
					for value in self.iter() {
						size += value.nbt_write(writer)?;
					}
					Ok(size)
				}
			}
		)+
	};
}

scalar_array_io_impls!(i32 i64);

impl NbtRead for ListTag {
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
		let kind = TagID::try_from(u8::nbt_read(reader)?)?;
		let length = i32::nbt_read(reader)?;
		// Some writers mark empty lists with a kind of End, and at
		// least one known writer emits a negative length. Both decode
		// to the empty list.
		if length <= 0 {
			return Ok(ListTag::Empty);
		}
		let length = length as usize;
		Ok(match kind {
			TagID::End => return Err(McError::EndTagMarker),
			TagID::Byte => ListTag::Byte(read_payloads(reader, length)?),
			TagID::Short => ListTag::Short(read_payloads(reader, length)?),
			TagID::Int => ListTag::Int(read_payloads(reader, length)?),
			TagID::Long => ListTag::Long(read_payloads(reader, length)?),
			TagID::Float => ListTag::Float(read_payloads(reader, length)?),
			TagID::Double => ListTag::Double(read_payloads(reader, length)?),
			TagID::ByteArray => ListTag::ByteArray(read_payloads(reader, length)?),
			TagID::String => ListTag::String(read_payloads(reader, length)?),
			TagID::List => ListTag::List(read_payloads(reader, length)?),
			TagID::Compound => ListTag::Compound(read_payloads(reader, length)?),
			TagID::IntArray => ListTag::IntArray(read_payloads(reader, length)?),
			TagID::LongArray => ListTag::LongArray(read_payloads(reader, length)?),
		})
	}
}

macro_rules! write_list {
	($writer:expr, $list:expr, $kind:expr) => {{
		let mut size = $kind.value().nbt_write($writer)?;
		size += ($list.len() as i32).nbt_write($writer)?;
		for element in $list.iter() {
			size += element.nbt_write($writer)?;
		}
		size
	}};
}

impl NbtWrite for ListTag {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		Ok(match self {
			ListTag::Empty => {
				let size = TagID::End.value().nbt_write(writer)?;
				size + 0i32.nbt_write(writer)?
			}
			ListTag::Byte(list) => write_list!(writer, list, TagID::Byte),
			ListTag::Short(list) => write_list!(writer, list, TagID::Short),
			ListTag::Int(list) => write_list!(writer, list, TagID::Int),
			ListTag::Long(list) => write_list!(writer, list, TagID::Long),
			ListTag::Float(list) => write_list!(writer, list, TagID::Float),
			ListTag::Double(list) => write_list!(writer, list, TagID::Double),
			ListTag::ByteArray(list) => write_list!(writer, list, TagID::ByteArray),
			ListTag::String(list) => write_list!(writer, list, TagID::String),
			ListTag::List(list) => write_list!(writer, list, TagID::List),
			ListTag::Compound(list) => write_list!(writer, list, TagID::Compound),
			ListTag::IntArray(list) => write_list!(writer, list, TagID::IntArray),
			ListTag::LongArray(list) => write_list!(writer, list, TagID::LongArray),
		})
	}
}

impl NbtRead for Map {
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
		let mut map = Map::new();
		loop {
			let id = u8::nbt_read(reader)?;
			if id == TagID::End.value() {
				break;
			}
			let kind = TagID::try_from(id)?;
			let name = String::nbt_read(reader)?;
			// A later duplicate of a name overwrites the earlier value
			// but keeps its position, so lookups stay first-match.
			map.insert(name, read_payload(reader, kind)?);
		}
		Ok(map)
	}
}

impl NbtWrite for Map {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		let mut size = 0;
		for (name, tag) in self.iter() {
			size += tag.id().value().nbt_write(writer)?;
			size += name.nbt_write(writer)?;
			size += tag.nbt_write(writer)?;
		}
		size += TagID::End.value().nbt_write(writer)?;
		Ok(size)
	}
}

/// Reads the payload of an already-determined kind.
fn read_payload<R: Read>(reader: &mut R, kind: TagID) -> McResult<Tag> {
	Ok(match kind {
		TagID::End => return Err(McError::EndTagMarker),
		TagID::Byte => Tag::Byte(i8::nbt_read(reader)?),
		TagID::Short => Tag::Short(i16::nbt_read(reader)?),
		TagID::Int => Tag::Int(i32::nbt_read(reader)?),
		TagID::Long => Tag::Long(i64::nbt_read(reader)?),
		TagID::Float => Tag::Float(f32::nbt_read(reader)?),
		TagID::Double => Tag::Double(f64::nbt_read(reader)?),
		TagID::ByteArray => Tag::ByteArray(Vec::<i8>::nbt_read(reader)?),
		TagID::String => Tag::String(String::nbt_read(reader)?),
		TagID::List => Tag::List(ListTag::nbt_read(reader)?),
		TagID::Compound => Tag::Compound(Map::nbt_read(reader)?),
		TagID::IntArray => Tag::IntArray(Vec::<i32>::nbt_read(reader)?),
		TagID::LongArray => Tag::LongArray(Vec::<i64>::nbt_read(reader)?),
	})
}

impl NbtWrite for Tag {
	/// Writes only the payload. The kind byte and name are written by
	/// the enclosing compound or by [WriteNbt::write_nbt].
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		match self {
			Tag::Byte(value) => value.nbt_write(writer),
			Tag::Short(value) => value.nbt_write(writer),
			Tag::Int(value) => value.nbt_write(writer),
			Tag::Long(value) => value.nbt_write(writer),
			Tag::Float(value) => value.nbt_write(writer),
			Tag::Double(value) => value.nbt_write(writer),
			Tag::ByteArray(value) => value.nbt_write(writer),
			Tag::String(value) => value.nbt_write(writer),
			Tag::List(value) => value.nbt_write(writer),
			Tag::Compound(value) => value.nbt_write(writer),
			Tag::IntArray(value) => value.nbt_write(writer),
			Tag::LongArray(value) => value.nbt_write(writer),
		}
	}
}

/// Reader extension that decodes a full named root tag.
pub trait ReadNbt {
	fn read_nbt(&mut self) -> McResult<NamedTag>;
}

impl<R: Read> ReadNbt for R {
	fn read_nbt(&mut self) -> McResult<NamedTag> {
		let kind = TagID::try_from(u8::nbt_read(self)?)?;
		if kind == TagID::End {
			return Err(McError::EndTagMarker);
		}
		let name = String::nbt_read(self)?;
		Ok(NamedTag {
			name,
			tag: read_payload(self, kind)?,
		})
	}
}

/// Writer extension that encodes a full named root tag.
pub trait WriteNbt {
	fn write_nbt(&mut self, tag: &NamedTag) -> McResult<usize>;
}

impl<W: Write> WriteNbt for W {
	fn write_nbt(&mut self, tag: &NamedTag) -> McResult<usize> {
		let mut size = tag.tag.id().value().nbt_write(self)?;
		size += tag.name.nbt_write(self)?;
		size += tag.tag.nbt_write(self)?;
		Ok(size)
	}
}

impl Readable for NamedTag {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
		reader.read_nbt()
	}
}

impl Writable for NamedTag {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		writer.write_nbt(self)
	}
}

pub fn read_nbt<R: Read>(reader: &mut R) -> McResult<NamedTag> {
	reader.read_nbt()
}

pub fn read_nbt_gzip<R: Read>(reader: R) -> McResult<NamedTag> {
	GzDecoder::new(reader).read_nbt()
}

pub fn read_nbt_zlib<R: Read>(reader: R) -> McResult<NamedTag> {
	ZlibDecoder::new(reader).read_nbt()
}

pub fn write_nbt<W: Write>(writer: &mut W, tag: &NamedTag) -> McResult<usize> {
	writer.write_nbt(tag)
}

pub fn write_nbt_gzip<W: Write>(writer: W, tag: &NamedTag) -> McResult<usize> {
	let mut encoder = GzEncoder::new(writer, Compression::default());
	let size = encoder.write_nbt(tag)?;
	encoder.finish()?;
	Ok(size)
}

pub fn write_nbt_zlib<W: Write>(writer: W, tag: &NamedTag) -> McResult<usize> {
	let mut encoder = ZlibEncoder::new(writer, Compression::default());
	let size = encoder.write_nbt(tag)?;
	encoder.finish()?;
	Ok(size)
}

pub fn read_nbt_file_gzip<P: AsRef<Path>>(path: P) -> McResult<NamedTag> {
	let file = File::open(path.as_ref())?;
	read_nbt_gzip(BufReader::new(file))
}

pub fn read_nbt_file_zlib<P: AsRef<Path>>(path: P) -> McResult<NamedTag> {
	let file = File::open(path.as_ref())?;
	read_nbt_zlib(BufReader::new(file))
}

pub fn write_nbt_file_gzip<P: AsRef<Path>>(path: P, tag: &NamedTag) -> McResult<usize> {
	let file = File::create(path.as_ref())?;
	write_nbt_gzip(BufWriter::new(file), tag)
}

pub fn write_nbt_file_zlib<P: AsRef<Path>>(path: P, tag: &NamedTag) -> McResult<usize> {
	let file = File::create(path.as_ref())?;
	write_nbt_zlib(BufWriter::new(file), tag)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{compound, list};
	use std::io::Cursor;

	fn encode(tag: &NamedTag) -> Vec<u8> {
		let mut buffer = Cursor::new(Vec::new());
		buffer.write_nbt(tag).unwrap();
		buffer.into_inner()
	}

	fn decode(bytes: &[u8]) -> McResult<NamedTag> {
		Cursor::new(bytes).read_nbt()
	}

	#[test]
	fn int_tag_bytes() {
		let tag = NamedTag::with_name("x", Tag::Int(-1));
		let bytes = encode(&tag);
		assert_eq!(bytes, [0x03, 0x00, 0x01, 0x78, 0xFF, 0xFF, 0xFF, 0xFF]);
		assert_eq!(decode(&bytes).unwrap(), tag);
	}

	#[test]
	fn compound_with_list_bytes() {
		let tag = NamedTag::with_name("r", compound!(
			("l", list![1i8, 2i8, 3i8]),
		));
		let bytes = encode(&tag);
		assert_eq!(bytes, [
			0x0A, 0x00, 0x01, 0x72,
			0x09, 0x00, 0x01, 0x6C, 0x01, 0x00, 0x00, 0x00, 0x03, 0x01, 0x02, 0x03,
			0x00,
		]);
		assert_eq!(decode(&bytes).unwrap(), tag);
	}

	#[test]
	fn every_kind_roundtrips() {
		let tag = NamedTag::with_name("root", compound!(
			("byte", -5i8),
			("short", 300i16),
			("int", 70_000i32),
			("long", 5_000_000_000i64),
			("float", 3.5f32),
			("double", -0.25f64),
			("bytes", vec![-1i8, 0, 1]),
			("text", "hello"),
			("list", list!["a".to_owned(), "b".to_owned()]),
			("nested", compound!(("inner", 1i8))),
			("ints", vec![1i32, -2, 3]),
			("longs", vec![i64::MIN, i64::MAX]),
		));
		assert_eq!(decode(&encode(&tag)).unwrap(), tag);
	}

	#[test]
	fn gzip_zlib_roundtrip() {
		let tag = NamedTag::with_name("c", compound!(("value", 123i32)));
		let mut gz = Vec::new();
		write_nbt_gzip(&mut gz, &tag).unwrap();
		assert_eq!(read_nbt_gzip(Cursor::new(gz)).unwrap(), tag);
		let mut zl = Vec::new();
		write_nbt_zlib(&mut zl, &tag).unwrap();
		assert_eq!(read_nbt_zlib(Cursor::new(zl)).unwrap(), tag);
	}

	#[test]
	fn negative_array_length_is_rejected() {
		// ByteArray "" with a length of -1.
		let bytes = [0x07, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF];
		assert!(matches!(decode(&bytes), Err(McError::InvalidLength(-1))));
	}

	#[test]
	fn empty_list_with_end_kind_is_accepted() {
		// List "" with element kind End and length 0.
		let bytes = [0x09, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
		let tag = decode(&bytes).unwrap();
		assert_eq!(tag.tag, Tag::List(ListTag::Empty));
	}

	#[test]
	fn end_kind_with_elements_is_rejected() {
		let bytes = [0x09, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02];
		assert!(matches!(decode(&bytes), Err(McError::EndTagMarker)));
	}

	#[test]
	fn unknown_tag_id_is_rejected() {
		let bytes = [0x0D, 0x00, 0x00];
		assert!(matches!(decode(&bytes), Err(McError::UnsupportedTagId(0x0D))));
	}

	#[test]
	fn truncated_stream_is_reported() {
		// Int "x" with only two of its four payload bytes.
		let bytes = [0x03, 0x00, 0x01, 0x78, 0xFF, 0xFF];
		assert!(matches!(decode(&bytes), Err(McError::Truncated)));
	}

	#[test]
	fn top_level_end_is_rejected() {
		assert!(matches!(decode(&[0x00]), Err(McError::EndTagMarker)));
	}
}
