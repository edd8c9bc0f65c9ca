use crate::{McError, McResult};
use crate::nbt::Map;

/// The tag ids of the NBT wire format.
/// [TagID::End] never names a payload of its own. On the wire it
/// terminates compounds and marks the element kind of empty lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TagID {
	End = 0,
	Byte = 1,
	Short = 2,
	Int = 3,
	Long = 4,
	Float = 5,
	Double = 6,
	ByteArray = 7,
	String = 8,
	List = 9,
	Compound = 10,
	IntArray = 11,
	LongArray = 12,
}

impl TagID {
	/// The name of this tag kind the way documentation spells it.
	pub const fn title(self) -> &'static str {
		match self {
			TagID::End => "End",
			TagID::Byte => "Byte",
			TagID::Short => "Short",
			TagID::Int => "Int",
			TagID::Long => "Long",
			TagID::Float => "Float",
			TagID::Double => "Double",
			TagID::ByteArray => "ByteArray",
			TagID::String => "String",
			TagID::List => "List",
			TagID::Compound => "Compound",
			TagID::IntArray => "IntArray",
			TagID::LongArray => "LongArray",
		}
	}

	/// The id byte as written to the wire.
	pub const fn value(self) -> u8 {
		self as u8
	}
}

impl std::fmt::Display for TagID {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.title())
	}
}

impl TryFrom<u8> for TagID {
	type Error = McError;

	fn try_from(value: u8) -> McResult<Self> {
		Ok(match value {
			0 => TagID::End,
			1 => TagID::Byte,
			2 => TagID::Short,
			3 => TagID::Int,
			4 => TagID::Long,
			5 => TagID::Float,
			6 => TagID::Double,
			7 => TagID::ByteArray,
			8 => TagID::String,
			9 => TagID::List,
			10 => TagID::Compound,
			11 => TagID::IntArray,
			12 => TagID::LongArray,
			unknown => return Err(McError::UnsupportedTagId(unknown)),
		})
	}
}

/// A tag payload. One variant per payload category.
/// There is no End variant; End exists only on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
	Byte(i8),
	Short(i16),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	ByteArray(Vec<i8>),
	String(String),
	List(ListTag),
	Compound(Map),
	IntArray(Vec<i32>),
	LongArray(Vec<i64>),
}

/// The payload of a List tag. Lists are homogeneous on the wire, so the
/// element kind is carried by the variant and a mixed list cannot be
/// represented at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListTag {
	#[default]
	Empty,
	Byte(Vec<i8>),
	Short(Vec<i16>),
	Int(Vec<i32>),
	Long(Vec<i64>),
	Float(Vec<f32>),
	Double(Vec<f64>),
	ByteArray(Vec<Vec<i8>>),
	String(Vec<String>),
	List(Vec<ListTag>),
	Compound(Vec<Map>),
	IntArray(Vec<Vec<i32>>),
	LongArray(Vec<Vec<i64>>),
}

/// A root tag paired with its name, the way a tag sits at the top of an
/// NBT stream.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTag {
	pub name: String,
	pub tag: Tag,
}

impl NamedTag {
	/// Creates a [NamedTag] with an empty name.
	pub fn new<T: Into<Tag>>(tag: T) -> Self {
		Self {
			name: String::new(),
			tag: tag.into(),
		}
	}

	pub fn with_name<S: Into<String>, T: Into<Tag>>(name: S, tag: T) -> Self {
		Self {
			name: name.into(),
			tag: tag.into(),
		}
	}
}

impl From<Tag> for NamedTag {
	fn from(value: Tag) -> Self {
		NamedTag::new(value)
	}
}

impl From<NamedTag> for Tag {
	fn from(value: NamedTag) -> Self {
		value.tag
	}
}

macro_rules! tag_getters {
	($($getter:ident/$getter_mut:ident: $variant:ident => $type:ty;)+) => {
		$(
			pub fn $getter(&self) -> McResult<&$type> {
				if let Tag::$variant(value) = self {
					Ok(value)
				} else {
					Err(McError::TagTypeMismatch {
						expected: TagID::$variant,
						found: self.id(),
					})
				}
			}

			pub fn $getter_mut(&mut self) -> McResult<&mut $type> {
				let found = self.id();
				if let Tag::$variant(value) = self {
					Ok(value)
				} else {
					Err(McError::TagTypeMismatch {
						expected: TagID::$variant,
						found,
					})
				}
			}
		)+
	};
}

impl Tag {
	/// The wire id of this tag's kind.
	pub fn id(&self) -> TagID {
		match self {
			Tag::Byte(_) => TagID::Byte,
			Tag::Short(_) => TagID::Short,
			Tag::Int(_) => TagID::Int,
			Tag::Long(_) => TagID::Long,
			Tag::Float(_) => TagID::Float,
			Tag::Double(_) => TagID::Double,
			Tag::ByteArray(_) => TagID::ByteArray,
			Tag::String(_) => TagID::String,
			Tag::List(_) => TagID::List,
			Tag::Compound(_) => TagID::Compound,
			Tag::IntArray(_) => TagID::IntArray,
			Tag::LongArray(_) => TagID::LongArray,
		}
	}

	// Typed borrow accessors. Each returns [McError::TagTypeMismatch]
	// when the tag holds a different payload.
	tag_getters!{
		byte/byte_mut: Byte => i8;
		short/short_mut: Short => i16;
		int/int_mut: Int => i32;
		long/long_mut: Long => i64;
		float/float_mut: Float => f32;
		double/double_mut: Double => f64;
		byte_array/byte_array_mut: ByteArray => Vec<i8>;
		string/string_mut: String => String;
		list/list_mut: List => ListTag;
		compound/compound_mut: Compound => Map;
		int_array/int_array_mut: IntArray => Vec<i32>;
		long_array/long_array_mut: LongArray => Vec<i64>;
	}
}

impl ListTag {
	/// The element kind of this list. Empty lists report [TagID::End],
	/// which is also how they are marked on the wire.
	pub fn id(&self) -> TagID {
		match self {
			ListTag::Empty => TagID::End,
			ListTag::Byte(_) => TagID::Byte,
			ListTag::Short(_) => TagID::Short,
			ListTag::Int(_) => TagID::Int,
			ListTag::Long(_) => TagID::Long,
			ListTag::Float(_) => TagID::Float,
			ListTag::Double(_) => TagID::Double,
			ListTag::ByteArray(_) => TagID::ByteArray,
			ListTag::String(_) => TagID::String,
			ListTag::List(_) => TagID::List,
			ListTag::Compound(_) => TagID::Compound,
			ListTag::IntArray(_) => TagID::IntArray,
			ListTag::LongArray(_) => TagID::LongArray,
		}
	}

	pub fn len(&self) -> usize {
		match self {
			ListTag::Empty => 0,
			ListTag::Byte(list) => list.len(),
			ListTag::Short(list) => list.len(),
			ListTag::Int(list) => list.len(),
			ListTag::Long(list) => list.len(),
			ListTag::Float(list) => list.len(),
			ListTag::Double(list) => list.len(),
			ListTag::ByteArray(list) => list.len(),
			ListTag::String(list) => list.len(),
			ListTag::List(list) => list.len(),
			ListTag::Compound(list) => list.len(),
			ListTag::IntArray(list) => list.len(),
			ListTag::LongArray(list) => list.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

macro_rules! tag_from_impls {
	($($type:ty => $variant:ident;)+) => {
		$(
			impl From<$type> for Tag {
				fn from(value: $type) -> Self {
					Tag::$variant(value)
				}
			}
		)+
	};
}

tag_from_impls!(
	i8 => Byte;
	i16 => Short;
	i32 => Int;
	i64 => Long;
	f32 => Float;
	f64 => Double;
	Vec<i8> => ByteArray;
	String => String;
	ListTag => List;
	Map => Compound;
	Vec<i32> => IntArray;
	Vec<i64> => LongArray;
);

impl From<&str> for Tag {
	fn from(value: &str) -> Self {
		Tag::String(value.to_owned())
	}
}

impl From<bool> for Tag {
	fn from(value: bool) -> Self {
		Tag::Byte(value as i8)
	}
}

macro_rules! listtag_from_impls {
	($($type:ty => $variant:ident;)+) => {
		$(
			impl From<Vec<$type>> for ListTag {
				fn from(value: Vec<$type>) -> Self {
					if value.is_empty() {
						ListTag::Empty
					} else {
						ListTag::$variant(value)
					}
				}
			}
		)+
	};
}

listtag_from_impls!(
	i8 => Byte;
	i16 => Short;
	i32 => Int;
	i64 => Long;
	f32 => Float;
	f64 => Double;
	Vec<i8> => ByteArray;
	String => String;
	ListTag => List;
	Map => Compound;
	Vec<i32> => IntArray;
	Vec<i64> => LongArray;
);

impl From<Vec<&str>> for ListTag {
	fn from(value: Vec<&str>) -> Self {
		if value.is_empty() {
			ListTag::Empty
		} else {
			ListTag::String(value.into_iter().map(str::to_owned).collect())
		}
	}
}

macro_rules! collect_list {
	($tags:expr, $expected:expr, $variant:ident) => {
		ListTag::$variant($tags.into_iter().map(|tag| match tag {
			Tag::$variant(value) => Ok(value),
			other => Err(McError::ListTagMismatch {
				expected: $expected,
				found: other.id(),
			}),
		}).collect::<McResult<Vec<_>>>()?)
	};
}

impl TryFrom<Vec<Tag>> for ListTag {
	type Error = McError;

	/// Builds a list from loose tags. Every tag must share the kind of
	/// the first one; a mixed collection is refused because the wire
	/// format cannot express it.
	fn try_from(tags: Vec<Tag>) -> McResult<Self> {
		let Some(first) = tags.first() else {
			return Ok(ListTag::Empty);
		};
		let expected = first.id();
		Ok(match expected {
			TagID::Byte => collect_list!(tags, expected, Byte),
			TagID::Short => collect_list!(tags, expected, Short),
			TagID::Int => collect_list!(tags, expected, Int),
			TagID::Long => collect_list!(tags, expected, Long),
			TagID::Float => collect_list!(tags, expected, Float),
			TagID::Double => collect_list!(tags, expected, Double),
			TagID::ByteArray => collect_list!(tags, expected, ByteArray),
			TagID::String => collect_list!(tags, expected, String),
			TagID::List => collect_list!(tags, expected, List),
			TagID::Compound => collect_list!(tags, expected, Compound),
			TagID::IntArray => collect_list!(tags, expected, IntArray),
			TagID::LongArray => collect_list!(tags, expected, LongArray),
			// Unreachable: Tag has no End variant.
			TagID::End => ListTag::Empty,
		})
	}
}

/// Converts a [Tag] into a concrete payload type.
pub trait DecodeNbt: Sized {
	type Error;
	fn decode_nbt(nbt: Tag) -> Result<Self, Self::Error>;
}

/// Converts a concrete payload type into a [Tag].
pub trait EncodeNbt {
	fn encode_nbt(self) -> Tag;
}

macro_rules! codec_impls {
	($($type:ty => $variant:ident;)+) => {
		$(
			impl DecodeNbt for $type {
				type Error = McError;

				fn decode_nbt(nbt: Tag) -> McResult<Self> {
					match nbt {
						Tag::$variant(value) => Ok(value),
						other => Err(McError::TagTypeMismatch {
							expected: <$type as crate::nbt::tagtype::TypeId>::tag_id(),
							found: other.id(),
						}),
					}
				}
			}

			impl EncodeNbt for $type {
				fn encode_nbt(self) -> Tag {
					Tag::$variant(self)
				}
			}
		)+
	};
}

codec_impls!(
	i8 => Byte;
	i16 => Short;
	i32 => Int;
	i64 => Long;
	f32 => Float;
	f64 => Double;
	Vec<i8> => ByteArray;
	String => String;
	ListTag => List;
	Map => Compound;
	Vec<i32> => IntArray;
	Vec<i64> => LongArray;
);

/// Lenient compound lookup: returns the child with the given name,
/// inserting a `0b` placeholder first when it is absent.
/// Use [Map::get] for the strict form.
pub fn compound_entry<'a>(map: &'a mut Map, name: &str) -> &'a mut Tag {
	map.entry(name.to_owned()).or_insert(Tag::Byte(0))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tag_ids() {
		assert_eq!(TagID::try_from(10u8).unwrap(), TagID::Compound);
		assert_eq!(TagID::Compound.value(), 0x0A);
		assert!(matches!(TagID::try_from(13u8), Err(McError::UnsupportedTagId(13))));
	}

	#[test]
	fn typed_getters() {
		let tag = Tag::Int(42);
		assert_eq!(*tag.int().unwrap(), 42);
		assert!(matches!(
			tag.string(),
			Err(McError::TagTypeMismatch { expected: TagID::String, found: TagID::Int })
		));
	}

	#[test]
	fn homogeneous_lists_only() {
		let list = ListTag::try_from(vec![Tag::Byte(1), Tag::Byte(2)]).unwrap();
		assert_eq!(list, ListTag::Byte(vec![1, 2]));
		let err = ListTag::try_from(vec![Tag::Byte(1), Tag::Int(2)]).unwrap_err();
		assert!(matches!(
			err,
			McError::ListTagMismatch { expected: TagID::Byte, found: TagID::Int }
		));
	}

	#[test]
	fn lenient_lookup_inserts_default() {
		let mut map = Map::new();
		assert_eq!(*compound_entry(&mut map, "missing"), Tag::Byte(0));
		*compound_entry(&mut map, "missing") = Tag::Int(7);
		assert_eq!(map.get("missing"), Some(&Tag::Int(7)));
		assert_eq!(map.len(), 1);
	}
}
