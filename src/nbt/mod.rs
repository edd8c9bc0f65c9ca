pub mod tag;
pub mod tagtype;
pub mod io;
pub mod pretty;
pub mod macros;

pub use tag::{
	NamedTag,
	Tag,
	ListTag,
	TagID,
};

/// Ordered storage for the children of a Compound tag.
/// Insertion order is wire order, so a decoded compound re-encodes
/// with its children in the order they were found.
pub type Map = indexmap::IndexMap<std::string::String, tag::Tag>;
