use std::collections::BTreeMap;

use crate::{McError, McResult};
use crate::nbt::tag::{
	DecodeNbt,
	ListTag,
	Tag,
	TagID,
};

use super::biomeregistry::BiomeRegistry;
use super::blockregistry::BlockRegistry;
use super::palette::{
	self,
	SECTION_BIOME_COUNT,
	SECTION_BLOCK_COUNT,
};

macro_rules! map_decoder {
	($map:expr; $name:literal -> $type:ty) => {
		<$type>::decode_nbt($map.shift_remove($name).ok_or(McError::NotFoundInCompound($name.to_owned()))?)?
	};
}

/// One decoded 16x16x16 section of a chunk. The arrays hold ids from
/// the region's block and biome caches; a missing container leaves the
/// corresponding array unset.
#[derive(Debug)]
pub struct ChunkSection {
	pub y: i8,
	pub blocks: Option<Box<[u32; SECTION_BLOCK_COUNT]>>,
	pub biomes: Option<Box<[u32; SECTION_BIOME_COUNT]>>,
}

/// A decoded chunk. Sections are keyed by their `Y` coordinate so a
/// sparse or out-of-order section list can't alias two sections onto
/// one slot.
#[derive(Debug)]
pub struct Chunk {
	pub status: String,
	pub sections: BTreeMap<i8, ChunkSection>,
}

/// Reads the chunk-relative position out of a chunk tag, if it has one.
pub fn chunk_coord(tag: &Tag) -> Option<(i32, i32)> {
	let Tag::Compound(map) = tag else {
		return None;
	};
	if let (Some(Tag::Int(x)), Some(Tag::Int(z))) = (map.get("xPos"), map.get("zPos")) {
		Some((*x, *z))
	} else {
		None
	}
}

impl Chunk {
	/// Only chunks the game finished generating carry meaningful
	/// block and biome data.
	pub fn is_full_status(status: &str) -> bool {
		matches!(status, "minecraft:full" | "full")
	}

	/// Decodes a chunk tag, unpacking each section's paletted
	/// containers into the given caches. A chunk whose `Status` isn't
	/// full decodes to a chunk with no sections.
	pub fn decode(tag: Tag, blocks: &mut BlockRegistry, biomes: &mut BiomeRegistry) -> McResult<Self> {
		let found = tag.id();
		let Tag::Compound(mut map) = tag else {
			return Err(McError::TagTypeMismatch {
				expected: TagID::Compound,
				found,
			});
		};
		let status = map_decoder!(map; "Status" -> String);
		let mut chunk = Chunk {
			sections: BTreeMap::new(),
			status,
		};
		if !Self::is_full_status(&chunk.status) {
			log::trace!("skipping sections of chunk with status {:?}", chunk.status);
			return Ok(chunk);
		}
		let sections = match map_decoder!(map; "sections" -> ListTag) {
			ListTag::Compound(sections) => sections,
			ListTag::Empty => Vec::new(),
			_ => return Err(McError::NbtDecodeError),
		};
		for mut section in sections {
			let y = map_decoder!(section; "Y" -> i8);
			let section_blocks = match section.get("block_states") {
				Some(Tag::Compound(container)) => Some(palette::decode_block_states(container, blocks)?),
				Some(_) => return Err(McError::NbtDecodeError),
				None => None,
			};
			let section_biomes = match section.get("biomes") {
				Some(Tag::Compound(container)) => Some(palette::decode_biomes(container, biomes)?),
				Some(_) => return Err(McError::NbtDecodeError),
				None => None,
			};
			chunk.sections.insert(y, ChunkSection {
				y,
				blocks: section_blocks,
				biomes: section_biomes,
			});
		}
		Ok(chunk)
	}

	pub fn section(&self, y: i8) -> Option<&ChunkSection> {
		self.sections.get(&y)
	}

	/// True when no sections were decoded, either because the chunk
	/// had none or because its status wasn't full.
	pub fn is_empty(&self) -> bool {
		self.sections.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compound;
	use crate::nbt::Map;
	use crate::world::blockstate::BlockState;

	fn uniform_section(y: i8, block: &str, biome: &str) -> Map {
		let section = compound!(
			("Y", y),
			("block_states", compound!(
				("palette", Tag::List(ListTag::Compound(vec![
					Map::from([("Name".to_owned(), Tag::String(block.to_owned()))]),
				]))),
			)),
			("biomes", compound!(
				("palette", Tag::List(ListTag::String(vec![biome.to_owned()]))),
			)),
		);
		let Tag::Compound(section) = section else {
			unreachable!()
		};
		section
	}

	#[test]
	fn sections_are_keyed_by_y() {
		let tag = compound!(
			("Status", "minecraft:full"),
			("sections", Tag::List(ListTag::Compound(vec![
				uniform_section(3, "minecraft:stone", "minecraft:plains"),
				uniform_section(-4, "minecraft:deepslate", "minecraft:dripstone_caves"),
			]))),
		);
		let mut blocks = BlockRegistry::new();
		let mut biomes = BiomeRegistry::new();
		let chunk = Chunk::decode(tag, &mut blocks, &mut biomes).unwrap();
		assert_eq!(chunk.sections.len(), 2);
		let deep = chunk.section(-4).unwrap();
		assert_eq!(deep.y, -4);
		let stone_id = blocks.register(BlockState::from("minecraft:stone"));
		assert_eq!(chunk.section(3).unwrap().blocks.as_ref().unwrap()[0], stone_id);
		assert_eq!(deep.blocks.as_ref().unwrap()[4095], 1);
		assert_eq!(deep.biomes.as_ref().unwrap()[63], 1);
		assert_eq!(biomes.len(), 2);
	}

	#[test]
	fn non_full_chunks_keep_their_sections_packed() {
		let tag = compound!(
			("Status", "minecraft:features"),
			("sections", Tag::List(ListTag::Compound(vec![
				uniform_section(0, "minecraft:stone", "minecraft:plains"),
			]))),
		);
		let mut blocks = BlockRegistry::new();
		let mut biomes = BiomeRegistry::new();
		let chunk = Chunk::decode(tag, &mut blocks, &mut biomes).unwrap();
		assert!(chunk.is_empty());
		assert_eq!(chunk.status, "minecraft:features");
		assert!(blocks.is_empty());
	}

	#[test]
	fn plain_full_status_is_accepted() {
		let tag = compound!(
			("Status", "full"),
			("sections", Tag::List(ListTag::Empty)),
		);
		let mut blocks = BlockRegistry::new();
		let mut biomes = BiomeRegistry::new();
		let chunk = Chunk::decode(tag, &mut blocks, &mut biomes).unwrap();
		assert!(chunk.is_empty());
	}

	#[test]
	fn missing_status_is_an_error() {
		let tag = compound!(("xPos", 0i32));
		let mut blocks = BlockRegistry::new();
		let mut biomes = BiomeRegistry::new();
		let err = Chunk::decode(tag, &mut blocks, &mut biomes).unwrap_err();
		assert!(matches!(err, McError::NotFoundInCompound(name) if name == "Status"));
	}

	#[test]
	fn coord_helper() {
		let tag = compound!(
			("xPos", 3i32),
			("zPos", -7i32),
		);
		assert_eq!(chunk_coord(&tag), Some((3, -7)));
		assert_eq!(chunk_coord(&Tag::Byte(0)), None);
	}
}
