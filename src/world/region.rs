use std::path::Path;

use crate::McResult;
use crate::nbt::tag::NamedTag;

use super::biomeregistry::BiomeRegistry;
use super::blockregistry::BlockRegistry;
use super::chunk::Chunk;
use super::io::region::coord::RegionCoord;
use super::io::region::regionfile::{
	ChunkTags,
	read_region_file,
};

/// A fully decoded region: up to 1024 chunks plus the two caches their
/// section arrays index into. The caches belong to the region and live
/// exactly as long as it does; ids stay valid for that whole lifetime.
#[derive(Debug)]
pub struct Region {
	chunks: Box<[Option<Chunk>; 1024]>,
	pub blocks: BlockRegistry,
	pub biomes: BiomeRegistry,
}

impl Region {
	/// Reads a region file and decodes every present chunk.
	pub fn load<P: AsRef<Path>>(path: P) -> McResult<Self> {
		Self::from_chunk_tags(read_region_file(path)?)
	}

	/// Decodes 1024 chunk slots in index order. Slots without a chunk
	/// stay empty; chunks whose status isn't full decode to a chunk
	/// with no sections.
	pub fn from_chunk_tags(tags: ChunkTags) -> McResult<Self> {
		let mut blocks = BlockRegistry::new();
		let mut biomes = BiomeRegistry::new();
		let slots: Box<[Option<NamedTag>]> = tags;
		let chunks = slots.into_vec().into_iter().map(|slot| {
			slot.map(|tag| Chunk::decode(tag.tag, &mut blocks, &mut biomes))
				.transpose()
		}).collect::<McResult<Vec<Option<Chunk>>>>()?;
		log::debug!(
			"decoded region: {} chunks, {} block states, {} biomes",
			chunks.iter().flatten().count(),
			blocks.len(),
			biomes.len(),
		);
		Ok(Self {
			chunks: chunks.into_boxed_slice().try_into().unwrap(),
			blocks,
			biomes,
		})
	}

	pub fn get_chunk<C: Into<RegionCoord>>(&self, coord: C) -> Option<&Chunk> {
		self.chunks[coord.into().index()].as_ref()
	}

	pub fn chunks(&self) -> &[Option<Chunk>; 1024] {
		&self.chunks
	}

	pub fn chunk_count(&self) -> usize {
		self.chunks.iter().flatten().count()
	}
}
