use std::fs::File;
use std::io::{
	BufReader, BufWriter,
	Read, Write,
	Seek, SeekFrom,
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
use crate::ioext::*;
use crate::nbt::io::{ReadNbt, WriteNbt};
use crate::nbt::tag::NamedTag;

use super::{pad_size, required_sectors};
use super::compressionscheme::CompressionScheme;
use super::coord::RegionCoord;
use super::header::{
	RegionHeader,
	SectorTable,
	TimestampTable,
};
use super::sector::RegionSector;
use super::timestamp::Timestamp;

/// The 1024 chunk slots of a region. `None` marks an absent chunk.
pub type ChunkTags = Box<[Option<NamedTag>; 1024]>;

/// Reads every chunk of a region file. Slots whose sector table entry
/// is empty (or whose payload length is zero) come back as `None`.
pub fn read_region<R: Read + Seek>(reader: &mut R) -> McResult<ChunkTags> {
	let header = RegionHeader::read_from(reader)?;
	let mut chunks: Vec<Option<NamedTag>> = Vec::with_capacity(1024);
	for sector in header.sectors.iter() {
		if sector.is_empty() {
			chunks.push(None);
			continue;
		}
		reader.seek(sector.seeker())?;
		chunks.push(read_chunk_from_sector(reader)?);
	}
	log::debug!("read region: {} of 1024 chunks present", chunks.iter().flatten().count());
	Ok(chunks.into_boxed_slice().try_into().unwrap())
}

/// Reads a single chunk out of a region file, leaving the rest of the
/// file alone.
pub fn read_region_chunk<R: Read + Seek, C: Into<RegionCoord>>(reader: &mut R, coord: C) -> McResult<Option<NamedTag>> {
	let coord: RegionCoord = coord.into();
	reader.seek(coord.sector_table_offset())?;
	let sector = RegionSector::read_from(reader)?;
	if sector.is_empty() {
		return Ok(None);
	}
	reader.seek(sector.seeker())?;
	read_chunk_from_sector(reader)
}

/// Reads the `(length, scheme)` framed chunk payload at the reader's
/// current position, which must be the start of an allocated sector.
fn read_chunk_from_sector<R: Read>(reader: &mut R) -> McResult<Option<NamedTag>> {
	let length: u32 = reader.read_value()?;
	// An allocated sector with a zero length holds no chunk; it's a
	// wasted sector, not an error.
	if length == 0 {
		return Ok(None);
	}
	let scheme = CompressionScheme::parse(reader.read_value()?)?;
	// The scheme byte is counted by `length`, the rest is payload.
	let payload = reader.take((length - 1) as u64);
	Ok(Some(match scheme {
		CompressionScheme::GZip => GzDecoder::new(payload).read_nbt()?,
		CompressionScheme::ZLib => ZlibDecoder::new(payload).read_nbt()?,
		CompressionScheme::Uncompressed => {
			let mut payload = payload;
			payload.read_nbt()?
		}
	}))
}

/// Writes a whole region file: a reserved 8KiB header, then each
/// present chunk in index order on its own sector run, then the
/// finished sector and timestamp tables. Every chunk gets the same
/// timestamp. Returns the total size, which is always a multiple
/// of 4096.
pub fn write_region<W: Write + Seek>(
	writer: &mut W,
	chunks: &[Option<NamedTag>; 1024],
	scheme: CompressionScheme,
	timestamp: Timestamp,
) -> McResult<u64> {
	let mut sectors = SectorTable::default();
	// Reserve the header; the tables get written once the sector
	// layout is known.
	writer.write_zeroes(4096 * 2)?;
	let mut written = 0usize;
	for (index, slot) in chunks.iter().enumerate() {
		let Some(chunk) = slot else {
			continue;
		};
		sectors[index] = write_chunk_to_sector(writer, chunk, scheme)?;
		written += 1;
	}
	let end = writer.stream_position()?;
	writer.seek(SeekFrom::Start(0))?;
	sectors.write_to(writer)?;
	TimestampTable::filled(timestamp).write_to(writer)?;
	writer.seek(SeekFrom::Start(end))?;
	writer.flush()?;
	log::debug!("wrote region: {written} chunks, {end} bytes");
	Ok(end)
}

/// Writes one framed chunk payload starting at the writer's current
/// position, which must sit on a 4KiB boundary. The length field is
/// only known after compression, so four placeholder bytes are written
/// first and patched afterwards. Returns the sector run the chunk
/// landed on.
fn write_chunk_to_sector<W: Write + Seek>(writer: &mut W, chunk: &NamedTag, scheme: CompressionScheme) -> McResult<RegionSector> {
	let start = writer.stream_position()?;
	if start & 4095 != 0 {
		return Err(McError::StreamSectorBoundaryError);
	}
	writer.write_value(0u32)?;
	writer.write_value(scheme.value())?;
	match scheme {
		CompressionScheme::GZip => {
			let mut encoder = GzEncoder::new(&mut *writer, Compression::default());
			encoder.write_nbt(chunk)?;
			encoder.finish()?;
		}
		CompressionScheme::ZLib => {
			let mut encoder = ZlibEncoder::new(&mut *writer, Compression::default());
			encoder.write_nbt(chunk)?;
			encoder.finish()?;
		}
		CompressionScheme::Uncompressed => {
			writer.write_nbt(chunk)?;
		}
	}
	let end = writer.stream_position()?;
	// The length field counts the scheme byte and the payload, but not
	// its own four bytes.
	let length = (end - start - 4) as u32;
	writer.write_zeroes(pad_size(end - start))?;
	let sector_count = required_sectors((end - start) as u32);
	if sector_count > u8::MAX as u32 {
		return Err(McError::ChunkTooLarge);
	}
	let end_padded = writer.stream_position()?;
	writer.seek(SeekFrom::Start(start))?;
	writer.write_value(length)?;
	writer.seek(SeekFrom::Start(end_padded))?;
	Ok(RegionSector::new(
		// Shifting right 12 bits is a shortcut to get the 4KiB sector offset.
		start.overflowing_shr(12).0 as u32,
		sector_count as u8,
	))
}

/// Reads all 1024 chunk slots from the region file at `path`.
pub fn read_region_file<P: AsRef<Path>>(path: P) -> McResult<ChunkTags> {
	let file = File::open(path.as_ref())?;
	let mut reader = BufReader::with_capacity(4096, file);
	read_region(&mut reader)
}

/// Writes a region file to `path`, replacing whatever was there.
/// The region is built in a temporary file first and only copied over
/// the destination once the write has succeeded, so a failure never
/// leaves a torn region behind.
pub fn write_region_file<P: AsRef<Path>>(path: P, chunks: &[Option<NamedTag>; 1024], scheme: CompressionScheme) -> McResult<u64> {
	let output = tempfile::NamedTempFile::new()?;
	let mut writer = BufWriter::with_capacity(4096, output);
	let size = write_region(&mut writer, chunks, scheme, Timestamp::utc_now())?;
	let output = writer.into_inner().map_err(|err| err.into_error())?;
	std::fs::copy(output.path(), path.as_ref())?;
	Ok(size)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compound;
	use crate::nbt::tag::Tag;
	use crate::world::io::region::is_multiple_of_4096;
	use std::io::Cursor;

	fn chunk(index: i32) -> NamedTag {
		NamedTag::new(compound!(
			("Status", "minecraft:full"),
			("xPos", index % 32),
			("zPos", index / 32),
			("payload", vec![index as i64; 64]),
		))
	}

	fn slots(indices: &[usize]) -> Box<[Option<NamedTag>; 1024]> {
		let mut slots: Vec<Option<NamedTag>> = (0..1024).map(|_| None).collect();
		for &index in indices {
			slots[index] = Some(chunk(index as i32));
		}
		slots.try_into().unwrap()
	}

	#[test]
	fn region_roundtrip() {
		let chunks = slots(&[0, 17, 1023]);
		let mut buffer = Cursor::new(Vec::new());
		let size = write_region(&mut buffer, &chunks, CompressionScheme::ZLib, Timestamp(7)).unwrap();
		assert!(is_multiple_of_4096(size));
		assert_eq!(size, buffer.get_ref().len() as u64);

		buffer.set_position(0);
		let header = RegionHeader::read_from(&mut buffer).unwrap();
		for index in 0..1024usize {
			let sector = header.sectors[index];
			if index == 0 || index == 17 || index == 1023 {
				assert!(!sector.is_empty());
				assert_eq!(header.timestamps[index], Timestamp(7));
			} else {
				assert!(sector.is_empty(), "sector {index} should be empty");
			}
		}
		// The three sector runs cover sectors 2.. contiguously in
		// index order and account for the whole file.
		assert_eq!(header.sectors[0usize].sector_offset(), 2);
		assert_eq!(
			header.sectors[17usize].sector_offset(),
			header.sectors[0usize].sector_end_offset()
		);
		assert_eq!(header.sectors[1023usize].end_offset(), size);

		buffer.set_position(0);
		let reread = read_region(&mut buffer).unwrap();
		assert_eq!(reread.iter().flatten().count(), 3);
		assert_eq!(reread[0], chunks[0]);
		assert_eq!(reread[17], chunks[17]);
		assert_eq!(reread[1023], chunks[1023]);
		assert_eq!(reread[42], None);
	}

	#[test]
	fn every_scheme_roundtrips() {
		for scheme in [
			CompressionScheme::GZip,
			CompressionScheme::ZLib,
			CompressionScheme::Uncompressed,
		] {
			let chunks = slots(&[5]);
			let mut buffer = Cursor::new(Vec::new());
			write_region(&mut buffer, &chunks, scheme, Timestamp(0)).unwrap();
			// The scheme byte sits right after the payload length at
			// the start of sector 2.
			assert_eq!(buffer.get_ref()[8192 + 4], scheme.value());
			buffer.set_position(0);
			let reread = read_region(&mut buffer).unwrap();
			assert_eq!(reread[5], chunks[5]);
		}
	}

	#[test]
	fn refused_scheme_fails_without_spoiling_the_rest() {
		let chunks = slots(&[0, 17]);
		let mut buffer = Cursor::new(Vec::new());
		write_region(&mut buffer, &chunks, CompressionScheme::ZLib, Timestamp(0)).unwrap();
		// Rewrite chunk 17's scheme byte to LZ4.
		buffer.set_position(0);
		let header = RegionHeader::read_from(&mut buffer).unwrap();
		let patch_at = header.sectors[17usize].offset() + 4;
		buffer.get_mut()[patch_at as usize] = 4;

		buffer.set_position(0);
		assert!(matches!(
			read_region(&mut buffer),
			Err(McError::UnsupportedCompressionScheme(4))
		));
		// Chunk 0 is untouched and still reads on its own.
		let chunk0 = read_region_chunk(&mut buffer, 0usize).unwrap();
		assert_eq!(chunk0, chunks[0]);
		assert!(matches!(
			read_region_chunk(&mut buffer, 17usize),
			Err(McError::UnsupportedCompressionScheme(4))
		));
	}

	#[test]
	fn zero_length_sector_reads_as_absent() {
		let chunks = slots(&[3]);
		let mut buffer = Cursor::new(Vec::new());
		write_region(&mut buffer, &chunks, CompressionScheme::ZLib, Timestamp(0)).unwrap();
		// Zero out the payload length while leaving the sector table
		// entry in place.
		for offset in 8192..8196 {
			buffer.get_mut()[offset] = 0;
		}
		buffer.set_position(0);
		let reread = read_region(&mut buffer).unwrap();
		assert_eq!(reread[3], None);
	}

	#[test]
	fn region_file_on_disk() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("r.0.0.mca");
		let chunks = slots(&[1, 900]);
		let size = write_region_file(&path, &chunks, CompressionScheme::default()).unwrap();
		assert_eq!(std::fs::metadata(&path).unwrap().len(), size);
		let reread = read_region_file(&path).unwrap();
		assert_eq!(reread[1], chunks[1]);
		assert_eq!(reread[900], chunks[900]);
	}
}
