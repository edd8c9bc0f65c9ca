use std::fmt::Debug;
use std::io::{
	Read, Write,
	SeekFrom,
};
use std::ops::{
	Index, IndexMut,
};

use crate::{
	ioext::*,
	McResult,
};

use super::coord::RegionCoord;
use super::sector::RegionSector;
use super::timestamp::Timestamp;

/// Defines the offset in a region file where the table for a given
/// entry type begins. Implemented for [RegionSector] and [Timestamp],
/// the two things a region header holds tables of.
pub trait RegionTableItem {
	/// The offset in the file that this type's table begins.
	const OFFSET: u64;
}

impl RegionTableItem for RegionSector {
	const OFFSET: u64 = 0;
}

impl RegionTableItem for Timestamp {
	const OFFSET: u64 = 4096;
}

/// A table of 1024 elements, one for each potential chunk of a 32x32
/// chunk region file.
#[derive(Debug, Clone)]
pub struct RegionTable<T: RegionTableItem>(Box<[T; 1024]>);

pub type SectorTable = RegionTable<RegionSector>;

pub type TimestampTable = RegionTable<Timestamp>;

/// The 8KiB header at the beginning of every region file: the sector
/// table telling where each chunk lives in the file, followed by the
/// timestamp table telling when each chunk was last written.
#[derive(Debug, Clone, Default)]
pub struct RegionHeader {
	pub sectors: SectorTable,
	pub timestamps: TimestampTable,
}

impl<T: RegionTableItem> RegionTable<T> {
	pub const OFFSET: u64 = T::OFFSET;

	/// Returns a [SeekFrom] value that will seek to the
	/// beginning of the table.
	pub const fn seeker() -> SeekFrom {
		SeekFrom::Start(Self::OFFSET)
	}

	/// Returns an iterator of the elements in the table.
	pub fn iter(&self) -> std::slice::Iter<T> {
		self.0.iter()
	}

	/// Returns a mutable iterator of the elements in the table.
	pub fn iter_mut(&mut self) -> std::slice::IterMut<T> {
		self.0.iter_mut()
	}

	/// Return the inner array for this table.
	pub fn take_array(self) -> [T; 1024] {
		*self.0
	}
}

impl<T: Copy + RegionTableItem> RegionTable<T> {
	/// A table with every entry set to the same value.
	pub fn filled(value: T) -> Self {
		Self(Box::new([value; 1024]))
	}
}

impl<T: RegionTableItem> IntoIterator for RegionTable<T> {
	type Item = T;
	type IntoIter = std::array::IntoIter<T, 1024>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<T: Default + Copy + RegionTableItem> Default for RegionTable<T> {
	fn default() -> Self {
		Self(Box::new([T::default(); 1024]))
	}
}

impl<C: Into<RegionCoord>, T: RegionTableItem> Index<C> for RegionTable<T> {
	type Output = T;

	fn index(&self, index: C) -> &Self::Output {
		let coord: RegionCoord = index.into();
		&self.0[coord.index()]
	}
}

impl<C: Into<RegionCoord>, T: RegionTableItem> IndexMut<C> for RegionTable<T> {
	fn index_mut(&mut self, index: C) -> &mut Self::Output {
		let coord: RegionCoord = index.into();
		&mut self.0[coord.index()]
	}
}

impl<T: Readable + Debug + RegionTableItem> Readable for RegionTable<T> {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
		let table: Box<[T; 1024]> = (0..1024).map(|_| {
			T::read_from(reader)
		}).collect::<McResult<Box<[T]>>>()?
		.try_into().unwrap();
		Ok(Self(table))
	}
}

impl<T: Writable + RegionTableItem> Writable for RegionTable<T> {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		let mut write_size: usize = 0;
		for i in 0..1024 {
			write_size += self.0[i].write_to(writer)?;
		}
		Ok(write_size)
	}
}

impl<T: RegionTableItem> From<[T; 1024]> for RegionTable<T> {
	fn from(value: [T; 1024]) -> Self {
		Self(Box::new(value))
	}
}

impl<T: RegionTableItem> From<RegionTable<T>> for Box<[T; 1024]> {
	fn from(value: RegionTable<T>) -> Self {
		value.0
	}
}

impl Readable for RegionHeader {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
		Ok(Self {
			sectors: SectorTable::read_from(reader)?,
			timestamps: TimestampTable::read_from(reader)?,
		})
	}
}

impl Writable for RegionHeader {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		Ok(
			self.sectors.write_to(writer)? + self.timestamps.write_to(writer)?
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	#[test]
	fn header_roundtrip() {
		let mut header = RegionHeader::default();
		header.sectors[0usize] = RegionSector::new(2, 1);
		header.sectors[1023usize] = RegionSector::new(3, 2);
		header.timestamps[5usize] = Timestamp(12345);
		let mut buffer = Cursor::new(Vec::new());
		assert_eq!(header.write_to(&mut buffer).unwrap(), 8192);
		buffer.set_position(0);
		let reread = RegionHeader::read_from(&mut buffer).unwrap();
		assert_eq!(reread.sectors[0usize], RegionSector::new(2, 1));
		assert_eq!(reread.sectors[1023usize], RegionSector::new(3, 2));
		assert_eq!(reread.timestamps[5usize], Timestamp(12345));
		assert!(reread.sectors[1usize].is_empty());
	}
}
