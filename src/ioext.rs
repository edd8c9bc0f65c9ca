use std::io::{
	self,
	Read, Write,
	Seek, SeekFrom,
};

use crate::McResult;
use crate::nbt::io::{
	NbtRead,
	NbtWrite,
};

/// Types that can be read whole from a byte stream.
pub trait Readable: Sized {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self>;
}

/// Types that can be written whole to a byte stream.
/// Returns the number of bytes written.
pub trait Writable {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize>;
}

/// Types that know where they live in a stream.
pub trait Seekable {
	fn seeker(&self) -> SeekFrom;
}

/// Typed big-endian reads for the primitive wire scalars.
pub trait ReadExt {
	fn read_value<T: NbtRead>(&mut self) -> McResult<T>;
}

impl<R: Read> ReadExt for R {
	fn read_value<T: NbtRead>(&mut self) -> McResult<T> {
		T::nbt_read(self)
	}
}

/// Typed big-endian writes for the primitive wire scalars.
pub trait WriteExt {
	fn write_value<T: NbtWrite>(&mut self, value: T) -> McResult<usize>;
}

impl<W: Write> WriteExt for W {
	fn write_value<T: NbtWrite>(&mut self, value: T) -> McResult<usize> {
		value.nbt_write(self)
	}
}

pub trait SeekExt: Seek {
	/// Capture the current stream position as a [SeekFrom] that can be
	/// used to return here after wandering off to a table or sector.
	fn seek_return(&mut self) -> io::Result<SeekFrom> {
		Ok(SeekFrom::Start(self.stream_position()?))
	}
}

impl<S: Seek> SeekExt for S {}

pub trait WriteZeroes {
	fn write_zeroes(&mut self, count: u64) -> io::Result<u64>;
}

impl<T: Write> WriteZeroes for T {
	fn write_zeroes(&mut self, count: u64) -> io::Result<u64> {
		const ZEROES: &[u8; 4096] = &[0u8; 4096];
		let mut remainder = count;
		while remainder >= ZEROES.len() as u64 {
			self.write_all(ZEROES)?;
			remainder -= ZEROES.len() as u64;
		}
		if remainder != 0 {
			self.write_all(&ZEROES[0..remainder as usize])?;
		}
		Ok(count)
	}
}

/// Copies bytes from a reader into a writer.
pub fn copy_bytes<R: Read, W: Write>(reader: &mut R, writer: &mut W, count: u64) -> io::Result<u64> {
	std::io::copy(&mut reader.take(count), writer)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	#[test]
	fn value_roundtrip() {
		let mut buffer = Cursor::new(Vec::new());
		buffer.write_value(-1i32).unwrap();
		buffer.write_value(0x1234u16).unwrap();
		buffer.write_value(1.5f64).unwrap();
		assert_eq!(&buffer.get_ref()[0..6], &[0xFF, 0xFF, 0xFF, 0xFF, 0x12, 0x34]);
		buffer.set_position(0);
		assert_eq!(buffer.read_value::<i32>().unwrap(), -1);
		assert_eq!(buffer.read_value::<u16>().unwrap(), 0x1234);
		assert_eq!(buffer.read_value::<f64>().unwrap(), 1.5);
	}

	#[test]
	fn zeroes() {
		let mut buffer = Cursor::new(Vec::new());
		buffer.write_zeroes(5000).unwrap();
		assert_eq!(buffer.get_ref().len(), 5000);
		assert!(buffer.get_ref().iter().all(|&b| b == 0));
	}
}
