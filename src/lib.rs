pub mod nbt;
pub mod world;
pub mod ioext;
pub mod error;
pub mod macros;

pub use flate2;

pub use error::McError;
pub use error::McResult;

pub use nbt::io::{
	read_nbt,
	read_nbt_gzip,
	read_nbt_zlib,
	write_nbt,
	write_nbt_gzip,
	write_nbt_zlib,
};
pub use nbt::pretty::to_pretty_string;
pub use world::io::region::regionfile::{
	read_region_file,
	write_region_file,
};
