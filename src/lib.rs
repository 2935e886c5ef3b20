//! An implementation of Minecraft's NBT (Named Binary Tag) data model, covering
//! both the Java and Bedrock editions of the game.
//!
//! The crate provides:
//! - a typed in-memory tag tree ([`NbtTag`], [`NbtList`], [`NbtCompound`]);
//! - a binary codec in both byte orders, including Bedrock's varint network
//!   encoding and its length-prefixed root header ([`io`]);
//! - the textual SNBT form, parsed by [`snbt`] and printed through the tag types'
//!   `Display` implementations;
//! - a file container pairing a root compound with its name and optional
//!   gzip/zlib compression ([`NbtFile`]).

mod file;
mod repr;
mod settings;
mod tag;

pub mod io;
pub mod snbt;

mod raw;


pub use self::file::NbtFile;
pub use self::repr::*;
pub use self::settings::*;
pub use self::tag::*;
