//! The binary codec: recursive-descent reading and writing of named tag trees,
//! with optional compression framing and the Bedrock root header.

use std::io;
use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt as _, WriteBytesExt as _};
use flate2::Compression;
use flate2::{
    read::{GzDecoder, ZlibDecoder},
    write::{GzEncoder, ZlibEncoder},
};
use thiserror::Error;

use crate::raw;
use crate::{
    settings::{DepthLimit, IoOptions, NbtCompression},
    tag::{NbtCompound, NbtList, NbtTag, TagId},
};


/// Reads a named root compound in the given encoding from the given reader,
/// returning the compound and its root name.
pub fn read_compound<R: Read>(
    reader: &mut R,
    opts:   IoOptions,
) -> Result<(NbtCompound, String), NbtIoError> {
    match opts.compression {
        NbtCompression::Uncompressed => read_compound_uncompressed(reader, opts),
        NbtCompression::ZlibCompressed | NbtCompression::ZlibCompressedWith(_) => {
            read_compound_uncompressed(&mut ZlibDecoder::new(reader), opts)
        }
        NbtCompression::GzipCompressed | NbtCompression::GzipCompressedWith(_) => {
            read_compound_uncompressed(&mut GzDecoder::new(reader), opts)
        }
    }
}

fn read_compound_uncompressed<R: Read>(
    reader: &mut R,
    opts:   IoOptions,
) -> Result<(NbtCompound, String), NbtIoError> {
    let root_id = raw::read_u8(reader, opts)?;
    if root_id != TagId::Compound.to_u8() {
        return Err(NbtIoError::TagTypeMismatch {
            expected: TagId::Compound.to_u8(),
            found:    root_id,
        });
    }

    let root_name = raw::read_string(reader, opts)?;
    match read_tag_body(reader, opts, TagId::Compound, 0)? {
        NbtTag::Compound(compound) => Ok((compound, root_name)),
        _ => unreachable!("read_tag_body returned a non-compound for a compound id"),
    }
}

fn read_tag_body<R: Read>(
    reader:        &mut R,
    opts:          IoOptions,
    id:            TagId,
    current_depth: u32,
) -> Result<NbtTag, NbtIoError> {
    let tag = match id {
        TagId::End => return Err(NbtIoError::InvalidTagId(TagId::End.to_u8())),

        TagId::Byte   => NbtTag::Byte(raw::read_i8(reader, opts)?),
        TagId::Short  => NbtTag::Short(raw::read_i16(reader, opts)?),
        TagId::Int    => NbtTag::Int(raw::read_i32(reader, opts)?),
        TagId::Long   => NbtTag::Long(raw::read_i64(reader, opts)?),
        TagId::Float  => NbtTag::Float(raw::read_f32(reader, opts)?),
        TagId::Double => NbtTag::Double(raw::read_f64(reader, opts)?),

        TagId::ByteArray => {
            let len = raw::read_i32_as_usize(reader, opts)?;
            NbtTag::ByteArray(raw::read_i8_array(reader, opts, len)?)
        }

        TagId::String => NbtTag::String(raw::read_string(reader, opts)?),

        TagId::List => {
            let element_byte = raw::read_u8(reader, opts)?;
            let element_id =
                TagId::from_u8(element_byte).ok_or(NbtIoError::InvalidTagId(element_byte))?;
            let len = raw::read_i32_as_usize(reader, opts)?;

            // A nonempty list cannot hold End payloads.
            if element_id == TagId::End && len > 0 {
                return Err(NbtIoError::InvalidTagId(element_byte));
            }

            // The element id of an empty list is meaningless on the wire;
            // in memory, empty lists always carry End.
            if len == 0 {
                return Ok(NbtTag::List(NbtList::new()));
            }

            if current_depth >= opts.depth_limit.0 {
                return Err(NbtIoError::ExceededDepthLimit {
                    limit: opts.depth_limit,
                });
            }

            let mut tags = Vec::with_capacity(len.min(1 << 16));
            for _ in 0..len {
                tags.push(read_tag_body(reader, opts, element_id, current_depth + 1)?);
            }

            NbtTag::List(NbtList::from_parts(element_id, tags))
        }

        TagId::Compound => {
            let mut compound = NbtCompound::new();
            let mut id_byte = raw::read_u8(reader, opts)?;

            if id_byte != TagId::End.to_u8() && current_depth >= opts.depth_limit.0 {
                return Err(NbtIoError::ExceededDepthLimit {
                    limit: opts.depth_limit,
                });
            }

            // Read named tags until the End marker. Duplicate keys are not valid
            // NBT, but the reader is lenient and lets the last occurrence win.
            while id_byte != TagId::End.to_u8() {
                let id = TagId::from_u8(id_byte).ok_or(NbtIoError::InvalidTagId(id_byte))?;
                let name = raw::read_string(reader, opts)?;
                let tag = read_tag_body(reader, opts, id, current_depth + 1)?;
                compound.insert(name, tag);
                id_byte = raw::read_u8(reader, opts)?;
            }

            NbtTag::Compound(compound)
        }

        TagId::IntArray => {
            let len = raw::read_i32_as_usize(reader, opts)?;
            NbtTag::IntArray(raw::read_i32_array(reader, opts, len)?)
        }

        TagId::LongArray => {
            let len = raw::read_i32_as_usize(reader, opts)?;
            NbtTag::LongArray(raw::read_i64_array(reader, opts, len)?)
        }
    };

    Ok(tag)
}

/// Writes the given compound as a named root tag to the given writer using the
/// indicated encoding. If no root name is provided, the empty string is used.
pub fn write_compound<W: Write>(
    writer:    &mut W,
    opts:      IoOptions,
    root_name: Option<&str>,
    root:      &NbtCompound,
) -> Result<(), NbtIoError> {
    let compression = match opts.compression {
        NbtCompression::Uncompressed => {
            return write_compound_uncompressed(writer, opts, root_name, root);
        }
        NbtCompression::ZlibCompressedWith(level)
        | NbtCompression::GzipCompressedWith(level) => level.into(),
        _ => Compression::default(),
    };

    match opts.compression {
        NbtCompression::GzipCompressed | NbtCompression::GzipCompressedWith(_) => {
            let mut encoder = GzEncoder::new(writer, compression);
            write_compound_uncompressed(&mut encoder, opts, root_name, root)?;
            encoder.try_finish()?;
        }
        _ => {
            let mut encoder = ZlibEncoder::new(writer, compression);
            write_compound_uncompressed(&mut encoder, opts, root_name, root)?;
            encoder.try_finish()?;
        }
    }

    Ok(())
}

fn write_compound_uncompressed<W: Write>(
    writer:    &mut W,
    opts:      IoOptions,
    root_name: Option<&str>,
    root:      &NbtCompound,
) -> Result<(), NbtIoError> {
    raw::write_u8(writer, opts, TagId::Compound.to_u8())?;
    raw::write_string(writer, opts, root_name.unwrap_or(""))?;

    if opts.depth_limit.0 == 0 && !root.is_empty() {
        return Err(NbtIoError::ExceededDepthLimit {
            limit: opts.depth_limit,
        });
    }

    for (name, tag) in root.inner() {
        raw::write_u8(writer, opts, tag.id().to_u8())?;
        raw::write_string(writer, opts, name)?;
        write_tag_body(writer, opts, tag, 1)?;
    }

    // TAG_End
    raw::write_u8(writer, opts, TagId::End.to_u8())?;
    Ok(())
}

fn write_tag_body<W: Write>(
    writer:        &mut W,
    opts:          IoOptions,
    tag:           &NbtTag,
    current_depth: u32,
) -> Result<(), NbtIoError> {
    match tag {
        &NbtTag::Byte(value)   => raw::write_i8(writer, opts, value)?,
        &NbtTag::Short(value)  => raw::write_i16(writer, opts, value)?,
        &NbtTag::Int(value)    => raw::write_i32(writer, opts, value)?,
        &NbtTag::Long(value)   => raw::write_i64(writer, opts, value)?,
        &NbtTag::Float(value)  => raw::write_f32(writer, opts, value)?,
        &NbtTag::Double(value) => raw::write_f64(writer, opts, value)?,
        NbtTag::ByteArray(value) => {
            raw::write_usize_as_i32(writer, opts, value.len())?;
            let bytes: Vec<u8> = value.iter().map(|&b| b as u8).collect();
            writer.write_all(&bytes)?;
        }
        NbtTag::String(value) => raw::write_string(writer, opts, value)?,
        NbtTag::List(value) => {
            raw::write_u8(writer, opts, value.element_id().to_u8())?;
            raw::write_usize_as_i32(writer, opts, value.len())?;

            if current_depth >= opts.depth_limit.0 && !value.is_empty() {
                return Err(NbtIoError::ExceededDepthLimit {
                    limit: opts.depth_limit,
                });
            }

            for sub_tag in value.iter() {
                // The list's element id is authoritative; a variant smuggled in
                // through a mutable element reference is caught here.
                if sub_tag.id() != value.element_id() {
                    return Err(NbtIoError::NonHomogeneousList {
                        list_id:          value.element_id(),
                        encountered_id:   sub_tag.id(),
                    });
                }

                write_tag_body(writer, opts, sub_tag, current_depth + 1)?;
            }
        }
        NbtTag::Compound(value) => {
            if current_depth >= opts.depth_limit.0 && !value.is_empty() {
                return Err(NbtIoError::ExceededDepthLimit {
                    limit: opts.depth_limit,
                });
            }

            for (name, tag) in value.inner() {
                raw::write_u8(writer, opts, tag.id().to_u8())?;
                raw::write_string(writer, opts, name)?;
                write_tag_body(writer, opts, tag, current_depth + 1)?;
            }

            // TAG_End
            raw::write_u8(writer, opts, TagId::End.to_u8())?;
        }
        NbtTag::IntArray(value) => {
            raw::write_usize_as_i32(writer, opts, value.len())?;

            for &int in value {
                raw::write_i32(writer, opts, int)?;
            }
        }
        NbtTag::LongArray(value) => {
            raw::write_usize_as_i32(writer, opts, value.len())?;

            for &long in value {
                raw::write_i64(writer, opts, long)?;
            }
        }
    }

    Ok(())
}

/// Reads the Bedrock Edition root header: a version number and the byte length of
/// the NBT payload that follows, both unsigned 32-bit and always little-endian,
/// regardless of the endianness selected for the payload itself.
///
/// The version is the `level.dat` storage version when reading that file, and is
/// otherwise `8`.
pub fn read_bedrock_header<R: Read>(reader: &mut R) -> Result<(u32, usize), NbtIoError> {
    let version = reader.read_u32::<LittleEndian>()?;
    let payload_len = reader.read_u32::<LittleEndian>()?;
    Ok((version, payload_len as usize))
}

/// Writes the Bedrock Edition root header. See [`read_bedrock_header`].
pub fn write_bedrock_header<W: Write>(
    writer:      &mut W,
    version:     u32,
    payload_len: usize,
) -> Result<(), NbtIoError> {
    let payload_len = u32::try_from(payload_len).map_err(|_| NbtIoError::ExcessiveLength)?;
    writer.write_u32::<LittleEndian>(version)?;
    writer.write_u32::<LittleEndian>(payload_len)?;
    Ok(())
}

/// Describes an error which occurred during the reading or writing of NBT byte data.
#[derive(Error, Debug)]
pub enum NbtIoError {
    /// A native I/O error. A truncated stream surfaces here as
    /// [`UnexpectedEof`](io::ErrorKind::UnexpectedEof).
    #[error(transparent)]
    StdIo(#[from] io::Error),
    /// The limit on recursive nesting depth of NBT lists and compounds was exceeded.
    #[error("Exceeded depth limit {} for nested tag lists and compound tags", limit.0)]
    ExceededDepthLimit {
        /// The limit which was exceeded.
        limit: DepthLimit,
    },
    /// A list was found to hold an element of a variant other than its element id.
    /// All sequential structures in NBT data are homogeneous.
    #[error("Encountered non-homogeneous list: expected {list_id} but found {encountered_id}")]
    NonHomogeneousList {
        /// The list's element id.
        list_id:        TagId,
        /// The encountered element's id.
        encountered_id: TagId,
    },
    /// The length prefix of a string or sequential type was too large to fit in the
    /// numeric type it is encoded as.
    #[error(
        "Length of a string or sequential type must fit in a u16, i32, or u32, \
         depending on situation",
    )]
    ExcessiveLength,
    /// A negative length prefix was encountered.
    #[error("Length of a sequential type must be nonnegative")]
    NegativeLength,
    /// An invalid tag ID was encountered.
    #[error("Encountered invalid tag ID 0x{0:X} during deserialization")]
    InvalidTagId(u8),
    /// The first tag ID was expected, but the second was found.
    #[error("Tag type mismatch: expected 0x{expected:X} but found 0x{found:X}")]
    TagTypeMismatch {
        /// The expected ID.
        expected: u8,
        /// The found ID.
        found:    u8,
    },
}
