//! The primitive codec: fixed-width integers and floats in either byte order,
//! and length-prefixed strings with a Latin-1 decoding fallback.

use std::str;
use std::borrow::Cow;
use std::io::{Read, Result as IoResult, Write};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt as _, WriteBytesExt as _};
use log::warn;
use varint_rs::{VarintReader as _, VarintWriter as _};

use crate::io::NbtIoError;
use crate::settings::{Endianness, IoOptions, StringEncoding};


type NbtResult<T> = Result<T, NbtIoError>;


#[inline]
pub(crate) fn read_u8<R: Read>(reader: &mut R, _opts: IoOptions) -> IoResult<u8> {
    reader.read_u8()
}

#[inline]
pub(crate) fn read_u16<R: Read>(reader: &mut R, opts: IoOptions) -> IoResult<u16> {
    match opts.endianness {
        Endianness::BigEndian
            => reader.read_u16::<BigEndian>(),
        Endianness::LittleEndian | Endianness::NetworkLittleEndian
            => reader.read_u16::<LittleEndian>(),
    }
}

#[inline]
pub(crate) fn read_i8<R: Read>(reader: &mut R, _opts: IoOptions) -> IoResult<i8> {
    reader.read_i8()
}

#[inline]
pub(crate) fn read_i16<R: Read>(reader: &mut R, opts: IoOptions) -> IoResult<i16> {
    match opts.endianness {
        Endianness::BigEndian
            => reader.read_i16::<BigEndian>(),
        Endianness::LittleEndian | Endianness::NetworkLittleEndian
            => reader.read_i16::<LittleEndian>(),
    }
}

#[inline]
pub(crate) fn read_i32<R: Read>(reader: &mut R, opts: IoOptions) -> IoResult<i32> {
    match opts.endianness {
        Endianness::BigEndian           => reader.read_i32::<BigEndian>(),
        Endianness::LittleEndian        => reader.read_i32::<LittleEndian>(),
        Endianness::NetworkLittleEndian => reader.read_i32_varint(),
    }
}

#[inline]
pub(crate) fn read_i64<R: Read>(reader: &mut R, opts: IoOptions) -> IoResult<i64> {
    match opts.endianness {
        Endianness::BigEndian           => reader.read_i64::<BigEndian>(),
        Endianness::LittleEndian        => reader.read_i64::<LittleEndian>(),
        Endianness::NetworkLittleEndian => reader.read_i64_varint(),
    }
}

#[inline]
pub(crate) fn read_f32<R: Read>(reader: &mut R, opts: IoOptions) -> IoResult<f32> {
    match opts.endianness {
        Endianness::BigEndian
            => reader.read_f32::<BigEndian>(),
        Endianness::LittleEndian | Endianness::NetworkLittleEndian
            => reader.read_f32::<LittleEndian>(),
    }
}

#[inline]
pub(crate) fn read_f64<R: Read>(reader: &mut R, opts: IoOptions) -> IoResult<f64> {
    match opts.endianness {
        Endianness::BigEndian
            => reader.read_f64::<BigEndian>(),
        Endianness::LittleEndian | Endianness::NetworkLittleEndian
            => reader.read_f64::<LittleEndian>(),
    }
}

#[inline]
pub(crate) fn write_u8<W: Write>(writer: &mut W, _opts: IoOptions, value: u8) -> IoResult<()> {
    writer.write_u8(value)
}

#[inline]
pub(crate) fn write_u16<W: Write>(writer: &mut W, opts: IoOptions, value: u16) -> IoResult<()> {
    match opts.endianness {
        Endianness::BigEndian
            => writer.write_u16::<BigEndian>(value),
        Endianness::LittleEndian | Endianness::NetworkLittleEndian
            => writer.write_u16::<LittleEndian>(value),
    }
}

#[inline]
pub(crate) fn write_i8<W: Write>(writer: &mut W, _opts: IoOptions, value: i8) -> IoResult<()> {
    writer.write_i8(value)
}

#[inline]
pub(crate) fn write_i16<W: Write>(writer: &mut W, opts: IoOptions, value: i16) -> IoResult<()> {
    match opts.endianness {
        Endianness::BigEndian
            => writer.write_i16::<BigEndian>(value),
        Endianness::LittleEndian | Endianness::NetworkLittleEndian
            => writer.write_i16::<LittleEndian>(value),
    }
}

#[inline]
pub(crate) fn write_i32<W: Write>(writer: &mut W, opts: IoOptions, value: i32) -> IoResult<()> {
    match opts.endianness {
        Endianness::BigEndian           => writer.write_i32::<BigEndian>(value),
        Endianness::LittleEndian        => writer.write_i32::<LittleEndian>(value),
        Endianness::NetworkLittleEndian => writer.write_i32_varint(value),
    }
}

#[inline]
pub(crate) fn write_i64<W: Write>(writer: &mut W, opts: IoOptions, value: i64) -> IoResult<()> {
    match opts.endianness {
        Endianness::BigEndian           => writer.write_i64::<BigEndian>(value),
        Endianness::LittleEndian        => writer.write_i64::<LittleEndian>(value),
        Endianness::NetworkLittleEndian => writer.write_i64_varint(value),
    }
}

#[inline]
pub(crate) fn write_f32<W: Write>(writer: &mut W, opts: IoOptions, value: f32) -> IoResult<()> {
    match opts.endianness {
        Endianness::BigEndian
            => writer.write_f32::<BigEndian>(value),
        Endianness::LittleEndian | Endianness::NetworkLittleEndian
            => writer.write_f32::<LittleEndian>(value),
    }
}

#[inline]
pub(crate) fn write_f64<W: Write>(writer: &mut W, opts: IoOptions, value: f64) -> IoResult<()> {
    match opts.endianness {
        Endianness::BigEndian
            => writer.write_f64::<BigEndian>(value),
        Endianness::LittleEndian | Endianness::NetworkLittleEndian
            => writer.write_f64::<LittleEndian>(value),
    }
}

/// Reads an `i32` length prefix and converts it to a `usize`.
/// Negative lengths are invalid on the wire.
#[inline]
pub(crate) fn read_i32_as_usize<R: Read>(reader: &mut R, opts: IoOptions) -> NbtResult<usize> {
    usize::try_from(read_i32(reader, opts)?).map_err(|_| NbtIoError::NegativeLength)
}

#[inline]
pub(crate) fn write_usize_as_i32<W: Write>(
    writer: &mut W,
    opts:   IoOptions,
    value:  usize,
) -> NbtResult<()> {
    let value = i32::try_from(value).map_err(|_| NbtIoError::ExcessiveLength)?;
    write_i32(writer, opts, value)?;
    Ok(())
}

/// Decodes raw string bytes using the selected encoding, falling back to Latin-1
/// (which cannot fail) if that encoding rejects the bytes. Legacy worlds written
/// before the game settled on UTF-8 still decode this way.
pub(crate) fn string_from_bytes(bytes: &[u8], opts: IoOptions) -> String {
    let decoded = match opts.string_encoding {
        StringEncoding::Utf8  => str::from_utf8(bytes).ok().map(Cow::Borrowed),
        StringEncoding::Cesu8 => cesu8::from_java_cesu8(bytes).ok(),
    };

    match decoded {
        Some(string) => string.into_owned(),
        None => {
            warn!(
                "{} byte(s) failed to decode as {:?}; falling back to Latin-1",
                bytes.len(),
                opts.string_encoding,
            );
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}

#[inline]
pub(crate) fn bytes_from_string(string: &str, opts: IoOptions) -> Cow<'_, [u8]> {
    match opts.string_encoding {
        StringEncoding::Utf8  => Cow::Borrowed(string.as_bytes()),
        StringEncoding::Cesu8 => cesu8::to_java_cesu8(string),
    }
}

#[inline]
pub(crate) fn read_string_len<R: Read>(reader: &mut R, opts: IoOptions) -> NbtResult<usize> {
    match opts.endianness {
        Endianness::BigEndian | Endianness::LittleEndian
            => Ok(usize::from(read_u16(reader, opts)?)),
        Endianness::NetworkLittleEndian
            => usize::try_from(reader.read_u32_varint()?)
                .map_err(|_| NbtIoError::ExcessiveLength),
    }
}

#[inline]
pub(crate) fn write_string_len<W: Write>(
    writer: &mut W,
    opts:   IoOptions,
    len:    usize,
) -> NbtResult<()> {
    match opts.endianness {
        Endianness::BigEndian | Endianness::LittleEndian => {
            let len = u16::try_from(len).map_err(|_| NbtIoError::ExcessiveLength)?;
            write_u16(writer, opts, len)
        }
        Endianness::NetworkLittleEndian => {
            let len = u32::try_from(len).map_err(|_| NbtIoError::ExcessiveLength)?;
            writer.write_u32_varint(len)
        }
    }
    .map_err(NbtIoError::StdIo)
}

pub(crate) fn read_string<R: Read>(reader: &mut R, opts: IoOptions) -> NbtResult<String> {
    let len = read_string_len(reader, opts)?;
    let mut bytes = vec![0; len];
    reader.read_exact(&mut bytes)?;

    Ok(string_from_bytes(&bytes, opts))
}

pub(crate) fn write_string<W: Write>(
    writer: &mut W,
    opts:   IoOptions,
    string: &str,
) -> NbtResult<()> {
    let bytes = bytes_from_string(string, opts);
    write_string_len(writer, opts, bytes.len())?;
    writer.write_all(&bytes).map_err(NbtIoError::StdIo)
}

pub(crate) fn read_i8_array<R: Read>(
    reader: &mut R,
    _opts:  IoOptions,
    len:    usize,
) -> IoResult<Vec<i8>> {
    let mut bytes = vec![0_u8; len];
    reader.read_exact(&mut bytes)?;
    Ok(bytes.into_iter().map(|b| b as i8).collect())
}

pub(crate) fn read_i32_array<R: Read>(
    reader: &mut R,
    opts:   IoOptions,
    len:    usize,
) -> IoResult<Vec<i32>> {
    if let Endianness::NetworkLittleEndian = opts.endianness {
        // Varints are variable-width; the values can only be read one at a time.
        return (0..len).map(|_| reader.read_i32_varint()).collect();
    }

    let mut values = vec![0_i32; len];
    match opts.endianness {
        Endianness::BigEndian    => reader.read_i32_into::<BigEndian>(&mut values)?,
        Endianness::LittleEndian => reader.read_i32_into::<LittleEndian>(&mut values)?,
        Endianness::NetworkLittleEndian => unreachable!(),
    }
    Ok(values)
}

pub(crate) fn read_i64_array<R: Read>(
    reader: &mut R,
    opts:   IoOptions,
    len:    usize,
) -> IoResult<Vec<i64>> {
    if let Endianness::NetworkLittleEndian = opts.endianness {
        return (0..len).map(|_| reader.read_i64_varint()).collect();
    }

    let mut values = vec![0_i64; len];
    match opts.endianness {
        Endianness::BigEndian    => reader.read_i64_into::<BigEndian>(&mut values)?,
        Endianness::LittleEndian => reader.read_i64_into::<LittleEndian>(&mut values)?,
        Endianness::NetworkLittleEndian => unreachable!(),
    }
    Ok(values)
}
