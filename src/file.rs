use std::io::{Read, Write};

use flate2::read::{GzDecoder, ZlibDecoder};
use log::debug;

use crate::io::{self, NbtIoError};
use crate::settings::{IoOptions, NbtCompression};
use crate::tag::NbtCompound;


/// The first two bytes of any gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// An NBT file: a root compound paired with its root name.
///
/// Reading sniffs the gzip magic and decompresses transparently, whatever the
/// compression selected in the options says, so both compressed and uncompressed
/// files load with the same call. Zlib framing has no reliable magic and is only
/// applied when selected through [`NbtCompression`].
///
/// The [`to_bytes`](Self::to_bytes) and [`from_bytes`](Self::from_bytes) pair is
/// also the way to persist a tag tree through any byte-oriented transport.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtFile {
    root_name: String,
    root:      NbtCompound,
}

impl NbtFile {
    pub fn new(root_name: impl Into<String>, root: NbtCompound) -> Self {
        Self {
            root_name: root_name.into(),
            root,
        }
    }

    /// The name of the root compound. Usually the empty string.
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn root(&self) -> &NbtCompound {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut NbtCompound {
        &mut self.root
    }

    /// Discards the wrapper and returns the root name and compound.
    pub fn into_parts(self) -> (String, NbtCompound) {
        (self.root_name, self.root)
    }

    /// Reads an NBT file from the given reader. Gzip framing is detected from the
    /// magic bytes and decompressed first; otherwise compression is taken from
    /// `opts`.
    pub fn read<R: Read>(reader: &mut R, opts: IoOptions) -> Result<Self, NbtIoError> {
        Self::read_framed(reader, opts, false).map(|(file, _)| file)
    }

    /// Reads a Bedrock NBT file from the given reader: after the optional gzip
    /// layer, an 8-byte little-endian header precedes the root compound. Returns
    /// the file along with the header's version number.
    pub fn read_bedrock<R: Read>(
        reader: &mut R,
        opts:   IoOptions,
    ) -> Result<(Self, u32), NbtIoError> {
        Self::read_framed(reader, opts, true)
            .map(|(file, version)| (file, version.unwrap_or_default()))
    }

    fn read_framed<R: Read>(
        reader:         &mut R,
        opts:           IoOptions,
        bedrock_header: bool,
    ) -> Result<(Self, Option<u32>), NbtIoError> {
        let mut magic = [0_u8; 2];
        reader.read_exact(&mut magic)?;
        let mut reader = magic.as_slice().chain(reader);

        if magic == GZIP_MAGIC {
            debug!("gzip magic detected; decompressing NBT stream");
            Self::read_decompressed(&mut GzDecoder::new(reader), opts, bedrock_header)
        } else {
            match opts.compression {
                NbtCompression::ZlibCompressed | NbtCompression::ZlibCompressedWith(_) => {
                    Self::read_decompressed(&mut ZlibDecoder::new(reader), opts, bedrock_header)
                }
                _ => Self::read_decompressed(&mut reader, opts, bedrock_header),
            }
        }
    }

    fn read_decompressed<R: Read>(
        reader:         &mut R,
        opts:           IoOptions,
        bedrock_header: bool,
    ) -> Result<(Self, Option<u32>), NbtIoError> {
        // Decompression has already been dealt with here
        let opts = IoOptions {
            compression: NbtCompression::Uncompressed,
            ..opts
        };

        let version = if bedrock_header {
            Some(io::read_bedrock_header(reader)?.0)
        } else {
            None
        };

        let (root, root_name) = io::read_compound(reader, opts)?;
        Ok((Self { root_name, root }, version))
    }

    /// Writes this NBT file to the given writer, with compression per `opts`.
    pub fn write<W: Write>(&self, writer: &mut W, opts: IoOptions) -> Result<(), NbtIoError> {
        io::write_compound(writer, opts, Some(&self.root_name), &self.root)
    }

    /// Writes this NBT file in the Bedrock layout: an 8-byte little-endian header
    /// carrying `version` and the payload length, then the root compound. The
    /// header and payload together pass through the compression selected in `opts`.
    ///
    /// The version is the `level.dat` storage version when writing that file, and
    /// should otherwise be `8`.
    pub fn write_bedrock<W: Write>(
        &self,
        writer:  &mut W,
        opts:    IoOptions,
        version: u32,
    ) -> Result<(), NbtIoError> {
        // The header carries the payload's byte length, so the payload is
        // serialised up front.
        let payload_opts = IoOptions {
            compression: NbtCompression::Uncompressed,
            ..opts
        };
        let mut payload = Vec::new();
        io::write_compound(&mut payload, payload_opts, Some(&self.root_name), &self.root)?;

        match opts.compression {
            NbtCompression::Uncompressed => {
                io::write_bedrock_header(writer, version, payload.len())?;
                writer.write_all(&payload)?;
            }
            NbtCompression::GzipCompressed | NbtCompression::GzipCompressedWith(_) => {
                let mut encoder =
                    flate2::write::GzEncoder::new(writer, compression_level(opts.compression));
                io::write_bedrock_header(&mut encoder, version, payload.len())?;
                encoder.write_all(&payload)?;
                encoder.try_finish()?;
            }
            NbtCompression::ZlibCompressed | NbtCompression::ZlibCompressedWith(_) => {
                let mut encoder =
                    flate2::write::ZlibEncoder::new(writer, compression_level(opts.compression));
                io::write_bedrock_header(&mut encoder, version, payload.len())?;
                encoder.write_all(&payload)?;
                encoder.try_finish()?;
            }
        }

        Ok(())
    }

    /// Serialises this NBT file to a byte vector.
    pub fn to_bytes(&self, opts: IoOptions) -> Result<Vec<u8>, NbtIoError> {
        let mut bytes = Vec::new();
        self.write(&mut bytes, opts)?;
        Ok(bytes)
    }

    /// Reads an NBT file from a byte slice, with the same gzip sniffing as
    /// [`read`](Self::read).
    pub fn from_bytes(mut bytes: &[u8], opts: IoOptions) -> Result<Self, NbtIoError> {
        Self::read(&mut bytes, opts)
    }
}

fn compression_level(compression: NbtCompression) -> flate2::Compression {
    match compression {
        NbtCompression::GzipCompressedWith(level)
        | NbtCompression::ZlibCompressedWith(level) => level.into(),
        _ => flate2::Compression::default(),
    }
}
