use flate2::Compression;


// ================================
//      Limits
// ================================

/// The recursive NBT tags (Compounds and Lists) can be nested up to (and including)
/// 512 levels deep in the standard specification. The limit may be raised through
/// this type, but note that this crate uses recursive functions to read and write
/// NBT data; an absurd limit combined with hostile input could overflow the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLimit(pub u32);

impl Default for DepthLimit {
    /// The maximum nesting depth used by Minecraft itself.
    fn default() -> Self {
        Self(512)
    }
}

impl DepthLimit {
    pub fn limit(self) -> u32 {
        self.0
    }
}


// ================================
//      IO Settings
// ================================

/// Encoding options for reading/writing NBT data from/to bytes (e.g. from/to a file).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoOptions {
    /// Byte order of numeric data. Java is big-endian, Bedrock files are little-endian,
    /// and Bedrock's network protocol additionally varint-encodes 32- and 64-bit integers.
    pub endianness: Endianness,
    /// Compression framing applied around the NBT payload.
    pub compression: NbtCompression,
    /// The byte encoding used by strings on the wire. Tags in memory always
    /// use Rust's encoding, UTF-8.
    pub string_encoding: StringEncoding,
    /// The maximum depth that compound and list tags may be recursively nested.
    ///
    /// Default: 512, the limit used by Minecraft.
    pub depth_limit: DepthLimit,
}

impl IoOptions {
    /// Default Java encoding for NBT bytes: big-endian, gzip-compressed,
    /// CESU-8 (Java modified UTF-8) strings.
    #[inline]
    pub fn java() -> Self {
        Self {
            endianness:      Endianness::BigEndian,
            compression:     NbtCompression::GzipCompressed,
            string_encoding: StringEncoding::Cesu8,
            depth_limit:     DepthLimit::default(),
        }
    }

    /// Default Java encoding for NBT bytes, but with no compression.
    #[inline]
    pub fn java_uncompressed() -> Self {
        Self {
            compression: NbtCompression::Uncompressed,
            ..Self::java()
        }
    }

    /// Default Bedrock encoding for NBT bytes: little-endian, gzip-compressed,
    /// UTF-8 strings.
    #[inline]
    pub fn bedrock() -> Self {
        Self {
            endianness:      Endianness::LittleEndian,
            compression:     NbtCompression::GzipCompressed,
            string_encoding: StringEncoding::Utf8,
            depth_limit:     DepthLimit::default(),
        }
    }

    /// Default Bedrock encoding for NBT bytes, but with no compression.
    #[inline]
    pub fn bedrock_uncompressed() -> Self {
        Self {
            compression: NbtCompression::Uncompressed,
            ..Self::bedrock()
        }
    }

    /// Bedrock encoding as used over the network: varint-encoded integers
    /// and no compression.
    #[inline]
    pub fn bedrock_network_uncompressed() -> Self {
        Self {
            endianness: Endianness::NetworkLittleEndian,
            ..Self::bedrock_uncompressed()
        }
    }
}

/// Byte order of NBT data on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    /// Used by Java Edition.
    BigEndian,
    /// Used by Bedrock Edition files.
    LittleEndian,
    /// Used by Bedrock Edition over the network: like `LittleEndian`, except that
    /// `i32` and `i64` values are zigzag varints and string lengths are `u32` varints.
    /// See <https://wiki.bedrock.dev/nbt/nbt-in-depth#network-little-endian>.
    NetworkLittleEndian,
}

/// Compression framing for NBT data: none, zlib, or gzip.
///
/// Note that gzip framing starts with the magic bytes `1F 8B` and can be
/// auto-detected when reading; zlib has no reliable magic and must be selected
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NbtCompression {
    /// Uncompressed NBT data.
    Uncompressed,
    /// Zlib-compressed NBT data. When writing, the default compression level is used.
    ZlibCompressed,
    /// Zlib-compressed NBT data with the given compression level.
    ZlibCompressedWith(CompressionLevel),
    /// Gzip-compressed NBT data. When writing, the default compression level is used.
    GzipCompressed,
    /// Gzip-compressed NBT data with the given compression level.
    GzipCompressedWith(CompressionLevel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u8);

impl From<Compression> for CompressionLevel {
    fn from(value: Compression) -> Self {
        // Only values 0-9 should actually be used, and miniz-oxide uses 10 at most.
        // 0-255 is more than enough.
        Self(value.level() as u8)
    }
}

impl From<CompressionLevel> for Compression {
    fn from(value: CompressionLevel) -> Self {
        Compression::new(u32::from(value.0))
    }
}

/// String encodings used by Minecraft. Java is CESU-8, Bedrock is UTF-8.
///
/// This selects the *write* encoding and the first *read* attempt; reading
/// falls back to Latin-1 when the selected encoding fails to decode, so that
/// legacy pre-UTF-8 world data remains loadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEncoding {
    /// Used by Bedrock.
    Utf8,
    /// Used by Java (the JVM's "modified UTF-8").
    Cesu8,
}
