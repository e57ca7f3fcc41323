use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{Error, Result};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

fn truncated(what: &str) -> Error {
    Error::InvalidArchive(format!("truncated {what}"))
}

/// End of Central Directory (EOCD) - 22 bytes minimum
pub struct EndOfCentralDirectory {
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub disk_entries: u16,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(Error::InvalidArchive(
                "bad end of central directory record".to_string(),
            ));
        }

        // skip disk number and disk holding the central directory
        let mut cursor = Cursor::new(&data[8..]);
        let read = |_| truncated("end of central directory record");

        Ok(Self {
            disk_entries: cursor.read_u16::<LittleEndian>().map_err(read)?,
            total_entries: cursor.read_u16::<LittleEndian>().map_err(read)?,
            cd_size: cursor.read_u32::<LittleEndian>().map_err(read)?,
            cd_offset: cursor.read_u32::<LittleEndian>().map_err(read)?,
        })
    }

    pub fn is_zip64(&self) -> bool {
        self.disk_entries == 0xFFFF
            || self.total_entries == 0xFFFF
            || self.cd_size == 0xFFFFFFFF
            || self.cd_offset == 0xFFFFFFFF
    }
}

/// ZIP64 End of Central Directory Locator - 20 bytes
pub struct Zip64EOCDLocator {
    pub eocd64_offset: u64,
}

impl Zip64EOCDLocator {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x07";
    pub const SIZE: usize = 20;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(Error::InvalidArchive("bad ZIP64 locator".to_string()));
        }

        // skip the disk holding the ZIP64 record
        let mut cursor = Cursor::new(&data[8..]);
        Ok(Self {
            eocd64_offset: cursor
                .read_u64::<LittleEndian>()
                .map_err(|_| truncated("ZIP64 locator"))?,
        })
    }
}

/// ZIP64 End of Central Directory - 56 bytes minimum
pub struct Zip64EOCD {
    pub total_entries: u64,
    pub cd_size: u64,
    pub cd_offset: u64,
}

impl Zip64EOCD {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x06";
    pub const MIN_SIZE: usize = 56;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::MIN_SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(Error::InvalidArchive(
                "bad ZIP64 end of central directory record".to_string(),
            ));
        }

        // record size, versions, disk numbers and per-disk entry count
        // precede the fields we need
        let mut cursor = Cursor::new(&data[32..]);
        let read = |_| truncated("ZIP64 end of central directory record");

        Ok(Self {
            total_entries: cursor.read_u64::<LittleEndian>().map_err(read)?,
            cd_size: cursor.read_u64::<LittleEndian>().map_err(read)?,
            cd_offset: cursor.read_u64::<LittleEndian>().map_err(read)?,
        })
    }
}

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// Entry metadata from the central directory.
#[derive(Debug, Clone)]
pub struct ZipFileEntry {
    pub file_name: String,
    pub compression_method: CompressionMethod,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub crc32: u32,
    pub lfh_offset: u64,
    pub is_directory: bool,
}

impl ZipFileEntry {
    /// Last path component of the entry name.
    pub fn base_name(&self) -> &str {
        self.file_name.rsplit('/').next().unwrap_or_default()
    }

    /// Whether this entry is the file called `name`, either by its full
    /// path inside the archive or by its base name.
    pub fn matches(&self, name: &str) -> bool {
        !self.is_directory && (self.file_name == name || self.base_name() == name)
    }
}
