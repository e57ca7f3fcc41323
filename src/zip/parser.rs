//! Low-level ZIP archive parser.
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the file's end
//! 2. If ZIP64, read the ZIP64 EOCD for large file support
//! 3. Read the Central Directory to get metadata for all files
//! 4. To open an entry, read its Local File Header to find where data starts

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Cursor, Read};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: u64 = 65535;

fn corrupt(what: &'static str) -> impl Fn(io::Error) -> Error {
    move |e| Error::InvalidArchive(format!("{what}: {e}"))
}

/// Reads ZIP structures from any [`ReadAt`] source.
pub struct ZipParser<R: ReadAt> {
    reader: Arc<R>,
    size: u64,
}

impl<R: ReadAt> ZipParser<R> {
    pub fn new(reader: Arc<R>) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// Returns the record and its offset in the archive. Archives with a
    /// trailing comment are handled by scanning backwards for the signature.
    pub fn find_eocd(&self) -> Result<(EndOfCentralDirectory, u64)> {
        if self.size < EndOfCentralDirectory::SIZE as u64 {
            return Err(Error::InvalidArchive(format!(
                "{} bytes is too short for a zip archive",
                self.size
            )));
        }

        // Common case: no comment, EOCD is the last 22 bytes.
        let offset = self.size - EndOfCentralDirectory::SIZE as u64;
        let mut buf = vec![0u8; EndOfCentralDirectory::SIZE];
        self.reader
            .read_exact_at(offset, &mut buf)
            .map_err(corrupt("reading end of central directory"))?;
        if &buf[0..4] == EndOfCentralDirectory::SIGNATURE && &buf[20..22] == b"\x00\x00" {
            return Ok((EndOfCentralDirectory::from_bytes(&buf)?, offset));
        }

        let search_size = (MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE as u64).min(self.size);
        let search_start = self.size - search_size;

        let mut buf = vec![0u8; search_size as usize];
        self.reader
            .read_exact_at(search_start, &mut buf)
            .map_err(corrupt("reading archive tail"))?;

        // The comment length field must account for every byte after the record.
        for i in (0..=buf.len() - EndOfCentralDirectory::SIZE).rev() {
            if &buf[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
                let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;

                if comment_len == buf.len() - i - EndOfCentralDirectory::SIZE {
                    let eocd = EndOfCentralDirectory::from_bytes(
                        &buf[i..i + EndOfCentralDirectory::SIZE],
                    )?;
                    return Ok((eocd, search_start + i as u64));
                }
            }
        }

        Err(Error::InvalidArchive(
            "end of central directory not found".to_string(),
        ))
    }

    /// Read the ZIP64 End of Central Directory record, located through the
    /// locator that sits right before the regular EOCD.
    pub fn read_zip64_eocd(&self, eocd_offset: u64) -> Result<Zip64EOCD> {
        let locator_offset = eocd_offset
            .checked_sub(Zip64EOCDLocator::SIZE as u64)
            .ok_or_else(|| Error::InvalidArchive("missing ZIP64 locator".to_string()))?;
        let mut locator_buf = vec![0u8; Zip64EOCDLocator::SIZE];
        self.reader
            .read_exact_at(locator_offset, &mut locator_buf)
            .map_err(corrupt("reading ZIP64 locator"))?;
        let locator = Zip64EOCDLocator::from_bytes(&locator_buf)?;

        let mut eocd64_buf = vec![0u8; Zip64EOCD::MIN_SIZE];
        self.reader
            .read_exact_at(locator.eocd64_offset, &mut eocd64_buf)
            .map_err(corrupt("reading ZIP64 end of central directory"))?;
        Zip64EOCD::from_bytes(&eocd64_buf)
    }

    /// List every entry of the central directory.
    pub fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        let (eocd, eocd_offset) = self.find_eocd()?;

        let (cd_offset, cd_size, total_entries) = if eocd.is_zip64() {
            let eocd64 = self.read_zip64_eocd(eocd_offset)?;
            (eocd64.cd_offset, eocd64.cd_size, eocd64.total_entries)
        } else {
            (
                eocd.cd_offset as u64,
                eocd.cd_size as u64,
                eocd.total_entries as u64,
            )
        };

        if cd_offset.saturating_add(cd_size) > self.size {
            return Err(Error::InvalidArchive(format!(
                "central directory ({cd_size} bytes at {cd_offset}) lies outside the archive"
            )));
        }

        let mut cd_data = vec![0u8; cd_size as usize];
        self.reader
            .read_exact_at(cd_offset, &mut cd_data)
            .map_err(corrupt("reading central directory"))?;

        // capacity is bounded by the directory size, not the untrusted count
        let mut entries = Vec::with_capacity((total_entries as usize).min(cd_data.len() / 46));
        let mut cursor = Cursor::new(cd_data.as_slice());
        for _ in 0..total_entries {
            entries.push(Self::parse_cdfh(&mut cursor)?);
        }

        Ok(entries)
    }

    /// Parse one Central Directory File Header.
    fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<ZipFileEntry> {
        let bad = corrupt("reading central directory entry");

        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig).map_err(&bad)?;
        if sig != CDFH_SIGNATURE {
            return Err(Error::InvalidArchive(
                "bad central directory file header".to_string(),
            ));
        }

        // version made by, version needed, flags
        cursor.set_position(cursor.position() + 6);
        let compression_method = cursor.read_u16::<LittleEndian>().map_err(&bad)?;
        // modification time and date
        cursor.set_position(cursor.position() + 4);
        let crc32 = cursor.read_u32::<LittleEndian>().map_err(&bad)?;
        let mut compressed_size = cursor.read_u32::<LittleEndian>().map_err(&bad)? as u64;
        let mut uncompressed_size = cursor.read_u32::<LittleEndian>().map_err(&bad)? as u64;
        let file_name_length = cursor.read_u16::<LittleEndian>().map_err(&bad)?;
        let extra_field_length = cursor.read_u16::<LittleEndian>().map_err(&bad)?;
        let file_comment_length = cursor.read_u16::<LittleEndian>().map_err(&bad)?;
        // disk number start, internal and external attributes
        cursor.set_position(cursor.position() + 8);
        let mut lfh_offset = cursor.read_u32::<LittleEndian>().map_err(&bad)? as u64;

        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        cursor.read_exact(&mut file_name_bytes).map_err(&bad)?;
        let file_name = String::from_utf8_lossy(&file_name_bytes).into_owned();
        let is_directory = file_name.ends_with('/');

        // ZIP64 extended information lives in extra field 0x0001; each value
        // is present only when the header field is saturated.
        let extra_field_end = cursor.position() + extra_field_length as u64;
        while cursor.position() + 4 <= extra_field_end {
            let header_id = cursor.read_u16::<LittleEndian>().map_err(&bad)?;
            let field_size = cursor.read_u16::<LittleEndian>().map_err(&bad)?;
            let field_end = cursor.position() + field_size as u64;

            if header_id == 0x0001 {
                if uncompressed_size == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    uncompressed_size = cursor.read_u64::<LittleEndian>().map_err(&bad)?;
                }
                if compressed_size == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    compressed_size = cursor.read_u64::<LittleEndian>().map_err(&bad)?;
                }
                if lfh_offset == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    lfh_offset = cursor.read_u64::<LittleEndian>().map_err(&bad)?;
                }
            }
            cursor.set_position(field_end);
        }

        cursor.set_position(extra_field_end + file_comment_length as u64);

        Ok(ZipFileEntry {
            file_name,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size,
            uncompressed_size,
            crc32,
            lfh_offset,
            is_directory,
        })
    }

    /// Offset of the first data byte of `entry`.
    ///
    /// The Local File Header's name and extra field may differ in length
    /// from the central directory copy, so it has to be read.
    pub fn data_offset(&self, entry: &ZipFileEntry) -> Result<u64> {
        let mut lfh_buf = vec![0u8; LFH_SIZE];
        self.reader
            .read_exact_at(entry.lfh_offset, &mut lfh_buf)
            .map_err(corrupt("reading local file header"))?;

        if &lfh_buf[0..4] != LFH_SIGNATURE {
            return Err(Error::InvalidArchive(format!(
                "bad local file header for {}",
                entry.file_name
            )));
        }

        let file_name_length = u16::from_le_bytes([lfh_buf[26], lfh_buf[27]]) as u64;
        let extra_field_length = u16::from_le_bytes([lfh_buf[28], lfh_buf[29]]) as u64;
        let data_offset =
            entry.lfh_offset + LFH_SIZE as u64 + file_name_length + extra_field_length;

        if data_offset.saturating_add(entry.compressed_size) > self.size {
            return Err(Error::InvalidArchive(format!(
                "data of {} runs past the end of the archive",
                entry.file_name
            )));
        }
        Ok(data_offset)
    }

    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }
}
