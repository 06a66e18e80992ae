use std::io::{Cursor, Read};

use flate2::read::GzDecoder;
use zip::ZipArchive;

use crate::utils::errors::{Result, SolnLibError};

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Gzip payload sniffer and decompressor.
pub struct GzipDecoder;

impl GzipDecoder {
    /// Check whether `data` starts with the gzip signature.
    pub fn check_format(data: &[u8]) -> bool {
        data.starts_with(GZIP_MAGIC)
    }

    /// Inflate a complete gzip stream.
    pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = GzDecoder::new(data);
        let mut output = Vec::new();
        decoder
            .read_to_end(&mut output)
            .map_err(|e| SolnLibError::Decode(format!("gzip decompression failed: {e}")))?;
        Ok(output)
    }
}

/// Zip archive sniffer and decompressor.
pub struct ZipDecoder;

impl ZipDecoder {
    /// Check whether `data` starts with the zip local-file signature.
    pub fn check_format(data: &[u8]) -> bool {
        data.starts_with(ZIP_MAGIC)
    }

    /// Decompress a zip archive, concatenating entries in archive order.
    pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| SolnLibError::Decode(format!("zip archive open failed: {e}")))?;

        let mut output = Vec::new();
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| SolnLibError::Decode(format!("zip entry {index} failed: {e}")))?;
            entry
                .read_to_end(&mut output)
                .map_err(|e| SolnLibError::Decode(format!("zip entry {index} failed: {e}")))?;
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn gzip_bytes(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_gzip_check_format() {
        assert!(GzipDecoder::check_format(&gzip_bytes(b"payload")));
        assert!(!GzipDecoder::check_format(b"payload"));
        assert!(!GzipDecoder::check_format(&[0x1f]));
        assert!(!GzipDecoder::check_format(b""));
    }

    #[test]
    fn test_gzip_decompress() {
        let compressed = gzip_bytes(b"some event data");
        assert_eq!(GzipDecoder::decompress(&compressed).unwrap(), b"some event data");
    }

    #[test]
    fn test_gzip_decompress_corrupt() {
        let mut compressed = gzip_bytes(b"some event data");
        compressed.truncate(6);
        assert!(matches!(
            GzipDecoder::decompress(&compressed),
            Err(SolnLibError::Decode(_))
        ));
    }

    #[test]
    fn test_zip_check_format() {
        assert!(ZipDecoder::check_format(&zip_bytes(&[("a.txt", b"x")])));
        assert!(!ZipDecoder::check_format(b"PK"));
        assert!(!ZipDecoder::check_format(b"plain text"));
    }

    #[test]
    fn test_zip_decompress_concatenates_entries() {
        let archive = zip_bytes(&[("a.txt", b"first,"), ("b.txt", b"second")]);
        assert_eq!(ZipDecoder::decompress(&archive).unwrap(), b"first,second");
    }

    #[test]
    fn test_zip_decompress_corrupt() {
        assert!(matches!(
            ZipDecoder::decompress(b"PK\x03\x04garbage"),
            Err(SolnLibError::Decode(_))
        ));
    }
}
