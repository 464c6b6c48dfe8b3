//! Zlib wrapping of canonical object bytes.

use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

/// Compress `data` into a new buffer.
pub fn compress(data: &[u8], level: u32) -> io::Result<Vec<u8>> {
    compress_to(Vec::new(), level, &[data])
}

/// Compress the concatenation of `parts` into `writer` as one zlib stream.
///
/// Lets callers compress a header and payload without joining them first.
pub fn compress_to<W: Write>(writer: W, level: u32, parts: &[&[u8]]) -> io::Result<W> {
    let mut encoder = ZlibEncoder::new(writer, Compression::new(level));
    for part in parts {
        encoder.write_all(part)?;
    }
    encoder.finish()
}

/// Decompress a complete zlib stream.
///
/// Fails with [`io::ErrorKind::InvalidData`] on a bad header or checksum and
/// with [`io::ErrorKind::UnexpectedEof`] if the stream ends early. Bytes
/// after the end of the stream are ignored.
pub fn decompress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(data.len().saturating_mul(2).max(64));

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
        }
        let (in_before, out_before) = (inflater.total_in(), inflater.total_out());
        let status = inflater
            .decompress_vec(&data[in_before as usize..], &mut out, FlushDecompress::None)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if status == Status::StreamEnd {
            return Ok(out);
        }
        // No progress with room left in `out` means the input ran dry.
        let stalled = inflater.total_in() == in_before && inflater.total_out() == out_before;
        if stalled && out.len() < out.capacity() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "zlib stream ended before its final block",
            ));
        }
    }
}
