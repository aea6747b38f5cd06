use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, Cursor, Read, Seek, SeekFrom};

use bytes::Bytes;

/// A readable, seekable stream of resource bytes.
///
/// Local files are streamed from disk via a buffered reader, remote
/// resources are fully buffered in memory before reading begins.
///
/// Dropping the reader releases the underlying resource.
pub enum FetchReader {
    /// A buffered stream over a local file.
    Local(BufReader<File>),
    /// An in-memory stream over an already acquired blob.
    Memory(Cursor<Bytes>),
}

impl FetchReader {
    /// Creates a new [FetchReader] streaming from the given local file.
    pub fn local(file: File) -> Self {
        Self::Local(BufReader::new(file))
    }

    /// Creates a new [FetchReader] over an in-memory blob.
    pub fn memory(bytes: Bytes) -> Self {
        Self::Memory(Cursor::new(bytes))
    }
}

impl Read for FetchReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Local(reader) => reader.read(buf),
            Self::Memory(cursor) => cursor.read(buf),
        }
    }
}

impl BufRead for FetchReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Self::Local(reader) => reader.fill_buf(),
            Self::Memory(cursor) => cursor.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Self::Local(reader) => reader.consume(amt),
            Self::Memory(cursor) => cursor.consume(amt),
        }
    }
}

impl Seek for FetchReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::Local(reader) => reader.seek(pos),
            Self::Memory(cursor) => cursor.seek(pos),
        }
    }
}
