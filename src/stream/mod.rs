use log::trace;
use std::cell::RefCell;
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::rc::Rc;

pub mod error;
pub mod reversed;
pub mod sector;

pub use reversed::StreamReversed;
pub use sector::{SectorGeometry, SectorIndirectionStream, SectorMap};

pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// Clamps a seek request against a stream of `size` bytes.
pub(crate) fn clamp_seek(position: u64, size: u64, pos: SeekFrom) -> u64 {
    let target = match pos {
        SeekFrom::Start(offset) => offset as i128,
        SeekFrom::Current(delta) => position as i128 + delta as i128,
        SeekFrom::End(delta) => size as i128 + delta as i128,
    };
    target.clamp(0, size as i128) as u64
}

/// A read-only byte source shared by every stream derived from it.
///
/// Each access seeks before reading, so siblings never depend on where another
/// view left the cursor.
#[derive(Clone)]
pub struct SharedStream {
    inner: Rc<RefCell<Box<dyn ReadSeek>>>,
}

impl SharedStream {
    pub fn new(stream: impl ReadSeek + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Box::new(stream))),
        }
    }

    /// Reads as many bytes as are available at `position`, up to `buf.len()`.
    pub fn read_at(&self, position: u64, buf: &mut [u8]) -> io::Result<usize> {
        let mut inner = self.inner.try_borrow_mut().map_err(|_| {
            io::Error::new(io::ErrorKind::WouldBlock, "shared stream is already borrowed")
        })?;
        inner.seek(SeekFrom::Start(position))?;

        let mut total = 0;
        while total < buf.len() {
            match inner.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        trace!("read {} bytes at {:#x}", total, position);
        Ok(total)
    }

    pub fn read_exact_at(&self, position: u64, buf: &mut [u8]) -> io::Result<()> {
        let read = self.read_at(position, buf)?;
        if read < buf.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("wanted {} bytes at {:#x}, read {}", buf.len(), position, read),
            ));
        }
        Ok(())
    }

    pub fn len(&self) -> io::Result<u64> {
        let mut inner = self.inner.try_borrow_mut().map_err(|_| {
            io::Error::new(io::ErrorKind::WouldBlock, "shared stream is already borrowed")
        })?;
        inner.seek(SeekFrom::End(0))
    }

    /// A cursor over the whole source, independent of other views.
    pub fn view(&self) -> io::Result<ByteWindowStream> {
        let size = self.len()?;
        Ok(ByteWindowStream::new(self.clone(), 0, size))
    }
}

impl fmt::Debug for SharedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedStream")
            .field("handles", &Rc::strong_count(&self.inner))
            .finish()
    }
}

/// A seekable window of `size` bytes starting at `offset` within a parent stream.
#[derive(Debug, Clone)]
pub struct ByteWindowStream {
    parent: SharedStream,
    offset: u64,
    size: u64,
    position: u64,
}

impl ByteWindowStream {
    pub fn new(parent: SharedStream, offset: u64, size: u64) -> Self {
        Self {
            parent,
            offset,
            size,
            position: 0,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Changes the logical length, pulling the cursor back if it now lies past the end.
    pub fn resize(&mut self, size: u64) {
        self.size = size;
        self.position = self.position.min(size);
    }

    /// A narrower window relative to this one, sharing the same parent.
    pub fn window(&self, offset: u64, size: u64) -> ByteWindowStream {
        let offset = offset.min(self.size);
        let size = size.min(self.size - offset);
        ByteWindowStream::new(self.parent.clone(), self.offset + offset, size)
    }
}

impl Read for ByteWindowStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.size.saturating_sub(self.position);
        let wanted = (buf.len() as u64).min(remaining) as usize;
        if wanted == 0 {
            return Ok(0);
        }

        let read = self
            .parent
            .read_at(self.offset + self.position, &mut buf[..wanted])?;
        self.position += read as u64;
        Ok(read)
    }
}

impl Seek for ByteWindowStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.position = clamp_seek(self.position, self.size, pos);
        Ok(self.position)
    }
}
