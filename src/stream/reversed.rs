use crate::stream::clamp_seek;
use crate::stream::error::{StreamError, StreamResult};
use std::io::{self, Read, Seek, SeekFrom};

/// Presents `inner` back to front in units of `sample_width` bytes.
///
/// Bytes inside one sample keep their order. Reads and seeks must be whole
/// samples; anything else fails with `BadReadSize` or `BadAlign`.
#[derive(Debug, Clone)]
pub struct StreamReversed<R> {
    inner: R,
    sample_width: usize,
    size: u64,
    position: u64,
}

impl<R: Read + Seek> StreamReversed<R> {
    pub fn new(mut inner: R, sample_width: usize) -> io::Result<Self> {
        let sample_width = sample_width.max(1);
        let total = inner.seek(SeekFrom::End(0))?;
        let size = total - total % sample_width as u64;
        Ok(Self {
            inner,
            sample_width,
            size,
            position: 0,
        })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    fn read_reversed(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        let width = self.sample_width;
        if buf.len() % width != 0 {
            return Err(StreamError::BadReadSize {
                size: buf.len(),
                sample_width: width,
            });
        }

        let remaining = self.size - self.position;
        let wanted = (buf.len() as u64).min(remaining) as usize;
        if wanted == 0 {
            return Ok(0);
        }

        let source_end = self.size - self.position;
        let source_start = source_end - wanted as u64;
        self.inner.seek(SeekFrom::Start(source_start))?;
        let chunk = &mut buf[..wanted];
        self.inner.read_exact(chunk)?;

        for (front, back) in (0..wanted / width / 2).map(|i| (i, wanted / width - 1 - i)) {
            for byte in 0..width {
                chunk.swap(front * width + byte, back * width + byte);
            }
        }

        self.position += wanted as u64;
        Ok(wanted)
    }
}

impl<R: Read + Seek> Read for StreamReversed<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_reversed(buf).map_err(StreamError::into_io)
    }
}

impl<R: Read + Seek> Seek for StreamReversed<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = clamp_seek(self.position, self.size, pos);
        if target % self.sample_width as u64 != 0 {
            return Err(StreamError::BadAlign {
                offset: target,
                sample_width: self.sample_width,
            }
            .into_io());
        }
        self.position = target;
        Ok(self.position)
    }
}
