//! Page cache over the backing file.
//!
//! Pages are loaded lazily the first time they are asked for and stay
//! resident until the table releases them at shutdown. There is no eviction:
//! the slot array is bounded by `TABLE_MAX_PAGES`.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{DbError, Result};
use crate::{PAGE_SIZE, TABLE_MAX_PAGES};

pub type Page = [u8; PAGE_SIZE];

pub struct Pager {
    file: File,
    /// Length of the file when it was opened. Only pages inside this range
    /// have anything on disk to hydrate from.
    file_length: u64,
    pages: [Option<Box<Page>>; TABLE_MAX_PAGES],
}

impl Pager {
    /// Opens `path` for reading and writing, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        let file_length = file.seek(SeekFrom::End(0))?;

        debug!(path = %path.display(), file_length, "pager opened");

        Ok(Self {
            file,
            file_length,
            pages: [const { None }; TABLE_MAX_PAGES],
        })
    }

    pub fn file_length(&self) -> u64 {
        self.file_length
    }

    /// Number of pages the file held at open time, counting a short last page.
    pub fn num_pages_on_disk(&self) -> usize {
        self.file_length.div_ceil(PAGE_SIZE as u64) as usize
    }

    pub fn is_resident(&self, page_num: usize) -> bool {
        self.pages.get(page_num).is_some_and(Option::is_some)
    }

    /// Returns the resident buffer for `page_num`, loading it on a miss.
    pub fn get_page(&mut self, page_num: usize) -> Result<&mut Page> {
        if page_num >= TABLE_MAX_PAGES {
            return Err(DbError::OutOfRange {
                page: page_num,
                max: TABLE_MAX_PAGES,
            });
        }

        let page = match self.pages[page_num].take() {
            Some(page) => page,
            None => self.load(page_num)?,
        };
        Ok(&mut **self.pages[page_num].insert(page))
    }

    // Cache miss: a zeroed buffer, filled from disk when the file has it.
    fn load(&mut self, page_num: usize) -> Result<Box<Page>> {
        let mut page = Box::new([0u8; PAGE_SIZE]);

        if page_num < self.num_pages_on_disk() {
            self.file
                .seek(SeekFrom::Start((page_num * PAGE_SIZE) as u64))?;
            let read = read_up_to(&mut self.file, &mut page[..])?;
            debug!(page_num, bytes = read, "page hydrated from disk");
        } else {
            debug!(page_num, "page allocated");
        }

        Ok(page)
    }

    /// Writes the first `size` bytes of a resident page back to its slot in
    /// the file. Pages that were never loaded are skipped.
    pub fn flush(&mut self, page_num: usize, size: usize) -> Result<()> {
        let Some(page) = self.pages.get(page_num).and_then(Option::as_deref) else {
            return Ok(());
        };
        let size = size.min(PAGE_SIZE);

        self.file
            .seek(SeekFrom::Start((page_num * PAGE_SIZE) as u64))?;
        self.file.write_all(&page[..size])?;

        debug!(page_num, bytes = size, "page flushed");
        Ok(())
    }

    /// Drops the in-memory copy of a page without writing it.
    pub fn release(&mut self, page_num: usize) {
        if let Some(slot) = self.pages.get_mut(page_num) {
            *slot = None;
        }
    }

    pub fn release_all(&mut self) {
        self.pages.iter_mut().for_each(|slot| *slot = None);
    }

    /// Pushes written data to the device. `File` closes silently on drop, so
    /// this is where a failing close gets reported.
    pub fn sync(&mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }
}

// Reads until `buf` is full or the file ends.
fn read_up_to(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
