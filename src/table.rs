//! Append-only table of rows laid out back to back in pages.
//!
//! Row `i` lives in page `i / ROWS_PER_PAGE` at byte offset
//! `(i % ROWS_PER_PAGE) * ROW_SIZE`. Rows never straddle a page; the last
//! `PAGE_SIZE - ROWS_PER_PAGE * ROW_SIZE` bytes of every page go unused.

use std::path::Path;

use tracing::{error, info, warn};

use crate::error::{DbError, Result};
use crate::pager::Pager;
use crate::row::Row;
use crate::{PAGE_SIZE, ROW_SIZE, ROWS_PER_PAGE, TABLE_MAX_ROWS};

pub struct Table {
    num_rows: usize,
    pager: Pager,
    closed: bool,
}

impl Table {
    /// Opens (or creates) the database file and restores the row count from
    /// its length.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let pager = Pager::open(path)?;
        let num_rows = rows_in_file(pager.file_length());

        info!(path = %path.display(), num_rows, "table opened");

        Ok(Self {
            num_rows,
            pager,
            closed: false,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn is_full(&self) -> bool {
        self.num_rows >= TABLE_MAX_ROWS
    }

    fn row_slot(&mut self, row_num: usize) -> Result<&mut [u8]> {
        let page_num = row_num / ROWS_PER_PAGE;
        let page = self.pager.get_page(page_num)?;
        let byte_offset = (row_num % ROWS_PER_PAGE) * ROW_SIZE;
        Ok(&mut page[byte_offset..byte_offset + ROW_SIZE])
    }

    /// Appends `row` after the last stored row.
    pub fn insert_row(&mut self, row: &Row) -> Result<()> {
        if self.is_full() {
            return Err(DbError::TableFull);
        }

        let slot = self.row_slot(self.num_rows)?;
        row.serialize(slot);
        self.num_rows += 1;
        Ok(())
    }

    /// Decodes the row at `row_num`. Indices past the last stored row are
    /// out of range even when their bytes happen to be resident.
    pub fn read_row(&mut self, row_num: usize) -> Result<Row> {
        if row_num >= self.num_rows {
            return Err(DbError::RowOutOfRange {
                row: row_num,
                num_rows: self.num_rows,
            });
        }
        let slot = self.row_slot(row_num)?;
        Ok(Row::deserialize(slot))
    }

    /// Iterates stored rows in insertion order, fetching pages on demand.
    /// Each call starts over from the first row.
    pub fn rows(&mut self) -> Rows<'_> {
        Rows {
            table: self,
            next: 0,
        }
    }

    /// Flushes every resident page and closes the backing file.
    ///
    /// The first I/O failure aborts the sequence and is returned.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.flush_and_release()?;
        info!(num_rows = self.num_rows, "table closed");
        Ok(())
    }

    fn flush_and_release(&mut self) -> Result<()> {
        let num_full_pages = self.num_rows / ROWS_PER_PAGE;

        for page_num in 0..num_full_pages {
            if !self.pager.is_resident(page_num) {
                continue;
            }
            self.pager.flush(page_num, PAGE_SIZE)?;
            self.pager.release(page_num);
        }

        // Only the rows actually stored in the last page go to disk, so the
        // file length keeps encoding the row count.
        let num_additional_rows = self.num_rows % ROWS_PER_PAGE;
        if num_additional_rows > 0 {
            let page_num = num_full_pages;
            if self.pager.is_resident(page_num) {
                self.pager.flush(page_num, num_additional_rows * ROW_SIZE)?;
                self.pager.release(page_num);
            }
        }

        self.pager.sync()?;
        self.pager.release_all();
        Ok(())
    }
}

impl Drop for Table {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        warn!("table dropped without close, flushing");
        if let Err(e) = self.flush_and_release() {
            error!(error = %e, "failed to flush table on drop");
        }
    }
}

/// Lazy scan over a table's rows. See [`Table::rows`].
pub struct Rows<'a> {
    table: &'a mut Table,
    next: usize,
}

impl Iterator for Rows<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.table.num_rows {
            return None;
        }
        let row = self.table.read_row(self.next);
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.table.num_rows.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

// Full pages hold ROWS_PER_PAGE rows plus an unused tail; a short last page
// holds exactly its rows.
fn rows_in_file(file_length: u64) -> usize {
    let page_size = PAGE_SIZE as u64;
    let full_pages = (file_length / page_size) as usize;
    let tail_rows = ((file_length % page_size) / ROW_SIZE as u64) as usize;
    (full_pages * ROWS_PER_PAGE + tail_rows).min(TABLE_MAX_ROWS)
}
