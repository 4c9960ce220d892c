//! Legacy per-file environment interface.
//!
//! Each open file is one object whose methods take only the arguments of that
//! call; there is no per-call I/O context. Code written against these traits
//! runs unchanged on top of any [`FileSystem`](strata_io::FileSystem) through
//! [`CompositeEnv`](crate::CompositeEnv).
//!
//! Results are return values rather than out-parameters: reads
//! return how many bytes were placed at the front of the caller's scratch
//! buffer, and opens return the handle, so a failed open never yields one.

use std::path::{Path, PathBuf};

use strata_io::{
    DataVerificationInfo, EnvOptions, FsAccessPattern, IoResult, PreallocationStatus,
    WriteLifeTimeHint,
};

/// Access pattern advice for a [`RandomAccessFile`].
///
/// Shares its ordinal space with [`FsAccessPattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessPattern {
    Normal,
    Random,
    Sequential,
    WillNeed,
    WontNeed,
}

impl From<AccessPattern> for FsAccessPattern {
    fn from(pattern: AccessPattern) -> Self {
        match pattern {
            AccessPattern::Normal => Self::Normal,
            AccessPattern::Random => Self::Random,
            AccessPattern::Sequential => Self::Sequential,
            AccessPattern::WillNeed => Self::WillNeed,
            AccessPattern::WontNeed => Self::WontNeed,
        }
    }
}

/// One entry of a [`RandomAccessFile::multi_read`] batch.
///
/// `status` is set per entry and is independent of the status returned by
/// the batched call; callers must check both.
#[derive(Debug)]
pub struct ReadRequest<'a> {
    pub offset: u64,
    pub len: usize,
    pub scratch: &'a mut [u8],
    pub result_len: usize,
    pub status: IoResult<()>,
}

impl<'a> ReadRequest<'a> {
    pub fn new(offset: u64, len: usize, scratch: &'a mut [u8]) -> Self {
        Self {
            offset,
            len,
            scratch,
            result_len: 0,
            status: Ok(()),
        }
    }

    /// Returns the bytes produced for this entry.
    pub fn result(&self) -> &[u8] {
        &self.scratch[..self.result_len]
    }
}

/// A file read from start to end.
pub trait SequentialFile: Send {
    /// Reads up to `n` bytes into the front of `scratch`; returns the count.
    ///
    /// A short count is not an error; 0 means end of file.
    fn read(&mut self, n: usize, scratch: &mut [u8]) -> IoResult<usize>;

    /// Moves the read position forward by `n` bytes.
    fn skip(&mut self, n: u64) -> IoResult<()>;

    /// Reads at `offset` without moving the read position.
    ///
    /// Backends usually support this only for direct I/O files.
    fn positioned_read(&mut self, offset: u64, n: usize, scratch: &mut [u8]) -> IoResult<usize>;

    fn use_direct_io(&self) -> bool;

    /// Alignment required of scratch buffers and offsets when direct I/O is on.
    fn required_buffer_alignment(&self) -> usize;

    fn invalidate_cache(&mut self, offset: usize, length: usize) -> IoResult<()>;
}

/// A file read at arbitrary offsets.
///
/// Plain reads take `&self` and may run from several threads at once.
pub trait RandomAccessFile: Send + Sync {
    /// Reads up to `n` bytes at `offset` into the front of `scratch`.
    fn read(&self, offset: u64, n: usize, scratch: &mut [u8]) -> IoResult<usize>;

    /// Services a batch of reads in one call.
    ///
    /// Fills `result_len` and `status` of every entry. The returned status
    /// covers the batch; an `Ok` batch may still hold failed entries.
    fn multi_read(&mut self, reqs: &mut [ReadRequest<'_>]) -> IoResult<()>;

    /// Hints that `n` bytes at `offset` will be read soon.
    fn prefetch(&mut self, offset: u64, n: usize) -> IoResult<()>;

    /// Writes a stable identifier into `id`; returns its length or 0.
    fn unique_id(&self, id: &mut [u8]) -> usize;

    fn hint(&mut self, pattern: AccessPattern);

    fn use_direct_io(&self) -> bool;

    fn required_buffer_alignment(&self) -> usize;

    /// Drops cached pages for the given range.
    fn invalidate_cache(&mut self, offset: usize, length: usize) -> IoResult<()>;
}

/// A file written sequentially: logs, manifests, table files.
pub trait WritableFile: Send {
    /// Appends `data` at the current end of the file.
    fn append(&mut self, data: &[u8]) -> IoResult<()>;

    /// Appends `data` along with integrity metadata the backend may check.
    fn append_with_verification(
        &mut self,
        data: &[u8],
        verification_info: &DataVerificationInfo,
    ) -> IoResult<()>;

    /// Writes `data` at `offset`. The file size becomes `offset + data.len()`.
    fn positioned_append(&mut self, data: &[u8], offset: u64) -> IoResult<()>;

    fn positioned_append_with_verification(
        &mut self,
        data: &[u8],
        offset: u64,
        verification_info: &DataVerificationInfo,
    ) -> IoResult<()>;

    /// Cuts the file down to `size` bytes.
    fn truncate(&mut self, size: u64) -> IoResult<()>;

    /// Flushes and closes the file. The handle stays allocated until dropped.
    fn close(&mut self) -> IoResult<()>;

    fn flush(&mut self) -> IoResult<()>;

    /// Makes written data durable.
    fn sync(&mut self) -> IoResult<()>;

    /// Makes written data and file metadata durable.
    fn fsync(&mut self) -> IoResult<()>;

    /// Whether `sync` may run concurrently with `append`.
    fn is_sync_thread_safe(&self) -> bool;

    fn use_direct_io(&self) -> bool;

    fn required_buffer_alignment(&self) -> usize;

    fn set_write_life_time_hint(&mut self, hint: WriteLifeTimeHint);

    fn write_life_time_hint(&mut self) -> WriteLifeTimeHint;

    /// Number of bytes written so far, as the backend tracks it.
    fn file_size(&mut self) -> u64;

    /// Sets the unit in which [`prepare_write`](Self::prepare_write)
    /// reserves space. 0 disables preallocation.
    fn set_preallocation_block_size(&mut self, size: usize);

    fn preallocation_status(&mut self) -> PreallocationStatus;

    fn unique_id(&self, id: &mut [u8]) -> usize;

    fn invalidate_cache(&mut self, offset: usize, length: usize) -> IoResult<()>;

    /// Starts writeback of `nbytes` at `offset`. Advisory.
    fn range_sync(&mut self, offset: u64, nbytes: u64) -> IoResult<()>;

    /// Announces a write of `len` bytes at `offset`. Advisory; never fails.
    fn prepare_write(&mut self, offset: usize, len: usize);

    /// Reserves `len` bytes of disk space starting at `offset`.
    fn allocate(&mut self, offset: u64, len: u64) -> IoResult<()>;
}

/// A file read and written in place at arbitrary offsets.
pub trait RandomRwFile: Send {
    fn use_direct_io(&self) -> bool;

    fn required_buffer_alignment(&self) -> usize;

    /// Writes all of `data` at `offset`.
    fn write(&mut self, offset: u64, data: &[u8]) -> IoResult<()>;

    /// Reads up to `n` bytes at `offset` into the front of `scratch`.
    fn read(&self, offset: u64, n: usize, scratch: &mut [u8]) -> IoResult<usize>;

    fn flush(&mut self) -> IoResult<()>;

    fn sync(&mut self) -> IoResult<()>;

    fn fsync(&mut self) -> IoResult<()>;

    fn close(&mut self) -> IoResult<()>;
}

/// An open directory, used to make renames and new entries durable.
pub trait Directory: Send {
    /// Syncs the directory's entries.
    fn fsync(&mut self) -> IoResult<()>;

    fn unique_id(&self, id: &mut [u8]) -> usize;
}

/// File-opening and namespace operations of the legacy environment.
pub trait Env: Send + Sync {
    /// Opens `fname` for sequential reading.
    fn new_sequential_file(
        &self,
        fname: &Path,
        options: &EnvOptions,
    ) -> IoResult<Box<dyn SequentialFile>>;

    fn new_random_access_file(
        &self,
        fname: &Path,
        options: &EnvOptions,
    ) -> IoResult<Box<dyn RandomAccessFile>>;

    /// Creates `fname`, truncating any existing file.
    fn new_writable_file(
        &self,
        fname: &Path,
        options: &EnvOptions,
    ) -> IoResult<Box<dyn WritableFile>>;

    /// Opens `fname` for writing after its existing bytes, creating it if
    /// missing.
    fn reopen_writable_file(
        &self,
        fname: &Path,
        options: &EnvOptions,
    ) -> IoResult<Box<dyn WritableFile>>;

    /// Renames `old_fname` to `fname` and continues writing into it.
    fn reuse_writable_file(
        &self,
        fname: &Path,
        old_fname: &Path,
        options: &EnvOptions,
    ) -> IoResult<Box<dyn WritableFile>>;

    fn new_random_rw_file(
        &self,
        fname: &Path,
        options: &EnvOptions,
    ) -> IoResult<Box<dyn RandomRwFile>>;

    /// Opens a directory so its entries can be synced.
    fn new_directory(&self, name: &Path) -> IoResult<Box<dyn Directory>>;

    /// Returns `Ok(())` if `fname` exists and `NotFound` otherwise.
    fn file_exists(&self, fname: &Path) -> IoResult<()>;

    /// Lists the entry names in `dir`, without the directory prefix.
    fn get_children(&self, dir: &Path) -> IoResult<Vec<String>>;

    fn delete_file(&self, fname: &Path) -> IoResult<()>;

    fn create_dir(&self, dirname: &Path) -> IoResult<()>;

    /// Creates `dirname`; succeeds if it already exists as a directory.
    fn create_dir_if_missing(&self, dirname: &Path) -> IoResult<()>;

    fn delete_dir(&self, dirname: &Path) -> IoResult<()>;

    fn get_file_size(&self, fname: &Path) -> IoResult<u64>;

    fn rename_file(&self, src: &Path, target: &Path) -> IoResult<()>;

    /// Creates a hard link `target` pointing at `src`.
    fn link_file(&self, src: &Path, target: &Path) -> IoResult<()>;

    fn is_directory(&self, path: &Path) -> IoResult<bool>;

    fn get_absolute_path(&self, db_path: &Path) -> IoResult<PathBuf>;
}
