//! File system traits.
//!
//! A [`FileSystem`] names, creates, and removes files; each open file is a
//! separate handle object from one of five families. Every data-moving call
//! takes an [`IoOptions`] and an [`IoDebugContext`] so backends can support
//! deadlines, priorities, and request tracing.
//!
//! Handles are single-owner: a factory call returns a `Box` and dropping it
//! releases the underlying resource.

use std::path::{Path, PathBuf};

use crate::options::{
    DEFAULT_PAGE_SIZE, DataVerificationInfo, DirFsyncOptions, FileOptions, FsAccessPattern,
    FsReadRequest, IoDebugContext, IoOptions, PreallocationStatus, WriteLifeTimeHint,
};
use crate::{IoError, IoResult};

/// A file read from start to end.
pub trait FsSequentialFile: Send {
    /// Reads up to `n` bytes into the front of `scratch`.
    ///
    /// Returns the number of bytes read. A short count is not an error.
    fn read(
        &mut self,
        n: usize,
        options: &IoOptions,
        scratch: &mut [u8],
        dbg: &mut IoDebugContext,
    ) -> IoResult<usize>;

    /// Skips `n` bytes.
    fn skip(&mut self, n: u64) -> IoResult<()>;

    /// Reads up to `n` bytes at `offset` without moving the file position.
    ///
    /// Only meaningful for direct I/O files.
    fn positioned_read(
        &mut self,
        _offset: u64,
        _n: usize,
        _options: &IoOptions,
        _scratch: &mut [u8],
        _dbg: &mut IoDebugContext,
    ) -> IoResult<usize> {
        Err(IoError::not_supported("positioned_read"))
    }

    fn use_direct_io(&self) -> bool {
        false
    }

    fn required_buffer_alignment(&self) -> usize {
        DEFAULT_PAGE_SIZE
    }

    /// Drops cached pages for the given range.
    fn invalidate_cache(&mut self, _offset: usize, _length: usize) -> IoResult<()> {
        Err(IoError::not_supported("invalidate_cache"))
    }
}

/// A file read at arbitrary offsets.
///
/// Reads take `&self`; they never move a file position.
pub trait FsRandomAccessFile: Send + Sync {
    /// Reads up to `n` bytes at `offset` into the front of `scratch`.
    fn read(
        &self,
        offset: u64,
        n: usize,
        options: &IoOptions,
        scratch: &mut [u8],
        dbg: &mut IoDebugContext,
    ) -> IoResult<usize>;

    /// Services a batch of reads.
    ///
    /// Each entry gets its own `status` and `result_len`. The returned status
    /// covers the batch as a whole; it may be `Ok` while entries failed.
    fn multi_read(
        &mut self,
        reqs: &mut [FsReadRequest<'_>],
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        for req in reqs.iter_mut() {
            let len = req.len;
            match self.read(req.offset, len, options, req.scratch, dbg) {
                Ok(n) => {
                    req.result_len = n;
                    req.status = Ok(());
                }
                Err(e) => {
                    req.result_len = 0;
                    req.status = Err(e);
                }
            }
        }
        Ok(())
    }

    /// Hints that `n` bytes at `offset` will be read soon.
    fn prefetch(
        &mut self,
        _offset: u64,
        _n: usize,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        Err(IoError::not_supported("prefetch"))
    }

    /// Writes a stable identifier for the file into `id`.
    ///
    /// Returns the number of bytes written, or 0 when the backend cannot
    /// produce an identifier that fits.
    fn unique_id(&self, _id: &mut [u8]) -> usize {
        0
    }

    fn hint(&mut self, _pattern: FsAccessPattern) {}

    fn use_direct_io(&self) -> bool {
        false
    }

    fn required_buffer_alignment(&self) -> usize {
        DEFAULT_PAGE_SIZE
    }

    fn invalidate_cache(&mut self, _offset: usize, _length: usize) -> IoResult<()> {
        Err(IoError::not_supported("invalidate_cache"))
    }
}

/// A file written sequentially, with optional positioned appends.
pub trait FsWritableFile: Send {
    fn append(
        &mut self,
        data: &[u8],
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<()>;

    /// Appends `data` together with integrity metadata.
    ///
    /// Backends that do not check the metadata may ignore it.
    fn append_with_verification(
        &mut self,
        data: &[u8],
        options: &IoOptions,
        _verification_info: &DataVerificationInfo,
        dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        self.append(data, options, dbg)
    }

    /// Writes `data` at `offset`. Used with direct I/O.
    fn positioned_append(
        &mut self,
        _data: &[u8],
        _offset: u64,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        Err(IoError::not_supported("positioned_append"))
    }

    fn positioned_append_with_verification(
        &mut self,
        data: &[u8],
        offset: u64,
        options: &IoOptions,
        _verification_info: &DataVerificationInfo,
        dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        self.positioned_append(data, offset, options, dbg)
    }

    fn truncate(
        &mut self,
        _size: u64,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        Ok(())
    }

    fn close(&mut self, options: &IoOptions, dbg: &mut IoDebugContext) -> IoResult<()>;

    fn flush(&mut self, options: &IoOptions, dbg: &mut IoDebugContext) -> IoResult<()>;

    /// Syncs file data.
    fn sync(&mut self, options: &IoOptions, dbg: &mut IoDebugContext) -> IoResult<()>;

    /// Syncs file data and metadata.
    fn fsync(&mut self, options: &IoOptions, dbg: &mut IoDebugContext) -> IoResult<()> {
        self.sync(options, dbg)
    }

    /// Whether `sync` may run concurrently with `append`.
    fn is_sync_thread_safe(&self) -> bool {
        false
    }

    fn use_direct_io(&self) -> bool {
        false
    }

    fn required_buffer_alignment(&self) -> usize {
        DEFAULT_PAGE_SIZE
    }

    fn set_write_life_time_hint(&mut self, _hint: WriteLifeTimeHint) {}

    fn write_life_time_hint(&self) -> WriteLifeTimeHint {
        WriteLifeTimeHint::NotSet
    }

    fn file_size(&mut self, _options: &IoOptions, _dbg: &mut IoDebugContext) -> u64 {
        0
    }

    fn set_preallocation_block_size(&mut self, _size: usize) {}

    fn preallocation_status(&self) -> PreallocationStatus {
        PreallocationStatus::default()
    }

    fn unique_id(&self, _id: &mut [u8]) -> usize {
        0
    }

    fn invalidate_cache(&mut self, _offset: usize, _length: usize) -> IoResult<()> {
        Err(IoError::not_supported("invalidate_cache"))
    }

    /// Syncs `nbytes` starting at `offset`. Advisory.
    fn range_sync(
        &mut self,
        _offset: u64,
        _nbytes: u64,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        Ok(())
    }

    /// Tells the backend `len` bytes are about to be written at `offset`.
    fn prepare_write(
        &mut self,
        _offset: usize,
        _len: usize,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) {
    }

    /// Reserves `len` bytes of space starting at `offset`.
    fn allocate(
        &mut self,
        _offset: u64,
        _len: u64,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        Ok(())
    }
}

/// A file both read and written at arbitrary offsets.
pub trait FsRandomRwFile: Send {
    fn write(
        &mut self,
        offset: u64,
        data: &[u8],
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<()>;

    fn read(
        &self,
        offset: u64,
        n: usize,
        options: &IoOptions,
        scratch: &mut [u8],
        dbg: &mut IoDebugContext,
    ) -> IoResult<usize>;

    fn flush(&mut self, options: &IoOptions, dbg: &mut IoDebugContext) -> IoResult<()>;

    fn sync(&mut self, options: &IoOptions, dbg: &mut IoDebugContext) -> IoResult<()>;

    fn fsync(&mut self, options: &IoOptions, dbg: &mut IoDebugContext) -> IoResult<()> {
        self.sync(options, dbg)
    }

    fn close(&mut self, options: &IoOptions, dbg: &mut IoDebugContext) -> IoResult<()>;

    fn use_direct_io(&self) -> bool {
        false
    }

    fn required_buffer_alignment(&self) -> usize {
        DEFAULT_PAGE_SIZE
    }
}

/// An open directory, used to make entry changes durable.
pub trait FsDirectory: Send {
    fn fsync_with_dir_options(
        &mut self,
        options: &IoOptions,
        dbg: &mut IoDebugContext,
        dir_fsync_options: &DirFsyncOptions,
    ) -> IoResult<()>;

    fn unique_id(&self, _id: &mut [u8]) -> usize {
        0
    }
}

/// Factory and namespace operations of a storage backend.
pub trait FileSystem: Send + Sync {
    /// Short name identifying the backend.
    fn name(&self) -> &'static str;

    fn new_sequential_file(
        &self,
        fname: &Path,
        options: &FileOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<Box<dyn FsSequentialFile>>;

    fn new_random_access_file(
        &self,
        fname: &Path,
        options: &FileOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<Box<dyn FsRandomAccessFile>>;

    /// Creates `fname`, truncating any existing file.
    fn new_writable_file(
        &self,
        fname: &Path,
        options: &FileOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<Box<dyn FsWritableFile>>;

    /// Opens `fname` for appending, creating it if missing.
    fn reopen_writable_file(
        &self,
        fname: &Path,
        options: &FileOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<Box<dyn FsWritableFile>>;

    /// Renames `old_fname` to `fname` and opens it for writing from the start.
    fn reuse_writable_file(
        &self,
        fname: &Path,
        old_fname: &Path,
        options: &FileOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<Box<dyn FsWritableFile>>;

    fn new_random_rw_file(
        &self,
        fname: &Path,
        options: &FileOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<Box<dyn FsRandomRwFile>>;

    fn new_directory(
        &self,
        name: &Path,
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<Box<dyn FsDirectory>>;

    /// Returns `Ok(())` if `fname` exists and `NotFound` otherwise.
    fn file_exists(
        &self,
        fname: &Path,
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<()>;

    /// Lists the entry names in `dir`.
    fn get_children(
        &self,
        dir: &Path,
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<Vec<String>>;

    fn delete_file(
        &self,
        fname: &Path,
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<()>;

    /// Creates `dirname`; fails if it exists.
    fn create_dir(
        &self,
        dirname: &Path,
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<()>;

    fn create_dir_if_missing(
        &self,
        dirname: &Path,
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<()>;

    fn delete_dir(
        &self,
        dirname: &Path,
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<()>;

    fn get_file_size(
        &self,
        fname: &Path,
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<u64>;

    fn rename_file(
        &self,
        src: &Path,
        target: &Path,
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<()>;

    /// Creates a hard link `target` pointing at `src`.
    fn link_file(
        &self,
        _src: &Path,
        _target: &Path,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        Err(IoError::not_supported("link_file"))
    }

    fn is_directory(
        &self,
        path: &Path,
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<bool>;

    fn get_absolute_path(
        &self,
        db_path: &Path,
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) -> IoResult<PathBuf>;
}
