//! Legacy file handles backed by file system handles.
//!
//! Each wrapper owns exactly one backend handle, moved in at construction
//! and released when the wrapper is dropped. Every call builds a fresh
//! default [`IoOptions`] and [`IoDebugContext`], forwards to the matching
//! backend method once, and returns the backend's result unchanged. Nothing
//! is retried, cached, reordered, or merged.

use strata_io::{
    DataVerificationInfo, DirFsyncOptions, FsDirectory, FsRandomAccessFile, FsRandomRwFile,
    FsReadRequest, FsSequentialFile, FsWritableFile, IoDebugContext, IoOptions, IoResult,
    PreallocationStatus, WriteLifeTimeHint,
};

use crate::legacy::{
    AccessPattern, Directory, RandomAccessFile, RandomRwFile, ReadRequest, SequentialFile,
    WritableFile,
};

/// Per-call context for one delegated call. Never reused.
fn call_context() -> (IoOptions, IoDebugContext) {
    (IoOptions::default(), IoDebugContext::default())
}

// ============================================================================
// Sequential
// ============================================================================

pub struct CompositeSequentialFile {
    target: Box<dyn FsSequentialFile>,
}

impl CompositeSequentialFile {
    pub fn new(target: Box<dyn FsSequentialFile>) -> Self {
        Self { target }
    }
}

impl std::fmt::Debug for CompositeSequentialFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeSequentialFile")
            .field("direct_io", &self.target.use_direct_io())
            .finish_non_exhaustive()
    }
}

impl SequentialFile for CompositeSequentialFile {
    fn read(&mut self, n: usize, scratch: &mut [u8]) -> IoResult<usize> {
        let (io_opts, mut dbg) = call_context();
        self.target.read(n, &io_opts, scratch, &mut dbg)
    }

    fn skip(&mut self, n: u64) -> IoResult<()> {
        self.target.skip(n)
    }

    fn positioned_read(&mut self, offset: u64, n: usize, scratch: &mut [u8]) -> IoResult<usize> {
        let (io_opts, mut dbg) = call_context();
        self.target
            .positioned_read(offset, n, &io_opts, scratch, &mut dbg)
    }

    fn use_direct_io(&self) -> bool {
        self.target.use_direct_io()
    }

    fn required_buffer_alignment(&self) -> usize {
        self.target.required_buffer_alignment()
    }

    fn invalidate_cache(&mut self, offset: usize, length: usize) -> IoResult<()> {
        self.target.invalidate_cache(offset, length)
    }
}

// ============================================================================
// Random access
// ============================================================================

pub struct CompositeRandomAccessFile {
    target: Box<dyn FsRandomAccessFile>,
}

impl CompositeRandomAccessFile {
    pub fn new(target: Box<dyn FsRandomAccessFile>) -> Self {
        Self { target }
    }
}

impl std::fmt::Debug for CompositeRandomAccessFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeRandomAccessFile")
            .field("direct_io", &self.target.use_direct_io())
            .finish_non_exhaustive()
    }
}

impl RandomAccessFile for CompositeRandomAccessFile {
    fn read(&self, offset: u64, n: usize, scratch: &mut [u8]) -> IoResult<usize> {
        let (io_opts, mut dbg) = call_context();
        self.target.read(offset, n, &io_opts, scratch, &mut dbg)
    }

    /// Translates the batch entry by entry, issues one backend call, and
    /// copies each entry's outcome back to the same index.
    fn multi_read(&mut self, reqs: &mut [ReadRequest<'_>]) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();

        let mut fs_reqs: Vec<FsReadRequest<'_>> = reqs
            .iter_mut()
            .map(|req| FsReadRequest::new(req.offset, req.len, &mut *req.scratch))
            .collect();
        let status = self.target.multi_read(&mut fs_reqs, &io_opts, &mut dbg);

        // Release the scratch borrows before writing outcomes back.
        let outcomes: Vec<(usize, IoResult<()>)> = fs_reqs
            .into_iter()
            .map(|fs_req| (fs_req.result_len, fs_req.status))
            .collect();
        debug_assert_eq!(outcomes.len(), reqs.len());
        for (req, (result_len, entry_status)) in reqs.iter_mut().zip(outcomes) {
            req.result_len = result_len;
            req.status = entry_status;
        }

        status
    }

    fn prefetch(&mut self, offset: u64, n: usize) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.prefetch(offset, n, &io_opts, &mut dbg)
    }

    fn unique_id(&self, id: &mut [u8]) -> usize {
        self.target.unique_id(id)
    }

    fn hint(&mut self, pattern: AccessPattern) {
        self.target.hint(pattern.into());
    }

    fn use_direct_io(&self) -> bool {
        self.target.use_direct_io()
    }

    fn required_buffer_alignment(&self) -> usize {
        self.target.required_buffer_alignment()
    }

    fn invalidate_cache(&mut self, offset: usize, length: usize) -> IoResult<()> {
        self.target.invalidate_cache(offset, length)
    }
}

// ============================================================================
// Writable
// ============================================================================

pub struct CompositeWritableFile {
    target: Box<dyn FsWritableFile>,
}

impl CompositeWritableFile {
    pub fn new(target: Box<dyn FsWritableFile>) -> Self {
        Self { target }
    }

    /// Borrows the owned backend handle.
    ///
    /// Lets environment internals drive the backend directly. Ownership stays
    /// with this wrapper: the handle can be used but not taken or cloned.
    pub fn target_mut(&mut self) -> &mut dyn FsWritableFile {
        self.target.as_mut()
    }
}

impl std::fmt::Debug for CompositeWritableFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeWritableFile")
            .field("direct_io", &self.target.use_direct_io())
            .finish_non_exhaustive()
    }
}

impl WritableFile for CompositeWritableFile {
    fn append(&mut self, data: &[u8]) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.append(data, &io_opts, &mut dbg)
    }

    fn append_with_verification(
        &mut self,
        data: &[u8],
        verification_info: &DataVerificationInfo,
    ) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target
            .append_with_verification(data, &io_opts, verification_info, &mut dbg)
    }

    fn positioned_append(&mut self, data: &[u8], offset: u64) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target
            .positioned_append(data, offset, &io_opts, &mut dbg)
    }

    fn positioned_append_with_verification(
        &mut self,
        data: &[u8],
        offset: u64,
        verification_info: &DataVerificationInfo,
    ) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.positioned_append_with_verification(
            data,
            offset,
            &io_opts,
            verification_info,
            &mut dbg,
        )
    }

    fn truncate(&mut self, size: u64) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.truncate(size, &io_opts, &mut dbg)
    }

    fn close(&mut self) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.close(&io_opts, &mut dbg)
    }

    fn flush(&mut self) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.flush(&io_opts, &mut dbg)
    }

    fn sync(&mut self) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.sync(&io_opts, &mut dbg)
    }

    fn fsync(&mut self) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.fsync(&io_opts, &mut dbg)
    }

    fn is_sync_thread_safe(&self) -> bool {
        self.target.is_sync_thread_safe()
    }

    fn use_direct_io(&self) -> bool {
        self.target.use_direct_io()
    }

    fn required_buffer_alignment(&self) -> usize {
        self.target.required_buffer_alignment()
    }

    fn set_write_life_time_hint(&mut self, hint: WriteLifeTimeHint) {
        self.target.set_write_life_time_hint(hint);
    }

    fn write_life_time_hint(&mut self) -> WriteLifeTimeHint {
        self.target.write_life_time_hint()
    }

    fn file_size(&mut self) -> u64 {
        let (io_opts, mut dbg) = call_context();
        self.target.file_size(&io_opts, &mut dbg)
    }

    fn set_preallocation_block_size(&mut self, size: usize) {
        self.target.set_preallocation_block_size(size);
    }

    fn preallocation_status(&mut self) -> PreallocationStatus {
        self.target.preallocation_status()
    }

    fn unique_id(&self, id: &mut [u8]) -> usize {
        self.target.unique_id(id)
    }

    fn invalidate_cache(&mut self, offset: usize, length: usize) -> IoResult<()> {
        self.target.invalidate_cache(offset, length)
    }

    fn range_sync(&mut self, offset: u64, nbytes: u64) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.range_sync(offset, nbytes, &io_opts, &mut dbg)
    }

    fn prepare_write(&mut self, offset: usize, len: usize) {
        let (io_opts, mut dbg) = call_context();
        self.target.prepare_write(offset, len, &io_opts, &mut dbg);
    }

    fn allocate(&mut self, offset: u64, len: u64) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.allocate(offset, len, &io_opts, &mut dbg)
    }
}

// ============================================================================
// Random read/write
// ============================================================================

pub struct CompositeRandomRwFile {
    target: Box<dyn FsRandomRwFile>,
}

impl CompositeRandomRwFile {
    pub fn new(target: Box<dyn FsRandomRwFile>) -> Self {
        Self { target }
    }
}

impl std::fmt::Debug for CompositeRandomRwFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeRandomRwFile")
            .field("direct_io", &self.target.use_direct_io())
            .finish_non_exhaustive()
    }
}

impl RandomRwFile for CompositeRandomRwFile {
    fn use_direct_io(&self) -> bool {
        self.target.use_direct_io()
    }

    fn required_buffer_alignment(&self) -> usize {
        self.target.required_buffer_alignment()
    }

    fn write(&mut self, offset: u64, data: &[u8]) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.write(offset, data, &io_opts, &mut dbg)
    }

    fn read(&self, offset: u64, n: usize, scratch: &mut [u8]) -> IoResult<usize> {
        let (io_opts, mut dbg) = call_context();
        self.target.read(offset, n, &io_opts, scratch, &mut dbg)
    }

    fn flush(&mut self) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.flush(&io_opts, &mut dbg)
    }

    fn sync(&mut self) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.sync(&io_opts, &mut dbg)
    }

    fn fsync(&mut self) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.fsync(&io_opts, &mut dbg)
    }

    fn close(&mut self) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target.close(&io_opts, &mut dbg)
    }
}

// ============================================================================
// Directory
// ============================================================================

pub struct CompositeDirectory {
    target: Box<dyn FsDirectory>,
}

impl CompositeDirectory {
    pub fn new(target: Box<dyn FsDirectory>) -> Self {
        Self { target }
    }
}

impl std::fmt::Debug for CompositeDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeDirectory").finish_non_exhaustive()
    }
}

impl Directory for CompositeDirectory {
    fn fsync(&mut self) -> IoResult<()> {
        let (io_opts, mut dbg) = call_context();
        self.target
            .fsync_with_dir_options(&io_opts, &mut dbg, &DirFsyncOptions::default())
    }

    fn unique_id(&self, id: &mut [u8]) -> usize {
        self.target.unique_id(id)
    }
}
