//! File system backend using `std::fs`.
//!
//! All operations are blocking and go through the OS page cache unless
//! direct I/O was requested and the `direct_io` feature is enabled on Linux,
//! in which case files are opened with `O_DIRECT`.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::fs::{
    FileSystem, FsDirectory, FsRandomAccessFile, FsRandomRwFile, FsSequentialFile, FsWritableFile,
};
use crate::options::{
    DirFsyncOptions, FileOptions, FsAccessPattern, IoDebugContext, IoOptions,
    PreallocationStatus, WriteLifeTimeHint,
};
use crate::{IoError, IoResult};

/// Flags for opening files.
#[derive(Debug, Clone, Copy, Default)]
struct OpenFlags {
    read: bool,
    write: bool,
    create: bool,
    truncate: bool,
    direct: bool,
}

impl OpenFlags {
    fn read_only(direct: bool) -> Self {
        Self {
            read: true,
            direct,
            ..Self::default()
        }
    }

    fn create_truncate(direct: bool) -> Self {
        Self {
            write: true,
            create: true,
            truncate: true,
            direct,
            ..Self::default()
        }
    }

    /// Keeps existing bytes. Writable handles track their own write offset,
    /// so `O_APPEND` is never set: it would make positioned writes land at
    /// the end of the file.
    fn write_create(direct: bool) -> Self {
        Self {
            write: true,
            create: true,
            direct,
            ..Self::default()
        }
    }

    fn read_write_create(direct: bool) -> Self {
        Self {
            read: true,
            write: true,
            create: true,
            direct,
            ..Self::default()
        }
    }

    fn open(self, path: &Path) -> IoResult<File> {
        let mut opts = OpenOptions::new();
        opts.read(self.read)
            .write(self.write)
            .create(self.create)
            .truncate(self.truncate);

        #[cfg(all(target_os = "linux", feature = "direct_io"))]
        if self.direct {
            use std::os::unix::fs::OpenOptionsExt;
            opts.custom_flags(libc::O_DIRECT);
        }

        opts.open(path).map_err(|e| IoError::from_io(e, path))
    }
}

/// Synchronous file system over `std::fs`.
///
/// # Options
///
/// Honoured from [`EnvOptions`](crate::EnvOptions): `use_direct_reads` and
/// `use_direct_writes` (with the `direct_io` feature on Linux),
/// `bytes_per_sync`, `allow_fallocate` and `fallocate_with_keep_size`.
///
/// Ignored: `use_mmap_reads` and `use_mmap_writes` (all I/O goes through
/// `read`/`write` calls), `set_fd_cloexec` (the standard library always opens
/// with `O_CLOEXEC`), `strict_bytes_per_sync`, `writable_file_max_buffer_size`
/// and `compaction_readahead_size` (writes are unbuffered).
#[derive(Debug)]
pub struct PosixFileSystem {
    /// Counter for generating unique handle ids.
    next_handle_id: AtomicU64,
}

impl PosixFileSystem {
    pub fn new() -> Self {
        Self {
            next_handle_id: AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_handle_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for PosixFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Positional helpers
// ============================================================================

#[cfg(unix)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
    use std::os::unix::fs::FileExt;
    file.read_at(buf, offset)
}

#[cfg(windows)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
    use std::os::windows::fs::FileExt;
    file.seek_read(buf, offset)
}

#[cfg(unix)]
fn write_all_at(file: &File, buf: &[u8], offset: u64) -> std::io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.write_all_at(buf, offset)
}

#[cfg(windows)]
fn write_all_at(file: &File, mut buf: &[u8], mut offset: u64) -> std::io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        let n = file.seek_write(buf, offset)?;
        if n == 0 {
            return Err(std::io::ErrorKind::WriteZero.into());
        }
        buf = &buf[n..];
        offset += n as u64;
    }
    Ok(())
}

/// Reads until `buf` is full or end of file.
fn read_full_at(file: &File, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match read_at(file, &mut buf[filled..], offset + filled as u64) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Returns the scratch prefix that will receive `n` bytes.
fn scratch_prefix(scratch: &mut [u8], n: usize) -> IoResult<&mut [u8]> {
    let available = scratch.len();
    scratch.get_mut(..n).ok_or_else(|| {
        IoError::InvalidArgument(format!(
            "scratch buffer holds {available} bytes, {n} requested"
        ))
    })
}

/// Encodes device and inode numbers into `id`.
#[cfg(unix)]
fn file_unique_id(file: &File, id: &mut [u8]) -> usize {
    use std::os::unix::fs::MetadataExt;
    const ID_LEN: usize = 16;

    let Ok(metadata) = file.metadata() else {
        return 0;
    };
    if id.len() < ID_LEN {
        return 0;
    }
    id[..8].copy_from_slice(&metadata.dev().to_le_bytes());
    id[8..ID_LEN].copy_from_slice(&metadata.ino().to_le_bytes());
    ID_LEN
}

#[cfg(not(unix))]
fn file_unique_id(_file: &File, _id: &mut [u8]) -> usize {
    0
}

/// Maps an error from a call that names two paths.
///
/// Blames `src` only when it is missing; otherwise the failure is about
/// `target` (for example its parent directory does not exist).
fn two_path_error(source: std::io::Error, src: &Path, target: &Path) -> IoError {
    let culprit = if fs::symlink_metadata(src).is_ok() {
        target
    } else {
        src
    };
    IoError::from_io(source, culprit)
}

fn closed_error(path: &Path) -> IoError {
    IoError::InvalidArgument(format!("{} is closed", path.display()))
}

fn required_alignment(direct: bool) -> usize {
    if direct {
        crate::options::DEFAULT_PAGE_SIZE
    } else {
        1
    }
}

// ============================================================================
// File handles
// ============================================================================

#[derive(Debug)]
struct PosixSequentialFile {
    path: PathBuf,
    file: File,
    direct: bool,
}

impl FsSequentialFile for PosixSequentialFile {
    fn read(
        &mut self,
        n: usize,
        _options: &IoOptions,
        scratch: &mut [u8],
        _dbg: &mut IoDebugContext,
    ) -> IoResult<usize> {
        let buf = scratch_prefix(scratch, n)?;
        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(k) => filled += k,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(IoError::from_io(e, &self.path)),
            }
        }
        Ok(filled)
    }

    fn skip(&mut self, n: u64) -> IoResult<()> {
        let delta = i64::try_from(n)
            .map_err(|_| IoError::InvalidArgument(format!("skip distance {n} too large")))?;
        self.file
            .seek(SeekFrom::Current(delta))
            .map_err(|e| IoError::from_io(e, &self.path))?;
        Ok(())
    }

    fn positioned_read(
        &mut self,
        offset: u64,
        n: usize,
        _options: &IoOptions,
        scratch: &mut [u8],
        _dbg: &mut IoDebugContext,
    ) -> IoResult<usize> {
        let buf = scratch_prefix(scratch, n)?;
        read_full_at(&self.file, buf, offset).map_err(|e| IoError::from_io(e, &self.path))
    }

    fn use_direct_io(&self) -> bool {
        self.direct
    }

    fn required_buffer_alignment(&self) -> usize {
        required_alignment(self.direct)
    }

    fn invalidate_cache(&mut self, _offset: usize, _length: usize) -> IoResult<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct PosixRandomAccessFile {
    path: PathBuf,
    file: File,
    direct: bool,
}

impl FsRandomAccessFile for PosixRandomAccessFile {
    fn read(
        &self,
        offset: u64,
        n: usize,
        _options: &IoOptions,
        scratch: &mut [u8],
        _dbg: &mut IoDebugContext,
    ) -> IoResult<usize> {
        let buf = scratch_prefix(scratch, n)?;
        read_full_at(&self.file, buf, offset).map_err(|e| IoError::from_io(e, &self.path))
    }

    fn prefetch(
        &mut self,
        _offset: u64,
        _n: usize,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        Ok(())
    }

    fn unique_id(&self, id: &mut [u8]) -> usize {
        file_unique_id(&self.file, id)
    }

    fn hint(&mut self, pattern: FsAccessPattern) {
        tracing::trace!(path = %self.path.display(), ?pattern, "access pattern hint");
    }

    fn use_direct_io(&self) -> bool {
        self.direct
    }

    fn required_buffer_alignment(&self) -> usize {
        required_alignment(self.direct)
    }

    fn invalidate_cache(&mut self, _offset: usize, _length: usize) -> IoResult<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct PosixWritableFile {
    path: PathBuf,
    /// `None` once closed.
    file: Option<File>,
    direct: bool,
    /// Offset of the next append; existing bytes count when reopened.
    filesize: u64,
    write_hint: WriteLifeTimeHint,
    preallocation_block_size: usize,
    last_preallocated_block: usize,
    allow_fallocate: bool,
    fallocate_with_keep_size: bool,
    /// Sync written data every this many bytes (0 disables).
    bytes_per_sync: u64,
    /// Data before this offset has been synced incrementally.
    synced_up_to: u64,
}

impl PosixWritableFile {
    fn new(path: &Path, file: File, options: &FileOptions, filesize: u64) -> Self {
        Self {
            path: path.to_path_buf(),
            file: Some(file),
            direct: options.env.use_direct_writes,
            filesize,
            write_hint: WriteLifeTimeHint::NotSet,
            preallocation_block_size: 0,
            last_preallocated_block: 0,
            allow_fallocate: options.env.allow_fallocate,
            fallocate_with_keep_size: options.env.fallocate_with_keep_size,
            bytes_per_sync: options.env.bytes_per_sync,
            synced_up_to: filesize,
        }
    }

    fn file(&self) -> IoResult<&File> {
        self.file.as_ref().ok_or_else(|| closed_error(&self.path))
    }

    /// Syncs data once `bytes_per_sync` unsynced bytes have accumulated.
    fn sync_incrementally(&mut self) -> IoResult<()> {
        if self.bytes_per_sync == 0
            || self.filesize.saturating_sub(self.synced_up_to) < self.bytes_per_sync
        {
            return Ok(());
        }
        self.file()?
            .sync_data()
            .map_err(|e| IoError::from_io(e, &self.path))?;
        self.synced_up_to = self.filesize;
        Ok(())
    }
}

/// Reserves `len` bytes at `offset` on disk.
///
/// With `keep_size` the reported file length is unchanged.
#[cfg(target_os = "linux")]
fn reserve_space(file: &File, offset: u64, len: u64, keep_size: bool) -> std::io::Result<()> {
    use nix::fcntl::{FallocateFlags, fallocate};
    use std::os::fd::AsRawFd;

    let to_off_t = |value: u64| {
        nix::libc::off_t::try_from(value).map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{value} exceeds the file offset range"),
            )
        })
    };
    let mode = if keep_size {
        FallocateFlags::FALLOC_FL_KEEP_SIZE
    } else {
        FallocateFlags::empty()
    };
    fallocate(file.as_raw_fd(), mode, to_off_t(offset)?, to_off_t(len)?)?;
    Ok(())
}

/// Without `fallocate` space can only be reserved by growing the file.
#[cfg(not(target_os = "linux"))]
fn reserve_space(file: &File, offset: u64, len: u64, keep_size: bool) -> std::io::Result<()> {
    if keep_size {
        return Ok(());
    }
    let end = offset.checked_add(len).ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "allocation range overflows")
    })?;
    if file.metadata()?.len() < end {
        file.set_len(end)?;
    }
    Ok(())
}

impl FsWritableFile for PosixWritableFile {
    fn append(
        &mut self,
        data: &[u8],
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        write_all_at(self.file()?, data, self.filesize)
            .map_err(|e| IoError::from_io(e, &self.path))?;
        self.filesize += data.len() as u64;
        self.sync_incrementally()
    }

    fn positioned_append(
        &mut self,
        data: &[u8],
        offset: u64,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        let end = offset.checked_add(data.len() as u64).ok_or_else(|| {
            IoError::InvalidArgument(format!("append at {offset} overflows the file size"))
        })?;
        write_all_at(self.file()?, data, offset).map_err(|e| IoError::from_io(e, &self.path))?;
        self.filesize = end;
        self.sync_incrementally()
    }

    fn truncate(
        &mut self,
        size: u64,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        self.file()?
            .set_len(size)
            .map_err(|e| IoError::from_io(e, &self.path))?;
        self.filesize = size;
        self.synced_up_to = self.synced_up_to.min(size);
        Ok(())
    }

    fn close(&mut self, _options: &IoOptions, _dbg: &mut IoDebugContext) -> IoResult<()> {
        // Dropping the descriptor closes it.
        self.file = None;
        Ok(())
    }

    fn flush(&mut self, _options: &IoOptions, _dbg: &mut IoDebugContext) -> IoResult<()> {
        let file = self.file.as_mut().ok_or_else(|| closed_error(&self.path))?;
        file.flush().map_err(|e| IoError::from_io(e, &self.path))
    }

    fn sync(&mut self, _options: &IoOptions, _dbg: &mut IoDebugContext) -> IoResult<()> {
        self.file()?
            .sync_data()
            .map_err(|e| IoError::from_io(e, &self.path))
    }

    fn fsync(&mut self, _options: &IoOptions, _dbg: &mut IoDebugContext) -> IoResult<()> {
        self.file()?
            .sync_all()
            .map_err(|e| IoError::from_io(e, &self.path))
    }

    fn is_sync_thread_safe(&self) -> bool {
        true
    }

    fn use_direct_io(&self) -> bool {
        self.direct
    }

    fn required_buffer_alignment(&self) -> usize {
        required_alignment(self.direct)
    }

    fn set_write_life_time_hint(&mut self, hint: WriteLifeTimeHint) {
        self.write_hint = hint;
    }

    fn write_life_time_hint(&self) -> WriteLifeTimeHint {
        self.write_hint
    }

    fn file_size(&mut self, _options: &IoOptions, _dbg: &mut IoDebugContext) -> u64 {
        self.filesize
    }

    fn set_preallocation_block_size(&mut self, size: usize) {
        self.preallocation_block_size = size;
    }

    fn preallocation_status(&self) -> PreallocationStatus {
        PreallocationStatus {
            block_size: self.preallocation_block_size,
            last_allocated_block: self.last_preallocated_block,
        }
    }

    fn unique_id(&self, id: &mut [u8]) -> usize {
        match &self.file {
            Some(file) => file_unique_id(file, id),
            None => 0,
        }
    }

    fn invalidate_cache(&mut self, _offset: usize, _length: usize) -> IoResult<()> {
        Ok(())
    }

    fn range_sync(
        &mut self,
        _offset: u64,
        _nbytes: u64,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        // No portable sync_file_range; sync the whole file's data.
        self.file()?
            .sync_data()
            .map_err(|e| IoError::from_io(e, &self.path))
    }

    fn prepare_write(
        &mut self,
        offset: usize,
        len: usize,
        options: &IoOptions,
        dbg: &mut IoDebugContext,
    ) {
        let block_size = self.preallocation_block_size;
        if block_size == 0 {
            return;
        }
        let Some(end) = offset.checked_add(len) else {
            return;
        };
        let new_last_block = end.div_ceil(block_size);
        if new_last_block <= self.last_preallocated_block {
            return;
        }
        let start = self.last_preallocated_block.checked_mul(block_size);
        let grow = (new_last_block - self.last_preallocated_block).checked_mul(block_size);
        let (Some(start), Some(grow)) = (start, grow) else {
            return;
        };
        if let Err(e) = self.allocate(start as u64, grow as u64, options, dbg) {
            tracing::warn!(path = %self.path.display(), error = %e, "preallocation failed");
        }
        self.last_preallocated_block = new_last_block;
    }

    fn allocate(
        &mut self,
        offset: u64,
        len: u64,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        if !self.allow_fallocate || len == 0 {
            return Ok(());
        }
        reserve_space(self.file()?, offset, len, self.fallocate_with_keep_size)
            .map_err(|e| IoError::from_io(e, &self.path))
    }
}

#[derive(Debug)]
struct PosixRandomRwFile {
    path: PathBuf,
    /// `None` once closed.
    file: Option<File>,
    direct: bool,
}

impl PosixRandomRwFile {
    fn file(&self) -> IoResult<&File> {
        self.file.as_ref().ok_or_else(|| closed_error(&self.path))
    }
}

impl FsRandomRwFile for PosixRandomRwFile {
    fn write(
        &mut self,
        offset: u64,
        data: &[u8],
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        write_all_at(self.file()?, data, offset).map_err(|e| IoError::from_io(e, &self.path))
    }

    fn read(
        &self,
        offset: u64,
        n: usize,
        _options: &IoOptions,
        scratch: &mut [u8],
        _dbg: &mut IoDebugContext,
    ) -> IoResult<usize> {
        let buf = scratch_prefix(scratch, n)?;
        read_full_at(self.file()?, buf, offset).map_err(|e| IoError::from_io(e, &self.path))
    }

    fn flush(&mut self, _options: &IoOptions, _dbg: &mut IoDebugContext) -> IoResult<()> {
        self.file().map(|_| ())
    }

    fn sync(&mut self, _options: &IoOptions, _dbg: &mut IoDebugContext) -> IoResult<()> {
        self.file()?
            .sync_data()
            .map_err(|e| IoError::from_io(e, &self.path))
    }

    fn fsync(&mut self, _options: &IoOptions, _dbg: &mut IoDebugContext) -> IoResult<()> {
        self.file()?
            .sync_all()
            .map_err(|e| IoError::from_io(e, &self.path))
    }

    fn close(&mut self, _options: &IoOptions, _dbg: &mut IoDebugContext) -> IoResult<()> {
        self.file = None;
        Ok(())
    }

    fn use_direct_io(&self) -> bool {
        self.direct
    }

    fn required_buffer_alignment(&self) -> usize {
        required_alignment(self.direct)
    }
}

#[derive(Debug)]
struct PosixDirectory {
    path: PathBuf,
    file: File,
}

impl FsDirectory for PosixDirectory {
    fn fsync_with_dir_options(
        &mut self,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
        dir_fsync_options: &DirFsyncOptions,
    ) -> IoResult<()> {
        tracing::trace!(
            path = %self.path.display(),
            reason = ?dir_fsync_options.reason,
            "syncing directory"
        );
        self.file
            .sync_all()
            .map_err(|e| IoError::from_io(e, &self.path))
    }

    fn unique_id(&self, id: &mut [u8]) -> usize {
        file_unique_id(&self.file, id)
    }
}

// ============================================================================
// Factory and namespace
// ============================================================================

impl FileSystem for PosixFileSystem {
    fn name(&self) -> &'static str {
        "posix"
    }

    fn new_sequential_file(
        &self,
        fname: &Path,
        options: &FileOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<Box<dyn FsSequentialFile>> {
        let direct = options.env.use_direct_reads;
        let file = OpenFlags::read_only(direct).open(fname)?;
        tracing::trace!(path = %fname.display(), id = self.next_id(), "opened sequential file");
        Ok(Box::new(PosixSequentialFile {
            path: fname.to_path_buf(),
            file,
            direct,
        }))
    }

    fn new_random_access_file(
        &self,
        fname: &Path,
        options: &FileOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<Box<dyn FsRandomAccessFile>> {
        let direct = options.env.use_direct_reads;
        let file = OpenFlags::read_only(direct).open(fname)?;
        tracing::trace!(path = %fname.display(), id = self.next_id(), "opened random access file");
        Ok(Box::new(PosixRandomAccessFile {
            path: fname.to_path_buf(),
            file,
            direct,
        }))
    }

    fn new_writable_file(
        &self,
        fname: &Path,
        options: &FileOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<Box<dyn FsWritableFile>> {
        let direct = options.env.use_direct_writes;
        let file = OpenFlags::create_truncate(direct).open(fname)?;
        tracing::trace!(path = %fname.display(), id = self.next_id(), "opened writable file");
        Ok(Box::new(PosixWritableFile::new(fname, file, options, 0)))
    }

    fn reopen_writable_file(
        &self,
        fname: &Path,
        options: &FileOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<Box<dyn FsWritableFile>> {
        let direct = options.env.use_direct_writes;
        let file = OpenFlags::write_create(direct).open(fname)?;
        let filesize = file
            .metadata()
            .map_err(|e| IoError::from_io(e, fname))?
            .len();
        tracing::trace!(path = %fname.display(), id = self.next_id(), filesize, "reopened writable file");
        Ok(Box::new(PosixWritableFile::new(fname, file, options, filesize)))
    }

    fn reuse_writable_file(
        &self,
        fname: &Path,
        old_fname: &Path,
        options: &FileOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<Box<dyn FsWritableFile>> {
        fs::rename(old_fname, fname).map_err(|e| IoError::from_io(e, old_fname))?;
        let direct = options.env.use_direct_writes;
        // Existing bytes are overwritten from the start rather than truncated.
        let file = OpenFlags::write_create(direct).open(fname)?;
        tracing::trace!(
            path = %fname.display(),
            old_path = %old_fname.display(),
            id = self.next_id(),
            "reused writable file"
        );
        Ok(Box::new(PosixWritableFile::new(fname, file, options, 0)))
    }

    fn new_random_rw_file(
        &self,
        fname: &Path,
        options: &FileOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<Box<dyn FsRandomRwFile>> {
        let direct = options.env.use_direct_writes;
        let file = OpenFlags::read_write_create(direct).open(fname)?;
        tracing::trace!(path = %fname.display(), id = self.next_id(), "opened random rw file");
        Ok(Box::new(PosixRandomRwFile {
            path: fname.to_path_buf(),
            file: Some(file),
            direct,
        }))
    }

    fn new_directory(
        &self,
        name: &Path,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<Box<dyn FsDirectory>> {
        if !name.is_dir() {
            return Err(IoError::NotFound {
                path: name.to_path_buf(),
            });
        }
        let file = File::open(name).map_err(|e| IoError::from_io(e, name))?;
        tracing::trace!(path = %name.display(), id = self.next_id(), "opened directory");
        Ok(Box::new(PosixDirectory {
            path: name.to_path_buf(),
            file,
        }))
    }

    fn file_exists(
        &self,
        fname: &Path,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        fs::metadata(fname)
            .map(|_| ())
            .map_err(|e| IoError::from_io(e, fname))
    }

    fn get_children(
        &self,
        dir: &Path,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| IoError::from_io(e, dir))? {
            let entry = entry.map_err(|e| IoError::from_io(e, dir))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn delete_file(
        &self,
        fname: &Path,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        fs::remove_file(fname).map_err(|e| IoError::from_io(e, fname))
    }

    fn create_dir(
        &self,
        dirname: &Path,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        fs::create_dir(dirname).map_err(|e| IoError::from_io(e, dirname))
    }

    fn create_dir_if_missing(
        &self,
        dirname: &Path,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        match fs::create_dir(dirname) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && dirname.is_dir() => Ok(()),
            Err(e) => Err(IoError::from_io(e, dirname)),
        }
    }

    fn delete_dir(
        &self,
        dirname: &Path,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        fs::remove_dir(dirname).map_err(|e| IoError::from_io(e, dirname))
    }

    fn get_file_size(
        &self,
        fname: &Path,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<u64> {
        fs::metadata(fname)
            .map(|m| m.len())
            .map_err(|e| IoError::from_io(e, fname))
    }

    fn rename_file(
        &self,
        src: &Path,
        target: &Path,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        fs::rename(src, target).map_err(|e| two_path_error(e, src, target))
    }

    fn link_file(
        &self,
        src: &Path,
        target: &Path,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<()> {
        fs::hard_link(src, target).map_err(|e| two_path_error(e, src, target))
    }

    fn is_directory(
        &self,
        path: &Path,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<bool> {
        fs::metadata(path)
            .map(|m| m.is_dir())
            .map_err(|e| IoError::from_io(e, path))
    }

    fn get_absolute_path(
        &self,
        db_path: &Path,
        _options: &IoOptions,
        _dbg: &mut IoDebugContext,
    ) -> IoResult<PathBuf> {
        if db_path.is_absolute() {
            return Ok(db_path.to_path_buf());
        }
        let cwd = std::env::current_dir()?;
        Ok(cwd.join(db_path))
    }
}
