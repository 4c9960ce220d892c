//! Options and per-call context passed to file system backends.
//!
//! Two families live here:
//!
//! - **Open-time options**: [`EnvOptions`] is the flat option set the legacy
//!   environment understands; [`FileOptions`] is the richer set backends
//!   receive. `FileOptions::from(&EnvOptions)` is the expansion between them.
//! - **Per-call context**: [`IoOptions`] and [`IoDebugContext`] accompany every
//!   data-moving call. Callers that have nothing to say pass the defaults.

use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::IoResult;

/// Default buffer alignment reported by backends that do not override it.
pub const DEFAULT_PAGE_SIZE: usize = 4096;

// ============================================================================
// Per-call context
// ============================================================================

/// Scheduling priority a backend may honour for a single request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IoPriority {
    Low,
    High,
    #[default]
    Normal,
}

/// What kind of higher-level activity issued the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IoActivity {
    Flush,
    Compaction,
    DbOpen,
    Get,
    MultiGet,
    Iterator,
    VerifyChecksum,
    #[default]
    Unknown,
}

/// Per-request I/O options.
///
/// `IoOptions::default()` carries no deadline and no hints; it is what every
/// legacy call is translated with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IoOptions {
    /// Deadline for the whole request, if any.
    pub timeout: Option<Duration>,
    pub priority: IoPriority,
    pub io_activity: IoActivity,
    /// Ask the backend to fsync directories even when it considers it
    /// unnecessary.
    pub force_dir_fsync: bool,
    /// Restrict `get_children` to the immediate level.
    pub do_not_recurse: bool,
    /// Ask the backend to try harder on a read that failed verification.
    pub verify_and_reconstruct_read: bool,
}

/// Tracing context threaded through a single backend call.
///
/// Backends may annotate it during the call. It is never reused, so anything
/// written here is discarded when the call returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IoDebugContext {
    pub file_path: String,
    pub request_id: Option<String>,
    pub trace_data: BTreeMap<String, String>,
}

impl IoDebugContext {
    /// Adds a key/value pair to the trace data.
    pub fn add_trace(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.trace_data.insert(key.into(), value.into());
    }
}

/// Why a directory is being synced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DirFsyncReason {
    NewFileSynced,
    FileRenamed,
    FileDeleted,
    #[default]
    Default,
}

/// Options for [`FsDirectory::fsync_with_dir_options`](crate::FsDirectory::fsync_with_dir_options).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirFsyncOptions {
    pub reason: DirFsyncReason,
}

// ============================================================================
// Open-time options
// ============================================================================

/// Flat file options understood by the legacy environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvOptions {
    pub use_mmap_reads: bool,
    pub use_mmap_writes: bool,
    pub use_direct_reads: bool,
    pub use_direct_writes: bool,
    pub allow_fallocate: bool,
    pub set_fd_cloexec: bool,
    /// Incrementally sync every this many bytes written (0 disables).
    pub bytes_per_sync: u64,
    pub strict_bytes_per_sync: bool,
    pub fallocate_with_keep_size: bool,
    pub writable_file_max_buffer_size: usize,
    pub compaction_readahead_size: usize,
}

impl Default for EnvOptions {
    fn default() -> Self {
        Self {
            use_mmap_reads: false,
            use_mmap_writes: false,
            use_direct_reads: false,
            use_direct_writes: false,
            allow_fallocate: true,
            set_fd_cloexec: true,
            bytes_per_sync: 0,
            strict_bytes_per_sync: false,
            fallocate_with_keep_size: true,
            writable_file_max_buffer_size: 1024 * 1024,
            compaction_readahead_size: 2 * 1024 * 1024,
        }
    }
}

/// Storage tier hint for newly created files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Temperature {
    #[default]
    Unknown,
    Hot,
    Warm,
    Cold,
}

/// Checksum the writer hands off to the backend alongside data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ChecksumType {
    #[default]
    NoChecksum,
    Crc32c,
    XxHash64,
}

/// Open-time options passed to [`FileSystem`](crate::FileSystem) factory calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOptions {
    pub env: EnvOptions,
    /// Options applied to I/O issued while opening the file.
    pub io_options: IoOptions,
    pub temperature: Temperature,
    pub handoff_checksum_type: ChecksumType,
}

impl From<&EnvOptions> for FileOptions {
    /// Expands legacy options: every legacy field is copied and every field
    /// the legacy set cannot express keeps its default.
    fn from(options: &EnvOptions) -> Self {
        Self {
            env: options.clone(),
            ..Self::default()
        }
    }
}

// ============================================================================
// Per-file metadata
// ============================================================================

/// Integrity metadata that may accompany appended data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataVerificationInfo {
    pub checksum: Bytes,
}

/// Expected lifetime of data written to a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WriteLifeTimeHint {
    #[default]
    NotSet,
    None,
    Short,
    Medium,
    Long,
    Extreme,
}

/// Access pattern advice for a random-access file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsAccessPattern {
    Normal,
    Random,
    Sequential,
    WillNeed,
    WontNeed,
}

/// Preallocation settings reported by a writable file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreallocationStatus {
    pub block_size: usize,
    pub last_allocated_block: usize,
}

// ============================================================================
// Batched reads
// ============================================================================

/// One entry of a batched read.
///
/// The backend fills the front of `scratch` and records how much it wrote in
/// `result_len`. `status` is per entry and independent of the status returned
/// by the batched call itself.
#[derive(Debug)]
pub struct FsReadRequest<'a> {
    pub offset: u64,
    pub len: usize,
    pub scratch: &'a mut [u8],
    pub result_len: usize,
    pub status: IoResult<()>,
}

impl<'a> FsReadRequest<'a> {
    /// Creates a request with an empty result and a successful status.
    pub fn new(offset: u64, len: usize, scratch: &'a mut [u8]) -> Self {
        Self {
            offset,
            len,
            scratch,
            result_len: 0,
            status: Ok(()),
        }
    }

    /// Returns the bytes the backend produced for this entry.
    pub fn result(&self) -> &[u8] {
        &self.scratch[..self.result_len]
    }
}
