//! # strata-io: File System Interface for Strata
//!
//! This crate defines the granular file system interface used by Strata
//! storage backends. Responsibilities are split in two:
//!
//! - A [`FileSystem`] factory that names, creates, and removes files
//! - Per-file handle objects ([`FsSequentialFile`], [`FsRandomAccessFile`],
//!   [`FsWritableFile`], [`FsRandomRwFile`], [`FsDirectory`]) whose methods
//!   take per-call context: [`IoOptions`] and an [`IoDebugContext`]
//!
//! The per-call context lets backends implement request deadlines,
//! priorities, batching, and tracing that a flat per-file API cannot express.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │        strata-env        │
//! │ (legacy per-file Env API)│
//! └────────────┬─────────────┘
//!              │
//! ┌────────────┴─────────────┐
//! │        strata-io         │
//! │  ┌─────────┐  ┌────────┐ │
//! │  │  Posix  │  │ Custom │ │
//! │  │   FS    │  │   FS   │ │
//! │  └─────────┘  └────────┘ │
//! └──────────────────────────┘
//! ```
//!
//! # Features
//!
//! - `direct_io`: Enable `O_DIRECT` support on Linux (requires `libc`)

mod error;
mod fs;
mod options;
mod posix;

pub use error::{IoError, IoResult};
pub use fs::{
    FileSystem, FsDirectory, FsRandomAccessFile, FsRandomRwFile, FsSequentialFile, FsWritableFile,
};
pub use options::{
    ChecksumType, DEFAULT_PAGE_SIZE, DataVerificationInfo, DirFsyncOptions, DirFsyncReason,
    EnvOptions, FileOptions, FsAccessPattern, FsReadRequest, IoActivity, IoDebugContext,
    IoOptions, IoPriority, PreallocationStatus, Temperature, WriteLifeTimeHint,
};
pub use posix::PosixFileSystem;
