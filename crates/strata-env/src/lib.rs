//! # strata-env: Legacy Environment API over the Strata File System
//!
//! Storage code written against the legacy per-file [`Env`] API keeps
//! working when the storage backend implements the granular
//! [`FileSystem`](strata_io::FileSystem) interface instead. [`CompositeEnv`]
//! opens files through the file system and hands back wrappers that translate
//! every legacy call into exactly one backend call with default per-call
//! context.
//!
//! # Example
//!
//! ```
//! use strata_env::{CompositeEnv, Env, SequentialFile, WritableFile};
//! use strata_io::EnvOptions;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("example.log");
//! let env = CompositeEnv::posix();
//! let options = EnvOptions::default();
//!
//! let mut file = env.new_writable_file(&path, &options).unwrap();
//! file.append(b"hello").unwrap();
//! file.close().unwrap();
//!
//! let mut file = env.new_sequential_file(&path, &options).unwrap();
//! let mut scratch = [0u8; 16];
//! let n = file.read(16, &mut scratch).unwrap();
//! assert_eq!(&scratch[..n], b"hello");
//! ```

mod composite;
pub mod config;
mod error;
mod legacy;
mod wrappers;

pub use composite::CompositeEnv;
pub use config::OptionsLoader;
pub use error::ConfigError;
pub use legacy::{
    AccessPattern, Directory, Env, RandomAccessFile, RandomRwFile, ReadRequest, SequentialFile,
    WritableFile,
};
pub use wrappers::{
    CompositeDirectory, CompositeRandomAccessFile, CompositeRandomRwFile,
    CompositeSequentialFile, CompositeWritableFile,
};

#[cfg(test)]
mod tests;
