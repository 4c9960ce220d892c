//! Legacy environment on top of a [`FileSystem`].
//!
//! [`CompositeEnv`] implements the legacy [`Env`] file operations by calling
//! the matching file system method with expanded options and, on success,
//! moving the produced handle into the matching wrapper. Backend errors are
//! returned exactly as produced.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use strata_io::{
    EnvOptions, FileOptions, FileSystem, IoDebugContext, IoOptions, IoResult, PosixFileSystem,
};

use crate::legacy::{
    Directory, Env, RandomAccessFile, RandomRwFile, SequentialFile, WritableFile,
};
use crate::wrappers::{
    CompositeDirectory, CompositeRandomAccessFile, CompositeRandomRwFile,
    CompositeSequentialFile, CompositeWritableFile,
};

/// Legacy environment backed by a shared file system.
///
/// # Thread Safety
///
/// `CompositeEnv` holds no mutable state of its own; concurrent use is safe
/// as long as the file system is. Handles it returns are independent.
#[derive(Clone)]
pub struct CompositeEnv {
    file_system: Arc<dyn FileSystem>,
}

impl CompositeEnv {
    pub fn new(file_system: Arc<dyn FileSystem>) -> Self {
        Self { file_system }
    }

    /// Creates an environment over [`PosixFileSystem`].
    pub fn posix() -> Self {
        Self::new(Arc::new(PosixFileSystem::new()))
    }

    /// Returns the wrapped file system.
    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.file_system
    }
}

impl std::fmt::Debug for CompositeEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeEnv")
            .field("file_system", &self.file_system.name())
            .finish()
    }
}

/// Logs the outcome of a backend open and hands it back untouched.
fn traced<T>(kind: &'static str, fname: &Path, opened: IoResult<T>) -> IoResult<T> {
    match &opened {
        Ok(_) => tracing::debug!(path = %fname.display(), kind, "opened file"),
        Err(e) => tracing::debug!(path = %fname.display(), kind, error = %e, "open failed"),
    }
    opened
}

impl Env for CompositeEnv {
    fn new_sequential_file(
        &self,
        fname: &Path,
        options: &EnvOptions,
    ) -> IoResult<Box<dyn SequentialFile>> {
        let mut dbg = IoDebugContext::default();
        let file = traced(
            "sequential",
            fname,
            self.file_system
                .new_sequential_file(fname, &FileOptions::from(options), &mut dbg),
        )?;
        Ok(Box::new(CompositeSequentialFile::new(file)))
    }

    fn new_random_access_file(
        &self,
        fname: &Path,
        options: &EnvOptions,
    ) -> IoResult<Box<dyn RandomAccessFile>> {
        let mut dbg = IoDebugContext::default();
        let file = traced(
            "random_access",
            fname,
            self.file_system
                .new_random_access_file(fname, &FileOptions::from(options), &mut dbg),
        )?;
        Ok(Box::new(CompositeRandomAccessFile::new(file)))
    }

    fn new_writable_file(
        &self,
        fname: &Path,
        options: &EnvOptions,
    ) -> IoResult<Box<dyn WritableFile>> {
        let mut dbg = IoDebugContext::default();
        let file = traced(
            "writable",
            fname,
            self.file_system
                .new_writable_file(fname, &FileOptions::from(options), &mut dbg),
        )?;
        Ok(Box::new(CompositeWritableFile::new(file)))
    }

    fn reopen_writable_file(
        &self,
        fname: &Path,
        options: &EnvOptions,
    ) -> IoResult<Box<dyn WritableFile>> {
        let mut dbg = IoDebugContext::default();
        let file = traced(
            "writable",
            fname,
            self.file_system
                .reopen_writable_file(fname, &FileOptions::from(options), &mut dbg),
        )?;
        Ok(Box::new(CompositeWritableFile::new(file)))
    }

    fn reuse_writable_file(
        &self,
        fname: &Path,
        old_fname: &Path,
        options: &EnvOptions,
    ) -> IoResult<Box<dyn WritableFile>> {
        let mut dbg = IoDebugContext::default();
        let file = traced(
            "writable",
            fname,
            self.file_system.reuse_writable_file(
                fname,
                old_fname,
                &FileOptions::from(options),
                &mut dbg,
            ),
        )?;
        Ok(Box::new(CompositeWritableFile::new(file)))
    }

    fn new_random_rw_file(
        &self,
        fname: &Path,
        options: &EnvOptions,
    ) -> IoResult<Box<dyn RandomRwFile>> {
        let mut dbg = IoDebugContext::default();
        let file = traced(
            "random_rw",
            fname,
            self.file_system
                .new_random_rw_file(fname, &FileOptions::from(options), &mut dbg),
        )?;
        Ok(Box::new(CompositeRandomRwFile::new(file)))
    }

    fn new_directory(&self, name: &Path) -> IoResult<Box<dyn Directory>> {
        let io_opts = IoOptions::default();
        let mut dbg = IoDebugContext::default();
        let dir = traced(
            "directory",
            name,
            self.file_system.new_directory(name, &io_opts, &mut dbg),
        )?;
        Ok(Box::new(CompositeDirectory::new(dir)))
    }

    fn file_exists(&self, fname: &Path) -> IoResult<()> {
        self.file_system
            .file_exists(fname, &IoOptions::default(), &mut IoDebugContext::default())
    }

    fn get_children(&self, dir: &Path) -> IoResult<Vec<String>> {
        self.file_system
            .get_children(dir, &IoOptions::default(), &mut IoDebugContext::default())
    }

    fn delete_file(&self, fname: &Path) -> IoResult<()> {
        self.file_system
            .delete_file(fname, &IoOptions::default(), &mut IoDebugContext::default())
    }

    fn create_dir(&self, dirname: &Path) -> IoResult<()> {
        self.file_system
            .create_dir(dirname, &IoOptions::default(), &mut IoDebugContext::default())
    }

    fn create_dir_if_missing(&self, dirname: &Path) -> IoResult<()> {
        self.file_system.create_dir_if_missing(
            dirname,
            &IoOptions::default(),
            &mut IoDebugContext::default(),
        )
    }

    fn delete_dir(&self, dirname: &Path) -> IoResult<()> {
        self.file_system
            .delete_dir(dirname, &IoOptions::default(), &mut IoDebugContext::default())
    }

    fn get_file_size(&self, fname: &Path) -> IoResult<u64> {
        self.file_system
            .get_file_size(fname, &IoOptions::default(), &mut IoDebugContext::default())
    }

    fn rename_file(&self, src: &Path, target: &Path) -> IoResult<()> {
        self.file_system.rename_file(
            src,
            target,
            &IoOptions::default(),
            &mut IoDebugContext::default(),
        )
    }

    fn link_file(&self, src: &Path, target: &Path) -> IoResult<()> {
        self.file_system.link_file(
            src,
            target,
            &IoOptions::default(),
            &mut IoDebugContext::default(),
        )
    }

    fn is_directory(&self, path: &Path) -> IoResult<bool> {
        self.file_system
            .is_directory(path, &IoOptions::default(), &mut IoDebugContext::default())
    }

    fn get_absolute_path(&self, db_path: &Path) -> IoResult<PathBuf> {
        self.file_system
            .get_absolute_path(db_path, &IoOptions::default(), &mut IoDebugContext::default())
    }
}
