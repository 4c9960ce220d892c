//! Unit tests for strata-env
//!
//! The adapter is exercised against [`recording::RecordingFileSystem`], which
//! logs every call it receives.

mod wrappers;

use std::sync::Arc;

use crate::CompositeEnv;
use recording::{Behavior, RecordingFileSystem, Recorder};

/// Builds an environment over a fresh recording file system.
fn recording_env(behavior: Behavior) -> (CompositeEnv, Recorder) {
    let rec = Recorder::new(behavior);
    let env = CompositeEnv::new(Arc::new(RecordingFileSystem::new(rec.clone())));
    (env, rec)
}
