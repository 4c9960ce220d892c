//! Per-method translation of the five wrappers.

use std::path::Path;

use bytes::Bytes;
use proptest::prelude::*;
use strata_io::{DataVerificationInfo, EnvOptions, IoError, WriteLifeTimeHint};
use test_case::test_case;

use super::recording::{Behavior, Recorder, STUB_ALIGNMENT, StubFile};
use super::recording_env;
use crate::{
    AccessPattern, CompositeDirectory, CompositeRandomAccessFile, CompositeRandomRwFile,
    CompositeSequentialFile, CompositeWritableFile, Directory, Env, RandomAccessFile,
    RandomRwFile, ReadRequest, SequentialFile, WritableFile,
};

fn content(bytes: &[u8]) -> Behavior {
    Behavior {
        content: bytes.to_vec(),
        ..Behavior::default()
    }
}

fn addr(buf: &[u8]) -> u64 {
    buf.as_ptr() as usize as u64
}

// ============================================================================
// Sequential
// ============================================================================

#[test]
fn sequential_read_forwards_once_with_default_context() {
    let (env, rec) = recording_env(content(b"abcdef"));
    let mut file = env
        .new_sequential_file(Path::new("seq"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    let mut scratch = [0u8; 8];
    let n = file.read(4, &mut scratch).unwrap();

    assert_eq!(&scratch[..n], b"abcd");
    let calls = rec.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].op, "seq_read");
    assert_eq!(calls[0].args, vec![4, addr(&scratch)]);
    calls[0].assert_default_context();
}

#[test]
fn sequential_short_read_is_not_extended() {
    let (env, rec) = recording_env(content(b"xy"));
    let mut file = env
        .new_sequential_file(Path::new("seq"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    let mut scratch = [0u8; 8];
    let n = file.read(8, &mut scratch).unwrap();

    // One backend call, short result returned as is.
    assert_eq!(n, 2);
    assert_eq!(rec.ops(), vec!["seq_read"]);
}

#[test]
fn sequential_skip_carries_no_context() {
    let (env, rec) = recording_env(content(b"abcdef"));
    let mut file = env
        .new_sequential_file(Path::new("seq"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    file.skip(3).unwrap();
    let mut scratch = [0u8; 3];
    let n = file.read(3, &mut scratch).unwrap();

    assert_eq!(&scratch[..n], b"def");
    let calls = rec.calls();
    assert_eq!(calls[0].op, "skip");
    assert_eq!(calls[0].args, vec![3]);
    assert!(calls[0].context.is_none());
}

#[test]
fn sequential_positioned_read() {
    let (env, rec) = recording_env(content(b"0123456789"));
    let mut file = env
        .new_sequential_file(Path::new("seq"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    let mut scratch = [0u8; 4];
    let n = file.positioned_read(6, 4, &mut scratch).unwrap();

    assert_eq!(&scratch[..n], b"6789");
    let calls = rec.calls();
    assert_eq!(calls[0].op, "seq_positioned_read");
    assert_eq!(calls[0].args, vec![6, 4, addr(&scratch)]);
    calls[0].assert_default_context();
}

#[test]
fn capability_queries_pass_through() {
    let (env, rec) = recording_env(Behavior {
        direct_io: true,
        ..Behavior::default()
    });
    let options = EnvOptions::default();

    let mut seq = env.new_sequential_file(Path::new("a"), &options).unwrap();
    let random = env.new_random_access_file(Path::new("b"), &options).unwrap();
    let writable = env.new_writable_file(Path::new("c"), &options).unwrap();
    let rw = env.new_random_rw_file(Path::new("d"), &options).unwrap();
    rec.clear_calls();

    assert!(seq.use_direct_io());
    assert!(random.use_direct_io());
    assert!(writable.use_direct_io());
    assert!(rw.use_direct_io());
    assert_eq!(seq.required_buffer_alignment(), STUB_ALIGNMENT);
    assert_eq!(random.required_buffer_alignment(), STUB_ALIGNMENT);
    assert_eq!(writable.required_buffer_alignment(), STUB_ALIGNMENT);
    assert_eq!(rw.required_buffer_alignment(), STUB_ALIGNMENT);
    assert!(writable.is_sync_thread_safe());

    seq.invalidate_cache(10, 20).unwrap();
    let calls = rec.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].op, "invalidate_cache");
    assert_eq!(calls[0].args, vec![10, 20]);
}

// ============================================================================
// Random access
// ============================================================================

#[test]
fn random_read_forwards_offset_and_buffer() {
    let (env, rec) = recording_env(content(b"0123456789"));
    let file = env
        .new_random_access_file(Path::new("random"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    let mut scratch = [0u8; 3];
    let n = file.read(2, 3, &mut scratch).unwrap();

    assert_eq!(&scratch[..n], b"234");
    let calls = rec.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, vec![2, 3, addr(&scratch)]);
    calls[0].assert_default_context();
}

#[test]
fn multi_read_keeps_per_entry_status_at_each_index() {
    let (env, rec) = recording_env(Behavior {
        content: b"aaaabbbbcccc".to_vec(),
        failing_offsets: vec![4],
        ..Behavior::default()
    });
    let mut file = env
        .new_random_access_file(Path::new("random"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    let mut a = [0u8; 4];
    let mut b = [0u8; 4];
    let mut c = [0u8; 4];
    let (pa, pb, pc) = (addr(&a), addr(&b), addr(&c));
    let mut reqs = vec![
        ReadRequest::new(0, 4, &mut a),
        ReadRequest::new(4, 4, &mut b),
        ReadRequest::new(8, 4, &mut c),
    ];

    let status = file.multi_read(&mut reqs);

    assert!(status.is_ok());
    assert_eq!(reqs.len(), 3);
    assert!(reqs[0].status.is_ok());
    assert!(matches!(reqs[1].status, Err(IoError::Corruption(_))));
    assert!(reqs[2].status.is_ok());
    assert_eq!(reqs[0].result(), b"aaaa");
    assert_eq!(reqs[1].result(), b"");
    assert_eq!(reqs[2].result(), b"cccc");

    let calls = rec.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].op, "multi_read");
    assert_eq!(calls[0].args, vec![3, 0, 4, pa, 4, 4, pb, 8, 4, pc]);
    calls[0].assert_default_context();
}

#[test]
fn multi_read_aggregate_status_is_independent_of_entries() {
    let (env, _rec) = recording_env(Behavior {
        content: b"0123456789".to_vec(),
        fail_multi_read: true,
        ..Behavior::default()
    });
    let mut file = env
        .new_random_access_file(Path::new("random"), &EnvOptions::default())
        .unwrap();

    let mut a = [0u8; 2];
    let mut b = [0u8; 2];
    let mut reqs = vec![ReadRequest::new(0, 2, &mut a), ReadRequest::new(5, 2, &mut b)];

    let status = file.multi_read(&mut reqs);

    assert!(matches!(status, Err(IoError::Aborted(_))));
    assert!(reqs.iter().all(|r| r.status.is_ok()));
    assert_eq!(reqs[1].result(), b"56");
}

#[test]
fn multi_read_with_no_requests_still_forwards() {
    let (env, rec) = recording_env(Behavior::default());
    let mut file = env
        .new_random_access_file(Path::new("random"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    file.multi_read(&mut []).unwrap();

    let calls = rec.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, vec![0]);
}

#[test]
fn prefetch_forwards_with_context() {
    let (env, rec) = recording_env(Behavior::default());
    let mut file = env
        .new_random_access_file(Path::new("random"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    file.prefetch(4096, 8192).unwrap();

    let calls = rec.calls();
    assert_eq!(calls[0].op, "prefetch");
    assert_eq!(calls[0].args, vec![4096, 8192]);
    calls[0].assert_default_context();
}

#[test_case(AccessPattern::Normal, "Normal")]
#[test_case(AccessPattern::Random, "Random")]
#[test_case(AccessPattern::Sequential, "Sequential")]
#[test_case(AccessPattern::WillNeed, "WillNeed")]
#[test_case(AccessPattern::WontNeed, "WontNeed")]
fn hint_keeps_the_same_pattern(pattern: AccessPattern, expected: &str) {
    let (env, rec) = recording_env(Behavior::default());
    let mut file = env
        .new_random_access_file(Path::new("random"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    file.hint(pattern);

    let calls = rec.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].extra, expected.as_bytes());
}

#[test]
fn unique_id_is_returned_verbatim() {
    let (env, _rec) = recording_env(Behavior {
        unique_id: b"stub-id".to_vec(),
        ..Behavior::default()
    });
    let options = EnvOptions::default();
    let random = env.new_random_access_file(Path::new("r"), &options).unwrap();
    let writable = env.new_writable_file(Path::new("w"), &options).unwrap();
    let dir = env.new_directory(Path::new("d")).unwrap();

    let mut id = [0u8; 16];
    assert_eq!(random.unique_id(&mut id), 7);
    assert_eq!(&id[..7], b"stub-id");
    assert_eq!(writable.unique_id(&mut id), 7);
    assert_eq!(dir.unique_id(&mut id), 7);

    // Too small a buffer: the backend's 0 comes through.
    let mut small = [0u8; 4];
    assert_eq!(random.unique_id(&mut small), 0);
}

// ============================================================================
// Writable
// ============================================================================

#[test]
fn three_appends_then_close() {
    let (env, rec) = recording_env(Behavior::default());
    let mut file = env
        .new_writable_file(Path::new("000001.log"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    for _ in 0..3 {
        file.append(b"hello").unwrap();
    }
    file.close().unwrap();

    let calls = rec.calls();
    assert_eq!(rec.ops(), vec!["append", "append", "append", "close"]);
    for call in &calls[..3] {
        assert_eq!(call.data, b"hello");
    }
    for call in &calls {
        call.assert_default_context();
    }
}

#[test]
fn close_returns_the_backend_error() {
    let (env, rec) = recording_env(Behavior {
        fail_close: true,
        ..Behavior::default()
    });
    let mut file = env
        .new_writable_file(Path::new("w"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    let result = file.close();

    assert!(matches!(result, Err(IoError::Busy(_))));
    assert_eq!(rec.ops(), vec!["close"]);
}

#[test]
fn durability_calls_are_not_merged_or_reordered() {
    let (env, rec) = recording_env(Behavior::default());
    let mut file = env
        .new_writable_file(Path::new("w"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    file.append(b"a").unwrap();
    file.flush().unwrap();
    file.sync().unwrap();
    file.flush().unwrap();
    file.fsync().unwrap();
    file.range_sync(0, 4096).unwrap();

    assert_eq!(
        rec.ops(),
        vec!["append", "flush", "sync", "flush", "fsync", "range_sync"]
    );
    assert_eq!(rec.calls()[5].args, vec![0, 4096]);
}

#[test]
fn verification_info_is_forwarded() {
    let (env, rec) = recording_env(Behavior::default());
    let mut file = env
        .new_writable_file(Path::new("w"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();
    let info = DataVerificationInfo {
        checksum: Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]),
    };

    file.append_with_verification(b"block", &info).unwrap();
    file.positioned_append(b"page", 8192).unwrap();
    file.positioned_append_with_verification(b"page2", 12288, &info)
        .unwrap();

    let calls = rec.calls();
    assert_eq!(calls[0].op, "append_verified");
    assert_eq!(calls[0].data, b"block");
    assert_eq!(calls[0].extra, vec![0xde, 0xad, 0xbe, 0xef]);
    assert_eq!(calls[1].op, "positioned_append");
    assert_eq!(calls[1].args, vec![8192]);
    assert_eq!(calls[2].op, "positioned_append_verified");
    assert_eq!(calls[2].data, b"page2");
    assert_eq!(calls[2].args, vec![12288]);
    assert_eq!(calls[2].extra, vec![0xde, 0xad, 0xbe, 0xef]);
    for call in &calls {
        call.assert_default_context();
    }
}

#[test]
fn size_and_space_calls_forward_arguments() {
    let (env, rec) = recording_env(content(&[0u8; 42]));
    let mut file = env
        .new_writable_file(Path::new("w"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    file.truncate(17).unwrap();
    file.allocate(4096, 65536).unwrap();
    file.prepare_write(100, 200);
    assert_eq!(file.file_size(), 42);

    let calls = rec.calls();
    assert_eq!(rec.ops(), vec!["truncate", "allocate", "prepare_write", "file_size"]);
    assert_eq!(calls[0].args, vec![17]);
    assert_eq!(calls[1].args, vec![4096, 65536]);
    assert_eq!(calls[2].args, vec![100, 200]);
    for call in &calls {
        call.assert_default_context();
    }
}

#[test]
fn settings_are_not_cached_by_the_wrapper() {
    let rec = Recorder::new(Behavior::default());
    let mut file = CompositeWritableFile::new(Box::new(StubFile::open(&rec)));

    file.set_write_life_time_hint(WriteLifeTimeHint::Short);
    assert_eq!(file.write_life_time_hint(), WriteLifeTimeHint::Short);

    // A change made directly on the backend is visible through the wrapper.
    file.target_mut()
        .set_write_life_time_hint(WriteLifeTimeHint::Extreme);
    assert_eq!(file.write_life_time_hint(), WriteLifeTimeHint::Extreme);

    file.set_preallocation_block_size(1 << 20);
    file.prepare_write(0, 10);
    let status = file.preallocation_status();
    assert_eq!(status.block_size, 1 << 20);
    assert_eq!(status.last_allocated_block, 1);

    file.target_mut().set_preallocation_block_size(4096);
    assert_eq!(file.preallocation_status().block_size, 4096);
}

#[test]
fn target_access_does_not_create_a_second_owner() {
    let rec = Recorder::new(Behavior::default());
    let mut file = CompositeWritableFile::new(Box::new(StubFile::open(&rec)));

    file.target_mut().set_preallocation_block_size(1);
    file.append(b"x").unwrap();
    assert_eq!(rec.opened(), 1);
    assert_eq!(rec.released(), 0);

    drop(file);
    assert_eq!(rec.released(), 1);
}

#[test]
fn wrappers_are_debug_formatted() {
    let rec = Recorder::new(Behavior {
        direct_io: true,
        ..Behavior::default()
    });
    let stub = || Box::new(StubFile::open(&rec));

    let seq = format!("{:?}", CompositeSequentialFile::new(stub()));
    let random = format!("{:?}", CompositeRandomAccessFile::new(stub()));
    let writable = format!("{:?}", CompositeWritableFile::new(stub()));
    let rw = format!("{:?}", CompositeRandomRwFile::new(stub()));
    let dir = format!("{:?}", CompositeDirectory::new(stub()));

    assert!(seq.starts_with("CompositeSequentialFile"));
    assert!(random.starts_with("CompositeRandomAccessFile"));
    assert!(writable.starts_with("CompositeWritableFile"));
    assert!(rw.starts_with("CompositeRandomRwFile"));
    assert!(dir.starts_with("CompositeDirectory"));
    for formatted in [&seq, &random, &writable, &rw] {
        assert!(formatted.contains("direct_io: true"), "{formatted}");
    }
    assert_eq!(rec.opened(), 5);
    assert_eq!(rec.released(), 5);
}

#[test]
fn context_mutations_never_leak_between_calls() {
    let (env, rec) = recording_env(Behavior::default());
    let mut file = env
        .new_writable_file(Path::new("w"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    // The stub annotates every debug context it sees.
    for _ in 0..5 {
        file.append(b"x").unwrap();
        file.sync().unwrap();
    }

    let calls = rec.calls();
    assert_eq!(calls.len(), 10);
    for call in &calls {
        call.assert_default_context();
    }
}

// ============================================================================
// Random read/write
// ============================================================================

#[test]
fn random_rw_forwards_every_call_in_order() {
    let (env, rec) = recording_env(content(b"0123456789"));
    let mut file = env
        .new_random_rw_file(Path::new("rw"), &EnvOptions::default())
        .unwrap();
    rec.clear_calls();

    file.write(3, b"abc").unwrap();
    let mut scratch = [0u8; 4];
    let n = file.read(1, 4, &mut scratch).unwrap();
    file.flush().unwrap();
    file.sync().unwrap();
    file.fsync().unwrap();
    file.close().unwrap();

    assert_eq!(&scratch[..n], b"1234");
    assert_eq!(
        rec.ops(),
        vec!["rw_write", "rw_read", "flush", "sync", "fsync", "close"]
    );
    let calls = rec.calls();
    assert_eq!(calls[0].args, vec![3]);
    assert_eq!(calls[0].data, b"abc");
    assert_eq!(calls[1].args, vec![1, 4, addr(&scratch)]);
    for call in &calls {
        call.assert_default_context();
    }
}

// ============================================================================
// Directory
// ============================================================================

#[test]
fn directory_fsync_uses_default_dir_options() {
    let (env, rec) = recording_env(Behavior::default());
    let mut dir = env.new_directory(Path::new("db")).unwrap();
    rec.clear_calls();

    dir.fsync().unwrap();

    let calls = rec.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].op, "dir_fsync");
    assert_eq!(calls[0].extra, b"Default");
    calls[0].assert_default_context();
}

// ============================================================================
// Batched-read integrity
// ============================================================================

proptest! {
    /// Property: a batch of N requests comes back with N entries in the same
    /// order, each entry's status matching whether the backend failed it.
    #[test]
    fn prop_multi_read_preserves_index_correspondence(
        offsets in proptest::collection::vec(0u64..64, 0..24),
        fail_mask in proptest::collection::vec(any::<bool>(), 24),
        aggregate_fails in any::<bool>(),
    ) {
        let failing: Vec<u64> = offsets
            .iter()
            .zip(fail_mask.iter())
            .filter(|(_, fail)| **fail)
            .map(|(offset, _)| *offset)
            .collect();
        let data: Vec<u8> = (0..64u8).collect();
        let (env, _rec) = recording_env(Behavior {
            content: data.clone(),
            failing_offsets: failing.clone(),
            fail_multi_read: aggregate_fails,
            ..Behavior::default()
        });
        let mut file = env
            .new_random_access_file(Path::new("random"), &EnvOptions::default())
            .unwrap();

        let mut buffers = vec![[0u8; 4]; offsets.len()];
        let mut reqs: Vec<ReadRequest<'_>> = offsets
            .iter()
            .zip(buffers.iter_mut())
            .map(|(&offset, buf)| ReadRequest::new(offset, 4, buf))
            .collect();

        let status = file.multi_read(&mut reqs);

        prop_assert_eq!(status.is_err(), aggregate_fails);
        prop_assert_eq!(reqs.len(), offsets.len());
        for (req, &offset) in reqs.iter().zip(offsets.iter()) {
            prop_assert_eq!(req.offset, offset);
            if failing.contains(&offset) {
                prop_assert!(req.status.is_err());
                prop_assert_eq!(req.result_len, 0);
            } else {
                prop_assert!(req.status.is_ok());
                let start = offset as usize;
                let end = (start + 4).min(data.len());
                prop_assert_eq!(req.result(), &data[start..end]);
            }
        }
    }
}
