use hav_log::{encode, Event, Log, LogReader, ReadMode, TlvError};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_bytes(dir: &TempDir, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join("session.havl");
    fs::write(&path, bytes).unwrap();
    path
}

fn two_events() -> Log {
    Log::new(vec![
        Event::Insert { ch: "a".into(), cursor: 0, time: 1 },
        Event::Insert { ch: "b".into(), cursor: 1, time: 2 },
    ])
}

#[test]
fn test_permissive_mode_truncation() {
    let temp_dir = TempDir::new().unwrap();
    let bytes = encode(&two_events()).unwrap();
    let path = write_bytes(&temp_dir, &bytes[..bytes.len() - 5]);

    // Permissive mode keeps the complete record and drops the partial one
    let log = LogReader::open(&path, ReadMode::Permissive)
        .unwrap()
        .read_all()
        .unwrap();
    assert_eq!(log.events(), &two_events().events()[..1]);

    // Strict mode should error
    let mut reader = LogReader::open(&path, ReadMode::Strict).unwrap();
    assert!(reader.read_event().unwrap().is_some());
    match reader.read_event().unwrap_err() {
        TlvError::Truncated { offset, .. } => assert_eq!(offset, 18),
        other => panic!("expected truncation, got {other}"),
    }
}

#[test]
fn test_truncated_header() {
    let temp_dir = TempDir::new().unwrap();
    let mut bytes = encode(&two_events()).unwrap();
    bytes.truncate(18 + 2);
    let path = write_bytes(&temp_dir, &bytes);

    let log = LogReader::open(&path, ReadMode::Permissive)
        .unwrap()
        .read_all()
        .unwrap();
    assert_eq!(log.len(), 1);

    let err = LogReader::open(&path, ReadMode::Strict)
        .unwrap()
        .read_all()
        .unwrap_err();
    assert!(matches!(err, TlvError::Truncated { offset: 18, needed: 3, available: 2 }));
}

#[test]
fn test_unknown_type_is_fatal_in_both_modes() {
    let temp_dir = TempDir::new().unwrap();
    let mut bytes = encode(&two_events()).unwrap();
    bytes[18] = 0x09;
    let path = write_bytes(&temp_dir, &bytes);

    for mode in [ReadMode::Strict, ReadMode::Permissive] {
        let err = LogReader::open(&path, mode).unwrap().read_all().unwrap_err();
        assert!(
            matches!(err, TlvError::UnknownType { offset: 18, type_code: 0x09 }),
            "{mode:?}: {err}"
        );
    }
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        (".{0,8}", ".{0,8}", any::<u32>(), any::<u32>(), any::<u32>(), any::<u64>()).prop_map(
            |(old_value, new_value, selection_start, selection_end, cursor, time)| Event::Input {
                old_value,
                new_value,
                selection_start,
                selection_end,
                cursor,
                time,
            }
        ),
        (".{0,1}", any::<u32>(), any::<u64>())
            .prop_map(|(ch, cursor, time)| Event::Insert { ch, cursor, time }),
        (any::<u32>(), any::<u64>()).prop_map(|(cursor, time)| Event::Backspace { cursor, time }),
        (any::<u32>(), any::<u64>()).prop_map(|(cursor, time)| Event::Delete { cursor, time }),
        (any::<u32>(), any::<u32>(), any::<u32>(), any::<u64>()).prop_map(
            |(cursor, selection_start, selection_end, time)| Event::Selection {
                cursor,
                selection_start,
                selection_end,
                time,
            }
        ),
        ("[a-zA-Z]{1,10}", any::<u64>()).prop_map(|(key, time)| Event::KeyDown { key, time }),
        ("[a-zA-Z]{1,10}", any::<u64>()).prop_map(|(key, time)| Event::KeyUp { key, time }),
    ]
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(events in prop::collection::vec(arb_event(), 0..32)) {
        let log = Log::new(events);
        let bytes = encode(&log).unwrap();
        prop_assert_eq!(hav_log::decode(&bytes).unwrap(), log.clone());

        let streamed = LogReader::new(&bytes[..], ReadMode::Strict).read_all().unwrap();
        prop_assert_eq!(streamed, log);
    }

    #[test]
    fn prop_every_strict_prefix_is_rejected_or_shorter(
        events in prop::collection::vec(arb_event(), 1..8),
        cut in 1usize..64,
    ) {
        let bytes = encode(&Log::new(events)).unwrap();
        let cut = cut.min(bytes.len());
        let prefix = &bytes[..bytes.len() - cut];
        if let Ok(log) = hav_log::decode(prefix) {
            // Only a cut on a record boundary decodes cleanly.
            prop_assert_eq!(encode(&log).unwrap(), prefix.to_vec());
        }
    }
}
