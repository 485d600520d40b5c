//! Deterministic replay of an event log into text.

use hav_log::{Event, Log};

/// Replays `log` and returns the text it represents.
///
/// Total: malformed legacy events (a multi-character `Insert`, a `Backspace`
/// at offset zero, a `Delete` past the end) are skipped. Offsets count Unicode
/// code points. An `Input` event replaces everything replayed before it.
///
/// ```rust
/// use hav_core::reconstruct;
/// use hav_log::{Event, Log};
///
/// let log = Log::new(vec![
///     Event::Insert { ch: "H".into(), cursor: 0, time: 1 },
///     Event::Insert { ch: "i".into(), cursor: 1, time: 2 },
/// ]);
/// assert_eq!(reconstruct(&log), "Hi");
/// ```
pub fn reconstruct(log: &Log) -> String {
    let mut text: Vec<char> = Vec::new();
    for event in log {
        apply(&mut text, event);
    }
    text.into_iter().collect()
}

fn apply(text: &mut Vec<char>, event: &Event) {
    match event {
        Event::Input { new_value, .. } => {
            text.clear();
            text.extend(new_value.chars());
        }
        Event::Insert { ch, cursor, .. } => {
            let mut chars = ch.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                // Past-the-end inserts append.
                let at = (*cursor as usize).min(text.len());
                text.insert(at, c);
            }
        }
        Event::Backspace { cursor, .. } => {
            let at = *cursor as usize;
            if at > 0 && at <= text.len() {
                text.remove(at - 1);
            }
        }
        Event::Delete { cursor, .. } => {
            let at = *cursor as usize;
            if at < text.len() {
                text.remove(at);
            }
        }
        Event::Selection { .. } | Event::KeyDown { .. } | Event::KeyUp { .. } => {}
    }
}
