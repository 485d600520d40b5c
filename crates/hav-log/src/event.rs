use serde::{Deserialize, Serialize};

use crate::frame::EventKind;

/// A single captured edit event.
///
/// `time` is milliseconds since the Unix epoch. Cursor and selection offsets
/// count Unicode code points, not bytes.
///
/// The JSON form carries a `type` discriminator and camelCase fields:
///
/// ```rust
/// use hav_log::Event;
///
/// let event: Event = serde_json::from_str(r#"{"type":"insert","char":"H","cursor":0,"time":5}"#)?;
/// assert_eq!(event, Event::Insert { ch: "H".into(), cursor: 0, time: 5 });
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Event {
    /// Authoritative snapshot: `new_value` replaces the entire working text.
    Input {
        /// Text before the edit.
        old_value: String,
        /// Text after the edit.
        new_value: String,
        /// Selection start after the edit.
        selection_start: u32,
        /// Selection end after the edit.
        selection_end: u32,
        /// Cursor position after the edit.
        cursor: u32,
        /// Event time in milliseconds.
        time: u64,
    },
    /// Legacy: insert one code point at `cursor`.
    Insert {
        /// Inserted character; anything other than one code point is ignored on replay.
        #[serde(rename = "char")]
        ch: String,
        /// Insertion offset.
        cursor: u32,
        /// Event time in milliseconds.
        time: u64,
    },
    /// Legacy: delete the code point before `cursor`.
    Backspace {
        /// Cursor position when the key was pressed.
        cursor: u32,
        /// Event time in milliseconds.
        time: u64,
    },
    /// Legacy: delete the code point at `cursor`.
    Delete {
        /// Cursor position when the key was pressed.
        cursor: u32,
        /// Event time in milliseconds.
        time: u64,
    },
    /// Selection change; no effect on text.
    Selection {
        /// Cursor position.
        cursor: u32,
        /// Selection start.
        selection_start: u32,
        /// Selection end.
        selection_end: u32,
        /// Event time in milliseconds.
        time: u64,
    },
    /// Key pressed; no effect on text.
    #[serde(rename = "keydown")]
    KeyDown {
        /// Key name as reported by the capturing editor.
        key: String,
        /// Event time in milliseconds.
        time: u64,
    },
    /// Key released; no effect on text.
    #[serde(rename = "keyup")]
    KeyUp {
        /// Key name as reported by the capturing editor.
        key: String,
        /// Event time in milliseconds.
        time: u64,
    },
}

impl Event {
    /// Event time in milliseconds since the epoch.
    pub fn time(&self) -> u64 {
        match self {
            Event::Input { time, .. }
            | Event::Insert { time, .. }
            | Event::Backspace { time, .. }
            | Event::Delete { time, .. }
            | Event::Selection { time, .. }
            | Event::KeyDown { time, .. }
            | Event::KeyUp { time, .. } => *time,
        }
    }

    /// Discriminant of this event, which is also its TLV type code.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Input { .. } => EventKind::Input,
            Event::Insert { .. } => EventKind::Insert,
            Event::Backspace { .. } => EventKind::Backspace,
            Event::Delete { .. } => EventKind::Delete,
            Event::Selection { .. } => EventKind::Selection,
            Event::KeyDown { .. } => EventKind::KeyDown,
            Event::KeyUp { .. } => EventKind::KeyUp,
        }
    }

    /// True for `KeyDown`/`KeyUp`.
    pub fn is_key_event(&self) -> bool {
        matches!(self, Event::KeyDown { .. } | Event::KeyUp { .. })
    }

    /// True for the per-keystroke editing events (`Insert`, `Backspace`, `Delete`).
    pub fn is_legacy_edit(&self) -> bool {
        matches!(
            self,
            Event::Insert { .. } | Event::Backspace { .. } | Event::Delete { .. }
        )
    }
}

/// Ordered, immutable sequence of events. Array order is replay order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Log(Vec<Event>);

impl Log {
    /// Wraps captured events.
    pub fn new(events: Vec<Event>) -> Self {
        Self(events)
    }

    /// Events in replay order.
    pub fn events(&self) -> &[Event] {
        &self.0
    }

    /// Iterates events in replay order.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.0.iter()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no events were captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unwraps the event vector.
    pub fn into_events(self) -> Vec<Event> {
        self.0
    }
}

impl From<Vec<Event>> for Log {
    fn from(events: Vec<Event>) -> Self {
        Self(events)
    }
}

impl FromIterator<Event> for Log {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Log {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_uses_type_tag_and_camel_case() {
        let event = Event::Input {
            old_value: "H".into(),
            new_value: "Hi".into(),
            selection_start: 2,
            selection_end: 2,
            cursor: 2,
            time: 10,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "input",
                "oldValue": "H",
                "newValue": "Hi",
                "selectionStart": 2,
                "selectionEnd": 2,
                "cursor": 2,
                "time": 10
            })
        );

        let key: Event = serde_json::from_value(json!({"type": "keyup", "key": "a", "time": 3})).unwrap();
        assert_eq!(key, Event::KeyUp { key: "a".into(), time: 3 });
    }

    #[test]
    fn unknown_json_type_is_rejected() {
        let result: Result<Event, _> =
            serde_json::from_value(json!({"type": "diff", "time": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn classification_helpers() {
        let down = Event::KeyDown { key: "a".into(), time: 1 };
        let bs = Event::Backspace { cursor: 1, time: 2 };
        assert!(down.is_key_event() && !down.is_legacy_edit());
        assert!(bs.is_legacy_edit() && !bs.is_key_event());
        assert_eq!(bs.time(), 2);
        assert_eq!(bs.kind(), EventKind::Backspace);
    }

    #[test]
    fn log_serializes_as_plain_array() {
        let log: Log = vec![Event::Delete { cursor: 0, time: 1 }].into();
        assert_eq!(
            serde_json::to_value(&log).unwrap(),
            json!([{"type": "delete", "cursor": 0, "time": 1}])
        );
    }
}
