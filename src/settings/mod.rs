//! Settings store adapter
//!
//! The reader shares one flat key-value settings record with other surfaces (a settings
//! popup, a second reader window). This module defines that record, the typed partial
//! update used to write it, and the feed of `(field, value)` changes made by others.
//!
//! ## Record keys
//!
//! | key          | type                                          |
//! |--------------|-----------------------------------------------|
//! | `wpm`        | integer, 100-1000                             |
//! | `textSize`   | integer, 0-5                                  |
//! | `theme`      | `"dark"` or `"light"`                         |
//! | `orpColor`   | `"#RRGGBB"`                                   |
//! | `stripChars` | `{ punctuation, brackets, quotes }` booleans  |
//!
//! Missing keys take their default. A malformed value falls back to the default for that
//! key only.

pub mod file;
pub mod memory;

pub use file::FileSettingsStore;
pub use memory::MemorySettingsStore;

use crate::engine::config::{
    Config, HighlightColor, Theme, DEFAULT_TEXT_SIZE_LEVEL, DEFAULT_WPM, MAX_TEXT_SIZE_LEVEL,
    WPM_RANGE,
};
use crate::engine::SettingsError;
use crate::reading::StripOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::warn;

/// The persisted record as stored: a flat JSON object.
pub type SettingsRecord = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingField {
    Wpm,
    TextSize,
    Theme,
    HighlightColor,
    StripOptions,
}

impl SettingField {
    pub const ALL: [SettingField; 5] = [
        SettingField::Wpm,
        SettingField::TextSize,
        SettingField::Theme,
        SettingField::HighlightColor,
        SettingField::StripOptions,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SettingField::Wpm => "wpm",
            SettingField::TextSize => "textSize",
            SettingField::Theme => "theme",
            SettingField::HighlightColor => "orpColor",
            SettingField::StripOptions => "stripChars",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// One externally made modification. `value` is `Null` when the key was removed.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingChange {
    pub field: SettingField,
    pub value: Value,
}

/// A partial update: only the `Some` fields are written, the rest keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(rename = "wpm", skip_serializing_if = "Option::is_none")]
    pub wpm: Option<u32>,
    #[serde(rename = "textSize", skip_serializing_if = "Option::is_none")]
    pub text_size_level: Option<usize>,
    #[serde(rename = "theme", skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(rename = "orpColor", skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<HighlightColor>,
    #[serde(rename = "stripChars", skip_serializing_if = "Option::is_none")]
    pub strip: Option<StripOptions>,
}

impl SettingsPatch {
    pub fn wpm(wpm: u32) -> Self {
        Self {
            wpm: Some(wpm),
            ..Self::default()
        }
    }

    pub fn text_size_level(level: usize) -> Self {
        Self {
            text_size_level: Some(level),
            ..Self::default()
        }
    }

    pub fn theme(theme: Theme) -> Self {
        Self {
            theme: Some(theme),
            ..Self::default()
        }
    }

    pub fn highlight_color(color: HighlightColor) -> Self {
        Self {
            highlight_color: Some(color),
            ..Self::default()
        }
    }

    pub fn strip(strip: StripOptions) -> Self {
        Self {
            strip: Some(strip),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The supplied fields as record entries.
    pub fn to_record(&self) -> Result<SettingsRecord, SettingsError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(SettingsRecord::new()),
        }
    }
}

/// Overlays `patch` onto `record`, returning the entries whose value actually changed.
pub fn merge_into(record: &mut SettingsRecord, patch: &SettingsRecord) -> Vec<SettingChange> {
    let mut changes = Vec::new();
    for (key, value) in patch {
        if record.get(key) == Some(value) {
            continue;
        }
        record.insert(key.clone(), value.clone());
        if let Some(field) = SettingField::from_key(key) {
            changes.push(SettingChange {
                field,
                value: value.clone(),
            });
        }
    }
    changes
}

/// Field-by-field comparison of two records.
pub fn diff_records(old: &SettingsRecord, new: &SettingsRecord) -> Vec<SettingChange> {
    SettingField::ALL
        .into_iter()
        .filter(|field| old.get(field.key()) != new.get(field.key()))
        .map(|field| SettingChange {
            field,
            value: new.get(field.key()).cloned().unwrap_or(Value::Null),
        })
        .collect()
}

/// Builds a configuration from a stored record, defaulting missing or malformed keys.
pub fn config_from_record(record: &SettingsRecord) -> Config {
    let mut config = Config::default();
    for field in SettingField::ALL {
        if let Some(value) = record.get(field.key()) {
            apply_value(&mut config, field, value);
        }
    }
    config
}

/// Writes one record value into `config`.
///
/// Numbers outside their range are clamped; values of the wrong shape reset the field to
/// its default. Returns `false` when the value was malformed.
pub fn apply_value(config: &mut Config, field: SettingField, value: &Value) -> bool {
    let well_formed = match field {
        SettingField::Wpm => match value.as_f64() {
            Some(wpm) => {
                let clamped = wpm
                    .round()
                    .clamp(f64::from(*WPM_RANGE.start()), f64::from(*WPM_RANGE.end()));
                config.wpm = clamped as u32;
                true
            }
            None => {
                config.wpm = DEFAULT_WPM;
                false
            }
        },
        SettingField::TextSize => match value.as_f64() {
            Some(level) => {
                let clamped = level.floor().clamp(0.0, MAX_TEXT_SIZE_LEVEL as f64);
                config.text_size_level = clamped as usize;
                true
            }
            None => {
                config.text_size_level = DEFAULT_TEXT_SIZE_LEVEL;
                false
            }
        },
        SettingField::Theme => decode(value, &mut config.theme),
        SettingField::HighlightColor => decode(value, &mut config.highlight_color),
        SettingField::StripOptions => decode(value, &mut config.strip),
    };

    if !well_formed {
        warn!(key = field.key(), %value, "malformed setting, using default");
    }
    well_formed
}

fn decode<T>(value: &Value, slot: &mut T) -> bool
where
    T: for<'de> Deserialize<'de> + Default,
{
    match T::deserialize(value) {
        Ok(decoded) => {
            *slot = decoded;
            true
        }
        Err(_) => {
            *slot = T::default();
            false
        }
    }
}

/// Receiving end of a store's change notifications.
///
/// Lazily yields changes made through other surfaces, in the order they happened. A feed
/// belongs to one subscriber and cannot be rewound.
#[derive(Debug)]
pub struct ChangeFeed {
    rx: Receiver<SettingChange>,
}

impl ChangeFeed {
    pub(crate) fn channel() -> (Sender<SettingChange>, ChangeFeed) {
        let (tx, rx) = mpsc::channel();
        (tx, ChangeFeed { rx })
    }

    /// Changes delivered so far and not yet taken. Never blocks.
    pub fn pending(&self) -> impl Iterator<Item = SettingChange> + '_ {
        self.rx.try_iter()
    }
}

/// Sends `changes` to every live subscriber, dropping the ones whose feed is gone.
pub(crate) fn broadcast(subscribers: &mut Vec<Sender<SettingChange>>, changes: &[SettingChange]) {
    subscribers.retain(|tx| changes.iter().all(|change| tx.send(change.clone()).is_ok()));
}

/// Persistence boundary for the settings record.
pub trait SettingsStore {
    /// The stored configuration, with defaults for anything unset or malformed.
    fn load(&self) -> Config;

    /// Merges the supplied fields into the stored record.
    fn save(&mut self, patch: &SettingsPatch) -> Result<(), SettingsError>;

    /// A new feed of changes made by other surfaces from now on.
    fn subscribe(&mut self) -> ChangeFeed;

    /// Gives the store a chance to notice modifications made behind its back.
    fn poll(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> SettingsRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_field_keys_round_trip() {
        for field in SettingField::ALL {
            assert_eq!(SettingField::from_key(field.key()), Some(field));
        }
        assert_eq!(SettingField::from_key("showSettings"), None);
    }

    #[test]
    fn test_patch_only_serializes_supplied_fields() {
        let patch = SettingsPatch::wpm(450);
        assert_eq!(patch.to_record().unwrap(), record(json!({ "wpm": 450 })));
    }

    #[test]
    fn test_patch_uses_record_key_names() {
        let patch = SettingsPatch {
            text_size_level: Some(2),
            highlight_color: HighlightColor::parse("#00ff00"),
            strip: Some(StripOptions {
                punctuation: true,
                ..StripOptions::default()
            }),
            ..SettingsPatch::default()
        };
        assert_eq!(
            patch.to_record().unwrap(),
            record(json!({
                "textSize": 2,
                "orpColor": "#00ff00",
                "stripChars": { "punctuation": true, "brackets": false, "quotes": false }
            }))
        );
    }

    #[test]
    fn test_config_from_empty_record_is_default() {
        assert_eq!(config_from_record(&SettingsRecord::new()), Config::default());
    }

    #[test]
    fn test_config_from_full_record() {
        let config = config_from_record(&record(json!({
            "wpm": 450,
            "textSize": 1,
            "theme": "light",
            "orpColor": "#123abc",
            "stripChars": { "punctuation": false, "brackets": true, "quotes": true }
        })));
        assert_eq!(config.wpm, 450);
        assert_eq!(config.text_size_level, 1);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.highlight_color.as_str(), "#123abc");
        assert!(config.strip.brackets && config.strip.quotes && !config.strip.punctuation);
    }

    #[test]
    fn test_malformed_fields_fall_back_individually() {
        let config = config_from_record(&record(json!({
            "wpm": "fast",
            "textSize": 2,
            "theme": 7,
            "orpColor": "blue",
            "stripChars": true
        })));
        assert_eq!(config.wpm, DEFAULT_WPM);
        assert_eq!(config.text_size_level, 2);
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.highlight_color, HighlightColor::default());
        assert_eq!(config.strip, StripOptions::default());
    }

    #[test]
    fn test_out_of_range_numbers_are_clamped() {
        let config = config_from_record(&record(json!({ "wpm": 5000, "textSize": 42 })));
        assert_eq!(config.wpm, 1000);
        assert_eq!(config.text_size_level, 5);

        let config = config_from_record(&record(json!({ "wpm": 10 })));
        assert_eq!(config.wpm, 100);
    }

    #[test]
    fn test_negative_and_fractional_numbers_are_clamped() {
        let config = config_from_record(&record(json!({ "wpm": -5, "textSize": -1 })));
        assert_eq!(config.wpm, 100);
        assert_eq!(config.text_size_level, 0);

        let config = config_from_record(&record(json!({ "wpm": 412.6, "textSize": 2.9 })));
        assert_eq!(config.wpm, 413);
        assert_eq!(config.text_size_level, 2);
    }

    #[test]
    fn test_partial_strip_object_defaults_missing_flags() {
        let config = config_from_record(&record(json!({ "stripChars": { "quotes": true } })));
        assert!(config.strip.quotes);
        assert!(!config.strip.punctuation);
    }

    #[test]
    fn test_merge_reports_only_changed_entries() {
        let mut stored = record(json!({ "wpm": 300, "theme": "dark" }));
        let changes = merge_into(&mut stored, &record(json!({ "wpm": 300, "theme": "light" })));
        assert_eq!(
            changes,
            vec![SettingChange {
                field: SettingField::Theme,
                value: json!("light")
            }]
        );
        assert_eq!(stored, record(json!({ "wpm": 300, "theme": "light" })));
    }

    #[test]
    fn test_diff_records_reports_removed_keys_as_null() {
        let old = record(json!({ "wpm": 300, "orpColor": "#ffffff" }));
        let new = record(json!({ "wpm": 400 }));
        let changes = diff_records(&old, &new);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].field, SettingField::Wpm);
        assert_eq!(changes[0].value, json!(400));
        assert_eq!(changes[1].field, SettingField::HighlightColor);
        assert_eq!(changes[1].value, Value::Null);
    }

    #[test]
    fn test_feed_delivers_in_order_and_drops_closed_subscribers() {
        let (tx, feed) = ChangeFeed::channel();
        let (dead_tx, dead_feed) = ChangeFeed::channel();
        drop(dead_feed);
        let mut subscribers = vec![tx, dead_tx];

        let changes = vec![
            SettingChange {
                field: SettingField::Wpm,
                value: json!(500),
            },
            SettingChange {
                field: SettingField::Theme,
                value: json!("light"),
            },
        ];
        broadcast(&mut subscribers, &changes);

        assert_eq!(subscribers.len(), 1);
        assert_eq!(feed.pending().collect::<Vec<_>>(), changes);
        assert_eq!(feed.pending().count(), 0);
    }
}
