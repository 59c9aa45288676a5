use super::{
    broadcast, config_from_record, diff_records, merge_into, ChangeFeed, SettingChange,
    SettingsPatch, SettingsRecord, SettingsStore,
};
use crate::engine::{Config, SettingsError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use tracing::{debug, warn};

const APP_DIR: &str = "rsvp-reader";
const FILE_NAME: &str = "settings.json";

/// Settings record persisted as a JSON object on disk.
///
/// Other processes may rewrite the file at any time; `poll` compares it against the
/// last record this store saw and announces the differences.
pub struct FileSettingsStore {
    path: PathBuf,
    last_seen: SettingsRecord,
    subscribers: Vec<Sender<SettingChange>>,
    last_error: Option<String>,
}

impl FileSettingsStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            last_seen: SettingsRecord::new(),
            subscribers: Vec::new(),
            last_error: None,
        };
        match store.read_record() {
            Ok(record) => store.last_seen = record,
            Err(err) => store.report(err),
        }
        store
    }

    /// Opens `<config dir>/rsvp-reader/settings.json`.
    pub fn open_default() -> Result<Self, SettingsError> {
        Ok(Self::open(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let base = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(base.join(APP_DIR).join(FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_record(&self) -> Result<SettingsRecord, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(SettingsRecord::new()),
            Err(err) => return Err(SettingsError::io(&self.path, err)),
        };
        if content.trim().is_empty() {
            return Ok(SettingsRecord::new());
        }
        serde_json::from_str(&content).map_err(|source| SettingsError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes through a sibling temp file so readers never see a half-written record.
    fn write_record(&self, record: &SettingsRecord) -> Result<(), SettingsError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|err| SettingsError::io(dir, err))?;
        }
        let content = serde_json::to_string_pretty(record)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|err| SettingsError::io(&tmp, err))?;
        fs::rename(&tmp, &self.path).map_err(|err| SettingsError::io(&self.path, err))
    }

    /// Re-reads the file and announces every changed key not present in `overwritten`.
    fn refresh(&mut self, overwritten: &SettingsRecord) {
        let record = match self.read_record() {
            Ok(record) => record,
            Err(err) => {
                self.report(err);
                return;
            }
        };
        self.last_error = None;

        let changes: Vec<SettingChange> = diff_records(&self.last_seen, &record)
            .into_iter()
            .filter(|change| !overwritten.contains_key(change.field.key()))
            .collect();
        if !changes.is_empty() {
            debug!(fields = changes.len(), "settings changed on disk");
            broadcast(&mut self.subscribers, &changes);
        }
        self.last_seen = record;
    }

    /// Logs a read failure once until it changes or clears.
    fn report(&mut self, err: SettingsError) {
        let message = err.to_string();
        if self.last_error.as_deref() != Some(message.as_str()) {
            warn!(error = %message, "settings file unreadable, keeping last known values");
            self.last_error = Some(message);
        }
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Config {
        match self.read_record() {
            Ok(record) => config_from_record(&record),
            Err(err) => {
                warn!(error = %err, "falling back to default settings");
                Config::default()
            }
        }
    }

    fn save(&mut self, patch: &SettingsPatch) -> Result<(), SettingsError> {
        let overlay = patch.to_record()?;
        // Pick up edits made elsewhere first so they are announced, not overwritten.
        // Keys the patch replaces are not announced.
        self.refresh(&overlay);

        let mut record = self.last_seen.clone();
        let changed = merge_into(&mut record, &overlay);
        if changed.is_empty() {
            return Ok(());
        }
        self.write_record(&record)?;
        debug!(path = %self.path.display(), fields = changed.len(), "settings saved");
        self.last_seen = record;
        Ok(())
    }

    fn subscribe(&mut self) -> ChangeFeed {
        let (tx, feed) = ChangeFeed::channel();
        self.subscribers.push(tx);
        feed
    }

    fn poll(&mut self) {
        self.refresh(&SettingsRecord::new());
    }
}
