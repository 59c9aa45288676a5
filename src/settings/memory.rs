use super::{
    config_from_record, merge_into, ChangeFeed, SettingChange, SettingsPatch,
    SettingsRecord, SettingsStore,
};
use crate::engine::{Config, SettingsError};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::Sender;

#[derive(Default)]
struct Shared {
    record: SettingsRecord,
    /// Subscribers tagged with the surface that registered them.
    subscribers: Vec<(usize, Sender<SettingChange>)>,
    surfaces: usize,
}

/// Settings record held in memory and shared between surfaces.
///
/// Each surface sees the same record. A save through one surface is announced to the
/// feeds of every other surface, never to its own.
pub struct MemorySettingsStore {
    shared: Rc<RefCell<Shared>>,
    surface: usize,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::with_record(SettingsRecord::new())
    }

    pub fn with_record(record: SettingsRecord) -> Self {
        let shared = Shared {
            record,
            subscribers: Vec::new(),
            surfaces: 1,
        };
        Self {
            shared: Rc::new(RefCell::new(shared)),
            surface: 0,
        }
    }

    /// Another view of the same record, e.g. a settings popup next to the reader.
    pub fn surface(&self) -> Self {
        let mut shared = self.shared.borrow_mut();
        let surface = shared.surfaces;
        shared.surfaces += 1;
        Self {
            shared: Rc::clone(&self.shared),
            surface,
        }
    }

    pub fn record(&self) -> SettingsRecord {
        self.shared.borrow().record.clone()
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Config {
        config_from_record(&self.shared.borrow().record)
    }

    fn save(&mut self, patch: &SettingsPatch) -> Result<(), SettingsError> {
        let entries = patch.to_record()?;
        let mut shared = self.shared.borrow_mut();
        let changes = merge_into(&mut shared.record, &entries);
        if changes.is_empty() {
            return Ok(());
        }

        let origin = self.surface;
        shared.subscribers.retain(|(surface, tx)| {
            *surface == origin || changes.iter().all(|change| tx.send(change.clone()).is_ok())
        });
        Ok(())
    }

    fn subscribe(&mut self) -> ChangeFeed {
        let (tx, feed) = ChangeFeed::channel();
        self.shared.borrow_mut().subscribers.push((self.surface, tx));
        feed
    }
}
