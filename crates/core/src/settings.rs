//! Persisted doctor settings.
//!
//! Settings live in a single named slot holding the profile as a JSON object. The slot is a
//! trait so the storage medium can vary: [`FileSlot`] keeps it in `<data_dir>/doctorInfo.json`,
//! [`MemorySlot`] keeps it in memory for tests and ephemeral sessions.
//!
//! Every mutation goes straight back to the slot. There is no debounce and no transaction; the
//! last writer wins.

use crate::constants::SETTINGS_SLOT_KEY;
use crate::profile::{profile_from_slot_value, DoctorProfile};
use crate::{PrescriptionError, PrescriptionResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A single durable key-value slot.
pub trait SettingsSlot {
    /// Name of the slot.
    fn key(&self) -> &str;

    /// Read the stored value, `None` when nothing has been stored yet.
    fn read(&self) -> PrescriptionResult<Option<String>>;

    /// Replace the stored value.
    fn write(&self, value: &str) -> PrescriptionResult<()>;
}

/// Slot stored as a JSON file named after the slot key.
#[derive(Debug, Clone)]
pub struct FileSlot {
    key: String,
    path: PathBuf,
}

impl FileSlot {
    /// The `doctorInfo` slot under `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self::named(data_dir, SETTINGS_SLOT_KEY)
    }

    pub fn named(data_dir: &Path, key: &str) -> Self {
        Self {
            key: key.to_owned(),
            path: data_dir.join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsSlot for FileSlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> PrescriptionResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PrescriptionError::SlotRead(e)),
        }
    }

    fn write(&self, value: &str) -> PrescriptionResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(PrescriptionError::StorageDirCreation)?;
        }

        // Write beside the target and rename so a crash never leaves half a file behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(PrescriptionError::SlotWrite)?;
        fs::rename(&tmp, &self.path).map_err(PrescriptionError::SlotWrite)
    }
}

/// In-memory slot.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that already holds `value`.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }
}

impl SettingsSlot for MemorySlot {
    fn key(&self) -> &str {
        SETTINGS_SLOT_KEY
    }

    fn read(&self) -> PrescriptionResult<Option<String>> {
        let guard = self
            .value
            .lock()
            .map_err(|_| PrescriptionError::LockPoisoned)?;
        Ok(guard.clone())
    }

    fn write(&self, value: &str) -> PrescriptionResult<()> {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| PrescriptionError::LockPoisoned)?;
        *guard = Some(value.to_owned());
        Ok(())
    }
}

/// Loads and saves the doctor profile through a [`SettingsSlot`].
#[derive(Debug)]
pub struct SettingsStore<S> {
    slot: S,
}

impl<S: SettingsSlot> SettingsStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Load the profile.
    ///
    /// An empty slot yields the default profile; a stored profile is reconciled over the
    /// defaults field by field.
    ///
    /// # Errors
    ///
    /// Returns `PrescriptionError::Deserialization` when the slot holds malformed JSON, or a
    /// slot read error.
    pub fn load(&self) -> PrescriptionResult<DoctorProfile> {
        match self.slot.read()? {
            None => Ok(DoctorProfile::default()),
            Some(raw) => profile_from_slot_value(&raw),
        }
    }

    /// Load the profile, falling back to defaults when the slot cannot be read or parsed.
    pub fn load_or_default(&self) -> DoctorProfile {
        self.load().unwrap_or_else(|e| {
            tracing::warn!(
                "ignoring unreadable settings slot '{}': {}",
                self.slot.key(),
                e
            );
            DoctorProfile::default()
        })
    }

    /// Serialize `profile` and write it to the slot.
    pub fn save(&self, profile: &DoctorProfile) -> PrescriptionResult<()> {
        let json =
            serde_json::to_string_pretty(profile).map_err(PrescriptionError::Serialization)?;
        self.slot.write(&json)?;
        tracing::debug!("saved settings slot '{}'", self.slot.key());
        Ok(())
    }

    /// Apply `edit` to `profile` and persist the result immediately.
    pub fn update<F>(&self, profile: &mut DoctorProfile, edit: F) -> PrescriptionResult<()>
    where
        F: FnOnce(&mut DoctorProfile),
    {
        edit(profile);
        self.save(profile)
    }

    /// Overwrite the slot with the default profile and return it.
    pub fn reset(&self) -> PrescriptionResult<DoctorProfile> {
        let profile = DoctorProfile::default();
        self.save(&profile)?;
        Ok(profile)
    }
}
