//! A single working session.
//!
//! The session owns the one doctor profile (backed by the settings store) and the one form. Form
//! edits stay in memory; profile edits are written through to the settings slot as they happen.

use crate::composer::{ComposeInput, DocumentComposer};
use crate::form::{FormField, FormState};
use crate::print::{DispatchOutcome, PrintDispatcher, RenderSurface};
use crate::profile::{DoctorProfile, ProfileField};
use crate::settings::{SettingsSlot, SettingsStore};
use crate::PrescriptionResult;
use chrono::NaiveDate;

#[derive(Debug)]
pub struct Session<S> {
    store: SettingsStore<S>,
    profile: DoctorProfile,
    form: FormState,
    composer: DocumentComposer,
}

impl<S: SettingsSlot> Session<S> {
    /// Open a session: load the stored profile (defaults when unusable) and start a blank form
    /// dated `today`.
    pub fn open(store: SettingsStore<S>, composer: DocumentComposer, today: NaiveDate) -> Self {
        let profile = store.load_or_default();
        tracing::info!("session opened with profile for {}", profile.name_en);
        Self {
            store,
            profile,
            form: FormState::new(today),
            composer,
        }
    }

    pub fn profile(&self) -> &DoctorProfile {
        &self.profile
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn store(&self) -> &SettingsStore<S> {
        &self.store
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn replace_form(&mut self, form: FormState) {
        self.form = form;
    }

    pub fn reset_form(&mut self, today: NaiveDate) {
        self.form.reset(today);
    }

    /// Edit one profile field and persist the profile.
    pub fn edit_profile(&mut self, field: ProfileField, raw: &str) -> PrescriptionResult<()> {
        self.store
            .update(&mut self.profile, |profile| profile.apply_edit(field, raw))
    }

    /// Replace the whole profile and persist it.
    pub fn replace_profile(&mut self, profile: DoctorProfile) -> PrescriptionResult<()> {
        self.store
            .update(&mut self.profile, move |current| *current = profile)
    }

    /// Restore and persist the default profile.
    pub fn reset_profile(&mut self) -> PrescriptionResult<()> {
        self.profile = self.store.reset()?;
        Ok(())
    }

    /// Compose the print document from the current profile and form.
    pub fn compose(&self) -> String {
        self.composer
            .compose(&ComposeInput::new(&self.profile, &self.form))
    }

    /// Compose the current document and hand it to `dispatcher`.
    pub fn print<R: RenderSurface>(&self, dispatcher: &PrintDispatcher<R>) -> DispatchOutcome {
        dispatcher.dispatch(&self.compose())
    }
}
