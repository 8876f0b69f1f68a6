//! # RxPad Core
//!
//! Core logic for the RxPad prescription pad.
//!
//! This crate contains the data model and the pure operations behind the prescription form:
//! - Doctor settings persisted to a single JSON slot under `RXPAD_DATA_DIR`
//! - The in-memory patient form (patient, medical notes, examination, prescription body)
//! - Composition of the printable HTML document
//! - Dispatch of that document to a render surface and a delayed print request
//!
//! **No API concerns**: HTTP routing, page rendering and the command line belong in `api-rest`,
//! `api-shared` and `cli`.

pub mod composer;
pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod markup;
pub mod print;
pub mod profile;
pub mod session;
pub mod settings;

pub use composer::{ComposeInput, DocumentComposer, SectionKind};
pub use config::{core_config_from_env_values, CoreConfig, DateStyle, EnvValues, PrintCommand};
pub use error::{PrescriptionError, PrescriptionResult};
pub use form::{FormField, FormState};
pub use print::{DispatchOutcome, FileSurface, MemorySurface, PrintDispatcher, PrintHandle};
pub use profile::{DoctorProfile, ProfileField};
pub use rxpad_types::NonEmptyText;
pub use session::Session;
pub use settings::{FileSlot, MemorySlot, SettingsSlot, SettingsStore};
