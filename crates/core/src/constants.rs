//! Constants used throughout the rxpad core crate.
//!
//! This module contains slot names, filenames and rendering defaults so that they are
//! defined in exactly one place.

/// Default directory for the settings slot when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "rxpad_data";

/// Directory name (under the data directory) for printed documents.
pub const PRINTS_DIR_NAME: &str = "prints";

/// Name of the single persisted settings slot.
pub const SETTINGS_SLOT_KEY: &str = "doctorInfo";

/// Filename prefix for documents written by the file rendering surface.
pub const PRINT_FILE_PREFIX: &str = "prescription";

/// Delay between writing a print document and invoking the print action.
pub const DEFAULT_PRINT_DELAY_MS: u64 = 250;

/// Default listen address for the HTTP surface.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Title of every composed document.
pub const DOCUMENT_TITLE: &str = "Medical Prescription";

/// External font stylesheet referenced by composed documents.
pub const FONT_STYLESHEET_URL: &str = "https://fonts.googleapis.com/css2?family=Alkatra:wght@400;500;600;700&family=Great+Vibes&family=Tiro+Bangla:wght@400;700&display=swap";
