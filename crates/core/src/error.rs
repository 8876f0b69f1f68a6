#[derive(Debug, thiserror::Error)]
pub enum PrescriptionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown form field: {0}")]
    UnknownFormField(String),
    #[error("unknown settings field: {0}")]
    UnknownProfileField(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read settings slot: {0}")]
    SlotRead(std::io::Error),
    #[error("failed to write settings slot: {0}")]
    SlotWrite(std::io::Error),
    #[error("failed to serialize settings: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize settings: {0}")]
    Deserialization(serde_json::Error),
    #[error("failed to write print document: {0}")]
    DocumentWrite(std::io::Error),
    #[error("failed to run print command `{program}`: {source}")]
    PrintCommand {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("print command `{program}` exited with status {status}")]
    PrintCommandStatus {
        program: String,
        status: std::process::ExitStatus,
    },
    #[error("print thread panicked")]
    PrintThreadPanicked,
    #[error("settings lock poisoned")]
    LockPoisoned,
}

pub type PrescriptionResult<T> = std::result::Result<T, PrescriptionError>;
