use crate::calendar::BookingRejection;
use crate::validation::FieldErrors;
use intake_uuid::ClientId;

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("invalid submission: {0}")]
    Validation(FieldErrors),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("customer not found: {0}")]
    NotFound(ClientId),

    #[error("client id {0} is already in use")]
    IdentifierCollision(ClientId),
    #[error("failed to allocate a unique client id after {attempts} attempts")]
    IdentifierSpaceExhausted { attempts: usize },

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to create customer directory: {0}")]
    CustomerDirCreation(std::io::Error),
    #[error("failed to write customer file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read customer file: {0}")]
    FileRead(std::io::Error),
    #[error(
        "create failed and cleanup also failed (path: {path}): create={create_error}; cleanup={cleanup_error}",
        path = path.display()
    )]
    CleanupAfterCreateFailed {
        path: std::path::PathBuf,
        #[source]
        create_error: Box<IntakeError>,
        cleanup_error: std::io::Error,
    },
    #[error("customer store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("failed to serialize record: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize record: {0}")]
    Deserialization(serde_json::Error),

    #[error("identifier error: {0}")]
    Uuid(#[from] intake_uuid::UuidError),

    #[error("appointment rejected: {0}")]
    BookingRejected(BookingRejection),
}

impl IntakeError {
    /// True for failures of the environment (disk, permissions, corrupt files) rather than of
    /// the caller's input. These are logged and reported as opaque server errors.
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            IntakeError::IdentifierCollision(_)
                | IntakeError::IdentifierSpaceExhausted { .. }
                | IntakeError::StorageDirCreation(_)
                | IntakeError::CustomerDirCreation(_)
                | IntakeError::FileWrite(_)
                | IntakeError::FileRead(_)
                | IntakeError::CleanupAfterCreateFailed { .. }
                | IntakeError::StoreUnavailable(_)
                | IntakeError::Serialization(_)
                | IntakeError::Deserialization(_)
        )
    }
}

impl From<FieldErrors> for IntakeError {
    fn from(errors: FieldErrors) -> Self {
        IntakeError::Validation(errors)
    }
}

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;
