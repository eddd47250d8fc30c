use thiserror::Error;

/// Rule violations in gift documents, whether posted or seeded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("gift name must not be empty")]
    BlankGiftName,
    #[error("gift id must not be blank")]
    BlankGiftId,
    #[error("gift age must be a non-negative number")]
    InvalidGiftAge,
    #[error("gift id `{0}` appears more than once")]
    DuplicateGiftId(String),
}
