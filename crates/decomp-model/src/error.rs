use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("identifier must not be empty")]
    EmptyIdentifier,
    #[error("identifier `{0}` is already in use")]
    DuplicateIdentifier(String),
    #[error("no entity with identifier `{0}`")]
    UnknownIdentifier(String),
    #[error("unknown segment section: {0}")]
    InvalidSection(String),
    #[error("segment section index {0} is out of range")]
    SectionOutOfRange(usize),
    #[error("party already holds the maximum of {capacity} pokemon")]
    PartyFull { capacity: usize },
    #[error("no game segment at index {0}")]
    UnknownSegment(usize),
}

pub type Result<T> = std::result::Result<T, ModelError>;
