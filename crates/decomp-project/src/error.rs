//! Project load/save error types.
//!
//! Every failure is fatal to the load or save that raised it; the caller
//! decides how to report it, typically through [`ProjectError::user_message`].

use std::path::PathBuf;

use decomp_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A database file is not valid JSON of the expected shape.
    #[error("Failed to parse {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A stored identifier names nothing in the table it refers to.
    #[error("{database}: unresolved {kind} reference `{identifier}`")]
    UnresolvedReference {
        database: &'static str,
        kind: &'static str,
        identifier: String,
    },

    #[error("{database}: duplicate {kind} `{identifier}`")]
    DuplicateIdentifier {
        database: &'static str,
        kind: &'static str,
        identifier: String,
    },

    /// Stored encounters use a habitat type missing from the type list.
    #[error("map {map} has encounters for unknown habitat type `{habitat}`")]
    UnknownHabitat { map: String, habitat: String },

    /// Stored encounters name a map missing from the map constants.
    #[error("wild encounters reference unknown map `{map}`")]
    UnknownMap { map: String },

    /// An encounter entry with occurrences but no species cannot be written.
    #[error("map {map}, habitat {habitat}: encounter entry has no species")]
    MissingSpecies { map: String, habitat: String },

    /// A frame refers to a picture no longer in the picture table.
    #[error("event object {object} refers to a removed picture")]
    DanglingPicture { object: String },

    #[error("Failed to read image {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// No entity with the given identifier.
    #[error("no {kind} named `{identifier}`")]
    NotFound {
        kind: &'static str,
        identifier: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ProjectError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            operation,
            path,
            source,
        }
    }

    /// Attribute an identifier error from the model to `database`.
    pub(crate) fn identity(database: &'static str, kind: &'static str) -> impl FnOnce(ModelError) -> Self {
        move |error| match error {
            ModelError::DuplicateIdentifier(identifier) => Self::DuplicateIdentifier {
                database,
                kind,
                identifier,
            },
            ModelError::UnknownIdentifier(identifier) => Self::NotFound { kind, identifier },
            other => Self::Model(other),
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::Json { path, source } => {
                format!(
                    "The file at {} is not valid project data (line {}, column {})",
                    path.display(),
                    source.line(),
                    source.column()
                )
            }
            Self::UnresolvedReference {
                database,
                kind,
                identifier,
            } => {
                format!("The {database} refers to a {kind} '{identifier}' that does not exist.")
            }
            Self::DuplicateIdentifier {
                database,
                kind,
                identifier,
            } => {
                format!("The {database} defines the {kind} '{identifier}' more than once.")
            }
            Self::UnknownHabitat { map, habitat } => {
                format!("Map {map} stores encounters for habitat '{habitat}', which is not a known habitat type.")
            }
            Self::UnknownMap { map } => {
                format!("Wild encounters are stored for map '{map}', which is not defined in the map constants.")
            }
            Self::MissingSpecies { map, habitat } => {
                format!("An encounter in map {map} ({habitat}) has no species selected.")
            }
            Self::DanglingPicture { object } => {
                format!("Event object {object} uses a picture that was removed.")
            }
            Self::Image { path, .. } => {
                format!("Could not read the image at {}", path.display())
            }
            Self::NotFound { kind, identifier } => {
                format!("There is no {kind} named '{identifier}'.")
            }
            Self::Model(error) => error.to_string(),
        }
    }
}

/// Result type alias for project operations.
pub type Result<T> = std::result::Result<T, ProjectError>;
