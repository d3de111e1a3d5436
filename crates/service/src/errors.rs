use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database error: {0}")]
    Connectivity(String),
    #[error("external service error: {0}")]
    ExternalService(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn external(service: &str, detail: impl std::fmt::Display) -> Self {
        Self::ExternalService(format!("{service}: {detail}"))
    }
}

impl From<mongodb::error::Error> for ServiceError {
    fn from(e: mongodb::error::Error) -> Self {
        Self::Connectivity(e.to_string())
    }
}
