use thiserror::Error;

#[derive(Error, Debug)]
pub enum RackzError {
    #[error("Rack Full: {rack_id} already holds {max} boxes")]
    RackFull { rack_id: String, max: usize },

    #[error("Box Full: box {box_id} in {rack_id} already holds {max} files")]
    BoxFull {
        rack_id: String,
        box_id: u32,
        max: usize,
    },

    #[error("{0}")]
    Validation(String),

    #[error("Rack not found: {0}")]
    RackNotFound(String),

    #[error("Box {box_id} not found in {rack_id}")]
    BoxNotFound { rack_id: String, box_id: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, RackzError>;
