pub type CumulusResult<T> = Result<T, CumulusError>;

#[derive(thiserror::Error, Debug)]
pub enum CumulusError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("cloud layer {index}: {source}")]
    Layer {
        index: usize,
        source: Box<CumulusError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CumulusError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    pub fn layer(index: usize, source: CumulusError) -> Self {
        Self::Layer {
            index,
            source: Box::new(source),
        }
    }
}
