use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse scene config: {message}")]
    ConfigParse { message: String },

    #[error("parameter '{key}' expects a {expected} value")]
    ParameterType {
        key: &'static str,
        expected: &'static str,
    },

    #[error("invalid viewport size {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
}
