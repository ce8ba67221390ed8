/// Errors raised while building a scene
#[derive(Debug)]
pub enum SceneError {
    /// Height-field dimension is not of the form 2^k + 1 (k >= 1)
    InvalidDimension { width: usize, height: usize },
    /// Roughness must lie strictly between 0 and 1
    InvalidRoughness(f32),
    /// Height sample is NaN or outside [0, 1]
    InvalidSample { index: usize, value: f32 },
    /// Config file could not be read
    Config(std::io::Error),
    /// Config file is not valid JSON for `SceneConfig`
    ConfigFormat(serde_json::Error),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::InvalidDimension { width, height } => write!(
                f,
                "invalid height field dimension {width}x{height} (each side must be 2^k + 1)"
            ),
            SceneError::InvalidSample { index, value } => {
                write!(f, "height sample {index} is {value} (expected a value in [0, 1])")
            }
            SceneError::InvalidRoughness(r) => {
                write!(f, "invalid roughness {r} (expected a value in (0, 1))")
            }
            SceneError::Config(e) => write!(f, "cannot read config: {e}"),
            SceneError::ConfigFormat(e) => write!(f, "malformed config: {e}"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Config(e) => Some(e),
            SceneError::ConfigFormat(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::Config(e)
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(e: serde_json::Error) -> Self {
        SceneError::ConfigFormat(e)
    }
}
