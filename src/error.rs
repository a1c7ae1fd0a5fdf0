use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Enumeration of different error types that can occur in the application
///
/// This enumeration centralizes all possible error types to facilitate
/// error handling and debugging.
#[derive(Debug)]
pub enum BoothError {
    /// Errors related to image processing (reading, writing, format)
    Image(image::ImageError),
    /// Input/output errors (files not found, permissions, etc.)
    Io(std::io::Error),
    /// Errors while (de)serializing JSON state or API bodies
    Json(serde_json::Error),
    /// The configured frame template asset does not exist
    MissingTemplate(PathBuf),
    /// The frame template asset has unexpected pixel dimensions
    TemplateSizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    /// No OAuth client secrets file could be located
    MissingClientSecrets(PathBuf),
    /// No usable image found when auto-picking from the input directory
    NoCandidate(PathBuf),
    /// A render was requested with no selected sources
    EmptySelection,
    /// Cloud upload or token refresh failure (the local composite survives)
    Upload(String),
    /// QR code generation failure
    Qr(String),
}

/// Implementation of formatted error display
///
/// Provides clear and understandable error messages
/// for the operator.
impl fmt::Display for BoothError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoothError::Image(e) => write!(f, "Image processing error: {}", e),
            BoothError::Io(e) => write!(f, "Input/output error: {}", e),
            BoothError::Json(e) => write!(f, "JSON error: {}", e),
            BoothError::MissingTemplate(p) => {
                write!(f, "Frame template not found: {}", p.display())
            }
            BoothError::TemplateSizeMismatch { expected, actual } => write!(
                f,
                "Frame template is {}x{} but the layout expects {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            BoothError::MissingClientSecrets(p) => {
                write!(f, "OAuth client secrets not found: {}", p.display())
            }
            BoothError::NoCandidate(dir) => {
                write!(f, "No image found in {}", dir.display())
            }
            BoothError::EmptySelection => write!(f, "No photos selected for the frame"),
            BoothError::Upload(msg) => write!(f, "Upload error: {}", msg),
            BoothError::Qr(msg) => write!(f, "QR code error: {}", msg),
        }
    }
}

impl Error for BoothError {}

// Automatic conversions from standard error types
// to our custom error type
impl From<image::ImageError> for BoothError {
    fn from(error: image::ImageError) -> Self {
        BoothError::Image(error)
    }
}

impl From<std::io::Error> for BoothError {
    fn from(error: std::io::Error) -> Self {
        BoothError::Io(error)
    }
}

impl From<serde_json::Error> for BoothError {
    fn from(error: serde_json::Error) -> Self {
        BoothError::Json(error)
    }
}
