use std::path::Path;

/// Result of validating a flat filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Filename is `..`.
    PathTraversal,
    /// Filename contains null bytes.
    NullByte,
    /// Filename starts with a dot (hidden file).
    Hidden,
    /// Filename contains control characters (CR, LF, etc.).
    ControlCharacter,
    /// Filename is longer than [`MAX_FILENAME_LEN`] bytes.
    TooLong,
    /// Filename starts or ends with whitespace.
    Padded,
}

/// Longest accepted filename, in bytes.
pub const MAX_FILENAME_LEN: usize = 255;

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::ContainsPathSeparator => "Invalid filename: path separators are not allowed",
            Self::PathTraversal => "Invalid filename: '..' is not allowed",
            Self::NullByte => "Invalid filename: null bytes are not allowed",
            Self::Hidden => "Invalid filename: hidden files (starting with '.') are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
            Self::TooLong => "Invalid filename: longer than 255 bytes",
            Self::Padded => "Invalid filename: leading or trailing whitespace is not allowed",
        }
    }
}

/// Validates a flat filename (no directory components allowed).
///
/// Names are taken as given: one that would need trimming is rejected, never
/// rewritten into a different name.
pub fn validate_flat_filename(filename: &str) -> Result<&str, FilenameError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(FilenameError::Empty);
    }

    if trimmed.len() != filename.len() {
        return Err(FilenameError::Padded);
    }

    if trimmed.len() > MAX_FILENAME_LEN {
        return Err(FilenameError::TooLong);
    }

    if trimmed.contains('\0') {
        return Err(FilenameError::NullByte);
    }

    // Reject ASCII control characters to prevent
    // HTTP header injection through served filenames.
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(FilenameError::ControlCharacter);
    }

    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(FilenameError::ContainsPathSeparator);
    }

    if trimmed == ".." {
        return Err(FilenameError::PathTraversal);
    }

    if trimmed.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    Ok(trimmed)
}

/// Raster formats accepted for upload. Vector formats can carry script.
const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Lowercased extension of an uploaded filename, dot included, when it names
/// an accepted raster image type.
pub fn image_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    if !RASTER_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    let mime = mime_guess::from_ext(&ext).first()?;
    (mime.type_() == mime_guess::mime::IMAGE).then(|| format!(".{ext}"))
}
