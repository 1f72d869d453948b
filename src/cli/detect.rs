//! Dictionary format auto-detection

use super::args::SerializationFormat;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Detected format with confidence level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDetection {
    /// Detected format
    pub format: SerializationFormat,
    /// Detection method used
    pub method: DetectionMethod,
}

/// Method used to detect dictionary format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    /// Exact detection via magic bytes
    Exact,
    /// Heuristic detection via file extension
    Extension,
    /// Heuristic detection via file content analysis
    Content,
    /// User explicitly specified
    UserSpecified,
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact (magic bytes)"),
            Self::Extension => write!(f, "heuristic (file extension)"),
            Self::Content => write!(f, "heuristic (content analysis)"),
            Self::UserSpecified => write!(f, "user specified"),
        }
    }
}

/// Detect dictionary format from file
///
/// Order: user override, gzip magic bytes (the extension then picks the inner
/// format), leading content, file extension. Anything unrecognised is
/// treated as bincode.
pub fn detect_format(
    path: &Path,
    user_format: Option<SerializationFormat>,
) -> Result<FormatDetection> {
    if let Some(format) = user_format {
        return Ok(FormatDetection {
            format,
            method: DetectionMethod::UserSpecified,
        });
    }

    let header = read_header(path)?;

    if header.starts_with(&GZIP_MAGIC) {
        let format = if has_suffix(path, ".json.gz") {
            SerializationFormat::JsonGzip
        } else {
            SerializationFormat::BincodeGzip
        };
        return Ok(FormatDetection {
            format,
            method: DetectionMethod::Exact,
        });
    }

    if let Some(format) = detect_by_content(&header) {
        return Ok(FormatDetection {
            format,
            method: DetectionMethod::Content,
        });
    }

    Ok(FormatDetection {
        format: detect_by_extension(path).unwrap_or(SerializationFormat::Bincode),
        method: DetectionMethod::Extension,
    })
}

/// Pick the output format for a path from its extension
pub fn detect_by_extension(path: &Path) -> Option<SerializationFormat> {
    if has_suffix(path, ".json.gz") {
        return Some(SerializationFormat::JsonGzip);
    }
    if has_suffix(path, ".bin.gz") || has_suffix(path, ".gz") {
        return Some(SerializationFormat::BincodeGzip);
    }
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "txt" | "text" | "words" => Some(SerializationFormat::Text),
        "bin" | "bincode" | "dat" => Some(SerializationFormat::Bincode),
        "json" => Some(SerializationFormat::Json),
        _ => None,
    }
}

fn read_header(path: &Path) -> Result<Vec<u8>> {
    let mut file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut header = Vec::with_capacity(512);
    file.by_ref()
        .take(512)
        .read_to_end(&mut header)
        .with_context(|| format!("Failed to read file header: {}", path.display()))?;
    Ok(header)
}

fn detect_by_content(header: &[u8]) -> Option<SerializationFormat> {
    let first = header.iter().find(|b| !b.is_ascii_whitespace())?;
    if *first == b'{' {
        return Some(SerializationFormat::Json);
    }

    // A word list is printable ASCII lines of letters or `#` comments.
    let text = std::str::from_utf8(header).ok()?;
    let lines: Vec<&str> = text.lines().collect();
    // the last line may be cut off by the header limit
    let complete = if header.len() == 512 && lines.len() > 1 {
        &lines[..lines.len() - 1]
    } else {
        &lines[..]
    };
    let is_word_list = complete.iter().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line.bytes().all(|b| b.is_ascii_graphic())
    });
    is_word_list.then_some(SerializationFormat::Text)
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.to_lowercase().ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_gzip_magic_wins_over_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "dict.txt", &[0x1f, 0x8b, 8, 0, 0, 0]);
        let detection = detect_format(&path, None).unwrap();
        assert_eq!(detection.format, SerializationFormat::BincodeGzip);
        assert_eq!(detection.method, DetectionMethod::Exact);

        let path = write(&dir, "dict.json.gz", &[0x1f, 0x8b, 8, 0]);
        assert_eq!(
            detect_format(&path, None).unwrap().format,
            SerializationFormat::JsonGzip
        );
    }

    #[test]
    fn test_content_detection() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "dict", b"\n  {\"DoubleArray\": {}}");
        assert_eq!(
            detect_format(&path, None).unwrap().format,
            SerializationFormat::Json
        );

        let path = write(&dir, "words", b"# list\napple\nbanana\n");
        let detection = detect_format(&path, None).unwrap();
        assert_eq!(detection.format, SerializationFormat::Text);
        assert_eq!(detection.method, DetectionMethod::Content);
    }

    #[test]
    fn test_binary_falls_back_to_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "dict.bin", &[0, 0, 0, 0, 2, 0, 0, 0, 255, 255]);
        let detection = detect_format(&path, None).unwrap();
        assert_eq!(detection.format, SerializationFormat::Bincode);
        assert_eq!(detection.method, DetectionMethod::Extension);
    }

    #[test]
    fn test_user_format_is_trusted() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "dict.txt", b"apple\n");
        let detection = detect_format(&path, Some(SerializationFormat::Json)).unwrap();
        assert_eq!(detection.format, SerializationFormat::Json);
        assert_eq!(detection.method, DetectionMethod::UserSpecified);
    }

    #[test]
    fn test_extension_table() {
        for (name, format) in [
            ("a.txt", SerializationFormat::Text),
            ("a.bin", SerializationFormat::Bincode),
            ("a.json", SerializationFormat::Json),
            ("a.bin.gz", SerializationFormat::BincodeGzip),
            ("a.JSON.GZ", SerializationFormat::JsonGzip),
        ] {
            assert_eq!(detect_by_extension(Path::new(name)), Some(format), "{name}");
        }
        assert_eq!(detect_by_extension(Path::new("a.xyz")), None);
    }
}
