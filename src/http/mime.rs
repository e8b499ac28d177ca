use std::collections::HashMap;
use std::path::Path;

/// Extension to mimetype map read from a `mime.types` style file.
///
/// Each line is `MIMETYPE EXT1 EXT2 ...`; blank lines and `#` comments are
/// skipped. When several lines list the same extension, the first wins.
#[derive(Debug, Clone)]
pub struct MimeTable {
    types: HashMap<String, String>,
    default_mimetype: String,
}

impl MimeTable {
    pub fn new(default_mimetype: impl Into<String>) -> Self {
        Self {
            types: HashMap::new(),
            default_mimetype: default_mimetype.into(),
        }
    }

    /// Reads `path`; an unreadable file leaves the table empty so every
    /// lookup yields the default.
    pub fn load(path: &Path, default_mimetype: impl Into<String>) -> Self {
        let mut table = Self::new(default_mimetype);
        match std::fs::read_to_string(path) {
            Ok(contents) => table.add_lines(&contents),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Mime table unreadable, using default mimetype for everything"
                );
            }
        }
        table
    }

    pub fn from_contents(contents: &str, default_mimetype: impl Into<String>) -> Self {
        let mut table = Self::new(default_mimetype);
        table.add_lines(contents);
        table
    }

    fn add_lines(&mut self, contents: &str) {
        for line in contents.lines() {
            let mut fields = line.split_whitespace();
            let mimetype = match fields.next() {
                Some(m) if !m.starts_with('#') => m,
                _ => continue,
            };
            for ext in fields {
                self.types
                    .entry(ext.to_string())
                    .or_insert_with(|| mimetype.to_string());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn default_mimetype(&self) -> &str {
        &self.default_mimetype
    }

    /// Mimetype for the text after the last `.` in the file name.
    ///
    /// A leading dot counts, so `.html` maps like `index.html`.
    pub fn lookup(&self, path: &Path) -> &str {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.rsplit_once('.'))
            .and_then(|(_, ext)| self.types.get(ext))
            .map(String::as_str)
            .unwrap_or(&self.default_mimetype)
    }
}
