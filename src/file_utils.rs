use anyhow::{Result, Context};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

// @module: File and input utilities

/// Path that stands for standard input
pub const STDIN_PATH: &str = "-";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Sibling path with the input stem and a new suffix
    // @params: input_file, suffix (e.g. "narration.txt")
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, suffix: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(suffix);

        input_file.with_file_name(output_filename)
    }

    /// Read a file to a string, or standard input when the path is `-`.
    /// A leading byte order mark is dropped.
    pub fn read_input<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        let content = if path.as_os_str() == STDIN_PATH {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)
                .context("Failed to read standard input")?;
            buffer
        } else {
            Self::read_to_string(path)?
        };

        Ok(content.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(content))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Decide whether input is a sequence XML file or pasted script text.
    ///
    /// The `.xml` extension wins; otherwise the content is sniffed for an XML
    /// declaration or an `<xmeml>` root.
    pub fn detect_input_kind<P: AsRef<Path>>(path: P, content: &str) -> InputKind {
        let is_xml_ext = path.as_ref().extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("xml"));
        if is_xml_ext {
            return InputKind::ProjectFile;
        }

        let head = content.trim_start();
        if head.starts_with("<?xml") || head.starts_with("<xmeml") {
            InputKind::ProjectFile
        } else {
            InputKind::Script
        }
    }
}

/// Kind of input handed to the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Sequence XML exported by the editor
    ProjectFile,
    /// Pasted timestamp + text blocks
    Script,
}
