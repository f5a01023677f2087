//! Section-based key/value container and its INI text format

use crate::error::{Error, Result};
use crate::extractors::base::BaseExtractor;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Whether an option key is a comment marker rather than a live option
///
/// Exported sections carry documentation (`;`) and commented-out defaults
/// (`#`) as keys; neither is ever read back as a value.
pub fn is_comment_key(key: &str) -> bool {
    key.starts_with('#') || key.starts_with(';')
}

/// One named section: comment lines followed by ordered options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSection {
    pub name: String,
    pub comment_lines: Vec<String>,
    options: Vec<(String, String)>,
}

impl ConfigSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set an option, keeping its position if it already exists
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.options.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.options.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.options.iter().position(|(k, _)| k == key)?;
        Some(self.options.remove(index).1)
    }

    /// (key, value) pairs in insertion order
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Options that are not comment markers
    pub fn live_options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options().filter(|(key, _)| !is_comment_key(key))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.comment_lines.is_empty()
    }
}

/// Ordered collection of uniquely named sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigContainer {
    sections: Vec<ConfigSection>,
}

impl ConfigContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the sections of an existing INI file
    pub fn from_template(path: &Path) -> Result<Self> {
        debug!("Seeding config from template {}", path.display());
        IniFormat.read(path)
    }

    /// Append a new, empty section
    pub fn add_section(&mut self, name: &str) -> Result<&mut ConfigSection> {
        if self.has_section(name) {
            return Err(Error::SectionAlreadyExists {
                section: name.to_string(),
            });
        }
        self.sections.push(ConfigSection::new(name));
        let last = self.sections.len() - 1;
        Ok(&mut self.sections[last])
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    pub fn section(&self, name: &str) -> Option<&ConfigSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut ConfigSection> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &ConfigSection> {
        self.sections.iter()
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render with the default INI format
    pub fn to_ini_string(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = IniFormat.render(self, &mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// A text format a container can be read from and written to
pub trait ConfigFormat {
    /// Parse `text`; `origin` names the source in error messages
    fn parse(&self, text: &str, origin: &str) -> Result<ConfigContainer>;

    fn render(&self, container: &ConfigContainer, writer: &mut dyn Write) -> io::Result<()>;

    fn read(&self, path: &Path) -> Result<ConfigContainer> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        self.parse(&text, &path.display().to_string())
    }

    fn write(&self, container: &ConfigContainer, path: &Path) -> Result<()> {
        let mut file = fs::File::create(path).map_err(|e| Error::io(path, e))?;
        self.render(container, &mut file)
            .map_err(|e| Error::io(path, e))
    }
}

/// `[section]` / `key = value` files as written by Python's ConfigParser
#[derive(Debug, Clone, Copy, Default)]
pub struct IniFormat;

impl ConfigFormat for IniFormat {
    fn parse(&self, text: &str, origin: &str) -> Result<ConfigContainer> {
        let mut container = ConfigContainer::new();
        let mut current: Option<usize> = None;
        let mut last_key: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                last_key = None;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                // Indented lines after a comment belong to the comment
                last_key = None;
                continue;
            }

            let indented = raw.starts_with(' ') || raw.starts_with('\t');
            if indented {
                if let (Some(section), Some(key)) = (current, last_key.as_deref()) {
                    let section = &mut container.sections[section];
                    let value = section.get(key).unwrap_or_default();
                    let joined = if value.is_empty() {
                        trimmed.to_string()
                    } else {
                        format!("{}\n{}", value, trimmed)
                    };
                    section.set(key, joined);
                    continue;
                }
            }

            if let Some(header) = trimmed.strip_prefix('[') {
                let Some(name) = header.strip_suffix(']') else {
                    return Err(Error::parse(origin, line_number, "unterminated section header"));
                };
                let name = name.trim();
                if container.has_section(name) {
                    return Err(Error::parse(
                        origin,
                        line_number,
                        format!("duplicate section {}", name),
                    ));
                }
                container.sections.push(ConfigSection::new(name));
                current = Some(container.sections.len() - 1);
                last_key = None;
                continue;
            }

            let Some(section) = current else {
                return Err(Error::parse(
                    origin,
                    line_number,
                    "option found before any section header",
                ));
            };

            let (key, value) = match trimmed.find(['=', ':']) {
                Some(split) => (trimmed[..split].trim(), trimmed[split + 1..].trim()),
                None => (trimmed, ""),
            };
            if key.is_empty() {
                return Err(Error::parse(origin, line_number, "option without a name"));
            }
            container.sections[section].set(key, value);
            last_key = Some(key.to_string());
        }

        debug!("Parsed {} sections from {}", container.len(), origin);
        Ok(container)
    }

    fn render(&self, container: &ConfigContainer, writer: &mut dyn Write) -> io::Result<()> {
        for (index, section) in container.sections().enumerate() {
            if index > 0 {
                writeln!(writer)?;
            }
            writeln!(writer, "[{}]", section.name)?;
            for line in &section.comment_lines {
                writeln!(writer, ";{}", line)?;
            }
            for (key, value) in section.options() {
                if value.is_empty() {
                    writeln!(writer, "{} =", key)?;
                } else if is_comment_key(key) {
                    // A commented-out option must stay on one line
                    writeln!(writer, "{} = {}", key, BaseExtractor::normalize_whitespace(value))?;
                } else {
                    writeln!(writer, "{} = {}", key, value.replace('\n', "\n\t"))?;
                }
            }
        }
        Ok(())
    }
}
