/*!
 * Cue classification.
 *
 * Decides, line by line, whether a caption line is prose that should be
 * translated or structural metadata that must be left byte-identical.
 */

use serde::{Deserialize, Serialize};

use crate::subtitle_processor::{Line, SubtitleDocument};

/// Label assigned to a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Blank, header, comment, cue number, timing range or boilerplate
    Structural,
    /// Prose text
    Translatable,
}

impl Classification {
    pub fn is_translatable(&self) -> bool {
        matches!(self, Self::Translatable)
    }
}

/// Format markers used to recognise structural lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierRules {
    /// Exact header line of the format
    #[serde(default = "default_header_token")]
    pub header_token: String,

    /// Prefix of annotation comment lines
    #[serde(default = "default_comment_prefix")]
    pub comment_prefix: String,

    /// Substring marking a timing line
    #[serde(default = "default_timing_delimiter")]
    pub timing_delimiter: String,

    /// Substrings identifying broadcaster watermarks and similar boilerplate
    #[serde(default = "default_boilerplate_markers")]
    pub boilerplate_markers: Vec<String>,
}

fn default_header_token() -> String {
    "WEBVTT".to_string()
}

fn default_comment_prefix() -> String {
    "NOTE".to_string()
}

fn default_timing_delimiter() -> String {
    "-->".to_string()
}

fn default_boilerplate_markers() -> Vec<String> {
    vec!["ERR Heli tekstiks".to_string()]
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            header_token: default_header_token(),
            comment_prefix: default_comment_prefix(),
            timing_delimiter: default_timing_delimiter(),
            boilerplate_markers: default_boilerplate_markers(),
        }
    }
}

impl ClassifierRules {
    /// Add a boilerplate marker
    pub fn with_boilerplate(mut self, marker: impl Into<String>) -> Self {
        self.boilerplate_markers.push(marker.into());
        self
    }

    pub fn is_header(&self, line: &str) -> bool {
        line == self.header_token
    }

    pub fn is_comment(&self, line: &str) -> bool {
        !self.comment_prefix.is_empty() && line.starts_with(&self.comment_prefix)
    }

    pub fn is_boilerplate(&self, line: &str) -> bool {
        self.boilerplate_markers
            .iter()
            .any(|marker| !marker.is_empty() && line.contains(marker.as_str()))
    }
}

/// Line-granularity classifier
///
/// Classification depends only on the line's content, never on its
/// position or neighbours, so wrapped cue text is classified (and later
/// translated) one line at a time.
#[derive(Debug, Clone, Default)]
pub struct CueClassifier {
    rules: ClassifierRules,
}

impl CueClassifier {
    pub fn new(rules: ClassifierRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ClassifierRules {
        &self.rules
    }

    /// Classify one raw line
    pub fn classify(&self, line: &str) -> Classification {
        let trimmed = line.trim();

        let structural = trimmed.is_empty()
            || self.rules.is_header(line)
            || self.rules.is_comment(line)
            || line.contains(self.rules.timing_delimiter.as_str())
            || trimmed.chars().all(|c| c.is_ascii_digit())
            || self.rules.is_boilerplate(line);

        if structural {
            Classification::Structural
        } else {
            Classification::Translatable
        }
    }

    /// Classify every line of a document in position order
    pub fn classify_document<'a>(
        &self,
        document: &'a SubtitleDocument,
    ) -> Vec<(&'a Line, Classification)> {
        document
            .lines()
            .iter()
            .map(|line| (line, self.classify(&line.text)))
            .collect()
    }
}
