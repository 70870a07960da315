/*!
 * Segmented subtitle streams.
 *
 * HLS players load WebVTT subtitles as numbered fragments. This module
 * downloads every fragment of a stream, merges them into one document and
 * removes what the merge duplicates: repeated headers, comment blocks,
 * broadcaster boilerplate and cues that overlap between fragments.
 */

use log::{error, info, warn};
use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::AppError;
use crate::interceptor::DocumentSource;
use crate::subtitle_processor::BYTE_ORDER_MARK;
use crate::translation::classifier::ClassifierRules;

/// Placeholder replaced by the fragment index
pub const FRAGMENT_PLACEHOLDER: &str = "{}";

/// Give up after this many fragments in a row could not be fetched
const MAX_CONSECUTIVE_FAILURES: usize = 5;

/// Downloaded fragments of one stream
#[derive(Debug, Clone, Default)]
pub struct MergedFragments {
    /// Fragment bodies joined with newlines
    pub text: String,
    /// Fragments fetched successfully
    pub fetched: usize,
    /// Fragments that failed and contributed nothing
    pub failed: usize,
}

/// Sequential fragment downloader
#[derive(Debug, Clone)]
pub struct FragmentFetcher {
    source: Arc<dyn DocumentSource>,
    max_fragments: usize,
}

impl FragmentFetcher {
    pub fn new(source: Arc<dyn DocumentSource>, max_fragments: usize) -> Self {
        Self {
            source,
            max_fragments,
        }
    }

    /// URL of fragment `index`
    pub fn fragment_url(template: &str, index: usize) -> String {
        template.replacen(FRAGMENT_PLACEHOLDER, &index.to_string(), 1)
    }

    /// Fetch fragments 0, 1, 2, ... until the server answers 404
    ///
    /// Failed fragments are logged and skipped. `on_fragment` is called with
    /// the index of every fragment attempted.
    pub async fn fetch_all(
        &self,
        template: &str,
        on_fragment: impl Fn(usize),
    ) -> Result<MergedFragments, AppError> {
        if !template.contains(FRAGMENT_PLACEHOLDER) {
            return Err(AppError::Config(format!(
                "Fragment URL template must contain '{}': {}",
                FRAGMENT_PLACEHOLDER, template
            )));
        }

        let mut bodies = Vec::new();
        let mut merged = MergedFragments::default();
        let mut consecutive_failures = 0;

        for index in 0..self.max_fragments {
            let url = Self::fragment_url(template, index);
            on_fragment(index);

            match self.source.fetch(&url).await {
                Ok(fetched) if fetched.status == 404 => break,
                Ok(fetched) if fetched.is_success() => {
                    info!("Fetched fragment-{}", index);
                    bodies.push(fetched.body);
                    merged.fetched += 1;
                    consecutive_failures = 0;
                    continue;
                }
                Ok(fetched) => {
                    warn!("Failed to fetch fragment-{}, status code: {}", index, fetched.status);
                }
                Err(e) => {
                    error!("Error fetching fragment-{}: {}", index, e);
                }
            }

            merged.failed += 1;
            consecutive_failures += 1;
            if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                warn!("Stopping after {} failed fragments in a row", consecutive_failures);
                break;
            }
        }

        if merged.fetched == 0 {
            return Err(AppError::Fetch(format!("No fragments could be fetched from {}", template)));
        }

        merged.text = bodies.join("\n");
        Ok(merged)
    }
}

/// Clean a merged fragment document
///
/// Works on blank-line separated blocks. Only the first header block is
/// kept, comment blocks are dropped, boilerplate lines are removed (and a
/// cue left without any text goes with them), and a block identical to an
/// earlier one is dropped. Byte order marks are removed from every fragment
/// so repeated headers are recognised.
pub fn clean_merged(text: &str, rules: &ClassifierRules) -> String {
    let normalized = text.replace("\r\n", "\n").replace(BYTE_ORDER_MARK, "");
    let mut seen: HashSet<String> = HashSet::new();
    let mut header_seen = false;
    let mut blocks: Vec<String> = Vec::new();

    for block in split_blocks(&normalized) {
        let first = block[0];

        if first.starts_with(rules.header_token.as_str()) {
            if !header_seen {
                header_seen = true;
                blocks.push(block.join("\n"));
            }
            continue;
        }

        if rules.is_comment(first) {
            continue;
        }

        let kept: Vec<&str> = block.iter().copied().filter(|line| !rules.is_boilerplate(line)).collect();
        let lost_text = kept.len() < block.len()
            && !kept.iter().any(|line| is_cue_text(line, rules));
        if kept.is_empty() || lost_text {
            continue;
        }

        let joined = kept.join("\n");
        if seen.insert(joined.clone()) {
            blocks.push(joined);
        }
    }

    if blocks.is_empty() {
        return String::new();
    }

    let mut cleaned = blocks.join("\n\n");
    cleaned.push('\n');
    cleaned
}

fn is_cue_text(line: &str, rules: &ClassifierRules) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && !line.contains(rules.timing_delimiter.as_str())
        && !trimmed.chars().all(|c| c.is_ascii_digit())
}

/// Group non-blank lines into blocks
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}
