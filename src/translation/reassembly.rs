/*!
 * Document reassembly.
 *
 * Places translated text back at its recorded positions and joins the
 * lines with each line's own line ending.
 */

use log::debug;

use crate::subtitle_processor::SubtitleDocument;

use super::batch::Substitution;

/// Rebuilds a document string from the original lines and substitutions
pub struct Reassembler;

impl Reassembler {
    /// Produce the final document text
    ///
    /// Lines without a substitution are emitted unchanged, so the header and
    /// every structural line survive byte for byte.
    pub fn reassemble(document: &SubtitleDocument, substitutions: &[Substitution]) -> String {
        let mut lines: Vec<&str> = document.lines().iter().map(|line| line.text.as_str()).collect();

        for substitution in substitutions {
            match lines.get_mut(substitution.position) {
                Some(slot) => *slot = substitution.text.as_str(),
                None => debug!(
                    "Ignoring substitution for position {} beyond document end ({} lines)",
                    substitution.position,
                    document.len()
                ),
            }
        }

        document.assemble(lines)
    }
}
