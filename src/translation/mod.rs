/*!
 * Caption document translation pipeline.
 *
 * - `classifier`: Structural vs translatable line classification
 * - `batch`: Batch construction, provider calls and response correlation
 * - `reassembly`: Substitution and rejoining with the original line endings
 * - `core`: The `TranslationService` tying the three together
 */

// Re-export main types for easier usage
pub use self::batch::{
    BatchEntry, BatchOptions, BatchOutcome, BatchStatus, BatchTranslator, Substitution,
    TranslationBatch, TranslationResult,
};
pub use self::classifier::{Classification, ClassifierRules, CueClassifier};
pub use self::core::{TranslationOutcome, TranslationService, TranslationStats};
pub use self::reassembly::Reassembler;

// Submodules
pub mod batch;
pub mod classifier;
pub mod core;
pub mod reassembly;
