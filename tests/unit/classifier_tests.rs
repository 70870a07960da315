/*!
 * Tests for structural vs translatable line classification
 */

use vttlate::subtitle_processor::SubtitleDocument;
use vttlate::translation::{Classification, ClassifierRules, CueClassifier};

use crate::common::{ANNOTATED_VTT, SAMPLE_VTT};

fn translatable_texts(classifier: &CueClassifier, raw: &str) -> Vec<String> {
    let doc = SubtitleDocument::parse(raw);
    classifier
        .classify_document(&doc)
        .into_iter()
        .filter(|(_, class)| class.is_translatable())
        .map(|(line, _)| line.text.clone())
        .collect()
}

#[test]
fn test_classify_document_withSampleDocument_shouldOnlyPickProse() {
    let classifier = CueClassifier::default();
    assert_eq!(translatable_texts(&classifier, SAMPLE_VTT), vec!["Hello", "Goodbye"]);
}

#[test]
fn test_classify_document_withNotesAndBoilerplate_shouldSkipThem() {
    let classifier = CueClassifier::default();
    assert_eq!(
        translatable_texts(&classifier, ANNOTATED_VTT),
        vec!["Tere hommikust", "Kuidas läheb?"]
    );
}

#[test]
fn test_classify_withHeaderVariants_shouldOnlyMatchExactHeader() {
    let classifier = CueClassifier::default();
    assert_eq!(classifier.classify("WEBVTT"), Classification::Structural);
    // A header with a description is prose as far as the classifier is concerned
    assert_eq!(classifier.classify("WEBVTT - Episode 1"), Classification::Translatable);
}

#[test]
fn test_classify_withCueIdentifiersAndTimings_shouldBeStructural() {
    let classifier = CueClassifier::default();
    assert_eq!(classifier.classify("42"), Classification::Structural);
    assert_eq!(classifier.classify(" 7 "), Classification::Structural);
    assert_eq!(
        classifier.classify("00:01:02.000 --> 00:01:04.500 align:start position:10%"),
        Classification::Structural
    );
    assert_eq!(classifier.classify("42 apples"), Classification::Translatable);
}

#[test]
fn test_classify_withCustomRules_shouldUseThem() {
    let rules = ClassifierRules::default().with_boilerplate("[MUSIC]");
    let classifier = CueClassifier::new(rules);

    assert_eq!(classifier.classify("[MUSIC] playing"), Classification::Structural);
    assert_eq!(classifier.classify("ERR Heli tekstiks"), Classification::Structural);
    assert_eq!(classifier.rules().boilerplate_markers.len(), 2);
}

#[test]
fn test_classify_isDeterministic() {
    let classifier = CueClassifier::default();
    for line in ["Tere", "", "NOTE x", "00:00:00.000 --> 00:00:01.000"] {
        assert_eq!(classifier.classify(line), classifier.classify(line));
    }
}
