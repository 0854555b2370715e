mod support;

use feed_core::{
    ClassificationEngine, ClassificationStatus, Document, FallbackMarker, KeywordKind,
    Precedence, Reclassification, Rule,
};
use pretty_assertions::assert_eq;
use support::{doc, init_logging, marked};

fn statuses(docs: &[Document]) -> Vec<ClassificationStatus> {
    docs.iter().map(|d| d.status).collect()
}

#[test]
fn default_precedence_matches_the_server() {
    assert_eq!(
        Precedence::default().rules(),
        &[
            Rule::PositiveKeyword,
            Rule::NegativeKeyword,
            Rule::FallbackKeep,
            Rule::FallbackDiscard,
        ]
    );
}

#[test]
fn positive_keywords_win_over_everything_else() {
    init_logging();
    let engine = ClassificationEngine::default();

    let both = doc("1", "cats and dogs")
        .with_keyword(KeywordKind::Positive, "cats")
        .with_keyword(KeywordKind::Negative, "dogs");
    assert_eq!(engine.classify(&both), ClassificationStatus::Keep);

    let negative_over_marker =
        marked("2", "dogs", FallbackMarker::Keep).with_keyword(KeywordKind::Negative, "dogs");
    assert_eq!(engine.classify(&negative_over_marker), ClassificationStatus::Discard);

    assert_eq!(
        engine.classify(&marked("3", "plain", FallbackMarker::Discard)),
        ClassificationStatus::Discard
    );
    assert_eq!(engine.classify(&doc("4", "plain")), ClassificationStatus::Unknown);
}

#[test]
fn precedence_can_be_reordered() {
    let engine = ClassificationEngine::new(Precedence::new(vec![
        Rule::NegativeKeyword,
        Rule::PositiveKeyword,
    ]));
    let both = doc("1", "cats and dogs")
        .with_keyword(KeywordKind::Positive, "cats")
        .with_keyword(KeywordKind::Negative, "dogs");

    assert_eq!(engine.classify(&both), ClassificationStatus::Discard);
    // Markers are ignored when no rule mentions them.
    assert_eq!(
        engine.classify(&marked("2", "x", FallbackMarker::Keep)),
        ClassificationStatus::Unknown
    );
}

#[test]
fn keyword_lifecycle_reclassifies_and_counts_each_document_once() {
    init_logging();
    let engine = ClassificationEngine::default();
    let mut docs = vec![
        doc("1", "I love cats"),
        marked("2", "Cats and dogs", FallbackMarker::Discard)
            .with_status(ClassificationStatus::Discard),
        marked("3", "no pets here", FallbackMarker::Keep).with_status(ClassificationStatus::Keep),
    ];

    let added = engine.apply_keyword(KeywordKind::Positive, "cats", docs.iter_mut());
    assert_eq!(
        added,
        Reclassification {
            changed: 2,
            kept_delta: 2,
        }
    );
    assert_eq!(
        statuses(&docs),
        vec![
            ClassificationStatus::Keep,
            ClassificationStatus::Keep,
            ClassificationStatus::Keep,
        ]
    );
    assert_eq!(docs[1].deciding_keywords(), vec!["cats".to_string()]);

    let flipped = engine.apply_keyword(KeywordKind::Negative, "cats", docs.iter_mut());
    assert_eq!(
        flipped,
        Reclassification {
            changed: 2,
            kept_delta: -2,
        }
    );
    for d in &docs[..2] {
        assert!(!d.positive.contains("cats"));
        assert!(d.negative.contains("cats"));
    }

    let removed = engine.remove_keyword(KeywordKind::Negative, "cats", docs.iter_mut());
    assert_eq!(
        removed,
        Reclassification {
            changed: 1,
            kept_delta: 0,
        }
    );
    assert_eq!(
        statuses(&docs),
        vec![
            ClassificationStatus::Unknown,
            ClassificationStatus::Discard,
            ClassificationStatus::Keep,
        ]
    );
}

#[test]
fn applying_the_same_keyword_twice_changes_nothing_the_second_time() {
    init_logging();
    let engine = ClassificationEngine::default();
    let mut docs = vec![doc("1", "rust is fun"), doc("2", "go is fun")];

    let first = engine.apply_keyword(KeywordKind::Negative, "fun", docs.iter_mut());
    let snapshot = docs.clone();
    let second = engine.apply_keyword(KeywordKind::Negative, "fun", docs.iter_mut());

    assert_eq!(first.changed, 2);
    assert!(second.is_empty());
    assert_eq!(docs, snapshot);
}

#[test]
fn add_then_remove_restores_the_original_status() {
    init_logging();
    let engine = ClassificationEngine::default();
    let original = vec![
        marked("1", "tokio runtime", FallbackMarker::Discard)
            .with_status(ClassificationStatus::Discard),
        doc("2", "unrelated"),
    ];
    let mut docs = original.clone();

    engine.apply_keyword(KeywordKind::Positive, "Tokio", docs.iter_mut());
    assert_eq!(docs[0].status, ClassificationStatus::Keep);
    engine.remove_keyword(KeywordKind::Positive, "tokio", docs.iter_mut());

    assert_eq!(docs, original);
}

#[test]
fn matching_is_case_insensitive_and_respects_word_boundaries() {
    init_logging();
    let engine = ClassificationEngine::default();
    let mut docs = vec![
        doc("1", "CAT pictures"),
        doc("2", "concatenate strings"),
        doc("3", "cat_food"),
    ];

    let change = engine.apply_keyword(KeywordKind::Positive, "cat", docs.iter_mut());

    assert_eq!(change.changed, 1);
    assert_eq!(
        statuses(&docs),
        vec![
            ClassificationStatus::Keep,
            ClassificationStatus::Unknown,
            ClassificationStatus::Unknown,
        ]
    );
}

#[test]
fn regex_metacharacters_match_literally() {
    init_logging();
    let engine = ClassificationEngine::default();
    let mut docs = vec![doc("1", "I write c++ daily"), doc("2", "I write c daily")];

    let change = engine.apply_keyword(KeywordKind::Positive, "c++", docs.iter_mut());

    assert_eq!(change.changed, 1);
    assert_eq!(docs[0].status, ClassificationStatus::Keep);
    assert_eq!(docs[1].status, ClassificationStatus::Unknown);
}

#[test]
fn empty_keyword_leaves_documents_alone() {
    init_logging();
    let engine = ClassificationEngine::default();
    let mut docs = vec![doc("1", "anything")];
    let original = docs.clone();

    assert!(engine
        .apply_keyword(KeywordKind::Positive, "", docs.iter_mut())
        .is_empty());
    assert!(engine
        .remove_keyword(KeywordKind::Positive, "", docs.iter_mut())
        .is_empty());
    assert_eq!(docs, original);
}

#[test]
fn removing_an_unknown_keyword_touches_nothing() {
    init_logging();
    let engine = ClassificationEngine::default();
    let mut docs = vec![doc("1", "cats").with_keyword(KeywordKind::Positive, "cats")];
    docs[0].status = ClassificationStatus::Keep;

    let change = engine.remove_keyword(KeywordKind::Negative, "cats", docs.iter_mut());

    assert!(change.is_empty());
    assert_eq!(docs[0].status, ClassificationStatus::Keep);
    assert!(docs[0].positive.contains("CATS"));
}
