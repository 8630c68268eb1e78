//! End-to-end scenarios from the testable-properties section of the design:
//! a small corpus indexed and queried through the public `Indexer` surface.

use ixcore::{ErrorKind, Indexer, IndexerConfig, StopwordsSource};
use tempfile::tempdir;

fn open(dir: &std::path::Path, write_mode: bool) -> Indexer {
    let config = IndexerConfig { dir: dir.to_path_buf(), write_mode, ..IndexerConfig::default() };
    Indexer::open(config).unwrap()
}

fn seed(indexer: &Indexer) {
    indexer.add(1, "the quick brown fox").unwrap();
    indexer.add(2, "quick brown dogs").unwrap();
    indexer.add(3, "the lazy fox").unwrap();
}

fn docs(result: &ixcore::SearchResult) -> Vec<u32> {
    let mut docs: Vec<_> = result.scores.keys().copied().collect();
    docs.sort();
    docs
}

#[test]
fn scenario_1_boolean_and_phrase_queries() {
    let dir = tempdir().unwrap();
    let indexer = open(dir.path(), true);
    seed(&indexer);

    assert_eq!(docs(&indexer.search("brown", true).unwrap()), vec![1, 2]);
    assert_eq!(docs(&indexer.search("the", true).unwrap()), vec![1, 3]);
    assert_eq!(docs(&indexer.search("\"quick brown\"", true).unwrap()), vec![1, 2]);
    assert_eq!(docs(&indexer.search("+brown -dogs", false).unwrap()), vec![1]);

    // "fox OR dogs": both optional, neither mandatory.
    let or_query = indexer.search("fox dogs", false).unwrap();
    assert_eq!(docs(&or_query), vec![1, 2, 3]);
}

#[test]
fn scenario_2_stopwords_keep_ordinal_positions() {
    let dir = tempdir().unwrap();
    let mut config = IndexerConfig { dir: dir.path().to_path_buf(), write_mode: true, ..Default::default() };
    config.stopwords = Some(StopwordsSource::Words(vec!["the".to_string()]));
    let indexer = Indexer::open(config).unwrap();
    seed(&indexer);

    let result = indexer.search("the fox", true).unwrap();
    assert_eq!(docs(&result), vec![1, 3]);
    assert!(result.killed_words.contains(&"the".to_string()));

    // "fox" is the 4th regex match in doc 1 ("the quick brown fox"); dropping
    // "the" from the dictionary must not renumber it down to 3.
    assert!(indexer.dump().unwrap().iter().any(|(t, _)| t == "fox"));
}

#[test]
fn scenario_3_near_positions_fixture() {
    assert_eq!(
        ixcore::query::evaluator::near_positions(&[2, 10], &[3, 11, 20], 1),
        vec![3, 11]
    );
    assert_eq!(
        ixcore::query::evaluator::near_positions(&[2, 10], &[12, 15], 1),
        Vec::<u32>::new()
    );
}

#[test]
fn scenario_4_doc_occ_round_trips_with_clamping() {
    let rec = ixcore::codec::DocOcc::new(300_000, 7);
    assert_eq!(rec.doc_id, 300_000);
    assert_eq!(rec.occ, 7);

    let clamped = ixcore::codec::DocOcc::new(300_000, 300);
    assert_eq!(clamped.occ, 255);
}

#[test]
fn scenario_5_excerpter_merges_near_matches() {
    let dir = tempdir().unwrap();
    let mut config = IndexerConfig { dir: dir.path().to_path_buf(), write_mode: true, ..Default::default() };
    config.ctxt_num_chars = 4;
    config.pre_match = "[".to_string();
    config.post_match = "]".to_string();
    let indexer = Indexer::open(config).unwrap();
    indexer.add(1, "aa FOO bb FOO cc").unwrap();

    let result = indexer.search("foo", true).unwrap();
    let snippets = indexer.excerpts("aa FOO bb FOO cc", &result.regex);
    assert_eq!(snippets, vec!["...aa [FOO] bb [FOO] cc...".to_string()]);
}

#[test]
fn scenario_6_removing_unadded_doc_is_a_postings_noop() {
    let dir = tempdir().unwrap();
    let indexer = open(dir.path(), true);
    seed(&indexer);

    // docId 99 was never added; removing it must not disturb existing
    // postings, though NDOCS still moves per the documented decision.
    indexer.remove(99, "brown").unwrap();
    assert_eq!(docs(&indexer.search("brown", true).unwrap()), vec![1, 2]);
}

#[test]
fn add_remove_round_trip_clears_postings_and_restores_ndocs() {
    let dir = tempdir().unwrap();
    let indexer = open(dir.path(), true);
    indexer.add(1, "quick brown fox").unwrap();
    indexer.add(2, "quick brown fox").unwrap();

    indexer.remove(1, "quick brown fox").unwrap();
    assert_eq!(docs(&indexer.search("brown", true).unwrap()), vec![2]);
}

#[test]
fn duplicate_add_without_remove_is_rejected() {
    let dir = tempdir().unwrap();
    let indexer = open(dir.path(), true);
    indexer.add(1, "quick fox").unwrap();
    let err = indexer.add(1, "quick fox").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DupDoc));
}

#[test]
fn read_only_handle_cannot_configure_stopwords() {
    let dir = tempdir().unwrap();
    {
        open(dir.path(), true);
    }
    let mut config = IndexerConfig { dir: dir.path().to_path_buf(), write_mode: false, ..Default::default() };
    config.stopwords = Some(StopwordsSource::Words(vec!["the".to_string()]));
    let err = Indexer::open(config).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StopwordsInReadMode));
}

#[test]
fn second_write_handle_on_the_same_dir_fails_fast() {
    let dir = tempdir().unwrap();
    let _first = open(dir.path(), true);
    let config = IndexerConfig { dir: dir.path().to_path_buf(), write_mode: true, ..Default::default() };
    let err = Indexer::open(config).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AlreadyOpenForWrite));
}
