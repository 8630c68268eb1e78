//! Minimal end-to-end usage: open a write-mode index, add a few documents,
//! mark a stopword, run a phrase query, and print an excerpt.

use ixcore::{Indexer, IndexerConfig, StopwordsSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let dir = tempfile::tempdir()?;
    let config = IndexerConfig {
        dir: dir.path().to_path_buf(),
        write_mode: true,
        stopwords: Some(StopwordsSource::Words(vec!["the".to_string()])),
        ..IndexerConfig::default()
    };
    let indexer = Indexer::open(config)?;

    indexer.add(1, "the quick brown fox jumps over the lazy dog")?;
    indexer.add(2, "quick brown dogs bark at the quick fox")?;
    indexer.add(3, "the lazy fox sleeps all day")?;

    let result = indexer.search("\"quick brown\"", true)?;
    println!("docs matching \"quick brown\": {:?}", result.scores);
    println!("killed words: {:?}", result.killed_words);

    for (doc_id, buf) in [
        (1, "the quick brown fox jumps over the lazy dog"),
        (2, "quick brown dogs bark at the quick fox"),
    ] {
        for snippet in indexer.excerpts(buf, &result.regex) {
            println!("doc {doc_id}: {snippet}");
        }
    }

    Ok(())
}
