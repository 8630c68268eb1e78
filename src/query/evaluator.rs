//! Combines translated subqueries via intersection/union/difference and
//! computes IDF-like scores, including exact-phrase matching by position
//! proximity (§4.8).

use std::collections::HashMap;

use crate::error::Result;
use crate::postings::Postings;
use crate::query::tree::{TranslatedGroup, TranslatedSub};

pub type Scores = HashMap<u32, i64>;

pub struct Evaluator<'s> {
    postings: Postings<'s>,
}

impl<'s> Evaluator<'s> {
    pub fn new(postings: Postings<'s>) -> Self {
        Evaluator { postings }
    }

    pub fn evaluate(&self, group: &TranslatedGroup) -> Result<Option<Scores>> {
        let mut scores: Option<Scores> = None;

        // Step 1: mandatory group, intersected.
        for sub in &group.mandatory {
            let Some(sc) = self.score_sub(sub)? else { continue };
            scores = Some(match scores {
                None => sc,
                Some(mut acc) => {
                    acc.retain(|doc_id, _| sc.contains_key(doc_id));
                    for (doc_id, s) in &sc {
                        if let Some(existing) = acc.get_mut(doc_id) {
                            *existing += s;
                        }
                    }
                    acc
                }
            });
        }

        // Step 2: optional group, union-added; only extends the result set
        // when there was no mandatory group at all.
        let no_mandatory = scores.is_none();
        for sub in &group.optional {
            let Some(sc) = self.score_sub(sub)? else { continue };
            scores = Some(match scores {
                None => sc,
                Some(mut acc) => {
                    for (doc_id, s) in sc {
                        if let Some(existing) = acc.get_mut(&doc_id) {
                            *existing += s;
                        } else if no_mandatory {
                            acc.insert(doc_id, s);
                        }
                    }
                    acc
                }
            });
        }

        let Some(mut scores) = scores else { return Ok(None) };

        // Step 4: negative group, subtracted.
        for sub in &group.negative {
            if let Some(sc) = self.score_sub(sub)? {
                for doc_id in sc.keys() {
                    scores.remove(doc_id);
                }
            }
        }

        Ok(Some(scores))
    }

    fn score_sub(&self, sub: &TranslatedSub) -> Result<Option<Scores>> {
        match sub {
            TranslatedSub::Paren(group) => self.evaluate(group),
            TranslatedSub::Term(id) => self.score_term(*id),
            TranslatedSub::Phrase(ids) => self.score_phrase(ids),
        }
    }

    fn score_term(&self, word_id: i32) -> Result<Option<Scores>> {
        if word_id <= 0 {
            return Ok(None);
        }
        let records = self.postings.doc_list(word_id as u32)?;
        if records.is_empty() {
            return Ok(None);
        }

        let total_docs = self.postings.doc_count()? as f64;
        let k = records.len() as f64;
        let coeff = ((total_docs + 1.0) / k).ln() * 100.0;

        let mut scores = Scores::with_capacity(records.len());
        for rec in records {
            let score = (coeff * rec.occ as f64).floor() as i64;
            scores.insert(rec.doc_id, score);
        }
        Ok(Some(scores))
    }

    fn score_phrase(&self, word_ids: &[i32]) -> Result<Option<Scores>> {
        let mut scores: Option<Scores> = None;
        let mut positions: HashMap<u32, Vec<u32>> = HashMap::new();
        let mut word_delta: u32 = 0;

        for &word_id in word_ids {
            let sc = self.score_term(word_id)?;

            if scores.is_none() {
                // Anchor: the first term with any matches seeds the running
                // score and position map; a leading stopword/unknown term
                // just defers the anchor to the next word.
                if let Some(sc) = sc {
                    for &doc_id in sc.keys() {
                        positions.insert(doc_id, self.postings.positions(doc_id, word_id as u32)?);
                    }
                    scores = Some(sc);
                }
                continue;
            }

            word_delta += 1;
            let Some(sc) = sc else {
                // A stopword mid-phrase costs nothing: every tracked doc
                // keeps its running score and position set.
                continue;
            };

            let acc = scores.as_mut().expect("checked Some above");
            let mut surviving = Scores::with_capacity(acc.len());
            let mut surviving_positions = HashMap::with_capacity(acc.len());
            for (doc_id, running_score) in acc.drain() {
                let Some(add) = sc.get(&doc_id) else { continue };
                let prior = positions.get(&doc_id).cloned().unwrap_or_default();
                let new_pos = self.postings.positions(doc_id, word_id as u32)?;
                let near = near_positions(&prior, &new_pos, word_delta);
                if near.is_empty() {
                    continue;
                }
                surviving_positions.insert(doc_id, near);
                surviving.insert(doc_id, running_score + add);
            }
            positions = surviving_positions;

            if surviving.is_empty() {
                return Ok(None);
            }
            *acc = surviving;
        }

        Ok(scores)
    }
}

/// The subset of `b` with some `x` in `a` satisfying `0 < y - x <= delta`.
/// Both inputs must be sorted ascending (§4.8, §9: `wordDelta` is the count
/// of phrase terms seen since the anchor, not a fixed gap of 1).
pub fn near_positions(a: &[u32], b: &[u32], delta: u32) -> Vec<u32> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);

    while i < a.len() && j < b.len() {
        if b[j] > a[i] + delta {
            i += 1;
        } else if b[j] > a[i] {
            out.push(b[j]);
            j += 1;
        } else {
            j += 1;
        }
    }
    out
}
