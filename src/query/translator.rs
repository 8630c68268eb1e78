//! Walks an external parser tree, resolving surface terms to wordIds and
//! collecting the excerpt regex fragments and killed-word set (§4.7).

use std::collections::HashSet;

use crate::dictionary::{Dictionary, WordId};
use crate::error::Result;
use crate::lexer::Lexer;
use crate::query::tree::{FieldValue, Group, SubQuery, TranslatedGroup, TranslatedSub};

pub struct Translation {
    pub tree: TranslatedGroup,
    pub killed_words: HashSet<String>,
    pub words_regexes: Vec<String>,
}

pub struct Translator<'s> {
    dictionary: Dictionary<'s>,
    lexer: &'s Lexer,
    fieldname: Option<String>,
}

impl<'s> Translator<'s> {
    pub fn new(dictionary: Dictionary<'s>, lexer: &'s Lexer, fieldname: Option<String>) -> Self {
        Translator { dictionary, lexer, fieldname }
    }

    pub fn translate(&self, group: &Group) -> Result<Translation> {
        let mut killed_words = HashSet::new();
        let mut words_regexes = Vec::new();
        let tree = self.translate_group(group, &mut killed_words, &mut words_regexes)?;
        Ok(Translation { tree, killed_words, words_regexes })
    }

    fn translate_group(
        &self,
        group: &Group,
        killed_words: &mut HashSet<String>,
        words_regexes: &mut Vec<String>,
    ) -> Result<TranslatedGroup> {
        Ok(TranslatedGroup {
            mandatory: self.translate_subs(&group.mandatory, killed_words, words_regexes)?,
            optional: self.translate_subs(&group.optional, killed_words, words_regexes)?,
            negative: self.translate_subs(&group.negative, killed_words, words_regexes)?,
        })
    }

    fn translate_subs(
        &self,
        subs: &[SubQuery],
        killed_words: &mut HashSet<String>,
        words_regexes: &mut Vec<String>,
    ) -> Result<Vec<TranslatedSub>> {
        let mut out = Vec::with_capacity(subs.len());
        for sub in subs {
            if let Some(t) = self.translate_sub(sub, killed_words, words_regexes)? {
                out.push(t);
            }
        }
        Ok(out)
    }

    fn translate_sub(
        &self,
        sub: &SubQuery,
        killed_words: &mut HashSet<String>,
        words_regexes: &mut Vec<String>,
    ) -> Result<Option<TranslatedSub>> {
        match sub {
            SubQuery::Paren(group) => {
                let translated = self.translate_group(group, killed_words, words_regexes)?;
                Ok(Some(TranslatedSub::Paren(Box::new(translated))))
            }
            SubQuery::Field { field, value } => {
                if let Some(f) = field {
                    if self.fieldname.as_deref() != Some(f.as_str()) {
                        return Ok(None);
                    }
                }
                Ok(Some(self.translate_value(value, killed_words, words_regexes)?))
            }
        }
    }

    fn translate_value(
        &self,
        value: &FieldValue,
        killed_words: &mut HashSet<String>,
        words_regexes: &mut Vec<String>,
    ) -> Result<TranslatedSub> {
        let raw = match value {
            FieldValue::Single(s) => s.clone(),
            FieldValue::Multi(parts) => parts.join(" "),
        };

        let surface_terms = self.lexer.tokenize_str(&raw);
        if surface_terms.is_empty() {
            return Ok(TranslatedSub::Term(0));
        }

        let normalized_terms: Vec<String> =
            surface_terms.iter().map(|t| self.lexer.normalize(t)).collect();
        let escaped_surface: Vec<String> = surface_terms.iter().map(|t| regex::escape(t)).collect();
        let escaped_normalized: Vec<String> = normalized_terms.iter().map(|t| regex::escape(t)).collect();
        words_regexes.push(escaped_surface.join(r"\W+"));
        words_regexes.push(escaped_normalized.join(r"\W+"));

        let mut ids = Vec::with_capacity(surface_terms.len());
        for (surface, normalized) in surface_terms.iter().zip(normalized_terms.iter()) {
            let id = match self.dictionary.word_id_of_read(normalized)? {
                Some(WordId::Known(id)) => id as i32,
                Some(WordId::Stopword) => {
                    killed_words.insert(surface.clone());
                    -1
                }
                None => {
                    killed_words.insert(surface.clone());
                    0
                }
            };
            ids.push(id);
        }

        Ok(if ids.len() == 1 { TranslatedSub::Term(ids[0]) } else { TranslatedSub::Phrase(ids) })
    }
}
