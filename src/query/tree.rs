//! Query tree shapes, external (§4.7) and translated (§9).

/// A field-qualified subquery value: one surface term or several (the
/// several-term case is only meaningful for a subsequent exact-phrase
/// translation; the external parser does not itself know that).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Single(String),
    Multi(Vec<String>),
}

/// One leaf or nested group produced by the external parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubQuery {
    Field { field: Option<String>, value: FieldValue },
    Paren(Box<Group>),
}

/// A query's subqueries bucketed by sign. The root of a parsed query is
/// itself one `Group`; nested parenthesized groups are also `Group`s.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
    pub mandatory: Vec<SubQuery>,
    pub optional: Vec<SubQuery>,
    pub negative: Vec<SubQuery>,
}

impl Group {
    pub fn is_empty(&self) -> bool {
        self.mandatory.is_empty() && self.optional.is_empty() && self.negative.is_empty()
    }
}

/// A single subquery after translation: field qualification has been
/// resolved away and surface terms replaced by wordIds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslatedSub {
    /// A single wordId, or the sentinel values `0` (no information —
    /// unknown term) and `-1` (stopword).
    Term(i32),
    /// Several wordIds forming an exact-phrase match, in surface order.
    Phrase(Vec<i32>),
    Paren(Box<TranslatedGroup>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslatedGroup {
    pub mandatory: Vec<TranslatedSub>,
    pub optional: Vec<TranslatedSub>,
    pub negative: Vec<TranslatedSub>,
}
