use crate::error::{Result, SegmError};
use crate::types::CharId;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

pub(crate) fn validate_alphabet_size(alphabet_size: usize) -> Result<()> {
    let capacity = (u32::MAX as usize).saturating_add(1);
    if alphabet_size > capacity {
        return Err(SegmError::AlphabetOverflow(alphabet_size));
    }
    Ok(())
}

pub fn sentences_from_documents(documents: &[String], line_delimiter: Option<&str>) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut skipped = 0usize;

    let mut ingest_sentence = |sentence: &str| {
        let sentence = sentence.trim_end_matches(['\n', '\r']);
        if sentence.is_empty() {
            skipped += 1;
            return;
        }
        sentences.push(sentence.to_string());
    };

    for document in documents {
        match line_delimiter {
            Some(delim) if !delim.is_empty() => {
                for sentence in document.split(delim) {
                    ingest_sentence(sentence);
                }
            }
            _ => ingest_sentence(document),
        }
    }

    if skipped > 0 {
        warn!(skipped, "skipped empty sentences while loading corpus");
    }
    sentences
}

#[derive(Clone, Debug, Default)]
pub(crate) struct CharInterner {
    char_to_id: FxHashMap<char, CharId>,
    id_to_char: Vec<char>,
}

impl CharInterner {
    pub(crate) fn from_sentences(sentences: &[String]) -> Result<(Self, Vec<Vec<CharId>>)> {
        let uniq = sentences
            .iter()
            .flat_map(|sentence| sentence.chars())
            .collect::<FxHashSet<_>>();

        let mut sorted = uniq.into_iter().collect::<Vec<_>>();
        sorted.sort_unstable();
        validate_alphabet_size(sorted.len())?;

        let mut interner = Self::default();
        interner.char_to_id.reserve(sorted.len());
        interner.id_to_char.reserve(sorted.len());
        for ch in sorted {
            let id = interner.id_to_char.len() as CharId;
            interner.char_to_id.insert(ch, id);
            interner.id_to_char.push(ch);
        }

        let corpus_ids = sentences
            .iter()
            .map(|sentence| sentence.chars().map(|ch| interner.id_for(ch)).collect())
            .collect();

        Ok((interner, corpus_ids))
    }

    pub(crate) fn id_for(&self, ch: char) -> CharId {
        *self
            .char_to_id
            .get(&ch)
            .expect("character missing in interner while converting corpus")
    }

    pub(crate) fn maybe_id_for(&self, ch: char) -> Option<CharId> {
        self.char_to_id.get(&ch).copied()
    }

    pub(crate) fn char_for(&self, id: CharId) -> char {
        self.id_to_char[id as usize]
    }

    pub(crate) fn ids_to_string(&self, ids: &[CharId]) -> String {
        ids.iter().map(|id| self.id_to_char[*id as usize]).collect()
    }

    pub(crate) fn alphabet_size(&self) -> usize {
        self.id_to_char.len()
    }
}
