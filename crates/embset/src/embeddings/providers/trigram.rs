//! Offline text embeddings built from hashed character trigrams.

use crate::embeddings::provider::EmbeddingProvider;
use crate::similarity::normalize;
use crate::types::Vector;
use embset_core::AppResult;
use std::collections::BTreeMap;

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them",
];

/// Deterministic feature-hashing provider for local, offline use.
///
/// Each remaining word (lowercased, stop words and words shorter than three
/// characters dropped) contributes its character trigrams and the whole word
/// to hashed buckets. Not semantic, but stable and content-dependent, which
/// is what tests and demos need.
#[derive(Debug, Clone)]
pub struct TrigramProvider {
    dimensions: usize,
    normalize: bool,
}

impl TrigramProvider {
    /// Create a new trigram provider with specified dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            normalize: true,
        }
    }

    /// Toggle scaling of output vectors to unit length.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    fn bucket(&self, bytes: impl Iterator<Item = u8>, multiplier: u64) -> usize {
        let hash = bytes.fold(0u64, |acc, b| acc.wrapping_mul(multiplier).wrapping_add(b as u64));
        (hash % self.dimensions as u64) as usize
    }

    fn embed_text(&self, text: &str) -> Vector {
        let mut embedding = vec![0.0; self.dimensions];
        let lower = text.to_lowercase();

        let mut frequencies: BTreeMap<&str, u32> = BTreeMap::new();
        for word in lower.split_whitespace() {
            if word.chars().count() > 2 && !STOP_WORDS.contains(&word) {
                *frequencies.entry(word).or_insert(0) += 1;
            }
        }

        for (word, freq) in frequencies {
            let chars: Vec<char> = word.chars().collect();
            let trigram_weight = (freq as f32).sqrt();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                let idx = self.bucket(trigram.bytes(), 37);
                embedding[idx] += trigram_weight;
            }

            let idx = self.bucket(word.bytes(), 31);
            embedding[idx] += freq as f32;
        }

        if self.normalize {
            normalize(&mut embedding);
        }
        embedding
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, inputs: &[String]) -> AppResult<Vec<Vector>> {
        Ok(inputs.iter().map(|text| self.embed_text(text)).collect())
    }
}
