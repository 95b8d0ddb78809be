use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::corpus::{Corpus, Record};
use crate::error::DataSourceError;
use crate::utils::Tokenizer;
use crate::vector_db::TermIndex;

/// Best-scoring record for a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub index: usize,
    pub score: f32,
}

/// Answers questions with the body of the most similar knowledge-base record.
///
/// Read-only after construction, so one engine can be shared across threads
/// behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct RetrievalEngine {
    corpus: Corpus,
    index: TermIndex,
    threshold: f32,
    fallback_message: String,
}

impl RetrievalEngine {
    pub fn load(config: &EngineConfig) -> Result<Self, DataSourceError> {
        let corpus =
            Corpus::load_csv(&config.data_path, &config.title_column, &config.body_column)?;
        let engine = Self::from_corpus(corpus, config);
        info!(
            path = %config.data_path.display(),
            records = engine.len(),
            vocabulary = engine.vocabulary_size(),
            "knowledge base loaded"
        );
        Ok(engine)
    }

    pub fn from_corpus(corpus: Corpus, config: &EngineConfig) -> Self {
        let texts: Vec<String> = corpus.iter().map(Record::combined_text).collect();
        let index = TermIndex::build(&texts, Tokenizer::from_config(config));

        RetrievalEngine {
            corpus,
            index,
            threshold: config.threshold,
            fallback_message: config.fallback_message.clone(),
        }
    }

    pub fn best_match(&self, query: &str) -> Option<Match> {
        self.index
            .best_match(query)
            .map(|(index, score)| Match { index, score })
    }

    /// Returns the matched record's body, or the fallback message when no
    /// record scores strictly above the threshold.
    pub fn get_response(&self, query: &str) -> String {
        match self.best_match(query) {
            Some(m) if m.score > self.threshold => {
                debug!(index = m.index, score = m.score, "matched");
                self.corpus
                    .get(m.index)
                    .map(|record| record.body.clone())
                    .unwrap_or_else(|| self.fallback_message.clone())
            }
            other => {
                debug!(score = ?other.map(|m| m.score), "no match above threshold");
                self.fallback_message.clone()
            }
        }
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.corpus.get(index)
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.index.vocabulary_size()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }
}
