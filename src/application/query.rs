use crate::application::similarity_index::SimilarityIndex;
use crate::domain::error::DomainError;
use crate::domain::values::collection::Collection;
use crate::domain::values::relevance::Relevance;
use crate::domain::values::scores::{RankedMatch, SimilarityResult};

/// FAQ retrieval and movie ranking. Stateless apart from its settings.
pub struct QueryService {
    index: SimilarityIndex,
    faq_top_k: usize,
    threshold: f32,
}

impl QueryService {
    pub fn new(index: SimilarityIndex, faq_top_k: usize, threshold: f32) -> Self {
        Self {
            index,
            faq_top_k,
            threshold,
        }
    }

    /// Best `faq_top_k` answers across every FAQ source. Each match carries
    /// its source in the document's FAQ fields.
    pub fn search_faq(&self, query: &[f32]) -> Result<Vec<RankedMatch<'_>>, DomainError> {
        self.search_faq_top(query, self.faq_top_k)
    }

    pub fn search_faq_top(&self, query: &[f32], top_k: usize) -> Result<Vec<RankedMatch<'_>>, DomainError> {
        let results = self.index.rank(query, Collection::Faq, Some(top_k))?;
        Ok(self.annotate(results))
    }

    /// Every movie, best match first.
    pub fn rank_movies(&self, query: &[f32]) -> Result<Vec<RankedMatch<'_>>, DomainError> {
        let results = self.index.rank(query, Collection::Movie, None)?;
        Ok(self.annotate(results))
    }

    fn annotate<'a>(&self, results: Vec<SimilarityResult<'a>>) -> Vec<RankedMatch<'a>> {
        results
            .into_iter()
            .enumerate()
            .map(|(i, result)| RankedMatch {
                rank: i + 1,
                relevance: Relevance::classify(result.score, self.threshold),
                result,
            })
            .collect()
    }
}
