use crate::models::Candidate;
use crate::services::api::CandidateProvider;

/// Message shown to the user when the candidate list cannot be loaded
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load restaurant data. Please try again later.";

/// Progress of a one-shot load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Loaded(_) | LoadState::Failed(_))
    }
}

/// Lazy, one-shot candidate fetch: `Idle -> Loading -> Loaded | Failed`
///
/// Nothing is requested until `load` is first awaited. Later calls return the
/// settled state without touching the provider again.
pub struct CandidateLoader<'a, P> {
    provider: &'a P,
    state: LoadState<Vec<Candidate>>,
}

impl<'a, P: CandidateProvider> CandidateLoader<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            state: LoadState::Idle,
        }
    }

    pub fn state(&self) -> &LoadState<Vec<Candidate>> {
        &self.state
    }

    /// Run the fetch if it has not happened yet
    pub async fn load(&mut self) -> &LoadState<Vec<Candidate>> {
        if self.state.is_settled() {
            return &self.state;
        }

        self.state = LoadState::Loading;
        self.state = match self.provider.fetch_candidates().await {
            Ok(candidates) => {
                tracing::info!("Loaded {} candidates", candidates.len());
                LoadState::Loaded(candidates)
            }
            Err(e) => {
                tracing::error!("Failed to fetch candidates: {}", e);
                LoadState::Failed(LOAD_FAILED_MESSAGE.to_string())
            }
        };

        &self.state
    }

    /// The loaded candidates, once available
    pub fn candidates(&self) -> Option<&[Candidate]> {
        match &self.state {
            LoadState::Loaded(c) => Some(c.as_slice()),
            _ => None,
        }
    }
}
