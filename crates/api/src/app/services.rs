use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cmi_extraction::{BatchPolicy, DocumentExtractor, GeminiExtractor, SourceDocument, run_batch};

use crate::config::Config;
use crate::session::{Session, SessionError, SubmissionReport};

/// Shared state behind every handler: one session and the extractor that
/// feeds it.
pub struct AppServices {
    session: Mutex<Session>,
    extractor: Arc<dyn DocumentExtractor>,
    policy: BatchPolicy,
}

impl AppServices {
    pub fn new(extractor: Arc<dyn DocumentExtractor>, policy: BatchPolicy) -> Self {
        Self {
            session: Mutex::new(Session::new()),
            extractor,
            policy,
        }
    }

    /// Production wiring: Gemini extractor from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(GeminiExtractor::new(config.gemini.clone())),
            config.batch_policy,
        )
    }

    /// Lock the session. A panic in another handler never wedges the session.
    pub fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one upload through the extractor and commit it to the session.
    ///
    /// The session lock is released while the batch runs; `loading` is what
    /// keeps a second submission out.
    pub async fn submit(
        self: Arc<Self>,
        documents: Vec<SourceDocument>,
    ) -> Result<SubmissionReport, SessionError> {
        self.session().begin_submission()?;
        let mut pending = PendingSubmission {
            services: &*self,
            finished: false,
        };

        let outcome = run_batch(self.extractor.as_ref(), &documents, self.policy).await;

        pending.finished = true;
        Ok(self.session().finish_submission(outcome))
    }
}

/// Releases `loading` if a batch future is dropped before it commits
/// (extractor panic or task cancellation).
struct PendingSubmission<'a> {
    services: &'a AppServices,
    finished: bool,
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::error!("extraction batch ended without an outcome");
            self.services.session().abort_submission();
        }
    }
}
