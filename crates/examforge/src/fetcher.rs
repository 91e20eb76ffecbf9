//! Progressive batch delivery.
//!
//! A session accumulates question items in small batches so the first few
//! are usable while the rest arrive. One session is active at a time;
//! starting a new session invalidates the old token, and any in-flight
//! batch for a stale token is discarded on arrival rather than cancelled.

use crate::Orchestrator;
use examforge_core::{FetchTarget, PracticePlan, Question};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Token identifying one fetch session.
///
/// Results are only merged while the token that requested them is still
/// the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub struct SessionId(Uuid);

impl SessionId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug)]
struct SessionState {
    id: SessionId,
    plan: PracticePlan,
    items: Vec<Question>,
    seen: HashSet<String>,
}

impl SessionState {
    fn new(plan: PracticePlan) -> Self {
        Self {
            id: SessionId::fresh(),
            plan,
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn absorb(&mut self, questions: impl IntoIterator<Item = Question>) -> usize {
        let mut added = 0;
        for question in questions {
            if self.seen.insert(question.id.clone()) {
                self.items.push(question);
                added += 1;
            }
        }
        added
    }
}

/// Clears the fetching flag when a fill round ends, however it ends.
struct FetchingFlag<'a>(&'a AtomicBool);

impl Drop for FetchingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Accumulates a session's question items batch by batch.
///
/// States: idle, fetching, and waiting out the inter-round backoff. At
/// most one fill loop runs at a time; a second call while one is active
/// returns immediately.
///
/// # Examples
///
/// ```no_run
/// use examforge::{Orchestrator, OrchestratorConfig, ProgressiveFetcher};
/// use examforge_core::{FetchTarget, PracticePlan};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let orchestrator = Arc::new(Orchestrator::from_config(&OrchestratorConfig::load()?));
/// let fetcher = ProgressiveFetcher::new(orchestrator);
///
/// let plan = PracticePlan::builder()
///     .exam("SSC CGL".to_string())
///     .subject("General Awareness".to_string())
///     .target(FetchTarget::Count(20))
///     .build()?;
/// let session = fetcher.start_session(plan);
/// fetcher.fill(session).await;
/// assert!(!fetcher.is_fetching());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ProgressiveFetcher {
    orchestrator: Arc<Orchestrator>,
    backoff: Duration,
    state: Mutex<Option<SessionState>>,
    fetching: AtomicBool,
}

impl ProgressiveFetcher {
    /// Fetcher using the orchestrator's configured batch settings.
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        let backoff = orchestrator.batch_settings().backoff();
        Self {
            orchestrator,
            backoff,
            state: Mutex::new(None),
            fetching: AtomicBool::new(false),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, Option<SessionState>> {
        match self.state.lock() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Begin a new session, invalidating any previous one.
    ///
    /// In-flight results for the old session are discarded when they land.
    pub fn start_session(&self, plan: PracticePlan) -> SessionId {
        let state = SessionState::new(plan);
        let id = state.id;
        info!(session = %id, "Started fetch session");
        *self.lock_state() = Some(state);
        id
    }

    /// Seed the active session with already-available items (approved
    /// content, restored state). Seeded ids participate in deduplication.
    pub fn seed_items(&self, session: SessionId, items: Vec<Question>) {
        let mut state = self.lock_state();
        match state.as_mut() {
            Some(state) if state.id == session => {
                let added = state.absorb(items);
                debug!(session = %session, added, "Seeded session");
            }
            _ => debug!(session = %session, "Ignoring seed for stale session"),
        }
    }

    /// Snapshot of the items delivered so far.
    pub fn items(&self) -> Vec<Question> {
        self.lock_state()
            .as_ref()
            .map(|state| state.items.clone())
            .unwrap_or_default()
    }

    /// Number of items delivered so far.
    pub fn delivered(&self) -> usize {
        self.lock_state()
            .as_ref()
            .map(|state| state.items.len())
            .unwrap_or_default()
    }

    /// Whether a fill loop is currently running.
    pub fn is_fetching(&self) -> bool {
        self.fetching.load(Ordering::SeqCst)
    }

    /// Run batch rounds until the session target is reached, a batch
    /// fails, or a round adds nothing new.
    ///
    /// For a [`FetchTarget::Count`] target the loop pauses between rounds
    /// and asks for no more than the remaining shortfall, so it never
    /// overshoots by more than one batch. For [`FetchTarget::Endless`] one
    /// round runs per call; use [`notify_near_tail`]
    /// (ProgressiveFetcher::notify_near_tail) to request the next. A
    /// failed batch ends the loop, keeping everything delivered so far.
    ///
    /// Returns immediately when another fill loop is already running or
    /// the session token is stale.
    #[instrument(skip(self), fields(session = %session))]
    pub async fn fill(&self, session: SessionId) {
        if self.fetching.swap(true, Ordering::SeqCst) {
            debug!("Fill already in progress");
            return;
        }
        let _flag = FetchingFlag(&self.fetching);

        loop {
            let (plan, have) = {
                let state = self.lock_state();
                match state.as_ref() {
                    Some(state) if state.id == session => {
                        (state.plan.clone(), state.items.len())
                    }
                    _ => {
                        debug!("Session replaced, abandoning fill");
                        return;
                    }
                }
            };

            let ask = match plan.target() {
                FetchTarget::Count(total) if have >= *total => {
                    info!(delivered = have, "Session target reached");
                    return;
                }
                FetchTarget::Count(total) => (*total - have).min(*plan.batch_size()),
                FetchTarget::Endless => *plan.batch_size(),
            };

            let batch = match self
                .orchestrator
                .generate_question_batch(&plan, ask)
                .await
            {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(error = %e, delivered = have, "Batch failed, stopping fill");
                    return;
                }
            };

            let added = {
                let mut state = self.lock_state();
                match state.as_mut() {
                    Some(state) if state.id == session => state.absorb(batch),
                    _ => {
                        debug!("Session replaced mid-batch, discarding results");
                        return;
                    }
                }
            };
            debug!(added, "Merged batch");

            if added == 0 {
                // Nothing but repeats: the provider has run out of fresh
                // material for this plan.
                warn!("Batch added no new items, stopping fill");
                return;
            }

            if matches!(plan.target(), FetchTarget::Endless) {
                return;
            }
            if let FetchTarget::Count(total) = plan.target() {
                if have + added >= *total {
                    info!(delivered = have + added, "Session target reached");
                    return;
                }
            }

            tokio::time::sleep(self.backoff).await;
        }
    }

    /// For endless sessions: the consumer is nearing the tail, fetch one
    /// more round. A no-op for counted sessions that already hit their
    /// target or when a fill is in flight.
    pub async fn notify_near_tail(&self, session: SessionId) {
        self.fill(session).await;
    }
}
