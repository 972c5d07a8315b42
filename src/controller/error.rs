//! Build errors for the draw controller.

use thiserror::Error;

/// Errors that can occur when assembling a [`DrawController`].
///
/// [`DrawController`]: super::DrawController
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Selector not specified. Call .selector(selector) before .build()")]
    MissingSelector,

    #[error("History storage not specified. Call .storage(store) before .build()")]
    MissingStorage,

    #[error("Scheduler not specified. Call .scheduler(scheduler) before .build()")]
    MissingScheduler,

    #[error("Display not specified. Call .display(surface) before .build()")]
    MissingDisplay,
}
