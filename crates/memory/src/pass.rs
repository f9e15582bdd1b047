//! The cleanup registry and the LIFO pass shared by both managers.

use scopekit_core::{BoxError, CleanupFailure, Error, FailureCause, FailurePolicy, Result};
use scopekit_utils::catch_panic;
use scopekit_utils::tracing as events;
use std::borrow::Cow;

pub(crate) type CleanupResult = std::result::Result<(), BoxError>;

/// Options a pass reads from its manager
#[derive(Debug, Clone, Copy)]
pub(crate) struct PassOptions {
    pub policy: FailurePolicy,
    pub log_each_callback: bool,
}

pub(crate) struct CleanupEntry<A> {
    label: Option<Cow<'static, str>>,
    action: A,
}

/// Pending callbacks of the current session, in registration order
pub(crate) struct CleanupRegistry<A> {
    entries: Vec<CleanupEntry<A>>,
}

impl<A> CleanupRegistry<A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, label: Option<Cow<'static, str>>, action: A) {
        self.entries.push(CleanupEntry { label, action });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Detach the current session, leaving the registry empty
    pub fn take(&mut self) -> Vec<CleanupEntry<A>> {
        std::mem::take(&mut self.entries)
    }
}

/// Run `entries` last-first.
///
/// Panics are caught and recorded like returned errors. Whatever the policy,
/// every entry is consumed: run, or dropped unrun after a fail-fast abort.
pub(crate) fn run_pass<A>(entries: Vec<CleanupEntry<A>>, options: PassOptions) -> Result<()>
where
    A: FnOnce() -> CleanupResult,
{
    if entries.is_empty() {
        return Ok(());
    }

    let span = events::cleanup_pass_span(entries.len(), options.policy);
    let _enter = span.enter();
    tracing::debug!("Executing {} cleanup functions", entries.len());

    let mut attempted = 0;
    let mut failures = Vec::new();
    let mut remaining = entries.into_iter().enumerate().rev();

    while let Some((index, CleanupEntry { label, action })) = remaining.next() {
        if options.log_each_callback {
            events::callback_started(index, label.as_deref());
        }
        attempted += 1;

        let cause = match catch_panic(action) {
            Ok(Ok(())) => continue,
            Ok(Err(err)) => FailureCause::Error(err),
            Err(message) => FailureCause::Panic(message),
        };
        let failure = CleanupFailure::new(index, label, cause);
        events::callback_failed(&failure);

        if options.policy.is_fail_fast() {
            let skipped = remaining.len();
            drop(remaining);
            events::pass_completed(attempted, 1, skipped);
            return Err(Error::cleanup_aborted(failure, skipped));
        }
        failures.push(failure);
    }

    events::pass_completed(attempted, failures.len(), 0);
    if failures.is_empty() {
        Ok(())
    } else {
        Err(Error::cleanup_failed(attempted, failures))
    }
}

/// Run with continue-and-aggregate and report only the number of failures.
/// Each failure has already been logged by the pass.
pub(crate) fn run_pass_logged<A>(entries: Vec<CleanupEntry<A>>, log_each_callback: bool) -> usize
where
    A: FnOnce() -> CleanupResult,
{
    let options = PassOptions {
        policy: FailurePolicy::ContinueAndAggregate,
        log_each_callback,
    };
    match run_pass(entries, options) {
        Ok(()) => 0,
        Err(err) => err.failures().len(),
    }
}
