//! Wait engine primitives.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`TimeoutTier`] | Long (exploration) or short (fast-fail) deadline |
//! | [`ConditionKind`] | What a wait polls for |
//! | [`WaitSpec`] | Condition plus tier, built per call |
//! | [`poll_until`] | The single retry loop every `wait_for_*` goes through |
//! | [`ImplicitWaitScope`] | Scoped swap of the session's implicit wait |
//!
//! Probes report `Ok(Some(value))` when the condition holds and `Ok(None)`
//! when it does not yet. Retryable errors (see
//! [`Error::is_retryable`]) count as "not yet"; anything else ends the
//! wait immediately and propagates unchanged.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::LazyLock;
use std::time::Duration;

use futures_util::FutureExt;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use tokio::time::{Instant, sleep};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::session::Session;

// ============================================================================
// TimeoutTier
// ============================================================================

/// Which of the two configured deadlines applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeoutTier {
    /// Default deadline for waiting on something to appear.
    Long,
    /// Fast-fail deadline for absence checks.
    Short,
}

impl TimeoutTier {
    /// Returns the tier name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

impl fmt::Display for TimeoutTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ConditionKind
// ============================================================================

/// Condition a wait polls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    /// At least one element matches.
    PresenceOfAll,
    /// The first match is displayed.
    VisibilityOfOne,
    /// At least one element matches and every match is displayed.
    VisibilityOfAll,
    /// The first match is absent or hidden.
    InvisibilityOfOne,
    /// No match is displayed (zero matches included).
    InvisibilityOfAll,
    /// The first match is displayed and enabled.
    Clickable,
    /// A native dialog is open.
    AlertPresent,
    /// The page's async-request library reports no pending requests.
    AjaxIdle,
    /// `document.readyState` is `"complete"`.
    DocumentReady,
}

impl ConditionKind {
    /// Returns the condition name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PresenceOfAll => "presence of all",
            Self::VisibilityOfOne => "visibility of",
            Self::VisibilityOfAll => "visibility of all",
            Self::InvisibilityOfOne => "invisibility of",
            Self::InvisibilityOfAll => "invisibility of all",
            Self::Clickable => "clickable",
            Self::AlertPresent => "alert present",
            Self::AjaxIdle => "ajax idle",
            Self::DocumentReady => "document ready",
        }
    }

    /// Returns `true` for conditions evaluated against a locator.
    #[must_use]
    pub const fn is_element_condition(self) -> bool {
        !matches!(self, Self::AlertPresent | Self::AjaxIdle | Self::DocumentReady)
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// WaitSpec
// ============================================================================

/// Condition and tier for one wait. Not retained past the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSpec {
    /// What to poll for.
    pub condition: ConditionKind,
    /// Which deadline applies.
    pub tier: TimeoutTier,
}

impl WaitSpec {
    /// Creates a wait spec.
    #[inline]
    #[must_use]
    pub const fn new(condition: ConditionKind, tier: TimeoutTier) -> Self {
        Self { condition, tier }
    }
}

// ============================================================================
// Polling
// ============================================================================

/// Polls `probe` every `interval` until it yields a value or `timeout` passes.
///
/// The probe always runs at least once, so a zero timeout still performs a
/// single check. A timeout too large to add to the current instant never
/// expires.
///
/// # Errors
///
/// - [`Error::WaitTimeout`] carrying `spec` and `target` once the deadline passes
/// - Any non-retryable error the probe returns, unchanged
pub async fn poll_until<T, F, Fut>(
    spec: WaitSpec,
    timeout: Duration,
    interval: Duration,
    target: &str,
    mut probe: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let deadline = Instant::now().checked_add(timeout);
    let timeout_ms = millis(timeout);
    let mut attempts: u32 = 0;

    debug!(
        condition = %spec.condition,
        tier = %spec.tier,
        timeout_ms,
        locator = target,
        "Waiting"
    );

    loop {
        attempts += 1;
        match probe().await {
            Ok(Some(value)) => {
                debug!(condition = %spec.condition, locator = target, attempts, "Condition met");
                return Ok(value);
            }
            Ok(None) => {}
            Err(e) if e.is_retryable() => {
                trace!(condition = %spec.condition, locator = target, error = %e, "Probe not ready");
            }
            Err(e) => return Err(e),
        }

        let now = Instant::now();
        let Some(deadline) = deadline else {
            sleep(interval).await;
            continue;
        };
        if now >= deadline {
            warn!(
                condition = %spec.condition,
                tier = %spec.tier,
                timeout_ms,
                locator = target,
                attempts,
                "Wait timed out"
            );
            return Err(Error::wait_timeout(
                spec.condition,
                spec.tier,
                timeout_ms,
                target,
            ));
        }

        sleep(interval.min(deadline - now)).await;
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
#[inline]
#[must_use]
pub fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// ImplicitWaitScope
// ============================================================================

/// Temporarily shortens a session's implicit wait.
///
/// [`run`](Self::run) sets the short duration, awaits the body, and sets the
/// long duration back on every exit path: success, error and panic. Only
/// one scope may be active per session, whichever engine opened it; a
/// nested attempt fails with [`Error::TimeoutOverrideActive`] before
/// touching the session.
///
/// Dropping the future returned by `run` midway leaves the short duration
/// in place.
pub struct ImplicitWaitScope<'a, S: Session + ?Sized> {
    session: &'a S,
    short: Duration,
    long: Duration,
}

impl<S: Session + ?Sized> fmt::Debug for ImplicitWaitScope<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplicitWaitScope")
            .field("short", &self.short)
            .field("long", &self.long)
            .finish_non_exhaustive()
    }
}

impl<'a, S: Session + ?Sized> ImplicitWaitScope<'a, S> {
    /// Creates a scope over `session`.
    #[must_use]
    pub fn new(session: &'a S, short: Duration, long: Duration) -> Self {
        Self {
            session,
            short,
            long,
        }
    }

    /// Runs `body` with the short implicit wait in effect.
    ///
    /// # Errors
    ///
    /// - [`Error::TimeoutOverrideActive`] if another scope holds the session
    /// - The body's error, or the restore error if the body succeeded
    pub async fn run<T, F, Fut>(self, body: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = session_key(self.session);
        if !ACTIVE_OVERRIDES.lock().insert(key) {
            return Err(Error::TimeoutOverrideActive);
        }
        let _held = OverrideRelease(key);

        debug!(short_ms = millis(self.short), "Shortening implicit wait");
        self.session.set_implicit_wait(self.short).await?;

        let outcome = AssertUnwindSafe(body()).catch_unwind().await;
        let restored = self.session.set_implicit_wait(self.long).await;

        match (outcome, restored) {
            (Ok(result), Ok(())) => {
                debug!(long_ms = millis(self.long), "Restored implicit wait");
                result
            }
            (Ok(Ok(_)), Err(e)) => {
                warn!(error = %e, "Failed to restore implicit wait");
                Err(e)
            }
            (Ok(Err(body_err)), Err(e)) => {
                warn!(error = %e, "Failed to restore implicit wait after failed probe");
                Err(body_err)
            }
            (Err(panic), restored) => {
                if let Err(e) = restored {
                    warn!(error = %e, "Failed to restore implicit wait after panic");
                }
                std::panic::resume_unwind(panic)
            }
        }
    }
}

/// Sessions with an override in progress, by address.
static ACTIVE_OVERRIDES: LazyLock<Mutex<FxHashSet<usize>>> =
    LazyLock::new(|| Mutex::new(FxHashSet::default()));

fn session_key<S: ?Sized>(session: &S) -> usize {
    std::ptr::from_ref(session).cast::<()>().addr()
}

/// Releases the session's override slot when the scope ends.
struct OverrideRelease(usize);

impl Drop for OverrideRelease {
    fn drop(&mut self) {
        ACTIVE_OVERRIDES.lock().remove(&self.0);
    }
}

// ============================================================================
// Tests
// ============================================================================
