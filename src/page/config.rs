//! Engine timing configuration.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use page_engine::PageConfig;
//!
//! # fn example() -> page_engine::Result<()> {
//! let config = PageConfig::builder()
//!     .long_timeout(Duration::from_secs(20))
//!     .short_timeout(Duration::from_secs(3))
//!     .build()?;
//! assert_eq!(config.poll_interval(), Duration::from_millis(500));
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::{Error, Result};
use crate::wait::TimeoutTier;

// ============================================================================
// Constants
// ============================================================================

/// Default long-tier timeout (30 seconds).
pub const DEFAULT_LONG_TIMEOUT: Duration = Duration::from_secs(30);

/// Default short-tier timeout (5 seconds).
pub const DEFAULT_SHORT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default delay between probes (500 ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default time a highlight stays on screen (1 second).
pub const DEFAULT_HIGHLIGHT_DURATION: Duration = Duration::from_secs(1);

// ============================================================================
// PageConfig
// ============================================================================

/// Timeout tiers and polling cadence, fixed when the engine is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConfig {
    long_timeout: Duration,
    short_timeout: Duration,
    poll_interval: Duration,
    highlight_duration: Duration,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            long_timeout: DEFAULT_LONG_TIMEOUT,
            short_timeout: DEFAULT_SHORT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            highlight_duration: DEFAULT_HIGHLIGHT_DURATION,
        }
    }
}

impl PageConfig {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> PageConfigBuilder {
        PageConfigBuilder::new()
    }

    /// Long-tier timeout.
    #[inline]
    #[must_use]
    pub fn long_timeout(&self) -> Duration {
        self.long_timeout
    }

    /// Short-tier timeout.
    #[inline]
    #[must_use]
    pub fn short_timeout(&self) -> Duration {
        self.short_timeout
    }

    /// Delay between probes.
    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// How long a highlight stays applied.
    #[inline]
    #[must_use]
    pub fn highlight_duration(&self) -> Duration {
        self.highlight_duration
    }

    /// Duration of `tier`.
    #[inline]
    #[must_use]
    pub fn timeout(&self, tier: TimeoutTier) -> Duration {
        match tier {
            TimeoutTier::Long => self.long_timeout,
            TimeoutTier::Short => self.short_timeout,
        }
    }
}

// ============================================================================
// PageConfigBuilder
// ============================================================================

/// Builder for [`PageConfig`]. Unset values take the defaults.
#[derive(Debug, Default, Clone)]
pub struct PageConfigBuilder {
    long_timeout: Option<Duration>,
    short_timeout: Option<Duration>,
    poll_interval: Option<Duration>,
    highlight_duration: Option<Duration>,
}

impl PageConfigBuilder {
    /// Creates an empty builder.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the long-tier timeout.
    #[inline]
    #[must_use]
    pub fn long_timeout(mut self, timeout: Duration) -> Self {
        self.long_timeout = Some(timeout);
        self
    }

    /// Sets the short-tier timeout.
    #[inline]
    #[must_use]
    pub fn short_timeout(mut self, timeout: Duration) -> Self {
        self.short_timeout = Some(timeout);
        self
    }

    /// Sets the delay between probes.
    #[inline]
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Sets how long a highlight stays applied.
    #[inline]
    #[must_use]
    pub fn highlight_duration(mut self, duration: Duration) -> Self {
        self.highlight_duration = Some(duration);
        self
    }

    /// Builds the configuration with validation.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if a timeout or the poll interval is zero, if the
    /// short tier exceeds the long tier, or if the poll interval exceeds the
    /// short tier.
    pub fn build(self) -> Result<PageConfig> {
        let config = PageConfig {
            long_timeout: self.long_timeout.unwrap_or(DEFAULT_LONG_TIMEOUT),
            short_timeout: self.short_timeout.unwrap_or(DEFAULT_SHORT_TIMEOUT),
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            highlight_duration: self
                .highlight_duration
                .unwrap_or(DEFAULT_HIGHLIGHT_DURATION),
        };
        validate(&config)?;
        Ok(config)
    }
}

// ============================================================================
// Validation
// ============================================================================

fn validate(config: &PageConfig) -> Result<()> {
    for (name, value) in [
        ("long_timeout", config.long_timeout),
        ("short_timeout", config.short_timeout),
        ("poll_interval", config.poll_interval),
    ] {
        if value.is_zero() {
            return Err(Error::config(format!("{name} must be greater than zero")));
        }
    }

    if config.short_timeout > config.long_timeout {
        return Err(Error::config(format!(
            "short_timeout ({:?}) must not exceed long_timeout ({:?})",
            config.short_timeout, config.long_timeout
        )));
    }

    if config.poll_interval > config.short_timeout {
        return Err(Error::config(format!(
            "poll_interval ({:?}) must not exceed short_timeout ({:?})",
            config.poll_interval, config.short_timeout
        )));
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
