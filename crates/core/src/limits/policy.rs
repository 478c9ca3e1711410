//! Daily deposit and withdrawal ceilings.
//!
//! A movement counts toward today's volume when its timestamp falls on the
//! same calendar date as `now` in the configured timezone. This is a
//! date comparison, not a rolling 24 hour window.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use wallet_shared::config::LimitSettings;

/// Direction a daily limit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitKind {
    /// Deposits.
    Deposit,
    /// Withdrawals.
    Withdraw,
}

/// A previously recorded movement amount with its commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatedAmount {
    /// Commit timestamp.
    pub at: DateTime<Utc>,
    /// Positive amount.
    pub amount: Decimal,
}

impl DatedAmount {
    /// Creates a dated amount.
    #[must_use]
    pub const fn new(at: DateTime<Utc>, amount: Decimal) -> Self {
        Self { at, amount }
    }
}

/// Invalid limit configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LimitConfigError {
    /// Timezone is not a known IANA name.
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    /// A ceiling is zero or negative.
    #[error("daily {0:?} limit must be positive")]
    NonPositiveLimit(LimitKind),
}

/// Daily ceilings on cumulative same-day movement volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitPolicy {
    deposit_daily: Decimal,
    withdraw_daily: Decimal,
    timezone: Tz,
}

impl LimitPolicy {
    /// Creates a policy.
    ///
    /// # Errors
    ///
    /// Returns `LimitConfigError::NonPositiveLimit` if either ceiling is not
    /// positive.
    pub fn new(
        deposit_daily: Decimal,
        withdraw_daily: Decimal,
        timezone: Tz,
    ) -> Result<Self, LimitConfigError> {
        if deposit_daily <= Decimal::ZERO {
            return Err(LimitConfigError::NonPositiveLimit(LimitKind::Deposit));
        }
        if withdraw_daily <= Decimal::ZERO {
            return Err(LimitConfigError::NonPositiveLimit(LimitKind::Withdraw));
        }
        Ok(Self {
            deposit_daily,
            withdraw_daily,
            timezone,
        })
    }

    /// Builds a policy from configuration.
    ///
    /// # Errors
    ///
    /// Returns `LimitConfigError` if the timezone is unknown or a ceiling is
    /// not positive.
    pub fn from_settings(settings: &LimitSettings) -> Result<Self, LimitConfigError> {
        let timezone: Tz = settings
            .timezone
            .parse()
            .map_err(|_| LimitConfigError::UnknownTimezone(settings.timezone.clone()))?;
        Self::new(settings.deposit_daily, settings.withdraw_daily, timezone)
    }

    /// Returns the ceiling for `kind`.
    #[must_use]
    pub const fn limit(&self, kind: LimitKind) -> Decimal {
        match kind {
            LimitKind::Deposit => self.deposit_daily,
            LimitKind::Withdraw => self.withdraw_daily,
        }
    }

    /// Returns the timezone whose calendar day bounds the limits.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Returns the calendar date of `at` in the policy timezone.
    #[must_use]
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.timezone).date_naive()
    }

    /// Returns a UTC instant no later than the start of `now`'s calendar day.
    ///
    /// Storage reads use this as a lower bound; the date filter in
    /// [`Self::same_day_total`] is what decides membership.
    #[must_use]
    pub fn day_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = self.local_date(now).and_time(NaiveTime::MIN);
        self.timezone
            .from_local_datetime(&midnight)
            .earliest()
            .map_or_else(|| now - Duration::days(1), |start| start.with_timezone(&Utc))
    }

    /// Sums the movements that fall on the same calendar day as `now`.
    #[must_use]
    pub fn same_day_total(&self, movements: &[DatedAmount], now: DateTime<Utc>) -> Decimal {
        let today = self.local_date(now);
        movements
            .iter()
            .filter(|m| self.local_date(m.at) == today)
            .map(|m| m.amount)
            .sum()
    }

    /// Returns true if `amount` would push today's volume for `kind` over
    /// its ceiling.
    ///
    /// `movements` are the account's recorded movements of the same kind;
    /// entries from other days are ignored.
    #[must_use]
    pub fn exceeds_daily_limit(
        &self,
        kind: LimitKind,
        amount: Decimal,
        movements: &[DatedAmount],
        now: DateTime<Utc>,
    ) -> bool {
        let limit = self.limit(kind);
        amount > limit || amount + self.same_day_total(movements, now) > limit
    }

    /// Deposit shorthand for [`Self::exceeds_daily_limit`].
    #[must_use]
    pub fn deposit_exceeds_daily_limit(
        &self,
        amount: Decimal,
        deposits: &[DatedAmount],
        now: DateTime<Utc>,
    ) -> bool {
        self.exceeds_daily_limit(LimitKind::Deposit, amount, deposits, now)
    }

    /// Withdrawal shorthand for [`Self::exceeds_daily_limit`].
    #[must_use]
    pub fn withdraw_exceeds_daily_limit(
        &self,
        amount: Decimal,
        withdrawals: &[DatedAmount],
        now: DateTime<Utc>,
    ) -> bool {
        self.exceeds_daily_limit(LimitKind::Withdraw, amount, withdrawals, now)
    }
}

impl Default for LimitPolicy {
    fn default() -> Self {
        let ceiling = Decimal::new(100_000, 2);
        Self {
            deposit_daily: ceiling,
            withdraw_daily: ceiling,
            timezone: Tz::UTC,
        }
    }
}
