//! Small descriptive-statistics helpers over `Decimal` slices.
//!
//! All of them are total: an empty input yields zero (or `None` where a
//! value would be meaningless) instead of panicking. Results that leave the
//! `Decimal` range saturate at `Decimal::MAX` / `Decimal::MIN`.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

/// Sum that saturates instead of overflowing.
pub fn sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    let mut saturated = false;
    let total = values.into_iter().fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).unwrap_or_else(|| {
            saturated = true;
            acc.saturating_add(v)
        })
    });
    if saturated {
        warn!(%total, "Sum left the decimal range and was saturated.");
    }
    total
}

/// `a / b` saturated to the sign of the true quotient; `None` when `b` is zero.
pub fn ratio(a: Decimal, b: Decimal) -> Option<Decimal> {
    if b.is_zero() {
        return None;
    }
    Some(a.checked_div(b).unwrap_or(
        if a.is_sign_negative() == b.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        },
    ))
}

/// Arithmetic mean, zero for an empty slice.
pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let n = Decimal::from(values.len());
    match values.iter().try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v)) {
        Some(total) => total / n,
        // The plain total overflows: average the scaled-down values instead.
        None => sum(values.iter().map(|v| v / n)),
    }
}

/// Median, zero for an empty slice.
pub fn median(values: &[Decimal]) -> Decimal {
    let sorted = sorted(values);
    quantile(&sorted, 1, 2).unwrap_or(Decimal::ZERO)
}

pub fn sorted(values: &[Decimal]) -> Vec<Decimal> {
    let mut sorted = values.to_vec();
    sorted.sort();
    sorted
}

/// The `num/den` quantile of an ascending slice, by linear interpolation
/// between the two closest ranks.
///
/// The rank is kept as an exact fraction so that boundaries such as the
/// 1/3 quantile do not drift below a data point through rounding.
pub fn quantile(sorted: &[Decimal], num: usize, den: usize) -> Option<Decimal> {
    if sorted.is_empty() || den == 0 || num > den {
        return None;
    }
    let rank = (sorted.len() - 1) * num;
    let (idx, rem) = (rank / den, rank % den);
    let base = sorted[idx];
    if rem == 0 {
        return Some(base);
    }
    let next = sorted[idx + 1];
    let (rem, den) = (Decimal::from(rem), Decimal::from(den));
    let step = next
        .checked_sub(base)
        .and_then(|gap| gap.checked_mul(rem))
        .map(|scaled| scaled / den);
    Some(match step {
        Some(step) => base + step,
        // Endpoints span more than the decimal range: weight them separately.
        None => base / den * (den - rem) + next / den * rem,
    })
}

/// Min, quartiles and max of a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: Decimal,
    pub q1: Decimal,
    pub median: Decimal,
    pub q3: Decimal,
    pub max: Decimal,
}

impl FiveNumberSummary {
    pub fn of(values: &[Decimal]) -> Option<Self> {
        let sorted = sorted(values);
        Some(Self {
            min: *sorted.first()?,
            q1: quantile(&sorted, 1, 4)?,
            median: quantile(&sorted, 1, 2)?,
            q3: quantile(&sorted, 3, 4)?,
            max: *sorted.last()?,
        })
    }
}
