//! # Price and Deposit Calculation
//!
//! Resolves a customer's service selections against the catalog to a total
//! in integer cents, and derives the deposit the organization's policy asks
//! for. Selections are matched by name; a name that matches nothing in the
//! catalog is reported as data, not silently priced at zero, and the quote
//! as a whole fails fast on the first unmatched name.

use crate::errors::{BookingError, BookingResult};
use crate::models::booking::ServiceSelection;
use crate::models::organization::BookingPolicy;
use crate::models::service::Service;

/// Outcome of pricing one line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineItemResolution {
    /// Every selected name matched the catalog.
    Resolved { amount_cents: i64 },
    /// `name` matched neither a package nor an add-on of the service.
    Unmatched { name: String },
}

/// Prices a single selection against its service.
///
/// A selected package replaces the base price; each add-on adds its own
/// price on top. The first name that matches nothing short-circuits the
/// resolution.
pub fn resolve_line_item(service: &Service, selection: &ServiceSelection) -> LineItemResolution {
    let mut amount_cents = match &selection.package {
        Some(name) => {
            match service
                .packages
                .iter()
                .find(|package| package.name == *name)
            {
                Some(package) => package.price_cents,
                None => {
                    return LineItemResolution::Unmatched { name: name.clone() };
                }
            }
        }
        None => service.base_price_cents,
    };

    for name in &selection.addons {
        match service.addons.iter().find(|addon| addon.name == *name) {
            Some(addon) => amount_cents += addon.price_cents,
            None => return LineItemResolution::Unmatched { name: name.clone() },
        }
    }

    LineItemResolution::Resolved { amount_cents }
}

/// Folds line-item resolutions into a quote total.
///
/// # Errors
///
/// * `BookingError::Validation` - any resolution carries an unmatched name
pub fn quote_total(resolutions: &[LineItemResolution]) -> BookingResult<i64> {
    let mut total_cents = 0;
    for resolution in resolutions {
        match resolution {
            LineItemResolution::Resolved { amount_cents } => total_cents += amount_cents,
            LineItemResolution::Unmatched { name } => {
                return Err(BookingError::Validation(format!(
                    "unknown package or add-on: {name}"
                )));
            }
        }
    }
    Ok(total_cents)
}

/// Deposit owed on `total_cents` under `policy`.
///
/// Zero when the policy does not require a deposit; otherwise the policy
/// percentage of the total, rounded half-up in integer cents and never
/// exceeding the total itself.
pub fn deposit_amount(total_cents: i64, policy: &BookingPolicy) -> i64 {
    if !policy.require_deposit {
        return 0;
    }
    let raw = (total_cents * i64::from(policy.deposit_percentage) + 50) / 100;
    raw.min(total_cents)
}
