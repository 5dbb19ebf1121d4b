//! Listing Status State Machine
//!
//! Status names match the stored data format ("Coming Soon", "Active", ...).

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Listing lifecycle statuses
///
/// Terminal status: Sold (no transitions out).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ListingStatus {
    /// Pre-market: listing prepared but not yet on market
    #[serde(rename = "Coming Soon")]
    ComingSoon,

    /// On market and accepting offers
    Active,

    /// Offer accepted, sale pending
    Pending,

    /// Terminal: sale closed
    Sold,

    /// Listing agreement ran out
    Expired,

    /// Listing cancelled (also forced on archive)
    Cancelled,

    /// Seller withdrew the listing
    Withdrawn,
}

impl ListingStatus {
    /// Check if this is a terminal status (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ListingStatus::Sold)
    }

    /// Statuses reachable from `self` in a single transition
    pub fn allowed_from(&self) -> &'static [ListingStatus] {
        use ListingStatus::*;
        match self {
            ComingSoon => &[Active, Cancelled],
            Active => &[Pending, Sold, Expired, Cancelled, Withdrawn],
            Pending => &[Active, Sold, Cancelled],
            Sold => &[],
            Expired => &[Active, Withdrawn],
            Cancelled => &[Active],
            Withdrawn => &[Active],
        }
    }

    /// Check whether `self -> next` is a legal transition
    #[inline]
    pub fn is_allowed(&self, next: ListingStatus) -> bool {
        self.allowed_from().contains(&next)
    }

    /// Get the stored status name
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::ComingSoon => "Coming Soon",
            ListingStatus::Active => "Active",
            ListingStatus::Pending => "Pending",
            ListingStatus::Sold => "Sold",
            ListingStatus::Expired => "Expired",
            ListingStatus::Cancelled => "Cancelled",
            ListingStatus::Withdrawn => "Withdrawn",
        }
    }

    /// Convert from the stored status name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Coming Soon" => Some(ListingStatus::ComingSoon),
            "Active" => Some(ListingStatus::Active),
            "Pending" => Some(ListingStatus::Pending),
            "Sold" => Some(ListingStatus::Sold),
            "Expired" => Some(ListingStatus::Expired),
            "Cancelled" => Some(ListingStatus::Cancelled),
            "Withdrawn" => Some(ListingStatus::Withdrawn),
            _ => None,
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ListingStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListingStatus::from_name(s).ok_or(())
    }
}

/// Side effects applied when a listing enters a given status
///
/// Keyed by the target status so new effects stay additive. Entering Active
/// restarts the on-market clock; every other target leaves the fields alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionEffects {
    /// Reset days_on_market to 0
    pub reset_days_on_market: bool,
    /// Set listing_date to the current date
    pub set_listing_date_today: bool,
}

/// Effects for entering `next`, regardless of the previous status
pub fn transition_effects(next: ListingStatus) -> TransitionEffects {
    match next {
        ListingStatus::Active => TransitionEffects {
            reset_days_on_market: true,
            set_listing_date_today: true,
        },
        _ => TransitionEffects::default(),
    }
}
