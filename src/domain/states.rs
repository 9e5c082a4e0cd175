// src/domain/states.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use super::core::{AmountValue, UserId};

/// Lifecycle phase of an auction, without any outcome payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Unstarted,
    Open,
    Closed,
    Validated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Unstarted => write!(f, "Unstarted"),
            Phase::Open => write!(f, "Open"),
            Phase::Closed => write!(f, "Closed"),
            Phase::Validated => write!(f, "Validated"),
        }
    }
}

/// How a validated auction ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The highest bidder takes the car at the price they bid.
    Sold { winner: UserId, amount: AmountValue },
    /// The auction closed without any bids, ownership is unchanged.
    NoSale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionState {
    Unstarted,
    Open,
    Closed,
    Validated(Outcome),
}

impl AuctionState {
    pub fn phase(&self) -> Phase {
        match self {
            AuctionState::Unstarted => Phase::Unstarted,
            AuctionState::Open => Phase::Open,
            AuctionState::Closed => Phase::Closed,
            AuctionState::Validated(_) => Phase::Validated,
        }
    }

    pub fn accepts_bids(&self) -> bool {
        matches!(self, AuctionState::Open)
    }

    pub fn has_ended(&self) -> bool {
        matches!(self, AuctionState::Closed | AuctionState::Validated(_))
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            AuctionState::Validated(outcome) => Some(outcome),
            _ => None,
        }
    }
}
