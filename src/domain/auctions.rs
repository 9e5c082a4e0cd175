// src/domain/auctions.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::bids::Bid;
use super::core::{AmountValue, CarId, Errors, UserId};
use super::states::{AuctionState, Outcome, Phase};

/// One auction per car. Transitions never mutate `self`: they return the
/// next value, or an error leaving the current one untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    #[serde(rename = "carId")]
    pub car_id: CarId,
    pub owner: UserId,
    pub state: AuctionState,
    /// Accepted bids, highest (and newest) first.
    pub bids: Vec<Bid>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "openedAt")]
    pub opened_at: Option<DateTime<Utc>>,
    #[serde(rename = "closedAt")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(rename = "validatedAt")]
    pub validated_at: Option<DateTime<Utc>>,
}

pub fn validate_bid(bid: &Bid, auction: &Auction) -> Result<(), Errors> {
    if bid.bidder == auction.owner {
        return Err(Errors::SellerCannotPlaceBids((
            bid.bidder.clone(),
            auction.car_id.clone(),
        )));
    }

    Ok(())
}

impl Auction {
    pub fn new(car_id: CarId, owner: UserId, created_at: DateTime<Utc>) -> Self {
        Auction {
            car_id,
            owner,
            state: AuctionState::Unstarted,
            bids: Vec::new(),
            created_at,
            opened_at: None,
            closed_at: None,
            validated_at: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn highest_bid(&self) -> Option<&Bid> {
        self.bids.first()
    }

    pub fn try_get_amount_and_winner(&self) -> Option<(AmountValue, UserId)> {
        match self.state.outcome() {
            Some(Outcome::Sold { winner, amount }) => Some((*amount, winner.clone())),
            _ => None,
        }
    }

    fn ensure_owner(&self, caller: &str) -> Result<(), Errors> {
        if caller != self.owner {
            return Err(Errors::NotAuthorized(caller.to_string(), self.car_id.clone()));
        }
        Ok(())
    }

    fn ensure_phase(&self, expected: Phase) -> Result<(), Errors> {
        let actual = self.phase();
        if actual != expected {
            return Err(Errors::InvalidState {
                car_id: self.car_id.clone(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    pub fn start(&self, caller: &str, now: DateTime<Utc>) -> Result<Auction, Errors> {
        self.ensure_owner(caller)?;
        self.ensure_phase(Phase::Unstarted)?;

        Ok(Auction {
            state: AuctionState::Open,
            opened_at: Some(now),
            ..self.clone()
        })
    }

    /// Accepts `bid` if it beats the standing one. With no standing bid the
    /// amount only has to reach `min_opening_bid`.
    pub fn add_bid(&self, bid: Bid, min_opening_bid: AmountValue) -> Result<Auction, Errors> {
        self.ensure_phase(Phase::Open)?;
        validate_bid(&bid, self)?;

        match self.highest_bid() {
            Some(highest) if bid.bid_amount <= highest.bid_amount => {
                return Err(Errors::MustPlaceBidOverHighestBid(highest.bid_amount));
            }
            None if bid.bid_amount < min_opening_bid => {
                return Err(Errors::BidBelowMinimum(min_opening_bid));
            }
            _ => {}
        }

        let mut bids = Vec::with_capacity(self.bids.len() + 1);
        bids.push(bid);
        bids.extend(self.bids.iter().cloned());

        Ok(Auction { bids, ..self.clone() })
    }

    pub fn close(&self, caller: &str, now: DateTime<Utc>) -> Result<Auction, Errors> {
        self.ensure_owner(caller)?;
        self.ensure_phase(Phase::Open)?;

        Ok(Auction {
            state: AuctionState::Closed,
            closed_at: Some(now),
            ..self.clone()
        })
    }

    pub fn validate(&self, caller: &str, now: DateTime<Utc>) -> Result<Auction, Errors> {
        self.ensure_owner(caller)?;
        self.ensure_phase(Phase::Closed)?;

        let outcome = match self.highest_bid() {
            Some(bid) => Outcome::Sold {
                winner: bid.bidder.clone(),
                amount: bid.bid_amount,
            },
            None => Outcome::NoSale,
        };

        Ok(Auction {
            state: AuctionState::Validated(outcome),
            validated_at: Some(now),
            ..self.clone()
        })
    }
}
