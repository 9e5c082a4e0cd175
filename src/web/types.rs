use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::{AmountValue, Auction, Bid, Car, CarId, Outcome, Phase, User, UserId};
use crate::service::AuctionHouse;

pub type AppState = Arc<AuctionHouse>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// A car as sent by clients. Only the id is needed to address an existing
/// car; brand and color are used when the car gets registered.
#[derive(Debug, Serialize, Deserialize)]
pub struct CarRef {
    pub id: CarId,
    #[serde(default, alias = "model")]
    pub brand: Option<String>,
    #[serde(default, alias = "colour")]
    pub color: Option<String>,
}

impl CarRef {
    pub fn to_car(&self, owner: &UserId) -> Option<Car> {
        match (&self.brand, &self.color) {
            (Some(brand), Some(color)) => Some(Car::new(
                self.id.clone(),
                brand.clone(),
                color.clone(),
                owner.clone(),
            )),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of the seller routes: create, start, close and validate.
#[derive(Debug, Serialize, Deserialize)]
pub struct CarRequest {
    pub car: CarRef,
    pub owner: UserRef,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BidRequest {
    pub car: CarRef,
    #[serde(alias = "bidder")]
    pub gambler: UserRef,
    pub amount: AmountValue,
}

/// Body of `POST /register`: the user itself, or the user under a `user`
/// key.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegisterUserRequest {
    Wrapped { user: User },
    Flat(User),
}

impl RegisterUserRequest {
    pub fn to_user(&self) -> User {
        match self {
            RegisterUserRequest::Wrapped { user } | RegisterUserRequest::Flat(user) => user.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuctionFilter {
    pub state: Option<Phase>,
}

#[derive(Debug, Serialize)]
pub struct AuctionItem {
    #[serde(rename = "carId")]
    pub car_id: CarId,
    pub owner: UserId,
    pub state: Phase,
    #[serde(rename = "highestBid")]
    pub highest_bid: Option<AmountValue>,
}

impl From<&Auction> for AuctionItem {
    fn from(auction: &Auction) -> Self {
        AuctionItem {
            car_id: auction.car_id.clone(),
            owner: auction.owner.clone(),
            state: auction.phase(),
            highest_bid: auction.highest_bid().map(|bid| bid.bid_amount),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuctionBid {
    pub amount: AmountValue,
    pub bidder: UserId,
    pub at: DateTime<Utc>,
}

impl From<&Bid> for AuctionBid {
    fn from(bid: &Bid) -> Self {
        AuctionBid {
            amount: bid.bid_amount,
            bidder: bid.bidder.clone(),
            at: bid.at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuctionDetail {
    #[serde(rename = "carId")]
    pub car_id: CarId,
    pub owner: UserId,
    pub state: Phase,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "openedAt")]
    pub opened_at: Option<DateTime<Utc>>,
    #[serde(rename = "closedAt")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(rename = "validatedAt")]
    pub validated_at: Option<DateTime<Utc>>,

    pub bids: Vec<AuctionBid>,
    #[serde(rename = "noSale")]
    pub no_sale: bool,
    pub winner: Option<UserId>,
    #[serde(rename = "winnerPrice")]
    pub winner_price: Option<AmountValue>,
}

impl From<&Auction> for AuctionDetail {
    fn from(auction: &Auction) -> Self {
        let (winner, winner_price) = match auction.try_get_amount_and_winner() {
            Some((amount, user_id)) => (Some(user_id), Some(amount)),
            None => (None, None),
        };

        AuctionDetail {
            car_id: auction.car_id.clone(),
            owner: auction.owner.clone(),
            state: auction.phase(),
            created_at: auction.created_at,
            opened_at: auction.opened_at,
            closed_at: auction.closed_at,
            validated_at: auction.validated_at,
            bids: auction.bids.iter().map(AuctionBid::from).collect(),
            no_sale: matches!(auction.state.outcome(), Some(Outcome::NoSale)),
            winner,
            winner_price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub auction: AuctionDetail,
    pub car: Car,
}
