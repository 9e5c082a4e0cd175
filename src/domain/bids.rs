
// src/domain/bids.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use super::core::{AmountValue, CarId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub id: Uuid,
    #[serde(rename = "car")]
    pub for_car: CarId,
    pub bidder: UserId,
    pub at: DateTime<Utc>,
    #[serde(rename = "amount")]
    pub bid_amount: AmountValue,
}

impl Bid {
    pub fn new(for_car: CarId, bidder: UserId, bid_amount: AmountValue, at: DateTime<Utc>) -> Self {
        Bid {
            id: Uuid::new_v4(),
            for_car,
            bidder,
            at,
            bid_amount,
        }
    }
}
