use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::auctions::Auction;
use super::bids::Bid;
use super::cars::Car;
use super::core::{CarId, User, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Command {
    #[serde(rename = "RegisterUser")]
    RegisterUser {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        user: User,
    },

    #[serde(rename = "RegisterCar")]
    RegisterCar {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        car: Car,
    },

    #[serde(rename = "CreateAuction")]
    CreateAuction {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "carId")]
        car_id: CarId,
        owner: UserId,
    },

    #[serde(rename = "StartAuction")]
    StartAuction {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "carId")]
        car_id: CarId,
        caller: UserId,
    },

    #[serde(rename = "PlaceBid")]
    PlaceBid {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        bid: Bid,
    },

    #[serde(rename = "CloseAuction")]
    CloseAuction {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "carId")]
        car_id: CarId,
        caller: UserId,
    },

    #[serde(rename = "ValidateAuction")]
    ValidateAuction {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "carId")]
        car_id: CarId,
        caller: UserId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum CommandSuccess {
    #[serde(rename = "UserRegistered")]
    UserRegistered {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        user: User,
    },

    #[serde(rename = "CarRegistered")]
    CarRegistered {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        car: Car,
    },

    #[serde(rename = "AuctionCreated")]
    AuctionCreated {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        auction: Auction,
    },

    #[serde(rename = "AuctionStarted")]
    AuctionStarted {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        auction: Auction,
    },

    #[serde(rename = "BidAccepted")]
    BidAccepted {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        bid: Bid,
    },

    #[serde(rename = "AuctionClosed")]
    AuctionClosed {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        auction: Auction,
    },

    #[serde(rename = "AuctionValidated")]
    AuctionValidated {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        auction: Auction,
        car: Car,
    },
}
