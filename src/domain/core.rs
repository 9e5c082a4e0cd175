// src/domain/core.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::states::Phase;

pub type UserId = String;
pub type CarId = String;
pub type AmountValue = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        User { id: id.into(), name: name.into() }
    }
}

/// Failure categories exposed to callers. Each has a stable code that
/// outer layers can translate to a transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    DuplicateId,
    UnknownOwner,
    InvalidState,
    NotAuthorized,
    InvalidBid,
    SelfBid,
    AlreadyExists,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::DuplicateId => "duplicate_id",
            ErrorKind::UnknownOwner => "unknown_owner",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::NotAuthorized => "not_authorized",
            ErrorKind::InvalidBid => "invalid_bid",
            ErrorKind::SelfBid => "self_bid",
            ErrorKind::AlreadyExists => "already_exists",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Errors {
    #[error("Unknown car: {0}")]
    UnknownCar(CarId),

    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    #[error("Unknown auction for car: {0}")]
    UnknownAuction(CarId),

    #[error("Car already exists: {0}")]
    CarAlreadyExists(CarId),

    #[error("User already exists: {0}")]
    UserAlreadyExists(UserId),

    #[error("Unknown owner: {0}")]
    UnknownOwner(UserId),

    #[error("Auction already exists for car: {0}")]
    AuctionAlreadyExists(CarId),

    #[error("Auction for car {car_id} is {actual}, expected {expected}")]
    InvalidState {
        car_id: CarId,
        expected: Phase,
        actual: Phase,
    },

    #[error("{0} is not the owner of the auction for car {1}")]
    NotAuthorized(UserId, CarId),

    #[error("Must place bid over highest bid: {0}")]
    MustPlaceBidOverHighestBid(AmountValue),

    #[error("Opening bid must be at least {0}")]
    BidBelowMinimum(AmountValue),

    #[error("Seller cannot place bids: {0:?}")]
    SellerCannotPlaceBids((UserId, CarId)),
}

impl Errors {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Errors::UnknownCar(_) | Errors::UnknownUser(_) | Errors::UnknownAuction(_) => {
                ErrorKind::NotFound
            }
            Errors::CarAlreadyExists(_) | Errors::UserAlreadyExists(_) => ErrorKind::DuplicateId,
            Errors::UnknownOwner(_) => ErrorKind::UnknownOwner,
            Errors::AuctionAlreadyExists(_) => ErrorKind::AlreadyExists,
            Errors::InvalidState { .. } => ErrorKind::InvalidState,
            Errors::NotAuthorized(..) => ErrorKind::NotAuthorized,
            Errors::MustPlaceBidOverHighestBid(_) | Errors::BidBelowMinimum(_) => {
                ErrorKind::InvalidBid
            }
            Errors::SellerCannotPlaceBids(_) => ErrorKind::SelfBid,
        }
    }
}
