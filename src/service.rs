// src/service.rs
use chrono::Utc;
use log::{error, info};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{
    handle, handle_recorded, AmountValue, Auction, AuctionEngine, Bid, Car, Command,
    CommandSuccess, EngineOptions, Errors, Registry, User,
};
use crate::persistence::json_file::{read_commands, Journal, JournalError};

#[derive(Debug, Error)]
pub enum HandleError {
    #[error("Auction error: {0}")]
    AuctionError(#[from] Errors),

    #[error("Journal error: {0}")]
    JournalError(#[from] JournalError),
}

/// Entry point for callers: the registry and the auction engine, plus an
/// optional journal that records every command that was applied.
///
/// A command is journaled while the lock that orders it is still held: the
/// registry's write lock for registrations, the car's lock for auction
/// transitions. The journal therefore lists commands on one record in the
/// order they took effect, without serializing unrelated cars.
#[derive(Debug)]
pub struct AuctionHouse {
    engine: AuctionEngine,
    journal: Option<Journal>,
}

impl AuctionHouse {
    pub fn new(options: EngineOptions) -> Self {
        AuctionHouse {
            engine: AuctionEngine::new(Arc::new(Registry::new()), options),
            journal: None,
        }
    }

    /// Replays `journal`'s existing commands, then records new ones to it.
    ///
    /// Journaled bids are replayed without the minimum opening bid check:
    /// they were admitted under the minimum in force when they were placed.
    /// `options` applies to everything recorded afterwards.
    pub fn with_journal(options: EngineOptions, journal: Journal) -> Result<Self, HandleError> {
        let commands = read_commands(journal.path())?;
        let house = AuctionHouse::new(EngineOptions { min_opening_bid: AmountValue::MIN });
        house.replay(commands)?;
        Ok(AuctionHouse {
            engine: house.engine.with_options(options),
            journal: Some(journal),
        })
    }

    pub fn registry(&self) -> &Registry {
        self.engine.registry()
    }

    /// Applies previously journaled commands without recording them again.
    pub fn replay(&self, commands: Vec<Command>) -> Result<usize, HandleError> {
        let count = commands.len();
        for command in commands {
            handle(command, &self.engine)?;
        }
        info!("Replayed {} commands", count);
        Ok(count)
    }

    pub fn handle(&self, command: Command) -> Result<CommandSuccess, HandleError> {
        handle_recorded(command, &self.engine, |command| self.record(command))
    }

    fn record(&self, command: &Command) -> Result<(), HandleError> {
        let Some(journal) = &self.journal else {
            return Ok(());
        };
        journal.append(command).map_err(|err| {
            error!("{}", err);
            err.into()
        })
    }

    pub fn register_user(&self, user: User) -> Result<User, HandleError> {
        let command = Command::RegisterUser { timestamp: Utc::now(), user: user.clone() };
        self.registry()
            .register_user_recorded(user, || self.record(&command))
    }

    pub fn register_car(&self, car: Car) -> Result<Car, HandleError> {
        let command = Command::RegisterCar { timestamp: Utc::now(), car: car.clone() };
        self.registry()
            .register_car_recorded(car, || self.record(&command))
    }

    /// Registers `user` unless its id is taken, and returns the stored user
    /// either way.
    pub fn ensure_user(&self, user: User) -> Result<User, HandleError> {
        let id = user.id.clone();
        match self.register_user(user) {
            Err(HandleError::AuctionError(Errors::UserAlreadyExists(_))) => {
                Ok(self.registry().get_user(&id)?)
            }
            registered => registered,
        }
    }

    /// Registers `car` unless its id is taken, and returns the stored car
    /// either way.
    pub fn ensure_car(&self, car: Car) -> Result<Car, HandleError> {
        let id = car.id.clone();
        match self.register_car(car) {
            Err(HandleError::AuctionError(Errors::CarAlreadyExists(_))) => {
                Ok(self.registry().get_car(&id)?)
            }
            registered => registered,
        }
    }

    pub fn create_auction(&self, car_id: &str, owner_id: &str) -> Result<Auction, HandleError> {
        let timestamp = Utc::now();
        let command = Command::CreateAuction {
            timestamp,
            car_id: car_id.to_string(),
            owner: owner_id.to_string(),
        };
        self.engine
            .create_auction_recorded(car_id, owner_id, timestamp, || self.record(&command))
    }

    pub fn start(&self, car_id: &str, caller_id: &str) -> Result<Auction, HandleError> {
        let timestamp = Utc::now();
        let command = Command::StartAuction {
            timestamp,
            car_id: car_id.to_string(),
            caller: caller_id.to_string(),
        };
        self.engine
            .start_recorded(car_id, caller_id, timestamp, || self.record(&command))
    }

    pub fn bid(&self, car_id: &str, bidder_id: &str, amount: AmountValue) -> Result<Bid, HandleError> {
        let timestamp = Utc::now();
        let bid = Bid::new(car_id.to_string(), bidder_id.to_string(), amount, timestamp);
        let command = Command::PlaceBid { timestamp, bid: bid.clone() };
        self.engine.place_bid_recorded(bid, || self.record(&command))
    }

    pub fn close(&self, car_id: &str, caller_id: &str) -> Result<Auction, HandleError> {
        let timestamp = Utc::now();
        let command = Command::CloseAuction {
            timestamp,
            car_id: car_id.to_string(),
            caller: caller_id.to_string(),
        };
        self.engine
            .close_recorded(car_id, caller_id, timestamp, || self.record(&command))
    }

    pub fn validate(&self, car_id: &str, caller_id: &str) -> Result<(Auction, Car), HandleError> {
        let timestamp = Utc::now();
        let command = Command::ValidateAuction {
            timestamp,
            car_id: car_id.to_string(),
            caller: caller_id.to_string(),
        };
        self.engine
            .validate_recorded(car_id, caller_id, timestamp, || self.record(&command))
    }

    pub fn get_car(&self, car_id: &str) -> Result<Car, Errors> {
        self.registry().get_car(car_id)
    }

    pub fn list_cars(&self) -> Vec<Car> {
        self.registry().list_cars()
    }

    pub fn get_auction(&self, car_id: &str) -> Result<Auction, Errors> {
        self.engine.get_auction(car_id)
    }

    pub fn list_auctions(&self) -> Vec<Auction> {
        self.engine.list_auctions()
    }
}
