// src/domain/engine.rs
use chrono::{DateTime, Utc};
use indexmap::map::Entry;
use indexmap::IndexMap;
use log::{debug, info};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use super::auctions::Auction;
use super::bids::Bid;
use super::cars::Car;
use super::core::{AmountValue, CarId, Errors};
use super::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Smallest amount accepted as the first bid of an auction.
    pub min_opening_bid: AmountValue,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions { min_opening_bid: 1 }
    }
}

type AuctionHandle = Arc<Mutex<Auction>>;

/// Owns one lock-guarded auction record per car.
///
/// The outer table lock is only held to look up or insert a handle. Each
/// transition then runs under that car's own mutex, so auctions on
/// different cars never wait on each other. No lock is held while the
/// registry is consulted.
#[derive(Debug)]
pub struct AuctionEngine {
    registry: Arc<Registry>,
    options: EngineOptions,
    auctions: RwLock<IndexMap<CarId, AuctionHandle>>,
}

impl AuctionEngine {
    pub fn new(registry: Arc<Registry>, options: EngineOptions) -> Self {
        AuctionEngine {
            registry,
            options,
            auctions: RwLock::new(IndexMap::new()),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn with_options(self, options: EngineOptions) -> Self {
        AuctionEngine { options, ..self }
    }

    fn auction_handle(&self, car_id: &str) -> Result<AuctionHandle, Errors> {
        self.auctions
            .read()
            .get(car_id)
            .cloned()
            .ok_or_else(|| Errors::UnknownAuction(car_id.to_string()))
    }

    /// Runs one read-check-write against the car's auction. `record` runs
    /// under the car's lock once `step` has succeeded, and the stored record
    /// is only replaced when both succeed.
    fn transition<F, E, R>(&self, car_id: &str, step: F, record: R) -> Result<Auction, E>
    where
        F: FnOnce(&Auction) -> Result<Auction, Errors>,
        E: From<Errors>,
        R: FnOnce() -> Result<(), E>,
    {
        let handle = self.auction_handle(car_id)?;
        let mut current = handle.lock();
        let next = step(&current)?;
        record()?;
        *current = next.clone();
        Ok(next)
    }

    pub fn create_auction(
        &self,
        car_id: &str,
        owner_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Auction, Errors> {
        self.create_auction_recorded(car_id, owner_id, at, || Ok(()))
    }

    /// `record` runs under the auction table's write lock, before the new
    /// auction becomes visible.
    pub fn create_auction_recorded<E, R>(
        &self,
        car_id: &str,
        owner_id: &str,
        at: DateTime<Utc>,
        record: R,
    ) -> Result<Auction, E>
    where
        E: From<Errors>,
        R: FnOnce() -> Result<(), E>,
    {
        let car = self.registry.get_car(car_id)?;
        self.registry
            .get_user(owner_id)
            .map_err(|_| Errors::UnknownOwner(owner_id.to_string()))?;
        if car.owner != owner_id {
            return Err(Errors::NotAuthorized(owner_id.to_string(), car.id).into());
        }

        let mut auctions = self.auctions.write();
        match auctions.entry(car.id.clone()) {
            Entry::Occupied(_) => Err(Errors::AuctionAlreadyExists(car.id).into()),
            Entry::Vacant(slot) => {
                record()?;
                let auction = Auction::new(car.id, owner_id.to_string(), at);
                slot.insert(Arc::new(Mutex::new(auction.clone())));
                debug!("Created auction for car {}", auction.car_id);
                Ok(auction)
            }
        }
    }

    pub fn start(&self, car_id: &str, caller_id: &str, at: DateTime<Utc>) -> Result<Auction, Errors> {
        self.start_recorded(car_id, caller_id, at, || Ok(()))
    }

    pub fn start_recorded<E, R>(
        &self,
        car_id: &str,
        caller_id: &str,
        at: DateTime<Utc>,
        record: R,
    ) -> Result<Auction, E>
    where
        E: From<Errors>,
        R: FnOnce() -> Result<(), E>,
    {
        let auction = self.transition(car_id, |a| a.start(caller_id, at), record)?;
        debug!("Opened auction for car {}", car_id);
        Ok(auction)
    }

    pub fn bid(
        &self,
        car_id: &str,
        bidder_id: &str,
        amount: AmountValue,
        at: DateTime<Utc>,
    ) -> Result<Bid, Errors> {
        self.place_bid(Bid::new(car_id.to_string(), bidder_id.to_string(), amount, at))
    }

    /// Admits a fully formed bid and returns the new highest-bid snapshot.
    pub fn place_bid(&self, bid: Bid) -> Result<Bid, Errors> {
        self.place_bid_recorded(bid, || Ok(()))
    }

    pub fn place_bid_recorded<E, R>(&self, bid: Bid, record: R) -> Result<Bid, E>
    where
        E: From<Errors>,
        R: FnOnce() -> Result<(), E>,
    {
        self.registry.get_user(&bid.bidder)?;
        let min_opening_bid = self.options.min_opening_bid;
        let car_id = bid.for_car.clone();

        let auction = self.transition(
            &car_id,
            |a| {
                a.add_bid(bid, min_opening_bid).map_err(|err| {
                    debug!("Rejected bid on car {}: {}", car_id, err);
                    err
                })
            },
            record,
        )?;
        let highest = auction
            .highest_bid()
            .cloned()
            .ok_or_else(|| Errors::UnknownAuction(car_id.clone()))?;
        info!(
            "Accepted bid of {} by {} on car {}",
            highest.bid_amount, highest.bidder, car_id
        );
        Ok(highest)
    }

    pub fn close(&self, car_id: &str, caller_id: &str, at: DateTime<Utc>) -> Result<Auction, Errors> {
        self.close_recorded(car_id, caller_id, at, || Ok(()))
    }

    pub fn close_recorded<E, R>(
        &self,
        car_id: &str,
        caller_id: &str,
        at: DateTime<Utc>,
        record: R,
    ) -> Result<Auction, E>
    where
        E: From<Errors>,
        R: FnOnce() -> Result<(), E>,
    {
        let auction = self.transition(car_id, |a| a.close(caller_id, at), record)?;
        debug!("Closed auction for car {}", car_id);
        Ok(auction)
    }

    /// Settles a closed auction. A winning bid moves the car to the bidder;
    /// an auction without bids ends as a no-sale with the owner unchanged.
    pub fn validate(
        &self,
        car_id: &str,
        caller_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(Auction, Car), Errors> {
        self.validate_recorded(car_id, caller_id, at, || Ok(()))
    }

    pub fn validate_recorded<E, R>(
        &self,
        car_id: &str,
        caller_id: &str,
        at: DateTime<Utc>,
        record: R,
    ) -> Result<(Auction, Car), E>
    where
        E: From<Errors>,
        R: FnOnce() -> Result<(), E>,
    {
        let auction = self.transition(car_id, |a| a.validate(caller_id, at), record)?;

        let car = match auction.try_get_amount_and_winner() {
            Some((amount, winner)) => {
                let car = self.registry.transfer_car(car_id, &winner)?;
                info!("Car {} sold to {} for {}", car_id, winner, amount);
                car
            }
            None => {
                info!("Auction for car {} validated without a sale", car_id);
                self.registry.get_car(car_id)?
            }
        };

        Ok((auction, car))
    }

    pub fn get_auction(&self, car_id: &str) -> Result<Auction, Errors> {
        let handle = self.auction_handle(car_id)?;
        let auction = handle.lock().clone();
        Ok(auction)
    }

    pub fn list_auctions(&self) -> Vec<Auction> {
        let handles: Vec<AuctionHandle> = self.auctions.read().values().cloned().collect();
        handles.iter().map(|handle| handle.lock().clone()).collect()
    }
}
