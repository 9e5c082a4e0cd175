use car_auction::domain::{
    Auction, AuctionEngine, Bid, Car, EngineOptions, Registry, User,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
// See https://users.rust-lang.org/t/sharing-code-and-macros-in-tests-directory/3098/7

// Sample data for tests
pub fn sample_car_id() -> String {
    "C1".to_string()
}

pub fn sample_created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 1, 1, 8, 28, 0).unwrap()
}

pub fn sample_opened_at() -> DateTime<Utc> {
    sample_created_at() + Duration::minutes(5)
}

pub fn sample_bid_time() -> DateTime<Utc> {
    sample_opened_at() + Duration::minutes(10)
}

pub fn sample_closed_at() -> DateTime<Utc> {
    sample_created_at() + Duration::days(1)
}

pub fn sample_seller() -> User {
    User::new("U1", "Seller")
}

pub fn buyer_1() -> User {
    User::new("U2", "Buyer 1")
}

pub fn buyer_2() -> User {
    User::new("U3", "Buyer 2")
}

pub fn sample_car() -> Car {
    Car::new(sample_car_id(), "Toyota", "blue", sample_seller().id)
}

pub fn bid_by(bidder: &User, amount: i64) -> Bid {
    Bid::new(sample_car_id(), bidder.id.clone(), amount, sample_bid_time())
}

pub fn sample_auction() -> Auction {
    Auction::new(sample_car_id(), sample_seller().id, sample_created_at())
}

pub fn open_auction() -> Auction {
    sample_auction()
        .start(&sample_seller().id, sample_opened_at())
        .unwrap()
}

pub fn sample_registry() -> Arc<Registry> {
    let registry = Registry::new();
    registry.register_user(sample_seller()).unwrap();
    registry.register_user(buyer_1()).unwrap();
    registry.register_user(buyer_2()).unwrap();
    registry.register_car(sample_car()).unwrap();
    Arc::new(registry)
}

pub fn sample_engine() -> AuctionEngine {
    AuctionEngine::new(sample_registry(), EngineOptions::default())
}

/// Engine with the sample car's auction already created and started.
pub fn engine_with_open_auction() -> AuctionEngine {
    let engine = sample_engine();
    engine
        .create_auction(&sample_car_id(), &sample_seller().id, sample_created_at())
        .unwrap();
    engine
        .start(&sample_car_id(), &sample_seller().id, sample_opened_at())
        .unwrap();
    engine
}
