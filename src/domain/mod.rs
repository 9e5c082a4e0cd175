// src/domain/mod.rs
pub mod auctions;
pub mod bids;
pub mod cars;
pub mod commands;
pub mod core;
pub mod engine;
pub mod registry;
pub mod states;

pub use self::auctions::*;
pub use self::bids::*;
pub use self::cars::*;
pub use self::commands::*;
pub use self::core::*;
pub use self::engine::*;
pub use self::registry::*;
pub use self::states::*;

/// Applies one command to the registry or the auction engine.
pub fn handle(command: Command, engine: &AuctionEngine) -> Result<CommandSuccess, Errors> {
    handle_recorded(command, engine, |_| Ok(()))
}

/// Like [`handle`], passing the command to `record` while the lock that
/// orders it is held. The command only takes effect if `record` succeeds.
pub fn handle_recorded<E, R>(
    command: Command,
    engine: &AuctionEngine,
    record: R,
) -> Result<CommandSuccess, E>
where
    E: From<Errors>,
    R: FnOnce(&Command) -> Result<(), E>,
{
    let entry = command.clone();
    let record_entry = move || record(&entry);

    match command {
        Command::RegisterUser { timestamp, user } => {
            let user = engine.registry().register_user_recorded(user, record_entry)?;
            Ok(CommandSuccess::UserRegistered { timestamp, user })
        }

        Command::RegisterCar { timestamp, car } => {
            let car = engine.registry().register_car_recorded(car, record_entry)?;
            Ok(CommandSuccess::CarRegistered { timestamp, car })
        }

        Command::CreateAuction { timestamp, car_id, owner } => {
            let auction = engine.create_auction_recorded(&car_id, &owner, timestamp, record_entry)?;
            Ok(CommandSuccess::AuctionCreated { timestamp, auction })
        }

        Command::StartAuction { timestamp, car_id, caller } => {
            let auction = engine.start_recorded(&car_id, &caller, timestamp, record_entry)?;
            Ok(CommandSuccess::AuctionStarted { timestamp, auction })
        }

        Command::PlaceBid { timestamp, bid } => {
            let bid = engine.place_bid_recorded(bid, record_entry)?;
            Ok(CommandSuccess::BidAccepted { timestamp, bid })
        }

        Command::CloseAuction { timestamp, car_id, caller } => {
            let auction = engine.close_recorded(&car_id, &caller, timestamp, record_entry)?;
            Ok(CommandSuccess::AuctionClosed { timestamp, auction })
        }

        Command::ValidateAuction { timestamp, car_id, caller } => {
            let (auction, car) = engine.validate_recorded(&car_id, &caller, timestamp, record_entry)?;
            Ok(CommandSuccess::AuctionValidated { timestamp, auction, car })
        }
    }
}
