use car_auction::domain::{Car, Command, EngineOptions, ErrorKind, Phase, User};
use car_auction::persistence::json_file::{read_commands, Journal, JournalError};
use car_auction::service::{AuctionHouse, HandleError};
use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::tempdir;
#[path="utils/mod.rs"] mod utils;
use utils::*;

fn house_with_journal(path: &std::path::Path) -> AuctionHouse {
    AuctionHouse::with_journal(EngineOptions::default(), Journal::open(path).unwrap()).unwrap()
}

fn seed(house: &AuctionHouse) {
    house.register_user(sample_seller()).unwrap();
    house.register_user(buyer_1()).unwrap();
    house.register_user(buyer_2()).unwrap();
    house.register_car(sample_car()).unwrap();
}

#[test]
fn missing_journal_reads_as_empty() {
    let dir = tempdir().unwrap();
    let commands = read_commands(dir.path().join("absent.jsonl")).unwrap();
    assert!(commands.is_empty());
}

#[test]
fn applied_commands_are_journaled_and_rejected_ones_are_not() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal.jsonl");
    let house = house_with_journal(&path);
    seed(&house);

    house.create_auction(&sample_car_id(), &sample_seller().id).unwrap();
    let rejected = house.start(&sample_car_id(), &buyer_1().id);
    assert!(matches!(
        rejected,
        Err(HandleError::AuctionError(ref e)) if e.kind() == ErrorKind::NotAuthorized
    ));

    let commands = read_commands(&path).unwrap();
    assert_eq!(commands.len(), 5);
    assert!(matches!(commands.last(), Some(Command::CreateAuction { .. })));
}

#[test]
fn replay_restores_registry_and_auctions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal.jsonl");

    let (auctions, cars) = {
        let house = house_with_journal(&path);
        seed(&house);
        house.create_auction(&sample_car_id(), &sample_seller().id).unwrap();
        house.start(&sample_car_id(), &sample_seller().id).unwrap();
        house.bid(&sample_car_id(), &buyer_1().id, 100).unwrap();
        house.bid(&sample_car_id(), &buyer_2().id, 150).unwrap();
        house.close(&sample_car_id(), &sample_seller().id).unwrap();
        house.validate(&sample_car_id(), &sample_seller().id).unwrap();
        (house.list_auctions(), house.list_cars())
    };

    let restored = house_with_journal(&path);
    assert_eq!(restored.list_auctions(), auctions);
    assert_eq!(restored.list_cars(), cars);
    assert_eq!(restored.get_car(&sample_car_id()).unwrap().owner, buyer_2().id);
    assert_eq!(restored.get_auction(&sample_car_id()).unwrap().phase(), Phase::Validated);

    // New commands keep appending after a replay.
    restored.register_user(User::new("U4", "Late")).unwrap();
    assert_eq!(read_commands(&path).unwrap().len(), 11);
}

#[test]
fn corrupt_journal_reports_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal.jsonl");
    let valid = serde_json::to_string(&Command::RegisterUser {
        timestamp: sample_created_at(),
        user: sample_seller(),
    })
    .unwrap();
    fs::write(&path, format!("{}\n\nnot json\n", valid)).unwrap();

    match read_commands(&path) {
        Err(JournalError::Parse { line, .. }) => assert_eq!(line, 3),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn replay_of_invalid_history_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal.jsonl");
    let orphan_car = Command::RegisterCar {
        timestamp: sample_created_at(),
        car: Car::new("C1", "Toyota", "blue", "nobody"),
    };
    fs::write(&path, serde_json::to_string(&orphan_car).unwrap()).unwrap();

    let result = AuctionHouse::with_journal(EngineOptions::default(), Journal::open(&path).unwrap());
    assert!(matches!(
        result,
        Err(HandleError::AuctionError(ref e)) if e.kind() == ErrorKind::UnknownOwner
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bids_replay_in_commit_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal.jsonl");
    let house = Arc::new(house_with_journal(&path));
    seed(&house);
    house.create_auction(&sample_car_id(), &sample_seller().id).unwrap();
    house.start(&sample_car_id(), &sample_seller().id).unwrap();

    let tasks: Vec<_> = (1..=40i64)
        .map(|amount| {
            let house = house.clone();
            let bidder = if amount % 2 == 0 { buyer_1().id } else { buyer_2().id };
            tokio::task::spawn_blocking(move || house.bid(&sample_car_id(), &bidder, amount).is_ok())
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let auction = house.get_auction(&sample_car_id()).unwrap();
    assert_eq!(auction.highest_bid().unwrap().bid_amount, 40);

    let restored = house_with_journal(&path);
    assert_eq!(restored.get_auction(&sample_car_id()).unwrap(), auction);
}

#[test]
fn handled_commands_are_journaled_verbatim() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal.jsonl");
    let house = house_with_journal(&path);

    let command = Command::RegisterUser {
        timestamp: sample_created_at(),
        user: sample_seller(),
    };
    house.handle(command.clone()).unwrap();

    let duplicate = house.handle(command.clone());
    assert!(matches!(
        duplicate,
        Err(HandleError::AuctionError(ref e)) if e.kind() == ErrorKind::DuplicateId
    ));
    assert_eq!(read_commands(&path).unwrap(), vec![command]);
}

#[test]
fn bids_on_separate_cars_replay_per_car() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal.jsonl");
    let house = house_with_journal(&path);
    seed(&house);
    house.register_car(Car::new("C2", "Volvo", "red", sample_seller().id)).unwrap();
    for car_id in [sample_car_id(), "C2".to_string()] {
        house.create_auction(&car_id, &sample_seller().id).unwrap();
        house.start(&car_id, &sample_seller().id).unwrap();
    }

    thread::scope(|s| {
        for car_id in [sample_car_id(), "C2".to_string()] {
            for bidder in [buyer_1().id, buyer_2().id] {
                let house = &house;
                let car_id = car_id.clone();
                s.spawn(move || {
                    for amount in 1..=25i64 {
                        let _ = house.bid(&car_id, &bidder, amount);
                    }
                });
            }
        }
    });

    let restored = house_with_journal(&path);
    assert_eq!(restored.list_auctions(), house.list_auctions());
    for auction in restored.list_auctions() {
        assert_eq!(auction.highest_bid().unwrap().bid_amount, 25);
    }
}

#[test]
fn implicit_registrations_tolerate_races() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal.jsonl");
    let house = house_with_journal(&path);
    let threads = 8;
    let barrier = Barrier::new(threads);

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let house = &house;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    let owner = house.ensure_user(sample_seller())?;
                    let car = house.ensure_car(sample_car())?;
                    Ok::<_, HandleError>((owner, car))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for result in results {
        let (owner, car) = result.unwrap();
        assert_eq!(owner, sample_seller());
        assert_eq!(car, sample_car());
    }
    assert_eq!(read_commands(&path).unwrap().len(), 2);
}

#[test]
fn replay_keeps_bids_below_a_raised_minimum() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal.jsonl");
    {
        let house = house_with_journal(&path);
        seed(&house);
        house.register_car(Car::new("C2", "Volvo", "red", sample_seller().id)).unwrap();
        house.create_auction(&sample_car_id(), &sample_seller().id).unwrap();
        house.start(&sample_car_id(), &sample_seller().id).unwrap();
        house.bid(&sample_car_id(), &buyer_1().id, 5).unwrap();
    }

    let raised = EngineOptions { min_opening_bid: 10 };
    let restored = AuctionHouse::with_journal(raised, Journal::open(&path).unwrap()).unwrap();
    let auction = restored.get_auction(&sample_car_id()).unwrap();
    assert_eq!(auction.highest_bid().unwrap().bid_amount, 5);
    restored.bid(&sample_car_id(), &buyer_2().id, 6).unwrap();

    restored.create_auction("C2", &sample_seller().id).unwrap();
    restored.start("C2", &sample_seller().id).unwrap();
    let below = restored.bid("C2", &buyer_1().id, 5);
    assert!(matches!(
        below,
        Err(HandleError::AuctionError(ref e)) if e.kind() == ErrorKind::InvalidBid
    ));
}
