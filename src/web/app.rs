use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer, Result};
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Arguments;
use crate::domain::{ErrorKind, Errors, User};
use crate::persistence::json_file::Journal;
use crate::service::{AuctionHouse, HandleError};
use super::types::{
    ApiError, AppState, AuctionDetail, AuctionFilter, AuctionItem, BidRequest, CarRequest,
    RegisterUserRequest, ValidationResponse,
};

// Initialize application state, replaying the journal when one is configured
pub fn init_app_state(args: &Arguments) -> Result<AppState, HandleError> {
    let house = match &args.journal_path {
        Some(path) => AuctionHouse::with_journal(args.engine_options(), Journal::open(path)?)?,
        None => AuctionHouse::new(args.engine_options()),
    };
    Ok(Arc::new(house))
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::DuplicateId | ErrorKind::AlreadyExists | ErrorKind::InvalidState => {
            StatusCode::CONFLICT
        }
        ErrorKind::NotAuthorized => StatusCode::FORBIDDEN,
        ErrorKind::UnknownOwner | ErrorKind::InvalidBid | ErrorKind::SelfBid => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn error_response(err: HandleError) -> HttpResponse {
    match err {
        HandleError::AuctionError(err) => auction_error(err),
        HandleError::JournalError(err) => HttpResponse::InternalServerError().json(ApiError {
            code: "journal".to_string(),
            message: err.to_string(),
        }),
    }
}

fn auction_error(err: Errors) -> HttpResponse {
    let kind = err.kind();
    HttpResponse::build(status_for(kind)).json(ApiError {
        code: kind.code().to_string(),
        message: err.to_string(),
    })
}

// Get all cars
async fn get_cars(data: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(data.list_cars()))
}

// Get car by ID
async fn get_car(path: web::Path<String>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let car_id = path.into_inner();
    match data.get_car(&car_id) {
        Ok(car) => Ok(HttpResponse::Ok().json(car)),
        Err(err) => Ok(auction_error(err)),
    }
}

// Register a car without opening an auction for it
async fn register_car(
    req: web::Json<CarRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let Some(car) = req.car.to_car(&req.owner.id) else {
        return Ok(HttpResponse::BadRequest().json(ApiError {
            code: "bad_request".to_string(),
            message: "car brand and color are required".to_string(),
        }));
    };

    match data.register_car(car) {
        Ok(car) => Ok(HttpResponse::Created().json(car)),
        Err(err) => Ok(error_response(err)),
    }
}

async fn register_user(
    req: web::Json<RegisterUserRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    match data.register_user(req.to_user()) {
        Ok(user) => Ok(HttpResponse::Created().json(user)),
        Err(err) => Ok(error_response(err)),
    }
}

// Get all auctions, optionally only those in one state
async fn get_auctions(
    filter: web::Query<AuctionFilter>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let auction_list: Vec<AuctionItem> = data
        .list_auctions()
        .iter()
        .filter(|a| filter.state.map_or(true, |state| a.phase() == state))
        .map(AuctionItem::from)
        .collect();

    Ok(HttpResponse::Ok().json(auction_list))
}

// Get auction by car ID
async fn get_auction(path: web::Path<String>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let car_id = path.into_inner();
    match data.get_auction(&car_id) {
        Ok(auction) => Ok(HttpResponse::Ok().json(AuctionDetail::from(&auction))),
        Err(err) => Ok(auction_error(err)),
    }
}

// Create an auction, registering the owner and the car first when the
// request carries enough to do so. Records that already exist are reused.
async fn create_auction(
    req: web::Json<CarRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let owner_id = &req.owner.id;

    if let Some(name) = &req.owner.name {
        if let Err(err) = data.ensure_user(User::new(owner_id.clone(), name.clone())) {
            return Ok(error_response(err));
        }
    }

    if let Some(car) = req.car.to_car(owner_id) {
        if let Err(err) = data.ensure_car(car) {
            return Ok(error_response(err));
        }
    }

    match data.create_auction(&req.car.id, owner_id) {
        Ok(auction) => Ok(HttpResponse::Created().json(AuctionDetail::from(&auction))),
        Err(err) => Ok(error_response(err)),
    }
}

async fn start_auction(
    req: web::Json<CarRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    match data.start(&req.car.id, &req.owner.id) {
        Ok(auction) => Ok(HttpResponse::Ok().json(AuctionDetail::from(&auction))),
        Err(err) => Ok(error_response(err)),
    }
}

async fn close_auction(
    req: web::Json<CarRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    match data.close(&req.car.id, &req.owner.id) {
        Ok(auction) => Ok(HttpResponse::Ok().json(AuctionDetail::from(&auction))),
        Err(err) => Ok(error_response(err)),
    }
}

async fn validate_auction(
    req: web::Json<CarRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    match data.validate(&req.car.id, &req.owner.id) {
        Ok((auction, car)) => Ok(HttpResponse::Ok().json(ValidationResponse {
            auction: AuctionDetail::from(&auction),
            car,
        })),
        Err(err) => Ok(error_response(err)),
    }
}

// Place a bid on a car's auction
async fn place_bid(
    req: web::Json<BidRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    match data.bid(&req.car.id, &req.gambler.id, req.amount) {
        Ok(bid) => Ok(HttpResponse::Ok().json(bid)),
        Err(err) => Ok(error_response(err)),
    }
}

// Configure routes
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .route("/", web::get().to(get_cars))
            .route("/cars", web::get().to(get_cars))
            .route("/cars", web::post().to(register_car))
            .route("/cars/{id}", web::get().to(get_car))
            .route("/register", web::post().to(register_user))
            .route("/auctions", web::get().to(get_auctions))
            .route("/auctions/{car_id}", web::get().to(get_auction))
            .route("/create", web::post().to(create_auction))
            .route("/start", web::post().to(start_auction))
            .route("/close", web::post().to(close_auction))
            .route("/validate", web::post().to(validate_auction))
            .route("/bid", web::post().to(place_bid)),
    );
}

// Main application
pub async fn run_app(bind_address: SocketAddr, app_state: AppState) -> std::io::Result<()> {
    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(Logger::default())
            .configure(configure_app)
    })
    .bind(bind_address)?
    .run()
    .await
}
