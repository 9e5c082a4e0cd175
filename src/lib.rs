// src/lib.rs
pub mod config;
pub mod domain;
pub mod persistence;
pub mod service;
pub mod web;

pub use domain::*;
pub use service::{AuctionHouse, HandleError};
