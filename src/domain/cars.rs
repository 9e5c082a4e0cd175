// src/domain/cars.rs
use serde::{Deserialize, Serialize};
use super::core::{CarId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    #[serde(alias = "model")]
    pub brand: String,
    #[serde(alias = "colour")]
    pub color: String,
    pub owner: UserId,
}

impl Car {
    pub fn new(
        id: impl Into<CarId>,
        brand: impl Into<String>,
        color: impl Into<String>,
        owner: impl Into<UserId>,
    ) -> Self {
        Car {
            id: id.into(),
            brand: brand.into(),
            color: color.into(),
            owner: owner.into(),
        }
    }
}
