// src/domain/registry.rs
use indexmap::map::Entry;
use indexmap::IndexMap;
use parking_lot::RwLock;
use super::cars::Car;
use super::core::{CarId, Errors, User, UserId};

/// Cars and users known to the process, in registration order.
///
/// Lookups share a read lock. Registration holds the write lock across the
/// existence check and the insert, so racing registrations of one id
/// produce a single winner. Locks are always taken users first, then cars.
#[derive(Debug, Default)]
pub struct Registry {
    users: RwLock<IndexMap<UserId, User>>,
    cars: RwLock<IndexMap<CarId, Car>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_user(&self, user: User) -> Result<User, Errors> {
        self.register_user_recorded(user, || Ok(()))
    }

    /// Registers `user`, running `record` under the write lock right before
    /// the insert. Nothing is stored if `record` fails.
    pub fn register_user_recorded<E, R>(&self, user: User, record: R) -> Result<User, E>
    where
        E: From<Errors>,
        R: FnOnce() -> Result<(), E>,
    {
        let mut users = self.users.write();
        match users.entry(user.id.clone()) {
            Entry::Occupied(_) => Err(Errors::UserAlreadyExists(user.id).into()),
            Entry::Vacant(slot) => {
                record()?;
                Ok(slot.insert(user).clone())
            }
        }
    }

    pub fn register_car(&self, car: Car) -> Result<Car, Errors> {
        self.register_car_recorded(car, || Ok(()))
    }

    /// Registers `car`, running `record` under the write locks right before
    /// the insert. Nothing is stored if `record` fails.
    pub fn register_car_recorded<E, R>(&self, car: Car, record: R) -> Result<Car, E>
    where
        E: From<Errors>,
        R: FnOnce() -> Result<(), E>,
    {
        let users = self.users.read();
        let mut cars = self.cars.write();
        if cars.contains_key(&car.id) {
            return Err(Errors::CarAlreadyExists(car.id).into());
        }
        if !users.contains_key(&car.owner) {
            return Err(Errors::UnknownOwner(car.owner).into());
        }
        record()?;
        cars.insert(car.id.clone(), car.clone());
        Ok(car)
    }

    pub fn get_car(&self, id: &str) -> Result<Car, Errors> {
        self.cars
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Errors::UnknownCar(id.to_string()))
    }

    pub fn get_user(&self, id: &str) -> Result<User, Errors> {
        self.users
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Errors::UnknownUser(id.to_string()))
    }

    pub fn list_cars(&self) -> Vec<Car> {
        self.cars.read().values().cloned().collect()
    }

    pub fn list_users(&self) -> Vec<User> {
        self.users.read().values().cloned().collect()
    }

    /// Hands the car over to `new_owner`, who must be registered.
    pub fn transfer_car(&self, id: &str, new_owner: &str) -> Result<Car, Errors> {
        let users = self.users.read();
        let mut cars = self.cars.write();
        let car = cars
            .get_mut(id)
            .ok_or_else(|| Errors::UnknownCar(id.to_string()))?;
        if !users.contains_key(new_owner) {
            return Err(Errors::UnknownOwner(new_owner.to_string()));
        }
        car.owner = new_owner.to_string();
        Ok(car.clone())
    }
}
