//! In-memory adapters wiring the real domain services for integration tests.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use mockable::DefaultClock;
use pizzeria::domain::ports::{
    AuthTokenRepository, AuthTokenRepositoryError, DeliveryRepository, DeliveryRepositoryError,
    OrderRepository, OrderRepositoryError, PizzaRepository, PizzaRepositoryError,
    ReviewRepository, ReviewRepositoryError, TravelEstimateQuery, UserCredentials,
    UserPersistenceError, UserRepository,
};
use pizzeria::domain::{
    AccountService, Delivery, DeliveryService, Error, Location, NewDelivery, NewOrder, NewReview,
    Order, OrderId, OrderService, OrderStatus, PasswordHash, Pizza, PizzaDraft, PizzaFilter,
    PizzaId, PizzaPatch, PizzaService, Review, ReviewId, ReviewService, StoredToken,
    TravelEstimate, User, UserId,
};
use pizzeria::inbound::http::state::{HttpState, HttpStatePorts};
use pizzeria::inbound::ws::rooms::OrderRooms;
use pizzeria::inbound::ws::state::{OriginAllowList, WsState};

pub const STAFF_EMAIL: &str = "chef@pizzeria.test";

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
pub struct MemoryUsers(Mutex<Vec<UserCredentials>>);

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn create(&self, user: &User, hash: &PasswordHash) -> Result<(), UserPersistenceError> {
        let mut users = lock(&self.0);
        if users.iter().any(|c| c.user.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        users.push(UserCredentials {
            user: user.clone(),
            password_hash: hash.clone(),
        });
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        Ok(lock(&self.0)
            .iter()
            .find(|c| c.user.email().as_ref() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.0)
            .iter()
            .find(|c| c.user.id() == id)
            .map(|c| c.user.clone()))
    }
}

#[derive(Default)]
pub struct MemoryTokens(Mutex<Vec<StoredToken>>);

#[async_trait]
impl AuthTokenRepository for MemoryTokens {
    async fn store(&self, token: &StoredToken) -> Result<(), AuthTokenRepositoryError> {
        lock(&self.0).push(token.clone());
        Ok(())
    }

    async fn find(&self, digest: &str) -> Result<Option<StoredToken>, AuthTokenRepositoryError> {
        Ok(lock(&self.0).iter().find(|t| t.digest == digest).cloned())
    }

    async fn revoke(&self, digest: &str) -> Result<bool, AuthTokenRepositoryError> {
        let mut tokens = lock(&self.0);
        match tokens.iter_mut().find(|t| t.digest == digest && !t.revoked) {
            Some(token) => {
                token.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemoryPizzas(Mutex<Vec<Pizza>>);

#[async_trait]
impl PizzaRepository for MemoryPizzas {
    async fn list(&self, filter: &PizzaFilter) -> Result<Vec<Pizza>, PizzaRepositoryError> {
        Ok(lock(&self.0)
            .iter()
            .filter(|p| filter.min_price.is_none_or(|min| p.price >= min))
            .filter(|p| filter.max_price.is_none_or(|max| p.price <= max))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: PizzaId) -> Result<Option<Pizza>, PizzaRepositoryError> {
        Ok(lock(&self.0).iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[PizzaId]) -> Result<Vec<Pizza>, PizzaRepositoryError> {
        Ok(lock(&self.0)
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Pizza>, PizzaRepositoryError> {
        Ok(lock(&self.0)
            .iter()
            .find(|p| p.slug.as_ref() == slug)
            .cloned())
    }

    async fn create(&self, draft: &PizzaDraft) -> Result<Pizza, PizzaRepositoryError> {
        let mut pizzas = lock(&self.0);
        let now = Utc::now();
        let pizza = Pizza {
            id: PizzaId::try_from(pizzas.len() + 1).unwrap_or(PizzaId::MAX),
            slug: draft.slug.clone(),
            price: draft.price,
            image_url: draft.image_url.clone(),
            available: draft.available,
            translations: draft.translations.clone(),
            created_at: now,
            updated_at: now,
        };
        pizzas.push(pizza.clone());
        Ok(pizza)
    }

    async fn update(
        &self,
        id: PizzaId,
        patch: &PizzaPatch,
    ) -> Result<Option<Pizza>, PizzaRepositoryError> {
        let mut pizzas = lock(&self.0);
        let Some(pizza) = pizzas.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(slug) = &patch.slug {
            pizza.slug = slug.clone();
        }
        if let Some(price) = patch.price {
            pizza.price = price;
        }
        if let Some(available) = patch.available {
            pizza.available = available;
        }
        pizza.updated_at = Utc::now();
        Ok(Some(pizza.clone()))
    }

    async fn delete(&self, id: PizzaId) -> Result<bool, PizzaRepositoryError> {
        let mut pizzas = lock(&self.0);
        let before = pizzas.len();
        pizzas.retain(|p| p.id != id);
        Ok(pizzas.len() != before)
    }
}

#[derive(Default)]
pub struct MemoryOrders(Mutex<Vec<Order>>);

#[async_trait]
impl OrderRepository for MemoryOrders {
    async fn list(&self, owner: Option<UserId>) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut orders: Vec<Order> = lock(&self.0)
            .iter()
            .filter(|o| owner.is_none_or(|id| o.user_id == id))
            .cloned()
            .collect();
        orders.reverse();
        Ok(orders)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(lock(&self.0).iter().find(|o| o.id == id).cloned())
    }

    async fn create(&self, order: &NewOrder) -> Result<Order, OrderRepositoryError> {
        let mut orders = lock(&self.0);
        let now = Utc::now();
        let stored = Order {
            id: OrderId::try_from(orders.len() + 1).unwrap_or(OrderId::MAX),
            user_id: order.user_id,
            status: OrderStatus::Pending,
            items: order.items.clone(),
            total: order.total,
            delivery_address: order.delivery_address.clone(),
            created_at: now,
            updated_at: now,
        };
        orders.push(stored.clone());
        Ok(stored)
    }

    async fn update_status(
        &self,
        id: OrderId,
        expected: OrderStatus,
        status: OrderStatus,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        let mut orders = lock(&self.0);
        Ok(orders
            .iter_mut()
            .find(|o| o.id == id && o.status == expected)
            .map(|order| {
                order.status = status;
                order.updated_at = Utc::now();
                order.clone()
            }))
    }
}

#[derive(Default)]
pub struct MemoryReviews(Mutex<Vec<Review>>);

#[async_trait]
impl ReviewRepository for MemoryReviews {
    async fn list_for_pizza(
        &self,
        pizza_id: PizzaId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(lock(&self.0)
            .iter()
            .filter(|r| r.pizza_id == pizza_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        Ok(lock(&self.0).iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, review: &NewReview) -> Result<Review, ReviewRepositoryError> {
        let mut reviews = lock(&self.0);
        if reviews
            .iter()
            .any(|r| r.pizza_id == review.pizza_id && r.user_id == review.user_id)
        {
            return Err(ReviewRepositoryError::duplicate());
        }
        let stored = Review {
            id: ReviewId::try_from(reviews.len() + 1).unwrap_or(ReviewId::MAX),
            pizza_id: review.pizza_id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: Utc::now(),
        };
        reviews.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: ReviewId) -> Result<bool, ReviewRepositoryError> {
        let mut reviews = lock(&self.0);
        let before = reviews.len();
        reviews.retain(|r| r.id != id);
        Ok(reviews.len() != before)
    }
}

#[derive(Default)]
pub struct MemoryDeliveries(Mutex<Vec<Delivery>>);

#[async_trait]
impl DeliveryRepository for MemoryDeliveries {
    async fn find_by_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<Delivery>, DeliveryRepositoryError> {
        Ok(lock(&self.0).iter().find(|d| d.order_id == order_id).cloned())
    }

    async fn create(&self, delivery: &NewDelivery) -> Result<Delivery, DeliveryRepositoryError> {
        let mut deliveries = lock(&self.0);
        let stored = Delivery {
            id: i32::try_from(deliveries.len() + 1).unwrap_or(i32::MAX),
            order_id: delivery.order_id,
            origin: delivery.origin.clone(),
            destination: delivery.destination.clone(),
            distance_text: delivery.estimate.distance_text.clone(),
            distance_meters: delivery.estimate.distance_value,
            duration_text: delivery.estimate.duration_text.clone(),
            duration_seconds: delivery.estimate.duration_value,
            created_at: Utc::now(),
        };
        deliveries.push(stored.clone());
        Ok(stored)
    }
}

/// Travel lookup answering every trip with the same estimate.
pub struct FixedTravel;

#[async_trait]
impl TravelEstimateQuery for FixedTravel {
    async fn distance_and_duration(
        &self,
        _origin: &Location,
        _destination: &Location,
    ) -> Result<TravelEstimate, Error> {
        Ok(TravelEstimate {
            distance_text: Some("4.1 km".to_owned()),
            distance_value: Some(4100),
            duration_text: Some("12 mins".to_owned()),
            duration_value: Some(720),
        })
    }
}

/// Build adapter state backed by in-memory repositories.
pub fn memory_states(allowed_origins: &[&str]) -> (HttpState, WsState) {
    let pizza_repo = Arc::new(MemoryPizzas::default());
    let order_repo = Arc::new(MemoryOrders::default());
    let rooms = Arc::new(OrderRooms::new());
    let travel: Arc<dyn TravelEstimateQuery> = Arc::new(FixedTravel);

    let accounts = Arc::new(AccountService::new(
        Arc::new(MemoryUsers::default()),
        Arc::new(MemoryTokens::default()),
        Arc::new(DefaultClock),
        [STAFF_EMAIL.to_owned()],
    ));
    let pizzas = Arc::new(PizzaService::new(pizza_repo.clone()));
    let orders = Arc::new(OrderService::new(
        order_repo.clone(),
        pizza_repo.clone(),
        rooms.clone(),
    ));
    let reviews = Arc::new(ReviewService::new(
        Arc::new(MemoryReviews::default()),
        pizza_repo,
    ));
    let deliveries = Arc::new(DeliveryService::new(
        Arc::new(MemoryDeliveries::default()),
        order_repo,
        travel.clone(),
        "Pizzeria, São Paulo",
    ));

    let http = HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        tokens: accounts,
        pizzas: pizzas.clone(),
        pizzas_query: pizzas,
        orders: orders.clone(),
        orders_query: orders,
        reviews: reviews.clone(),
        reviews_query: reviews,
        deliveries: deliveries.clone(),
        deliveries_query: deliveries,
        travel,
    })
    .with_cookie_secure(false);
    let ws = WsState::new(rooms, OriginAllowList::new(allowed_origins.iter().copied()));
    (http, ws)
}
