//! Tests for the order service.

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockOrderRepository, MockOrderStatusNotifier, MockPizzaRepository};
use crate::domain::{ErrorCode, OrderLineRequest, Pizza, PizzaSlug, UserId, UserRole};

fn pizza(id: PizzaId, cents: i64, available: bool) -> Pizza {
    let at = Utc
        .with_ymd_and_hms(2024, 2, 1, 0, 0, 0)
        .single()
        .expect("valid time");
    Pizza {
        id,
        slug: PizzaSlug::new(format!("pizza-{id}")).expect("slug"),
        price: Price::from_cents(cents).expect("price"),
        image_url: None,
        available,
        translations: Vec::new(),
        created_at: at,
        updated_at: at,
    }
}

fn order(id: OrderId, owner: UserId, status: OrderStatus) -> Order {
    let at = Utc
        .with_ymd_and_hms(2024, 2, 2, 19, 30, 0)
        .single()
        .expect("valid time");
    Order {
        id,
        user_id: owner,
        status,
        items: Vec::new(),
        total: Price::from_cents(0).expect("price"),
        delivery_address: "Rua Augusta, 100".to_owned(),
        created_at: at,
        updated_at: at,
    }
}

#[fixture]
fn customer() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId::random(),
        role: UserRole::Customer,
    }
}

#[fixture]
fn staff() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId::random(),
        role: UserRole::Staff,
    }
}

fn service(
    orders: MockOrderRepository,
    pizzas: MockPizzaRepository,
    notifier: MockOrderStatusNotifier,
) -> OrderService<MockOrderRepository, MockPizzaRepository> {
    OrderService::new(Arc::new(orders), Arc::new(pizzas), Arc::new(notifier))
}

fn request(items: Vec<(PizzaId, i32)>) -> PlaceOrderRequest {
    PlaceOrderRequest {
        items: items
            .into_iter()
            .map(|(pizza_id, quantity)| OrderLineRequest { pizza_id, quantity })
            .collect(),
        delivery_address: " Rua Augusta, 100 ".to_owned(),
    }
}

#[rstest]
#[tokio::test]
async fn place_copies_unit_prices_and_totals(customer: AuthenticatedUser) {
    let mut pizzas = MockPizzaRepository::new();
    pizzas
        .expect_find_by_ids()
        .withf(|ids| ids == [1, 2])
        .times(1)
        .return_once(|_| Ok(vec![pizza(1, 3990, true), pizza(2, 4550, true)]));
    let mut orders = MockOrderRepository::new();
    let owner = customer.id;
    orders
        .expect_create()
        .withf(move |new| {
            new.user_id == owner
                && new.total.cents() == 3990 * 2 + 4550 + 3990
                && new.items[1].unit_price.cents() == 4550
                && new.delivery_address == "Rua Augusta, 100"
        })
        .times(1)
        .return_once(move |_| Ok(order(10, owner, OrderStatus::Pending)));

    let placed = service(orders, pizzas, MockOrderStatusNotifier::new())
        .place(customer, request(vec![(1, 2), (2, 1), (1, 1)]))
        .await
        .expect("order placed");

    assert_eq!(placed.id, 10);
}

#[rstest]
#[case(vec![], "order must contain at least one item")]
#[case(vec![(1, 0)], "quantity must be between 1 and 20")]
#[case(vec![(1, 21)], "quantity must be between 1 and 20")]
#[tokio::test]
async fn place_rejects_bad_lines_without_touching_storage(
    customer: AuthenticatedUser,
    #[case] items: Vec<(PizzaId, i32)>,
    #[case] message: &str,
) {
    let mut pizzas = MockPizzaRepository::new();
    pizzas.expect_find_by_ids().times(0);
    let mut orders = MockOrderRepository::new();
    orders.expect_create().times(0);

    let error = service(orders, pizzas, MockOrderStatusNotifier::new())
        .place(customer, request(items))
        .await
        .expect_err("rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), message);
}

#[rstest]
#[case(vec![pizza(1, 1000, true)], "pizza 2 does not exist")]
#[case(vec![pizza(1, 1000, true), pizza(2, 1000, false)], "pizza 2 is not available")]
#[tokio::test]
async fn place_names_the_offending_pizza(
    customer: AuthenticatedUser,
    #[case] menu: Vec<Pizza>,
    #[case] message: &str,
) {
    let mut pizzas = MockPizzaRepository::new();
    pizzas
        .expect_find_by_ids()
        .times(1)
        .return_once(move |_| Ok(menu));
    let mut orders = MockOrderRepository::new();
    orders.expect_create().times(0);

    let error = service(orders, pizzas, MockOrderStatusNotifier::new())
        .place(customer, request(vec![(1, 1), (2, 1)]))
        .await
        .expect_err("rejected");

    assert_eq!(error.message(), message);
    assert_eq!(
        error.details().and_then(|d| d.get("pizzaId")),
        Some(&serde_json::json!(2))
    );
}

#[rstest]
#[tokio::test]
async fn place_rejects_blank_address(customer: AuthenticatedUser) {
    let mut req = request(vec![(1, 1)]);
    req.delivery_address = "   ".to_owned();

    let error = service(
        MockOrderRepository::new(),
        MockPizzaRepository::new(),
        MockOrderStatusNotifier::new(),
    )
    .place(customer, req)
    .await
    .expect_err("blank address");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn list_restricts_customers_to_their_orders(customer: AuthenticatedUser) {
    let mut orders = MockOrderRepository::new();
    orders
        .expect_list()
        .with(eq(Some(customer.id)))
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    service(orders, MockPizzaRepository::new(), MockOrderStatusNotifier::new())
        .list(customer)
        .await
        .expect("list succeeds");
}

#[rstest]
#[tokio::test]
async fn list_shows_staff_every_order(staff: AuthenticatedUser) {
    let mut orders = MockOrderRepository::new();
    orders
        .expect_list()
        .with(eq(None))
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    service(orders, MockPizzaRepository::new(), MockOrderStatusNotifier::new())
        .list(staff)
        .await
        .expect("list succeeds");
}

#[rstest]
#[tokio::test]
async fn find_one_hides_other_customers_orders(customer: AuthenticatedUser) {
    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(order(5, UserId::random(), OrderStatus::Pending))));

    let error = service(orders, MockPizzaRepository::new(), MockOrderStatusNotifier::new())
        .find_one(customer, 5)
        .await
        .expect_err("hidden");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "order 5 not found");
}

#[rstest]
#[tokio::test]
async fn update_status_publishes_to_room(staff: AuthenticatedUser) {
    let owner = UserId::random();
    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(order(5, owner, OrderStatus::Pending))));
    orders
        .expect_update_status()
        .with(eq(5), eq(OrderStatus::Pending), eq(OrderStatus::Confirmed))
        .times(1)
        .return_once(move |_, _, _| Ok(Some(order(5, owner, OrderStatus::Confirmed))));
    let mut notifier = MockOrderStatusNotifier::new();
    notifier
        .expect_publish()
        .with(eq(OrderStatusUpdate {
            order_id: 5,
            status: OrderStatus::Confirmed,
        }))
        .times(1)
        .return_const(());

    let updated = service(orders, MockPizzaRepository::new(), notifier)
        .update_status(staff, 5, OrderStatus::Confirmed)
        .await
        .expect("status updated");

    assert_eq!(updated.status, OrderStatus::Confirmed);
}

#[rstest]
#[tokio::test]
async fn update_status_rejects_illegal_transition(staff: AuthenticatedUser) {
    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(order(5, UserId::random(), OrderStatus::Delivered))));
    orders.expect_update_status().times(0);
    let mut notifier = MockOrderStatusNotifier::new();
    notifier.expect_publish().times(0);

    let error = service(orders, MockPizzaRepository::new(), notifier)
        .update_status(staff, 5, OrderStatus::Cancelled)
        .await
        .expect_err("illegal");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn update_status_is_staff_only(customer: AuthenticatedUser) {
    let mut orders = MockOrderRepository::new();
    orders.expect_find_by_id().times(0);

    let error = service(orders, MockPizzaRepository::new(), MockOrderStatusNotifier::new())
        .update_status(customer, 5, OrderStatus::Confirmed)
        .await
        .expect_err("forbidden");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn update_status_reports_conflict_when_status_moved_underneath(staff: AuthenticatedUser) {
    let owner = UserId::random();
    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(order(5, owner, OrderStatus::OutForDelivery))));
    orders
        .expect_update_status()
        .with(eq(5), eq(OrderStatus::OutForDelivery), eq(OrderStatus::Delivered))
        .times(1)
        .return_once(|_, _, _| Ok(None));
    let mut notifier = MockOrderStatusNotifier::new();
    notifier.expect_publish().times(0);

    let error = service(orders, MockPizzaRepository::new(), notifier)
        .update_status(staff, 5, OrderStatus::Delivered)
        .await
        .expect_err("stale transition");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

/// Single order store that yields between every read and write.
struct InterleavedOrders(Mutex<Order>);

#[async_trait]
impl OrderRepository for InterleavedOrders {
    async fn list(&self, _owner: Option<UserId>) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(vec![self.0.lock().expect("orders lock").clone()])
    }

    async fn find_by_id(&self, _id: OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let found = self.0.lock().expect("orders lock").clone();
        tokio::task::yield_now().await;
        Ok(Some(found))
    }

    async fn create(&self, _order: &NewOrder) -> Result<Order, OrderRepositoryError> {
        unreachable!("orders are seeded")
    }

    async fn update_status(
        &self,
        _id: OrderId,
        expected: OrderStatus,
        status: OrderStatus,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        tokio::task::yield_now().await;
        let mut stored = self.0.lock().expect("orders lock");
        if stored.status != expected {
            return Ok(None);
        }
        stored.status = status;
        Ok(Some(stored.clone()))
    }
}

#[derive(Default)]
struct RecordingNotifier(Mutex<Vec<OrderStatusUpdate>>);

impl OrderStatusNotifier for RecordingNotifier {
    fn publish(&self, update: OrderStatusUpdate) {
        self.0.lock().expect("notifier lock").push(update);
    }
}

#[rstest]
#[tokio::test]
async fn concurrent_transitions_from_the_same_status_apply_once(staff: AuthenticatedUser) {
    let orders = Arc::new(InterleavedOrders(Mutex::new(order(
        5,
        UserId::random(),
        OrderStatus::OutForDelivery,
    ))));
    let notifier = Arc::new(RecordingNotifier::default());
    let service = OrderService::new(
        Arc::clone(&orders),
        Arc::new(MockPizzaRepository::new()),
        notifier.clone(),
    );

    let (delivered, cancelled) = tokio::join!(
        service.update_status(staff, 5, OrderStatus::Delivered),
        service.update_status(staff, 5, OrderStatus::Cancelled),
    );

    let outcomes = [&delivered, &cancelled];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = outcomes
        .iter()
        .find_map(|r| r.as_ref().err())
        .expect("one transition loses");
    assert_eq!(loser.code(), ErrorCode::Conflict);

    let published = notifier.0.lock().expect("notifier lock").clone();
    let stored = orders.0.lock().expect("orders lock").status;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].status, stored);
}
