use std::sync::Arc;

use tracing::{error, instrument};
use uuid::Uuid;

use crate::data::order_repository::OrderRepository;
use crate::data::product_repository::ProductRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::order::{LineItem, Order, ShippingAddress};
use crate::domain::user::User;
use crate::infrastructure::mailer::Mailer;
use crate::presentation::dto::{OrderHistoryItem, OrderHistoryView, OrderItemRequest};

#[derive(Clone)]
pub struct OrderService<O, P, U>
where
    O: OrderRepository + 'static,
    P: ProductRepository + 'static,
    U: UserRepository + 'static,
{
    order_repo: Arc<O>,
    product_repo: Arc<P>,
    user_repo: Arc<U>,
    mailer: Arc<Mailer>,
}

impl<O, P, U> OrderService<O, P, U>
where
    O: OrderRepository + 'static,
    P: ProductRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(
        order_repo: Arc<O>,
        product_repo: Arc<P>,
        user_repo: Arc<U>,
        mailer: Arc<Mailer>,
    ) -> Self {
        Self {
            order_repo,
            product_repo,
            user_repo,
            mailer,
        }
    }

    /// Places an order in two phases: a read-only validation pass that builds
    /// the price snapshots, then a single transactional write that reserves
    /// stock and persists the order. A failure anywhere leaves the catalog
    /// untouched and persists nothing.
    #[instrument(skip(self, items, shipping_address), fields(user_id = %user_id))]
    pub async fn place_order(
        &self,
        user_id: Uuid,
        items: Vec<OrderItemRequest>,
        shipping_address: ShippingAddress,
    ) -> Result<(Order, User), DomainError> {
        if items.is_empty() {
            return Err(DomainError::Validation(
                "order must contain at least one product".into(),
            ));
        }

        let mut line_items = Vec::with_capacity(items.len());
        for item in &items {
            if item.quantity < 1 {
                return Err(DomainError::Validation(format!(
                    "invalid quantity {} for product {}",
                    item.quantity, item.product_id
                )));
            }

            let product = self
                .product_repo
                .find_by_id(item.product_id)
                .await?
                .ok_or(DomainError::ProductNotFound(item.product_id))?;
            if product.stock < item.quantity {
                return Err(DomainError::InsufficientStock(product.name));
            }

            line_items.push(LineItem {
                product_id: product.id,
                name: product.name,
                price: product.price,
                quantity: item.quantity,
            });
        }

        let order = Order::new(user_id, line_items, shipping_address);
        let order = self.order_repo.create(order).await?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("order owner {} missing", user_id)))?;

        // Best-effort notification: runs on its own task, failures are
        // logged and never reach the caller.
        let mailer = Arc::clone(&self.mailer);
        let order_for_mail = order.clone();
        let user_for_mail = user.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer
                .send_order_confirmation(&order_for_mail, &user_for_mail)
                .await
            {
                error!(order_id = %order_for_mail.id, "failed to send order confirmation: {}", e);
            }
        });

        Ok((order, user))
    }

    /// Order history, newest first, with each line item resolved to the
    /// current product where it still exists.
    pub async fn list_orders(&self, user_id: Uuid) -> Result<Vec<OrderHistoryView>, DomainError> {
        let orders = self.order_repo.list_for_user(user_id).await?;

        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            let mut items = Vec::with_capacity(order.items.len());
            for item in order.items {
                let product = self.product_repo.find_by_id(item.product_id).await?;
                items.push(OrderHistoryItem {
                    product,
                    name: item.name,
                    price: item.price,
                    quantity: item.quantity,
                });
            }
            views.push(OrderHistoryView {
                id: order.id,
                user_id: order.user_id,
                products: items,
                total_amount: order.total_amount,
                shipping_address: order.shipping_address,
                status: order.status,
                created_at: order.created_at,
            });
        }

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::catalog_service::sample_products;
    use crate::data::memory::{
        MemOrderRepository, MemProductRepository, MemStore, MemUserRepository,
    };
    use rust_decimal::Decimal;

    struct Fixture {
        store: Arc<MemStore>,
        service: OrderService<MemOrderRepository, MemProductRepository, MemUserRepository>,
        user: User,
    }

    fn fixture() -> Fixture {
        let store = MemStore::with_products(sample_products());
        let user = User::new("Alice".into(), "alice@example.com".into(), "hash".into());
        store.users.lock().unwrap().push(user.clone());

        let service = OrderService::new(
            Arc::new(MemOrderRepository(Arc::clone(&store))),
            Arc::new(MemProductRepository(Arc::clone(&store))),
            Arc::new(MemUserRepository(Arc::clone(&store))),
            Arc::new(Mailer::disabled()),
        );
        Fixture {
            store,
            service,
            user,
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            street: "1 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip_code: "62704".into(),
            country: "USA".into(),
        }
    }

    fn product_id(store: &MemStore, name: &str) -> Uuid {
        store
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn placing_an_order_decrements_stock_and_totals_the_snapshot() {
        let f = fixture();
        let laptop = product_id(&f.store, "Laptop Pro");

        let (order, user) = f
            .service
            .place_order(
                f.user.id,
                vec![OrderItemRequest {
                    product_id: laptop,
                    quantity: 2,
                }],
                address(),
            )
            .await
            .unwrap();

        assert_eq!(order.total_amount, Decimal::new(259_998, 2));
        assert_eq!(f.store.stock_of(laptop), Some(28));
        assert_eq!(f.store.orders.lock().unwrap().len(), 1);
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(order.items[0].name, "Laptop Pro");
    }

    #[tokio::test]
    async fn unknown_product_creates_nothing() {
        let f = fixture();

        let err = f
            .service
            .place_order(
                f.user.id,
                vec![OrderItemRequest {
                    product_id: Uuid::new_v4(),
                    quantity: 1,
                }],
                address(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ProductNotFound(_)));
        assert!(f.store.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn insufficient_stock_creates_nothing() {
        let f = fixture();
        let laptop = product_id(&f.store, "Laptop Pro");

        let err = f
            .service
            .place_order(
                f.user.id,
                vec![OrderItemRequest {
                    product_id: laptop,
                    quantity: 31,
                }],
                address(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InsufficientStock(_)));
        assert!(f.store.orders.lock().unwrap().is_empty());
        assert_eq!(f.store.stock_of(laptop), Some(30));
    }

    #[tokio::test]
    async fn failing_later_item_leaves_earlier_items_untouched() {
        let f = fixture();
        let phone = product_id(&f.store, "Smartphone X");
        let laptop = product_id(&f.store, "Laptop Pro");

        let err = f
            .service
            .place_order(
                f.user.id,
                vec![
                    OrderItemRequest {
                        product_id: phone,
                        quantity: 1,
                    },
                    OrderItemRequest {
                        product_id: laptop,
                        quantity: 1000,
                    },
                ],
                address(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InsufficientStock(_)));
        assert_eq!(f.store.stock_of(phone), Some(50));
        assert_eq!(f.store.stock_of(laptop), Some(30));
        assert!(f.store.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_cart_and_bad_quantity_are_validation_errors() {
        let f = fixture();
        let laptop = product_id(&f.store, "Laptop Pro");

        let empty = f
            .service
            .place_order(f.user.id, vec![], address())
            .await
            .unwrap_err();
        assert!(matches!(empty, DomainError::Validation(_)));

        let zero = f
            .service
            .place_order(
                f.user.id,
                vec![OrderItemRequest {
                    product_id: laptop,
                    quantity: 0,
                }],
                address(),
            )
            .await
            .unwrap_err();
        assert!(matches!(zero, DomainError::Validation(_)));
        assert_eq!(f.store.stock_of(laptop), Some(30));
    }

    #[tokio::test]
    async fn history_is_scoped_to_the_user_and_newest_first() {
        let f = fixture();
        let laptop = product_id(&f.store, "Laptop Pro");
        let phone = product_id(&f.store, "Smartphone X");

        let bob = User::new("Bob".into(), "bob@example.com".into(), "hash".into());
        f.store.users.lock().unwrap().push(bob.clone());

        let one = OrderItemRequest {
            product_id: laptop,
            quantity: 1,
        };
        f.service
            .place_order(f.user.id, vec![one.clone()], address())
            .await
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        f.service
            .place_order(
                f.user.id,
                vec![OrderItemRequest {
                    product_id: phone,
                    quantity: 1,
                }],
                address(),
            )
            .await
            .unwrap();
        f.service
            .place_order(bob.id, vec![one], address())
            .await
            .unwrap();

        let history = f.service.list_orders(f.user.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|o| o.user_id == f.user.id));
        assert!(history[0].created_at > history[1].created_at);
        assert_eq!(history[0].products[0].name, "Smartphone X");
    }

    #[tokio::test]
    async fn history_keeps_snapshots_when_the_product_is_gone() {
        let f = fixture();
        let laptop = product_id(&f.store, "Laptop Pro");

        f.service
            .place_order(
                f.user.id,
                vec![OrderItemRequest {
                    product_id: laptop,
                    quantity: 1,
                }],
                address(),
            )
            .await
            .unwrap();

        // Catalog wiped after purchase; the snapshot must survive.
        f.store.products.lock().unwrap().clear();

        let history = f.service.list_orders(f.user.id).await.unwrap();
        let item = &history[0].products[0];
        assert!(item.product.is_none());
        assert_eq!(item.name, "Laptop Pro");
        assert_eq!(item.price, Decimal::new(129_999, 2));
    }

    #[tokio::test]
    async fn snapshot_price_ignores_later_catalog_changes() {
        let f = fixture();
        let laptop = product_id(&f.store, "Laptop Pro");

        f.service
            .place_order(
                f.user.id,
                vec![OrderItemRequest {
                    product_id: laptop,
                    quantity: 1,
                }],
                address(),
            )
            .await
            .unwrap();

        {
            let mut products = f.store.products.lock().unwrap();
            let product = products.iter_mut().find(|p| p.id == laptop).unwrap();
            product.price = Decimal::new(99_999, 2);
        }

        let history = f.service.list_orders(f.user.id).await.unwrap();
        assert_eq!(history[0].products[0].price, Decimal::new(129_999, 2));
        assert_eq!(history[0].total_amount, Decimal::new(129_999, 2));
    }
}
