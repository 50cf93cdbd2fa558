use api::AddressId;
use api::CartLine;
use api::DeliveryAddress;
use api::Order;
use api::Price;
use dioxus_logger::tracing::info;

use super::cart::subtotal;
use super::Services;
use super::ViewModel;
use crate::navigation::Route;
use crate::state::AsyncState;
use crate::state::Observable;
use crate::state::ObservableRef;
use crate::state::ScreenScope;

/// Checkout: pick a delivery address and place the order for the cart.
#[derive(Clone)]
pub struct BillingViewModel {
    services: Services,
    scope: ScreenScope,
    pub addresses: AsyncState<Vec<DeliveryAddress>>,
    pub cart: AsyncState<Vec<CartLine>>,
    selected: Observable<Option<AddressId>>,
    /// The last order sent, reused by a retry for the same cart.
    pending: Observable<Option<Order>>,
    pub order: AsyncState<String>,
}

impl BillingViewModel {
    pub fn new(services: Services) -> Self {
        Self {
            scope: services.scope("billing"),
            services,
            addresses: AsyncState::new(),
            cart: AsyncState::new(),
            selected: Observable::new(None),
            pending: Observable::new(None),
            order: AsyncState::new(),
        }
    }

    /// Fetches addresses and the cart summary side by side.
    pub fn load(&self) {
        let services = self.services.clone();
        self.addresses
            .issue(&self.scope, "Error fetching addresses", async move {
                let session = services.session().await?;
                services.backend.store.addresses(&session).await
            });
        let services = self.services.clone();
        self.cart
            .issue(&self.scope, "Error fetching cart items", async move {
                let session = services.session().await?;
                services.backend.store.cart(&session).await
            });
    }

    pub fn selected(&self) -> ObservableRef<Option<AddressId>> {
        self.selected.read_only()
    }

    /// Selects `address_id`; selecting it again clears the choice.
    pub fn select_address(&self, address_id: AddressId) {
        self.selected.update(|s| {
            *s = match *s {
                Some(current) if current == address_id => None,
                _ => Some(address_id),
            }
        });
    }

    pub fn total(&self) -> Price {
        self.cart
            .get()
            .value()
            .map(|lines| subtotal(lines))
            .unwrap_or_default()
    }

    /// A known address is selected, the cart has lines, and no order is
    /// being placed.
    pub fn can_place_order(&self) -> bool {
        let address_known = match (self.selected.get(), self.addresses.get().value()) {
            (Some(id), Some(addresses)) => addresses.iter().any(|a| a.address_id == id),
            _ => false,
        };
        let has_lines = self.cart.get().value().is_some_and(|l| !l.is_empty());
        address_known && has_lines && !self.order.get().is_loading()
    }

    pub fn place_order(&self) -> bool {
        if !self.can_place_order() {
            return false;
        }
        let (Some(address_id), Some(lines)) = (self.selected.get(), self.cart.get().value().cloned())
        else {
            return false;
        };

        // a failed attempt may still have been stored; resend it unchanged
        let order = match self.pending.get() {
            Some(sent) if sent.address_id == address_id && sent.lines == lines => sent,
            _ => Order::new(address_id, lines),
        };
        self.pending.set(Some(order.clone()));

        let services = self.services.clone();
        self.order
            .issue(&self.scope, "Could not place the order", async move {
                let session = services.session().await?;
                let total = order.total;
                let id = services.backend.store.place_order(&session, order).await?;
                info!("placed order {id} for {}", total.to_string_with_symbol());
                services.go_clearing(Route::Home);
                Ok(id)
            })
    }
}

impl ViewModel for BillingViewModel {
    fn scope(&self) -> &ScreenScope {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UiState;
    use crate::view_models::test_support::item;
    use crate::view_models::test_support::memory_services;
    use crate::view_models::test_support::services;
    use crate::view_models::test_support::signed_in;
    use crate::view_models::test_support::GatedStore;
    use api::GroceryStore;

    #[tokio::test]
    async fn order_needs_address_and_lines() {
        let (services, backend, session) = memory_services().await;
        let vm = BillingViewModel::new(services);
        vm.load();
        vm.addresses.watch().wait_for(UiState::is_settled).await;
        vm.cart.watch().wait_for(UiState::is_settled).await;

        // fresh account: default address, empty cart
        let address_id = vm.addresses.get().value().unwrap()[0].address_id;
        vm.select_address(address_id);
        assert!(!vm.can_place_order());
        assert!(!vm.place_order());

        backend
            .add_to_cart(&session, CartLine::for_item(&item("a", "Fruits", 30), 2))
            .await
            .unwrap();
        vm.load();
        vm.addresses.watch().wait_for(UiState::is_settled).await;
        vm.cart.watch().wait_for(UiState::is_settled).await;
        assert!(vm.can_place_order());

        vm.select_address(address_id);
        assert_eq!(vm.selected().get(), None);
        assert!(!vm.can_place_order());
    }

    #[tokio::test]
    async fn placing_an_order_empties_cart_and_returns_home() {
        let (services, backend, session) = memory_services().await;
        let nav = services.navigator.clone();
        backend
            .add_to_cart(&session, CartLine::for_item(&item("a", "Fruits", 30), 2))
            .await
            .unwrap();
        nav.navigate(Route::Cart).unwrap();
        nav.navigate(Route::Billing).unwrap();

        let vm = BillingViewModel::new(services);
        vm.load();
        vm.addresses.watch().wait_for(UiState::is_settled).await;
        vm.cart.watch().wait_for(UiState::is_settled).await;
        assert_eq!(vm.total(), Price::from_rupees(60));

        vm.select_address(1);
        assert!(vm.place_order());
        let settled = vm.order.watch().wait_for(UiState::is_settled).await;
        assert!(settled.is_success());

        let orders = backend.orders(&session.uid);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].total, Price::from_rupees(60));
        assert_eq!(orders[0].address_id, 1);
        assert!(backend.cart(&session).await.unwrap().is_empty());
        assert_eq!(nav.back_stack(), vec![Route::Home]);
    }

    #[tokio::test]
    async fn retry_after_lost_reply_stores_one_order() {
        let (backend, session) = signed_in().await;
        let store = GatedStore::new(backend.clone());
        store.release(100);
        backend
            .add_to_cart(&session, CartLine::for_item(&item("a", "Fruits", 30), 2))
            .await
            .unwrap();

        let vm = BillingViewModel::new(services(store.clone(), &backend));
        vm.load();
        vm.addresses.watch().wait_for(UiState::is_settled).await;
        vm.cart.watch().wait_for(UiState::is_settled).await;
        vm.select_address(1);

        store.lose_next_order_reply();
        assert!(vm.place_order());
        let first = vm.order.watch().wait_for(UiState::is_settled).await;
        assert_eq!(first.error(), Some("Could not place the order"));
        assert!(vm.can_place_order());

        assert!(vm.place_order());
        let second = vm.order.watch().wait_for(UiState::is_settled).await;
        assert!(second.is_success());
        let orders = backend.orders(&session.uid);
        assert_eq!(orders.len(), 1);
        assert_eq!(second.value(), Some(&orders[0].id));
    }
}
