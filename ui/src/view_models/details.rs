use api::Item;
use api::Price;

use super::category::add_to_cart;
use super::category::add_to_favourite;
use super::Notice;
use super::Services;
use super::ViewModel;
use crate::navigation::Route;
use crate::state::Observable;
use crate::state::ObservableRef;
use crate::state::ScreenScope;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 20;

/// Shows one item, already fetched by the screen that opened it.
#[derive(Clone)]
pub struct DetailsViewModel {
    services: Services,
    scope: ScreenScope,
    item: Item,
    quantity: Observable<u32>,
    pub notice: Notice,
}

impl DetailsViewModel {
    pub fn new(services: Services, item: Item) -> Self {
        Self {
            scope: services.scope("details"),
            services,
            item,
            quantity: Observable::new(MIN_QUANTITY),
            notice: Notice::default(),
        }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn quantity(&self) -> ObservableRef<u32> {
        self.quantity.read_only()
    }

    pub fn increment(&self) {
        self.quantity.update_if(|q| {
            let next = (*q + 1).min(MAX_QUANTITY);
            std::mem::replace(q, next) != next
        });
    }

    pub fn decrement(&self) {
        self.quantity.update_if(|q| {
            let next = q.saturating_sub(1).max(MIN_QUANTITY);
            std::mem::replace(q, next) != next
        });
    }

    pub fn total(&self) -> Price {
        self.item.price.times(self.quantity.get())
    }

    pub fn add_to_cart(&self) -> bool {
        add_to_cart(
            &self.services,
            &self.scope,
            &self.notice,
            &self.item,
            self.quantity.get(),
        )
    }

    pub fn add_to_favourite(&self) -> bool {
        add_to_favourite(&self.services, &self.scope, &self.notice, &self.item)
    }

    pub fn open_cart(&self) {
        self.services.go(Route::Cart);
    }
}

impl ViewModel for DetailsViewModel {
    fn scope(&self) -> &ScreenScope {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_models::test_support::item;
    use crate::view_models::test_support::memory_services;
    use api::GroceryStore;

    #[tokio::test]
    async fn quantity_stays_in_range() {
        let (services, _, _) = memory_services().await;
        let vm = DetailsViewModel::new(services, item("a1", "Fruits", 40));

        vm.decrement();
        assert_eq!(vm.quantity().get(), MIN_QUANTITY);
        for _ in 0..30 {
            vm.increment();
        }
        assert_eq!(vm.quantity().get(), MAX_QUANTITY);
        assert_eq!(vm.total(), Price::from_rupees(800));
    }

    #[tokio::test]
    async fn adds_chosen_quantity() {
        let (services, backend, session) = memory_services().await;
        let vm = DetailsViewModel::new(services, item("a1", "Fruits", 40));
        vm.increment();
        vm.increment();

        vm.add_to_cart();
        vm.notice.watch().wait_for(Option::is_some).await;
        let cart = backend.cart(&session).await.unwrap();
        assert_eq!(cart[0].quantity, 3);
        assert_eq!(cart[0].line_total(), Price::from_rupees(120));
    }
}
