use api::CartLine;
use api::Item;

use super::spawn_write;
use super::Notice;
use super::Services;
use super::ViewModel;
use crate::navigation::Route;
use crate::state::AsyncState;
use crate::state::ScreenScope;

#[derive(Clone)]
pub struct CategoryViewModel {
    services: Services,
    scope: ScreenScope,
    name: String,
    pub items: AsyncState<Vec<Item>>,
    pub notice: Notice,
}

impl CategoryViewModel {
    pub fn new(services: Services, name: String) -> Self {
        Self {
            scope: services.scope("category"),
            services,
            name,
            items: AsyncState::new(),
            notice: Notice::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn load(&self) -> bool {
        let services = self.services.clone();
        let name = self.name.clone();
        self.items
            .issue(&self.scope, "Error fetching items", async move {
                let session = services.session().await?;
                services.backend.catalog.items_in(&session, &name).await
            })
    }

    /// Puts one unit of `item` in the cart.
    pub fn add_to_cart(&self, item: &Item) -> bool {
        add_to_cart(&self.services, &self.scope, &self.notice, item, 1)
    }

    pub fn add_to_favourite(&self, item: &Item) -> bool {
        add_to_favourite(&self.services, &self.scope, &self.notice, item)
    }

    pub fn open_details(&self, item: &Item) {
        self.services.go(Route::Details { item: item.clone() });
    }
}

impl ViewModel for CategoryViewModel {
    fn scope(&self) -> &ScreenScope {
        &self.scope
    }
}

pub(crate) fn add_to_cart(
    services: &Services,
    scope: &ScreenScope,
    notice: &Notice,
    item: &Item,
    quantity: u32,
) -> bool {
    let services = services.clone();
    let line = CartLine::for_item(item, quantity);
    spawn_write(
        scope,
        notice,
        format!("Added {} to cart", item.name),
        "Could not add to cart",
        async move {
            let session = services.session().await?;
            services.backend.store.add_to_cart(&session, line).await
        },
    )
}

pub(crate) fn add_to_favourite(
    services: &Services,
    scope: &ScreenScope,
    notice: &Notice,
    item: &Item,
) -> bool {
    let services = services.clone();
    let item = item.clone();
    spawn_write(
        scope,
        notice,
        format!("Added {} to favourites", item.name),
        "Could not add to favourites",
        async move {
            let session = services.session().await?;
            services.backend.store.add_to_favourites(&session, item).await
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UiState;
    use crate::view_models::test_support::memory_services;
    use crate::view_models::test_support::services;
    use crate::view_models::test_support::signed_in;
    use crate::view_models::test_support::FailingStore;
    use api::GroceryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn lists_items_of_the_category() {
        let (services, _, _) = memory_services().await;
        let vm = CategoryViewModel::new(services, "Fruits".into());

        vm.load();
        let settled = vm.items.watch().wait_for(UiState::is_settled).await;
        let items = settled.value().unwrap();
        assert!(!items.is_empty());
        assert!(items.iter().all(|i| i.category == "Fruits"));
    }

    #[tokio::test]
    async fn unknown_category_is_empty() {
        let (services, _, _) = memory_services().await;
        let vm = CategoryViewModel::new(services, "Hardware".into());

        vm.load();
        let settled = vm.items.watch().wait_for(UiState::is_settled).await;
        assert_eq!(settled, UiState::Success(vec![]));
    }

    #[tokio::test]
    async fn add_to_cart_shows_up_on_next_read() {
        let (services, backend, session) = memory_services().await;
        let vm = CategoryViewModel::new(services, "Fruits".into());
        vm.load();
        let settled = vm.items.watch().wait_for(UiState::is_settled).await;
        let apple = settled.value().unwrap()[0].clone();

        assert!(vm.add_to_cart(&apple));
        let notice = vm.notice.watch().wait_for(Option::is_some).await;
        assert_eq!(notice, Some(format!("Added {} to cart", apple.name)));

        let cart = backend.cart(&session).await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].item_id, apple.id);
        assert_eq!(cart[0].quantity, 1);
    }

    #[tokio::test]
    async fn failed_write_is_reported_as_notice() {
        let (backend, _) = signed_in().await;
        let vm = CategoryViewModel::new(services(Arc::new(FailingStore), &backend), "Fruits".into());

        vm.add_to_favourite(&crate::view_models::test_support::item("x", "Fruits", 10));
        let notice = vm.notice.watch().wait_for(Option::is_some).await;
        assert_eq!(notice.as_deref(), Some("Could not add to favourites"));
    }
}
