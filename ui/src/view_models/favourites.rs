use api::Item;

use super::category::add_to_cart;
use super::Notice;
use super::Services;
use super::ViewModel;
use crate::navigation::Route;
use crate::state::AsyncState;
use crate::state::ScreenScope;

#[derive(Clone)]
pub struct FavouritesViewModel {
    services: Services,
    scope: ScreenScope,
    pub favourites: AsyncState<Vec<Item>>,
    pub notice: Notice,
}

impl FavouritesViewModel {
    pub fn new(services: Services) -> Self {
        Self {
            scope: services.scope("favourite"),
            services,
            favourites: AsyncState::new(),
            notice: Notice::default(),
        }
    }

    pub fn load(&self) -> bool {
        let services = self.services.clone();
        self.favourites
            .issue(&self.scope, "Error fetching favourites", async move {
                let session = services.session().await?;
                services.backend.store.favourites(&session).await
            })
    }

    pub fn add_to_cart(&self, item: &Item) -> bool {
        add_to_cart(&self.services, &self.scope, &self.notice, item, 1)
    }

    pub fn open_details(&self, item: &Item) {
        self.services.go(Route::Details { item: item.clone() });
    }
}

impl ViewModel for FavouritesViewModel {
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
    use api::GroceryStore;

    #[tokio::test]
    async fn lists_favourites_once_each() {
        let (services, backend, session) = memory_services().await;
        let mango = item("m1", "Fruits", 120);
        backend.add_to_favourites(&session, mango.clone()).await.unwrap();
        backend.add_to_favourites(&session, mango.clone()).await.unwrap();

        let vm = FavouritesViewModel::new(services);
        vm.load();
        let settled = vm.favourites.watch().wait_for(UiState::is_settled).await;
        assert_eq!(settled, UiState::Success(vec![mango]));
    }
}
