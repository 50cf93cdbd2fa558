use api::Category;

use super::Services;
use super::ViewModel;
use crate::navigation::Route;
use crate::state::AsyncState;
use crate::state::ScreenScope;

#[derive(Clone)]
pub struct HomeViewModel {
    services: Services,
    scope: ScreenScope,
    pub categories: AsyncState<Vec<Category>>,
}

impl HomeViewModel {
    pub fn new(services: Services) -> Self {
        Self {
            scope: services.scope("home"),
            services,
            categories: AsyncState::new(),
        }
    }

    /// Fetches the category list through the catalog cache.
    pub fn load(&self) -> bool {
        let services = self.services.clone();
        self.categories
            .issue(&self.scope, "Error fetching categories", async move {
                let session = services.session().await?;
                services.backend.catalog.categories(&session).await
            })
    }

    pub fn select_category(&self, category: &Category) {
        self.services.go(Route::Category {
            name: category.name.clone(),
        });
    }
}

impl ViewModel for HomeViewModel {
    fn scope(&self) -> &ScreenScope {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UiState;
    use crate::view_models::test_support::services;
    use crate::view_models::test_support::signed_in;
    use crate::view_models::test_support::FailingStore;
    use crate::view_models::test_support::GatedStore;
    use api::memory::InMemoryBackend;
    use api::AuthProvider;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn load_passes_through_loading() {
        let (backend, _) = signed_in().await;
        let store = GatedStore::new(backend.clone());
        let vm = HomeViewModel::new(services(store.clone(), &backend));
        assert!(vm.categories.get().is_idle());

        assert!(vm.load());
        assert!(vm.categories.get().is_loading());

        store.release(1);
        let settled = vm.categories.watch().wait_for(UiState::is_settled).await;
        let names: Vec<_> = settled.value().unwrap().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Vegetables", "Fruits", "Dairy", "Bakery", "Beverages"]);
    }

    #[tokio::test]
    async fn empty_catalog_is_success() {
        let backend = InMemoryBackend::new();
        backend.sign_up("asha@example.in", "secret1").await.unwrap();
        let vm = HomeViewModel::new(services(Arc::new(backend.clone()), &backend));

        vm.load();
        let settled = vm.categories.watch().wait_for(UiState::is_settled).await;
        assert_eq!(settled, UiState::Success(vec![]));
    }

    #[tokio::test]
    async fn failure_never_stays_loading() {
        let (backend, _) = signed_in().await;
        let vm = HomeViewModel::new(services(Arc::new(FailingStore), &backend));

        vm.load();
        let settled = vm.categories.watch().wait_for(UiState::is_settled).await;
        assert_eq!(settled.error(), Some("Error fetching categories"));
    }

    #[tokio::test]
    async fn signed_out_load_is_an_error() {
        let backend = InMemoryBackend::seeded();
        let vm = HomeViewModel::new(services(Arc::new(backend.clone()), &backend));
        assert!(!backend.is_signed_in());

        vm.load();
        let settled = vm.categories.watch().wait_for(UiState::is_settled).await;
        assert_eq!(
            settled.error(),
            Some("Error fetching categories: please sign in again")
        );
    }

    #[tokio::test]
    async fn second_load_while_loading_is_dropped() {
        let (backend, _) = signed_in().await;
        let store = GatedStore::new(backend.clone());
        let vm = HomeViewModel::new(services(store.clone(), &backend));

        assert!(vm.load());
        tokio::task::yield_now().await;
        assert!(!vm.load());
        store.release(2);
        vm.categories.watch().wait_for(UiState::is_settled).await;
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn closing_the_screen_discards_the_result() {
        let (backend, _) = signed_in().await;
        let store = GatedStore::new(backend.clone());
        let vm = HomeViewModel::new(services(store.clone(), &backend));

        vm.load();
        tokio::task::yield_now().await;
        vm.close();
        store.release(1);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(vm.categories.get().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_backend_times_out() {
        let (backend, _) = signed_in().await;
        let store = GatedStore::new(backend.clone());
        let vm = HomeViewModel::new(services(store, &backend));

        vm.load();
        let settled = vm.categories.watch().wait_for(UiState::is_settled).await;
        assert_eq!(settled.error(), Some("Error fetching categories (timed out)"));
    }

    #[tokio::test]
    async fn selecting_a_category_navigates() {
        let (backend, _) = signed_in().await;
        let services = services(Arc::new(backend.clone()), &backend);
        let nav = services.navigator.clone();
        let vm = HomeViewModel::new(services);

        vm.select_category(&Category {
            name: "Fruits".into(),
            image_url: None,
        });
        assert_eq!(
            nav.current(),
            Route::Category {
                name: "Fruits".into()
            }
        );
    }
}
