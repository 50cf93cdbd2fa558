use api::CartLine;
use api::Price;

use super::Services;
use super::ViewModel;
use crate::navigation::Route;
use crate::state::AsyncState;
use crate::state::ScreenScope;

/// Sum of every line total; zero for an empty cart.
pub fn subtotal(lines: &[CartLine]) -> Price {
    lines.iter().map(CartLine::line_total).sum()
}

#[derive(Clone)]
pub struct CartViewModel {
    services: Services,
    scope: ScreenScope,
    pub cart: AsyncState<Vec<CartLine>>,
}

impl CartViewModel {
    pub fn new(services: Services) -> Self {
        Self {
            scope: services.scope("cart"),
            services,
            cart: AsyncState::new(),
        }
    }

    pub fn get_all_cart(&self) -> bool {
        let services = self.services.clone();
        self.cart
            .issue(&self.scope, "Error fetching cart items", async move {
                let session = services.session().await?;
                services.backend.store.cart(&session).await
            })
    }

    /// Checkout needs something in the cart.
    pub fn can_checkout(&self) -> bool {
        self.cart.get().value().is_some_and(|lines| !lines.is_empty())
    }

    pub fn checkout(&self) {
        if self.can_checkout() {
            self.services.go(Route::Billing);
        }
    }
}

impl ViewModel for CartViewModel {
    fn scope(&self) -> &ScreenScope {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;
    use crate::state::UiState;
    use crate::view_models::test_support::item;
    use crate::view_models::test_support::memory_services;
    use api::GroceryStore;

    #[tokio::test]
    async fn three_lines_come_back_in_order() {
        let (services, backend, session) = memory_services().await;
        let nav = services.navigator.clone();
        let lines: Vec<CartLine> = [("a", 10, 1), ("b", 25, 2), ("c", 4, 5)]
            .into_iter()
            .map(|(id, rupees, qty)| CartLine::for_item(&item(id, "Fruits", rupees), qty))
            .collect();
        for line in &lines {
            backend.add_to_cart(&session, line.clone()).await.unwrap();
        }

        let vm = CartViewModel::new(services);
        nav.navigate(Route::Cart).unwrap();
        vm.get_all_cart();
        let settled = vm.cart.watch().wait_for(UiState::is_settled).await;
        let fetched = settled.value().unwrap();
        assert_eq!(fetched.len(), 3);
        let ids: Vec<_> = fetched.iter().map(|l| l.item_id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(subtotal(fetched), Price::from_rupees(10 + 50 + 20));

        vm.checkout();
        assert_eq!(nav.current(), Route::Billing);
    }

    #[tokio::test]
    async fn empty_cart_cannot_check_out() {
        let (services, _, _) = memory_services().await;
        let nav = services.navigator.clone();
        let vm = CartViewModel::new(services);
        nav.navigate(Route::Cart).unwrap();

        vm.get_all_cart();
        let settled = vm.cart.watch().wait_for(UiState::is_settled).await;
        assert_eq!(settled, UiState::Success(vec![]));
        assert_eq!(subtotal(&[]), Price::zero());

        vm.checkout();
        assert_eq!(nav.current(), Route::Cart);
    }
}
