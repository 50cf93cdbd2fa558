use api::UserProfile;

use super::Services;
use super::ViewModel;
use crate::state::AsyncState;
use crate::state::ScreenScope;

#[derive(Clone)]
pub struct ProfileViewModel {
    services: Services,
    scope: ScreenScope,
    /// `None` inside `Success` means the account never stored a profile.
    pub profile: AsyncState<Option<UserProfile>>,
}

impl ProfileViewModel {
    pub fn new(services: Services) -> Self {
        Self {
            scope: services.scope("profile"),
            services,
            profile: AsyncState::new(),
        }
    }

    pub fn load(&self) -> bool {
        let services = self.services.clone();
        self.profile
            .issue(&self.scope, "Error fetching profile", async move {
                let session = services.session().await?;
                services.backend.store.profile(&session).await
            })
    }
}

impl ViewModel for ProfileViewModel {
    fn scope(&self) -> &ScreenScope {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UiState;
    use crate::view_models::test_support::memory_services;
    use api::GroceryStore;

    #[tokio::test]
    async fn loads_stored_profile() {
        let (services, backend, session) = memory_services().await;
        let vm = ProfileViewModel::new(services);

        vm.load();
        let settled = vm.profile.watch().wait_for(UiState::is_settled).await;
        assert_eq!(settled, UiState::Success(None));

        let profile = UserProfile {
            uid: session.uid.clone(),
            name: "Asha".into(),
            email: session.email.clone(),
        };
        backend.save_profile(&session, profile.clone()).await.unwrap();
        vm.load();
        let settled = vm.profile.watch().wait_for(UiState::is_settled).await;
        assert_eq!(settled, UiState::Success(Some(profile)));
    }
}
