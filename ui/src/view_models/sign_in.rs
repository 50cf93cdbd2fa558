use api::federated::federated_request;
use api::federated::FederatedResolver;
use api::FederatedProvider;
use api::Session;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;

use super::ensure_profile;
use super::Services;
use super::ViewModel;
use crate::navigation::Route;
use crate::state::AsyncState;
use crate::state::Observable;
use crate::state::ObservableRef;
use crate::state::ScreenScope;
use crate::validation::validate_email;
use crate::validation::validate_password;
use crate::validation::FieldCheck;

#[derive(Debug, Clone, PartialEq)]
pub enum SignInEvent {
    EmailChanged(String),
    PasswordChanged(String),
    LoginButtonClicked,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    pub email_check: FieldCheck,
    pub password_check: FieldCheck,
}

impl SignInForm {
    pub fn is_valid(&self) -> bool {
        self.email_check.is_valid() && self.password_check.is_valid()
    }
}

#[derive(Clone)]
pub struct SignInViewModel {
    services: Services,
    scope: ScreenScope,
    form: Observable<SignInForm>,
    pub submission: AsyncState<Session>,
}

impl SignInViewModel {
    pub fn new(services: Services) -> Self {
        Self {
            scope: services.scope("signin"),
            services,
            form: Observable::new(SignInForm::default()),
            submission: AsyncState::new(),
        }
    }

    pub fn form(&self) -> ObservableRef<SignInForm> {
        self.form.read_only()
    }

    pub fn on_event(&self, event: SignInEvent) {
        match event {
            SignInEvent::EmailChanged(email) => self.form.update(|f| {
                f.email_check = FieldCheck::checked(validate_email(&email));
                f.email = email;
            }),
            SignInEvent::PasswordChanged(password) => self.form.update(|f| {
                f.password_check = FieldCheck::checked(validate_password(&password));
                f.password = password;
            }),
            SignInEvent::LoginButtonClicked => {
                self.login();
            }
        }
    }

    /// Validates the form and, when it passes, signs in.
    ///
    /// Returns whether a request was issued.
    pub fn login(&self) -> bool {
        let mut form = self.form.get();
        form.email_check = FieldCheck::checked(validate_email(&form.email));
        form.password_check = FieldCheck::checked(validate_password(&form.password));
        self.form.set(form.clone());
        if !form.is_valid() {
            return false;
        }

        let services = self.services.clone();
        let email = form.email.trim().to_string();
        self.submission.issue(&self.scope, "Sign in failed", async move {
            let session = services
                .backend
                .auth
                .sign_in_with_password(&email, &form.password)
                .await?;
            info!("signed in as {}", session.uid);
            complete_profile(&services, &session).await;
            services.go_clearing(Route::Home);
            Ok(session)
        })
    }

    /// Starts a federated sign-in and returns the handle the external flow
    /// completes, or `None` if a submission is already running.
    pub fn sign_in_with(&self, provider: FederatedProvider) -> Option<FederatedResolver> {
        let (resolver, request) = federated_request(provider);
        let services = self.services.clone();
        let issued = self.submission.issue(&self.scope, "Sign in failed", async move {
            let token = request.token().await?;
            let session = services
                .backend
                .auth
                .sign_in_with_id_token(provider, &token)
                .await?;
            info!("signed in with {provider} as {}", session.uid);
            complete_profile(&services, &session).await;
            services.go_clearing(Route::Home);
            Ok(session)
        });
        issued.then_some(resolver)
    }

    pub fn open_sign_up(&self) {
        self.services.go(Route::SignUp);
    }
}

/// An account can exist without a profile when registration stopped after
/// creating it. A missing profile never blocks signing in.
async fn complete_profile(services: &Services, session: &Session) {
    if let Err(e) = ensure_profile(services, session, "").await {
        warn!("signin: could not complete profile for {}: {e}", session.uid);
    }
}

impl ViewModel for SignInViewModel {
    fn scope(&self) -> &ScreenScope {
        &self.scope
    }
}
