use api::federated::federated_request;
use api::federated::FederatedResolver;
use api::FederatedProvider;
use api::Session;
use api::UserProfile;
use dioxus_logger::tracing::debug;
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
use crate::validation::validate_name;
use crate::validation::validate_password;
use crate::validation::FieldCheck;

#[derive(Debug, Clone, PartialEq)]
pub enum SignUpEvent {
    NameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    RegisterButtonClicked,
}

/// The registration form as typed so far, with per-field verdicts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegistrationUiState {
    pub name: String,
    pub email: String,
    pub password: String,
    pub name_check: FieldCheck,
    pub email_check: FieldCheck,
    pub password_check: FieldCheck,
}

impl RegistrationUiState {
    pub fn all_validations_passed(&self) -> bool {
        self.name_check.is_valid() && self.email_check.is_valid() && self.password_check.is_valid()
    }

    fn validate_all(&mut self) {
        self.name_check = FieldCheck::checked(validate_name(&self.name));
        self.email_check = FieldCheck::checked(validate_email(&self.email));
        self.password_check = FieldCheck::checked(validate_password(&self.password));
    }
}

#[derive(Clone)]
pub struct SignUpViewModel {
    services: Services,
    scope: ScreenScope,
    form: Observable<RegistrationUiState>,
    pub submission: AsyncState<Session>,
}

impl SignUpViewModel {
    pub fn new(services: Services) -> Self {
        Self {
            scope: services.scope("signup"),
            services,
            form: Observable::new(RegistrationUiState::default()),
            submission: AsyncState::new(),
        }
    }

    pub fn form(&self) -> ObservableRef<RegistrationUiState> {
        self.form.read_only()
    }

    /// The register button is enabled only for a valid form with nothing in
    /// flight.
    pub fn can_submit(&self) -> bool {
        self.form.get().all_validations_passed() && !self.submission.get().is_loading()
    }

    pub fn on_event(&self, event: SignUpEvent) {
        match event {
            SignUpEvent::NameChanged(name) => self.form.update(|f| {
                f.name_check = FieldCheck::checked(validate_name(&name));
                f.name = name;
            }),
            SignUpEvent::EmailChanged(email) => self.form.update(|f| {
                f.email_check = FieldCheck::checked(validate_email(&email));
                f.email = email;
            }),
            SignUpEvent::PasswordChanged(password) => self.form.update(|f| {
                f.password_check = FieldCheck::checked(validate_password(&password));
                f.password = password;
            }),
            SignUpEvent::RegisterButtonClicked => {
                self.register();
            }
        }
    }

    /// Creates the account, stores its profile, and moves on to `home`.
    ///
    /// An invalid form only updates the field flags.
    pub fn register(&self) -> bool {
        let mut form = self.form.get();
        form.validate_all();
        self.form.set(form.clone());
        if !form.all_validations_passed() {
            debug!("signup: form invalid, not submitting");
            return false;
        }

        let services = self.services.clone();
        self.submission.issue(&self.scope, "Registration failed", async move {
            let email = form.email.trim();
            let session = services.backend.auth.sign_up(email, &form.password).await?;
            let profile = UserProfile {
                uid: session.uid.clone(),
                name: form.name.trim().to_string(),
                email: email.to_string(),
            };
            if let Err(e) = services.backend.store.save_profile(&session, profile).await {
                // no half-registered session; signing in later adds the profile
                if let Err(sign_out) = services.backend.auth.sign_out().await {
                    warn!("signup: could not sign out after failed profile save: {sign_out}");
                }
                return Err(e);
            }
            info!("registered {}", session.uid);
            services.go_clearing(Route::Home);
            Ok(session)
        })
    }

    /// Signs up through `provider`, keeping any profile the account already
    /// has.
    pub fn sign_up_with(&self, provider: FederatedProvider) -> Option<FederatedResolver> {
        let (resolver, request) = federated_request(provider);
        let services = self.services.clone();
        let typed_name = self.form.get().name.trim().to_string();
        let issued = self.submission.issue(&self.scope, "Registration failed", async move {
            let token = request.token().await?;
            let session = services
                .backend
                .auth
                .sign_in_with_id_token(provider, &token)
                .await?;
            ensure_profile(&services, &session, &typed_name).await?;
            services.go_clearing(Route::Home);
            Ok(session)
        });
        issued.then_some(resolver)
    }

    pub fn open_sign_in(&self) {
        self.services.go(Route::SignIn);
    }
}

impl ViewModel for SignUpViewModel {
    fn scope(&self) -> &ScreenScope {
        &self.scope
    }
}
