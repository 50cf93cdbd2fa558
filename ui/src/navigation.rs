//! Named routes, the transitions between them, and the back stack.

use std::sync::Arc;

use api::AuthProvider;
use api::Item;
use dioxus_logger::tracing::debug;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;
use thiserror::Error;

use crate::state::Observable;
use crate::state::ObservableRef;

/// A navigable destination, together with the arguments it needs.
#[derive(Clone, Debug, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(
    name(RouteKind),
    derive(Hash, strum::Display, strum::EnumString, strum::EnumIter, strum::AsRefStr),
    strum(serialize_all = "lowercase")
)]
pub enum Route {
    SignIn,
    SignUp,
    Home,
    Category { name: String },
    Details { item: Item },
    Favourite,
    Cart,
    Profile,
    Billing,
}

/// Routes reachable from the bottom navigation bar.
pub const BOTTOM_NAV: [RouteKind; 4] = [
    RouteKind::Home,
    RouteKind::Favourite,
    RouteKind::Cart,
    RouteKind::Profile,
];

impl RouteKind {
    /// The routes this one may navigate to.
    pub fn transitions(&self) -> &'static [RouteKind] {
        use RouteKind::*;
        match self {
            SignIn => &[SignUp, Home],
            SignUp => &[SignIn, Home],
            Home => &[Category, Favourite, Cart, Profile, SignIn],
            Category => &[Details, Home, Favourite, Cart, Profile, SignIn],
            Details => &[Home, Favourite, Cart, Profile, SignIn],
            Favourite => &[Details, Home, Cart, Profile, SignIn],
            Cart => &[Billing, Home, Favourite, Profile, SignIn],
            Profile => &[Home, Favourite, Cart, SignIn],
            Billing => &[Home, Favourite, Cart, Profile, SignIn],
        }
    }

    pub fn can_go_to(&self, to: RouteKind) -> bool {
        self.transitions().contains(&to)
    }

    /// Everything except the two authentication screens needs a session.
    pub fn requires_session(&self) -> bool {
        !matches!(self, RouteKind::SignIn | RouteKind::SignUp)
    }

    pub fn shows_bottom_nav(&self) -> bool {
        self.requires_session()
    }
}

impl Route {
    pub fn kind(&self) -> RouteKind {
        self.into()
    }

    /// Title shown in the top bar.
    pub fn title(&self) -> String {
        match self {
            Route::SignIn => "Sign in".into(),
            Route::SignUp => "Create account".into(),
            Route::Home => "DashDrop".into(),
            Route::Category { name } => name.clone(),
            Route::Details { item } => item.name.clone(),
            Route::Favourite => "Favourites".into(),
            Route::Cart => "Cart".into(),
            Route::Profile => "Profile".into(),
            Route::Billing => "Billing".into(),
        }
    }

    /// The route for a bottom-navigation entry.
    pub fn for_nav(kind: RouteKind) -> Option<Route> {
        match kind {
            RouteKind::Home => Some(Route::Home),
            RouteKind::Favourite => Some(Route::Favourite),
            RouteKind::Cart => Some(Route::Cart),
            RouteKind::Profile => Some(Route::Profile),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no transition declared from {from} to {to}")]
    Undeclared { from: RouteKind, to: RouteKind },

    #[error("{0} requires a signed-in user")]
    SessionRequired(RouteKind),
}

/// Result of a back press.
#[derive(Debug, Clone, PartialEq, strum::EnumIs)]
pub enum BackOutcome {
    /// The stack was popped and this route is now showing.
    Popped(Route),
    /// Nothing left to go back to; the app should close.
    Exit,
}

/// Owns the back stack. The last entry is the route on screen.
#[derive(Clone)]
pub struct Navigator {
    stack: Observable<Vec<Route>>,
    auth: Arc<dyn AuthProvider>,
}

impl Navigator {
    /// Starts on `home` when a session is active, otherwise on `signin`.
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        let start = if auth.is_signed_in() {
            Route::Home
        } else {
            Route::SignIn
        };
        info!("starting navigation at {}", start.kind());
        Self {
            stack: Observable::new(vec![start]),
            auth,
        }
    }

    pub fn current(&self) -> Route {
        self.stack
            .get()
            .last()
            .cloned()
            .unwrap_or(Route::SignIn)
    }

    pub fn back_stack(&self) -> Vec<Route> {
        self.stack.get()
    }

    pub fn watch(&self) -> ObservableRef<Vec<Route>> {
        self.stack.read_only()
    }

    /// Pushes `to` onto the stack.
    pub fn navigate(&self, to: Route) -> Result<(), NavigationError> {
        self.check(&to)?;
        debug!("navigate {} -> {}", self.current().kind(), to.kind());
        self.stack.update(|stack| stack.push(to));
        Ok(())
    }

    /// Replaces the whole stack with `to`, so back cannot return to anything
    /// shown before.
    pub fn navigate_clearing(&self, to: Route) -> Result<(), NavigationError> {
        self.check(&to)?;
        debug!("navigate {} -> {} (clearing)", self.current().kind(), to.kind());
        self.stack.set(vec![to]);
        Ok(())
    }

    pub fn pop_back(&self) -> BackOutcome {
        let mut outcome = BackOutcome::Exit;
        self.stack.update_if(|stack| {
            if stack.len() < 2 {
                return false;
            }
            stack.pop();
            if let Some(top) = stack.last() {
                outcome = BackOutcome::Popped(top.clone());
            }
            true
        });
        if let BackOutcome::Popped(route) = &outcome {
            if route.kind().requires_session() && !self.auth.is_signed_in() {
                warn!("session gone, leaving {} for signin", route.kind());
                self.stack.set(vec![Route::SignIn]);
                return BackOutcome::Popped(Route::SignIn);
            }
        }
        outcome
    }

    fn check(&self, to: &Route) -> Result<(), NavigationError> {
        let from = self.current().kind();
        let to_kind = to.kind();
        if !from.can_go_to(to_kind) {
            warn!("refusing undeclared transition {from} -> {to_kind}");
            return Err(NavigationError::Undeclared { from, to: to_kind });
        }
        if to_kind.requires_session() && !self.auth.is_signed_in() {
            warn!("{to_kind} needs a session, redirecting to signin");
            self.stack.set(vec![Route::SignIn]);
            return Err(NavigationError::SessionRequired(to_kind));
        }
        Ok(())
    }
}
