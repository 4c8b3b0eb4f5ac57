//! Screen selection as a pure state machine.

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Welcome,
    SignIn,
    SignUp,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    GetStarted,
    ShowSignIn,
    ShowSignUp,
    AuthStarted,
    AuthSucceeded,
    AuthFailed,
    LoggedOut,
    /// A signed-in-only action was attempted without a session.
    RequireSignIn,
}

/// Current screen plus the busy flag raised while an auth call is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub view: View,
    pub busy: bool,
}

impl ViewState {
    pub fn initial(is_authenticated: bool) -> Self {
        ViewState {
            view: if is_authenticated {
                View::Dashboard
            } else {
                View::Welcome
            },
            busy: false,
        }
    }

    /// Whether an auth form on this screen may be submitted.
    pub fn accepts_auth(&self) -> bool {
        !self.busy && matches!(self.view, View::SignIn | View::SignUp)
    }
}

/// Applies `event` to `state`. Combinations not listed leave the state as is.
/// While busy only the settling events have an effect.
pub fn transition(state: ViewState, event: ViewEvent) -> ViewState {
    use View::*;
    use ViewEvent::*;

    if state.busy {
        return match event {
            AuthSucceeded => ViewState {
                view: Dashboard,
                busy: false,
            },
            AuthFailed => ViewState {
                busy: false,
                ..state
            },
            _ => state,
        };
    }

    let view = match (state.view, event) {
        (Welcome, GetStarted) => SignIn,
        (Welcome | SignIn | SignUp, ShowSignIn) => SignIn,
        (Welcome | SignIn | SignUp, ShowSignUp) => SignUp,
        (SignIn | SignUp, AuthStarted) => {
            return ViewState {
                view: state.view,
                busy: true,
            };
        }
        (Dashboard, LoggedOut) => Welcome,
        (_, RequireSignIn) => SignIn,
        (view, _) => view,
    };
    ViewState { view, busy: false }
}
