//! Drives the view state machine and turns store and directory results into
//! notifications. Errors never escape this layer.

use crate::core::bookmarks::{BookmarkStore, SaveOutcome, SavedFund};
use crate::core::error::{AuthError, ValidationError};
use crate::core::fund::{FundDetail, FundDirectory, FundSummary};
use crate::core::nav::{NavChange, NavHistoryRow, nav_change, nav_history};
use crate::core::session::{OAuthProvider, Session, SessionStore, User};
use crate::core::validation::{LoginForm, SignupForm};
use crate::core::view::{View, ViewEvent, ViewState, transition};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

/// A short message for the user, shaped like a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    fn new(kind: NotificationKind, title: &str, description: impl Into<String>) -> Self {
        Notification {
            kind,
            title: title.to_string(),
            description: description.into(),
        }
    }

    pub fn success(title: &str, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, description)
    }

    pub fn info(title: &str, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title, description)
    }

    pub fn error(title: &str, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, description)
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

impl From<ValidationError> for Notification {
    fn from(e: ValidationError) -> Self {
        Notification::error(e.title(), e.to_string())
    }
}

/// Everything the fund detail screen shows.
#[derive(Debug, Clone)]
pub struct FundView {
    pub scheme_code: String,
    pub detail: FundDetail,
    pub change: Option<NavChange>,
    pub history: Vec<NavHistoryRow>,
    pub is_saved: bool,
}

pub struct Controller {
    session: Arc<dyn SessionStore>,
    directory: Arc<dyn FundDirectory>,
    bookmarks: BookmarkStore,
    state: ViewState,
}

impl Controller {
    /// Starts on the dashboard when a session already exists.
    pub fn new(
        session: Arc<dyn SessionStore>,
        directory: Arc<dyn FundDirectory>,
        bookmarks: BookmarkStore,
    ) -> Self {
        let state = ViewState::initial(session.is_authenticated());
        debug!("Initial view: {:?}", state.view);
        Controller {
            session,
            directory,
            bookmarks,
            state,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn view(&self) -> View {
        self.state.view
    }

    pub fn directory(&self) -> &dyn FundDirectory {
        self.directory.as_ref()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn dispatch(&mut self, event: ViewEvent) -> ViewState {
        let next = transition(self.state, event);
        if next != self.state {
            debug!("{:?} --{:?}--> {:?}", self.state, event, next);
        }
        self.state = next;
        next
    }

    /// Checks that an auth form for `allowed` is open and idle without
    /// touching the state, so callers can bail before collecting input.
    pub fn auth_form_ready(&self, allowed: &[View]) -> Result<(), Notification> {
        if self.state.busy {
            return Err(Notification::info(
                "Please Wait",
                "A sign-in request is already in progress",
            ));
        }
        if self.state.view == View::Dashboard {
            return Err(Notification::info(
                "Already Signed In",
                "Log out before signing in with another account",
            ));
        }
        if !self.state.accepts_auth() || !allowed.contains(&self.state.view) {
            return Err(Notification::info(
                "Form Not Open",
                "Open the matching sign-in or sign-up form first",
            ));
        }
        Ok(())
    }

    /// Raises the busy flag if an auth form for `allowed` is open and idle.
    fn begin_auth(&mut self, allowed: &[View]) -> Result<(), Notification> {
        self.auth_form_ready(allowed)?;
        self.dispatch(ViewEvent::AuthStarted);
        Ok(())
    }

    fn settle_auth(
        &mut self,
        result: Result<Session, AuthError>,
        success: Notification,
        failure: impl FnOnce(&AuthError) -> Notification,
    ) -> Notification {
        match result {
            Ok(session) => {
                debug!(user_id = %session.user.id, "Authentication succeeded");
                self.dispatch(ViewEvent::AuthSucceeded);
                success
            }
            Err(e) => {
                warn!("Authentication failed: {e:#}");
                self.dispatch(ViewEvent::AuthFailed);
                failure(&e)
            }
        }
    }

    pub async fn login(&mut self, form: &LoginForm) -> Notification {
        if let Err(e) = form.validate() {
            return e.into();
        }
        if let Err(n) = self.begin_auth(&[View::SignIn]) {
            return n;
        }

        let result = self.session.login(&form.email, &form.password).await;
        self.settle_auth(
            result,
            Notification::success(
                "Welcome Back!",
                "You have successfully logged in to FundWise",
            ),
            |e| match e {
                AuthError::InvalidCredentials => {
                    Notification::error("Login Failed", "Invalid email or password")
                }
                AuthError::Storage(_) => Notification::error(
                    "Login Failed",
                    "Unable to save your session. Please try again.",
                ),
            },
        )
    }

    pub async fn signup(&mut self, form: &SignupForm) -> Notification {
        if let Err(e) = form.validate() {
            return e.into();
        }
        if let Err(n) = self.begin_auth(&[View::SignUp]) {
            return n;
        }

        let result = self
            .session
            .signup(&form.email, &form.password, &form.name)
            .await;
        self.settle_auth(
            result,
            Notification::success(
                "Account Created!",
                "Welcome to FundWise! Your account has been created successfully",
            ),
            |_| Notification::error("Signup Failed", "Unable to create account. Please try again."),
        )
    }

    pub async fn oauth(&mut self, provider: OAuthProvider) -> Notification {
        if let Err(n) = self.begin_auth(&[View::SignIn, View::SignUp]) {
            return n;
        }

        let result = self.session.oauth(provider).await;
        self.settle_auth(
            result,
            Notification::success(
                "Welcome to FundWise!",
                format!("You have successfully signed in with {provider}"),
            ),
            |_| {
                Notification::error(
                    "Authentication Failed",
                    format!("Unable to sign in with {provider}. Please try again."),
                )
            },
        )
    }

    pub fn logout(&mut self) -> Notification {
        match self.session.logout() {
            Ok(()) => {
                self.dispatch(ViewEvent::LoggedOut);
                Notification::success("Logged Out", "You have been successfully logged out")
            }
            Err(e) => {
                warn!("Logout failed: {e:#}");
                Notification::error("Logout Failed", format!("{e:#}"))
            }
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<FundSummary>, Notification> {
        self.directory.search_funds(query).await.map_err(|e| {
            warn!("Search failed: {:?}", e);
            Notification::error("Search Failed", e.to_string())
        })
    }

    pub async fn open_fund(&self, scheme_code: &str) -> Result<FundView, Notification> {
        let detail = self
            .directory
            .get_fund_details(scheme_code)
            .await
            .map_err(|e| {
                warn!("Fund details failed: {:?}", e);
                Notification::error("Error Loading Fund", e.to_string())
            })?;

        let is_saved = self.is_authenticated()
            && self.bookmarks.is_saved(scheme_code).unwrap_or_else(|e| {
                warn!("Failed to check saved state: {e:#}");
                false
            });

        Ok(FundView {
            scheme_code: scheme_code.to_string(),
            change: nav_change(&detail.data),
            history: nav_history(&detail.data),
            detail,
            is_saved,
        })
    }

    /// Redirects to sign-in when there is no session.
    fn require_session(&mut self, description: &str) -> Result<(), Notification> {
        if self.is_authenticated() {
            return Ok(());
        }
        self.dispatch(ViewEvent::RequireSignIn);
        Err(Notification::error("Authentication Required", description))
    }

    pub fn save_fund(&mut self, scheme_code: &str, detail: &FundDetail) -> Notification {
        if let Err(n) = self.require_session("Please sign in to save mutual funds") {
            return n;
        }

        match self.bookmarks.save(SavedFund::snapshot(scheme_code, detail)) {
            Ok(SaveOutcome::Saved) => {
                Notification::success("Fund Saved!", "Added to your saved mutual funds")
            }
            Ok(SaveOutcome::AlreadySaved) => {
                Notification::info("Already Saved", "This fund is already in your saved list")
            }
            Err(e) => {
                warn!("Save failed: {e:#}");
                Notification::error("Save Failed", format!("{e:#}"))
            }
        }
    }

    /// Saves a fund by code, fetching its details for the NAV snapshot only
    /// once a session is known to exist.
    pub async fn save_fund_by_code(&mut self, scheme_code: &str) -> Notification {
        if let Err(n) = self.require_session("Please sign in to save mutual funds") {
            return n;
        }
        match self.open_fund(scheme_code).await {
            Ok(view) => self.save_fund(scheme_code, &view.detail),
            Err(n) => n,
        }
    }

    pub fn remove_fund(&mut self, scheme_code: &str) -> Notification {
        if let Err(n) = self.require_session("Please sign in to manage saved funds") {
            return n;
        }

        match self.bookmarks.remove(scheme_code) {
            Ok(true) => Notification::success("Fund Removed", "Removed from your saved mutual funds"),
            Ok(false) => Notification::info("Not Saved", "This fund is not in your saved list"),
            Err(e) => {
                warn!("Remove failed: {e:#}");
                Notification::error("Remove Failed", format!("{e:#}"))
            }
        }
    }

    pub fn saved_funds(&mut self) -> Result<Vec<SavedFund>, Notification> {
        self.require_session("Please sign in to view your saved funds")?;
        self.bookmarks.list().map_err(|e| {
            warn!("Listing saved funds failed: {e:#}");
            Notification::error("Failed to Load Saved Funds", format!("{e:#}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::core::error::FetchError;
    use crate::core::fund::{FundMeta, NavRecord};
    use crate::providers::mock_auth::{DEMO_EMAIL, DEMO_PASSWORD, MockAuthProvider};
    use crate::store::memory::MemoryStorage;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticDirectory {
        fail: bool,
    }

    #[async_trait]
    impl FundDirectory for StaticDirectory {
        async fn search_funds(&self, query: &str) -> Result<Vec<FundSummary>, FetchError> {
            if self.fail {
                return Err(FetchError::Search(anyhow!("connection refused")));
            }
            Ok(vec![FundSummary {
                scheme_code: "119609".to_string(),
                scheme_name: format!("Match for {query}"),
            }])
        }

        async fn get_fund_details(&self, scheme_code: &str) -> Result<FundDetail, FetchError> {
            if self.fail {
                return Err(FetchError::Details {
                    scheme_code: scheme_code.to_string(),
                    source: anyhow!("connection refused"),
                });
            }
            Ok(detail(scheme_code))
        }
    }

    /// Session store that counts calls and always rejects.
    #[derive(Default)]
    struct CountingSessionStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SessionStore for CountingSessionStore {
        async fn login(&self, _: &str, _: &str) -> Result<Session, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AuthError::InvalidCredentials)
        }
        async fn signup(&self, _: &str, _: &str, _: &str) -> Result<Session, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AuthError::Storage(anyhow!("disk full")))
        }
        async fn oauth(&self, _: OAuthProvider) -> Result<Session, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AuthError::Storage(anyhow!("disk full")))
        }
        fn logout(&self) -> anyhow::Result<()> {
            Ok(())
        }
        fn current_user(&self) -> Option<User> {
            None
        }
        fn token(&self) -> Option<String> {
            None
        }
    }

    fn detail(scheme_code: &str) -> FundDetail {
        FundDetail {
            meta: FundMeta {
                scheme_code: Some(scheme_code.to_string()),
                scheme_name: Some("SBI Equity Hybrid Fund".to_string()),
                fund_house: Some("SBI Mutual Fund".to_string()),
                scheme_category: Some("Hybrid Scheme".to_string()),
                ..FundMeta::default()
            },
            data: vec![
                NavRecord {
                    date: "02-01-2024".to_string(),
                    nav: "10.50".to_string(),
                },
                NavRecord {
                    date: "01-01-2024".to_string(),
                    nav: "10.00".to_string(),
                },
            ],
        }
    }

    fn controller_with(fail: bool) -> Controller {
        let storage = Arc::new(MemoryStorage::new());
        Controller::new(
            Arc::new(MockAuthProvider::new(storage.clone(), AuthConfig::immediate())),
            Arc::new(StaticDirectory { fail }),
            BookmarkStore::new(storage),
        )
    }

    fn demo_login() -> LoginForm {
        LoginForm {
            email: DEMO_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
        }
    }

    async fn signed_in() -> Controller {
        let mut controller = controller_with(false);
        controller.dispatch(ViewEvent::GetStarted);
        let n = controller.login(&demo_login()).await;
        assert_eq!(n.title, "Welcome Back!");
        controller
    }

    #[tokio::test]
    async fn test_starts_on_welcome_then_dashboard_after_restart() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Arc::new(MockAuthProvider::new(storage.clone(), AuthConfig::immediate()));
        let directory = Arc::new(StaticDirectory { fail: false });

        let mut controller = Controller::new(
            session.clone(),
            directory.clone(),
            BookmarkStore::new(storage.clone()),
        );
        assert_eq!(controller.view(), View::Welcome);

        controller.dispatch(ViewEvent::GetStarted);
        controller.login(&demo_login()).await;
        assert_eq!(controller.view(), View::Dashboard);

        let restarted = Controller::new(session, directory, BookmarkStore::new(storage));
        assert_eq!(restarted.view(), View::Dashboard);
        assert_eq!(restarted.current_user().unwrap().name, "Demo User");
    }

    #[tokio::test]
    async fn test_failed_login_stays_on_sign_in() {
        let mut controller = controller_with(false);
        controller.dispatch(ViewEvent::GetStarted);

        let n = controller
            .login(&LoginForm {
                email: DEMO_EMAIL.to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert!(n.is_error());
        assert_eq!(n.title, "Login Failed");
        assert_eq!(
            controller.state(),
            ViewState {
                view: View::SignIn,
                busy: false
            }
        );
        assert!(!controller.is_authenticated());
    }

    #[tokio::test]
    async fn test_validation_never_reaches_session_store() {
        let session = Arc::new(CountingSessionStore::default());
        let mut controller = Controller::new(
            session.clone(),
            Arc::new(StaticDirectory { fail: false }),
            BookmarkStore::new(Arc::new(MemoryStorage::new())),
        );
        controller.dispatch(ViewEvent::ShowSignUp);

        let n = controller
            .signup(&SignupForm {
                name: "A".to_string(),
                email: "a@b.c".to_string(),
                password: "12345678".to_string(),
                confirm_password: "12345679".to_string(),
                agreed_to_terms: true,
            })
            .await;
        assert_eq!(n.title, "Password Mismatch");

        controller.dispatch(ViewEvent::ShowSignIn);
        let n = controller.login(&LoginForm::default()).await;
        assert_eq!(n.title, "Missing Information");
        assert_eq!(session.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_auth_errors_become_notifications() {
        let session = Arc::new(CountingSessionStore::default());
        let mut controller = Controller::new(
            session.clone(),
            Arc::new(StaticDirectory { fail: false }),
            BookmarkStore::new(Arc::new(MemoryStorage::new())),
        );
        controller.dispatch(ViewEvent::ShowSignUp);

        let n = controller.oauth(OAuthProvider::Github).await;
        assert_eq!(n.title, "Authentication Failed");
        assert_eq!(n.description, "Unable to sign in with GitHub. Please try again.");
        assert_eq!(controller.view(), View::SignUp);
        assert!(!controller.state().busy);
        assert_eq!(session.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_busy_controller_refuses_auth() {
        let mut controller = controller_with(false);
        controller.dispatch(ViewEvent::GetStarted);
        controller.dispatch(ViewEvent::AuthStarted);

        let n = controller.login(&demo_login()).await;
        assert_eq!(n.title, "Please Wait");
        assert!(!controller.is_authenticated());
        assert!(controller.state().busy);
    }

    #[tokio::test]
    async fn test_auth_requires_matching_form() {
        let mut controller = controller_with(false);

        // Still on the welcome screen
        let n = controller.login(&demo_login()).await;
        assert_eq!(n.title, "Form Not Open");

        controller.dispatch(ViewEvent::ShowSignUp);
        let n = controller.login(&demo_login()).await;
        assert_eq!(n.title, "Form Not Open");
        assert!(!controller.is_authenticated());
    }

    #[tokio::test]
    async fn test_signup_and_oauth_reach_dashboard() {
        let mut controller = controller_with(false);
        controller.dispatch(ViewEvent::ShowSignUp);
        let n = controller
            .signup(&SignupForm {
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                password: "hunter22".to_string(),
                confirm_password: "hunter22".to_string(),
                agreed_to_terms: true,
            })
            .await;
        assert_eq!(n.title, "Account Created!");
        assert_eq!(controller.view(), View::Dashboard);

        let n = controller.oauth(OAuthProvider::Google).await;
        assert_eq!(n.title, "Already Signed In");

        controller.logout();
        controller.dispatch(ViewEvent::GetStarted);
        let n = controller.oauth(OAuthProvider::Google).await;
        assert_eq!(n.title, "Welcome to FundWise!");
        assert_eq!(controller.current_user().unwrap().email, "user@gmail.com");
    }

    #[tokio::test]
    async fn test_logout_returns_to_welcome() {
        let mut controller = signed_in().await;

        let n = controller.logout();
        assert_eq!(n.title, "Logged Out");
        assert_eq!(controller.view(), View::Welcome);
        assert!(!controller.is_authenticated());
        assert!(controller.current_user().is_none());

        // Idempotent
        let n = controller.logout();
        assert!(!n.is_error());
    }

    #[tokio::test]
    async fn test_fetch_errors_become_notifications() {
        let controller = controller_with(true);

        let n = controller.search("sbi").await.unwrap_err();
        assert_eq!(n.title, "Search Failed");
        assert_eq!(n.description, "Failed to search mutual funds");

        let n = controller.open_fund("119609").await.unwrap_err();
        assert!(n.is_error());
        assert_eq!(controller.view(), View::Welcome);
    }

    #[tokio::test]
    async fn test_open_fund_presents_change() {
        let controller = controller_with(false);
        let view = controller.open_fund("119609").await.unwrap();

        let change = view.change.unwrap();
        assert_eq!(change.delta_display(), "+0.5000");
        assert_eq!(change.percent_display().as_deref(), Some("+5.00"));
        assert_eq!(view.history.len(), 2);
        assert!(!view.is_saved);
    }

    #[tokio::test]
    async fn test_bookmarks_require_session() {
        let mut controller = controller_with(false);

        let n = controller.save_fund("119609", &detail("119609"));
        assert_eq!(n.title, "Authentication Required");
        assert_eq!(controller.view(), View::SignIn);

        assert!(controller.saved_funds().is_err());
        let n = controller.remove_fund("119609");
        assert_eq!(n.title, "Authentication Required");
    }

    #[tokio::test]
    async fn test_bookmark_gate_redirects_from_sign_up() {
        let mut controller = controller_with(false);
        controller.dispatch(ViewEvent::ShowSignUp);
        assert_eq!(controller.view(), View::SignUp);

        let n = controller.save_fund("119609", &detail("119609"));
        assert_eq!(n.title, "Authentication Required");
        assert_eq!(controller.view(), View::SignIn);
    }

    #[tokio::test]
    async fn test_save_by_code_checks_session_before_fetching() {
        // Upstream is down, yet the signed-out user is told to sign in
        let mut controller = controller_with(true);
        let n = controller.save_fund_by_code("119609").await;
        assert_eq!(n.title, "Authentication Required");
        assert_eq!(controller.view(), View::SignIn);

        let mut controller = signed_in().await;
        let n = controller.save_fund_by_code("119609").await;
        assert_eq!(n.title, "Fund Saved!");
        assert_eq!(controller.saved_funds().unwrap()[0].current_nav, "10.50");
    }

    #[tokio::test]
    async fn test_auth_form_ready_leaves_state_alone() {
        let mut controller = controller_with(false);
        assert_eq!(
            controller.auth_form_ready(&[View::SignIn]).unwrap_err().title,
            "Form Not Open"
        );
        assert_eq!(controller.view(), View::Welcome);

        controller.dispatch(ViewEvent::GetStarted);
        assert!(controller.auth_form_ready(&[View::SignIn]).is_ok());
        assert!(!controller.state().busy);

        let controller = signed_in().await;
        assert_eq!(
            controller.auth_form_ready(&[View::SignIn]).unwrap_err().title,
            "Already Signed In"
        );
    }

    #[tokio::test]
    async fn test_save_and_remove_flow() {
        let mut controller = signed_in().await;

        let n = controller.save_fund("119609", &detail("119609"));
        assert_eq!(n.title, "Fund Saved!");
        let n = controller.save_fund("119609", &detail("119609"));
        assert_eq!(n.title, "Already Saved");

        let saved = controller.saved_funds().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].current_nav, "10.50");
        assert!(controller.open_fund("119609").await.unwrap().is_saved);

        let n = controller.remove_fund("000000");
        assert_eq!(n.title, "Not Saved");
        let n = controller.remove_fund("119609");
        assert_eq!(n.title, "Fund Removed");
        assert!(controller.saved_funds().unwrap().is_empty());
    }
}
