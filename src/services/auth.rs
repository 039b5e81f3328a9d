//! Authentication collaborator
//!
//! Credentials go in, a [`User`] or an error comes out. The crate ships a
//! simulated backend that accepts any well-formed request after an artificial
//! delay; a real credential service can implement [`AuthBackend`] and be
//! dropped into [`Authenticator`] without touching the ledger or progression
//! code.
//!
//! # Example
//!
//! ```rust,ignore
//! let auth = Authenticator::new(SimulatedAuthBackend::from_settings(&settings.auth), &settings.auth);
//! let user = auth.authenticate(&AuthRequest::login("ana@example.com", "secret1")).await?;
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AuthSettings;
use crate::error::{FinanceError, FinanceResult};
use crate::models::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    Login,
    Register,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Register => write!(f, "register"),
        }
    }
}

/// A login or registration form submission
#[derive(Clone, PartialEq, Eq)]
pub struct AuthRequest {
    pub mode: AuthMode,
    pub name: Option<String>,
    pub email: String,
    pub password: String,
    pub confirm_password: Option<String>,
}

// Keep passwords out of logs
impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("mode", &self.mode)
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Whether `email` has the `local@domain.tld` shape
///
/// Surrounding whitespace is not stripped, so `" ana@x.com"` is invalid.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

impl AuthRequest {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            mode: AuthMode::Login,
            name: None,
            email: email.into(),
            password: password.into(),
            confirm_password: None,
        }
    }

    pub fn register(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            mode: AuthMode::Register,
            name: Some(name.into()),
            email: email.into(),
            password: password.into(),
            confirm_password: Some(confirm_password.into()),
        }
    }

    /// Check the form rules for the request's mode
    ///
    /// Rules are checked in form order, and the first failure is reported.
    pub fn validate(&self, min_password_length: usize) -> FinanceResult<()> {
        let fail = |msg: &str| Err(FinanceError::Validation(msg.to_string()));

        if self.mode == AuthMode::Register
            && self.name.as_deref().map(str::trim).unwrap_or_default().is_empty()
        {
            return fail("Nome é obrigatório");
        }

        if self.email.trim().is_empty() {
            return fail("Email é obrigatório");
        }

        if !is_valid_email(&self.email) {
            return fail("Email inválido");
        }

        if self.password.is_empty() {
            return fail("Senha é obrigatória");
        }

        if self.mode == AuthMode::Register {
            if self.password.chars().count() < min_password_length {
                return Err(FinanceError::Validation(format!(
                    "A senha deve ter pelo menos {} caracteres",
                    min_password_length
                )));
            }

            if self.confirm_password.as_deref() != Some(self.password.as_str()) {
                return fail("As senhas não coincidem");
            }
        }

        Ok(())
    }
}

/// A service that turns credentials into a user identity
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Authenticate an already-validated request
    ///
    /// Transient failures should be reported as
    /// [`FinanceError::AuthUnavailable`] so the caller can retry.
    async fn authenticate(&self, request: &AuthRequest) -> FinanceResult<User>;
}

/// Stand-in backend: accepts every request after a fixed delay
#[derive(Debug, Clone, Default)]
pub struct SimulatedAuthBackend {
    pub login_delay: Duration,
    pub register_delay: Duration,
}

impl SimulatedAuthBackend {
    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self {
            login_delay: settings.login_delay(),
            register_delay: settings.register_delay(),
        }
    }

    /// No artificial delay
    pub fn instant() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthBackend for SimulatedAuthBackend {
    async fn authenticate(&self, request: &AuthRequest) -> FinanceResult<User> {
        let delay = match request.mode {
            AuthMode::Login => self.login_delay,
            AuthMode::Register => self.register_delay,
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let user = match request.mode {
            AuthMode::Login => User::new(User::name_from_email(&request.email), &request.email),
            AuthMode::Register => User::new(
                request.name.clone().unwrap_or_default(),
                &request.email,
            ),
        };
        Ok(user)
    }
}

/// Exponential backoff for transient backend failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: u32,
}

impl RetryPolicy {
    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            initial_backoff: settings.initial_backoff(),
            multiplier: 2,
        }
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&AuthSettings::default())
    }
}

/// Validates requests, guards against concurrent submissions and retries
/// transient backend failures
pub struct Authenticator<B: AuthBackend> {
    backend: B,
    policy: RetryPolicy,
    min_password_length: usize,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when an attempt finishes, however it finishes
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<B: AuthBackend> Authenticator<B> {
    pub fn new(backend: B, settings: &AuthSettings) -> Self {
        Self {
            backend,
            policy: RetryPolicy::from_settings(settings),
            min_password_length: settings.min_password_length,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn authenticate(&self, request: &AuthRequest) -> FinanceResult<User> {
        if let Err(e) = request.validate(self.min_password_length) {
            warn!(mode = %request.mode, "authentication rejected: {}", e);
            return Err(e);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(mode = %request.mode, "authentication already in progress");
            return Err(FinanceError::AuthInProgress);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let mut attempt = 1;
        loop {
            debug!(mode = %request.mode, attempt, "authenticating");
            match self.backend.authenticate(request).await {
                Ok(user) => {
                    info!(user = %user.id, mode = %request.mode, "authenticated");
                    return Ok(user);
                }
                Err(e) if e.is_transient() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.backoff_for(attempt);
                    warn!(attempt, ?delay, "authentication backend unavailable, retrying: {}", e);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn fast_settings() -> AuthSettings {
        AuthSettings {
            login_delay_ms: 0,
            register_delay_ms: 0,
            initial_backoff_ms: 0,
            ..AuthSettings::default()
        }
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("joao.silva@mail.com.br"));
        assert!(!is_valid_email(" ana@x.com"));
        assert!(!is_valid_email("ana@x.com "));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_register_validation_order() {
        let err = AuthRequest::register(" ", "bad", "123", "456")
            .validate(6)
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Nome é obrigatório");

        let err = AuthRequest::register("Ana", "bad", "123", "456")
            .validate(6)
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Email inválido");

        let err = AuthRequest::register("Ana", "ana@x.com", "123", "123")
            .validate(6)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: A senha deve ter pelo menos 6 caracteres"
        );

        let err = AuthRequest::register("Ana", "ana@x.com", "123456", "654321")
            .validate(6)
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: As senhas não coincidem");

        assert!(AuthRequest::register("Ana", "ana@x.com", "123456", "123456")
            .validate(6)
            .is_ok());
    }

    #[test]
    fn test_login_validation() {
        assert!(AuthRequest::login("", "x").validate(6).is_err());
        assert!(AuthRequest::login("ana@x.com", "").validate(6).is_err());
        // Short passwords are fine for login
        assert!(AuthRequest::login("ana@x.com", "1").validate(6).is_ok());

        let err = AuthRequest::login(" ana@x.com", "segredo")
            .validate(6)
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Email inválido");
    }

    #[test]
    fn test_debug_hides_password() {
        let request = AuthRequest::login("ana@x.com", "hunter22");
        assert!(!format!("{:?}", request).contains("hunter22"));
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy {
            max_attempts: 4,
            initial_backoff: Duration::from_millis(100),
            multiplier: 2,
        };
        assert_eq!(policy.backoff_for(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_simulated_login_derives_name() {
        let settings = fast_settings();
        let auth = Authenticator::new(SimulatedAuthBackend::from_settings(&settings), &settings);

        let user = auth
            .authenticate(&AuthRequest::login(" Ana.Souza@Example.com ", "x"))
            .await
            .unwrap();
        assert_eq!(user.name, "Ana.Souza");
        assert_eq!(user.email, "ana.souza@example.com");
        assert!(!auth.is_in_flight());
    }

    #[tokio::test]
    async fn test_simulated_register_uses_name() {
        let settings = fast_settings();
        let auth = Authenticator::new(SimulatedAuthBackend::instant(), &settings);

        let user = auth
            .authenticate(&AuthRequest::register(
                " Ana ",
                "ana@example.com",
                "segredo",
                "segredo",
            ))
            .await
            .unwrap();
        assert_eq!(user.name, "Ana");
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_backend() {
        let calls = Arc::new(AtomicU32::new(0));
        let backend = FlakyBackend {
            failures_before_success: 0,
            calls: calls.clone(),
        };
        let auth = Authenticator::new(backend, &fast_settings());

        let err = auth
            .authenticate(&AuthRequest::login("not-an-email", "x"))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    struct FlakyBackend {
        failures_before_success: u32,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl AuthBackend for FlakyBackend {
        async fn authenticate(&self, request: &AuthRequest) -> FinanceResult<User> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                return Err(FinanceError::AuthUnavailable("connection reset".into()));
            }
            Ok(User::new("flaky", &request.email))
        }
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let backend = FlakyBackend {
            failures_before_success: 2,
            calls: calls.clone(),
        };
        let auth = Authenticator::new(backend, &fast_settings());

        let user = auth
            .authenticate(&AuthRequest::login("ana@x.com", "x"))
            .await
            .unwrap();
        assert_eq!(user.name, "flaky");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_give_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let backend = FlakyBackend {
            failures_before_success: 10,
            calls: calls.clone(),
        };
        let auth = Authenticator::new(backend, &fast_settings());

        let err = auth
            .authenticate(&AuthRequest::login("ana@x.com", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, FinanceError::AuthUnavailable(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(!auth.is_in_flight());
    }

    struct GatedBackend {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl AuthBackend for GatedBackend {
        async fn authenticate(&self, request: &AuthRequest) -> FinanceResult<User> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(User::new("gated", &request.email))
        }
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_rejected() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let backend = GatedBackend {
            entered: entered.clone(),
            release: release.clone(),
        };
        let auth = Arc::new(Authenticator::new(backend, &fast_settings()));

        let first = {
            let auth = auth.clone();
            tokio::spawn(async move {
                auth.authenticate(&AuthRequest::login("ana@x.com", "x"))
                    .await
            })
        };

        entered.notified().await;
        assert!(auth.is_in_flight());

        let err = auth
            .authenticate(&AuthRequest::login("bia@x.com", "y"))
            .await
            .unwrap_err();
        assert!(matches!(err, FinanceError::AuthInProgress));

        release.notify_one();
        let user = first.await.unwrap().unwrap();
        assert_eq!(user.email, "ana@x.com");
        assert!(!auth.is_in_flight());
    }
}
