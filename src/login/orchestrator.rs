use tracing::{debug, info, warn};

use crate::browser::driver::PageDriver;
use crate::screen::url::looks_like_auth_route;

use super::locators::{
    ERROR_SELECTORS, GENERIC_PASSWORD, Locator, PASSWORD_LOCATORS, SUBMIT_LOCATORS,
    USERNAME_LOCATORS, mentions_failure,
};
use super::login_model::{LoginConfig, LoginFailure, LoginOutcome, LoginState};

pub const DEFAULT_LOGIN_SETTLE_MS: u64 = 2000;

/// Drives one login attempt through
/// `Idle → NavigatedToLogin → FieldsLocated → Submitted → Verified`.
///
/// There are no retries: the first failing transition jumps straight to
/// `Verified(Failure)`. Every state entered is kept in `history`.
pub struct LoginOrchestrator<'a> {
    config: &'a LoginConfig,
    settle_ms: u64,
    state: LoginState,
    history: Vec<LoginState>,
}

impl<'a> LoginOrchestrator<'a> {
    pub fn new(config: &'a LoginConfig) -> Self {
        LoginOrchestrator {
            config,
            settle_ms: DEFAULT_LOGIN_SETTLE_MS,
            state: LoginState::Idle,
            history: vec![LoginState::Idle],
        }
    }

    pub fn with_settle_ms(mut self, settle_ms: u64) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    pub fn history(&self) -> &[LoginState] {
        &self.history
    }

    /// Run the attempt to completion and return the verdict.
    pub fn run(&mut self, driver: &mut dyn PageDriver) -> LoginOutcome {
        while !self.state.is_terminal() {
            let next = self.step(driver);
            self.transition(next);
        }

        match &self.state {
            LoginState::Verified(outcome) => outcome.clone(),
            // unreachable: the loop only exits on Verified
            _ => LoginOutcome::Failure(LoginFailure::Interaction("login did not finish".into())),
        }
    }

    fn transition(&mut self, next: LoginState) {
        debug!(from = self.state.name(), to = next.name(), "login transition");
        self.history.push(next.clone());
        self.state = next;
    }

    fn step(&self, driver: &mut dyn PageDriver) -> LoginState {
        match &self.state {
            LoginState::Idle => self.navigate(driver),
            LoginState::NavigatedToLogin => self.locate_fields(driver),
            LoginState::FieldsLocated {
                username_selector,
                password_selector,
            } => self.submit(driver, username_selector, password_selector),
            LoginState::Submitted => self.verify(driver),
            LoginState::Verified(outcome) => LoginState::Verified(outcome.clone()),
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    fn navigate(&self, driver: &mut dyn PageDriver) -> LoginState {
        if self.config.credentials().is_none() {
            return failed(LoginFailure::MissingCredentials);
        }

        info!(url = %self.config.login_url, "navigating to login page");
        match driver.navigate(&self.config.login_url) {
            Ok(()) => LoginState::NavigatedToLogin,
            Err(e) => {
                warn!(url = %self.config.login_url, error = %e, "login page failed to load");
                failed(LoginFailure::NavigationFailed(e.to_string()))
            }
        }
    }

    fn locate_fields(&self, driver: &mut dyn PageDriver) -> LoginState {
        let username = probe_css(
            driver,
            "username",
            self.config.username_field.as_deref(),
            USERNAME_LOCATORS,
        );
        let Some(username_selector) = username else {
            return failed(LoginFailure::FormNotFound("no username field".into()));
        };

        let password = probe_css(
            driver,
            "password",
            self.config.password_field.as_deref(),
            PASSWORD_LOCATORS,
        );
        let Some(password_selector) = password else {
            return failed(LoginFailure::FormNotFound("no password field".into()));
        };

        debug!(
            username = %username_selector,
            password = %password_selector,
            "login fields located"
        );
        LoginState::FieldsLocated {
            username_selector,
            password_selector,
        }
    }

    fn submit(
        &self,
        driver: &mut dyn PageDriver,
        username_selector: &str,
        password_selector: &str,
    ) -> LoginState {
        let Some((username, password)) = self.config.credentials() else {
            return failed(LoginFailure::MissingCredentials);
        };

        if let Err(e) = driver.fill(username_selector, username) {
            return failed(LoginFailure::Interaction(e.to_string()));
        }
        if let Err(e) = driver.fill(password_selector, password) {
            return failed(LoginFailure::Interaction(e.to_string()));
        }

        let hint = self.config.submit_selector.as_deref().map(Locator::Css);
        let candidates = hint.iter().chain(SUBMIT_LOCATORS.iter());

        for locator in candidates {
            if click_locator(driver, locator) {
                debug!(locator = %locator.describe(), "login submitted");
                return LoginState::Submitted;
            }
        }

        debug!("no submit control found, pressing Enter in password field");
        match driver.press_enter(password_selector) {
            Ok(()) => LoginState::Submitted,
            Err(e) => failed(LoginFailure::Interaction(e.to_string())),
        }
    }

    fn verify(&self, driver: &mut dyn PageDriver) -> LoginState {
        if let Err(e) = driver.wait_idle(self.settle_ms) {
            warn!(error = %e, "settle wait after login failed");
        }

        if let Some(message) = visible_error_message(driver) {
            info!(message = %message, "login rejected by error message");
            return failed(LoginFailure::Rejected(message));
        }

        let password_still_present = self
            .password_selectors()
            .iter()
            .any(|sel| matches!(driver.query_count(sel), Ok(n) if n > 0));

        let url = match driver.current_url() {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "could not read URL after login");
                String::new()
            }
        };

        if password_still_present && looks_like_auth_route(&url) {
            info!(url = %url, "login rejected: still on login form");
            return failed(LoginFailure::Rejected(format!(
                "password field still present at {}",
                url
            )));
        }

        info!(url = %url, "login verified");
        LoginState::Verified(LoginOutcome::Success)
    }

    fn password_selectors(&self) -> Vec<&str> {
        let mut selectors: Vec<&str> = self.config.password_field.as_deref().into_iter().collect();
        for state in self.history.iter().rev() {
            if let LoginState::FieldsLocated {
                password_selector, ..
            } = state
            {
                selectors.push(password_selector.as_str());
                break;
            }
        }
        selectors.push(GENERIC_PASSWORD);
        selectors
    }
}

fn failed(reason: LoginFailure) -> LoginState {
    LoginState::Verified(LoginOutcome::Failure(reason))
}

/// First selector with a match: the hint, then each candidate in order.
fn probe_css(
    driver: &mut dyn PageDriver,
    what: &str,
    hint: Option<&str>,
    candidates: &[&str],
) -> Option<String> {
    for selector in hint.into_iter().chain(candidates.iter().copied()) {
        match driver.query_count(selector) {
            Ok(n) if n > 0 => return Some(selector.to_string()),
            Ok(_) => debug!(field = what, selector, "probe missed"),
            Err(e) => warn!(field = what, selector, error = %e, "probe failed"),
        }
    }
    None
}

fn click_locator(driver: &mut dyn PageDriver, locator: &Locator<'_>) -> bool {
    match locator {
        Locator::Css(selector) => {
            match driver.query_count(selector) {
                Ok(n) if n > 0 => {}
                Ok(_) => {
                    debug!(selector, "submit probe missed");
                    return false;
                }
                Err(e) => {
                    warn!(selector, error = %e, "submit probe failed");
                    return false;
                }
            }
            match driver.click(selector) {
                Ok(()) => true,
                Err(e) => {
                    warn!(selector, error = %e, "submit click failed");
                    false
                }
            }
        }
        Locator::Text(text) => match driver.click_text(text) {
            Ok(true) => true,
            Ok(false) => {
                debug!(text, "submit text probe missed");
                false
            }
            Err(e) => {
                warn!(text, error = %e, "submit text probe failed");
                false
            }
        },
    }
}

/// Text of the first visible error-styled element that reads like a
/// login failure.
fn visible_error_message(driver: &mut dyn PageDriver) -> Option<String> {
    for selector in ERROR_SELECTORS {
        match driver.query_visible(selector) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!(selector, error = %e, "error probe failed");
                continue;
            }
        }
        match driver.query_text(selector) {
            Ok(Some(text)) if mentions_failure(&text) => return Some(text.trim().to_string()),
            Ok(_) => debug!(selector, "visible error element without failure wording"),
            Err(e) => warn!(selector, error = %e, "error text probe failed"),
        }
    }
    None
}
