// ============================================================================
// Candidate locators for login form discovery, in probe order
// ============================================================================

/// One way of finding an element on the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator<'a> {
    Css(&'a str),
    /// Visible clickable element with exactly this text
    Text(&'a str),
}

impl Locator<'_> {
    pub fn describe(&self) -> String {
        match self {
            Locator::Css(sel) => format!("css {}", sel),
            Locator::Text(text) => format!("text \"{}\"", text),
        }
    }
}

/// Attribute-name matches, then placeholder/aria-label substrings, then the
/// generic type fallback.
pub const USERNAME_LOCATORS: &[&str] = &[
    r#"input[name="username"]"#,
    r#"input[name="email"]"#,
    r#"input[name="login"]"#,
    r#"input[name="user"]"#,
    r#"input[id="username"]"#,
    r#"input[id="email"]"#,
    r#"input[autocomplete="username"]"#,
    r#"input[placeholder*="email" i]"#,
    r#"input[placeholder*="user" i]"#,
    r#"input[placeholder*="identifiant" i]"#,
    r#"input[aria-label*="email" i]"#,
    r#"input[aria-label*="user" i]"#,
    r#"input[type="email"]"#,
    r#"input[type="text"]"#,
];

pub const PASSWORD_LOCATORS: &[&str] = &[
    r#"input[name="password"]"#,
    r#"input[name="pass"]"#,
    r#"input[id="password"]"#,
    r#"input[autocomplete="current-password"]"#,
    r#"input[placeholder*="password" i]"#,
    r#"input[placeholder*="mot de passe" i]"#,
    r#"input[aria-label*="password" i]"#,
    r#"input[type="password"]"#,
];

/// Buttons, then role="button" containers, then bare text in several
/// languages.
pub const SUBMIT_LOCATORS: &[Locator<'static>] = &[
    Locator::Css(r#"button[type="submit"]"#),
    Locator::Css(r#"input[type="submit"]"#),
    Locator::Css("form button"),
    Locator::Css(r#"[role="button"][type="submit"]"#),
    Locator::Css(r#"div[role="button"]"#),
    Locator::Css(r#"span[role="button"]"#),
    Locator::Text("Log in"),
    Locator::Text("Login"),
    Locator::Text("Sign in"),
    Locator::Text("Se connecter"),
    Locator::Text("Connexion"),
    Locator::Text("Anmelden"),
    Locator::Text("Iniciar sesión"),
    Locator::Text("Entrar"),
    Locator::Text("Accedi"),
];

pub const GENERIC_PASSWORD: &str = r#"input[type="password"]"#;

/// Elements styled as error messages.
pub const ERROR_SELECTORS: &[&str] = &[
    r#"[role="alert"]"#,
    ".error",
    ".error-message",
    ".errors",
    ".alert-danger",
    ".alert-error",
    ".invalid-feedback",
    ".form-error",
    ".notification.is-danger",
    ".flash-error",
];

/// Lowercase fragments that mark an error message as a login failure.
pub const FAILURE_KEYWORDS: &[&str] = &[
    "incorrect",
    "invalid",
    "wrong",
    "failed",
    "not recognized",
    "does not match",
    "try again",
    "erreur",
    "échec",
    "incorrecte",
    "invalide",
    "falsch",
    "ungültig",
    "fehlgeschlagen",
    "incorrecto",
    "inválido",
    "errato",
];

pub fn mentions_failure(text: &str) -> bool {
    let lower = text.to_lowercase();
    FAILURE_KEYWORDS.iter().any(|k| lower.contains(k))
}
