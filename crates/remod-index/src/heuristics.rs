//! Heuristic tags computed at index time
//!
//! These patterns must stay stable: the scope selector's fallback scoring
//! and the oracle prompts both lean on them, and downstream behavior is
//! calibrated against exactly this vocabulary.

use once_cell::sync::Lazy;
use regex::Regex;

static CONTROL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)button|btn|type.*submit").expect("static regex"));
static AUTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)signin|sign.?in|login|log.?in|auth").expect("static regex"));
static ENTRY_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(app|index|main|home)\.").expect("static regex"));
static ENTRY_CONTENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)export\s+default|function\s+App|class\s+App").expect("static regex")
});
static DECLARED_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:function|const|class)\s+(\w+)").expect("static regex"));
static EXPORT_DEFAULT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"export\s+default\s+(\w+)").expect("static regex"));
static AUTH_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)sign\s*in|log\s*in|login|signin").expect("static regex"));

/// File content mentions interactive-control markup.
#[must_use]
pub fn has_interactive_controls(content: &str) -> bool {
    CONTROL_RE.is_match(content)
}

/// File content mentions sign-in / log-in / auth vocabulary.
#[must_use]
pub fn has_auth_markup(content: &str) -> bool {
    AUTH_RE.is_match(content)
}

/// File looks like a top-level application entry point.
///
/// Matches on the filename stem (`app`, `index`, `main`, `home`) or on an
/// exported default / app-class declaration in the content.
#[must_use]
pub fn is_entry_file(file_name: &str, content: &str) -> bool {
    ENTRY_NAME_RE.is_match(file_name) || ENTRY_CONTENT_RE.is_match(content)
}

/// Best-effort primary symbol name.
///
/// First identifier after a `function`/`const`/`class` declaration, else
/// the identifier after `export default`, else none.
#[must_use]
pub fn primary_symbol(content: &str) -> Option<String> {
    DECLARED_SYMBOL_RE
        .captures(content)
        .or_else(|| EXPORT_DEFAULT_RE.captures(content))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Element text content matches authentication vocabulary.
#[must_use]
pub fn has_auth_text(text: &str) -> bool {
    AUTH_TEXT_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_vocabulary() {
        assert!(has_interactive_controls("<button>Go</button>"));
        assert!(has_interactive_controls("className=\"btn-primary\""));
        assert!(has_interactive_controls("<input type=\"submit\" />"));
        assert!(has_interactive_controls("<Button variant=\"ghost\" />"));
        assert!(!has_interactive_controls("<div>plain text</div>"));
    }

    #[test]
    fn auth_vocabulary() {
        assert!(has_auth_markup("const SignIn = () => {}"));
        assert!(has_auth_markup("handleLogin()"));
        assert!(has_auth_markup("useAuth()"));
        assert!(!has_auth_markup("const Dashboard = () => {}"));
    }

    #[test]
    fn entry_by_name() {
        assert!(is_entry_file("App.tsx", ""));
        assert!(is_entry_file("index.ts", ""));
        assert!(is_entry_file("Main.jsx", ""));
        assert!(!is_entry_file("LoginForm.tsx", "const LoginForm = 1;"));
    }

    #[test]
    fn entry_by_content() {
        assert!(is_entry_file("whatever.tsx", "export default Thing;"));
        assert!(is_entry_file("whatever.tsx", "function App() {}"));
        assert!(!is_entry_file("whatever.tsx", "const helper = 1;"));
    }

    #[test]
    fn primary_symbol_declaration_first() {
        let content = "import x from 'y';\nfunction LoginForm() {}\nexport default LoginForm;";
        assert_eq!(primary_symbol(content).as_deref(), Some("LoginForm"));
    }

    #[test]
    fn primary_symbol_export_default_fallback() {
        assert_eq!(
            primary_symbol("export default Widget;").as_deref(),
            Some("Widget")
        );
        assert_eq!(primary_symbol("import a from 'b';"), None);
    }

    #[test]
    fn auth_text_on_node_content() {
        assert!(has_auth_text("Sign In"));
        assert!(has_auth_text("log in now"));
        assert!(!has_auth_text("Submit"));
    }
}
