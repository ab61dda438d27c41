//! Navigation and small browser helpers shared by every page.

use std::time::Duration;

use crate::config::Messages;
use crate::ui::UiPort;

/// Selector of the collapsible navigation panel.
pub const MAIN_NAVIGATION: &str = ".main-navigation";
/// Class that expands the navigation panel.
pub const EXTENDED_CLASS: &str = "extended";
/// Selector of the document root, which carries the platform class.
pub const DOCUMENT_ROOT: &str = "html";
pub const RELOAD_DELAY: Duration = Duration::from_secs(10);

/// Browser facilities that are not element mutations.
pub trait Browser {
    /// Show a modal confirmation dialog; `true` when the user accepts.
    fn confirm(&mut self, message: &str) -> bool;
    fn write_clipboard(&mut self, text: &str);
    /// Reload the whole page after `delay`.
    fn schedule_reload(&mut self, delay: Duration);
}

/// Expand or collapse the navigation panel.
pub fn toggle_navigation(ui: &mut dyn UiPort) {
    ui.toggle_class(MAIN_NAVIGATION, EXTENDED_CLASS);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Ios,
    Android,
    Linux,
    Other,
}

impl Platform {
    /// Classify a `User-Agent` string. Mobile platforms are checked first
    /// since their agents also mention the desktop OS they derive from.
    pub fn detect(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        if ["iphone", "ipad", "ipod"].iter().any(|p| ua.contains(p)) {
            Platform::Ios
        } else if ua.contains("android") {
            Platform::Android
        } else if ua.contains("windows") {
            Platform::Windows
        } else if ua.contains("macintosh") || ua.contains("mac os x") {
            Platform::MacOs
        } else if ua.contains("linux") || ua.contains("x11") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Platform::Windows => "platform-windows",
            Platform::MacOs => "platform-macos",
            Platform::Ios => "platform-ios",
            Platform::Android => "platform-android",
            Platform::Linux => "platform-linux",
            Platform::Other => "platform-other",
        }
    }
}

/// Tag the document root with the platform class.
pub fn apply_platform_class(ui: &mut dyn UiPort, platform: Platform) {
    ui.add_class(DOCUMENT_ROOT, platform.class_name());
}

/// Ask the user to confirm a destructive action.
pub fn confirm_action(browser: &mut dyn Browser, messages: &Messages) -> bool {
    browser.confirm(&messages.confirm_prompt)
}

/// Copy an input's value to the clipboard. Returns `false` when there is
/// no such element.
pub fn copy_to_clipboard(ui: &dyn UiPort, browser: &mut dyn Browser, id: &str) -> bool {
    match ui.value(id) {
        Some(text) => {
            browser.write_clipboard(&text);
            true
        }
        None => false,
    }
}

/// Reload the page after [`RELOAD_DELAY`] (live results pages).
pub fn schedule_reload(browser: &mut dyn Browser) {
    browser.schedule_reload(RELOAD_DELAY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MemoryDocument;

    #[test]
    fn navigation_toggles() {
        let mut doc = MemoryDocument::new();
        toggle_navigation(&mut doc);
        assert!(doc.has_class(MAIN_NAVIGATION, EXTENDED_CLASS));
        toggle_navigation(&mut doc);
        assert!(!doc.has_class(MAIN_NAVIGATION, EXTENDED_CLASS));
    }

    #[test]
    fn platform_detection() {
        let cases = [
            ("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)", Platform::Ios),
            ("Mozilla/5.0 (Linux; Android 14; Pixel 8)", Platform::Android),
            ("Mozilla/5.0 (Windows NT 10.0; Win64; x64)", Platform::Windows),
            ("Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0)", Platform::MacOs),
            ("Mozilla/5.0 (X11; Linux x86_64)", Platform::Linux),
            ("curl/8.0", Platform::Other),
        ];
        for (ua, expected) in cases {
            assert_eq!(Platform::detect(ua), expected, "{}", ua);
        }
    }

    #[test]
    fn platform_class_on_root() {
        let mut doc = MemoryDocument::new();
        apply_platform_class(&mut doc, Platform::Android);
        assert!(doc.has_class(DOCUMENT_ROOT, "platform-android"));
    }

    #[test]
    fn confirm_uses_configured_prompt() {
        let mut doc = MemoryDocument::new().with_confirm_answer(true);
        let messages = Messages::default();
        assert!(confirm_action(&mut doc, &messages));
        assert_eq!(doc.prompts(), &["Вы уверены?".to_string()]);

        let mut doc = MemoryDocument::new();
        assert!(!confirm_action(&mut doc, &messages));
    }

    #[test]
    fn clipboard_copy() {
        let doc = MemoryDocument::new().with_value("invite-link", "https://e.org/e/5/");
        let mut browser = MemoryDocument::new();
        assert!(copy_to_clipboard(&doc, &mut browser, "invite-link"));
        assert_eq!(browser.clipboard(), Some("https://e.org/e/5/"));
        assert!(!copy_to_clipboard(&doc, &mut browser, "missing"));
    }

    #[test]
    fn reload_is_delayed_ten_seconds() {
        let mut doc = MemoryDocument::new();
        schedule_reload(&mut doc);
        assert_eq!(doc.scheduled_reloads(), &[Duration::from_secs(10)]);
    }
}
