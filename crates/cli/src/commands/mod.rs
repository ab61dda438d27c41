pub(crate) mod chart;
pub(crate) mod pin;
pub(crate) mod promo;

use std::path::Path;
use std::process;
use std::sync::Arc;

use podium_client::{
    ClientConfig, Endpoints, HttpClient, HttpResponse, MemoryDocument, StaticClient, UreqClient,
};

use crate::{report_error, OutputFormat};

/// Settings shared by every subcommand.
pub(crate) struct Context {
    pub config: ClientConfig,
    pub base_url: Option<String>,
    pub output: OutputFormat,
    pub quiet: bool,
}

impl Context {
    /// Report `msg` and exit with status 1.
    pub(crate) fn fail(&self, msg: &str) -> ! {
        report_error(msg, self.output, self.quiet);
        process::exit(1);
    }

    pub(crate) fn endpoints(&self) -> Endpoints {
        match self.config.endpoints(self.base_url.as_deref()) {
            Ok(endpoints) => endpoints,
            Err(e) => self.fail(&format!("error: {}", e)),
        }
    }

    /// The live server, or a canned answer for `endpoint_path` when a
    /// saved response body was given.
    pub(crate) fn http_client(
        &self,
        endpoint_path: &str,
        response: Option<&Path>,
    ) -> Arc<dyn HttpClient> {
        match response {
            Some(path) => {
                let body = match std::fs::read_to_string(path) {
                    Ok(body) => body,
                    Err(e) => self.fail(&format!(
                        "error: cannot read response file '{}': {}",
                        path.display(),
                        e
                    )),
                };
                Arc::new(StaticClient::new().with_response(endpoint_path, HttpResponse::new(200, body)))
            }
            None => Arc::new(UreqClient::new(self.config.timeout())),
        }
    }

    pub(crate) fn runtime(&self) -> tokio::runtime::Runtime {
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => self.fail(&format!("error: failed to start async runtime: {}", e)),
        }
    }

    /// Print a check result: a one-line summary plus the page state in
    /// text mode, or `{"outcome", "page"}` in JSON mode.
    pub(crate) fn print_report<T: serde::Serialize>(
        &self,
        summary: &str,
        outcome: &T,
        page: &MemoryDocument,
    ) {
        match self.output {
            OutputFormat::Json => {
                let report = serde_json::json!({ "outcome": outcome, "page": page });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report)
                        .unwrap_or_else(|e| format!("serialization error: {}", e))
                );
            }
            OutputFormat::Text => {
                println!("{}", summary);
                if !self.quiet {
                    print!("{}", render_page(page));
                }
            }
        }
    }
}

/// One line per touched element:
/// `#alert-ok  visible  text="..."  value="..."  checked  .class`.
pub(crate) fn render_page(page: &MemoryDocument) -> String {
    let width = page.elements().keys().map(|id| id.len()).max().unwrap_or(0);
    let mut out = String::new();

    for (id, element) in page.elements() {
        let mut parts = Vec::new();
        match element.visible {
            Some(true) => parts.push("visible".to_string()),
            Some(false) => parts.push("hidden".to_string()),
            None => {}
        }
        if !element.text.is_empty() {
            parts.push(format!("text={:?}", element.text));
        }
        if let Some(value) = &element.value {
            parts.push(format!("value={:?}", value));
        }
        if element.checked {
            parts.push("checked".to_string());
        }
        for class in &element.classes {
            parts.push(format!(".{}", class));
        }

        out.push_str(&format!("  #{:<width$}  {}\n", id, parts.join("  "), width = width));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use podium_client::UiPort;

    #[test]
    fn render_lists_each_touched_element() {
        let mut page = MemoryDocument::new();
        page.set_visible("alert-ok", true);
        page.set_text("alert-ok", "hi");
        page.set_checked("r", true);
        page.add_class("id_promocode", "is-valid");

        let rendered = render_page(&page);
        assert!(rendered.contains("#alert-ok"));
        assert!(rendered.contains("visible  text=\"hi\""));
        assert!(rendered.contains("checked"));
        assert!(rendered.contains(".is-valid"));
        assert_eq!(rendered.lines().count(), 3);
    }
}
