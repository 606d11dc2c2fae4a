//! HTML shell for the front-end application.
//!
//! The shell carries no markup of its own; it hands the page context to the
//! client bundle through `window.csrf_token` and `window.frappe.boot`.

use hrms_core::PageContext;

/// `Cache-Control` value for boot pages. Tokens must never be served from cache.
pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// Path of the client bundle entry point.
pub const BUNDLE_PATH: &str = "/assets/hrms/frontend/index.js";

/// Render the page shell for a context.
pub fn render(ctx: &PageContext) -> Result<String, serde_json::Error> {
    let csrf_token = script_json(&serde_json::to_string(&ctx.csrf_token)?);
    let boot = script_json(&serde_json::to_string(&ctx.boot)?);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0, viewport-fit=cover">
  <title>Frappe HR</title>
  <link rel="manifest" href="/assets/hrms/manifest.webmanifest">
</head>
<body>
  <div id="app"></div>
  <script>
    window.csrf_token = {csrf_token};
    if (!window.frappe) window.frappe = {{}};
    window.frappe.boot = {boot};
  </script>
  <script type="module" src="{BUNDLE_PATH}"></script>
</body>
</html>
"#
    ))
}

/// JSON is valid JavaScript, but `</` would close the script element early.
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrms_core::{BootRecord, DEFAULT_ROUTE};

    fn context(relay: &str) -> PageContext {
        PageContext {
            csrf_token: "abc123".into(),
            boot: BootRecord {
                site_name: "hr.localhost".into(),
                push_relay_server_url: relay.into(),
                default_route: DEFAULT_ROUTE.into(),
            },
        }
    }

    #[test]
    fn embeds_token_and_boot() {
        let html = render(&context("")).unwrap();
        assert!(html.contains(r#"window.csrf_token = "abc123";"#));
        let boot = concat!(
            r#"window.frappe.boot = {"site_name":"hr.localhost","#,
            r#""push_relay_server_url":"","default_route":"/hrms"};"#,
        );
        assert!(html.contains(boot));
        assert!(html.contains(BUNDLE_PATH));
    }

    #[test]
    fn script_close_tags_escaped() {
        let html = render(&context("https://x.example.com/</script><script>alert(1)")).unwrap();
        assert!(!html.contains("</script><script>alert(1)"));
        assert!(html.contains(r"<\/script>"));
    }
}
