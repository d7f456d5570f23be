//! HTML views for the admin console
//!
//! Templates are compiled into the binary and rendered with tera. Each page
//! gets a render method on `Views`; display formatting (timestamps, status
//! labels, access summaries) happens here so the templates only lay out
//! ready-made strings.

pub mod client_applications;
pub mod webhook_deliveries;

use chrono::{DateTime, Utc};
use tera::{Context, Tera};

pub use client_applications::ApplicationForm;
pub use webhook_deliveries::DeliveryListing;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    ("error.html", include_str!("../../templates/error.html")),
    (
        "client_applications/index.html",
        include_str!("../../templates/client_applications/index.html"),
    ),
    (
        "client_applications/_access.html",
        include_str!("../../templates/client_applications/_access.html"),
    ),
    (
        "client_applications/show.html",
        include_str!("../../templates/client_applications/show.html"),
    ),
    (
        "client_applications/form.html",
        include_str!("../../templates/client_applications/form.html"),
    ),
    (
        "client_applications/delete.html",
        include_str!("../../templates/client_applications/delete.html"),
    ),
    (
        "webhook_deliveries/index.html",
        include_str!("../../templates/webhook_deliveries/index.html"),
    ),
    (
        "webhook_deliveries/show.html",
        include_str!("../../templates/webhook_deliveries/show.html"),
    ),
];

/// Compiled page templates
#[derive(Debug)]
pub struct Views {
    tera: Tera,
}

impl Views {
    /// Compiles every template; fails on the first syntax error
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        tera.autoescape_on(vec![".html"]);
        Ok(Self { tera })
    }

    /// Renders `name` with a context that always carries an `error` slot
    fn render(
        &self,
        name: &str,
        mut context: Context,
        error: Option<&str>,
    ) -> Result<String, tera::Error> {
        context.insert("error", &error);
        self.tera.render(name, &context)
    }

    /// Page shown when no access token came with the request
    pub fn sign_in_required(&self) -> Result<String, tera::Error> {
        self.error_page(
            "Sign in required",
            "Sign in through the platform to obtain an access token, then reload this page.",
            None,
        )
    }

    /// Generic page for failures that have nothing else to show
    pub fn error_page(
        &self,
        title: &str,
        hint: &str,
        error: Option<&str>,
    ) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("title", title);
        context.insert("hint", hint);
        self.render("error.html", context, error)
    }
}

/// Formats a timestamp for tables and detail pages
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Formats an optional timestamp, leaving absent values blank
pub fn format_optional_timestamp(timestamp: Option<&DateTime<Utc>>) -> String {
    timestamp.map(format_timestamp).unwrap_or_default()
}
