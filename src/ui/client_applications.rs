//! Client application pages

use serde::Serialize;
use tera::Context;

use super::{format_optional_timestamp, Views};
use crate::data::ClientApplication;

/// An application with display-ready fields
#[derive(Debug, Serialize)]
struct ApplicationRow {
    id: String,
    name: String,
    client_id: String,
    client_secret: String,
    redirect_urls: String,
    enabled: &'static str,
    access_summary: &'static str,
    published_artworks_access: bool,
    created_at: String,
}

impl From<&ClientApplication> for ApplicationRow {
    fn from(app: &ClientApplication) -> Self {
        ApplicationRow {
            id: app.id.clone(),
            name: app.name.clone(),
            client_id: app.client_id.clone(),
            client_secret: app.client_secret.clone().unwrap_or_default(),
            redirect_urls: app.redirect_urls.join(", "),
            enabled: if app.enabled { "Yes" } else { "No" },
            access_summary: app.access_summary(),
            published_artworks_access: app.has_published_artworks_access(),
            created_at: format_optional_timestamp(app.created_at.as_ref()),
        }
    }
}

/// Values the create/edit form is filled with
#[derive(Debug, Default)]
pub struct ApplicationForm<'a> {
    /// Set when editing an existing application
    pub application: Option<&'a ClientApplication>,
    pub name: &'a str,
    pub redirect_urls: &'a str,
    /// Where to send the operator after a successful create
    pub redirect_uri: Option<&'a str>,
}

impl<'a> ApplicationForm<'a> {
    /// Form prefilled from an existing application
    pub fn edit(application: &'a ClientApplication, redirect_urls: &'a str) -> Self {
        ApplicationForm {
            application: Some(application),
            name: &application.name,
            redirect_urls,
            redirect_uri: None,
        }
    }
}

impl Views {
    /// Renders the table of applications
    pub fn client_applications_index(
        &self,
        applications: &[ClientApplication],
        error: Option<&str>,
    ) -> Result<String, tera::Error> {
        let rows: Vec<ApplicationRow> = applications.iter().map(ApplicationRow::from).collect();
        let mut context = Context::new();
        context.insert("applications", &rows);
        self.render("client_applications/index.html", context, error)
    }

    /// Renders one application's details, secret included
    pub fn client_application_show(
        &self,
        application: Option<&ClientApplication>,
        error: Option<&str>,
    ) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("app", &application.map(ApplicationRow::from));
        self.render("client_applications/show.html", context, error)
    }

    /// Renders the create form, or the edit form when an application is given
    pub fn client_application_form(
        &self,
        form: &ApplicationForm,
        error: Option<&str>,
    ) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("app", &form.application.map(ApplicationRow::from));
        context.insert("name", form.name);
        context.insert("redirect_urls", form.redirect_urls);
        context.insert("redirect_uri", &form.redirect_uri);
        self.render("client_applications/form.html", context, error)
    }

    /// Renders the destroy confirmation
    pub fn client_application_delete(
        &self,
        application: Option<&ClientApplication>,
        error: Option<&str>,
    ) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("app", &application.map(ApplicationRow::from));
        self.render("client_applications/delete.html", context, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(enabled: bool, published: bool) -> ClientApplication {
        ClientApplication {
            id: "1".to_string(),
            name: "One".to_string(),
            client_id: "client_id".to_string(),
            client_secret: Some("client_secret".to_string()),
            redirect_urls: vec![],
            enabled,
            published_artworks_access_enabled: published,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_index_shows_table_cells() {
        let views = Views::new().unwrap();
        let html = views
            .client_applications_index(&[application(true, false)], None)
            .unwrap();

        assert!(html.contains("<td class=\"client_id\">client_id</td>"));
        assert!(html.contains("<td class=\"enabled\">Yes</td>"));
        assert!(html.contains(">One</a></td>"));
        assert!(html.contains("Create a New App"));
    }

    #[test]
    fn test_index_access_summaries() {
        let views = Views::new().unwrap();
        let disabled = views
            .client_applications_index(&[application(false, false)], None)
            .unwrap();
        let published = views
            .client_applications_index(&[application(true, true)], None)
            .unwrap();

        assert!(disabled.contains("<td class=\"enabled\">No</td>"));
        assert!(published.contains("<td class=\"enabled\">Yes + Published Artworks</td>"));
    }

    #[test]
    fn test_index_empty_state() {
        let views = Views::new().unwrap();
        let html = views.client_applications_index(&[], None).unwrap();
        assert!(html.contains("No client applications yet."));
    }

    #[test]
    fn test_show_lists_secret_and_alert() {
        let views = Views::new().unwrap();
        let html = views
            .client_application_show(Some(&application(true, true)), None)
            .unwrap();

        assert!(html.contains("<td id=\"name\">One</td>"));
        assert!(html.contains("<td id=\"client_secret\">client_secret</td>"));
        assert!(html.contains("<td id=\"enabled\">Yes</td>"));
        assert!(html.contains("This application has access to all published artworks."));
    }

    #[test]
    fn test_show_without_published_access_has_no_alert() {
        let views = Views::new().unwrap();
        let html = views
            .client_application_show(Some(&application(false, false)), None)
            .unwrap();

        assert!(html.contains("<td id=\"enabled\">No</td>"));
        assert!(!html.contains("alert-success"));
    }

    #[test]
    fn test_new_form_carries_redirect_uri() {
        let views = Views::new().unwrap();
        let form = ApplicationForm {
            redirect_uri: Some("/docs"),
            ..Default::default()
        };

        let html = views.client_application_form(&form, None).unwrap();

        assert!(html.contains("action=\"/client_applications\""));
        assert!(html.contains("name=\"redirect_uri\""));
        assert!(html.contains("<label for=\"client_application_name\">Name</label>"));
        assert!(html.contains("<label for=\"client_application_redirect_urls\">Redirect urls</label>"));
    }

    #[test]
    fn test_edit_form_shows_access() {
        let views = Views::new().unwrap();
        let app = application(true, true);
        let form = ApplicationForm::edit(&app, "");

        let html = views.client_application_form(&form, None).unwrap();

        assert!(html.contains("action=\"/client_applications/1\""));
        assert!(html.contains("value=\"One\""));
        assert!(html.contains("<td id=\"enabled\">Yes</td>"));
        assert!(html.contains("This application has access to all published artworks."));
    }

    #[test]
    fn test_delete_confirmation() {
        let views = Views::new().unwrap();
        let html = views
            .client_application_delete(Some(&application(true, false)), None)
            .unwrap();

        assert!(html.contains("Delete One?"));
        assert!(html.contains("action=\"/client_applications/1/delete\""));
    }

    #[test]
    fn test_links_encode_id_as_one_segment() {
        let views = Views::new().unwrap();
        let mut app = application(true, false);
        app.id = "a/b?c".to_string();

        let index = views.client_applications_index(&[app.clone()], None).unwrap();
        assert!(index.contains("href=\"/client_applications/a%2Fb%3Fc\""));
        assert!(index.contains("href=\"/client_applications/a%2Fb%3Fc/delete\""));

        let edit = views
            .client_application_form(&ApplicationForm::edit(&app, ""), None)
            .unwrap();
        assert!(edit.contains("action=\"/client_applications/a%2Fb%3Fc\""));
    }
}
