//! Zijag Hub Rust Client Library
//!
//! A client library for the Zijag Hub retail and inventory admin API, providing
//! authentication, paginated CRUD list controllers for expenses, income, inventory,
//! sales and users, dashboard stats, reports and bulk inventory upload.

pub mod auth;
pub mod collection;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod entity;
pub mod error;
pub mod fetch;
pub mod form;
pub mod inventory;
pub mod notification;
pub mod paginator;
pub mod reports;

use log::info;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

use crate::auth::{AuthClient, AuthSession};
use crate::collection::HttpCollection;
use crate::config::ClientOptions;
use crate::controller::ListController;
use crate::dashboard::DashboardClient;
use crate::entity::Entity;
use crate::error::Result;
use crate::fetch::Transport;
use crate::inventory::InventoryUpload;
use crate::notification::NotificationChannel;
use crate::reports::ReportsClient;

/// The main entry point for the Zijag Hub client
pub struct ZijagHub {
    /// The base URL of the API
    url: String,
    /// HTTP client used for requests
    http_client: Client,
    /// Client options
    options: ClientOptions,
    /// Credential from the last login
    session: Option<AuthSession>,
    /// Notifications shared by every controller created from this client
    notifications: NotificationChannel,
}

impl ZijagHub {
    /// Create a new client
    ///
    /// # Example
    ///
    /// ```
    /// use zijag_hub::ZijagHub;
    ///
    /// let hub = ZijagHub::new("https://api.zijag.example").unwrap();
    /// assert!(!hub.is_authenticated());
    /// ```
    pub fn new(api_url: &str) -> Result<Self> {
        Self::new_with_options(api_url, ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use zijag_hub::{ZijagHub, config::ClientOptions};
    ///
    /// let options = ClientOptions::default()
    ///     .with_page_size(20)
    ///     .with_request_timeout(Some(Duration::from_secs(10)));
    /// let hub = ZijagHub::new_with_options("https://api.zijag.example", options).unwrap();
    /// ```
    pub fn new_with_options(api_url: &str, options: ClientOptions) -> Result<Self> {
        Url::parse(api_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            url: api_url.trim_end_matches('/').to_string(),
            http_client,
            notifications: NotificationChannel::new(options.notification_duration),
            options,
            session: None,
        })
    }

    /// Attach a session obtained earlier
    pub fn with_session(mut self, session: AuthSession) -> Self {
        self.session = Some(session);
        self
    }

    /// The base URL of the API
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Client options
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The current session, if logged in
    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    /// Whether a live credential is attached
    pub fn is_authenticated(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.is_expired())
    }

    /// Notifications shared by this client's controllers
    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    fn transport(&self) -> Transport {
        Transport::new(
            &self.url,
            self.http_client.clone(),
            self.session.clone(),
            &self.options.client_info,
        )
    }

    /// Client for the login endpoint
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.transport())
    }

    /// Log in and keep the session for subsequent clients
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&AuthSession> {
        let session = self.auth().login(email, password).await?;
        Ok(self.session.insert(session))
    }

    /// Forget the session; clients created afterwards fail with an auth error
    pub fn logout(&mut self) {
        if self.session.take().is_some() {
            info!("Logged out");
        }
    }

    /// Remote collection client for one entity type
    ///
    /// # Example
    ///
    /// ```
    /// use zijag_hub::{ZijagHub, entity::Expense};
    ///
    /// let hub = ZijagHub::new("https://api.zijag.example").unwrap();
    /// let expenses = hub.collection::<Expense>();
    /// ```
    pub fn collection<E: Entity>(&self) -> HttpCollection<E> {
        HttpCollection::new(self.transport())
    }

    /// List controller for one entity type, reporting into the shared notification channel
    pub fn controller<E: Entity>(&self) -> ListController<E> {
        ListController::with_notifications(
            Arc::new(self.collection::<E>()),
            &self.options,
            self.notifications.clone(),
        )
    }

    /// Client for dashboard stats
    pub fn dashboard(&self) -> DashboardClient {
        DashboardClient::new(self.transport())
    }

    /// Client for financial reports
    pub fn reports(&self) -> ReportsClient {
        ReportsClient::new(self.transport())
    }

    /// Client for bulk inventory upload
    pub fn inventory_upload(&self) -> InventoryUpload {
        InventoryUpload::new(self.transport())
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{AuthSession, Role};
    pub use crate::collection::RemoteCollection;
    pub use crate::config::ClientOptions;
    pub use crate::controller::{ListController, ListState};
    pub use crate::entity::{Draft, Entity, Expense, Income, InventoryItem, Sale, User};
    pub use crate::error::Error;
    pub use crate::ZijagHub;
}
