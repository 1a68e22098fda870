//! Configuration options for the Zijag Hub client

use std::time::Duration;

/// Configuration options for the Zijag Hub client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Number of records shown per page
    pub page_size: usize,

    /// How long a notification stays visible
    pub notification_duration: Duration,

    /// Value of the `X-Client-Info` header
    pub client_info: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            page_size: 10,
            notification_duration: Duration::from_millis(3000),
            client_info: format!("zijag-hub-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the page size; zero is raised to one
    pub fn with_page_size(mut self, value: usize) -> Self {
        self.page_size = value.max(1);
        self
    }

    /// Set how long notifications stay visible
    pub fn with_notification_duration(mut self, value: Duration) -> Self {
        self.notification_duration = value;
        self
    }

    /// Set the client info header
    pub fn with_client_info(mut self, value: &str) -> Self {
        self.client_info = value.to_string();
        self
    }
}
