use std::sync::Mutex;

use anyhow::{Context, Result};
use reqwest::{header, Client, Response};

use super::types::*;
use crate::config::Config;

/// Name of the CSRF cookie set by the backend at login.
/// Its value is replayed in the X-CSRF-TOKEN header on every
/// state-changing request, the way the web client does.
const CSRF_COOKIE: &str = "csrf_access_token";

pub struct SchedulerClient {
    client: Client,
    base_url: String,
    csrf_token: Mutex<Option<String>>,
}

impl SchedulerClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            csrf_token: Mutex::new(None),
        })
    }

    fn csrf_header(&self) -> Option<String> {
        self.csrf_token.lock().ok()?.clone()
    }

    /// Remember the CSRF token the backend set alongside the session cookie
    fn capture_csrf(&self, response: &Response) {
        if let Some(cookie) = response.cookies().find(|c| c.name() == CSRF_COOKIE) {
            if let Ok(mut token) = self.csrf_token.lock() {
                *token = Some(cookie.value().to_string());
            }
        }
    }

    async fn check(response: Response) -> Result<Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            // Surface the backend's own error text when it sent one
            if let Ok(err) = serde_json::from_str::<ErrorResponse>(&body) {
                anyhow::bail!("{}", err.error);
            }
            anyhow::bail!("API request failed: {} - {}", status, body);
        }
        Ok(response)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = self.csrf_header() {
            request = request.header("X-CSRF-TOKEN", token);
        }

        let response = Self::check(request.send().await?).await?;
        let result = response.json::<T>().await?;
        Ok(result)
    }

    async fn post<B: serde::Serialize>(&self, endpoint: &str, body: &B) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(body);
        if let Some(token) = self.csrf_header() {
            request = request.header("X-CSRF-TOKEN", token);
        }

        Self::check(request.send().await?).await
    }

    async fn delete(&self, endpoint: &str) -> Result<()> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self.client.delete(&url);
        if let Some(token) = self.csrf_header() {
            request = request.header("X-CSRF-TOKEN", token);
        }

        Self::check(request.send().await?).await?;
        Ok(())
    }

    /// Register a new account
    pub async fn sign_up(&self, request: &SignupRequest) -> Result<()> {
        self.post("/sign-up", request).await?;
        Ok(())
    }

    /// Authenticate and establish the cookie session.
    /// Returns the signed-in profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<Profile> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.post("/login", &body).await?;
        self.capture_csrf(&response);
        let profile = response.json::<Profile>().await?;
        Ok(profile)
    }

    /// Drop the session on the backend and forget the CSRF token
    pub async fn logout(&self) -> Result<()> {
        self.post("/logout", &serde_json::json!({})).await?;
        if let Ok(mut token) = self.csrf_token.lock() {
            *token = None;
        }
        Ok(())
    }

    /// Fetch the user's appointments, role-scoped
    pub async fn get_appointments(&self, role: UserType) -> Result<Vec<Appointment>> {
        let endpoint = format!("/{}/appointments", role.as_str());
        let response: AppointmentsResponse = self.get(&endpoint).await?;
        Ok(response.into_list())
    }

    /// Fetch the comment thread for an appointment
    pub async fn get_comments(&self, role: UserType, appointment_id: i64) -> Result<Vec<Comment>> {
        let endpoint = format!("/{}/appointments/{}/comment", role.as_str(), appointment_id);
        let response: CommentsResponse = self.get(&endpoint).await?;
        Ok(response.comments)
    }

    /// Post a comment on an appointment
    pub async fn post_comment(
        &self,
        role: UserType,
        appointment_id: i64,
        comment: &str,
    ) -> Result<()> {
        let endpoint = format!("/{}/appointments/{}/comment", role.as_str(), appointment_id);
        let body = CreateCommentRequest {
            appointment_comment: comment.to_string(),
        };
        self.post(&endpoint, &body).await?;
        Ok(())
    }

    /// Delete one of the user's own comments
    pub async fn delete_comment(
        &self,
        role: UserType,
        appointment_id: i64,
        comment_id: i64,
    ) -> Result<()> {
        let endpoint = format!(
            "/{}/appointments/{}/comment/{}",
            role.as_str(),
            appointment_id,
            comment_id
        );
        self.delete(&endpoint).await
    }

    /// Fetch the instructor's programs (id, name, description)
    pub async fn get_programs(&self) -> Result<Vec<Program>> {
        self.get("/instructor/programs/descriptions").await
    }

    /// Fetch the persisted weekly time blocks for a program
    pub async fn get_program_times(&self, program_id: i64) -> Result<WeekTimes> {
        let endpoint = format!("/instructor/programs/times/{}", program_id);
        self.get(&endpoint).await
    }

    /// Push one weekday's time block change (set or cleared)
    pub async fn post_program_time(&self, update: &ProgramTimeUpdate) -> Result<()> {
        self.post("/instructor/programs/times", update).await?;
        Ok(())
    }
}

/// True when an error chain looks like a connectivity failure rather
/// than a backend rejection, so the UI can show the offline banner.
pub fn is_connectivity_error(err: &anyhow::Error) -> bool {
    let err_str = err.to_string().to_lowercase();
    err_str.contains("connection")
        || err_str.contains("network")
        || err_str.contains("dns")
        || err_str.contains("resolve")
        || err_str.contains("timeout")
        || err_str.contains("unreachable")
        || err_str.contains("error sending request")
        || err_str.contains("no route")
        || err_str.contains("failed to lookup")
}
