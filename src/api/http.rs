// src/api/http.rs

//! HTTP implementation of the backend API.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::WorkloadApi;
use crate::error::{AppError, Result};
use crate::models::{
    Activity, ApiConfig, ChecklistGroup, Credentials, Lecturer, LoginResponse, Session,
    UserProfile, VerificationStatus, WorkloadId, WorkloadSubmission,
};
use crate::utils::http::{check_status, create_async_client};
use crate::utils::{endpoint, with_segment};

/// Authenticated REST client.
///
/// The session is owned by the client and changes only through
/// [`HttpApi::login`] and [`HttpApi::logout`]. While a session is active its
/// bearer token is attached to every request except the login itself.
pub struct HttpApi {
    client: Client,
    base: Url,
    session: Option<Session>,
}

impl HttpApi {
    /// Create a client for the configured backend, with no session.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            base: config.base_url()?,
            session: None,
        })
    }

    /// Resume an existing session.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Authenticate and replace the current session.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<&Session> {
        credentials.check()?;

        let response = check_status(self.login_request(credentials)?.send().await?).await?;
        let session = Session::from_login(response.json::<LoginResponse>().await?)?;

        log::info!(
            "Logged in as {} ({})",
            session.username,
            session.role.display_name()
        );
        Ok(&*self.session.insert(session))
    }

    /// Drop the current session, returning it if there was one.
    pub fn logout(&mut self) -> Option<Session> {
        let session = self.session.take();
        if let Some(s) = &session {
            log::info!("Logged out {}", s.username);
        }
        session
    }

    /// Fetch the profile of the logged-in user.
    pub async fn fetch_profile(&self) -> Result<UserProfile> {
        self.read_json(self.profile_request()?).await
    }

    /// The login request never carries a bearer token.
    fn login_request(&self, credentials: &Credentials) -> Result<RequestBuilder> {
        let url = endpoint(&self.base, "auth/login")?;
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(credentials))
    }

    fn profile_request(&self) -> Result<RequestBuilder> {
        let session = self.session.as_ref().ok_or(AppError::Unauthenticated)?;
        let url = with_segment(endpoint(&self.base, "users")?, &session.username);
        Ok(self.request(Method::GET, url))
    }

    fn lecturer_request(&self, nic: &str) -> Result<RequestBuilder> {
        let url = with_segment(endpoint(&self.base, "visiting-lecturers")?, nic);
        Ok(self.request(Method::GET, url))
    }

    fn activities_request(&self) -> Result<RequestBuilder> {
        let url = endpoint(&self.base, "workloads/activities")?;
        Ok(self.request(Method::GET, url))
    }

    fn submit_request(&self, submission: &WorkloadSubmission) -> Result<RequestBuilder> {
        let url = endpoint(&self.base, "workloads/enter")?;
        Ok(self.request(Method::POST, url).json(submission))
    }

    fn checklist_request(&self, reference_number: &str) -> Result<RequestBuilder> {
        let mut url = endpoint(&self.base, "workloads/checklist")?;
        url.query_pairs_mut()
            .append_pair("referenceNumber", reference_number);
        Ok(self.request(Method::GET, url))
    }

    fn verify_request(
        &self,
        id: &WorkloadId,
        status: VerificationStatus,
    ) -> Result<RequestBuilder> {
        let mut url = with_segment(endpoint(&self.base, "workloads/verify")?, &id.0);
        url.query_pairs_mut().append_pair("status", status.as_str());
        Ok(self.request(Method::POST, url))
    }

    fn delete_request(&self, id: &WorkloadId) -> Result<RequestBuilder> {
        let url = with_segment(endpoint(&self.base, "workloads/delete")?, &id.0);
        Ok(self.request(Method::DELETE, url))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        log::debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.session {
            Some(session) => builder.bearer_auth(&session.token),
            None => builder,
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_for_ack(&self, builder: RequestBuilder) -> Result<String> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.text().await?)
    }
}

/// Turn a 404 into `AppError::NotFound`, keeping backend detail when given.
fn not_found_on_404(err: AppError, fallback: &str) -> AppError {
    match err {
        AppError::Network {
            status: Some(code),
            message,
        } if code == StatusCode::NOT_FOUND.as_u16() => {
            let generic = StatusCode::NOT_FOUND.canonical_reason().unwrap_or_default();
            if message.is_empty() || message == generic {
                AppError::not_found(fallback)
            } else {
                AppError::not_found(message)
            }
        }
        other => other,
    }
}

#[async_trait]
impl WorkloadApi for HttpApi {
    async fn lookup_lecturer(&self, nic: &str) -> Result<Lecturer> {
        self.read_json(self.lecturer_request(nic)?)
            .await
            .map_err(|e| not_found_on_404(e, "Lecturer not found."))
    }

    async fn list_activities(&self) -> Result<Vec<Activity>> {
        self.read_json(self.activities_request()?).await
    }

    async fn submit_workload(&self, submission: &WorkloadSubmission) -> Result<String> {
        self.send_for_ack(self.submit_request(submission)?).await
    }

    async fn fetch_checklist(&self, reference_number: &str) -> Result<Vec<ChecklistGroup>> {
        self.read_json(self.checklist_request(reference_number)?)
            .await
            .map_err(|e| not_found_on_404(e, "No workload checklist available."))
    }

    async fn set_verification(&self, id: &WorkloadId, status: VerificationStatus) -> Result<()> {
        self.send_for_ack(self.verify_request(id, status)?).await?;
        Ok(())
    }

    async fn delete_workload(&self, id: &WorkloadId) -> Result<()> {
        self.send_for_ack(self.delete_request(id)?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use reqwest::Request;
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

    fn api() -> HttpApi {
        HttpApi::new(&ApiConfig::default()).unwrap()
    }

    fn logged_in() -> HttpApi {
        api().with_session(Session {
            token: "tok-123".to_string(),
            username: "jdoe".to_string(),
            role: Role::Admin,
            started_at: chrono::Utc::now(),
        })
    }

    fn build(builder: Result<RequestBuilder>) -> Request {
        builder.unwrap().build().unwrap()
    }

    fn authorization(request: &Request) -> Option<&str> {
        request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }

    fn json_body(request: &Request) -> serde_json::Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_verify_request_posts_target_status() {
        let api = logged_in();
        let id = WorkloadId::from("42");

        let verify = build(api.verify_request(&id, VerificationStatus::Verified));
        assert_eq!(verify.method(), &Method::POST);
        assert_eq!(
            verify.url().as_str(),
            "http://localhost:8080/api/workloads/verify/42?status=VERIFIED"
        );
        assert_eq!(authorization(&verify), Some("Bearer tok-123"));

        let unverify = build(api.verify_request(&id, VerificationStatus::NotVerified));
        assert_eq!(
            unverify.url().as_str(),
            "http://localhost:8080/api/workloads/verify/42?status=NOT_VERIFIED"
        );
    }

    #[test]
    fn test_delete_request_targets_workload_id() {
        let request = build(logged_in().delete_request(&WorkloadId::from("W 7")));
        assert_eq!(request.method(), &Method::DELETE);
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8080/api/workloads/delete/W%207"
        );
        assert_eq!(authorization(&request), Some("Bearer tok-123"));
    }

    #[test]
    fn test_checklist_request_encodes_reference_number() {
        let request = build(logged_in().checklist_request("REF 001/A"));
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.url().path(), "/api/workloads/checklist");
        assert_eq!(request.url().query(), Some("referenceNumber=REF+001%2FA"));
    }

    #[test]
    fn test_lookup_and_activity_paths() {
        let api = logged_in();

        let lookup = build(api.lecturer_request("123456789V"));
        assert_eq!(lookup.method(), &Method::GET);
        assert_eq!(
            lookup.url().as_str(),
            "http://localhost:8080/api/visiting-lecturers/123456789V"
        );

        let activities = build(api.activities_request());
        assert_eq!(
            activities.url().as_str(),
            "http://localhost:8080/api/workloads/activities"
        );
    }

    #[test]
    fn test_submit_request_sends_json_payload() {
        let submission = WorkloadSubmission {
            reference_number: "REF-001".to_string(),
            number_of_groups: 1,
            group_numbers: vec!["A1".to_string()],
            activity_id: "3".into(),
            activity_number: 1,
            workload_hours: 5,
        };
        let request = build(logged_in().submit_request(&submission));

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8080/api/workloads/enter"
        );
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(json_body(&request)["activityId"], serde_json::json!("3"));
        assert_eq!(json_body(&request)["groupNumbers"], serde_json::json!(["A1"]));
    }

    #[test]
    fn test_login_request_never_carries_token() {
        let request = build(logged_in().login_request(&Credentials::new("jdoe", "secret")));
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8080/api/auth/login"
        );
        assert!(authorization(&request).is_none());
        assert_eq!(
            json_body(&request),
            serde_json::json!({"username": "jdoe", "password": "secret"})
        );
    }

    #[test]
    fn test_token_attached_only_with_session() {
        let anonymous = build(api().activities_request());
        assert!(authorization(&anonymous).is_none());

        let mut api = logged_in();
        assert!(authorization(&build(api.activities_request())).is_some());

        api.logout();
        assert!(authorization(&build(api.activities_request())).is_none());
    }

    #[test]
    fn test_profile_request_targets_session_user() {
        let request = build(logged_in().profile_request());
        assert_eq!(request.url().as_str(), "http://localhost:8080/api/users/jdoe");
        assert!(matches!(
            api().profile_request(),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn test_new_client_has_no_session() {
        let api = HttpApi::new(&ApiConfig::default()).unwrap();
        assert!(api.session().is_none());
        assert_eq!(api.base_url().as_str(), "http://localhost:8080/api/");
    }

    #[test]
    fn test_logout_without_session() {
        let mut api = HttpApi::new(&ApiConfig::default()).unwrap();
        assert!(api.logout().is_none());
    }

    #[tokio::test]
    async fn test_login_rejects_blank_credentials_locally() {
        let mut api = HttpApi::new(&ApiConfig::default()).unwrap();
        let err = api.login(&Credentials::new("", "")).await.unwrap_err();
        assert!(err.is_validation());
        assert!(api.session().is_none());
    }

    #[tokio::test]
    async fn test_profile_requires_session() {
        let api = HttpApi::new(&ApiConfig::default()).unwrap();
        assert!(matches!(
            api.fetch_profile().await,
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn test_not_found_mapping() {
        let generic = not_found_on_404(
            AppError::network(Some(404), "Not Found"),
            "Lecturer not found.",
        );
        assert!(generic.is_not_found());
        assert_eq!(generic.to_string(), "Lecturer not found.");

        let detailed = not_found_on_404(
            AppError::network(Some(404), "No lecturer with NIC 123"),
            "Lecturer not found.",
        );
        assert_eq!(detailed.to_string(), "No lecturer with NIC 123");

        let other = not_found_on_404(AppError::network(Some(500), "boom"), "x");
        assert!(other.is_network());
    }
}
