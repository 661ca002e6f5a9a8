use crate::roster::{Assignment, AssignmentStatus, Period, WeeklyTemplate};
use chrono::{NaiveDate, Weekday};
use thiserror::Error;
use serde::{Deserialize, Serialize};
use async_trait::async_trait;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Slot conflict: {0}")]
    Conflict(String),
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Parse error: {0}")]
    ParseError(String),
}

pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Every date in the range, both endpoints included.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}

/// A single half-day (or full-day) slot request as the backend models it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRequest {
    pub employee_id: String,
    pub date: NaiveDate,
    pub period: Period,
    pub template_id: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatedRequestInfo {
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct CreatedTemplateInfo {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiAssignment {
    id: Option<String>,
    #[serde(rename = "employeeId")]
    employee_id: Option<String>,
    date: Option<String>,
    period: Option<String>,
    room: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssignmentListResponse {
    items: Option<Vec<ApiAssignment>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiTemplate {
    id: Option<String>,
    name: Option<String>,
    #[serde(rename = "ownerId")]
    owner_id: Option<String>,
    days: ApiTemplateDays,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ApiTemplateDays {
    monday: Option<String>,
    tuesday: Option<String>,
    wednesday: Option<String>,
    thursday: Option<String>,
    friday: Option<String>,
    saturday: Option<String>,
    sunday: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TemplateListResponse {
    items: Option<Vec<ApiTemplate>>,
}

#[derive(Debug, Serialize)]
struct ApiNewRequest {
    date: String,
    period: String,
    #[serde(rename = "templateId", skip_serializing_if = "Option::is_none")]
    template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchedulingApi {
    async fn fetch_assignments(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Assignment>, ApiError>;

    async fn fetch_templates(
        &self,
        employee_id: &str,
    ) -> Result<Vec<WeeklyTemplate>, ApiError>;

    async fn create_template(
        &self,
        template: &WeeklyTemplate,
    ) -> Result<CreatedTemplateInfo, ApiError>;

    async fn create_request(
        &self,
        request: &NewRequest,
    ) -> Result<CreatedRequestInfo, ApiError>;
}

pub struct PracticeApiClient {
    base_url: String,
    auth_token: String,
    client: reqwest::Client,
}

impl PracticeApiClient {
    pub fn new(base_url: String, auth_token: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            client: reqwest::Client::new(),
        }
    }

    fn convert_from_api_assignment(
        &self,
        aa: ApiAssignment,
        employee_id: &str,
    ) -> Result<Assignment, ApiError> {
        let date_str = aa
            .date
            .ok_or_else(|| ApiError::ParseError("Missing assignment date".to_string()))?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| ApiError::ParseError(format!("Invalid date: {}", e)))?;

        let period_code = aa
            .period
            .ok_or_else(|| ApiError::ParseError("Missing assignment period".to_string()))?;
        let period = Period::from_wire_code(&period_code)
            .ok_or_else(|| ApiError::ParseError(format!("Unknown period: {}", period_code)))?;

        let status = match aa.status.as_deref() {
            Some("confirmed") => AssignmentStatus::Confirmed,
            Some("pending") => AssignmentStatus::Pending,
            Some("declined") => AssignmentStatus::Declined,
            _ => AssignmentStatus::Confirmed,
        };

        Ok(Assignment {
            id: aa
                .id
                .ok_or_else(|| ApiError::ParseError("Missing assignment id".to_string()))?,
            employee_id: aa.employee_id.unwrap_or_else(|| employee_id.to_string()),
            date,
            period,
            room: aa.room,
            status,
        })
    }

    fn convert_from_api_template(&self, at: ApiTemplate) -> Result<WeeklyTemplate, ApiError> {
        let day = |code: &Option<String>| code.as_deref().and_then(Period::from_wire_code);

        Ok(WeeklyTemplate {
            id: at
                .id
                .ok_or_else(|| ApiError::ParseError("Missing template id".to_string()))?,
            name: at.name.unwrap_or_default(),
            owner_id: at.owner_id.unwrap_or_default(),
            days: [
                day(&at.days.monday),
                day(&at.days.tuesday),
                day(&at.days.wednesday),
                day(&at.days.thursday),
                day(&at.days.friday),
                day(&at.days.saturday),
                day(&at.days.sunday),
            ],
        })
    }

    fn convert_to_api_template(&self, template: &WeeklyTemplate, include_id: bool) -> ApiTemplate {
        let code = |weekday: Weekday| {
            template
                .period_for(weekday)
                .map(|p| p.wire_code().to_string())
        };

        ApiTemplate {
            id: include_id.then(|| template.id.clone()),
            name: Some(template.name.clone()),
            owner_id: Some(template.owner_id.clone()),
            days: ApiTemplateDays {
                monday: code(Weekday::Mon),
                tuesday: code(Weekday::Tue),
                wednesday: code(Weekday::Wed),
                thursday: code(Weekday::Thu),
                friday: code(Weekday::Fri),
                saturday: code(Weekday::Sat),
                sunday: code(Weekday::Sun),
            },
        }
    }
}

#[async_trait]
impl SchedulingApi for PracticeApiClient {
    async fn fetch_assignments(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Assignment>, ApiError> {
        let url = format!("{}/employees/{}/assignments", self.base_url, employee_id);
        let date_param = date.format("%Y-%m-%d").to_string();

        tracing::debug!("Fetching assignments for {} on {}", employee_id, date_param);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.auth_token)
            .query(&[("date", date_param.as_str())])
            .send()
            .await?;

        let status = response.status();

        if status == 401 {
            tracing::error!("Authentication failed when fetching assignments");
            return Err(ApiError::AuthenticationFailed);
        }

        if status == 404 {
            tracing::error!("Employee not found: {}", employee_id);
            return Err(ApiError::NotFound(employee_id.to_string()));
        }

        if status == 429 {
            tracing::warn!("Rate limit exceeded");
            return Err(ApiError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("Failed to fetch assignments. Status: {}, Body: {}", status, body);
            return Err(ApiError::RequestError(format!("Status {}: {}", status, body)));
        }

        let list: AssignmentListResponse = response.json().await?;

        let assignments: Vec<Assignment> = list
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|aa| self.convert_from_api_assignment(aa, employee_id).ok())
            .collect();

        Ok(assignments)
    }

    async fn fetch_templates(
        &self,
        employee_id: &str,
    ) -> Result<Vec<WeeklyTemplate>, ApiError> {
        let url = format!("{}/employees/{}/templates", self.base_url, employee_id);

        tracing::info!("Fetching templates for {}", employee_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.auth_token)
            .send()
            .await?;

        let status = response.status();

        if status == 401 {
            return Err(ApiError::AuthenticationFailed);
        }

        if status == 404 {
            return Err(ApiError::NotFound(employee_id.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("Failed to fetch templates. Status: {}, Body: {}", status, body);
            return Err(ApiError::RequestError(format!("Status {}: {}", status, body)));
        }

        let list: TemplateListResponse = response.json().await?;

        let templates: Vec<WeeklyTemplate> = list
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|at| self.convert_from_api_template(at).ok())
            .collect();

        tracing::info!("Fetched {} templates", templates.len());
        Ok(templates)
    }

    async fn create_template(
        &self,
        template: &WeeklyTemplate,
    ) -> Result<CreatedTemplateInfo, ApiError> {
        let url = format!("{}/employees/{}/templates", self.base_url, template.owner_id);
        let api_template = self.convert_to_api_template(template, false);

        tracing::info!("Creating template: {}", template.name);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.auth_token)
            .json(&api_template)
            .send()
            .await?;

        let status = response.status();

        if status == 401 {
            return Err(ApiError::AuthenticationFailed);
        }

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("Failed to create template. Status: {}, Body: {}", status, body);
            return Err(ApiError::RequestError(format!("Status {}: {}", status, body)));
        }

        let created: CreatedResponse = response.json().await?;
        let id = created.id.unwrap_or_default();
        tracing::info!("Template created with ID: {}", id);

        Ok(CreatedTemplateInfo { id })
    }

    async fn create_request(
        &self,
        request: &NewRequest,
    ) -> Result<CreatedRequestInfo, ApiError> {
        let url = format!("{}/employees/{}/requests", self.base_url, request.employee_id);
        let body = ApiNewRequest {
            date: request.date.format("%Y-%m-%d").to_string(),
            period: request.period.wire_code().to_string(),
            template_id: request.template_id.clone(),
            reason: request.reason.clone(),
        };

        tracing::info!(
            "Creating slot request: {} {} for {}",
            body.date,
            body.period,
            request.employee_id
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.auth_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == 401 {
            tracing::error!("Authentication failed when creating request");
            return Err(ApiError::AuthenticationFailed);
        }

        if status == 404 {
            return Err(ApiError::NotFound(request.employee_id.clone()));
        }

        if status == 409 {
            let body = response.text().await?;
            tracing::warn!("Slot request rejected as conflicting: {}", body);
            return Err(ApiError::Conflict(body));
        }

        if status == 429 {
            tracing::warn!("Rate limit exceeded");
            return Err(ApiError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("Failed to create request. Status: {}, Body: {}", status, body);
            return Err(ApiError::RequestError(format!("Status {}: {}", status, body)));
        }

        let created: CreatedResponse = response.json().await?;
        Ok(CreatedRequestInfo {
            id: created.id.unwrap_or_default(),
        })
    }
}
