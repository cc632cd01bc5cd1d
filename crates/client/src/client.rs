//! Root client for a VMS server

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use vxsdk_common::{
    Collection, CollectionQuery, FilterKey, Limits, Name, NewBookmark, NewDrawing, NewMonitor,
    NewReportTemplate, NewRole, NewRule, NewSchedule, NewUser, NewVolume, PasswordPolicy, Result,
    Timestamp,
};

use crate::config::ClientConfig;
use crate::configuration::{fetch_area, AuthConfigData, SystemConfiguration};
use crate::handle::{check_id, ensure_known, identified, query_page, Handle};
use crate::http::HttpTransport;
use crate::resources::*;
use crate::transport::{ApiRequest, Transport};

/// Filters accepted by [`VxClient::devices`]
pub const DEVICE_FILTERS: &[FilterKey] = &[
    FilterKey::AdvancedQuery,
    FilterKey::AllTags,
    FilterKey::Id,
    FilterKey::Name,
    FilterKey::Type,
    FilterKey::State,
    FilterKey::Ip,
    FilterKey::Model,
    FilterKey::Vendor,
    FilterKey::Tags,
];

/// Filters accepted by [`VxClient::data_sources`]
pub const DATA_SOURCE_FILTERS: &[FilterKey] = &[
    FilterKey::AdvancedQuery,
    FilterKey::AllTags,
    FilterKey::Id,
    FilterKey::Name,
    FilterKey::Number,
    FilterKey::Type,
    FilterKey::State,
    FilterKey::Tags,
];

/// Filters accepted by [`VxClient::monitors`]
pub const MONITOR_FILTERS: &[FilterKey] = &[FilterKey::Id, FilterKey::Name, FilterKey::Number];

/// Filters accepted by [`VxClient::schedules`] and [`VxClient::rules`]
pub const AUTOMATION_FILTERS: &[FilterKey] = &[FilterKey::Id, FilterKey::Name, FilterKey::Enabled];

/// Filters accepted by [`VxClient::volumes`]
pub const VOLUME_FILTERS: &[FilterKey] = &[FilterKey::Id, FilterKey::Name, FilterKey::Type, FilterKey::State];

/// Filters accepted by [`VxClient::analytic_configs`]
pub const ANALYTIC_CONFIG_FILTERS: &[FilterKey] = &[FilterKey::Id, FilterKey::Name, FilterKey::Enabled];

/// Filters accepted by [`VxClient::report_templates`]
pub const REPORT_TEMPLATE_FILTERS: &[FilterKey] = &[FilterKey::Id, FilterKey::Name, FilterKey::Type];

/// Filters accepted by [`VxClient::users`] and [`VxClient::roles`]
pub const ACCOUNT_FILTERS: &[FilterKey] = &[FilterKey::Id, FilterKey::Name, FilterKey::Owner];

/// Filters accepted by [`VxClient::bookmarks`]
pub const BOOKMARK_FILTERS: &[FilterKey] = &[
    FilterKey::Id,
    FilterKey::Owner,
    FilterKey::StartTime,
    FilterKey::EndTime,
    FilterKey::ModifiedSince,
];

/// Filters accepted by [`VxClient::drawings`]
pub const DRAWING_FILTERS: &[FilterKey] = &[FilterKey::Id, FilterKey::Name];

/// Server identity and health as reported by `system/status`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemStatus {
    pub name: Name,
    pub version: Name,
    pub is_healthy: bool,
    pub server_time: Timestamp,
}

/// Entry point to the API: top-level collections and creation calls
#[derive(Clone)]
pub struct VxClient {
    transport: Arc<dyn Transport>,
}

impl VxClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Connect over HTTP using `config`
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config)?;
        info!(base_url = %config.base_url, "client configured");
        Ok(Self::new(Arc::new(transport)))
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    async fn list<R: ResourceData>(&self, query: &CollectionQuery, allowed: &[FilterKey]) -> Result<Collection<Handle<R>>> {
        let page: Collection<R> = query_page(self.transport.as_ref(), R::COLLECTION, query, allowed).await?;
        Ok(page.map(|data| Handle::top_level(self.transport.clone(), data)))
    }

    async fn create<R: ResourceData, P: Serialize>(&self, payload: &P) -> Result<Handle<R>> {
        let body = serde_json::to_value(payload)?;
        let data: R = self
            .transport
            .execute(ApiRequest::post(R::COLLECTION, body))
            .await?
            .json()?;
        let data = identified(R::COLLECTION, data)?;
        debug!(collection = R::COLLECTION, id = data.id(), "created");
        Ok(Handle::top_level(self.transport.clone(), data))
    }

    /// Fetch one top-level resource by id
    pub async fn get<R: ResourceData>(&self, id: &str) -> Result<Handle<R>> {
        let id = check_id("id", id)?;
        Handle::fetch(self.transport.clone(), format!("{}/{}", R::COLLECTION, id)).await
    }

    pub async fn devices(&self, query: &CollectionQuery) -> Result<Collection<Device>> {
        self.list(query, DEVICE_FILTERS).await
    }

    pub async fn data_sources(&self, query: &CollectionQuery) -> Result<Collection<DataSource>> {
        self.list(query, DATA_SOURCE_FILTERS).await
    }

    pub async fn monitors(&self, query: &CollectionQuery) -> Result<Collection<Monitor>> {
        self.list(query, MONITOR_FILTERS).await
    }

    pub async fn schedules(&self, query: &CollectionQuery) -> Result<Collection<Schedule>> {
        self.list(query, AUTOMATION_FILTERS).await
    }

    pub async fn rules(&self, query: &CollectionQuery) -> Result<Collection<Rule>> {
        self.list(query, AUTOMATION_FILTERS).await
    }

    pub async fn volumes(&self, query: &CollectionQuery) -> Result<Collection<Volume>> {
        self.list(query, VOLUME_FILTERS).await
    }

    pub async fn analytic_configs(&self, query: &CollectionQuery) -> Result<Collection<AnalyticConfig>> {
        self.list(query, ANALYTIC_CONFIG_FILTERS).await
    }

    pub async fn report_templates(&self, query: &CollectionQuery) -> Result<Collection<ReportTemplate>> {
        self.list(query, REPORT_TEMPLATE_FILTERS).await
    }

    pub async fn users(&self, query: &CollectionQuery) -> Result<Collection<User>> {
        self.list(query, ACCOUNT_FILTERS).await
    }

    pub async fn roles(&self, query: &CollectionQuery) -> Result<Collection<Role>> {
        self.list(query, ACCOUNT_FILTERS).await
    }

    pub async fn bookmarks(&self, query: &CollectionQuery) -> Result<Collection<Bookmark>> {
        self.list(query, BOOKMARK_FILTERS).await
    }

    pub async fn drawings(&self, query: &CollectionQuery) -> Result<Collection<Drawing>> {
        self.list(query, DRAWING_FILTERS).await
    }

    pub async fn create_monitor(&self, monitor: &NewMonitor) -> Result<Monitor> {
        ensure_known("layout", monitor.layout)?;
        self.create(monitor).await
    }

    pub async fn create_rule(&self, rule: &NewRule) -> Result<Rule> {
        self.create(rule).await
    }

    /// Create a user.
    ///
    /// The password is checked by the server; call [`NewUser::validate`]
    /// with [`VxClient::password_policy`] to catch violations before sending.
    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        self.create(user).await
    }

    pub async fn create_schedule(&self, schedule: &NewSchedule) -> Result<Schedule> {
        ensure_known("action", schedule.action)?;
        schedule.time_range.validate()?;
        self.create(schedule).await
    }

    pub async fn create_bookmark(&self, bookmark: &NewBookmark) -> Result<Bookmark> {
        if bookmark.is_locked {
            bookmark.lock_range.validate()?;
        }
        self.create(bookmark).await
    }

    pub async fn create_role(&self, role: &NewRole) -> Result<Role> {
        self.create(role).await
    }

    pub async fn create_drawing(&self, drawing: &NewDrawing) -> Result<Drawing> {
        self.create(drawing).await
    }

    pub async fn create_volume(&self, volume: &NewVolume) -> Result<Volume> {
        ensure_known("type", volume.volume_type)?;
        self.create(volume).await
    }

    pub async fn create_report_template(&self, template: &NewReportTemplate) -> Result<ReportTemplate> {
        ensure_known("format", template.format)?;
        self.create(template).await
    }

    /// Field limits of any resource, addressed by collection name and id
    pub async fn limits(&self, collection: &str, id: &str) -> Result<Limits> {
        let path = format!("{}/{}/limits", collection.trim_matches('/'), id);
        self.transport.execute(ApiRequest::get(path)).await?.json()
    }

    /// Fetch every system configuration area
    pub async fn configuration(&self) -> Result<SystemConfiguration> {
        SystemConfiguration::fetch(self.transport.clone()).await
    }

    /// Password rules new and changed passwords must satisfy
    pub async fn password_policy(&self) -> Result<PasswordPolicy> {
        let auth = fetch_area::<AuthConfigData>(self.transport.clone()).await?;
        Ok(auth.into_data().password_policy)
    }

    /// Check that the server is reachable and report its status
    pub async fn health_check(&self) -> Result<SystemStatus> {
        self.transport.execute(ApiRequest::get("system/status")).await?.json()
    }
}
