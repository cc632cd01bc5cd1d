//! In-memory transport for tests and offline demos.
//!
//! `MockTransport` behaves like a small REST server. Paths with an even
//! number of segments (`monitors/m1`, `configuration/auth`) are resources;
//! paths with an odd number (`monitors`, `drawings/d1/markers`) are
//! collections. References between resources are stored as links:
//! `PUT parent/relation/id` links, `DELETE` unlinks, and `GET
//! parent/relation` returns the linked resources from the `relation`
//! collection.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use vxsdk_common::{Error, Limits, Result, ResultCategory, ResultCode};

use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

#[derive(Default)]
struct MockState {
    resources: BTreeMap<String, Value>,
    values: BTreeMap<String, Vec<Value>>,
    links: BTreeMap<String, BTreeSet<String>>,
    limits: BTreeMap<String, Limits>,
    failures: VecDeque<ResultCode>,
    offline: bool,
    requests: Vec<ApiRequest>,
    next_id: u64,
}

/// In-memory REST server
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

fn segments(path: &str) -> Vec<&str> {
    path.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect()
}

fn is_resource_path(path: &str) -> bool {
    let n = segments(path).len();
    n > 0 && n % 2 == 0
}

fn http_status(code: ResultCode) -> u16 {
    match code {
        ResultCode::Ok => 200,
        ResultCode::NotFound => 404,
        ResultCode::Conflict | ResultCode::AlreadyExists | ResultCode::HasDependents => 409,
        ResultCode::ResourceLocked => 423,
        ResultCode::Unauthenticated | ResultCode::AuthExpired | ResultCode::InvalidCredentials => 401,
        ResultCode::Timeout => 408,
        ResultCode::TooManyRequests => 429,
        ResultCode::NotReady => 503,
        code => match code.category() {
            ResultCategory::Authorization | ResultCategory::Licensing => 403,
            ResultCategory::Validation => 400,
            _ => 500,
        },
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a resource at `path`; its `id` field is set to the last segment
    pub fn insert(&self, path: &str, mut value: Value) {
        let path = path.trim_matches('/').to_string();
        if let (Some(obj), Some(id)) = (value.as_object_mut(), segments(&path).last()) {
            obj.entry("id").or_insert_with(|| json!(id));
        }
        self.state.lock().resources.insert(path, value);
    }

    /// Current server-side value of a resource
    pub fn get(&self, path: &str) -> Option<Value> {
        self.state.lock().resources.get(path.trim_matches('/')).cloned()
    }

    /// Overwrite one field of a stored resource, as another client would
    pub fn update_field(&self, path: &str, field: &str, value: Value) {
        if let Some(Value::Object(obj)) = self.state.lock().resources.get_mut(path.trim_matches('/')) {
            obj.insert(field.to_string(), value);
        }
    }

    /// Serve a collection of value objects at `path`
    pub fn insert_values(&self, path: &str, values: Vec<Value>) {
        self.state
            .lock()
            .values
            .insert(path.trim_matches('/').to_string(), values);
    }

    pub fn set_limits(&self, path: &str, limits: Limits) {
        self.state
            .lock()
            .limits
            .insert(path.trim_matches('/').to_string(), limits);
    }

    /// Link `id` into `parent/relation`
    pub fn link(&self, parent: &str, relation: &str, id: &str) {
        let key = format!("{}/{}", parent.trim_matches('/'), relation);
        self.state.lock().links.entry(key).or_default().insert(id.to_string());
    }

    pub fn linked_ids(&self, parent: &str, relation: &str) -> Vec<String> {
        let key = format!("{}/{}", parent.trim_matches('/'), relation);
        self.state
            .lock()
            .links
            .get(&key)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Make the next request fail with `code`
    pub fn fail_next(&self, code: ResultCode) {
        self.state.lock().failures.push_back(code);
    }

    /// Simulate an unreachable server
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.state.lock().requests.last().cloned()
    }
}

impl MockState {
    fn handle(&mut self, request: &ApiRequest) -> ApiResponse {
        let path = request.path.trim_matches('/').to_string();
        match request.method {
            Method::Get => self.get(&path, &request.query),
            Method::Post => self.create(&path, request.body.clone()),
            Method::Patch | Method::Put if is_resource_path(&path) && self.resources.contains_key(&path) => {
                self.patch(&path, request.body.clone())
            }
            Method::Put => self.add_link(&path),
            Method::Patch => ApiResponse::error(404, ResultCode::NotFound),
            Method::Delete => self.delete(&path),
        }
    }

    fn get(&self, path: &str, query: &[(String, String)]) -> ApiResponse {
        if let Some(base) = path.strip_suffix("/limits") {
            if self.resources.contains_key(base) {
                let limits = self.limits.get(base).cloned().unwrap_or_default();
                return ApiResponse::ok(json!(limits));
            }
        }

        if is_resource_path(path) {
            return match self.resources.get(path) {
                Some(value) => ApiResponse::ok(value.clone()),
                None => ApiResponse::error(404, ResultCode::NotFound),
            };
        }

        let items: Vec<Value> = if let Some(values) = self.values.get(path) {
            values.clone()
        } else if let Some(ids) = self.links.get(path) {
            let relation = segments(path).last().copied().unwrap_or_default();
            ids.iter()
                .filter_map(|id| self.resources.get(&format!("{}/{}", relation, id)).cloned())
                .collect()
        } else {
            let depth = segments(path).len() + 1;
            let prefix = format!("{}/", path);
            self.resources
                .iter()
                .filter(|(key, _)| key.starts_with(&prefix) && segments(key).len() == depth)
                .map(|(_, value)| value.clone())
                .collect()
        };

        page(items, query)
    }

    fn create(&mut self, path: &str, body: Option<Value>) -> ApiResponse {
        if is_resource_path(path) {
            return ApiResponse::error(400, ResultCode::InvalidParameters);
        }
        let mut obj = match body {
            Some(Value::Object(obj)) => obj,
            _ => return ApiResponse::error(400, ResultCode::MissingParameters),
        };
        if let Some(name) = obj.get("name").and_then(Value::as_str) {
            let taken = self.children(path).any(|v| v.get("name").and_then(Value::as_str) == Some(name));
            if taken {
                return ApiResponse::error(409, ResultCode::NameInUse);
            }
        }

        self.next_id += 1;
        let kind = segments(path).last().copied().unwrap_or("item").to_string();
        let id = format!("{}-{}", kind, self.next_id);
        obj.insert("id".to_string(), json!(id));
        let value = Value::Object(obj);
        self.resources.insert(format!("{}/{}", path, id), value.clone());
        ApiResponse::new(201, Some(value))
    }

    fn patch(&mut self, path: &str, body: Option<Value>) -> ApiResponse {
        let fields: Map<String, Value> = match body {
            Some(Value::Object(fields)) => fields,
            _ => return ApiResponse::error(400, ResultCode::MissingParameters),
        };
        if fields.contains_key("id") {
            return ApiResponse::error(400, ResultCode::ReadOnly);
        }
        if let Some(limits) = self.limits.get(path) {
            if fields.keys().any(|f| limits.is_read_only(f)) {
                return ApiResponse::error(400, ResultCode::ReadOnly);
            }
        }
        match self.resources.get_mut(path) {
            Some(Value::Object(obj)) => {
                obj.extend(fields);
                ApiResponse::ok(Value::Object(obj.clone()))
            }
            _ => ApiResponse::error(404, ResultCode::NotFound),
        }
    }

    fn add_link(&mut self, path: &str) -> ApiResponse {
        let segs = segments(path);
        if segs.len() < 4 {
            return ApiResponse::error(400, ResultCode::InvalidParameters);
        }
        let (relation, id) = (segs[segs.len() - 2], segs[segs.len() - 1]);
        let parent = segs[..segs.len() - 2].join("/");
        if !self.resources.contains_key(&parent)
            || !self.resources.contains_key(&format!("{}/{}", relation, id))
        {
            return ApiResponse::error(404, ResultCode::NotFound);
        }
        self.links
            .entry(format!("{}/{}", parent, relation))
            .or_default()
            .insert(id.to_string());
        ApiResponse::no_content()
    }

    fn delete(&mut self, path: &str) -> ApiResponse {
        let segs = segments(path);
        if segs.len() >= 4 {
            let link_key = segs[..segs.len() - 1].join("/");
            let id = segs[segs.len() - 1];
            if let Some(ids) = self.links.get_mut(&link_key) {
                if ids.remove(id) {
                    return ApiResponse::no_content();
                }
            }
        }

        if !self.resources.contains_key(path) {
            return ApiResponse::error(404, ResultCode::NotFound);
        }
        let referenced = self.links.iter().any(|(key, ids)| {
            let relation = segments(key).last().copied().unwrap_or_default();
            ids.iter().any(|id| format!("{}/{}", relation, id) == path)
        });
        if referenced {
            return ApiResponse::error(409, ResultCode::HasDependents);
        }

        let prefix = format!("{}/", path);
        self.resources.retain(|key, _| key != path && !key.starts_with(&prefix));
        self.links.retain(|key, _| !key.starts_with(&prefix));
        ApiResponse::no_content()
    }

    fn children<'a>(&'a self, path: &str) -> impl Iterator<Item = &'a Value> + 'a {
        let depth = segments(path).len() + 1;
        let prefix = format!("{}/", path);
        self.resources
            .iter()
            .filter(move |(key, _)| key.starts_with(&prefix) && segments(key).len() == depth)
            .map(|(_, value)| value)
    }
}

/// Apply `name` filtering and `start`/`count` paging; other keys are ignored
fn page(items: Vec<Value>, query: &[(String, String)]) -> ApiResponse {
    let param = |key: &str| query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());

    let matching: Vec<Value> = match param("name") {
        Some(name) => items
            .into_iter()
            .filter(|v| v.get("name").and_then(Value::as_str) == Some(name))
            .collect(),
        None => items,
    };
    let total = matching.len();
    let start = param("start").and_then(|s| s.parse().ok()).unwrap_or(0);
    let count = param("count").and_then(|s| s.parse().ok()).unwrap_or(usize::MAX);
    let items: Vec<Value> = matching.into_iter().skip(start).take(count).collect();

    ApiResponse::ok(json!({ "items": items, "totalCount": total }))
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut state = self.state.lock();
        state.requests.push(request.clone());
        if state.offline {
            return Err(Error::Communication("connection refused".to_string()));
        }
        if let Some(code) = state.failures.pop_front() {
            return Ok(ApiResponse::error(http_status(code), code));
        }
        Ok(state.handle(&request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn send(mock: &MockTransport, request: ApiRequest) -> ApiResponse {
        mock.execute(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_get_delete() {
        let mock = MockTransport::new();
        let created = send(&mock, ApiRequest::post("monitors", json!({"name": "wall"}))).await;
        assert_eq!(created.status, 201);
        let id = created.body.unwrap()["id"].as_str().unwrap().to_string();

        let fetched = send(&mock, ApiRequest::get(format!("monitors/{}", id))).await;
        assert_eq!(fetched.body.unwrap()["name"], "wall");

        let dup = send(&mock, ApiRequest::post("monitors", json!({"name": "wall"}))).await;
        assert_eq!(dup.into_result().unwrap_err().code(), ResultCode::NameInUse);

        let deleted = send(&mock, ApiRequest::delete(format!("monitors/{}", id))).await;
        assert_eq!(deleted.status, 204);
        let gone = send(&mock, ApiRequest::get(format!("monitors/{}", id))).await;
        assert_eq!(gone.status, 404);
    }

    #[tokio::test]
    async fn test_collection_paging() {
        let mock = MockTransport::new();
        for i in 0..5 {
            mock.insert(&format!("volumes/v{}", i), json!({"name": format!("vol{}", i)}));
        }
        let query = vec![("start".to_string(), "1".to_string()), ("count".to_string(), "2".to_string())];
        let resp = send(&mock, ApiRequest::get("volumes").with_query(query)).await;
        let body = resp.body.unwrap();
        assert_eq!(body["totalCount"], 5);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["items"][0]["id"], "v1");
    }

    #[tokio::test]
    async fn test_links_block_delete() {
        let mock = MockTransport::new();
        mock.insert("schedules/s1", json!({"name": "night"}));
        mock.insert("dataSources/d1", json!({"name": "cam"}));

        let linked = send(&mock, ApiRequest::new(Method::Put, "schedules/s1/dataSources/d1")).await;
        assert_eq!(linked.status, 204);

        let blocked = send(&mock, ApiRequest::delete("dataSources/d1")).await;
        assert_eq!(blocked.into_result().unwrap_err().code(), ResultCode::HasDependents);

        send(&mock, ApiRequest::delete("schedules/s1/dataSources/d1")).await;
        assert!(mock.linked_ids("schedules/s1", "dataSources").is_empty());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let mock = MockTransport::new();
        mock.fail_next(ResultCode::LicenseCountExceeded);
        let resp = send(&mock, ApiRequest::get("devices")).await;
        assert_eq!(resp.status, 403);
        assert_eq!(resp.into_result().unwrap_err().code(), ResultCode::LicenseCountExceeded);

        mock.set_offline(true);
        let err = mock.execute(ApiRequest::get("devices")).await.unwrap_err();
        assert_eq!(err.code(), ResultCode::CommunicationFailure);
        assert_eq!(mock.requests().len(), 2);
    }
}
