//! Route table
//!
//! Routes are matched in registration order. A path pattern is a list of
//! `/`-separated segments, each one of:
//!
//! - a literal (`scan`)
//! - a named parameter (`:id`), matching exactly one segment
//! - a catch-all (`:pathMatch(.*)*`), matching the remaining segments, including none

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{Result, RouterError};

/// Path pattern of the not-found route
pub const CATCH_ALL_PATH: &str = "/:pathMatch(.*)*";

/// Static per-route attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl RouteMeta {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// One entry of the route table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub path: String,
    pub name: String,
    /// Identifier the host's view loader resolves to a page
    pub component: String,
    #[serde(default)]
    pub meta: RouteMeta,
}

impl RouteRecord {
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            component: component.into(),
            meta: RouteMeta::default(),
        }
    }

    pub fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }
}

/// A path resolved against the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub record: RouteRecord,
    /// Normalized path without query or fragment
    pub path: String,
    /// Path as requested, including query and fragment
    pub full_path: String,
    pub params: HashMap<String, String>,
}

impl RouteMatch {
    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn meta(&self) -> &RouteMeta {
        &self.record.meta
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    CatchAll(String),
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    record: RouteRecord,
    segments: Vec<Segment>,
}

impl CompiledRoute {
    fn compile(record: RouteRecord) -> Result<Self> {
        if !record.path.starts_with('/') {
            return Err(RouterError::InvalidRoute(format!(
                "path must start with '/': {}",
                record.path
            )));
        }

        let raw: Vec<&str> = split_segments(&record.path);
        let mut segments = Vec::with_capacity(raw.len());

        for (index, segment) in raw.iter().enumerate() {
            let Some(param) = segment.strip_prefix(':') else {
                segments.push(Segment::Static(segment.to_string()));
                continue;
            };

            match param.split_once('(') {
                None if !param.is_empty() => segments.push(Segment::Param(param.to_string())),
                Some((name, ".*)*")) if !name.is_empty() => {
                    if index + 1 != raw.len() {
                        return Err(RouterError::InvalidRoute(format!(
                            "catch-all must be the last segment: {}",
                            record.path
                        )));
                    }
                    segments.push(Segment::CatchAll(name.to_string()));
                }
                _ => {
                    return Err(RouterError::InvalidRoute(format!(
                        "unsupported segment '{}' in {}",
                        segment, record.path
                    )))
                }
            }
        }

        Ok(Self { record, segments })
    }

    fn matches(&self, path_segments: &[&str]) -> Option<HashMap<String, String>> {
        let mut params = HashMap::new();

        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Static(expected) => {
                    if path_segments.get(index) != Some(&expected.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = path_segments.get(index)?;
                    params.insert(name.clone(), decode(value));
                }
                Segment::CatchAll(name) => {
                    let rest: Vec<String> =
                        path_segments[index..].iter().map(|s| decode(s)).collect();
                    params.insert(name.clone(), rest.join("/"));
                    return Some(params);
                }
            }
        }

        (path_segments.len() == self.segments.len()).then_some(params)
    }
}

/// Ordered, validated list of routes
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    /// Compile a route list. Names must be unique.
    pub fn new(records: Vec<RouteRecord>) -> Result<Self> {
        let mut names = HashSet::new();
        let mut routes = Vec::with_capacity(records.len());

        for record in records {
            if !names.insert(record.name.clone()) {
                return Err(RouterError::InvalidRoute(format!(
                    "duplicate route name: {}",
                    record.name
                )));
            }
            routes.push(CompiledRoute::compile(record)?);
        }

        Ok(Self { routes })
    }

    /// The control panel's pages plus the not-found fallback.
    pub fn default_routes() -> Vec<RouteRecord> {
        vec![
            RouteRecord::new("/", "Home", "Home")
                .with_meta(RouteMeta::titled("首页").with_icon("House")),
            RouteRecord::new("/scan", "Scan", "Scan")
                .with_meta(RouteMeta::titled("扫描管理").with_icon("Search")),
            RouteRecord::new("/schedule", "Schedule", "Schedule")
                .with_meta(RouteMeta::titled("定时任务").with_icon("Timer")),
            RouteRecord::new("/logs", "Logs", "Logs")
                .with_meta(RouteMeta::titled("日志查看").with_icon("Document")),
            RouteRecord::new("/settings", "Settings", "Settings")
                .with_meta(RouteMeta::titled("设置").with_icon("Setting")),
            RouteRecord::new(CATCH_ALL_PATH, "NotFound", "NotFound")
                .with_meta(RouteMeta::titled("页面未找到")),
        ]
    }

    pub fn records(&self) -> impl Iterator<Item = &RouteRecord> {
        self.routes.iter().map(|route| &route.record)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First route matching `full_path`; query and fragment are ignored.
    pub fn resolve(&self, full_path: &str) -> Option<RouteMatch> {
        let path = normalize(strip_query(full_path));
        let segments = split_segments(&path);

        self.routes.iter().find_map(|route| {
            route.matches(&segments).map(|params| RouteMatch {
                record: route.record.clone(),
                path: path.clone(),
                full_path: full_path.to_string(),
                params,
            })
        })
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteRecord> {
        self.records().find(|record| record.name == name)
    }

    /// Build the path of a named route, filling in its parameters.
    pub fn href(&self, name: &str, params: &HashMap<String, String>) -> Result<String> {
        let route = self
            .routes
            .iter()
            .find(|route| route.record.name == name)
            .ok_or_else(|| RouterError::UnknownRouteName(name.to_string()))?;

        let mut parts = Vec::with_capacity(route.segments.len());
        for segment in &route.segments {
            match segment {
                Segment::Static(text) => parts.push(text.clone()),
                Segment::Param(param) => {
                    let value = params.get(param).ok_or_else(|| RouterError::MissingParam {
                        route: name.to_string(),
                        param: param.clone(),
                    })?;
                    parts.push(urlencoding::encode(value).into_owned());
                }
                Segment::CatchAll(param) => {
                    if let Some(rest) = params.get(param).filter(|rest| !rest.is_empty()) {
                        parts.push(rest.trim_matches('/').to_string());
                    }
                }
            }
        }

        Ok(format!("/{}", parts.join("/")))
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn normalize(path: &str) -> String {
    format!("/{}", split_segments(path).join("/"))
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        let mut routes = RouteTable::default_routes();
        routes.insert(
            5,
            RouteRecord::new("/schedule/:taskId", "TaskDetail", "Schedule"),
        );
        RouteTable::new(routes).unwrap()
    }

    #[test]
    fn test_default_routes() {
        let table = RouteTable::new(RouteTable::default_routes()).unwrap();
        assert_eq!(table.len(), 6);

        let scan = table.resolve("/scan").unwrap();
        assert_eq!(scan.name(), "Scan");
        assert_eq!(scan.meta().title.as_deref(), Some("扫描管理"));
        assert_eq!(scan.meta().icon.as_deref(), Some("Search"));

        assert_eq!(table.resolve("/").unwrap().name(), "Home");
    }

    #[test]
    fn test_resolve_normalizes_path() {
        let table = table();
        let logs = table.resolve("/logs/?level=ERROR#top").unwrap();
        assert_eq!(logs.name(), "Logs");
        assert_eq!(logs.path, "/logs");
        assert_eq!(logs.full_path, "/logs/?level=ERROR#top");
    }

    #[test]
    fn test_param_segment() {
        let table = table();
        let detail = table.resolve("/schedule/nightly%20scan").unwrap();
        assert_eq!(detail.name(), "TaskDetail");
        assert_eq!(detail.param("taskId"), Some("nightly scan"));
    }

    #[test]
    fn test_catch_all() {
        let table = table();
        let missing = table.resolve("/does/not/exist").unwrap();
        assert_eq!(missing.name(), "NotFound");
        assert_eq!(missing.param("pathMatch"), Some("does/not/exist"));

        let missing = table.resolve("/scan/extra").unwrap();
        assert_eq!(missing.name(), "NotFound");
    }

    #[test]
    fn test_no_match_without_catch_all() {
        let table = RouteTable::new(vec![RouteRecord::new("/", "Home", "Home")]).unwrap();
        assert!(table.resolve("/scan").is_none());
    }

    #[test]
    fn test_href() {
        let table = table();
        let mut params = HashMap::new();
        assert_eq!(table.href("Scan", &params).unwrap(), "/scan");
        assert_eq!(table.href("NotFound", &params).unwrap(), "/");

        assert_eq!(
            table.href("TaskDetail", &params),
            Err(RouterError::MissingParam {
                route: "TaskDetail".to_string(),
                param: "taskId".to_string(),
            })
        );

        params.insert("taskId".to_string(), "tv daily".to_string());
        assert_eq!(
            table.href("TaskDetail", &params).unwrap(),
            "/schedule/tv%20daily"
        );

        assert!(matches!(
            table.href("Missing", &params),
            Err(RouterError::UnknownRouteName(_))
        ));
    }

    #[test]
    fn test_invalid_routes() {
        let duplicate = RouteTable::new(vec![
            RouteRecord::new("/", "Home", "Home"),
            RouteRecord::new("/home", "Home", "Home"),
        ]);
        assert!(matches!(duplicate, Err(RouterError::InvalidRoute(_))));

        let relative = RouteTable::new(vec![RouteRecord::new("scan", "Scan", "Scan")]);
        assert!(matches!(relative, Err(RouterError::InvalidRoute(_))));

        let trailing = RouteTable::new(vec![RouteRecord::new(
            "/:rest(.*)*/more",
            "Bad",
            "Bad",
        )]);
        assert!(matches!(trailing, Err(RouterError::InvalidRoute(_))));

        let regex = RouteTable::new(vec![RouteRecord::new("/:id(\\d+)", "Bad", "Bad")]);
        assert!(matches!(regex, Err(RouterError::InvalidRoute(_))));
    }
}
