//! CLI Commands

pub mod config;
pub mod device;
pub mod limits;
pub mod monitor;
pub mod rule;
pub mod user;
pub mod volume;

use clap::Args;
use vxsdk_client::{CollectionQuery, FilterKey};

/// Filtering and paging shared by `list` subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only items with this exact name
    #[arg(long)]
    pub name: Option<String>,

    /// Extra filter as key=value (repeatable)
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Index of the first item
    #[arg(long, default_value_t = 0)]
    pub start: usize,

    /// Page size
    #[arg(long, default_value_t = 50)]
    pub count: usize,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

impl ListArgs {
    pub fn to_query(&self) -> CollectionQuery {
        let mut query = CollectionQuery::new().page(self.start, self.count);
        if let Some(name) = &self.name {
            query = query.filter(FilterKey::Name, name.clone());
        }
        for (key, value) in &self.filters {
            query = query.filter(FilterKey::parse(key), value.clone());
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter("vendor=acme").unwrap(), ("vendor".into(), "acme".into()));
        assert_eq!(parse_filter("tags=a=b").unwrap(), ("tags".into(), "a=b".into()));
        assert!(parse_filter("novalue").is_err());
        assert!(parse_filter("=x").is_err());
    }

    #[test]
    fn test_list_args_query() {
        let args = ListArgs {
            name: Some("Lobby".into()),
            filters: vec![("state".into(), "online".into())],
            start: 10,
            count: 5,
        };
        let pairs = args.to_query().to_query_pairs();
        assert!(pairs.contains(&("name".to_string(), "Lobby".to_string())));
        assert!(pairs.contains(&("state".to_string(), "online".to_string())));
        assert!(pairs.contains(&("start".to_string(), "10".to_string())));
        assert!(pairs.contains(&("count".to_string(), "5".to_string())));
    }
}
