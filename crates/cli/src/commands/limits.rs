//! Field limits of any resource

use anyhow::Result;
use clap::Args;
use tracing::debug;
use serde::Serialize;

use vxsdk_common::LimitRef;
use vxsdk_client::VxClient;

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct LimitsArgs {
    /// Collection name, e.g. `monitors` or `dataSources`
    pub collection: String,

    /// Resource ID
    pub id: String,
}

#[derive(Serialize)]
pub struct LimitDisplay {
    pub field: String,
    pub kind: &'static str,
    pub read_only: bool,
    pub constraint: String,
}

fn range<T: std::fmt::Display>(min: &Option<T>, max: &Option<T>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{}..={}", min, max),
        (Some(min), None) => format!(">= {}", min),
        (None, Some(max)) => format!("<= {}", max),
        (None, None) => String::new(),
    }
}

impl From<LimitRef<'_>> for LimitDisplay {
    fn from(limit: LimitRef<'_>) -> Self {
        let (kind, constraint) = match limit {
            LimitRef::Boolean(_) => ("boolean", String::new()),
            LimitRef::Float(l) => ("float", range(&l.min, &l.max)),
            LimitRef::Integer(l) => ("integer", range(&l.min, &l.max)),
            LimitRef::List(l) => {
                let mut text = l.options.join("|");
                if let Some(max) = l.max_items {
                    text = format!("{} (max {})", text, max);
                }
                ("list", text)
            }
            LimitRef::Object(_) => ("object", String::new()),
            LimitRef::String(l) => match l.max_length {
                _ if !l.options.is_empty() => ("string", l.options.join("|")),
                Some(max) => ("string", format!("len <= {}", max)),
                None => ("string", String::new()),
            },
        };

        Self {
            field: limit.field_name().to_string(),
            kind,
            read_only: limit.read_only(),
            constraint,
        }
    }
}

impl TableDisplay for LimitDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Field", "Kind", "Read Only", "Constraint"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.field.clone(),
            self.kind.to_string(),
            self.read_only.to_string(),
            self.constraint.clone(),
        ]
    }
}

pub async fn execute(args: LimitsArgs, client: VxClient, format: OutputFormat) -> Result<()> {
    let limits = client.limits(&args.collection, &args.id).await?;
    debug!("Fetched {} field limits for {}/{}", limits.iter().count(), args.collection, args.id);
    let displays: Vec<LimitDisplay> = limits.iter().map(LimitDisplay::from).collect();
    print_list(&displays, displays.len(), format);
    Ok(())
}
