//! Monitor Commands

use anyhow::Result;
use clap::Subcommand;
use tracing::debug;
use serde::Serialize;

use vxsdk_client::resources::{Monitor, MonitorData};
use vxsdk_client::VxClient;

use super::ListArgs;
use crate::output::{print_item, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum MonitorCommands {
    /// List monitors
    List(ListArgs),

    /// Get monitor details
    Get {
        /// Monitor ID
        id: String,
    },

    /// Rename a monitor
    Rename {
        /// Monitor ID
        id: String,

        /// New name
        name: String,
    },

    /// Delete a monitor from the server
    Delete {
        /// Monitor ID
        id: String,
    },
}

#[derive(Serialize)]
pub struct MonitorDisplay {
    pub id: String,
    pub name: String,
    pub number: u32,
    pub layout: String,
    pub cells: usize,
    pub resolution: String,
}

impl From<&MonitorData> for MonitorDisplay {
    fn from(monitor: &MonitorData) -> Self {
        Self {
            id: monitor.id.to_string(),
            name: monitor.name.to_string(),
            number: monitor.number,
            layout: monitor.layout.to_string(),
            cells: monitor.cells.len(),
            resolution: format!("{}x{}", monitor.resolution.width, monitor.resolution.height),
        }
    }
}

impl TableDisplay for MonitorDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Number", "Layout", "Cells", "Resolution"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.number.to_string(),
            self.layout.clone(),
            self.cells.to_string(),
            self.resolution.clone(),
        ]
    }
}

pub async fn execute(cmd: MonitorCommands, client: VxClient, format: OutputFormat) -> Result<()> {
    match cmd {
        MonitorCommands::List(args) => {
            let monitors = client.monitors(&args.to_query()).await?;
            let displays: Vec<MonitorDisplay> = monitors.iter().map(|m| MonitorDisplay::from(m.data())).collect();
            print_list(&displays, monitors.total_count, format);
        }

        MonitorCommands::Get { id } => {
            let monitor: Monitor = client.get(&id).await?;
            print_item(&MonitorDisplay::from(monitor.data()), format);
        }

        MonitorCommands::Rename { id, name } => {
            let mut monitor: Monitor = client.get(&id).await?;
            debug!("Renaming monitor '{}' from '{}'", id, monitor.name);
            monitor.set_name(&name).await?;
            print_success(&format!("Monitor '{}' renamed to '{}'", id, name));
            print_item(&MonitorDisplay::from(monitor.data()), format);
        }

        MonitorCommands::Delete { id } => {
            let monitor: Monitor = client.get(&id).await?;
            debug!("Deleting monitor at {}", monitor.path());
            monitor.delete_remote().await.map_err(|(_, e)| e)?;
            print_success(&format!("Monitor '{}' deleted", id));
        }
    }

    Ok(())
}
