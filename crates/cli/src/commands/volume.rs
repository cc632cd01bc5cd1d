//! Volume Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use vxsdk_client::resources::{Volume, VolumeData};
use vxsdk_client::VxClient;

use super::ListArgs;
use crate::output::{print_item, print_list, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum VolumeCommands {
    /// List storage volumes
    List(ListArgs),

    /// Get volume details
    Get {
        /// Volume ID
        id: String,
    },
}

/// Volume display wrapper for serialization
#[derive(Serialize)]
pub struct VolumeDisplay {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub volume_type: String,
    pub state: String,
    pub capacity_gb: u64,
    pub free_gb: u64,
    pub retention_days: u32,
    pub enabled: bool,
}

impl From<&VolumeData> for VolumeDisplay {
    fn from(vol: &VolumeData) -> Self {
        Self {
            id: vol.id.to_string(),
            name: vol.name.to_string(),
            volume_type: vol.volume_type.to_string(),
            state: vol.state.to_string(),
            capacity_gb: vol.capacity_gb,
            free_gb: vol.free_gb(),
            retention_days: vol.retention_days,
            enabled: vol.is_enabled,
        }
    }
}

impl TableDisplay for VolumeDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Type", "State", "Capacity", "Free", "Retention", "Enabled"]
    }

    fn row(&self) -> Vec<String> {
        let retention = match self.retention_days {
            0 => "until full".to_string(),
            days => format!("{}d", days),
        };

        vec![
            self.id.clone(),
            self.name.clone(),
            self.volume_type.clone(),
            self.state.clone(),
            format!("{}GB", self.capacity_gb),
            format!("{}GB", self.free_gb),
            retention,
            self.enabled.to_string(),
        ]
    }
}

pub async fn execute(cmd: VolumeCommands, client: VxClient, format: OutputFormat) -> Result<()> {
    match cmd {
        VolumeCommands::List(args) => {
            let volumes = client.volumes(&args.to_query()).await?;
            let displays: Vec<VolumeDisplay> = volumes.iter().map(|v| VolumeDisplay::from(v.data())).collect();
            print_list(&displays, volumes.total_count, format);
        }

        VolumeCommands::Get { id } => {
            let vol: Volume = client.get(&id).await?;
            print_item(&VolumeDisplay::from(vol.data()), format);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retention_display() {
        let mut data = VolumeData {
            capacity_gb: 100,
            used_gb: 40,
            ..Default::default()
        };
        assert_eq!(VolumeDisplay::from(&data).row()[6], "until full");

        data.retention_days = 30;
        let row = VolumeDisplay::from(&data).row();
        assert_eq!(row[5], "60GB");
        assert_eq!(row[6], "30d");
    }
}
