//! Device Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use vxsdk_client::resources::{Device, DeviceData};
use vxsdk_client::VxClient;

use super::ListArgs;
use crate::output::{print_item, print_list, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum DeviceCommands {
    /// List devices
    List(ListArgs),

    /// Get device details
    Get {
        /// Device ID
        id: String,
    },
}

/// Device display wrapper for serialization
#[derive(Serialize)]
pub struct DeviceDisplay {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub state: String,
    pub vendor: String,
    pub model: String,
    pub ip: String,
    pub commissioned: bool,
}

impl From<&DeviceData> for DeviceDisplay {
    fn from(device: &DeviceData) -> Self {
        Self {
            id: device.id.to_string(),
            name: device.name.to_string(),
            device_type: device.device_type.to_string(),
            state: device.state.to_string(),
            vendor: device.vendor.to_string(),
            model: device.model.to_string(),
            ip: device.ip.to_string(),
            commissioned: device.is_commissioned,
        }
    }
}

impl TableDisplay for DeviceDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Type", "State", "Vendor", "Model", "IP", "Commissioned"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.device_type.clone(),
            self.state.clone(),
            self.vendor.clone(),
            self.model.clone(),
            self.ip.clone(),
            self.commissioned.to_string(),
        ]
    }
}

pub async fn execute(cmd: DeviceCommands, client: VxClient, format: OutputFormat) -> Result<()> {
    match cmd {
        DeviceCommands::List(args) => {
            let devices = client.devices(&args.to_query()).await?;
            let displays: Vec<DeviceDisplay> = devices.iter().map(|d| DeviceDisplay::from(d.data())).collect();
            print_list(&displays, devices.total_count, format);
        }

        DeviceCommands::Get { id } => {
            let device: Device = client.get(&id).await?;
            print_item(&DeviceDisplay::from(device.data()), format);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vxsdk_common::{DeviceState, DeviceType};

    #[test]
    fn test_device_row() {
        let data = DeviceData {
            id: "dev-1".parse().unwrap(),
            name: "Lobby".parse().unwrap(),
            device_type: DeviceType::Camera,
            state: DeviceState::Online,
            ..Default::default()
        };
        let row = DeviceDisplay::from(&data).row();
        assert_eq!(row.len(), DeviceDisplay::headers().len());
        assert_eq!(row[2], "camera");
        assert_eq!(row[3], "online");
    }
}
