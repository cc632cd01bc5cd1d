//! User Commands

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::debug;
use serde::Serialize;

use vxsdk_common::{BoundedString, NewUser};
use vxsdk_client::resources::UserData;
use vxsdk_client::VxClient;

use super::ListArgs;
use crate::output::{print_item, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum UserCommands {
    /// List users
    List(ListArgs),

    /// Create a user
    Create {
        /// Login name
        name: String,

        /// Initial password
        #[arg(long, env = "VX_NEW_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,

        #[arg(long, default_value = "")]
        email: String,

        /// Role to assign (repeatable)
        #[arg(long = "role")]
        roles: Vec<String>,

        /// Force a password change on first login
        #[arg(long)]
        must_change_password: bool,
    },
}

#[derive(Serialize)]
pub struct UserDisplay {
    pub id: String,
    pub name: String,
    pub full_name: String,
    pub email: String,
    pub locked: bool,
}

impl From<&UserData> for UserDisplay {
    fn from(user: &UserData) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.to_string(),
            full_name: user.full_name(),
            email: user.email.to_string(),
            locked: user.is_locked,
        }
    }
}

impl TableDisplay for UserDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Full Name", "Email", "Locked"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.full_name.clone(),
            self.email.clone(),
            self.locked.to_string(),
        ]
    }
}

fn bounded<const N: usize>(field: &str, value: &str) -> Result<BoundedString<N>> {
    BoundedString::for_field(field, value).with_context(|| format!("invalid {}", field))
}

pub async fn execute(cmd: UserCommands, client: VxClient, format: OutputFormat) -> Result<()> {
    match cmd {
        UserCommands::List(args) => {
            let users = client.users(&args.to_query()).await?;
            let displays: Vec<UserDisplay> = users.iter().map(|u| UserDisplay::from(u.data())).collect();
            print_list(&displays, users.total_count, format);
        }

        UserCommands::Create {
            name,
            password,
            first_name,
            last_name,
            email,
            roles,
            must_change_password,
        } => {
            let new_user = NewUser {
                name: bounded("name", &name)?,
                password: bounded("password", &password)?,
                first_name: bounded("firstName", &first_name)?,
                last_name: bounded("lastName", &last_name)?,
                email: bounded("email", &email)?,
                domain: Default::default(),
                must_change_password,
                role_ids: roles
                    .iter()
                    .map(|r| bounded("roleIds", r))
                    .collect::<Result<Vec<_>>>()?,
            };

            let policy = client.password_policy().await?;
            debug!("Checking password against policy (min length {})", policy.min_length);
            new_user.validate(&policy)?;

            let user = client.create_user(&new_user).await?;
            print_success(&format!("User '{}' created", user.name));
            print_item(&UserDisplay::from(user.data()), format);
        }
    }

    Ok(())
}
