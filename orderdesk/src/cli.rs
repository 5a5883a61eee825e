use std::env::{self, VarError};

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Keep an eye on marketplace orders from the terminal")]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[clap(name = "orders", about = "Fetch the current orders once and print them, newest first")]
    Orders(ProfileArgs),
    #[clap(name = "watch", about = "Keep the order list on screen, refreshing it in the background")]
    Watch(ProfileArgs),
    #[clap(name = "inventory", about = "Check branch stock for an item")]
    Inventory {
        #[command(flatten)]
        item: ItemArgs,
        #[command(flatten)]
        profile: ProfileArgs,
    },
    #[clap(name = "withdraw", about = "Ask for stock to be withdrawn from a branch")]
    Withdraw {
        #[command(flatten)]
        item: ItemArgs,
        /// The branch to withdraw from
        #[arg(short = 'b', long = "branch")]
        branch: String,
        /// How many items to withdraw. Must not exceed the branch's stock.
        #[arg(short = 'q', long = "quantity", default_value = "1")]
        quantity: i64,
        #[command(flatten)]
        profile: ProfileArgs,
    },
    #[clap(name = "interactive", about = "Menu-driven dashboard")]
    Interactive(ProfileArgs),
    #[clap(name = "env", about = "Print the environment variables orderdesk reads")]
    Env,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Use this profile from ~/.orderdesk/config.toml instead of the OD_* environment variables
    #[arg(short = 'p', long = "profile")]
    pub profile: Option<String>,
}

#[derive(Debug, Args)]
pub struct ItemArgs {
    /// The item's SKU
    pub sku: String,
    /// The item's model SKU
    pub model_sku: String,
    /// Product image to attach to messages about this item
    #[arg(short = 'i', long = "image")]
    pub image: Option<String>,
}

pub fn display_envs() {
    const DISPLAY_ENVS: [&str; 4] = ["RUST_LOG", "OD_BASE_URL", "OD_LINE_RECIPIENT", "OD_POLL_INTERVAL"];

    println!("Current environment values:");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
