use std::fmt::Display;

use clap::Parser;
use dotenvy::dotenv;

mod cli;
mod commands;
mod interactive;
mod profile_manager;

use crate::{
    cli::{display_envs, Arguments, Command},
    interactive::InteractiveApp,
    profile_manager::load_settings,
};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let cli = Arguments::parse();
    match cli.command {
        Command::Orders(args) => {
            let res = match load_settings(args.profile.as_deref()) {
                Ok(settings) => commands::print_orders(settings).await,
                Err(e) => Err(e),
            };
            handle_response(res)
        },
        Command::Watch(args) => {
            let res = match load_settings(args.profile.as_deref()) {
                Ok(settings) => commands::watch_orders(settings).await.map(|_| "Bye!"),
                Err(e) => Err(e),
            };
            handle_response(res)
        },
        Command::Inventory { item, profile } => {
            let res = match load_settings(profile.profile.as_deref()) {
                Ok(settings) => commands::print_inventory(settings, item).await,
                Err(e) => Err(e),
            };
            handle_response(res)
        },
        Command::Withdraw { item, branch, quantity, profile } => {
            let res = match load_settings(profile.profile.as_deref()) {
                Ok(settings) => commands::withdraw(settings, item, &branch, quantity).await,
                Err(e) => Err(e),
            };
            handle_response(res)
        },
        Command::Interactive(args) => {
            let res = match load_settings(args.profile.as_deref()).and_then(InteractiveApp::new) {
                Ok(app) => app.run().await.map(|_| "Bye!"),
                Err(e) => Err(e),
            };
            handle_response(res)
        },
        Command::Env => display_envs(),
    }
}

fn handle_response<T: Display>(res: anyhow::Result<T>) {
    match res {
        Ok(res) => println!("{res}"),
        Err(e) => eprintln!("Error: {e}"),
    }
}
