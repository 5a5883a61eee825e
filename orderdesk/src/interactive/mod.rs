use std::{fmt::Display, sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use dialoguer::{console::Style, theme::ColorfulTheme, Confirm, FuzzySelect, Input};
use indicatif::{ProgressBar, ProgressStyle};
use log::*;
use marketplace_tools::MarketplaceApi;
use order_sync_engine::{
    start_board,
    BoardHandle,
    InventoryDesk,
    InventoryOutcome,
    SelectedInventory,
    WithdrawalRequest,
};
use tokio::task::JoinHandle;
use url::Url;

use crate::{
    interactive::{
        formatting::{format_board, format_inventory_outcome},
        menus::*,
    },
    profile_manager::{read_config, write_config, Profile, Settings},
};

pub mod formatting;
pub mod menus;

/// The backend client and the live order board for one set of settings.
struct Connection {
    api: Arc<MarketplaceApi>,
    board: BoardHandle,
    board_task: JoinHandle<()>,
    inventory: InventoryDesk<MarketplaceApi>,
}

impl Connection {
    fn open(settings: &Settings) -> Result<Self> {
        let api = Arc::new(MarketplaceApi::new(settings.marketplace.clone())?);
        let (board, board_task) = start_board(Arc::clone(&api), settings.board.clone());
        let inventory = InventoryDesk::new(Arc::clone(&api));
        Ok(Self { api, board, board_task, inventory })
    }

    async fn close(self) {
        self.board.shutdown();
        if let Err(e) = self.board_task.await {
            warn!("🔄️ Order board did not shut down cleanly. {e}");
        }
    }
}

pub struct InteractiveApp {
    settings: Settings,
    connection: Connection,
    selected: Option<SelectedInventory>,
}

impl InteractiveApp {
    pub fn new(settings: Settings) -> Result<Self> {
        let connection = Connection::open(&settings)?;
        Ok(Self { settings, connection, selected: None })
    }

    pub fn menu_prompt(&self) -> String {
        let (title, _) = top_menu();
        let view = self.connection.board.view();
        let status =
            format!("{} ({}) · {} orders", self.settings.name, self.settings.marketplace.base_url, view.orders.len());
        format!("{title:<30}{status:50}")
    }

    pub async fn run(mut self) -> Result<()> {
        loop {
            let theme = ColorfulTheme { prompt_style: Style::new().magenta().bold(), ..ColorfulTheme::default() };
            let menu = top_menu();
            let i = FuzzySelect::with_theme(&theme).with_prompt(self.menu_prompt()).items(menu.1).interact()?;
            match menu.1[i] {
                SHOW_ORDERS => self.show_orders(),
                REFRESH => self.refresh().await,
                CHECK_INVENTORY => self.check_inventory().await,
                WITHDRAW_STOCK => self.withdraw_stock().await,
                SELECT_PROFILE => self.select_profile().await,
                ADD_PROFILE => handle_response(add_profile()),
                EXIT => break,
                _ => continue,
            }
        }
        self.connection.close().await;
        Ok(())
    }

    fn show_orders(&self) {
        println!("{}", format_board(&self.connection.board.view()));
    }

    async fn refresh(&self) {
        let res = self.refresh_board().await;
        handle_response(res)
    }

    async fn refresh_board(&self) -> Result<String> {
        let pb = spinner("Refreshing orders...")?;
        match self.connection.board.refresh_and_wait().await {
            Ok(view) => {
                pb.finish_with_message("Done!");
                Ok(format_board(&view))
            },
            Err(e) => {
                pb.finish_with_message("Error!");
                Err(e.into())
            },
        }
    }

    async fn check_inventory(&mut self) {
        let res = self.lookup_inventory().await;
        handle_response(res)
    }

    /// Asks which item to look up, either from the current order list or by hand, and remembers the result for a
    /// subsequent withdrawal.
    async fn lookup_inventory(&mut self) -> Result<String> {
        let theme = ColorfulTheme::default();
        let view = self.connection.board.view();
        let items = view.orders.iter().flat_map(|o| o.items.iter().map(move |item| (o, item))).collect::<Vec<_>>();
        let mut options = items
            .iter()
            .map(|(o, item)| format!("{} {} ({})", o.order_number, item.sku, item.model_sku))
            .collect::<Vec<_>>();
        options.push("Enter SKU manually".to_string());
        let choice = FuzzySelect::with_theme(&theme).with_prompt("Which item?").items(&options).interact()?;
        let (sku, model_sku, image_url) = match items.get(choice) {
            Some((_, item)) => (item.sku.clone(), item.model_sku.clone(), item.product_main_image.clone()),
            None => {
                let sku: String = Input::with_theme(&theme).with_prompt("SKU").interact_text()?;
                let model_sku: String = Input::with_theme(&theme).with_prompt("Model SKU").interact_text()?;
                let image_url: String =
                    Input::with_theme(&theme).with_prompt("Image URL").allow_empty(true).interact_text()?;
                (sku, model_sku, image_url)
            },
        };
        let outcome = self.connection.inventory.check(&sku, &model_sku, &image_url).await?;
        let text = format_inventory_outcome(&outcome)?;
        self.selected = match outcome {
            InventoryOutcome::Found(selected) => Some(selected),
            InventoryOutcome::NotFound { .. } => None,
        };
        Ok(text)
    }

    async fn withdraw_stock(&mut self) {
        let res = self.request_withdrawal().await;
        handle_response(res)
    }

    async fn request_withdrawal(&mut self) -> Result<String> {
        if self.selected.is_none() {
            println!("{}", self.lookup_inventory().await?);
        }
        let selected = self.selected.clone().ok_or_else(|| anyhow!("No inventory record selected"))?;
        let theme = ColorfulTheme::default();
        let branches = &selected.item.branches;
        if branches.is_empty() {
            return Err(anyhow!("{} is not stocked in any branch", selected.item.sku));
        }
        let options =
            branches.iter().map(|b| format!("{} ({} available)", b.branch_name, b.quantity)).collect::<Vec<_>>();
        let i = FuzzySelect::with_theme(&theme).with_prompt("Withdraw from").items(&options).interact()?;
        let branch = &branches[i];
        let available = branch.quantity;
        let quantity = Input::<i64>::with_theme(&theme)
            .with_prompt(format!("Quantity (1-{available})"))
            .default(1)
            .validate_with(|q: &i64| -> Result<(), String> {
                if (1..=available).contains(q) {
                    Ok(())
                } else {
                    Err(format!("Enter a quantity between 1 and {available}"))
                }
            })
            .interact_text()?;
        let request = WithdrawalRequest::new(&selected, &branch.branch_name, quantity)?;
        if !Confirm::with_theme(&theme).with_prompt(format!("Send \"{}\"?", request.message())).interact()? {
            return Err(anyhow!("Cancelled"));
        }
        let pb = spinner("Sending withdrawal request...")?;
        let recipient = self.settings.marketplace.line_recipient.as_deref();
        match request.send(self.connection.api.as_ref(), recipient).await {
            Ok(_) => {
                pb.finish_with_message("Done!");
                Ok(format!("Withdrawal request sent: {}", request.message()))
            },
            Err(e) => {
                pb.finish_with_message("Error!");
                Err(e.into())
            },
        }
    }

    async fn select_profile(&mut self) {
        let res = self.switch_profile().await;
        handle_response(res)
    }

    /// Replaces the current connection with one for the chosen profile. The old board is shut down.
    async fn switch_profile(&mut self) -> Result<String> {
        let theme = ColorfulTheme { values_style: Style::new().yellow().dim(), ..ColorfulTheme::default() };
        let profile = select_profile(&theme)?;
        let settings = Settings::from_profile(&profile);
        let connection = Connection::open(&settings)?;
        let old = std::mem::replace(&mut self.connection, connection);
        old.close().await;
        self.settings = settings;
        self.selected = None;
        Ok(format!("Switched to profile {}", profile.name))
    }
}

fn handle_response<T: Display>(res: Result<T>) {
    match res {
        Ok(res) => println!("{res}"),
        Err(e) => println!("Error: {}", e),
    }
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:5} {msg} [{elapsed}]")?
            .tick_strings(&["🕛 ", "🕐 ", "🕑 ", "🕒 ", "🕓 ", "🕔 ", "🕕 ", "🕖 ", "🕗 ", "🕘 ", "🕙 ", "🕚 "]),
    );
    pb.set_message(message);
    Ok(pb)
}

fn select_profile(theme: &ColorfulTheme) -> Result<Profile> {
    let user_data = read_config()?;
    if user_data.profiles.is_empty() {
        return Err(anyhow!("No profiles have been configured. Use '{ADD_PROFILE}' to create one."));
    }
    let options = user_data.profiles.iter().map(|p| format!("{} ({})", p.name, p.base_url)).collect::<Vec<String>>();
    let profile = FuzzySelect::with_theme(theme).with_prompt("Select profile").items(&options).interact().map(|i| {
        let profile = &user_data.profiles[i];
        profile.clone()
    })?;
    Ok(profile)
}

fn add_profile() -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut user_data = read_config()?;
    let name: String = Input::with_theme(&theme)
        .with_prompt("Profile name")
        .validate_with(|s: &String| -> Result<(), String> {
            if user_data.find(s).is_some() {
                Err(format!("A profile named {s} already exists"))
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    let base_url: String = Input::with_theme(&theme)
        .with_prompt("Backend URL")
        .default(marketplace_tools::DEFAULT_BASE_URL.to_string())
        .validate_with(|s: &String| Url::parse(s).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()?;
    let line_recipient: String =
        Input::with_theme(&theme).with_prompt("LINE recipient for withdrawals").allow_empty(true).interact_text()?;
    let poll_interval = Input::<u64>::with_theme(&theme)
        .with_prompt("Refresh interval (seconds)")
        .default(30)
        .validate_with(|s: &u64| if *s > 0 { Ok(()) } else { Err("Must be at least one second") })
        .interact_text()?;
    let profile = Profile {
        name: name.clone(),
        base_url: Url::parse(&base_url)?,
        line_recipient: Some(line_recipient).filter(|s| !s.trim().is_empty()),
        poll_interval: Some(poll_interval),
    };
    user_data.profiles.push(profile);
    write_config(&user_data)?;
    Ok(format!("Profile {name} saved"))
}
