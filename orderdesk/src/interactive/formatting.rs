use std::fmt::Write;

use anyhow::Result;
use chrono::{DateTime, Datelike, Local, Timelike};
use marketplace_tools::Order;
use order_sync_engine::{sorter::creation_time, BoardStatus, BoardView, InventoryOutcome, SelectedInventory};
use prettytable::{
    format::{LinePosition, LineSeparator, TableFormat},
    row,
    Table,
};

/// Offset between the Gregorian and the Thai Buddhist calendar
const BUDDHIST_ERA_OFFSET: i32 = 543;

fn markdown_format() -> TableFormat {
    prettytable::format::FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separator(LinePosition::Title, LineSeparator::new('-', '|', '|', '|'))
        .padding(1, 1)
        .build()
}

fn markdown_style(table: &mut Table) {
    table.set_format(markdown_format());
}

/// `dd/mm/yyyy HH:MM:SS` with a Buddhist-era year, the way Thai users read dates.
pub fn thai_datetime<T: Datelike + Timelike>(dt: &T) -> String {
    format!(
        "{:02}/{:02}/{} {:02}:{:02}:{:02}",
        dt.day(),
        dt.month(),
        dt.year() + BUDDHIST_ERA_OFFSET,
        dt.hour(),
        dt.minute(),
        dt.second()
    )
}

/// The order's creation time in local time, or an empty string if the order has none.
pub fn format_created(order: &Order) -> String {
    creation_time(order)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| thai_datetime(&dt.with_timezone(&Local)))
        .unwrap_or_default()
}

pub fn format_orders(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "No orders found".to_string();
    }
    let mut table = Table::new();
    table.set_titles(row![
        "Platform",
        "Order number",
        "Total price",
        "Payment method",
        "Items",
        "Status",
        "Customer",
        "Created"
    ]);
    orders.iter().for_each(|order| {
        table.add_row(row![
            order.marketplace,
            order.order_number,
            order.total_price,
            order.payment_method,
            order.items_count,
            order.status,
            order.customer_name,
            format_created(order)
        ]);
    });
    markdown_style(&mut table);
    let items = format_order_items(orders);
    if items.is_empty() {
        format!("{table}\n")
    } else {
        format!("{table}\n## Items\n{items}")
    }
}

fn format_order_items(orders: &[Order]) -> String {
    let mut table = Table::new();
    table.set_titles(row!["Order number", "SKU", "Model SKU", "Paid price", "Item price", "Fulfillment SLA", "Image"]);
    for order in orders {
        for item in &order.items {
            table.add_row(row![
                order.order_number,
                item.sku,
                item.model_sku,
                item.paid_price,
                item.item_price,
                item.fulfillment_sla,
                item.product_main_image
            ]);
        }
    }
    if table.is_empty() {
        return String::new();
    }
    markdown_style(&mut table);
    format!("{table}\n")
}

pub fn format_board(view: &BoardView) -> String {
    match view.status() {
        BoardStatus::Loading => "Loading orders...".to_string(),
        BoardStatus::Failed => "Error: Failed to fetch orders".to_string(),
        BoardStatus::Empty => "No orders found".to_string(),
        BoardStatus::Ready => {
            let updated = view
                .last_updated
                .map(|t| thai_datetime(&t.with_timezone(&Local)))
                .unwrap_or_else(|| "never".to_string());
            format!("{}{} orders. Last updated {updated}", format_orders(&view.orders), view.orders.len())
        },
    }
}

pub fn format_inventory(selected: &SelectedInventory) -> Result<String> {
    let item = &selected.item;
    let mut f = String::new();
    writeln!(f, "===============================================================================")?;
    writeln!(f, "{} ({})", item.product_name, item.sku)?;
    writeln!(f, "Model SKU: {}  Barcode: {}", item.model_sku, item.barcode)?;
    writeln!(f, "Unit price: {:.2}  Cost: {:.2}", item.unit_price, item.cost)?;
    if !selected.image_url.is_empty() {
        writeln!(f, "Image: {}", selected.image_url)?;
    }
    writeln!(f, "===============================================================================")?;
    if item.branches.is_empty() {
        writeln!(f, "No branches stock this item")?;
        return Ok(f);
    }
    let mut table = Table::new();
    table.set_titles(row!["Branch", "Available", "In stock"]);
    item.branches.iter().for_each(|b| {
        table.add_row(row![b.branch_name, b.quantity, if b.has_stock { "Yes" } else { "No" }]);
    });
    markdown_style(&mut table);
    writeln!(f, "{table}")?;
    Ok(f)
}

pub fn format_inventory_outcome(outcome: &InventoryOutcome) -> Result<String> {
    match outcome {
        InventoryOutcome::Found(selected) => format_inventory(selected),
        InventoryOutcome::NotFound { sku } => Ok(format!("No inventory found for {sku}")),
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use chrono::{NaiveDate, Utc};
    use marketplace_tools::{Branch, InventoryItem, OrderItem};
    use order_sync_engine::FetchError;

    use super::*;

    fn order() -> Order {
        Order {
            marketplace: "Shopee".into(),
            order_number: "SHP-1".into(),
            total_price: "598.00".into(),
            status: "READY_TO_SHIP".into(),
            items: vec![OrderItem { sku: "MUG-WHT-01".into(), paid_price: "299.00".into(), ..Default::default() }],
            ..Default::default()
        }
    }

    #[test]
    fn buddhist_era_dates() {
        let dt = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(9, 5, 7).unwrap();
        assert_eq!(thai_datetime(&dt), "01/05/2567 09:05:07");
    }

    #[test]
    fn orders_without_a_timestamp_have_no_created_date() {
        assert_eq!(format_created(&order()), "");
        let mut o = order();
        o.create_time = Some(1714550400);
        assert!(format_created(&o).contains("/2567 "));
    }

    #[test]
    fn order_table_lists_items() {
        let table = format_orders(&[order()]);
        assert!(table.contains("| SHP-1 "));
        assert!(table.contains("## Items"));
        assert!(table.contains("MUG-WHT-01"));
        let mut bare = order();
        bare.items.clear();
        assert!(!format_orders(&[bare]).contains("## Items"));
    }

    #[test]
    fn board_states() {
        let mut view = BoardView { loading: true, ..Default::default() };
        assert_eq!(format_board(&view), "Loading orders...");
        view.loading = false;
        assert_eq!(format_board(&view), "No orders found");
        view.error = Some(FetchError::Decode("expected value".into()));
        assert_eq!(format_board(&view), "Error: Failed to fetch orders");
        view.error = None;
        view.orders = Arc::from(vec![order()]);
        view.last_updated = Some(Utc::now());
        let text = format_board(&view);
        assert!(text.contains("SHP-1"));
        assert!(text.contains("1 orders. Last updated"));
    }

    #[test]
    fn inventory_details() {
        let selected = SelectedInventory {
            item: InventoryItem {
                sku: "TS-BLK-L-01".into(),
                product_name: "Cotton T-Shirt Black L".into(),
                unit_price: 250.0,
                branches: vec![Branch { branch_name: "Khon Kaen".into(), quantity: 3, has_stock: true }],
                ..Default::default()
            },
            image_url: String::new(),
        };
        let text = format_inventory_outcome(&InventoryOutcome::Found(selected)).unwrap();
        assert!(text.contains("Cotton T-Shirt Black L (TS-BLK-L-01)"));
        assert!(text.contains("Unit price: 250.00"));
        assert!(text.contains("| Khon Kaen | 3 "));
        let text = format_inventory_outcome(&InventoryOutcome::NotFound { sku: "NOPE".into() }).unwrap();
        assert_eq!(text, "No inventory found for NOPE");
    }
}
