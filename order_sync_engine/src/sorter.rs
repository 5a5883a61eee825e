//! Deterministic ordering of a freshly fetched order list.
//!
//! Orders are sorted newest first by their effective creation time, then by descending order number. Ties beyond that
//! keep the order the backend sent them in.
//!
//! The effective creation time is `create_time` when present, otherwise `created_at` converted to epoch seconds.
//! Orders with neither (or with a `created_at` that cannot be parsed) are placed at epoch zero, i.e. last.
//!
//! String order numbers are reduced to their digits before being parsed ("SO-1001" becomes 1001). Order numbers that
//! yield no number at all sort after every order number that does, within the same creation time.
use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use marketplace_tools::{Order, OrderNumber};

const NAIVE_DATETIME_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Sorts the orders into display order. The sort is stable, so calling this on an already sorted list is a no-op.
pub fn sort_orders(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by_cached_key(|o| (Reverse(effective_timestamp(o)), Reverse(order_number_key(&o.order_number))));
    orders
}

/// The creation time of the order in epoch seconds, if the order carries one that can be understood.
pub fn creation_time(order: &Order) -> Option<i64> {
    order.create_time.or_else(|| order.created_at.as_deref().and_then(parse_created_at))
}

pub fn effective_timestamp(order: &Order) -> i64 {
    creation_time(order).unwrap_or(0)
}

/// Numeric sort key for an order number. `None` means "not a number".
pub fn order_number_key(number: &OrderNumber) -> Option<i128> {
    match number {
        OrderNumber::Number(n) => Some(i128::from(*n)),
        OrderNumber::Text(s) => {
            let digits = s.chars().filter(char::is_ascii_digit).collect::<String>();
            digits.parse::<i128>().ok()
        },
        OrderNumber::Missing => None,
    }
}

/// Parses the ISO-like `created_at` strings the marketplaces send. Values without an offset are taken to be UTC.
pub fn parse_created_at(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.timestamp());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc().timestamp());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}
