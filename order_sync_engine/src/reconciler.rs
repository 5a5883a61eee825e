use std::sync::Arc;

use marketplace_tools::Order;

/// The list the board displays. Cloning it is cheap, and keeping the same allocation across polls is how the board
/// signals "nothing changed".
pub type OrderList = Arc<[Order]>;

/// Two lists are equivalent when they have the same length and, position by position, the same order number and
/// status. Prices, customer names and line items are deliberately not compared.
pub fn orders_equivalent(a: &[Order], b: &[Order]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.order_number == y.order_number && x.status == y.status)
}

/// Returns `previous` untouched if `incoming` is equivalent to it, otherwise `incoming`.
pub fn reconcile(previous: OrderList, incoming: OrderList) -> OrderList {
    if orders_equivalent(&previous, &incoming) {
        previous
    } else {
        incoming
    }
}

#[cfg(test)]
mod test {
    use marketplace_tools::OrderNumber;

    use super::*;

    fn order(number: OrderNumber, status: &str, price: &str) -> Order {
        Order { order_number: number, status: status.into(), total_price: price.into(), ..Default::default() }
    }

    fn list(orders: Vec<Order>) -> OrderList {
        orders.into()
    }

    #[test]
    fn price_changes_are_ignored() {
        let previous = list(vec![order("SO-1".into(), "pending", "100.00"), order(2.into(), "shipped", "50")]);
        let incoming = list(vec![order("SO-1".into(), "pending", "120.00"), order(2.into(), "shipped", "55")]);
        let result = reconcile(previous.clone(), incoming);
        assert!(Arc::ptr_eq(&result, &previous));
        assert_eq!(result[0].total_price, "100.00");
    }

    #[test]
    fn a_status_change_replaces_the_list() {
        let previous = list(vec![order("SO-1".into(), "pending", "100"), order(2.into(), "shipped", "50")]);
        let incoming = list(vec![order("SO-1".into(), "pending", "100"), order(2.into(), "delivered", "50")]);
        let result = reconcile(previous.clone(), incoming.clone());
        assert!(Arc::ptr_eq(&result, &incoming));
    }

    #[test]
    fn a_length_change_replaces_the_list() {
        let previous = list(vec![order(1.into(), "pending", "1"), order(2.into(), "pending", "1")]);
        let incoming =
            list(vec![order(1.into(), "pending", "1"), order(2.into(), "pending", "1"), order(3.into(), "pending", "1")]);
        let result = reconcile(previous, incoming.clone());
        assert!(Arc::ptr_eq(&result, &incoming));
    }

    #[test]
    fn order_numbers_must_match_in_kind() {
        let previous = list(vec![order(1001.into(), "pending", "1")]);
        let incoming = list(vec![order("1001".into(), "pending", "1")]);
        assert!(!orders_equivalent(&previous, &incoming));
    }

    #[test]
    fn reordering_is_a_change() {
        let a = order(1.into(), "pending", "1");
        let b = order(2.into(), "pending", "1");
        assert!(!orders_equivalent(&[a.clone(), b.clone()], &[b, a]));
        assert!(orders_equivalent(&[], &[]));
    }
}
