//! Order line validation, point distribution and the delivery batch rules.
//!
//! Clients submit the full price breakdown they displayed to the shopper;
//! the server recomputes every figure from the persisted product prices and
//! rejects any mismatch. Points are then spread over the lines so that the
//! per-line records always sum back to the order totals.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};
use crate::pricing;
use crate::reconcile::points::distribute;
use crate::reconcile::rules;
use crate::types::DbId;

/// Order item statuses. Option changes are allowed only before the item
/// reaches delivery preparation.
pub mod status {
    pub const DEPOSIT_WAITING: i32 = 100;
    pub const PAYMENT_COMPLETE: i32 = 101;
    pub const DELIVERY_PREPARING: i32 = 200;
    pub const DELIVERY_PROGRESSING: i32 = 201;
    pub const DELIVERY_COMPLETE: i32 = 202;
    pub const PURCHASE_CONFIRMED: i32 = 203;

    pub fn allows_option_change(status: i32) -> bool {
        status == DEPOSIT_WAITING || status == PAYMENT_COMPLETE
    }
}

/// One order line as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
    pub option: DbId,
    pub count: i64,
    pub sale_price: i64,
    pub base_discounted_price: i64,
    pub membership_discount_price: i64,
    /// Issued coupon applied to this line, at most one per order.
    #[serde(default)]
    pub shopper_coupon: Option<DbId>,
    #[serde(default)]
    pub coupon_discount_price: i64,
    pub payment_price: i64,
}

/// Per-unit prices of an option's product, loaded for validation.
#[derive(Debug, Clone)]
pub struct OptionPricing {
    pub product: DbId,
    pub sale_price: i64,
    pub base_discounted_price: i64,
}

/// A validated order line with points applied, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedItem {
    pub option: DbId,
    pub count: i64,
    pub sale_price: i64,
    /// Discount amount, not the discounted price.
    pub base_discount_price: i64,
    pub membership_discount_price: i64,
    pub shopper_coupon: Option<DbId>,
    pub coupon_discount_price: i64,
    pub used_point: i64,
    pub payment_price: i64,
    pub earned_point: i64,
}

fn price_mismatch(field: &'static str, option: DbId) -> CoreError {
    CoreError::validation(
        field,
        format!("{field} of option {option} is different from the actual price."),
    )
}

/// Check every submitted line against the persisted product prices.
///
/// `pricing_by_option` must hold per-unit prices for each referenced option;
/// missing entries are treated as nonexistent options. `coupon_rates` maps
/// the shopper's usable coupons to their discount rate; a referenced coupon
/// missing from it reads as nonexistent.
pub fn validate_items(
    items: &[OrderItemRequest],
    pricing_by_option: &HashMap<DbId, OptionPricing>,
    membership_discount_rate: i64,
    coupon_rates: &HashMap<DbId, i64>,
) -> CoreResult<()> {
    rules::check_batch_duplicates("items", "option", items.iter().map(|i| i.option))?;
    rules::check_known_ids(
        "items",
        "option",
        items.iter().map(|i| i.option),
        &pricing_by_option.keys().copied().collect(),
    )?;
    rules::check_batch_duplicates(
        "items",
        "shopper_coupon",
        items.iter().filter_map(|i| i.shopper_coupon),
    )?;
    rules::check_known_ids(
        "items",
        "shopper_coupon",
        items.iter().filter_map(|i| i.shopper_coupon),
        &coupon_rates.keys().copied().collect(),
    )?;

    for item in items {
        let Some(actual) = pricing_by_option.get(&item.option) else {
            continue;
        };

        if item.sale_price != actual.sale_price * item.count {
            return Err(price_mismatch("sale_price", item.option));
        }
        if item.base_discounted_price != actual.base_discounted_price * item.count {
            return Err(price_mismatch("base_discounted_price", item.option));
        }
        let membership = pricing::membership_discount_price(
            actual.base_discounted_price,
            membership_discount_rate,
            item.count,
        );
        if item.membership_discount_price != membership {
            return Err(price_mismatch("membership_discount_price", item.option));
        }
        let coupon = match item.shopper_coupon.and_then(|id| coupon_rates.get(&id)) {
            Some(rate) => pricing::coupon_discount_price(
                actual.base_discounted_price,
                *rate,
                item.count,
            ),
            None => 0,
        };
        if item.coupon_discount_price != coupon {
            return Err(price_mismatch("coupon_discount_price", item.option));
        }
        if item.payment_price != item.base_discounted_price - membership - coupon {
            return Err(price_mismatch("payment_price", item.option));
        }
    }

    Ok(())
}

/// Check the order-level totals against the validated lines.
pub fn validate_totals(
    items: &[OrderItemRequest],
    used_point: i64,
    actual_payment_price: i64,
    earned_point: i64,
    shopper_point: i64,
) -> CoreResult<()> {
    let total_payment: i64 = items.iter().map(|i| i.payment_price).sum();

    if actual_payment_price != total_payment - used_point || actual_payment_price <= 0 {
        return Err(CoreError::validation(
            "actual_payment_price",
            "actual_payment_price is calculated incorrectly.",
        ));
    }
    if used_point < 0 {
        return Err(CoreError::validation(
            "used_point",
            "used_point cannot be negative.",
        ));
    }
    if used_point > shopper_point {
        return Err(CoreError::validation(
            "used_point",
            "The shopper has less point than used_point.",
        ));
    }
    if earned_point != pricing::earned_point(actual_payment_price) {
        return Err(CoreError::validation(
            "earned_point",
            "earned_point is calculated incorrectly.",
        ));
    }

    Ok(())
}

/// Spread `used_point` over the lines, net it out of each payment, then
/// spread the earned points over the net payments.
///
/// Call after [`validate_items`] and [`validate_totals`]; the totals check
/// guarantees a positive payment total.
pub fn price_items(items: &[OrderItemRequest], used_point: i64) -> CoreResult<Vec<PricedItem>> {
    let gross: Vec<i64> = items.iter().map(|i| i.payment_price).collect();

    let used = if used_point == 0 {
        vec![0; items.len()]
    } else {
        distribute(used_point, &gross)?
    };

    let net: Vec<i64> = gross.iter().zip(&used).map(|(g, u)| g - u).collect();

    let total_earned = pricing::earned_point(net.iter().sum());
    let earned = if total_earned == 0 {
        vec![0; items.len()]
    } else {
        distribute(total_earned, &net)?
    };

    Ok(items
        .iter()
        .enumerate()
        .map(|(i, item)| PricedItem {
            option: item.option,
            count: item.count,
            sale_price: item.sale_price,
            base_discount_price: item.sale_price - item.base_discounted_price,
            membership_discount_price: item.membership_discount_price,
            shopper_coupon: item.shopper_coupon,
            coupon_discount_price: item.coupon_discount_price,
            used_point: used[i],
            payment_price: net[i],
            earned_point: earned[i],
        })
        .collect())
}

/// Rules for swapping an order item's option after purchase.
pub fn validate_option_change(
    item_status: i32,
    current_product: DbId,
    new_product: DbId,
    new_option: DbId,
    options_in_order: &HashSet<DbId>,
) -> CoreResult<()> {
    if !status::allows_option_change(item_status) {
        return Err(CoreError::validation(
            "option",
            "This order is in a state where options cannot be changed.",
        ));
    }
    if new_product != current_product {
        return Err(CoreError::validation(
            "option",
            "It cannot be changed to an option for another product.",
        ));
    }
    if options_in_order.contains(&new_option) {
        return Err(CoreError::validation(
            "option",
            "This item is already included in the order.",
        ));
    }
    Ok(())
}

/// One delivery registration in a batch.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryRequest {
    pub order: DbId,
    pub order_items: Vec<DbId>,
    pub company: String,
    pub invoice_number: String,
}

/// Validate a delivery batch before registration.
///
/// `registered_invoices` holds `(company, invoice_number)` pairs already in
/// the database; `delivered_items` holds order item ids that already carry
/// delivery information.
pub fn validate_deliveries(
    batch: &[DeliveryRequest],
    registered_invoices: &HashSet<(String, String)>,
    delivered_items: &HashSet<DbId>,
) -> CoreResult<()> {
    rules::check_batch_duplicates("deliveries", "order", batch.iter().map(|d| d.order))?;
    rules::check_batch_duplicates(
        "deliveries",
        "invoice_number",
        batch.iter().map(|d| (d.company.as_str(), d.invoice_number.as_str())),
    )?;

    for delivery in batch {
        if registered_invoices
            .contains(&(delivery.company.clone(), delivery.invoice_number.clone()))
        {
            return Err(CoreError::validation(
                "deliveries",
                "The invoice number has already been registered.",
            ));
        }
        for item in &delivery.order_items {
            if delivered_items.contains(item) {
                return Err(CoreError::validation(
                    "deliveries",
                    format!("order_item {item} already has delivery information."),
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pricing_map() -> HashMap<DbId, OptionPricing> {
        [
            (
                1,
                OptionPricing {
                    product: 1,
                    sale_price: 100_000,
                    base_discounted_price: 90_000,
                },
            ),
            (
                2,
                OptionPricing {
                    product: 1,
                    sale_price: 50_000,
                    base_discounted_price: 45_000,
                },
            ),
        ]
        .into_iter()
        .collect()
    }

    // Membership rate 3%.
    fn item(option: DbId, unit_bd: i64, count: i64, unit_sale: i64) -> OrderItemRequest {
        let base_discounted = unit_bd * count;
        let membership = unit_bd * 3 / 100 * count;
        OrderItemRequest {
            option,
            count,
            sale_price: unit_sale * count,
            base_discounted_price: base_discounted,
            membership_discount_price: membership,
            shopper_coupon: None,
            coupon_discount_price: 0,
            payment_price: base_discounted - membership,
        }
    }

    fn items() -> Vec<OrderItemRequest> {
        vec![item(1, 90_000, 2, 100_000), item(2, 45_000, 1, 50_000)]
    }

    fn no_coupons() -> HashMap<DbId, i64> {
        HashMap::new()
    }

    /// Apply coupon 50 (10%) to a line built by [`item`].
    fn with_coupon(line: &mut OrderItemRequest, unit_bd: i64) {
        let coupon = unit_bd / 10 * line.count;
        line.shopper_coupon = Some(50);
        line.coupon_discount_price = coupon;
        line.payment_price -= coupon;
    }

    fn message(result: CoreResult<()>) -> String {
        match result {
            Err(CoreError::Validation { message, .. }) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn matching_prices_pass() {
        assert!(validate_items(&items(), &pricing_map(), 3, &no_coupons()).is_ok());
    }

    #[test]
    fn each_price_field_is_checked() {
        for (field, mutate) in [
            ("sale_price", (|i| i.sale_price += 1) as fn(&mut OrderItemRequest)),
            ("base_discounted_price", |i| i.base_discounted_price += 1),
            ("membership_discount_price", |i| i.membership_discount_price += 1),
            ("payment_price", |i| i.payment_price += 1),
        ] {
            let mut items = items();
            mutate(&mut items[0]);
            assert_eq!(
                message(validate_items(&items, &pricing_map(), 3, &no_coupons())),
                format!("{field} of option 1 is different from the actual price.")
            );
        }
    }

    #[test]
    fn duplicate_option_is_rejected() {
        let mut items = items();
        items.push(items[0].clone());
        assert_eq!(
            message(validate_items(&items, &pricing_map(), 3, &no_coupons())),
            "option is duplicated."
        );
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut items = items();
        items[0].option = 9;
        assert_eq!(
            message(validate_items(&items, &pricing_map(), 3, &no_coupons())),
            "option 9 does not exist."
        );
    }

    #[test]
    fn coupon_discount_is_checked() {
        let rates: HashMap<DbId, i64> = [(50, 10)].into_iter().collect();

        let mut items = items();
        with_coupon(&mut items[0], 90_000);
        assert!(validate_items(&items, &pricing_map(), 3, &rates).is_ok());

        items[0].coupon_discount_price += 100;
        items[0].payment_price -= 100;
        assert_eq!(
            message(validate_items(&items, &pricing_map(), 3, &rates)),
            "coupon_discount_price of option 1 is different from the actual price."
        );

        // A discount without a coupon is rejected too.
        let mut items = self::items();
        items[1].coupon_discount_price = 4_500;
        items[1].payment_price -= 4_500;
        assert_eq!(
            message(validate_items(&items, &pricing_map(), 3, &rates)),
            "coupon_discount_price of option 2 is different from the actual price."
        );
    }

    #[test]
    fn coupon_used_on_two_lines_is_rejected() {
        let rates: HashMap<DbId, i64> = [(50, 10)].into_iter().collect();

        let mut items = items();
        with_coupon(&mut items[0], 90_000);
        with_coupon(&mut items[1], 45_000);
        assert_eq!(
            message(validate_items(&items, &pricing_map(), 3, &rates)),
            "shopper_coupon is duplicated."
        );
    }

    #[test]
    fn unknown_coupon_is_rejected() {
        let mut items = items();
        with_coupon(&mut items[0], 90_000);
        assert_eq!(
            message(validate_items(&items, &pricing_map(), 3, &no_coupons())),
            "shopper_coupon 50 does not exist."
        );
    }

    #[test]
    fn totals_must_line_up() {
        let items = items();
        let total: i64 = items.iter().map(|i| i.payment_price).sum();
        let used = 5_000;
        let actual = total - used;
        let earned = actual / 100;

        assert!(validate_totals(&items, used, actual, earned, 10_000).is_ok());
        assert_eq!(
            message(validate_totals(&items, used, actual + 1, earned, 10_000)),
            "actual_payment_price is calculated incorrectly."
        );
        assert_eq!(
            message(validate_totals(&items, used, actual, earned, 4_999)),
            "The shopper has less point than used_point."
        );
        assert_eq!(
            message(validate_totals(&items, used, actual, earned + 1, 10_000)),
            "earned_point is calculated incorrectly."
        );
        // A negative used_point still balances the payment equation.
        assert_eq!(
            message(validate_totals(&items, -1, total + 1, (total + 1) / 100, 10_000)),
            "used_point cannot be negative."
        );
    }

    #[test]
    fn coupon_fields_survive_pricing() {
        let mut items = items();
        with_coupon(&mut items[0], 90_000);

        let priced = price_items(&items, 0).unwrap();
        assert_eq!(priced[0].shopper_coupon, Some(50));
        assert_eq!(priced[0].coupon_discount_price, 18_000);
        assert_eq!(priced[1].shopper_coupon, None);
        assert_eq!(priced[1].coupon_discount_price, 0);
    }

    #[test]
    fn points_spread_and_reconstruct() {
        let items = items();
        let total: i64 = items.iter().map(|i| i.payment_price).sum();
        let used = 5_001;

        let priced = price_items(&items, used).unwrap();

        assert_eq!(priced.iter().map(|i| i.used_point).sum::<i64>(), used);
        assert_eq!(
            priced.iter().map(|i| i.payment_price).sum::<i64>(),
            total - used
        );
        let earned: i64 = priced.iter().map(|i| i.earned_point).sum();
        assert_eq!(earned, (total - used) / 100);
        // The larger line absorbs the rounding remainder.
        assert!(priced[0].used_point > priced[1].used_point);
    }

    #[test]
    fn zero_used_point_leaves_payments_untouched() {
        let priced = price_items(&items(), 0).unwrap();

        assert!(priced.iter().all(|i| i.used_point == 0));
        assert_eq!(priced[0].payment_price, items()[0].payment_price);
    }

    #[test]
    fn base_discount_amount_is_stored() {
        let priced = price_items(&items(), 0).unwrap();
        // sale 200_000, discounted 180_000.
        assert_eq!(priced[0].base_discount_price, 20_000);
    }

    #[test]
    fn option_change_rules() {
        let in_order: HashSet<DbId> = [1, 2].into_iter().collect();

        assert!(validate_option_change(status::PAYMENT_COMPLETE, 1, 1, 3, &in_order).is_ok());
        assert_eq!(
            message(validate_option_change(
                status::DELIVERY_PREPARING,
                1,
                1,
                3,
                &in_order
            )),
            "This order is in a state where options cannot be changed."
        );
        assert_eq!(
            message(validate_option_change(
                status::DEPOSIT_WAITING,
                1,
                2,
                3,
                &in_order
            )),
            "It cannot be changed to an option for another product."
        );
        assert_eq!(
            message(validate_option_change(
                status::DEPOSIT_WAITING,
                1,
                1,
                2,
                &in_order
            )),
            "This item is already included in the order."
        );
    }

    fn delivery(order: DbId, invoice: &str, items: &[DbId]) -> DeliveryRequest {
        DeliveryRequest {
            order,
            order_items: items.to_vec(),
            company: "cj".into(),
            invoice_number: invoice.into(),
        }
    }

    #[test]
    fn delivery_batch_rules() {
        let empty_invoices = HashSet::new();
        let empty_items = HashSet::new();

        let batch = vec![delivery(1, "a-1", &[10]), delivery(2, "a-2", &[20])];
        assert!(validate_deliveries(&batch, &empty_invoices, &empty_items).is_ok());

        let dup_order = vec![delivery(1, "a-1", &[10]), delivery(1, "a-2", &[20])];
        assert_eq!(
            message(validate_deliveries(&dup_order, &empty_invoices, &empty_items)),
            "order is duplicated."
        );

        let dup_invoice = vec![delivery(1, "a-1", &[10]), delivery(2, "a-1", &[20])];
        assert_eq!(
            message(validate_deliveries(&dup_invoice, &empty_invoices, &empty_items)),
            "invoice_number is duplicated."
        );

        let registered: HashSet<(String, String)> =
            [("cj".to_string(), "a-1".to_string())].into_iter().collect();
        assert_eq!(
            message(validate_deliveries(&batch, &registered, &empty_items)),
            "The invoice number has already been registered."
        );

        let delivered: HashSet<DbId> = [20].into_iter().collect();
        assert_eq!(
            message(validate_deliveries(&batch, &empty_invoices, &delivered)),
            "order_item 20 already has delivery information."
        );
    }
}
