//! Product and order-line price derivation.
//!
//! All prices are integer won. The customer-facing `sale_price` is double
//! the wholesale `price`; the base discount is rounded down to the nearest
//! hundred so discounted prices stay on hundred-won boundaries.

use crate::error::{CoreError, CoreResult};

/// Wholesale prices must land on hundred-won boundaries.
pub fn validate_price(price: i64) -> CoreResult<()> {
    if price <= 0 || price % 100 != 0 {
        return Err(CoreError::validation(
            "price",
            "The price must be a multiple of 100.",
        ));
    }
    Ok(())
}

/// Customer-facing price before discounts.
pub fn sale_price(price: i64) -> i64 {
    price * 2
}

/// Sale price after the product's own discount, floored to hundreds.
pub fn base_discounted_price(sale_price: i64, base_discount_rate: i64) -> i64 {
    sale_price - (sale_price * base_discount_rate / 100) / 100 * 100
}

/// Membership discount for a line: per-unit discount floored, then scaled
/// by count.
pub fn membership_discount_price(
    unit_base_discounted_price: i64,
    membership_discount_rate: i64,
    count: i64,
) -> i64 {
    unit_base_discounted_price * membership_discount_rate / 100 * count
}

/// Coupon discount for a line, same per-unit floor as the membership
/// discount. Both apply to the base discounted price.
pub fn coupon_discount_price(
    unit_base_discounted_price: i64,
    coupon_discount_rate: i64,
    count: i64,
) -> i64 {
    unit_base_discounted_price * coupon_discount_rate / 100 * count
}

/// Loyalty points earned on a payment: one per hundred won.
pub fn earned_point(payment_price: i64) -> i64 {
    payment_price / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_must_be_positive_hundreds() {
        assert!(validate_price(50_000).is_ok());
        assert!(validate_price(100).is_ok());

        for bad in [0, -100, 50_050, 99] {
            let err = validate_price(bad).unwrap_err();
            assert_eq!(err.to_string(), "price: The price must be a multiple of 100.");
        }
    }

    #[test]
    fn sale_price_doubles_the_wholesale_price() {
        assert_eq!(sale_price(50_000), 100_000);
    }

    #[test]
    fn base_discount_floors_to_hundreds() {
        // 20% of 100_000 is exactly 20_000.
        assert_eq!(base_discounted_price(100_000, 20), 80_000);
        // 10% of 70_000 is 7_000; 63_000 survives.
        assert_eq!(base_discounted_price(70_000, 10), 63_000);
        // 15% of 70_700 is 10_605, floored to 10_600.
        assert_eq!(base_discounted_price(70_700, 15), 60_100);
        assert_eq!(base_discounted_price(100_000, 0), 100_000);
    }

    #[test]
    fn membership_discount_floors_per_unit() {
        // 3% of 63_000 is 1_890 per unit.
        assert_eq!(membership_discount_price(63_000, 3, 2), 3_780);
        // 3% of 63_050 is 1_891.5, floored to 1_891 before scaling.
        assert_eq!(membership_discount_price(63_050, 3, 2), 3_782);
    }

    #[test]
    fn coupon_discount_floors_per_unit() {
        // 10% of 90_000 is 9_000 per unit.
        assert_eq!(coupon_discount_price(90_000, 10, 2), 18_000);
        // 10% of 63_050 is 6_305 before scaling.
        assert_eq!(coupon_discount_price(63_050, 10, 2), 12_610);
    }

    #[test]
    fn one_point_per_hundred_won() {
        assert_eq!(earned_point(61_110), 611);
        assert_eq!(earned_point(99), 0);
    }
}
