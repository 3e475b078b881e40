//! Proportional distribution of an aggregate amount over weighted lines.
//!
//! Used twice per order: spreading `used_point` over item payment prices,
//! then spreading `earned_point` over the resulting net payments. Shares are
//! floored and the rounding remainder goes to the line with the largest
//! weight (first such line on a tie), so the shares always reconstruct the
//! aggregate exactly.

use crate::error::{CoreError, CoreResult};

/// Split `aggregate` over `weights` proportionally.
///
/// Returns one share per weight, in input order. The weights must have a
/// positive total; callers validate that before distribution runs.
pub fn distribute(aggregate: i64, weights: &[i64]) -> CoreResult<Vec<i64>> {
    let total: i64 = weights.iter().sum();
    if weights.is_empty() || total <= 0 {
        return Err(CoreError::Internal(format!(
            "cannot distribute {aggregate} over weights totalling {total}"
        )));
    }

    let mut shares: Vec<i64> = weights.iter().map(|w| w * aggregate / total).collect();

    let remainder = aggregate - shares.iter().sum::<i64>();
    if remainder != 0 {
        let largest = weights
            .iter()
            .enumerate()
            .max_by(|(ai, aw), (bi, bw)| aw.cmp(bw).then(bi.cmp(ai)))
            .map(|(i, _)| i)
            .unwrap_or(0);
        shares[largest] += remainder;
    }

    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_division_leaves_no_remainder() {
        assert_eq!(distribute(100, &[700, 300]).unwrap(), [70, 30]);
    }

    #[test]
    fn remainder_goes_to_the_largest_weight() {
        assert_eq!(distribute(101, &[700, 300]).unwrap(), [71, 30]);
        assert_eq!(distribute(101, &[300, 700]).unwrap(), [30, 71]);
    }

    #[test]
    fn tie_breaks_to_the_first_largest() {
        assert_eq!(distribute(101, &[500, 500]).unwrap(), [51, 50]);
    }

    #[test]
    fn shares_reconstruct_the_aggregate() {
        let weights = [3_333, 1_250, 9_999, 4_120];
        for aggregate in [0, 1, 97, 1_000, 12_345] {
            let shares = distribute(aggregate, &weights).unwrap();
            assert_eq!(shares.iter().sum::<i64>(), aggregate);
        }
    }

    #[test]
    fn single_line_takes_everything() {
        assert_eq!(distribute(77, &[40_000]).unwrap(), [77]);
    }

    #[test]
    fn empty_or_zero_total_weights_are_an_error() {
        assert!(distribute(10, &[]).is_err());
        assert!(distribute(10, &[0, 0]).is_err());
    }
}
