//! Exact numeric folding.
//!
//! Used for comparisons (interval emptiness), for exact gcd/lcm and for the
//! entries touched by elementary matrix transforms. Anything that is not a
//! closed numeric term folds to `None`.

use std::cmp::Ordering;

use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::{Constant, Expr, Number};

/// A rational extended with the two infinities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extended {
    NegInf,
    Finite(BigRational),
    PosInf,
}

impl Extended {
    fn add(self, other: Extended) -> Option<Extended> {
        use Extended::*;
        match (self, other) {
            (Finite(a), Finite(b)) => Some(Finite(a + b)),
            (PosInf, NegInf) | (NegInf, PosInf) => None,
            (PosInf, _) | (_, PosInf) => Some(PosInf),
            (NegInf, _) | (_, NegInf) => Some(NegInf),
        }
    }

    fn mul(self, other: Extended) -> Option<Extended> {
        use Extended::*;
        match (self, other) {
            (Finite(a), Finite(b)) => Some(Finite(a * b)),
            (Finite(a), inf) | (inf, Finite(a)) => {
                if a.is_zero() {
                    None
                } else if a.is_positive() {
                    Some(inf)
                } else {
                    Some(inf.negate())
                }
            }
            (PosInf, PosInf) | (NegInf, NegInf) => Some(PosInf),
            _ => Some(NegInf),
        }
    }

    fn negate(self) -> Extended {
        match self {
            Extended::NegInf => Extended::PosInf,
            Extended::PosInf => Extended::NegInf,
            Extended::Finite(a) => Extended::Finite(-a),
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Extended::Finite(a) => Some(Number::from_rational(a.clone())),
            _ => None,
        }
    }
}

impl PartialOrd for Extended {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Extended {
    fn cmp(&self, other: &Self) -> Ordering {
        use Extended::*;
        match (self, other) {
            (Finite(a), Finite(b)) => a.cmp(b),
            (NegInf, NegInf) | (PosInf, PosInf) => Ordering::Equal,
            (NegInf, _) | (_, PosInf) => Ordering::Less,
            (PosInf, _) | (_, NegInf) => Ordering::Greater,
        }
    }
}

impl Expr {
    /// The exact value of a closed numeric term.
    pub fn exact_value(&self) -> Option<Extended> {
        match self {
            Expr::Number(n) => Some(Extended::Finite(n.value().clone())),
            Expr::Constant(Constant::Infinity) => Some(Extended::PosInf),
            Expr::Constant(Constant::NegativeInfinity) => Some(Extended::NegInf),
            Expr::Add(args) => args
                .iter()
                .try_fold(Extended::Finite(BigRational::zero()), |acc, a| {
                    acc.add(a.exact_value()?)
                }),
            Expr::Mul(args) => args.iter().try_fold(
                Extended::Finite(BigRational::from_integer(1.into())),
                |acc, a| acc.mul(a.exact_value()?),
            ),
            Expr::Pow(base, exp) => {
                let exp = exp.as_number()?.to_i64()?;
                let exp = i32::try_from(exp).ok()?;
                match base.exact_value()? {
                    Extended::Finite(b) => Number::from_rational(b)
                        .powi(exp)
                        .map(|n| Extended::Finite(n.into_value())),
                    _ => None,
                }
            }
            Expr::Unevaluated(inner) => inner.exact_value(),
            _ => None,
        }
    }

    /// The exact value when it is finite.
    pub fn exact_number(&self) -> Option<Number> {
        self.exact_value()?.as_number()
    }
}

/// Compare two closed numeric terms.
pub fn exact_cmp(a: &Expr, b: &Expr) -> Option<Ordering> {
    Some(a.exact_value()?.cmp(&b.exact_value()?))
}

/// `k * v`, folded when both are exact.
pub fn times(k: &Expr, v: &Expr) -> Expr {
    match (k.exact_number(), v.exact_number()) {
        (Some(a), Some(b)) => Expr::Number(a.mul(&b)),
        (Some(a), None) if a == Number::one() => v.clone(),
        _ => Expr::Mul(vec![k.clone(), v.clone()]),
    }
}

/// `a + b`, folded when both are exact.
pub fn plus(a: &Expr, b: &Expr) -> Expr {
    match (a.exact_number(), b.exact_number()) {
        (Some(x), Some(y)) => Expr::Number(x.add(&y)),
        (_, Some(y)) if y.is_zero() => a.clone(),
        _ => Expr::Add(vec![a.clone(), b.clone()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fold_sum_and_product() {
        let e = Expr::Add(vec![
            Expr::integer(2),
            Expr::Mul(vec![Expr::integer(3), Expr::reciprocal(Expr::integer(4))]),
        ]);
        assert_eq!(e.exact_number(), Some(Number::from_ratio(11, 4)));
    }

    #[test]
    fn test_symbols_do_not_fold() {
        let e = Expr::Add(vec![Expr::integer(2), Expr::symbol("x", None)]);
        assert_eq!(e.exact_value(), None);
    }

    #[test]
    fn test_infinity_ordering() {
        let inf = Expr::Constant(Constant::Infinity);
        assert_eq!(exact_cmp(&Expr::integer(10), &inf), Some(Ordering::Less));
        let neg = Expr::Mul(vec![Expr::minus_one(), inf.clone()]);
        assert_eq!(neg.exact_value(), Some(Extended::NegInf));
        assert_eq!(Expr::Add(vec![inf, neg]).exact_value(), None);
    }

    #[test]
    fn test_division_by_zero_does_not_fold() {
        assert_eq!(Expr::reciprocal(Expr::integer(0)).exact_value(), None);
    }
}
