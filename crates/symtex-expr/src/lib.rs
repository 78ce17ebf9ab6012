//! Unevaluated symbolic expression values.
//!
//! Every constructor here is inert: nothing simplifies, reorders or evaluates.
//! The only arithmetic performed is the exact numeric folding in [`fold`],
//! which callers use for comparisons.

mod display;
pub mod fold;
pub mod matrix;
pub mod number;
mod structure;

use serde::Serialize;

pub use fold::Extended;
pub use matrix::{Matrix, MatrixError, MatrixOp};
pub use number::{LiteralError, Number};

/// A named scalar symbol.
///
/// `real` is the real-domain assumption the symbol was created under; two
/// symbols with the same name but different assumptions are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Symbol {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real: Option<bool>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, real: Option<bool>) -> Self {
        Symbol {
            name: name.into(),
            real,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Constant {
    Pi,
    E,
    ImaginaryUnit,
    Infinity,
    NegativeInfinity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RelOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl RelOp {
    pub fn symbol(self) -> &'static str {
        match self {
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
        }
    }
}

/// The named number sets plus the empty set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SetKind {
    Naturals,
    Integers,
    Rationals,
    Reals,
    Complexes,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LimitDir {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

/// Structural shape of a value, used for operator dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Matrix,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Expr {
    Symbol(Symbol),
    Number(Number),
    Constant(Constant),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    MatAdd(Vec<Expr>),
    MatMul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Mod(Box<Expr>, Box<Expr>),
    Relational(RelOp, Box<Expr>, Box<Expr>),
    Function(String, Vec<Expr>),
    Derivative(Box<Expr>, Symbol),
    Integral {
        integrand: Box<Expr>,
        var: Symbol,
        bounds: Option<Box<(Expr, Expr)>>,
    },
    Sum(Box<Series>),
    Product(Box<Series>),
    Limit {
        expr: Box<Expr>,
        var: Symbol,
        approach: Box<Expr>,
        dir: LimitDir,
    },
    Matrix(Matrix),
    MatrixSymbol {
        name: String,
        rows: Box<Expr>,
        cols: Box<Expr>,
    },
    MatrixOp(MatrixOp, Vec<Expr>),
    Set(SetKind),
    Interval {
        lo: Box<Expr>,
        hi: Box<Expr>,
        left_open: bool,
        right_open: bool,
    },
    FiniteSet(Vec<Expr>),
    Union(Box<Expr>, Box<Expr>),
    Intersection(Box<Expr>, Box<Expr>),
    Complement(Box<Expr>, Box<Expr>),
    Contains(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Subset(Box<Expr>, Box<Expr>),
    Unevaluated(Box<Expr>),
}

/// Body and index range of a `Sum` or `Product`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Series {
    pub body: Expr,
    pub var: Expr,
    pub start: Expr,
    pub end: Expr,
}

impl Expr {
    pub fn symbol(name: impl Into<String>, real: Option<bool>) -> Expr {
        Expr::Symbol(Symbol::new(name, real))
    }

    pub fn integer(value: i64) -> Expr {
        Expr::Number(Number::from_integer(value))
    }

    pub fn rational(numer: i64, denom: i64) -> Expr {
        Expr::Number(Number::from_ratio(numer, denom))
    }

    pub fn minus_one() -> Expr {
        Expr::integer(-1)
    }

    pub fn pow(base: Expr, exp: Expr) -> Expr {
        Expr::Pow(Box::new(base), Box::new(exp))
    }

    /// `Pow(x, -1)`.
    pub fn reciprocal(x: Expr) -> Expr {
        Expr::pow(x, Expr::minus_one())
    }

    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::Function(name.into(), args)
    }

    pub fn relational(op: RelOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Relational(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn modulo(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Mod(Box::new(lhs), Box::new(rhs))
    }

    pub fn derivative(expr: Expr, var: Symbol) -> Expr {
        Expr::Derivative(Box::new(expr), var)
    }

    pub fn unevaluated(expr: Expr) -> Expr {
        Expr::Unevaluated(Box::new(expr))
    }

    pub fn union(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Union(Box::new(lhs), Box::new(rhs))
    }

    pub fn intersection(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Intersection(Box::new(lhs), Box::new(rhs))
    }

    pub fn complement(universe: Expr, removed: Expr) -> Expr {
        Expr::Complement(Box::new(universe), Box::new(removed))
    }

    pub fn contains(element: Expr, set: Expr) -> Expr {
        Expr::Contains(Box::new(element), Box::new(set))
    }

    pub fn subset(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Subset(Box::new(lhs), Box::new(rhs))
    }

    pub fn not(expr: Expr) -> Expr {
        Expr::Not(Box::new(expr))
    }

    pub fn interval(lo: Expr, hi: Expr, left_open: bool, right_open: bool) -> Expr {
        Expr::Interval {
            lo: Box::new(lo),
            hi: Box::new(hi),
            left_open,
            right_open,
        }
    }

    /// A finite set; structurally equal elements collapse to the first one.
    pub fn finite_set(elements: Vec<Expr>) -> Expr {
        let mut unique: Vec<Expr> = Vec::with_capacity(elements.len());
        for element in elements {
            if !unique.contains(&element) {
                unique.push(element);
            }
        }
        Expr::FiniteSet(unique)
    }

    pub fn matrix_symbol(name: impl Into<String>, rows: Expr, cols: Expr) -> Expr {
        Expr::MatrixSymbol {
            name: name.into(),
            rows: Box::new(rows),
            cols: Box::new(cols),
        }
    }

    /// Shape tag: matrix literals, matrix symbols, matrix sums/products and
    /// matrix-valued operations are `Matrix`; everything else is `Scalar`.
    pub fn shape(&self) -> Shape {
        match self {
            Expr::Matrix(_) | Expr::MatrixSymbol { .. } | Expr::MatAdd(_) | Expr::MatMul(_) => {
                Shape::Matrix
            }
            Expr::Pow(base, _) => base.shape(),
            Expr::MatrixOp(op, _) => op.result_shape(),
            Expr::Unevaluated(inner) => inner.shape(),
            _ => Shape::Scalar,
        }
    }

    pub fn is_matrix(&self) -> bool {
        self.shape() == Shape::Matrix
    }

    /// The `(rows, cols)` of a value with a known 2-D shape.
    pub fn matrix_dims(&self) -> Option<(Expr, Expr)> {
        match self {
            Expr::Matrix(m) => {
                let (r, c) = m.dims();
                Some((Expr::integer(r as i64), Expr::integer(c as i64)))
            }
            Expr::MatrixSymbol { rows, cols, .. } => Some((*rows.clone(), *cols.clone())),
            _ => None,
        }
    }

    /// Plain numeric literals and the two infinities.
    pub fn is_number_literal(&self) -> bool {
        matches!(
            self,
            Expr::Number(_)
                | Expr::Constant(Constant::Infinity)
                | Expr::Constant(Constant::NegativeInfinity)
        )
    }

    /// Negate a numeric literal directly; `None` for anything else.
    pub fn negate_literal(&self) -> Option<Expr> {
        match self {
            Expr::Number(n) => Some(Expr::Number(n.neg())),
            Expr::Constant(Constant::Infinity) => Some(Expr::Constant(Constant::NegativeInfinity)),
            Expr::Constant(Constant::NegativeInfinity) => Some(Expr::Constant(Constant::Infinity)),
            _ => None,
        }
    }

    /// Scalar arithmetic values: the operands transpose and degree
    /// conversion are defined on.
    pub fn is_arithmetic(&self) -> bool {
        match self {
            Expr::Symbol(_)
            | Expr::Number(_)
            | Expr::Constant(_)
            | Expr::Add(_)
            | Expr::Mul(_)
            | Expr::Mod(..)
            | Expr::Function(..)
            | Expr::Derivative(..)
            | Expr::Integral { .. }
            | Expr::Sum(_)
            | Expr::Product(_)
            | Expr::Limit { .. } => true,
            Expr::Pow(base, _) => base.is_arithmetic(),
            Expr::Unevaluated(inner) => inner.is_arithmetic(),
            _ => false,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Expr::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Expr::Number(n) => Some(n),
            _ => None,
        }
    }
}

impl From<Number> for Expr {
    fn from(n: Number) -> Self {
        Expr::Number(n)
    }
}

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        Expr::Symbol(s)
    }
}

impl From<Matrix> for Expr {
    fn from(m: Matrix) -> Self {
        Expr::Matrix(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x", None)
    }

    #[test]
    fn test_shape_tags() {
        let m = Expr::Matrix(Matrix::new(vec![vec![Expr::integer(1)]]).unwrap());
        assert_eq!(m.shape(), Shape::Matrix);
        assert_eq!(Expr::reciprocal(m.clone()).shape(), Shape::Matrix);
        assert_eq!(Expr::MatrixOp(MatrixOp::Det, vec![m.clone()]).shape(), Shape::Scalar);
        assert_eq!(Expr::MatrixOp(MatrixOp::Transpose, vec![m]).shape(), Shape::Matrix);
        assert_eq!(x().shape(), Shape::Scalar);
        assert_eq!(
            Expr::matrix_symbol("A", Expr::integer(2), Expr::integer(3)).shape(),
            Shape::Matrix
        );
    }

    #[test]
    fn test_negate_literal() {
        assert_eq!(Expr::integer(3).negate_literal(), Some(Expr::integer(-3)));
        assert_eq!(
            Expr::Constant(Constant::Infinity).negate_literal(),
            Some(Expr::Constant(Constant::NegativeInfinity))
        );
        assert_eq!(x().negate_literal(), None);
    }

    #[test]
    fn test_finite_set_collapses_duplicates() {
        let set = Expr::finite_set(vec![Expr::integer(5), Expr::integer(5), x()]);
        assert_eq!(set, Expr::FiniteSet(vec![Expr::integer(5), x()]));
    }

    #[test]
    fn test_symbols_differ_by_assumption() {
        assert_ne!(Expr::symbol("x", Some(true)), Expr::symbol("x", None));
    }
}
