use std::fmt::{self, Write};

use crate::{Constant, Expr, LimitDir, MatrixOp, Number, RelOp, SetKind};

// Binding strength used to decide parenthesization.
const PREC_REL: u8 = 0;
const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_POW: u8 = 3;
const PREC_ATOM: u8 = 4;

fn precedence(e: &Expr) -> u8 {
    match e {
        Expr::Relational(..) => PREC_REL,
        Expr::Add(_) | Expr::MatAdd(_) => PREC_ADD,
        Expr::Mul(_) | Expr::MatMul(_) => PREC_MUL,
        Expr::Number(n) if n.is_negative() || !n.is_integer() => PREC_MUL,
        Expr::Constant(Constant::NegativeInfinity) => PREC_MUL,
        Expr::Pow(..) => PREC_POW,
        Expr::Unevaluated(inner) => precedence(inner),
        _ => PREC_ATOM,
    }
}

fn write_paren(f: &mut fmt::Formatter<'_>, e: &Expr, min: u8) -> fmt::Result {
    if precedence(e) < min {
        write!(f, "({e})")
    } else {
        write!(f, "{e}")
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// A `-1 * rest` product, printed as a negation.
fn negated_term(e: &Expr) -> Option<Vec<Expr>> {
    match e {
        Expr::Mul(args) | Expr::MatMul(args) if args.len() > 1 => match &args[0] {
            Expr::Number(n) if n.is_minus_one() => Some(args[1..].to_vec()),
            _ => None,
        },
        _ => None,
    }
}

fn write_product(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            if let Expr::Pow(base, exp) = arg {
                if exp.as_number().is_some_and(|n| n.is_minus_one()) {
                    f.write_char('/')?;
                    write_paren(f, base, PREC_POW)?;
                    continue;
                }
            }
            f.write_char('*')?;
        }
        write_paren(f, arg, PREC_MUL)?;
    }
    Ok(())
}

fn write_sum(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i == 0 {
            write!(f, "{arg}")?;
            continue;
        }
        if let Expr::Number(n) = arg {
            if n.is_negative() {
                write!(f, " - {}", n.abs())?;
                continue;
            }
        }
        if let Some(rest) = negated_term(arg) {
            f.write_str(" - ")?;
            if rest.len() == 1 {
                write_paren(f, &rest[0], PREC_MUL)?;
            } else {
                write_product(f, &rest)?;
            }
            continue;
        }
        f.write_str(" + ")?;
        write_paren(f, arg, PREC_MUL)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Symbol(s) => f.write_str(&s.name),
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Constant(c) => f.write_str(match c {
                Constant::Pi => "pi",
                Constant::E => "E",
                Constant::ImaginaryUnit => "I",
                Constant::Infinity => "oo",
                Constant::NegativeInfinity => "-oo",
            }),
            Expr::Add(args) | Expr::MatAdd(args) => write_sum(f, args),
            Expr::Mul(args) | Expr::MatMul(args) => match negated_term(self) {
                Some(rest) if rest.len() == 1 => {
                    f.write_char('-')?;
                    write_paren(f, &rest[0], PREC_MUL)
                }
                Some(rest) => {
                    f.write_char('-')?;
                    write_product(f, &rest)
                }
                None => write_product(f, args),
            },
            Expr::Pow(base, exp) => {
                if exp.as_number().is_some_and(|n| *n == Number::from_ratio(1, 2)) {
                    return write!(f, "sqrt({base})");
                }
                write_paren(f, base, PREC_ATOM)?;
                f.write_str("**")?;
                write_paren(f, exp, PREC_ATOM)
            }
            Expr::Mod(a, b) => write!(f, "Mod({a}, {b})"),
            Expr::Relational(op, a, b) => match op {
                RelOp::Eq => write!(f, "Eq({a}, {b})"),
                RelOp::Ne => write!(f, "Ne({a}, {b})"),
                _ => write!(f, "{a} {} {b}", op.symbol()),
            },
            Expr::Function(name, args) => {
                write!(f, "{name}(")?;
                write_list(f, args)?;
                f.write_char(')')
            }
            Expr::Derivative(e, var) => write!(f, "Derivative({e}, {})", var.name),
            Expr::Integral { integrand, var, bounds } => match bounds {
                Some(b) => write!(f, "Integral({integrand}, ({}, {}, {}))", var.name, b.0, b.1),
                None => write!(f, "Integral({integrand}, {})", var.name),
            },
            Expr::Sum(s) => write!(f, "Sum({}, ({}, {}, {}))", s.body, s.var, s.start, s.end),
            Expr::Product(s) => write!(f, "Product({}, ({}, {}, {}))", s.body, s.var, s.start, s.end),
            Expr::Limit { expr, var, approach, dir } => {
                let dir = match dir {
                    LimitDir::Plus => '+',
                    LimitDir::Minus => '-',
                };
                write!(f, "Limit({expr}, {}, {approach}, dir='{dir}')", var.name)
            }
            Expr::Matrix(m) => {
                f.write_str("Matrix([")?;
                for (i, row) in m.rows().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_char('[')?;
                    write_list(f, row)?;
                    f.write_char(']')?;
                }
                f.write_str("])")
            }
            Expr::MatrixSymbol { name, .. } => f.write_str(name),
            Expr::MatrixOp(MatrixOp::Transpose, args) if args.len() == 1 => {
                write_paren(f, &args[0], PREC_ATOM)?;
                f.write_str(".T")
            }
            Expr::MatrixOp(op, args) => {
                write!(f, "{}(", op.name())?;
                write_list(f, args)?;
                f.write_char(')')
            }
            Expr::Set(kind) => f.write_str(match kind {
                SetKind::Naturals => "Naturals",
                SetKind::Integers => "Integers",
                SetKind::Rationals => "Rationals",
                SetKind::Reals => "Reals",
                SetKind::Complexes => "Complexes",
                SetKind::Empty => "EmptySet",
            }),
            Expr::Interval { lo, hi, left_open, right_open } => {
                let ctor = match (left_open, right_open) {
                    (false, false) => "Interval",
                    (true, true) => "Interval.open",
                    (true, false) => "Interval.Lopen",
                    (false, true) => "Interval.Ropen",
                };
                write!(f, "{ctor}({lo}, {hi})")
            }
            Expr::FiniteSet(items) => {
                f.write_char('{')?;
                write_list(f, items)?;
                f.write_char('}')
            }
            Expr::Union(a, b) => write!(f, "Union({a}, {b})"),
            Expr::Intersection(a, b) => write!(f, "Intersection({a}, {b})"),
            Expr::Complement(a, b) => write!(f, "Complement({a}, {b})"),
            Expr::Contains(a, b) => write!(f, "Contains({a}, {b})"),
            Expr::Not(a) => write!(f, "~{a}"),
            Expr::Subset(a, b) => write!(f, "Subset({a}, {b})"),
            Expr::Unevaluated(inner) => write!(f, "{inner}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Expr, Symbol};
    use pretty_assertions::assert_eq;

    fn sym(name: &str) -> Expr {
        Expr::symbol(name, None)
    }

    #[test]
    fn test_sum_and_product_forms() {
        let e = Expr::Add(vec![
            sym("x"),
            Expr::Mul(vec![Expr::minus_one(), sym("y")]),
            Expr::integer(-3),
        ]);
        assert_eq!(e.to_string(), "x - y - 3");

        let q = Expr::Mul(vec![sym("a"), Expr::reciprocal(sym("b"))]);
        assert_eq!(q.to_string(), "a/b");
    }

    #[test]
    fn test_power_parenthesization() {
        let e = Expr::pow(Expr::Add(vec![sym("x"), Expr::integer(1)]), Expr::integer(2));
        assert_eq!(e.to_string(), "(x + 1)**2");
        assert_eq!(Expr::pow(sym("x"), Expr::rational(1, 2)).to_string(), "sqrt(x)");
    }

    #[test]
    fn test_calculus_forms() {
        let d = Expr::derivative(Expr::pow(sym("x"), Expr::integer(2)), Symbol::new("x", None));
        assert_eq!(d.to_string(), "Derivative(x**2, x)");
    }
}
