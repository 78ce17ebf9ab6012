//! Traversal helpers: symbol atoms and structural substitution.

use indexmap::{IndexMap, IndexSet};

use crate::{Expr, Matrix, Series, Symbol};

impl Expr {
    /// Every `Symbol` atom in the tree, in first-occurrence order.
    ///
    /// Bound variables (integration, summation, derivative) are included.
    pub fn symbol_atoms(&self) -> IndexSet<Symbol> {
        let mut out = IndexSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut IndexSet<Symbol>) {
        match self {
            Expr::Symbol(s) => {
                out.insert(s.clone());
            }
            Expr::Derivative(e, var) => {
                e.collect_symbols(out);
                out.insert(var.clone());
            }
            Expr::Integral { integrand, var, bounds } => {
                integrand.collect_symbols(out);
                out.insert(var.clone());
                if let Some(b) = bounds {
                    b.0.collect_symbols(out);
                    b.1.collect_symbols(out);
                }
            }
            Expr::Limit { expr, var, approach, .. } => {
                expr.collect_symbols(out);
                out.insert(var.clone());
                approach.collect_symbols(out);
            }
            _ => self.for_each_child(|c| c.collect_symbols(out)),
        }
    }

    fn for_each_child(&self, mut f: impl FnMut(&Expr)) {
        match self {
            Expr::Symbol(_) | Expr::Number(_) | Expr::Constant(_) | Expr::Set(_) => {}
            Expr::Add(args)
            | Expr::Mul(args)
            | Expr::MatAdd(args)
            | Expr::MatMul(args)
            | Expr::Function(_, args)
            | Expr::MatrixOp(_, args)
            | Expr::FiniteSet(args) => args.iter().for_each(f),
            Expr::Pow(a, b)
            | Expr::Mod(a, b)
            | Expr::Relational(_, a, b)
            | Expr::Union(a, b)
            | Expr::Intersection(a, b)
            | Expr::Complement(a, b)
            | Expr::Contains(a, b)
            | Expr::Subset(a, b)
            | Expr::Interval { lo: a, hi: b, .. }
            | Expr::MatrixSymbol { rows: a, cols: b, .. } => {
                f(a);
                f(b);
            }
            Expr::Not(a) | Expr::Unevaluated(a) | Expr::Derivative(a, _) => f(a),
            Expr::Integral { integrand, bounds, .. } => {
                f(integrand);
                if let Some(b) = bounds {
                    f(&b.0);
                    f(&b.1);
                }
            }
            Expr::Sum(s) | Expr::Product(s) => {
                f(&s.body);
                f(&s.var);
                f(&s.start);
                f(&s.end);
            }
            Expr::Limit { expr, approach, .. } => {
                f(expr);
                f(approach);
            }
            Expr::Matrix(m) => m.rows().iter().flatten().for_each(f),
        }
    }

    /// Replace every subtree structurally equal to `pattern` with `value`.
    ///
    /// Variables held as bare symbols (derivative, integral and limit
    /// variables) are renamed only when both sides are symbols.
    pub fn subs(&self, pattern: &Expr, value: &Expr) -> Expr {
        if self == pattern {
            return value.clone();
        }
        let rename = |var: &Symbol| -> Symbol {
            match (pattern, value) {
                (Expr::Symbol(p), Expr::Symbol(v)) if p == var => v.clone(),
                _ => var.clone(),
            }
        };
        let go = |e: &Expr| e.subs(pattern, value);
        let go_box = |e: &Expr| Box::new(e.subs(pattern, value));
        let go_all = |args: &[Expr]| args.iter().map(go).collect::<Vec<_>>();

        match self {
            Expr::Symbol(_) | Expr::Number(_) | Expr::Constant(_) | Expr::Set(_) => self.clone(),
            Expr::Add(args) => Expr::Add(go_all(args)),
            Expr::Mul(args) => Expr::Mul(go_all(args)),
            Expr::MatAdd(args) => Expr::MatAdd(go_all(args)),
            Expr::MatMul(args) => Expr::MatMul(go_all(args)),
            Expr::Function(name, args) => Expr::Function(name.clone(), go_all(args)),
            Expr::MatrixOp(op, args) => Expr::MatrixOp(*op, go_all(args)),
            Expr::FiniteSet(args) => Expr::finite_set(go_all(args)),
            Expr::Pow(a, b) => Expr::Pow(go_box(a), go_box(b)),
            Expr::Mod(a, b) => Expr::Mod(go_box(a), go_box(b)),
            Expr::Relational(op, a, b) => Expr::Relational(*op, go_box(a), go_box(b)),
            Expr::Union(a, b) => Expr::Union(go_box(a), go_box(b)),
            Expr::Intersection(a, b) => Expr::Intersection(go_box(a), go_box(b)),
            Expr::Complement(a, b) => Expr::Complement(go_box(a), go_box(b)),
            Expr::Contains(a, b) => Expr::Contains(go_box(a), go_box(b)),
            Expr::Subset(a, b) => Expr::Subset(go_box(a), go_box(b)),
            Expr::Not(a) => Expr::Not(go_box(a)),
            Expr::Unevaluated(a) => Expr::Unevaluated(go_box(a)),
            Expr::Interval { lo, hi, left_open, right_open } => Expr::Interval {
                lo: go_box(lo),
                hi: go_box(hi),
                left_open: *left_open,
                right_open: *right_open,
            },
            Expr::MatrixSymbol { name, rows, cols } => Expr::MatrixSymbol {
                name: name.clone(),
                rows: go_box(rows),
                cols: go_box(cols),
            },
            Expr::Derivative(e, var) => Expr::Derivative(go_box(e), rename(var)),
            Expr::Integral { integrand, var, bounds } => Expr::Integral {
                integrand: go_box(integrand),
                var: rename(var),
                bounds: bounds.as_ref().map(|b| Box::new((go(&b.0), go(&b.1)))),
            },
            Expr::Sum(s) => Expr::Sum(Box::new(s.subs(pattern, value))),
            Expr::Product(s) => Expr::Product(Box::new(s.subs(pattern, value))),
            Expr::Limit { expr, var, approach, dir } => Expr::Limit {
                expr: go_box(expr),
                var: rename(var),
                approach: go_box(approach),
                dir: *dir,
            },
            Expr::Matrix(m) => Expr::Matrix(m.map(go)),
        }
    }

    /// Apply each `pattern -> value` pair in insertion order.
    pub fn subs_all(&self, bindings: &IndexMap<Expr, Expr>) -> Expr {
        bindings
            .iter()
            .fold(self.clone(), |acc, (pattern, value)| acc.subs(pattern, value))
    }
}

impl Series {
    fn subs(&self, pattern: &Expr, value: &Expr) -> Series {
        Series {
            body: self.body.subs(pattern, value),
            var: self.var.subs(pattern, value),
            start: self.start.subs(pattern, value),
            end: self.end.subs(pattern, value),
        }
    }
}

impl Matrix {
    pub fn subs_all(&self, bindings: &IndexMap<Expr, Expr>) -> Matrix {
        self.map(|e| e.subs_all(bindings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sym(name: &str) -> Expr {
        Expr::symbol(name, None)
    }

    #[test]
    fn test_symbol_atoms_in_order() {
        let e = Expr::Add(vec![
            Expr::pow(sym("y"), Expr::integer(2)),
            Expr::Mul(vec![sym("x"), sym("y")]),
        ]);
        let names: Vec<String> = e.symbol_atoms().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["y", "x"]);
    }

    #[test]
    fn test_subs_replaces_every_occurrence() {
        let e = Expr::Add(vec![sym("x"), Expr::pow(sym("x"), Expr::integer(2))]);
        let out = e.subs(&sym("x"), &Expr::integer(3));
        assert_eq!(
            out,
            Expr::Add(vec![
                Expr::integer(3),
                Expr::pow(Expr::integer(3), Expr::integer(2))
            ])
        );
    }

    #[test]
    fn test_subs_all_in_insertion_order() {
        let mut bindings = IndexMap::new();
        bindings.insert(sym("a"), sym("b"));
        bindings.insert(sym("b"), Expr::integer(1));
        assert_eq!(sym("a").subs_all(&bindings), Expr::integer(1));
    }
}
