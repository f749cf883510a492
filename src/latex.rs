use crate::tree::{BinaryOp::*, FunctionKind, FunctionKind::*, Node, Node::*, Tree};

impl Tree {
    /// Produce the latex expression for the tree. Every binary operation is
    /// wrapped in parentheses, so the result doesn't depend on precedence.
    pub fn to_latex(&self) -> String {
        to_latex(self.root())
    }
}

/// Produce the latex expression for the subtree of a single node.
fn to_latex(node: &Node) -> String {
    match node {
        Constant(val) if val.is_sign_negative() && *val != 0. => with_parens(val.to_string()),
        Constant(val) => val.to_string(),
        Variable(label) => label.to_string(),
        Function(kind, input) => {
            let ix = to_latex(input);
            format!("{}\\left({{{ix}}}\\right)", command(*kind))
        }
        Operator(op, _, lhs, rhs) => {
            let (lx, rx) = (to_latex(lhs), to_latex(rhs));
            match op {
                Add => with_parens(format!("{{{lx}}} + {{{rx}}}")),
                Subtract => with_parens(format!("{{{lx}}} - {{{rx}}}")),
                Multiply => with_parens(format!("{{{lx}}}\\cdot{{{rx}}}")),
                Divide => format!("\\dfrac{{{lx}}}{{{rx}}}"),
                Pow => {
                    // Negative constants, sums and products are already wrapped.
                    let lx = match lhs.as_ref() {
                        Constant(_) | Variable(_) => lx,
                        Operator(Add | Subtract | Multiply, ..) => lx,
                        Operator(Divide | Pow, ..) | Function(..) => with_parens(lx),
                    };
                    format!("{{{lx}}}^{{{rx}}}")
                }
            }
        }
    }
}

/// The latex command that typesets the name of the function.
fn command(kind: FunctionKind) -> &'static str {
    match kind {
        Sin => "\\sin",
        Cos => "\\cos",
        Tg => "\\operatorname{tg}",
        Ctg => "\\operatorname{ctg}",
        Sh => "\\operatorname{sh}",
        Ch => "\\operatorname{ch}",
        Th => "\\operatorname{th}",
        Cth => "\\operatorname{cth}",
        Ln => "\\ln",
        Log => "\\log",
        Exp => "\\exp",
    }
}

fn with_parens(latex: String) -> String {
    format!("\\left({latex}\\right)")
}

#[cfg(test)]
mod test {
    use crate::deftree;

    #[test]
    fn t_leaves() {
        assert_eq!("x", deftree!(x).unwrap().to_latex());
        assert_eq!("2.5", deftree!(2.5).unwrap().to_latex());
        assert_eq!("\\left(-3\\right)", deftree!(const -3.).unwrap().to_latex());
    }

    #[test]
    fn t_fully_parenthesized() {
        assert_eq!(
            "\\left({x} + {\\left({2}\\cdot{x}\\right)}\\right)",
            deftree!(+ x (* 2 x)).unwrap().to_latex()
        );
        assert_eq!(
            "\\left({\\left({x} - {1}\\right)}\\cdot{x}\\right)",
            deftree!(* (- x 1) x).unwrap().to_latex()
        );
    }

    #[test]
    fn t_fraction() {
        assert_eq!(
            "\\dfrac{\\left({x} + {1}\\right)}{x}",
            deftree!(/ (+ x 1) x).unwrap().to_latex()
        );
        assert_eq!(
            "\\dfrac{1}{\\dfrac{1}{x}}",
            deftree!(/ 1 (/ 1 x)).unwrap().to_latex()
        );
    }

    #[test]
    fn t_pow() {
        assert_eq!("{x}^{2}", deftree!(pow x 2).unwrap().to_latex());
        assert_eq!(
            "{\\left({x} + {1}\\right)}^{\\left({x} - {1}\\right)}",
            deftree!(pow (+ x 1) (- x 1)).unwrap().to_latex()
        );
        assert_eq!(
            "{\\left(\\sin\\left({x}\\right)\\right)}^{2}",
            deftree!(pow (sin x) 2).unwrap().to_latex()
        );
        assert_eq!(
            "{\\left({x}^{2}\\right)}^{3}",
            deftree!(pow (pow x 2) 3).unwrap().to_latex()
        );
        assert_eq!(
            "{\\left(-2\\right)}^{x}",
            deftree!(pow (const -2.) x).unwrap().to_latex()
        );
    }

    #[test]
    fn t_functions() {
        assert_eq!(
            "\\sin\\left({\\left({2}\\cdot{x}\\right)}\\right)",
            deftree!(sin (* 2 x)).unwrap().to_latex()
        );
        assert_eq!(
            "\\operatorname{tg}\\left({x}\\right)",
            deftree!(tg x).unwrap().to_latex()
        );
        assert_eq!(
            "\\operatorname{cth}\\left({\\ln\\left({x}\\right)}\\right)",
            deftree!(cth (ln x)).unwrap().to_latex()
        );
        assert_eq!(
            "\\exp\\left({{x}^{2}}\\right)",
            deftree!(exp (pow x 2)).unwrap().to_latex()
        );
    }
}
