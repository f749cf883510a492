use crate::{
    error::Error,
    parser::parse,
    tree::{
        BinaryOp::{self, *},
        FunctionKind::{self, *},
        MaybeTree,
        Node::{self, *},
        Rule, Tree,
    },
};
use log::debug;

/// Compute the symbolic derivative of `tree` with respect to its variable.
pub fn symbolic_deriv(tree: MaybeTree) -> MaybeTree {
    tree?.symbolic_deriv()
}

/// Parse `text`, differentiate it and simplify the derivative until no more
/// rewrites apply.
pub fn derive(text: &str) -> MaybeTree {
    parse(text)?.symbolic_deriv()?.normalized()
}

impl Tree {
    /// Compute the symbolic derivative of this tree with respect to its
    /// variable. A tree without a variable has the derivative 0. The result is
    /// not simplified.
    pub fn symbolic_deriv(&self) -> MaybeTree {
        let deriv = differentiate(self.root())?;
        debug!(
            "Differentiated a tree of {} nodes into {} nodes",
            self.len(),
            deriv.len()
        );
        // The derivative can be deeper than the input, by a bounded factor.
        Tree::from_node_with_limit(deriv, usize::MAX)
    }
}

fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Node {
    Node::binary(op, lhs, rhs)
}

fn function(kind: FunctionKind, operand: Node) -> Node {
    Node::function(kind, operand)
}

/// Differentiate `node` by applying the rule bound to it. The result is a new
/// tree. Operands of `node` that appear in the result are cloned, which copies
/// the whole subtree, so the result never shares nodes with the input.
pub fn differentiate(node: &Node) -> Result<Node, Error> {
    Ok(match (node.rule(), node) {
        (Rule::Constant, Constant(_)) => Constant(0.),
        (Rule::Identity, Variable(_)) => Constant(1.),
        (Rule::Sum, Operator(op @ (Add | Subtract), _, u, v)) => {
            binary(*op, differentiate(u)?, differentiate(v)?)
        }
        (Rule::Product, Operator(Multiply, _, u, v)) => {
            // u' * v + v' * u
            let (du, dv) = (differentiate(u)?, differentiate(v)?);
            binary(
                Add,
                binary(Multiply, du, (**v).clone()),
                binary(Multiply, dv, (**u).clone()),
            )
        }
        (Rule::Quotient, Operator(Divide, _, u, v)) => {
            // (u' * v - v' * u) / v ^ 2
            let (du, dv) = (differentiate(u)?, differentiate(v)?);
            let numerator = binary(
                Subtract,
                binary(Multiply, du, (**v).clone()),
                binary(Multiply, dv, (**u).clone()),
            );
            binary(
                Divide,
                numerator,
                binary(Pow, (**v).clone(), Constant(2.)),
            )
        }
        (Rule::PowerConstExponent, Operator(Pow, _, u, n)) => match n.as_ref() {
            // n * u ^ (n - 1) * u'
            Constant(n) => binary(
                Multiply,
                binary(
                    Multiply,
                    Constant(*n),
                    binary(Pow, (**u).clone(), Constant(n - 1.)),
                ),
                differentiate(u)?,
            ),
            _ => return Err(Error::Structural("constant exponent rule on a variable exponent")),
        },
        (Rule::Exponential, Operator(Pow, _, a, v)) => match a.as_ref() {
            // ln(a) * a ^ v * v'
            Constant(_) => binary(
                Multiply,
                binary(Multiply, function(Ln, (**a).clone()), node.clone()),
                differentiate(v)?,
            ),
            _ => return Err(Error::Structural("exponential rule on a variable base")),
        },
        (Rule::GeneralPower, Operator(Pow, _, u, v)) => {
            // u ^ v = e ^ (v * ln(u)), so the derivative is (v * ln(u))' * u ^ v.
            let exponent = binary(Multiply, (**v).clone(), function(Ln, (**u).clone()));
            binary(Multiply, differentiate(&exponent)?, node.clone())
        }
        (Rule::Elementary(rule), Function(kind, u)) if rule == *kind => {
            binary(Multiply, outer_derivative(*kind, u), differentiate(u)?)
        }
        _ => return Err(Error::Structural("node doesn't match its differentiation rule")),
    })
}

/// The derivative of the function `kind` evaluated at `u`. This is the outer
/// factor of the chain rule.
fn outer_derivative(kind: FunctionKind, u: &Node) -> Node {
    let u = u.clone();
    let inverse_square = |numerator: f64, base: Node| {
        binary(
            Divide,
            Constant(numerator),
            binary(Pow, base, Constant(2.)),
        )
    };
    match kind {
        Sin => function(Cos, u),
        Cos => binary(Multiply, Constant(-1.), function(Sin, u)),
        Tg => inverse_square(1., function(Cos, u)),
        Ctg => inverse_square(-1., function(Sin, u)),
        Sh => function(Ch, u),
        Ch => function(Sh, u),
        Th => inverse_square(1., function(Ch, u)),
        Cth => inverse_square(-1., function(Sh, u)),
        Ln => binary(Divide, Constant(1.), u),
        Log => binary(
            Divide,
            Constant(1.),
            binary(Multiply, u, function(Ln, Constant(10.))),
        ),
        Exp => function(Exp, u),
    }
}
