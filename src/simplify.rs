use crate::{
    error::{ArithmeticError, Error},
    tree::{
        BinaryOp::{self, *},
        MaybeTree,
        Node::{self, *},
        Tree,
    },
};
use log::{debug, trace};

/// Maximum number of passes made by `Tree::normalized`.
pub const DEFAULT_MAX_PASSES: usize = 64;

/// What an identity rewrite replaces an operator node with.
enum Identity {
    Left,
    Right,
    Zero,
}

/// Match the identities of a binary operator node with operator `op` and
/// operands `lhs` and `rhs`. Only operands that are `Constant` nodes are
/// considered. Dividing by a constant zero is an error.
fn identity(op: BinaryOp, lhs: &Node, rhs: &Node) -> Result<Option<Identity>, Error> {
    use Identity::*;
    Ok(match (op, lhs, rhs) {
        (Multiply, _, Constant(val)) if *val == 1. => Some(Left),
        (Multiply, Constant(val), _) if *val == 1. => Some(Right),
        (Multiply, _, Constant(val)) if *val == 0. => Some(Zero),
        (Multiply, Constant(val), _) if *val == 0. => Some(Zero),
        (Divide, _, Constant(val)) if *val == 0. => {
            return Err(Error::Arithmetic(ArithmeticError::DivisionByZero));
        }
        (Divide, _, Constant(val)) if *val == 1. => Some(Left),
        (Divide, Constant(val), _) if *val == 0. => Some(Zero),
        (Add, _, Constant(val)) if *val == 0. => Some(Left),
        (Add, Constant(val), _) if *val == 0. => Some(Right),
        (Subtract, _, Constant(val)) if *val == 0. => Some(Left),
        _ => None,
    })
}

/// Rewrite `node` itself, without looking at its descendants, other than to
/// check for the variable. A subtree without the variable is folded into a
/// constant. Otherwise identities are applied if the node is an operator.
/// Returns true if the node was replaced.
fn rewrite(node: &mut Node) -> Result<bool, Error> {
    if !node.contains_variable() {
        if let Constant(_) = node {
            return Ok(false);
        }
        let value = node.eval_constant()?;
        trace!("Folded {} into {}", node, value);
        *node = Constant(value);
        return Ok(true);
    }
    let replacement = match node {
        Operator(op, _, lhs, rhs) => match identity(*op, lhs, rhs)? {
            Some(Identity::Left) => Some(std::mem::replace(lhs.as_mut(), Constant(0.))),
            Some(Identity::Right) => Some(std::mem::replace(rhs.as_mut(), Constant(0.))),
            Some(Identity::Zero) => Some(Constant(0.)),
            None => None,
        },
        Constant(_) | Variable(_) | Function(..) => None,
    };
    match replacement {
        Some(replacement) => {
            trace!("Rewrote {} into {}", node, replacement);
            *node = replacement;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Simplify the subtree of `node` in place with a single structured pass, and
/// return true if anything changed.
///
/// The node is rewritten first. When that happens, the replacement is
/// rewritten once more, because a rewrite can expose another pattern at the
/// same place, but not repeatedly. Then the pass continues into the operands
/// that are operator nodes. Function operands are not descended into. Use
/// `simplify_until_stable` for repeated passes.
///
/// A node is checked for a zero divisor before its operands are folded, so
/// `x / (2 - 2)` becomes `x / 0` and the error is only reported by the next
/// pass.
///
/// On error the subtree is left partially simplified, but still equivalent to
/// the input.
pub fn simplify(node: &mut Node) -> Result<bool, Error> {
    let mut modified = rewrite(node)?;
    if modified {
        rewrite(node)?;
    }
    let children = match node {
        Operator(_, _, lhs, rhs) => {
            let mut children = false;
            if let Operator(..) = lhs.as_ref() {
                children |= simplify(lhs)?;
            }
            if let Operator(..) = rhs.as_ref() {
                children |= simplify(rhs)?;
            }
            children
        }
        Constant(_) | Variable(_) | Function(..) => false,
    };
    if children {
        // The operands changed shape, so the rule must be chosen again.
        node.rebind_rule();
        modified = true;
    }
    Ok(modified)
}

/// Repeat `simplify` until a pass makes no change, or `max_passes` passes are
/// made. Returns the number of passes that changed the tree.
pub fn simplify_until_stable(node: &mut Node, max_passes: usize) -> Result<usize, Error> {
    let mut passes = 0;
    while passes < max_passes && simplify(node)? {
        passes += 1;
    }
    Ok(passes)
}

impl Tree {
    /// Simplify the tree with a single pass. See `simplify`.
    pub fn simplified(self) -> MaybeTree {
        let mut root = self.take();
        simplify(&mut root)?;
        Tree::from_node_with_limit(root, usize::MAX)
    }

    /// Simplify the tree until no more rewrites apply.
    pub fn normalized(self) -> MaybeTree {
        let before = self.len();
        let mut root = self.take();
        let passes = simplify_until_stable(&mut root, DEFAULT_MAX_PASSES)?;
        let tree = Tree::from_node_with_limit(root, usize::MAX)?;
        debug!(
            "Simplified a tree of {} nodes into {} nodes in {} passes",
            before,
            tree.len(),
            passes
        );
        Ok(tree)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{deftree, parser::parse, test::compare_trees, tree::Rule};

    fn simplified(tree: MaybeTree) -> MaybeTree {
        tree?.simplified()
    }

    #[test]
    fn t_fold_constant_subtree() {
        assert_eq!(
            simplified(deftree!(* (+ 2 3) 7)).unwrap(),
            deftree!(35).unwrap()
        );
        // The parent was looked at before its operand was folded.
        assert_eq!(
            simplified(deftree!(+ x (* (pow 2 3) (ln 1)))).unwrap(),
            deftree!(+ x 0).unwrap()
        );
        // Function nodes fold too, when they don't contain the variable.
        assert_eq!(
            simplified(deftree!(sin 0)).unwrap(),
            deftree!(0).unwrap()
        );
    }

    #[test]
    fn t_mul_identities() {
        let x = deftree!(+ (sin x) x).unwrap();
        assert_eq!(simplified(deftree!(* (+ (sin x) x) 1)).unwrap(), x);
        assert_eq!(simplified(deftree!(* 1 (+ (sin x) x))).unwrap(), x);
        assert_eq!(
            simplified(deftree!(* (+ (sin x) x) 0)).unwrap(),
            deftree!(0).unwrap()
        );
        assert_eq!(
            simplified(deftree!(* 0 (+ (sin x) x))).unwrap(),
            deftree!(0).unwrap()
        );
        assert_eq!(simplified(deftree!(* x 1)).unwrap(), deftree!(x).unwrap());
    }

    #[test]
    fn t_div_identities() {
        assert_eq!(
            simplified(deftree!(/ (ln x) 1)).unwrap(),
            deftree!(ln x).unwrap()
        );
        assert_eq!(
            simplified(deftree!(/ 0 (ln x))).unwrap(),
            deftree!(0).unwrap()
        );
        assert_eq!(simplified(deftree!(/ x 1)).unwrap(), deftree!(x).unwrap());
    }

    #[test]
    fn t_add_sub_identities() {
        assert_eq!(simplified(deftree!(+ x 0)).unwrap(), deftree!(x).unwrap());
        assert_eq!(simplified(deftree!(+ 0 x)).unwrap(), deftree!(x).unwrap());
        assert_eq!(simplified(deftree!(- x 0)).unwrap(), deftree!(x).unwrap());
        // 0 - x has no identity.
        assert_eq!(
            simplified(deftree!(- 0 x)).unwrap(),
            deftree!(- 0 x).unwrap()
        );
    }

    #[test]
    fn t_divide_by_zero() {
        assert_eq!(
            simplified(deftree!(/ x 0)).unwrap_err(),
            Error::Arithmetic(ArithmeticError::DivisionByZero)
        );
        // While folding a constant subtree.
        assert_eq!(
            simplified(deftree!(+ x (/ 1 (- 2 2)))).unwrap_err(),
            Error::Arithmetic(ArithmeticError::DivisionByZero)
        );
        assert_eq!(
            simplified(deftree!(ln (const -2.))).unwrap_err(),
            Error::Arithmetic(ArithmeticError::NotANumber)
        );
        assert_eq!(
            simplified(deftree!(* x (pow 10 400))).unwrap_err(),
            Error::Arithmetic(ArithmeticError::Overflow)
        );
    }

    #[test]
    fn t_late_zero_divisor() {
        let once = simplified(deftree!(/ x (- 2 2))).unwrap();
        assert_eq!(once, deftree!(/ x 0).unwrap());
        assert_eq!(
            once.simplified().unwrap_err(),
            Error::Arithmetic(ArithmeticError::DivisionByZero)
        );
        assert_eq!(
            parse("x / (2 - 2)$").unwrap().normalized().unwrap_err(),
            Error::Arithmetic(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn t_rewrite_once_more() {
        // Rewriting (x * 1) + 0 to x * 1 exposes another identity at the
        // same node, which is caught by the second look.
        assert_eq!(
            simplified(deftree!(+ (* x 1) 0)).unwrap(),
            deftree!(x).unwrap()
        );
        // But not a third one.
        assert_eq!(
            simplified(deftree!(+ (* (- x 0) 1) 0)).unwrap(),
            deftree!(- x 0).unwrap()
        );
    }

    #[test]
    fn t_single_pass() {
        // The operand folds to 1 after the parent was already looked at.
        let mut node = deftree!(* x (- 2 1)).unwrap().take();
        assert!(simplify(&mut node).unwrap());
        assert_eq!(&node, deftree!(* x 1).unwrap().root());
        assert!(simplify(&mut node).unwrap());
        assert_eq!(&node, &Variable('x'));
        assert!(!simplify(&mut node).unwrap());
    }

    #[test]
    fn t_function_operands_untouched() {
        let tree = deftree!(+ (sin (* x 1)) 0).unwrap();
        assert_eq!(
            tree.clone().simplified().unwrap(),
            deftree!(sin (* x 1)).unwrap()
        );
        assert_eq!(
            tree.normalized().unwrap(),
            deftree!(sin (* x 1)).unwrap()
        );
    }

    #[test]
    fn t_until_stable() {
        let mut node = deftree!(+ (* (- x 0) (+ 0 (/ 3 3))) (* 0 (ln x))).unwrap().take();
        let passes = simplify_until_stable(&mut node, DEFAULT_MAX_PASSES).unwrap();
        assert_eq!(node, Variable('x'));
        assert!(passes >= 2);
        // The pass count is capped.
        let mut node = deftree!(* x (- 2 1)).unwrap().take();
        assert_eq!(simplify_until_stable(&mut node, 1).unwrap(), 1);
        assert_eq!(&node, deftree!(* x 1).unwrap().root());
    }

    #[test]
    fn t_pow_rule_rebound() {
        let tree = deftree!(pow (+ x 0) (+ 1 1)).unwrap();
        assert_eq!(tree.root().rule(), Rule::GeneralPower);
        let tree = tree.simplified().unwrap();
        assert_eq!(tree, deftree!(pow x 2).unwrap());
        assert_eq!(tree.root().rule(), Rule::PowerConstExponent);
        // The derivative of the simplified tree is valid for negative x.
        compare_trees(
            &tree.symbolic_deriv().unwrap(),
            &deftree!(* 2 x).unwrap(),
            (-5., 5.),
            50,
            1e-14,
        );
    }

    #[test]
    fn t_simplify_derivative() {
        let deriv = parse("x^2$").unwrap().symbolic_deriv().unwrap();
        let tree = deriv.clone().normalized().unwrap();
        assert!(tree.len() < deriv.len());
        assert_eq!(tree, deftree!(* 2 (pow x 1)).unwrap());
        compare_trees(&tree, &deriv, (-10., 10.), 100, 0.);
    }
}
