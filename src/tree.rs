use crate::error::Error;

/// Maximum depth of a tree accepted by the parser and by validation, unless
/// overridden. Depth is the number of levels in the tree, so left-associative
/// chains like `x+1+1+...` grow one level per operator.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Represents an operation with two inputs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Pow,
}

/// The elementary functions of one argument.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Sin,
    Cos,
    Tg,
    Ctg,
    Sh,
    Ch,
    Th,
    Cth,
    Ln,
    /// Base 10 logarithm.
    Log,
    Exp,
}

impl BinaryOp {
    /// The character this operator is written with.
    pub fn symbol(&self) -> char {
        use BinaryOp::*;
        match self {
            Add => '+',
            Subtract => '-',
            Multiply => '*',
            Divide => '/',
            Pow => '^',
        }
    }

    pub fn from_symbol(c: char) -> Option<BinaryOp> {
        use BinaryOp::*;
        Some(match c {
            '+' => Add,
            '-' => Subtract,
            '*' => Multiply,
            '/' => Divide,
            '^' => Pow,
            _ => return None,
        })
    }
}

impl FunctionKind {
    /// The canonical name of the function, as accepted by the tokenizer.
    pub fn name(&self) -> &'static str {
        use FunctionKind::*;
        match self {
            Sin => "sin",
            Cos => "cos",
            Tg => "tg",
            Ctg => "ctg",
            Sh => "sh",
            Ch => "ch",
            Th => "th",
            Cth => "cth",
            Ln => "ln",
            Log => "log",
            Exp => "exp",
        }
    }

    /// Look up a function by its canonical name or one of its aliases.
    pub fn from_name(name: &str) -> Option<FunctionKind> {
        use FunctionKind::*;
        Some(match name {
            "sin" => Sin,
            "cos" => Cos,
            "tg" | "tan" => Tg,
            "ctg" | "cot" => Ctg,
            "sh" | "sinh" => Sh,
            "ch" | "cosh" => Ch,
            "th" | "tanh" => Th,
            "cth" | "coth" => Cth,
            "ln" => Ln,
            "log" => Log,
            "exp" => Exp,
            _ => return None,
        })
    }
}

/// The differentiation strategy bound to a node when it is constructed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Rule {
    Constant,
    /// The derivative of the variable with respect to itself.
    Identity,
    Sum,
    Product,
    Quotient,
    /// `u ^ n` with a constant exponent.
    PowerConstExponent,
    /// `a ^ v` with a constant base.
    Exponential,
    /// `u ^ v`, differentiated as `e ^ (v * ln(u))`.
    GeneralPower,
    Elementary(FunctionKind),
}

impl Rule {
    /// Select the rule for a binary node from its operator and the shape of
    /// its operands. Only `Pow` depends on the operands.
    pub fn select(op: BinaryOp, lhs: &Node, rhs: &Node) -> Rule {
        match op {
            BinaryOp::Add | BinaryOp::Subtract => Rule::Sum,
            BinaryOp::Multiply => Rule::Product,
            BinaryOp::Divide => Rule::Quotient,
            BinaryOp::Pow => match (lhs, rhs) {
                (Constant(_), _) => Rule::Exponential,
                (_, Constant(_)) => Rule::PowerConstExponent,
                _ => Rule::GeneralPower,
            },
        }
    }
}

/// Represents a node in an expression tree. Every node owns its children,
/// so no two trees ever share a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Constant(f64),
    Variable(char),
    Operator(BinaryOp, Rule, Box<Node>, Box<Node>),
    Function(FunctionKind, Box<Node>),
}

use Node::*;

impl Node {
    /// Create an operator node, choosing its rule from the shape of the operands.
    pub fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Node {
        let rule = Rule::select(op, &lhs, &rhs);
        Operator(op, rule, Box::new(lhs), Box::new(rhs))
    }

    pub fn function(kind: FunctionKind, operand: Node) -> Node {
        Function(kind, Box::new(operand))
    }

    /// The rule used to differentiate this node.
    pub fn rule(&self) -> Rule {
        match self {
            Constant(_) => Rule::Constant,
            Variable(_) => Rule::Identity,
            Operator(_, rule, ..) => *rule,
            Function(kind, _) => Rule::Elementary(*kind),
        }
    }

    /// Human readable name of the kind of this node.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Constant(_) => "Number",
            Variable(_) => "Variable",
            Operator(..) => "Operation",
            Function(..) => "Function",
        }
    }

    /// Check if a variable appears anywhere in the subtree of this node.
    pub fn contains_variable(&self) -> bool {
        self.walk().any(|visit| matches!(visit.node, Variable(_)))
    }

    /// The number of nodes in the subtree of this node.
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    /// The number of levels in the subtree of this node. A leaf has depth 1.
    pub fn depth(&self) -> usize {
        self.walk().map(|visit| visit.depth + 1).max().unwrap_or(0)
    }

    /// Re-select the rule of an operator node from its current operands. This
    /// is needed after the operands are rewritten in place.
    pub(crate) fn rebind_rule(&mut self) {
        if let Operator(op, rule, lhs, rhs) = self {
            *rule = Rule::select(*op, lhs, rhs);
        }
    }
}

/// Represents an expression tree that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    root: Node,
}

pub type MaybeTree = Result<Tree, Error>;

impl Tree {
    /// Validate `node` and wrap it in a tree.
    pub fn from_node(node: Node) -> MaybeTree {
        Tree { root: node }.validated(DEFAULT_MAX_DEPTH)
    }

    pub(crate) fn from_node_with_limit(node: Node, max_depth: usize) -> MaybeTree {
        Tree { root: node }.validated(max_depth)
    }

    /// Create a tree representing a constant value.
    pub fn constant(val: f64) -> Tree {
        Tree {
            root: Constant(val),
        }
    }

    /// Create a tree representing the variable with the given `label`.
    pub fn symbol(label: char) -> Tree {
        Tree {
            root: Variable(label),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The root node of the tree. This drops the tree and gives ownership of
    /// the nodes to the caller. A tree is immutable once constructed, so
    /// algorithms that rewrite nodes take them out, do their surgery and
    /// construct a new validated tree afterwards.
    pub fn take(self) -> Node {
        self.root
    }

    /// The number of nodes in this tree.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// The variable of this tree, if any.
    pub fn variable(&self) -> Option<char> {
        self.root.walk().find_map(|visit| match visit.node {
            Variable(label) => Some(*label),
            _ => None,
        })
    }

    /// Check the tree for errors and return a Result that contains the tree if
    /// no errors were found, or the first error encountered with the tree.
    fn validated(self, max_depth: usize) -> MaybeTree {
        let mut variable: Option<char> = None;
        for visit in self.root.walk() {
            if visit.depth >= max_depth {
                return Err(Error::TooDeep(max_depth));
            }
            match visit.node {
                Constant(val) if val.is_nan() => return Err(Error::ContainsNaN),
                Constant(val) if val.is_infinite() => return Err(Error::InfiniteConstant),
                Constant(_) | Function(..) => {}
                Variable(label) => match variable {
                    Some(first) if first != *label => {
                        return Err(Error::MultipleVariables(first, *label));
                    }
                    Some(_) => {}
                    None => variable = Some(*label),
                },
                Operator(op, rule, lhs, rhs) => {
                    if *rule != Rule::select(*op, lhs, rhs) {
                        return Err(Error::Structural(
                            "operator rule doesn't match its operator or operands",
                        ));
                    }
                }
            }
        }
        return Ok(self);
    }

    fn function_op(self, kind: FunctionKind) -> MaybeTree {
        Tree::from_node(Node::function(kind, self.root))
    }

    fn binary_op(self, other: Tree, op: BinaryOp) -> MaybeTree {
        Tree::from_node(Node::binary(op, self.root, other.root))
    }
}

macro_rules! function_func {
    ($name:ident, $kind:ident) => {
        pub fn $name(tree: MaybeTree) -> MaybeTree {
            tree?.function_op(FunctionKind::$kind)
        }
    };
}

function_func!(sin, Sin);
function_func!(cos, Cos);
function_func!(tg, Tg);
function_func!(ctg, Ctg);
function_func!(sh, Sh);
function_func!(ch, Ch);
function_func!(th, Th);
function_func!(cth, Cth);
function_func!(ln, Ln);
function_func!(log, Log);
function_func!(exp, Exp);

macro_rules! binary_func {
    ($name:ident, $op:ident) => {
        pub fn $name(lhs: MaybeTree, rhs: MaybeTree) -> MaybeTree {
            lhs?.binary_op(rhs?, BinaryOp::$op)
        }
    };
}

binary_func!(add, Add);
binary_func!(sub, Subtract);
binary_func!(mul, Multiply);
binary_func!(div, Divide);
binary_func!(pow, Pow);

impl From<f64> for Tree {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl From<i32> for Tree {
    fn from(value: i32) -> Self {
        Self::constant(value as f64)
    }
}

impl From<char> for Tree {
    fn from(c: char) -> Self {
        return Self::symbol(c);
    }
}
