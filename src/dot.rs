use crate::tree::{Node, Node::*, Tree};
use std::fmt::{Display, Formatter};

/// Fill colors of the node kinds, as `0xRRGGBB`.
pub const OPERATOR_COLOR: u32 = 0xEFF94F;
pub const NUMBER_COLOR: u32 = 0x5656EC;
pub const VARIABLE_COLOR: u32 = 0x70DF70;
pub const FUNCTION_COLOR: u32 = 0xF0A04B;

/// A node declaration in the graph description of a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: usize,
    pub label: String,
    pub color: u32,
}

/// The nodes of a tree and the edges from parents to their children. Node ids
/// are assigned in depth first order, starting with 0 at the root, and left
/// children come before right children.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<(usize, usize)>,
}

/// Format a number with six significant digits, switching to scientific
/// notation for very large or very small magnitudes. Trailing zeros are
/// dropped, and the exponent has a sign and at least two digits, like `%g` in
/// C.
fn general_format(val: f64) -> String {
    const PRECISION: i32 = 6;
    if !val.is_finite() {
        return val.to_string();
    }
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, val);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if exponent < -4 || exponent >= PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let fixed = format!("{:.*}", (PRECISION - 1 - exponent) as usize, val);
        trim_fraction(&fixed).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

impl Node {
    /// The text shown for this node in a graph. Children are not included.
    pub fn label(&self) -> String {
        match self {
            Constant(val) => general_format(*val),
            Variable(label) => label.to_string(),
            Operator(op, ..) => op.symbol().to_string(),
            Function(kind, _) => kind.name().to_string(),
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            Constant(_) => NUMBER_COLOR,
            Variable(_) => VARIABLE_COLOR,
            Operator(..) => OPERATOR_COLOR,
            Function(..) => FUNCTION_COLOR,
        }
    }
}

impl Tree {
    pub fn graph(&self) -> Graph {
        let mut nodes = Vec::with_capacity(self.len());
        let mut edges = Vec::with_capacity(self.len().saturating_sub(1));
        for visit in self.root().walk() {
            nodes.push(GraphNode {
                id: visit.index,
                label: visit.node.label(),
                color: visit.node.color(),
            });
            if let Some(parent) = visit.parent {
                edges.push((parent, visit.index));
            }
        }
        Graph { nodes, edges }
    }

    /// Produce the graphviz description of this tree, to be rendered with
    /// `dot`.
    pub fn to_dot(&self) -> String {
        self.graph().to_string()
    }
}

impl Display for Graph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "digraph\n{{")?;
        for node in &self.nodes {
            writeln!(
                f,
                "node{} [shape = Mrecord; label = \"{{{}}}\"; style = filled; fillcolor = \"#{:06X}\"];",
                node.id, node.label, node.color
            )?;
        }
        for (parent, child) in &self.edges {
            writeln!(f, "node{} -> node{}", parent, child)?;
        }
        writeln!(f, "}}")
    }
}
