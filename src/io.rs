use crate::tree::{Node, Node::*, Tree};
use std::fmt::{Display, Formatter};

/// Writes the node as fully parenthesized infix text in the input grammar, so
/// the output can be parsed back into an equivalent tree. There is no unary
/// minus in the grammar, so negative constants are written as `(0-c)`.
impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant(val) if val.is_sign_negative() => write!(f, "(0-{})", -val),
            Constant(val) => write!(f, "{}", val),
            Variable(label) => write!(f, "{}", label),
            Operator(op, _, lhs, rhs) => write!(f, "({}{}{})", lhs, op.symbol(), rhs),
            Function(kind, input) => write!(f, "{}({})", kind.name(), input),
        }
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root())
    }
}

impl Tree {
    /// Render the tree with one node per line, and box drawing characters
    /// connecting parents to their children. Useful for debugging.
    pub fn dump(&self) -> String {
        TreeDump(self).to_string()
    }
}

struct TreeDump<'a>(&'a Tree);

/// One line of the dump, without its children.
fn describe(node: &Node) -> String {
    match node {
        Constant(val) => format!("Constant({})", val),
        Variable(label) => format!("Variable({})", label),
        Operator(op, rule, ..) => format!("{:?} ({:?})", op, rule),
        Function(kind, _) => format!("{:?}", kind),
    }
}

impl Display for TreeDump<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        enum Token<'a> {
            Branch,
            Pass,
            Turn,
            Gap,
            Newline,
            NodeRef(usize, &'a Node),
        }
        use Token::*;
        let tree = self.0;
        // Walk the tree and collect tokens.
        let tokens = {
            // First pass of collecting tokens with no branching.
            let mut tokens: Vec<Token> = Vec::with_capacity(tree.len() * 2);
            for visit in tree.root().walk() {
                if visit.depth > 0 {
                    for _ in 0..(visit.depth - 1) {
                        tokens.push(Gap);
                    }
                    tokens.push(Turn);
                }
                tokens.push(NodeRef(visit.index, visit.node));
                tokens.push(Newline);
            }
            // Insert branching tokens where necessary.
            let mut line_start: usize = 0;
            for i in 0..tokens.len() {
                match tokens[i] {
                    Branch | Pass | Gap | NodeRef(..) => {} // Do nothing.
                    Newline => line_start = i,
                    Turn => {
                        let offset = i - line_start;
                        for li in (0..line_start).rev() {
                            if let Newline = tokens[li] {
                                let ti = li + offset;
                                tokens[ti] = match &tokens[ti] {
                                    Branch | Pass | NodeRef(..) => break,
                                    Turn => Branch,
                                    Gap => Pass,
                                    Newline => return Err(std::fmt::Error),
                                }
                            }
                        }
                    }
                }
            }
            tokens
        };
        // Write all the tokens out.
        for token in tokens.iter() {
            match token {
                Branch => write!(f, " ├── ")?,
                Pass => write!(f, " │   ")?,
                Turn => write!(f, " └── ")?,
                Gap => write!(f, "     ")?,
                Newline => writeln!(f)?,
                NodeRef(index, node) => write!(f, "[{}] {}", index, describe(node))?,
            };
        }
        Ok(())
    }
}
