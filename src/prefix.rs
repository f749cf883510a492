/*!
The parenthesized prefix format for storing trees. Every node is written as

```text
( payload [left subtree] [right subtree] )
```

where the payload is a number, the variable, an operator character or a
function name. Operators have two subtrees, functions have one and leaves
have none. For example `(2 + 3) * 7` is `(*(+(2)(3))(7))` and `sin x` is
`(sin(x))`. Whitespace is allowed between the parts.
*/

use crate::{
    error::Error,
    token::{Token, is_digit_at, resolve_identifier, scan_number},
    tree::{BinaryOp, DEFAULT_MAX_DEPTH, MaybeTree, Node, Node::*, Tree},
};
use log::debug;

impl Tree {
    /// Write the tree in the prefix format.
    pub fn to_prefix(&self) -> String {
        let mut out = String::with_capacity(self.len() * 4);
        write_prefix(self.root(), &mut out);
        out
    }
}

fn write_prefix(node: &Node, out: &mut String) {
    out.push('(');
    match node {
        Constant(val) => out.push_str(&val.to_string()),
        Variable(label) => out.push(*label),
        Operator(op, _, lhs, rhs) => {
            out.push(op.symbol());
            write_prefix(lhs, out);
            write_prefix(rhs, out);
        }
        Function(kind, input) => {
            out.push_str(kind.name());
            write_prefix(input, out);
        }
    }
    out.push(')');
}

/// Read a tree written in the prefix format. The rules of the operator nodes
/// are chosen from their operands, just like when parsing infix text.
pub fn parse_prefix(text: &str) -> MaybeTree {
    let mut reader = Reader {
        text,
        pos: 0,
        depth: 0,
        max_depth: DEFAULT_MAX_DEPTH,
    };
    let node = reader.read_node()?;
    reader.skip_whitespace();
    if reader.pos < text.len() {
        return Err(reader.syntax_error("end of input"));
    }
    let tree = Tree::from_node_with_limit(node, reader.max_depth)?;
    debug!("Read a tree of {} nodes in prefix format", tree.len());
    Ok(tree)
}

struct Reader<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl Reader<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn syntax_error(&self, expected: &'static str) -> Error {
        Error::Syntax {
            expected,
            found: match self.peek() {
                Some(c) => format!("'{}'", c),
                None => "end of input".to_string(),
            },
            position: self.pos,
        }
    }

    fn expect(&mut self, c: char, expected: &'static str) -> Result<(), Error> {
        self.skip_whitespace();
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.syntax_error(expected))
        }
    }

    fn read_node(&mut self) -> Result<Node, Error> {
        self.expect('(', "'('")?;
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(Error::TooDeep(self.max_depth));
        }
        self.skip_whitespace();
        let node = match self.read_payload()? {
            Token::Number(val) => Constant(val),
            Token::Variable(label) => Variable(label),
            Token::Function(kind) => Node::function(kind, self.read_node()?),
            Token::Operator(op) => {
                let lhs = self.read_node()?;
                let rhs = self.read_node()?;
                Node::binary(op, lhs, rhs)
            }
            Token::Open | Token::Close | Token::End => {
                return Err(Error::Structural("prefix payload is not a node"));
            }
        };
        self.expect(')', "')'")?;
        self.depth -= 1;
        Ok(node)
    }

    fn read_payload(&mut self) -> Result<Token, Error> {
        let bytes = self.text.as_bytes();
        let start = self.pos;
        let starts_number = |i: usize| {
            is_digit_at(bytes, i) || (bytes.get(i) == Some(&b'.') && is_digit_at(bytes, i + 1))
        };
        let c = match self.peek() {
            Some(c) => c,
            None => return Err(self.syntax_error("a node payload")),
        };
        // A minus sign directly followed by a digit is part of a number.
        if starts_number(start) || (c == '-' && starts_number(start + 1)) {
            let digits = if c == '-' { start + 1 } else { start };
            let end = scan_number(bytes, digits);
            self.pos = end;
            return match self.text[start..end].parse::<f64>() {
                Ok(val) if val.is_finite() => Ok(Token::Number(val)),
                Ok(_) | Err(_) => Err(Error::Lex {
                    position: start,
                    found: c,
                }),
            };
        }
        if let Some(op) = BinaryOp::from_symbol(c) {
            self.pos += 1;
            return Ok(Token::Operator(op));
        }
        if c.is_ascii_alphabetic() {
            let len = self.text[start..]
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(self.text.len() - start);
            self.pos = start + len;
            return resolve_identifier(&self.text[start..self.pos], start);
        }
        Err(self.syntax_error("a node payload"))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{deftree, parser::parse, tree::FunctionKind};

    #[test]
    fn t_write() {
        assert_eq!(parse("(2+3)*7$").unwrap().to_prefix(), "(*(+(2)(3))(7))");
        assert_eq!(deftree!(sin x).unwrap().to_prefix(), "(sin(x))");
        assert_eq!(
            deftree!(pow (const -1.5) (cth x)).unwrap().to_prefix(),
            "(^(-1.5)(cth(x)))"
        );
    }

    #[test]
    fn t_read() {
        assert_eq!(
            parse_prefix("(*(+(2)(3))(7))").unwrap(),
            deftree!(* (+ 2 3) 7).unwrap()
        );
        assert_eq!(
            parse_prefix(" ( * ( + (2) (x) )\n\t(ln (x)) ) ").unwrap(),
            deftree!(* (+ 2 x) (ln x)).unwrap()
        );
        // Negative numbers and the subtraction operator.
        assert_eq!(
            parse_prefix("(-(x)(-2.5))").unwrap(),
            deftree!(- x (const -2.5)).unwrap()
        );
        assert_eq!(
            parse_prefix("(^(x)(.5))").unwrap(),
            deftree!(pow x 0.5).unwrap()
        );
        // Aliases are accepted.
        assert_eq!(
            parse_prefix("(tan(x))").unwrap().root(),
            &Node::function(FunctionKind::Tg, Variable('x'))
        );
    }

    #[test]
    fn t_round_trip() {
        let tree = parse("x^3 * ln(x) / (x + 1) - 2^sin(x)$").unwrap();
        let deriv = tree.symbolic_deriv().unwrap();
        for tree in [tree, deriv] {
            assert_eq!(parse_prefix(&tree.to_prefix()).unwrap(), tree);
        }
    }

    #[test]
    fn t_errors() {
        assert_eq!(
            parse_prefix("").unwrap_err(),
            Error::Syntax {
                expected: "'('",
                found: "end of input".to_string(),
                position: 0
            }
        );
        // Missing operand.
        assert_eq!(
            parse_prefix("(+(2))").unwrap_err(),
            Error::Syntax {
                expected: "'('",
                found: "')'".to_string(),
                position: 5
            }
        );
        // Leaves have no subtrees.
        assert_eq!(
            parse_prefix("(2(3))").unwrap_err(),
            Error::Syntax {
                expected: "')'",
                found: "'('".to_string(),
                position: 2
            }
        );
        assert_eq!(
            parse_prefix("(x)(x)").unwrap_err(),
            Error::Syntax {
                expected: "end of input",
                found: "'('".to_string(),
                position: 3
            }
        );
        assert!(matches!(
            parse_prefix("(%)"),
            Err(Error::Syntax { position: 1, .. })
        ));
        assert!(matches!(
            parse_prefix("(sin(x)"),
            Err(Error::Syntax { expected: "')'", .. })
        ));
        assert_eq!(
            parse_prefix("(*(x)(-1e400))").unwrap_err(),
            Error::Lex {
                position: 6,
                found: '-'
            }
        );
        assert_eq!(
            parse_prefix("(foo(x))").unwrap_err(),
            Error::UnknownIdentifier {
                position: 1,
                name: "foo".to_string()
            }
        );
        assert_eq!(
            parse_prefix("(*(x)(y))").unwrap_err(),
            Error::MultipleVariables('x', 'y')
        );
    }

    #[test]
    fn t_too_deep() {
        let text = format!("{}(x){}", "(sin".repeat(300), ")".repeat(300));
        assert_eq!(
            parse_prefix(&text).unwrap_err(),
            Error::TooDeep(DEFAULT_MAX_DEPTH)
        );
    }
}
