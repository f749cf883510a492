use crate::{
    error::Error,
    token::{Token, Tokens, tokenize},
    tree::{BinaryOp, DEFAULT_MAX_DEPTH, MaybeTree, Node, Tree},
};
use log::debug;

/// Parse `text` into a tree. The text is an infix expression, optionally
/// terminated by `$`.
///
/// ```text
/// Goal         := Expr END
/// Expr         := Term (('+' | '-') Term)*
/// Term         := Power (('*' | '/') Power)*
/// Power        := Primary ('^' Primary)*
/// Primary      := '(' Expr ')' | FunctionCall | Number | Variable
/// FunctionCall := FunctionName Primary
/// ```
///
/// All binary operators, including `^`, are left associative. The argument of
/// a function is a single `Primary`, so `sin x + 1` is `sin(x) + 1`.
pub fn parse(text: &str) -> MaybeTree {
    let tokens = tokenize(text)?;
    Parser::new(&tokens).parse()
}

/// Recursive descent parser over a token sequence.
pub struct Parser<'a> {
    tokens: &'a Tokens,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a Tokens) -> Parser<'a> {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit the depth of the parsed tree. Deeper input fails with
    /// `Error::TooDeep`. The depth counts levels of the tree, not parentheses,
    /// so a long flat chain such as `x+1+1+...` also reaches the limit
    /// because every operator sits one level below the next.
    pub fn with_max_depth(mut self, max_depth: usize) -> Parser<'a> {
        self.max_depth = max_depth;
        self
    }

    /// Parse the whole token sequence. The tokens after the expression must be
    /// the end marker.
    pub fn parse(mut self) -> MaybeTree {
        let node = self.parse_expr()?;
        self.expect(Token::End, "end of input")?;
        let tree = Tree::from_node_with_limit(node, self.max_depth)?;
        debug!(
            "Parsed {} tokens into a tree of {} nodes",
            self.tokens.len(),
            tree.len()
        );
        Ok(tree)
    }

    fn current(&self) -> Token {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn syntax_error(&self, expected: &'static str) -> Error {
        Error::Syntax {
            expected,
            found: self.current().to_string(),
            position: self.tokens.position(self.pos),
        }
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), Error> {
        if self.current() == token {
            self.advance();
            Ok(())
        } else {
            Err(self.syntax_error(expected))
        }
    }

    fn parse_expr(&mut self) -> Result<Node, Error> {
        let mut lhs = self.parse_term()?;
        while let Token::Operator(op @ (BinaryOp::Add | BinaryOp::Subtract)) = self.current() {
            self.advance();
            let rhs = self.parse_term()?;
            lhs = Node::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Node, Error> {
        let mut lhs = self.parse_power()?;
        while let Token::Operator(op @ (BinaryOp::Multiply | BinaryOp::Divide)) = self.current()
        {
            self.advance();
            let rhs = self.parse_power()?;
            lhs = Node::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_power(&mut self) -> Result<Node, Error> {
        let mut base = self.parse_primary()?;
        while let Token::Operator(BinaryOp::Pow) = self.current() {
            self.advance();
            let exponent = self.parse_primary()?;
            // The rule is chosen from the shape of base and exponent here.
            base = Node::binary(BinaryOp::Pow, base, exponent);
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Node, Error> {
        // Every level of nesting goes through here, so this bounds the
        // recursion of the parser.
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(Error::TooDeep(self.max_depth));
        }
        let node = match self.current() {
            Token::Open => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(Token::Close, "')'")?;
                inner
            }
            Token::Function(kind) => {
                self.advance();
                Node::function(kind, self.parse_primary()?)
            }
            Token::Number(val) => {
                self.advance();
                Node::Constant(val)
            }
            Token::Variable(label) => {
                self.advance();
                Node::Variable(label)
            }
            Token::Close | Token::Operator(_) | Token::End => {
                return Err(self.syntax_error("'(', a number, a function or a variable"));
            }
        };
        self.depth -= 1;
        Ok(node)
    }
}
