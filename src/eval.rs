use crate::{
    error::{ArithmeticError, Error},
    tree::{
        BinaryOp::{self, *},
        FunctionKind::{self, *},
        Node::{self, *},
        Tree,
    },
};

impl BinaryOp {
    /// Compute the result of the operation on `lhs` and `rhs`. Dividing by
    /// exactly zero is an error.
    pub fn apply(&self, lhs: f64, rhs: f64) -> Result<f64, Error> {
        Ok(match self {
            Add => lhs + rhs,
            Subtract => lhs - rhs,
            Multiply => lhs * rhs,
            Divide => {
                if rhs == 0. {
                    return Err(Error::Arithmetic(ArithmeticError::DivisionByZero));
                }
                lhs / rhs
            }
            Pow => f64::powf(lhs, rhs),
        })
    }
}

impl FunctionKind {
    /// Compute the value of the function at `value`.
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Sin => f64::sin(value),
            Cos => f64::cos(value),
            Tg => f64::tan(value),
            Ctg => f64::cos(value) / f64::sin(value),
            Sh => f64::sinh(value),
            Ch => f64::cosh(value),
            Th => f64::tanh(value),
            Cth => f64::cosh(value) / f64::sinh(value),
            Ln => f64::ln(value),
            Log => f64::log10(value),
            Exp => f64::exp(value),
        }
    }
}

impl Node {
    /// Evaluate the subtree of this node with the variable set to `x`.
    pub fn eval(&self, x: f64) -> Result<f64, Error> {
        match self {
            Constant(val) => Ok(*val),
            Variable(_) => Ok(x),
            Operator(op, _, lhs, rhs) => op.apply(lhs.eval(x)?, rhs.eval(x)?),
            Function(kind, input) => Ok(kind.apply(input.eval(x)?)),
        }
    }

    /// Evaluate a subtree that doesn't contain the variable. NaN and infinite
    /// results are reported as errors.
    pub fn eval_constant(&self) -> Result<f64, Error> {
        let value = match self {
            Constant(val) => *val,
            Variable(_) => return Err(Error::Structural("constant subtree contains a variable")),
            Operator(op, _, lhs, rhs) => op.apply(lhs.eval_constant()?, rhs.eval_constant()?)?,
            Function(kind, input) => kind.apply(input.eval_constant()?),
        };
        if value.is_nan() {
            return Err(Error::Arithmetic(ArithmeticError::NotANumber));
        }
        if value.is_infinite() {
            return Err(Error::Arithmetic(ArithmeticError::Overflow));
        }
        Ok(value)
    }
}

impl Tree {
    /// Evaluate the tree with its variable set to `x`.
    pub fn eval(&self, x: f64) -> Result<f64, Error> {
        self.root().eval(x)
    }
}
