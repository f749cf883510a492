/// Construct a tree from a lisp expression, without going through the text
/// parser. Evaluates to a `MaybeTree`.
///
/// ```text
/// deftree!(* (+ 2 x) (sin x))
/// deftree!(pow x 2)
/// deftree!(sderiv (pow x 2))
/// deftree!(const -1.5)
/// ```
#[macro_export]
macro_rules! deftree {
    () => {}; // empty;
    (($($a:tt)*)) => { // Unwrap redundant parens.
        $crate::deftree!($($a)*)
    };
    ($a:block) => { // Block expressions.
        $a
    };
    // Derivatives.
    (sderiv $tree:tt) => {
        $crate::derivative::symbolic_deriv($crate::deftree!($tree))
    };
    // Constants.
    (const $tt:expr) => {{
        let out: Result<$crate::Tree, $crate::Error> = Ok($crate::Tree::constant({$tt}.into()));
        out
    }};
    // Functions.
    ($func:ident $a:tt) => {
        $crate::$func($crate::deftree!($a))
    };
    // Binary ops with function names.
    ($binary_op:ident $a:tt $b:tt) => {
        $crate::$binary_op($crate::deftree!($a), $crate::deftree!($b))
    };
    // Operators.
    (- $a:tt $b:tt) => {
        $crate::sub($crate::deftree!($a), $crate::deftree!($b))
    };
    (+ $a:tt $b:tt) => {
        $crate::add($crate::deftree!($a), $crate::deftree!($b))
    };
    (/ $a:tt $b:tt) => {
        $crate::div($crate::deftree!($a), $crate::deftree!($b))
    };
    (* $a:tt $b:tt) => {
        $crate::mul($crate::deftree!($a), $crate::deftree!($b))
    };
    // Constants
    ($a:literal) => {{
        let out: Result<$crate::Tree, $crate::Error> = Ok($crate::Tree::constant(($a).into()));
        out
    }};
    // Variables
    ($a:ident) => {{
        const LABEL: &str = {stringify!($a)};
        const {assert!(LABEL.len() == 1, "The variable can only have a single character as an identifier.")};
        let out: Result<$crate::Tree, $crate::Error> = Ok($crate::Tree::symbol(LABEL.as_bytes()[0] as char));
        out
    }};
}

/// Assert that the floating point numbers are equal within the given epsilon.
#[macro_export]
macro_rules! assert_float_eq {
    ($a:expr, $b:expr, $eps:expr, $debug:expr) => {{
        // Make variables to avoid evaluating experssions multiple times.
        let a = $a;
        let b = $b;
        let eps = $eps;
        let error = f64::abs(a - b);
        if error > eps {
            eprintln!("{:?}", $debug);
        }
        assert!(
            error <= eps,
            "Assertion failed: |({}) - ({})| = {:e} <= {:e}",
            a,
            b,
            error,
            eps
        );
    }};
    ($a:expr, $b:expr, $eps:expr) => {
        $crate::assert_float_eq!($a, $b, $eps, "")
    };
    ($a:expr, $b:expr) => {
        $crate::assert_float_eq!($a, $b, f64::EPSILON)
    };
}
