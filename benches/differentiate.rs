use criterion::{Criterion, criterion_group, criterion_main};
use symdiff::{deftree, derive, parse};

const RATIONAL: &str = "(x^3 - 2*x + 1) / (x^2 + 1) * ln(x) + e^(2*x) * sin(x^2)$";

fn b_parse(c: &mut Criterion) {
    c.bench_function("parse_rational_expression", |b| {
        b.iter(|| parse(std::hint::black_box(RATIONAL)).unwrap())
    });
}

fn b_symbolic_deriv(c: &mut Criterion) {
    let tree = parse(RATIONAL).unwrap();
    c.bench_function("symbolic_deriv_rational_expression", |b| {
        b.iter(|| std::hint::black_box(&tree).symbolic_deriv().unwrap())
    });
}

fn b_nested_functions(c: &mut Criterion) {
    let tree = deftree!(sin (cos (tg (sh (ch (th (ln (exp (pow x x))))))))).unwrap();
    c.bench_function("symbolic_deriv_nested_functions", |b| {
        b.iter(|| std::hint::black_box(&tree).symbolic_deriv().unwrap())
    });
}

fn b_derive(c: &mut Criterion) {
    c.bench_function("derive_text_pipeline", |b| {
        b.iter(|| derive(std::hint::black_box(RATIONAL)).unwrap())
    });
}

criterion_group!(bench, b_parse, b_symbolic_deriv, b_nested_functions, b_derive);
criterion_main!(bench);
