#[macro_use]
mod common;

#[test]
fn precedence() {
    eval_ok!("print(1 + 2 * 3)", "7");
    eval_ok!("print((1 + 2) * 3)", "9");
    eval_ok!("print(10 - 2 - 3)", "5");
}

#[test]
fn integer_division_truncates() {
    eval_ok!("print(7 / 2)", "3");
    eval_ok!("print(-7 / 2)", "-3");
}

#[test]
fn float_promotion() {
    eval_ok!("print(7 / 2.0)", "3.5");
    eval_ok!("print(1 + 0.5)", "1.5");
    eval_ok!("print(2.5 * 2)", "5");
}

#[test]
fn remainder() {
    eval_ok!("print(7 % 3)", "1");
    eval_ok!("print(-7 % 3)", "-1");
}

#[test]
fn exponent() {
    eval_ok!("print(2 ^ 10)", "1024");
    eval_ok!("print(2 ^ 0)", "1");
    eval_ok!("print(9 ^ 0.5)", "3");
    eval_ok!("print(2 ^ -1)", "0.5");
}

#[test]
fn exponent_is_left_associative() {
    // (2 ^ 3) ^ 2, not 2 ^ (3 ^ 2)
    eval_ok!("print(2 ^ 3 ^ 2)", "64");
}

#[test]
fn unary_minus() {
    eval_ok!("print(-5)", "-5");
    eval_ok!("print(-(1 + 2))", "-3");
    eval_ok!("x = 3 print(-x * 2)", "-6");
}

#[test]
fn division_by_zero() {
    eval_err!("print(1 / 0)", "Division by zero");
    eval_err!("print(1.0 / 0.0)", "Division by zero");
    eval_err!("print(1 % 0)", "Modulo by zero");
}

#[test]
fn type_mismatch() {
    eval_err!("print(1 + nil)", "Binary operation '+' is not supported between int type and nil type");
    eval_err!("print(true * false)", "Binary operation '*' is not supported between bool type and bool type");
    eval_err!("print(-\"x\")", "Unary '-' is not supported for string type");
}

#[test]
fn output_follows_source_order() {
    eval_ok!("print(1) print(2) print(3)", "123");
}
