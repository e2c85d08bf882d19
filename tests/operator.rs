#[macro_use]
mod common;

#[test]
fn equality() {
    eval_ok!("print(1 == 1)", "true");
    eval_ok!("print(1 == 2)", "false");
    eval_ok!("print(1 == 1.0)", "true");
    eval_ok!("print(1 != 2)", "true");
    eval_ok!("print(true == true)", "true");
    eval_ok!("print(true == false)", "false");
}

#[test]
fn nil_compares_without_an_error() {
    eval_ok!("print(nil == nil)", "true");
    eval_ok!("print(nil == 0)", "false");
    eval_ok!("print(nil != \"\")", "true");
    eval_ok!("print(nil == [])", "false");
}

#[test]
fn cross_kind_equality_is_an_error() {
    eval_err!("print(1 == \"1\")", "Binary operation '==' is not supported between int type and string type");
    eval_err!("print(true == 1)", "Binary operation '==' is not supported between bool type and int type");
}

#[test]
fn ordering() {
    eval_ok!("print(1 < 2)", "true");
    eval_ok!("print(2 <= 2)", "true");
    eval_ok!("print(3 > 2.5)", "true");
    eval_ok!("print(2 >= 3)", "false");
}

#[test]
fn cross_kind_ordering_is_an_error() {
    eval_err!("print(1 < \"2\")", "Binary operation '<' is not supported between int type and string type");
    eval_err!("print([1] < [2])", "Binary operation '<' is not supported between list type and list type");
}

#[test]
fn logical_operators_yield_booleans() {
    eval_ok!("print(1 and 2)", "true");
    eval_ok!("print(1 and 0)", "false");
    eval_ok!("print(0 or \"\")", "false");
    eval_ok!("print(0 or 3)", "true");
    eval_ok!("print(not 0)", "true");
    eval_ok!("print(not \"x\")", "false");
}

#[test]
fn logical_operators_short_circuit() {
    // The right side would be an undefined-variable error.
    eval_ok!("print(false and missing)", "false");
    eval_ok!("print(true or missing)", "true");
}

#[test]
fn precedence_of_logic_and_comparison() {
    eval_ok!("print(1 < 2 and 3 < 4)", "true");
    eval_ok!("print(1 + 1 == 2 or false)", "true");
    eval_ok!("print(not (1 == 0))", "true");
}
