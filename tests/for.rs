#[macro_use]
mod common;

#[test]
fn range_with_step() {
    eval_ok!("
for i in range(0, 6, 2)
    print(i)
    print(\" \")
end for
", "0 2 4 ");
}

#[test]
fn range_defaults() {
    eval_ok!("for i in range(3) print(i) end for", "012");
    eval_ok!("for i in range(2, 5) print(i) end for", "234");
}

#[test]
fn range_counts_down() {
    eval_ok!("for i in range(3, 0, -1) print(i) end for", "321");
}

#[test]
fn empty_range_runs_nothing() {
    eval_ok!("for i in range(3, 3) print(i) end for", "");
    eval_ok!("for i in range(5, 0) print(i) end for", "");
}

#[test]
fn loop_variable_survives_the_loop() {
    eval_ok!("for i in range(3) end for print(i)", "2");
}

#[test]
fn zero_step_is_an_error() {
    eval_err!("for i in range(0, 5, 0) end for", "Range step cannot be zero");
}

#[test]
fn non_numeric_bound_is_an_error() {
    eval_err!("for i in range(\"a\", 5) end for", "Range start is not a number");
}

#[test]
fn over_a_list() {
    eval_ok!("
for x in [10, 20, 30]
    print(x)
    print(\" \")
end for
", "10 20 30 ");
}

#[test]
fn over_a_string_binds_characters() {
    eval_ok!("for c in \"abc\" print(c) print(c) end for", "aabbcc");
}

#[test]
fn over_a_variable_named_like_range() {
    // `range` is only special directly before a parenthesis.
    eval_ok!("range = [1, 2] for x in range print(x) end for", "12");
}

#[test]
fn over_a_non_iterable_is_an_error() {
    eval_err!("for x in 5 end for", "Cannot iterate over int type");
}

#[test]
fn nested_loops() {
    eval_ok!("
for i in range(1, 3)
    for j in range(1, 3)
        print(i * 10 + j)
        print(\" \")
    end for
end for
", "11 12 21 22 ");
}
