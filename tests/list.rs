#[macro_use]
mod common;

#[test]
fn mutation_via_alias() {
    eval_ok!("
a = [1, 2, 3]
b = a
push(b, 4)
println(len(a))
", "4\n");
}

#[test]
fn alias_sees_the_pushed_element() {
    eval_ok!("
a = [1, 2]
b = a
push(b, 9)
print(a[len(a) - 1])
", "9");
}

#[test]
fn printing() {
    eval_ok!("print([1, 2.5, \"three\", true, nil])", "[1, 2.5, three, true, nil]");
    eval_ok!("print([])", "[]");
    eval_ok!("print([[1, 2], [3]])", "[[1, 2], [3]]");
}

#[test]
fn trailing_comma() {
    eval_ok!("print([1, 2, 3,])", "[1, 2, 3]");
}

#[test]
fn concatenation_builds_a_new_list() {
    eval_ok!("
a = [1]
b = [2]
c = a + b
push(c, 3)
print(a)
print(c)
", "[1][1, 2, 3]");
}

#[test]
fn repetition() {
    eval_ok!("print([1, 2] * 2)", "[1, 2, 1, 2]");
    eval_ok!("print(2 * [0])", "[0, 0]");
    eval_ok!("print([1] * 0)", "[]");
    eval_err!("print([1] * -1)", "Negative repetition count");
}

#[test]
fn compares_by_identity() {
    eval_ok!("
a = [1]
b = a
c = [1]
print(a == b)
print(a == c)
", "truefalse");
}

#[test]
fn aliasing_crosses_a_function_call() {
    // The callee's chain is a copy, but the list inside it is shared.
    eval_ok!("
fill = function(items)
    push(items, 1)
end function
a = []
fill(a)
fill(a)
print(a)
", "[1, 1]");
}

#[test]
fn assignment_does_not_copy() {
    eval_ok!("
a = [1]
b = a
push(a, 2)
print(b)
", "[1, 2]");
}
