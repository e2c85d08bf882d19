#[macro_use]
mod common;

#[test]
fn conditional_chain() {
    eval_ok!("
x = 10
if x < 5 then
    print(\"lt\")
else if x == 10 then
    print(\"eq\")
else
    print(\"gt\")
end if
", "eq");
}

#[test]
fn then_branch() {
    eval_ok!("if true then print(1) end if", "1");
    eval_ok!("if false then print(1) end if", "");
}

#[test]
fn else_branch() {
    eval_ok!("if false then print(1) else print(2) end if", "2");
}

#[test]
fn first_matching_arm_wins() {
    eval_ok!("
x = 1
if x == 1 then
    print(\"a\")
else if x == 1 then
    print(\"b\")
end if
", "a");
}

#[test]
fn several_else_if_arms() {
    eval_ok!("
x = 3
if x == 1 then
    print(1)
else if x == 2 then
    print(2)
else if x == 3 then
    print(3)
else
    print(4)
end if
", "3");
}

#[test]
fn truthiness_of_conditions() {
    eval_ok!("if 1 then print(\"y\") end if", "y");
    eval_ok!("if 0 then print(\"y\") else print(\"n\") end if", "n");
    eval_ok!("if \"\" then print(\"y\") else print(\"n\") end if", "n");
    eval_ok!("if nil then print(\"y\") else print(\"n\") end if", "n");
    eval_ok!("if [] then print(\"y\") else print(\"n\") end if", "y");
}

#[test]
fn bodies_share_the_host_scope() {
    // An assignment inside the branch is visible after it.
    eval_ok!("if true then x = 1 end if print(x)", "1");
}

#[test]
fn bare_end_terminates() {
    eval_ok!("if true then print(1) end", "1");
}

#[test]
fn missing_then() {
    eval_err!("if true print(1) end if", "Expected 'then' after if condition");
}

#[test]
fn missing_terminator() {
    eval_err!("if true then print(1)", "Expected 'end if' after if statement");
}
