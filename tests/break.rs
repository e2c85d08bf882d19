#[macro_use]
mod common;

#[test]
fn inside_while() {
    eval_ok!("
i = 0
while true
    if i == 3 then break end if
    print(i)
    i += 1
end while
", "012");
}

#[test]
fn inside_for() {
    eval_ok!("
for i in range(10)
    if i == 3 then break end if
    print(i)
end for
", "012");
}

#[test]
fn breaks_only_the_enclosing_loop() {
    eval_ok!("
for i in range(2)
    for j in range(10)
        if j == 1 then break end if
        print(i)
        print(j)
    end for
end for
", "0010");
}

#[test]
fn continue_skips_the_rest_of_the_iteration() {
    eval_ok!("
for i in range(5)
    if i % 2 == 0 then continue end if
    print(i)
end for
", "13");
}

#[test]
fn continue_in_while_rechecks_the_condition() {
    eval_ok!("
i = 0
while i < 5
    i += 1
    if i == 2 then continue end if
    print(i)
end while
", "1345");
}

#[test]
fn no_loop() {
    eval_err!("break", "'break' outside a loop");
    eval_err!("continue", "'continue' outside a loop");
    eval_err!("if true then break end if", "'break' outside a loop");
}

#[test]
fn does_not_cross_a_function_call() {
    // A function body is not part of the caller's loop.
    eval_err!("
f = function() break end function
for i in range(3)
    f()
end for
", "'break' outside a loop");
}
