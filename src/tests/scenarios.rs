//! The six end-to-end scenarios from spec §8's "Testable Properties"
//! table, verbatim apart from an appended `return` (spec §8 states
//! expected *stdout*; `print`'s own behavior is covered separately in
//! `builtins.rs`'s tests, so here the same source is checked by its
//! final value instead of by capturing stdout).

use crate::Value;

check! {
  scenario_1_arithmetic_and_print,
  r#"
    x = 3 + 4 * 2
    print(x)
    return x
  "#,
  Value::Int(11)
}

check_repr! {
  scenario_2_string_concatenation_over_a_for_loop,
  r#"
    s = ""
    for c in "abc" do s = s + c done
    print(s)
    return s
  "#,
  "\"abc\""
}

check! {
  scenario_3_while_loop_accumulation,
  r#"
    n = 0
    i = 1
    while i < 5 do n = n + i; i = i + 1 done
    print(n)
    return n
  "#,
  Value::Int(10)
}

check! {
  scenario_4_map_read_modify_write,
  r#"
    m = {"a": 1, "b": 2}
    m["b"] = m["a"] + m["b"]
    print(m["b"])
    return m["b"]
  "#,
  Value::Int(3)
}

check! {
  scenario_5_recursive_fibonacci,
  r#"
    f = func (n) if n < 2 then return n else return f(n-1) + f(n-2) end end
    print(f(10))
    return f(10)
  "#,
  Value::Int(55)
}

check_repr! {
  scenario_6_break_leaves_the_rest_of_the_list_untouched,
  r#"
    l = [1,2,3]
    for x in l do if x == 2 then break end done
    print(l[0], l[2])
    return [l[0], l[2]]
  "#,
  "[1, 3]"
}
