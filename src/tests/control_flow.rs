//! `if/then/else/end`, `while/do/done`, `for/do/done`, `break`/`continue`,
//! grounded on the shape of `examples/jprochazk-hebi/src/tests/loops.rs`
//! (one `check!` per control-flow shape) but checking a returned value
//! instead of a stdout snapshot.

use crate::Value;

check! {
  if_then_without_else,
  r#"
    x = 0
    if 1 < 2 then
      x = 1
    end
    return x
  "#,
  Value::Int(1)
}

check! {
  if_then_else_takes_the_else_branch,
  r#"
    x = 0
    if 1 > 2 then
      x = 1
    else
      x = 2
    end
    return x
  "#,
  Value::Int(2)
}

check! {
  while_loop_accumulates_sum_0_to_9,
  r#"
    n = 0
    i = 1
    while i < 5 do
      n = n + i
      i = i + 1
    done
    return n
  "#,
  Value::Int(10)
}

check! {
  for_loop_over_a_list_literal,
  r#"
    total = 0
    for x in [1, 2, 3] do
      total = total + x
    done
    return total
  "#,
  Value::Int(6)
}

check! {
  for_loop_over_a_range_native,
  r#"
    total = 0
    for i in range(5) do
      total = total + i
    done
    return total
  "#,
  Value::Int(0 + 1 + 2 + 3 + 4)
}

check! {
  for_loop_over_a_range_with_negative_step,
  r#"
    seen = []
    for i in range(3, 0, -1) do
      seen = seen + [i]
    done
    return sum(seen)
  "#,
  Value::Int(6)
}

check! {
  break_exits_the_loop_early,
  r#"
    total = 0
    for x in [1, 2, 3, 4] do
      if x == 3 then break end
      total = total + x
    done
    return total
  "#,
  Value::Int(3)
}

check! {
  continue_skips_the_rest_of_the_body,
  r#"
    total = 0
    for x in range(10) do
      if x % 2 == 0 then continue end
      total = total + x
    done
    return total
  "#,
  Value::Int(1 + 3 + 5 + 7 + 9)
}

check! {
  empty_list_iteration_runs_the_body_zero_times,
  r#"
    total = 0
    for x in [] do
      total = total + 1
    done
    return total
  "#,
  Value::Int(0)
}

check! {
  nested_loops_and_break_only_exit_the_innermost,
  r#"
    hits = 0
    for a in range(3) do
      for b in range(3) do
        if b == 1 then break end
        hits = hits + 1
      done
    done
    return hits
  "#,
  Value::Int(3)
}

check_error! {
  break_outside_a_loop_is_a_compile_error,
  r#"
    break
  "#,
  diag::Kind::Compile
}

check_error! {
  continue_outside_a_loop_is_a_compile_error,
  r#"
    continue
  "#,
  diag::Kind::Compile
}
