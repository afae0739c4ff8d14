//! The error taxonomy of spec §7, exercised end-to-end rather than unit
//! by unit (each opcode module already covers its own error arms).

check_error! {
  undefined_name_is_a_compile_error,
  r#"
    return never_declared
  "#,
  diag::Kind::Compile
}

check_error! {
  assert_on_a_falsy_value_is_a_value_error,
  r#"
    return assert(0)
  "#,
  diag::Kind::Value
}

check_error! {
  casting_an_unparseable_string_to_int_is_a_value_error,
  r#"
    return int("not a number")
  "#,
  diag::Kind::Value
}

check_error! {
  opening_a_file_with_an_invalid_mode_is_a_value_error,
  r#"
    return open("whatever.txt", "q")
  "#,
  diag::Kind::Value
}

check_error! {
  range_with_a_zero_step_is_a_value_error,
  r#"
    for i in range(0, 10, 0) do
    done
    return 0
  "#,
  diag::Kind::Value
}

check_error! {
  range_with_a_step_that_never_terminates_is_a_value_error,
  r#"
    for i in range(0, 10, -1) do
    done
    return 0
  "#,
  diag::Kind::Value
}
