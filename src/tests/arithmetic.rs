//! Operator precedence, int/float promotion and the numeric boundary
//! behaviors from spec §8.

use crate::Value;

check! {
  precedence_mul_before_add,
  r#"
    x = 3 + 4 * 2
    return x
  "#,
  Value::Int(11)
}

check! {
  parens_override_precedence,
  r#"
    return (3 + 4) * 2
  "#,
  Value::Int(14)
}

check! {
  mixed_int_float_promotes_to_float,
  r#"
    return 1 + 0.5
  "#,
  Value::Float(1.5)
}

check! {
  power_is_right_associative,
  r#"
    return 2 ** 3 ** 2
  "#,
  Value::Int(512)
}

check! {
  modulus_is_integer_only,
  r#"
    return 7 % 3
  "#,
  Value::Int(1)
}

check! {
  bitwise_operators_on_ints,
  r#"
    a = 6
    b = 3
    return (a & b) + (a | b) + (a ^ b)
  "#,
  Value::Int((6 & 3) + (6 | 3) + (6 ^ 3))
}

check! {
  comparison_chains_to_0_or_1,
  r#"
    return (1 < 2) + (2 < 1)
  "#,
  Value::Int(1)
}

check! {
  logical_and_or_reduce_to_0_or_1,
  r#"
    return (1 and 2) + (0 or 5)
  "#,
  Value::Int(2)
}

check_error! {
  integer_division_by_zero_is_a_value_error,
  r#"
    return 1 / 0
  "#,
  diag::Kind::Value
}

check_error! {
  float_division_by_zero_is_a_value_error,
  r#"
    return 1.0 / 0.0
  "#,
  diag::Kind::Value
}

check_error! {
  float_modulus_is_a_type_error,
  r#"
    return 7.5 % 2.0
  "#,
  diag::Kind::Type
}

check_error! {
  mismatched_operand_types_are_a_type_error,
  r#"
    return 1 + nil
  "#,
  diag::Kind::Type
}
