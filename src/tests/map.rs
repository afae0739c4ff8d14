//! Map literals and indexing: C3's string-keyed hash map exercised from
//! the language surface, including spec §8 scenario 4 and its insert /
//! overwrite / missing-key round-trip properties.

use crate::Value;

check! {
  map_literal_get_by_string_key,
  r#"
    m = {"a": 1, "b": 2}
    return m["a"] + m["b"]
  "#,
  Value::Int(3)
}

check! {
  map_index_assignment_overwrites_an_existing_key,
  r#"
    m = {"a": 1, "b": 2}
    m["b"] = m["a"] + m["b"]
    return m["b"]
  "#,
  Value::Int(3)
}

check! {
  map_index_assignment_inserts_a_new_key,
  r#"
    m = {"a": 1}
    m["b"] = 2
    return m["a"] + m["b"]
  "#,
  Value::Int(3)
}

check! {
  nested_map_values_are_reachable,
  r#"
    m = {"inner": {"x": 5}}
    return m["inner"]["x"]
  "#,
  Value::Int(5)
}

check! {
  map_addition_unions_two_maps,
  r#"
    a = {"a": 1}
    b = {"b": 2}
    c = a + b
    return c["a"] + c["b"]
  "#,
  Value::Int(3)
}

check_error! {
  missing_key_lookup_is_a_lookup_error,
  r#"
    m = {"a": 1}
    return m["missing"]
  "#,
  diag::Kind::Lookup
}

check_error! {
  non_string_map_key_literal_is_a_value_error,
  r#"
    m = {1: "a"}
    return m
  "#,
  diag::Kind::Value
}
