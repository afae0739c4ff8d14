//! Lists and strings: literals, indexing (including negative indices),
//! concatenation and the round-trip / boundary properties of spec §8.

use crate::Value;

check! {
  list_literal_round_trips_by_index,
  r#"
    l = [10, 20, 30]
    return l[0] + l[1] + l[2]
  "#,
  Value::Int(60)
}

check! {
  negative_list_index_counts_from_the_end,
  r#"
    l = [10, 20, 30]
    return l[-1]
  "#,
  Value::Int(30)
}

check! {
  list_index_assignment_mutates_in_place,
  r#"
    l = [1, 2, 3]
    l[1] = 99
    return l[1]
  "#,
  Value::Int(99)
}

check! {
  list_concatenation_allocates_a_new_list,
  r#"
    a = [1, 2]
    b = [3, 4]
    c = a + b
    return sum(c)
  "#,
  Value::Int(10)
}

check_error! {
  list_index_out_of_range_is_a_lookup_error,
  r#"
    l = [1, 2, 3]
    return l[10]
  "#,
  diag::Kind::Lookup
}

check_error! {
  indexing_a_non_container_is_a_type_error,
  r#"
    x = 5
    return x[0]
  "#,
  diag::Kind::Type
}

check_repr! {
  string_times_int_repeats_the_string,
  r#"
    return "ab" * 3
  "#,
  "\"ababab\""
}

check_repr! {
  string_repr_through_a_for_loop,
  r#"
    s = ""
    for c in "abc" do
      s = s + c
    done
    return s
  "#,
  "\"abc\""
}
