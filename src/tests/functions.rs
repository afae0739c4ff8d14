//! Named and anonymous functions: recursion, copy-on-call argument
//! semantics, and arity checking (`vm/call.rs`).

use crate::Value;

check! {
  named_function_recursive_factorial,
  r#"
    func fact(n)
      if n <= 1 then
        return 1
      end
      return n * fact(n - 1)
    end
    return fact(5)
  "#,
  Value::Int(120)
}

check! {
  anonymous_function_bound_to_a_global_can_recurse,
  r#"
    f = func (n) if n < 2 then return n else return f(n-1) + f(n-2) end end
    return f(10)
  "#,
  Value::Int(55)
}

check! {
  function_argument_is_copied_not_aliased,
  r#"
    func bump(l)
      l[0] = 99
      return l
    end
    original = [1, 2]
    bumped = bump(original)
    return original[0]
  "#,
  Value::Int(1)
}

check! {
  function_with_no_explicit_return_yields_nil,
  r#"
    func noop()
      x = 1
    end
    return noop()
  "#,
  Value::Nil
}

check! {
  nested_function_can_recurse_on_its_own_name,
  r#"
    func outer()
      func inner(n)
        if n <= 1 then
          return 1
        end
        return n * inner(n - 1)
      end
      return inner(5)
    end
    return outer()
  "#,
  Value::Int(120)
}

check! {
  nested_function_resolves_a_sibling_defined_later_in_the_block,
  r#"
    func outer()
      func first()
        return second()
      end
      func second()
        return 42
      end
      return first()
    end
    return outer()
  "#,
  Value::Int(42)
}

check_error! {
  calling_with_the_wrong_arity_is_an_error,
  r#"
    func takes_two(a, b)
      return a + b
    end
    return takes_two(1)
  "#,
  diag::Kind::Value
}

check_error! {
  calling_a_non_function_is_a_type_error,
  r#"
    x = 5
    return x()
  "#,
  diag::Kind::Type
}
