/// Constructs [`Value`]s using JSON-like syntax.
///
/// # Example
///
/// ```rust
/// # use graphql_incremental::{graphql_value, Value};
/// # let _: Value =
/// graphql_value!(null);
/// # let _: Value =
/// graphql_value!(1234);
/// # let _: Value =
/// graphql_value!([1234, "test", true]);
/// # let _: Value =
/// graphql_value!({"key": "value", "foo": 1234});
/// ```
///
/// [`Value`]: crate::Value
#[macro_export]
macro_rules! graphql_value {
    (null) => {
        $crate::Value::Null
    };
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::list(vec![ $( $crate::graphql_value!($elem) ),* ])
    };
    ({ $($key:tt : $val:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut object = $crate::Object::with_capacity(0);
        $( object.add_field(String::from($key), $crate::graphql_value!($val)); )*
        $crate::Value::object(object)
    }};
    ($e:expr) => {
        $crate::Value::from($e)
    };
}
