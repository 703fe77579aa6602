//! clausal-test: Test domain for conformance testing
//!
//! Provides small [`Instance`] types for exercising `Type` and map patterns
//! against objects, plus YAML fixture runners (feature = `"fixtures"`).
//!
//! # Example
//!
//! ```
//! use clausal_test::prelude::*;
//!
//! let point = Point::new(3, 4).into_value();
//! let pattern = type_with(Class::of::<Point>(), [("x", variable())]);
//!
//! let bound = match_pattern(&pattern, &point, always).unwrap();
//! assert_eq!(bound, vec![Value::from(3)]);
//! ```

use clausal::prelude::*;
use std::any::Any;
use std::collections::BTreeMap;

#[cfg(feature = "fixtures")]
pub mod dispatch_fixture;
#[cfg(feature = "fixtures")]
pub mod fixture;

/// A 2-D integer point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Wrap as a [`Value::Object`].
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::object(self)
    }
}

impl Instance for Point {
    fn class_name(&self) -> &'static str {
        "Point"
    }

    fn fields(&self) -> BTreeMap<String, Value> {
        BTreeMap::from([
            ("x".to_owned(), Value::from(self.x)),
            ("y".to_owned(), Value::from(self.y)),
        ])
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A circle with a center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center point.
    pub center: Point,
    /// Radius.
    pub radius: f64,
}

impl Circle {
    /// Create a circle.
    #[must_use]
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Wrap as a [`Value::Object`].
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::object(self)
    }
}

impl Instance for Circle {
    fn class_name(&self) -> &'static str {
        "Circle"
    }

    fn fields(&self) -> BTreeMap<String, Value> {
        BTreeMap::from([
            ("center".to_owned(), self.center.into_value()),
            ("radius".to_owned(), Value::from(self.radius)),
        ])
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{Circle, Point};
    pub use clausal::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_fields() {
        let fields = Point::new(1, 2).fields();
        assert_eq!(fields["x"], Value::from(1));
        assert_eq!(fields["y"], Value::from(2));
    }

    #[test]
    fn test_type_pattern_distinguishes_classes() {
        let circle = Circle::new(Point::new(0, 0), 1.5).into_value();
        let point = Point::new(0, 0).into_value();
        let is_point = type_of(Class::of::<Point>());

        assert!(match_no_throw(&is_point, &point, always).unwrap().is_some());
        assert!(match_no_throw(&is_point, &circle, always).unwrap().is_none());
    }

    #[test]
    fn test_nested_type_patterns() {
        let circle = Circle::new(Point::new(2, 5), 1.5).into_value();
        let pattern = type_with(
            Class::of::<Circle>(),
            [
                ("center", type_with(Class::of::<Point>(), [("y", variable())])),
                ("radius", variable()),
            ],
        );
        assert_eq!(
            match_pattern(&pattern, &circle, always).unwrap(),
            vec![Value::from(5), Value::from(1.5)]
        );
    }

    #[test]
    fn test_shape_dispatcher() {
        let area: Dispatcher<f64> = defmatch([
            clause([type_with(Class::of::<Circle>(), [("radius", variable())])], |b| {
                let r = b[0].as_float().unwrap_or(0.0);
                std::f64::consts::PI * r * r
            })
            .unwrap(),
            clause([type_of(Class::of::<Point>())], |_| 0.0).unwrap(),
        ]);
        assert_eq!(area.call(&[Point::new(1, 1).into_value()]).unwrap(), 0.0);
        let unit = area
            .call(&[Circle::new(Point::new(0, 0), 1.0).into_value()])
            .unwrap();
        assert!((unit - std::f64::consts::PI).abs() < 1e-12);
        assert!(area.call(&[Value::from(1)]).is_err());
    }
}
