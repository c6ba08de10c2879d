//! Vehicle class and its default visual styling.

use std::fmt;

/// Visual defaults applied to a vehicle whose `color`/`shape` are unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleStyle {
    pub color: &'static str,
    pub shape: &'static str,
}

/// Closed set of vehicle classes, each with a default style.
///
/// Mirrors `VEHICLE_CLASS_STYLES` from the original Python simulator: a
/// vehicle that does not set its own `color`/`shape` derives them from its
/// class via [`VehicleClass::default_style`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    #[serde(alias = "vehicle")]
    Car,
    Truck,
    Bus,
    Tank,
    Ev,
}

impl VehicleClass {
    /// Default `(color, shape)` pair for this class.
    ///
    /// # Example
    ///
    /// ```
    /// use micro_traffic_sim_core::agents::VehicleClass;
    /// let style = VehicleClass::Bus.default_style();
    /// assert_eq!(style.shape, "rect");
    /// ```
    pub fn default_style(self) -> VehicleStyle {
        match self {
            VehicleClass::Car => VehicleStyle { color: "#1f77b4", shape: "rect" },
            VehicleClass::Truck => VehicleStyle { color: "#7f7f7f", shape: "rect" },
            VehicleClass::Bus => VehicleStyle { color: "#2ca02c", shape: "rect" },
            VehicleClass::Tank => VehicleStyle { color: "#556b2f", shape: "rect" },
            VehicleClass::Ev => VehicleStyle { color: "#17becf", shape: "rect" },
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let as_str = match self {
            VehicleClass::Car => "car",
            VehicleClass::Truck => "truck",
            VehicleClass::Bus => "bus",
            VehicleClass::Tank => "tank",
            VehicleClass::Ev => "ev",
        };
        write!(f, "{}", as_str)
    }
}

impl Default for VehicleClass {
    fn default() -> Self {
        VehicleClass::Car
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(VehicleClass::Car.to_string(), "car");
        assert_eq!(VehicleClass::Ev.to_string(), "ev");
    }

    #[test]
    fn test_default_is_car() {
        assert_eq!(VehicleClass::default(), VehicleClass::Car);
    }
}
