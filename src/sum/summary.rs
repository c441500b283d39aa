use super::value::{parse_display_value, unit_label};
use crate::host::{ElementRef, ParameterRef};
use serde::Serialize;
use tracing::trace;

/// The sum of one common parameter over the selected elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSummary {
    pub name: String,
    pub raw_sum: f64,
    pub display_sum: f64,
    pub unit_label: String,
    pub coefficient: f64,
}

impl ParameterSummary {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        raw_sum: f64,
        unit_label: impl Into<String>,
        scale: f64,
        rounding: i32,
    ) -> Self {
        let display_sum = round_display(raw_sum, rounding);
        Self {
            name: name.into(),
            raw_sum,
            display_sum,
            unit_label: unit_label.into(),
            coefficient: coefficient(display_sum, scale),
        }
    }

    /// Re-rounds the stored raw sum and rescales it.
    pub fn apply_rounding(&mut self, rounding: i32, scale: f64) {
        self.display_sum = round_display(self.raw_sum, rounding);
        self.coefficient = coefficient(self.display_sum, scale);
    }

    pub fn apply_scale(&mut self, scale: f64) {
        self.coefficient = coefficient(self.display_sum, scale);
    }
}

/// Sums `parameter` (a handle from the first element) over every element.
///
/// Each element contributes the number read from its display string for a
/// parameter of the same name. Missing parameters, missing values and
/// unreadable strings contribute nothing. The unit label comes from the first
/// element carrying a non-empty display string.
#[must_use]
pub fn aggregate<E: ElementRef>(
    parameter: &impl ParameterRef,
    elements: &[&E],
    scale: f64,
    rounding: i32,
) -> ParameterSummary {
    let name = parameter.name();
    let mut raw_sum = 0.0;
    let mut label: Option<String> = None;

    for element in elements {
        let Some(text) = element
            .parameter(name)
            .and_then(ParameterRef::display_string)
            .filter(|s| !s.trim().is_empty())
        else {
            continue;
        };

        if label.is_none() {
            label = Some(unit_label(text));
        }

        match parse_display_value(text) {
            Some(value) => raw_sum += value,
            None => trace!(parameter = name, display = text, "skipping unreadable value"),
        }
    }

    ParameterSummary::new(name, raw_sum, label.unwrap_or_default(), scale, rounding)
}

/// Rounds to `digits` decimals, ties to even. Negative `digits` leaves the
/// value untouched.
#[must_use]
pub fn round_display(raw: f64, digits: i32) -> f64 {
    if digits < 0 || !raw.is_finite() {
        return raw;
    }

    let factor = 10f64.powi(digits);
    let scaled = raw * factor;
    // Beyond 2^52 every f64 is already an integer at this scale.
    if !scaled.is_finite() || scaled.abs() >= 4_503_599_627_370_496.0 {
        return raw;
    }

    scaled.round_ties_even() / factor
}

#[must_use]
pub fn coefficient(display_sum: f64, scale: f64) -> f64 {
    display_sum * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, Parameter};
    use crate::sum::resolve_common_parameters;
    use pretty_assertions::assert_eq;

    fn length_elements() -> (Element, Element) {
        let a = Element::new(1, "IFCWALL").with_parameter(Parameter::double("Length", "500 mm"));
        let b = Element::new(2, "IFCWALL").with_parameter(Parameter::double("Length", "300 mm"));
        (a, b)
    }

    #[test]
    fn sums_lengths_with_unit_label() {
        let (a, b) = length_elements();
        let elements = [&a, &b];
        let params = resolve_common_parameters(&elements);
        assert_eq!(params.len(), 1);

        let summary = aggregate(params[0], &elements, 1.0, 0);
        assert_eq!(
            summary,
            ParameterSummary {
                name: "Length".into(),
                raw_sum: 800.0,
                display_sum: 800.0,
                unit_label: "mm".into(),
                coefficient: 800.0,
            }
        );
    }

    #[test]
    fn scale_change_only_touches_coefficient() {
        let (a, b) = length_elements();
        let mut summary = aggregate(&a.parameters[0], &[&a, &b], 1.0, 0);

        summary.raw_sum = f64::NAN; // any re-read of raw_sum would show up
        summary.apply_scale(1000.0);
        assert_eq!(summary.coefficient, 800_000.0);
        assert_eq!(summary.display_sum, 800.0);
    }

    #[test]
    fn empty_display_contributes_zero_and_keeps_label() {
        let (a, b) = length_elements();
        let c = Element::new(3, "IFCWALL").with_parameter(Parameter::double("Length", ""));
        let d = Element::new(4, "IFCWALL").with_parameter(Parameter::new(
            "Length",
            crate::host::StorageKind::Double,
            None,
        ));

        let summary = aggregate(&a.parameters[0], &[&a, &c, &d, &b], 1.0, 2);
        assert_eq!(summary.raw_sum, 800.0);
        assert_eq!(summary.unit_label, "mm");
    }

    #[test]
    fn label_comes_from_first_element_with_a_value() {
        let a = Element::new(1, "IFCWALL").with_parameter(Parameter::double("Area", ""));
        let b = Element::new(2, "IFCWALL").with_parameter(Parameter::double("Area", "2 m²"));
        let c = Element::new(3, "IFCWALL").with_parameter(Parameter::double("Area", "3 ft²"));

        let summary = aggregate(&a.parameters[0], &[&a, &b, &c], 1.0, 2);
        assert_eq!(summary.unit_label, "m²");
        assert_eq!(summary.raw_sum, 5.0);
    }

    #[test]
    fn unreadable_and_missing_values_are_skipped() {
        let a = Element::new(1, "IFCWALL").with_parameter(Parameter::double("Mass", "12 kg"));
        let b = Element::new(2, "IFCWALL").with_parameter(Parameter::text("Mass", "heavy"));
        let c = Element::new(3, "IFCWALL");

        let summary = aggregate(&a.parameters[0], &[&a, &b, &c], 1.0, 2);
        assert_eq!(summary.raw_sum, 12.0);
        assert_eq!(summary.unit_label, "kg");
    }

    #[test]
    fn lowering_rounding_rederives_display_and_coefficient() {
        let mut summary = ParameterSummary::new("Volume", 123.456, "m³", 10.0, 2);
        assert_eq!(summary.display_sum, 123.46);

        summary.apply_rounding(0, 10.0);
        assert_eq!(summary.display_sum, 123.0);
        assert_eq!(summary.coefficient, 1230.0);
        assert_eq!(summary.raw_sum, 123.456);
    }

    #[test]
    fn rounds_ties_to_even() {
        assert_eq!(round_display(0.5, 0), 0.0);
        assert_eq!(round_display(1.5, 0), 2.0);
        assert_eq!(round_display(2.5, 0), 2.0);
        assert_eq!(round_display(0.125, 2), 0.12);
        assert_eq!(round_display(-2.5, 0), -2.0);
    }

    #[test]
    fn negative_rounding_is_a_no_op() {
        assert_eq!(round_display(123.456, -1), 123.456);
    }

    #[test]
    fn rounding_is_idempotent() {
        let samples = [0.0, 1.005, 2.675, 123.456_789, -98.7654, 1e-7, 1234.5, 1e15 + 0.3];
        for raw in samples {
            for digits in 0..=10 {
                let once = round_display(raw, digits);
                assert_eq!(round_display(once, digits), once, "raw={raw} digits={digits}");
            }
        }
    }
}
