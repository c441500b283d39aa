use crate::parser::step::{StepEntity, StepFile, StepValue};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Length,
    Area,
    Volume,
    Mass,
    PlaneAngle,
    Time,
    Temperature,
}

impl UnitKind {
    fn from_unit_enum(unit_type: &str) -> Option<Self> {
        match unit_type {
            "LENGTHUNIT" => Some(Self::Length),
            "AREAUNIT" => Some(Self::Area),
            "VOLUMEUNIT" => Some(Self::Volume),
            "MASSUNIT" => Some(Self::Mass),
            "PLANEANGLEUNIT" => Some(Self::PlaneAngle),
            "TIMEUNIT" => Some(Self::Time),
            "THERMODYNAMICTEMPERATUREUNIT" => Some(Self::Temperature),
            _ => None,
        }
    }

    /// Unit kind of an IFC measure type such as `IFCPOSITIVELENGTHMEASURE`.
    #[must_use]
    pub fn from_measure(type_name: &str) -> Option<Self> {
        let measure = type_name.strip_prefix("IFC").unwrap_or(type_name);
        match measure {
            "LENGTHMEASURE" | "POSITIVELENGTHMEASURE" | "NONNEGATIVELENGTHMEASURE" => {
                Some(Self::Length)
            }
            "AREAMEASURE" => Some(Self::Area),
            "VOLUMEMEASURE" => Some(Self::Volume),
            "MASSMEASURE" => Some(Self::Mass),
            "PLANEANGLEMEASURE" | "POSITIVEPLANEANGLEMEASURE" => Some(Self::PlaneAngle),
            "TIMEMEASURE" => Some(Self::Time),
            "THERMODYNAMICTEMPERATUREMEASURE" => Some(Self::Temperature),
            _ => None,
        }
    }
}

/// Unit symbols declared by the project's `IFCUNITASSIGNMENT`.
#[derive(Debug, Clone, Default)]
pub struct ProjectUnits {
    symbols: HashMap<UnitKind, String>,
}

impl ProjectUnits {
    #[must_use]
    pub fn from_step(step_file: &StepFile) -> Self {
        let mut symbols = HashMap::new();

        for assignment in step_file.get_entities_by_type("IFCUNITASSIGNMENT") {
            let unit_ids = assignment
                .values
                .first()
                .map(StepValue::references)
                .unwrap_or_default();

            for unit in unit_ids.iter().filter_map(|id| step_file.get_entity(*id)) {
                let kind = match unit.values.get(1) {
                    Some(StepValue::Enum(unit_type)) => UnitKind::from_unit_enum(unit_type),
                    _ => None,
                };
                if let (Some(kind), Some(symbol)) = (kind, unit_symbol(unit)) {
                    symbols.entry(kind).or_insert(symbol);
                }
            }
        }

        Self { symbols }
    }

    #[must_use]
    pub fn symbol(&self, kind: UnitKind) -> Option<&str> {
        self.symbols.get(&kind).map(String::as_str)
    }

    /// Symbol for a measure type, e.g. `mm` for `IFCLENGTHMEASURE` in a
    /// millimetre project.
    #[must_use]
    pub fn symbol_for_measure(&self, type_name: &str) -> Option<&str> {
        UnitKind::from_measure(type_name).and_then(|kind| self.symbol(kind))
    }
}

/// Symbol of an `IFCSIUNIT` or `IFCCONVERSIONBASEDUNIT` entity.
#[must_use]
pub fn unit_symbol(unit: &StepEntity) -> Option<String> {
    match unit.entity_type.as_str() {
        "IFCSIUNIT" => {
            let prefix = match unit.values.get(2) {
                Some(StepValue::Enum(p)) => si_prefix(p),
                _ => "",
            };
            let base = match unit.values.get(3) {
                Some(StepValue::Enum(name)) => si_name(name)?,
                _ => return None,
            };
            Some(format!("{prefix}{base}"))
        }
        "IFCCONVERSIONBASEDUNIT" => unit.string_at(2).map(|name| conversion_symbol(&name)),
        _ => None,
    }
}

fn si_prefix(prefix: &str) -> &'static str {
    match prefix {
        "EXA" => "E",
        "PETA" => "P",
        "TERA" => "T",
        "GIGA" => "G",
        "MEGA" => "M",
        "KILO" => "k",
        "HECTO" => "h",
        "DECA" => "da",
        "DECI" => "d",
        "CENTI" => "c",
        "MILLI" => "m",
        "MICRO" => "µ",
        "NANO" => "n",
        "PICO" => "p",
        _ => "",
    }
}

fn si_name(name: &str) -> Option<&'static str> {
    let symbol = match name {
        "METRE" => "m",
        "SQUARE_METRE" => "m²",
        "CUBIC_METRE" => "m³",
        "GRAM" => "g",
        "SECOND" => "s",
        "RADIAN" => "rad",
        "DEGREE_CELSIUS" => "°C",
        "KELVIN" => "K",
        "NEWTON" => "N",
        "PASCAL" => "Pa",
        "JOULE" => "J",
        "WATT" => "W",
        "AMPERE" => "A",
        "VOLT" => "V",
        "HERTZ" => "Hz",
        "LUMEN" => "lm",
        "LUX" => "lx",
        _ => return None,
    };
    Some(symbol)
}

fn conversion_symbol(name: &str) -> String {
    match name.to_ascii_uppercase().as_str() {
        "DEGREE" => "°".to_string(),
        "FOOT" => "ft".to_string(),
        "INCH" => "in".to_string(),
        "SQUARE FOOT" => "ft²".to_string(),
        "CUBIC FOOT" => "ft³".to_string(),
        "POUND" => "lb".to_string(),
        _ => name.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_assigned_units() {
        let step = StepFile::parse(
            "DATA;
#1=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);
#2=IFCSIUNIT(*,.AREAUNIT.,$,.SQUARE_METRE.);
#3=IFCSIUNIT(*,.VOLUMEUNIT.,$,.CUBIC_METRE.);
#4=IFCCONVERSIONBASEDUNIT(#9,.PLANEANGLEUNIT.,'DEGREE',#10);
#5=IFCSIUNIT(*,.MASSUNIT.,.KILO.,.GRAM.);
#6=IFCUNITASSIGNMENT((#1,#2,#3,#4,#5));
ENDSEC;",
        )
        .unwrap();

        let units = ProjectUnits::from_step(&step);
        assert_eq!(units.symbol(UnitKind::Length), Some("mm"));
        assert_eq!(units.symbol(UnitKind::Area), Some("m²"));
        assert_eq!(units.symbol(UnitKind::Volume), Some("m³"));
        assert_eq!(units.symbol(UnitKind::PlaneAngle), Some("°"));
        assert_eq!(units.symbol(UnitKind::Mass), Some("kg"));
        assert_eq!(units.symbol_for_measure("IFCPOSITIVELENGTHMEASURE"), Some("mm"));
        assert_eq!(units.symbol_for_measure("IFCLABEL"), None);
    }
}
