use crate::error::ParseError;
use crate::host::StorageKind;
use crate::model::{Element, IfcProject, Parameter, Storey};
use crate::parser::step::{StepEntity, StepFile, StepValue};
use crate::parser::units::{unit_symbol, ProjectUnits, UnitKind};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

// Building elements offered for selection (IFC4 and IFC2X3)
const ELEMENT_ENTITIES: &[&str] = &[
    "IFCWALL",
    "IFCWALLSTANDARDCASE",
    "IFCDOOR",
    "IFCWINDOW",
    "IFCSLAB",
    "IFCCOLUMN",
    "IFCBEAM",
    "IFCMEMBER",
    "IFCPLATE",
    "IFCSTAIR",
    "IFCSTAIRFLIGHT",
    "IFCRAMP",
    "IFCRAILING",
    "IFCROOF",
    "IFCCOVERING",
    "IFCCURTAINWALL",
    "IFCFOOTING",
    "IFCPILE",
    "IFCFURNISHINGELEMENT",
    "IFCFURNITURE",
    "IFCFLOWFIXTURE",
    "IFCSANITARYTERMINAL",
    "IFCFLOWTERMINAL",
    "IFCFLOWSEGMENT",
    "IFCFLOWFITTING",
    "IFCPIPESEGMENT",
    "IFCDUCTSEGMENT",
    "IFCBUILDINGELEMENTPROXY",
];

// Quantity entity → unit kind of its value (None for counts)
const QUANTITY_ENTITIES: &[(&str, Option<UnitKind>)] = &[
    ("IFCQUANTITYLENGTH", Some(UnitKind::Length)),
    ("IFCQUANTITYAREA", Some(UnitKind::Area)),
    ("IFCQUANTITYVOLUME", Some(UnitKind::Volume)),
    ("IFCQUANTITYWEIGHT", Some(UnitKind::Mass)),
    ("IFCQUANTITYTIME", Some(UnitKind::Time)),
    ("IFCQUANTITYCOUNT", None),
];

/// Parses an IFC file into a project whose elements carry parameters.
///
/// Each building element gets:
/// - `Name`, `Tag` and `Type` text parameters
/// - `Height` / `Width` for doors and windows
/// - every single-value property and quantity attached to the element
/// - properties attached to its type object, unless the element already has
///   a parameter of that name
///
/// Numeric values are rendered with the project unit of their measure
/// (`"5000 mm"`, `"15 m²"`).
///
/// # Errors
///
/// Returns [`ParseError::FileRead`] if the file cannot be read.
/// Returns [`ParseError::InvalidStep`] if the STEP format is malformed.
///
/// # Example
///
/// ```no_run
/// use sum_parameters::parser::parse_ifc_file;
///
/// let project = parse_ifc_file("model.ifc")?;
/// println!("{}: {} elements", project.name, project.total_elements());
/// # Ok::<(), sum_parameters::error::ParseError>(())
/// ```
pub fn parse_ifc_file<P: AsRef<Path>>(path: P) -> Result<IfcProject, ParseError> {
    let content = std::fs::read_to_string(&path).map_err(|source| ParseError::FileRead {
        path: path.as_ref().to_path_buf(),
        source,
    })?;

    parse_ifc_str(&content, &path.as_ref().to_string_lossy())
}

/// Parses IFC content already in memory. `file_path` is only recorded.
pub fn parse_ifc_str(content: &str, file_path: &str) -> Result<IfcProject, ParseError> {
    let step_file = StepFile::parse(content)?;

    let project_name = extract_project_name(&step_file);
    let mut project = IfcProject::new(project_name, step_file.schema.clone(), file_path.to_string());

    let units = ProjectUnits::from_step(&step_file);

    project.storeys = extract_storeys(&step_file);
    let element_to_storey = extract_spatial_containment(&step_file);

    let mut storey_counts: HashMap<u64, usize> = HashMap::new();
    for storey_id in element_to_storey.values() {
        *storey_counts.entry(*storey_id).or_insert(0) += 1;
    }
    for storey in &mut project.storeys {
        storey.element_count = storey_counts.get(&storey.id).copied().unwrap_or(0);
    }

    // Roof at top
    project.storeys.sort_by(|a, b| {
        b.elevation
            .partial_cmp(&a.elevation)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let context = ElementContext {
        step_file: &step_file,
        units: &units,
        element_to_storey,
        element_to_type: extract_type_relationships(&step_file),
        object_definitions: extract_property_relationships(&step_file),
        definitions: extract_property_definitions(&step_file, &units),
    };

    let elements: Vec<Element> = ELEMENT_ENTITIES
        .iter()
        .flat_map(|entity_type| step_file.get_entities_by_type(entity_type))
        .map(|entity| context.build_element(entity))
        .collect();

    project.set_elements(elements);

    info!(
        project = %project.name,
        schema = %project.schema,
        elements = project.total_elements(),
        storeys = project.storeys.len(),
        "parsed IFC model"
    );

    Ok(project)
}

fn extract_project_name(step_file: &StepFile) -> String {
    step_file
        .get_entities_by_type("IFCPROJECT")
        .first()
        .and_then(|e| e.string_at(2))
        .unwrap_or_else(|| "Unknown Project".to_string())
}

fn extract_storeys(step_file: &StepFile) -> Vec<Storey> {
    step_file
        .get_entities_by_type("IFCBUILDINGSTOREY")
        .iter()
        .map(|e| Storey {
            id: e.id,
            name: e.string_at(2).unwrap_or_else(|| format!("Storey #{}", e.id)),
            elevation: e.values.get(9).and_then(StepValue::as_real).unwrap_or(0.0),
            element_count: 0,
        })
        .collect()
}

/// Element → storey from IFCRELCONTAINEDINSPATIALSTRUCTURE
fn extract_spatial_containment(step_file: &StepFile) -> HashMap<u64, u64> {
    let mut element_to_storey: HashMap<u64, u64> = HashMap::new();

    for rel in step_file.get_entities_by_type("IFCRELCONTAINEDINSPATIALSTRUCTURE") {
        // Index 4 = RelatedElements, index 5 = RelatingStructure
        let Some(storey_id) = rel.values.get(5).and_then(StepValue::as_reference) else {
            continue;
        };
        for elem_id in rel.values.get(4).map(StepValue::references).unwrap_or_default() {
            element_to_storey.insert(elem_id, storey_id);
        }
    }

    element_to_storey
}

/// Element → type object from IFCRELDEFINESBYTYPE
fn extract_type_relationships(step_file: &StepFile) -> HashMap<u64, u64> {
    let mut element_to_type: HashMap<u64, u64> = HashMap::new();

    for rel in step_file.get_entities_by_type("IFCRELDEFINESBYTYPE") {
        // Index 4 = RelatedObjects, index 5 = RelatingType
        let Some(type_id) = rel.values.get(5).and_then(StepValue::as_reference) else {
            continue;
        };
        for elem_id in rel.values.get(4).map(StepValue::references).unwrap_or_default() {
            element_to_type.insert(elem_id, type_id);
        }
    }

    element_to_type
}

/// Object → property/quantity set ids from IFCRELDEFINESBYPROPERTIES
fn extract_property_relationships(step_file: &StepFile) -> HashMap<u64, Vec<u64>> {
    let mut object_definitions: HashMap<u64, Vec<u64>> = HashMap::new();

    for rel in step_file.get_entities_by_type("IFCRELDEFINESBYPROPERTIES") {
        let definitions = rel.values.get(5).map(StepValue::references).unwrap_or_default();
        for object_id in rel.values.get(4).map(StepValue::references).unwrap_or_default() {
            object_definitions
                .entry(object_id)
                .or_default()
                .extend(definitions.iter().copied());
        }
    }

    object_definitions
}

/// Property set / element quantity id → parameters it defines
fn extract_property_definitions(
    step_file: &StepFile,
    units: &ProjectUnits,
) -> HashMap<u64, Vec<Parameter>> {
    let mut definitions: HashMap<u64, Vec<Parameter>> = HashMap::new();

    for pset in step_file.get_entities_by_type("IFCPROPERTYSET") {
        let props = pset
            .values
            .get(4)
            .map(StepValue::references)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| step_file.get_entity(id))
            .filter(|prop| prop.entity_type == "IFCPROPERTYSINGLEVALUE")
            .filter_map(|prop| single_value_parameter(step_file, prop, units))
            .collect();
        definitions.insert(pset.id, props);
    }

    for qto in step_file.get_entities_by_type("IFCELEMENTQUANTITY") {
        let quantities = qto
            .values
            .get(5)
            .map(StepValue::references)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| step_file.get_entity(id))
            .filter_map(|quantity| quantity_parameter(step_file, quantity, units))
            .collect();
        definitions.insert(qto.id, quantities);
    }

    definitions
}

/// IFCPROPERTYSINGLEVALUE(Name, Description, NominalValue, Unit)
fn single_value_parameter(
    step_file: &StepFile,
    prop: &StepEntity,
    units: &ProjectUnits,
) -> Option<Parameter> {
    let name = prop.string_at(0).filter(|n| !n.is_empty())?;
    let explicit_unit = explicit_unit_symbol(step_file, prop.values.get(3));

    let (type_name, value) = match prop.values.get(2) {
        Some(StepValue::Typed(type_name, inner)) => (Some(type_name.as_str()), inner.as_ref()),
        Some(value) => (None, value),
        None => return Some(Parameter::new(name, StorageKind::Other, None)),
    };

    let symbol = explicit_unit
        .as_deref()
        .or_else(|| type_name.and_then(|t| units.symbol_for_measure(t)));
    let is_measure = type_name.is_some_and(|t| UnitKind::from_measure(t).is_some());

    let parameter = match value {
        StepValue::Real(f) => {
            Parameter::new(name, StorageKind::Double, Some(with_unit(format_number(*f), symbol)))
        }
        StepValue::Integer(i) => {
            let storage = if is_measure {
                StorageKind::Double
            } else {
                StorageKind::Integer
            };
            Parameter::new(name, storage, Some(with_unit(i.to_string(), symbol)))
        }
        StepValue::String(s) => Parameter::text(name, s.clone()),
        StepValue::Null | StepValue::Derived => Parameter::new(name, StorageKind::Other, None),
        other => Parameter::new(name, StorageKind::Other, Some(format_step_value(other))),
    };

    Some(parameter)
}

/// IFCQUANTITY*(Name, Description, Unit, Value, ...)
fn quantity_parameter(
    step_file: &StepFile,
    quantity: &StepEntity,
    units: &ProjectUnits,
) -> Option<Parameter> {
    let (_, kind) = QUANTITY_ENTITIES
        .iter()
        .find(|(entity_type, _)| *entity_type == quantity.entity_type)?;
    let name = quantity.string_at(0).filter(|n| !n.is_empty())?;

    let Some(value) = quantity.values.get(3).and_then(StepValue::as_real) else {
        debug!(id = quantity.id, %name, "quantity without value");
        return Some(Parameter::new(name, StorageKind::Double, None));
    };

    let parameter = match kind {
        Some(kind) => {
            let explicit_unit = explicit_unit_symbol(step_file, quantity.values.get(2));
            let symbol = explicit_unit.as_deref().or_else(|| units.symbol(*kind));
            Parameter::new(name, StorageKind::Double, Some(with_unit(format_number(value), symbol)))
        }
        None => Parameter::integer(name, format_number(value)),
    };

    Some(parameter)
}

fn explicit_unit_symbol(step_file: &StepFile, unit: Option<&StepValue>) -> Option<String> {
    unit.and_then(StepValue::as_reference)
        .and_then(|id| step_file.get_entity(id))
        .and_then(unit_symbol)
}

/// Up to three decimals, trailing zeros trimmed.
fn format_number(value: f64) -> String {
    let text = format!("{value:.3}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn with_unit(number: String, symbol: Option<&str>) -> String {
    match symbol {
        Some("°") => format!("{number}°"),
        Some(symbol) if !symbol.is_empty() => format!("{number} {symbol}"),
        _ => number,
    }
}

fn format_step_value(value: &StepValue) -> String {
    match value {
        StepValue::String(s) => s.clone(),
        StepValue::Real(f) => format_number(*f),
        StepValue::Integer(i) => i.to_string(),
        StepValue::Boolean(b) => if *b { "Yes" } else { "No" }.to_string(),
        StepValue::Enum(e) => match e.as_str() {
            "U" => "Unknown".to_string(),
            _ => e.clone(),
        },
        StepValue::Reference(id) => format!("#{id}"),
        StepValue::List(list) => list
            .iter()
            .map(format_step_value)
            .collect::<Vec<_>>()
            .join(", "),
        StepValue::Typed(_, inner) => format_step_value(inner),
        StepValue::Null => "-".to_string(),
        StepValue::Derived => "*".to_string(),
    }
}

struct ElementContext<'a> {
    step_file: &'a StepFile,
    units: &'a ProjectUnits,
    element_to_storey: HashMap<u64, u64>,
    element_to_type: HashMap<u64, u64>,
    object_definitions: HashMap<u64, Vec<u64>>,
    definitions: HashMap<u64, Vec<Parameter>>,
}

impl ElementContext<'_> {
    fn build_element(&self, entity: &StepEntity) -> Element {
        let mut element = Element::new(entity.id, entity.entity_type.clone());
        element.global_id = entity.string_at(0).unwrap_or_default();
        element.name = entity.string_at(2).unwrap_or_default();
        element.tag = entity.string_at(7).filter(|t| !t.is_empty());
        element.type_id = self.element_to_type.get(&entity.id).copied();
        element.storey_id = self.element_to_storey.get(&entity.id).copied();

        if !element.name.is_empty() {
            element.insert_parameter(Parameter::text("Name", element.name.clone()));
        }
        if let Some(tag) = element.tag.clone() {
            element.insert_parameter(Parameter::text("Tag", tag));
        }

        let type_entity = element.type_id.and_then(|id| self.step_file.get_entity(id));
        if let Some(type_name) = type_entity.and_then(|t| t.string_at(2)) {
            element.insert_parameter(Parameter::text("Type", type_name));
        }

        // Doors and windows: index 8 = OverallHeight, index 9 = OverallWidth
        if matches!(entity.entity_type.as_str(), "IFCDOOR" | "IFCWINDOW") {
            let length_unit = self.units.symbol(UnitKind::Length);
            for (index, name) in [(8, "Height"), (9, "Width")] {
                if let Some(value) = entity.values.get(index).and_then(StepValue::as_real) {
                    element.insert_parameter(Parameter::double(
                        name,
                        with_unit(format_number(value), length_unit),
                    ));
                }
            }
        }

        self.insert_definitions(&mut element, entity.id);

        if let Some(type_entity) = type_entity {
            // IfcTypeObject index 5 = HasPropertySets
            let type_sets = type_entity
                .values
                .get(5)
                .map(StepValue::references)
                .unwrap_or_default();
            for set_id in type_sets {
                self.insert_set(&mut element, set_id);
            }
            self.insert_definitions(&mut element, type_entity.id);
        }

        element
    }

    fn insert_definitions(&self, element: &mut Element, object_id: u64) {
        if let Some(set_ids) = self.object_definitions.get(&object_id) {
            for &set_id in set_ids {
                self.insert_set(element, set_id);
            }
        }
    }

    fn insert_set(&self, element: &mut Element, set_id: u64) {
        if let Some(parameters) = self.definitions.get(&set_id) {
            for parameter in parameters {
                element.insert_parameter(parameter.clone());
            }
        }
    }
}
