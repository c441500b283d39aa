use crate::host::{ElementRef, ParameterRef};
use std::collections::HashSet;

/// Finds the numeric parameters shared by every element.
///
/// Candidates are the numeric parameters of the first element. A candidate
/// survives when every other element has a parameter of the same name,
/// whatever its storage kind. The returned handles belong to the first
/// element and are sorted by name (ordinal comparison).
///
/// An empty slice yields an empty list.
#[must_use]
pub fn resolve_common_parameters<'a, E: ElementRef>(elements: &[&'a E]) -> Vec<&'a E::Parameter> {
    let Some((&first, rest)) = elements.split_first() else {
        return Vec::new();
    };

    let numeric = first
        .parameters()
        .iter()
        .filter(|p| p.storage_kind().is_numeric());

    let mut common: Vec<&'a E::Parameter> = if rest.is_empty() {
        numeric.collect()
    } else {
        let mut names: HashSet<&'a str> = numeric.map(ParameterRef::name).collect();

        for &element in rest {
            if names.is_empty() {
                break;
            }
            let element_names: HashSet<&str> =
                element.parameters().iter().map(ParameterRef::name).collect();
            names.retain(|name| element_names.contains(name));
        }

        first
            .parameters()
            .iter()
            .filter(|p| p.storage_kind().is_numeric() && names.contains(p.name()))
            .collect()
    };

    common.sort_by(|a, b| a.name().cmp(b.name()));
    common
}
