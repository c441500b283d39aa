//! Non-interactive runs: pick elements from command-line filters and render
//! the summary table as plain text.

use crate::model::{IfcProject, Selection};
use crate::sum::SumSession;
use tracing::warn;

/// Builds a selection from explicit ids followed by whole entity types.
/// With no filters every element is selected.
#[must_use]
pub fn build_selection(project: &IfcProject, ids: &[u64], entity_types: &[String]) -> Selection {
    if ids.is_empty() && entity_types.is_empty() {
        return Selection::from_ids(project.elements.iter().map(|e| e.id));
    }

    let mut selection = Selection::new();
    for &id in ids {
        if project.element(id).is_some() {
            selection.extend([id]);
        } else {
            warn!(id, "no element with this id");
        }
    }
    for entity_type in entity_types {
        let matching = project.ids_of_entity_type(entity_type);
        if matching.is_empty() {
            warn!(%entity_type, "no elements of this type");
        }
        selection.extend(matching);
    }
    selection
}

/// Fixed-width table of the session's summaries.
#[must_use]
pub fn render_table(session: &SumSession) -> String {
    let rows: Vec<[String; 4]> = session
        .summaries()
        .iter()
        .map(|s| {
            [
                s.name.clone(),
                session.format_sum(s),
                s.unit_label.clone(),
                session.format_coefficient(s),
            ]
        })
        .collect();

    let header = ["Parameter", "Sum", "Unit", "Coefficient"];
    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 4]| {
        format!(
            "{:<w0$}  {:>w1$}  {:<w2$}  {:>w3$}\n",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3]
        )
    };

    let mut out = line(header);
    for row in &rows {
        out.push_str(&line(row.each_ref().map(String::as_str)));
    }
    out.push_str(&format!(
        "ratio {} | rounding {}\n",
        session.ratio(),
        session.rounding()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, Parameter};
    use crate::settings::Settings;
    use pretty_assertions::assert_eq;

    fn project() -> IfcProject {
        let mut project = IfcProject::new("P".into(), "IFC4".into(), "p.ifc".into());
        project.set_elements(vec![
            Element::new(1, "IFCWALL").with_parameter(Parameter::double("Length", "500 mm")),
            Element::new(2, "IFCWALL").with_parameter(Parameter::double("Length", "300 mm")),
            Element::new(3, "IFCDOOR").with_parameter(Parameter::double("Width", "900 mm")),
        ]);
        project
    }

    #[test]
    fn no_filters_selects_everything() {
        let selection = build_selection(&project(), &[], &[]);
        assert_eq!(selection.ids(), &[1, 2, 3]);
    }

    #[test]
    fn ids_come_before_entity_types() {
        let selection = build_selection(&project(), &[3, 42], &["IfcWall".to_string()]);
        assert_eq!(selection.ids(), &[3, 1, 2]);
    }

    #[test]
    fn renders_aligned_table() {
        let project = project();
        let selection = build_selection(&project, &[], &["IFCWALL".to_string()]);
        let mut session = SumSession::new(Settings {
            selected_ratio: 0.001,
            value_rounding: 0,
        });
        session.refresh_from(&selection.view(&project));

        assert_eq!(
            render_table(&session),
            "Parameter  Sum  Unit  Coefficient\n\
             Length     800  mm          0.800\n\
             ratio 0.001 | rounding 0\n"
        );
    }

    #[test]
    fn empty_session_renders_header_and_settings() {
        assert_eq!(
            render_table(&SumSession::default()),
            "Parameter  Sum  Unit  Coefficient\n\
             ratio 1 | rounding 2\n"
        );
    }
}
