use std::collections::BTreeMap;

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    String(String),
    Real(f64),
    Integer(i64),
    Boolean(bool),
    Enum(String),
    Reference(u64),
    List(Vec<StepValue>),
    /// Value wrapped in its defined type, e.g. `IFCLENGTHMEASURE(500.)`.
    Typed(String, Box<StepValue>),
    Null,
    Derived,
}

impl StepValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StepValue::String(s) => Some(s),
            StepValue::Typed(_, inner) => inner.as_str(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            StepValue::Real(f) => Some(*f),
            StepValue::Integer(i) => Some(*i as f64),
            StepValue::Typed(_, inner) => inner.as_real(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_reference(&self) -> Option<u64> {
        match self {
            StepValue::Reference(id) => Some(*id),
            _ => None,
        }
    }

    /// References held by this value: itself, or the references in a list.
    #[must_use]
    pub fn references(&self) -> Vec<u64> {
        match self {
            StepValue::Reference(id) => vec![*id],
            StepValue::List(list) => list.iter().filter_map(StepValue::as_reference).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepEntity {
    pub id: u64,
    pub entity_type: String,
    pub values: Vec<StepValue>,
}

impl StepEntity {
    #[must_use]
    pub fn string_at(&self, index: usize) -> Option<String> {
        self.values
            .get(index)
            .and_then(StepValue::as_str)
            .map(ToString::to_string)
    }
}

#[derive(Debug)]
pub struct StepFile {
    pub entities: BTreeMap<u64, StepEntity>,
    pub schema: String,
}

impl StepFile {
    /// Parses a STEP physical file (ISO 10303-21).
    ///
    /// Statements are split on `;` outside strings and comments, so an entity
    /// may span several lines. Entity statements that cannot be read are
    /// skipped.
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let mut entities = BTreeMap::new();
        let mut schema = String::new();
        let mut in_data = false;
        let mut saw_data = false;
        let mut skipped = 0usize;

        for statement in split_statements(content) {
            if statement.starts_with("FILE_SCHEMA") {
                if let Some(start) = statement.find('\'') {
                    if let Some(end) = statement[start + 1..].find('\'') {
                        schema = statement[start + 1..start + 1 + end].to_string();
                    }
                }
                continue;
            }

            if statement == "DATA" {
                in_data = true;
                saw_data = true;
                continue;
            }
            if statement == "ENDSEC" {
                in_data = false;
                continue;
            }

            if in_data && statement.starts_with('#') {
                match Self::parse_entity(&statement) {
                    Some(entity) => {
                        entities.insert(entity.id, entity);
                    }
                    None => skipped += 1,
                }
            }
        }

        if !saw_data {
            return Err(ParseError::InvalidStep {
                message: "missing DATA section".to_string(),
            });
        }
        if skipped > 0 {
            tracing::warn!(skipped, "skipped unreadable entity statements");
        }

        Ok(StepFile { entities, schema })
    }

    fn parse_entity(statement: &str) -> Option<StepEntity> {
        // Format: #123=IFCWALL('guid',#ref,'name',...)
        let eq_pos = statement.find('=')?;
        let id: u64 = statement[1..eq_pos].trim().parse().ok()?;

        let rest = statement[eq_pos + 1..].trim();
        let paren_pos = rest.find('(')?;
        let close_pos = rest.rfind(')')?;
        if close_pos < paren_pos {
            return None;
        }
        let entity_type = rest[..paren_pos].trim().to_ascii_uppercase();

        let values = Self::parse_values(&rest[paren_pos + 1..close_pos]);

        Some(StepEntity {
            id,
            entity_type,
            values,
        })
    }

    fn parse_values(s: &str) -> Vec<StepValue> {
        let mut values = Vec::new();
        let mut current = String::new();
        let mut in_string = false;
        let mut paren_depth = 0usize;

        for ch in s.chars() {
            match ch {
                '\'' => {
                    in_string = !in_string;
                    current.push(ch);
                }
                '(' if !in_string => {
                    paren_depth += 1;
                    current.push(ch);
                }
                ')' if !in_string => {
                    paren_depth = paren_depth.saturating_sub(1);
                    current.push(ch);
                }
                ',' if !in_string && paren_depth == 0 => {
                    values.push(Self::parse_single_value(&current));
                    current.clear();
                }
                _ => current.push(ch),
            }
        }

        if !current.trim().is_empty() {
            values.push(Self::parse_single_value(&current));
        }

        values
    }

    fn parse_single_value(s: &str) -> StepValue {
        let s = s.trim();

        if s == "$" {
            return StepValue::Null;
        }
        if s == "*" {
            return StepValue::Derived;
        }
        if let Some(stripped) = s.strip_prefix('#') {
            if let Ok(id) = stripped.parse::<u64>() {
                return StepValue::Reference(id);
            }
        }
        if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
            return StepValue::String(decode_step_string(&s[1..s.len() - 1]));
        }
        if s.len() >= 2 && s.starts_with('.') && s.ends_with('.') {
            return match &s[1..s.len() - 1] {
                "T" => StepValue::Boolean(true),
                "F" => StepValue::Boolean(false),
                inner => StepValue::Enum(inner.to_string()),
            };
        }
        if s.starts_with('(') && s.ends_with(')') {
            return StepValue::List(Self::parse_values(&s[1..s.len() - 1]));
        }
        if let Ok(i) = s.parse::<i64>() {
            return StepValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return StepValue::Real(f);
        }
        // Typed value like IFCLENGTHMEASURE(500.)
        if let Some(paren_pos) = s.find('(') {
            if s.ends_with(')') && s.starts_with(|c: char| c.is_ascii_alphabetic()) {
                let type_name = s[..paren_pos].trim().to_ascii_uppercase();
                let inner = Self::parse_single_value(&s[paren_pos + 1..s.len() - 1]);
                return StepValue::Typed(type_name, Box::new(inner));
            }
        }

        StepValue::String(s.to_string())
    }

    #[must_use]
    pub fn get_entity(&self, id: u64) -> Option<&StepEntity> {
        self.entities.get(&id)
    }

    /// Entities of one type, in id order.
    #[must_use]
    pub fn get_entities_by_type(&self, entity_type: &str) -> Vec<&StepEntity> {
        self.entities
            .values()
            .filter(|e| e.entity_type == entity_type)
            .collect()
    }
}

/// Splits the file into `;`-terminated statements, dropping comments and
/// collapsing line breaks.
fn split_statements(content: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                in_string = !in_string;
                current.push(ch);
            }
            '/' if !in_string && chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            ';' if !in_string => {
                let statement = current.trim();
                if !statement.is_empty() {
                    statements.push(statement.to_string());
                }
                current.clear();
            }
            '\r' | '\n' if !in_string => {}
            _ => current.push(ch),
        }
    }

    statements
}

/// Decodes STEP string escapes:
/// - `''` apostrophe
/// - `\\` backslash
/// - `\S\c` character `c` shifted into the ISO 8859-1 upper half
/// - `\X\hh` one ISO 8859-1 character
/// - `\X2\hhhh...\X0\` UTF-16 code units
fn decode_step_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                }
                result.push('\'');
            }
            '\\' => match chars.peek().copied() {
                Some('\\') => {
                    chars.next();
                    result.push('\\');
                }
                Some('S') => {
                    chars.next();
                    if chars.peek() == Some(&'\\') {
                        chars.next();
                    }
                    if let Some(c) = chars.next().and_then(|c| char::from_u32(c as u32 + 0x80)) {
                        result.push(c);
                    }
                }
                Some('X') => {
                    chars.next();
                    match chars.next() {
                        Some('\\') => {
                            let hex: String = chars.by_ref().take(2).collect();
                            if let Some(c) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                                result.push(c);
                            }
                        }
                        Some('2') => {
                            chars.next(); // '\'
                            let mut hex = String::new();
                            while let Some(&c) = chars.peek() {
                                if c == '\\' {
                                    break;
                                }
                                hex.push(c);
                                chars.next();
                            }
                            // \X0\
                            for _ in 0..4 {
                                chars.next();
                            }
                            let units: Vec<u16> = hex
                                .as_bytes()
                                .chunks(4)
                                .filter_map(|chunk| std::str::from_utf8(chunk).ok())
                                .filter_map(|h| u16::from_str_radix(h, 16).ok())
                                .collect();
                            result.extend(char::decode_utf16(units).filter_map(Result::ok));
                        }
                        Some(other) => {
                            result.push_str("\\X");
                            result.push(other);
                        }
                        None => result.push_str("\\X"),
                    }
                }
                _ => result.push('\\'),
            },
            _ => result.push(ch),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
/* a comment; with a semicolon */
#1=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,'Wall; \\X2\\00E9\\X0\\',$,
  $,#5,#6,'W-01',.STANDARD.);
#2=IFCPROPERTYSINGLEVALUE('Length',$,IFCLENGTHMEASURE(500.),$);
#3=IFCRELDEFINESBYPROPERTIES('x',$,$,$,(#1,#4),#7);
ENDSEC;
END-ISO-10303-21;
";

    #[test]
    fn parses_schema_and_multiline_entities() {
        let file = StepFile::parse(SAMPLE).unwrap();
        assert_eq!(file.schema, "IFC4");
        assert_eq!(file.entities.len(), 3);

        let wall = file.get_entity(1).unwrap();
        assert_eq!(wall.entity_type, "IFCWALL");
        assert_eq!(wall.string_at(2).as_deref(), Some("Wall; é"));
        assert_eq!(wall.string_at(7).as_deref(), Some("W-01"));
        assert_eq!(wall.values[8], StepValue::Enum("STANDARD".into()));
    }

    #[test]
    fn keeps_typed_values() {
        let file = StepFile::parse(SAMPLE).unwrap();
        let prop = file.get_entity(2).unwrap();
        assert_eq!(
            prop.values[2],
            StepValue::Typed("IFCLENGTHMEASURE".into(), Box::new(StepValue::Real(500.0)))
        );
        assert_eq!(prop.values[2].as_real(), Some(500.0));
    }

    #[test]
    fn collects_list_references() {
        let file = StepFile::parse(SAMPLE).unwrap();
        let rel = file.get_entity(3).unwrap();
        assert_eq!(rel.values[4].references(), vec![1, 4]);
        assert_eq!(rel.values[5].references(), vec![7]);
    }

    #[test]
    fn rejects_content_without_data_section() {
        assert!(StepFile::parse("ISO-10303-21;\nHEADER;\nENDSEC;\n").is_err());
    }

    #[test]
    fn decodes_string_escapes() {
        assert_eq!(decode_step_string("It''s"), "It's");
        assert_eq!(decode_step_string("a\\\\b"), "a\\b");
        assert_eq!(decode_step_string("\\X\\E9t\\X\\E9"), "été");
        assert_eq!(decode_step_string("\\S\\i"), "é");
        assert_eq!(decode_step_string("\\X2\\041C0430\\X0\\"), "Ма");
    }
}
