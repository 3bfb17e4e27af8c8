//! C3D parameter section: groups and typed, dimensioned parameters.
//!
//! Record layout (after the 4-byte section header):
//!
//! ```text
//! i8   name length (negative = locked, 0 = end of section)
//! i8   id (negative = group |id|, positive = parameter of group id)
//! ..   name
//! i16  offset from this field to the next record (0 = last record)
//! group:     u8 description length, description
//! parameter: i8 type (-1 char, 1 byte, 2 int16, 4 float), u8 dims,
//!            u8 × dims, data, u8 description length, description
//! ```

use super::bytes::{ByteReader, Processor};
use super::header::BLOCK_SIZE;
use crate::error::{CoreError, Result};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum ParamData {
    Char(Vec<u8>),
    Byte(Vec<u8>),
    Int(Vec<i16>),
    Float(Vec<f32>),
}

impl ParamData {
    fn len(&self) -> usize {
        match self {
            ParamData::Char(v) | ParamData::Byte(v) => v.len(),
            ParamData::Int(v) => v.len(),
            ParamData::Float(v) => v.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub dimensions: Vec<usize>,
    pub data: ParamData,
    pub locked: bool,
}

impl Parameter {
    /// Character data split on the first dimension, trailing blanks removed.
    pub fn strings(&self) -> Vec<String> {
        let ParamData::Char(bytes) = &self.data else {
            return Vec::new();
        };
        let width = match self.dimensions.first() {
            Some(&w) if self.dimensions.len() > 1 && w > 0 => w,
            _ => bytes.len().max(1),
        };
        bytes
            .chunks(width)
            .map(|chunk| {
                String::from_utf8_lossy(chunk)
                    .trim_end_matches(|c: char| c == ' ' || c == '\0')
                    .to_string()
            })
            .collect()
    }

    /// First value as an integer (byte, int16 or truncated float).
    pub fn first_int(&self) -> Option<i64> {
        match &self.data {
            ParamData::Byte(v) => v.first().map(|&b| b as i64),
            ParamData::Int(v) => v.first().map(|&i| i as i64),
            ParamData::Float(v) => v.first().map(|&f| f as i64),
            ParamData::Char(_) => None,
        }
    }

    pub fn first_float(&self) -> Option<f32> {
        match &self.data {
            ParamData::Byte(v) => v.first().map(|&b| b as f32),
            ParamData::Int(v) => v.first().map(|&i| i as f32),
            ParamData::Float(v) => v.first().copied(),
            ParamData::Char(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub id: u8,
    pub name: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
}

/// All groups of a file, in file order. Names are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParameterSet {
    pub groups: Vec<Group>,
}

impl ParameterSet {
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }

    pub fn get(&self, group: &str, name: &str) -> Option<&Parameter> {
        self.group(group)?
            .parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn parameter_count(&self) -> usize {
        self.groups.iter().map(|g| g.parameters.len()).sum()
    }

    fn group_mut(&mut self, id: u8) -> &mut Group {
        let index = match self.groups.iter().position(|g| g.id == id) {
            Some(index) => index,
            None => {
                // parameter seen before its group record
                self.groups.push(Group {
                    id,
                    name: String::new(),
                    description: String::new(),
                    parameters: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    /// Parse the section starting at 1-based `block`.
    pub(crate) fn parse(bytes: &[u8], block: u8, processor: Processor) -> Result<Self> {
        let start = (block as usize).saturating_sub(1) * BLOCK_SIZE;
        let mut r = ByteReader::new(bytes, start, processor);
        r.skip(2)?;
        let block_count = r.u8()? as usize;
        r.skip(1)?;
        let end = (start + block_count.max(1) * BLOCK_SIZE).min(bytes.len());

        let mut set = ParameterSet::default();
        while r.position() + 2 <= end {
            let name_len = r.i8()?;
            if name_len == 0 {
                break;
            }
            let id = r.i8()?;
            if id == 0 {
                break;
            }
            let name = read_text(&mut r, name_len.unsigned_abs() as usize)?;
            let offset_pos = r.position();
            let offset = r.i16()?;

            if id < 0 {
                let desc_len = r.u8()? as usize;
                let description = read_text(&mut r, desc_len)?;
                let group = set.group_mut(id.unsigned_abs());
                group.name = name;
                group.description = description;
            } else {
                let parameter = read_parameter(&mut r, name, name_len < 0)?;
                set.group_mut(id as u8).parameters.push(parameter);
            }

            if offset <= 0 {
                break;
            }
            r.seek(offset_pos + offset as usize);
        }

        debug!(
            "Parsed {} parameter groups, {} parameters",
            set.groups.len(),
            set.parameter_count()
        );
        Ok(set)
    }
}

fn read_text(r: &mut ByteReader, len: usize) -> Result<String> {
    Ok(String::from_utf8_lossy(r.take(len)?)
        .trim_end_matches(|c: char| c == ' ' || c == '\0')
        .to_string())
}

fn read_parameter(r: &mut ByteReader, name: String, locked: bool) -> Result<Parameter> {
    let kind = r.i8()?;
    let dim_count = r.u8()? as usize;
    let mut dimensions = Vec::with_capacity(dim_count);
    for _ in 0..dim_count {
        dimensions.push(r.u8()? as usize);
    }
    let count: usize = dimensions.iter().product();

    let data = match kind {
        -1 => ParamData::Char(r.take(count)?.to_vec()),
        1 => ParamData::Byte(r.take(count)?.to_vec()),
        2 => ParamData::Int((0..count).map(|_| r.i16()).collect::<Result<_>>()?),
        4 => ParamData::Float((0..count).map(|_| r.f32()).collect::<Result<_>>()?),
        other => {
            return Err(CoreError::C3d(format!(
                "parameter {} has unknown data type {}",
                name, other
            )))
        }
    };
    debug_assert_eq!(data.len(), count);

    let desc_len = r.u8()? as usize;
    let description = read_text(r, desc_len)?;
    Ok(Parameter {
        name,
        description,
        dimensions,
        data,
        locked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels_param(labels: &[&str], width: usize) -> Parameter {
        let mut bytes = Vec::new();
        for label in labels {
            let mut cell = label.as_bytes().to_vec();
            cell.resize(width, b' ');
            bytes.extend(cell);
        }
        Parameter {
            name: "LABELS".to_string(),
            description: String::new(),
            dimensions: vec![width, labels.len()],
            data: ParamData::Char(bytes),
            locked: false,
        }
    }

    #[test]
    fn test_strings_split_on_first_dimension() {
        let param = labels_param(&["C7", "LSHO", "MARKER1"], 8);
        assert_eq!(param.strings(), vec!["C7", "LSHO", "MARKER1"]);
    }

    #[test]
    fn test_single_string() {
        let param = Parameter {
            name: "UNITS".to_string(),
            description: String::new(),
            dimensions: vec![4],
            data: ParamData::Char(b"mm  ".to_vec()),
            locked: false,
        };
        assert_eq!(param.strings(), vec!["mm"]);
        assert_eq!(param.first_int(), None);
    }

    #[test]
    fn test_numeric_accessors() {
        let param = Parameter {
            name: "RATE".to_string(),
            description: String::new(),
            dimensions: vec![],
            data: ParamData::Float(vec![300.0]),
            locked: false,
        };
        assert_eq!(param.first_float(), Some(300.0));
        assert_eq!(param.first_int(), Some(300));
    }
}
