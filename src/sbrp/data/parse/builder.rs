use tracing::warn;

use crate::sbrp::data::error::{RecordKind, Result, ToolError};
use crate::sbrp::data::model::{EdgeRecord, NodeId, NodeRecord, RAGAZZI_SLOTS, STOP_CATEGORY};
use crate::sbrp::data::parse::{ParseOptions, RagazziOverflow};

/// Field keywords understood inside `node [` and `edge [` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Id,
    Label,
    Pos,
    Tipologia,
    Locazione,
    Citta,
    Ragazzi,
    Source,
    Target,
    Weight,
    Time,
}

impl Field {
    pub(crate) fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "id" => Field::Id,
            "label" => Field::Label,
            "pos" => Field::Pos,
            "tipologia" => Field::Tipologia,
            "locazione" => Field::Locazione,
            "citta" => Field::Citta,
            "ragazzi" => Field::Ragazzi,
            "source" => Field::Source,
            "target" => Field::Target,
            "weight" => Field::Weight,
            "time" => Field::Time,
            _ => return None,
        })
    }

    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Label => "label",
            Field::Pos => "pos",
            Field::Tipologia => "tipologia",
            Field::Locazione => "locazione",
            Field::Citta => "citta",
            Field::Ragazzi => "ragazzi",
            Field::Source => "source",
            Field::Target => "target",
            Field::Weight => "weight",
            Field::Time => "time",
        }
    }

    /// The block kind this field belongs to.
    pub(crate) fn record(self) -> RecordKind {
        match self {
            Field::Source | Field::Target | Field::Weight | Field::Time => RecordKind::Edge,
            _ => RecordKind::Node,
        }
    }
}

/// Accumulates the fields of an open `node [` block.
#[derive(Debug, Default)]
pub(crate) struct NodeBuilder {
    id: Option<NodeId>,
    label: Option<String>,
    pos: Vec<f64>,
    tipologia: Option<String>,
    locazione: Option<String>,
    citta: Option<i64>,
    ragazzi: Option<Vec<i64>>,
}

impl NodeBuilder {
    pub(crate) fn set(&mut self, field: Field, value: &str, line: usize) -> Result<()> {
        match field {
            Field::Id => self.id = Some(parse_int(field, value, line)?),
            Field::Label => self.label = Some(unquote(value)),
            Field::Pos => self.pos.push(parse_float(field, value, line)?),
            Field::Tipologia => self.tipologia = Some(unquote(value)),
            Field::Locazione => self.locazione = Some(unquote(value)),
            Field::Citta => self.citta = Some(parse_int(field, value, line)?),
            Field::Ragazzi => {
                let count = parse_int(field, value, line)?;
                self.ragazzi.get_or_insert_with(Vec::new).push(count);
            }
            other => {
                return Err(ToolError::UnexpectedField {
                    line,
                    field: other.keyword().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Closes the block, enforcing the invariants every stored node satisfies.
    pub(crate) fn finish(self, line: usize, options: &ParseOptions) -> Result<NodeRecord> {
        let id = self.id.ok_or(ToolError::MissingRequiredField {
            line,
            record: RecordKind::Node,
            field: "id",
        })?;

        let pos = match self.pos.as_slice() {
            [] => {
                return Err(ToolError::MissingRequiredField {
                    line,
                    record: RecordKind::Node,
                    field: "pos",
                });
            }
            [x, y] => (*x, *y),
            other => {
                return Err(ToolError::InvalidCoordinates {
                    id,
                    count: other.len(),
                });
            }
        };

        // Only stops export their counts, so the overflow policy binds them alone.
        let overflow = if self.tipologia.as_deref() == Some(STOP_CATEGORY) {
            options.ragazzi_overflow
        } else {
            RagazziOverflow::Truncate
        };
        let ragazzi = match self.ragazzi {
            Some(counts) => Some(pad_ragazzi(id, counts, overflow)?),
            None => None,
        };

        Ok(NodeRecord {
            id,
            label: self.label,
            pos,
            tipologia: self.tipologia,
            locazione: self.locazione,
            citta: self.citta,
            ragazzi,
        })
    }
}

/// Accumulates the fields of an open `edge [` block.
#[derive(Debug, Default)]
pub(crate) struct EdgeBuilder {
    source: Option<NodeId>,
    target: Option<NodeId>,
    weight: Option<f64>,
    time: Option<f64>,
}

impl EdgeBuilder {
    pub(crate) fn set(&mut self, field: Field, value: &str, line: usize) -> Result<()> {
        match field {
            Field::Source => self.source = Some(parse_int(field, value, line)?),
            Field::Target => self.target = Some(parse_int(field, value, line)?),
            Field::Weight => self.weight = Some(parse_float(field, value, line)?),
            Field::Time => self.time = Some(parse_float(field, value, line)?),
            other => {
                return Err(ToolError::UnexpectedField {
                    line,
                    field: other.keyword().to_string(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn finish(self, line: usize) -> Result<EdgeRecord> {
        let missing = |field| ToolError::MissingRequiredField {
            line,
            record: RecordKind::Edge,
            field,
        };
        Ok(EdgeRecord {
            source: self.source.ok_or_else(|| missing("source"))?,
            target: self.target.ok_or_else(|| missing("target"))?,
            weight: self.weight.ok_or_else(|| missing("weight"))?,
            time: self.time.ok_or_else(|| missing("time"))?,
        })
    }
}

fn pad_ragazzi(
    id: NodeId,
    mut counts: Vec<i64>,
    overflow: RagazziOverflow,
) -> Result<[i64; RAGAZZI_SLOTS]> {
    if counts.len() > RAGAZZI_SLOTS {
        match overflow {
            RagazziOverflow::Reject => {
                return Err(ToolError::RagazziOverflow {
                    id,
                    count: counts.len(),
                });
            }
            RagazziOverflow::Truncate => {
                warn!(
                    node = id,
                    count = counts.len(),
                    "truncating ragazzi to {RAGAZZI_SLOTS} values"
                );
                counts.truncate(RAGAZZI_SLOTS);
            }
        }
    }

    let mut slots = [0; RAGAZZI_SLOTS];
    slots[..counts.len()].copy_from_slice(&counts);
    Ok(slots)
}

fn parse_int(field: Field, value: &str, line: usize) -> Result<i64> {
    value.parse().map_err(|_| invalid_literal(field, value, line))
}

fn parse_float(field: Field, value: &str, line: usize) -> Result<f64> {
    value.parse().map_err(|_| invalid_literal(field, value, line))
}

fn invalid_literal(field: Field, value: &str, line: usize) -> ToolError {
    ToolError::InvalidLiteral {
        line,
        column: field.keyword().to_string(),
        value: value.to_string(),
    }
}

fn unquote(value: &str) -> String {
    value.trim_matches('"').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_strips_every_surrounding_quote() {
        assert_eq!(unquote("\"Buttrio\""), "Buttrio");
        assert_eq!(unquote("\"\"x\""), "x");
        assert_eq!(unquote("plain"), "plain");
    }

    #[test]
    fn padding_fills_trailing_slots_with_zeros() {
        let slots = pad_ragazzi(1, vec![4, 2], RagazziOverflow::Reject).expect("padded");
        assert_eq!(slots, [4, 2, 0, 0]);
    }

    #[test]
    fn overflow_policy_decides_between_truncation_and_rejection() {
        let counts = vec![1, 2, 3, 4, 5];
        let truncated =
            pad_ragazzi(9, counts.clone(), RagazziOverflow::Truncate).expect("truncated");
        assert_eq!(truncated, [1, 2, 3, 4]);

        let rejected = pad_ragazzi(9, counts, RagazziOverflow::Reject);
        assert!(matches!(
            rejected,
            Err(ToolError::RagazziOverflow { id: 9, count: 5 })
        ));
    }

    #[test]
    fn keywords_map_to_their_block_kind() {
        for keyword in ["source", "target", "weight", "time"] {
            let field = Field::from_keyword(keyword).expect("known keyword");
            assert_eq!(field.record(), RecordKind::Edge);
            assert_eq!(field.keyword(), keyword);
        }
        assert_eq!(Field::from_keyword("ragazzi").map(Field::record), Some(RecordKind::Node));
        assert_eq!(Field::from_keyword("graphics"), None);
    }
}
