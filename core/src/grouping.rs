//! Result grouping: "every parameter fixed except one".
//!
//! For a chosen varying field, combinations are partitioned into groups
//! whose remaining fields agree (integers exactly, reals within
//! FIELD_TOLERANCE). Tolerance equality is not transitive, so each group
//! is anchored on its first member: a combination joins the first group
//! whose anchor it matches. Groups come out in first-seen order and
//! members in sweep order.
//!
//! Anchors are indexed by a lookup cell: integer fields exactly, real
//! fields snapped to a grid of width 2 * FIELD_TOLERANCE. Two values
//! within tolerance always fall in the same or adjacent cells, so a
//! combination only checks the anchors of its neighbouring cells.
//!
//! Grouping never drops anything. Deciding that a group or a series is
//! too degenerate to compare is left to the consumer, through
//! `Group::is_comparable` and `Group::comparable_members`.

use crate::{
    combination::{FieldValue, ParamField, ParameterCombination, FIELD_TOLERANCE},
    simulation::RunOutcome,
    types::CombinationId,
};
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

/// Every field of a combination except the varying one.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupKey {
    pub varying: ParamField,
    pub fields: Vec<(ParamField, FieldValue)>,
}

impl GroupKey {
    pub fn of(combination: &ParameterCombination, varying: ParamField) -> Self {
        let fields = ParamField::ALL
            .into_iter()
            .filter(|f| *f != varying)
            .map(|f| (f, combination.value_of(f)))
            .collect();
        Self { varying, fields }
    }

    pub fn get(&self, field: ParamField) -> Option<FieldValue> {
        self.fields.iter().find(|(f, _)| *f == field).map(|(_, v)| *v)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, value) in &self.fields {
            if *value == FieldValue::Absent {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{field}={value}")?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GroupMember<'a> {
    pub id: CombinationId,
    pub combination: &'a ParameterCombination,
    /// None when the combination's run failed or was never simulated.
    pub outcome: Option<&'a RunOutcome>,
}

impl GroupMember<'_> {
    pub fn varying_value(&self, varying: ParamField) -> FieldValue {
        self.combination.value_of(varying)
    }
}

#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub key: GroupKey,
    anchor: &'a ParameterCombination,
    pub members: Vec<GroupMember<'a>>,
}

impl<'a> Group<'a> {
    pub fn varying(&self) -> ParamField {
        self.key.varying
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Distinct values of the varying field, first-seen order.
    pub fn distinct_varying_values(&self) -> Vec<FieldValue> {
        let mut values: Vec<FieldValue> = Vec::new();
        for member in &self.members {
            let value = member.varying_value(self.key.varying);
            if !values.iter().any(|v| v.approx_eq(&value)) {
                values.push(value);
            }
        }
        values
    }

    /// At least two distinct values of the varying field.
    pub fn is_comparable(&self) -> bool {
        self.distinct_varying_values().len() >= 2
    }

    /// Members with a simulated series that has some variation.
    pub fn comparable_members(&self) -> Vec<GroupMember<'a>> {
        self.members
            .iter()
            .filter(|m| m.outcome.is_some_and(RunOutcome::has_variation))
            .copied()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Coord {
    Int(u32),
    Real(i64),
    Absent,
}

/// Lookup cell of a combination, over every field except the varying one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Cell(Vec<Coord>);

impl Cell {
    fn of(combination: &ParameterCombination, varying: ParamField) -> Self {
        let coords = ParamField::ALL
            .into_iter()
            .filter(|f| *f != varying)
            .map(|f| match combination.value_of(f) {
                FieldValue::Int(v) => Coord::Int(v),
                // Saturates for huge values; the anchor check still decides.
                FieldValue::Real(v) => Coord::Real((v / (2.0 * FIELD_TOLERANCE)).floor() as i64),
                FieldValue::Absent => Coord::Absent,
            })
            .collect();
        Self(coords)
    }

    /// This cell and every cell one step away along a real axis.
    fn neighbourhood(&self) -> Vec<Cell> {
        let mut cells = vec![self.clone()];
        for (axis, coord) in self.0.iter().enumerate() {
            let Coord::Real(v) = *coord else { continue };
            let shifted: Vec<Cell> = cells
                .iter()
                .flat_map(|cell| {
                    [v.saturating_sub(1), v.saturating_add(1)].into_iter().map(move |n| {
                        let mut next = cell.clone();
                        next.0[axis] = Coord::Real(n);
                        next
                    })
                })
                .collect();
            cells.extend(shifted);
        }
        cells
    }
}

/// Partition `combinations` by every field except `varying`.
///
/// `outcomes` is keyed by each combination's position in `combinations`.
pub fn group_by<'a>(
    combinations: &'a [ParameterCombination],
    outcomes: &'a BTreeMap<CombinationId, RunOutcome>,
    varying: ParamField,
) -> Vec<Group<'a>> {
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut anchors: HashMap<Cell, Vec<usize>> = HashMap::new();

    for (index, combination) in combinations.iter().enumerate() {
        let id = CombinationId(index);
        let member = GroupMember {
            id,
            combination,
            outcome: outcomes.get(&id),
        };
        let cell = Cell::of(combination, varying);
        // Lowest index wins: the first group, in creation order, that matches.
        let found = cell
            .neighbourhood()
            .iter()
            .filter_map(|c| anchors.get(c))
            .flatten()
            .copied()
            .filter(|g| groups[*g].anchor.matches_except(combination, varying))
            .min();
        match found {
            Some(g) => groups[g].members.push(member),
            None => {
                anchors.entry(cell).or_default().push(groups.len());
                groups.push(Group {
                    key: GroupKey::of(combination, varying),
                    anchor: combination,
                    members: vec![member],
                });
            }
        }
    }

    log::debug!(
        "grouped {} combinations by {varying} into {} groups",
        combinations.len(),
        groups.len()
    );
    groups
}
