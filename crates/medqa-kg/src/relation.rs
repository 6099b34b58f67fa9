//! Graph vocabulary: relationship types, hop probes and node properties.
//!
//! Labels, relationship types and property names come from closed enums and
//! are the only parts spliced into Cypher text. Entity names always travel
//! as the `$name` parameter.

use medqa_common::Category;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    HasSymptom,
    RecommandDrug,
    CommonDrug,
    AcompanyWith,
    BelongsTo,
    DoEat,
    NoEat,
    RecommandEat,
    NeedCheck,
    Produces,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::HasSymptom    => "has_symptom",
            Relation::RecommandDrug => "recommand_drug",
            Relation::CommonDrug    => "common_drug",
            Relation::AcompanyWith  => "acompany_with",
            Relation::BelongsTo     => "belongs_to",
            Relation::DoEat         => "do_eat",
            Relation::NoEat         => "no_eat",
            Relation::RecommandEat  => "recommand_eat",
            Relation::NeedCheck     => "need_check",
            Relation::Produces      => "produces",
        }
    }
}

/// Edge direction as seen from the anchor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `(anchor)-[r]->(other)`
    Outgoing,
    /// `(anchor)<-[r]-(other)`
    Incoming,
}

/// "Does the `anchor` node named N have any of `relations` to/from a `target` node?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopProbe {
    pub anchor: Category,
    pub relations: &'static [Relation],
    pub direction: Direction,
    pub target: Category,
}

impl HopProbe {
    pub const fn outgoing(anchor: Category, relations: &'static [Relation], target: Category) -> Self {
        Self { anchor, relations, direction: Direction::Outgoing, target }
    }

    pub const fn incoming(anchor: Category, relations: &'static [Relation], target: Category) -> Self {
        Self { anchor, relations, direction: Direction::Incoming, target }
    }

    pub fn matches_relation(&self, relation: Relation) -> bool {
        self.relations.contains(&relation)
    }

    /// `MATCH` clause shared by the existence and listing queries.
    fn match_clause(&self) -> String {
        let rels = self
            .relations
            .iter()
            .map(Relation::as_str)
            .collect::<Vec<_>>()
            .join("|");
        let (left, right) = match self.direction {
            Direction::Outgoing => ("-", "->"),
            Direction::Incoming => ("<-", "-"),
        };
        format!(
            "MATCH (a:`{}`){}[:{}]{}(b:`{}`) WHERE a.name = $name",
            self.anchor, left, rels, right, self.target
        )
    }

    /// Parametrized existence query; expects a `$name` parameter.
    pub fn cypher(&self) -> String {
        format!("{} RETURN b.name LIMIT 1", self.match_clause())
    }

    /// Parametrized listing query: distinct target names, sorted, at most `limit`.
    pub fn list_cypher(&self, limit: usize) -> String {
        format!(
            "{} RETURN DISTINCT b.name AS name ORDER BY name LIMIT {}",
            self.match_clause(),
            limit
        )
    }
}

/// Free-text node properties readable without a hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeProperty {
    Desc,
    CureWay,
    Prevent,
    Cause,
    EasyGet,
    CureLasttime,
    CuredProb,
}

impl NodeProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeProperty::Desc         => "desc",
            NodeProperty::CureWay      => "cure_way",
            NodeProperty::Prevent      => "prevent",
            NodeProperty::Cause        => "cause",
            NodeProperty::EasyGet      => "easy_get",
            NodeProperty::CureLasttime => "cure_lasttime",
            NodeProperty::CuredProb    => "cured_prob",
        }
    }

    /// Property names are backquoted; `desc` is a Cypher keyword.
    pub fn cypher(&self, category: Category) -> String {
        format!(
            "MATCH (a:`{}`) WHERE a.name = $name RETURN a.`{}` LIMIT 1",
            category,
            self.as_str()
        )
    }
}
