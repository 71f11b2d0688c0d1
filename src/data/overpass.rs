//! Raw Overpass element graph and the region query that produces it.

use serde::Deserialize;
use std::collections::HashMap;

use crate::core::geo::LatLng;
use crate::{Error, Result};

pub type ElementId = i64;
pub type Tags = HashMap<String, String>;

/// Road subtypes requested from Overpass, lowest render priority first.
pub const ROAD_SUBTYPES: [&str; 14] = [
    "service",
    "living_street",
    "unclassified",
    "residential",
    "tertiary_link",
    "tertiary",
    "secondary_link",
    "secondary",
    "primary_link",
    "primary",
    "trunk_link",
    "trunk",
    "motorway_link",
    "motorway",
];

pub const WATERWAY_SUBTYPES: [&str; 4] = ["river", "riverbank", "stream", "canal"];

/// One element of the Overpass `elements` array
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawElement {
    Node {
        id: ElementId,
        lat: f64,
        lon: f64,
        #[serde(default)]
        tags: Tags,
    },
    Way {
        id: ElementId,
        #[serde(default)]
        nodes: Vec<ElementId>,
        #[serde(default)]
        tags: Tags,
    },
    Relation {
        id: ElementId,
        #[serde(default)]
        members: Vec<RelationMember>,
        #[serde(default)]
        tags: Tags,
    },
    /// Areas, counts and anything else Overpass may emit
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelationMember {
    #[serde(rename = "type")]
    pub member_type: String,
    #[serde(rename = "ref")]
    pub id: ElementId,
    #[serde(default)]
    pub role: String,
}

impl RawElement {
    pub fn id(&self) -> Option<ElementId> {
        match self {
            Self::Node { id, .. } | Self::Way { id, .. } | Self::Relation { id, .. } => Some(*id),
            Self::Other => None,
        }
    }

    /// Coordinate of a node element
    pub fn location(&self) -> Option<LatLng> {
        match self {
            Self::Node { lat, lon, .. } => Some(LatLng::new(*lat, *lon)),
            _ => None,
        }
    }

    /// Member node ids in order, for ways and relations. A relation only
    /// exposes its node-typed members; way members are not expanded.
    pub fn member_nodes(&self) -> Option<Vec<ElementId>> {
        match self {
            Self::Way { nodes, .. } => Some(nodes.clone()),
            Self::Relation { members, .. } => Some(
                members
                    .iter()
                    .filter(|m| m.member_type == "node")
                    .map(|m| m.id)
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn tags(&self) -> Option<&Tags> {
        match self {
            Self::Node { tags, .. } | Self::Way { tags, .. } | Self::Relation { tags, .. } => {
                Some(tags)
            }
            Self::Other => None,
        }
    }
}

/// Element graph returned by one Overpass query. Discarded after classification.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RegionPayload {
    pub elements: Vec<RawElement>,
}

impl RegionPayload {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::MalformedRegionPayload(e.to_string()))
    }

    pub fn node_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, RawElement::Node { .. }))
            .count()
    }
}

/// Builds the Overpass QL query for every feature category within
/// `radius_m` of `center`, recursing down to member nodes.
pub fn build_query(center: LatLng, radius_m: f64, timeout_secs: u64) -> String {
    let around = format!("(around:{},{},{})", radius_m.round(), center.lat, center.lng);
    let roads = ROAD_SUBTYPES.join("|");
    let waterways = WATERWAY_SUBTYPES.join("|");

    let filters = [
        format!("way[\"highway\"~\"^({})$\"]", roads),
        "way[\"natural\"=\"water\"]".to_string(),
        "relation[\"natural\"=\"water\"]".to_string(),
        format!("way[\"waterway\"~\"^({})$\"]", waterways),
        "way[\"leisure\"=\"park\"]".to_string(),
        "relation[\"leisure\"=\"park\"]".to_string(),
        "way[\"landuse\"=\"grass\"]".to_string(),
    ];

    let mut query = format!("[out:json][timeout:{}];\n(\n", timeout_secs);
    for filter in &filters {
        query.push_str("  ");
        query.push_str(filter);
        query.push_str(&around);
        query.push_str(";\n");
    }
    query.push_str(");\n(._;>;);\nout body;\n");
    query
}
