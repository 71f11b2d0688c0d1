//! Turns the raw element graph into typed, ordered geometry collections.
//!
//! Classification is an ordered rule list: the first rule that claims a
//! way decides its category. Roads are then sorted by a fixed priority
//! table so that later-drawn (more important) roads sit on top.

use fxhash::FxHashMap;
use serde::Serialize;

use super::overpass::{ElementId, RegionPayload, Tags, ROAD_SUBTYPES};
use crate::core::geo::LatLng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GeometryCategory {
    Road,
    WaterLine,
    WaterPolygon,
    ParkPolygon,
}

impl GeometryCategory {
    pub fn is_polygon(&self) -> bool {
        matches!(self, Self::WaterPolygon | Self::ParkPolygon)
    }

    /// Fewest resolved points a geometry of this category may have
    pub fn min_points(&self) -> usize {
        if self.is_polygon() {
            3
        } else {
            2
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
    pub category: GeometryCategory,
    /// Highway class for roads, the matching tag value otherwise
    pub subtype: String,
    pub points: Vec<LatLng>,
}

/// Outcome of the rule list for a single way
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Road(String),
    WaterLine(String),
    WaterPolygon(String),
    Park(String),
    Discarded,
}

impl Classification {
    fn into_parts(self) -> Option<(GeometryCategory, String)> {
        match self {
            Self::Road(s) => Some((GeometryCategory::Road, s)),
            Self::WaterLine(s) => Some((GeometryCategory::WaterLine, s)),
            Self::WaterPolygon(s) => Some((GeometryCategory::WaterPolygon, s)),
            Self::Park(s) => Some((GeometryCategory::ParkPolygon, s)),
            Self::Discarded => None,
        }
    }
}

type Rule = fn(&Tags, bool) -> Option<Classification>;

/// Evaluated top to bottom; first `Some` wins.
const RULES: [(&str, Rule); 3] = [
    ("highway", highway_rule),
    ("water", water_rule),
    ("park", park_rule),
];

fn highway_rule(tags: &Tags, _closed: bool) -> Option<Classification> {
    tags.get("highway").map(|h| Classification::Road(h.clone()))
}

fn water_rule(tags: &Tags, closed: bool) -> Option<Classification> {
    let subtype = match (tags.get("natural"), tags.get("waterway")) {
        (Some(natural), _) if natural == "water" => natural.clone(),
        (_, Some(waterway)) => waterway.clone(),
        _ => return None,
    };

    Some(if closed {
        Classification::WaterPolygon(subtype)
    } else {
        Classification::WaterLine(subtype)
    })
}

fn park_rule(tags: &Tags, closed: bool) -> Option<Classification> {
    let subtype = if tags.get("leisure").map(String::as_str) == Some("park") {
        "park"
    } else if tags.get("landuse").map(String::as_str) == Some("grass") {
        "grass"
    } else {
        return None;
    };

    // Parks must be polygons
    Some(if closed {
        Classification::Park(subtype.to_string())
    } else {
        Classification::Discarded
    })
}

/// Runs the rule list for one tagged way. `closed` is the ring test on the
/// way's member ids.
pub fn classify_way(tags: &Tags, closed: bool) -> Classification {
    if tags.is_empty() {
        return Classification::Discarded;
    }

    RULES
        .iter()
        .find_map(|(name, rule)| {
            let hit = rule(tags, closed);
            if hit.is_some() {
                log::trace!("rule '{}' matched", name);
            }
            hit
        })
        .unwrap_or(Classification::Discarded)
}

/// A way is a polygon iff its first and last member ids are identical.
pub fn is_closed_ring(node_ids: &[ElementId]) -> bool {
    match (node_ids.first(), node_ids.last()) {
        (Some(first), Some(last)) => node_ids.len() > 1 && first == last,
        _ => false,
    }
}

/// Draw priority for a road subtype. Unknown subtypes get 0, below every
/// entry of the table, so they are drawn first and end up underneath.
pub fn road_priority(subtype: &str) -> usize {
    ROAD_SUBTYPES
        .iter()
        .position(|s| *s == subtype)
        .map(|i| i + 1)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassifiedRegion {
    /// Ascending render priority
    pub roads: Vec<Geometry>,
    pub water_lines: Vec<Geometry>,
    pub water_polygons: Vec<Geometry>,
    pub parks: Vec<Geometry>,
}

impl ClassifiedRegion {
    pub fn len(&self) -> usize {
        self.roads.len() + self.water_lines.len() + self.water_polygons.len() + self.parks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, geometry: Geometry) {
        match geometry.category {
            GeometryCategory::Road => self.roads.push(geometry),
            GeometryCategory::WaterLine => self.water_lines.push(geometry),
            GeometryCategory::WaterPolygon => self.water_polygons.push(geometry),
            GeometryCategory::ParkPolygon => self.parks.push(geometry),
        }
    }
}

/// Classifies every way and relation of the payload.
pub fn classify(payload: &RegionPayload) -> ClassifiedRegion {
    let nodes: FxHashMap<ElementId, LatLng> = payload
        .elements
        .iter()
        .filter_map(|e| Some((e.id()?, e.location()?)))
        .collect();

    let mut region = ClassifiedRegion::default();
    let mut dropped = 0usize;

    for element in &payload.elements {
        let (Some(member_ids), Some(tags)) = (element.member_nodes(), element.tags()) else {
            continue;
        };
        if tags.is_empty() {
            continue;
        }

        let points: Vec<LatLng> = member_ids
            .iter()
            .filter_map(|id| nodes.get(id).copied())
            .collect();
        if points.len() < 2 {
            dropped += 1;
            continue;
        }

        let Some((category, subtype)) =
            classify_way(tags, is_closed_ring(&member_ids)).into_parts()
        else {
            continue;
        };
        if points.len() < category.min_points() {
            dropped += 1;
            continue;
        }

        region.push(Geometry {
            category,
            subtype,
            points,
        });
    }

    // Stable: equal priorities keep input order
    region.roads.sort_by_key(|road| road_priority(&road.subtype));

    log::debug!(
        "classified {} nodes into {} roads, {} water lines, {} water polygons, {} parks ({} unresolvable ways dropped)",
        nodes.len(),
        region.roads.len(),
        region.water_lines.len(),
        region.water_polygons.len(),
        region.parks.len(),
        dropped
    );

    region
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::overpass::RawElement;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn node(id: ElementId, lat: f64, lon: f64) -> RawElement {
        RawElement::Node {
            id,
            lat,
            lon,
            tags: Tags::new(),
        }
    }

    fn way(id: ElementId, nodes: &[ElementId], pairs: &[(&str, &str)]) -> RawElement {
        RawElement::Way {
            id,
            nodes: nodes.to_vec(),
            tags: tags(pairs),
        }
    }

    fn square_nodes() -> Vec<RawElement> {
        vec![
            node(1, 52.0, 13.0),
            node(2, 52.01, 13.01),
            node(3, 52.0, 13.02),
        ]
    }

    #[test]
    fn test_single_primary_road() {
        let payload = RegionPayload {
            elements: vec![
                node(1, 52.0, 13.0),
                node(2, 52.01, 13.01),
                way(10, &[1, 2], &[("highway", "primary")]),
            ],
        };

        let region = classify(&payload);
        assert_eq!(region.roads.len(), 1);
        assert_eq!(region.roads[0].subtype, "primary");
        assert_eq!(region.roads[0].points.len(), 2);
        assert!(region.water_lines.is_empty());
        assert!(region.water_polygons.is_empty());
        assert!(region.parks.is_empty());
    }

    #[test]
    fn test_closed_water_becomes_polygon() {
        let mut elements = square_nodes();
        elements.push(way(10, &[1, 2, 3, 1], &[("natural", "water")]));

        let region = classify(&RegionPayload { elements });
        assert_eq!(region.water_polygons.len(), 1);
        assert_eq!(region.water_polygons[0].points.len(), 4);
        assert!(region.water_lines.is_empty());
    }

    #[test]
    fn test_open_ways_never_become_polygons() {
        let mut elements = square_nodes();
        elements.push(way(10, &[1, 2, 3], &[("natural", "water")]));
        elements.push(way(11, &[1, 2, 3], &[("waterway", "river")]));
        elements.push(way(12, &[1, 2, 3], &[("leisure", "park")]));
        elements.push(way(13, &[3, 2, 1], &[("landuse", "grass")]));

        let region = classify(&RegionPayload { elements });
        assert_eq!(region.water_lines.len(), 2);
        assert!(region.water_polygons.is_empty());
        assert!(region.parks.is_empty());
    }

    #[test]
    fn test_unresolvable_ways_are_dropped() {
        let elements = vec![
            node(1, 52.0, 13.0),
            way(10, &[1, 99], &[("highway", "residential")]),
            way(11, &[98, 99], &[("highway", "primary")]),
            way(12, &[1], &[("highway", "primary")]),
            way(13, &[], &[("highway", "primary")]),
        ];

        let region = classify(&RegionPayload { elements });
        assert!(region.is_empty());
    }

    #[test]
    fn test_missing_nodes_are_skipped_not_fatal() {
        let mut elements = square_nodes();
        elements.push(way(10, &[1, 77, 2, 3], &[("highway", "service")]));

        let region = classify(&RegionPayload { elements });
        assert_eq!(region.roads[0].points.len(), 3);
        assert_eq!(region.roads[0].points[1], LatLng::new(52.01, 13.01));
    }

    #[test]
    fn test_polygons_need_three_points() {
        let elements = vec![
            node(1, 52.0, 13.0),
            node(2, 52.01, 13.01),
            way(10, &[1, 2, 1], &[("natural", "water")]),
            way(11, &[1, 1], &[("leisure", "park")]),
            way(12, &[1, 2, 99, 1], &[("landuse", "grass")]),
        ];

        let region = classify(&RegionPayload { elements });
        assert_eq!(region.water_polygons.len(), 1);
        assert_eq!(region.water_polygons[0].points.len(), 3);
        // [1, 1] is a ring by ids but resolves to only two points;
        // [1, 2, 99, 1] stays a ring by ids after losing node 99
        assert_eq!(region.parks.len(), 1);
        assert_eq!(region.parks[0].subtype, "grass");
    }

    #[test]
    fn test_untagged_ways_are_ignored() {
        let mut elements = square_nodes();
        elements.push(way(10, &[1, 2, 3], &[]));
        elements.push(way(11, &[1, 2, 3], &[("building", "yes")]));

        let region = classify(&RegionPayload { elements });
        assert!(region.is_empty());
    }

    #[test]
    fn test_rule_precedence() {
        // highway beats water beats park
        assert_eq!(
            classify_way(&tags(&[("highway", "path"), ("natural", "water")]), true),
            Classification::Road("path".to_string())
        );
        assert_eq!(
            classify_way(&tags(&[("waterway", "canal"), ("leisure", "park")]), true),
            Classification::WaterPolygon("canal".to_string())
        );
        assert_eq!(
            classify_way(&tags(&[("natural", "wood"), ("landuse", "grass")]), true),
            Classification::Park("grass".to_string())
        );
        assert_eq!(
            classify_way(&tags(&[("leisure", "park")]), false),
            Classification::Discarded
        );
        assert_eq!(classify_way(&Tags::new(), true), Classification::Discarded);
    }

    #[test]
    fn test_road_priority_order() {
        let mut elements = square_nodes();
        let shuffled = [
            "primary",
            "service",
            "motorway",
            "footway",
            "tertiary_link",
            "trunk",
            "living_street",
            "secondary",
            "motorway_link",
            "unclassified",
            "primary_link",
            "residential",
            "trunk_link",
            "tertiary",
            "secondary_link",
            "cycleway",
        ];
        for (i, subtype) in shuffled.iter().enumerate() {
            elements.push(way(100 + i as ElementId, &[1, 2], &[("highway", subtype)]));
        }

        let region = classify(&RegionPayload { elements });
        let order: Vec<&str> = region.roads.iter().map(|r| r.subtype.as_str()).collect();

        // Unknown subtypes first, in input order
        assert_eq!(&order[..2], &["footway", "cycleway"]);
        assert_eq!(&order[2..], &ROAD_SUBTYPES[..]);
    }

    #[test]
    fn test_relation_with_node_members() {
        let mut elements = square_nodes();
        elements.push(RawElement::Relation {
            id: 50,
            members: vec![
                crate::data::overpass::RelationMember {
                    member_type: "way".to_string(),
                    id: 10,
                    role: "outer".to_string(),
                },
            ],
            tags: tags(&[("natural", "water")]),
        });
        elements.push(RawElement::Relation {
            id: 51,
            members: [1, 2, 3, 1]
                .iter()
                .map(|id| crate::data::overpass::RelationMember {
                    member_type: "node".to_string(),
                    id: *id,
                    role: String::new(),
                })
                .collect(),
            tags: tags(&[("leisure", "park")]),
        });

        let region = classify(&RegionPayload { elements });
        // The way-only relation has no node list and drops silently
        assert!(region.water_polygons.is_empty());
        assert_eq!(region.parks.len(), 1);
        assert_eq!(region.parks[0].subtype, "park");
    }

    #[test]
    fn test_ring_detection() {
        assert!(is_closed_ring(&[1, 2, 3, 1]));
        assert!(!is_closed_ring(&[1, 2, 3]));
        assert!(!is_closed_ring(&[1]));
        assert!(!is_closed_ring(&[]));
    }
}
