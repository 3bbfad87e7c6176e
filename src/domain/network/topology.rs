use crate::api::topology_dto::{LinkProfileDto, TopologyDto};
use crate::domain::network::graph::Graph;
use crate::domain::network::link::Link;
use crate::domain::utils::id::VertexId;
use crate::error::{Error, Result};
use std::collections::HashMap;

impl TryFrom<TopologyDto> for Graph {
    type Error = Error;

    fn try_from(dto: TopologyDto) -> Result<Self> {
        // 1. Resolve the named link presets.
        let profiles = setup_link_profiles(&dto.link_profiles);

        let mut graph = Graph::new();

        // 2. Explicit vertices first, so isolated hosts keep their declared position.
        for vertex in dto.vertices.iter() {
            graph.add_vertex(&VertexId::new(vertex.clone()));
        }

        // 3. Hubs, in file order.
        for hub in dto.hubs.iter() {
            let link = resolve_profile(&profiles, &hub.profile)?;
            let hub_id = VertexId::new(hub.id.clone());

            for neighbor in hub.neighbors.iter() {
                graph.link_vertices(&hub_id, &VertexId::new(neighbor.clone()), link)?;
            }
        }

        // 4. Individual links. Explicit attributes override the profile's.
        for link_dto in dto.links.iter() {
            let base = match &link_dto.profile {
                Some(name) => Some(*profiles.get(name.as_str()).ok_or_else(|| Error::UnknownLinkProfile(name.clone()))?),
                None => None,
            };

            let distance = link_dto.distance.or(base.map(|l| l.distance));
            let transmission_rate = link_dto.transmission_rate.or(base.map(|l| l.transmission_rate));
            let link = Link::from_parts(distance, transmission_rate)
                .map_err(|e| Error::InvalidLink(format!("{} -- {}: {}", link_dto.a, link_dto.b, e)))?;

            graph.link_vertices(&VertexId::new(link_dto.a.clone()), &VertexId::new(link_dto.b.clone()), link)?;
        }

        if graph.vertex_count() == 0 {
            log::warn!("Empty topology: the loaded network contains no vertices.");
        }

        log::info!("Topology constructed: {} vertices, {} links.", graph.vertex_count(), graph.link_count());
        Ok(graph)
    }
}

/// Attribute pair of a profile. Profiles may be incomplete as long as links fill the gaps.
#[derive(Debug, Clone, Copy)]
struct ProfileAttributes {
    distance: f64,
    transmission_rate: f64,
}

fn setup_link_profiles(profiles: &[LinkProfileDto]) -> HashMap<&str, ProfileAttributes> {
    let mut resolved = HashMap::new();

    for profile in profiles {
        // Missing attributes are kept as NaN so that Link::new rejects them if nothing overrides them.
        let attributes = ProfileAttributes {
            distance: profile.distance.unwrap_or(f64::NAN),
            transmission_rate: profile.transmission_rate.unwrap_or(f64::NAN),
        };

        if resolved.insert(profile.name.as_str(), attributes).is_some() {
            log::warn!("Link profile '{}' is defined more than once. The last definition wins.", profile.name);
        }
    }

    resolved
}

fn resolve_profile(profiles: &HashMap<&str, ProfileAttributes>, name: &str) -> Result<Link> {
    let attributes = profiles.get(name).ok_or_else(|| Error::UnknownLinkProfile(name.to_string()))?;
    Link::new(attributes.distance, attributes.transmission_rate)
        .map_err(|e| Error::InvalidLink(format!("profile '{}': {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::topology_dto::{HubDto, LinkDto};

    fn profile(name: &str, distance: f64, rate: f64) -> LinkProfileDto {
        LinkProfileDto { name: name.to_string(), distance: Some(distance), transmission_rate: Some(rate) }
    }

    #[test]
    fn test_hubs_expand_to_links() {
        let dto = TopologyDto {
            link_profiles: vec![profile("host subnet", 10_000.0, 1e8)],
            vertices: vec![],
            hubs: vec![HubDto { id: "E1".to_string(), profile: "host subnet".to_string(), neighbors: vec!["H1".to_string(), "H2".to_string()] }],
            links: vec![],
        };

        let graph = Graph::try_from(dto).unwrap();
        assert_eq!(graph.vertices(), &[VertexId::new("E1"), VertexId::new("H1"), VertexId::new("H2")]);
        assert_eq!(graph.link_between(&VertexId::new("H2"), &VertexId::new("E1")), Some(Link::new(10_000.0, 1e8).unwrap()));
    }

    #[test]
    fn test_link_overrides_profile_attributes() {
        let dto = TopologyDto {
            link_profiles: vec![profile("wan", 700_000.0, 5e8)],
            vertices: vec!["D".to_string()],
            hubs: vec![],
            links: vec![LinkDto { a: "X".to_string(), b: "Y".to_string(), profile: Some("wan".to_string()), distance: Some(1.0), transmission_rate: None }],
        };

        let graph = Graph::try_from(dto).unwrap();
        assert_eq!(graph.vertices()[0], VertexId::new("D"));
        assert_eq!(graph.link_between(&VertexId::new("X"), &VertexId::new("Y")), Some(Link::new(1.0, 5e8).unwrap()));
    }

    #[test]
    fn test_unknown_profile() {
        let dto = TopologyDto {
            hubs: vec![HubDto { id: "E1".to_string(), profile: "satellite".to_string(), neighbors: vec!["H1".to_string()] }],
            ..Default::default()
        };

        assert!(matches!(Graph::try_from(dto), Err(Error::UnknownLinkProfile(name)) if name == "satellite"));
    }

    #[test]
    fn test_link_without_attributes_is_invalid() {
        let dto = TopologyDto {
            links: vec![LinkDto { a: "X".to_string(), b: "Y".to_string(), profile: None, distance: Some(3.0), transmission_rate: None }],
            ..Default::default()
        };

        assert!(matches!(Graph::try_from(dto), Err(Error::InvalidLink(_))));
    }

    #[test]
    fn test_duplicate_hub_neighbor_is_rejected() {
        let dto = TopologyDto {
            link_profiles: vec![profile("lan", 10.0, 1e9)],
            hubs: vec![
                HubDto { id: "A".to_string(), profile: "lan".to_string(), neighbors: vec!["B".to_string()] },
                HubDto { id: "B".to_string(), profile: "lan".to_string(), neighbors: vec!["A".to_string()] },
            ],
            ..Default::default()
        };

        assert!(matches!(Graph::try_from(dto), Err(Error::DuplicateLink(_, _))));
    }
}
