//! Attack graph construction.
//!
//! Builds the multigraph from entity records: an `Internet` root, one node
//! per populated zone, asset nodes hanging off their zones, and service
//! nodes hanging off their assets. Edge probabilities come from fixed
//! exposure tables; findings fold into per-asset vuln scores. Construction
//! is deterministic for identical input.

use std::collections::HashSet;

use rampart_core::types::{ActionRecord, AssetRecord, FindingRecord, ServiceRecord, Zone};
use tracing::debug;

use crate::error::GraphError;
use crate::model::{
    asset_node_id, service_node_id, zone_node_id, AttackGraph, EdgeKind, GraphEdge, GraphNode,
    NodeKind, INTERNET_ID,
};

/// Probability that an external attacker reaches a directly exposed zone.
const INTERNET_EXPOSURE_PROB: f64 = 0.9;

/// Zones reachable straight from the internet. `Zone:internet` is never
/// materialized as a node, so in practice only the DMZ edge appears.
const EXPOSED_ZONES: [Zone; 2] = [Zone::Dmz, Zone::Internet];

/// Probability of moving from a zone node to an asset inside it.
const ZONE_ACCESS_PROB: f64 = 0.6;

/// Static lateral-movement table: (from, to, probability). Edges are added
/// only when both zone nodes exist.
const ZONE_ADJACENCY: [(Zone, Zone, f64); 4] = [
    (Zone::Dmz, Zone::Internal, 0.4),
    (Zone::Internal, Zone::Cloud, 0.5),
    (Zone::Internal, Zone::Ot, 0.3),
    (Zone::Dmz, Zone::Cloud, 0.3),
];

/// Assets at or above this criticality are crown jewels.
const CROWN_JEWEL_CRITICALITY: i64 = 9;

/// Build the attack multigraph from entity records.
///
/// Actions are accepted for signature symmetry with the rest of the engine
/// but are not wired into edges; only the remediation planner consumes them.
/// An empty asset list is a distinct, non-fatal condition.
pub fn build_attack_graph(
    assets: &[AssetRecord],
    services: &[ServiceRecord],
    findings: &[FindingRecord],
    _actions: &[ActionRecord],
) -> Result<AttackGraph, GraphError> {
    if assets.is_empty() {
        return Err(GraphError::NoAssets);
    }

    let mut graph = AttackGraph::default();

    // Attacker entry point.
    let internet = graph.add_node(GraphNode {
        index: 0,
        id: INTERNET_ID.to_string(),
        label: INTERNET_ID.to_string(),
        kind: NodeKind::Internet,
        zone: Some(Zone::Internet),
        criticality: 0,
        crown_jewel: false,
        vuln_score: 0.0,
    });

    // One node per populated zone, in canonical order so builds on identical
    // input are bit-identical. The internet zone has no node of its own.
    let populated: HashSet<Zone> = assets.iter().map(|a| a.zone).collect();
    for zone in Zone::ALL {
        if zone == Zone::Internet || !populated.contains(&zone) {
            continue;
        }
        graph.add_node(GraphNode {
            index: 0,
            id: zone_node_id(zone),
            label: zone.as_str().to_uppercase(),
            kind: NodeKind::Zone,
            zone: Some(zone),
            criticality: 0,
            crown_jewel: false,
            vuln_score: 0.0,
        });
    }

    // Internet → directly exposed zones.
    for zone in EXPOSED_ZONES {
        if let Some(target) = graph.index_of(&zone_node_id(zone)) {
            graph.add_edge(
                internet,
                GraphEdge::new(
                    target,
                    EdgeKind::InternetExposure,
                    INTERNET_EXPOSURE_PROB,
                    "Direct internet exposure",
                ),
            );
        }
    }

    // Zone → zone lateral movement.
    for (from, to, probability) in ZONE_ADJACENCY {
        let (Some(source), Some(target)) = (
            graph.index_of(&zone_node_id(from)),
            graph.index_of(&zone_node_id(to)),
        ) else {
            continue;
        };
        graph.add_edge(
            source,
            GraphEdge::new(
                target,
                EdgeKind::LateralMovement,
                probability,
                format!("Lateral movement {from} -> {to}"),
            ),
        );
    }

    // Asset nodes, then the access edge from their zone (or from the
    // internet root for internet-zone assets).
    for asset in assets {
        let node = graph.add_node(GraphNode {
            index: 0,
            id: asset_node_id(&asset.id),
            label: asset.name.clone(),
            kind: NodeKind::Asset,
            zone: Some(asset.zone),
            criticality: asset.criticality,
            crown_jewel: asset.criticality >= CROWN_JEWEL_CRITICALITY,
            vuln_score: 0.0,
        });

        let source = if asset.zone == Zone::Internet {
            internet
        } else {
            // Always present: the zone node set is derived from the assets.
            match graph.index_of(&zone_node_id(asset.zone)) {
                Some(i) => i,
                None => continue,
            }
        };
        graph.add_edge(
            source,
            GraphEdge::new(
                node,
                EdgeKind::ZoneAccess,
                ZONE_ACCESS_PROB,
                format!("Access within {}", asset.zone),
            ),
        );
    }

    // Service nodes hang off their owning asset. Services pointing at an
    // unknown asset are skipped.
    for service in services {
        let Some(owner) = graph.index_of(&asset_node_id(&service.asset_id)) else {
            debug!(service_id = %service.id, asset_id = %service.asset_id, "Skipping service with unknown asset");
            continue;
        };

        let node = graph.add_node(GraphNode {
            index: 0,
            id: service_node_id(&service.id),
            label: service.name.clone(),
            kind: NodeKind::Service,
            zone: None,
            criticality: 0,
            crown_jewel: false,
            vuln_score: 0.0,
        });

        let base_exposure = if service.exposed { 0.9 } else { 0.5 };
        let probability = base_exposure * auth_factor(service.auth_type.as_deref());
        let port = service
            .port
            .map(|p| p.to_string())
            .unwrap_or_else(|| "?".to_string());
        graph.add_edge(
            owner,
            GraphEdge::new(
                node,
                EdgeKind::ServiceExposure,
                probability,
                format!("Service {} (port {})", service.name, port),
            ),
        );
    }

    // Findings fold into the owning asset's vuln score (max exploitability).
    for finding in findings {
        let Some(index) = graph.index_of(&asset_node_id(&finding.asset_id)) else {
            debug!(finding_id = %finding.id, asset_id = %finding.asset_id, "Skipping finding with unknown asset");
            continue;
        };
        let node = &mut graph.nodes[index];
        node.vuln_score = node.vuln_score.max(finding.exploitability);
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Attack graph built"
    );

    Ok(graph)
}

/// Authentication dampening on service exposure. Unrecognized or missing
/// auth types get a conservative 0.5.
fn auth_factor(auth_type: Option<&str>) -> f64 {
    match auth_type {
        Some("none") => 1.0,
        Some("basic") => 0.6,
        Some("mfa") => 0.2,
        Some("mtls") => 0.1,
        _ => 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::types::FindingKind;

    fn asset(id: &str, name: &str, zone: Zone, criticality: i64) -> AssetRecord {
        AssetRecord {
            id: id.to_string(),
            name: name.to_string(),
            asset_type: "server".to_string(),
            zone,
            criticality,
            tags: vec![],
        }
    }

    fn service(id: &str, asset_id: &str, name: &str, exposed: bool, auth: Option<&str>) -> ServiceRecord {
        ServiceRecord {
            id: id.to_string(),
            asset_id: asset_id.to_string(),
            name: name.to_string(),
            port: Some(443),
            protocol: Some("tcp".to_string()),
            exposed,
            auth_type: auth.map(str::to_string),
        }
    }

    fn finding(id: &str, asset_id: &str, exploitability: f64) -> FindingRecord {
        FindingRecord {
            id: id.to_string(),
            asset_id: asset_id.to_string(),
            kind: FindingKind::Vuln,
            title: "CVE-2024-0001".to_string(),
            cvss: 8.0,
            exploitability,
        }
    }

    fn edge_between<'a>(graph: &'a AttackGraph, source: &str, target: &str) -> Option<&'a GraphEdge> {
        let s = graph.index_of(source)?;
        let t = graph.index_of(target)?;
        graph.outgoing(s).iter().find(|e| e.target == t)
    }

    #[test]
    fn empty_assets_is_a_distinct_condition() {
        let result = build_attack_graph(&[], &[], &[], &[]);
        assert!(matches!(result, Err(GraphError::NoAssets)));
    }

    #[test]
    fn single_dmz_asset_with_exposed_service() {
        let assets = vec![asset("WebServer", "WebServer", Zone::Dmz, 9)];
        let services = vec![service("HTTP", "WebServer", "HTTP", true, Some("none"))];

        let graph = build_attack_graph(&assets, &services, &[], &[]).unwrap();

        assert_eq!(graph.node_count(), 4);
        for id in ["Internet", "Zone:dmz", "Asset:WebServer", "Service:HTTP"] {
            assert!(graph.node(id).is_some(), "missing node {id}");
        }

        let e = edge_between(&graph, "Internet", "Zone:dmz").unwrap();
        assert!((e.probability - 0.9).abs() < f64::EPSILON);
        assert_eq!(e.reason, "Direct internet exposure");

        let e = edge_between(&graph, "Zone:dmz", "Asset:WebServer").unwrap();
        assert!((e.probability - 0.6).abs() < f64::EPSILON);

        // exposed (0.9) x auth none (1.0)
        let e = edge_between(&graph, "Asset:WebServer", "Service:HTTP").unwrap();
        assert!((e.probability - 0.9).abs() < f64::EPSILON);

        assert!(graph.node("Asset:WebServer").unwrap().crown_jewel);
    }

    #[test]
    fn edge_cost_identity_holds_for_all_edges() {
        let assets = vec![
            asset("a1", "Web", Zone::Dmz, 5),
            asset("a2", "Db", Zone::Internal, 9),
        ];
        let services = vec![service("s1", "a1", "HTTP", true, None)];

        let graph = build_attack_graph(&assets, &services, &[], &[]).unwrap();

        for edges in &graph.adjacency {
            for e in edges {
                let expected = -(e.probability.clamp(0.01, 1.0)).ln();
                assert!((e.cost - expected).abs() < 1e-12);
                assert!(e.cost >= 0.0);
                assert!(e.cost.is_finite());
            }
        }
    }

    #[test]
    fn no_internet_zone_node_is_created() {
        let assets = vec![asset("edge-1", "EdgeProxy", Zone::Internet, 3)];
        let graph = build_attack_graph(&assets, &[], &[], &[]).unwrap();

        assert!(graph.node("Zone:internet").is_none());
        // Internet-zone assets hang directly off the root.
        let e = edge_between(&graph, "Internet", "Asset:edge-1").unwrap();
        assert!((e.probability - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn lateral_edges_require_both_zones() {
        // Only dmz populated: no lateral edges at all.
        let graph = build_attack_graph(&[asset("a1", "Web", Zone::Dmz, 5)], &[], &[], &[]).unwrap();
        assert!(edge_between(&graph, "Zone:dmz", "Zone:internal").is_none());

        // dmz + internal + cloud: dmz->internal, internal->cloud, dmz->cloud.
        let assets = vec![
            asset("a1", "Web", Zone::Dmz, 5),
            asset("a2", "App", Zone::Internal, 5),
            asset("a3", "Bucket", Zone::Cloud, 5),
        ];
        let graph = build_attack_graph(&assets, &[], &[], &[]).unwrap();

        let e = edge_between(&graph, "Zone:dmz", "Zone:internal").unwrap();
        assert!((e.probability - 0.4).abs() < f64::EPSILON);
        let e = edge_between(&graph, "Zone:internal", "Zone:cloud").unwrap();
        assert!((e.probability - 0.5).abs() < f64::EPSILON);
        let e = edge_between(&graph, "Zone:dmz", "Zone:cloud").unwrap();
        assert!((e.probability - 0.3).abs() < f64::EPSILON);
        assert!(edge_between(&graph, "Zone:internal", "Zone:ot").is_none());
    }

    #[test]
    fn auth_factors_scale_service_exposure() {
        let assets = vec![asset("a1", "Web", Zone::Dmz, 5)];
        let services = vec![
            service("s-none", "a1", "HTTP", true, Some("none")),
            service("s-basic", "a1", "FTP", true, Some("basic")),
            service("s-mfa", "a1", "VPN", true, Some("mfa")),
            service("s-mtls", "a1", "API", true, Some("mtls")),
            service("s-odd", "a1", "Legacy", true, Some("kerberos")),
            service("s-missing", "a1", "Telnet", false, None),
        ];

        let graph = build_attack_graph(&assets, &services, &[], &[]).unwrap();

        let prob = |svc: &str| edge_between(&graph, "Asset:a1", &format!("Service:{svc}")).unwrap().probability;
        assert!((prob("s-none") - 0.9).abs() < 1e-12);
        assert!((prob("s-basic") - 0.54).abs() < 1e-12);
        assert!((prob("s-mfa") - 0.18).abs() < 1e-12);
        assert!((prob("s-mtls") - 0.09).abs() < 1e-12);
        assert!((prob("s-odd") - 0.45).abs() < 1e-12);
        // not exposed (0.5) x unrecognized (0.5)
        assert!((prob("s-missing") - 0.25).abs() < 1e-12);
    }

    #[test]
    fn orphaned_services_and_findings_skipped() {
        let assets = vec![asset("a1", "Web", Zone::Dmz, 5)];
        let services = vec![service("s1", "missing", "HTTP", true, None)];
        let findings = vec![finding("f1", "missing", 0.9)];

        let graph = build_attack_graph(&assets, &services, &findings, &[]).unwrap();
        assert!(graph.node("Service:s1").is_none());
        assert!((graph.node("Asset:a1").unwrap().vuln_score - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn vuln_score_is_max_exploitability() {
        let assets = vec![asset("a1", "Web", Zone::Dmz, 5)];
        let findings = vec![
            finding("f1", "a1", 0.3),
            finding("f2", "a1", 0.8),
            finding("f3", "a1", 0.5),
        ];

        let graph = build_attack_graph(&assets, &[], &findings, &[]).unwrap();
        assert!((graph.node("Asset:a1").unwrap().vuln_score - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn crown_jewels_marked_at_criticality_nine() {
        let assets = vec![
            asset("a1", "Web", Zone::Dmz, 8),
            asset("a2", "Db", Zone::Internal, 9),
            asset("a3", "Vault", Zone::Internal, 10),
        ];

        let graph = build_attack_graph(&assets, &[], &[], &[]).unwrap();
        assert_eq!(graph.crown_jewel_ids(), vec!["Asset:a2", "Asset:a3"]);
    }

    #[test]
    fn build_is_deterministic() {
        let assets = vec![
            asset("a1", "Web", Zone::Dmz, 5),
            asset("a2", "Db", Zone::Internal, 9),
            asset("a3", "Hmi", Zone::Ot, 7),
        ];
        let services = vec![
            service("s1", "a1", "HTTP", true, Some("none")),
            service("s2", "a2", "Postgres", false, Some("basic")),
        ];
        let findings = vec![finding("f1", "a2", 0.7)];

        let first = build_attack_graph(&assets, &services, &findings, &[]).unwrap();
        let second = build_attack_graph(&assets, &services, &findings, &[]).unwrap();

        let a = serde_json::to_string(&first.to_export()).unwrap();
        let b = serde_json::to_string(&second.to_export()).unwrap();
        assert_eq!(a, b);
    }
}
