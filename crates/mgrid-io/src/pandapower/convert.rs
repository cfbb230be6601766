//! Supra grid to pandapower tables.

use std::collections::BTreeSet;

use mgrid_core::{
    find_islands, graph_stats, Conversion, GridError, GridResult, ResolvedDelivery, SupraEdge, SupraGrid,
    SupraNodeId,
};
use tracing::{debug, info, warn};

use super::net::{BusRow, ExtGridRow, LineRow, LoadRow, PandapowerNet, TrafoRow};
use crate::config::ConversionConfig;

/// Convert with the default [`ConversionConfig`].
pub fn supra2pandapower(grid: &SupraGrid) -> GridResult<PandapowerNet> {
    supra2pandapower_with(grid, &ConversionConfig::default())
}

/// Build the pandapower tables for a supra grid.
///
/// Every supra node becomes a bus with the same index. Edges carrying a
/// cable become lines, edges carrying a transformer become trafos (source
/// on the high-voltage side). Inter-nodes become external grids or loads
/// depending on their conversion element.
///
/// The net is returned only when every element converted; the first failure
/// aborts the whole conversion.
pub fn supra2pandapower_with(
    grid: &SupraGrid,
    config: &ConversionConfig,
) -> GridResult<PandapowerNet> {
    let graph = grid.graph();
    for layer in graph_stats(graph).layers {
        debug!(
            layer = %layer.layer,
            name = %layer.name,
            intra_nodes = layer.intra_nodes,
            intra_edges = layer.intra_edges,
            "converting layer"
        );
    }
    let mut net = PandapowerNet {
        name: config.name.clone(),
        f_hz: config.f_hz,
        sn_mva: config.sn_mva,
        bus: Vec::with_capacity(graph.node_count()),
        line: Vec::new(),
        trafo: Vec::new(),
        ext_grid: Vec::new(),
        load: Vec::new(),
        std_types: grid.std_types().clone(),
    };

    for node in graph.nodelist() {
        let vn_kv = grid.bus_voltage(node.id)?;
        net.bus.push(BusRow {
            index: node.id.value(),
            name: node.name.clone(),
            vn_kv: vn_kv.value(),
            bus_type: "b".to_string(),
            zone: graph.layer(node.origin.layer)?.name.clone(),
            in_service: true,
        });
    }

    let mut skipped = 0usize;
    for edge in graph.edges() {
        let Some(delivery) = grid.delivery(edge.id) else {
            if config.require_delivery {
                return Err(GridError::configuration(format!(
                    "edge {} -> {} has no delivery element",
                    edge.source_origin.node, edge.target_origin.node
                )));
            }
            warn!(
                source = %edge.source_origin,
                target = %edge.target_origin,
                kind = ?edge.kind,
                "edge without delivery element skipped"
            );
            skipped += 1;
            continue;
        };
        match delivery.resolve(grid.std_types())? {
            ResolvedDelivery::Cable {
                essential,
                line,
                std_type,
            } => net.line.push(LineRow {
                index: net.line.len(),
                name: essential.name.clone(),
                std_type: std_type.map(str::to_string),
                from_bus: edge.source.value(),
                to_bus: edge.target.value(),
                length_km: essential.length_km,
                r_ohm_per_km: line.r_ohm_per_km,
                x_ohm_per_km: line.x_ohm_per_km,
                c_nf_per_km: line.c_nf_per_km,
                g_us_per_km: 0.0,
                max_i_ka: line.max_i_ka,
                df: 1.0,
                parallel: essential.parallel,
                line_type: "cs".to_string(),
                in_service: true,
            }),
            ResolvedDelivery::Transformer {
                essential,
                trafo,
                std_type,
            } => {
                check_transformer_sides(grid, edge, trafo.vn_hv_kv, trafo.vn_lv_kv)?;
                net.trafo.push(TrafoRow {
                    index: net.trafo.len(),
                    name: essential.name.clone(),
                    std_type: std_type.map(str::to_string),
                    hv_bus: edge.source.value(),
                    lv_bus: edge.target.value(),
                    sn_mva: trafo.sn_mva,
                    vn_hv_kv: trafo.vn_hv_kv,
                    vn_lv_kv: trafo.vn_lv_kv,
                    vk_percent: trafo.vk_percent,
                    vkr_percent: trafo.vkr_percent,
                    pfe_kw: trafo.pfe_kw,
                    i0_percent: trafo.i0_percent,
                    shift_degree: trafo.shift_degree,
                    parallel: essential.parallel,
                    df: 1.0,
                    in_service: true,
                });
            }
        }
    }

    for node in graph.inter_nodes() {
        let conversion = grid.conversion(node.id).ok_or_else(|| {
            GridError::configuration(format!(
                "inter-node '{}' has no conversion element",
                node.name
            ))
        })?;
        match conversion {
            Conversion::ExternalGrid(ext) => net.ext_grid.push(ExtGridRow {
                index: net.ext_grid.len(),
                name: ext.name.clone(),
                bus: node.id.value(),
                vm_pu: ext.vm_pu.value(),
                va_degree: ext.va_degree.value(),
                in_service: true,
            }),
            Conversion::Ejection(load) => {
                let q = load.reactive_power(config.q_tolerance_mvar)?;
                net.load.push(LoadRow {
                    index: net.load.len(),
                    name: load.name.clone(),
                    bus: node.id.value(),
                    p_mw: load.p_mw.value(),
                    q_mvar: q.value(),
                    scaling: 1.0,
                    in_service: true,
                });
            }
        }
    }

    warn_unsupplied_islands(grid, &net);

    info!(
        buses = net.bus.len(),
        lines = net.line.len(),
        trafos = net.trafo.len(),
        ext_grids = net.ext_grid.len(),
        loads = net.load.len(),
        skipped_edges = skipped,
        "converted supra grid to pandapower"
    );
    Ok(net)
}

/// Transformer rated voltages must not be swapped against the buses they
/// connect.
fn check_transformer_sides(
    grid: &SupraGrid,
    edge: &SupraEdge,
    vn_hv_kv: f64,
    vn_lv_kv: f64,
) -> GridResult<()> {
    if vn_hv_kv < vn_lv_kv {
        return Err(GridError::validation(format!(
            "transformer on {} -> {} has vn_hv_kv {vn_hv_kv} below vn_lv_kv {vn_lv_kv}",
            edge.source_origin, edge.target_origin
        )));
    }
    let hv = grid.bus_voltage(edge.source)?.value();
    let lv = grid.bus_voltage(edge.target)?.value();
    if hv < lv {
        warn!(
            source = %edge.source_origin,
            target = %edge.target_origin,
            hv_bus_kv = hv,
            lv_bus_kv = lv,
            "transformer high-voltage side sits on the lower-voltage bus"
        );
    }
    Ok(())
}

/// Warn about islands that no external grid supplies.
fn warn_unsupplied_islands(grid: &SupraGrid, net: &PandapowerNet) {
    let analysis = find_islands(grid.graph());
    let supplied: BTreeSet<usize> = net
        .ext_grid
        .iter()
        .filter_map(|ext| analysis.island_of(SupraNodeId::new(ext.bus)))
        .collect();
    for island in &analysis.islands {
        if !supplied.contains(&island.island_id) {
            warn!(
                island = island.island_id,
                buses = island.node_count,
                "island without external grid"
            );
        }
    }
}
