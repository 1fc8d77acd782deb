//! Quantitative metrics for the collective state of a run.
//!
//! Computes from the simulation's current state:
//! - Order: how aligned the population's headings are
//! - Flocks: connected groups of agents under the neighbour relation
//! - Phase distribution across the population
//! - Field load: total and peak concentration

use crate::simulation::Simulation;
use petgraph::algo::kosaraju_scc;
use petgraph::graph::UnGraph;
use serde::Serialize;
use swarmfield_core::neighborhood::Kinematic;
use swarmfield_core::phase::Phase;
use swarmfield_core::types::Vec2;

/// Flock structure under the neighbour relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlockMetrics {
    /// Number of connected groups, isolated agents included.
    pub flock_count: usize,
    /// Size of the largest group.
    pub largest_flock: usize,
    /// Proximity edges (unordered agent pairs within the radius).
    pub edge_count: usize,
    /// Mean number of neighbours per agent.
    pub mean_neighbors: f64,
}

/// All swarm metrics combined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwarmMetrics {
    pub tick: u64,
    /// `|Σv| / Σ|v|`, 1 for a perfectly aligned population, 0 if nobody moves.
    pub order_parameter: f64,
    pub flocks: FlockMetrics,
    /// Fraction of agents per phase, indexed like `Phase::ALL`.
    pub phase_fractions: [f64; 3],
    pub field_mass: f64,
    pub peak_chemical: f64,
}

/// Compute all metrics from the simulation's current state.
pub fn compute(sim: &Simulation) -> SwarmMetrics {
    let swarm = sim.swarm();
    let stats = sim.stats();
    let n = swarm.len();

    let mut sum = Vec2::ZERO;
    let mut total_speed = 0.0;
    for agent in swarm.agents() {
        sum += agent.velocity();
        total_speed += agent.speed();
    }
    let order_parameter = if total_speed > 0.0 { sum.length() / total_speed } else { 0.0 };

    let phase_fractions = Phase::ALL.map(|p| stats.phases.get(p) as f64 / n as f64);

    SwarmMetrics {
        tick: stats.tick,
        order_parameter,
        flocks: compute_flocks(sim),
        phase_fractions,
        field_mass: stats.field_mass,
        peak_chemical: stats.peak_chemical,
    }
}

fn compute_flocks(sim: &Simulation) -> FlockMetrics {
    let swarm = sim.swarm();
    let n = swarm.len();

    let mut graph = UnGraph::<usize, ()>::with_capacity(n, n * 4);
    let nodes: Vec<_> = (0..n).map(|i| graph.add_node(i)).collect();
    let mut degree_sum = 0usize;

    for i in 0..n {
        let hood = swarm.neighborhood(i);
        degree_sum += hood.count();
        for &j in &hood.neighbors {
            if j > i {
                graph.add_edge(nodes[i], nodes[j], ());
            }
        }
    }

    // On an undirected graph the strongly connected components are the flocks.
    let flocks = kosaraju_scc(&graph);

    FlockMetrics {
        flock_count: flocks.len(),
        largest_flock: flocks.iter().map(Vec::len).max().unwrap_or(0),
        edge_count: graph.edge_count(),
        mean_neighbors: if n == 0 { 0.0 } else { degree_sum as f64 / n as f64 },
    }
}

/// Print a human-readable metrics report.
pub fn print_report(metrics: &SwarmMetrics) {
    println!("── Swarm Metrics (tick {}) ──", metrics.tick);
    println!("  Order parameter:  {:.3}", metrics.order_parameter);
    println!(
        "  Flocks:           {} (largest {}, {} edges)",
        metrics.flocks.flock_count, metrics.flocks.largest_flock, metrics.flocks.edge_count
    );
    println!("  Mean neighbours:  {:.2}", metrics.flocks.mean_neighbors);
    for (phase, fraction) in Phase::ALL.iter().zip(metrics.phase_fractions) {
        println!("  {:<17} {:.1}%", format!("{}:", phase), fraction * 100.0);
    }
    println!(
        "  Field mass:       {:.3} (peak {:.3})",
        metrics.field_mass, metrics.peak_chemical
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NeighborVisibility, SimulationConfig};
    use crate::swarm::Swarm;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use swarmfield_agents::flocker::Flocker;
    use swarmfield_core::types::*;

    fn sim_with(agents: Vec<Flocker>) -> Simulation {
        let config = SimulationConfig::new(400.0, 400.0, agents.len()).with_seed(0);
        let swarm = Swarm::new(
            agents,
            config.bounds(),
            &config.flocking,
            NeighborVisibility::Live,
        )
        .unwrap();
        Simulation::from_parts(config, swarm, StdRng::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn separate_groups_are_separate_flocks() {
        let bounds = Bounds::new(400.0, 400.0);
        let mut agents = Vec::new();
        for i in 0..4 {
            let p = Position::new(50.0 + 10.0 * i as f64, 50.0);
            agents.push(Flocker::with_seed(p, Vec2::new(1.0, 0.0), bounds, i));
        }
        for i in 0..2 {
            let p = Position::new(300.0, 300.0 + 10.0 * i as f64);
            agents.push(Flocker::with_seed(p, Vec2::new(-1.0, 0.0), bounds, 10 + i));
        }
        agents.push(Flocker::with_seed(Position::new(200.0, 200.0), Vec2::ZERO, bounds, 20));

        let metrics = compute(&sim_with(agents));
        assert_eq!(metrics.flocks.flock_count, 3);
        assert_eq!(metrics.flocks.largest_flock, 4);
        // 6 pairs in the line of four, 1 in the pair.
        assert_eq!(metrics.flocks.edge_count, 7);
        assert!((metrics.flocks.mean_neighbors - 14.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn chained_neighbours_form_one_flock() {
        let bounds = Bounds::new(400.0, 400.0);
        // 0 and 2 are out of range of each other but share neighbour 1.
        let agents = (0..3)
            .map(|i| Flocker::with_seed(Position::new(100.0 + 40.0 * i as f64, 100.0), Vec2::ZERO, bounds, i))
            .collect();
        let metrics = compute(&sim_with(agents));
        assert_eq!(metrics.flocks.flock_count, 1);
        assert_eq!(metrics.flocks.largest_flock, 3);
        assert_eq!(metrics.flocks.edge_count, 2);
    }

    #[test]
    fn metrics_follow_agents_moved_between_ticks() {
        let bounds = Bounds::new(400.0, 400.0);
        let agents = vec![
            Flocker::with_seed(Position::new(10.0, 10.0), Vec2::ZERO, bounds, 0),
            Flocker::with_seed(Position::new(300.0, 300.0), Vec2::ZERO, bounds, 1),
        ];
        let mut sim = sim_with(agents);
        assert_eq!(compute(&sim).flocks.flock_count, 2);

        sim.swarm_mut().agents_mut()[1].set_position(Position::new(30.0, 10.0));
        let metrics = compute(&sim);
        assert_eq!(metrics.flocks.flock_count, 1);
        assert_eq!(metrics.flocks.mean_neighbors, 1.0);
    }

    #[test]
    fn order_parameter_tracks_alignment() {
        let bounds = Bounds::new(400.0, 400.0);
        let aligned: Vec<Flocker> = (0..3)
            .map(|i| Flocker::with_seed(Position::new(100.0 * i as f64, 10.0), Vec2::new(0.0, 1.5), bounds, i))
            .collect();
        assert!((compute(&sim_with(aligned)).order_parameter - 1.0).abs() < 1e-12);

        let opposed = vec![
            Flocker::with_seed(Position::new(10.0, 10.0), Vec2::new(1.0, 0.0), bounds, 0),
            Flocker::with_seed(Position::new(200.0, 10.0), Vec2::new(-1.0, 0.0), bounds, 1),
        ];
        assert!(compute(&sim_with(opposed)).order_parameter.abs() < 1e-12);

        let still = vec![Flocker::with_seed(Position::new(10.0, 10.0), Vec2::ZERO, bounds, 0)];
        assert_eq!(compute(&sim_with(still)).order_parameter, 0.0);
    }

    #[test]
    fn phase_fractions_sum_to_one() {
        let mut sim = Simulation::new(SimulationConfig::new(300.0, 300.0, 60).with_seed(8)).unwrap();
        sim.run(10);
        let metrics = compute(&sim);
        let total: f64 = metrics.phase_fractions.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(metrics.tick, 10);
        print_report(&metrics);
    }
}
