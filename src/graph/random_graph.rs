use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::math::triplet::Triplet;

/// How hard the generator works to join islands after the random pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Add one edge each way between every pair of islands found by the
    /// outgoing-edge walk. Edge count grows with the square of the island count.
    #[default]
    BestEffort,
    /// Best-effort pass, then check weak connectivity with union-find and
    /// chain any component left over onto the first one.
    Strict,
}

/// Parameters for [`RandomGraph::generate`].
///
/// The vertex count is drawn from `[min_verts, max_verts)`; when the two are
/// equal exactly `min_verts` vertices are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphParams {
    pub min_verts: usize,
    pub max_verts: usize,
    pub edge_probability: f64,
    pub min_edge_weight: f64,
    pub max_edge_weight: f64,
    #[serde(default)]
    pub connectivity: Connectivity,
}

impl GraphParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_verts < self.min_verts {
            return Err(ConfigError::VertexRange { min: self.min_verts, max: self.max_verts });
        }
        if self.min_verts == 0 {
            return Err(ConfigError::EmptyGraph);
        }
        if !(0.0..=1.0).contains(&self.edge_probability) {
            return Err(ConfigError::EdgeProbability(self.edge_probability));
        }
        if !self.min_edge_weight.is_finite()
            || !self.max_edge_weight.is_finite()
            || self.max_edge_weight < self.min_edge_weight
        {
            return Err(ConfigError::EdgeWeightRange {
                min: self.min_edge_weight,
                max: self.max_edge_weight,
            });
        }
        Ok(())
    }
}

/// Random directed graph used as a synapse topology.
///
/// Generated once by [`RandomGraph::generate`] and read-only afterwards;
/// consumers take its edges through [`RandomGraph::edges`].
#[derive(Debug, Clone)]
pub struct RandomGraph {
    params: GraphParams,
    num_verts: usize,
    adjacencies: Vec<Vec<(usize, f64)>>,
}

impl RandomGraph {
    /// Draws a vertex count, adds each ordered non-self pair as an edge with
    /// probability `edge_probability`, then repairs connectivity according to
    /// `params.connectivity`.
    pub fn generate<R: Rng + ?Sized>(params: GraphParams, rng: &mut R) -> Result<RandomGraph, ConfigError> {
        params.validate()?;

        let num_verts = if params.max_verts > params.min_verts {
            rng.gen_range(params.min_verts..params.max_verts)
        } else {
            params.min_verts
        };

        let mut graph = RandomGraph {
            params,
            num_verts,
            adjacencies: vec![Vec::new(); num_verts],
        };

        for i in 0..num_verts {
            for j in 0..num_verts {
                if i != j && rng.gen_bool(graph.params.edge_probability) {
                    let weight = graph.random_weight(rng);
                    graph.adjacencies[i].push((j, weight));
                }
            }
        }

        let islands = graph.islands();
        debug!(
            verts = num_verts,
            edges = graph.num_edges(),
            islands = islands.len(),
            "generated random graph"
        );

        if islands.len() > 1 {
            graph.connect_islands(&islands, rng);
        }
        if graph.params.connectivity == Connectivity::Strict {
            graph.connect_components(rng);
        }

        Ok(graph)
    }

    pub fn params(&self) -> &GraphParams {
        &self.params
    }

    pub fn num_verts(&self) -> usize {
        self.num_verts
    }

    pub fn num_edges(&self) -> usize {
        self.adjacencies.iter().map(Vec::len).sum()
    }

    /// Outgoing `(target, weight)` lists, indexed by source vertex.
    pub fn adjacencies(&self) -> &[Vec<(usize, f64)>] {
        &self.adjacencies
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.adjacencies[from].iter().any(|&(t, _)| t == to)
    }

    /// Every edge as a `(source, target, weight)` triplet.
    pub fn edges(&self) -> Vec<Triplet<f64>> {
        self.adjacencies
            .iter()
            .enumerate()
            .flat_map(|(from, out)| out.iter().map(move |&(to, w)| Triplet::new(from, to, w)))
            .collect()
    }

    /// Groups vertices by a depth-first walk over outgoing edges.
    ///
    /// Each unvisited vertex seeds a new island holding everything reachable
    /// from it through not-yet-visited vertices. This approximates weak
    /// connectivity: a vertex that only points *into* an earlier island
    /// still becomes its own island.
    pub fn islands(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.num_verts];
        let mut islands = Vec::new();
        let mut stack = Vec::new();

        for seed in 0..self.num_verts {
            if visited[seed] {
                continue;
            }
            visited[seed] = true;
            let mut island = vec![seed];
            stack.push(seed);

            while let Some(v) = stack.pop() {
                for &(t, _) in &self.adjacencies[v] {
                    if !visited[t] {
                        visited[t] = true;
                        island.push(t);
                        stack.push(t);
                    }
                }
            }
            islands.push(island);
        }

        islands
    }

    /// Number of components when edge direction is ignored.
    pub fn weak_component_count(&self) -> usize {
        let uf = self.weak_components();
        (0..self.num_verts).filter(|&v| uf.find_const(v) == v).count()
    }

    fn random_weight<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.params.min_edge_weight..=self.params.max_edge_weight)
    }

    /// Adds one random edge each way between every pair of islands.
    fn connect_islands<R: Rng + ?Sized>(&mut self, islands: &[Vec<usize>], rng: &mut R) {
        for i in 0..islands.len() {
            for j in (i + 1)..islands.len() {
                let (a, b) = (&islands[i], &islands[j]);
                // Islands are never empty; each holds at least its seed.
                if let (Some(&from), Some(&to)) = (a.choose(rng), b.choose(rng)) {
                    let w = self.random_weight(rng);
                    self.adjacencies[from].push((to, w));
                }
                if let (Some(&from), Some(&to)) = (b.choose(rng), a.choose(rng)) {
                    let w = self.random_weight(rng);
                    self.adjacencies[from].push((to, w));
                }
            }
        }
        debug!(islands = islands.len(), edges = self.num_edges(), "joined islands");
    }

    /// Chains every weakly-connected component onto the one holding vertex 0.
    fn connect_components<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut uf = self.weak_components();
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); self.num_verts];
        for v in 0..self.num_verts {
            members[uf.find(v)].push(v);
        }
        let mut components = members.into_iter().filter(|m| !m.is_empty());
        let Some(anchor) = components.next() else {
            return;
        };

        let mut joined = 0;
        for component in components {
            if let (Some(&a), Some(&b)) = (anchor.choose(rng), component.choose(rng)) {
                let w = self.random_weight(rng);
                self.adjacencies[a].push((b, w));
                let w = self.random_weight(rng);
                self.adjacencies[b].push((a, w));
                joined += 1;
            }
        }
        if joined > 0 {
            debug!(components = joined + 1, "chained weak components");
        }
    }

    fn weak_components(&self) -> UnionFind {
        let mut uf = UnionFind::new(self.num_verts);
        for (from, out) in self.adjacencies.iter().enumerate() {
            for &(to, _) in out {
                uf.union(from, to);
            }
        }
        uf
    }
}

/// Disjoint-set forest with path halving and union by size.
struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> UnionFind {
        UnionFind { parent: (0..n).collect(), size: vec![1; n] }
    }

    fn find(&mut self, mut v: usize) -> usize {
        while self.parent[v] != v {
            self.parent[v] = self.parent[self.parent[v]];
            v = self.parent[v];
        }
        v
    }

    fn find_const(&self, mut v: usize) -> usize {
        while self.parent[v] != v {
            v = self.parent[v];
        }
        v
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(min: usize, max: usize, p: f64) -> GraphParams {
        GraphParams {
            min_verts: min,
            max_verts: max,
            edge_probability: p,
            min_edge_weight: 1.0,
            max_edge_weight: 2.0,
            connectivity: Connectivity::BestEffort,
        }
    }

    #[test]
    fn zero_probability_yields_singleton_islands_before_repair() {
        let mut rng = StdRng::seed_from_u64(1);
        let g = RandomGraph {
            params: params(4, 4, 0.0),
            num_verts: 4,
            adjacencies: vec![Vec::new(); 4],
        };
        assert_eq!(g.islands().len(), 4);

        let repaired = RandomGraph::generate(params(4, 4, 0.0), &mut rng).unwrap();
        // Six island pairs, one edge each way.
        assert_eq!(repaired.num_edges(), 12);
    }

    #[test]
    fn walk_follows_outgoing_edges_only() {
        // 1 -> 0: walking from 0 cannot reach 1, so 1 seeds its own island.
        let g = RandomGraph {
            params: params(2, 2, 0.0),
            num_verts: 2,
            adjacencies: vec![Vec::new(), vec![(0, 1.0)]],
        };
        assert_eq!(g.islands(), vec![vec![0], vec![1]]);
        assert_eq!(g.weak_component_count(), 1);
    }

    #[test]
    fn union_find_merges_transitively() {
        let mut uf = UnionFind::new(5);
        uf.union(0, 1);
        uf.union(3, 4);
        uf.union(1, 4);
        assert_eq!(uf.find(0), uf.find(3));
        assert_ne!(uf.find(2), uf.find(0));
    }
}
