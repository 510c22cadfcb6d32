//! Parsing and representation of CVRP problem instances.
//!
//! Handles TSPLIB-style `.vrp` files: node coordinates, per-node demands
//! and the vehicle capacity. Distances are Euclidean 2D.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A node of a CVRP instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier (1-indexed in files, 0-indexed internally; 0 is the depot)
    pub id: usize,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Demand of the node (0 for the depot)
    pub demand: i32,
}

impl Node {
    pub fn new(id: usize, x: f64, y: f64, demand: i32) -> Self {
        Node { id, x, y, demand }
    }

    pub fn is_depot(&self) -> bool {
        self.id == 0
    }
}

/// A complete CVRP instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VrpInstance {
    /// Name of the instance
    pub name: String,
    /// Comment/description
    pub comment: String,
    /// Number of nodes (including depot)
    pub dimension: usize,
    /// Vehicle capacity
    pub capacity: i32,
    /// All nodes, depot first
    pub nodes: Vec<Node>,
    /// Precomputed distance matrix
    #[serde(skip)]
    pub distance_matrix: Vec<Vec<f64>>,
}

impl VrpInstance {
    /// Parse an instance from a TSPLIB-style `.vrp` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = File::open(&path)
            .map_err(|e| format!("cannot open {}: {}", path.as_ref().display(), e))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse an instance from any buffered reader.
    ///
    /// Accepts both `KEY: value` and `KEY : value` header forms. Unknown
    /// headers and the DEPOT_SECTION entries are ignored.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, String> {
        let mut name = String::new();
        let mut comment = String::new();
        let mut dimension = 0usize;
        let mut capacity = 0i32;
        let mut coords: Vec<(usize, f64, f64)> = Vec::new();
        let mut demands: Vec<(usize, i32)> = Vec::new();

        let mut section = Section::Header;

        for line in reader.lines() {
            let line = line.map_err(|e| format!("read error: {}", e))?;
            let line = line.trim();

            if line.is_empty() || line == "EOF" {
                continue;
            }

            match line {
                "NODE_COORD_SECTION" => {
                    section = Section::Coords;
                    continue;
                }
                "DEMAND_SECTION" => {
                    section = Section::Demands;
                    continue;
                }
                "DEPOT_SECTION" => {
                    section = Section::Depot;
                    continue;
                }
                _ => {}
            }

            if let Some((key, value)) = line.split_once(':') {
                let value = value.trim();
                match key.trim() {
                    "NAME" => name = value.to_string(),
                    "COMMENT" => comment = value.to_string(),
                    "DIMENSION" => {
                        dimension = value
                            .parse()
                            .map_err(|_| format!("invalid dimension: {}", value))?;
                    }
                    "CAPACITY" => {
                        capacity = value
                            .parse()
                            .map_err(|_| format!("invalid capacity: {}", value))?;
                    }
                    // TYPE, EDGE_WEIGHT_TYPE, ...
                    _ => {}
                }
                continue;
            }

            match section {
                Section::Coords => {
                    let parts: Vec<&str> = line.split_whitespace().collect();
                    if parts.len() >= 3 {
                        let id: usize =
                            parts[0].parse().map_err(|_| "invalid node id".to_string())?;
                        let x: f64 = parts[1]
                            .parse()
                            .map_err(|_| "invalid x coordinate".to_string())?;
                        let y: f64 = parts[2]
                            .parse()
                            .map_err(|_| "invalid y coordinate".to_string())?;
                        coords.push((id, x, y));
                    }
                }
                Section::Demands => {
                    let parts: Vec<&str> = line.split_whitespace().collect();
                    if parts.len() >= 2 {
                        let id: usize =
                            parts[0].parse().map_err(|_| "invalid node id".to_string())?;
                        let demand: i32 =
                            parts[1].parse().map_err(|_| "invalid demand".to_string())?;
                        demands.push((id, demand));
                    }
                }
                Section::Depot | Section::Header => {}
            }
        }

        if coords.is_empty() {
            return Err("no node coordinates found".to_string());
        }
        if dimension == 0 {
            dimension = coords.len();
        }
        if coords.len() != dimension {
            return Err(format!(
                "dimension is {} but {} coordinates found",
                dimension,
                coords.len()
            ));
        }

        let mut nodes = Vec::with_capacity(dimension);
        for (id, x, y) in &coords {
            let demand = demands
                .iter()
                .find(|(did, _)| did == id)
                .map(|(_, d)| *d)
                .unwrap_or(0);
            nodes.push(Node::new(id - 1, *x, *y, demand));
        }

        let distance_matrix = Self::compute_distance_matrix(&nodes);

        Ok(VrpInstance {
            name,
            comment,
            dimension,
            capacity,
            nodes,
            distance_matrix,
        })
    }

    /// Compute the symmetric Euclidean distance matrix.
    fn compute_distance_matrix(nodes: &[Node]) -> Vec<Vec<f64>> {
        let n = nodes.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in i + 1..n {
                let dx = nodes[i].x - nodes[j].x;
                let dy = nodes[i].y - nodes[j].y;
                let d = (dx * dx + dy * dy).sqrt();
                matrix[i][j] = d;
                matrix[j][i] = d;
            }
        }

        matrix
    }

    /// Distance between two nodes.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance_matrix[i][j]
    }

    /// Number of customer nodes (excluding depot).
    pub fn num_customers(&self) -> usize {
        self.dimension.saturating_sub(1)
    }

    /// Total customer demand.
    pub fn total_demand(&self) -> i32 {
        self.nodes.iter().filter(|n| !n.is_depot()).map(|n| n.demand).sum()
    }

    /// Cost of a single route: depot -> nodes in order -> depot.
    pub fn route_cost(&self, route: &[usize]) -> f64 {
        if route.is_empty() {
            return 0.0;
        }

        let mut cost = self.distance(0, route[0]);
        for w in route.windows(2) {
            cost += self.distance(w[0], w[1]);
        }
        cost += self.distance(route[route.len() - 1], 0);

        cost
    }

    /// Summary statistics about the instance.
    pub fn statistics(&self) -> InstanceStatistics {
        let total_demand = self.total_demand();
        let min_vehicles = if self.capacity > 0 {
            ((total_demand + self.capacity - 1) / self.capacity).max(1) as usize
        } else {
            0
        };

        let mut distances: Vec<f64> = Vec::new();
        for i in 0..self.dimension {
            for j in i + 1..self.dimension {
                distances.push(self.distance(i, j));
            }
        }
        let avg_distance = if distances.is_empty() {
            0.0
        } else {
            distances.iter().sum::<f64>() / distances.len() as f64
        };
        let max_distance = distances.iter().cloned().fold(0.0, f64::max);

        InstanceStatistics {
            name: self.name.clone(),
            dimension: self.dimension,
            capacity: self.capacity,
            num_customers: self.num_customers(),
            total_demand,
            min_vehicles,
            avg_distance,
            max_distance,
        }
    }
}

enum Section {
    Header,
    Coords,
    Demands,
    Depot,
}

/// Summary statistics about a CVRP instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub capacity: i32,
    pub num_customers: usize,
    pub total_demand: i32,
    pub min_vehicles: usize,
    pub avg_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Nodes: {} (1 depot + {} customers)", self.dimension, self.num_customers)?;
        writeln!(f, "  Capacity: {}", self.capacity)?;
        writeln!(f, "  Total demand: {}", self.total_demand)?;
        writeln!(f, "  Vehicles needed (lower bound): {}", self.min_vehicles)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
NAME : toy-n4-k1
COMMENT : four nodes, one truck
TYPE : CVRP
DIMENSION : 4
EDGE_WEIGHT_TYPE : EUC_2D
CAPACITY : 10
NODE_COORD_SECTION
1 0 0
2 3 4
3 0 5
4 6 8
DEMAND_SECTION
1 0
2 4
3 3
4 5
DEPOT_SECTION
1
-1
EOF
";

    #[test]
    fn test_parse_sample() {
        let instance = VrpInstance::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(instance.name, "toy-n4-k1");
        assert_eq!(instance.dimension, 4);
        assert_eq!(instance.capacity, 10);
        assert_eq!(instance.nodes.len(), 4);
        assert_eq!(instance.nodes[0].id, 0);
        assert_eq!(instance.nodes[0].demand, 0);
        assert_eq!(instance.nodes[1].demand, 4);
        assert_eq!(instance.total_demand(), 12);
    }

    #[test]
    fn test_distance_matrix() {
        let instance = VrpInstance::from_reader(SAMPLE.as_bytes()).unwrap();
        assert!((instance.distance(0, 1) - 5.0).abs() < 1e-10);
        assert!((instance.distance(1, 0) - 5.0).abs() < 1e-10);
        assert_eq!(instance.distance(2, 2), 0.0);
    }

    #[test]
    fn test_route_cost() {
        let instance = VrpInstance::from_reader(SAMPLE.as_bytes()).unwrap();
        // 0 -> 1 -> 0 is 5 out and 5 back
        assert!((instance.route_cost(&[1]) - 10.0).abs() < 1e-10);
        assert_eq!(instance.route_cost(&[]), 0.0);
    }

    #[test]
    fn test_malformed_header() {
        let bad = "DIMENSION : not-a-number\n";
        assert!(VrpInstance::from_reader(bad.as_bytes()).is_err());
    }

    #[test]
    fn test_statistics() {
        let instance = VrpInstance::from_reader(SAMPLE.as_bytes()).unwrap();
        let stats = instance.statistics();
        assert_eq!(stats.num_customers, 3);
        assert_eq!(stats.min_vehicles, 2); // demand 12 over capacity 10
    }
}
