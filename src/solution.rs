//! Solution representations.
//!
//! A candidate [`Solution`] is the ordered set of routes a solver returned
//! for one trial. A [`ReferenceSolution`] is the known (near-)optimal
//! solution shipped next to an instance as a plain-text `.sol` file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A candidate solution: one route per vehicle, in order.
///
/// The cost of a candidate travels separately, as the second element of the
/// solver's return pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Solution {
    /// Routes as ordered sequences of node ids (depot excluded)
    pub routes: Vec<Vec<usize>>,
}

impl Solution {
    pub fn new(routes: Vec<Vec<usize>>) -> Self {
        Solution { routes }
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// All visited node ids, in route order.
    pub fn visited(&self) -> Vec<usize> {
        self.routes.iter().flatten().cloned().collect()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, route) in self.routes.iter().enumerate() {
            let ids: Vec<String> = route.iter().map(|n| n.to_string()).collect();
            writeln!(f, "Route #{}: {}", i + 1, ids.join(" "))?;
        }
        Ok(())
    }
}

/// The reference (near-)optimal solution for one instance.
///
/// Parsed from the line-oriented `.sol` convention:
///
/// ```text
/// Route #1: 1 5 3
/// Route #2: 2 4
/// Cost 277
/// ```
///
/// Files holding only route lines or only a cost line are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSolution {
    /// Reference routes as ordered node id sequences
    pub routes: Vec<Vec<usize>>,
    /// Reference cost; `None` when the file carries no cost line
    pub cost: Option<i64>,
}

impl ReferenceSolution {
    /// Parse a reference solution from a `.sol` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let text = fs::read_to_string(&path)
            .map_err(|e| format!("cannot open {}: {}", path.as_ref().display(), e))?;
        Self::parse(&text)
    }

    /// Parse the line-oriented reference format.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut routes = Vec::new();
        let mut cost = None;

        for line in text.lines() {
            let line = line.trim();
            if line.starts_with("Route #") {
                let route = line
                    .split_whitespace()
                    .skip(2)
                    .map(|tok| {
                        tok.parse::<usize>()
                            .map_err(|_| format!("invalid node id in route line: {}", tok))
                    })
                    .collect::<Result<Vec<usize>, String>>()?;
                routes.push(route);
            } else if line.starts_with("Cost") {
                let tok = line
                    .split_whitespace()
                    .nth(1)
                    .ok_or_else(|| "cost line without a value".to_string())?;
                cost = Some(
                    tok.parse::<i64>()
                        .map_err(|_| format!("invalid cost value: {}", tok))?,
                );
            }
        }

        Ok(ReferenceSolution { routes, cost })
    }

    /// Serialize back to the same textual convention.
    pub fn to_file_format(&self) -> String {
        let mut out = String::new();
        for (i, route) in self.routes.iter().enumerate() {
            let ids: Vec<String> = route.iter().map(|n| n.to_string()).collect();
            out.push_str(&format!("Route #{}: {}\n", i + 1, ids.join(" ")));
        }
        if let Some(cost) = self.cost {
            out.push_str(&format!("Cost {}\n", cost));
        }
        out
    }
}
