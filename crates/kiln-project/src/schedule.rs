//! Space ordering for multi-realm builds using topological sort

use crate::error::{InvalidProjectError, ProjectResult};
use crate::project::Project;
use std::collections::{HashMap, HashSet, VecDeque};

/// Dependency graph over a project's spaces.
///
/// Edges follow each space's `requires` list; a space may not start its
/// compile phase until every space it requires has finished packaging.
#[derive(Debug, Clone)]
pub struct SpaceGraph {
    requires: HashMap<String, Vec<String>>,
    order: Vec<String>,
}

impl SpaceGraph {
    /// Build the graph from a project's spaces, preserving declaration order
    pub fn of(project: &Project) -> Self {
        let mut requires = HashMap::new();
        let mut order = Vec::new();
        for space in &project.spaces {
            requires.insert(space.name.clone(), space.requires.clone());
            order.push(space.name.clone());
        }
        Self { requires, order }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check that every requires edge points at a known, different space
    pub fn validate(&self) -> ProjectResult<()> {
        for name in &self.order {
            for required in &self.requires[name] {
                if required == name {
                    return Err(InvalidProjectError::SelfRequires {
                        space: name.clone(),
                    });
                }
                if !self.requires.contains_key(required) {
                    return Err(InvalidProjectError::unknown_requires(name, required));
                }
            }
        }
        Ok(())
    }

    /// Compute a topological order using Kahn's algorithm.
    ///
    /// Spaces with equal depth keep their declaration order.
    pub fn compute_order(&self) -> ProjectResult<Vec<String>> {
        if self.order.is_empty() {
            return Ok(Vec::new());
        }

        let mut in_degree: HashMap<&str, usize> = self
            .order
            .iter()
            .map(|name| (name.as_str(), self.requires[name].len()))
            .collect();
        let mut queue: VecDeque<&str> = self
            .order
            .iter()
            .map(String::as_str)
            .filter(|name| in_degree[name] == 0)
            .collect();
        let mut result = Vec::new();

        while let Some(name) = queue.pop_front() {
            result.push(name.to_string());
            for dependent in &self.order {
                if self.requires[dependent].iter().any(|r| r == name) {
                    let degree = in_degree.get_mut(dependent.as_str()).unwrap();
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }

        if result.len() != self.order.len() {
            return Err(InvalidProjectError::CyclicRequires(self.find_cycle()));
        }
        Ok(result)
    }

    /// Group spaces into waves that may build concurrently.
    ///
    /// Every space in a group only requires spaces of earlier groups.
    pub fn parallel_groups(&self) -> ProjectResult<Vec<Vec<String>>> {
        let mut groups = Vec::new();
        let mut built: HashSet<&str> = HashSet::new();

        loop {
            let group: Vec<&str> = self
                .order
                .iter()
                .map(String::as_str)
                .filter(|name| !built.contains(name))
                .filter(|name| self.requires[*name].iter().all(|r| built.contains(r.as_str())))
                .collect();
            if group.is_empty() {
                break;
            }
            built.extend(group.iter().copied());
            groups.push(group.into_iter().map(str::to_string).collect());
        }

        if built.len() != self.order.len() {
            return Err(InvalidProjectError::CyclicRequires(self.find_cycle()));
        }
        Ok(groups)
    }

    /// Names of all spaces that transitively require `name`
    pub fn dependents_of(&self, name: &str) -> Vec<String> {
        let mut dependents = Vec::new();
        let mut frontier = vec![name.to_string()];
        while let Some(current) = frontier.pop() {
            for candidate in &self.order {
                if dependents.contains(candidate) {
                    continue;
                }
                if self.requires[candidate].iter().any(|r| *r == current) {
                    dependents.push(candidate.clone());
                    frontier.push(candidate.clone());
                }
            }
        }
        dependents
    }

    /// Find a cycle for error reporting
    fn find_cycle(&self) -> String {
        let mut visited = HashSet::new();
        let mut stack = HashSet::new();
        let mut path = Vec::new();
        for name in &self.order {
            if let Some(cycle) = self.dfs_find_cycle(name, &mut visited, &mut stack, &mut path) {
                return cycle;
            }
        }
        "unknown cycle".to_string()
    }

    fn dfs_find_cycle(
        &self,
        name: &str,
        visited: &mut HashSet<String>,
        stack: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> Option<String> {
        if stack.contains(name) {
            path.push(name.to_string());
            let start = path.iter().position(|n| n == name).unwrap_or(0);
            return Some(path[start..].join(" -> "));
        }
        if visited.contains(name) {
            return None;
        }
        visited.insert(name.to_string());
        stack.insert(name.to_string());
        path.push(name.to_string());

        if let Some(requires) = self.requires.get(name) {
            for required in requires {
                if let Some(cycle) = self.dfs_find_cycle(required, visited, stack, path) {
                    return Some(cycle);
                }
            }
        }

        stack.remove(name);
        path.pop();
        None
    }
}
