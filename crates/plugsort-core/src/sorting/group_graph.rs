use std::collections::{HashMap, HashSet, VecDeque};

use crate::kernel::constants::DEFAULT_GROUP;
use crate::metadata::Group;
use crate::sorting::error::SortingError;
use crate::sorting::vertex::{EdgeType, Vertex};

/// Directed graph over group names.
///
/// Edges point in load order: an edge from B to A means A lists B in its
/// after set, so B's plugins load first. The `default` group is always a node.
#[derive(Debug, Clone, Default)]
pub struct GroupGraph {
    names: Vec<String>,
    index: HashMap<String, usize>,
    /// Node -> (node that loads after it, edge type)
    before: Vec<Vec<(usize, EdgeType)>>,
    /// Node -> (node it loads after, edge type)
    after: Vec<Vec<(usize, EdgeType)>>,
}

impl GroupGraph {
    /// Builds the graph from masterlist and userlist groups.
    ///
    /// A group declared in both lists is a single node whose after-edges come
    /// from both declarations. Duplicate edges collapse into the first one
    /// added, so masterlist provenance wins. An after-entry naming a group
    /// declared in neither list is an error.
    pub fn build(masterlist_groups: &[Group], user_groups: &[Group]) -> Result<Self, SortingError> {
        let mut graph = GroupGraph::default();
        graph.add_node(DEFAULT_GROUP);
        for group in masterlist_groups.iter().chain(user_groups) {
            graph.add_node(&group.name);
        }

        let sources = masterlist_groups
            .iter()
            .map(|g| (g, EdgeType::MasterlistGroupAfter))
            .chain(user_groups.iter().map(|g| (g, EdgeType::UserGroupAfter)));

        for (group, edge_type) in sources {
            let Some(&to) = graph.index.get(&group.name) else {
                continue;
            };
            for after_name in &group.after_groups {
                let from = *graph
                    .index
                    .get(after_name)
                    .ok_or_else(|| SortingError::UndefinedGroup(after_name.clone()))?;
                graph.add_edge(from, to, edge_type);
            }
        }

        log::debug!(
            "Built group graph with {} groups and {} edges",
            graph.names.len(),
            graph.before.iter().map(Vec::len).sum::<usize>()
        );

        Ok(graph)
    }

    fn add_node(&mut self, name: &str) {
        if !self.index.contains_key(name) {
            self.index.insert(name.to_string(), self.names.len());
            self.names.push(name.to_string());
            self.before.push(Vec::new());
            self.after.push(Vec::new());
        }
    }

    fn add_edge(&mut self, from: usize, to: usize, edge_type: EdgeType) {
        if self.before[from].iter().any(|&(n, _)| n == to) {
            return;
        }
        self.before[from].push((to, edge_type));
        self.after[to].push((from, edge_type));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Group names in the order they were first declared, `default` first.
    pub fn group_names(&self) -> &[String] {
        &self.names
    }

    /// Groups that `name` directly loads after.
    pub fn after_groups(&self, name: &str) -> Vec<&str> {
        self.index
            .get(name)
            .map(|&i| self.after[i].iter().map(|&(n, _)| self.names[n].as_str()).collect())
            .unwrap_or_default()
    }

    /// Every group that loads after `name`, directly or transitively.
    pub fn groups_loading_after(&self, name: &str) -> Vec<&str> {
        let Some(&start) = self.index.get(name) else {
            return Vec::new();
        };
        self.descendants(start)
            .into_iter()
            .map(|i| self.names[i].as_str())
            .collect()
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Nodes reachable from `start` along load-order edges, in BFS order.
    pub(crate) fn descendants(&self, start: usize) -> Vec<usize> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut found = Vec::new();
        while let Some(node) = queue.pop_front() {
            for &(next, _) in &self.before[node] {
                if seen.insert(next) {
                    found.push(next);
                    queue.push_back(next);
                }
            }
        }
        found
    }

    fn edge_type(&self, from: usize, to: usize) -> Option<EdgeType> {
        self.before[from]
            .iter()
            .find(|&&(n, _)| n == to)
            .map(|&(_, edge_type)| edge_type)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Fails with the first cycle found, listed in load order.
pub fn check_for_cycles(graph: &GroupGraph) -> Result<(), SortingError> {
    let mut marks = vec![Mark::Unvisited; graph.node_count()];
    let mut stack = Vec::new();

    for node in 0..graph.node_count() {
        if marks[node] == Mark::Unvisited {
            if let Some(cycle) = visit(graph, node, &mut marks, &mut stack) {
                return Err(SortingError::Cycle(cycle));
            }
        }
    }
    Ok(())
}

fn visit(graph: &GroupGraph, node: usize, marks: &mut [Mark], stack: &mut Vec<usize>) -> Option<Vec<Vertex>> {
    marks[node] = Mark::InProgress;
    stack.push(node);

    for &(next, _) in &graph.before[node] {
        match marks[next] {
            Mark::Unvisited => {
                if let Some(cycle) = visit(graph, next, marks, stack) {
                    return Some(cycle);
                }
            }
            Mark::InProgress => {
                let start = stack.iter().position(|&n| n == next)?;
                let members = &stack[start..];
                let cycle = members
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &member)| {
                        let following = members.get(i + 1).copied().unwrap_or(next);
                        graph
                            .edge_type(member, following)
                            .map(|edge_type| Vertex::with_edge(&graph.names[member], edge_type))
                    })
                    .collect();
                return Some(cycle);
            }
            Mark::Done => {}
        }
    }

    stack.pop();
    marks[node] = Mark::Done;
    None
}

/// Shortest path from `from` to `to` in load order: each step goes from a
/// group to a group listing it in its after set.
///
/// The last vertex has no edge type. An empty vector means `to` is not
/// reachable; an unknown name is an error.
pub fn groups_path(graph: &GroupGraph, from: &str, to: &str) -> Result<Vec<Vertex>, SortingError> {
    let start = graph
        .index_of(from)
        .ok_or_else(|| SortingError::UndefinedGroup(from.to_string()))?;
    let goal = graph
        .index_of(to)
        .ok_or_else(|| SortingError::UndefinedGroup(to.to_string()))?;

    let mut predecessor: HashMap<usize, (usize, EdgeType)> = HashMap::new();
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        if node == goal {
            break;
        }
        for &(next, edge_type) in &graph.before[node] {
            if seen.insert(next) {
                predecessor.insert(next, (node, edge_type));
                queue.push_back(next);
            }
        }
    }

    if !seen.contains(&goal) {
        return Ok(Vec::new());
    }

    let mut path = vec![Vertex::new(&graph.names[goal])];
    let mut current = goal;
    while let Some(&(previous, edge_type)) = predecessor.get(&current) {
        path.push(Vertex::with_edge(&graph.names[previous], edge_type));
        current = previous;
    }
    path.reverse();

    Ok(path)
}
